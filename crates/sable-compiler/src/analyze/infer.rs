//! Type inference.
//!
//! Inference is partial and forgiving: it computes the set of types an
//! expression could have and returns an empty set whenever it runs out of
//! information. It never fails; callers decide whether an unknown type is a
//! problem.

use std::collections::HashMap;

use sable_core::NumberSize;

use super::scope::{ScopeId, ScopeTree};
use super::symbols::{FunctionSymbol, ParamSig, Symbol, SymbolKind, TypeParamSig, VariableValue};
use super::types::{FunctionType, Type, TypeSet};
use crate::ast::{
    BinaryExpr, BinaryOp, CallExpr, Expr, Literal, LiteralValue, MemberExpr, Signature, UnaryExpr,
    UnaryOp,
};

/// Upper bound on the shapes synthesised for one object or tuple literal.
const MAX_SHAPES: usize = 256;

/// Candidate types of `expr`, evaluated in `scope`.
pub fn infer_possible_types(scopes: &ScopeTree, scope: ScopeId, expr: &Expr) -> TypeSet {
    Inference::new(scopes).infer(scope, expr)
}

/// Whether `value` fits `declared`, along with the inferred candidates.
pub fn is_assignable(
    scopes: &ScopeTree,
    scope: ScopeId,
    value: &Expr,
    declared: &Type,
) -> (bool, TypeSet) {
    Inference::new(scopes).is_assignable(scope, value, declared)
}

/// Callable signature resolved from a call's callee.
#[derive(Debug, Clone, PartialEq)]
pub struct CalleeSignature {
    pub type_params: Vec<TypeParamSig>,
    pub params: Vec<ParamSig>,
    pub returns: Vec<Type>,
}

impl From<&FunctionSymbol> for CalleeSignature {
    fn from(func: &FunctionSymbol) -> Self {
        Self {
            type_params: func.type_params.clone(),
            params: func.params.clone(),
            returns: func.return_types.clone(),
        }
    }
}

impl CalleeSignature {
    fn from_function_type(func: &FunctionType) -> Self {
        Self {
            type_params: Vec::new(),
            params: func
                .params
                .iter()
                .enumerate()
                .map(|(i, ty)| ParamSig {
                    name: format!("${i}"),
                    ty: Some(ty.clone()),
                    has_default: false,
                    is_rest: false,
                })
                .collect(),
            returns: func.returns.clone(),
        }
    }

    /// Binds type parameters to explicit type arguments by position.
    pub fn bindings(&self, type_args: &[Type]) -> HashMap<String, Type> {
        self.type_params
            .iter()
            .zip(type_args)
            .map(|(param, arg)| (param.name.clone(), arg.clone()))
            .collect()
    }
}

/// Why a callee or member could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The name is not a symbol or type in scope.
    Undefined(String),
    /// The owner was found but has no such member.
    UndefinedMember { owner: String, member: String },
    /// The expression resolved to something that is not a function.
    NotCallable(String),
    /// Not enough type information to decide.
    Unknown,
}

/// What a member expression refers to.
#[derive(Debug, Clone)]
pub enum MemberTarget<'t> {
    /// A symbol in a class, enum or interface scope.
    Symbol { owner: ScopeId, symbol: &'t Symbol },
    /// A field of an object shape.
    Field(Type),
}

pub struct Inference<'t> {
    scopes: &'t ScopeTree,
    /// Symbols whose initializers are being inferred, to cut cycles.
    in_progress: Vec<(ScopeId, String)>,
}

impl<'t> Inference<'t> {
    pub fn new(scopes: &'t ScopeTree) -> Self {
        Self {
            scopes,
            in_progress: Vec::new(),
        }
    }

    pub fn is_assignable(
        &mut self,
        scope: ScopeId,
        value: &Expr,
        declared: &Type,
    ) -> (bool, TypeSet) {
        let types = self.infer(scope, value);
        (types.is_assignable_to(declared), types)
    }

    pub fn infer(&mut self, scope: ScopeId, expr: &Expr) -> TypeSet {
        match expr {
            Expr::Literal(lit) => literal_types(lit),
            Expr::Array(array) => match array.elements.first() {
                Some(first) => self
                    .infer(scope, first)
                    .iter()
                    .map(|ty| Type::array(ty.clone()))
                    .collect(),
                None => TypeSet::new(),
            },
            Expr::Binary(e) => self.binary(scope, e),
            Expr::Unary(e) => self.unary(scope, e),
            Expr::Name(name) => self.name(scope, &name.name),
            Expr::Call(call) => self
                .call_returns(scope, call)
                .map(TypeSet::from_iter)
                .unwrap_or_default(),
            Expr::Ternary(e) => {
                let consequent = self.infer(scope, &e.consequent);
                let alternate = self.infer(scope, &e.alternate);
                consequent.intersection(&alternate)
            }
            Expr::Tuple(tuple) => {
                let sets: Vec<_> = tuple.elements.iter().map(|e| self.infer(scope, e)).collect();
                product(&sets)
                    .map(|shapes| shapes.into_iter().map(Type::Tuple).collect())
                    .unwrap_or_default()
            }
            Expr::Object(object) => {
                let sets: Vec<_> = object
                    .fields
                    .iter()
                    .map(|field| self.infer(scope, &field.value))
                    .collect();
                let Some(shapes) = product(&sets) else {
                    return TypeSet::new();
                };
                shapes
                    .into_iter()
                    .map(|shape| {
                        let keys = object.fields.iter().map(|field| field.key.clone());
                        Type::Object(keys.zip(shape).collect())
                    })
                    .collect()
            }
            Expr::Index(e) => self
                .infer(scope, &e.object)
                .iter()
                .filter_map(|ty| ty.element().cloned())
                .collect(),
            Expr::Member(e) => self.member(scope, e),
            Expr::AnonFunction(func) => signature_type(&func.signature)
                .map(TypeSet::single)
                .unwrap_or_default(),
        }
    }

    /// Left-nested chains are folded innermost-out instead of recursing
    /// once per operator.
    fn binary(&mut self, scope: ScopeId, e: &BinaryExpr) -> TypeSet {
        let mut spine = vec![e];
        let mut innermost = e;
        while !innermost.op.is_boolean()
            && let Expr::Binary(inner) = &innermost.lhs
        {
            innermost = &**inner;
            spine.push(innermost);
        }
        let mut types = if innermost.op.is_boolean() {
            TypeSet::single(Type::Bool)
        } else {
            let lhs = self.infer(scope, &innermost.lhs);
            self.apply_operator(scope, innermost, lhs)
        };
        for outer in spine.into_iter().rev().skip(1) {
            types = self.apply_operator(scope, outer, types);
        }
        types
    }

    /// Result of a non-boolean operator given the types of its left operand.
    fn apply_operator(&mut self, scope: ScopeId, e: &BinaryExpr, lhs: TypeSet) -> TypeSet {
        if e.op == BinaryOp::Exp {
            if !e.rhs.is_negation() {
                return lhs;
            }
            // Negative exponent: a decimal at least as wide as the narrowest base.
            let Some(min_bits) = lhs
                .iter()
                .filter_map(Type::as_number)
                .map(NumberSize::bits)
                .min()
            else {
                return TypeSet::new();
            };
            return NumberSize::ALL
                .into_iter()
                .filter(|size| size.is_decimal() && size.bits() >= min_bits)
                .map(Type::Number)
                .collect();
        }
        let rhs = self.infer(scope, &e.rhs);
        if lhs.same_members(&rhs) {
            lhs
        } else {
            lhs.intersection(&rhs)
        }
    }

    fn unary(&mut self, scope: ScopeId, e: &UnaryExpr) -> TypeSet {
        if e.op == UnaryOp::Not {
            return TypeSet::single(Type::Bool);
        }
        let mut operand = self.infer(scope, &e.operand);
        operand.retain(|ty| {
            ty.as_number()
                .is_some_and(|size| e.op != UnaryOp::Neg || !size.is_unsigned())
        });
        operand
    }

    fn name(&mut self, scope: ScopeId, name: &str) -> TypeSet {
        let scopes = self.scopes;
        match scopes.resolve_from(scope, name, SymbolKind::ANY) {
            Some((owner, symbol)) => self.symbol_types(owner, name, symbol),
            None => TypeSet::new(),
        }
    }

    /// Types a symbol evaluates to when referenced by name. A function
    /// name stands for its return types.
    pub fn symbol_types(&mut self, owner: ScopeId, name: &str, symbol: &'t Symbol) -> TypeSet {
        match symbol {
            Symbol::Function(func) => func.return_types.iter().cloned().collect(),
            Symbol::Parameter(param) => match (&param.declared_type, &param.default) {
                (Some(ty), _) => TypeSet::single(ty.clone()),
                (None, Some(default)) => {
                    self.guarded(owner, name, |this| this.infer(owner, default))
                }
                (None, None) => TypeSet::new(),
            },
            Symbol::Variable(var) => match (&var.declared_type, &var.value) {
                (Some(ty), _) => TypeSet::single(ty.clone()),
                (None, Some(value)) => {
                    self.guarded(owner, name, |this| this.value_types(owner, value))
                }
                (None, None) => TypeSet::new(),
            },
        }
    }

    /// Types of a variable's initializer, evaluated in `scope`.
    pub fn value_types(&mut self, scope: ScopeId, value: &VariableValue) -> TypeSet {
        match value {
            VariableValue::Expr(expr) => self.infer(scope, expr),
            VariableValue::Destructured {
                source: Expr::Call(call),
                index,
            } => self
                .call_returns(scope, call)
                .and_then(|returns| returns.get(*index).cloned())
                .map(TypeSet::single)
                .unwrap_or_default(),
            VariableValue::Destructured { source, index } => self
                .infer(scope, source)
                .iter()
                .filter_map(|ty| match ty {
                    Type::Tuple(items) => items.get(*index).cloned(),
                    _ => None,
                })
                .collect(),
            VariableValue::Iterated(iterable) => self
                .infer(scope, iterable)
                .iter()
                .filter_map(|ty| ty.element().cloned())
                .collect(),
        }
    }

    fn guarded(
        &mut self,
        scope: ScopeId,
        name: &str,
        infer: impl FnOnce(&mut Self) -> TypeSet,
    ) -> TypeSet {
        let key = (scope, name.to_owned());
        if self.in_progress.contains(&key) {
            return TypeSet::new();
        }
        self.in_progress.push(key);
        let types = infer(self);
        self.in_progress.pop();
        types
    }

    fn member(&mut self, scope: ScopeId, e: &MemberExpr) -> TypeSet {
        match self.member_target(scope, e) {
            Ok(MemberTarget::Symbol { owner, symbol }) => {
                self.symbol_types(owner, &e.member.name, symbol)
            }
            Ok(MemberTarget::Field(ty)) => TypeSet::single(ty),
            Err(_) => TypeSet::new(),
        }
    }

    /// Resolves `object.member`.
    ///
    /// A bare object name that is not a symbol but names a class, enum or
    /// interface refers to that type's scope. Otherwise the object's type
    /// is inferred and must be a named type or an object shape.
    pub fn member_target(
        &mut self,
        scope: ScopeId,
        e: &MemberExpr,
    ) -> Result<MemberTarget<'t>, ResolveError> {
        let scopes = self.scopes;
        let member = &e.member.name;
        if let Expr::Name(object) = &e.object
            && scopes.resolve_from(scope, &object.name, SymbolKind::ANY).is_none()
        {
            let owner = scopes
                .find_type_scope(scope, &object.name)
                .ok_or_else(|| ResolveError::Undefined(object.name.clone()))?;
            return scope_member(scopes, owner, &object.name, member);
        }

        let object_types = self.infer(scope, &e.object);
        let Some(object_type) = object_types.only() else {
            return Err(ResolveError::Unknown);
        };
        match object_type {
            Type::Named { name, .. } => {
                let owner = scopes
                    .find_type_scope(scope, name)
                    .ok_or(ResolveError::Unknown)?;
                scope_member(scopes, owner, name, member)
            }
            Type::Object(fields) => fields
                .get(member)
                .cloned()
                .map(MemberTarget::Field)
                .ok_or_else(|| ResolveError::UndefinedMember {
                    owner: object_type.to_string(),
                    member: member.clone(),
                }),
            other => Err(ResolveError::UndefinedMember {
                owner: other.to_string(),
                member: member.clone(),
            }),
        }
    }

    /// Resolves what a call invokes: a declared function, a method, or a
    /// value of function type.
    pub fn resolve_callee(
        &mut self,
        scope: ScopeId,
        callee: &Expr,
    ) -> Result<CalleeSignature, ResolveError> {
        let scopes = self.scopes;
        match callee {
            Expr::Name(name) => match scopes.resolve_from(scope, &name.name, SymbolKind::ANY) {
                None => Err(ResolveError::Undefined(name.name.clone())),
                Some((_, Symbol::Function(func))) => Ok(CalleeSignature::from(func)),
                Some((owner, symbol)) => {
                    let types = self.symbol_types(owner, &name.name, symbol);
                    function_value(&types, &name.name)
                }
            },
            Expr::Member(member) => match self.member_target(scope, member)? {
                MemberTarget::Symbol {
                    symbol: Symbol::Function(func),
                    ..
                } => Ok(CalleeSignature::from(func)),
                MemberTarget::Symbol { owner, symbol } => {
                    let types = self.symbol_types(owner, &member.member.name, symbol);
                    function_value(&types, &member.member.name)
                }
                MemberTarget::Field(ty) => {
                    function_value(&TypeSet::single(ty), &member.member.name)
                }
            },
            other => {
                let types = self.infer(scope, other);
                function_value(&types, "expression")
            }
        }
    }

    /// Return types of a call, with explicit type arguments substituted.
    pub fn call_returns(&mut self, scope: ScopeId, call: &CallExpr) -> Option<Vec<Type>> {
        let signature = self.resolve_callee(scope, &call.callee).ok()?;
        let type_args: Vec<Type> = call.type_args.iter().map(Type::from_expr).collect();
        let bindings = signature.bindings(&type_args);
        Some(
            signature
                .returns
                .iter()
                .map(|ty| ty.substitute(&bindings))
                .collect(),
        )
    }
}

fn scope_member<'t>(
    scopes: &'t ScopeTree,
    owner: ScopeId,
    owner_name: &str,
    member: &str,
) -> Result<MemberTarget<'t>, ResolveError> {
    scopes
        .scope(owner)
        .symbols
        .get(member)
        .map(|symbol| MemberTarget::Symbol { owner, symbol })
        .ok_or_else(|| ResolveError::UndefinedMember {
            owner: owner_name.to_owned(),
            member: member.to_owned(),
        })
}

fn function_value(types: &TypeSet, what: &str) -> Result<CalleeSignature, ResolveError> {
    match types.only() {
        Some(Type::Function(func)) => Ok(CalleeSignature::from_function_type(func)),
        Some(_) => Err(ResolveError::NotCallable(what.to_owned())),
        None if types.is_empty() => Err(ResolveError::Unknown),
        None => Err(ResolveError::NotCallable(what.to_owned())),
    }
}

fn literal_types(lit: &Literal) -> TypeSet {
    match &lit.value {
        LiteralValue::Bool(_) => TypeSet::single(Type::Bool),
        LiteralValue::Number { sizes, .. } => sizes.iter().copied().map(Type::Number).collect(),
        LiteralValue::String(_) => TypeSet::single(Type::String),
        LiteralValue::Path(_) => TypeSet::single(Type::Path),
        LiteralValue::Regex(_) => TypeSet::single(Type::Regex),
    }
}

/// Function type of a signature, when every parameter type is resolved.
pub fn signature_type(signature: &Signature) -> Option<Type> {
    let params = signature
        .params
        .iter()
        .map(|param| param.resolved_type.clone())
        .collect::<Option<Vec<_>>>()?;
    Some(Type::Function(FunctionType {
        params,
        returns: signature.return_types.clone(),
    }))
}

/// Every combination picking one type per member, or `None` when a member
/// is unknown or the combinations exceed [`MAX_SHAPES`].
fn product(sets: &[TypeSet]) -> Option<Vec<Vec<Type>>> {
    let mut shapes: Vec<Vec<Type>> = vec![Vec::new()];
    for set in sets {
        if set.is_empty() || shapes.len() * set.len() > MAX_SHAPES {
            return None;
        }
        shapes = shapes
            .into_iter()
            .flat_map(|prefix| {
                set.iter().map(move |ty| {
                    let mut shape = prefix.clone();
                    shape.push(ty.clone());
                    shape
                })
            })
            .collect();
    }
    Some(shapes)
}
