//! Declarations and function signatures.
//!
//! A function's scope is opened before its signature is matched, so type
//! parameters and parameters land inside it. The function symbol itself
//! goes into the enclosing scope just before the body is built, which makes
//! recursive calls resolvable. Return types inferred from the body are
//! attached to that symbol afterwards.

use sable_core::Position;

use crate::Result;
use crate::ast::{
    AnonFunction, Block, ClassDecl, ClassMember, Declaration, EnumDecl, EnumMember, Expr,
    FunctionDecl, Identifier, InterfaceDecl, InterfaceMember, NodeId, NodeMeta, Parameter,
    Signature, TypeExpr, TypeParam, VariableDecl, VariableTarget,
};
use crate::diagnostics::{AnalysisCode, SemanticCode};
use crate::parser::{KindSet, SyntaxElement, SyntaxKind, SyntaxNode, kind_sets};

use super::super::infer::Inference;
use super::super::scope::{ScopeKind, SymbolError};
use super::super::symbols::{
    FunctionSymbol, ParamSig, ParameterSymbol, Symbol, SymbolKind, TypeParamSig, VariableSymbol,
    VariableValue,
};
use super::super::types::Type;
use super::{AstBuilder, SeparatedList, Slot, first_id};

const TYPE_PARAMS: SeparatedList = SeparatedList::delimited(
    SyntaxKind::TypeArgsOpen,
    SyntaxKind::TypeArgsClose,
    KindSet::single(SyntaxKind::TypeParam),
    AnalysisCode::ExpectedTypeParameterName,
);

const PARAMS: SeparatedList = SeparatedList::delimited(
    SyntaxKind::ParenOpen,
    SyntaxKind::ParenClose,
    KindSet::single(SyntaxKind::Param),
    AnalysisCode::ExpectedParameterName,
);

const CLASS_BODY: SeparatedList = SeparatedList::body(
    KindSet::new(&[SyntaxKind::VariableDecl, SyntaxKind::FunctionDecl]),
    AnalysisCode::UnexpectedNode,
);

const ENUM_BODY: SeparatedList = SeparatedList::delimited(
    SyntaxKind::BraceOpen,
    SyntaxKind::BraceClose,
    KindSet::single(SyntaxKind::EnumMember),
    AnalysisCode::ExpectedEnumMemberName,
);

const INTERFACE_BODY: SeparatedList = SeparatedList::body(
    KindSet::single(SyntaxKind::InterfaceMember),
    AnalysisCode::ExpectedMemberName,
);

const TARGETS: SeparatedList = SeparatedList::bare(
    KindSet::single(SyntaxKind::VariableTarget),
    AnalysisCode::ExpectedVariableTarget,
);

/// Pieces of a named or anonymous function collected by the matcher.
struct FunctionParts {
    id: NodeId,
    pos: Position,
    name: Option<(Identifier, SyntaxElement)>,
    signature: Signature,
    body: Option<Block>,
    inferred_returns: Option<Vec<Type>>,
}

impl FunctionParts {
    fn new(meta: &NodeMeta) -> Self {
        Self {
            id: meta.id,
            pos: meta.pos,
            name: None,
            signature: Signature::default(),
            body: None,
            inferred_returns: None,
        }
    }

    fn symbol(&self) -> FunctionSymbol {
        let signature = &self.signature;
        FunctionSymbol {
            pos: self.pos,
            node: self.id,
            type_params: signature
                .type_params
                .iter()
                .map(|param| TypeParamSig {
                    name: param.name.name.clone(),
                    constraint: param.constraint.as_ref().map(Type::from_expr),
                })
                .collect(),
            params: signature
                .params
                .iter()
                .map(|param| ParamSig {
                    name: param.name.name.clone(),
                    ty: param.resolved_type.clone(),
                    has_default: param.default.is_some(),
                    is_rest: param.is_rest,
                })
                .collect(),
            return_types: signature.return_types.clone(),
            returns_inferred: false,
        }
    }
}

/// Slots shared by `f name ...` and `f ...` after the name.
fn signature_slots() -> [Slot<FunctionParts>; 4] {
    [
        Slot::optional(KindSet::single(SyntaxKind::TypeParamList), take_type_params),
        Slot::optional(KindSet::single(SyntaxKind::ParamList), take_params),
        Slot::optional(KindSet::single(SyntaxKind::ReturnTypes), take_returns),
        Slot::required(
            KindSet::single(SyntaxKind::Block),
            AnalysisCode::ExpectedFunctionBody,
            take_body,
        ),
    ]
}

fn take_type_params(
    b: &mut AstBuilder<'_>,
    parts: &mut FunctionParts,
    list: &SyntaxElement,
) -> Result<()> {
    parts.signature.type_params = b.type_param_list(b.node(list)?)?;
    Ok(())
}

fn take_params(
    b: &mut AstBuilder<'_>,
    parts: &mut FunctionParts,
    list: &SyntaxElement,
) -> Result<()> {
    let list = b.node(list)?;
    parts.signature.params = b.match_list(list, &PARAMS, |b, param| b.param(b.node(param)?))?;
    Ok(())
}

fn take_returns(
    b: &mut AstBuilder<'_>,
    parts: &mut FunctionParts,
    returns: &SyntaxElement,
) -> Result<()> {
    let declared = b.return_types(b.node(returns)?)?;
    parts.signature.return_types = declared.iter().map(Type::from_expr).collect();
    parts.signature.declared_returns = declared;
    Ok(())
}

/// Registers a named function in the enclosing scope, then builds the body
/// in the function's own scope.
fn take_body(
    b: &mut AstBuilder<'_>,
    parts: &mut FunctionParts,
    body: &SyntaxElement,
) -> Result<()> {
    if let Some((name, at)) = &parts.name {
        let symbol = Symbol::Function(parts.symbol());
        let inserted = match b.scopes.current_scope().parent {
            Some(parent) => b.scopes.insert_in(parent, name.name.clone(), symbol),
            None => Err(SymbolError::AtRoot),
        };
        inserted.map_err(|err| b.symbol_error(err, Some(at)))?;
    }
    let scope = b.scopes.current_scope().name.clone();
    b.return_frames.push(None);
    let block = b.node(body).and_then(|node| b.block_contents(node, scope));
    parts.inferred_returns = b.return_frames.pop().flatten();
    parts.body = Some(block?);
    Ok(())
}

fn own_signature(meta: &NodeMeta, signature: &mut Signature) {
    meta.own_all(signature.type_params.iter_mut());
    meta.own_all(signature.params.iter_mut());
    meta.own_all(signature.declared_returns.iter_mut());
}

/// Names declared in the `TypeParamList` directly under `node`.
fn type_param_names(node: &SyntaxNode) -> Vec<String> {
    node.children()
        .filter(|child| child.kind() == SyntaxKind::TypeParamList)
        .flat_map(|list| list.children())
        .filter(|child| child.kind() == SyntaxKind::TypeParam)
        .filter_map(|param| first_id(&param))
        .collect()
}

#[derive(Default)]
struct TypeParamParts {
    name: Option<Identifier>,
    constraint: Option<TypeExpr>,
}

#[derive(Default)]
struct ParamParts {
    is_rest: bool,
    name: Option<(Identifier, SyntaxElement)>,
    type_annotation: Option<TypeExpr>,
    default: Option<Expr>,
}

#[derive(Default)]
struct ClassParts {
    name: Option<Identifier>,
    type_params: Vec<TypeParam>,
    members: Vec<ClassMember>,
}

#[derive(Default)]
struct EnumParts {
    name: Option<Identifier>,
    members: Vec<EnumMember>,
}

#[derive(Default)]
struct InterfaceParts {
    name: Option<Identifier>,
    type_params: Vec<TypeParam>,
    members: Vec<InterfaceMember>,
}

#[derive(Default)]
struct MemberParts {
    name: Option<(Identifier, SyntaxElement)>,
    ty: Option<TypeExpr>,
    value: Option<Expr>,
}

#[derive(Default)]
struct VariableParts {
    mutable: bool,
    targets: Vec<(VariableTarget, SyntaxElement)>,
    values: Vec<Expr>,
}

#[derive(Default)]
struct TargetParts {
    name: Option<Identifier>,
    type_annotation: Option<TypeExpr>,
}

impl AstBuilder<'_> {
    pub(super) fn function_decl(&mut self, node: &SyntaxNode) -> Result<FunctionDecl> {
        let element: SyntaxElement = node.clone().into();
        let meta = self.meta(&element);
        let scope = first_id(node).unwrap_or_default();
        let mut slots = vec![
            Slot::token(SyntaxKind::KwF, AnalysisCode::ExpectedFunctionKeyword),
            Slot::required(
                KindSet::single(SyntaxKind::Id),
                AnalysisCode::ExpectedFunctionName,
                |b, parts: &mut FunctionParts, name| {
                    parts.name = Some((b.identifier(name), name.clone()));
                    Ok(())
                },
            ),
        ];
        slots.extend(signature_slots());

        let mut parts = FunctionParts::new(&meta);
        let type_params = type_param_names(node);
        self.with_scope(scope.clone(), ScopeKind::Function, meta.pos, |b| {
            b.with_type_params(type_params, |b| b.match_record(node, &slots, &mut parts))
        })?;

        let FunctionParts {
            name,
            signature,
            body,
            inferred_returns,
            ..
        } = parts;
        let (name, _) = self.filled(name, &element)?;
        let body = self.filled(body, &element)?;
        let mut func = FunctionDecl {
            meta,
            name,
            scope,
            signature,
            body,
        };
        if !func.signature.has_declared_returns()
            && let Some(returns) = inferred_returns
        {
            func.signature.return_types = returns.clone();
            self.scopes
                .update_symbol(&func.name.name, SymbolKind::Function, |symbol| {
                    if let Symbol::Function(symbol) = symbol {
                        symbol.return_types = returns;
                        symbol.returns_inferred = true;
                    }
                })
                .map_err(|err| self.symbol_error(err, Some(&element)))?;
        }

        func.meta.own(&mut func.name);
        own_signature(&func.meta, &mut func.signature);
        func.meta.own(&mut func.body);
        func.qualify_inner_names();
        Ok(func)
    }

    pub(super) fn anon_function(&mut self, node: &SyntaxNode) -> Result<Expr> {
        let element: SyntaxElement = node.clone().into();
        let meta = self.meta(&element);
        let scope = self.next_anon_scope();
        let mut slots = vec![Slot::token(
            SyntaxKind::KwF,
            AnalysisCode::ExpectedFunctionKeyword,
        )];
        slots.extend(signature_slots());

        let mut parts = FunctionParts::new(&meta);
        let type_params = type_param_names(node);
        self.with_scope(scope.clone(), ScopeKind::Function, meta.pos, |b| {
            b.with_type_params(type_params, |b| b.match_record(node, &slots, &mut parts))
        })?;

        let mut signature = parts.signature;
        if !signature.has_declared_returns() {
            signature.return_types = parts.inferred_returns.unwrap_or_default();
        }
        let body = self.filled(parts.body, &element)?;
        let mut func = AnonFunction {
            meta,
            scope,
            signature,
            body,
        };
        own_signature(&func.meta, &mut func.signature);
        func.meta.own(&mut func.body);
        Ok(Expr::AnonFunction(Box::new(func)))
    }

    pub(super) fn type_param_list(&mut self, list: &SyntaxNode) -> Result<Vec<TypeParam>> {
        self.match_list(list, &TYPE_PARAMS, |b, param| b.type_param(b.node(param)?))
    }

    fn type_param(&mut self, node: &SyntaxNode) -> Result<TypeParam> {
        let element: SyntaxElement = node.clone().into();
        let meta = self.meta(&element);
        let slots = [
            Slot::required(
                KindSet::single(SyntaxKind::Id),
                AnalysisCode::ExpectedTypeParameterName,
                |b, parts: &mut TypeParamParts, name| {
                    parts.name = Some(b.identifier(name));
                    Ok(())
                },
            ),
            Slot::optional_token(SyntaxKind::Colon),
            Slot::after(
                SyntaxKind::Colon,
                kind_sets::TYPE,
                AnalysisCode::ExpectedTypeConstraint,
                |b, parts, ty| {
                    parts.constraint = Some(b.type_expr(ty)?);
                    Ok(())
                },
            ),
        ];
        let mut parts = TypeParamParts::default();
        self.match_record(node, &slots, &mut parts)?;
        let mut param = TypeParam {
            meta,
            name: self.filled(parts.name, &element)?,
            constraint: parts.constraint,
        };
        param.meta.own(&mut param.name);
        if let Some(constraint) = &mut param.constraint {
            param.meta.own(constraint);
        }
        Ok(param)
    }

    /// Builds a parameter and declares it in the function scope.
    ///
    /// A name repeated within one list is declared once; the list itself is
    /// rejected later with a dedicated error.
    fn param(&mut self, node: &SyntaxNode) -> Result<Parameter> {
        let element: SyntaxElement = node.clone().into();
        let meta = self.meta(&element);
        let slots = [
            Slot::optional(
                KindSet::single(SyntaxKind::Ellipsis),
                |_, parts: &mut ParamParts, _| {
                    parts.is_rest = true;
                    Ok(())
                },
            ),
            Slot::required(
                KindSet::single(SyntaxKind::Id),
                AnalysisCode::ExpectedParameterName,
                |b, parts, name| {
                    parts.name = Some((b.identifier(name), name.clone()));
                    Ok(())
                },
            ),
            Slot::optional_token(SyntaxKind::Colon),
            Slot::after(
                SyntaxKind::Colon,
                kind_sets::TYPE,
                AnalysisCode::ExpectedParameterType,
                |b, parts, ty| {
                    parts.type_annotation = Some(b.type_expr(ty)?);
                    Ok(())
                },
            ),
            Slot::optional_token(SyntaxKind::Equals),
            Slot::after(
                SyntaxKind::Equals,
                kind_sets::EXPR,
                AnalysisCode::ExpectedDefaultValue,
                |b, parts, value| {
                    parts.default = Some(b.expr(value)?);
                    Ok(())
                },
            ),
        ];
        let mut parts = ParamParts::default();
        self.match_record(node, &slots, &mut parts)?;
        let (name, at) = self.filled(parts.name, &element)?;

        let declared_type = parts.type_annotation.as_ref().map(Type::from_expr);
        let resolved_type = declared_type.clone().or_else(|| {
            let default = parts.default.as_ref()?;
            let scope = self.scopes.current();
            Inference::new(&self.scopes)
                .infer(scope, default)
                .only()
                .cloned()
        });
        if !self.scopes.current_scope().symbols.contains_key(&name.name) {
            let symbol = Symbol::Parameter(ParameterSymbol {
                pos: meta.pos,
                node: meta.id,
                declared_type,
                default: parts.default.clone(),
                is_rest: parts.is_rest,
            });
            self.scopes
                .insert(name.name.clone(), symbol)
                .map_err(|err| self.symbol_error(err, Some(&at)))?;
        }

        let mut param = Parameter {
            meta,
            name,
            type_annotation: parts.type_annotation,
            default: parts.default,
            is_rest: parts.is_rest,
            resolved_type,
        };
        param.meta.own(&mut param.name);
        if let Some(ty) = &mut param.type_annotation {
            param.meta.own(ty);
        }
        if let Some(default) = &mut param.default {
            param.meta.own(default);
        }
        Ok(param)
    }

    pub(super) fn class_decl(&mut self, node: &SyntaxNode) -> Result<ClassDecl> {
        let element: SyntaxElement = node.clone().into();
        let meta = self.meta(&element);
        let scope = first_id(node).unwrap_or_default();
        self.claim_type_name(&scope, &element)?;
        let slots = [
            Slot::token(SyntaxKind::KwClass, AnalysisCode::ExpectedKeyword),
            Slot::required(
                KindSet::single(SyntaxKind::Id),
                AnalysisCode::ExpectedClassName,
                |b, parts: &mut ClassParts, name| {
                    parts.name = Some(b.identifier(name));
                    Ok(())
                },
            ),
            Slot::optional(KindSet::single(SyntaxKind::TypeParamList), |b, parts, list| {
                parts.type_params = b.type_param_list(b.node(list)?)?;
                Ok(())
            }),
            Slot::required(
                KindSet::single(SyntaxKind::ClassBody),
                AnalysisCode::ExpectedClassBody,
                |b, parts, body| {
                    let body = b.node(body)?;
                    parts.members = b.match_list(body, &CLASS_BODY, |b, member| {
                        match b.declaration(member)? {
                            Declaration::Variable(field) => Ok(ClassMember::Field(field)),
                            Declaration::Function(method) => Ok(ClassMember::Method(method)),
                            _ => Err(b.unexpected(member)),
                        }
                    })?;
                    Ok(())
                },
            ),
        ];
        let mut parts = ClassParts::default();
        let type_params = type_param_names(node);
        self.with_scope(scope, ScopeKind::Class, meta.pos, |b| {
            b.with_type_params(type_params, |b| b.match_record(node, &slots, &mut parts))
        })?;

        let mut class = ClassDecl {
            meta,
            name: self.filled(parts.name, &element)?,
            type_params: parts.type_params,
            members: parts.members,
        };
        class.meta.own(&mut class.name);
        class.meta.own_all(class.type_params.iter_mut());
        class.meta.own_all(class.members.iter_mut());
        class.qualify_inner_names();
        Ok(class)
    }

    pub(super) fn enum_decl(&mut self, node: &SyntaxNode) -> Result<EnumDecl> {
        let element: SyntaxElement = node.clone().into();
        let meta = self.meta(&element);
        let scope = first_id(node).unwrap_or_default();
        self.claim_type_name(&scope, &element)?;
        let slots = [
            Slot::token(SyntaxKind::KwEnum, AnalysisCode::ExpectedKeyword),
            Slot::required(
                KindSet::single(SyntaxKind::Id),
                AnalysisCode::ExpectedEnumName,
                |b, parts: &mut EnumParts, name| {
                    parts.name = Some(b.identifier(name));
                    Ok(())
                },
            ),
            Slot::required(
                KindSet::single(SyntaxKind::EnumBody),
                AnalysisCode::ExpectedEnumBody,
                |b, parts, body| {
                    let body = b.node(body)?;
                    parts.members = b.match_list(body, &ENUM_BODY, |b, member| {
                        b.enum_member(b.node(member)?)
                    })?;
                    Ok(())
                },
            ),
        ];
        let mut parts = EnumParts::default();
        self.with_scope(scope, ScopeKind::Enum, meta.pos, |b| {
            b.match_record(node, &slots, &mut parts)
        })?;

        let mut decl = EnumDecl {
            meta,
            name: self.filled(parts.name, &element)?,
            members: parts.members,
        };
        decl.meta.own(&mut decl.name);
        decl.meta.own_all(decl.members.iter_mut());
        decl.qualify_inner_names();
        Ok(decl)
    }

    /// An enum member is an immutable variable of the enum's type, declared
    /// in the enum scope.
    fn enum_member(&mut self, node: &SyntaxNode) -> Result<EnumMember> {
        let element: SyntaxElement = node.clone().into();
        let meta = self.meta(&element);
        let slots = [
            Slot::required(
                KindSet::single(SyntaxKind::Id),
                AnalysisCode::ExpectedEnumMemberName,
                |b, parts: &mut MemberParts, name| {
                    parts.name = Some((b.identifier(name), name.clone()));
                    Ok(())
                },
            ),
            Slot::optional_token(SyntaxKind::Equals),
            Slot::after(
                SyntaxKind::Equals,
                kind_sets::EXPR,
                AnalysisCode::ExpectedEnumValue,
                |b, parts, value| {
                    parts.value = Some(b.expr(value)?);
                    Ok(())
                },
            ),
        ];
        let mut parts = MemberParts::default();
        self.match_record(node, &slots, &mut parts)?;
        let (name, at) = self.filled(parts.name, &element)?;

        let owner = self.scopes.current_scope().name.clone();
        let symbol = Symbol::Variable(VariableSymbol {
            pos: meta.pos,
            node: meta.id,
            mutable: false,
            declared_type: Some(Type::named(owner)),
            value: parts.value.clone().map(VariableValue::Expr),
        });
        self.scopes
            .insert(name.name.clone(), symbol)
            .map_err(|err| self.symbol_error(err, Some(&at)))?;

        let mut member = EnumMember {
            meta,
            name,
            value: parts.value,
        };
        member.meta.own(&mut member.name);
        if let Some(value) = &mut member.value {
            member.meta.own(value);
        }
        Ok(member)
    }

    pub(super) fn interface_decl(&mut self, node: &SyntaxNode) -> Result<InterfaceDecl> {
        let element: SyntaxElement = node.clone().into();
        let meta = self.meta(&element);
        let scope = first_id(node).unwrap_or_default();
        self.claim_type_name(&scope, &element)?;
        let slots = [
            Slot::token(SyntaxKind::KwInterface, AnalysisCode::ExpectedKeyword),
            Slot::required(
                KindSet::single(SyntaxKind::Id),
                AnalysisCode::ExpectedInterfaceName,
                |b, parts: &mut InterfaceParts, name| {
                    parts.name = Some(b.identifier(name));
                    Ok(())
                },
            ),
            Slot::optional(KindSet::single(SyntaxKind::TypeParamList), |b, parts, list| {
                parts.type_params = b.type_param_list(b.node(list)?)?;
                Ok(())
            }),
            Slot::required(
                KindSet::single(SyntaxKind::InterfaceBody),
                AnalysisCode::ExpectedInterfaceBody,
                |b, parts, body| {
                    let body = b.node(body)?;
                    parts.members = b.match_list(body, &INTERFACE_BODY, |b, member| {
                        b.interface_member(b.node(member)?)
                    })?;
                    Ok(())
                },
            ),
        ];
        let mut parts = InterfaceParts::default();
        let type_params = type_param_names(node);
        self.with_scope(scope, ScopeKind::Interface, meta.pos, |b| {
            b.with_type_params(type_params, |b| b.match_record(node, &slots, &mut parts))
        })?;

        let mut decl = InterfaceDecl {
            meta,
            name: self.filled(parts.name, &element)?,
            type_params: parts.type_params,
            members: parts.members,
        };
        decl.meta.own(&mut decl.name);
        decl.meta.own_all(decl.type_params.iter_mut());
        decl.meta.own_all(decl.members.iter_mut());
        decl.qualify_inner_names();
        Ok(decl)
    }

    fn interface_member(&mut self, node: &SyntaxNode) -> Result<InterfaceMember> {
        let element: SyntaxElement = node.clone().into();
        let meta = self.meta(&element);
        let slots = [
            Slot::required(
                KindSet::single(SyntaxKind::Id),
                AnalysisCode::ExpectedMemberName,
                |b, parts: &mut MemberParts, name| {
                    parts.name = Some((b.identifier(name), name.clone()));
                    Ok(())
                },
            ),
            Slot::token(SyntaxKind::Colon, AnalysisCode::ExpectedDelimiter),
            Slot::required(
                kind_sets::TYPE,
                AnalysisCode::ExpectedMemberType,
                |b, parts, ty| {
                    parts.ty = Some(b.type_expr(ty)?);
                    Ok(())
                },
            ),
            Slot::token(SyntaxKind::Semicolon, AnalysisCode::ExpectedSemicolon),
        ];
        let mut parts = MemberParts::default();
        self.match_record(node, &slots, &mut parts)?;
        let (name, at) = self.filled(parts.name, &element)?;
        let type_annotation = self.filled(parts.ty, &element)?;

        let symbol = Symbol::Variable(VariableSymbol {
            pos: meta.pos,
            node: meta.id,
            mutable: false,
            declared_type: Some(Type::from_expr(&type_annotation)),
            value: None,
        });
        self.scopes
            .insert(name.name.clone(), symbol)
            .map_err(|err| self.symbol_error(err, Some(&at)))?;

        let mut member = InterfaceMember {
            meta,
            name,
            type_annotation,
        };
        member.meta.own(&mut member.name);
        member.meta.own(&mut member.type_annotation);
        Ok(member)
    }

    /// `const a, b: T = x, y;`
    ///
    /// Values are built before the targets are declared, so an initializer
    /// never sees the names it initializes.
    pub(super) fn variable_decl(&mut self, node: &SyntaxNode) -> Result<VariableDecl> {
        let element: SyntaxElement = node.clone().into();
        let meta = self.meta(&element);
        let slots = [
            Slot::required(
                KindSet::new(&[SyntaxKind::KwConst, SyntaxKind::KwLet]),
                AnalysisCode::ExpectedVariableKeyword,
                |_, parts: &mut VariableParts, keyword| {
                    parts.mutable = keyword.kind() == SyntaxKind::KwLet;
                    Ok(())
                },
            ),
            Slot::required(
                KindSet::single(SyntaxKind::TargetList),
                AnalysisCode::ExpectedVariableTarget,
                |b, parts, list| {
                    let list = b.node(list)?;
                    parts.targets = b.match_list(list, &TARGETS, |b, target| {
                        Ok((b.variable_target(b.node(target)?)?, target.clone()))
                    })?;
                    Ok(())
                },
            ),
            Slot::optional_token(SyntaxKind::Equals),
            Slot::after(
                SyntaxKind::Equals,
                KindSet::single(SyntaxKind::ExprList),
                AnalysisCode::ExpectedInitializer,
                |b, parts, list| {
                    parts.values = b.expr_list(b.node(list)?)?;
                    Ok(())
                },
            ),
            Slot::token(SyntaxKind::Semicolon, AnalysisCode::ExpectedSemicolon),
        ];
        let mut parts = VariableParts::default();
        self.match_record(node, &slots, &mut parts)?;
        let VariableParts {
            mutable,
            targets,
            mut values,
        } = parts;

        if let [(target, _)] = targets.as_slice()
            && let [Expr::AnonFunction(func)] = values.as_mut_slice()
        {
            self.bind_anon_function(&target.name.name, func)?;
        }

        let count = targets.len();
        let mut declared = Vec::with_capacity(count);
        for (index, (mut target, at)) in targets.into_iter().enumerate() {
            let value = VariableValue::for_target(&values, count, index);
            let declared_type = target.type_annotation.as_ref().map(Type::from_expr);
            target.resolved_type = declared_type.clone().or_else(|| {
                let scope = self.scopes.current();
                Inference::new(&self.scopes)
                    .value_types(scope, value.as_ref()?)
                    .only()
                    .cloned()
            });
            let symbol = Symbol::Variable(VariableSymbol {
                pos: target.meta.pos,
                node: target.meta.id,
                mutable,
                declared_type,
                value,
            });
            self.scopes
                .insert(target.name.name.clone(), symbol)
                .map_err(|err| self.symbol_error(err, Some(&at)))?;
            declared.push(target);
        }

        let mut decl = VariableDecl {
            meta,
            mutable,
            targets: declared,
            values,
        };
        decl.meta.own_all(decl.targets.iter_mut());
        decl.meta.own_all(decl.values.iter_mut());
        Ok(decl)
    }

    fn variable_target(&mut self, node: &SyntaxNode) -> Result<VariableTarget> {
        let element: SyntaxElement = node.clone().into();
        let meta = self.meta(&element);
        let slots = [
            Slot::required(
                KindSet::single(SyntaxKind::Id),
                AnalysisCode::ExpectedVariableTarget,
                |b, parts: &mut TargetParts, name| {
                    parts.name = Some(b.identifier(name));
                    Ok(())
                },
            ),
            Slot::optional_token(SyntaxKind::Colon),
            Slot::after(
                SyntaxKind::Colon,
                kind_sets::TYPE,
                AnalysisCode::ExpectedVariableType,
                |b, parts, ty| {
                    parts.type_annotation = Some(b.type_expr(ty)?);
                    Ok(())
                },
            ),
        ];
        let mut parts = TargetParts::default();
        self.match_record(node, &slots, &mut parts)?;
        let mut target = VariableTarget {
            meta,
            name: self.filled(parts.name, &element)?,
            type_annotation: parts.type_annotation,
            resolved_type: None,
        };
        target.meta.own(&mut target.name);
        if let Some(ty) = &mut target.type_annotation {
            target.meta.own(ty);
        }
        Ok(target)
    }

    /// `const name = f(...) {...};` names the anonymous function: its scope
    /// is re-keyed to `name` unless a sibling scope already uses it, and the
    /// names declared inside are qualified with `name`.
    fn bind_anon_function(&mut self, name: &str, func: &mut AnonFunction) -> Result<()> {
        let current = self.scopes.current();
        if self.scopes.child(current, name).is_none()
            && let Some(id) = self.scopes.child(current, &func.scope)
        {
            self.scopes
                .rename(id, name)
                .map_err(|err| self.symbol_error(err, None))?;
            func.scope = name.to_owned();
            func.body.scope = name.to_owned();
        }
        func.qualify_inner_names(name);
        Ok(())
    }

    /// Classes, enums and interfaces share one namespace with the symbols
    /// and scopes of the enclosing scope.
    fn claim_type_name(&self, name: &str, at: &SyntaxElement) -> Result<()> {
        let current = self.scopes.current();
        let taken = self.scopes.child(current, name).is_some()
            || self.scopes.current_scope().symbols.contains_key(name);
        if taken {
            return Err(self.semantic_error(SemanticCode::DuplicateIdentifier, at, name));
        }
        Ok(())
    }
}
