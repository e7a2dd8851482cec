//! Name resolution and calls.

use crate::Result;
use crate::ast::{AstNode, CallExpr, Expr, MemberExpr, NameRef};
use crate::diagnostics::SemanticCode;

use super::super::infer::{CalleeSignature, Inference, ResolveError};
use super::super::symbols::SymbolKind;
use super::super::types::Type;
use super::{Validator, describe};

impl Validator<'_> {
    /// Not a value in scope, but the name of a class, enum or interface.
    pub(super) fn is_type_name(&self, name: &str) -> bool {
        self.scopes
            .resolve_from(self.scope, name, SymbolKind::ANY)
            .is_none()
            && self.scopes.find_type_scope(self.scope, name).is_some()
    }

    pub(super) fn check_name(&self, name: &NameRef) -> Result<()> {
        match self.scopes.resolve_from(self.scope, &name.name, SymbolKind::ANY) {
            Some(_) => Ok(()),
            None => Err(self.error(SemanticCode::UndefinedIdentifier, name, &name.name)),
        }
    }

    pub(super) fn check_member(&self, member: &MemberExpr) -> Result<()> {
        match Inference::new(self.scopes).member_target(self.scope, member) {
            Ok(_) => Ok(()),
            Err(err) => self.resolve_failure(err, member),
        }
    }

    /// The callee must be a function, and the type arguments and arguments
    /// must match its signature.
    pub(super) fn check_call(&self, call: &CallExpr) -> Result<()> {
        let resolved = Inference::new(self.scopes).resolve_callee(self.scope, &call.callee);
        let signature = match resolved {
            Ok(signature) => signature,
            Err(err) => return self.resolve_failure(err, &call.callee),
        };
        let callee = callee_name(&call.callee);
        let type_args: Vec<Type> = call.type_args.iter().map(Type::from_expr).collect();
        self.check_type_args(&signature, &type_args, &callee, call)?;
        self.check_args(&signature, &type_args, &callee, call)
    }

    fn check_type_args(
        &self,
        signature: &CalleeSignature,
        type_args: &[Type],
        callee: &str,
        call: &CallExpr,
    ) -> Result<()> {
        if type_args.len() != signature.type_params.len() {
            let detail = format!(
                "`{callee}` takes {} type arguments, found {}",
                signature.type_params.len(),
                type_args.len()
            );
            return Err(self.error(SemanticCode::TypeArgumentCountMismatch, call, detail));
        }
        let params = signature.type_params.iter().zip(type_args);
        for ((param, arg), written) in params.zip(&call.type_args) {
            let Some(constraint) = &param.constraint else {
                continue;
            };
            if !arg.is_assignable_to(constraint) {
                let detail = format!(
                    "`{arg}` does not satisfy `{}: {constraint}` of `{callee}`",
                    param.name
                );
                return Err(self.error(SemanticCode::TypeArgumentConstraint, written, detail));
            }
        }
        Ok(())
    }

    /// Parameters with a default may be left out. A trailing rest
    /// parameter takes any number of arguments of its element type.
    fn check_args(
        &self,
        signature: &CalleeSignature,
        type_args: &[Type],
        callee: &str,
        call: &CallExpr,
    ) -> Result<()> {
        let params = &signature.params;
        let rest = params.last().filter(|param| param.is_rest);
        let fixed = params.len() - usize::from(rest.is_some());
        let required = params
            .iter()
            .filter(|param| !param.has_default && !param.is_rest)
            .count();
        let given = call.args.len();
        if given < required || (rest.is_none() && given > fixed) {
            let expected = match (rest, required == fixed) {
                (Some(_), _) => format!("at least {required}"),
                (None, true) => required.to_string(),
                (None, false) => format!("{required} to {fixed}"),
            };
            let detail = format!("`{callee}` takes {expected} arguments, found {given}");
            return Err(self.error(SemanticCode::ArgumentCountMismatch, call, detail));
        }

        let bindings = signature.bindings(type_args);
        let mut inference = Inference::new(self.scopes);
        for (index, arg) in call.args.iter().enumerate() {
            let Some(param) = params.get(index).filter(|param| !param.is_rest).or(rest) else {
                continue;
            };
            let Some(declared) = &param.ty else {
                continue;
            };
            let expected = match param.is_rest {
                true => declared.element().unwrap_or(declared),
                false => declared,
            }
            .substitute(&bindings);
            let (fits, types) = inference.is_assignable(self.scope, arg, &expected);
            if !fits {
                let detail = format!(
                    "argument `{}` of `{callee}` takes `{expected}`, found {}",
                    param.name,
                    describe(&types)
                );
                return Err(self.error(SemanticCode::TypeMismatch, arg, detail));
            }
        }
        Ok(())
    }

    /// Unknown callees and members are let through: inference had too
    /// little to go on, which is not an error by itself.
    fn resolve_failure(&self, err: ResolveError, at: &dyn AstNode) -> Result<()> {
        let (code, detail) = match err {
            ResolveError::Unknown => return Ok(()),
            ResolveError::Undefined(name) => (SemanticCode::UndefinedIdentifier, name),
            ResolveError::UndefinedMember { owner, member } => (
                SemanticCode::UndefinedMember,
                format!("`{owner}` has no member `{member}`"),
            ),
            ResolveError::NotCallable(what) => (SemanticCode::NotCallable, what),
        };
        Err(self.error(code, at, detail))
    }
}

fn callee_name(callee: &Expr) -> String {
    match callee {
        Expr::Name(name) => name.name.clone(),
        Expr::Member(member) => member.member.name.clone(),
        _ => "expression".to_owned(),
    }
}
