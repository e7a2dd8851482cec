//! Statement rules: returns, prints, assignments, conditions and loops.

use crate::Result;
use crate::ast::{AssignStmt, ElseBranch, Expr, IfStmt, PrintStmt, ReturnStmt};
use crate::diagnostics::SemanticCode;

use super::super::infer::{Inference, MemberTarget};
use super::super::symbols::SymbolKind;
use super::super::types::Type;
use super::{Validator, describe};

impl Validator<'_> {
    /// Returned values must match the function's return types in number
    /// and type. Without declared return types, those are the types
    /// inferred from the function's first `return`.
    pub(super) fn check_return(&self, stmt: &ReturnStmt) -> Result<()> {
        let Some(frame) = self.functions.last() else {
            return Ok(());
        };
        if !frame.declared_returns && frame.return_types.is_empty() && !stmt.values.is_empty() {
            let detail = format!("return types of `{}` cannot be inferred", frame.name);
            return Err(self.error(SemanticCode::AmbiguousType, stmt, detail));
        }
        if stmt.values.len() != frame.return_types.len() {
            let detail = format!(
                "`{}` returns {} values, found {}",
                frame.name,
                frame.return_types.len(),
                stmt.values.len()
            );
            return Err(self.error(SemanticCode::ReturnCountMismatch, stmt, detail));
        }
        let mut inference = Inference::new(self.scopes);
        for (value, expected) in stmt.values.iter().zip(&frame.return_types) {
            let (fits, types) = inference.is_assignable(self.scope, value, expected);
            if !fits {
                let detail = format!(
                    "`{}` returns `{expected}`, found {}",
                    frame.name,
                    describe(&types)
                );
                return Err(self.error(SemanticCode::TypeMismatch, value, detail));
            }
        }
        Ok(())
    }

    pub(super) fn check_print(&self, stmt: &PrintStmt) -> Result<()> {
        let mut inference = Inference::new(self.scopes);
        for value in &stmt.values {
            let (fits, types) = inference.is_assignable(self.scope, value, &Type::String);
            if !fits {
                let detail = format!("`print` takes `string`, found {}", describe(&types));
                return Err(self.error(SemanticCode::TypeMismatch, value, detail));
            }
        }
        Ok(())
    }

    /// Conditions of an `if` and all of its `else if`s.
    pub(super) fn check_conditions(&self, stmt: &IfStmt) -> Result<()> {
        let mut current = stmt;
        loop {
            self.check_condition(&current.condition)?;
            match &current.else_branch {
                Some(ElseBranch::If(nested)) => current = &**nested,
                Some(ElseBranch::Block(_)) | None => return Ok(()),
            }
        }
    }

    pub(super) fn check_condition(&self, condition: &Expr) -> Result<()> {
        let (fits, types) =
            Inference::new(self.scopes).is_assignable(self.scope, condition, &Type::Bool);
        match fits {
            true => Ok(()),
            false => Err(self.error(SemanticCode::ConditionNotBool, condition, describe(&types))),
        }
    }

    /// Only arrays can be iterated.
    pub(super) fn check_iterable(&self, iterable: &Expr) -> Result<()> {
        let types = Inference::new(self.scopes).infer(self.scope, iterable);
        if !types.is_empty() && types.iter().all(|ty| ty.element().is_some()) {
            return Ok(());
        }
        Err(self.error(SemanticCode::NotIterable, iterable, describe(&types)))
    }

    /// The target must be reassignable and the value must fit its type.
    pub(super) fn check_assign(&self, stmt: &AssignStmt) -> Result<()> {
        let mut inference = Inference::new(self.scopes);
        let immutable = match &stmt.target {
            Expr::Name(name) => {
                let resolved = self
                    .scopes
                    .resolve_from(self.scope, &name.name, SymbolKind::ANY);
                match resolved {
                    Some((_, symbol)) => (!symbol.is_mutable()).then(|| name.name.clone()),
                    None => {
                        return Err(self.error(
                            SemanticCode::UndefinedIdentifier,
                            &stmt.target,
                            &name.name,
                        ));
                    }
                }
            }
            Expr::Member(member) => match inference.member_target(self.scope, member) {
                Ok(MemberTarget::Symbol { symbol, .. }) if !symbol.is_mutable() => {
                    Some(member.member.name.clone())
                }
                _ => None,
            },
            _ => None,
        };
        if let Some(name) = immutable {
            return Err(self.error(SemanticCode::ImmutableAssignment, &stmt.target, name));
        }

        let target_types = inference.infer(self.scope, &stmt.target);
        let Some(expected) = target_types.only() else {
            return Ok(());
        };
        let (fits, types) = inference.is_assignable(self.scope, &stmt.value, expected);
        if fits {
            return Ok(());
        }
        let detail = format!("cannot assign {} to a `{expected}`", describe(&types));
        Err(self.error(SemanticCode::TypeMismatch, &stmt.value, detail))
    }
}
