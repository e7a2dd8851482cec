//! Parameters and variable declarations.
//!
//! Both bind names that need a known type: either written down, or inferred
//! from the default or initial value as exactly one candidate. A written
//! type and a value together must agree.

use std::collections::HashSet;

use crate::Result;
use crate::ast::{AstNode, Expr, Parameter, TypeExpr, VariableDecl};
use crate::diagnostics::SemanticCode;

use super::super::infer::Inference;
use super::super::symbols::VariableValue;
use super::super::types::{Type, TypeSet};
use super::{Validator, describe};

impl Validator<'_> {
    pub(super) fn check_params(&self, params: &[Parameter]) -> Result<()> {
        let last = params.len().saturating_sub(1);
        let mut seen = HashSet::new();
        for (index, param) in params.iter().enumerate() {
            let name = &param.name.name;
            if param.is_rest && index != last {
                return Err(self.error(SemanticCode::RestParameterNotLast, param, name));
            }
            if !seen.insert(name.as_str()) {
                return Err(self.error(SemanticCode::DuplicateParameter, param, name));
            }
            let default = param
                .default
                .as_ref()
                .map(|value| Inference::new(self.scopes).infer(self.scope, value));
            self.check_binding(name, param.type_annotation.as_ref(), default, param)?;
        }
        Ok(())
    }

    pub(super) fn check_variable_decl(&self, decl: &VariableDecl) -> Result<()> {
        let targets = decl.targets.len();
        match decl.values.as_slice() {
            [] => {}
            [source] if targets > 1 => self.check_destructuring(source, targets, decl)?,
            values if values.len() != targets => {
                let detail = format!("{targets} targets but {} values", values.len());
                return Err(self.error(SemanticCode::TargetCountMismatch, decl, detail));
            }
            _ => {}
        }
        let mut inference = Inference::new(self.scopes);
        for (index, target) in decl.targets.iter().enumerate() {
            let types = VariableValue::for_target(&decl.values, targets, index)
                .map(|value| inference.value_types(self.scope, &value));
            self.check_binding(
                &target.name.name,
                target.type_annotation.as_ref(),
                types,
                target,
            )?;
        }
        Ok(())
    }

    /// `const a, b = source;` needs a source with one value per target: a
    /// call returning that many types, or a tuple of that length. A call
    /// whose callee cannot be resolved is left to the per-target checks.
    fn check_destructuring(
        &self,
        source: &Expr,
        targets: usize,
        decl: &VariableDecl,
    ) -> Result<()> {
        let mut inference = Inference::new(self.scopes);
        let produced = match source {
            Expr::Call(call) => match inference.call_returns(self.scope, call) {
                Some(returns) => returns.len(),
                None => return Ok(()),
            },
            other => match inference.infer(self.scope, other).only() {
                Some(Type::Tuple(items)) => items.len(),
                _ => 1,
            },
        };
        if produced == targets {
            return Ok(());
        }
        let detail = format!("{targets} targets but the value produces {produced}");
        Err(self.error(SemanticCode::TargetCountMismatch, decl, detail))
    }

    /// A binding named `name` with an optional written type and the
    /// candidate types of its value, if it has one.
    fn check_binding(
        &self,
        name: &str,
        declared: Option<&TypeExpr>,
        value: Option<TypeSet>,
        at: &dyn AstNode,
    ) -> Result<()> {
        match (declared, value) {
            (None, None) => Err(self.error(SemanticCode::MissingTypeAnnotation, at, name)),
            (Some(declared), Some(types)) => {
                let declared = Type::from_expr(declared);
                if types.is_assignable_to(&declared) {
                    return Ok(());
                }
                let detail = format!(
                    "`{name}` is declared as `{declared}` but its value has {}",
                    describe(&types)
                );
                Err(self.error(SemanticCode::TypeMismatch, at, detail))
            }
            (None, Some(types)) if types.len() != 1 => {
                let detail = format!(
                    "type of `{name}` cannot be inferred, its value has {}",
                    describe(&types)
                );
                Err(self.error(SemanticCode::AmbiguousType, at, detail))
            }
            (Some(_), None) | (None, Some(_)) => Ok(()),
        }
    }
}
