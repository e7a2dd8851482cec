//! The entry point: one top-level `f main()` taking and returning nothing.

use crate::ast::{Program, render_type_expr};
use crate::diagnostics::{Diagnostic, SemanticCode};
use crate::{Error, Result};

use super::Validator;

impl Validator<'_> {
    pub(super) fn check_main(&self, program: &Program) -> Result<()> {
        let Some(main) = program.main() else {
            return Err(Error::Semantic(Diagnostic::new(
                SemanticCode::MainFunctionNotFound,
            )));
        };
        let signature = &main.signature;
        if !signature.type_params.is_empty() {
            let names: Vec<&str> = signature
                .type_params
                .iter()
                .map(|param| param.name.name.as_str())
                .collect();
            return Err(self.error(
                SemanticCode::MainTypeParametersNotExpected,
                main,
                names.join(", "),
            ));
        }
        if !signature.params.is_empty() {
            let names: Vec<&str> = signature
                .params
                .iter()
                .map(|param| param.name.name.as_str())
                .collect();
            return Err(self.error(
                SemanticCode::MainParametersNotExpected,
                main,
                names.join(", "),
            ));
        }
        if !signature.return_types.is_empty() {
            let types: Vec<String> = match signature.has_declared_returns() {
                true => signature.declared_returns.iter().map(render_type_expr).collect(),
                false => signature.return_types.iter().map(ToString::to_string).collect(),
            };
            return Err(self.error(
                SemanticCode::MainReturnTypesNotExpected,
                main,
                types.join(", "),
            ));
        }
        Ok(())
    }
}
