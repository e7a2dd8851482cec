//! Semantic validation.
//!
//! Runs after the AST and scope tree are complete, so every name declared
//! anywhere in a scope is visible to the checks. The validator walks the AST
//! with its own cursor into the scope tree, entering the scope each
//! function, type declaration and block was built in. The first violation
//! stops the walk.
//!
//! Rules by file:
//! - `entry` - the `main` function gate
//! - `bindings` - parameters and variable declarations
//! - `statements` - returns, prints, assignments, conditions, loops
//! - `names` - name and member resolution, calls

mod bindings;
mod entry;
mod names;
mod statements;

#[cfg(test)]
mod validate_tests;

use tracing::debug;

use sable_core::LineIndex;

use crate::ast::{
    AnonFunction, AstNode, Block, ClassDecl, EnumDecl, Expr, FunctionDecl, InterfaceDecl, Program,
    Signature, Statement, VariableDecl, Visitor, walk_anon_function, walk_block, walk_class_decl,
    walk_enum_decl, walk_expr, walk_function_decl, walk_interface_decl, walk_signature,
    walk_statement, walk_variable_decl,
};
use crate::diagnostics::{Diagnostic, SemanticCode, SymbolCode};
use crate::{Error, Result};

use super::scope::{ScopeId, ScopeTree};
use super::types::{Type, TypeSet};

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidateOptions {
    /// Skip the `main` function requirement.
    pub snippet: bool,
}

/// Checks whole-program rules over a built program.
pub fn validate(
    program: &Program,
    scopes: &ScopeTree,
    options: &ValidateOptions,
    source: &str,
) -> Result<()> {
    let mut validator = Validator::new(scopes, source);
    if !options.snippet {
        validator.check_main(program)?;
    }
    validator.visit_program(program);
    match validator.error {
        Some(err) => {
            debug!(code = err.code().unwrap_or("-"), "validation aborted");
            Err(err)
        }
        None => {
            debug!(snippet = options.snippet, "validated program");
            Ok(())
        }
    }
}

/// The function whose body is being walked.
struct FunctionFrame {
    name: String,
    declared_returns: bool,
    return_types: Vec<Type>,
}

struct Validator<'t> {
    scopes: &'t ScopeTree,
    source: &'t str,
    lines: LineIndex,
    scope: ScopeId,
    functions: Vec<FunctionFrame>,
    error: Option<Error>,
}

impl<'t> Validator<'t> {
    fn new(scopes: &'t ScopeTree, source: &'t str) -> Self {
        Self {
            scopes,
            source,
            lines: LineIndex::new(source),
            scope: ScopeId::ROOT,
            functions: Vec::new(),
            error: None,
        }
    }

    /// Runs `check` unless an earlier check already failed.
    fn check(&mut self, check: impl FnOnce(&mut Self) -> Result<()>) {
        if self.error.is_none()
            && let Err(err) = check(self)
        {
            self.error = Some(err);
        }
    }

    /// Walks `body` inside the child scope `name`, then restores the cursor.
    fn in_scope(&mut self, name: &str, at: &dyn AstNode, body: impl FnOnce(&mut Self)) {
        if self.error.is_some() {
            return;
        }
        let Some(child) = self.scopes.child(self.scope, name) else {
            let diagnostic = Diagnostic::new(SymbolCode::ScopeNotFound)
                .detail(name)
                .at_ast(at.kind(), at.meta().id, at.meta().pos)
                .with_source(self.source, &self.lines);
            self.error = Some(Error::Symbol(diagnostic));
            return;
        };
        let outer = self.scope;
        self.scope = child;
        body(self);
        self.scope = outer;
    }

    fn in_function(&mut self, frame: FunctionFrame, body: impl FnOnce(&mut Self)) {
        self.functions.push(frame);
        body(self);
        self.functions.pop();
    }

    fn error(&self, code: SemanticCode, at: &dyn AstNode, detail: impl AsRef<str>) -> Error {
        let meta = at.meta();
        Error::Semantic(
            Diagnostic::new(code)
                .detail(detail)
                .at_ast(at.kind(), meta.id, meta.pos)
                .with_source(self.source, &self.lines),
        )
    }
}

impl FunctionFrame {
    fn new(name: impl Into<String>, signature: &Signature) -> Self {
        Self {
            name: name.into(),
            declared_returns: signature.has_declared_returns(),
            return_types: signature.return_types.clone(),
        }
    }
}

/// Candidate types as they read in messages.
fn describe(types: &TypeSet) -> String {
    match types.only() {
        Some(ty) => format!("`{ty}`"),
        None if types.is_empty() => "an unknown type".to_owned(),
        None => format!("one of {types}"),
    }
}

impl Visitor for Validator<'_> {
    fn visit_function_decl(&mut self, func: &FunctionDecl) {
        self.in_scope(&func.scope, func, |v| {
            let frame = FunctionFrame::new(&func.name.name, &func.signature);
            v.in_function(frame, |v| walk_function_decl(v, func));
        });
    }

    fn visit_anon_function(&mut self, func: &AnonFunction) {
        self.in_scope(&func.scope, func, |v| {
            let frame = FunctionFrame::new("anonymous function", &func.signature);
            v.in_function(frame, |v| walk_anon_function(v, func));
        });
    }

    /// Names in default values are checked before the parameter rules.
    fn visit_signature(&mut self, sig: &Signature) {
        walk_signature(self, sig);
        self.check(|v| v.check_params(&sig.params));
    }

    fn visit_class_decl(&mut self, class: &ClassDecl) {
        self.in_scope(&class.name.name, class, |v| walk_class_decl(v, class));
    }

    fn visit_enum_decl(&mut self, decl: &EnumDecl) {
        self.in_scope(&decl.name.name, decl, |v| walk_enum_decl(v, decl));
    }

    fn visit_interface_decl(&mut self, decl: &InterfaceDecl) {
        self.in_scope(&decl.name.name, decl, |v| walk_interface_decl(v, decl));
    }

    /// Names in the values are checked before the binding rules.
    fn visit_variable_decl(&mut self, decl: &VariableDecl) {
        walk_variable_decl(self, decl);
        self.check(|v| v.check_variable_decl(decl));
    }

    /// Bodies share the scope of their function or loop; other blocks
    /// have their own.
    fn visit_block(&mut self, block: &Block) {
        if self.scopes.scope(self.scope).name == block.scope {
            walk_block(self, block);
        } else {
            self.in_scope(&block.scope, block, |v| walk_block(v, block));
        }
    }

    fn visit_statement(&mut self, stmt: &Statement) {
        if self.error.is_some() {
            return;
        }
        match stmt {
            Statement::For(for_stmt) => {
                self.in_scope(&for_stmt.body.scope, for_stmt, |v| {
                    v.check(|v| v.check_iterable(&for_stmt.iterable));
                    walk_statement(v, stmt);
                });
                return;
            }
            Statement::If(if_stmt) => self.check(|v| v.check_conditions(if_stmt)),
            Statement::Return(ret) => self.check(|v| v.check_return(ret)),
            Statement::Print(print) => self.check(|v| v.check_print(print)),
            Statement::Assign(assign) => self.check(|v| v.check_assign(assign)),
            _ => {}
        }
        walk_statement(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        if self.error.is_some() {
            return;
        }
        match expr {
            Expr::Name(name) => self.check(|v| v.check_name(name)),
            Expr::Member(member) => {
                self.check(|v| v.check_member(member));
                // A bare type name as the object was resolved with the member.
                let names_type =
                    matches!(&member.object, Expr::Name(name) if self.is_type_name(&name.name));
                if !names_type {
                    self.visit_expr(&member.object);
                }
                return;
            }
            Expr::Call(call) => self.check(|v| v.check_call(call)),
            Expr::Ternary(ternary) => self.check(|v| v.check_condition(&ternary.condition)),
            _ => {}
        }
        walk_expr(self, expr);
    }
}

