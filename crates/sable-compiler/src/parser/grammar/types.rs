//! Type expressions.

use crate::diagnostics::SyntaxCode;
use crate::parser::core::Parser;
use crate::parser::cst::{SyntaxKind, kind_sets};

impl Parser<'_> {
    pub(super) fn type_or_error(&mut self) {
        if self.currently_is_one_of(kind_sets::TYPE_FIRST) {
            self.type_expr();
        } else {
            let found = self.found();
            self.error_msg(SyntaxCode::ExpectedType, found);
        }
    }

    /// Base type followed by any number of `[]` suffixes.
    pub(super) fn type_expr(&mut self) {
        if !self.enter_recursion() {
            return;
        }
        let checkpoint = self.checkpoint();
        match self.current() {
            SyntaxKind::PrimitiveName => self.single_token_type(SyntaxKind::PrimitiveType),
            SyntaxKind::NumberName => self.single_token_type(SyntaxKind::NumberType),
            SyntaxKind::Id if self.next_is(SyntaxKind::TypeArgsOpen) => {
                self.start_node(SyntaxKind::InstanceType);
                self.bump();
                self.type_arg_list();
                self.finish_node();
            }
            SyntaxKind::Id => self.single_token_type(SyntaxKind::NamedType),
            SyntaxKind::KwF => self.function_type(),
            _ => {
                let found = self.found();
                self.error_msg(SyntaxCode::ExpectedType, found);
                self.exit_recursion();
                return;
            }
        }
        while self.currently_is(SyntaxKind::BracketOpen) && self.next_is(SyntaxKind::BracketClose)
        {
            self.start_node_at(checkpoint, SyntaxKind::ArrayType);
            self.bump();
            self.bump();
            self.finish_node();
        }
        self.exit_recursion();
    }

    fn single_token_type(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        self.finish_node();
    }

    /// `f(types) -> type`
    fn function_type(&mut self) {
        self.start_node(SyntaxKind::FunctionType);
        self.bump();
        self.delimited(
            SyntaxKind::TypeList,
            SyntaxKind::ParenOpen,
            SyntaxKind::ParenClose,
            kind_sets::TYPE_FIRST,
            Self::type_expr,
        );
        if self.currently_is(SyntaxKind::Arrow) {
            self.return_types(false);
        }
        self.finish_node();
    }

    /// `<| type (, type)* |>`
    pub(super) fn type_arg_list(&mut self) {
        self.delimited(
            SyntaxKind::TypeArgList,
            SyntaxKind::TypeArgsOpen,
            SyntaxKind::TypeArgsClose,
            kind_sets::TYPE_FIRST,
            Self::type_expr,
        );
    }
}
