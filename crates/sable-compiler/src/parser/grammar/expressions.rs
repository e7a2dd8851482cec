//! Expressions: ternary, binary (precedence climbing), unary, postfix, primaries.

use crate::diagnostics::SyntaxCode;
use crate::parser::core::Parser;
use crate::parser::cst::{KindSet, SyntaxKind, kind_sets};

/// Left binding power of a binary operator. Higher binds tighter.
fn binding_power(kind: SyntaxKind) -> Option<u8> {
    use SyntaxKind::*;
    let bp = match kind {
        OrOr => 1,
        AndAnd => 2,
        EqEq | NotEq => 3,
        Lt | LtEq | Gt | GtEq => 4,
        Plus | Minus => 5,
        Star | Slash | Percent => 6,
        Exp => 7,
        _ => return None,
    };
    Some(bp)
}

impl Parser<'_> {
    pub(super) fn expr_or_error(&mut self) {
        if self.currently_is_one_of(kind_sets::EXPR_FIRST) {
            self.expr();
        } else {
            let found = self.found();
            self.error_msg(SyntaxCode::ExpectedExpression, found);
        }
    }

    /// `binary (? expr : expr)?`
    pub(super) fn expr(&mut self) {
        if !self.enter_recursion() {
            return;
        }
        let checkpoint = self.checkpoint();
        self.binary(0);
        if self.currently_is(SyntaxKind::Question) {
            self.start_node_at(checkpoint, SyntaxKind::TernaryExpr);
            self.bump();
            self.expr_or_error();
            self.expect(SyntaxKind::Colon);
            self.expr_or_error();
            self.finish_node();
        }
        self.exit_recursion();
    }

    /// Left-associative precedence climbing.
    fn binary(&mut self, min_bp: u8) {
        let checkpoint = self.checkpoint();
        self.unary();
        loop {
            let op = self.current();
            let Some(bp) = binding_power(op) else {
                break;
            };
            if bp < min_bp || self.should_stop() {
                break;
            }
            self.start_node_at(checkpoint, SyntaxKind::BinaryExpr);
            self.bump();
            if self.currently_is_one_of(kind_sets::EXPR_FIRST) {
                self.binary(bp + 1);
            } else {
                let found = self.found();
                self.error_msg(SyntaxCode::ExpectedExpression, found);
            }
            self.finish_node();
        }
    }

    fn unary(&mut self) {
        if !self.currently_is_one_of(kind_sets::UNARY_OPS) {
            self.postfix();
            return;
        }
        if !self.enter_recursion() {
            return;
        }
        self.start_node(SyntaxKind::UnaryExpr);
        self.bump();
        if self.currently_is_one_of(kind_sets::EXPR_FIRST) {
            self.unary();
        } else {
            let found = self.found();
            self.error_msg(SyntaxCode::ExpectedExpression, found);
        }
        self.finish_node();
        self.exit_recursion();
    }

    /// Calls `f(..)`, generic calls `f<|T|>(..)`, members `a.b`, indexing `a[i]`.
    fn postfix(&mut self) {
        let checkpoint = self.checkpoint();
        self.primary();
        while !self.should_stop() {
            match self.current() {
                SyntaxKind::ParenOpen => {
                    self.start_node_at(checkpoint, SyntaxKind::CallExpr);
                    self.arg_list();
                    self.finish_node();
                }
                SyntaxKind::TypeArgsOpen => {
                    self.start_node_at(checkpoint, SyntaxKind::CallExpr);
                    self.type_arg_list();
                    self.arg_list();
                    self.finish_node();
                }
                SyntaxKind::Dot => {
                    self.start_node_at(checkpoint, SyntaxKind::MemberExpr);
                    self.bump();
                    self.expect_id("member name");
                    self.finish_node();
                }
                SyntaxKind::BracketOpen => {
                    self.start_node_at(checkpoint, SyntaxKind::IndexExpr);
                    self.bump();
                    self.expr_or_error();
                    self.expect(SyntaxKind::BracketClose);
                    self.finish_node();
                }
                _ => break,
            }
        }
    }

    fn arg_list(&mut self) {
        self.delimited(
            SyntaxKind::ArgList,
            SyntaxKind::ParenOpen,
            SyntaxKind::ParenClose,
            kind_sets::EXPR_FIRST,
            Self::expr,
        );
    }

    fn primary(&mut self) {
        match self.current() {
            kind if kind_sets::LITERAL_TOKENS.contains(kind) => {
                self.start_node(SyntaxKind::Literal);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::Id => {
                self.start_node(SyntaxKind::NameRef);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::ParenOpen => self.paren_or_tuple(),
            SyntaxKind::BracketOpen => self.delimited(
                SyntaxKind::ArrayExpr,
                SyntaxKind::BracketOpen,
                SyntaxKind::BracketClose,
                kind_sets::EXPR_FIRST,
                Self::expr,
            ),
            SyntaxKind::BraceOpen => self.delimited(
                SyntaxKind::ObjectExpr,
                SyntaxKind::BraceOpen,
                SyntaxKind::BraceClose,
                KindSet::single(SyntaxKind::Id),
                Self::object_field,
            ),
            SyntaxKind::KwF => self.anon_function(),
            _ => {
                let found = self.found();
                self.error_msg(SyntaxCode::ExpectedExpression, found);
            }
        }
    }

    /// `(expr)` or `(a, b, ...)`. The node kind is decided once the first comma is seen.
    fn paren_or_tuple(&mut self) {
        let checkpoint = self.checkpoint();
        self.bump();
        self.expr_or_error();
        let mut kind = SyntaxKind::ParenExpr;
        while self.eat_token(SyntaxKind::Comma) {
            kind = SyntaxKind::TupleExpr;
            if self.currently_is(SyntaxKind::ParenClose) {
                break;
            }
            self.expr_or_error();
        }
        self.expect(SyntaxKind::ParenClose);
        self.start_node_at(checkpoint, kind);
        self.finish_node();
    }

    /// `key: value`
    fn object_field(&mut self) {
        self.start_node(SyntaxKind::ObjectField);
        self.bump();
        self.expect(SyntaxKind::Colon);
        self.expr_or_error();
        self.finish_node();
    }
}
