//! Statements and blocks.

use crate::parser::core::Parser;
use crate::parser::cst::{SyntaxKind, kind_sets};

impl Parser<'_> {
    /// `{ statement* }`. Reports a missing `{` and leaves an empty block.
    pub(super) fn block(&mut self) {
        self.start_node(SyntaxKind::Block);
        if self.expect(SyntaxKind::BraceOpen) {
            while !self.should_stop() && !self.currently_is(SyntaxKind::BraceClose) {
                self.statement();
            }
            self.expect(SyntaxKind::BraceClose);
        }
        self.finish_node();
    }

    fn statement(&mut self) {
        if !self.enter_recursion() {
            return;
        }
        match self.current() {
            SyntaxKind::KwConst | SyntaxKind::KwLet => self.variable_decl(),
            SyntaxKind::KwF if self.next_is(SyntaxKind::Id) => self.function_decl(),
            SyntaxKind::BraceOpen => self.block(),
            SyntaxKind::KwIf => self.if_stmt(),
            SyntaxKind::KwFor => self.for_stmt(),
            SyntaxKind::KwLoop => self.loop_stmt(),
            SyntaxKind::KwReturn => self.return_stmt(),
            SyntaxKind::KwPrint => self.print_stmt(),
            SyntaxKind::KwWhen => self.when_stmt(),
            SyntaxKind::KwBreak => self.keyword_stmt(SyntaxKind::BreakStmt),
            SyntaxKind::KwContinue => self.keyword_stmt(SyntaxKind::ContinueStmt),
            SyntaxKind::Semicolon => self.error_and_bump("a statement"),
            kind if kind_sets::EXPR_FIRST.contains(kind) => self.expr_or_assign_stmt(),
            _ => {
                self.error_recover("a statement", kind_sets::STATEMENT_RECOVERY);
                self.eat_token(SyntaxKind::Semicolon);
            }
        }
        self.exit_recursion();
    }

    fn if_stmt(&mut self) {
        self.start_node(SyntaxKind::IfStmt);
        self.bump();
        self.expr_or_error();
        self.block();
        if self.currently_is(SyntaxKind::KwElse) {
            self.start_node(SyntaxKind::ElseClause);
            self.bump();
            if self.currently_is(SyntaxKind::KwIf) {
                self.if_stmt();
            } else {
                self.block();
            }
            self.finish_node();
        }
        self.finish_node();
    }

    /// `for name in expr { ... }`
    fn for_stmt(&mut self) {
        self.start_node(SyntaxKind::ForStmt);
        self.bump();
        self.expect_id("loop variable");
        self.expect(SyntaxKind::KwIn);
        self.expr_or_error();
        self.block();
        self.finish_node();
    }

    fn loop_stmt(&mut self) {
        self.start_node(SyntaxKind::LoopStmt);
        self.bump();
        self.block();
        self.finish_node();
    }

    fn return_stmt(&mut self) {
        self.start_node(SyntaxKind::ReturnStmt);
        self.bump();
        if self.currently_is_one_of(kind_sets::EXPR_FIRST) {
            self.expr_list();
        }
        self.expect(SyntaxKind::Semicolon);
        self.finish_node();
    }

    fn print_stmt(&mut self) {
        self.start_node(SyntaxKind::PrintStmt);
        self.bump();
        self.expr_list();
        self.expect(SyntaxKind::Semicolon);
        self.finish_node();
    }

    /// `when expr { v1, v2 => { ... } else => { ... } }`
    fn when_stmt(&mut self) {
        self.start_node(SyntaxKind::WhenStmt);
        self.bump();
        self.expr_or_error();
        self.start_node(SyntaxKind::WhenBody);
        if self.expect(SyntaxKind::BraceOpen) {
            while !self.should_stop() && !self.currently_is(SyntaxKind::BraceClose) {
                if self.currently_is(SyntaxKind::KwElse)
                    || self.currently_is_one_of(kind_sets::EXPR_FIRST)
                {
                    self.when_case();
                } else {
                    self.error_and_bump("a `when` case");
                }
            }
            self.expect(SyntaxKind::BraceClose);
        }
        self.finish_node();
        self.finish_node();
    }

    fn when_case(&mut self) {
        self.start_node(SyntaxKind::WhenCase);
        if !self.eat_token(SyntaxKind::KwElse) {
            self.expr_list();
        }
        self.expect(SyntaxKind::FatArrow);
        self.block();
        self.finish_node();
    }

    fn keyword_stmt(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        self.expect(SyntaxKind::Semicolon);
        self.finish_node();
    }

    /// `expr;` or `target = value;`
    fn expr_or_assign_stmt(&mut self) {
        let checkpoint = self.checkpoint();
        self.expr();
        if self.currently_is(SyntaxKind::Equals) {
            self.start_node_at(checkpoint, SyntaxKind::AssignStmt);
            self.bump();
            self.expr_or_error();
        } else {
            self.start_node_at(checkpoint, SyntaxKind::ExprStmt);
        }
        self.expect(SyntaxKind::Semicolon);
        self.finish_node();
    }

    /// `expr (, expr)*`
    pub(super) fn expr_list(&mut self) {
        self.start_node(SyntaxKind::ExprList);
        self.expr_or_error();
        while self.eat_token(SyntaxKind::Comma) {
            self.expr_or_error();
        }
        self.finish_node();
    }
}
