//! Declarations: functions, classes, enums, interfaces and variables.

use crate::parser::core::Parser;
use crate::parser::cst::{KindSet, SyntaxKind, kind_sets};

impl Parser<'_> {
    pub(super) fn declaration(&mut self) {
        match self.current() {
            SyntaxKind::KwF => self.function_decl(),
            SyntaxKind::KwClass => self.class_decl(),
            SyntaxKind::KwEnum => self.enum_decl(),
            SyntaxKind::KwInterface => self.interface_decl(),
            SyntaxKind::KwConst | SyntaxKind::KwLet => self.variable_decl(),
            _ => self.error_recover("a declaration", kind_sets::ROOT_RECOVERY),
        }
    }

    /// `f name <|T|>? (params)? -> types? { ... }`
    pub(super) fn function_decl(&mut self) {
        self.start_node(SyntaxKind::FunctionDecl);
        self.bump_expected(SyntaxKind::KwF);
        self.expect_id("function name");
        self.function_signature_and_body();
        self.finish_node();
    }

    /// `f <|T|>? (params)? -> types? { ... }` as an expression.
    pub(super) fn anon_function(&mut self) {
        self.start_node(SyntaxKind::AnonFunction);
        self.bump_expected(SyntaxKind::KwF);
        self.function_signature_and_body();
        self.finish_node();
    }

    fn function_signature_and_body(&mut self) {
        if self.currently_is(SyntaxKind::TypeArgsOpen) {
            self.type_param_list();
        }
        if self.currently_is(SyntaxKind::ParenOpen) {
            self.param_list();
        }
        if self.currently_is(SyntaxKind::Arrow) {
            self.return_types(true);
        }
        self.block();
    }

    fn type_param_list(&mut self) {
        self.delimited(
            SyntaxKind::TypeParamList,
            SyntaxKind::TypeArgsOpen,
            SyntaxKind::TypeArgsClose,
            KindSet::single(SyntaxKind::Id),
            Self::type_param,
        );
    }

    fn type_param(&mut self) {
        self.start_node(SyntaxKind::TypeParam);
        self.bump();
        if self.eat_token(SyntaxKind::Colon) {
            self.type_or_error();
        }
        self.finish_node();
    }

    fn param_list(&mut self) {
        self.delimited(
            SyntaxKind::ParamList,
            SyntaxKind::ParenOpen,
            SyntaxKind::ParenClose,
            KindSet::new(&[SyntaxKind::Ellipsis, SyntaxKind::Id]),
            Self::param,
        );
    }

    /// `...? name (: type)? (= default)?`
    fn param(&mut self) {
        self.start_node(SyntaxKind::Param);
        self.eat_token(SyntaxKind::Ellipsis);
        self.expect_id("parameter name");
        if self.eat_token(SyntaxKind::Colon) {
            self.type_or_error();
        }
        if self.eat_token(SyntaxKind::Equals) {
            self.expr_or_error();
        }
        self.finish_node();
    }

    /// `-> type (, type)*`. Function types take a single return type so a
    /// following `,` stays with the enclosing list.
    pub(super) fn return_types(&mut self, multiple: bool) {
        self.start_node(SyntaxKind::ReturnTypes);
        self.bump_expected(SyntaxKind::Arrow);
        self.type_or_error();
        while multiple && self.eat_token(SyntaxKind::Comma) {
            self.type_or_error();
        }
        self.finish_node();
    }

    fn class_decl(&mut self) {
        self.start_node(SyntaxKind::ClassDecl);
        self.bump();
        self.expect_id("class name");
        if self.currently_is(SyntaxKind::TypeArgsOpen) {
            self.type_param_list();
        }
        self.start_node(SyntaxKind::ClassBody);
        if self.expect(SyntaxKind::BraceOpen) {
            while !self.should_stop() && !self.currently_is(SyntaxKind::BraceClose) {
                match self.current() {
                    SyntaxKind::KwF => self.function_decl(),
                    SyntaxKind::KwConst | SyntaxKind::KwLet => self.variable_decl(),
                    _ => self.error_and_bump("a field or method"),
                }
            }
            self.expect(SyntaxKind::BraceClose);
        }
        self.finish_node();
        self.finish_node();
    }

    fn enum_decl(&mut self) {
        self.start_node(SyntaxKind::EnumDecl);
        self.bump();
        self.expect_id("enum name");
        self.delimited(
            SyntaxKind::EnumBody,
            SyntaxKind::BraceOpen,
            SyntaxKind::BraceClose,
            KindSet::single(SyntaxKind::Id),
            Self::enum_member,
        );
        self.finish_node();
    }

    fn enum_member(&mut self) {
        self.start_node(SyntaxKind::EnumMember);
        self.bump();
        if self.eat_token(SyntaxKind::Equals) {
            self.expr_or_error();
        }
        self.finish_node();
    }

    fn interface_decl(&mut self) {
        self.start_node(SyntaxKind::InterfaceDecl);
        self.bump();
        self.expect_id("interface name");
        if self.currently_is(SyntaxKind::TypeArgsOpen) {
            self.type_param_list();
        }
        self.start_node(SyntaxKind::InterfaceBody);
        if self.expect(SyntaxKind::BraceOpen) {
            while !self.should_stop() && !self.currently_is(SyntaxKind::BraceClose) {
                if self.currently_is(SyntaxKind::Id) {
                    self.interface_member();
                } else {
                    self.error_and_bump("an interface member");
                }
            }
            self.expect(SyntaxKind::BraceClose);
        }
        self.finish_node();
        self.finish_node();
    }

    /// `name: type;`
    fn interface_member(&mut self) {
        self.start_node(SyntaxKind::InterfaceMember);
        self.bump();
        self.expect(SyntaxKind::Colon);
        self.type_or_error();
        self.expect(SyntaxKind::Semicolon);
        self.finish_node();
    }

    /// `const|let a (: T)?, b = e1, e2;`
    pub(super) fn variable_decl(&mut self) {
        self.start_node(SyntaxKind::VariableDecl);
        self.bump();
        self.start_node(SyntaxKind::TargetList);
        loop {
            if !self.currently_is(SyntaxKind::Id) {
                self.expect_id("variable name");
                break;
            }
            self.variable_target();
            if !self.eat_token(SyntaxKind::Comma) {
                break;
            }
        }
        self.finish_node();
        if self.eat_token(SyntaxKind::Equals) {
            self.expr_list();
        }
        self.expect(SyntaxKind::Semicolon);
        self.finish_node();
    }

    fn variable_target(&mut self) {
        self.start_node(SyntaxKind::VariableTarget);
        self.bump();
        if self.eat_token(SyntaxKind::Colon) {
            self.type_or_error();
        }
        self.finish_node();
    }
}
