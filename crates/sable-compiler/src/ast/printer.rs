//! Indented text dump of a built program, for tests and the JSON-less debug view.

use std::fmt::{self, Write};

use super::{
    AnonFunction, AstNode, Block, ClassMember, Declaration, ElseBranch, Expr, FunctionDecl, IfStmt,
    LiteralValue, Program, Signature, Statement, TypeExpr, VariableDecl,
};

pub struct AstPrinter<'p> {
    program: &'p Program,
    spans: bool,
    ids: bool,
}

impl<'p> AstPrinter<'p> {
    pub fn new(program: &'p Program) -> Self {
        Self {
            program,
            spans: false,
            ids: false,
        }
    }

    pub fn with_spans(mut self, value: bool) -> Self {
        self.spans = value;
        self
    }

    pub fn with_ids(mut self, value: bool) -> Self {
        self.ids = value;
        self
    }

    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> fmt::Result {
        self.line(w, 0, self.program, "")?;
        for decl in &self.program.declarations {
            self.format_declaration(w, decl, 1)?;
        }
        Ok(())
    }

    fn line(
        &self,
        w: &mut impl Write,
        depth: usize,
        node: &dyn AstNode,
        label: &str,
    ) -> fmt::Result {
        write!(w, "{:indent$}{}", "", node.kind(), indent = depth * 2)?;
        if self.ids {
            write!(w, " {}", node.id())?;
        }
        if self.spans {
            let pos = node.pos();
            write!(w, " [{}..{}]", pos.start, pos.end)?;
        }
        writeln!(w, "{label}")
    }

    fn format_declaration(
        &self,
        w: &mut impl Write,
        decl: &Declaration,
        depth: usize,
    ) -> fmt::Result {
        match decl {
            Declaration::Function(func) => self.format_function(w, func, depth),
            Declaration::Variable(var) => self.format_variable(w, var, depth),
            Declaration::Class(class) => {
                self.line(w, depth, class, &format!(" {}", class.name.fqn))?;
                for param in &class.type_params {
                    self.line(w, depth + 1, param, &format!(" {}", param.name.fqn))?;
                }
                for member in &class.members {
                    match member {
                        ClassMember::Field(field) => self.format_variable(w, field, depth + 1)?,
                        ClassMember::Method(method) => self.format_function(w, method, depth + 1)?,
                    }
                }
                Ok(())
            }
            Declaration::Enum(decl) => {
                self.line(w, depth, decl, &format!(" {}", decl.name.fqn))?;
                for member in &decl.members {
                    self.line(w, depth + 1, member, &format!(" {}", member.name.fqn))?;
                    if let Some(value) = &member.value {
                        self.format_expr(w, value, depth + 2)?;
                    }
                }
                Ok(())
            }
            Declaration::Interface(decl) => {
                self.line(w, depth, decl, &format!(" {}", decl.name.fqn))?;
                for member in &decl.members {
                    let label = format!(
                        " {}: {}",
                        member.name.fqn,
                        render_type_expr(&member.type_annotation)
                    );
                    self.line(w, depth + 1, member, &label)?;
                }
                Ok(())
            }
        }
    }

    fn format_function(
        &self,
        w: &mut impl Write,
        func: &FunctionDecl,
        depth: usize,
    ) -> fmt::Result {
        let label = format!(" {}{}", func.name.fqn, render_returns(&func.signature));
        self.line(w, depth, func, &label)?;
        self.format_signature(w, &func.signature, depth + 1)?;
        self.format_block(w, &func.body, depth + 1)
    }

    fn format_anon_function(
        &self,
        w: &mut impl Write,
        func: &AnonFunction,
        depth: usize,
    ) -> fmt::Result {
        let label = format!(" {}{}", func.scope, render_returns(&func.signature));
        self.line(w, depth, func, &label)?;
        self.format_signature(w, &func.signature, depth + 1)?;
        self.format_block(w, &func.body, depth + 1)
    }

    fn format_signature(&self, w: &mut impl Write, sig: &Signature, depth: usize) -> fmt::Result {
        for param in &sig.type_params {
            let mut label = format!(" {}", param.name.fqn);
            if let Some(constraint) = &param.constraint {
                write!(label, ": {}", render_type_expr(constraint))?;
            }
            self.line(w, depth, param, &label)?;
        }
        for param in &sig.params {
            let mut label = String::from(" ");
            if param.is_rest {
                label.push_str("...");
            }
            label.push_str(&param.name.fqn);
            if let Some(ty) = &param.resolved_type {
                write!(label, ": {ty}")?;
            }
            self.line(w, depth, param, &label)?;
            if let Some(default) = &param.default {
                self.format_expr(w, default, depth + 1)?;
            }
        }
        Ok(())
    }

    fn format_variable(
        &self,
        w: &mut impl Write,
        decl: &VariableDecl,
        depth: usize,
    ) -> fmt::Result {
        let keyword = if decl.mutable { " let" } else { " const" };
        self.line(w, depth, decl, keyword)?;
        for target in &decl.targets {
            let mut label = format!(" {}", target.name.fqn);
            if let Some(ty) = &target.resolved_type {
                write!(label, ": {ty}")?;
            }
            self.line(w, depth + 1, target, &label)?;
        }
        for value in &decl.values {
            self.format_expr(w, value, depth + 1)?;
        }
        Ok(())
    }

    fn format_block(&self, w: &mut impl Write, block: &Block, depth: usize) -> fmt::Result {
        self.line(w, depth, block, "")?;
        for stmt in &block.statements {
            self.format_statement(w, stmt, depth + 1)?;
        }
        Ok(())
    }

    fn format_if(&self, w: &mut impl Write, stmt: &IfStmt, depth: usize) -> fmt::Result {
        self.line(w, depth, stmt, "")?;
        self.format_expr(w, &stmt.condition, depth + 1)?;
        self.format_block(w, &stmt.then_branch, depth + 1)?;
        match &stmt.else_branch {
            Some(ElseBranch::If(nested)) => self.format_if(w, nested, depth + 1),
            Some(ElseBranch::Block(block)) => self.format_block(w, block, depth + 1),
            None => Ok(()),
        }
    }

    fn format_statement(&self, w: &mut impl Write, stmt: &Statement, depth: usize) -> fmt::Result {
        match stmt {
            Statement::Variable(decl) => self.format_variable(w, decl, depth),
            Statement::Function(func) => self.format_function(w, func, depth),
            Statement::Block(block) => self.format_block(w, block, depth),
            Statement::If(stmt) => self.format_if(w, stmt, depth),
            Statement::For(stmt) => {
                self.line(w, depth, stmt, &format!(" {}", stmt.variable.fqn))?;
                self.format_expr(w, &stmt.iterable, depth + 1)?;
                self.format_block(w, &stmt.body, depth + 1)
            }
            Statement::Loop(stmt) => {
                self.line(w, depth, stmt, "")?;
                self.format_block(w, &stmt.body, depth + 1)
            }
            Statement::Return(stmt) => {
                self.line(w, depth, stmt, "")?;
                self.format_exprs(w, &stmt.values, depth + 1)
            }
            Statement::Print(stmt) => {
                self.line(w, depth, stmt, "")?;
                self.format_exprs(w, &stmt.values, depth + 1)
            }
            Statement::When(stmt) => {
                self.line(w, depth, stmt, "")?;
                self.format_expr(w, &stmt.subject, depth + 1)?;
                for case in &stmt.cases {
                    self.line(w, depth + 1, case, if case.is_else() { " else" } else { "" })?;
                    self.format_exprs(w, &case.values, depth + 2)?;
                    self.format_block(w, &case.body, depth + 2)?;
                }
                Ok(())
            }
            Statement::Break(stmt) => self.line(w, depth, stmt, ""),
            Statement::Continue(stmt) => self.line(w, depth, stmt, ""),
            Statement::Assign(stmt) => {
                self.line(w, depth, stmt, "")?;
                self.format_expr(w, &stmt.target, depth + 1)?;
                self.format_expr(w, &stmt.value, depth + 1)
            }
            Statement::Expr(stmt) => {
                self.line(w, depth, stmt, "")?;
                self.format_expr(w, &stmt.expr, depth + 1)
            }
        }
    }

    fn format_exprs(&self, w: &mut impl Write, exprs: &[Expr], depth: usize) -> fmt::Result {
        for expr in exprs {
            self.format_expr(w, expr, depth)?;
        }
        Ok(())
    }

    fn format_expr(&self, w: &mut impl Write, expr: &Expr, depth: usize) -> fmt::Result {
        match expr {
            Expr::Binary(e) => {
                self.line(w, depth, expr, &format!(" {}", e.op))?;
                self.format_expr(w, &e.lhs, depth + 1)?;
                self.format_expr(w, &e.rhs, depth + 1)
            }
            Expr::Unary(e) => {
                self.line(w, depth, expr, &format!(" {}", e.op))?;
                self.format_expr(w, &e.operand, depth + 1)
            }
            Expr::Call(e) => {
                let mut label = String::new();
                if !e.type_args.is_empty() {
                    let args: Vec<_> = e.type_args.iter().map(render_type_expr).collect();
                    write!(label, " <|{}|>", args.join(", "))?;
                }
                self.line(w, depth, expr, &label)?;
                self.format_expr(w, &e.callee, depth + 1)?;
                self.format_exprs(w, &e.args, depth + 1)
            }
            Expr::Member(e) => {
                self.line(w, depth, expr, &format!(" .{}", e.member.name))?;
                self.format_expr(w, &e.object, depth + 1)
            }
            Expr::Index(e) => {
                self.line(w, depth, expr, "")?;
                self.format_expr(w, &e.object, depth + 1)?;
                self.format_expr(w, &e.index, depth + 1)
            }
            Expr::Array(e) => {
                self.line(w, depth, expr, "")?;
                self.format_exprs(w, &e.elements, depth + 1)
            }
            Expr::Tuple(e) => {
                self.line(w, depth, expr, "")?;
                self.format_exprs(w, &e.elements, depth + 1)
            }
            Expr::Object(e) => {
                self.line(w, depth, expr, "")?;
                for field in &e.fields {
                    self.line(w, depth + 1, field, &format!(" {}", field.key))?;
                    self.format_expr(w, &field.value, depth + 2)?;
                }
                Ok(())
            }
            Expr::Ternary(e) => {
                self.line(w, depth, expr, "")?;
                self.format_expr(w, &e.condition, depth + 1)?;
                self.format_expr(w, &e.consequent, depth + 1)?;
                self.format_expr(w, &e.alternate, depth + 1)
            }
            Expr::Literal(lit) => {
                let label = match &lit.value {
                    LiteralValue::Bool(value) => format!(" {value}"),
                    LiteralValue::Number { text, .. } => format!(" {text}"),
                    LiteralValue::String(value) => format!(" {value:?}"),
                    LiteralValue::Path(value) => format!(" p{value:?}"),
                    LiteralValue::Regex(pattern) => format!(" /{pattern}/"),
                };
                self.line(w, depth, expr, &label)
            }
            Expr::Name(name) => self.line(w, depth, expr, &format!(" {}", name.name)),
            Expr::AnonFunction(func) => self.format_anon_function(w, func, depth),
        }
    }
}

fn render_returns(sig: &Signature) -> String {
    if sig.return_types.is_empty() {
        return String::new();
    }
    let returns: Vec<_> = sig.return_types.iter().map(ToString::to_string).collect();
    format!(" -> {}", returns.join(", "))
}

/// Source-like rendering of a type annotation.
pub(crate) fn render_type_expr(ty: &TypeExpr) -> String {
    match ty {
        TypeExpr::Primitive(t) => t.primitive.name().to_owned(),
        TypeExpr::Number(t) => t.size.name().to_owned(),
        TypeExpr::Named(t) => t.name.clone(),
        TypeExpr::Array(t) => format!("{}[]", render_type_expr(&t.element)),
        TypeExpr::Instance(t) => {
            let args: Vec<_> = t.args.iter().map(render_type_expr).collect();
            format!("{}<|{}|>", t.name, args.join(", "))
        }
        TypeExpr::Function(t) => {
            let params: Vec<_> = t.params.iter().map(render_type_expr).collect();
            let mut out = format!("f({})", params.join(", "));
            if !t.returns.is_empty() {
                let returns: Vec<_> = t.returns.iter().map(render_type_expr).collect();
                write!(out, " -> {}", returns.join(", ")).expect("String write never fails");
            }
            out
        }
    }
}
