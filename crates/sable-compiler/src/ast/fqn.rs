//! Qualified names.
//!
//! Each function, class, enum and interface prefixes the names declared
//! inside it with `name.` once its body is built. Since inner declarations
//! are finished first, prefixes accumulate from the inside out:
//! `main.helper.x`.

use super::{
    AnonFunction, Block, ClassDecl, ClassMember, ElseBranch, EnumDecl, Expr, FunctionDecl,
    Identifier, IfStmt, InterfaceDecl, Signature, Statement, VariableDecl,
};

/// Nodes that may declare names.
pub trait DeclaresNames {
    /// Calls `f` for every name declared in this node and its descendants.
    fn declared_names_mut(&mut self, f: &mut dyn FnMut(&mut Identifier));
}

pub fn prefix_declared_names(node: &mut impl DeclaresNames, prefix: &str) {
    node.declared_names_mut(&mut |ident| ident.prepend_fqn(prefix));
}

impl FunctionDecl {
    /// Qualifies everything declared in the signature and body with the
    /// function's name.
    pub fn qualify_inner_names(&mut self) {
        let prefix = format!("{}.", self.name.name);
        prefix_declared_names(&mut self.signature, &prefix);
        prefix_declared_names(&mut self.body, &prefix);
    }
}

impl AnonFunction {
    pub fn qualify_inner_names(&mut self, name: &str) {
        let prefix = format!("{name}.");
        prefix_declared_names(&mut self.signature, &prefix);
        prefix_declared_names(&mut self.body, &prefix);
    }
}

impl ClassDecl {
    pub fn qualify_inner_names(&mut self) {
        let prefix = format!("{}.", self.name.name);
        for param in &mut self.type_params {
            param.name.prepend_fqn(&prefix);
        }
        for member in &mut self.members {
            match member {
                ClassMember::Field(field) => prefix_declared_names(field, &prefix),
                ClassMember::Method(method) => prefix_declared_names(method, &prefix),
            }
        }
    }
}

impl EnumDecl {
    pub fn qualify_inner_names(&mut self) {
        let prefix = format!("{}.", self.name.name);
        for member in &mut self.members {
            member.name.prepend_fqn(&prefix);
        }
    }
}

impl InterfaceDecl {
    pub fn qualify_inner_names(&mut self) {
        let prefix = format!("{}.", self.name.name);
        for param in &mut self.type_params {
            param.name.prepend_fqn(&prefix);
        }
        for member in &mut self.members {
            member.name.prepend_fqn(&prefix);
        }
    }
}

impl DeclaresNames for FunctionDecl {
    fn declared_names_mut(&mut self, f: &mut dyn FnMut(&mut Identifier)) {
        f(&mut self.name);
        self.signature.declared_names_mut(f);
        self.body.declared_names_mut(f);
    }
}

impl DeclaresNames for Signature {
    fn declared_names_mut(&mut self, f: &mut dyn FnMut(&mut Identifier)) {
        for param in &mut self.type_params {
            f(&mut param.name);
        }
        for param in &mut self.params {
            f(&mut param.name);
            if let Some(default) = &mut param.default {
                default.declared_names_mut(f);
            }
        }
    }
}

impl DeclaresNames for VariableDecl {
    fn declared_names_mut(&mut self, f: &mut dyn FnMut(&mut Identifier)) {
        for target in &mut self.targets {
            f(&mut target.name);
        }
        for value in &mut self.values {
            value.declared_names_mut(f);
        }
    }
}

impl DeclaresNames for Block {
    fn declared_names_mut(&mut self, f: &mut dyn FnMut(&mut Identifier)) {
        for stmt in &mut self.statements {
            stmt.declared_names_mut(f);
        }
    }
}

impl DeclaresNames for IfStmt {
    fn declared_names_mut(&mut self, f: &mut dyn FnMut(&mut Identifier)) {
        self.condition.declared_names_mut(f);
        self.then_branch.declared_names_mut(f);
        match &mut self.else_branch {
            Some(ElseBranch::If(nested)) => nested.declared_names_mut(f),
            Some(ElseBranch::Block(block)) => block.declared_names_mut(f),
            None => {}
        }
    }
}

impl DeclaresNames for Statement {
    fn declared_names_mut(&mut self, f: &mut dyn FnMut(&mut Identifier)) {
        match self {
            Statement::Variable(decl) => decl.declared_names_mut(f),
            Statement::Function(func) => func.declared_names_mut(f),
            Statement::Block(block) => block.declared_names_mut(f),
            Statement::If(stmt) => stmt.declared_names_mut(f),
            Statement::For(stmt) => {
                f(&mut stmt.variable);
                stmt.iterable.declared_names_mut(f);
                stmt.body.declared_names_mut(f);
            }
            Statement::Loop(stmt) => stmt.body.declared_names_mut(f),
            Statement::Return(stmt) => {
                for value in &mut stmt.values {
                    value.declared_names_mut(f);
                }
            }
            Statement::Print(stmt) => {
                for value in &mut stmt.values {
                    value.declared_names_mut(f);
                }
            }
            Statement::When(stmt) => {
                stmt.subject.declared_names_mut(f);
                for case in &mut stmt.cases {
                    for value in &mut case.values {
                        value.declared_names_mut(f);
                    }
                    case.body.declared_names_mut(f);
                }
            }
            Statement::Assign(stmt) => {
                stmt.target.declared_names_mut(f);
                stmt.value.declared_names_mut(f);
            }
            Statement::Expr(stmt) => stmt.expr.declared_names_mut(f),
            Statement::Break(_) | Statement::Continue(_) => {}
        }
    }
}

impl DeclaresNames for Expr {
    fn declared_names_mut(&mut self, f: &mut dyn FnMut(&mut Identifier)) {
        match self {
            Expr::Binary(e) => {
                e.lhs.declared_names_mut(f);
                e.rhs.declared_names_mut(f);
            }
            Expr::Unary(e) => e.operand.declared_names_mut(f),
            Expr::Call(e) => {
                e.callee.declared_names_mut(f);
                for arg in &mut e.args {
                    arg.declared_names_mut(f);
                }
            }
            Expr::Member(e) => e.object.declared_names_mut(f),
            Expr::Index(e) => {
                e.object.declared_names_mut(f);
                e.index.declared_names_mut(f);
            }
            Expr::Array(e) => {
                for element in &mut e.elements {
                    element.declared_names_mut(f);
                }
            }
            Expr::Tuple(e) => {
                for element in &mut e.elements {
                    element.declared_names_mut(f);
                }
            }
            Expr::Object(e) => {
                for field in &mut e.fields {
                    field.value.declared_names_mut(f);
                }
            }
            Expr::Ternary(e) => {
                e.condition.declared_names_mut(f);
                e.consequent.declared_names_mut(f);
                e.alternate.declared_names_mut(f);
            }
            Expr::AnonFunction(func) => {
                func.signature.declared_names_mut(f);
                func.body.declared_names_mut(f);
            }
            Expr::Literal(_) | Expr::Name(_) => {}
        }
    }
}
