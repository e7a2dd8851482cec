//! AST Visitor pattern.
//!
//! # Usage
//!
//! Implement `Visitor` for your struct. Override `visit_*` methods to add logic.
//! Call `walk_*` within your override to continue recursion (or omit it to stop).
//!
//! `enter_node`/`leave_node` fire around every node reached by the default
//! walkers, including the ones without a dedicated `visit_*` method
//! (parameters, `when` cases, object fields, ...).
//!
//! ```ignore
//! impl Visitor for MyPass {
//!     fn visit_function_decl(&mut self, func: &FunctionDecl) {
//!         // Pre-order logic
//!         walk_function_decl(self, func);
//!         // Post-order logic
//!     }
//! }
//! ```

use super::{
    AnonFunction, AstNode, Block, ClassDecl, ClassMember, Declaration, ElseBranch, EnumDecl, Expr,
    FunctionDecl, Identifier, IfStmt, InterfaceDecl, Program, Signature, Statement, TypeExpr,
    VariableDecl,
};

pub trait Visitor: Sized {
    fn enter_node(&mut self, _node: &dyn AstNode) {}

    fn leave_node(&mut self, _node: &dyn AstNode) {}

    fn visit_program(&mut self, program: &Program) {
        walk_program(self, program);
    }

    fn visit_declaration(&mut self, decl: &Declaration) {
        walk_declaration(self, decl);
    }

    fn visit_function_decl(&mut self, func: &FunctionDecl) {
        walk_function_decl(self, func);
    }

    fn visit_anon_function(&mut self, func: &AnonFunction) {
        walk_anon_function(self, func);
    }

    fn visit_signature(&mut self, sig: &Signature) {
        walk_signature(self, sig);
    }

    fn visit_class_decl(&mut self, class: &ClassDecl) {
        walk_class_decl(self, class);
    }

    fn visit_enum_decl(&mut self, decl: &EnumDecl) {
        walk_enum_decl(self, decl);
    }

    fn visit_interface_decl(&mut self, decl: &InterfaceDecl) {
        walk_interface_decl(self, decl);
    }

    fn visit_variable_decl(&mut self, decl: &VariableDecl) {
        walk_variable_decl(self, decl);
    }

    fn visit_block(&mut self, block: &Block) {
        walk_block(self, block);
    }

    fn visit_statement(&mut self, stmt: &Statement) {
        walk_statement(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }

    fn visit_type_expr(&mut self, ty: &TypeExpr) {
        walk_type_expr(self, ty);
    }

    fn visit_identifier(&mut self, ident: &Identifier) {
        self.enter_node(ident);
        self.leave_node(ident);
    }
}

fn around<V: Visitor>(visitor: &mut V, node: &dyn AstNode, body: impl FnOnce(&mut V)) {
    visitor.enter_node(node);
    body(visitor);
    visitor.leave_node(node);
}

pub fn walk_program<V: Visitor>(visitor: &mut V, program: &Program) {
    around(visitor, program, |v| {
        for decl in &program.declarations {
            v.visit_declaration(decl);
        }
    });
}

pub fn walk_declaration<V: Visitor>(visitor: &mut V, decl: &Declaration) {
    match decl {
        Declaration::Function(func) => visitor.visit_function_decl(func),
        Declaration::Class(class) => visitor.visit_class_decl(class),
        Declaration::Enum(decl) => visitor.visit_enum_decl(decl),
        Declaration::Interface(decl) => visitor.visit_interface_decl(decl),
        Declaration::Variable(decl) => visitor.visit_variable_decl(decl),
    }
}

pub fn walk_function_decl<V: Visitor>(visitor: &mut V, func: &FunctionDecl) {
    around(visitor, func, |v| {
        v.visit_identifier(&func.name);
        v.visit_signature(&func.signature);
        v.visit_block(&func.body);
    });
}

pub fn walk_anon_function<V: Visitor>(visitor: &mut V, func: &AnonFunction) {
    around(visitor, func, |v| {
        v.visit_signature(&func.signature);
        v.visit_block(&func.body);
    });
}

pub fn walk_signature<V: Visitor>(visitor: &mut V, sig: &Signature) {
    for param in &sig.type_params {
        around(visitor, param, |v| {
            v.visit_identifier(&param.name);
            if let Some(constraint) = &param.constraint {
                v.visit_type_expr(constraint);
            }
        });
    }
    for param in &sig.params {
        around(visitor, param, |v| {
            v.visit_identifier(&param.name);
            if let Some(ty) = &param.type_annotation {
                v.visit_type_expr(ty);
            }
            if let Some(default) = &param.default {
                v.visit_expr(default);
            }
        });
    }
    for ty in &sig.declared_returns {
        visitor.visit_type_expr(ty);
    }
}

pub fn walk_class_decl<V: Visitor>(visitor: &mut V, class: &ClassDecl) {
    around(visitor, class, |v| {
        v.visit_identifier(&class.name);
        for param in &class.type_params {
            around(v, param, |v| {
                v.visit_identifier(&param.name);
                if let Some(constraint) = &param.constraint {
                    v.visit_type_expr(constraint);
                }
            });
        }
        for member in &class.members {
            match member {
                ClassMember::Field(field) => v.visit_variable_decl(field),
                ClassMember::Method(method) => v.visit_function_decl(method),
            }
        }
    });
}

pub fn walk_enum_decl<V: Visitor>(visitor: &mut V, decl: &EnumDecl) {
    around(visitor, decl, |v| {
        v.visit_identifier(&decl.name);
        for member in &decl.members {
            around(v, member, |v| {
                v.visit_identifier(&member.name);
                if let Some(value) = &member.value {
                    v.visit_expr(value);
                }
            });
        }
    });
}

pub fn walk_interface_decl<V: Visitor>(visitor: &mut V, decl: &InterfaceDecl) {
    around(visitor, decl, |v| {
        v.visit_identifier(&decl.name);
        for param in &decl.type_params {
            around(v, param, |v| {
                v.visit_identifier(&param.name);
                if let Some(constraint) = &param.constraint {
                    v.visit_type_expr(constraint);
                }
            });
        }
        for member in &decl.members {
            around(v, member, |v| {
                v.visit_identifier(&member.name);
                v.visit_type_expr(&member.type_annotation);
            });
        }
    });
}

pub fn walk_variable_decl<V: Visitor>(visitor: &mut V, decl: &VariableDecl) {
    around(visitor, decl, |v| {
        for target in &decl.targets {
            around(v, target, |v| {
                v.visit_identifier(&target.name);
                if let Some(ty) = &target.type_annotation {
                    v.visit_type_expr(ty);
                }
            });
        }
        for value in &decl.values {
            v.visit_expr(value);
        }
    });
}

pub fn walk_block<V: Visitor>(visitor: &mut V, block: &Block) {
    around(visitor, block, |v| {
        for stmt in &block.statements {
            v.visit_statement(stmt);
        }
    });
}

fn walk_if<V: Visitor>(visitor: &mut V, stmt: &IfStmt) {
    around(visitor, stmt, |v| {
        v.visit_expr(&stmt.condition);
        v.visit_block(&stmt.then_branch);
        match &stmt.else_branch {
            Some(ElseBranch::If(nested)) => walk_if(v, nested),
            Some(ElseBranch::Block(block)) => v.visit_block(block),
            None => {}
        }
    });
}

pub fn walk_statement<V: Visitor>(visitor: &mut V, stmt: &Statement) {
    match stmt {
        Statement::Variable(decl) => visitor.visit_variable_decl(decl),
        Statement::Function(func) => visitor.visit_function_decl(func),
        Statement::Block(block) => visitor.visit_block(block),
        Statement::If(stmt) => walk_if(visitor, stmt),
        Statement::For(stmt) => around(visitor, stmt, |v| {
            v.visit_identifier(&stmt.variable);
            v.visit_expr(&stmt.iterable);
            v.visit_block(&stmt.body);
        }),
        Statement::Loop(stmt) => around(visitor, stmt, |v| v.visit_block(&stmt.body)),
        Statement::Return(stmt) => around(visitor, stmt, |v| {
            for value in &stmt.values {
                v.visit_expr(value);
            }
        }),
        Statement::Print(stmt) => around(visitor, stmt, |v| {
            for value in &stmt.values {
                v.visit_expr(value);
            }
        }),
        Statement::When(stmt) => around(visitor, stmt, |v| {
            v.visit_expr(&stmt.subject);
            for case in &stmt.cases {
                around(v, case, |v| {
                    for value in &case.values {
                        v.visit_expr(value);
                    }
                    v.visit_block(&case.body);
                });
            }
        }),
        Statement::Break(stmt) => around(visitor, stmt, |_| {}),
        Statement::Continue(stmt) => around(visitor, stmt, |_| {}),
        Statement::Assign(stmt) => around(visitor, stmt, |v| {
            v.visit_expr(&stmt.target);
            v.visit_expr(&stmt.value);
        }),
        Statement::Expr(stmt) => around(visitor, stmt, |v| v.visit_expr(&stmt.expr)),
    }
}

pub fn walk_expr<V: Visitor>(visitor: &mut V, expr: &Expr) {
    match expr {
        Expr::Binary(e) => around(visitor, &**e, |v| {
            v.visit_expr(&e.lhs);
            v.visit_expr(&e.rhs);
        }),
        Expr::Unary(e) => around(visitor, &**e, |v| v.visit_expr(&e.operand)),
        Expr::Call(e) => around(visitor, &**e, |v| {
            v.visit_expr(&e.callee);
            for ty in &e.type_args {
                v.visit_type_expr(ty);
            }
            for arg in &e.args {
                v.visit_expr(arg);
            }
        }),
        Expr::Member(e) => around(visitor, &**e, |v| {
            v.visit_expr(&e.object);
            v.visit_identifier(&e.member);
        }),
        Expr::Index(e) => around(visitor, &**e, |v| {
            v.visit_expr(&e.object);
            v.visit_expr(&e.index);
        }),
        Expr::Array(e) => around(visitor, e, |v| {
            for element in &e.elements {
                v.visit_expr(element);
            }
        }),
        Expr::Tuple(e) => around(visitor, e, |v| {
            for element in &e.elements {
                v.visit_expr(element);
            }
        }),
        Expr::Object(e) => around(visitor, e, |v| {
            for field in &e.fields {
                around(v, field, |v| v.visit_expr(&field.value));
            }
        }),
        Expr::Ternary(e) => around(visitor, &**e, |v| {
            v.visit_expr(&e.condition);
            v.visit_expr(&e.consequent);
            v.visit_expr(&e.alternate);
        }),
        Expr::Literal(e) => around(visitor, e, |_| {}),
        Expr::Name(e) => around(visitor, e, |_| {}),
        Expr::AnonFunction(func) => visitor.visit_anon_function(func),
    }
}

pub fn walk_type_expr<V: Visitor>(visitor: &mut V, ty: &TypeExpr) {
    match ty {
        TypeExpr::Primitive(t) => around(visitor, t, |_| {}),
        TypeExpr::Number(t) => around(visitor, t, |_| {}),
        TypeExpr::Named(t) => around(visitor, t, |_| {}),
        TypeExpr::Array(t) => around(visitor, &**t, |v| v.visit_type_expr(&t.element)),
        TypeExpr::Function(t) => around(visitor, t, |v| {
            for param in &t.params {
                v.visit_type_expr(param);
            }
            for ret in &t.returns {
                v.visit_type_expr(ret);
            }
        }),
        TypeExpr::Instance(t) => around(visitor, t, |v| {
            for arg in &t.args {
                v.visit_type_expr(arg);
            }
        }),
    }
}
