//! Typed AST for Sable programs.
//!
//! Built from the CST by [`crate::analyze`]. Every node carries a [`NodeMeta`]
//! with a program-unique id, its source position and the id of the node that
//! owns it. Node ids are allocated in pre-order, so a parent's id is always
//! smaller than the ids of its descendants.

mod expressions;
mod fqn;
mod index;
mod invariants;
mod items;
mod printer;
mod statements;
mod types;
mod visitor;

#[cfg(test)]
mod fqn_tests;
#[cfg(test)]
mod printer_tests;

use std::fmt;

use serde::Serialize;

use sable_core::Position;

pub use expressions::{
    AnonFunction, ArrayExpr, BinaryExpr, BinaryOp, CallExpr, Expr, IndexExpr, Literal,
    LiteralValue, MemberExpr, NameRef, ObjectExpr, ObjectField, TernaryExpr, TupleExpr, UnaryExpr,
    UnaryOp,
};
pub use fqn::{DeclaresNames, prefix_declared_names};
pub use index::{IndexEntry, NodeIndex};
pub(crate) use invariants::assert_ownership;
pub use items::{
    ClassDecl, ClassMember, Declaration, EnumDecl, EnumMember, FunctionDecl, InterfaceDecl,
    InterfaceMember, Parameter, Program, Signature, TypeParam, VariableDecl, VariableTarget,
};
pub use printer::AstPrinter;
pub(crate) use printer::render_type_expr;
pub use statements::{
    AssignStmt, Block, BreakStmt, ContinueStmt, ElseBranch, ExprStmt, ForStmt, IfStmt, LoopStmt,
    PrintStmt, ReturnStmt, Statement, WhenCase, WhenStmt,
};
pub use types::{
    ArrayTypeExpr, FunctionTypeExpr, InstanceTypeExpr, NamedTypeExpr, NumberTypeExpr, Primitive,
    PrimitiveTypeExpr, TypeExpr,
};
pub use visitor::{
    Visitor, walk_anon_function, walk_block, walk_class_decl, walk_declaration, walk_enum_decl,
    walk_expr, walk_function_decl, walk_interface_decl, walk_program, walk_signature,
    walk_statement, walk_type_expr, walk_variable_decl,
};

/// Program-unique node identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Fields shared by every AST node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeMeta {
    pub id: NodeId,
    pub pos: Position,
    pub parent: Option<NodeId>,
}

impl NodeMeta {
    pub fn new(id: NodeId, pos: Position) -> Self {
        Self {
            id,
            pos,
            parent: None,
        }
    }

    /// Records `self` as the owner of `child`.
    ///
    /// # Panics
    /// If the child already has an owner.
    pub fn own(&self, child: &mut impl AstNode) {
        let meta = child.meta_mut();
        assert!(
            meta.parent.is_none(),
            "ast: node {} already owned by {:?}",
            meta.id,
            meta.parent
        );
        meta.parent = Some(self.id);
    }

    pub fn own_all<'a, N: AstNode + 'a>(&self, children: impl IntoIterator<Item = &'a mut N>) {
        for child in children {
            self.own(child);
        }
    }
}

/// Discriminant of every concrete node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    Program,
    Identifier,
    FunctionDecl,
    TypeParam,
    Parameter,
    ClassDecl,
    EnumDecl,
    EnumMember,
    InterfaceDecl,
    InterfaceMember,
    VariableDecl,
    VariableTarget,
    Block,
    IfStmt,
    ForStmt,
    LoopStmt,
    ReturnStmt,
    PrintStmt,
    WhenStmt,
    WhenCase,
    BreakStmt,
    ContinueStmt,
    AssignStmt,
    ExprStmt,
    BinaryExpr,
    UnaryExpr,
    CallExpr,
    MemberExpr,
    IndexExpr,
    ArrayExpr,
    ObjectExpr,
    ObjectField,
    TupleExpr,
    TernaryExpr,
    BoolLiteral,
    NumberLiteral,
    StringLiteral,
    PathLiteral,
    RegexLiteral,
    NameRef,
    AnonFunction,
    PrimitiveType,
    NumberType,
    ArrayType,
    FunctionType,
    InstanceType,
    NamedType,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Common accessors of AST nodes.
pub trait AstNode {
    fn meta(&self) -> &NodeMeta;
    fn meta_mut(&mut self) -> &mut NodeMeta;
    fn kind(&self) -> NodeKind;

    fn id(&self) -> NodeId {
        self.meta().id
    }

    fn pos(&self) -> Position {
        self.meta().pos
    }

    fn parent(&self) -> Option<NodeId> {
        self.meta().parent
    }
}

/// Implements [`AstNode`] for structs with a `meta` field.
macro_rules! ast_node {
    ($($ty:ident => $kind:ident),* $(,)?) => {
        $(
            impl $crate::ast::AstNode for $ty {
                fn meta(&self) -> &$crate::ast::NodeMeta {
                    &self.meta
                }

                fn meta_mut(&mut self) -> &mut $crate::ast::NodeMeta {
                    &mut self.meta
                }

                fn kind(&self) -> $crate::ast::NodeKind {
                    $crate::ast::NodeKind::$kind
                }
            }
        )*
    };
}

/// Implements [`AstNode`] for closed enums by delegating to the variant.
macro_rules! ast_enum {
    ($ty:ident { $($variant:ident),* $(,)? }) => {
        impl $crate::ast::AstNode for $ty {
            fn meta(&self) -> &$crate::ast::NodeMeta {
                use $crate::ast::AstNode as _;
                match self {
                    $(Self::$variant(node) => node.meta(),)*
                }
            }

            fn meta_mut(&mut self) -> &mut $crate::ast::NodeMeta {
                use $crate::ast::AstNode as _;
                match self {
                    $(Self::$variant(node) => node.meta_mut(),)*
                }
            }

            fn kind(&self) -> $crate::ast::NodeKind {
                use $crate::ast::AstNode as _;
                match self {
                    $(Self::$variant(node) => node.kind(),)*
                }
            }
        }
    };
}

pub(crate) use ast_enum;
pub(crate) use ast_node;

/// A declared name.
///
/// `fqn` starts equal to `name` and grows a `outer.` prefix for every
/// function, class, enum or interface the declaration is nested in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identifier {
    pub meta: NodeMeta,
    pub name: String,
    pub fqn: String,
}

impl Identifier {
    pub fn new(meta: NodeMeta, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            meta,
            fqn: name.clone(),
            name,
        }
    }

    /// Prepends `prefix` to the qualified name. Prefixes of length one or
    /// less (a bare `.`) are ignored.
    pub fn prepend_fqn(&mut self, prefix: &str) {
        if prefix.len() <= 1 {
            return;
        }
        self.fqn.insert_str(0, prefix);
    }
}

ast_node!(Identifier => Identifier);
