//! Declarations: functions, classes, enums, interfaces and variables.

use serde::Serialize;

use crate::analyze::Type;

use super::{Block, Expr, Identifier, NodeMeta, TypeExpr, ast_enum, ast_node};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub meta: NodeMeta,
    pub declarations: Vec<Declaration>,
}

impl Program {
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDecl> {
        self.declarations.iter().filter_map(|decl| match decl {
            Declaration::Function(func) => Some(func),
            _ => None,
        })
    }

    /// The top-level function named `main`, if any.
    pub fn main(&self) -> Option<&FunctionDecl> {
        self.functions().find(|func| func.name.name == "main")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "decl")]
pub enum Declaration {
    Function(FunctionDecl),
    Class(ClassDecl),
    Enum(EnumDecl),
    Interface(InterfaceDecl),
    Variable(VariableDecl),
}

ast_enum!(Declaration {
    Function,
    Class,
    Enum,
    Interface,
    Variable,
});

/// Type parameters, parameters and return types shared by named and
/// anonymous functions.
///
/// `return_types` holds the resolved return types: the declared ones, or
/// the types inferred from the body when none were declared.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Signature {
    pub type_params: Vec<TypeParam>,
    pub params: Vec<Parameter>,
    pub declared_returns: Vec<TypeExpr>,
    pub return_types: Vec<Type>,
}

impl Signature {
    pub fn has_declared_returns(&self) -> bool {
        !self.declared_returns.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDecl {
    pub meta: NodeMeta,
    pub name: Identifier,
    /// Key of the function's scope in its parent scope.
    pub scope: String,
    pub signature: Signature,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeParam {
    pub meta: NodeMeta,
    pub name: Identifier,
    pub constraint: Option<TypeExpr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub meta: NodeMeta,
    pub name: Identifier,
    pub type_annotation: Option<TypeExpr>,
    pub default: Option<Expr>,
    pub is_rest: bool,
    pub resolved_type: Option<Type>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassDecl {
    pub meta: NodeMeta,
    pub name: Identifier,
    pub type_params: Vec<TypeParam>,
    pub members: Vec<ClassMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "member")]
pub enum ClassMember {
    Field(VariableDecl),
    Method(FunctionDecl),
}

ast_enum!(ClassMember { Field, Method });

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumDecl {
    pub meta: NodeMeta,
    pub name: Identifier,
    pub members: Vec<EnumMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumMember {
    pub meta: NodeMeta,
    pub name: Identifier,
    pub value: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterfaceDecl {
    pub meta: NodeMeta,
    pub name: Identifier,
    pub type_params: Vec<TypeParam>,
    pub members: Vec<InterfaceMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterfaceMember {
    pub meta: NodeMeta,
    pub name: Identifier,
    pub type_annotation: TypeExpr,
}

/// `const a, b: int8 = x, y;`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableDecl {
    pub meta: NodeMeta,
    pub mutable: bool,
    pub targets: Vec<VariableTarget>,
    pub values: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableTarget {
    pub meta: NodeMeta,
    pub name: Identifier,
    pub type_annotation: Option<TypeExpr>,
    pub resolved_type: Option<Type>,
}

ast_node!(
    Program => Program,
    FunctionDecl => FunctionDecl,
    TypeParam => TypeParam,
    Parameter => Parameter,
    ClassDecl => ClassDecl,
    EnumDecl => EnumDecl,
    EnumMember => EnumMember,
    InterfaceDecl => InterfaceDecl,
    InterfaceMember => InterfaceMember,
    VariableDecl => VariableDecl,
    VariableTarget => VariableTarget,
);
