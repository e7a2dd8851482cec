//! Type annotations as written in source.

use serde::Serialize;

use sable_core::NumberSize;

use super::{NodeMeta, ast_enum, ast_node};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum TypeExpr {
    Primitive(PrimitiveTypeExpr),
    Number(NumberTypeExpr),
    Array(Box<ArrayTypeExpr>),
    Function(FunctionTypeExpr),
    Instance(InstanceTypeExpr),
    Named(NamedTypeExpr),
}

ast_enum!(TypeExpr {
    Primitive,
    Number,
    Array,
    Function,
    Instance,
    Named,
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    Bool,
    String,
    Path,
    Regex,
}

impl Primitive {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bool" => Some(Self::Bool),
            "string" => Some(Self::String),
            "path" => Some(Self::Path),
            "regex" => Some(Self::Regex),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::String => "string",
            Self::Path => "path",
            Self::Regex => "regex",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrimitiveTypeExpr {
    pub meta: NodeMeta,
    pub primitive: Primitive,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberTypeExpr {
    pub meta: NodeMeta,
    pub size: NumberSize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayTypeExpr {
    pub meta: NodeMeta,
    pub element: TypeExpr,
}

/// `f(T, U) -> R`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionTypeExpr {
    pub meta: NodeMeta,
    pub params: Vec<TypeExpr>,
    pub returns: Vec<TypeExpr>,
}

/// `Name<|T, U|>`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstanceTypeExpr {
    pub meta: NodeMeta,
    pub name: String,
    pub args: Vec<TypeExpr>,
}

/// A bare type name. `is_type_param` is set when the name refers to a type
/// parameter in scope rather than a declared class, enum or interface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedTypeExpr {
    pub meta: NodeMeta,
    pub name: String,
    pub is_type_param: bool,
}

ast_node!(
    PrimitiveTypeExpr => PrimitiveType,
    NumberTypeExpr => NumberType,
    ArrayTypeExpr => ArrayType,
    FunctionTypeExpr => FunctionType,
    InstanceTypeExpr => InstanceType,
    NamedTypeExpr => NamedType,
);
