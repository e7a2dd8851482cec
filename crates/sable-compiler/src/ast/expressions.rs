use std::fmt;

use serde::Serialize;

use sable_core::NumberSize;

use super::{
    AstNode, Block, Identifier, NodeKind, NodeMeta, Signature, TypeExpr, ast_enum, ast_node,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "expr")]
pub enum Expr {
    Binary(Box<BinaryExpr>),
    Unary(Box<UnaryExpr>),
    Call(Box<CallExpr>),
    Member(Box<MemberExpr>),
    Index(Box<IndexExpr>),
    Array(ArrayExpr),
    Object(ObjectExpr),
    Tuple(TupleExpr),
    Ternary(Box<TernaryExpr>),
    Literal(Literal),
    Name(NameRef),
    AnonFunction(Box<AnonFunction>),
}

ast_enum!(Expr {
    Binary,
    Unary,
    Call,
    Member,
    Index,
    Array,
    Object,
    Tuple,
    Ternary,
    Literal,
    Name,
    AnonFunction,
});

impl Expr {
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(&name.name),
            _ => None,
        }
    }

    /// True for unary minus; used to spot negative exponents.
    pub fn is_negation(&self) -> bool {
        matches!(self, Self::Unary(unary) if unary.op == UnaryOp::Neg)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Exp,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Or => "||",
            Self::And => "&&",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::Exp => "^e",
        }
    }

    /// Comparison and logical operators always produce `bool`.
    pub fn is_boolean(self) -> bool {
        matches!(
            self,
            Self::Or
                | Self::And
                | Self::Eq
                | Self::NotEq
                | Self::Lt
                | Self::LtEq
                | Self::Gt
                | Self::GtEq
        )
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    Not,
    Neg,
    Inc,
    Dec,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Not => "!",
            Self::Neg => "-",
            Self::Inc => "++",
            Self::Dec => "--",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinaryExpr {
    pub meta: NodeMeta,
    pub op: BinaryOp,
    pub lhs: Expr,
    pub rhs: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnaryExpr {
    pub meta: NodeMeta,
    pub op: UnaryOp,
    pub operand: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallExpr {
    pub meta: NodeMeta,
    pub callee: Expr,
    pub type_args: Vec<TypeExpr>,
    pub args: Vec<Expr>,
}

/// `object.member`. The member name is a use, not a declaration, so its
/// qualified name never changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberExpr {
    pub meta: NodeMeta,
    pub object: Expr,
    pub member: Identifier,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexExpr {
    pub meta: NodeMeta,
    pub object: Expr,
    pub index: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayExpr {
    pub meta: NodeMeta,
    pub elements: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectExpr {
    pub meta: NodeMeta,
    pub fields: Vec<ObjectField>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectField {
    pub meta: NodeMeta,
    pub key: String,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TupleExpr {
    pub meta: NodeMeta,
    pub elements: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TernaryExpr {
    pub meta: NodeMeta,
    pub condition: Expr,
    pub consequent: Expr,
    pub alternate: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value")]
pub enum LiteralValue {
    Bool(bool),
    /// Source text and the sizes the value fits, narrowest first.
    Number {
        text: String,
        sizes: Vec<NumberSize>,
    },
    String(String),
    Path(String),
    Regex(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Literal {
    pub meta: NodeMeta,
    pub value: LiteralValue,
}

impl AstNode for Literal {
    fn meta(&self) -> &NodeMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut NodeMeta {
        &mut self.meta
    }

    fn kind(&self) -> NodeKind {
        match self.value {
            LiteralValue::Bool(_) => NodeKind::BoolLiteral,
            LiteralValue::Number { .. } => NodeKind::NumberLiteral,
            LiteralValue::String(_) => NodeKind::StringLiteral,
            LiteralValue::Path(_) => NodeKind::PathLiteral,
            LiteralValue::Regex(_) => NodeKind::RegexLiteral,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NameRef {
    pub meta: NodeMeta,
    pub name: String,
}

/// `f(x: int8) -> int8 { ... }` in expression position.
///
/// `scope` starts as `$anon:N` and becomes the variable name when the
/// function is the sole initializer of a single-target declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnonFunction {
    pub meta: NodeMeta,
    pub scope: String,
    pub signature: Signature,
    pub body: Block,
}

ast_node!(
    BinaryExpr => BinaryExpr,
    UnaryExpr => UnaryExpr,
    CallExpr => CallExpr,
    MemberExpr => MemberExpr,
    IndexExpr => IndexExpr,
    ArrayExpr => ArrayExpr,
    ObjectExpr => ObjectExpr,
    ObjectField => ObjectField,
    TupleExpr => TupleExpr,
    TernaryExpr => TernaryExpr,
    NameRef => NameRef,
    AnonFunction => AnonFunction,
);
