use serde::Serialize;

use super::{Expr, FunctionDecl, Identifier, NodeMeta, VariableDecl, ast_enum, ast_node};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "stmt")]
pub enum Statement {
    Variable(VariableDecl),
    Function(FunctionDecl),
    Block(Block),
    If(IfStmt),
    For(ForStmt),
    Loop(LoopStmt),
    Return(ReturnStmt),
    Print(PrintStmt),
    When(WhenStmt),
    Break(BreakStmt),
    Continue(ContinueStmt),
    Assign(AssignStmt),
    Expr(ExprStmt),
}

ast_enum!(Statement {
    Variable,
    Function,
    Block,
    If,
    For,
    Loop,
    Return,
    Print,
    When,
    Break,
    Continue,
    Assign,
    Expr,
});

/// A brace-delimited statement list. `scope` is the key of the scope the
/// statements were declared in: a `$block@offset` scope for plain blocks,
/// or the enclosing function or loop scope for bodies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub meta: NodeMeta,
    pub scope: String,
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IfStmt {
    pub meta: NodeMeta,
    pub condition: Expr,
    pub then_branch: Block,
    pub else_branch: Option<ElseBranch>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ElseBranch {
    If(Box<IfStmt>),
    Block(Block),
}

ast_enum!(ElseBranch { If, Block });

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForStmt {
    pub meta: NodeMeta,
    pub variable: Identifier,
    pub iterable: Expr,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoopStmt {
    pub meta: NodeMeta,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnStmt {
    pub meta: NodeMeta,
    pub values: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrintStmt {
    pub meta: NodeMeta,
    pub values: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhenStmt {
    pub meta: NodeMeta,
    pub subject: Expr,
    pub cases: Vec<WhenCase>,
}

/// One arm of a `when`. An `else` arm has no values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhenCase {
    pub meta: NodeMeta,
    pub values: Vec<Expr>,
    pub body: Block,
}

impl WhenCase {
    pub fn is_else(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakStmt {
    pub meta: NodeMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContinueStmt {
    pub meta: NodeMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignStmt {
    pub meta: NodeMeta,
    pub target: Expr,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExprStmt {
    pub meta: NodeMeta,
    pub expr: Expr,
}

ast_node!(
    Block => Block,
    IfStmt => IfStmt,
    ForStmt => ForStmt,
    LoopStmt => LoopStmt,
    ReturnStmt => ReturnStmt,
    PrintStmt => PrintStmt,
    WhenStmt => WhenStmt,
    WhenCase => WhenCase,
    BreakStmt => BreakStmt,
    ContinueStmt => ContinueStmt,
    AssignStmt => AssignStmt,
    ExprStmt => ExprStmt,
);
