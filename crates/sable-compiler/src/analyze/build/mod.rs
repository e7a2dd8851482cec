//! CST → AST building.
//!
//! [`AstBuilder`] walks the CST top-down and produces AST nodes bottom-up.
//! Every CST node kind is routed by one exhaustive match in
//! [`AstBuilder::dispatch`]; builders then use the structural matcher to
//! pick their children apart. Scopes and symbols are created on the way:
//! whenever a builder opens a scope it also closes it, on the error path too,
//! so a failed build leaves the cursor at the root.

mod expressions;
mod items;
mod literals;
mod matcher;
mod statements;
mod types;

#[cfg(test)]
mod build_tests;
#[cfg(test)]
mod matcher_tests;

use rowan::{NodeOrToken, TextRange};
use tracing::debug;

use sable_core::{LineIndex, Position};

use crate::ast::{Declaration, Expr, Identifier, NodeId, NodeMeta, Program, Statement, TypeExpr};
use crate::diagnostics::{AnalysisCode, Diagnostic, SemanticCode, SymbolCode};
use crate::parser::{SyntaxElement, SyntaxKind, SyntaxNode};
use crate::{Error, Result};

use super::scope::{ScopeKind, ScopeTree, SymbolError};
use super::types::Type;

pub use matcher::{
    PositionalSlot, Requirement, SeparatedList, Slot, SlotAutomaton, SlotSpec, Step,
    significant_children,
};

/// Default nesting bound of the parser and the builder. Must fit a 2 MiB
/// thread stack in debug builds.
pub const DEFAULT_RECURSION_FUEL: u32 = 256;

#[derive(Debug, Clone, Copy)]
pub struct BuildOptions {
    /// Maximum nesting depth of dispatched nodes. `None` is unbounded.
    pub recursion_fuel: Option<u32>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            recursion_fuel: Some(DEFAULT_RECURSION_FUEL),
        }
    }
}

/// What a dispatched CST node turned into.
#[derive(Debug)]
pub(crate) enum Built {
    Declaration(Box<Declaration>),
    Statement(Box<Statement>),
    Expr(Expr),
    Type(TypeExpr),
}

pub struct AstBuilder<'src> {
    source: &'src str,
    lines: LineIndex,
    scopes: ScopeTree,
    next_id: u32,
    anon_counter: u32,
    /// Type parameter names of the enclosing generic declarations.
    type_params: Vec<Vec<String>>,
    /// One entry per enclosing function body: the return types taken from
    /// its first `return` with values, once seen.
    return_frames: Vec<Option<Vec<Type>>>,
    depth: u32,
    recursion_fuel: Option<u32>,
}

impl<'src> AstBuilder<'src> {
    pub fn new(source: &'src str, options: &BuildOptions) -> Self {
        Self {
            source,
            lines: LineIndex::new(source),
            scopes: ScopeTree::new(),
            next_id: 0,
            anon_counter: 0,
            type_params: Vec::new(),
            return_frames: Vec::new(),
            depth: 0,
            recursion_fuel: options.recursion_fuel,
        }
    }

    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    pub fn into_scopes(self) -> ScopeTree {
        self.scopes
    }

    /// Builds the program under `root`.
    pub fn build_program(&mut self, root: &SyntaxNode) -> Result<Program> {
        let element: SyntaxElement = root.clone().into();
        let mut program = Program {
            meta: self.meta(&element),
            declarations: Vec::new(),
        };
        let list = SeparatedList {
            open: None,
            close: None,
            separator: None,
            items: crate::parser::kind_sets::DECLARATION,
            code: AnalysisCode::UnexpectedNode,
        };
        let declarations = self.match_list(root, &list, |b, child| b.declaration(child));
        let mut declarations = declarations.inspect_err(|err| {
            debug!(code = err.code().unwrap_or("-"), "build aborted");
        })?;
        program.meta.own_all(declarations.iter_mut());
        program.declarations = declarations;
        debug!(
            declarations = program.declarations.len(),
            nodes = self.next_id,
            scopes = self.scopes.len(),
            "built ast"
        );
        Ok(program)
    }

    /// Routes a CST element to the builder for its kind.
    pub(crate) fn dispatch(&mut self, element: &SyntaxElement) -> Result<Built> {
        self.depth += 1;
        let built = match self.recursion_fuel {
            Some(limit) if self.depth > limit => Err(Error::RecursionLimitExceeded),
            _ => self.dispatch_kind(element),
        };
        self.depth -= 1;
        built
    }

    /// Each category is routed by its own function so that one nesting
    /// level only pays for the frame of its own category.
    fn dispatch_kind(&mut self, element: &SyntaxElement) -> Result<Built> {
        use SyntaxKind::*;

        let NodeOrToken::Node(node) = element else {
            return Err(self.unexpected(element));
        };
        match node.kind() {
            FunctionDecl | ClassDecl | EnumDecl | InterfaceDecl | VariableDecl => self
                .declaration_node(node)
                .map(|decl| Built::Declaration(Box::new(decl))),

            Block | IfStmt | ForStmt | LoopStmt | ReturnStmt | PrintStmt | WhenStmt
            | BreakStmt | ContinueStmt | AssignStmt | ExprStmt => self
                .statement_node(node)
                .map(|stmt| Built::Statement(Box::new(stmt))),

            TernaryExpr | BinaryExpr | UnaryExpr | CallExpr | MemberExpr | IndexExpr
            | ParenExpr | TupleExpr | ArrayExpr | ObjectExpr | Literal | NameRef
            | AnonFunction => self.expr_node(node).map(Built::Expr),

            PrimitiveType | NumberType | NamedType | InstanceType | FunctionType
            | ArrayType => self.type_node(node).map(Built::Type),

            Error => Err(self.analysis_error(
                AnalysisCode::UnsupportedSyntax,
                element,
                node.text().to_string().trim(),
            )),

            // Parts of a larger construct, only reached through their owner.
            Root | TypeParamList | TypeParam | ParamList | Param | ReturnTypes | ClassBody
            | EnumBody | EnumMember | InterfaceBody | InterfaceMember | TargetList
            | VariableTarget | ExprList | ElseClause | WhenBody | WhenCase | ArgList
            | TypeArgList | ObjectField | TypeList => Err(self.unexpected(element)),

            // Tokens never appear as nodes.
            ParenOpen | ParenClose | BracketOpen | BracketClose | BraceOpen | BraceClose
            | TypeArgsOpen | TypeArgsClose | Comma | Semicolon | Colon | Dot | Ellipsis | Arrow
            | FatArrow | Question | Equals | Plus | Minus | Star | Slash | Percent | Exp | EqEq
            | NotEq | Lt | LtEq | Gt | GtEq | AndAnd | OrOr | Bang | PlusPlus | MinusMinus
            | KwF | KwClass | KwEnum | KwInterface | KwConst | KwLet | KwIf | KwElse | KwFor
            | KwIn | KwLoop | KwReturn | KwPrint | KwWhen | KwBreak | KwContinue | KwTrue
            | KwFalse | PrimitiveName | NumberName | Number | StringLit | PathLit | RegexLit
            | Id | Whitespace | Newline | LineComment | BlockComment | Garbage | __LAST => {
                Err(self.unexpected(element))
            }
        }
    }

    fn declaration_node(&mut self, node: &SyntaxNode) -> Result<Declaration> {
        match node.kind() {
            SyntaxKind::FunctionDecl => self.function_decl(node).map(Declaration::Function),
            SyntaxKind::ClassDecl => self.class_decl(node).map(Declaration::Class),
            SyntaxKind::EnumDecl => self.enum_decl(node).map(Declaration::Enum),
            SyntaxKind::InterfaceDecl => self.interface_decl(node).map(Declaration::Interface),
            SyntaxKind::VariableDecl => self.variable_decl(node).map(Declaration::Variable),
            _ => Err(self.unexpected(&node.clone().into())),
        }
    }

    fn statement_node(&mut self, node: &SyntaxNode) -> Result<Statement> {
        use SyntaxKind::*;

        match node.kind() {
            Block => self.block(node).map(Statement::Block),
            IfStmt => self.if_stmt(node).map(Statement::If),
            ForStmt => self.for_stmt(node).map(Statement::For),
            LoopStmt => self.loop_stmt(node).map(Statement::Loop),
            ReturnStmt => self.return_stmt(node).map(Statement::Return),
            PrintStmt => self.print_stmt(node).map(Statement::Print),
            WhenStmt => self.when_stmt(node).map(Statement::When),
            BreakStmt => self.break_stmt(node).map(Statement::Break),
            ContinueStmt => self.continue_stmt(node).map(Statement::Continue),
            AssignStmt => self.assign_stmt(node).map(Statement::Assign),
            ExprStmt => self.expr_stmt(node).map(Statement::Expr),
            _ => Err(self.unexpected(&node.clone().into())),
        }
    }

    fn expr_node(&mut self, node: &SyntaxNode) -> Result<Expr> {
        use SyntaxKind::*;

        match node.kind() {
            TernaryExpr => self.ternary_expr(node),
            BinaryExpr => self.binary_expr(node),
            UnaryExpr => self.unary_expr(node),
            CallExpr => self.call_expr(node),
            MemberExpr => self.member_expr(node),
            IndexExpr => self.index_expr(node),
            ParenExpr => self.paren_expr(node),
            TupleExpr => self.tuple_expr(node),
            ArrayExpr => self.array_expr(node),
            ObjectExpr => self.object_expr(node),
            Literal => self.literal(node),
            NameRef => self.name_ref(node),
            AnonFunction => self.anon_function(node),
            _ => Err(self.unexpected(&node.clone().into())),
        }
    }

    fn type_node(&mut self, node: &SyntaxNode) -> Result<TypeExpr> {
        use SyntaxKind::*;

        match node.kind() {
            PrimitiveType => self.primitive_type(node),
            NumberType => self.number_type(node),
            NamedType => self.named_type(node),
            InstanceType => self.instance_type(node),
            FunctionType => self.function_type(node),
            ArrayType => self.array_type(node),
            _ => Err(self.unexpected(&node.clone().into())),
        }
    }

    pub(crate) fn declaration(&mut self, element: &SyntaxElement) -> Result<Declaration> {
        match self.dispatch(element)? {
            Built::Declaration(decl) => Ok(*decl),
            _ => Err(self.unexpected(element)),
        }
    }

    pub(crate) fn statement(&mut self, element: &SyntaxElement) -> Result<Statement> {
        match self.dispatch(element)? {
            Built::Statement(stmt) => Ok(*stmt),
            Built::Declaration(decl) => match *decl {
                Declaration::Function(func) => Ok(Statement::Function(func)),
                Declaration::Variable(decl) => Ok(Statement::Variable(decl)),
                _ => Err(self.unexpected(element)),
            },
            _ => Err(self.unexpected(element)),
        }
    }

    pub(crate) fn expr(&mut self, element: &SyntaxElement) -> Result<Expr> {
        match self.dispatch(element)? {
            Built::Expr(expr) => Ok(expr),
            _ => Err(self.unexpected(element)),
        }
    }

    pub(crate) fn type_expr(&mut self, element: &SyntaxElement) -> Result<TypeExpr> {
        match self.dispatch(element)? {
            Built::Type(ty) => Ok(ty),
            _ => Err(self.unexpected(element)),
        }
    }

    /// Allocates the next node id, in pre-order.
    pub(crate) fn meta(&mut self, element: &SyntaxElement) -> NodeMeta {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        NodeMeta::new(id, self.pos(element))
    }

    pub(crate) fn identifier(&mut self, element: &SyntaxElement) -> Identifier {
        let meta = self.meta(element);
        Identifier::new(meta, literals::token_text(element))
    }

    /// The element as a node. Slots that accept node kinds only ever
    /// receive nodes.
    pub(crate) fn node<'e>(&self, element: &'e SyntaxElement) -> Result<&'e SyntaxNode> {
        element.as_node().ok_or_else(|| self.unexpected(element))
    }

    /// A part the matcher has already proven present.
    pub(crate) fn filled<T>(&self, part: Option<T>, element: &SyntaxElement) -> Result<T> {
        part.ok_or_else(|| self.unexpected(element))
    }

    /// Position of the element without its leading or trailing trivia.
    pub(crate) fn pos(&self, element: &SyntaxElement) -> Position {
        let range = significant_range(element);
        self.lines
            .position(u32::from(range.start()), u32::from(range.end()))
    }

    /// Runs `f` inside a new child scope, exiting it whatever `f` returns.
    pub(crate) fn with_scope<T>(
        &mut self,
        name: impl Into<String>,
        kind: ScopeKind,
        pos: Position,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.scopes.create_child(name, kind, pos);
        let result = f(self);
        let exited = self.scopes.exit();
        let value = result?;
        exited.map_err(|err| self.symbol_error(err, None))?;
        Ok(value)
    }

    /// Runs `f` with `names` visible as type parameters.
    pub(crate) fn with_type_params<T>(
        &mut self,
        names: Vec<String>,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.type_params.push(names);
        let result = f(self);
        self.type_params.pop();
        result
    }

    pub(crate) fn is_type_param(&self, name: &str) -> bool {
        self.type_params
            .iter()
            .any(|frame| frame.iter().any(|param| param == name))
    }

    /// Unique scope name for the next anonymous function.
    pub(crate) fn next_anon_scope(&mut self) -> String {
        let name = format!("$anon:{}", self.anon_counter);
        self.anon_counter += 1;
        name
    }

    pub(crate) fn analysis_error(
        &self,
        code: AnalysisCode,
        element: &SyntaxElement,
        detail: impl AsRef<str>,
    ) -> Error {
        Error::Analysis(
            Diagnostic::new(code)
                .detail(detail)
                .at_cst(element.kind(), self.pos(element))
                .with_source(self.source, &self.lines),
        )
    }

    pub(crate) fn unexpected(&self, element: &SyntaxElement) -> Error {
        self.analysis_error(
            AnalysisCode::UnexpectedNode,
            element,
            element.kind().describe(),
        )
    }

    pub(crate) fn semantic_error(
        &self,
        code: SemanticCode,
        element: &SyntaxElement,
        detail: impl AsRef<str>,
    ) -> Error {
        Error::Semantic(
            Diagnostic::new(code)
                .detail(detail)
                .at_cst(element.kind(), self.pos(element))
                .with_source(self.source, &self.lines),
        )
    }

    /// Converts a scope tree failure into a located error. A duplicate name
    /// is a user error and surfaces as the semantic code of the same name.
    pub(crate) fn symbol_error(&self, err: SymbolError, at: Option<&SyntaxElement>) -> Error {
        let code = match &err {
            SymbolError::DuplicateIdentifier(name) => {
                let diagnostic = Diagnostic::new(SemanticCode::DuplicateIdentifier).detail(name);
                return Error::Semantic(self.locate(diagnostic, at));
            }
            SymbolError::ScopeNotFound(_) => SymbolCode::ScopeNotFound,
            SymbolError::AtRoot => SymbolCode::ExitAtRoot,
            SymbolError::SymbolNotFound(_) => SymbolCode::SymbolNotFound,
            SymbolError::KindMismatch { .. } => SymbolCode::SymbolKindMismatch,
        };
        let diagnostic = match err {
            SymbolError::ScopeNotFound(name) | SymbolError::SymbolNotFound(name) => {
                Diagnostic::new(code).detail(name)
            }
            SymbolError::KindMismatch { .. } => Diagnostic::new(code).detail(err.to_string()),
            SymbolError::AtRoot | SymbolError::DuplicateIdentifier(_) => Diagnostic::new(code),
        };
        Error::Symbol(self.locate(diagnostic, at))
    }

    fn locate<C: crate::diagnostics::ErrorCode>(
        &self,
        diagnostic: Diagnostic<C>,
        at: Option<&SyntaxElement>,
    ) -> Diagnostic<C> {
        match at {
            Some(element) => diagnostic
                .at_cst(element.kind(), self.pos(element))
                .with_source(self.source, &self.lines),
            None => diagnostic,
        }
    }
}

/// Range from the first to the last non-trivia token of an element.
fn significant_range(element: &SyntaxElement) -> TextRange {
    let node = match element {
        NodeOrToken::Token(token) => return token.text_range(),
        NodeOrToken::Node(node) => node,
    };
    let mut tokens = node
        .descendants_with_tokens()
        .filter_map(NodeOrToken::into_token)
        .filter(|token| !token.kind().is_trivia());
    let Some(first) = tokens.next() else {
        return node.text_range();
    };
    let end = tokens
        .last()
        .map_or(first.text_range().end(), |last| last.text_range().end());
    TextRange::new(first.text_range().start(), end)
}

/// Text of the first `Id` token directly under `node`.
pub(crate) fn first_id(node: &SyntaxNode) -> Option<String> {
    node.children_with_tokens()
        .filter_map(NodeOrToken::into_token)
        .find(|token| token.kind() == SyntaxKind::Id)
        .map(|token| token.text().to_owned())
}
