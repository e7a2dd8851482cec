//! Statements and blocks.
//!
//! Every block opens a scope. Plain blocks and the branches of `if` and
//! `when` get a `$block@<offset>` scope; a `for` loop's scope holds the
//! loop variable and the body's declarations; a function body is built
//! directly in the function scope.

use crate::Result;
use crate::ast::{
    AssignStmt, Block, BreakStmt, ContinueStmt, ElseBranch, Expr, ExprStmt, ForStmt, Identifier,
    IfStmt, LoopStmt, PrintStmt, ReturnStmt, Statement, WhenCase, WhenStmt,
};
use crate::diagnostics::AnalysisCode;
use crate::parser::{KindSet, SyntaxElement, SyntaxKind, SyntaxNode, kind_sets};

use super::super::infer::Inference;
use super::super::scope::ScopeKind;
use super::super::symbols::{Symbol, VariableSymbol, VariableValue};
use super::super::types::Type;
use super::{AstBuilder, PositionalSlot, SeparatedList, Slot};

const BLOCK_BODY: SeparatedList =
    SeparatedList::body(kind_sets::STATEMENT, AnalysisCode::UnexpectedNode);

const WHEN_BODY: SeparatedList = SeparatedList::body(
    KindSet::single(SyntaxKind::WhenCase),
    AnalysisCode::ExpectedCaseValues,
);

#[derive(Default)]
struct IfParts {
    condition: Option<Expr>,
    then_branch: Option<Block>,
    else_branch: Option<ElseBranch>,
}

#[derive(Default)]
struct ForParts {
    variable: Option<(Identifier, SyntaxElement)>,
    iterable: Option<Expr>,
    body: Option<Block>,
}

#[derive(Default)]
struct WhenParts {
    subject: Option<Expr>,
    cases: Vec<WhenCase>,
}

#[derive(Default)]
struct CaseParts {
    values: Vec<Expr>,
    is_else: bool,
    body: Option<Block>,
}

/// Expressions of a statement plus the element of the first one.
#[derive(Default)]
struct StmtParts {
    exprs: Vec<Expr>,
    first: Option<SyntaxElement>,
    body: Option<Block>,
}

fn push_expr(b: &mut AstBuilder<'_>, parts: &mut StmtParts, expr: &SyntaxElement) -> Result<()> {
    if parts.first.is_none() {
        parts.first = Some(expr.clone());
    }
    parts.exprs.push(b.expr(expr)?);
    Ok(())
}

fn take_expr_list(
    b: &mut AstBuilder<'_>,
    parts: &mut StmtParts,
    list: &SyntaxElement,
) -> Result<()> {
    parts.exprs = b.expr_list(b.node(list)?)?;
    Ok(())
}

/// A loop body, built in the loop's own scope.
fn take_loop_body(
    b: &mut AstBuilder<'_>,
    parts: &mut StmtParts,
    body: &SyntaxElement,
) -> Result<()> {
    let scope = b.scopes.current_scope().name.clone();
    parts.body = Some(b.block_contents(b.node(body)?, scope)?);
    Ok(())
}

impl AstBuilder<'_> {
    /// `{ ... }` in its own block scope.
    pub(super) fn block(&mut self, node: &SyntaxNode) -> Result<Block> {
        let pos = self.pos(&node.clone().into());
        let scope = format!("$block@{}", pos.start);
        self.with_scope(scope.clone(), ScopeKind::Block, pos, |b| {
            b.block_contents(node, scope)
        })
    }

    /// `{ ... }` in the current scope, which is recorded as `scope`.
    pub(super) fn block_contents(&mut self, node: &SyntaxNode, scope: String) -> Result<Block> {
        let meta = self.meta(&node.clone().into());
        let statements = self.match_list(node, &BLOCK_BODY, |b, stmt| b.statement(stmt))?;
        let mut block = Block {
            meta,
            scope,
            statements,
        };
        block.meta.own_all(block.statements.iter_mut());
        Ok(block)
    }

    pub(super) fn if_stmt(&mut self, node: &SyntaxNode) -> Result<IfStmt> {
        let element: SyntaxElement = node.clone().into();
        let meta = self.meta(&element);
        let slots = [
            Slot::token(SyntaxKind::KwIf, AnalysisCode::ExpectedKeyword),
            Slot::required(
                kind_sets::EXPR,
                AnalysisCode::ExpectedCondition,
                |b, parts: &mut IfParts, condition| {
                    parts.condition = Some(b.expr(condition)?);
                    Ok(())
                },
            ),
            Slot::required(
                KindSet::single(SyntaxKind::Block),
                AnalysisCode::ExpectedBlock,
                |b, parts, block| {
                    parts.then_branch = Some(b.block(b.node(block)?)?);
                    Ok(())
                },
            ),
            Slot::optional(KindSet::single(SyntaxKind::ElseClause), |b, parts, clause| {
                parts.else_branch = Some(b.else_clause(b.node(clause)?)?);
                Ok(())
            }),
        ];
        let mut parts = IfParts::default();
        self.match_record(node, &slots, &mut parts)?;
        let mut stmt = IfStmt {
            meta,
            condition: self.filled(parts.condition, &element)?,
            then_branch: self.filled(parts.then_branch, &element)?,
            else_branch: parts.else_branch,
        };
        stmt.meta.own(&mut stmt.condition);
        stmt.meta.own(&mut stmt.then_branch);
        if let Some(branch) = &mut stmt.else_branch {
            stmt.meta.own(branch);
        }
        Ok(stmt)
    }

    /// `else if ...` or `else { ... }`.
    fn else_clause(&mut self, node: &SyntaxNode) -> Result<ElseBranch> {
        let slots = [
            PositionalSlot::required(
                KindSet::single(SyntaxKind::KwElse),
                AnalysisCode::ExpectedKeyword,
                |_, _| Ok(None),
            ),
            PositionalSlot::required(
                KindSet::new(&[SyntaxKind::IfStmt, SyntaxKind::Block]),
                AnalysisCode::ExpectedElseBranch,
                |b, branch| match branch.kind() {
                    SyntaxKind::Block => Ok(Some(ElseBranch::Block(b.block(b.node(branch)?)?))),
                    _ => match b.statement(branch)? {
                        Statement::If(nested) => Ok(Some(ElseBranch::If(Box::new(nested)))),
                        _ => Err(b.unexpected(branch)),
                    },
                },
            ),
        ];
        let branch = self
            .match_positional(node, &slots)?
            .into_iter()
            .flatten()
            .flatten()
            .next();
        self.filled(branch, &node.clone().into())
    }

    /// `for x in xs { ... }`. The loop variable is declared after the
    /// iterable is built, in a `$for@<offset>` scope shared with the body.
    pub(super) fn for_stmt(&mut self, node: &SyntaxNode) -> Result<ForStmt> {
        let element: SyntaxElement = node.clone().into();
        let meta = self.meta(&element);
        let slots = [
            Slot::token(SyntaxKind::KwFor, AnalysisCode::ExpectedKeyword),
            Slot::required(
                KindSet::single(SyntaxKind::Id),
                AnalysisCode::ExpectedLoopVariable,
                |b, parts: &mut ForParts, name| {
                    parts.variable = Some((b.identifier(name), name.clone()));
                    Ok(())
                },
            ),
            Slot::token(SyntaxKind::KwIn, AnalysisCode::ExpectedKeyword),
            Slot::required(
                kind_sets::EXPR,
                AnalysisCode::ExpectedIterable,
                |b, parts, iterable| {
                    parts.iterable = Some(b.expr(iterable)?);
                    Ok(())
                },
            ),
            Slot::required(
                KindSet::single(SyntaxKind::Block),
                AnalysisCode::ExpectedBlock,
                |b, parts, body| {
                    if let (Some((variable, at)), Some(iterable)) =
                        (&parts.variable, &parts.iterable)
                    {
                        let symbol = Symbol::Variable(VariableSymbol {
                            pos: variable.meta.pos,
                            node: variable.meta.id,
                            mutable: false,
                            declared_type: None,
                            value: Some(VariableValue::Iterated(iterable.clone())),
                        });
                        b.scopes
                            .insert(variable.name.clone(), symbol)
                            .map_err(|err| b.symbol_error(err, Some(at)))?;
                    }
                    let scope = b.scopes.current_scope().name.clone();
                    parts.body = Some(b.block_contents(b.node(body)?, scope)?);
                    Ok(())
                },
            ),
        ];
        let mut parts = ForParts::default();
        let scope = format!("$for@{}", meta.pos.start);
        self.with_scope(scope, ScopeKind::Loop, meta.pos, |b| {
            b.match_record(node, &slots, &mut parts)
        })?;

        let (variable, _) = self.filled(parts.variable, &element)?;
        let mut stmt = ForStmt {
            meta,
            variable,
            iterable: self.filled(parts.iterable, &element)?,
            body: self.filled(parts.body, &element)?,
        };
        stmt.meta.own(&mut stmt.variable);
        stmt.meta.own(&mut stmt.iterable);
        stmt.meta.own(&mut stmt.body);
        Ok(stmt)
    }

    pub(super) fn loop_stmt(&mut self, node: &SyntaxNode) -> Result<LoopStmt> {
        let element: SyntaxElement = node.clone().into();
        let meta = self.meta(&element);
        let slots = [
            Slot::token(SyntaxKind::KwLoop, AnalysisCode::ExpectedKeyword),
            Slot::required(
                KindSet::single(SyntaxKind::Block),
                AnalysisCode::ExpectedBlock,
                take_loop_body,
            ),
        ];
        let mut parts = StmtParts::default();
        let scope = format!("$loop@{}", meta.pos.start);
        self.with_scope(scope, ScopeKind::Loop, meta.pos, |b| {
            b.match_record(node, &slots, &mut parts)
        })?;
        let mut stmt = LoopStmt {
            meta,
            body: self.filled(parts.body, &element)?,
        };
        stmt.meta.own(&mut stmt.body);
        Ok(stmt)
    }

    pub(super) fn return_stmt(&mut self, node: &SyntaxNode) -> Result<ReturnStmt> {
        let meta = self.meta(&node.clone().into());
        let slots = [
            Slot::token(SyntaxKind::KwReturn, AnalysisCode::ExpectedKeyword),
            Slot::optional(KindSet::single(SyntaxKind::ExprList), take_expr_list),
            Slot::token(SyntaxKind::Semicolon, AnalysisCode::ExpectedSemicolon),
        ];
        let mut parts = StmtParts::default();
        self.match_record(node, &slots, &mut parts)?;
        self.record_return(&parts.exprs);
        let mut stmt = ReturnStmt {
            meta,
            values: parts.exprs,
        };
        stmt.meta.own_all(stmt.values.iter_mut());
        Ok(stmt)
    }

    /// The first `return` with values in a function body fixes the
    /// function's inferred return types. A value without exactly one
    /// candidate type leaves them unknown.
    fn record_return(&mut self, values: &[Expr]) {
        if values.is_empty() || !matches!(self.return_frames.last(), Some(None)) {
            return;
        }
        let scope = self.scopes.current();
        let mut inference = Inference::new(&self.scopes);
        let types: Option<Vec<Type>> = values
            .iter()
            .map(|value| inference.infer(scope, value).only().cloned())
            .collect();
        if let Some(frame) = self.return_frames.last_mut() {
            *frame = Some(types.unwrap_or_default());
        }
    }

    pub(super) fn print_stmt(&mut self, node: &SyntaxNode) -> Result<PrintStmt> {
        let meta = self.meta(&node.clone().into());
        let slots = [
            Slot::token(SyntaxKind::KwPrint, AnalysisCode::ExpectedKeyword),
            Slot::required(
                KindSet::single(SyntaxKind::ExprList),
                AnalysisCode::ExpectedExpression,
                take_expr_list,
            ),
            Slot::token(SyntaxKind::Semicolon, AnalysisCode::ExpectedSemicolon),
        ];
        let mut parts = StmtParts::default();
        self.match_record(node, &slots, &mut parts)?;
        let mut stmt = PrintStmt {
            meta,
            values: parts.exprs,
        };
        stmt.meta.own_all(stmt.values.iter_mut());
        Ok(stmt)
    }

    pub(super) fn when_stmt(&mut self, node: &SyntaxNode) -> Result<WhenStmt> {
        let element: SyntaxElement = node.clone().into();
        let meta = self.meta(&element);
        let slots = [
            Slot::token(SyntaxKind::KwWhen, AnalysisCode::ExpectedKeyword),
            Slot::required(
                kind_sets::EXPR,
                AnalysisCode::ExpectedExpression,
                |b, parts: &mut WhenParts, subject| {
                    parts.subject = Some(b.expr(subject)?);
                    Ok(())
                },
            ),
            Slot::required(
                KindSet::single(SyntaxKind::WhenBody),
                AnalysisCode::ExpectedBlock,
                |b, parts, body| {
                    let body = b.node(body)?;
                    parts.cases =
                        b.match_list(body, &WHEN_BODY, |b, case| b.when_case(b.node(case)?))?;
                    Ok(())
                },
            ),
        ];
        let mut parts = WhenParts::default();
        self.match_record(node, &slots, &mut parts)?;
        let mut stmt = WhenStmt {
            meta,
            subject: self.filled(parts.subject, &element)?,
            cases: parts.cases,
        };
        stmt.meta.own(&mut stmt.subject);
        stmt.meta.own_all(stmt.cases.iter_mut());
        Ok(stmt)
    }

    /// `a, b => { ... }` or `else => { ... }`.
    fn when_case(&mut self, node: &SyntaxNode) -> Result<WhenCase> {
        let element: SyntaxElement = node.clone().into();
        let meta = self.meta(&element);
        let slots = [
            Slot::optional(
                KindSet::single(SyntaxKind::ExprList),
                |b, parts: &mut CaseParts, list| {
                    parts.values = b.expr_list(b.node(list)?)?;
                    Ok(())
                },
            ),
            Slot::optional(KindSet::single(SyntaxKind::KwElse), |_, parts, _| {
                parts.is_else = true;
                Ok(())
            }),
            Slot::token(SyntaxKind::FatArrow, AnalysisCode::ExpectedDelimiter),
            Slot::required(
                KindSet::single(SyntaxKind::Block),
                AnalysisCode::ExpectedBlock,
                |b, parts, body| {
                    parts.body = Some(b.block(b.node(body)?)?);
                    Ok(())
                },
            ),
        ];
        let mut parts = CaseParts::default();
        self.match_record(node, &slots, &mut parts)?;
        if parts.values.is_empty() != parts.is_else {
            let found = match parts.is_else {
                true => "both values and `else`",
                false => "`=>`",
            };
            return Err(self.analysis_error(AnalysisCode::ExpectedCaseValues, &element, found));
        }
        let mut case = WhenCase {
            meta,
            values: parts.values,
            body: self.filled(parts.body, &element)?,
        };
        case.meta.own_all(case.values.iter_mut());
        case.meta.own(&mut case.body);
        Ok(case)
    }

    pub(super) fn break_stmt(&mut self, node: &SyntaxNode) -> Result<BreakStmt> {
        let meta = self.meta(&node.clone().into());
        self.keyword_stmt(node, SyntaxKind::KwBreak)?;
        Ok(BreakStmt { meta })
    }

    pub(super) fn continue_stmt(&mut self, node: &SyntaxNode) -> Result<ContinueStmt> {
        let meta = self.meta(&node.clone().into());
        self.keyword_stmt(node, SyntaxKind::KwContinue)?;
        Ok(ContinueStmt { meta })
    }

    /// `keyword ;`
    fn keyword_stmt(&mut self, node: &SyntaxNode, keyword: SyntaxKind) -> Result<()> {
        let slots = [
            Slot::token(keyword, AnalysisCode::ExpectedKeyword),
            Slot::token(SyntaxKind::Semicolon, AnalysisCode::ExpectedSemicolon),
        ];
        self.match_record(node, &slots, &mut ())
    }

    /// `target = value;`. Only names, members and indexed elements can be
    /// assigned to.
    pub(super) fn assign_stmt(&mut self, node: &SyntaxNode) -> Result<AssignStmt> {
        let element: SyntaxElement = node.clone().into();
        let meta = self.meta(&element);
        let slots = [
            Slot::required(kind_sets::EXPR, AnalysisCode::ExpectedExpression, push_expr),
            Slot::token(SyntaxKind::Equals, AnalysisCode::ExpectedDelimiter),
            Slot::required(
                kind_sets::EXPR,
                AnalysisCode::ExpectedAssignmentValue,
                push_expr,
            ),
            Slot::token(SyntaxKind::Semicolon, AnalysisCode::ExpectedSemicolon),
        ];
        let mut parts = StmtParts::default();
        self.match_record(node, &slots, &mut parts)?;
        let target_at = self.filled(parts.first, &element)?;
        let [target, value] = <[Expr; 2]>::try_from(parts.exprs)
            .map_err(|_| self.unexpected(&element))?;
        if !matches!(target, Expr::Name(_) | Expr::Member(_) | Expr::Index(_)) {
            return Err(self.analysis_error(
                AnalysisCode::InvalidAssignmentTarget,
                &target_at,
                target_at.kind().describe(),
            ));
        }
        let mut stmt = AssignStmt {
            meta,
            target,
            value,
        };
        stmt.meta.own(&mut stmt.target);
        stmt.meta.own(&mut stmt.value);
        Ok(stmt)
    }

    pub(super) fn expr_stmt(&mut self, node: &SyntaxNode) -> Result<ExprStmt> {
        let element: SyntaxElement = node.clone().into();
        let meta = self.meta(&element);
        let slots = [
            Slot::required(kind_sets::EXPR, AnalysisCode::ExpectedExpression, push_expr),
            Slot::token(SyntaxKind::Semicolon, AnalysisCode::ExpectedSemicolon),
        ];
        let mut parts = StmtParts::default();
        self.match_record(node, &slots, &mut parts)?;
        let expr = parts.exprs.pop();
        let mut stmt = ExprStmt {
            meta,
            expr: self.filled(expr, &element)?,
        };
        stmt.meta.own(&mut stmt.expr);
        Ok(stmt)
    }
}
