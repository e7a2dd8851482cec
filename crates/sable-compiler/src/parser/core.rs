//! Token cursor and tree-building primitives shared by the grammar.
//!
//! Trivia is never consumed on purpose: the cursor steps over it, and the
//! skipped run is written into the tree right before the next node or token
//! so comments and whitespace end up as leading trivia.

use rowan::{Checkpoint, GreenNodeBuilder, TextRange, TextSize};
use sable_core::LineIndex;

use super::cst::{KindSet, SyntaxKind, SyntaxNode};
use super::lexer::{Token, token_text};
use crate::Error;
use crate::diagnostics::{Diagnostics, SyntaxCode};

/// Lookaheads allowed between two consumed tokens before the grammar is
/// considered stuck in a loop.
const LOOKAHEAD_LIMIT: u32 = 256;

#[derive(Debug)]
pub struct ParseResult {
    pub root: SyntaxNode,
    pub diagnostics: Diagnostics,
    pub exec_fuel_consumed: u32,
}

/// Token and nesting budgets of one parse.
#[derive(Debug, Default)]
struct Fuel {
    exec_limit: Option<u32>,
    exec_used: u32,
    depth_limit: Option<u32>,
    depth: u32,
    exhausted: Option<Error>,
}

impl Fuel {
    /// Charges one consumed token.
    fn tick(&mut self) {
        match self.exec_limit {
            Some(limit) if self.exec_used >= limit => self.exhaust(Error::ExecFuelExhausted),
            _ => self.exec_used += 1,
        }
    }

    fn descend(&mut self) -> bool {
        if let Some(limit) = self.depth_limit
            && self.depth >= limit
        {
            self.exhaust(Error::RecursionLimitExceeded);
            return false;
        }
        self.depth += 1;
        true
    }

    fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// The first exhausted budget wins.
    fn exhaust(&mut self, error: Error) {
        if self.exhausted.is_none() {
            self.exhausted = Some(error);
        }
    }
}

pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    /// Next token to look at.
    pos: usize,
    /// Tokens before this index are already in the tree.
    emitted: usize,
    builder: GreenNodeBuilder<'static>,
    diagnostics: Diagnostics,
    lines: LineIndex,
    fuel: Fuel,
    /// Offset of the last report; one token gets at most one diagnostic.
    last_report: Option<TextSize>,
    lookaheads: u32,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, tokens: Vec<Token>) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
            emitted: 0,
            builder: GreenNodeBuilder::new(),
            diagnostics: Diagnostics::new(),
            lines: LineIndex::new(source),
            fuel: Fuel::default(),
            last_report: None,
            lookaheads: LOOKAHEAD_LIMIT,
        }
    }

    pub fn with_exec_fuel(mut self, limit: Option<u32>) -> Self {
        self.fuel.exec_limit = limit;
        self
    }

    pub fn with_recursion_fuel(mut self, limit: Option<u32>) -> Self {
        self.fuel.depth_limit = limit;
        self
    }

    pub fn parse(mut self) -> Result<ParseResult, Error> {
        self.parse_root();
        if let Some(err) = self.fuel.exhausted {
            return Err(err);
        }
        Ok(ParseResult {
            root: SyntaxNode::new_root(self.builder.finish()),
            diagnostics: self.diagnostics,
            exec_fuel_consumed: self.fuel.exec_used,
        })
    }

    /// Kind of the current significant token, `Error` at end of input.
    pub(super) fn current(&mut self) -> SyntaxKind {
        self.skip_trivia();
        assert!(
            self.lookaheads > 0,
            "sable grammar looped without consuming input at token {}",
            self.pos
        );
        self.lookaheads -= 1;
        self.tokens
            .get(self.pos)
            .map_or(SyntaxKind::Error, |token| token.kind)
    }

    fn current_text(&mut self) -> &'src str {
        self.skip_trivia();
        self.tokens
            .get(self.pos)
            .map_or("", |token| token_text(self.source, token))
    }

    pub(super) fn at_end(&mut self) -> bool {
        self.skip_trivia();
        self.pos >= self.tokens.len()
    }

    /// End of input, or a budget ran out.
    pub(super) fn should_stop(&mut self) -> bool {
        self.at_end() || self.fuel.exhausted.is_some()
    }

    pub(super) fn currently_is(&mut self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    pub(super) fn currently_is_one_of(&mut self, set: KindSet) -> bool {
        !self.at_end() && set.contains(self.current())
    }

    /// Whether the significant token after the current one is `kind`.
    pub(super) fn next_is(&mut self, kind: SyntaxKind) -> bool {
        self.skip_trivia();
        self.tokens[self.pos..]
            .iter()
            .map(|token| token.kind)
            .filter(|next| !next.is_trivia())
            .nth(1)
            == Some(kind)
    }

    fn skip_trivia(&mut self) {
        while self
            .tokens
            .get(self.pos)
            .is_some_and(|token| token.kind.is_trivia())
        {
            self.pos += 1;
        }
    }

    /// Writes the trivia stepped over since the last token into the tree.
    pub(super) fn flush_trivia(&mut self) {
        for token in &self.tokens[self.emitted..self.pos] {
            self.builder
                .token(token.kind.into(), token_text(self.source, token));
        }
        self.emitted = self.pos;
    }

    pub(super) fn start_node(&mut self, kind: SyntaxKind) {
        self.flush_trivia();
        self.builder.start_node(kind.into());
    }

    pub(super) fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    pub(super) fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    pub(super) fn checkpoint(&mut self) -> Checkpoint {
        self.flush_trivia();
        self.builder.checkpoint()
    }

    pub(super) fn bump(&mut self) {
        self.skip_trivia();
        assert!(
            self.pos < self.tokens.len(),
            "sable grammar consumed past the end of input"
        );
        self.fuel.tick();
        self.lookaheads = LOOKAHEAD_LIMIT;
        self.flush_trivia();
        let token = self.tokens[self.pos];
        self.builder
            .token(token.kind.into(), token_text(self.source, &token));
        self.pos += 1;
        self.emitted = self.pos;
    }

    /// Bumps the token a production was entered on.
    pub(super) fn bump_expected(&mut self, kind: SyntaxKind) {
        let found = self.current();
        assert_eq!(
            found, kind,
            "sable grammar entered a `{kind:?}` production at `{found:?}`"
        );
        self.bump();
    }

    pub(super) fn eat_token(&mut self, kind: SyntaxKind) -> bool {
        let matched = self.currently_is(kind);
        if matched {
            self.bump();
        }
        matched
    }

    /// Reports a missing `kind` without consuming anything.
    pub(super) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat_token(kind) {
            return true;
        }
        let found = self.found();
        self.error_msg(
            SyntaxCode::ExpectedToken,
            format!("{}, found {found}", kind.describe()),
        );
        false
    }

    /// Bumps an identifier, or reports `what` as missing.
    pub(super) fn expect_id(&mut self, what: &str) -> bool {
        if self.eat_token(SyntaxKind::Id) {
            return true;
        }
        self.error_msg(SyntaxCode::ExpectedIdentifier, what);
        false
    }

    /// The current token as it reads in "found ..." messages.
    pub(super) fn found(&mut self) -> String {
        if self.at_end() {
            return "end of input".to_owned();
        }
        format!("`{}`", self.current_text())
    }

    pub(super) fn error_msg(&mut self, code: SyntaxCode, message: impl AsRef<str>) {
        let kind = self.current();
        let span = self.tokens.get(self.pos).map_or_else(
            || TextRange::empty(TextSize::of(self.source)),
            |token| token.span,
        );
        if self.last_report.replace(span.start()) == Some(span.start()) {
            return;
        }
        let pos = self
            .lines
            .position(span.start().into(), span.end().into());
        self.diagnostics
            .report(code, kind, pos)
            .message(message)
            .emit();
    }

    fn report_unexpected(&mut self, expected: &str) {
        let found = self.found();
        self.error_msg(
            SyntaxCode::UnexpectedToken,
            format!("{found}, expected {expected}"),
        );
    }

    /// Reports the current token and wraps it in an `Error` node.
    pub(super) fn error_and_bump(&mut self, expected: &str) {
        if self.currently_is(SyntaxKind::Garbage) {
            let text = self.current_text();
            self.error_msg(SyntaxCode::InvalidCharacters, text);
        } else {
            self.report_unexpected(expected);
        }
        if !self.at_end() {
            self.start_node(SyntaxKind::Error);
            self.bump();
            self.finish_node();
        }
    }

    /// Reports, then skips into an `Error` node until a `recovery` token.
    pub(super) fn error_recover(&mut self, expected: &str, recovery: KindSet) {
        self.report_unexpected(expected);
        if self.currently_is_one_of(recovery) || self.should_stop() {
            return;
        }
        self.start_node(SyntaxKind::Error);
        while !self.currently_is_one_of(recovery) && !self.should_stop() {
            self.bump();
        }
        self.finish_node();
    }

    pub(super) fn enter_recursion(&mut self) -> bool {
        self.lookaheads = LOOKAHEAD_LIMIT;
        self.fuel.descend()
    }

    pub(super) fn exit_recursion(&mut self) {
        self.lookaheads = LOOKAHEAD_LIMIT;
        self.fuel.ascend();
    }
}
