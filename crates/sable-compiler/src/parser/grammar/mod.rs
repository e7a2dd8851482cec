//! Grammar productions.
//!
//! Every production leaves the tree well-nested: it starts and finishes its own
//! node even when input is missing, and reports rather than consumes what it
//! does not recognize.

mod expressions;
mod items;
mod statements;
mod types;

use super::core::Parser;
use super::cst::{KindSet, SyntaxKind, kind_sets};

impl Parser<'_> {
    pub(crate) fn parse_root(&mut self) {
        self.start_node(SyntaxKind::Root);
        while !self.should_stop() {
            if self.currently_is_one_of(kind_sets::DECLARATION_FIRST) {
                self.declaration();
            } else {
                self.error_recover("a declaration", kind_sets::ROOT_RECOVERY);
            }
        }
        self.flush_trivia();
        self.finish_node();
    }

    /// `item (, item)* ,?` up to `close`, which is left for the caller.
    pub(super) fn separated(&mut self, close: SyntaxKind, first: KindSet, item: fn(&mut Self)) {
        while !self.should_stop() && !self.currently_is(close) {
            if self.currently_is_one_of(first) {
                item(self);
                if !self.eat_token(SyntaxKind::Comma) {
                    break;
                }
                continue;
            }
            if self.currently_is_one_of(kind_sets::LIST_RECOVERY) {
                break;
            }
            self.error_and_bump(close.describe());
        }
    }

    /// `(` items `)` wrapped in a `kind` node.
    pub(super) fn delimited(
        &mut self,
        kind: SyntaxKind,
        open: SyntaxKind,
        close: SyntaxKind,
        first: KindSet,
        item: fn(&mut Self),
    ) {
        self.start_node(kind);
        if self.expect(open) {
            self.separated(close, first, item);
            self.expect(close);
        }
        self.finish_node();
    }
}
