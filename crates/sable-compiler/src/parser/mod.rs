//! Parser for Sable source text.
//!
//! # Architecture
//!
//! This parser produces a lossless concrete syntax tree (CST) via Rowan's green tree builder:
//!
//! - Zero-copy parsing: tokens carry spans, text sliced only when building tree nodes
//! - Trivia: the cursor steps over whitespace/comments and writes them as leading trivia
//!   of the next node or token
//! - Checkpoint-based wrapping: binary operators, postfix operators and array types wrap
//!   what was already parsed
//!
//! # Recovery Strategy
//!
//! The parser is resilient and always produces a tree:
//!
//! 1. Unknown tokens get wrapped in `SyntaxKind::Error` nodes and consumed
//! 2. Missing expected tokens emit a diagnostic but don't consume (parent may handle)
//! 3. Recovery sets define synchronization points for declarations and statements
//!
//! Fuel exhaustion (exec_fuel, recursion_fuel) returns an actual error immediately.

pub mod cst;
pub mod lexer;

mod core;
mod grammar;

#[cfg(test)]
mod cst_tests;
#[cfg(test)]
mod grammar_tests;

pub use cst::{KindSet, SableLang, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken, kind_sets};

pub use core::{ParseResult, Parser};

use crate::Error;
use lexer::lex;

/// Parses with default (unbounded) fuel.
pub fn parse(source: &str) -> Result<ParseResult, Error> {
    Parser::new(source, lex(source)).parse()
}

/// Parses with explicit fuel limits.
pub fn parse_with_fuel(
    source: &str,
    exec_fuel: Option<u32>,
    recursion_fuel: Option<u32>,
) -> Result<ParseResult, Error> {
    Parser::new(source, lex(source))
        .with_exec_fuel(exec_fuel)
        .with_recursion_fuel(recursion_fuel)
        .parse()
}

/// Indented `Kind` / `Kind "text"` dump of a CST, trivia omitted.
pub fn dump_cst(node: &SyntaxNode) -> String {
    let mut out = String::new();
    dump_node(node, 0, &mut out);
    out
}

fn dump_node(node: &SyntaxNode, depth: usize, out: &mut String) {
    use std::fmt::Write;
    let _ = writeln!(out, "{}{:?}", "  ".repeat(depth), node.kind());
    for child in node.children_with_tokens() {
        match child {
            rowan::NodeOrToken::Node(n) => dump_node(&n, depth + 1, out),
            rowan::NodeOrToken::Token(t) if !t.kind().is_trivia() => {
                let _ = writeln!(out, "{}{:?} {:?}", "  ".repeat(depth + 1), t.kind(), t.text());
            }
            rowan::NodeOrToken::Token(_) => {}
        }
    }
}
