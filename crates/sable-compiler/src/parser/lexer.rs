//! Lexer for Sable.
//!
//! Produces span-based tokens without storing text - text is sliced from source only when needed.
//!
//! ## Regex literals
//!
//! `/` is ambiguous between division and the start of a regex literal. Logos only
//! ever yields `Slash`; the post-pass turns it into `RegexLit` when the previous
//! significant token cannot end an operand and a closing `/` follows on the same
//! line. The first pattern character must not be whitespace, so `a / b / c`
//! stays arithmetic.
//!
//! ## Error handling
//!
//! The lexer coalesces consecutive error characters into single `Garbage` tokens rather
//! than producing one error per character.

use logos::Logos;
use rowan::TextRange;
use std::ops::Range;

use super::cst::SyntaxKind;

/// Zero-copy token: kind + span, text retrieved via [`token_text`] when needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub span: TextRange,
}

impl Token {
    #[inline]
    pub fn new(kind: SyntaxKind, span: TextRange) -> Self {
        Self { kind, span }
    }
}

fn range_to_text_range(range: Range<usize>) -> TextRange {
    TextRange::new((range.start as u32).into(), (range.end as u32).into())
}

/// Tokenizes source into a vector of span-based tokens.
pub fn lex(source: &str) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut lexer = SyntaxKind::lexer(source);
    let mut error_start: Option<usize> = None;

    loop {
        match lexer.next() {
            Some(Ok(kind)) => {
                if let Some(start) = error_start.take() {
                    let end = lexer.span().start;
                    tokens.push(Token::new(
                        SyntaxKind::Garbage,
                        range_to_text_range(start..end),
                    ));
                }

                let span = lexer.span();
                if kind == SyntaxKind::Slash
                    && expects_operand(&tokens)
                    && let Some(len) = regex_literal_len(&source[span.start..])
                {
                    lexer.bump(len - 1);
                    tokens.push(Token::new(
                        SyntaxKind::RegexLit,
                        range_to_text_range(span.start..span.start + len),
                    ));
                } else {
                    tokens.push(Token::new(kind, range_to_text_range(span)));
                }
            }
            Some(Err(())) => {
                if error_start.is_none() {
                    error_start = Some(lexer.span().start);
                }
            }
            None => {
                if let Some(start) = error_start.take() {
                    tokens.push(Token::new(
                        SyntaxKind::Garbage,
                        range_to_text_range(start..source.len()),
                    ));
                }
                break;
            }
        }
    }

    tokens
}

fn expects_operand(tokens: &[Token]) -> bool {
    use SyntaxKind::*;
    let previous = tokens.iter().rev().find(|t| !t.kind.is_trivia());
    !matches!(
        previous.map(|t| t.kind),
        Some(
            Id | Number
                | StringLit
                | PathLit
                | RegexLit
                | KwTrue
                | KwFalse
                | ParenClose
                | BracketClose
        )
    )
}

/// Byte length of a `/pattern/` literal at the start of `text`, delimiters included.
fn regex_literal_len(text: &str) -> Option<usize> {
    let mut chars = text.char_indices().skip(1);
    let (_, first) = chars.next()?;
    if first.is_whitespace() || first == '/' {
        return None;
    }
    let mut escaped = first == '\\';
    for (idx, c) in chars {
        match c {
            '\n' => return None,
            '/' if !escaped => return Some(idx + 1),
            '\\' => escaped = !escaped,
            _ => escaped = false,
        }
    }
    None
}

/// Retrieves the text slice for a token. O(1) slice into source.
#[inline]
pub fn token_text<'s>(source: &'s str, token: &Token) -> &'s str {
    &source[std::ops::Range::<usize>::from(token.span)]
}
