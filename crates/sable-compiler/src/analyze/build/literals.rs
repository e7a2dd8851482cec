//! Literal conversion.

use regex_syntax::ast;

use sable_core::{NumberSize, NumberValue};

use crate::Result;
use crate::ast::{Expr, Literal, LiteralValue, NameRef};
use crate::diagnostics::AnalysisCode;
use crate::parser::{KindSet, SyntaxElement, SyntaxKind, SyntaxNode, kind_sets};

use super::{AstBuilder, PositionalSlot};

impl AstBuilder<'_> {
    pub(super) fn literal(&mut self, node: &SyntaxNode) -> Result<Expr> {
        let element: SyntaxElement = node.clone().into();
        let meta = self.meta(&element);
        let slots = [PositionalSlot::required(
            kind_sets::LITERAL_TOKENS,
            AnalysisCode::ExpectedExpression,
            |b, token| b.literal_value(token),
        )];
        let value = self
            .match_positional(node, &slots)?
            .into_iter()
            .flatten()
            .next()
            .ok_or_else(|| self.unexpected(&element))?;
        Ok(Expr::Literal(Literal { meta, value }))
    }

    pub(super) fn name_ref(&mut self, node: &SyntaxNode) -> Result<Expr> {
        let element: SyntaxElement = node.clone().into();
        let meta = self.meta(&element);
        let slots = [PositionalSlot::required(
            KindSet::single(SyntaxKind::Id),
            AnalysisCode::ExpectedExpression,
            |_, token| Ok(token_text(token)),
        )];
        let name = self
            .match_positional(node, &slots)?
            .into_iter()
            .flatten()
            .next()
            .ok_or_else(|| self.unexpected(&element))?;
        Ok(Expr::Name(NameRef { meta, name }))
    }

    fn literal_value(&mut self, element: &SyntaxElement) -> Result<LiteralValue> {
        let text = token_text(element);
        match element.kind() {
            SyntaxKind::KwTrue => Ok(LiteralValue::Bool(true)),
            SyntaxKind::KwFalse => Ok(LiteralValue::Bool(false)),
            SyntaxKind::Number => self.number_value(element, &text),
            SyntaxKind::StringLit => {
                let code = AnalysisCode::InvalidStringLiteral;
                let raw = strip_quotes(&text, "\"")
                    .ok_or_else(|| self.analysis_error(code, element, "missing closing quote"))?;
                unescape(raw)
                    .map(LiteralValue::String)
                    .map_err(|msg| self.analysis_error(code, element, msg))
            }
            SyntaxKind::PathLit => {
                let code = AnalysisCode::InvalidPathLiteral;
                let raw = strip_quotes(&text, "p\"")
                    .ok_or_else(|| self.analysis_error(code, element, "missing closing quote"))?;
                if raw.is_empty() {
                    return Err(self.analysis_error(code, element, "path is empty"));
                }
                unescape(raw)
                    .map(LiteralValue::Path)
                    .map_err(|msg| self.analysis_error(code, element, msg))
            }
            SyntaxKind::RegexLit => self.regex_value(element, &text),
            _ => Err(self.unexpected(element)),
        }
    }

    /// Number literal with an optional `_<size>` suffix.
    ///
    /// A suffixed literal has exactly that size and must fit it. Otherwise
    /// the literal may have any size that holds its value.
    fn number_value(&self, element: &SyntaxElement, text: &str) -> Result<LiteralValue> {
        let suffixed = text
            .rsplit_once('_')
            .and_then(|(digits, suffix)| Some((digits, NumberSize::from_name(suffix)?)));
        let (digits, suffix) = match suffixed {
            Some((digits, size)) => (digits, Some(size)),
            None => (text, None),
        };
        let value = NumberValue::parse(digits)
            .ok_or_else(|| self.analysis_error(AnalysisCode::InvalidNumberLiteral, element, text))?;
        let sizes = match suffix {
            Some(size) if size.holds(&value) => vec![size],
            Some(size) => {
                return Err(self.analysis_error(
                    AnalysisCode::NumberOutOfRange,
                    element,
                    format!("`{text}` does not fit in {size}"),
                ));
            }
            None => value.possible_sizes(),
        };
        if sizes.is_empty() {
            return Err(self.analysis_error(
                AnalysisCode::NumberOutOfRange,
                element,
                format!("`{text}` does not fit in any number type"),
            ));
        }
        Ok(LiteralValue::Number {
            text: text.to_owned(),
            sizes,
        })
    }

    fn regex_value(&self, element: &SyntaxElement, text: &str) -> Result<LiteralValue> {
        let code = AnalysisCode::InvalidRegexLiteral;
        let raw = strip_quotes(text, "/")
            .ok_or_else(|| self.analysis_error(code, element, "missing closing `/`"))?;
        if raw.is_empty() {
            return Err(self.analysis_error(code, element, "pattern is empty"));
        }
        let pattern = raw.replace("\\/", "/");
        ast::parse::ParserBuilder::new()
            .build()
            .parse(&pattern)
            .map_err(|err| self.analysis_error(code, element, err.kind().to_string()))?;
        Ok(LiteralValue::Regex(pattern))
    }
}

pub(super) fn token_text(element: &SyntaxElement) -> String {
    match element {
        rowan::NodeOrToken::Token(token) => token.text().to_owned(),
        rowan::NodeOrToken::Node(node) => node.text().to_string(),
    }
}

/// Text between `open` and the closing delimiter, which is the last
/// character of `open`.
fn strip_quotes<'t>(text: &'t str, open: &str) -> Option<&'t str> {
    let close = open.chars().last()?;
    text.strip_prefix(open)?.strip_suffix(close)
}

fn unescape(raw: &str) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let escaped = match chars.next() {
            Some('n') => '\n',
            Some('t') => '\t',
            Some('r') => '\r',
            Some('0') => '\0',
            Some('\\') => '\\',
            Some('"') => '"',
            Some(other) => return Err(format!("unknown escape `\\{other}`")),
            None => return Err("unterminated escape".to_owned()),
        };
        out.push(escaped);
    }
    Ok(out)
}
