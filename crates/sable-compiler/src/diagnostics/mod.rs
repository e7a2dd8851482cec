//! Diagnostics: typed error codes, located messages and their rendering.
//!
//! Analysis stops at the first analysis, semantic or symbol error, so those
//! travel as a single [`Diagnostic`]. The parser is resilient and accumulates
//! every syntax problem in [`Diagnostics`].

mod codes;
mod printer;

#[cfg(test)]
mod tests;

use std::fmt;

use sable_core::{LineIndex, Position};
use serde::Serialize;

use crate::ast::{NodeId, NodeKind};
use crate::parser::SyntaxKind;

pub use codes::{AnalysisCode, ErrorCode, SemanticCode, SymbolCode, SyntaxCode};
pub use printer::DiagnosticsPrinter;

/// The node an error is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Offender {
    Cst {
        #[serde(skip)]
        kind: SyntaxKind,
        pos: Position,
    },
    Ast {
        kind: NodeKind,
        id: NodeId,
        pos: Position,
    },
}

impl Offender {
    pub fn pos(&self) -> Position {
        match self {
            Offender::Cst { pos, .. } | Offender::Ast { pos, .. } => *pos,
        }
    }
}

/// Source excerpt for the caret line under the offending span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceContext {
    pub line_text: String,
    pub line: u32,
    pub col: u32,
    pub len: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic<C: ErrorCode> {
    pub code: C,
    pub message: String,
    pub offender: Option<Offender>,
    pub context: Option<SourceContext>,
}

impl<C: ErrorCode> Diagnostic<C> {
    /// Diagnostic with the code's fallback message.
    pub fn new(code: C) -> Self {
        Self {
            code,
            message: code.message(None),
            offender: None,
            context: None,
        }
    }

    /// Renders the message from the code's template.
    pub fn detail(mut self, detail: impl AsRef<str>) -> Self {
        self.message = self.code.message(Some(detail.as_ref()));
        self
    }

    pub fn at_cst(mut self, kind: SyntaxKind, pos: Position) -> Self {
        self.offender = Some(Offender::Cst { kind, pos });
        self
    }

    pub fn at_ast(mut self, kind: NodeKind, id: NodeId, pos: Position) -> Self {
        self.offender = Some(Offender::Ast { kind, id, pos });
        self
    }

    pub fn pos(&self) -> Option<Position> {
        self.offender.as_ref().map(Offender::pos)
    }

    /// Fills the source context from the offender's position, if any.
    pub fn with_source(mut self, source: &str, lines: &LineIndex) -> Self {
        let Some(pos) = self.pos() else {
            return self;
        };
        if let Some(line_text) = lines.line_text(source, pos.line) {
            let available = (line_text.len() as u32 + 1).saturating_sub(pos.col);
            self.context = Some(SourceContext {
                line_text: line_text.to_string(),
                line: pos.line,
                col: pos.col,
                len: pos.len().min(available).max(1),
            });
        }
        self
    }
}

impl<C: ErrorCode> fmt::Display for Diagnostic<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pos() {
            Some(pos) => write!(f, "{} at {}: {}", self.code.code(), pos, self.message),
            None => write!(f, "{}: {}", self.code.code(), self.message),
        }
    }
}

/// Syntax diagnostics accumulated by the parser.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    messages: Vec<Diagnostic<SyntaxCode>>,
}

#[must_use = "diagnostic not emitted, call .emit()"]
pub struct DiagnosticBuilder<'a> {
    diagnostics: &'a mut Diagnostics,
    message: Diagnostic<SyntaxCode>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Starts a diagnostic at `pos`, found while looking at `kind`.
    ///
    /// Uses the code's fallback message. Call `.message()` on the builder to add detail.
    pub fn report(
        &mut self,
        code: SyntaxCode,
        kind: SyntaxKind,
        pos: Position,
    ) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            diagnostics: self,
            message: Diagnostic::new(code).at_cst(kind, pos),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic<SyntaxCode>> {
        self.messages.iter()
    }

    pub fn as_slice(&self) -> &[Diagnostic<SyntaxCode>] {
        &self.messages
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.messages.extend(other.messages);
    }

    pub fn render(&self, source: &str) -> String {
        DiagnosticsPrinter::new(&self.messages).source(source).render()
    }
}

impl<'a> DiagnosticBuilder<'a> {
    pub fn message(mut self, detail: impl AsRef<str>) -> Self {
        self.message = self.message.detail(detail);
        self
    }

    pub fn emit(self) {
        self.diagnostics.messages.push(self.message);
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, diag) in self.messages.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{diag}")?;
        }
        Ok(())
    }
}
