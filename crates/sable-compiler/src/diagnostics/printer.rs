//! Builder-pattern printer for rendering diagnostics.

use std::fmt::Write;

use annotate_snippets::{AnnotationKind, Level, Renderer, Snippet};

use super::{Diagnostic, ErrorCode};

/// Builder for rendering diagnostics with various options.
pub struct DiagnosticsPrinter<'d, 's, C: ErrorCode> {
    diagnostics: &'d [Diagnostic<C>],
    source: Option<&'s str>,
    path: Option<&'s str>,
    colored: bool,
}

impl<'d, 's, C: ErrorCode> DiagnosticsPrinter<'d, 's, C> {
    pub fn new(diagnostics: &'d [Diagnostic<C>]) -> Self {
        Self {
            diagnostics,
            source: None,
            path: None,
            colored: false,
        }
    }

    pub fn source(mut self, source: &'s str) -> Self {
        self.source = Some(source);
        self
    }

    pub fn path(mut self, path: &'s str) -> Self {
        self.path = Some(path);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let Some(source) = self.source else {
            return self.format_plain(w);
        };

        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        for (i, diag) in self.diagnostics.iter().enumerate() {
            // Rendered reports end without a newline; keep one blank line between them.
            if i > 0 {
                w.write_str("\n\n")?;
            }

            let title = format!("[{}] {}", diag.code.code(), diag.message);
            let Some(pos) = diag.pos() else {
                write!(w, "{}", diag)?;
                continue;
            };

            let range = adjust_range(pos.start as usize, pos.end as usize, source.len());
            let mut snippet = Snippet::source(source)
                .line_start(1)
                .annotation(AnnotationKind::Primary.span(range));
            if let Some(p) = self.path {
                snippet = snippet.path(p);
            }

            let report = [Level::ERROR.primary_title(&title).element(snippet)];
            write!(w, "{}", renderer.render(&report))?;
        }

        Ok(())
    }

    fn format_plain(&self, w: &mut impl Write) -> std::fmt::Result {
        for (i, diag) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }
            write!(w, "{}", diag)?;
        }
        Ok(())
    }
}

fn adjust_range(start: usize, end: usize, limit: usize) -> std::ops::Range<usize> {
    if start == end {
        return start..(start + 1).min(limit);
    }
    start..end
}
