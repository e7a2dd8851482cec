//! Sable compiler front end: parser, AST, scopes, type inference and validation.
//!
//! This crate turns Sable source text into a typed AST plus a scope tree:
//! - `parser` - lexer, CST and resilient recursive-descent grammar
//! - `ast` - the typed AST node model
//! - `analyze` - CST→AST building, scopes, type inference, semantic validation
//! - `diagnostics` - error codes and rendering
//! - `analysis` - the high-level `Analysis` facade

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod analysis;
pub mod analyze;
pub mod ast;
pub mod diagnostics;
pub mod parser;

#[cfg(test)]
mod analysis_tests;
#[cfg(test)]
pub mod test_utils;

pub use analysis::{Analysis, AnalyzeOptions, Analyzed, analyze_cst};
pub use diagnostics::{
    AnalysisCode, Diagnostic, Diagnostics, DiagnosticsPrinter, ErrorCode, SemanticCode,
    SymbolCode, SyntaxCode,
};

/// Errors that stop an analysis.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Execution fuel exhausted (too many parser operations).
    #[error("execution limit exceeded")]
    ExecFuelExhausted,

    /// Recursion fuel exhausted (input nested too deeply).
    #[error("recursion limit exceeded")]
    RecursionLimitExceeded,

    #[error("parsing failed with {} errors", .0.len())]
    Syntax(Diagnostics),

    #[error("{0}")]
    Analysis(Diagnostic<AnalysisCode>),

    #[error("{0}")]
    Semantic(Diagnostic<SemanticCode>),

    #[error("{0}")]
    Symbol(Diagnostic<SymbolCode>),
}

impl Error {
    /// Namespaced code of the first problem, if the error carries one.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Error::ExecFuelExhausted | Error::RecursionLimitExceeded => None,
            Error::Syntax(diagnostics) => diagnostics.iter().next().map(|d| d.code.code()),
            Error::Analysis(d) => Some(d.code.code()),
            Error::Semantic(d) => Some(d.code.code()),
            Error::Symbol(d) => Some(d.code.code()),
        }
    }

    pub fn semantic_code(&self) -> Option<SemanticCode> {
        match self {
            Error::Semantic(d) => Some(d.code),
            _ => None,
        }
    }

    pub fn analysis_code(&self) -> Option<AnalysisCode> {
        match self {
            Error::Analysis(d) => Some(d.code),
            _ => None,
        }
    }

    /// Renders the error with source excerpts.
    pub fn render(&self, source: &str) -> String {
        match self {
            Error::Syntax(diagnostics) => diagnostics.render(source),
            Error::Analysis(d) => DiagnosticsPrinter::new(std::slice::from_ref(d))
                .source(source)
                .render(),
            Error::Semantic(d) => DiagnosticsPrinter::new(std::slice::from_ref(d))
                .source(source)
                .render(),
            Error::Symbol(d) => DiagnosticsPrinter::new(std::slice::from_ref(d))
                .source(source)
                .render(),
            Error::ExecFuelExhausted | Error::RecursionLimitExceeded => self.to_string(),
        }
    }
}

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, Error>;
