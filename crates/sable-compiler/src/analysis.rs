//! Analysis pipeline.
//!
//! Stages: parse → build → validate. Parsing is resilient and collects every
//! syntax problem; the later stages stop at the first error.

use tracing::debug;

use crate::Error;
use crate::Result;
use crate::analyze::{
    AstBuilder, BuildOptions, DEFAULT_RECURSION_FUEL, ScopeTree, ValidateOptions, validate,
};
use crate::ast::{AstPrinter, NodeIndex, Program};
use crate::parser::{ParseResult, SyntaxNode, dump_cst, parse_with_fuel};

const DEFAULT_EXEC_FUEL: u32 = 1_000_000;

/// Knobs shared by [`Analysis`] and [`analyze_cst`].
#[derive(Debug, Clone, Copy)]
pub struct AnalyzeOptions {
    /// Analyse a fragment: no `main` function is required.
    pub snippet: bool,
    /// Parser operation budget. `None` is unbounded.
    pub exec_fuel: Option<u32>,
    /// Nesting budget of the parser and the builder. `None` is unbounded.
    pub recursion_fuel: Option<u32>,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            snippet: false,
            exec_fuel: Some(DEFAULT_EXEC_FUEL),
            recursion_fuel: Some(DEFAULT_RECURSION_FUEL),
        }
    }
}

/// Source text waiting to be analysed.
///
/// Create with [`new`](Self::new), optionally configure it, then call
/// [`exec`](Self::exec).
#[derive(Debug, Clone)]
pub struct Analysis<'a> {
    source: &'a str,
    options: AnalyzeOptions,
}

impl<'a> Analysis<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            options: AnalyzeOptions::default(),
        }
    }

    /// Analyse a fragment without an entry point.
    pub fn snippet(mut self, snippet: bool) -> Self {
        self.options.snippet = snippet;
        self
    }

    /// Set execution fuel limit. None = infinite.
    ///
    /// Execution fuel never replenishes. It protects against large inputs.
    /// Returns error from [`exec`](Self::exec) when exhausted.
    pub fn with_exec_fuel(mut self, limit: Option<u32>) -> Self {
        self.options.exec_fuel = limit;
        self
    }

    /// Set recursion depth limit. None = infinite.
    ///
    /// Recursion fuel restores when exiting recursion. It protects against
    /// deeply nested input. Returns error from [`exec`](Self::exec) when exhausted.
    pub fn with_recursion_fuel(mut self, limit: Option<u32>) -> Self {
        self.options.recursion_fuel = limit;
        self
    }

    /// Run all stages.
    ///
    /// Returns `Err` with every syntax diagnostic if parsing found problems,
    /// otherwise with the first build or validation error.
    pub fn exec(self) -> Result<Analyzed<'a>> {
        let ParseResult {
            root,
            diagnostics,
            exec_fuel_consumed,
        } = parse_with_fuel(
            self.source,
            self.options.exec_fuel,
            self.options.recursion_fuel,
        )?;
        debug!(
            exec_fuel_consumed,
            diagnostics = diagnostics.len(),
            "parsed source"
        );
        if !diagnostics.is_empty() {
            return Err(Error::Syntax(diagnostics));
        }
        analyze_cst(&root, self.source, &self.options)
    }
}

/// Builds and validates a CST the caller parsed.
pub fn analyze_cst<'a>(
    root: &SyntaxNode,
    source: &'a str,
    options: &AnalyzeOptions,
) -> Result<Analyzed<'a>> {
    let build = BuildOptions {
        recursion_fuel: options.recursion_fuel,
    };
    let mut builder = AstBuilder::new(source, &build);
    let program = builder.build_program(root)?;
    let scopes = builder.into_scopes();

    #[cfg(any(test, debug_assertions))]
    crate::ast::assert_ownership(&program);

    let validate_options = ValidateOptions {
        snippet: options.snippet,
    };
    validate(&program, &scopes, &validate_options, source)?;

    Ok(Analyzed {
        source,
        cst: root.clone(),
        program,
        scopes,
    })
}

/// A program that passed every stage.
#[derive(Debug, Clone)]
pub struct Analyzed<'a> {
    source: &'a str,
    cst: SyntaxNode,
    program: Program,
    scopes: ScopeTree,
}

impl<'a> Analyzed<'a> {
    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn cst(&self) -> &SyntaxNode {
        &self.cst
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    pub fn into_parts(self) -> (Program, ScopeTree) {
        (self.program, self.scopes)
    }

    pub fn node_index(&self) -> NodeIndex {
        NodeIndex::build(&self.program)
    }

    pub fn dump_cst(&self) -> String {
        dump_cst(&self.cst)
    }

    pub fn dump_ast(&self) -> String {
        AstPrinter::new(&self.program).dump()
    }
}
