//! Test helpers: analyse a source end to end, or build a CST by hand.

use rowan::GreenNodeBuilder;

use crate::analysis::{Analysis, Analyzed};
use crate::analyze::{AstBuilder, BuildOptions, ScopeTree};
use crate::ast::Program;
use crate::parser::{SyntaxKind, SyntaxNode};
use crate::{Error, Result};

impl<'a> Analyzed<'a> {
    #[track_caller]
    pub fn expect_valid(src: &'a str) -> Self {
        match Analysis::new(src).exec() {
            Ok(analyzed) => analyzed,
            Err(err) => panic!("Expected valid program, got error:\n{}", err.render(src)),
        }
    }

    /// Like [`Self::expect_valid`], without requiring `main`.
    #[track_caller]
    pub fn expect_valid_snippet(src: &'a str) -> Self {
        match Analysis::new(src).snippet(true).exec() {
            Ok(analyzed) => analyzed,
            Err(err) => panic!("Expected valid snippet, got error:\n{}", err.render(src)),
        }
    }

    #[track_caller]
    pub fn expect_valid_ast(src: &'a str) -> String {
        Self::expect_valid(src).dump_ast()
    }
}

#[track_caller]
pub fn expect_error(src: &str) -> Error {
    match Analysis::new(src).exec() {
        Ok(analyzed) => panic!("Expected an error, got valid program:\n{}", analyzed.dump_ast()),
        Err(err) => err,
    }
}

#[track_caller]
pub fn expect_snippet_error(src: &str) -> Error {
    match Analysis::new(src).snippet(true).exec() {
        Ok(analyzed) => panic!("Expected an error, got valid snippet:\n{}", analyzed.dump_ast()),
        Err(err) => err,
    }
}

/// Rendered diagnostic of the first error in `src`.
#[track_caller]
pub fn expect_invalid(src: &str) -> String {
    expect_error(src).render(src)
}

/// Parses and builds `src` without validating it.
#[track_caller]
pub fn build(src: &str) -> Result<(Program, ScopeTree)> {
    let parsed = crate::parser::parse(src)?;
    assert!(
        parsed.diagnostics.is_empty(),
        "unexpected syntax errors:\n{}",
        parsed.diagnostics
    );
    let mut builder = AstBuilder::new(src, &BuildOptions::default());
    let program = builder.build_program(&parsed.root)?;
    Ok((program, builder.into_scopes()))
}

/// A CST written out by hand, for trees the parser never produces.
#[derive(Debug, Clone)]
pub enum Tree {
    Node(SyntaxKind, Vec<Tree>),
    Token(SyntaxKind, &'static str),
}

pub fn node(kind: SyntaxKind, children: Vec<Tree>) -> Tree {
    Tree::Node(kind, children)
}

pub fn token(kind: SyntaxKind, text: &'static str) -> Tree {
    Tree::Token(kind, text)
}

impl Tree {
    /// The source text is the concatenation of the token texts.
    pub fn source(&self) -> String {
        match self {
            Tree::Node(_, children) => children.iter().map(Tree::source).collect(),
            Tree::Token(_, text) => (*text).to_owned(),
        }
    }

    pub fn build(&self) -> SyntaxNode {
        let mut builder = GreenNodeBuilder::new();
        self.push(&mut builder);
        SyntaxNode::new_root(builder.finish())
    }

    fn push(&self, builder: &mut GreenNodeBuilder<'_>) {
        match self {
            Tree::Node(kind, children) => {
                builder.start_node((*kind).into());
                for child in children {
                    child.push(builder);
                }
                builder.finish_node();
            }
            Tree::Token(kind, text) => builder.token((*kind).into(), text),
        }
    }
}

/// Builds a hand-written `Root` and returns the builder's error.
#[track_caller]
pub fn build_tree_error(root: &Tree) -> Error {
    let source = root.source();
    let mut builder = AstBuilder::new(&source, &BuildOptions::default());
    match builder.build_program(&root.build()) {
        Ok(program) => panic!("Expected a build error, got {program:?}"),
        Err(err) => err,
    }
}
