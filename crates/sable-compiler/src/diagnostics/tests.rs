use sable_core::LineIndex;

use super::*;

fn position(source: &str, start: u32, end: u32) -> Position {
    LineIndex::new(source).position(start, end)
}

#[test]
fn code_identifiers() {
    insta::assert_snapshot!(SyntaxCode::ExpectedToken, @"P003");
    insta::assert_snapshot!(AnalysisCode::InvalidRegexLiteral, @"A050");
    insta::assert_snapshot!(SemanticCode::NotIterable, @"E021");
    insta::assert_snapshot!(SymbolCode::ScopeNotFound, @"Y001");
}

#[test]
fn message_rendering() {
    assert_eq!(
        SemanticCode::UndefinedIdentifier.message(None),
        "undefined identifier"
    );
    assert_eq!(
        SemanticCode::UndefinedIdentifier.message(Some("count")),
        "`count` is not defined"
    );
    assert_eq!(
        AnalysisCode::ExpectedFunctionBody.message(Some("`;`")),
        "expected function body, found `;`"
    );
}

#[test]
fn display_with_position() {
    let src = "f main() {\n  x;\n}";
    let diagnostic = Diagnostic::new(SemanticCode::UndefinedIdentifier)
        .detail("x")
        .at_ast(NodeKind::NameRef, NodeId(4), position(src, 13, 14));

    insta::assert_snapshot!(diagnostic, @"E013 at 2:3: `x` is not defined");
}

#[test]
fn display_without_position() {
    let diagnostic = Diagnostic::new(SemanticCode::MainFunctionNotFound);

    insta::assert_snapshot!(diagnostic, @"E001: no `main` function found");
    assert_eq!(diagnostic.pos(), None);
}

#[test]
fn source_context_clamps_to_line() {
    let src = "const x = 1;\nconst y = 2;";
    let lines = LineIndex::new(src);
    let diagnostic = Diagnostic::new(SemanticCode::AmbiguousType)
        .at_ast(NodeKind::VariableDecl, NodeId(1), lines.position(6, src.len() as u32))
        .with_source(src, &lines);

    let context = diagnostic.context.unwrap();
    assert_eq!(context.line_text, "const x = 1;");
    assert_eq!((context.line, context.col), (1, 7));
    assert_eq!(context.len, 6);
}

#[test]
fn report_with_default_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(
            SyntaxCode::ExpectedIdentifier,
            SyntaxKind::Semicolon,
            position("f ;", 2, 3),
        )
        .emit();

    assert_eq!(diagnostics.len(), 1);
    insta::assert_snapshot!(diagnostics, @"P006 at 1:3: expected an identifier");
}

#[test]
fn report_with_custom_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(
            SyntaxCode::ExpectedIdentifier,
            SyntaxKind::Semicolon,
            position("f ;", 2, 3),
        )
        .message("function name")
        .emit();

    insta::assert_snapshot!(diagnostics, @"P006 at 1:3: expected function name");
}

#[test]
fn extend_keeps_order() {
    let src = "hello world";
    let mut first = Diagnostics::new();
    first
        .report(SyntaxCode::UnexpectedToken, SyntaxKind::Id, position(src, 0, 5))
        .emit();
    let mut second = Diagnostics::new();
    second
        .report(SyntaxCode::UnexpectedToken, SyntaxKind::Id, position(src, 6, 11))
        .message("`world`")
        .emit();

    first.extend(second);

    insta::assert_snapshot!(first, @r"
    P001 at 1:1: unexpected token
    P001 at 1:7: unexpected `world`
    ");
}

#[test]
fn printer_plain() {
    let src = "hello world!";
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(SyntaxCode::UnexpectedToken, SyntaxKind::Id, position(src, 0, 5))
        .message("`hello`")
        .emit();

    insta::assert_snapshot!(diagnostics.render(src), @r"
    error: [P001] unexpected `hello`
      |
    1 | hello world!
      | ^^^^^
    ");
}

#[test]
fn printer_with_path() {
    let src = "hello world";
    let diagnostics = [Diagnostic::new(SemanticCode::UndefinedIdentifier)
        .detail("hello")
        .at_ast(NodeKind::NameRef, NodeId(2), position(src, 0, 5))];

    let result = DiagnosticsPrinter::new(&diagnostics)
        .source(src)
        .path("main.sable")
        .render();

    insta::assert_snapshot!(result, @r"
    error: [E013] `hello` is not defined
     --> main.sable:1:1
      |
    1 | hello world
      | ^^^^^
    ");
}

#[test]
fn printer_zero_width_span() {
    let src = "hello";
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(SyntaxCode::ExpectedToken, SyntaxKind::Id, position(src, 0, 0))
        .message("`;`")
        .emit();

    insta::assert_snapshot!(diagnostics.render(src), @r"
    error: [P003] expected `;`
      |
    1 | hello
      | ^
    ");
}

#[test]
fn printer_multiple_diagnostics() {
    let src = "hello world!";
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(SyntaxCode::UnexpectedToken, SyntaxKind::Id, position(src, 0, 5))
        .emit();
    diagnostics
        .report(SyntaxCode::InvalidCharacters, SyntaxKind::Id, position(src, 6, 10))
        .message("worl")
        .emit();

    insta::assert_snapshot!(diagnostics.render(src), @r"
    error: [P001] unexpected token
      |
    1 | hello world!
      | ^^^^^

    error: [P002] invalid characters `worl`
      |
    1 | hello world!
      |       ^^^^
    ");
}

#[test]
fn printer_without_source_is_plain() {
    let diagnostics = [Diagnostic::new(SemanticCode::MainFunctionNotFound)];

    let result = DiagnosticsPrinter::new(&diagnostics).render();

    insta::assert_snapshot!(result, @"E001: no `main` function found");
}

#[test]
fn printer_without_position_falls_back() {
    let diagnostics = [Diagnostic::new(SemanticCode::MainFunctionNotFound)];

    let result = DiagnosticsPrinter::new(&diagnostics).source("").render();

    insta::assert_snapshot!(result, @"E001: no `main` function found");
}

#[test]
fn printer_colored() {
    let src = "hello";
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(SyntaxCode::UnexpectedToken, SyntaxKind::Id, position(src, 0, 5))
        .emit();

    let result = DiagnosticsPrinter::new(diagnostics.as_slice())
        .source(src)
        .colored(true)
        .render();

    assert!(result.contains("unexpected token"));
    assert!(result.contains('\x1b'));
}

#[test]
fn printer_empty_diagnostics() {
    let diagnostics = Diagnostics::new();

    assert!(diagnostics.render("source").is_empty());
}
