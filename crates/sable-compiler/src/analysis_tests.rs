use indoc::indoc;

use crate::test_utils::{expect_error, expect_invalid};
use crate::{Analysis, AnalyzeOptions, Analyzed, Error, analyze_cst};

#[test]
fn valid_program() {
    let analyzed = Analyzed::expect_valid("f main() { print \"hi\"; }");

    insta::assert_snapshot!(analyzed.dump_ast(), @r#"
    Program
      FunctionDecl main
        Block
          PrintStmt
            StringLiteral "hi"
    "#);
    assert_eq!(analyzed.source(), "f main() { print \"hi\"; }");
    assert_eq!(analyzed.scopes().len(), 2);
}

#[test]
fn dump_cst() {
    let analyzed = Analyzed::expect_valid("f main {}");

    insta::assert_snapshot!(analyzed.dump_cst(), @r#"
    Root
      FunctionDecl
        KwF "f"
        Id "main"
        Block
          BraceOpen "{"
          BraceClose "}"
    "#);
}

#[test]
fn syntax_errors_come_first() {
    let err = expect_error("const x = ;");

    assert!(matches!(err, Error::Syntax(_)));
    assert_eq!(err.code(), Some("P004"));
    insta::assert_snapshot!(err, @"parsing failed with 1 errors");
}

#[test]
fn syntax_errors_render_with_source() {
    insta::assert_snapshot!(expect_invalid("const x = ;"), @r"
    error: [P004] expected an expression, found `;`
      |
    1 | const x = ;
      |           ^
    ");
}

#[test]
fn semantic_error_renders_with_source() {
    let input = indoc! {"
    f main() {
        ghost;
    }
    "};

    insta::assert_snapshot!(expect_invalid(input), @r"
    error: [E013] `ghost` is not defined
      |
    2 |     ghost;
      |     ^^^^^
    ");
}

#[test]
fn error_codes_by_stage() {
    let semantic = expect_error("f main() { y; }");
    assert_eq!(semantic.semantic_code(), Some(crate::SemanticCode::UndefinedIdentifier));
    assert_eq!(semantic.analysis_code(), None);

    let analysis = expect_error("const x = 300_int8; f main() { }");
    assert_eq!(analysis.analysis_code(), Some(crate::AnalysisCode::NumberOutOfRange));
    assert_eq!(analysis.semantic_code(), None);
}

#[test]
fn snippet_mode() {
    let err = Analysis::new("const x = true;").exec().unwrap_err();
    assert_eq!(err.code(), Some("E001"));

    let analyzed = Analysis::new("const x = true;").snippet(true).exec().unwrap();
    assert!(analyzed.scopes().root().symbols.contains_key("x"));
}

#[test]
fn exec_fuel() {
    let err = Analysis::new("f main() { const x = true; }")
        .with_exec_fuel(Some(2))
        .exec()
        .unwrap_err();

    assert!(matches!(err, Error::ExecFuelExhausted));
    assert_eq!(err.code(), None);
    insta::assert_snapshot!(err.render(""), @"execution limit exceeded");
}

#[test]
fn recursion_fuel() {
    let deep = format!("const x = {}true{};", "(".repeat(50), ")".repeat(50));

    let err = Analysis::new(&deep)
        .snippet(true)
        .with_recursion_fuel(Some(10))
        .exec()
        .unwrap_err();

    insta::assert_snapshot!(err, @"recursion limit exceeded");
}

#[test]
fn long_operator_chain_at_default_fuel() {
    let src = format!(
        "f main() {{ const x = 1_int32{}; print \"done\"; }}",
        " + 1_int32".repeat(300)
    );

    let analyzed = Analyzed::expect_valid(&src);

    let main = analyzed.scopes().find_scope("main").unwrap();
    assert!(analyzed.scopes().scope(main).symbols.contains_key("x"));
}

#[test]
fn deep_nesting_at_default_fuel_is_an_error() {
    let deep = format!("const x = {}true{};", "(".repeat(400), ")".repeat(400));

    let err = Analysis::new(&deep).snippet(true).exec().unwrap_err();

    assert!(matches!(err, Error::RecursionLimitExceeded));
}

#[test]
fn unbounded_fuel() {
    let deep = format!("const x = {}true{};", "(".repeat(50), ")".repeat(50));

    Analysis::new(&deep)
        .snippet(true)
        .with_exec_fuel(None)
        .with_recursion_fuel(None)
        .exec()
        .unwrap();
}

#[test]
fn analyze_parsed_cst() {
    let src = "f main() { }";
    let parsed = crate::parser::parse(src).unwrap();

    let analyzed = analyze_cst(&parsed.root, src, &AnalyzeOptions::default()).unwrap();

    assert_eq!(analyzed.program().declarations.len(), 1);
    assert_eq!(analyzed.cst(), &parsed.root);
}

#[test]
fn node_index_covers_program() {
    let analyzed = Analyzed::expect_valid("f main() { const x = true; }");

    let index = analyzed.node_index();

    assert!(index.len() > 4);
}

#[test]
fn scopes_serialize() {
    let analyzed = Analyzed::expect_valid("f main() { let n = 1_uint8; }");
    let (_, scopes) = analyzed.into_parts();

    let json = serde_json::to_value(&scopes).unwrap();

    assert_eq!(json["name"], "global");
    assert_eq!(json["children"]["main"]["kind"], "function");
    assert!(json["children"]["main"]["symbols"]["n"].is_object());
    assert!(json["symbols"]["main"].is_object());
}

#[test]
fn program_serializes() {
    let analyzed = Analyzed::expect_valid("f main() { }");

    let json = serde_json::to_value(analyzed.program()).unwrap();

    assert_eq!(json["meta"]["id"], 0);
    assert!(json["declarations"].is_array());
}
