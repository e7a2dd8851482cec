use indoc::indoc;

use super::{dump_cst, parse, parse_with_fuel};
use crate::Error;

fn cst(source: &str) -> String {
    let result = parse(source).expect("parse should not run out of fuel");
    assert!(
        result.diagnostics.is_empty(),
        "unexpected diagnostics:\n{}",
        result.diagnostics
    );
    dump_cst(&result.root)
}

fn errors(source: &str) -> String {
    parse(source)
        .expect("parse should not run out of fuel")
        .diagnostics
        .to_string()
}

#[test]
fn empty_function() {
    insta::assert_snapshot!(cst("f main() {}"), @r#"
    Root
      FunctionDecl
        KwF "f"
        Id "main"
        ParamList
          ParenOpen "("
          ParenClose ")"
        Block
          BraceOpen "{"
          BraceClose "}"
    "#);
}

#[test]
fn function_without_parameter_list() {
    insta::assert_snapshot!(cst("f Main {}"), @r#"
    Root
      FunctionDecl
        KwF "f"
        Id "Main"
        Block
          BraceOpen "{"
          BraceClose "}"
    "#);
}

#[test]
fn binary_precedence() {
    insta::assert_snapshot!(cst("const x = 1 + 2 * 3;"), @r#"
    Root
      VariableDecl
        KwConst "const"
        TargetList
          VariableTarget
            Id "x"
        Equals "="
        ExprList
          BinaryExpr
            Literal
              Number "1"
            Plus "+"
            BinaryExpr
              Literal
                Number "2"
              Star "*"
              Literal
                Number "3"
        Semicolon ";"
    "#);
}

#[test]
fn postfix_chain() {
    insta::assert_snapshot!(cst("f main() { a.b(1)[0]; }"), @r#"
    Root
      FunctionDecl
        KwF "f"
        Id "main"
        ParamList
          ParenOpen "("
          ParenClose ")"
        Block
          BraceOpen "{"
          ExprStmt
            IndexExpr
              CallExpr
                MemberExpr
                  NameRef
                    Id "a"
                  Dot "."
                  Id "b"
                ArgList
                  ParenOpen "("
                  Literal
                    Number "1"
                  ParenClose ")"
              BracketOpen "["
              Literal
                Number "0"
              BracketClose "]"
            Semicolon ";"
          BraceClose "}"
    "#);
}

#[test]
fn parameters_with_rest_type_and_default() {
    insta::assert_snapshot!(cst("f g(a: int8, ...b = 1) {}"), @r#"
    Root
      FunctionDecl
        KwF "f"
        Id "g"
        ParamList
          ParenOpen "("
          Param
            Id "a"
            Colon ":"
            NumberType
              NumberName "int8"
          Comma ","
          Param
            Ellipsis "..."
            Id "b"
            Equals "="
            Literal
              Number "1"
          ParenClose ")"
        Block
          BraceOpen "{"
          BraceClose "}"
    "#);
}

#[test]
fn generic_types() {
    insta::assert_snapshot!(cst("let xs: List<|int8[]|>;"), @r#"
    Root
      VariableDecl
        KwLet "let"
        TargetList
          VariableTarget
            Id "xs"
            Colon ":"
            InstanceType
              Id "List"
              TypeArgList
                TypeArgsOpen "<|"
                ArrayType
                  NumberType
                    NumberName "int8"
                  BracketOpen "["
                  BracketClose "]"
                TypeArgsClose "|>"
        Semicolon ";"
    "#);
}

#[test]
fn tuple_and_paren() {
    insta::assert_snapshot!(cst("const t = ((1), true);"), @r#"
    Root
      VariableDecl
        KwConst "const"
        TargetList
          VariableTarget
            Id "t"
        Equals "="
        ExprList
          TupleExpr
            ParenOpen "("
            ParenExpr
              ParenOpen "("
              Literal
                Number "1"
              ParenClose ")"
            Comma ","
            Literal
              KwTrue "true"
            ParenClose ")"
        Semicolon ";"
    "#);
}

#[test]
fn statements_parse_cleanly() {
    let source = indoc! {r#"
    enum Color { Red, Green = 2, }
    interface Shape { area: dec64; }
    class Point<|T|> {
        let x: T;
        f norm() -> dec64 { return 1.0; }
    }
    f main() {
        let i = 0;
        if i < 3 { i = i + 1; } else if i == 3 { print "three"; } else { }
        for p in [1, 2] { continue; }
        loop { break; }
        when i { 1, 2 => { } else => { } }
        const g = f(x: int8) -> int8 { return x; };
        const pick = i > 0 ? "a" : "b";
        const o = {a: 1, b: p"./x"};
        print -i, !true, ++i;
    }
    "#};

    assert_eq!(errors(source), "");
}

#[test]
fn missing_expression() {
    assert_eq!(
        errors("const x = ;"),
        "P004 at 1:11: expected an expression, found `;`"
    );
}

#[test]
fn missing_close_paren_keeps_body() {
    assert_eq!(errors("f main( {}"), "P003 at 1:9: expected `)`, found `{`");
}

#[test]
fn missing_semicolon() {
    assert_eq!(
        errors("const x = 1\nconst y = 2;"),
        "P003 at 2:1: expected `;`, found `const`"
    );
}

#[test]
fn garbage_at_top_level() {
    assert_eq!(
        errors("const x = 1; @"),
        "P001 at 1:14: unexpected `@`, expected a declaration"
    );
}

#[test]
fn unexpected_statement_token() {
    assert_eq!(
        errors("f main() { ) }"),
        "P001 at 1:12: unexpected `)`, expected a statement"
    );
}

#[test]
fn recursion_fuel() {
    let result = parse_with_fuel("const x = ((((1))));", None, Some(3));

    assert!(matches!(result, Err(Error::RecursionLimitExceeded)));
}

#[test]
fn exec_fuel() {
    let result = parse_with_fuel("f main() {}", Some(2), None);

    assert!(matches!(result, Err(Error::ExecFuelExhausted)));
}

#[test]
fn trivia_is_preserved() {
    let source = "// entry\nf main() { /* empty */ }\n";
    let result = parse(source).unwrap();

    assert_eq!(result.root.text().to_string(), source);
}
