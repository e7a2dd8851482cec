use indoc::indoc;

use crate::test_utils::build;

use super::AstPrinter;

fn dump(src: &str) -> String {
    let (program, _) = build(src).unwrap();
    AstPrinter::new(&program).dump()
}

#[test]
fn spans() {
    let (program, _) = build("const x = true;").unwrap();

    insta::assert_snapshot!(AstPrinter::new(&program).with_spans(true).dump(), @r"
    Program [0..15]
      VariableDecl [0..15] const
        VariableTarget [6..7] x: bool
        BoolLiteral [10..14] true
    ");
}

#[test]
fn ids() {
    let (program, _) = build("f main() { }").unwrap();

    let out = AstPrinter::new(&program).with_ids(true).dump();

    assert!(out.starts_with("Program #0\n  FunctionDecl #1 main\n"));
}

#[test]
fn expressions() {
    let input = indoc! {r#"
    const a = -(1_int8 + 2) * 3;
    const b = pick<|int8|>(a, [1_int8], {k: "v"}, p"/tmp", /a+/);
    const c = a > 0 ? b.k : b[0];
    "#};

    insta::assert_snapshot!(dump(input), @r#"
    Program
      VariableDecl const
        VariableTarget a: int8
        BinaryExpr *
          UnaryExpr -
            BinaryExpr +
              NumberLiteral 1_int8
              NumberLiteral 2
          NumberLiteral 3
      VariableDecl const
        VariableTarget b
        CallExpr <|int8|>
          NameRef pick
          NameRef a
          ArrayExpr
            NumberLiteral 1_int8
          ObjectExpr
            ObjectField k
              StringLiteral "v"
          PathLiteral p"/tmp"
          RegexLiteral /a+/
      VariableDecl const
        VariableTarget c
        TernaryExpr
          BinaryExpr >
            NameRef a
            NumberLiteral 0
          MemberExpr .k
            NameRef b
          IndexExpr
            NameRef b
            NumberLiteral 0
    "#);
}

#[test]
fn statements() {
    let input = indoc! {r#"
    f main() {
        let n = 0_int32;
        if n == 0 { n = 1; } else if n > 1 { continue; } else { break; }
        when n { 1, 2 => { print "low"; } else => { } }
        loop { n; }
    }
    "#};

    insta::assert_snapshot!(dump(input), @r#"
    Program
      FunctionDecl main
        Block
          VariableDecl let
            VariableTarget main.n: int32
            NumberLiteral 0_int32
          IfStmt
            BinaryExpr ==
              NameRef n
              NumberLiteral 0
            Block
              AssignStmt
                NameRef n
                NumberLiteral 1
            IfStmt
              BinaryExpr >
                NameRef n
                NumberLiteral 1
              Block
                ContinueStmt
              Block
                BreakStmt
          WhenStmt
            NameRef n
            WhenCase
              NumberLiteral 1
              NumberLiteral 2
              Block
                PrintStmt
                  StringLiteral "low"
            WhenCase else
              Block
          LoopStmt
            Block
              ExprStmt
                NameRef n
    "#);
}

#[test]
fn signature_parts() {
    let input = "f join<|T: string|>(sep: string = \", \", ...parts: T[]) -> string { return sep; }";

    insta::assert_snapshot!(dump(input), @r#"
    Program
      FunctionDecl join -> string
        TypeParam join.T: string
        Parameter join.sep: string
          StringLiteral ", "
        Parameter ...join.parts: T[]
        Block
          ReturnStmt
            NameRef sep
    "#);
}
