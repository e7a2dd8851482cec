use sable_core::Position;

use crate::test_utils::build;

use super::{Declaration, DeclaresNames, Identifier, NodeId, NodeMeta, prefix_declared_names};

fn ident(name: &str) -> Identifier {
    Identifier::new(NodeMeta::new(NodeId(0), Position::default()), name)
}

fn fqns(node: &mut impl DeclaresNames) -> Vec<String> {
    let mut out = Vec::new();
    node.declared_names_mut(&mut |ident| out.push(ident.fqn.clone()));
    out
}

#[test]
fn prepend_accumulates() {
    let mut x = ident("x");

    x.prepend_fqn("helper.");
    x.prepend_fqn("main.");

    assert_eq!(x.fqn, "main.helper.x");
    assert_eq!(x.name, "x");
}

#[test]
fn bare_separator_is_ignored() {
    let mut x = ident("x");

    x.prepend_fqn(".");
    x.prepend_fqn("");

    assert_eq!(x.fqn, "x");
}

#[test]
fn top_level_names_stay_bare() {
    let (program, _) = build("const a = true; f main() { }").unwrap();

    insta::assert_snapshot!(crate::ast::AstPrinter::new(&program).dump(), @r"
    Program
      VariableDecl const
        VariableTarget a: bool
        BoolLiteral true
      FunctionDecl main
        Block
    ");
}

#[test]
fn declared_names_cover_nested_statements() {
    let src = "f main() { const a = true; for i in [true] { let b = i; } }";
    let (mut program, _) = build(src).unwrap();
    let Declaration::Function(main) = &mut program.declarations[0] else {
        panic!("expected a function");
    };

    assert_eq!(fqns(main), ["main", "main.a", "main.i", "main.b"]);

    prefix_declared_names(main, "pkg.");

    assert_eq!(fqns(main), ["pkg.main", "pkg.main.a", "pkg.main.i", "pkg.main.b"]);
}

#[test]
fn type_members_are_qualified() {
    let input = "enum Color { Red } interface Shape { area: dec64; }";
    let (program, _) = build(input).unwrap();

    insta::assert_snapshot!(crate::ast::AstPrinter::new(&program).dump(), @r"
    Program
      EnumDecl Color
        EnumMember Color.Red
      InterfaceDecl Shape
        InterfaceMember Shape.area: dec64
    ");
}
