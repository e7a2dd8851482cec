use indoc::indoc;

use crate::analyze::scope::{ScopeId, ScopeTree};
use crate::analyze::symbols::{Symbol, SymbolKind};
use crate::analyze::types::Type;
use crate::ast::{AstPrinter, NodeIndex, NodeKind};
use crate::parser::parse;
use crate::test_utils::build;

use super::{AstBuilder, BuildOptions};

fn dump(src: &str) -> String {
    let (program, _) = build(src).unwrap();
    AstPrinter::new(&program).dump()
}

fn scopes(src: &str) -> ScopeTree {
    build(src).unwrap().1
}

/// Path of every scope, parents before children.
fn scope_paths(tree: &ScopeTree) -> String {
    fn walk(tree: &ScopeTree, id: ScopeId, out: &mut Vec<String>) {
        out.push(tree.path(id));
        for &child in tree.scope(id).children.values() {
            walk(tree, child, out);
        }
    }

    let mut out = Vec::new();
    walk(tree, ScopeId::ROOT, &mut out);
    out.join("\n")
}

fn build_error(src: &str) -> String {
    build(src).unwrap_err().to_string()
}

#[test]
fn nested_names_are_qualified() {
    let input = indoc! {"
    f main() {
        const x = 1_int8;
        f helper(a: int16) {
            let y = a;
        }
    }
    "};

    insta::assert_snapshot!(dump(input), @r"
    Program
      FunctionDecl main
        Block
          VariableDecl const
            VariableTarget main.x: int8
            NumberLiteral 1_int8
          FunctionDecl main.helper
            Parameter main.helper.a: int16
            Block
              VariableDecl let
                VariableTarget main.helper.y: int16
                NameRef a
    ");
}

#[test]
fn statement_scopes_are_named_by_offset() {
    let input = indoc! {"
    f main() {
        for i in [1_int8] { }
        loop { break; }
        { }
    }
    "};

    insta::assert_snapshot!(scope_paths(&scopes(input)), @r"
    global
    global.main
    global.main.$for@15
    global.main.$loop@41
    global.main.$block@61
    ");
}

#[test]
fn function_body_shares_function_scope() {
    let (program, tree) = build("f main() { const x = true; }").unwrap();

    let crate::ast::Declaration::Function(main) = &program.declarations[0] else {
        panic!("expected a function");
    };
    assert_eq!(main.body.scope, "main");
    let main_scope = tree.child(ScopeId::ROOT, "main").unwrap();
    assert!(tree.scope(main_scope).symbols.contains_key("x"));
    assert!(tree.root().symbols.contains_key("main"));
}

#[test]
fn loop_variable_is_immutable() {
    let tree = scopes("f main() { for i in [1_int8] { } }");

    let main = tree.child(ScopeId::ROOT, "main").unwrap();
    let for_scope = tree.child(main, "$for@11").unwrap();
    let (_, symbol) = tree
        .resolve_from(for_scope, "i", SymbolKind::VALUES)
        .unwrap();
    assert!(!symbol.is_mutable());
}

#[test]
fn returns_inferred_from_first_return() {
    let tree = scopes(r#"f pick() { return "a"; return 1_int8; }"#);

    let pick = tree.root().symbols["pick"].as_function().unwrap();
    assert_eq!(pick.return_types, [Type::String]);
    assert!(pick.returns_inferred);
}

#[test]
fn ambiguous_return_leaves_returns_unknown() {
    let tree = scopes("f pick() { return 1; }");

    let pick = tree.root().symbols["pick"].as_function().unwrap();
    assert!(pick.return_types.is_empty());
}

#[test]
fn declared_returns_are_kept() {
    insta::assert_snapshot!(dump("f two() -> int8, bool { return 1_int8, true; }"), @r"
    Program
      FunctionDecl two -> int8, bool
        Block
          ReturnStmt
            NumberLiteral 1_int8
            BoolLiteral true
    ");
}

#[test]
fn anonymous_function_takes_variable_name() {
    let input = "const g = f(x: int8) -> int8 { return x; };";

    insta::assert_snapshot!(dump(input), @r"
    Program
      VariableDecl const
        VariableTarget g: f(int8) -> int8
        AnonFunction g -> int8
          Parameter g.x: int8
          Block
            ReturnStmt
              NameRef x
    ");
    insta::assert_snapshot!(scope_paths(&scopes(input)), @r"
    global
    global.g
    ");
}

#[test]
fn anonymous_functions_without_single_target_keep_counter_names() {
    let input = "const a, b = f() { }, f() { };";

    insta::assert_snapshot!(scope_paths(&scopes(input)), @r"
    global
    global.$anon:0
    global.$anon:1
    ");
}

#[test]
fn enum_members_are_typed_by_enum() {
    let tree = scopes("enum Color { Red, Green = 2_int8 }");

    let color = tree.find_type_scope(ScopeId::ROOT, "Color").unwrap();
    let members: Vec<&str> = tree
        .scope(color)
        .symbols
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(members, ["Red", "Green"]);
    let Symbol::Variable(red) = &tree.scope(color).symbols["Red"] else {
        panic!("enum member should be a variable");
    };
    assert_eq!(red.declared_type, Some(Type::named("Color")));
    assert!(!red.mutable);
}

#[test]
fn duplicate_variable() {
    insta::assert_snapshot!(
        build_error("const x = 1_int8; const x = 2_int8;"),
        @"E005 at 1:25: `x` is already defined in this scope"
    );
}

#[test]
fn duplicate_function() {
    insta::assert_snapshot!(
        build_error("f a() {} f a() {}"),
        @"E005 at 1:12: `a` is already defined in this scope"
    );
}

#[test]
fn type_name_clashes_with_type_name() {
    insta::assert_snapshot!(
        build_error("enum Color { Red } class Color { }"),
        @"E005 at 1:20: `Color` is already defined in this scope"
    );
}

#[test]
fn repeated_parameter_is_declared_once() {
    let tree = scopes("f g(a: int8, a: int8) { }");

    let g = tree.child(ScopeId::ROOT, "g").unwrap();
    assert_eq!(tree.scope(g).symbols.len(), 1);
}

#[test]
fn failed_build_leaves_cursor_at_root() {
    let src = "f main() { { const x = 1_int8; const x = 2_int8; } }";
    let parsed = parse(src).unwrap();
    let mut builder = AstBuilder::new(src, &BuildOptions::default());

    let err = builder.build_program(&parsed.root).unwrap_err();

    assert_eq!(err.code(), Some("E005"));
    assert_eq!(builder.scopes().depth(), 0);
}

#[test]
fn invalid_assignment_target() {
    insta::assert_snapshot!(
        build_error("f main() { 1 = 2; }"),
        @"A045 at 1:12: cannot assign to literal"
    );
}

#[test]
fn suffixed_number_out_of_range() {
    insta::assert_snapshot!(
        build_error("const x = 300_int8;"),
        @"A047 at 1:11: number literal out of range: `300_int8` does not fit in int8"
    );
}

#[test]
fn invalid_string_escape() {
    insta::assert_snapshot!(
        build_error(r#"const s = "a\q";"#),
        @r"A048 at 1:11: invalid string literal: unknown escape `\q`"
    );
}

#[test]
fn empty_path() {
    insta::assert_snapshot!(
        build_error(r#"const p = p"";"#),
        @"A049 at 1:11: invalid path literal: path is empty"
    );
}

#[test]
fn invalid_regex() {
    insta::assert_snapshot!(
        build_error("const r = /a(/;"),
        @"A050 at 1:11: invalid regex literal: unclosed group"
    );
}

#[test]
fn recursion_fuel() {
    let src = "const x = !!!!true;";
    let parsed = parse(src).unwrap();
    let options = BuildOptions {
        recursion_fuel: Some(3),
    };
    let mut builder = AstBuilder::new(src, &options);

    let err = builder.build_program(&parsed.root).unwrap_err();

    insta::assert_snapshot!(err, @"recursion limit exceeded");
}

#[test]
fn operator_chain_does_not_consume_recursion_fuel() {
    let src = format!("const x = 1_int8{};", " + 1_int8".repeat(300));
    let parsed = parse(&src).unwrap();
    let options = BuildOptions {
        recursion_fuel: Some(3),
    };
    let mut builder = AstBuilder::new(&src, &options);

    let program = builder.build_program(&parsed.root).unwrap();

    assert_eq!(program.declarations.len(), 1);
}

#[test]
fn operator_chain_nests_to_the_left() {
    insta::assert_snapshot!(dump("const x = 1_int8 - 2_int8 * 3_int8 - 4_int8;"), @r"
    Program
      VariableDecl const
        VariableTarget x: int8
        BinaryExpr -
          BinaryExpr -
            NumberLiteral 1_int8
            BinaryExpr *
              NumberLiteral 2_int8
              NumberLiteral 3_int8
          NumberLiteral 4_int8
    ");
}

#[test]
fn operator_chain_ids_are_pre_order() {
    let (program, _) = build("const x = 1_int8 + 2_int8 + 3_int8;").unwrap();
    let index = NodeIndex::build(&program);

    let kinds: Vec<NodeKind> = index.iter().map(|(_, entry)| entry.kind).collect();

    assert_eq!(
        kinds[kinds.len() - 5..],
        [
            NodeKind::BinaryExpr,
            NodeKind::BinaryExpr,
            NodeKind::NumberLiteral,
            NodeKind::NumberLiteral,
            NodeKind::NumberLiteral,
        ]
    );
}
