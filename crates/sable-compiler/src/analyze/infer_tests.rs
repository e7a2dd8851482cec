use crate::test_utils::build;

use super::infer::Inference;
use super::scope::ScopeId;
use super::symbols::SymbolKind;

/// Candidate types of the global `name` declared in `src`.
fn infer(src: &str, name: &str) -> String {
    let (_, scopes) = build(src).unwrap();
    let (owner, symbol) = scopes
        .resolve_from(ScopeId::ROOT, name, SymbolKind::ANY)
        .unwrap_or_else(|| panic!("`{name}` is not declared"));
    Inference::new(&scopes)
        .symbol_types(owner, name, symbol)
        .to_string()
}

#[test]
fn unsuffixed_integer_fits_every_size() {
    insta::assert_snapshot!(
        infer("const x = 1;", "x"),
        @"{int8, int16, int32, int64, uint8, uint16, uint32, uint64, dec32, dec64}"
    );
}

#[test]
fn integer_value_rules_out_small_sizes() {
    insta::assert_snapshot!(
        infer("const x = 300;", "x"),
        @"{int16, int32, int64, uint16, uint32, uint64, dec32, dec64}"
    );
}

#[test]
fn decimal_literal() {
    insta::assert_snapshot!(infer("const x = 1.5;", "x"), @"{dec32, dec64}");
}

#[test]
fn negation_drops_unsigned_sizes() {
    insta::assert_snapshot!(
        infer("const x = -1;", "x"),
        @"{int8, int16, int32, int64, dec32, dec64}"
    );
}

#[test]
fn suffix_narrows_through_names() {
    let src = "const x = 1_int16; const y = x + 2;";

    insta::assert_snapshot!(infer(src, "y"), @"{int16}");
}

#[test]
fn boolean_operators() {
    insta::assert_snapshot!(infer("const b = 1_int8 < 2;", "b"), @"{bool}");
    insta::assert_snapshot!(infer("const b = !1_int8;", "b"), @"{bool}");
}

#[test]
fn targets_take_values_by_position() {
    let src = r#"const a, b = /x+/, "s";"#;

    insta::assert_snapshot!(infer(src, "a"), @"{regex}");
    insta::assert_snapshot!(infer(src, "b"), @"{string}");
}

#[test]
fn negative_exponent_is_decimal() {
    insta::assert_snapshot!(infer("const p = 2_int16 ^e -1_int16;", "p"), @"{dec32, dec64}");
    insta::assert_snapshot!(infer("const p = 2_int16 ^e 2;", "p"), @"{int16}");
}

#[test]
fn ternary_keeps_common_types() {
    insta::assert_snapshot!(infer("const t = true ? 1_int8 : 2;", "t"), @"{int8}");
    insta::assert_snapshot!(infer(r#"const t = true ? 1_int8 : "s";"#, "t"), @"{}");
}

#[test]
fn arrays_and_indexing() {
    let src = "const xs = [1_uint8, 2]; const first = xs[0];";

    insta::assert_snapshot!(infer(src, "xs"), @"{uint8[]}");
    insta::assert_snapshot!(infer(src, "first"), @"{uint8}");
    insta::assert_snapshot!(infer("const xs = [];", "xs"), @"{}");
}

#[test]
fn object_shape() {
    let src = r#"const o = {b: "s", a: 1_int8}; const v = o.a;"#;

    insta::assert_snapshot!(infer(src, "o"), @"{{a: int8, b: string}}");
    insta::assert_snapshot!(infer(src, "v"), @"{int8}");
}

#[test]
fn tuple_shapes_multiply() {
    insta::assert_snapshot!(
        infer("const t = (true, 1.0);", "t"),
        @"{(bool, dec32), (bool, dec64)}"
    );
}

#[test]
fn mutual_references_are_unknown() {
    let src = "const a = b; const b = a;";

    insta::assert_snapshot!(infer(src, "a"), @"{}");
}

#[test]
fn call_uses_declared_returns() {
    let src = "f twice(x: int32) -> int32 { return x; } const y = twice(1_int32);";

    insta::assert_snapshot!(infer(src, "y"), @"{int32}");
}

#[test]
fn call_uses_inferred_returns() {
    let src = r#"f pick() { return "a"; } const s = pick();"#;

    insta::assert_snapshot!(infer(src, "s"), @"{string}");
}

#[test]
fn call_substitutes_type_arguments() {
    let src = "f id<|T|>(x: T) -> T { return x; } const n = id<|bool|>(true);";

    insta::assert_snapshot!(infer(src, "n"), @"{bool}");
}

#[test]
fn destructuring_a_call() {
    let src = r#"f pair() -> int8, string { return 1_int8, "a"; } const a, b = pair();"#;

    insta::assert_snapshot!(infer(src, "a"), @"{int8}");
    insta::assert_snapshot!(infer(src, "b"), @"{string}");
}

#[test]
fn enum_member_has_enum_type() {
    let src = "enum Color { Red, Green } const c = Color.Red;";

    insta::assert_snapshot!(infer(src, "c"), @"{Color}");
}

#[test]
fn anonymous_function_has_its_signature() {
    let src = "const g = f(x: int8) -> int8 { return x; };";

    insta::assert_snapshot!(infer(src, "g"), @"{f(int8) -> int8}");
}

#[test]
fn undefined_name_is_unknown() {
    insta::assert_snapshot!(infer("const x = y;", "x"), @"{}");
}

#[test]
fn declared_type_narrows_later_uses() {
    let src = "const foo: int16 = 1; const bar = foo;";

    insta::assert_snapshot!(infer(src, "bar"), @"{int16}");
}

#[test]
fn both_targets_follow_a_shared_source() {
    let src = "const foo = /a-z/; const bar, baz = foo, foo;";

    insta::assert_snapshot!(infer(src, "bar"), @"{regex}");
    insta::assert_snapshot!(infer(src, "baz"), @"{regex}");
}
