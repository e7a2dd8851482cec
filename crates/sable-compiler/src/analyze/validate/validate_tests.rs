use indoc::indoc;

use crate::analysis::Analyzed;
use crate::test_utils::{expect_error, expect_snippet_error};

fn error(src: &str) -> String {
    expect_error(src).to_string()
}

#[test]
fn empty_program_has_no_main() {
    insta::assert_snapshot!(error(""), @"E001: no `main` function found");
}

#[test]
fn main_is_case_sensitive() {
    insta::assert_snapshot!(error("f Main {}"), @"E001: no `main` function found");
}

#[test]
fn main_without_parameter_list() {
    Analyzed::expect_valid("f main {}");
}

#[test]
fn main_with_type_parameters() {
    insta::assert_snapshot!(
        error("f main<|T|>() {}"),
        @"E002 at 1:1: `main` cannot have type parameters: T"
    );
}

#[test]
fn main_with_parameters() {
    insta::assert_snapshot!(
        error("f main(a: int32) {}"),
        @"E003 at 1:1: `main` cannot have parameters: a"
    );
}

#[test]
fn main_with_declared_returns() {
    insta::assert_snapshot!(
        error("f main() -> int32 { return 1_int32; }"),
        @"E004 at 1:1: `main` cannot return values: int32"
    );
}

#[test]
fn main_with_declared_returns_and_empty_body() {
    insta::assert_snapshot!(
        error("f main() -> int32 {}"),
        @"E004 at 1:1: `main` cannot return values: int32"
    );
}

#[test]
fn rest_parameter_anywhere_but_last() {
    for params in ["...a: int8[], b: int8", "x: bool, ...a: int8[], b: int8, c: int8"] {
        let src = format!("f g({params}) {{}} f main() {{}}");
        let err = expect_error(&src);
        assert_eq!(err.code(), Some("E006"), "{src}");
    }
}

#[test]
fn main_with_inferred_returns() {
    insta::assert_snapshot!(
        error("f main() { return true; }"),
        @"E004 at 1:1: `main` cannot return values: bool"
    );
}

#[test]
fn snippet_needs_no_main() {
    Analyzed::expect_valid_snippet("const x = true;");
}

#[test]
fn snippet_still_checks_rules() {
    let err = expect_snippet_error("const x = 1;");

    assert_eq!(err.code(), Some("E009"));
}

#[test]
fn rest_parameter_not_last() {
    insta::assert_snapshot!(
        error("f g(...a: int8[], b: int8) {} f main() {}"),
        @"E006 at 1:5: rest parameter `a` must be last"
    );
}

#[test]
fn duplicate_parameter() {
    insta::assert_snapshot!(
        error("f g(a: int8, a: int8) {} f main() {}"),
        @"E007 at 1:14: parameter `a` is declared more than once"
    );
}

#[test]
fn parameter_without_type_or_default() {
    insta::assert_snapshot!(
        error("f g(a) {} f main() {}"),
        @"E008 at 1:5: `a` needs a type annotation or a value"
    );
}

#[test]
fn parameter_default_fixes_type() {
    Analyzed::expect_valid("f g(loud = false) {} f main() { g(); }");
}

#[test]
fn unsuffixed_literal_is_ambiguous() {
    insta::assert_snapshot!(
        error("f main() { const x = 1; }"),
        @"E009 at 1:18: type of `x` cannot be inferred, its value has one of {int8, int16, int32, int64, uint8, uint16, uint32, uint64, dec32, dec64}"
    );
}

#[test]
fn declared_type_disagrees_with_value() {
    insta::assert_snapshot!(
        error("f main() { const x: bool = 1_int8; }"),
        @"E010 at 1:18: `x` is declared as `bool` but its value has `int8`"
    );
}

#[test]
fn narrower_number_widens() {
    Analyzed::expect_valid("f main() { const x: int64 = 1_int8; let y: dec64 = 2; }");
}

#[test]
fn numbers_do_not_cross_categories() {
    insta::assert_snapshot!(
        error("f main() { const x: uint64 = 1_int8; }"),
        @"E010 at 1:18: `x` is declared as `uint64` but its value has `int8`"
    );
}

#[test]
fn more_values_than_targets() {
    insta::assert_snapshot!(
        error("f main() { const a, b = true, false, true; }"),
        @"E011 at 1:12: 2 targets but 3 values"
    );
}

#[test]
fn destructuring_call() {
    let input = indoc! {"
    f pair() -> int8, bool { return 1_int8, true; }
    f main() { const a, b = pair(); }
    "};

    Analyzed::expect_valid(input);
}

#[test]
fn destructuring_too_many_targets() {
    let input = indoc! {"
    f pair() -> int8, bool { return 1_int8, true; }
    f main() { const a, b, c = pair(); }
    "};

    insta::assert_snapshot!(error(input), @"E011 at 2:12: 3 targets but the value produces 2");
}

#[test]
fn return_without_value() {
    insta::assert_snapshot!(
        error("f g() -> int8 { return; } f main() {}"),
        @"E012 at 1:17: `g` returns 1 values, found 0"
    );
}

#[test]
fn return_of_wrong_type() {
    insta::assert_snapshot!(
        error("f g() -> int8 { return true; } f main() {}"),
        @"E010 at 1:24: `g` returns `int8`, found `bool`"
    );
}

#[test]
fn later_returns_follow_inferred_types() {
    insta::assert_snapshot!(
        error(r#"f g() { return "a"; return true; } f main() {}"#),
        @"E010 at 1:28: `g` returns `string`, found `bool`"
    );
}

#[test]
fn undefined_identifier() {
    insta::assert_snapshot!(error("f main() { y; }"), @"E013 at 1:12: `y` is not defined");
}

#[test]
fn later_declarations_are_visible() {
    Analyzed::expect_valid("f main() { helper(); } f helper() {}");
}

#[test]
fn print_takes_strings() {
    insta::assert_snapshot!(
        error("f main() { print 1_int8; }"),
        @"E010 at 1:18: `print` takes `string`, found `int8`"
    );
}

#[test]
fn assign_to_const() {
    insta::assert_snapshot!(
        error("f main() { const x = true; x = false; }"),
        @"E019 at 1:28: cannot assign to `x`"
    );
}

#[test]
fn assign_to_let() {
    Analyzed::expect_valid("f main() { let x = 1_int8; x = 2; }");
}

#[test]
fn assign_wrong_type() {
    insta::assert_snapshot!(
        error(r#"f main() { let x = true; x = "s"; }"#),
        @"E010 at 1:30: cannot assign `string` to a `bool`"
    );
}

#[test]
fn assign_to_enum_member() {
    let input = indoc! {"
    enum Color { Red }
    f main() { Color.Red = Color.Red; }
    "};

    insta::assert_snapshot!(error(input), @"E019 at 2:12: cannot assign to `Red`");
}

#[test]
fn if_condition_must_be_bool() {
    insta::assert_snapshot!(
        error("f main() { if 1_int8 { } }"),
        @"E020 at 1:15: condition must be a `bool`, found `int8`"
    );
}

#[test]
fn else_if_condition_must_be_bool() {
    insta::assert_snapshot!(
        error(r#"f main() { if true { } else if "s" { } }"#),
        @"E020 at 1:32: condition must be a `bool`, found `string`"
    );
}

#[test]
fn ternary_condition_must_be_bool() {
    insta::assert_snapshot!(
        error("f main() { const x = 1_int8 ? true : false; }"),
        @"E020 at 1:22: condition must be a `bool`, found `int8`"
    );
}

#[test]
fn for_needs_array() {
    insta::assert_snapshot!(
        error("f main() { for i in true { } }"),
        @"E021 at 1:21: cannot iterate over `bool`"
    );
}

#[test]
fn argument_count() {
    let input = indoc! {"
    f add(a: int8, b: int8) -> int8 { return a + b; }
    f main() { add(1_int8); }
    "};

    insta::assert_snapshot!(error(input), @"E018 at 2:12: `add` takes 2 arguments, found 1");
}

#[test]
fn defaults_make_arguments_optional() {
    let input = indoc! {r#"
    f greet(name: string, loud: bool = false) { }
    f main() { greet("a"); greet("a", true); greet(); }
    "#};

    insta::assert_snapshot!(
        error(input),
        @"E018 at 2:42: `greet` takes 1 to 2 arguments, found 0"
    );
}

#[test]
fn rest_arguments_use_element_type() {
    let input = indoc! {"
    f sum(...xs: int8[]) { }
    f main() { sum(1_int8, 2_int8, true); }
    "};

    insta::assert_snapshot!(
        error(input),
        @"E010 at 2:32: argument `xs` of `sum` takes `int8`, found `bool`"
    );
}

#[test]
fn call_of_non_function() {
    insta::assert_snapshot!(
        error("f main() { const x = true; x(); }"),
        @"E015 at 1:28: `x` is not a function"
    );
}

#[test]
fn missing_type_arguments() {
    let input = indoc! {"
    f id<|T|>(x: T) -> T { return x; }
    f main() { id(true); }
    "};

    insta::assert_snapshot!(
        error(input),
        @"E016 at 2:12: `id` takes 1 type arguments, found 0"
    );
}

#[test]
fn generic_call() {
    let input = indoc! {"
    f id<|T|>(x: T) -> T { return x; }
    f main() { const b = id<|bool|>(true); }
    "};

    Analyzed::expect_valid(input);
}

#[test]
fn type_argument_constraint() {
    let input = indoc! {"
    f show<|T: string|>(x: T) { }
    f main() { show<|bool|>(true); }
    "};

    insta::assert_snapshot!(
        error(input),
        @"E017 at 2:18: `bool` does not satisfy `T: string` of `show`"
    );
}

#[test]
fn undefined_member() {
    let input = indoc! {"
    enum Color { Red }
    f main() { Color.Blue; }
    "};

    insta::assert_snapshot!(error(input), @"E014 at 2:12: `Color` has no member `Blue`");
}

#[test]
fn anonymous_function_value_is_callable() {
    let input = indoc! {"
    f main() {
        const double = f(x: int16) -> int16 { return x * 2; };
        const y: int16 = double(3_int16);
    }
    "};

    Analyzed::expect_valid(input);
}

#[test]
fn bound_function_inside_main() {
    let input = "f main() { const g = f(a: int32) -> int32 { return a; }; const r = g(1_int32); }";

    let analyzed = Analyzed::expect_valid(input);

    let main = analyzed.scopes().find_scope("main").unwrap();
    assert!(analyzed.scopes().child(main, "g").is_some());
}

#[test]
fn bound_function_at_top_level() {
    let input = indoc! {"
    const g = f(a: int32) -> int32 { return a; };
    f main() { const r = g(1_int32); }
    "};

    Analyzed::expect_valid(input);
}

#[test]
fn anonymous_function_nested_in_bound_one() {
    let input = indoc! {"
    const outer = f(a: int32) -> int32 {
        const inner = f(b: int32) -> int32 { return b; };
        const free = [f() { }];
        if true { return inner(a); }
        return a;
    };
    f main() { const r = outer(2_int32); }
    "};

    let analyzed = Analyzed::expect_valid(input);

    let outer = analyzed.scopes().find_scope("outer").unwrap();
    assert!(analyzed.scopes().child(outer, "inner").is_some());
    assert!(analyzed.scopes().child(outer, "$anon:2").is_some());
}

#[test]
fn undefined_initializer_name_comes_before_inference() {
    insta::assert_snapshot!(
        error("f main() { const x = undefinedThing; }"),
        @"E013 at 1:22: `undefinedThing` is not defined"
    );
}

#[test]
fn undefined_default_name_comes_before_inference() {
    insta::assert_snapshot!(
        error("f g(a = ghost) {} f main() {}"),
        @"E013 at 1:9: `ghost` is not defined"
    );
}

#[test]
fn complete_program() {
    let input = indoc! {r#"
    enum Color { Red, Green }
    interface Shape { area: dec64; }
    f area(w: dec64, h: dec64) -> dec64 {
        return w * h;
    }
    f main() {
        let total: dec64 = 0;
        for side in [1.5, 2.5] {
            total = total + area(side, side);
        }
        const c = Color.Red;
        if total > 3 { print "big"; } else { print "small"; }
        when c { Color.Red => { print "red"; } else => { } }
        loop { break; }
    }
    "#};

    Analyzed::expect_valid(input);
}
