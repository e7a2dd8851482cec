use std::collections::{BTreeMap, HashMap};

use sable_core::NumberSize;

use super::types::{FunctionType, Type, TypeSet};

fn num(size: NumberSize) -> Type {
    Type::Number(size)
}

#[test]
fn display_forms() {
    let callback = Type::Function(FunctionType {
        params: vec![num(NumberSize::Int32), Type::String],
        returns: vec![Type::Bool],
    });
    let object = Type::Object(BTreeMap::from([
        ("y".to_owned(), num(NumberSize::Dec64)),
        ("x".to_owned(), num(NumberSize::Dec64)),
    ]));
    let list = Type::Named {
        name: "List".to_owned(),
        args: vec![Type::Param("T".to_owned())],
    };

    insta::assert_snapshot!(callback, @"f(int32, string) -> bool");
    insta::assert_snapshot!(Type::array(callback), @"(f(int32, string) -> bool)[]");
    insta::assert_snapshot!(object, @"{x: dec64, y: dec64}");
    insta::assert_snapshot!(Type::Tuple(vec![Type::Path, Type::Regex]), @"(path, regex)");
    insta::assert_snapshot!(list, @"List<|T|>");
    insta::assert_snapshot!(Type::array(Type::array(Type::Bool)), @"bool[][]");
}

#[test]
fn function_without_returns() {
    let ty = Type::Function(FunctionType {
        params: Vec::new(),
        returns: Vec::new(),
    });

    insta::assert_snapshot!(ty, @"f()");
}

#[test]
fn numbers_widen_within_category() {
    let int16 = num(NumberSize::Int16);

    assert!(int16.is_assignable_to(&num(NumberSize::Int64)));
    assert!(int16.is_assignable_to(&int16));
    assert!(!int16.is_assignable_to(&num(NumberSize::Int8)));
    assert!(!int16.is_assignable_to(&num(NumberSize::UInt32)));
    assert!(!int16.is_assignable_to(&num(NumberSize::Dec64)));
    assert!(!Type::Bool.is_assignable_to(&Type::String));
    assert!(Type::named("Color").is_assignable_to(&Type::named("Color")));
}

#[test]
fn substitute_reaches_nested_params() {
    let bindings = HashMap::from([("T".to_owned(), num(NumberSize::UInt8))]);
    let ty = Type::Function(FunctionType {
        params: vec![Type::array(Type::Param("T".to_owned()))],
        returns: vec![Type::Tuple(vec![
            Type::Param("T".to_owned()),
            Type::Param("U".to_owned()),
        ])],
    });

    insta::assert_snapshot!(ty.substitute(&bindings), @"f(uint8[]) -> (uint8, U)");
}

#[test]
fn type_set_keeps_insertion_order() {
    let mut set = TypeSet::new();
    set.insert(num(NumberSize::Int8));
    set.insert(Type::Bool);
    set.insert(num(NumberSize::Int8));

    assert_eq!(set.len(), 2);
    assert_eq!(set.only(), None);
    insta::assert_snapshot!(set, @"{int8, bool}");
}

#[test]
fn type_set_intersection() {
    let left: TypeSet = [NumberSize::Int8, NumberSize::Int16, NumberSize::Dec32]
        .into_iter()
        .map(num)
        .collect();
    let right: TypeSet = [NumberSize::Dec32, NumberSize::Int16].into_iter().map(num).collect();

    let both = left.intersection(&right);

    insta::assert_snapshot!(both, @"{int16, dec32}");
    assert!(both.same_members(&right));
    assert!(!both.same_members(&left));
}

#[test]
fn empty_set_is_never_assignable() {
    assert!(!TypeSet::new().is_assignable_to(&Type::Bool));
}

#[test]
fn set_assignable_when_declared_is_candidate() {
    let set: TypeSet = [Type::String, Type::Path].into_iter().collect();

    assert!(set.is_assignable_to(&Type::Path));
    assert!(!set.is_assignable_to(&Type::Regex));
}

#[test]
fn set_assignable_when_every_number_widens() {
    let small: TypeSet = [NumberSize::Int8, NumberSize::Int16].into_iter().map(num).collect();
    let mixed: TypeSet = [NumberSize::Int8, NumberSize::UInt8].into_iter().map(num).collect();

    assert!(small.is_assignable_to(&num(NumberSize::Int32)));
    assert!(!mixed.is_assignable_to(&num(NumberSize::Int32)));
    assert!(mixed.is_assignable_to(&num(NumberSize::UInt8)));
}
