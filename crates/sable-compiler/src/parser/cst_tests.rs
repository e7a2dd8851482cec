use rowan::Language;

use super::cst::SyntaxKind::{self, *};
use super::cst::{KindSet, SableLang, kind_sets};

#[test]
fn every_kind_fits_in_kind_set() {
    assert!((SyntaxKind::__LAST as u16) <= 128);
}

#[test]
fn kind_set_membership() {
    let set = KindSet::new(&[Id, Number]);

    assert!(set.contains(Id));
    assert!(set.contains(Number));
    assert!(!set.contains(Comma));
    assert!(!KindSet::EMPTY.contains(Id));
}

#[test]
fn kind_set_holds_node_kinds() {
    let set = KindSet::single(ArrayType).union(KindSet::single(Root));

    assert!(set.contains(ArrayType));
    assert!(set.contains(Root));
    assert!(!set.contains(TypeList));
}

#[test]
fn kind_set_debug_lists_members() {
    let set = KindSet::new(&[Semicolon, Comma]);

    assert_eq!(format!("{set:?}"), "{Comma, Semicolon}");
}

#[test]
fn raw_kind_round_trip() {
    for kind in [ParenOpen, KwWhen, RegexLit, Root, WhenCase, ArrayType] {
        assert_eq!(SableLang::kind_from_raw(SableLang::kind_to_raw(kind)), kind);
    }
}

#[test]
fn trivia_and_node_predicates() {
    assert!(LineComment.is_trivia());
    assert!(!Id.is_trivia());
    assert!(Garbage.is_error());
    assert!(FunctionDecl.is_node());
    assert!(!Semicolon.is_node());
}

#[test]
fn expression_and_type_sets_are_disjoint() {
    for kind in [NameRef, CallExpr, AnonFunction, Literal] {
        assert!(kind_sets::EXPR.contains(kind));
        assert!(!kind_sets::TYPE.contains(kind));
    }
    assert!(kind_sets::TYPE.contains(InstanceType));
    assert!(kind_sets::STATEMENT.contains(FunctionDecl));
}

#[test]
fn kind_set_describe_merges_shared_names() {
    let set = KindSet::new(&[Colon, Plus, Minus]);

    assert_eq!(set.describe(), "`:` or operator");
}
