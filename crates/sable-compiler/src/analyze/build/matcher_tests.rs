use crate::parser::KindSet;
use crate::parser::SyntaxKind::{self, *};
use crate::test_utils::{build_tree_error, node, token};

use super::{Requirement, SlotAutomaton, SlotSpec, Step};

struct Spec(KindSet, Requirement);

impl SlotSpec for Spec {
    fn accepts(&self) -> KindSet {
        self.0
    }

    fn requirement(&self) -> Requirement {
        self.1
    }
}

fn required(kind: SyntaxKind) -> Spec {
    Spec(KindSet::single(kind), Requirement::Required)
}

fn optional(kind: SyntaxKind) -> Spec {
    Spec(KindSet::single(kind), Requirement::Optional)
}

fn after(previous: SyntaxKind, kind: SyntaxKind) -> Spec {
    Spec(
        KindSet::single(kind),
        Requirement::RequiredAfter(KindSet::single(previous)),
    )
}

/// Steps up to and including the first final one.
fn run(slots: &[Spec], kinds: &[SyntaxKind]) -> Vec<Step> {
    let mut automaton = SlotAutomaton::new(slots, kinds);
    let mut steps = Vec::new();
    loop {
        let step = automaton.step();
        steps.push(step);
        if !matches!(step, Step::Take { .. } | Step::Skip { .. }) {
            return steps;
        }
    }
}

#[test]
fn required_slots_take_children_in_order() {
    let steps = run(&[required(Id), required(Colon)], &[Id, Colon]);

    assert_eq!(
        steps,
        [
            Step::Take { slot: 0, child: 0 },
            Step::Take { slot: 1, child: 1 },
            Step::Done,
        ]
    );
}

#[test]
fn optional_slot_is_skipped_without_consuming() {
    let steps = run(&[optional(Ellipsis), required(Id)], &[Id]);

    assert_eq!(
        steps,
        [
            Step::Skip { slot: 0 },
            Step::Take { slot: 1, child: 0 },
            Step::Done,
        ]
    );
}

#[test]
fn conditional_slot_is_optional_without_its_trigger() {
    let slots = [required(Id), optional(Colon), after(Colon, NamedType)];

    let steps = run(&slots, &[Id]);

    assert_eq!(
        steps,
        [
            Step::Take { slot: 0, child: 0 },
            Step::Skip { slot: 1 },
            Step::Skip { slot: 2 },
            Step::Done,
        ]
    );
}

#[test]
fn conditional_slot_is_required_after_its_trigger() {
    let slots = [required(Id), optional(Colon), after(Colon, NamedType)];

    assert_eq!(run(&slots, &[Id, Colon]).last(), Some(&Step::Missing { slot: 2 }));
    assert_eq!(
        run(&slots, &[Id, Colon, Comma]).last(),
        Some(&Step::Mismatch { slot: 2, child: 2 })
    );
}

#[test]
fn missing_required_child() {
    assert_eq!(run(&[required(Id)], &[]), [Step::Missing { slot: 0 }]);
}

#[test]
fn wrong_kind_for_required_slot() {
    assert_eq!(
        run(&[required(Id)], &[Comma]),
        [Step::Mismatch { slot: 0, child: 0 }]
    );
}

#[test]
fn children_left_after_last_slot() {
    let steps = run(&[required(Id)], &[Id, Comma, Comma]);

    assert_eq!(
        steps,
        [Step::Take { slot: 0, child: 0 }, Step::Leftover { child: 1 }]
    );
}

#[test]
fn final_step_repeats() {
    let slots = [required(Id)];
    let kinds = [Id];
    let mut automaton = SlotAutomaton::new(&slots, &kinds);

    assert_eq!(automaton.step(), Step::Take { slot: 0, child: 0 });
    assert_eq!(automaton.step(), Step::Done);
    assert_eq!(automaton.step(), Step::Done);
    assert_eq!(automaton.last_taken(), Some(0));
}

#[test]
fn missing_required_node_points_past_last_child() {
    // f main()
    let root = node(
        Root,
        vec![node(
            FunctionDecl,
            vec![
                token(KwF, "f"),
                token(Whitespace, " "),
                token(Id, "main"),
                node(
                    ParamList,
                    vec![token(ParenOpen, "("), token(ParenClose, ")")],
                ),
            ],
        )],
    );

    let err = build_tree_error(&root);

    insta::assert_snapshot!(err, @"A006 at 1:7: expected function body, found end of function");
}

#[test]
fn conditional_slot_mismatch() {
    // const x = ;
    let root = node(
        Root,
        vec![node(
            VariableDecl,
            vec![
                token(KwConst, "const"),
                token(Whitespace, " "),
                node(TargetList, vec![node(VariableTarget, vec![token(Id, "x")])]),
                token(Whitespace, " "),
                token(Equals, "="),
                token(Whitespace, " "),
                token(Semicolon, ";"),
            ],
        )],
    );

    let err = build_tree_error(&root);

    insta::assert_snapshot!(err, @"A026 at 1:11: expected initializer after `=`, found `;`");
}

#[test]
fn leftover_child_is_unexpected() {
    // f main() { break;; }
    let root = node(
        Root,
        vec![node(
            FunctionDecl,
            vec![
                token(KwF, "f"),
                token(Whitespace, " "),
                token(Id, "main"),
                node(
                    ParamList,
                    vec![token(ParenOpen, "("), token(ParenClose, ")")],
                ),
                token(Whitespace, " "),
                node(
                    Block,
                    vec![
                        token(BraceOpen, "{"),
                        token(Whitespace, " "),
                        node(
                            BreakStmt,
                            vec![
                                token(KwBreak, "break"),
                                token(Semicolon, ";"),
                                token(Semicolon, ";"),
                            ],
                        ),
                        token(Whitespace, " "),
                        token(BraceClose, "}"),
                    ],
                ),
            ],
        )],
    );

    let err = build_tree_error(&root);

    insta::assert_snapshot!(err, @"A001 at 1:18: unexpected `;`");
}

#[test]
fn list_without_closing_delimiter() {
    // f main({}
    let root = node(
        Root,
        vec![node(
            FunctionDecl,
            vec![
                token(KwF, "f"),
                token(Whitespace, " "),
                token(Id, "main"),
                node(ParamList, vec![token(ParenOpen, "(")]),
                node(Block, vec![token(BraceOpen, "{"), token(BraceClose, "}")]),
            ],
        )],
    );

    let err = build_tree_error(&root);

    insta::assert_snapshot!(err, @"A041 at 1:7: expected `)`, found end of parameter list");
}

#[test]
fn list_items_need_separators() {
    // f g(a b) {}
    let root = node(
        Root,
        vec![node(
            FunctionDecl,
            vec![
                token(KwF, "f"),
                token(Whitespace, " "),
                token(Id, "g"),
                node(
                    ParamList,
                    vec![
                        token(ParenOpen, "("),
                        node(Param, vec![token(Id, "a")]),
                        token(Whitespace, " "),
                        node(Param, vec![token(Id, "b")]),
                        token(ParenClose, ")"),
                    ],
                ),
                token(Whitespace, " "),
                node(Block, vec![token(BraceOpen, "{"), token(BraceClose, "}")]),
            ],
        )],
    );

    let err = build_tree_error(&root);

    insta::assert_snapshot!(err, @"A041 at 1:7: expected `,`, found parameter");
}

#[test]
fn list_rejects_foreign_items() {
    // f main() {x}
    let root = node(
        Root,
        vec![node(
            FunctionDecl,
            vec![
                token(KwF, "f"),
                token(Whitespace, " "),
                token(Id, "main"),
                node(
                    ParamList,
                    vec![token(ParenOpen, "("), token(ParenClose, ")")],
                ),
                token(Whitespace, " "),
                node(
                    Block,
                    vec![token(BraceOpen, "{"), token(Id, "x"), token(BraceClose, "}")],
                ),
            ],
        )],
    );

    let err = build_tree_error(&root);

    insta::assert_snapshot!(err, @"A001 at 1:11: unexpected identifier");
}
