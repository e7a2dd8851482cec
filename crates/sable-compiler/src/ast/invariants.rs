//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use std::collections::HashSet;

use super::{AstNode, NodeId, Program, Visitor};

/// Checks that ids are unique and every node's parent is the node that
/// structurally contains it.
pub(crate) fn assert_ownership(program: &Program) {
    let mut check = OwnershipCheck::default();
    check.visit_program(program);
}

#[derive(Default)]
struct OwnershipCheck {
    stack: Vec<NodeId>,
    seen: HashSet<NodeId>,
}

impl Visitor for OwnershipCheck {
    fn enter_node(&mut self, node: &dyn AstNode) {
        let id = node.id();
        assert!(self.seen.insert(id), "ast: duplicate node id {id}");
        assert_eq!(
            node.parent(),
            self.stack.last().copied(),
            "ast: {} {id} has the wrong owner",
            node.kind(),
        );
        if let Some(&parent) = self.stack.last() {
            assert!(parent < id, "ast: {id} allocated before its owner {parent}");
        }
        self.stack.push(id);
    }

    fn leave_node(&mut self, _node: &dyn AstNode) {
        self.stack.pop();
    }
}
