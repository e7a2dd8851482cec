//! Id-addressed view of a built program.

use serde::Serialize;

use sable_core::Position;

use super::{AstNode, NodeId, NodeKind, Program, Visitor};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndexEntry {
    pub kind: NodeKind,
    pub pos: Position,
    pub parent: Option<NodeId>,
}

/// Flat table of every node in a program, indexed by [`NodeId`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct NodeIndex {
    entries: Vec<Option<IndexEntry>>,
}

impl NodeIndex {
    pub fn build(program: &Program) -> Self {
        let mut index = Self::default();
        index.visit_program(program);
        index
    }

    pub fn get(&self, id: NodeId) -> Option<&IndexEntry> {
        self.entries.get(id.0 as usize)?.as_ref()
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.get(id).map(|entry| entry.kind)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent
    }

    /// Ids from `id`'s parent up to the program root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), |&id| self.parent(id))
    }

    pub fn len(&self) -> usize {
        self.entries.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &IndexEntry)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| Some((NodeId(i as u32), entry.as_ref()?)))
    }
}

impl Visitor for NodeIndex {
    fn enter_node(&mut self, node: &dyn AstNode) {
        let slot = node.id().0 as usize;
        if self.entries.len() <= slot {
            self.entries.resize(slot + 1, None);
        }
        self.entries[slot] = Some(IndexEntry {
            kind: node.kind(),
            pos: node.pos(),
            parent: node.parent(),
        });
    }
}
