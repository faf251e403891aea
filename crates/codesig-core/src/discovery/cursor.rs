//! Backward cursor over a sibling list.

use crate::token::{NodeId, Token, TokenTree};

/// Reads a sibling list from a starting index towards its beginning.
///
/// `mark` remembers the current position and `reset` rewinds to it, so a
/// speculative read that does not match can be undone.
pub(crate) struct Cursor<'t> {
    tree: &'t TokenTree,
    nodes: &'t [NodeId],
    pos: usize,
    mark: usize,
}

impl<'t> Cursor<'t> {
    /// Cursor positioned just after `nodes[start - 1]`; the first `prev`
    /// returns the node before `start`.
    pub fn new(tree: &'t TokenTree, nodes: &'t [NodeId], start: usize) -> Self {
        let pos = start.min(nodes.len());
        Self {
            tree,
            nodes,
            pos,
            mark: pos,
        }
    }

    pub fn prev(&mut self) -> Option<(NodeId, &'t Token)> {
        self.pos = self.pos.checked_sub(1)?;
        let node = self.nodes[self.pos];
        Some((node, self.tree.token(node)))
    }

    pub fn mark(&mut self) {
        self.mark = self.pos;
    }

    pub fn reset(&mut self) {
        self.pos = self.mark;
    }
}
