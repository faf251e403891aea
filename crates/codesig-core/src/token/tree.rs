//! Arena-owned ordered tree.
//!
//! Nodes live in one vector and refer to each other by `NodeId`. The parent
//! index is only used for upward queries; ownership is strictly top-down.

use super::{Token, TokenKind};

/// Handle to a node inside a `Tree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
struct Node<T> {
    value: T,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Ordered n-ary tree with arena storage.
#[derive(Debug, Clone)]
pub struct Tree<T> {
    nodes: Vec<Node<T>>,
    root: NodeId,
}

/// Tree produced by the tokenizer.
pub type TokenTree = Tree<Token>;

impl<T> Tree<T> {
    /// Create a tree containing only a root node.
    pub fn new(root: T) -> Self {
        Self {
            nodes: vec![Node {
                value: root,
                parent: None,
                children: Vec::new(),
            }],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> &T {
        &self.nodes[id.index()].value
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut T {
        &mut self.nodes[id.index()].value
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Append a new child to `parent`.
    pub fn push_child(&mut self, parent: NodeId, value: T) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            value,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Move the trailing children of `from` that satisfy `inside` into `to`.
    ///
    /// Scanning stops at the first child (from the end) that is not inside.
    /// `to` itself is never moved. Relative order is preserved.
    pub fn adopt_trailing(&mut self, from: NodeId, to: NodeId, inside: impl Fn(&T) -> bool) -> usize {
        let siblings = &self.nodes[from.index()].children;
        let mut start = siblings.len();
        while start > 0 {
            let candidate = siblings[start - 1];
            if candidate == to {
                start -= 1;
                continue;
            }
            if !inside(&self.nodes[candidate.index()].value) {
                break;
            }
            start -= 1;
        }

        let siblings = &mut self.nodes[from.index()].children;
        let mut moved = siblings.split_off(start);
        if let Some(at) = moved.iter().position(|&id| id == to) {
            moved.remove(at);
            siblings.push(to);
        }

        for &id in &moved {
            self.nodes[id.index()].parent = Some(to);
        }
        let count = moved.len();
        let target = &mut self.nodes[to.index()].children;
        let mut merged = moved;
        merged.append(target);
        *target = merged;
        count
    }

    /// Nearest ancestor of `id` (excluding `id`) within `max_depth` levels
    /// that satisfies `pred`.
    pub fn ancestor_where(&self, id: NodeId, max_depth: usize, pred: impl Fn(&T) -> bool) -> Option<NodeId> {
        let mut current = self.parent(id);
        let mut depth = 0;
        while let Some(node) = current {
            if depth >= max_depth {
                return None;
            }
            if pred(self.get(node)) {
                return Some(node);
            }
            current = self.parent(node);
            depth += 1;
        }
        None
    }

    /// Pre-order walk from `start`. The callback receives the node, its
    /// value, its depth relative to `start` and its parent.
    pub fn visit(&self, start: NodeId, mut f: impl FnMut(NodeId, &T, usize, Option<NodeId>)) {
        let mut stack = vec![(start, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            f(id, self.get(id), depth, self.parent(id));
            for &child in self.children(id).iter().rev() {
                stack.push((child, depth + 1));
            }
        }
    }

    /// Rebuild the tree with a new payload per node, keeping its shape.
    ///
    /// `f` receives the original value and the already-transformed parent.
    pub fn transform<U>(&self, mut f: impl FnMut(&T, Option<&U>) -> U) -> Tree<U> {
        let mut out = Tree::new(f(self.get(self.root), None));
        let mut stack: Vec<(NodeId, NodeId)> = self
            .children(self.root)
            .iter()
            .rev()
            .map(|&child| (child, out.root))
            .collect();

        while let Some((old, new_parent)) = stack.pop() {
            let value = f(self.get(old), Some(out.get(new_parent)));
            let new_id = out.push_child(new_parent, value);
            for &child in self.children(old).iter().rev() {
                stack.push((child, new_id));
            }
        }
        out
    }
}

impl Tree<Token> {
    /// Tree with an empty `Document` root.
    pub fn document() -> Self {
        Tree::new(Token::new(TokenKind::Document, Default::default(), ""))
    }

    pub fn token(&self, id: NodeId) -> &Token {
        self.get(id)
    }

    pub fn kind(&self, id: NodeId) -> TokenKind {
        self.get(id).kind
    }

    pub fn text(&self, id: NodeId) -> &str {
        &self.get(id).text
    }

    /// Nearest sibling of `siblings[index]` in the given direction that is
    /// not a comment or string. Returns its index and id.
    pub fn sibling(&self, siblings: &[NodeId], index: usize, forward: bool) -> Option<(usize, NodeId)> {
        self.find_sibling(siblings, index, forward, |token| !token.kind.is_trivial())
    }

    /// Nearest sibling of `siblings[index]` in the given direction matching `pred`.
    pub fn find_sibling(
        &self,
        siblings: &[NodeId],
        index: usize,
        forward: bool,
        pred: impl Fn(&Token) -> bool,
    ) -> Option<(usize, NodeId)> {
        let mut i = index;
        loop {
            i = if forward {
                i.checked_add(1).filter(|&n| n < siblings.len())?
            } else {
                i.checked_sub(1)?
            };
            if pred(self.get(siblings[i])) {
                return Some((i, siblings[i]));
            }
        }
    }

    /// Indented dump of the tree, one token per line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.visit(self.root(), |_, token, depth, _| {
            let text = if token.kind.is_compound() {
                token.text.chars().next().map(String::from).unwrap_or_default()
            } else {
                token.text.replace('\n', "\\n").replace('\r', "\\r")
            };
            out.push_str(&format!(
                "{}{} {}:{} {}\n",
                "  ".repeat(depth),
                token.kind,
                token.span.start.line + 1,
                token.span.start.column + 1,
                text
            ));
        });
        out
    }
}
