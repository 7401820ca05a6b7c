//! Arena-backed document tree.
//!
//! ## Design
//!
//! Nodes live in a single vector and are addressed by [`NodeId`]. Parent and
//! previous-sibling links are plain indices, never owning pointers, so the
//! tree has no cycles to manage. Detached nodes stay in the arena until the
//! tree is dropped at the end of its document pass.
//!
//! ```text
//! Tree
//! ├── nodes: Vec<Node>   (NodeId = index)
//! └── root: NodeId
//! ```

use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use std::fmt::Write as _;
use std::ops::Index;
use text_size::TextRange;

use super::kind::{NodeKind, Scalar};

/// Index of a node in its [`Tree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Arbitrary metadata attached to a node by the parser or by rules.
#[derive(Clone, Debug, Default)]
pub struct Attributes {
    /// Byte range in the source document, when the parser knows it.
    pub range: Option<TextRange>,
    /// Original form of a mapping key that was not a string.
    pub typed_key: Option<Scalar>,
    flags: FxHashSet<SmolStr>,
}

impl Attributes {
    /// Set a named flag (e.g. "previously seen by rule X").
    pub fn mark(&mut self, flag: impl Into<SmolStr>) {
        self.flags.insert(flag.into());
    }

    pub fn is_marked(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    pub fn unmark(&mut self, flag: &str) -> bool {
        self.flags.remove(flag)
    }
}

/// A single node.
#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub attrs: Attributes,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    prev_sibling: Option<NodeId>,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            attrs: Attributes::default(),
            children: Vec::new(),
            parent: None,
            prev_sibling: None,
        }
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn prev_sibling(&self) -> Option<NodeId> {
        self.prev_sibling
    }
}

/// A mutable document tree.
#[derive(Clone, Debug)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Index<NodeId> for Tree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}

impl Tree {
    /// Create a tree holding only a root node.
    pub fn new(root: NodeKind) -> Self {
        Self {
            nodes: vec![Node::new(root)],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of allocated nodes, detached ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self[id].kind
    }

    pub fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id.index()].kind
    }

    pub fn attrs_mut(&mut self, id: NodeId) -> &mut Attributes {
        &mut self.nodes[id.index()].attrs
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self[id].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self[id].parent
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self[id].prev_sibling
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self[id].parent?;
        let siblings = &self[parent].children;
        let pos = siblings.iter().position(|&c| c == id)?;
        siblings.get(pos + 1).copied()
    }

    /// The single child of a wrapper node (`Argument`, `Entry`).
    pub fn only_child(&self, id: NodeId) -> Option<NodeId> {
        match self[id].children.as_slice() {
            [child] => Some(*child),
            _ => None,
        }
    }

    // ── Mutation ────────────────────────────────────────────────────

    /// Allocate a detached node.
    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(kind));
        id
    }

    /// Allocate a node and append it as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = self.alloc(kind);
        self.attach(parent, id);
        id
    }

    /// Append an existing node as the last child of `parent`, detaching it
    /// from its current parent first.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        let prev = self.nodes[parent.index()].children.last().copied();
        self.nodes[parent.index()].children.push(child);
        let node = &mut self.nodes[child.index()];
        node.parent = Some(parent);
        node.prev_sibling = prev;
    }

    /// Put `new` in place of `old` under `old`'s parent. `old` ends up
    /// detached. Returns false when `old` has no parent.
    pub fn replace(&mut self, old: NodeId, new: NodeId) -> bool {
        let Some(parent) = self[old].parent else {
            return false;
        };
        self.detach(new);
        let Some(pos) = self[parent].children.iter().position(|&c| c == old) else {
            return false;
        };
        self.nodes[parent.index()].children[pos] = new;
        self.nodes[new.index()].parent = Some(parent);
        let old_node = &mut self.nodes[old.index()];
        old_node.parent = None;
        old_node.prev_sibling = None;
        self.relink(parent);
        true
    }

    /// Remove `id` from its parent's children. No-op for detached nodes.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.nodes[id.index()].parent.take() else {
            return;
        };
        self.nodes[id.index()].prev_sibling = None;
        self.nodes[parent.index()].children.retain(|&c| c != id);
        self.relink(parent);
    }

    fn relink(&mut self, parent: NodeId) {
        let children = self.nodes[parent.index()].children.clone();
        let mut prev = None;
        for child in children {
            self.nodes[child.index()].prev_sibling = prev;
            prev = Some(child);
        }
    }

    // ── Traversal ───────────────────────────────────────────────────

    /// Pre-order list of `id` and everything below it.
    ///
    /// Returned as a vector so callers can mutate the tree while walking.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self[next].children.iter().rev().copied());
        }
        out
    }

    /// Pre-order list of attached nodes matching `pred`.
    pub fn find_all(&self, pred: impl Fn(&NodeKind) -> bool) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|&id| pred(&self[id].kind))
            .collect()
    }

    /// Compact s-expression rendering of the attached tree.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_node(self.root, &mut out);
        out
    }

    fn dump_node(&self, id: NodeId, out: &mut String) {
        let node = &self[id];
        out.push('(');
        out.push_str(node.kind.tag());
        match &node.kind {
            NodeKind::Namespace { name }
            | NodeKind::ClassDecl { name }
            | NodeKind::NameRef { name }
            | NodeKind::ConstRef { name }
            | NodeKind::Variable { name } => {
                let _ = write!(out, " {name}");
            }
            NodeKind::Use { name, alias } => {
                let _ = write!(out, " {name}");
                if let Some(alias) = alias {
                    let _ = write!(out, " as {alias}");
                }
            }
            NodeKind::Call { callee, method } => {
                let _ = write!(out, " {callee}::{method}");
            }
            NodeKind::Argument { name: Some(name) } => {
                let _ = write!(out, " {name}:");
            }
            NodeKind::Entry { key } => {
                let _ = write!(out, " {key}");
            }
            NodeKind::Literal(scalar) => {
                let _ = write!(out, " {scalar}");
            }
            NodeKind::Argument { name: None }
            | NodeKind::SourceFile
            | NodeKind::Null
            | NodeKind::Array
            | NodeKind::Concat
            | NodeKind::Mapping
            | NodeKind::Sequence => {}
        }
        for &child in &node.children {
            out.push(' ');
            self.dump_node(child, out);
        }
        out.push(')');
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Fluent construction of trees, used by parsers and tests.
///
/// `open` descends into the new node, `close` returns to its parent and
/// `leaf` adds a child without descending.
///
/// ```ignore
/// let tree = TreeBuilder::new(NodeKind::SourceFile)
///     .open(NodeKind::Call { callee: "App\\Client".into(), method: "connect".into() })
///     .open(NodeKind::Argument { name: None })
///     .leaf(NodeKind::Literal(Scalar::str("old")))
///     .close()
///     .close()
///     .finish();
/// ```
pub struct TreeBuilder {
    tree: Tree,
    stack: Vec<NodeId>,
}

impl TreeBuilder {
    pub fn new(root: NodeKind) -> Self {
        let tree = Tree::new(root);
        let root = tree.root();
        Self {
            tree,
            stack: vec![root],
        }
    }

    fn current(&self) -> NodeId {
        self.stack.last().copied().unwrap_or(self.tree.root())
    }

    pub fn open(mut self, kind: NodeKind) -> Self {
        let id = self.tree.append(self.current(), kind);
        self.stack.push(id);
        self
    }

    pub fn leaf(mut self, kind: NodeKind) -> Self {
        let parent = self.current();
        self.tree.append(parent, kind);
        self
    }

    /// Attach a byte range to the most recently opened node.
    pub fn range(mut self, range: TextRange) -> Self {
        let id = self.current();
        self.tree.attrs_mut(id).range = Some(range);
        self
    }

    pub fn close(mut self) -> Self {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
        self
    }

    // ── Shorthands ──────────────────────────────────────────────────

    pub fn name_ref(self, name: &str) -> Self {
        self.leaf(NodeKind::NameRef { name: name.into() })
    }

    pub fn call(self, callee: &str, method: &str) -> Self {
        self.open(NodeKind::Call {
            callee: callee.into(),
            method: method.into(),
        })
    }

    /// A positional argument holding one literal.
    pub fn arg(self, value: Scalar) -> Self {
        self.open(NodeKind::Argument { name: None })
            .leaf(NodeKind::Literal(value))
            .close()
    }

    /// A named argument holding one literal.
    pub fn named_arg(self, name: &str, value: Scalar) -> Self {
        self.open(NodeKind::Argument {
            name: Some(name.into()),
        })
        .leaf(NodeKind::Literal(value))
        .close()
    }

    /// A mapping entry holding one scalar.
    pub fn entry(self, key: &str, value: Scalar) -> Self {
        self.open(NodeKind::Entry { key: key.into() })
            .leaf(NodeKind::Literal(value))
            .close()
    }

    pub fn finish(self) -> Tree {
        self.tree
    }
}
