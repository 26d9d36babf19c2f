//! CSS selector trees
//!
//! Selectors are parsed into an arena-allocated tree that keeps every byte of
//! the source: whitespace and comments live either in a node's [`Spaces`] or
//! in descendant [`CombinatorKind::Descendant`] nodes. Printing an untouched
//! tree gives back the exact input, which lets the scope resolver rewrite
//! only the parts it cares about.
//!
//! Node kinds follow [Selectors Level 4](https://www.w3.org/TR/selectors-4/).

mod parser;

use core::fmt;
use core::ops::{Index, IndexMut};

/// A type-safe index into a [`SelectorTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);
}

/// Raw text printed before and after a node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Spaces {
    /// Whitespace and comments printed before the node.
    pub before: String,
    /// Whitespace and comments printed after the node.
    pub after: String,
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombinatorKind {
    /// [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    /// "A descendant combinator is whitespace that separates two compound selectors."
    Descendant,
    /// [§ 16.2 Child combinator](https://www.w3.org/TR/selectors-4/#child-combinators) (`>`)
    Child,
    /// [§ 16.3 Next-sibling combinator](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators) (`+`)
    NextSibling,
    /// [§ 16.4 Subsequent-sibling combinator](https://www.w3.org/TR/selectors-4/#general-sibling-combinators) (`~`)
    SubsequentSibling,
}

/// What a [`SelectorNode`] is.
///
/// Names are stored exactly as written, escapes included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The selector list; its children are [`NodeKind::Selector`] nodes.
    Root,
    /// [§ 3.1 Structure and Terminology](https://www.w3.org/TR/selectors-4/#complex)
    ///
    /// One complex selector of a list.
    Selector,
    /// A combinator. For descendant combinators `value` is the whitespace
    /// (and any comments) that forms it; for the others it is the symbol.
    Combinator {
        /// Which combinator.
        kind: CombinatorKind,
        /// The raw text of the combinator.
        value: String,
    },
    /// [§ 3.5 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    ///
    /// A pseudo-class or pseudo-element. When `arguments` is set the children
    /// are the [`NodeKind::Selector`] nodes found between the parentheses.
    Pseudo {
        /// The name including its leading colon(s), e.g. `:not` or `::before`.
        value: String,
        /// Whether the pseudo was written with parentheses.
        arguments: bool,
    },
    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html),
    /// the name without the `.`.
    Class(String),
    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors),
    /// the name without the `#`.
    Id(String),
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors),
    /// also used for any other token sequence kept verbatim.
    Tag(String),
    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    Universal,
    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors),
    /// the raw text including the brackets.
    Attribute(String),
    /// A quoted string, raw.
    String(String),
    /// The nesting selector `&`.
    Nesting,
    /// A comment between two compound parts that is not a combinator.
    Comment(String),
}

/// A node in a [`SelectorTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorNode {
    /// What this node is.
    pub kind: NodeKind,
    /// Raw text around the node.
    pub spaces: Spaces,
    /// Byte offset in the parsed selector, 0 for synthesized nodes.
    pub source_index: usize,
    /// Child nodes, for [`NodeKind::Root`], [`NodeKind::Selector`], and
    /// [`NodeKind::Pseudo`].
    pub children: Vec<NodeId>,
}

/// An arena-allocated selector list.
///
/// Node 0 is always the [`NodeKind::Root`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorTree {
    nodes: Vec<SelectorNode>,
}

impl SelectorTree {
    /// Create a tree holding only an empty root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![SelectorNode {
                kind: NodeKind::Root,
                spaces: Spaces::default(),
                source_index: 0,
                children: Vec::new(),
            }],
        }
    }

    /// The root node ID (always 0).
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&SelectorNode> {
        self.nodes.get(id.0)
    }

    /// Get a mutable node by ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SelectorNode> {
        self.nodes.get_mut(id.0)
    }

    /// Number of nodes allocated, the root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; the root is allocated on construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new detached node and return its ID.
    pub fn alloc(&mut self, kind: NodeKind, spaces: Spaces, source_index: usize) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(SelectorNode {
            kind,
            spaces,
            source_index,
            children: Vec::new(),
        });
        id
    }

    /// Append `child` to the children of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self[parent].children.push(child);
    }

    /// Replace the children of `parent`.
    pub fn set_children(&mut self, parent: NodeId, children: Vec<NodeId>) {
        self[parent].children = children;
    }

    /// Children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |node| node.children.as_slice())
    }

    /// The complex selectors of the list.
    #[must_use]
    pub fn selectors(&self) -> &[NodeId] {
        self.children(NodeId::ROOT)
    }

    /// Copy the subtree rooted at `id` in `source` into this tree.
    pub fn clone_subtree(&mut self, source: &SelectorTree, id: NodeId) -> NodeId {
        let node = &source[id];
        let copy = self.alloc(node.kind.clone(), node.spaces.clone(), node.source_index);
        for &child in &node.children {
            let child_copy = self.clone_subtree(source, child);
            self.append_child(copy, child_copy);
        }
        copy
    }

    /// Whether `id` is a descendant combinator.
    #[must_use]
    pub fn is_spacing(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|node| {
            matches!(
                node.kind,
                NodeKind::Combinator {
                    kind: CombinatorKind::Descendant,
                    ..
                }
            )
        })
    }

    /// Serialize the subtree rooted at `id`.
    #[must_use]
    pub fn node_to_string(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let node = &self[id];
        out.push_str(&node.spaces.before);
        match &node.kind {
            NodeKind::Root => self.write_list(&node.children, out),
            NodeKind::Selector => {
                for &child in &node.children {
                    self.write_node(child, out);
                }
            }
            NodeKind::Pseudo { value, arguments } => {
                out.push_str(value);
                if *arguments {
                    out.push('(');
                    self.write_list(&node.children, out);
                    out.push(')');
                }
            }
            NodeKind::Combinator { value, .. } => out.push_str(value),
            NodeKind::Class(name) => {
                out.push('.');
                out.push_str(name);
            }
            NodeKind::Id(name) => {
                out.push('#');
                out.push_str(name);
            }
            NodeKind::Universal => out.push('*'),
            NodeKind::Nesting => out.push('&'),
            NodeKind::Tag(raw)
            | NodeKind::Attribute(raw)
            | NodeKind::String(raw)
            | NodeKind::Comment(raw) => out.push_str(raw),
        }
        out.push_str(&node.spaces.after);
    }

    fn write_list(&self, selectors: &[NodeId], out: &mut String) {
        for (index, &selector) in selectors.iter().enumerate() {
            if index > 0 {
                out.push(',');
            }
            self.write_node(selector, out);
        }
    }
}

impl Default for SelectorTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<NodeId> for SelectorTree {
    type Output = SelectorNode;

    fn index(&self, id: NodeId) -> &SelectorNode {
        &self.nodes[id.0]
    }
}

impl IndexMut<NodeId> for SelectorTree {
    fn index_mut(&mut self, id: NodeId) -> &mut SelectorNode {
        &mut self.nodes[id.0]
    }
}

impl fmt::Display for SelectorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.node_to_string(NodeId::ROOT))
    }
}
