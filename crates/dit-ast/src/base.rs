//! Shared index types for the thin-node arena.

use serde::{Deserialize, Serialize};

/// Index of a node in the arena.
///
/// Node indices are cheap to copy and compare; `NodeIndex::NONE` is the
/// sentinel for optional child slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    #[inline]
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    #[inline]
    pub fn is_some(self) -> bool {
        self != Self::NONE
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for NodeIndex {
    fn default() -> Self {
        NodeIndex::NONE
    }
}

/// An ordered list of child nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeList {
    pub nodes: Vec<NodeIndex>,
}

impl NodeList {
    pub fn new() -> NodeList {
        NodeList { nodes: Vec::new() }
    }

    pub fn from_vec(nodes: Vec<NodeIndex>) -> NodeList {
        NodeList { nodes }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn get(&self, i: usize) -> NodeIndex {
        self.nodes.get(i).copied().unwrap_or(NodeIndex::NONE)
    }

    #[inline]
    pub fn first(&self) -> NodeIndex {
        self.get(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.nodes.iter().copied()
    }
}

impl From<Vec<NodeIndex>> for NodeList {
    fn from(nodes: Vec<NodeIndex>) -> NodeList {
        NodeList { nodes }
    }
}

impl FromIterator<NodeIndex> for NodeList {
    fn from_iter<T: IntoIterator<Item = NodeIndex>>(iter: T) -> NodeList {
        NodeList {
            nodes: iter.into_iter().collect(),
        }
    }
}
