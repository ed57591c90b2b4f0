//! Typed tree nodes.

use serde::Serialize;

/// Identifier of a tree within the ensemble.
pub type TreeId = u32;

/// Identifier of an internal (split) node, unique within its tree.
pub type SplitId = u32;

/// Identifier of a leaf, unique within its tree.
pub type LeafId = u32;

/// An internal node: a split on one feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InternalNode {
    pub split_index: SplitId,
    /// Name of the feature this node splits on.
    pub feature: String,
    /// Parent split, `None` for the root.
    pub parent: Option<SplitId>,
    /// The model's running score at this node.
    pub internal_value: f64,
}

/// A terminal node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeafNode {
    pub leaf_index: LeafId,
    /// Parent split, `None` only when the tree has no splits.
    pub parent: Option<SplitId>,
    pub value: f64,
}

/// A node of an exported tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TreeNode {
    Internal(InternalNode),
    Leaf(LeafNode),
}

/// Reference to a node by kind and id, used in error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef {
    Split(SplitId),
    Leaf(LeafId),
}

impl std::fmt::Display for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeRef::Split(id) => write!(f, "split {}", id),
            NodeRef::Leaf(id) => write!(f, "leaf {}", id),
        }
    }
}

impl TreeNode {
    /// Parent split of this node, if any.
    #[inline]
    pub fn parent(&self) -> Option<SplitId> {
        match self {
            TreeNode::Internal(node) => node.parent,
            TreeNode::Leaf(node) => node.parent,
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf(_))
    }

    /// Id of this node tagged with its kind.
    #[inline]
    pub fn node_ref(&self) -> NodeRef {
        match self {
            TreeNode::Internal(node) => NodeRef::Split(node.split_index),
            TreeNode::Leaf(node) => NodeRef::Leaf(node.leaf_index),
        }
    }

    /// Score at this node: internal value for splits, leaf value for leaves.
    #[inline]
    pub fn value(&self) -> f64 {
        match self {
            TreeNode::Internal(node) => node.internal_value,
            TreeNode::Leaf(node) => node.value,
        }
    }
}
