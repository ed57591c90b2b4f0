//! Validated, immutable tree topology.
//!
//! A [`TreeStore`] is built once per model from the exporter's [`NodeRow`]
//! table. Every structural property the decomposition relies on is checked
//! here: each row is exactly one node kind, ids are unique, every parent
//! resolves to a split of the same tree, each tree has one root and no
//! cycles. After construction nothing is mutated, so a store can be shared
//! by reference across threads.

use std::collections::{BTreeMap, HashMap};
use std::io::Read;

use super::node::{InternalNode, LeafNode, NodeRef, TreeNode};
use super::table::NodeRow;
use super::{LeafId, SplitId, TreeId};

/// Structural errors found while building a [`TreeStore`].
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    #[error("topology table has no rows")]
    Empty,
    #[error("invalid class count {0}: must be at least 1")]
    InvalidClassCount(usize),
    #[error("{n_trees} trees cannot be split evenly across {n_classes} classes")]
    ClassCountMismatch { n_trees: usize, n_classes: usize },
    #[error("tree ids must be contiguous from 0: expected tree {expected}, found tree {found}")]
    NonContiguousTrees { expected: TreeId, found: TreeId },
    #[error("tree {tree}, row {row}: row must have exactly one of split_index or leaf_index")]
    AmbiguousRow { tree: TreeId, row: usize },
    #[error("tree {tree}, row {row}: missing required column {column}")]
    MissingColumn {
        tree: TreeId,
        row: usize,
        column: &'static str,
    },
    #[error("tree {tree}: duplicate {node}")]
    DuplicateNode { tree: TreeId, node: NodeRef },
    #[error("tree {tree}: {node} references missing parent split {parent}")]
    ParentNotFound {
        tree: TreeId,
        node: NodeRef,
        parent: SplitId,
    },
    #[error("tree {tree}: expected exactly one root, found {count}")]
    RootCount { tree: TreeId, count: usize },
    #[error("tree {tree}: leaf {leaf} is parentless but the tree has splits")]
    DetachedLeaf { tree: TreeId, leaf: LeafId },
    #[error("tree {tree}: parent links starting at split {split} form a cycle")]
    Cycle { tree: TreeId, split: SplitId },
    #[error("failed to read topology: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Tree
// =============================================================================

/// One tree of the ensemble, stored as an arena of nodes addressed by id.
#[derive(Debug, Clone)]
pub struct Tree {
    id: TreeId,
    nodes: Vec<TreeNode>,
    /// Depth of each node (root = 0), parallel to `nodes`.
    depths: Vec<u32>,
    splits: HashMap<SplitId, usize>,
    leaves: HashMap<LeafId, usize>,
    root: usize,
    max_depth: usize,
}

impl Tree {
    /// Build and validate a tree from its rows.
    ///
    /// `rows` pairs each row with its position in the source table for error
    /// reporting.
    fn from_rows(id: TreeId, rows: Vec<(usize, NodeRow)>) -> Result<Self, TopologyError> {
        let mut nodes = Vec::with_capacity(rows.len());
        let mut splits = HashMap::new();
        let mut leaves = HashMap::new();

        for (pos, row) in rows {
            let missing = |column| TopologyError::MissingColumn { tree: id, row: pos, column };
            let node = match (row.split_index, row.leaf_index) {
                (Some(split_index), None) => TreeNode::Internal(InternalNode {
                    split_index,
                    feature: row.split_feature.ok_or_else(|| missing("split_feature"))?,
                    parent: row.node_parent,
                    internal_value: row.internal_value.ok_or_else(|| missing("internal_value"))?,
                }),
                (None, Some(leaf_index)) => TreeNode::Leaf(LeafNode {
                    leaf_index,
                    parent: row.leaf_parent,
                    value: row.leaf_value.ok_or_else(|| missing("leaf_value"))?,
                }),
                _ => return Err(TopologyError::AmbiguousRow { tree: id, row: pos }),
            };

            let slot = nodes.len();
            let duplicate = match node.node_ref() {
                NodeRef::Split(split) => splits.insert(split, slot).is_some(),
                NodeRef::Leaf(leaf) => leaves.insert(leaf, slot).is_some(),
            };
            if duplicate {
                return Err(TopologyError::DuplicateNode { tree: id, node: node.node_ref() });
            }
            nodes.push(node);
        }

        for node in &nodes {
            if let Some(parent) = node.parent() {
                if !splits.contains_key(&parent) {
                    return Err(TopologyError::ParentNotFound {
                        tree: id,
                        node: node.node_ref(),
                        parent,
                    });
                }
            }
        }

        let roots: Vec<usize> = (0..nodes.len()).filter(|&i| nodes[i].parent().is_none()).collect();
        if !splits.is_empty() {
            // Only a split may be parentless once the tree has splits.
            if let Some(TreeNode::Leaf(leaf)) = roots.iter().map(|&i| &nodes[i]).find(|n| n.is_leaf()) {
                return Err(TopologyError::DetachedLeaf { tree: id, leaf: leaf.leaf_index });
            }
        }
        if roots.len() != 1 {
            return Err(TopologyError::RootCount { tree: id, count: roots.len() });
        }
        let root = roots[0];

        let split_depths = split_depths(id, &nodes, &splits)?;
        let depths: Vec<u32> = nodes
            .iter()
            .map(|node| match node {
                TreeNode::Internal(split) => split_depths[&split.split_index],
                TreeNode::Leaf(leaf) => leaf.parent.map_or(0, |p| split_depths[&p] + 1),
            })
            .collect();
        let max_depth = depths.iter().copied().max().unwrap_or(0) as usize;

        Ok(Self { id, nodes, depths, splits, leaves, root, max_depth })
    }

    /// Tree id within the ensemble.
    #[inline]
    pub fn id(&self) -> TreeId {
        self.id
    }

    /// All nodes in table order.
    #[inline]
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    #[inline]
    pub fn n_splits(&self) -> usize {
        self.splits.len()
    }

    #[inline]
    pub fn n_leaves(&self) -> usize {
        self.leaves.len()
    }

    /// Length of the longest root-to-leaf path, counted in splits.
    #[inline]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// The root node: a split, or the only leaf of a split-free tree.
    #[inline]
    pub fn root(&self) -> &TreeNode {
        &self.nodes[self.root]
    }

    /// Look up an internal node by split id.
    #[inline]
    pub fn split(&self, split: SplitId) -> Option<&InternalNode> {
        match self.splits.get(&split).map(|&i| &self.nodes[i]) {
            Some(TreeNode::Internal(node)) => Some(node),
            _ => None,
        }
    }

    /// Look up a leaf by leaf id.
    #[inline]
    pub fn leaf(&self, leaf: LeafId) -> Option<&LeafNode> {
        match self.leaves.get(&leaf).map(|&i| &self.nodes[i]) {
            Some(TreeNode::Leaf(node)) => Some(node),
            _ => None,
        }
    }

    /// Number of splits between the root and `leaf`.
    pub fn leaf_depth(&self, leaf: LeafId) -> Option<usize> {
        self.leaves.get(&leaf).map(|&i| self.depths[i] as usize)
    }
}

/// Depth of every split, detecting cycles in the parent links.
///
/// Parents are assumed to resolve; walks stop at memoized splits so the total
/// work is linear in the number of splits.
fn split_depths(
    tree: TreeId,
    nodes: &[TreeNode],
    splits: &HashMap<SplitId, usize>,
) -> Result<HashMap<SplitId, u32>, TopologyError> {
    let mut depths: HashMap<SplitId, u32> = HashMap::with_capacity(splits.len());
    let mut chain = Vec::new();

    for node in nodes {
        let TreeNode::Internal(start) = node else { continue };
        if depths.contains_key(&start.split_index) {
            continue;
        }

        chain.clear();
        let mut current = Some(start.split_index);
        let mut next_depth = loop {
            let Some(split) = current else { break 0 };
            if let Some(&depth) = depths.get(&split) {
                break depth + 1;
            }
            if chain.len() >= splits.len() {
                return Err(TopologyError::Cycle { tree, split: start.split_index });
            }
            chain.push(split);
            current = nodes[splits[&split]].parent();
        };

        for &split in chain.iter().rev() {
            depths.insert(split, next_depth);
            next_depth += 1;
        }
    }

    Ok(depths)
}

// =============================================================================
// TreeStore
// =============================================================================

/// The exported topology of a whole ensemble.
///
/// Trees are stored in id order. For multi-class ensembles the trees are
/// laid out iteration-major: tree `t * n_classes + c` is iteration `t` of
/// class `c`.
#[derive(Debug, Clone)]
pub struct TreeStore {
    trees: Vec<Tree>,
    n_classes: usize,
}

impl TreeStore {
    /// Build a store from exporter rows.
    ///
    /// Tree ids must cover `0..n_trees` and `n_trees` must be a multiple of
    /// `n_classes`.
    pub fn from_rows(
        rows: impl IntoIterator<Item = NodeRow>,
        n_classes: usize,
    ) -> Result<Self, TopologyError> {
        if n_classes == 0 {
            return Err(TopologyError::InvalidClassCount(n_classes));
        }

        let mut grouped: BTreeMap<TreeId, Vec<(usize, NodeRow)>> = BTreeMap::new();
        for (pos, row) in rows.into_iter().enumerate() {
            grouped.entry(row.tree_index).or_default().push((pos, row));
        }
        if grouped.is_empty() {
            return Err(TopologyError::Empty);
        }

        let mut trees = Vec::with_capacity(grouped.len());
        for (expected, (id, rows)) in grouped.into_iter().enumerate() {
            let expected = expected as TreeId;
            if id != expected {
                return Err(TopologyError::NonContiguousTrees { expected, found: id });
            }
            trees.push(Tree::from_rows(id, rows)?);
        }

        if trees.len() % n_classes != 0 {
            return Err(TopologyError::ClassCountMismatch { n_trees: trees.len(), n_classes });
        }

        let store = Self { trees, n_classes };
        log::debug!(
            "built tree store: {} trees, {} classes, max depth {}",
            store.n_trees(),
            store.n_classes,
            store.max_depth()
        );
        Ok(store)
    }

    /// Load a store from a JSON array of [`NodeRow`] records.
    pub fn from_json_reader<R: Read>(reader: R, n_classes: usize) -> Result<Self, TopologyError> {
        let rows: Vec<NodeRow> = serde_json::from_reader(reader)?;
        Self::from_rows(rows, n_classes)
    }

    /// Load a store from a JSON string of [`NodeRow`] records.
    pub fn from_json_str(json: &str, n_classes: usize) -> Result<Self, TopologyError> {
        let rows: Vec<NodeRow> = serde_json::from_str(json)?;
        Self::from_rows(rows, n_classes)
    }

    #[inline]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Number of output classes (1 for single-output models).
    #[inline]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Number of boosting iterations, i.e. trees owned by each class.
    #[inline]
    pub fn n_trees_per_class(&self) -> usize {
        self.trees.len() / self.n_classes
    }

    #[inline]
    pub fn tree(&self, id: TreeId) -> Option<&Tree> {
        self.trees.get(id as usize)
    }

    pub fn trees(&self) -> impl Iterator<Item = &Tree> {
        self.trees.iter()
    }

    /// Deepest leaf across the ensemble, in splits.
    pub fn max_depth(&self) -> usize {
        self.trees.iter().map(Tree::max_depth).max().unwrap_or(0)
    }

    /// Ensemble id of iteration `iteration` in `class`'s sub-ensemble.
    #[inline]
    pub fn class_tree_id(&self, iteration: usize, class: usize) -> TreeId {
        debug_assert!(class < self.n_classes, "class out of range");
        (iteration * self.n_classes + class) as TreeId
    }
}
