//! Decision path decomposition for a single (tree, leaf) pair.

use crate::explain::ExplainError;
use crate::repr::{LeafId, NodeRef, Tree};

/// Root-to-leaf value sequence of one tree with the features split on.
///
/// `values[0]` is the root's internal value and the last entry is the leaf
/// value. `features[i]` is the feature of the split traversed between
/// `values[i]` and `values[i + 1]`, so `features.len() == values.len() - 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionPath<'t> {
    values: Vec<f64>,
    features: Vec<&'t str>,
}

impl<'t> DecisionPath<'t> {
    /// Number of splits on the path.
    #[inline]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// True for a tree with no splits.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[inline]
    pub fn features(&self) -> &[&'t str] {
        &self.features
    }

    /// Value change at each step, aligned with [`Self::features`].
    pub fn contributions(&self) -> Vec<f64> {
        self.values.windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// `(feature, contribution)` pairs from root to leaf.
    pub fn iter(&self) -> impl Iterator<Item = (&'t str, f64)> + '_ {
        self.features
            .iter()
            .zip(self.values.windows(2))
            .map(|(&feature, w)| (feature, w[1] - w[0]))
    }

    /// Sum of all contributions: leaf value minus root value.
    pub fn total(&self) -> f64 {
        self.iter().map(|(_, c)| c).sum()
    }
}

/// Reconstruct the decision path ending at `leaf`.
///
/// Walks parent links from the leaf up to the root. The path of a tree
/// without splits is empty.
///
/// # Errors
///
/// [`ExplainError::NodeNotFound`] if `leaf`, or any parent on the way up, is
/// not part of `tree`.
pub fn decompose(tree: &Tree, leaf: LeafId) -> Result<DecisionPath<'_>, ExplainError> {
    let not_found = |node| ExplainError::NodeNotFound { tree: tree.id(), node };

    let leaf_node = tree.leaf(leaf).ok_or_else(|| not_found(NodeRef::Leaf(leaf)))?;
    let depth = tree.leaf_depth(leaf).unwrap_or(0);

    // Built leaf-first, reversed at the end.
    let mut values = Vec::with_capacity(depth + 1);
    let mut features = Vec::with_capacity(depth);
    values.push(leaf_node.value);

    let mut parent = leaf_node.parent;
    while let Some(split) = parent {
        let node = tree.split(split).ok_or_else(|| not_found(NodeRef::Split(split)))?;
        values.push(node.internal_value);
        features.push(node.feature.as_str());
        parent = node.parent;
        debug_assert!(features.len() <= tree.n_splits(), "parent links must be acyclic");
    }

    values.reverse();
    features.reverse();
    Ok(DecisionPath { values, features })
}
