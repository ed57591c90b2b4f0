//! Per-row, per-class aggregation of path contributions across trees.

use std::collections::HashMap;

use serde::Serialize;

use super::path::decompose;
use super::ExplainError;
use crate::repr::{LeafId, TreeId, TreeStore};

/// Feature contributions for one row and one class, ranked by magnitude.
///
/// Entries are sorted by descending `|contribution|`. Ties keep the order in
/// which features were first encountered during accumulation (trees in the
/// given order, each walked root to leaf), so ranking is reproducible.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeatureContributions {
    entries: Vec<(String, f64)>,
}

impl FeatureContributions {
    /// Rank accumulated entries. `entries` must be in first-seen order with
    /// unique feature names.
    pub(crate) fn ranked(mut entries: Vec<(String, f64)>) -> Self {
        // Stable sort keeps first-seen order among equal magnitudes.
        entries.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));
        Self { entries }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(feature, contribution)` pairs in rank order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(f, c)| (f.as_str(), *c))
    }

    /// Feature names in rank order.
    pub fn features(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(f, _)| f.as_str())
    }

    /// Contribution of `feature`, if it appears on any path.
    pub fn get(&self, feature: &str) -> Option<f64> {
        self.entries.iter().find(|(f, _)| f == feature).map(|(_, c)| *c)
    }

    /// Sum of all contributions.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    pub fn into_entries(self) -> Vec<(String, f64)> {
        self.entries
    }
}

/// Sum path contributions per feature over all trees of one row and class.
///
/// `tree_ids[i]` is paired with `leaf_ids[i]`. Pairs are processed in the
/// given order; passing them in ascending tree order fixes the floating-point
/// reduction order.
///
/// # Errors
///
/// - [`ExplainError::ShapeMismatch`] if the two slices differ in length
/// - [`ExplainError::UnknownTree`] if a tree id is not in `store`
/// - [`ExplainError::NodeNotFound`] if a leaf does not exist in its tree
pub fn aggregate(
    store: &TreeStore,
    tree_ids: &[TreeId],
    leaf_ids: &[LeafId],
) -> Result<FeatureContributions, ExplainError> {
    if tree_ids.len() != leaf_ids.len() {
        return Err(ExplainError::ShapeMismatch {
            context: "tree/leaf index pairs",
            expected: tree_ids.len(),
            actual: leaf_ids.len(),
        });
    }

    let mut entries: Vec<(String, f64)> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    for (&tree_id, &leaf_id) in tree_ids.iter().zip(leaf_ids) {
        let tree = store.tree(tree_id).ok_or(ExplainError::UnknownTree(tree_id))?;
        let path = decompose(tree, leaf_id)?;
        for (feature, contribution) in path.iter() {
            match slots.get(feature) {
                Some(&slot) => entries[slot].1 += contribution,
                None => {
                    slots.insert(feature, entries.len());
                    entries.push((feature.to_string(), contribution));
                }
            }
        }
    }

    Ok(FeatureContributions::ranked(entries))
}
