//! Tabular tree topology as produced by a model exporter.
//!
//! One [`NodeRow`] per node. Internal rows carry the `split_*`, `node_parent`
//! and `internal_value` columns; leaf rows carry the `leaf_*` columns. The
//! other group is null.

use serde::{Deserialize, Serialize};

use super::{LeafId, SplitId, TreeId};

/// One row of the exported topology table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeRow {
    pub tree_index: TreeId,
    #[serde(default)]
    pub split_index: Option<SplitId>,
    #[serde(default)]
    pub split_feature: Option<String>,
    #[serde(default)]
    pub node_parent: Option<SplitId>,
    #[serde(default)]
    pub internal_value: Option<f64>,
    #[serde(default)]
    pub leaf_index: Option<LeafId>,
    #[serde(default)]
    pub leaf_parent: Option<SplitId>,
    #[serde(default)]
    pub leaf_value: Option<f64>,
}

impl NodeRow {
    /// Row describing an internal node.
    pub fn internal(
        tree_index: TreeId,
        split_index: SplitId,
        split_feature: impl Into<String>,
        node_parent: Option<SplitId>,
        internal_value: f64,
    ) -> Self {
        Self {
            tree_index,
            split_index: Some(split_index),
            split_feature: Some(split_feature.into()),
            node_parent,
            internal_value: Some(internal_value),
            ..Default::default()
        }
    }

    /// Row describing a leaf.
    pub fn leaf(
        tree_index: TreeId,
        leaf_index: LeafId,
        leaf_parent: Option<SplitId>,
        leaf_value: f64,
    ) -> Self {
        Self {
            tree_index,
            leaf_index: Some(leaf_index),
            leaf_parent,
            leaf_value: Some(leaf_value),
            ..Default::default()
        }
    }
}
