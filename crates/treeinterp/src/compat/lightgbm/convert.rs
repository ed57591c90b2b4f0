//! Export of parsed LightGBM trees to the node table.

use crate::repr::{NodeRow, SplitId, TopologyError, TreeId, TreeStore};

use super::text::{LgbModel, LgbTree};

/// Error type for LightGBM model conversion.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("tree {0} has no nodes")]
    EmptyTree(usize),
    #[error("tree {tree}: invalid child index {child} at node {node}")]
    InvalidChildIndex {
        tree: usize,
        node: usize,
        child: i32,
    },
    #[error("tree {tree}: node {node} splits on feature {feature}, model has {n_features}")]
    InvalidFeatureIndex {
        tree: usize,
        node: usize,
        feature: i32,
        n_features: usize,
    },
    #[error("tree {0} is linear; linear trees are not supported")]
    LinearTreesNotSupported(usize),
    #[error("invalid exported topology: {0}")]
    Topology(#[from] TopologyError),
}

/// Check that `tree` can be walked from its root without leaving its arrays.
///
/// A child split must come after its parent, as LightGBM numbers splits in
/// creation order. This rules out cycles.
pub(crate) fn validate_tree(idx: usize, tree: &LgbTree, n_features: usize) -> Result<(), ConversionError> {
    if tree.is_linear {
        return Err(ConversionError::LinearTreesNotSupported(idx));
    }
    if tree.num_leaves == 0 {
        return Err(ConversionError::EmptyTree(idx));
    }

    let n_splits = tree.num_splits();
    for node in 0..n_splits {
        let feature = tree.split_feature[node];
        if feature < 0 || feature as usize >= n_features {
            return Err(ConversionError::InvalidFeatureIndex { tree: idx, node, feature, n_features });
        }
        for child in [tree.left_child[node], tree.right_child[node]] {
            let valid = if child >= 0 {
                (child as usize) > node && (child as usize) < n_splits
            } else {
                ((!child) as usize) < tree.num_leaves
            };
            if !valid {
                return Err(ConversionError::InvalidChildIndex { tree: idx, node, child });
            }
        }
    }
    Ok(())
}

impl LgbModel {
    /// Export every tree as [`NodeRow`]s.
    ///
    /// Internal nodes come first within a tree, then leaves, each in index
    /// order. Parents are recovered from the child arrays; a single-leaf tree
    /// exports one parentless leaf row.
    pub fn to_node_rows(&self) -> Result<Vec<NodeRow>, ConversionError> {
        let n_features = self.num_features();
        let mut rows = Vec::new();

        for (idx, tree) in self.trees.iter().enumerate() {
            validate_tree(idx, tree, n_features)?;
            let tree_index = idx as TreeId;

            let n_splits = tree.num_splits();
            let mut split_parent: Vec<Option<SplitId>> = vec![None; n_splits];
            let mut leaf_parent: Vec<Option<SplitId>> = vec![None; tree.num_leaves];
            for node in 0..n_splits {
                for child in [tree.left_child[node], tree.right_child[node]] {
                    if child >= 0 {
                        split_parent[child as usize] = Some(node as SplitId);
                    } else {
                        leaf_parent[(!child) as usize] = Some(node as SplitId);
                    }
                }
            }

            rows.extend((0..n_splits).map(|node| {
                NodeRow::internal(
                    tree_index,
                    node as SplitId,
                    self.feature_name(tree.split_feature[node] as usize),
                    split_parent[node],
                    tree.internal_value[node],
                )
            }));
            rows.extend(
                tree.leaf_value
                    .iter()
                    .zip(&leaf_parent)
                    .enumerate()
                    .map(|(leaf, (&value, &parent))| NodeRow::leaf(tree_index, leaf as u32, parent, value)),
            );
        }

        log::debug!("exported {} node rows from {} trees", rows.len(), self.num_trees());
        Ok(rows)
    }

    /// Export and validate the topology in one step.
    pub fn to_tree_store(&self) -> Result<TreeStore, ConversionError> {
        let rows = self.to_node_rows()?;
        Ok(TreeStore::from_rows(rows, self.num_groups())?)
    }
}
