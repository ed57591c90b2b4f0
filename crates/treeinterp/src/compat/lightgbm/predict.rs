//! Leaf-index prediction for LightGBM models.
//!
//! Reproduces LightGBM's `predict(..., pred_leaf=True)`: every row is routed
//! through every tree with LightGBM's own split semantics and the reached leaf
//! index is recorded.

use ndarray::{Array2, ArrayView1, ArrayView2, ArrayViewMut1, Axis};

use super::convert::{validate_tree, ConversionError};
use super::text::{LgbModel, LgbTree, MissingType};
use crate::inference::{LeafPredictor, PredictError};
use crate::utils::Parallelism;

/// Values with magnitude up to this are treated as zero by `MissingType::Zero`.
const ZERO_THRESHOLD: f64 = 1e-35;

/// Leaf-index predictor over a parsed LightGBM model.
#[derive(Debug, Clone)]
pub struct LgbLeafPredictor {
    trees: Vec<LgbTree>,
    n_groups: usize,
    n_features: usize,
    best_iteration: Option<usize>,
}

impl LgbLeafPredictor {
    /// Build a predictor, checking every tree can be walked safely.
    pub fn new(model: &LgbModel) -> Result<Self, ConversionError> {
        let n_features = model.num_features();
        for (idx, tree) in model.trees.iter().enumerate() {
            validate_tree(idx, tree, n_features)?;
        }
        let n_groups = model.num_groups();
        // Trailing trees of an incomplete iteration are never evaluated.
        let n_trees = model.num_iterations() * n_groups;
        Ok(Self {
            trees: model.trees[..n_trees].to_vec(),
            n_groups,
            n_features,
            best_iteration: None,
        })
    }

    /// Record the early-stopping iteration used when no limit is requested.
    pub fn with_best_iteration(mut self, best_iteration: Option<usize>) -> Self {
        self.best_iteration = best_iteration;
        self
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Leaves reached by a single row, one per slot of `out`.
    fn predict_row_into(&self, row: ArrayView1<'_, f64>, mut out: ArrayViewMut1<'_, u32>) {
        for (slot, tree) in out.iter_mut().zip(&self.trees) {
            *slot = leaf_index(tree, row);
        }
    }
}

impl LeafPredictor for LgbLeafPredictor {
    fn n_groups(&self) -> usize {
        self.n_groups
    }

    fn n_iterations(&self) -> usize {
        self.trees.len() / self.n_groups
    }

    fn best_iteration(&self) -> Option<usize> {
        self.best_iteration
    }

    fn predict_leaf(
        &self,
        features: ArrayView2<'_, f64>,
        n_iterations: usize,
        parallelism: Parallelism,
    ) -> Result<Array2<u32>, PredictError> {
        if features.ncols() < self.n_features {
            return Err(PredictError::FeatureCountMismatch {
                expected: self.n_features,
                actual: features.ncols(),
            });
        }
        let available = self.n_iterations();
        if n_iterations > available {
            return Err(PredictError::IterationOutOfRange { requested: n_iterations, available });
        }

        let mut output = Array2::<u32>::zeros((features.nrows(), n_iterations * self.n_groups));
        if output.is_empty() {
            return Ok(output);
        }

        let rows = features.axis_iter(Axis(0)).zip(output.axis_iter_mut(Axis(0)));
        parallelism.maybe_par_bridge_for_each(rows, |(row, out)| self.predict_row_into(row, out));
        Ok(output)
    }
}

/// Walk `tree` from the root for one row. Negative children encode leaves.
fn leaf_index(tree: &LgbTree, row: ArrayView1<'_, f64>) -> u32 {
    if tree.num_leaves <= 1 {
        return 0;
    }
    let mut node: i32 = 0;
    while node >= 0 {
        let n = node as usize;
        let value = row[tree.split_feature[n] as usize];
        let go_left = if tree.decision(n).is_categorical {
            categorical_go_left(tree, n, value)
        } else {
            numerical_go_left(tree, n, value)
        };
        node = if go_left { tree.left_child[n] } else { tree.right_child[n] };
    }
    (!node) as u32
}

fn numerical_go_left(tree: &LgbTree, node: usize, value: f64) -> bool {
    let decision = tree.decision(node);
    let value = if value.is_nan() && decision.missing_type != MissingType::NaN {
        0.0
    } else {
        value
    };
    let is_missing = match decision.missing_type {
        MissingType::Zero => value.abs() <= ZERO_THRESHOLD,
        MissingType::NaN => value.is_nan(),
        MissingType::None => false,
    };
    if is_missing {
        decision.default_left
    } else {
        value <= tree.threshold[node]
    }
}

/// Categories in the node's bitset go left. The value is truncated to an
/// integer first; NaN, negative and unseen categories go right.
fn categorical_go_left(tree: &LgbTree, node: usize, value: f64) -> bool {
    if value.is_nan() {
        return false;
    }
    let category = value as i64;
    if category < 0 {
        return false;
    }
    let category = category as usize;
    let bitset = tree.category_bitset(tree.threshold[node] as usize);
    bitset
        .get(category / 32)
        .is_some_and(|word| (word >> (category % 32)) & 1 == 1)
}
