//! Leaf-index prediction.
//!
//! Interpretation needs to know which leaf each row reaches in every tree.
//! That comes from a prediction engine behind the [`LeafPredictor`] trait;
//! [`LgbLeafPredictor`](crate::compat::lightgbm::LgbLeafPredictor) is the
//! built-in implementation for LightGBM text models.

use ndarray::{Array2, ArrayView2};

use crate::utils::Parallelism;

/// Errors raised by a [`LeafPredictor`].
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error("input has {actual} feature columns but the model needs {expected}")]
    FeatureCountMismatch { expected: usize, actual: usize },
    #[error("requested {requested} iterations but the model has {available}")]
    IterationOutOfRange { requested: usize, available: usize },
}

/// A prediction engine in leaf-index mode.
pub trait LeafPredictor: Sync {
    /// Number of output groups (classes); trees per iteration.
    fn n_groups(&self) -> usize;

    /// Number of boosting iterations the model holds.
    fn n_iterations(&self) -> usize;

    /// Early-stopping iteration, if the model records one.
    fn best_iteration(&self) -> Option<usize> {
        None
    }

    /// Leaf reached by each row in each of the first `n_iterations`
    /// iterations.
    ///
    /// # Arguments
    ///
    /// * `features` - Sample-major matrix `[n_rows, n_features]`
    /// * `n_iterations` - Iterations to evaluate, at most [`Self::n_iterations`]
    /// * `parallelism` - Whether rows may be processed in parallel
    ///
    /// # Returns
    ///
    /// Matrix `[n_rows, n_iterations * n_groups]`. Columns follow ensemble
    /// tree order: column `t * n_groups + g` is iteration `t` of group `g`.
    fn predict_leaf(
        &self,
        features: ArrayView2<'_, f64>,
        n_iterations: usize,
        parallelism: Parallelism,
    ) -> Result<Array2<u32>, PredictError>;
}
