//! Batch interpretation of rows.
//!
//! [`Interpreter`] ties the pieces together: it asks a [`LeafPredictor`] which
//! leaf every requested row reaches, reshapes that into trees × classes per
//! row, aggregates each class over its trees and merges the classes into one
//! [`ContributionTable`] per row.

use ndarray::{ArrayView1, ArrayView2, Axis};

use super::aggregate::aggregate;
use super::merge::{merge, ContributionTable};
use super::ExplainError;
use crate::inference::LeafPredictor;
use crate::repr::TreeStore;
use crate::utils::Parallelism;

/// Interprets rows against a shared topology and a leaf predictor.
///
/// Rows are independent and may be processed in parallel. Within a row, trees
/// are reduced in ascending iteration order, so results are bit-identical
/// across thread counts.
pub struct Interpreter<'a, P: LeafPredictor + ?Sized> {
    store: &'a TreeStore,
    predictor: &'a P,
    parallelism: Parallelism,
}

impl<'a, P: LeafPredictor + ?Sized> Interpreter<'a, P> {
    /// Sequential interpreter over `store`, with leaves from `predictor`.
    pub fn new(store: &'a TreeStore, predictor: &'a P) -> Self {
        Self { store, predictor, parallelism: Parallelism::Sequential }
    }

    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    #[inline]
    pub fn store(&self) -> &TreeStore {
        self.store
    }

    /// Number of iterations to interpret.
    ///
    /// A positive `iteration_limit` is capped at the model size. Otherwise the
    /// predictor's best iteration is used when it has one, else every
    /// iteration.
    pub fn resolve_iterations(&self, iteration_limit: Option<i32>) -> usize {
        let available = self.store.n_trees_per_class();
        match iteration_limit {
            Some(limit) if limit > 0 => (limit as usize).min(available),
            _ => self
                .predictor
                .best_iteration()
                .filter(|&best| best > 0)
                .map_or(available, |best| best.min(available)),
        }
    }

    /// Interpret the rows of `data` selected by `row_indices`.
    ///
    /// # Arguments
    ///
    /// * `data` - Sample-major input matrix `[n_rows, n_features]`
    /// * `row_indices` - Rows to interpret; may repeat and need not be sorted
    /// * `iteration_limit` - See [`Self::resolve_iterations`]
    ///
    /// # Returns
    ///
    /// One table per entry of `row_indices`, in the same order.
    ///
    /// # Errors
    ///
    /// - [`ExplainError::IndexOutOfRange`] for a row outside `data`
    /// - [`ExplainError::ShapeMismatch`] if the predictor's class count or
    ///   output shape disagrees with the topology
    /// - [`ExplainError::NodeNotFound`] if a predicted leaf is missing from
    ///   the topology
    /// - [`ExplainError::Predict`] if the predictor fails
    pub fn interpret(
        &self,
        data: ArrayView2<'_, f64>,
        row_indices: &[usize],
        iteration_limit: Option<i32>,
    ) -> Result<Vec<ContributionTable>, ExplainError> {
        let n_rows = data.nrows();
        if let Some(&row) = row_indices.iter().find(|&&row| row >= n_rows) {
            return Err(ExplainError::IndexOutOfRange { row, n_rows });
        }

        let n_classes = self.store.n_classes();
        if self.predictor.n_groups() != n_classes {
            return Err(ExplainError::ShapeMismatch {
                context: "predictor output groups",
                expected: n_classes,
                actual: self.predictor.n_groups(),
            });
        }

        if row_indices.is_empty() {
            return Ok(Vec::new());
        }

        let n_iterations = self.resolve_iterations(iteration_limit);
        log::debug!(
            "interpreting {} rows: {} iterations x {} classes ({:?})",
            row_indices.len(),
            n_iterations,
            n_classes,
            self.parallelism
        );

        let selected = data.select(Axis(0), row_indices);
        let leaves = self
            .predictor
            .predict_leaf(selected.view(), n_iterations, self.parallelism)?;

        if leaves.nrows() != row_indices.len() {
            return Err(ExplainError::ShapeMismatch {
                context: "leaf index rows",
                expected: row_indices.len(),
                actual: leaves.nrows(),
            });
        }
        if leaves.ncols() != n_iterations * n_classes {
            return Err(ExplainError::ShapeMismatch {
                context: "leaf indices per row",
                expected: n_iterations * n_classes,
                actual: leaves.ncols(),
            });
        }

        self.parallelism
            .maybe_par_map(0..row_indices.len(), |pos| {
                log::trace!("interpreting row {}", row_indices[pos]);
                self.interpret_row(leaves.row(pos), n_iterations)
            })
            .into_iter()
            .collect()
    }

    /// Interpret one row from its flat leaf indices.
    ///
    /// `leaf_row` has `n_iterations * n_classes` entries; entry
    /// `t * n_classes + c` is the leaf of iteration `t` in class `c`.
    fn interpret_row(
        &self,
        leaf_row: ArrayView1<'_, u32>,
        n_iterations: usize,
    ) -> Result<ContributionTable, ExplainError> {
        let n_classes = self.store.n_classes();
        let mut tree_ids = Vec::with_capacity(n_iterations);
        let mut leaf_ids = Vec::with_capacity(n_iterations);
        let mut tables = Vec::with_capacity(n_classes);

        for class in 0..n_classes {
            tree_ids.clear();
            leaf_ids.clear();
            for iteration in 0..n_iterations {
                tree_ids.push(self.store.class_tree_id(iteration, class));
                leaf_ids.push(leaf_row[iteration * n_classes + class]);
            }
            tables.push(aggregate(self.store, &tree_ids, &leaf_ids)?);
        }

        merge(tables)
    }
}
