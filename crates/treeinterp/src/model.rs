//! High-level interpretable model.
//!
//! [`TreeModel`] bundles a LightGBM leaf predictor with its exported topology
//! and an [`InterpretConfig`], and runs interpretation on the configured
//! thread pool.

use std::path::Path;

use ndarray::ArrayView2;

use crate::compat::lightgbm::{ConversionError, LgbLeafPredictor, LgbModel, ParseError};
use crate::config::{ConfigError, InterpretConfig};
use crate::explain::{ContributionTable, ExplainError, Interpreter};
use crate::repr::TreeStore;
use crate::utils::run_with_threads;

/// Errors raised while loading or interpreting a [`TreeModel`].
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to parse model: {0}")]
    Parse(#[from] ParseError),
    #[error("failed to convert model: {0}")]
    Conversion(#[from] ConversionError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Explain(#[from] ExplainError),
}

/// A tree ensemble ready for decision-path interpretation.
pub struct TreeModel {
    store: TreeStore,
    predictor: LgbLeafPredictor,
    config: InterpretConfig,
}

impl TreeModel {
    /// Build from a parsed LightGBM model.
    pub fn from_lgb(model: &LgbModel, config: InterpretConfig) -> Result<Self, ModelError> {
        let store = model.to_tree_store()?;
        let predictor = LgbLeafPredictor::new(model)?.with_best_iteration(config.best_iteration);
        Ok(Self { store, predictor, config })
    }

    /// Load a LightGBM text model from disk.
    pub fn from_file(path: impl AsRef<Path>, config: InterpretConfig) -> Result<Self, ModelError> {
        Self::from_lgb(&LgbModel::from_file(path)?, config)
    }

    /// Parse a LightGBM text model from a string.
    pub fn from_string(content: &str, config: InterpretConfig) -> Result<Self, ModelError> {
        Self::from_lgb(&LgbModel::from_string(content)?, config)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn store(&self) -> &TreeStore {
        &self.store
    }

    pub fn predictor(&self) -> &LgbLeafPredictor {
        &self.predictor
    }

    pub fn config(&self) -> &InterpretConfig {
        &self.config
    }

    /// Number of output classes.
    pub fn n_classes(&self) -> usize {
        self.store.n_classes()
    }

    // =========================================================================
    // Interpretation
    // =========================================================================

    /// Interpret the rows of `data` selected by `row_indices`.
    ///
    /// See [`Interpreter::interpret`] for argument and ordering semantics.
    /// Runs on `config.n_threads` threads.
    pub fn interpret(
        &self,
        data: ArrayView2<'_, f64>,
        row_indices: &[usize],
        iteration_limit: Option<i32>,
    ) -> Result<Vec<ContributionTable>, ModelError> {
        let tables = run_with_threads(self.config.n_threads, |parallelism| {
            Interpreter::new(&self.store, &self.predictor)
                .with_parallelism(parallelism)
                .interpret(data, row_indices, iteration_limit)
        })?;
        Ok(tables)
    }

    /// Interpret every row of `data`.
    pub fn interpret_all(
        &self,
        data: ArrayView2<'_, f64>,
        iteration_limit: Option<i32>,
    ) -> Result<Vec<ContributionTable>, ModelError> {
        let rows: Vec<usize> = (0..data.nrows()).collect();
        self.interpret(data, &rows, iteration_limit)
    }
}
