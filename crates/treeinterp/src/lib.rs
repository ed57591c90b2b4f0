//! treeinterp: decision-path interpretation for additive tree ensembles.
//!
//! Explains individual predictions of gradient-boosted tree models by
//! crediting every split on a row's decision path with the change in running
//! score it causes, then summing those credits per feature and class.
//!
//! # Key Types
//!
//! - [`TreeModel`] - LightGBM model plus topology, ready to interpret
//! - [`InterpretConfig`] - Thread count and early-stopping iteration
//! - [`ContributionTable`] - Per-row result: features × classes
//! - [`TreeStore`] - Validated ensemble topology
//!
//! # Lower-level Building Blocks
//!
//! The [`explain`] module exposes each stage separately ([`decompose`],
//! [`aggregate`], [`merge`], [`Interpreter`]) for topologies loaded from a
//! node table and leaf indices from any [`LeafPredictor`].
//!
//! # Example
//!
//! ```ignore
//! use treeinterp::{InterpretConfig, TreeModel};
//!
//! let model = TreeModel::from_file("model.txt", InterpretConfig::default())?;
//! let tables = model.interpret(data.view(), &[0, 5, 7], None)?;
//! for (feature, contributions) in tables[0].iter() {
//!     println!("{feature}: {contributions}");
//! }
//! ```

// Re-export approx for users comparing contributions
pub use approx;

pub mod compat;
pub mod config;
pub mod explain;
pub mod inference;
#[cfg(feature = "lightgbm-compat")]
pub mod model;
pub mod repr;
pub mod testing;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

#[cfg(feature = "lightgbm-compat")]
pub use model::{ModelError, TreeModel};

pub use config::{ConfigError, InterpretConfig};

pub use explain::{
    aggregate, decompose, merge, ContributionTable, DecisionPath, ExplainError,
    FeatureContributions, Interpreter,
};

pub use inference::{LeafPredictor, PredictError};

pub use repr::{NodeRow, TopologyError, TreeStore};

pub use utils::{run_with_threads, Parallelism};
