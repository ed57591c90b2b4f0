//! Decision-path interpretation.
//!
//! Explains a prediction by walking, in every tree, from the leaf the row
//! reached back to the root. Each split on the way is credited with the
//! change in the model's running score it caused:
//!
//! ```text
//! root (0.10) --f1--> split (0.30) --f1--> leaf (0.50)
//!        f1: +0.20            f1: +0.20
//! ```
//!
//! Summing these credits per feature over all trees of a class gives a
//! [`FeatureContributions`] table; the tables of all classes are merged into
//! one [`ContributionTable`] per row. Contributions of a row add up to the sum
//! over trees of `leaf value - root value`.
//!
//! This is a deterministic single-path decomposition, not a Shapley-value
//! attribution.
//!
//! # Components
//!
//! - [`decompose`]: one (tree, leaf) pair into a [`DecisionPath`]
//! - [`aggregate`]: all trees of one row and class
//! - [`merge`]: all classes of one row
//! - [`Interpreter`]: a batch of rows, driven by a
//!   [`LeafPredictor`](crate::inference::LeafPredictor)

mod aggregate;
mod error;
mod interpreter;
mod merge;
mod path;

pub use aggregate::{aggregate, FeatureContributions};
pub use error::ExplainError;
pub use interpreter::Interpreter;
pub use merge::{class_column, merge, ContributionTable, CONTRIBUTION_COLUMN, FEATURE_COLUMN};
pub use path::{decompose, DecisionPath};
