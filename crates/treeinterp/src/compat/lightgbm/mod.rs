//! LightGBM model support.
//!
//! - [`LgbModel`]: parsed text model (`model.txt` from `save_model()`)
//! - [`LgbModel::to_node_rows`] / [`LgbModel::to_tree_store`]: topology export
//! - [`LgbLeafPredictor`]: leaf-index prediction with LightGBM split semantics
//!
//! Trees keep LightGBM's ensemble order, so tree `t * num_tree_per_iteration + c`
//! is iteration `t` of class `c`. Features are named by the model's
//! `feature_names`, or `Column_<index>` when the model has none.

mod convert;
mod predict;
mod text;

#[cfg(test)]
pub(crate) mod fixtures;

pub use convert::ConversionError;
pub use predict::LgbLeafPredictor;
pub use text::{DecisionType, LgbHeader, LgbModel, LgbTree, MissingType, ParseError};
