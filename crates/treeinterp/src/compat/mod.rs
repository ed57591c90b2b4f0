//! Loaders for models trained by other frameworks.

#[cfg(feature = "lightgbm-compat")]
pub mod lightgbm;
