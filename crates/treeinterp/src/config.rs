//! Interpretation configuration with builder pattern.
//!
//! ```
//! use treeinterp::InterpretConfig;
//!
//! // All defaults: global thread pool, every iteration
//! let config = InterpretConfig::builder().build().unwrap();
//!
//! let config = InterpretConfig::builder()
//!     .n_threads(4)
//!     .best_iteration(50)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.best_iteration, Some(50));
//! ```

use bon::Builder;

/// Errors raised while validating an [`InterpretConfig`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("best_iteration must be at least 1 when set")]
    InvalidBestIteration,
}

/// Settings for [`TreeModel`](crate::TreeModel) interpretation.
#[derive(Debug, Clone, Default, Builder)]
#[builder(derive(Clone, Debug), finish_fn(vis = "", name = __build_internal))]
pub struct InterpretConfig {
    /// Number of threads. `0` uses the global rayon pool, `1` runs
    /// sequentially. Default: 0.
    #[builder(default)]
    pub n_threads: usize,

    /// Early-stopping iteration, used when no iteration limit is passed.
    /// `None` interprets every iteration.
    pub best_iteration: Option<usize>,
}

impl<S: interpret_config_builder::IsComplete> InterpretConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidBestIteration`] if `best_iteration` is `Some(0)`.
    pub fn build(self) -> Result<InterpretConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl InterpretConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.best_iteration == Some(0) {
            return Err(ConfigError::InvalidBestIteration);
        }
        Ok(())
    }
}
