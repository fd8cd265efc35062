//! Node-level error surface: core failures plus configuration loading.

use config::ConfigError;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Registry core failures
    #[error(transparent)]
    Core(#[from] reghub_core::Error),

    /// Settings file / environment parsing failures
    #[error(transparent)]
    Config(#[from] ConfigError),
}
