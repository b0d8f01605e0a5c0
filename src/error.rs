//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`, while the
//! CLI and `main` use `anyhow` for convenient error propagation.
//!
//! # Design
//!
//! - [`Error`]: Top-level application error enum
//! - Module-specific errors (e.g., [`CatalogError`], [`SettingsError`]) for detailed handling
//! - All errors implement `std::error::Error` for compatibility
//!
//! # Example
//!
//! ```ignore
//! use trackbridge::error::{Result, ResultExt};
//!
//! async fn open(url: &str) -> Result<SqlitePool> {
//!     settings::init_db(url).await.with_context("opening settings database")
//! }
//! ```

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::discovery::DiscoveryError;
use crate::settings::SettingsError;
use crate::transition::TransitionError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().context(ctx))
    }
}
