use std::sync::Arc;
use std::time::Instant;

use sqlx::SqlitePool;

use super::error::ApiError;
use crate::catalog::CatalogApi;

/// Shared state handed to every request handler
#[derive(Clone)]
pub struct AppState {
    /// None when no catalog client could be authenticated at startup
    pub catalog: Option<Arc<dyn CatalogApi>>,
    pub db: SqlitePool,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(catalog: Option<Arc<dyn CatalogApi>>, db: SqlitePool) -> Self {
        Self {
            catalog,
            db,
            start_time: Instant::now(),
        }
    }

    /// The catalog client, or the error every catalog-backed route answers without one
    pub fn catalog(&self) -> Result<&dyn CatalogApi, ApiError> {
        self.catalog.as_deref().ok_or(ApiError::AuthenticationFailed)
    }
}
