//! The `serve` command.

use std::sync::Arc;
use tokio::runtime::Runtime;

use super::{catalog_client, open_settings_db};
use crate::catalog::CatalogApi;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::server::{self, AppState};

/// Run the HTTP API until interrupted
pub fn cmd_serve(rt: &Runtime, config: &Config) -> Result<()> {
    rt.block_on(async {
        let db = open_settings_db(config).await?;
        let catalog = connect_catalog(config).await;

        let state = AppState::new(catalog, db);
        server::run_server(state, &config.server.host, config.server.port).await?;
        Ok::<_, Error>(())
    })
}

/// An authenticated catalog client, or None when the catalog can't be reached.
///
/// The server still starts without one; catalog routes then answer 401.
async fn connect_catalog(config: &Config) -> Option<Arc<dyn CatalogApi>> {
    let client = match catalog_client(config) {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!("Catalog unavailable: {}", e);
            return None;
        }
    };

    match client.authenticate().await {
        Ok(()) => {
            tracing::info!("Authenticated with the catalog");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!("Catalog authentication failed: {}", e);
            None
        }
    }
}
