//! `chandler serve` - boot the cart API server.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use tracing::{debug, info, warn};

use chandler_config::{ConfigSource, load_config};
use chandler_server::{AppState, Server, ServerConfig};
use chandler_session::{MemoryStore, SessionStore};
use chandler_types::ObserverSet;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Override the bind address from the config file
    #[arg(long, env = "CHANDLER_BIND")]
    pub bind: Option<SocketAddr>,
}

pub async fn run(config_path: Option<&Path>, args: ServeArgs) -> Result<()> {
    let loaded = load_config(config_path)?;
    match &loaded.source {
        ConfigSource::File(path) => info!(path = %path.display(), "Loaded configuration"),
        ConfigSource::Defaults => info!("Running with default configuration"),
    }
    let file = loaded.config;

    let session_config = file.session_config();
    let observers = ObserverSet::new();
    let store: Arc<dyn SessionStore> =
        Arc::new(MemoryStore::new(session_config.clone(), observers.clone()));
    let catalog = Arc::new(file.build_catalog());
    if catalog.is_empty() {
        warn!("Catalog is empty; every add-item request will be rejected");
    }

    let mut server_config = ServerConfig::new().with_bind_address(file.server.bind_address);
    if let Some(bind) = args.bind {
        server_config = server_config.with_bind_address(bind);
    }

    // The store owns no timer; the sweep scheduler lives here.
    if session_config.enable_sweep_task {
        let sweep_store = Arc::clone(&store);
        let interval = session_config.sweep_interval;
        info!(interval_secs = interval.as_secs(), "Starting session sweep scheduler");
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; nothing can be expired yet.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match sweep_store.sweep_expired().await {
                    Ok(removed) => {
                        if removed > 0 {
                            debug!(removed, "Sweep pass complete");
                        }
                    }
                    Err(error) => warn!(%error, "Sweep pass failed"),
                }
            }
        });
    }

    let state = AppState::new(store, catalog, observers, session_config, server_config);
    Server::from_state(state).run().await?;
    Ok(())
}
