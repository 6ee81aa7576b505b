//! Application state, store connection and the serve loop.

use anyhow::{Context, bail};
use keepsake::{
    mongodb::MongoDbStoreBuilder,
    prelude::{DocumentStore, StoreBackendBuilder},
};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::{config::Args, routes};

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: DocumentStore,
    /// Whether `DATABASE_URL` was configured
    pub database_url_set: bool,
    /// Whether `DATABASE_NAME` was configured
    pub database_name_set: bool,
}

impl AppState {
    pub fn new(store: DocumentStore) -> Self {
        Self {
            store,
            database_url_set: false,
            database_name_set: false,
        }
    }

    /// Records which database settings were present at startup.
    pub fn with_settings(mut self, args: &Args) -> Self {
        self.database_url_set = args.database_url().is_some();
        self.database_name_set = args.database_name().is_some();
        self
    }
}

/// Connects the document store described by `args`.
///
/// Without both database settings the store is disconnected. A store that does not answer
/// the startup ping is still attached, since the driver reconnects on later requests,
/// unless `--require-store` asks to fail instead.
pub async fn connect_store(args: &Args) -> anyhow::Result<DocumentStore> {
    let (Some(url), Some(name)) = (args.database_url(), args.database_name()) else {
        if args.require_store {
            bail!("store required but DATABASE_URL or DATABASE_NAME is missing");
        }
        warn!("DATABASE_URL or DATABASE_NAME not set, continuing without a store");
        return Ok(DocumentStore::disconnected());
    };

    let backend = match MongoDbStoreBuilder::new(url, name)
        .timeout(args.store_timeout())
        .build()
        .await
    {
        Ok(backend) => backend,
        Err(e) if args.require_store => {
            return Err(e).context("failed to configure the MongoDB client");
        }
        Err(e) => {
            warn!(error = %e, "MongoDB client configuration failed, continuing without a store");
            return Ok(DocumentStore::disconnected());
        }
    };

    let store = DocumentStore::new(backend);

    match store.ping().await {
        Ok(()) => info!(database = name, "MongoDB connected successfully"),
        Err(e) if args.require_store => {
            error!(error = %e, "MongoDB did not answer the startup ping");
            return Err(e).context("store required but unreachable");
        }
        Err(e) => warn!(error = %e, "MongoDB did not answer the startup ping, requests will retry the connection"),
    }

    Ok(store)
}

/// Runs the HTTP server until ctrl-c, then shuts the store down.
pub async fn run(args: Args) -> anyhow::Result<()> {
    let store = connect_store(&args).await?;
    let state = AppState::new(store.clone()).with_settings(&args);

    let addr = args.listen_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(%addr, "listening");

    axum::serve(listener, routes::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shutting down");

    if let Err(e) = store.shutdown().await {
        warn!(error = %e, "store shutdown failed");
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
    }
}
