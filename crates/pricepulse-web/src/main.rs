mod flows;
mod html;
mod middleware;
mod pages;
mod session;
mod shell;

use std::sync::Arc;
use std::time::Duration;

use pricepulse_catalog::CatalogClient;
use pricepulse_core::{AppConfig, StoresFile};
use tracing_subscriber::EnvFilter;

use crate::{
    pages::{build_app, AppState},
    session::SessionStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = pricepulse_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let stores = load_store_directory(&config)?;
    let catalog = CatalogClient::from_app_config(&config)?;
    let sessions = SessionStore::new(Duration::from_secs(config.session_idle_secs));

    spawn_session_eviction(sessions.clone(), config.session_idle_secs);

    let app = build_app(AppState {
        catalog,
        sessions,
        stores: Arc::new(stores),
    });

    tracing::info!(
        env = %config.env,
        bind_addr = %config.bind_addr,
        catalog_url = %config.catalog_url,
        "starting pricepulse-web"
    );
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn load_store_directory(config: &AppConfig) -> anyhow::Result<StoresFile> {
    if config.stores_path.exists() {
        let stores = pricepulse_core::load_stores(&config.stores_path)?;
        tracing::info!(
            path = %config.stores_path.display(),
            count = stores.stores.len(),
            "loaded store directory"
        );
        Ok(stores)
    } else {
        tracing::info!(
            path = %config.stores_path.display(),
            "store directory file not found; using built-in list"
        );
        Ok(StoresFile::builtin())
    }
}

/// Sweeps idle sessions at a fraction of the idle timeout.
fn spawn_session_eviction(sessions: SessionStore, idle_secs: u64) {
    let period = Duration::from_secs((idle_secs / 4).clamp(1, 300));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let evicted = sessions.evict_idle();
            if evicted > 0 {
                tracing::debug!(
                    evicted,
                    live = sessions.live_sessions(),
                    "evicted idle sessions"
                );
            }
        }
    });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
