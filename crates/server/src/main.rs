//! Murmur server entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use murmur_api::{AppState, StaticTokenAuthenticator};
use murmur_common::config::LogFormat;
use murmur_common::{Config, LocalStorage};
use murmur_core::{Processor, StoreMediaManager};
use murmur_db::MemoryStore;
use murmur_federation::{DynTransport, HttpTransport, NoOpTransport, UriBuilder};
use murmur_queue::Workers;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM), then cancels `shutdown`.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }

    shutdown.cancel();
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "murmur=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    init_tracing(config.logging.format);

    info!("Starting murmur server...");

    let store = Arc::new(MemoryStore::new());
    let storage = Arc::new(LocalStorage::new(
        config.media.storage_path.clone().into(),
        config.media.base_url.clone(),
    ));

    let transport: DynTransport = if config.federation.enabled {
        Arc::new(HttpTransport::new(
            &config.federation.user_agent,
            Duration::from_secs(config.federation.delivery_timeout_secs),
        )?)
    } else {
        info!("Federation disabled, outbound deliveries are dropped");
        Arc::new(NoOpTransport)
    };

    let workers = Arc::new(Workers::new(&config.workers));
    let media = Arc::new(StoreMediaManager::new(
        store.clone(),
        storage,
        config.media.unused_local_attachment_days,
    ));
    let processor = Processor::new(
        store.clone(),
        transport,
        workers,
        media,
        UriBuilder::new(&config.server.url)?,
    )
    .with_federation(config.federation.enabled);

    processor.start()?;

    let shutdown = CancellationToken::new();
    let state = AppState {
        processor: processor.clone(),
        store: store.clone(),
        authenticator: Arc::new(StaticTokenAuthenticator::new(
            config.api.tokens.clone(),
            store,
        )),
        shutdown: shutdown.clone(),
        media_remote_cache_days: config.media.remote_cache_days,
    };

    let app = murmur_api::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    // Drain queued work once no new requests can arrive.
    processor.stop().await;

    info!("Server shutdown complete");
    Ok(())
}
