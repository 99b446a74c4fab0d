//! Server module for the advodir directory service.
//!
//! Assembles the shared application state (advocate store, rate limiter,
//! configuration), binds the listener from the validated configuration and
//! serves the router until a shutdown signal arrives.
//!
//! The server is started with connect info so handlers can read the peer
//! address for client identification. Rate-limit state lives only in this
//! process; a restart resets every client's counters.

use crate::AppState;
use crate::env::AppConfig;
use crate::rate_limiter::RateLimiter;
use crate::routing::router::create_router;
use crate::store::AdvocateStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::time::Duration;
use tracing::{error, info};

///////////////////////////////////////////////////////////////////////////////
//****                       Public Functions                            ****//
///////////////////////////////////////////////////////////////////////////////

/// Start the directory service with graceful shutdown support
pub async fn start_server(store: AdvocateStore, config: AppConfig) {
    let rate_limiter = Arc::new(RateLimiter::new(
        Duration::from_secs(config.rate_limit_window_secs),
        config.rate_limit_max_requests,
    ));

    info!(
        window_secs = config.rate_limit_window_secs,
        max_requests = config.rate_limit_max_requests,
        records = store.len(),
        "Configured rate limiter and advocate store"
    );

    let app_state = AppState {
        store,
        rate_limiter,
        config: config.clone(),
    };

    let app = create_router(app_state);

    let listener = tokio::net::TcpListener::bind(config.bind_address)
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    info!("Advodir running on http://{}", addr);

    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal());

    if let Err(err) = server.await {
        error!("Advodir server error: {}", err);
    }

    info!("Advodir shutdown complete");
}

///////////////////////////////////////////////////////////////////////////////
//****                       Private Functions                           ****//
///////////////////////////////////////////////////////////////////////////////

/// Resolve when the process receives ctrl-c or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for ctrl-c: {}", err);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => error!("Failed to install SIGTERM handler: {}", err),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl-c, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
