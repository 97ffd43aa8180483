//! flashbox-server: standalone REST service over a shared flash message table.
//!
//! Startup order:
//! 1. Read configuration from `FLASHBOX_*` environment variables.
//! 2. Initialise tracing (JSON when `FLASHBOX_LOG_JSON` is set).
//! 3. Build the `PostgreSQL` connection pool.
//! 4. Build the router and serve it with graceful shutdown.
//!
//! The schema is created by the SQL migration shipped under `migrations/`;
//! the server does not run migrations itself.

use axum::http::HeaderName;
use axum::middleware::from_fn_with_state;
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use flashbox::config::{FlashSettings, ServerConfig};
use flashbox::flash::adapters::postgres::PostgresFlashRepository;
use flashbox::http::{AppState, identity::trust_user_header, router, router_with_read_cleanup};
use mockable::DefaultClock;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env();
    let settings = FlashSettings::from_env();
    init_tracing(&config);
    info!(version = env!("CARGO_PKG_VERSION"), "flashbox-server starting");

    let manager = ConnectionManager::<PgConnection>::new(config.database_url.as_str());
    let pool = Pool::builder().max_size(config.pool_size).build(manager)?;
    info!(pool_size = config.pool_size, "database pool ready");

    let state = AppState::new(
        Arc::new(PostgresFlashRepository::new(pool)),
        Arc::new(DefaultClock),
        settings,
    );
    let mut app = if config.clear_read_after_request {
        router_with_read_cleanup(state)
    } else {
        router(state)
    };
    if let Some(name) = &config.trusted_user_header {
        let header = HeaderName::try_from(name.as_str())?;
        info!(header = %header, "trusting user header from proxy");
        app = app.layer(from_fn_with_state(header, trust_user_header));
    }

    let addr: SocketAddr = config.bind_address.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server listening");

    axum::serve(listener, app.layer(TraceLayer::new_for_http()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("flashbox-server stopped");
    Ok(())
}

fn init_tracing(config: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if config.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

/// Resolves when SIGINT (Ctrl-C) or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install CTRL+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => warn!(error = %err, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    info!("shutdown signal received; starting graceful shutdown");
}
