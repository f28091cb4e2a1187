//! Who's On Pole? feed server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware};
use pole_api::{middleware::AppState, router as api_router};
use pole_common::Config;
use pole_core::{FeedRepositories, FeedService, PollService};
use pole_db::repositories::{PollRepository, PollResponseRepository};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
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
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pole=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting Who's On Pole? feed server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = Arc::new(pole_db::init(&config).await?);
    info!("Connected to database");

    if config.database.run_migrations {
        info!("Running database migrations...");
        pole_db::migrate(&db).await?;
        info!("Migrations completed");
    }

    // Initialize services
    let feed_service = FeedService::new(FeedRepositories::new(&db), config.feed.clone());
    let poll_service = PollService::new(
        PollRepository::new(Arc::clone(&db)),
        PollResponseRepository::new(Arc::clone(&db)),
    );

    let state = AppState {
        feed_service,
        poll_service,
    };

    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn(pole_api::middleware::auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
