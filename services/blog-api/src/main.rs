//! Scribe Blog API server binary

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::signal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use blog_api::config::Config;
use blog_api::state::AppState;
use blog_api::{build_router, setup_metrics};
use scribe_auth_core::AuthService;
use scribe_db::{PoolOptions, Repositories, UserRepository};
use scribe_media::CloudinaryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    let filter = EnvFilter::from_default_env().add_directive("blog_api=debug".parse()?);
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v == "json");
    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting Scribe Blog API");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(
        http_port = config.http_port,
        app_env = %config.app_env,
        "Configuration loaded"
    );

    // Initialize metrics
    let metrics_handle = if config.metrics_enabled {
        Some(setup_metrics()?)
    } else {
        None
    };

    // Create database pool and apply migrations
    let pool = scribe_db::create_pool(
        &config.database_url,
        PoolOptions {
            max_connections: config.database_max_connections,
            ..PoolOptions::default()
        },
    )
    .await?;
    scribe_db::run_migrations(&pool).await?;
    tracing::info!("Database pool created");

    // Create repositories and services
    let repos = Repositories::new(pool.clone());
    let users: Arc<dyn UserRepository> = Arc::new(repos.users);
    let auth = AuthService::new(config.auth.clone(), users)?;
    let media = CloudinaryStore::new(config.cloudinary.clone())?;

    // Create application state
    let state = AppState::new(
        auth,
        Arc::new(repos.blogs),
        Arc::new(media),
        Some(pool),
        config.clone(),
    );

    let app = build_router(state, metrics_handle);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    run_http_server(app, addr).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn run_http_server(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    tracing::info!("HTTP server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
