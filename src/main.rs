// src/main.rs

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use dotenvy::dotenv;
use examprep::config::Config;
use examprep::news::{NewsSource, RssNewsSource, StaticNewsSource};
use examprep::resolver::Resolver;
use examprep::routes;
use examprep::seed::seed_demo_content;
use examprep::state::AppState;
use examprep::store::{ContentStore, Database, PgStore};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env()?;

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // Acquire the shared database handle, retrying while the server comes up
    let database = Arc::new(Database::new(config.database_url.clone()));
    let mut retry_count = 0;
    let pool = loop {
        match database.pool().await {
            Ok(pool) => break pool,
            Err(e) => {
                retry_count += 1;
                if retry_count > 5 {
                    return Err(format!(
                        "Failed to connect to database after 5 retries: {}",
                        e
                    )
                    .into());
                }
                tracing::warn!("Database not ready, retrying in 2s... (Attempt {})", retry_count);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    };

    tracing::info!("Database connected...");

    // Run Migrations Automatically
    tracing::info!("Running migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Migrations applied successfully.");

    let store: Arc<dyn ContentStore> = Arc::new(PgStore::new(database.clone()));

    if config.seed_demo_data {
        if let Err(e) = seed_demo_content(store.as_ref()).await {
            tracing::error!("Failed to seed demo content: {:?}", e);
        }
    }

    let news: Arc<dyn NewsSource> =
        match RssNewsSource::new(config.news_feed_url.clone(), config.news_queries.clone()) {
            Ok(source) => Arc::new(source),
            Err(e) => {
                tracing::error!("News feed disabled: {}", e);
                Arc::new(StaticNewsSource::default())
            }
        };

    let state = AppState {
        resolver: Resolver::new(store),
        news,
        config: config.clone(),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {} (public origin {})", addr, config.base_url);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Start the server
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
