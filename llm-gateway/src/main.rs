use anyhow::{Context, Result};
use axum::{routing::get, Router};
use llm_gateway_api::observability::{init_logging, init_metrics, metrics_handler, LogConfig};
use llm_gateway_api::{AppState, OpenAiCompatibleClient, UpstreamConfig};
use llm_gateway_core::{ChannelService, ChannelStore, ServiceConfig};
use llm_gateway_storage::postgres::{self, PostgresConfig};
use llm_gateway_storage::{InMemoryChannelStore, PgChannelRepository};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

mod config;

use config::{Config, StorageBackend};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;

    init_logging(LogConfig::new(config.log_format, config.log_level.clone()))
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))?;
    init_metrics()?;

    tracing::info!(backend = ?config.storage_backend, "Starting LLM gateway channel registry");

    let store = build_store(&config).await?;
    let upstream = OpenAiCompatibleClient::new(UpstreamConfig {
        timeout: Duration::from_secs(config.upstream_timeout_secs),
        connect_timeout: Duration::from_secs(config.upstream_connect_timeout_secs),
    })
    .context("failed to build upstream HTTP client")?;

    let service = ChannelService::new(
        store,
        Arc::new(upstream),
        ServiceConfig {
            default_page_size: config.default_page_size,
        },
    );

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .nest("/api", llm_gateway_api::routes(AppState::new(service)))
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn build_store(config: &Config) -> Result<Arc<dyn ChannelStore>> {
    match config.storage_backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory channel store; data is lost on exit");
            Ok(Arc::new(InMemoryChannelStore::new()))
        }
        StorageBackend::Postgres => {
            let pool_config = PostgresConfig::new(config.database_url.clone())
                .with_max_connections(config.max_connections);
            let pool = postgres::connect(&pool_config).await?;
            if config.run_migrations {
                postgres::migrate(&pool).await?;
            }
            postgres::health_check(&pool).await?;

            let repo = PgChannelRepository::new(pool);
            let channels = repo.count().await.context("Failed to count stored channels")?;
            tracing::info!(channels, "Channel store ready");
            Ok(Arc::new(repo))
        }
    }
}

async fn health_check() -> &'static str {
    "OK"
}
