//! Prometheus metrics for the channel registry
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use llm_gateway_api::observability::metrics::{init_metrics, metrics_handler};
//!
//! init_metrics().expect("Failed to initialize metrics");
//! let app: Router<()> = Router::new().route("/metrics", get(metrics_handler));
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use tracing::error;

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Errors that can occur during metrics operations
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("Failed to install metrics exporter: {0}")]
    Installation(String),
}

/// Install the Prometheus recorder. Later calls are no-ops.
pub fn init_metrics() -> Result<(), MetricsError> {
    if PROMETHEUS_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;
    let _ = PROMETHEUS_HANDLE.set(handle);

    describe_counter!("channels_created_total", "Channel records created, after key expansion");
    describe_counter!("channels_deleted_total", "Channel records deleted");
    describe_counter!("channel_tag_operations_total", "Tag group operations by kind");
    describe_counter!("upstream_discovery_total", "Upstream model discovery attempts by outcome");

    Ok(())
}

/// Renders the Prometheus text format. Mount at `/metrics`.
pub async fn metrics_handler() -> Response {
    match PROMETHEUS_HANDLE.get() {
        Some(handle) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => {
            error!("Metrics handler called but metrics not initialized");
            (StatusCode::INTERNAL_SERVER_ERROR, "Metrics not initialized").into_response()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryOutcome {
    Success,
    Unsupported,
    Failed,
}

impl DiscoveryOutcome {
    fn as_str(&self) -> &'static str {
        match self {
            DiscoveryOutcome::Success => "success",
            DiscoveryOutcome::Unsupported => "unsupported",
            DiscoveryOutcome::Failed => "failed",
        }
    }
}

/// Channel lifecycle counters
pub struct ChannelMetrics;

impl ChannelMetrics {
    pub fn channels_created(count: usize) {
        counter!("channels_created_total").increment(count as u64);
    }

    pub fn channels_deleted(count: u64) {
        counter!("channels_deleted_total").increment(count);
    }

    /// `operation` is one of `disable`, `enable`, `edit`
    pub fn tag_operation(operation: &'static str) {
        counter!("channel_tag_operations_total", "operation" => operation).increment(1);
    }

    pub fn discovery(outcome: DiscoveryOutcome) {
        counter!("upstream_discovery_total", "outcome" => outcome.as_str()).increment(1);
    }
}
