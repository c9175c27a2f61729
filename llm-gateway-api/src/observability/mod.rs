//! Observability for the channel API
//!
//! - Structured logging with JSON, pretty and compact formats
//! - Prometheus metrics for channel lifecycle and upstream discovery

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, LogConfig, LogFormat};
pub use metrics::{init_metrics, metrics_handler, ChannelMetrics, DiscoveryOutcome, MetricsError};
