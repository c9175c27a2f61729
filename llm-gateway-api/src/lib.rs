//! HTTP surface of the channel registry.

pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod observability;
pub mod response;
pub mod upstream;

pub use dto::*;
pub use error::{ApiError, ApiResult};
pub use response::ApiResponse;
pub use upstream::{OpenAiCompatibleClient, UpstreamConfig};

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use llm_gateway_core::ChannelService;

#[derive(Clone)]
pub struct AppState {
    pub service: ChannelService,
}

impl AppState {
    pub fn new(service: ChannelService) -> Self {
        Self { service }
    }
}

/// Channel routes, to be nested under `/api`.
///
/// Unknown paths and unsupported methods answer with the failure envelope.
pub fn routes(state: AppState) -> Router {
    let channel_root = get(handlers::channels::list)
        .post(handlers::channels::create)
        .put(handlers::channels::update);

    Router::new()
        .route("/channel", channel_root.clone())
        .route("/channel/", channel_root)
        .route("/channel/search", get(handlers::channels::search))
        .route("/channel/batch", post(handlers::channels::batch_delete))
        .route("/channel/disabled", delete(handlers::channels::delete_disabled))
        .route("/channel/fix", post(handlers::channels::fix_abilities))
        .route("/channel/fetch_models/:id", get(handlers::channels::fetch_models))
        .route("/channel/tag/disabled", post(handlers::tags::disable))
        .route("/channel/tag/enabled", post(handlers::tags::enable))
        .route("/channel/tag", put(handlers::tags::edit))
        .route(
            "/channel/:id",
            get(handlers::channels::get).delete(handlers::channels::delete),
        )
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .fallback(handlers::not_found)
        .with_state(state)
}
