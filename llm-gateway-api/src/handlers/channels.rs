use axum::extract::State;
use llm_gateway_core::{ChannelId, CoreError, PageRequest, SearchFilter};
use validator::Validate;

use crate::{
    dto::*,
    error::ApiResult,
    extract::{ApiJson, ApiPath, ApiQuery},
    observability::{ChannelMetrics, DiscoveryOutcome},
    response::ApiResponse,
    AppState,
};

pub async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> ApiResult<ApiResponse<Vec<ChannelResponse>>> {
    let page = PageRequest::new(
        query.p.unwrap_or_default(),
        query.page_size.unwrap_or_default(),
        query.id_sort.unwrap_or_default(),
    );
    let channels = state.service.list_channels(page).await?;

    Ok(ApiResponse::ok(channels.into_iter().map(ChannelResponse::from).collect()))
}

pub async fn search(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> ApiResult<ApiResponse<Vec<ChannelResponse>>> {
    let filter = SearchFilter {
        keyword: query.keyword,
        group: query.group,
        model: query.model,
    };
    let channels = state
        .service
        .search_channels(&filter, query.id_sort.unwrap_or_default())
        .await?;

    Ok(ApiResponse::ok(channels.into_iter().map(ChannelResponse::from).collect()))
}

pub async fn get(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ChannelId>,
) -> ApiResult<ApiResponse<ChannelResponse>> {
    let channel = state.service.get_channel(id).await?;
    Ok(ApiResponse::ok(channel.into()))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateChannelRequest>,
) -> ApiResult<ApiResponse<CreatedChannels>> {
    payload.validate()?;

    let ids = state.service.create_channels(payload.into_template()).await?;
    ChannelMetrics::channels_created(ids.len());

    Ok(ApiResponse::ok(CreatedChannels { count: ids.len(), ids }))
}

pub async fn update(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<UpdateChannelRequest>,
) -> ApiResult<ApiResponse<ChannelResponse>> {
    payload.validate()?;

    let (id, patch) = payload.into_patch();
    let channel = state.service.update_channel(id, &patch).await?;

    Ok(ApiResponse::ok(channel.into()))
}

pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ChannelId>,
) -> ApiResult<ApiResponse<()>> {
    state.service.delete_channel(id).await?;
    ChannelMetrics::channels_deleted(1);

    Ok(ApiResponse::done())
}

pub async fn batch_delete(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<BatchDeleteRequest>,
) -> ApiResult<ApiResponse<AffectedRows>> {
    let count = state.service.delete_channels(&payload.ids).await?;
    ChannelMetrics::channels_deleted(count);

    Ok(ApiResponse::ok(AffectedRows { count }))
}

pub async fn delete_disabled(State(state): State<AppState>) -> ApiResult<ApiResponse<AffectedRows>> {
    let count = state.service.delete_disabled_channels().await?;
    ChannelMetrics::channels_deleted(count);

    Ok(ApiResponse::ok(AffectedRows { count }))
}

pub async fn fetch_models(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ChannelId>,
) -> ApiResult<ApiResponse<Vec<String>>> {
    match state.service.fetch_upstream_models(id).await {
        Ok(models) => {
            ChannelMetrics::discovery(DiscoveryOutcome::Success);
            Ok(ApiResponse::ok(models))
        }
        Err(err) => {
            let outcome = match err {
                CoreError::UnsupportedProvider(_) => DiscoveryOutcome::Unsupported,
                _ => DiscoveryOutcome::Failed,
            };
            ChannelMetrics::discovery(outcome);
            Err(err.into())
        }
    }
}

pub async fn fix_abilities(State(state): State<AppState>) -> ApiResult<ApiResponse<AffectedRows>> {
    let count = state.service.repair_abilities().await?;
    Ok(ApiResponse::ok(AffectedRows { count }))
}
