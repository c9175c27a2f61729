use axum::extract::State;
use validator::Validate;

use crate::{
    dto::*,
    error::ApiResult,
    extract::ApiJson,
    observability::ChannelMetrics,
    response::ApiResponse,
    AppState,
};

pub async fn disable(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<TagRequest>,
) -> ApiResult<ApiResponse<AffectedRows>> {
    payload.validate()?;

    let count = state.service.disable_tag(&payload.tag).await?;
    ChannelMetrics::tag_operation("disable");

    Ok(ApiResponse::ok(AffectedRows { count }))
}

pub async fn enable(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<TagRequest>,
) -> ApiResult<ApiResponse<AffectedRows>> {
    payload.validate()?;

    let count = state.service.enable_tag(&payload.tag).await?;
    ChannelMetrics::tag_operation("enable");

    Ok(ApiResponse::ok(AffectedRows { count }))
}

pub async fn edit(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<EditTagRequest>,
) -> ApiResult<ApiResponse<AffectedRows>> {
    payload.validate()?;

    let (tag, edit) = payload.into_edit();
    let count = state.service.edit_tag(&tag, &edit).await?;
    ChannelMetrics::tag_operation("edit");

    Ok(ApiResponse::ok(AffectedRows { count }))
}
