//! Public channel endpoints, authorized with the application key

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use std::sync::Arc;

use super::response::{DataCollectionResponse, DataResponse};
use crate::AppState;
use crate::constants::error_codes::{ERR_UNSPECIFIED, ERR_YT_CHANNEL_MISSING};
use crate::domain::channels::{latest_uploads, resolve_channel};
use crate::models::{Channel, Video};
use crate::services::error::{LogErr, RestError};
use crate::services::youtube::YouTubeError;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/channel/{channel_id}/info", get(channel_info))
        .route("/channel/{channel_id}/videos", get(channel_videos))
}

/// Not-found maps to 404 `ERR_YT_CHANNEL_MISSING`, anything else to 500
fn log_channel_err<T>(result: Result<T, YouTubeError>, context: &str) -> Result<T, RestError> {
    match result {
        Err(e) if e.is_not_found() => {
            Err(e).log_status(context, StatusCode::NOT_FOUND, ERR_YT_CHANNEL_MISSING)
        }
        other => other.log_500(context, ERR_UNSPECIFIED),
    }
}

/// GET /channel/{channel_id}/info
async fn channel_info(
    State(state): State<Arc<AppState>>,
    Path(channel_id): Path<String>,
) -> Result<Json<DataResponse<Channel>>, RestError> {
    let channel = log_channel_err(
        resolve_channel(state.youtube.as_ref(), &channel_id).await,
        "Failed to fetch channel",
    )?;

    Ok(Json(DataResponse::new(channel)))
}

/// GET /channel/{channel_id}/videos - First page of the channel's uploads
async fn channel_videos(
    State(state): State<Arc<AppState>>,
    Path(channel_id): Path<String>,
) -> Result<Json<DataCollectionResponse<Video>>, RestError> {
    let videos = log_channel_err(
        latest_uploads(state.youtube.as_ref(), &channel_id).await,
        "Failed to fetch channel uploads",
    )?;

    Ok(Json(DataCollectionResponse::new(videos)))
}
