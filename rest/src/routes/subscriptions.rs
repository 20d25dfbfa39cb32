//! Endpoints acting on behalf of the user (/subscriptions, /subscriptions/feed)

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use std::sync::Arc;
use tower_governor::{
    GovernorError, GovernorLayer, governor::GovernorConfigBuilder,
    key_extractor::SmartIpKeyExtractor,
};

use super::auth::YouTubeAuth;
use super::response::DataCollectionResponse;
use crate::AppState;
use crate::config::RateLimitConfig;
use crate::constants::error_codes::{ERR_FETCHING, ERR_RATE_LIMITED, ERR_UNSPECIFIED};
use crate::domain::feed::{FeedError, build_feed};
use crate::domain::paging::enumerate_subscriptions;
use crate::models::{Channel, Video};
use crate::services::error::{LogErr, RestError};

pub fn routes(rate_limit: Option<RateLimitConfig>) -> Router<Arc<AppState>> {
    let router = Router::new()
        .route("/subscriptions", get(list_subscriptions))
        .route("/subscriptions/feed", get(subscription_feed));

    let Some(limits) = rate_limit else {
        return router;
    };

    // Every feed request fans out into many upstream calls on the caller's quota
    let Some(governor_config) = GovernorConfigBuilder::default()
        .per_second(limits.replenish_secs)
        .burst_size(limits.burst)
        .key_extractor(SmartIpKeyExtractor)
        .error_handler(rate_limit_error)
        .finish()
    else {
        tracing::warn!(?limits, "Invalid rate limit settings, serving without a limiter");
        return router;
    };

    router.layer(GovernorLayer {
        config: governor_config.into(),
    })
}

/// Render limiter rejections in the same envelope as every other error
fn rate_limit_error(error: GovernorError) -> Response {
    match error {
        GovernorError::TooManyRequests { wait_time, headers } => {
            let mut response = RestError::new(StatusCode::TOO_MANY_REQUESTS, ERR_RATE_LIMITED)
                .with_detail(json!({
                    "kind": "rate_limited",
                    "message": format!("Too many requests, retry in {}s", wait_time),
                    "retryAfter": wait_time,
                }))
                .into_response();
            // Keeps retry-after / x-ratelimit-after
            if let Some(headers) = headers {
                response.headers_mut().extend(headers);
            }
            response
        }
        GovernorError::UnableToExtractKey => {
            tracing::warn!("Rate limiter could not determine the client address");
            RestError::new(StatusCode::INTERNAL_SERVER_ERROR, ERR_UNSPECIFIED).into_response()
        }
        GovernorError::Other { code, msg, headers } => {
            tracing::warn!(status = code.as_u16(), ?msg, "Rate limiter rejected request");
            let mut response = RestError::new(code, ERR_UNSPECIFIED).into_response();
            if let Some(headers) = headers {
                response.headers_mut().extend(headers);
            }
            response
        }
    }
}

/// GET /subscriptions - Channels the user subscribes to
async fn list_subscriptions(
    State(state): State<Arc<AppState>>,
    YouTubeAuth(credentials): YouTubeAuth,
) -> Result<Json<DataCollectionResponse<Channel>>, RestError> {
    let channels =
        enumerate_subscriptions(state.youtube.as_ref(), &credentials, state.feed.max_subscriptions)
            .await
            .log_500("Failed to enumerate subscriptions", ERR_UNSPECIFIED)?;

    Ok(Json(DataCollectionResponse::new(channels)))
}

/// GET /subscriptions/feed - Newest uploads across all subscriptions
async fn subscription_feed(
    State(state): State<Arc<AppState>>,
    YouTubeAuth(credentials): YouTubeAuth,
) -> Result<Json<DataCollectionResponse<Video>>, RestError> {
    let result = build_feed(state.youtube.as_ref(), &credentials, &state.feed).await;

    let code = match &result {
        Err(FeedError::Subscriptions(_)) => ERR_UNSPECIFIED,
        _ => ERR_FETCHING,
    };
    let videos = result.log_500("Failed to build subscription feed", code)?;

    Ok(Json(DataCollectionResponse::new(videos)))
}
