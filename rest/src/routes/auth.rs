//! YouTube credentials taken from the query string

use axum::{
    extract::{FromRequestParts, Query},
    http::{StatusCode, request::Parts},
};
use serde::Deserialize;

use crate::constants::error_codes::AUTH_YOUTUBE_MISSING;
use crate::models::Credentials;
use crate::services::error::RestError;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthQuery {
    access_token: Option<String>,
    refresh_token: Option<String>,
}

/// Extractor for the end user's OAuth tokens (`?accessToken=..&refreshToken=..`).
///
/// Both must be present and non-empty, otherwise the request is rejected with
/// 403 `AUTH_YOUTUBE_MISSING` before any upstream call is made. The tokens
/// themselves are not checked here, and only the access token is kept.
pub struct YouTubeAuth(pub Credentials);

impl<S: Send + Sync> FromRequestParts<S> for YouTubeAuth {
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let missing = || RestError::new(StatusCode::FORBIDDEN, AUTH_YOUTUBE_MISSING);

        let Query(query) = Query::<AuthQuery>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                tracing::debug!("Unreadable auth query: {}", e);
                missing()
            })?;

        let non_empty = |v: Option<String>| v.filter(|t| !t.is_empty());
        match (non_empty(query.access_token), non_empty(query.refresh_token)) {
            (Some(access), Some(_)) => Ok(YouTubeAuth(Credentials::new(access))),
            _ => Err(missing()),
        }
    }
}
