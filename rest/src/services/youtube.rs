//! YouTube Data API v3 client
//!
//! Only the three read operations the service needs are implemented. Payload
//! structs mirror the upstream JSON with every field optional; mapping into
//! the service's own models happens in `domain::mappers`.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

use crate::constants::PAGE_SIZE;
use crate::models::Credentials;

const SUBSCRIPTION_FIELDS: &str = "etag,eventId,items(snippet(resourceId(channelId,playlistId,videoId),thumbnails,title)),nextPageToken,pageInfo,prevPageToken";
const CHANNEL_FIELDS: &str =
    "items(contentDetails/relatedPlaylists/uploads,id,snippet(customUrl,thumbnails,title))";
const PLAYLIST_ITEM_FIELDS: &str = "items(snippet(description,publishedAt,resourceId/videoId,thumbnails,title)),nextPageToken,prevPageToken";

/// The upstream operations the feed pipeline depends on.
///
/// `YouTubeClient` is the production implementation; tests substitute an
/// in-memory catalog.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// `subscriptions.list` for the user owning `credentials`, alphabetical
    async fn list_subscriptions(
        &self,
        credentials: &Credentials,
        page_token: Option<&str>,
    ) -> Result<SubscriptionListResponse, YouTubeError>;

    /// `channels.list` for a single channel id, authorized with the API key
    async fn list_channels(&self, channel_id: &str) -> Result<ChannelListResponse, YouTubeError>;

    /// `playlistItems.list` for a playlist, authorized with the API key
    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<PlaylistItemListResponse, YouTubeError>;
}

/// Client for the YouTube Data API.
///
/// Holds only application-level state (API key, connection pool). User
/// credentials are passed per call and never stored here, so one instance is
/// shared by all requests.
#[derive(Clone)]
pub struct YouTubeClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl YouTubeClient {
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self, YouTubeError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn endpoint(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource)
    }

    /// Send a request and decode the JSON body, mapping non-2xx responses to
    /// `YouTubeError::Api`
    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, YouTubeError> {
        let resp = request.send().await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(parse_error_response(status, &text));
        }

        serde_json::from_str(&text).map_err(|e| YouTubeError::Decode(e.to_string()))
    }
}

#[async_trait]
impl CatalogApi for YouTubeClient {
    async fn list_subscriptions(
        &self,
        credentials: &Credentials,
        page_token: Option<&str>,
    ) -> Result<SubscriptionListResponse, YouTubeError> {
        let max_results = PAGE_SIZE.to_string();
        let mut query = vec![
            ("part", "snippet"),
            ("mine", "true"),
            ("maxResults", max_results.as_str()),
            ("order", "alphabetical"),
            ("fields", SUBSCRIPTION_FIELDS),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let request = self
            .http
            .get(self.endpoint("subscriptions"))
            .bearer_auth(&credentials.access_token)
            .query(&query);

        self.get_json(request).await
    }

    async fn list_channels(&self, channel_id: &str) -> Result<ChannelListResponse, YouTubeError> {
        let request = self.http.get(self.endpoint("channels")).query(&[
            ("key", self.api_key.as_str()),
            ("part", "snippet,contentDetails"),
            ("id", channel_id),
            ("fields", CHANNEL_FIELDS),
        ]);

        self.get_json(request).await
    }

    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<PlaylistItemListResponse, YouTubeError> {
        let max_results = PAGE_SIZE.to_string();
        let mut query = vec![
            ("key", self.api_key.as_str()),
            ("part", "snippet"),
            ("playlistId", playlist_id),
            ("maxResults", max_results.as_str()),
            ("fields", PLAYLIST_ITEM_FIELDS),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let request = self.http.get(self.endpoint("playlistItems")).query(&query);

        self.get_json(request).await
    }
}

/// Turn a non-2xx response into an error, preferring the structured
/// `{"error": {...}}` body YouTube sends
fn parse_error_response(status: StatusCode, body: &str) -> YouTubeError {
    if let Ok(parsed) = serde_json::from_str::<ErrorResponse>(body) {
        return YouTubeError::Api {
            status: status.as_u16(),
            message: parsed.error.message.unwrap_or_default(),
            reason: parsed
                .error
                .errors
                .into_iter()
                .find_map(|e| e.reason),
        };
    }

    YouTubeError::Api {
        status: status.as_u16(),
        message: status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string(),
        reason: None,
    }
}

#[derive(Debug, Error)]
pub enum YouTubeError {
    /// Transport failure (connect, timeout, body read). The request URL is
    /// stripped because it carries the API key.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("YouTube API error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        reason: Option<String>,
    },

    /// Body was not the JSON shape we asked for
    #[error("malformed YouTube response: {0}")]
    Decode(String),

    /// A listing came back without an `items` array
    #[error("YouTube response contained no items")]
    EmptyPayload,

    /// A lookup by id matched nothing
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },
}

impl From<reqwest::Error> for YouTubeError {
    fn from(e: reqwest::Error) -> Self {
        YouTubeError::Http(e.without_url())
    }
}

impl YouTubeError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, YouTubeError::NotFound { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            YouTubeError::Http(_) => "transport",
            YouTubeError::Api { .. } => "upstream",
            YouTubeError::Decode(_) => "decode",
            YouTubeError::EmptyPayload => "empty",
            YouTubeError::NotFound { .. } => "not_found",
        }
    }

    /// Client-safe description for the `detail` field of an error envelope.
    /// No URLs, headers or raw bodies.
    pub fn detail(&self) -> serde_json::Value {
        match self {
            YouTubeError::Api {
                status,
                message,
                reason,
            } => json!({
                "kind": self.kind(),
                "status": status,
                "message": message,
                "reason": reason,
            }),
            _ => json!({
                "kind": self.kind(),
                "message": self.to_string(),
            }),
        }
    }
}

// ============================================================================
// Upstream payloads
// ============================================================================

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    #[serde(default)]
    errors: Vec<ErrorItem>,
}

#[derive(Debug, Deserialize)]
struct ErrorItem {
    reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThumbnailImage {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThumbnailDetails {
    pub default: Option<ThumbnailImage>,
    pub medium: Option<ThumbnailImage>,
    pub high: Option<ThumbnailImage>,
    pub maxres: Option<ThumbnailImage>,
    pub standard: Option<ThumbnailImage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    pub channel_id: Option<String>,
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionListResponse {
    pub items: Option<Vec<SubscriptionItem>>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubscriptionItem {
    pub snippet: Option<SubscriptionSnippet>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionSnippet {
    pub title: Option<String>,
    pub resource_id: Option<ResourceId>,
    pub thumbnails: Option<ThumbnailDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelListResponse {
    pub items: Option<Vec<ChannelItem>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelItem {
    pub id: Option<String>,
    pub snippet: Option<ChannelSnippet>,
    pub content_details: Option<ChannelContentDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSnippet {
    pub title: Option<String>,
    pub thumbnails: Option<ThumbnailDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelContentDetails {
    pub related_playlists: Option<RelatedPlaylists>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelatedPlaylists {
    pub uploads: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemListResponse {
    pub items: Option<Vec<PlaylistItem>>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaylistItem {
    pub snippet: Option<PlaylistItemSnippet>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemSnippet {
    pub published_at: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub resource_id: Option<ResourceId>,
    pub thumbnails: Option<ThumbnailDetails>,
}
