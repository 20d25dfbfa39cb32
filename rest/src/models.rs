//! Shared data models used across modules
//!
//! Everything here is request-scoped: built from upstream payloads at the start
//! of a request and dropped once the response is serialized.

use serde::Serialize;

/// Image URLs for a channel icon or video thumbnail, one per upstream size.
///
/// Every key is always serialized; a size upstream did not provide is `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ThumbnailSet {
    pub default: Option<String>,
    pub medium: Option<String>,
    pub high: Option<String>,
    pub maxres: Option<String>,
    pub standard: Option<String>,
}

/// A YouTube channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    #[serde(rename = "channelIcon")]
    pub icon: Option<ThumbnailSet>,
    /// Only known once the channel has been resolved through `channels.list`
    #[serde(rename = "uploadPlaylistID", skip_serializing_if = "Option::is_none")]
    pub upload_playlist_id: Option<String>,
}

/// A video from a channel's uploads playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    /// ISO-8601 timestamp exactly as upstream returned it
    pub uploaded_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_by: Option<Channel>,
    pub thumbnails: Option<ThumbnailSet>,
}

/// One page of an upstream listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// `None` once the listing is exhausted. Opaque to callers.
    pub next_page_token: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_page_token: Option<String>) -> Self {
        Self {
            items,
            // An empty token is treated the same as no token
            next_page_token: next_page_token.filter(|t| !t.is_empty()),
        }
    }
}

/// The end user's OAuth access token, taken from the request query string.
///
/// Never validated locally; the upstream call decides whether it works.
#[derive(Clone)]
pub struct Credentials {
    pub access_token: String,
}

impl Credentials {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"<redacted>")
            .finish()
    }
}
