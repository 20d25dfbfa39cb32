//! Subscription feed: newest uploads across every channel a user follows

use futures::{StreamExt, TryStreamExt, stream};
use thiserror::Error;

use crate::constants::{
    DEFAULT_FEED_CONCURRENCY, DEFAULT_FEED_RESULT_LIMIT, DEFAULT_MAX_SUBSCRIPTIONS,
};
use crate::models::{Credentials, Video};
use crate::services::youtube::{CatalogApi, YouTubeError};

use super::channels::resolve_channel;
use super::paging::{PagedFetcher, PlaylistItemPages, enumerate_subscriptions};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedOptions {
    /// Cap handed to the subscription enumerator
    pub max_subscriptions: usize,
    /// Number of videos kept after sorting
    pub result_limit: usize,
    /// Channel pipelines allowed in flight at once
    pub concurrency: usize,
}

impl Default for FeedOptions {
    fn default() -> Self {
        Self {
            max_subscriptions: DEFAULT_MAX_SUBSCRIPTIONS,
            result_limit: DEFAULT_FEED_RESULT_LIMIT,
            concurrency: DEFAULT_FEED_CONCURRENCY,
        }
    }
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to enumerate subscriptions: {0}")]
    Subscriptions(#[source] YouTubeError),

    #[error("failed to fetch uploads for channel {channel_id}: {source}")]
    Channel {
        channel_id: String,
        #[source]
        source: YouTubeError,
    },

    #[error("channel {0} has no uploads playlist")]
    MissingUploads(String),
}

impl FeedError {
    /// Client-safe description for the error envelope
    pub fn detail(&self) -> serde_json::Value {
        match self {
            FeedError::Subscriptions(source) => source.detail(),
            FeedError::Channel { channel_id, source } => {
                let mut detail = source.detail();
                detail["channelId"] = channel_id.clone().into();
                detail
            }
            FeedError::MissingUploads(channel_id) => serde_json::json!({
                "kind": "missing_uploads",
                "message": self.to_string(),
                "channelId": channel_id,
            }),
        }
    }
}

/// Build the user's feed.
///
/// Subscriptions are enumerated first (sequentially, capped by
/// `options.max_subscriptions`). Then each channel is resolved and the first
/// page of its uploads fetched, with at most `options.concurrency` channels in
/// flight. Videos are tagged with their channel, sorted newest first by
/// `uploaded_at` and truncated to `options.result_limit`.
///
/// All or nothing: the first channel failure is returned and the pipelines
/// still in flight are dropped.
pub async fn build_feed<C: CatalogApi + ?Sized>(
    api: &C,
    credentials: &Credentials,
    options: &FeedOptions,
) -> Result<Vec<Video>, FeedError> {
    let channels = enumerate_subscriptions(api, credentials, options.max_subscriptions)
        .await
        .map_err(FeedError::Subscriptions)?;

    tracing::debug!(
        channels = channels.len(),
        concurrency = options.concurrency,
        "Fetching uploads for feed"
    );

    let per_channel: Vec<Vec<Video>> = stream::iter(channels.into_iter().map(|c| c.id))
        .map(|channel_id| async move { channel_uploads(api, &channel_id).await })
        .buffer_unordered(options.concurrency.max(1))
        .try_collect()
        .await?;

    let mut videos: Vec<Video> = per_channel.into_iter().flatten().collect();
    // ISO-8601 timestamps from one source sort correctly as strings
    videos.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
    videos.truncate(options.result_limit);

    Ok(videos)
}

/// Resolve one channel and tag the first page of its uploads with it
async fn channel_uploads<C: CatalogApi + ?Sized>(
    api: &C,
    channel_id: &str,
) -> Result<Vec<Video>, FeedError> {
    let wrap = |source: YouTubeError| FeedError::Channel {
        channel_id: channel_id.to_string(),
        source,
    };

    let channel = resolve_channel(api, channel_id).await.map_err(wrap)?;
    let playlist_id = channel
        .upload_playlist_id
        .clone()
        .ok_or_else(|| FeedError::MissingUploads(channel_id.to_string()))?;

    let page = PlaylistItemPages::new(api, &playlist_id)
        .fetch_page(None)
        .await
        .map_err(wrap)?;

    Ok(page
        .items
        .into_iter()
        .map(|mut video| {
            video.uploaded_by = Some(channel.clone());
            video
        })
        .collect())
}
