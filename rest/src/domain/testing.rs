//! In-memory `CatalogApi` for exercising the domain pipeline without HTTP

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::models::Credentials;
use crate::services::youtube::{
    CatalogApi, ChannelContentDetails, ChannelItem, ChannelListResponse, ChannelSnippet,
    PlaylistItem, PlaylistItemListResponse, PlaylistItemSnippet, RelatedPlaylists, ResourceId,
    SubscriptionItem, SubscriptionListResponse, SubscriptionSnippet, YouTubeError,
};

#[derive(Default)]
pub struct FakeCatalog {
    subscription_pages: Vec<Vec<String>>,
    failing_subscription_page: Option<usize>,
    channels: HashMap<String, ChannelItem>,
    /// `None` models a response with no `items` array
    playlists: HashMap<String, Option<Vec<PlaylistItem>>>,
    failing_channels: HashSet<String>,
    latency: Duration,

    subscription_calls: AtomicUsize,
    channel_calls: AtomicUsize,
    playlist_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

fn token_for_page(index: usize) -> String {
    format!("page-{}", index)
}

fn upstream_failure() -> YouTubeError {
    YouTubeError::Api {
        status: 500,
        message: "Backend Error".to_string(),
        reason: Some("backendError".to_string()),
    }
}

pub fn uploads_playlist_for(channel_id: &str) -> String {
    format!("UU-{}", channel_id)
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// One subscription page per entry, with generated ids `UCsub-{page}-{n}`
    pub fn with_subscription_pages(mut self, sizes: &[usize]) -> Self {
        for &size in sizes {
            let page = self.subscription_pages.len();
            let ids = (0..size).map(|n| format!("UCsub-{}-{}", page, n)).collect();
            self.subscription_pages.push(ids);
        }
        self
    }

    pub fn with_subscription_page(mut self, channel_ids: &[&str]) -> Self {
        self.subscription_pages
            .push(channel_ids.iter().map(|id| id.to_string()).collect());
        self
    }

    pub fn fail_subscription_page(mut self, index: usize) -> Self {
        self.failing_subscription_page = Some(index);
        self
    }

    /// Register a channel with an uploads playlist holding `(video_id, published_at)` entries
    pub fn with_channel_uploads<V, T>(mut self, channel_id: &str, videos: &[(V, T)]) -> Self
    where
        V: AsRef<str>,
        T: AsRef<str>,
    {
        let playlist_id = uploads_playlist_for(channel_id);
        self.channels.insert(
            channel_id.to_string(),
            channel_item(channel_id, Some(playlist_id.clone())),
        );

        let items = videos
            .iter()
            .map(|(video_id, published_at)| playlist_item(video_id.as_ref(), published_at.as_ref()))
            .collect();
        self.playlists.insert(playlist_id, Some(items));
        self
    }

    /// A channel whose uploads playlist exists but is empty
    pub fn with_channel(self, channel_id: &str) -> Self {
        self.with_channel_uploads::<&str, &str>(channel_id, &[])
    }

    pub fn with_channel_without_uploads(mut self, channel_id: &str) -> Self {
        self.channels
            .insert(channel_id.to_string(), channel_item(channel_id, None));
        self
    }

    pub fn with_playlist_without_items(mut self, playlist_id: &str) -> Self {
        self.playlists.insert(playlist_id.to_string(), None);
        self
    }

    pub fn fail_channel(mut self, channel_id: &str) -> Self {
        self.failing_channels.insert(channel_id.to_string());
        self
    }

    /// Delay applied to every channel and playlist call
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn subscription_calls(&self) -> usize {
        self.subscription_calls.load(Ordering::SeqCst)
    }

    pub fn channel_calls(&self) -> usize {
        self.channel_calls.load(Ordering::SeqCst)
    }

    pub fn playlist_calls(&self) -> usize {
        self.playlist_calls.load(Ordering::SeqCst)
    }

    /// Highest number of channel/playlist calls observed running at once
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn simulate_call(&self) -> InFlight<'_> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let guard = InFlight(&self.in_flight);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        guard
    }
}

/// Decrements the gauge when the call finishes or is dropped mid-flight
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

fn channel_item(channel_id: &str, uploads: Option<String>) -> ChannelItem {
    ChannelItem {
        id: Some(channel_id.to_string()),
        snippet: Some(ChannelSnippet {
            title: Some(format!("Channel {}", channel_id)),
            thumbnails: None,
        }),
        content_details: Some(ChannelContentDetails {
            related_playlists: Some(RelatedPlaylists { uploads }),
        }),
    }
}

fn playlist_item(video_id: &str, published_at: &str) -> PlaylistItem {
    PlaylistItem {
        snippet: Some(PlaylistItemSnippet {
            published_at: Some(published_at.to_string()),
            title: Some(format!("Video {}", video_id)),
            description: None,
            resource_id: Some(ResourceId {
                video_id: Some(video_id.to_string()),
                ..Default::default()
            }),
            thumbnails: None,
        }),
    }
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn list_subscriptions(
        &self,
        _credentials: &Credentials,
        page_token: Option<&str>,
    ) -> Result<SubscriptionListResponse, YouTubeError> {
        self.subscription_calls.fetch_add(1, Ordering::SeqCst);

        let index = match page_token {
            None => 0,
            Some(token) => token
                .strip_prefix("page-")
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or_else(|| YouTubeError::Decode(format!("unknown page token {}", token)))?,
        };

        if self.failing_subscription_page == Some(index) {
            return Err(upstream_failure());
        }

        let ids = self.subscription_pages.get(index).cloned().unwrap_or_default();
        let items = ids
            .into_iter()
            .map(|id| SubscriptionItem {
                snippet: Some(SubscriptionSnippet {
                    title: Some(format!("Channel {}", id)),
                    resource_id: Some(ResourceId {
                        channel_id: Some(id),
                        ..Default::default()
                    }),
                    thumbnails: None,
                }),
            })
            .collect();

        let next_page_token =
            (index + 1 < self.subscription_pages.len()).then(|| token_for_page(index + 1));

        Ok(SubscriptionListResponse {
            items: Some(items),
            next_page_token,
        })
    }

    async fn list_channels(&self, channel_id: &str) -> Result<ChannelListResponse, YouTubeError> {
        self.channel_calls.fetch_add(1, Ordering::SeqCst);
        let _call = self.simulate_call().await;

        if self.failing_channels.contains(channel_id) {
            return Err(upstream_failure());
        }

        Ok(ChannelListResponse {
            items: Some(self.channels.get(channel_id).cloned().into_iter().collect()),
        })
    }

    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        _page_token: Option<&str>,
    ) -> Result<PlaylistItemListResponse, YouTubeError> {
        self.playlist_calls.fetch_add(1, Ordering::SeqCst);
        let _call = self.simulate_call().await;

        let items = match self.playlists.get(playlist_id) {
            Some(items) => items.clone(),
            None => Some(Vec::new()),
        };

        Ok(PlaylistItemListResponse {
            items,
            next_page_token: None,
        })
    }
}
