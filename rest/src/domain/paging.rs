//! Page-at-a-time access to upstream listings and the subscription enumerator

use async_trait::async_trait;

use crate::constants::PAGE_SIZE;
use crate::models::{Channel, Credentials, Page, Video};
use crate::services::youtube::{CatalogApi, YouTubeError};

/// Fetch one page of a listing. Implementations make at most one upstream
/// call per invocation and never retry.
#[async_trait]
pub trait PagedFetcher: Send + Sync {
    type Item: Send;

    async fn fetch_page(&self, page_token: Option<&str>) -> Result<Page<Self::Item>, YouTubeError>;
}

/// The authenticated user's subscriptions, as channel stubs
pub struct SubscriptionPages<'a, C: ?Sized> {
    api: &'a C,
    credentials: &'a Credentials,
}

impl<'a, C: CatalogApi + ?Sized> SubscriptionPages<'a, C> {
    pub fn new(api: &'a C, credentials: &'a Credentials) -> Self {
        Self { api, credentials }
    }
}

#[async_trait]
impl<C: CatalogApi + ?Sized> PagedFetcher for SubscriptionPages<'_, C> {
    type Item = Channel;

    async fn fetch_page(&self, page_token: Option<&str>) -> Result<Page<Channel>, YouTubeError> {
        let resp = self
            .api
            .list_subscriptions(self.credentials, page_token)
            .await?;
        let items = resp.items.ok_or(YouTubeError::EmptyPayload)?;

        let channels = items
            .iter()
            .filter_map(|item| {
                let channel = Channel::from_subscription(item);
                if channel.is_none() {
                    tracing::warn!("Skipping subscription without a channel id");
                }
                channel
            })
            .collect();

        Ok(Page::new(channels, resp.next_page_token))
    }
}

/// Videos of one playlist, with no owning channel attached
pub struct PlaylistItemPages<'a, C: ?Sized> {
    api: &'a C,
    playlist_id: &'a str,
}

impl<'a, C: CatalogApi + ?Sized> PlaylistItemPages<'a, C> {
    pub fn new(api: &'a C, playlist_id: &'a str) -> Self {
        Self { api, playlist_id }
    }
}

#[async_trait]
impl<C: CatalogApi + ?Sized> PagedFetcher for PlaylistItemPages<'_, C> {
    type Item = Video;

    async fn fetch_page(&self, page_token: Option<&str>) -> Result<Page<Video>, YouTubeError> {
        let resp = self
            .api
            .list_playlist_items(self.playlist_id, page_token)
            .await?;
        let items = resp.items.ok_or(YouTubeError::EmptyPayload)?;

        let videos = items
            .iter()
            .filter_map(|item| {
                let video = Video::from_playlist_item(item);
                if video.is_none() {
                    tracing::warn!(playlist_id = %self.playlist_id, "Skipping playlist item without a video id");
                }
                video
            })
            .collect();

        Ok(Page::new(videos, resp.next_page_token))
    }
}

/// Follow continuation tokens until the listing ends or `max_pages` pages
/// have been fetched. At least one page is always fetched. Pages are requested
/// strictly one after another.
///
/// Any failed page aborts the whole walk; nothing collected so far is returned.
pub async fn collect_pages<F: PagedFetcher + ?Sized>(
    fetcher: &F,
    max_pages: usize,
) -> Result<Vec<F::Item>, YouTubeError> {
    let mut items = Vec::new();
    let mut remaining = max_pages;
    let mut page_token: Option<String> = None;

    loop {
        remaining = remaining.saturating_sub(1);

        let page = fetcher.fetch_page(page_token.as_deref()).await?;
        items.extend(page.items);

        match page.next_page_token {
            Some(token) if remaining > 0 => page_token = Some(token),
            _ => break,
        }
    }

    Ok(items)
}

/// Every channel the user subscribes to, capped at roughly `max_items`.
///
/// The cap is applied by page count (`ceil(max_items / 50)`), not by slicing,
/// so the result can exceed `max_items` by up to one page minus one.
pub async fn enumerate_subscriptions<C: CatalogApi + ?Sized>(
    api: &C,
    credentials: &Credentials,
    max_items: usize,
) -> Result<Vec<Channel>, YouTubeError> {
    let fetcher = SubscriptionPages::new(api, credentials);
    let channels = collect_pages(&fetcher, max_items.div_ceil(PAGE_SIZE)).await?;

    tracing::debug!(count = channels.len(), max_items, "Enumerated subscriptions");
    Ok(channels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::testing::FakeCatalog;

    fn creds() -> Credentials {
        Credentials::new("ya29.user")
    }

    #[tokio::test]
    async fn single_short_page_returns_everything() {
        let catalog = FakeCatalog::new().with_subscription_pages(&[30]);

        let channels = enumerate_subscriptions(&catalog, &creds(), 50).await.unwrap();

        assert_eq!(channels.len(), 30);
        assert_eq!(catalog.subscription_calls(), 1);
    }

    #[tokio::test]
    async fn small_cap_still_fetches_one_full_page() {
        let catalog = FakeCatalog::new().with_subscription_pages(&[50, 50, 50]);

        let channels = enumerate_subscriptions(&catalog, &creds(), 10).await.unwrap();

        assert_eq!(catalog.subscription_calls(), 1);
        assert_eq!(channels.len(), 50);
    }

    #[tokio::test]
    async fn cap_is_enforced_by_page_count() {
        let catalog = FakeCatalog::new().with_subscription_pages(&[50, 50, 50, 50]);

        // ceil(120 / 50) = 3 pages
        let channels = enumerate_subscriptions(&catalog, &creds(), 120).await.unwrap();

        assert_eq!(catalog.subscription_calls(), 3);
        assert_eq!(channels.len(), 150);
    }

    #[tokio::test]
    async fn stops_when_upstream_runs_out() {
        let catalog = FakeCatalog::new().with_subscription_pages(&[50, 12]);

        let channels = enumerate_subscriptions(&catalog, &creds(), 500).await.unwrap();

        assert_eq!(catalog.subscription_calls(), 2);
        assert_eq!(channels.len(), 62);
        // Order follows upstream page order
        assert_eq!(channels[0].id, "UCsub-0-0");
        assert_eq!(channels[61].id, "UCsub-1-11");
    }

    #[tokio::test]
    async fn zero_cap_fetches_a_single_page() {
        let catalog = FakeCatalog::new().with_subscription_pages(&[50, 50]);

        let channels = enumerate_subscriptions(&catalog, &creds(), 0).await.unwrap();

        assert_eq!(catalog.subscription_calls(), 1);
        assert_eq!(channels.len(), 50);
    }

    #[tokio::test]
    async fn failed_page_discards_collected_channels() {
        let catalog = FakeCatalog::new()
            .with_subscription_pages(&[50, 50, 50])
            .fail_subscription_page(1);

        let err = enumerate_subscriptions(&catalog, &creds(), 500)
            .await
            .expect_err("second page fails");

        assert!(matches!(err, YouTubeError::Api { status: 500, .. }));
        assert_eq!(catalog.subscription_calls(), 2);
    }

    #[tokio::test]
    async fn missing_items_is_an_error() {
        let catalog = FakeCatalog::new().with_playlist_without_items("UUempty");

        let fetcher = PlaylistItemPages::new(&catalog, "UUempty");
        let err = fetcher.fetch_page(None).await.expect_err("no items array");

        assert!(matches!(err, YouTubeError::EmptyPayload));
    }
}
