//! Mapping from upstream payloads to the service's models.
//!
//! All mappers are total over missing nested fields. A record without the id
//! that identifies it cannot become an entity and maps to `None`.

use crate::models::{Channel, ThumbnailSet, Video};
use crate::services::youtube::{
    ChannelItem, PlaylistItem, SubscriptionItem, ThumbnailDetails, ThumbnailImage,
};

fn image_url(image: &Option<ThumbnailImage>) -> Option<String> {
    image.as_ref().and_then(|i| i.url.clone())
}

impl From<&ThumbnailDetails> for ThumbnailSet {
    fn from(t: &ThumbnailDetails) -> Self {
        Self {
            default: image_url(&t.default),
            medium: image_url(&t.medium),
            high: image_url(&t.high),
            maxres: image_url(&t.maxres),
            standard: image_url(&t.standard),
        }
    }
}

fn thumbnail_set(details: Option<&ThumbnailDetails>) -> Option<ThumbnailSet> {
    details.map(ThumbnailSet::from)
}

impl Channel {
    /// Channel stub from a `subscriptions.list` item. Never has an uploads playlist.
    pub fn from_subscription(item: &SubscriptionItem) -> Option<Self> {
        let snippet = item.snippet.as_ref()?;
        let id = snippet.resource_id.as_ref()?.channel_id.clone()?;

        Some(Self {
            id,
            name: snippet.title.clone().unwrap_or_default(),
            icon: thumbnail_set(snippet.thumbnails.as_ref()),
            upload_playlist_id: None,
        })
    }

    /// Fully resolved channel from a `channels.list` item
    pub fn from_channel_item(item: &ChannelItem) -> Option<Self> {
        let id = item.id.clone()?;
        let snippet = item.snippet.as_ref();

        Some(Self {
            id,
            name: snippet.and_then(|s| s.title.clone()).unwrap_or_default(),
            icon: thumbnail_set(snippet.and_then(|s| s.thumbnails.as_ref())),
            upload_playlist_id: item
                .content_details
                .as_ref()
                .and_then(|d| d.related_playlists.as_ref())
                .and_then(|p| p.uploads.clone()),
        })
    }
}

impl Video {
    /// Video from a `playlistItems.list` item. `uploaded_by` is left empty;
    /// the caller knows which channel the playlist belongs to.
    pub fn from_playlist_item(item: &PlaylistItem) -> Option<Self> {
        let snippet = item.snippet.as_ref()?;
        let id = snippet.resource_id.as_ref()?.video_id.clone()?;

        Some(Self {
            id,
            title: snippet.title.clone().unwrap_or_default(),
            description: snippet.description.clone(),
            uploaded_at: snippet.published_at.clone().unwrap_or_default(),
            uploaded_by: None,
            thumbnails: thumbnail_set(snippet.thumbnails.as_ref()),
        })
    }
}
