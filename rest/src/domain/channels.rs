//! Channel lookup by id

use crate::models::{Channel, Video};
use crate::services::youtube::{CatalogApi, YouTubeError};

use super::paging::{PagedFetcher, PlaylistItemPages};

/// Fetch a channel's metadata, including its uploads playlist, with a single
/// `channels.list` call.
///
/// Zero matches is `YouTubeError::NotFound`, distinct from transport and
/// upstream failures.
pub async fn resolve_channel<C: CatalogApi + ?Sized>(
    api: &C,
    channel_id: &str,
) -> Result<Channel, YouTubeError> {
    let resp = api.list_channels(channel_id).await?;

    resp.items
        .unwrap_or_default()
        .iter()
        .find_map(Channel::from_channel_item)
        .ok_or_else(|| YouTubeError::NotFound {
            resource: "channel",
            id: channel_id.to_string(),
        })
}

/// First page of a channel's uploads. Videos carry no `uploaded_by`.
///
/// A channel without an uploads playlist has no videos to list and is
/// reported as not found.
pub async fn latest_uploads<C: CatalogApi + ?Sized>(
    api: &C,
    channel_id: &str,
) -> Result<Vec<Video>, YouTubeError> {
    let channel = resolve_channel(api, channel_id).await?;
    let playlist_id = channel
        .upload_playlist_id
        .ok_or_else(|| YouTubeError::NotFound {
            resource: "uploads playlist",
            id: channel_id.to_string(),
        })?;

    let page = PlaylistItemPages::new(api, &playlist_id).fetch_page(None).await?;
    Ok(page.items)
}
