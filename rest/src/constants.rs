//! Application constants

/// Items per page for `subscriptions.list` and `playlistItems.list` (upstream maximum)
pub const PAGE_SIZE: usize = 50;

/// Default cap on subscribed channels considered for a user
pub const DEFAULT_MAX_SUBSCRIPTIONS: usize = 250;

/// Default number of videos returned by the feed
pub const DEFAULT_FEED_RESULT_LIMIT: usize = 100;

/// Default number of channel pipelines in flight while building a feed
pub const DEFAULT_FEED_CONCURRENCY: usize = 5;

/// Default per-call timeout against the YouTube Data API
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_YOUTUBE_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Error codes rendered in the `error` field of the response envelope
pub mod error_codes {
    pub const AUTH_YOUTUBE_MISSING: &str = "AUTH_YOUTUBE_MISSING";
    pub const ERR_UNSPECIFIED: &str = "ERR_UNSPECIFIED";
    pub const ERR_FETCHING: &str = "ERR_FETCHING";
    pub const ERR_YT_CHANNEL_MISSING: &str = "ERR_YT_CHANNEL_MISSING";
    pub const ERR_RATE_LIMITED: &str = "ERR_RATE_LIMITED";
}
