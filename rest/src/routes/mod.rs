pub mod auth;
pub mod channels;
pub mod response;
pub mod subscriptions;
pub mod system;


use axum::Router;
use std::sync::Arc;

use crate::AppState;
use crate::config::RateLimitConfig;

/// Build all routes for the API
pub fn build_routes(rate_limit: Option<RateLimitConfig>) -> Router<Arc<AppState>> {
    Router::new()
        .merge(system::routes())
        .merge(subscriptions::routes(rate_limit))
        .merge(channels::routes())
}
