//! API endpoints.

mod feed;
mod meta;
mod polls;
mod races;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/meta", meta::router())
        .nest("/feed", feed::router())
        .nest("/races", races::router())
        .nest("/polls", polls::router())
}
