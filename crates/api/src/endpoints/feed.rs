//! Feed endpoints.

use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use chrono::Utc;
use pole_common::AppResult;
use pole_core::{FeedView, SpotlightItem, SpotlightView};
use serde::Deserialize;
use validator::Validate;

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Feed query parameters.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct FeedQuery {
    #[serde(default)]
    pub view: SpotlightView,
    /// Overrides the configured number of posts.
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u64>,
}

/// Spotlight query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct SpotlightQuery {
    #[serde(default)]
    pub view: SpotlightView,
}

/// Compose the signed-in user's feed.
async fn feed(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> AppResult<ApiResponse<FeedView>> {
    query.validate()?;

    let service = match query.limit {
        Some(limit) => state.feed_service.with_post_limit(limit),
        None => state.feed_service,
    };
    let feed = service.compose(&user_id, Utc::now(), query.view).await;

    Ok(ApiResponse::ok(feed))
}

/// Compose the spotlight carousel.
async fn spotlight(
    MaybeAuthUser(user_id): MaybeAuthUser,
    State(state): State<AppState>,
    Query(query): Query<SpotlightQuery>,
) -> AppResult<ApiResponse<Vec<SpotlightItem>>> {
    let items = state
        .feed_service
        .spotlight(user_id.as_deref(), Utc::now(), query.view)
        .await;

    Ok(ApiResponse::ok(items))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(feed))
        .route("/spotlight", get(spotlight))
}
