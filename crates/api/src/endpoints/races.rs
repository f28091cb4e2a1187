//! Race endpoints.

use axum::{Router, extract::State, routing::get};
use chrono::Utc;
use pole_common::AppResult;
use pole_core::RaceCard;

use crate::{middleware::AppState, response::ApiResponse};

/// The race weekend closest to now, or `null` when no track is on record.
async fn current(State(state): State<AppState>) -> AppResult<ApiResponse<Option<RaceCard>>> {
    let race = state.feed_service.current_race(Utc::now()).await;
    Ok(ApiResponse::ok(race))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/current", get(current))
}
