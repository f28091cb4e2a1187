//! Poll endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use chrono::Utc;
use pole_common::AppResult;
use pole_core::PollTally;
use serde::Deserialize;
use validator::Validate;

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Vote request.
#[derive(Debug, Deserialize, Validate)]
pub struct VoteRequest {
    #[validate(length(min = 1, max = 64))]
    pub option_id: String,
}

/// Get a poll's results.
async fn results(
    MaybeAuthUser(user_id): MaybeAuthUser,
    State(state): State<AppState>,
    Path(poll_id): Path<String>,
) -> AppResult<ApiResponse<PollTally>> {
    let tally = state
        .poll_service
        .results(&poll_id, user_id.as_deref(), Utc::now())
        .await?;

    Ok(ApiResponse::ok(tally))
}

/// Vote on a poll.
async fn vote(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
    Path(poll_id): Path<String>,
    Json(req): Json<VoteRequest>,
) -> AppResult<ApiResponse<PollTally>> {
    req.validate()?;

    let tally = state
        .poll_service
        .vote(&user_id, &poll_id, &req.option_id, Utc::now())
        .await?;

    Ok(ApiResponse::ok(tally))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/results", get(results))
        .route("/{id}/vote", post(vote))
}
