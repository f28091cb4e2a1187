//! Meta endpoints.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::middleware::AppState;

/// Service metadata response.
#[derive(Serialize)]
pub struct MetaResponse {
    pub name: String,
    pub version: String,
    pub description: String,
}

/// Get service metadata.
async fn meta() -> Json<MetaResponse> {
    Json(MetaResponse {
        name: "whos-on-pole".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        description: "Feed composition service for Who's On Pole?".to_string(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(meta))
}
