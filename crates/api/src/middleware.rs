//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use pole_core::{FeedService, PollService};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub feed_service: FeedService,
    pub poll_service: PollService,
}

/// User id of the current session, as vouched for by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser(pub String);

/// Read the session from `Authorization: Bearer <user id>`.
///
/// Requests without a usable header pass through anonymously; endpoints
/// that need a user reject them through [`crate::extractors::AuthUser`].
pub async fn auth_middleware(mut req: Request<Body>, next: Next) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(user_id) = auth_str.strip_prefix("Bearer ")
    {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            tracing::debug!("Ignoring empty bearer session");
        } else {
            let session = SessionUser(user_id.to_string());
            req.extensions_mut().insert(session);
        }
    }

    next.run(req).await
}
