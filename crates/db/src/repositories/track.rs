//! Track and track event repositories.

use std::sync::Arc;

use crate::entities::{Track, TrackEvent, track, track_event};
use pole_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

/// Track repository for database operations.
#[derive(Clone)]
pub struct TrackRepository {
    db: Arc<DatabaseConnection>,
}

impl TrackRepository {
    /// Create a new track repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Get the whole calendar, earliest weekend first.
    pub async fn find_all(&self) -> AppResult<Vec<track::Model>> {
        Track::find()
            .order_by_asc(track::Column::StartDate)
            .order_by_asc(track::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a track by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<track::Model>> {
        Track::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

/// Track event repository for database operations.
#[derive(Clone)]
pub struct TrackEventRepository {
    db: Arc<DatabaseConnection>,
}

impl TrackEventRepository {
    /// Create a new track event repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Get the sessions of a weekend in running order.
    pub async fn find_by_track(&self, track_id: &str) -> AppResult<Vec<track_event::Model>> {
        TrackEvent::find()
            .filter(track_event::Column::TrackId.eq(track_id))
            .order_by_asc(track_event::Column::StartsAt)
            .order_by_asc(track_event::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
