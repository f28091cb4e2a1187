//! Chat message repository.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::entities::{ChatMessage, chat_message};
use chrono::{DateTime, Utc};
use pole_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

/// Chat message repository for database operations.
#[derive(Clone)]
pub struct ChatMessageRepository {
    db: Arc<DatabaseConnection>,
}

impl ChatMessageRepository {
    /// Create a new chat message repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Count distinct users who wrote in a track's chat since `since`.
    pub async fn count_participants_since(
        &self,
        track_id: &str,
        since: DateTime<Utc>,
    ) -> AppResult<usize> {
        let messages = ChatMessage::find()
            .filter(chat_message::Column::TrackId.eq(track_id))
            .filter(chat_message::Column::CreatedAt.gte(since))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let participants: BTreeSet<String> = messages.into_iter().map(|m| m.user_id).collect();
        Ok(participants.len())
    }
}
