//! Follow repository.

use std::sync::Arc;

use crate::entities::{Follow, follow};
use pole_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

/// Follow repository for database operations.
#[derive(Clone)]
pub struct FollowRepository {
    db: Arc<DatabaseConnection>,
}

impl FollowRepository {
    /// Create a new follow repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Get the IDs of every user `user_id` follows.
    pub async fn find_following_ids(&self, user_id: &str) -> AppResult<Vec<String>> {
        let rows = Follow::find()
            .filter(follow::Column::FollowerId.eq(user_id))
            .order_by_asc(follow::Column::FollowingId)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(|f| f.following_id).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_follow(id: &str, follower_id: &str, following_id: &str) -> follow::Model {
        follow::Model {
            id: id.to_string(),
            follower_id: follower_id.to_string(),
            following_id: following_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_following_ids() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    create_test_follow("f1", "me", "u2"),
                    create_test_follow("f2", "me", "u3"),
                ]])
                .into_connection(),
        );

        let repo = FollowRepository::new(db);
        let ids = repo.find_following_ids("me").await.unwrap();

        assert_eq!(ids, vec!["u2".to_string(), "u3".to_string()]);
    }
}
