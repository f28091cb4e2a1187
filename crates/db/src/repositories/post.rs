//! Post and post vote repositories.

use std::sync::Arc;

use crate::entities::{Post, Vote, post, vote};
use pole_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

/// Post repository for database operations.
#[derive(Clone)]
pub struct PostRepository {
    db: Arc<DatabaseConnection>,
}

impl PostRepository {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Get the newest posts written by any of `author_ids`.
    pub async fn find_by_authors(
        &self,
        author_ids: &[String],
        limit: u64,
    ) -> AppResult<Vec<post::Model>> {
        if author_ids.is_empty() {
            return Ok(Vec::new());
        }

        Post::find()
            .filter(post::Column::UserId.is_in(author_ids.to_vec()))
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

/// Post vote (like) repository for database operations.
#[derive(Clone)]
pub struct VoteRepository {
    db: Arc<DatabaseConnection>,
}

impl VoteRepository {
    /// Create a new vote repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Get the IDs of the given posts that `user_id` has liked.
    pub async fn find_liked_post_ids(
        &self,
        user_id: &str,
        post_ids: &[String],
    ) -> AppResult<Vec<String>> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let votes = Vote::find()
            .filter(vote::Column::UserId.eq(user_id))
            .filter(vote::Column::PostId.is_in(post_ids.to_vec()))
            .order_by_asc(vote::Column::PostId)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(votes.into_iter().map(|v| v.post_id).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_post(id: &str, user_id: &str) -> post::Model {
        post::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            content: "Lights out and away we go".to_string(),
            image_url: None,
            parent_page_type: None,
            parent_page_id: None,
            like_count: 0,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_authors() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_post("p1", "u1"), create_test_post("p2", "u2")]])
                .into_connection(),
        );

        let repo = PostRepository::new(db);
        let posts = repo
            .find_by_authors(&["u1".to_string(), "u2".to_string()], 10)
            .await
            .unwrap();

        assert_eq!(posts.len(), 2);
    }

    #[tokio::test]
    async fn test_find_by_authors_without_authors() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let repo = PostRepository::new(db);
        assert!(repo.find_by_authors(&[], 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_liked_post_ids() {
        let liked = vote::Model {
            id: "v1".to_string(),
            post_id: "p2".to_string(),
            user_id: "me".to_string(),
            created_at: Utc::now().into(),
        };
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[liked]])
                .into_connection(),
        );

        let repo = VoteRepository::new(db);
        let ids = repo
            .find_liked_post_ids("me", &["p1".to_string(), "p2".to_string()])
            .await
            .unwrap();

        assert_eq!(ids, vec!["p2".to_string()]);
    }
}
