//! Poll repository.

use std::sync::Arc;

use crate::entities::{Poll, PollResponse, poll, poll_response};
use chrono::{DateTime, Utc};
use pole_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    sea_query::OnConflict,
};

/// Poll repository for database operations.
#[derive(Clone)]
pub struct PollRepository {
    db: Arc<DatabaseConnection>,
}

impl PollRepository {
    /// Create a new poll repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a poll by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<poll::Model>> {
        Poll::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a poll by ID, returning error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<poll::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::PollNotFound(id.to_string()))
    }

    /// Get polls still open at `now`, newest first.
    pub async fn find_active(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> AppResult<Vec<poll::Model>> {
        Poll::find()
            .filter(
                Condition::any()
                    .add(poll::Column::EndsAt.is_null())
                    .add(poll::Column::EndsAt.gt(now)),
            )
            .order_by_desc(poll::Column::CreatedAt)
            .order_by_asc(poll::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get the newest admin poll flagged for the podium spotlight.
    ///
    /// Community polls (no `admin_id`) never qualify, whatever their flag says.
    pub async fn find_featured_podium(&self) -> AppResult<Option<poll::Model>> {
        Poll::find()
            .filter(poll::Column::AdminId.is_not_null())
            .filter(poll::Column::IsFeaturedPodium.eq(true))
            .order_by_desc(poll::Column::CreatedAt)
            .order_by_asc(poll::Column::Id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

/// Poll response repository for database operations.
#[derive(Clone)]
pub struct PollResponseRepository {
    db: Arc<DatabaseConnection>,
}

impl PollResponseRepository {
    /// Create a new poll response repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Get every response to the given polls.
    pub async fn find_by_polls(&self, poll_ids: &[String]) -> AppResult<Vec<poll_response::Model>> {
        if poll_ids.is_empty() {
            return Ok(Vec::new());
        }

        PollResponse::find()
            .filter(poll_response::Column::PollId.is_in(poll_ids.to_vec()))
            .order_by_asc(poll_response::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Record a user's pick for a poll in one statement.
    ///
    /// The `(poll_id, user_id)` unique index makes this last-write-wins: a
    /// second vote rewrites the existing row's option and `updated_at`,
    /// keeping its id and `created_at`.
    pub async fn upsert(&self, model: poll_response::ActiveModel) -> AppResult<()> {
        PollResponse::insert(model)
            .on_conflict(
                OnConflict::columns([
                    poll_response::Column::PollId,
                    poll_response::Column::UserId,
                ])
                .update_columns([
                    poll_response::Column::SelectedOptionId,
                    poll_response::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map(|_| ())
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Set};
    use serde_json::json;

    fn create_test_poll(id: &str, admin_id: Option<&str>) -> poll::Model {
        poll::Model {
            id: id.to_string(),
            question: "Who takes pole?".to_string(),
            options: json!([{"id": "a", "label": "Max"}, {"id": "b", "label": "Lando"}]),
            admin_id: admin_id.map(str::to_string),
            created_by: None,
            ends_at: None,
            is_featured_podium: true,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<poll::Model>::new()])
                .into_connection(),
        );

        let repo = PollRepository::new(db);
        let result = repo.get_by_id("missing").await;

        match result {
            Err(AppError::PollNotFound(id)) => assert_eq!(id, "missing"),
            _ => panic!("Expected PollNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_find_featured_podium() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_poll("p1", Some("admin"))]])
                .into_connection(),
        );

        let repo = PollRepository::new(db);
        let found = repo.find_featured_podium().await.unwrap().unwrap();
        assert_eq!(found.id, "p1");
        assert!(found.is_admin_poll());
    }

    #[tokio::test]
    async fn test_find_by_polls_empty_skips_query() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let repo = PollResponseRepository::new(db);
        assert!(repo.find_by_polls(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upsert_is_single_conflict_aware_insert() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        let repo = PollResponseRepository::new(Arc::clone(&db));

        repo.upsert(poll_response::ActiveModel {
            id: Set("r1".to_string()),
            poll_id: Set("p1".to_string()),
            user_id: Set("me".to_string()),
            selected_option_id: Set("b".to_string()),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Some(Utc::now().into())),
        })
        .await
        .unwrap();

        drop(repo);
        let log = format!("{:?}", Arc::into_inner(db).unwrap().into_transaction_log());
        assert_eq!(log.matches("INSERT INTO").count(), 1);
        assert!(log.contains("ON CONFLICT"));
        assert!(log.contains("DO UPDATE SET"));
        assert!(!log.contains("SELECT"));
    }

    #[tokio::test]
    async fn test_upsert_maps_database_errors() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let repo = PollResponseRepository::new(db);

        let result = repo
            .upsert(poll_response::ActiveModel {
                id: Set("r1".to_string()),
                poll_id: Set("p1".to_string()),
                user_id: Set("me".to_string()),
                selected_option_id: Set("a".to_string()),
                created_at: Set(Utc::now().into()),
                updated_at: Set(Some(Utc::now().into())),
            })
            .await;

        assert!(matches!(result, Err(AppError::Database(_))));
    }
}
