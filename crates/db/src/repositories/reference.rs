//! Driver and team repositories (reference data looked up by id).

use std::sync::Arc;

use crate::entities::{Driver, Team, driver, team};
use pole_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

/// Driver repository for database operations.
#[derive(Clone)]
pub struct DriverRepository {
    db: Arc<DatabaseConnection>,
}

impl DriverRepository {
    /// Create a new driver repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find drivers by IDs.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<driver::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        Driver::find()
            .filter(driver::Column::Id.is_in(ids.to_vec()))
            .order_by_asc(driver::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

/// Team repository for database operations.
#[derive(Clone)]
pub struct TeamRepository {
    db: Arc<DatabaseConnection>,
}

impl TeamRepository {
    /// Create a new team repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find teams by IDs.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<team::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        Team::find()
            .filter(team::Column::Id.is_in(ids.to_vec()))
            .order_by_asc(team::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
