//! Grid, grid like and grid slot comment repositories.

use std::sync::Arc;

use crate::entities::{Grid, GridLike, GridSlotComment, grid, grid_like, grid_slot_comment};
use pole_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

/// Grid repository for database operations.
#[derive(Clone)]
pub struct GridRepository {
    db: Arc<DatabaseConnection>,
}

impl GridRepository {
    /// Create a new grid repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a grid by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<grid::Model>> {
        Grid::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get the most recently updated grids of any of `author_ids`.
    pub async fn find_by_authors(
        &self,
        author_ids: &[String],
        limit: u64,
    ) -> AppResult<Vec<grid::Model>> {
        if author_ids.is_empty() {
            return Ok(Vec::new());
        }

        Grid::find()
            .filter(grid::Column::UserId.is_in(author_ids.to_vec()))
            .order_by_desc(grid::Column::UpdatedAt)
            .order_by_desc(grid::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

/// Grid like repository for database operations.
#[derive(Clone)]
pub struct GridLikeRepository {
    db: Arc<DatabaseConnection>,
}

impl GridLikeRepository {
    /// Create a new grid like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Get every like on the given grids.
    pub async fn find_by_grids(&self, grid_ids: &[String]) -> AppResult<Vec<grid_like::Model>> {
        if grid_ids.is_empty() {
            return Ok(Vec::new());
        }

        GridLike::find()
            .filter(grid_like::Column::GridId.is_in(grid_ids.to_vec()))
            .order_by_asc(grid_like::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

/// Grid slot comment repository for database operations.
#[derive(Clone)]
pub struct GridSlotCommentRepository {
    db: Arc<DatabaseConnection>,
}

impl GridSlotCommentRepository {
    /// Create a new grid slot comment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Get every slot comment on the given grids, oldest first.
    pub async fn find_by_grids(
        &self,
        grid_ids: &[String],
    ) -> AppResult<Vec<grid_slot_comment::Model>> {
        if grid_ids.is_empty() {
            return Ok(Vec::new());
        }

        GridSlotComment::find()
            .filter(grid_slot_comment::Column::GridId.is_in(grid_ids.to_vec()))
            .order_by_asc(grid_slot_comment::Column::CreatedAt)
            .order_by_asc(grid_slot_comment::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
