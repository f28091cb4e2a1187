//! Repositories for editorial content: hot takes, weekly highlights,
//! sponsors and news stories.

use std::sync::Arc;

use crate::entities::{
    HotTake, NewsStory, Sponsor, WeeklyHighlight, hot_take, news_story, sponsor, weekly_highlight,
};
use chrono::{DateTime, NaiveDate, Utc};
use pole_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

/// Hot take repository for database operations.
#[derive(Clone)]
pub struct HotTakeRepository {
    db: Arc<DatabaseConnection>,
}

impl HotTakeRepository {
    /// Create a new hot take repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the hot take running at `now`.
    ///
    /// Overlapping windows resolve to the one that started last.
    pub async fn find_active_at(&self, now: DateTime<Utc>) -> AppResult<Option<hot_take::Model>> {
        HotTake::find()
            .filter(hot_take::Column::StartsAt.lte(now))
            .filter(hot_take::Column::EndsAt.gt(now))
            .order_by_desc(hot_take::Column::StartsAt)
            .order_by_asc(hot_take::Column::Id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

/// Weekly highlight repository for database operations.
#[derive(Clone)]
pub struct WeeklyHighlightRepository {
    db: Arc<DatabaseConnection>,
}

impl WeeklyHighlightRepository {
    /// Create a new weekly highlight repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find the highlight row for the week starting on `week_start`.
    pub async fn find_by_week(
        &self,
        week_start: NaiveDate,
    ) -> AppResult<Option<weekly_highlight::Model>> {
        WeeklyHighlight::find()
            .filter(weekly_highlight::Column::WeekStartDate.eq(week_start))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

/// Sponsor repository for database operations.
#[derive(Clone)]
pub struct SponsorRepository {
    db: Arc<DatabaseConnection>,
}

impl SponsorRepository {
    /// Create a new sponsor repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Get all sponsors in carousel order.
    pub async fn find_all(&self) -> AppResult<Vec<sponsor::Model>> {
        Sponsor::find()
            .order_by_asc(sponsor::Column::DisplayOrder)
            .order_by_asc(sponsor::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

/// News story repository for database operations.
#[derive(Clone)]
pub struct NewsStoryRepository {
    db: Arc<DatabaseConnection>,
}

impl NewsStoryRepository {
    /// Create a new news story repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Get the newest stories.
    pub async fn find_recent(&self, limit: u64) -> AppResult<Vec<news_story::Model>> {
        NewsStory::find()
            .order_by_desc(news_story::Column::PublishedAt)
            .order_by_asc(news_story::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get the newest story flagged as featured.
    pub async fn find_featured(&self) -> AppResult<Option<news_story::Model>> {
        NewsStory::find()
            .filter(news_story::Column::Featured.eq(true))
            .order_by_desc(news_story::Column::PublishedAt)
            .order_by_asc(news_story::Column::Id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
