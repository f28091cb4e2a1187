//! Poll entity.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::joined::Joined;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "polls")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub question: String,

    /// Ordered options, a JSON array of `{ "id", "label" }`
    #[sea_orm(column_type = "JsonBinary")]
    pub options: JsonValue,

    /// Admin who published the poll (null for community polls)
    #[sea_orm(nullable)]
    pub admin_id: Option<String>,

    /// Author of a community poll
    #[sea_orm(nullable)]
    pub created_by: Option<String>,

    /// When voting closes (null for open-ended polls)
    #[sea_orm(nullable)]
    pub ends_at: Option<DateTimeWithTimeZone>,

    /// Candidate for the podium spotlight slot
    pub is_featured_podium: bool,

    pub created_at: DateTimeWithTimeZone,
}

/// A single poll option.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOption {
    pub id: String,
    pub label: String,
}

impl Model {
    /// Decode the option list.
    pub fn option_list(&self) -> Result<Vec<PollOption>, serde_json::Error> {
        Joined::<PollOption>::decode(&self.options)
    }

    /// A poll is active while it has no end or the end is still ahead.
    #[must_use]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.ends_at.is_none_or(|ends_at| ends_at > now)
    }

    /// Whether this poll was written by an admin rather than the community.
    #[must_use]
    pub const fn is_admin_poll(&self) -> bool {
        self.admin_id.is_some()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::poll_response::Entity")]
    Responses,
}

impl Related<super::poll_response::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Responses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
