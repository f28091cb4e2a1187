//! Grid entity: a user's ranked list of drivers, teams or tracks.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::joined::Joined;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "grids")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub user_id: String,

    /// driver, team or track. Stored as free text, parsed by readers.
    #[sea_orm(column_name = "type")]
    pub grid_type: String,

    /// Ordered JSON array of `{ "id", "name"?, "comment"? }`
    #[sea_orm(column_type = "JsonBinary")]
    pub ranked_items: JsonValue,

    #[sea_orm(nullable, column_type = "Text")]
    pub blurb: Option<String>,

    pub like_count: i32,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(indexed)]
    pub updated_at: DateTimeWithTimeZone,
}

/// One ranked entry of a grid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedItem {
    /// Id of the referenced driver, team or track
    pub id: String,
    /// Name as captured when the grid was saved
    #[serde(default)]
    pub name: Option<String>,
    /// Per-slot commentary
    #[serde(default)]
    pub comment: Option<String>,
}

impl Model {
    /// Decode the ranked items in rank order.
    pub fn ranked_item_list(&self) -> Result<Vec<RankedItem>, serde_json::Error> {
        Joined::<RankedItem>::decode(&self.ranked_items)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profile::Entity",
        from = "Column::UserId",
        to = "super::profile::Column::Id",
        on_delete = "Cascade"
    )]
    Author,

    #[sea_orm(has_many = "super::grid_like::Entity")]
    Likes,

    #[sea_orm(has_many = "super::grid_slot_comment::Entity")]
    SlotComments,
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::grid_like::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Likes.def()
    }
}

impl Related<super::grid_slot_comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SlotComments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
