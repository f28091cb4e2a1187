//! Weekly highlight entity: one row per week.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "weekly_highlights")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Monday of the highlighted week
    #[sea_orm(unique)]
    pub week_start_date: Date,

    #[sea_orm(nullable)]
    pub highlighted_fan_id: Option<String>,

    #[sea_orm(nullable, column_type = "Text")]
    pub fan_blurb: Option<String>,

    #[sea_orm(nullable)]
    pub sponsor_id: Option<String>,

    #[sea_orm(nullable)]
    pub highlighted_grid_id: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sponsor::Entity",
        from = "Column::SponsorId",
        to = "super::sponsor::Column::Id",
        on_delete = "SetNull"
    )]
    Sponsor,

    #[sea_orm(
        belongs_to = "super::grid::Entity",
        from = "Column::HighlightedGridId",
        to = "super::grid::Column::Id",
        on_delete = "SetNull"
    )]
    Grid,
}

impl ActiveModelBehavior for ActiveModel {}
