//! Track entity: a circuit and its race-weekend window.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tracks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    #[sea_orm(nullable)]
    pub location: Option<String>,

    #[sea_orm(nullable)]
    pub country: Option<String>,

    #[sea_orm(nullable)]
    pub image_url: Option<String>,

    /// First day of the race weekend
    #[sea_orm(nullable)]
    pub start_date: Option<Date>,

    /// Last day of the race weekend (inclusive)
    #[sea_orm(nullable)]
    pub end_date: Option<Date>,

    /// IANA timezone name of the circuit, e.g. `Europe/Monaco`
    #[sea_orm(nullable)]
    pub timezone: Option<String>,

    /// `Some(false)` switches live chat off for the weekend
    #[sea_orm(nullable)]
    pub chat_enabled: Option<bool>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::track_event::Entity")]
    Events,
}

impl Related<super::track_event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Events.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
