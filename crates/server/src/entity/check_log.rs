//! Append-only record of one executed probe. Exactly one row is written per
//! monitor per executed check cycle; suppressed or not-due cycles write none.

use sea_orm::entity::prelude::*;
use serde::Serialize;
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "check_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub monitor_id: i32,
    /// `None` when the probe never received a response.
    pub status_code: Option<i32>,
    /// Seconds from request start to body complete; 0.0 if never connected.
    pub response_time: f64,
    pub is_up: bool,
    /// Primary failure reason, optionally with warning riders appended.
    pub error_message: Option<String>,
    pub checked_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::monitor::Entity",
        from = "Column::MonitorId",
        to = "super::monitor::Column::Id",
        on_delete = "Cascade"
    )]
    Monitor,
}

impl Related<super::monitor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Monitor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
