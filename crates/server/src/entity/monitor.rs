//! A user-configured HTTP(S) endpoint under periodic observation.
//!
//! Configuration columns are owned by the registration layer; the scheduler
//! mutates only `last_status` and `last_checked_at`.

use sea_orm::entity::prelude::*;
use serde::Serialize;
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "monitors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub url: String,
    /// Minimum polling period in seconds; clamped to the configured floor at
    /// scheduling time.
    pub interval_seconds: i32,
    pub timeout_seconds: i32,
    /// Exact status code to accept; `None` accepts any 2xx.
    pub expected_status: Option<i32>,
    pub is_active: bool,
    pub check_ssl: bool,
    pub ssl_expiry_threshold_days: i32,
    pub keyword_include: Option<String>,
    pub keyword_exclude: Option<String>,
    /// Latency ceiling in seconds; exceeding it only produces a warning.
    pub max_response_time: Option<f64>,
    /// Retry budget per check cycle, at least 1.
    pub consecutive_checks: i32,
    /// `None` until the first check completes.
    pub last_status: Option<bool>,
    pub last_checked_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::check_log::Entity")]
    CheckLog,
    #[sea_orm(has_many = "super::maintenance_window::Entity")]
    MaintenanceWindow,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::check_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CheckLog.def()
    }
}

impl Related<super::maintenance_window::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MaintenanceWindow.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
