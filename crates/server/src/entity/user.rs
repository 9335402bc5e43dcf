//! Notification recipients. Owned by the registration layer, read here for
//! dispatch decisions; only the email quota columns are mutated by the core.

use sea_orm::entity::prelude::*;
use serde::Serialize;
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub telegram_id: i64,
    pub username: Option<String>,
    pub email: Option<String>,
    pub is_notification_enabled: bool,
    pub is_email_notification_enabled: bool,
    /// Daily cap on outbound status-change emails.
    pub email_limit: i32,
    /// Emails sent on the calendar day of `last_email_notification_date`.
    pub email_notification_count: i32,
    pub last_email_notification_date: Option<OffsetDateTime>,
    pub joined_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::monitor::Entity")]
    Monitor,
}

impl Related<super::monitor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Monitor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
