//! Simple aggregate counts over a monitor's check history.

use crate::entity::{check_log, monitor};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use time::{Duration, OffsetDateTime};

#[derive(Debug, Clone, PartialEq)]
pub struct MonitorStats {
    pub name: String,
    pub url: String,
    pub current_status: Option<bool>,
    pub failures_last_24h: u64,
    pub failures_last_7d: u64,
    pub last_incident_at: Option<OffsetDateTime>,
}

pub async fn monitor_stats(
    db: &DatabaseConnection,
    monitor_id: i32,
) -> Result<Option<MonitorStats>, DbErr> {
    let Some(monitor) = monitor::Entity::find_by_id(monitor_id).one(db).await? else {
        return Ok(None);
    };

    let now = OffsetDateTime::now_utc();
    let failures_last_24h = failures_since(db, monitor_id, now - Duration::days(1)).await?;
    let failures_last_7d = failures_since(db, monitor_id, now - Duration::days(7)).await?;

    let last_incident_at = check_log::Entity::find()
        .filter(check_log::Column::MonitorId.eq(monitor_id))
        .filter(check_log::Column::IsUp.eq(false))
        .order_by_desc(check_log::Column::CheckedAt)
        .one(db)
        .await?
        .map(|log| log.checked_at);

    Ok(Some(MonitorStats {
        name: monitor.name,
        url: monitor.url,
        current_status: monitor.last_status,
        failures_last_24h,
        failures_last_7d,
        last_incident_at,
    }))
}

async fn failures_since(
    db: &DatabaseConnection,
    monitor_id: i32,
    since: OffsetDateTime,
) -> Result<u64, DbErr> {
    check_log::Entity::find()
        .filter(check_log::Column::MonitorId.eq(monitor_id))
        .filter(check_log::Column::IsUp.eq(false))
        .filter(check_log::Column::CheckedAt.gte(since))
        .count(db)
        .await
}
