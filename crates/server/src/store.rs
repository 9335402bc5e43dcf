//! Persistence boundary consumed by the scheduler and notifier.
//!
//! All writes produced by one monitoring cycle commit as a single
//! transaction; a failed commit rolls the whole cycle back and fresh data is
//! reconstructed on the next tick.

use crate::entity::{check_log, maintenance_window, monitor, user};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, TransactionTrait,
};
use std::collections::HashMap;
use time::OffsetDateTime;

/// One active monitor with everything a cycle needs pre-loaded: its owner
/// for notification dispatch and its maintenance windows for the gate.
#[derive(Debug, Clone)]
pub struct MonitorBundle {
    pub monitor: monitor::Model,
    pub owner: Option<user::Model>,
    pub windows: Vec<maintenance_window::Model>,
}

pub async fn load_active_monitors(db: &DatabaseConnection) -> Result<Vec<MonitorBundle>, DbErr> {
    let monitors = monitor::Entity::find()
        .filter(monitor::Column::IsActive.eq(true))
        .find_also_related(user::Entity)
        .all(db)
        .await?;

    let ids: Vec<i32> = monitors.iter().map(|(m, _)| m.id).collect();
    let mut windows_by_monitor: HashMap<i32, Vec<maintenance_window::Model>> = HashMap::new();
    if !ids.is_empty() {
        let windows = maintenance_window::Entity::find()
            .filter(maintenance_window::Column::MonitorId.is_in(ids))
            .all(db)
            .await?;
        for window in windows {
            windows_by_monitor
                .entry(window.monitor_id)
                .or_default()
                .push(window);
        }
    }

    Ok(monitors
        .into_iter()
        .map(|(monitor, owner)| MonitorBundle {
            windows: windows_by_monitor.remove(&monitor.id).unwrap_or_default(),
            monitor,
            owner,
        })
        .collect())
}

/// Persist one cycle's check logs and monitor status mutations atomically.
pub async fn save_cycle_results(
    db: &DatabaseConnection,
    logs: Vec<check_log::ActiveModel>,
    updates: Vec<monitor::ActiveModel>,
) -> Result<(), DbErr> {
    let txn = db.begin().await?;
    if !logs.is_empty() {
        check_log::Entity::insert_many(logs).exec(&txn).await?;
    }
    for update in updates {
        update.update(&txn).await?;
    }
    txn.commit().await
}

pub async fn get_monitor(
    db: &DatabaseConnection,
    monitor_id: i32,
) -> Result<Option<monitor::Model>, DbErr> {
    monitor::Entity::find_by_id(monitor_id).one(db).await
}

/// Quota bookkeeping after a successful email send: the count for the
/// current UTC day and the send timestamp.
pub async fn record_email_sent(
    db: &DatabaseConnection,
    owner: &user::Model,
    count_today: i32,
    sent_at: OffsetDateTime,
) -> Result<(), DbErr> {
    let mut update: user::ActiveModel = owner.clone().into();
    update.email_notification_count = ActiveValue::Set(count_today);
    update.last_email_notification_date = ActiveValue::Set(Some(sent_at));
    update.update(db).await?;
    Ok(())
}
