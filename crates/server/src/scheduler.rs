//! The scheduler loop: tick, select due monitors, fan out checks
//! concurrently, persist the cycle as one batch, then notify on transitions.

use crate::AppResources;
use crate::checker::{self, CheckOptions, Verdict};
use crate::entity::{check_log, monitor};
use crate::maintenance;
use crate::notify::{self, PushTransport};
use crate::store::{self, MonitorBundle};
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use sea_orm::{ActiveValue, DbErr};
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::watch;
use tokio::time::{Duration, MissedTickBehavior, interval};
use tracing::{debug, error, info};

/// True when the monitor's elapsed time since its last check reaches its
/// configured interval. Never-checked monitors are always due. Intervals
/// below `interval_floor` are clamped up to it.
pub fn is_due(monitor: &monitor::Model, now: OffsetDateTime, interval_floor: i32) -> bool {
    let Some(last) = monitor.last_checked_at else {
        return true;
    };
    let interval = i64::from(monitor.interval_seconds.max(interval_floor));
    now - last >= time::Duration::seconds(interval)
}

/// Run the scheduler until `shutdown` flips to true.
///
/// A cycle that fails is logged and the loop keeps ticking; the transaction
/// scope inside [`store::save_cycle_results`] guarantees no partial writes
/// survive a failed cycle. In-flight checks are not cancelled on shutdown,
/// but their results are not guaranteed to persist.
pub async fn run(
    resources: Arc<AppResources>,
    push: Arc<dyn PushTransport>,
    mut shutdown: watch::Receiver<bool>,
) {
    let tick = Duration::from_secs(resources.config.scheduler.tick_seconds);
    let options = CheckOptions {
        retry_backoff: Duration::from_secs(resources.config.scheduler.retry_backoff_seconds),
    };
    let mut ticker = interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(tick_seconds = tick.as_secs(), "monitoring scheduler started");
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = OffsetDateTime::now_utc();
                match run_cycle(&resources, push.as_ref(), &options, now).await {
                    Ok(0) => debug!("no monitors due"),
                    Ok(checked) => info!(checked, "monitoring cycle complete"),
                    Err(e) => error!(error = %e, "monitoring cycle failed"),
                }
            }
            changed = shutdown.changed() => {
                // A closed channel means the handle holder is gone; stop too.
                if changed.is_err() || *shutdown.borrow() {
                    info!("monitoring scheduler stopped");
                    return;
                }
            }
        }
    }
}

/// One tick's worth of work. Returns how many monitors were checked.
pub async fn run_cycle(
    resources: &AppResources,
    push: &dyn PushTransport,
    options: &CheckOptions,
    now: OffsetDateTime,
) -> Result<usize, DbErr> {
    let db = resources.db.as_ref();
    let interval_floor = resources.config.scheduler.min_interval_seconds;

    let mut due = Vec::new();
    for bundle in store::load_active_monitors(db).await? {
        if !is_due(&bundle.monitor, now, interval_floor) {
            continue;
        }
        if maintenance::is_suppressed(&bundle.windows, now) {
            debug!(
                monitor_id = bundle.monitor.id,
                "monitor is in a maintenance window, skipping"
            );
            continue;
        }
        due.push(bundle);
    }
    if due.is_empty() {
        return Ok(0);
    }

    // Every due monitor's check runs as an independent unit of work; the
    // cycle awaits them all before touching the database, so a monitor can
    // never be checked twice concurrently.
    let mut checks = FuturesUnordered::new();
    for bundle in due {
        checks.push(async move {
            let verdict = checker::evaluate_monitor(&bundle.monitor, options).await;
            (bundle, verdict)
        });
    }
    let mut outcomes: Vec<(MonitorBundle, Verdict)> = Vec::new();
    while let Some(outcome) = checks.next().await {
        outcomes.push(outcome);
    }

    let checked_at = OffsetDateTime::now_utc();
    let mut logs = Vec::with_capacity(outcomes.len());
    let mut updates = Vec::with_capacity(outcomes.len());
    for (bundle, verdict) in &outcomes {
        logs.push(check_log::ActiveModel {
            id: ActiveValue::NotSet,
            monitor_id: ActiveValue::Set(bundle.monitor.id),
            status_code: ActiveValue::Set(verdict.status_code),
            response_time: ActiveValue::Set(verdict.response_time),
            is_up: ActiveValue::Set(verdict.is_up),
            error_message: ActiveValue::Set(verdict.log_message()),
            checked_at: ActiveValue::Set(checked_at),
        });
        let mut update: monitor::ActiveModel = bundle.monitor.clone().into();
        update.last_status = ActiveValue::Set(Some(verdict.is_up));
        update.last_checked_at = ActiveValue::Set(Some(checked_at));
        updates.push(update);
    }
    store::save_cycle_results(db, logs, updates).await?;

    // `bundle.monitor` still carries the pre-cycle status, so transitions
    // compare against what was recorded before this cycle's writes.
    for (bundle, verdict) in &outcomes {
        notify::on_verdict(
            resources,
            push,
            &bundle.monitor,
            bundle.owner.as_ref(),
            bundle.monitor.last_status,
            verdict,
            checked_at,
        )
        .await;
    }

    Ok(outcomes.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn test_monitor(interval_seconds: i32) -> monitor::Model {
        monitor::Model {
            id: 1,
            user_id: 1,
            name: "example".into(),
            url: "http://example.com/".into(),
            interval_seconds,
            timeout_seconds: 10,
            expected_status: None,
            is_active: true,
            check_ssl: false,
            ssl_expiry_threshold_days: 14,
            keyword_include: None,
            keyword_exclude: None,
            max_response_time: None,
            consecutive_checks: 1,
            last_status: None,
            last_checked_at: None,
            created_at: datetime!(2026-01-01 00:00 UTC),
        }
    }

    #[test]
    fn never_checked_is_always_due() {
        let monitor = test_monitor(86_400);
        assert!(is_due(&monitor, datetime!(2026-08-07 12:00 UTC), 180));
    }

    #[test]
    fn due_only_after_interval_elapses() {
        let mut monitor = test_monitor(300);
        monitor.last_checked_at = Some(datetime!(2026-08-07 12:00 UTC));
        assert!(!is_due(&monitor, datetime!(2026-08-07 12:04:59 UTC), 180));
        assert!(is_due(&monitor, datetime!(2026-08-07 12:05:00 UTC), 180));
    }

    #[test]
    fn interval_floor_is_enforced() {
        // Configured below the floor; the floor wins.
        let mut monitor = test_monitor(60);
        monitor.last_checked_at = Some(datetime!(2026-08-07 12:00 UTC));
        assert!(!is_due(&monitor, datetime!(2026-08-07 12:02 UTC), 180));
        assert!(is_due(&monitor, datetime!(2026-08-07 12:03 UTC), 180));
    }
}
