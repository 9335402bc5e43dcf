//! Transition detection and notification dispatch.
//!
//! A notification fires only on a status flip relative to the previously
//! recorded status; sustained outages keep logging checks but re-alert only
//! on the next flip. Delivery failures are logged and dropped, never raised
//! to the scheduler.

pub mod email;
pub mod push;

pub use push::{PushTransport, TelegramPush};

use crate::AppResources;
use crate::checker::Verdict;
use crate::entity::{monitor, user};
use crate::store;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};
use tracing::{error, info, warn};

/// Outcome of the per-user daily email quota check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaDecision {
    /// Sending is allowed; `count_today` is the count after any day-rollover
    /// reset, before this send.
    Allow { count_today: i32 },
    Exhausted { count: i32, limit: i32 },
}

/// Apply the daily rollover and cap without mutating the user.
///
/// The counter resets when the last send happened on a prior UTC calendar
/// day; both timestamps are normalized to UTC before the date comparison.
pub fn email_quota(user: &user::Model, now: OffsetDateTime) -> QuotaDecision {
    let mut count = user.email_notification_count;
    if let Some(last) = user.last_email_notification_date
        && last.to_offset(UtcOffset::UTC).date() < now.to_offset(UtcOffset::UTC).date()
    {
        count = 0;
    }
    if count < user.email_limit {
        QuotaDecision::Allow { count_today: count }
    } else {
        QuotaDecision::Exhausted {
            count,
            limit: user.email_limit,
        }
    }
}

/// React to a fresh verdict: on a status flip, push a message to the owner
/// and send a quota-gated email.
///
/// The first-ever check (`previous_status` unknown) establishes a baseline
/// silently.
pub async fn on_verdict(
    resources: &AppResources,
    push: &dyn PushTransport,
    monitor: &monitor::Model,
    owner: Option<&user::Model>,
    previous_status: Option<bool>,
    verdict: &Verdict,
    now: OffsetDateTime,
) {
    let Some(previous) = previous_status else {
        return;
    };
    if previous == verdict.is_up {
        return;
    }

    let Some(owner) = owner else {
        warn!(
            monitor_id = monitor.id,
            "monitor has no owner, skipping notification"
        );
        return;
    };

    info!(
        monitor_id = monitor.id,
        url = %monitor.url,
        previous,
        current = verdict.is_up,
        "monitor status changed"
    );

    if owner.is_notification_enabled {
        let text = push_message(monitor, previous, verdict, now);
        if let Err(e) = push.send_message(owner.telegram_id, &text).await {
            error!(
                monitor_id = monitor.id,
                telegram_id = owner.telegram_id,
                error = %e,
                "failed to send push notification"
            );
        }
    }

    if owner.is_email_notification_enabled {
        let Some(address) = owner.email.as_deref() else {
            return;
        };
        match email_quota(owner, now) {
            QuotaDecision::Exhausted { count, limit } => {
                info!(
                    user_id = owner.id,
                    count, limit, "daily email limit reached, skipping email"
                );
            }
            QuotaDecision::Allow { count_today } => {
                let sent = email::send_status_email(
                    &resources.mailer,
                    &resources.config,
                    address,
                    owner.email_limit,
                    monitor,
                    previous,
                    verdict,
                    now,
                )
                .await;
                match sent {
                    Ok(()) => {
                        if let Err(e) = store::record_email_sent(
                            resources.db.as_ref(),
                            owner,
                            count_today + 1,
                            now,
                        )
                        .await
                        {
                            error!(
                                user_id = owner.id,
                                error = %e,
                                "failed to record email quota bookkeeping"
                            );
                        }
                    }
                    Err(e) => {
                        error!(user_id = owner.id, error = %e, "failed to send status email");
                    }
                }
            }
        }
    }
}

pub(crate) fn status_label(up: bool) -> &'static str {
    if up { "UP" } else { "DOWN" }
}

pub(crate) fn format_timestamp(at: OffsetDateTime) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second] UTC");
    at.to_offset(UtcOffset::UTC)
        .format(&format)
        .unwrap_or_default()
}

fn push_message(
    monitor: &monitor::Model,
    previous: bool,
    verdict: &Verdict,
    now: OffsetDateTime,
) -> String {
    let mut message = format!(
        "{} Monitor Status Change\n\nName: {}\nURL: {}\nStatus: {} -> {}\n",
        if verdict.is_up { "\u{2705}" } else { "\u{1f6a8}" },
        monitor.name,
        monitor.url,
        status_label(previous),
        status_label(verdict.is_up),
    );
    if !verdict.is_up
        && let Some(error) = &verdict.error_message
    {
        message.push_str(&format!("Error: {error}\n"));
    }
    for warning in &verdict.warnings {
        message.push_str(&format!("Warning: {warning}\n"));
    }
    message.push_str(&format!("Time: {}", format_timestamp(now)));
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn test_user() -> user::Model {
        user::Model {
            id: 1,
            telegram_id: 42,
            username: Some("alice".into()),
            email: Some("alice@example.com".into()),
            is_notification_enabled: true,
            is_email_notification_enabled: true,
            email_limit: 4,
            email_notification_count: 0,
            last_email_notification_date: None,
            joined_at: datetime!(2026-01-01 00:00 UTC),
        }
    }

    fn test_monitor() -> monitor::Model {
        monitor::Model {
            id: 7,
            user_id: 1,
            name: "shop".into(),
            url: "https://shop.example.com/".into(),
            interval_seconds: 300,
            timeout_seconds: 10,
            expected_status: None,
            is_active: true,
            check_ssl: false,
            ssl_expiry_threshold_days: 14,
            keyword_include: None,
            keyword_exclude: None,
            max_response_time: None,
            consecutive_checks: 1,
            last_status: Some(true),
            last_checked_at: None,
            created_at: datetime!(2026-01-01 00:00 UTC),
        }
    }

    #[test]
    fn quota_allows_under_limit() {
        let mut user = test_user();
        user.email_notification_count = 3;
        user.last_email_notification_date = Some(datetime!(2026-08-07 08:00 UTC));
        assert_eq!(
            email_quota(&user, datetime!(2026-08-07 12:00 UTC)),
            QuotaDecision::Allow { count_today: 3 }
        );
    }

    #[test]
    fn quota_exhausted_at_limit_same_day() {
        let mut user = test_user();
        user.email_notification_count = 4;
        user.last_email_notification_date = Some(datetime!(2026-08-07 08:00 UTC));
        assert_eq!(
            email_quota(&user, datetime!(2026-08-07 12:00 UTC)),
            QuotaDecision::Exhausted { count: 4, limit: 4 }
        );
    }

    #[test]
    fn quota_resets_on_new_utc_day() {
        let mut user = test_user();
        user.email_notification_count = 4;
        user.last_email_notification_date = Some(datetime!(2026-08-06 23:00 UTC));
        assert_eq!(
            email_quota(&user, datetime!(2026-08-07 00:30 UTC)),
            QuotaDecision::Allow { count_today: 0 }
        );
    }

    #[test]
    fn quota_never_sent_before() {
        let user = test_user();
        assert_eq!(
            email_quota(&user, datetime!(2026-08-07 12:00 UTC)),
            QuotaDecision::Allow { count_today: 0 }
        );
    }

    #[test]
    fn push_message_carries_error_when_down() {
        let monitor = test_monitor();
        let verdict = Verdict {
            status_code: Some(500),
            response_time: 0.4,
            is_up: false,
            error_message: Some("Unexpected status code 500".into()),
            warnings: Vec::new(),
        };
        let message = push_message(&monitor, true, &verdict, datetime!(2026-08-07 12:00 UTC));
        assert!(message.contains("shop"));
        assert!(message.contains("UP -> DOWN"));
        assert!(message.contains("Error: Unexpected status code 500"));
        assert!(message.contains("2026-08-07 12:00:00 UTC"));
    }

    #[test]
    fn push_message_omits_error_when_up() {
        let monitor = test_monitor();
        let verdict = Verdict {
            status_code: Some(200),
            response_time: 0.2,
            is_up: true,
            error_message: None,
            warnings: vec!["SSL certificate for shop.example.com expires in 3 day(s)".into()],
        };
        let message = push_message(&monitor, false, &verdict, datetime!(2026-08-07 12:00 UTC));
        assert!(message.contains("DOWN -> UP"));
        assert!(!message.contains("Error:"));
        assert!(message.contains("Warning: SSL certificate"));
    }
}
