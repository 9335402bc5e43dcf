//! Check orchestration: the bounded retry loop, content rules, and warning
//! aggregation that turn raw probes into a [`Verdict`].

use crate::entity::monitor;
use crate::probe::{self, ProbeResponse};
use hyper::StatusCode;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

/// Pause between failed attempts of one monitor's check.
pub const RETRY_BACKOFF: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct CheckOptions {
    pub retry_backoff: Duration,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            retry_backoff: RETRY_BACKOFF,
        }
    }
}

/// The up/down determination plus diagnostic detail produced by one check
/// cycle for one monitor.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub status_code: Option<i32>,
    /// Seconds; 0.0 when the final attempt never connected.
    pub response_time: f64,
    pub is_up: bool,
    pub error_message: Option<String>,
    /// Advisory only; warnings never flip `is_up`.
    pub warnings: Vec<String>,
}

impl Verdict {
    /// Primary failure reason with warning riders appended, as stored on the
    /// check log.
    pub fn log_message(&self) -> Option<String> {
        let mut parts: Vec<&str> = self.error_message.as_deref().into_iter().collect();
        parts.extend(self.warnings.iter().map(String::as_str));
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("; "))
        }
    }
}

/// Evaluate one monitor: probe with retries, apply the content rules, then
/// collect latency and SSL expiry warnings.
///
/// Failures consume the retry budget; the first fully passing attempt breaks
/// out immediately so an intermittent blip cannot flap the monitor to DOWN
/// while a single success is trusted at once.
#[tracing::instrument(skip_all, fields(monitor_id = monitor.id, url = %monitor.url))]
pub async fn evaluate_monitor(monitor: &monitor::Model, options: &CheckOptions) -> Verdict {
    let attempts = monitor.consecutive_checks.max(1);
    let limit = Duration::from_secs(monitor.timeout_seconds.max(1) as u64);

    let mut status_code = None;
    let mut response_time = 0.0;
    let mut is_up = false;
    let mut error_message = None;

    for attempt in 1..=attempts {
        match probe::probe_url(&monitor.url, limit).await {
            Ok(response) => {
                status_code = Some(i32::from(response.status.as_u16()));
                response_time = response.elapsed.as_secs_f64();
                match attempt_failure(monitor, &response) {
                    None => {
                        is_up = true;
                        error_message = None;
                        break;
                    }
                    Some(reason) => {
                        debug!(attempt, %reason, "check attempt failed");
                        is_up = false;
                        error_message = Some(reason);
                    }
                }
            }
            Err(e) => {
                status_code = None;
                response_time = 0.0;
                is_up = false;
                error_message = Some(e.to_string());
                if !e.is_retryable() {
                    warn!(error = %e, "aborting check, failure is not retryable");
                    break;
                }
                debug!(attempt, error = %e, "probe failed");
            }
        }
        if attempt < attempts {
            sleep(options.retry_backoff).await;
        }
    }

    let mut warnings = Vec::new();
    if let Some(max) = monitor.max_response_time
        && response_time > max
    {
        warnings.push(format!(
            "Response time {response_time:.2}s exceeded the {max:.2}s limit"
        ));
    }
    if monitor.check_ssl
        && let Some(warning) = ssl_expiry_warning(monitor).await
    {
        warnings.push(warning);
    }

    Verdict {
        status_code,
        response_time,
        is_up,
        error_message,
        warnings,
    }
}

/// Why a received response fails the monitor's rules, or `None` when it
/// passes. Keywords are only consulted once the status rule holds.
fn attempt_failure(monitor: &monitor::Model, response: &ProbeResponse) -> Option<String> {
    if !status_accepted(monitor.expected_status, response.status) {
        return Some(format!(
            "Unexpected status code {}",
            response.status.as_u16()
        ));
    }
    if let Some(keyword) = monitor.keyword_include.as_deref()
        && !response.body.contains(keyword)
    {
        return Some(format!("Keyword '{keyword}' not found in response body"));
    }
    if let Some(keyword) = monitor.keyword_exclude.as_deref()
        && response.body.contains(keyword)
    {
        return Some(format!(
            "Forbidden keyword '{keyword}' present in response body"
        ));
    }
    None
}

fn status_accepted(expected: Option<i32>, status: StatusCode) -> bool {
    match expected {
        Some(code) => i32::from(status.as_u16()) == code,
        None => status.is_success(),
    }
}

/// SSL expiry is checked once per cycle, outside the retry loop and
/// regardless of the up/down outcome. Only https URLs qualify; an unknown
/// expiry is silently skipped.
async fn ssl_expiry_warning(monitor: &monitor::Model) -> Option<String> {
    let url = Url::parse(&monitor.url).ok()?;
    if url.scheme() != "https" {
        return None;
    }
    let host = url.host_str()?;
    let port = url.port_or_known_default().unwrap_or(443);
    let days = probe::certificate_days_remaining(host, port).await?;
    if days <= i64::from(monitor.ssl_expiry_threshold_days) {
        Some(format!(
            "SSL certificate for {host} expires in {days} day(s)"
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn test_monitor() -> monitor::Model {
        monitor::Model {
            id: 1,
            user_id: 1,
            name: "example".into(),
            url: "http://example.com/".into(),
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
            last_status: None,
            last_checked_at: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn response(status: u16, body: &str) -> ProbeResponse {
        ProbeResponse {
            status: StatusCode::from_u16(status).unwrap(),
            elapsed: Duration::from_millis(20),
            body: body.into(),
        }
    }

    #[test]
    fn any_2xx_accepted_without_expected_status() {
        assert!(status_accepted(None, StatusCode::OK));
        assert!(status_accepted(None, StatusCode::NO_CONTENT));
        assert!(!status_accepted(None, StatusCode::MOVED_PERMANENTLY));
        assert!(!status_accepted(None, StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn exact_expected_status_must_match() {
        assert!(status_accepted(Some(301), StatusCode::MOVED_PERMANENTLY));
        assert!(!status_accepted(Some(301), StatusCode::OK));
    }

    #[test]
    fn keyword_include_must_appear() {
        let mut monitor = test_monitor();
        monitor.keyword_include = Some("Welcome".into());
        assert!(attempt_failure(&monitor, &response(200, "Welcome Home")).is_none());

        monitor.keyword_include = Some("Goodbye".into());
        let reason = attempt_failure(&monitor, &response(200, "Welcome Home")).unwrap();
        assert!(reason.contains("Goodbye"));
        assert!(reason.contains("not found"));
    }

    #[test]
    fn keyword_exclude_must_be_absent() {
        let mut monitor = test_monitor();
        monitor.keyword_exclude = Some("Error".into());
        assert!(attempt_failure(&monitor, &response(200, "all good")).is_none());
        let reason = attempt_failure(&monitor, &response(200, "Internal Error")).unwrap();
        assert!(reason.contains("Forbidden keyword"));
    }

    #[test]
    fn keywords_skipped_on_status_mismatch() {
        let mut monitor = test_monitor();
        monitor.keyword_include = Some("Welcome".into());
        let reason = attempt_failure(&monitor, &response(500, "no keyword here")).unwrap();
        assert!(reason.contains("Unexpected status code 500"));
    }

    #[test]
    fn log_message_concatenates_error_and_warnings() {
        let verdict = Verdict {
            status_code: Some(500),
            response_time: 1.5,
            is_up: false,
            error_message: Some("Unexpected status code 500".into()),
            warnings: vec!["Response time 1.50s exceeded the 1.00s limit".into()],
        };
        let message = verdict.log_message().unwrap();
        assert!(message.starts_with("Unexpected status code 500; "));
        assert!(message.contains("exceeded"));

        let clean = Verdict {
            status_code: Some(200),
            response_time: 0.1,
            is_up: true,
            error_message: None,
            warnings: Vec::new(),
        };
        assert_eq!(clean.log_message(), None);
    }
}
