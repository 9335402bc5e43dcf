//! Status-change email delivery over SMTP.

use crate::checker::Verdict;
use crate::config::AppConfig;
use crate::email_templates::StatusChangeEmailTemplate;
use crate::entity::monitor;
use crate::error::EmailError;
use crate::notify::{format_timestamp, status_label};
use lettre::message::header::ContentType;
use lettre::message::{MultiPart, SinglePart};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use time::OffsetDateTime;
use tracing::info;

/// Build and send one multipart (plain + HTML) status-change email.
#[allow(clippy::too_many_arguments)]
pub async fn send_status_email(
    mailer: &AsyncSmtpTransport<Tokio1Executor>,
    config: &AppConfig,
    address: &str,
    daily_limit: i32,
    monitor: &monitor::Model,
    previous: bool,
    verdict: &Verdict,
    now: OffsetDateTime,
) -> Result<(), EmailError> {
    let template = StatusChangeEmailTemplate {
        monitor_name: &monitor.name,
        url: &monitor.url,
        previous,
        current: verdict.is_up,
        error_message: verdict.error_message.as_deref(),
        warnings: &verdict.warnings,
        timestamp: format_timestamp(now),
        daily_limit,
    };

    let subject = format!(
        "Monitor Alert: {} is {} -> {}",
        monitor.name,
        status_label(previous),
        status_label(verdict.is_up)
    );

    let message = Message::builder()
        .from(config.smtp.from.parse()?)
        .to(address.parse()?)
        .subject(subject)
        .header(lettre::message::header::MIME_VERSION_1_0)
        .multipart(
            MultiPart::alternative()
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_PLAIN)
                        .body(template.render_text()),
                )
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_HTML)
                        .body(template.render_html()),
                ),
        )?;

    mailer.send(message).await?;
    info!(monitor_id = monitor.id, "sent status change email");
    Ok(())
}
