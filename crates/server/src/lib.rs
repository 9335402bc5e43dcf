//! Core of an HTTP uptime monitoring service.
//!
//! This library periodically probes user-registered HTTP(S) endpoints,
//! decides whether each is up or down from several signals (status code,
//! keyword presence, latency, SSL expiry), detects status transitions, and
//! dispatches rate-limited push and email notifications.

use std::sync::Arc;

use lettre::{AsyncSmtpTransport, Tokio1Executor};
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;

pub mod checker;
pub mod config;
pub mod email_templates;
pub mod entity;
pub mod error;
pub mod maintenance;
pub mod notify;
pub mod probe;
pub mod scheduler;
pub mod stats;
pub mod store;

#[derive(Clone, Debug)]
pub struct AppResources {
    pub db: Arc<DatabaseConnection>,
    pub mailer: Arc<AsyncSmtpTransport<Tokio1Executor>>,
    pub config: Arc<AppConfig>,
}
