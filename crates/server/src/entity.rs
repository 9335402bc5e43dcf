//! Database entities for the monitoring core.

pub mod check_log;
pub mod maintenance_window;
pub mod monitor;
pub mod user;
