use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration build error: {0}")]
    Build(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

#[derive(Debug, Deserialize)]
pub struct SmtpConfig {
    pub server: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

#[derive(Debug, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
}

/// Timing knobs for the scheduler loop.
///
/// `tick_seconds` is deliberately finer-grained than any monitor interval so
/// due monitors are picked up promptly without per-monitor timers.
/// `min_interval_seconds` is the floor applied to every monitor's configured
/// polling interval.
#[derive(Debug, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_tick_seconds")]
    pub tick_seconds: u64,
    #[serde(default = "default_min_interval_seconds")]
    pub min_interval_seconds: i32,
    #[serde(default = "default_retry_backoff_seconds")]
    pub retry_backoff_seconds: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_seconds: default_tick_seconds(),
            min_interval_seconds: default_min_interval_seconds(),
            retry_backoff_seconds: default_retry_backoff_seconds(),
        }
    }
}

fn default_tick_seconds() -> u64 {
    10
}

fn default_min_interval_seconds() -> i32 {
    180
}

fn default_retry_backoff_seconds() -> u64 {
    2
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub smtp: SmtpConfig,
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.smtp.port == 0 {
            return Err(ConfigError::Validation("smtp.port must be > 0".into()));
        }
        if self.telegram.bot_token.is_empty() {
            return Err(ConfigError::Validation(
                "telegram.bot_token must not be empty".into(),
            ));
        }
        if self.scheduler.tick_seconds == 0 {
            return Err(ConfigError::Validation(
                "scheduler.tick_seconds must be > 0".into(),
            ));
        }
        if self.scheduler.min_interval_seconds <= 0 {
            return Err(ConfigError::Validation(
                "scheduler.min_interval_seconds must be > 0".into(),
            ));
        }
        Ok(())
    }
}

/// Load application configuration from `config.yaml` + environment overrides.
///
/// Environment variable override convention: any var matching the key path
/// separated by double underscores (e.g. `SMTP__PORT`) overrides the file
/// value.
///
/// Returns a `ConfigError` instead of panicking so the caller can decide how
/// to fail.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    use config::{Config, Environment, File};
    let cfg = Config::builder()
        .add_source(File::with_name("config.yaml"))
        .add_source(Environment::default().separator("__"))
        .build()?;

    let app: AppConfig = cfg.try_deserialize()?;
    app.validate()?;

    Ok(app)
}

/// Convenience helper for binaries wanting panic-on-error behaviour.
pub fn load_config_or_panic() -> AppConfig {
    match load_config() {
        Ok(c) => c,
        Err(e) => panic!("Failed to load configuration: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        AppConfig {
            database_url: "sqlite::memory:".into(),
            smtp: SmtpConfig {
                server: "smtp.example.com".into(),
                port: 587,
                username: "monitor".into(),
                password: "secret".into(),
                from: "monitor@example.com".into(),
            },
            telegram: TelegramConfig {
                bot_token: "123456:token".into(),
            },
            scheduler: SchedulerConfig::default(),
        }
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn rejects_zero_smtp_port() {
        let mut config = valid_config();
        config.smtp.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_empty_bot_token() {
        let mut config = valid_config();
        config.telegram.bot_token = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_tick() {
        let mut config = valid_config();
        config.scheduler.tick_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn scheduler_defaults() {
        let scheduler = SchedulerConfig::default();
        assert_eq!(scheduler.tick_seconds, 10);
        assert_eq!(scheduler.min_interval_seconds, 180);
        assert_eq!(scheduler.retry_backoff_seconds, 2);
    }
}
