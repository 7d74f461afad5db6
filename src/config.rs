use std::env;
use std::str::FromStr;
use std::time::Duration;

use dotenv::dotenv;

use crate::error::AppError;

pub struct AppConfig {
    pub port: u16,
    pub host: String,
    pub max_upload_bytes: usize,
    pub log_format: LogFormat,
    pub webhook: WebhookConfig,
    pub telemetry: TelemetryConfig,
}

/// Settings for the outbound webhook call. The webhook URL itself is never
/// part of the configuration; it is typed into the page on every submit.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct TelemetryConfig {
    pub debug_mode: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "compact" | "" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(AppError::Config(format!(
                "LOG_FORMAT must be `compact` or `json`, got `{}`",
                other
            ))),
        }
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();

        Ok(Self {
            port: parse_var("PORT", 3000)?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", 25 * 1024 * 1024)?,
            log_format: env::var("LOG_FORMAT")
                .unwrap_or_default()
                .parse()?,
            webhook: WebhookConfig {
                timeout: Duration::from_secs(parse_var("WEBHOOK_TIMEOUT_SECS", 30)?),
                connect_timeout: Duration::from_secs(parse_var(
                    "WEBHOOK_CONNECT_TIMEOUT_SECS",
                    10,
                )?),
            },
            telemetry: TelemetryConfig {
                debug_mode: parse_var("TELEMETRY_DEBUG", false)?,
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} has an invalid value: `{}`", name, raw))),
        _ => Ok(default),
    }
}
