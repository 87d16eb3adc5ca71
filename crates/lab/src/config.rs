//! Lab configuration loaded from environment variables.

use domain::{ConfigError, ServiceConfig};

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Lab configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `LAB_LOG_FORMAT` — `pretty` or `json` (default: `pretty`)
/// - `LAB_WORKERS` — concurrent kitchen workers (default: `4`)
/// - `LAB_ORDERS_PER_WORKER` — orders each worker places (default: `25`)
/// - the `PANCAKE_*` variables read by [`ServiceConfig::from_env`]
#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub log_format: LogFormat,
    pub workers: usize,
    pub orders_per_worker: usize,
    pub service: ServiceConfig,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    ///
    /// Missing variables use their defaults. Worker and order counts must be
    /// positive integers and the service section must parse; anything else is
    /// an error. An unrecognized `LAB_LOG_FORMAT` renders pretty output.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let count = |key: &'static str, default: usize| -> Result<usize, ConfigError> {
            match lookup(key) {
                Some(value) => match value.trim().parse::<usize>() {
                    Ok(n) if n > 0 => Ok(n),
                    _ => Err(ConfigError::Invalid { key, value }),
                },
                None => Ok(default),
            }
        };

        Ok(Self {
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: match lookup("LAB_LOG_FORMAT").as_deref().map(str::trim) {
                Some("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            workers: count("LAB_WORKERS", defaults.workers)?,
            orders_per_worker: count("LAB_ORDERS_PER_WORKER", defaults.orders_per_worker)?,
            service: ServiceConfig::from_lookup(&lookup)?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            workers: 4,
            orders_per_worker: 25,
            service: ServiceConfig::default(),
        }
    }
}
