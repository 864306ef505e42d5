//! Startup configuration, resolved exactly once before anything else runs.
//!
//! The database settings come from the environment (the contract every
//! container platform speaks); the orchestration knobs come from the CLI.
//! Everything is collected into one [`Config`] and passed down by
//! reference, so no later step reads the ambient environment on its own.

use tracing_subscriber::{fmt, EnvFilter};

use crate::error::ConfigError;
use crate::init::InitConfig;
use crate::launch::LaunchConfig;
use crate::wait::RetryPolicy;

/// Environment variables that must be set and non-empty before startup.
pub const REQUIRED_DB_VARS: [&str; 4] = ["DB_HOST", "DB_PORT", "DB_NAME", "DB_USER"];

/// Variable the launched application reads to locate its entry module.
pub const FLASK_APP_VAR: &str = "FLASK_APP";

/// Fallback exported as [`FLASK_APP_VAR`] when the caller left it unset.
pub const FLASK_APP_DEFAULT: &str = "app.py";

/// Everything the orchestrator needs, resolved up front.
#[derive(Debug)]
pub struct Config {
    pub database: DatabaseConfig,
    pub retry: RetryPolicy,
    pub init: InitConfig,
    pub launch: LaunchConfig,
    pub logging: LoggingConfig,
}

/// Connection settings for the database being waited on.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
}

impl DatabaseConfig {
    /// Read connection settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read connection settings through an explicit lookup.
    ///
    /// An unset variable and an empty one are equivalent. All four required
    /// variables are checked before reporting, so the diagnostic names the
    /// complete missing set rather than the first gap found.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut missing = Vec::new();
        let mut get = |var: &'static str| match lookup(var) {
            Some(value) if !value.is_empty() => Some(value),
            _ => {
                missing.push(var);
                None
            }
        };

        let host = get("DB_HOST");
        let port = get("DB_PORT");
        let name = get("DB_NAME");
        let user = get("DB_USER");

        let (Some(host), Some(port), Some(name), Some(user)) = (host, port, name, user) else {
            return Err(ConfigError::MissingVars { missing });
        };

        let port = port.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
            var: "DB_PORT",
            reason: format!("{port:?} is not a valid port number: {e}"),
        })?;

        Ok(Self {
            host,
            port,
            name,
            user,
        })
    }

    /// `host:port`, as logged and as dialed by the TCP probe.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Decide whether the application locator needs its fallback applied.
///
/// Returns the value to export when the caller left the variable unset or
/// empty; `None` means the caller's value is left untouched. Takes an
/// `OsStr` so a non-UTF-8 value still counts as set.
pub fn flask_app_fallback(current: Option<&std::ffi::OsStr>) -> Option<&'static str> {
    match current {
        Some(value) if !value.is_empty() => None,
        _ => Some(FLASK_APP_DEFAULT),
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Level used when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of the human-readable format.
    pub json: bool,
}

impl LoggingConfig {
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.level));

        if self.json {
            fmt().json().with_env_filter(filter).init();
        } else {
            fmt().with_env_filter(filter).init();
        }
    }
}
