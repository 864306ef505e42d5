//! Command-line interface definitions.

use std::convert::Infallible;
use std::ffi::OsString;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::app::App;
use crate::config::{Config, DatabaseConfig, LoggingConfig};
use crate::error::Result;
use crate::init::{self, InitConfig};
use crate::launch::LaunchConfig;
use crate::probe::{PgIsReadyProbe, ReadinessProbe, TcpProbe};
use crate::wait::RetryPolicy;

/// Doorman - wait for PostgreSQL, initialize it, hand off to the app.
#[derive(Parser, Debug)]
#[command(name = "doorman")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Seconds between readiness attempts
    #[arg(long, default_value_t = 1, value_name = "SECONDS")]
    pub interval: u64,

    /// Multiplier applied to the interval after each failed attempt (>= 1.0; 1.0 = fixed cadence)
    #[arg(long, default_value_t = 1.0, value_name = "FACTOR", value_parser = parse_backoff)]
    pub backoff: f64,

    /// Upper bound on the grown interval
    #[arg(long, default_value_t = 30, value_name = "SECONDS")]
    pub max_interval: u64,

    /// Give up after this many failed attempts (default: retry forever)
    #[arg(long, value_name = "COUNT")]
    pub max_attempts: Option<u32>,

    /// Give up after this much total waiting (default: no deadline)
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Readiness check to run against the database
    #[arg(long, value_enum, default_value = "pg-isready")]
    pub probe: ProbeKind,

    /// Bound on a single readiness attempt (default: unbounded)
    #[arg(long, value_name = "SECONDS")]
    pub probe_timeout: Option<u64>,

    /// Initialization command to run once the database is ready
    #[arg(long, default_value = "flask init-db", value_name = "COMMAND")]
    pub init_command: String,

    /// Skip the initialization step
    #[arg(long)]
    pub skip_init: bool,

    /// Treat an initialization failure as fatal instead of continuing
    #[arg(long)]
    pub strict_init: bool,

    /// Spawn the application and forward its exit status instead of replacing the process
    #[arg(long)]
    pub no_exec: bool,

    /// Log level when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Use JSON log format instead of pretty
    #[arg(long)]
    pub json_logs: bool,

    /// Application command to launch once the database is ready
    #[arg(
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "COMMAND"
    )]
    pub command: Vec<OsString>,
}

/// Which readiness check to run before launching.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProbeKind {
    /// Shell out to pg_isready
    PgIsready,
    /// Open a TCP connection to the database port
    Tcp,
}

/// Build the runtime configuration and run the entrypoint sequence.
///
/// Environment validation runs before logging is initialized, so a
/// misconfigured container fails with a plain stderr line rather than a
/// log record.
pub async fn execute(cli: Cli) -> Result<Infallible> {
    let database = DatabaseConfig::from_env()?;
    let init = InitConfig {
        argv: init::parse_command_line(&cli.init_command)?,
        strict: cli.strict_init,
        skip: cli.skip_init,
    };
    let probe = build_probe(&cli, &database);
    let config = Config {
        database,
        retry: retry_policy(&cli),
        init,
        launch: LaunchConfig {
            argv: cli.command.clone(),
            replace_process: !cli.no_exec,
        },
        logging: LoggingConfig {
            level: cli.log_level.clone(),
            json: cli.json_logs,
        },
    };

    config.logging.init_logging();
    App::run(config, probe).await
}

/// A multiplier below 1.0 would shrink the delay toward a busy loop, and
/// a non-finite one has no sensible delay at all.
fn parse_backoff(raw: &str) -> std::result::Result<f64, String> {
    let value: f64 = raw.parse().map_err(|err| format!("{err}"))?;
    if !value.is_finite() || value < 1.0 {
        return Err("multiplier must be a finite number >= 1.0".to_string());
    }
    Ok(value)
}

fn retry_policy(cli: &Cli) -> RetryPolicy {
    let interval = Duration::from_secs(cli.interval);
    RetryPolicy {
        interval,
        backoff_multiplier: cli.backoff,
        // An interval above the cap would otherwise shrink on the first
        // backoff step.
        max_interval: Duration::from_secs(cli.max_interval).max(interval),
        max_attempts: cli.max_attempts,
        max_wait: cli.timeout.map(Duration::from_secs),
    }
}

fn build_probe(cli: &Cli, database: &DatabaseConfig) -> Box<dyn ReadinessProbe> {
    let attempt_timeout = cli.probe_timeout.map(Duration::from_secs);
    match cli.probe {
        ProbeKind::PgIsready => Box::new(PgIsReadyProbe::new(database, attempt_timeout)),
        ProbeKind::Tcp => Box::new(TcpProbe::new(database, attempt_timeout)),
    }
}
