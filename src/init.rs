//! One-shot database initialization, run between readiness and launch.
//!
//! The init command is expected to be idempotent (the Flask-style
//! `init-db` subcommand is), so a failure here is tolerated by default:
//! on shared databases another replica has usually initialized the
//! schema already, and the application itself will surface a genuinely
//! broken database. `strict` turns a failure into a fatal error instead.

use tokio::process::Command;
use tracing::{info, warn};

use crate::error::{ConfigError, Error, Result};
use crate::launch::{command_failure_code, exit_code_of};

/// What to run before launching the application, and how to treat failure.
#[derive(Debug, Clone)]
pub struct InitConfig {
    /// Program and arguments, e.g. `["flask", "init-db"]`.
    pub argv: Vec<String>,
    /// Propagate an init failure as a fatal error instead of continuing.
    pub strict: bool,
    /// Skip the init step entirely.
    pub skip: bool,
}

impl Default for InitConfig {
    fn default() -> Self {
        Self {
            argv: vec!["flask".to_string(), "init-db".to_string()],
            strict: false,
            skip: false,
        }
    }
}

/// Split a shell-less command line on whitespace.
///
/// No quoting or escaping: the init command is operator-supplied
/// configuration, not a shell script. An empty line is rejected so a
/// typo'd `--init-command ""` fails fast instead of silently skipping
/// initialization (that is what `--skip-init` is for).
pub fn parse_command_line(line: &str) -> std::result::Result<Vec<String>, ConfigError> {
    let argv: Vec<String> = line.split_whitespace().map(str::to_string).collect();
    if argv.is_empty() {
        return Err(ConfigError::InvalidValue {
            var: "--init-command",
            reason: "expected a non-empty command line".to_string(),
        });
    }
    Ok(argv)
}

/// Run the init command with inherited stdio.
///
/// Returns `Ok` on success, on skip, and on tolerated failure; returns
/// `Err` only under `strict`, carrying the command's exit code.
pub async fn run(config: &InitConfig) -> Result<()> {
    if config.skip {
        info!("Skipping database initialization");
        return Ok(());
    }
    let Some((program, args)) = config.argv.split_first() else {
        return Ok(());
    };

    let command = config.argv.join(" ");
    info!(command = %command, "Running database initialization");

    let code = match Command::new(program).args(args).status().await {
        Ok(status) if status.success() => {
            info!("Database initialization complete");
            return Ok(());
        }
        Ok(status) => exit_code_of(status),
        Err(err) => {
            warn!(command = %command, error = %err, "Could not invoke the initialization command");
            command_failure_code(&err)
        }
    };

    if config.strict {
        return Err(Error::Init { code });
    }
    warn!(
        command = %command,
        code,
        "Initialization command failed - continuing to launch anyway"
    );
    Ok(())
}
