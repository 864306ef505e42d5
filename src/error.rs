use std::io;
use std::time::Duration;

use thiserror::Error;

use crate::config::REQUIRED_DB_VARS;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// One or more required environment variables are unset or empty.
    ///
    /// The message names every missing variable plus the full required set,
    /// so a single diagnostic is enough to fix the deployment.
    #[error(
        "missing required environment variables: {}; all of {} must be set and non-empty",
        .missing.join(", "),
        REQUIRED_DB_VARS.join(", ")
    )]
    MissingVars { missing: Vec<&'static str> },

    #[error("invalid value for {var}: {reason}")]
    InvalidValue { var: &'static str, reason: String },
}

/// Why a single readiness attempt reported the database as not ready.
///
/// Probe failures are expected transient state, not terminal errors: the
/// wait loop logs them and retries. Only an exhausted retry bound turns
/// unavailability into an [`Error`].
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("could not invoke {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("{command} exited with code {code}")]
    NotReady { command: String, code: i32 },

    #[error("connection to {addr} failed: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("attempt timed out after {timeout:?}")]
    Timeout { timeout: Duration },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("database not ready after {attempts} attempt(s) in {elapsed:?}")]
    Unavailable { attempts: u32, elapsed: Duration },

    #[error("initialization command failed with exit code {code}")]
    Init { code: i32 },

    #[error("failed to launch '{command}': {source}")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Map a terminal error to the process exit status, in one place.
    ///
    /// Configuration problems and an exhausted wait exit 1. A strict-mode
    /// initialization failure forwards the child's own code. A launch
    /// failure uses the conventional shell codes: 127 for a command that
    /// was not found, 126 for one that could not be executed.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) => 1,
            Error::Unavailable { .. } => 1,
            Error::Init { code } => *code,
            Error::Launch { source, .. } => crate::launch::command_failure_code(source),
        }
    }
}
