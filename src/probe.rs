//! Database readiness probes.
//!
//! A probe answers one question: does the database accept connections right
//! now? Two implementations are provided:
//!
//! - [`PgIsReadyProbe`] — shells out to the `pg_isready` utility, the
//!   classic entrypoint check. Success is its exit status; its own output
//!   is discarded so doorman's progress lines stay the only log surface.
//! - [`TcpProbe`] — opens a TCP connection to the database port. Weaker
//!   (it proves a listener, not a Postgres handshake) but needs no client
//!   tools in the image.
//!
//! Probes must be safe to invoke repeatedly: one attempt never affects the
//! next.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::process::Command;
use tokio::time;

use crate::config::DatabaseConfig;
use crate::error::ProbeError;
use crate::launch::exit_code_of;

const PG_ISREADY: &str = "pg_isready";

/// A lightweight check reporting whether the database currently accepts
/// client connections, without performing application-level work.
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    /// Run one readiness attempt.
    async fn check(&self) -> Result<(), ProbeError>;

    /// What is being probed, for log lines.
    fn describe(&self) -> String;
}

/// Probe that invokes `pg_isready -h <host> -p <port> -U <user>`.
pub struct PgIsReadyProbe {
    host: String,
    port: u16,
    user: String,
    attempt_timeout: Option<Duration>,
}

impl PgIsReadyProbe {
    pub fn new(database: &DatabaseConfig, attempt_timeout: Option<Duration>) -> Self {
        Self {
            host: database.host.clone(),
            port: database.port,
            user: database.user.clone(),
            attempt_timeout,
        }
    }

    fn args(&self) -> [String; 6] {
        [
            "-h".into(),
            self.host.clone(),
            "-p".into(),
            self.port.to_string(),
            "-U".into(),
            self.user.clone(),
        ]
    }

    async fn run_once(&self) -> Result<(), ProbeError> {
        let status = Command::new(PG_ISREADY)
            .args(self.args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|source| ProbeError::Spawn {
                command: PG_ISREADY.to_string(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ProbeError::NotReady {
                command: PG_ISREADY.to_string(),
                code: exit_code_of(status),
            })
        }
    }
}

#[async_trait]
impl ReadinessProbe for PgIsReadyProbe {
    async fn check(&self) -> Result<(), ProbeError> {
        with_timeout(self.attempt_timeout, self.run_once()).await
    }

    fn describe(&self) -> String {
        format!("{PG_ISREADY} against {}:{}", self.host, self.port)
    }
}

/// Probe that opens (and immediately drops) a TCP connection.
pub struct TcpProbe {
    addr: String,
    attempt_timeout: Option<Duration>,
}

impl TcpProbe {
    pub fn new(database: &DatabaseConfig, attempt_timeout: Option<Duration>) -> Self {
        Self {
            addr: database.endpoint(),
            attempt_timeout,
        }
    }

    async fn connect_once(&self) -> Result<(), ProbeError> {
        match TcpStream::connect(&self.addr).await {
            Ok(_stream) => Ok(()),
            Err(source) => Err(ProbeError::Connect {
                addr: self.addr.clone(),
                source,
            }),
        }
    }
}

#[async_trait]
impl ReadinessProbe for TcpProbe {
    async fn check(&self) -> Result<(), ProbeError> {
        with_timeout(self.attempt_timeout, self.connect_once()).await
    }

    fn describe(&self) -> String {
        format!("tcp connect to {}", self.addr)
    }
}

/// Cap one attempt when a per-attempt timeout was configured. Without
/// one, an attempt takes as long as it takes.
async fn with_timeout<F>(attempt_timeout: Option<Duration>, attempt: F) -> Result<(), ProbeError>
where
    F: std::future::Future<Output = Result<(), ProbeError>>,
{
    match attempt_timeout {
        Some(timeout) => match time::timeout(timeout, attempt).await {
            Ok(result) => result,
            Err(_) => Err(ProbeError::Timeout { timeout }),
        },
        None => attempt.await,
    }
}
