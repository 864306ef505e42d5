//! Doorman - a container entrypoint that waits for PostgreSQL.
//!
//! Doorman wraps an application command and refuses to start it until
//! its database is actually accepting connections, closing the gap
//! between "the database container exists" and "the database is ready"
//! that startup ordering alone cannot close. Once the database answers,
//! it runs a one-shot initialization command and then replaces itself
//! with the application.
//!
//! # Modules
//!
//! - [`cli`] - Command-line surface and configuration assembly
//! - [`config`] - Environment validation and logging setup
//! - [`probe`] - Readiness checks: `pg_isready` and plain TCP
//! - [`wait`] - The retry loop and its policy
//! - [`init`] - One-shot database initialization
//! - [`launch`] - The final hand-off to the application
//! - [`app`] - Orchestration of the whole sequence
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use doorman::config::DatabaseConfig;
//! use doorman::probe::PgIsReadyProbe;
//! use doorman::wait::{self, RetryPolicy};
//!
//! # async fn demo() -> doorman::error::Result<()> {
//! let database = DatabaseConfig::from_env()?;
//! let probe = PgIsReadyProbe::new(&database, None);
//! wait::wait_for_ready(&probe, &RetryPolicy::default()).await?;
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod init;
pub mod launch;
pub mod probe;
pub mod wait;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
