//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`probe`] — Mock [`ReadinessProbe`](crate::probe::ReadinessProbe)
//!   implementations: `ScriptedProbe`.

pub mod probe;
