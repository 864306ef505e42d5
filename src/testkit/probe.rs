//! Mock [`ReadinessProbe`] implementations for testing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::ProbeError;
use crate::probe::ReadinessProbe;

/// A mock probe with a scripted sequence of check results.
///
/// Each call to `check()` pops the next result from the queue. Once the
/// queue is exhausted, every further check succeeds, unless the probe
/// was built with [`ScriptedProbe::always_failing`].
pub struct ScriptedProbe {
    results: Mutex<VecDeque<Result<(), ProbeError>>>,
    fail_when_exhausted: bool,
    checks: Arc<AtomicU32>,
}

impl ScriptedProbe {
    /// A probe that reports ready on every check.
    pub fn ready() -> Self {
        Self {
            results: Mutex::new(VecDeque::new()),
            fail_when_exhausted: false,
            checks: Arc::new(AtomicU32::new(0)),
        }
    }

    /// A probe that fails `failures` checks, then reports ready forever.
    pub fn fails_then_ready(failures: u32) -> Self {
        let script = (0..failures).map(|_| Err(not_ready())).collect();
        Self {
            results: Mutex::new(script),
            fail_when_exhausted: false,
            checks: Arc::new(AtomicU32::new(0)),
        }
    }

    /// A probe that fails every check.
    pub fn always_failing() -> Self {
        Self {
            results: Mutex::new(VecDeque::new()),
            fail_when_exhausted: true,
            checks: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Replace the script with an explicit result sequence.
    pub fn with_results(mut self, results: Vec<Result<(), ProbeError>>) -> Self {
        self.results = Mutex::new(results.into());
        self
    }

    /// Get the shared counter for asserting how many checks ran.
    pub fn checks(&self) -> Arc<AtomicU32> {
        self.checks.clone()
    }
}

/// The error a scripted failure reports.
pub fn not_ready() -> ProbeError {
    ProbeError::NotReady {
        command: "scripted".to_string(),
        code: 1,
    }
}

#[async_trait]
impl ReadinessProbe for ScriptedProbe {
    async fn check(&self) -> Result<(), ProbeError> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        match self.results.lock().unwrap().pop_front() {
            Some(result) => result,
            None if self.fail_when_exhausted => Err(not_ready()),
            None => Ok(()),
        }
    }

    fn describe(&self) -> String {
        "scripted probe".to_string()
    }
}
