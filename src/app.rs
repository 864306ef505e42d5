//! App orchestration module.
//!
//! Runs the entrypoint sequence: announce the target database, wait for
//! it to accept connections, run one-shot initialization, then hand the
//! process over to the application command.

use std::convert::Infallible;

use tracing::{debug, info};

use crate::config::{self, Config, FLASK_APP_VAR};
use crate::error::Result;
use crate::probe::ReadinessProbe;
use crate::{init, launch, wait};

/// Main application struct.
pub struct App;

impl App {
    /// Run the entrypoint sequence.
    ///
    /// Only returns on error; a successful run ends inside
    /// [`launch::launch`] with the application in control.
    pub async fn run(config: Config, probe: Box<dyn ReadinessProbe>) -> Result<Infallible> {
        let database = &config.database;
        info!(
            host = %database.host,
            port = database.port,
            database = %database.name,
            user = %database.user,
            "doorman starting"
        );

        wait::wait_for_ready(probe.as_ref(), &config.retry).await?;

        apply_flask_app_default();

        init::run(&config.init).await?;

        launch::launch(&config.launch)
    }
}

/// Default `FLASK_APP` when the environment leaves it unset or empty, so
/// both the init command and the application see the same module.
fn apply_flask_app_default() {
    // var_os, not var: a caller-set value that is not valid UTF-8 is
    // still a caller-set value and must survive untouched.
    let current = std::env::var_os(FLASK_APP_VAR);
    if let Some(value) = config::flask_app_fallback(current.as_deref()) {
        std::env::set_var(FLASK_APP_VAR, value);
        debug!(value, "FLASK_APP not set - using the default");
    }
}
