//! The final hand-off to the application process.
//!
//! On Unix the default is `exec`: the application replaces this process,
//! keeping PID 1 semantics, signal delivery, and the exit status exactly
//! as if the wrapper had never existed. The spawn-and-wait fallback
//! exists for the platforms and tests where replacing the process is
//! not an option; it forwards the child's exit status as faithfully as
//! a parent process can.

use std::convert::Infallible;
use std::ffi::OsString;
use std::io;
use std::process::{Command, ExitStatus};

use tracing::info;

use crate::error::{Error, Result};

/// The application command and how to transfer control to it.
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    /// Program and arguments exactly as supplied on the command line.
    pub argv: Vec<OsString>,
    /// Replace this process via `exec` rather than spawning a child.
    /// Ignored off Unix, where spawn-and-wait is the only option.
    pub replace_process: bool,
}

/// Transfer control to the application.
///
/// Only returns on failure to start it; otherwise the process image is
/// replaced, or the child's exit status is forwarded via [`std::process::exit`].
pub fn launch(config: &LaunchConfig) -> Result<Infallible> {
    let Some((program, args)) = config.argv.split_first() else {
        return Err(Error::Launch {
            command: "application".to_string(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "empty command line"),
        });
    };
    let command = display_argv(&config.argv);

    info!(command = %command, "Launching application");

    #[cfg(unix)]
    if config.replace_process {
        use std::os::unix::process::CommandExt;

        // exec only returns on failure.
        let source = Command::new(program).args(args).exec();
        return Err(Error::Launch { command, source });
    }

    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|source| Error::Launch {
            command: command.clone(),
            source,
        })?;
    let code = exit_code_of(status);
    info!(code, "Application exited");
    std::process::exit(code)
}

/// Map an [`ExitStatus`] to the code a shell would report: the exit code
/// itself, or 128 plus the signal number for a signal death.
pub fn exit_code_of(status: ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;

        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    status.code().unwrap_or(1)
}

/// Shell-convention code for a command that never ran: 127 for not
/// found, 126 for not executable.
pub(crate) fn command_failure_code(err: &io::Error) -> i32 {
    match err.kind() {
        io::ErrorKind::NotFound => 127,
        io::ErrorKind::PermissionDenied => 126,
        _ => 1,
    }
}

fn display_argv(argv: &[OsString]) -> String {
    argv.iter()
        .map(|arg| arg.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}
