//! Executable fixture scripts standing in for pg_isready, init
//! commands, and applications.

use std::fs;
use std::path::{Path, PathBuf};

/// Write an executable `#!/bin/sh` script into `dir`.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write fixture script");
    let mut perms = fs::metadata(&path).expect("fixture script metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("make fixture script executable");
    path
}

/// A fake `pg_isready` that fails until its `ready_at`th invocation.
///
/// Invocations are counted in `$DOORMAN_TEST_DIR/attempts`, which the
/// test should point at its own temp directory.
#[cfg(unix)]
pub fn fake_pg_isready(dir: &Path, ready_at: u32) -> PathBuf {
    write_script(
        dir,
        "pg_isready",
        &format!(
            r#"count_file="$DOORMAN_TEST_DIR/attempts"
n=$(cat "$count_file" 2>/dev/null || echo 0)
n=$((n + 1))
printf '%s' "$n" > "$count_file"
[ "$n" -ge {ready_at} ]"#
        ),
    )
}

/// A fake `pg_isready` that counts invocations and never succeeds.
#[cfg(unix)]
pub fn fake_pg_isready_never_ready(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "pg_isready",
        r#"count_file="$DOORMAN_TEST_DIR/attempts"
n=$(cat "$count_file" 2>/dev/null || echo 0)
n=$((n + 1))
printf '%s' "$n" > "$count_file"
exit 1"#,
    )
}

/// A fake `pg_isready` that counts invocations, then hangs.
#[cfg(unix)]
pub fn fake_pg_isready_hanging(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "pg_isready",
        r#"count_file="$DOORMAN_TEST_DIR/attempts"
n=$(cat "$count_file" 2>/dev/null || echo 0)
n=$((n + 1))
printf '%s' "$n" > "$count_file"
sleep 60"#,
    )
}

/// A fake `pg_isready` that records its arguments and succeeds.
#[cfg(unix)]
pub fn fake_pg_isready_recording_args(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "pg_isready",
        r#"printf '%s' "$*" > "$DOORMAN_TEST_DIR/args""#,
    )
}

/// How many times a fake `pg_isready` in `dir` has run.
pub fn attempts_recorded(dir: &Path) -> u32 {
    fs::read_to_string(dir.join("attempts"))
        .unwrap_or_default()
        .trim()
        .parse()
        .unwrap_or(0)
}

/// `dir` prepended to the current `PATH`, so fixture scripts shadow
/// real binaries.
pub fn prepend_path(dir: &Path) -> String {
    match std::env::var("PATH") {
        Ok(path) => format!("{}:{path}", dir.display()),
        Err(_) => dir.display().to_string(),
    }
}
