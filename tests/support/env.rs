//! Database environment fixtures shared across CLI tests.

/// A complete required-variable set pointing at `host:port`.
///
/// Works with both `std::process::Command::envs` and the `assert_cmd`
/// wrapper.
pub fn database_env(host: &str, port: u16) -> Vec<(&'static str, String)> {
    vec![
        ("DB_HOST", host.to_string()),
        ("DB_PORT", port.to_string()),
        ("DB_NAME", "flags".to_string()),
        ("DB_USER", "flags".to_string()),
    ]
}
