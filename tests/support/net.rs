//! Local TCP fixtures for probe tests.

use std::net::TcpListener;

/// Bind an ephemeral listener standing in for a ready database.
///
/// Keep the listener alive for as long as the port should accept
/// connections.
pub fn ready_listener() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind fixture listener");
    let port = listener.local_addr().expect("fixture listener addr").port();
    (listener, port)
}

/// A local port with nothing listening on it.
pub fn closed_port() -> u16 {
    let (listener, port) = ready_listener();
    drop(listener);
    port
}
