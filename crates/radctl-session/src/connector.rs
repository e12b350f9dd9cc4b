use std::path::Path;

use radctl_transport::ControlStream;
use tracing::debug;

use crate::config::SessionConfig;
use crate::error::Result;
use crate::session::{ControlSession, PendingSession};

/// A control session over a Unix domain socket.
pub type SocketSession = ControlSession<ControlStream, ControlStream>;

/// Connect to a control socket and complete the handshake.
pub fn connect(path: impl AsRef<Path>) -> Result<SocketSession> {
    connect_with_config(path, &SessionConfig::default())
}

/// Connect with explicit configuration.
///
/// Deadlines in `config` are applied before the handshake, so they bound it
/// as well as every later command.
pub fn connect_with_config(path: impl AsRef<Path>, config: &SessionConfig) -> Result<SocketSession> {
    let stream = radctl_transport::connect(path)?;
    if let Some((uid, gid, pid)) = stream.peer_credentials() {
        debug!(uid, gid, pid, "control socket peer");
    }

    PendingSession::from_stream(stream, config.clone())?.handshake()
}
