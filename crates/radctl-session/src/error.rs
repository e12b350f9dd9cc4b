use radctl_frame::{Channel, FrameError};

/// Errors that can occur in control session operations.
///
/// A command that runs and reports failure is not an error; see
/// [`CommandOutcome`](crate::CommandOutcome).
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] radctl_transport::TransportError),

    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// The daemon closed the connection or answered the handshake with nothing.
    #[error("empty handshake response")]
    EmptyHandshake,

    /// The daemon did not echo the handshake payload unchanged.
    #[error("incompatible version (daemon replied on {channel} with {len} bytes)")]
    IncompatibleVersion { channel: Channel, len: usize },

    /// A frame arrived on a channel that is not valid while a command runs.
    #[error("unexpected {0} frame during command execution")]
    UnexpectedChannel(Channel),
}

impl SessionError {
    /// True when a socket deadline expired.
    pub fn is_timeout(&self) -> bool {
        match self {
            SessionError::Frame(err) => err.is_timeout(),
            SessionError::Transport(err) => err.io_source().is_some_and(|io| {
                matches!(
                    io.kind(),
                    std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
                )
            }),
            _ => false,
        }
    }

    /// True when the daemon spoke, but not the protocol we expected.
    pub fn is_protocol(&self) -> bool {
        match self {
            SessionError::Frame(err) => err.is_protocol(),
            SessionError::IncompatibleVersion { .. } | SessionError::UnexpectedChannel(_) => true,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
