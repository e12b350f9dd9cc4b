use std::fmt;
use std::io;

use radctl_frame::FrameError;
use radctl_session::{CommandOutcome, SessionError};
use radctl_transport::TransportError;

// Exit codes follow the sysexits-style layout shared with our other tools.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Exit code for a finished command: its status when it fits, else failure.
pub fn outcome_code(outcome: &CommandOutcome) -> i32 {
    match outcome {
        CommandOutcome::Status(status) => u8::try_from(*status).map_or(FAILURE, i32::from),
        CommandOutcome::Failed { .. } => FAILURE,
    }
}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        _ => TRANSPORT_ERROR,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Connect { source, .. } | TransportError::Io(source) => {
            io_error(context, source)
        }
        other @ TransportError::PathTooLong { .. } => {
            CliError::new(USAGE, format!("{context}: {other}"))
        }
    }
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        FrameError::ConnectionClosed | FrameError::DrainAborted { .. } => {
            CliError::new(TRANSPORT_ERROR, format!("{context}: {err}"))
        }
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}

pub fn session_error(context: &str, err: SessionError) -> CliError {
    match err {
        SessionError::Transport(err) => transport_error(context, err),
        SessionError::Frame(err) => frame_error(context, err),
        SessionError::EmptyHandshake => {
            CliError::new(TRANSPORT_ERROR, format!("{context}: {err}"))
        }
        SessionError::IncompatibleVersion { .. } | SessionError::UnexpectedChannel(_) => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_maps_to_exit_code() {
        assert_eq!(outcome_code(&CommandOutcome::Status(0)), SUCCESS);
        assert_eq!(outcome_code(&CommandOutcome::Status(2)), 2);
        assert_eq!(outcome_code(&CommandOutcome::Status(4096)), FAILURE);
        assert_eq!(
            outcome_code(&CommandOutcome::Failed {
                message: "no".to_string()
            }),
            FAILURE
        );
    }

    #[test]
    fn timeouts_map_to_timeout_code() {
        let err = SessionError::Frame(FrameError::Io(io::Error::from(io::ErrorKind::WouldBlock)));
        assert_eq!(session_error("run", err).code, TIMEOUT);
    }

    #[test]
    fn protocol_errors_map_to_data_invalid() {
        let err = session_error(
            "connect",
            SessionError::IncompatibleVersion {
                channel: radctl_frame::Channel::InitAck,
                len: 8,
            },
        );
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.message.starts_with("connect: incompatible version"));

        let err = session_error("run", SessionError::Frame(FrameError::UnknownChannel(9)));
        assert_eq!(err.code, DATA_INVALID);
    }

    #[test]
    fn missing_socket_is_transport_error() {
        let err = TransportError::Connect {
            path: "/nonexistent.sock".into(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert_eq!(transport_error("connect", err).code, TRANSPORT_ERROR);
    }
}
