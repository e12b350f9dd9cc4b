//! Control session over the daemon's control socket.
//!
//! A session starts as a [`PendingSession`]. Its handshake sends a magic
//! number on the INIT_ACK channel and requires the daemon to echo it back
//! verbatim, which yields a [`ControlSession`]. Each
//! [`run_command`](ControlSession::run_command) then sends the command on
//! STDIN and relays STDOUT frames until CMD_STATUS or STDERR ends it.
//!
//! Everything is blocking and single-threaded. The daemon is trusted to
//! eventually send a terminal frame; set a read deadline through
//! [`SessionConfig`] when that trust is not enough.

pub mod command;
pub mod config;
pub mod error;
pub mod handshake;
pub mod session;

#[cfg(unix)]
pub mod connector;

pub use command::{
    run_command, CollectedOutput, CommandOutcome, CommandOutput, StdioOutput,
    COMMAND_FRAME_CAPACITY, DEGRADED_STATUS,
};
pub use config::{SessionConfig, StatusByteOrder, MAGIC};
pub use error::{Result, SessionError};
pub use handshake::{handshake_client, handshake_payload, HANDSHAKE_CAPACITY};
pub use session::{ControlSession, PendingSession};

#[cfg(unix)]
pub use connector::{connect, connect_with_config, SocketSession};
