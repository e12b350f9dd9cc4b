//! Client for the RADIUS daemon's framed control socket.
//!
//! The daemon multiplexes command input, output, errors and exit status over
//! one Unix domain socket using channel-tagged, length-prefixed frames.
//!
//! # Crate Structure
//!
//! - [`transport`]: Connected control socket stream
//! - [`frame`]: Channel framing with oversized-payload draining
//! - [`session`]: Handshake and command execution
//!
//! ```no_run
//! use radctl::session::{connect, StdioOutput};
//!
//! let mut session = connect("/var/run/radiusd/radiusd.sock")?;
//! let outcome = session.run_command("show uptime", &mut StdioOutput)?;
//! println!("exit code {}", outcome.exit_code());
//! # Ok::<(), radctl::session::SessionError>(())
//! ```

/// Re-export transport types.
pub mod transport {
    pub use radctl_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use radctl_frame::*;
}

/// Re-export session types.
pub mod session {
    pub use radctl_session::*;
}
