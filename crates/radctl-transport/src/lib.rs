//! Byte-stream transport for the control socket.
//!
//! The control daemon listens on a local Unix domain socket. This crate owns
//! the connected stream and the knobs the upper layers need from it
//! (deadlines, cloning into reader/writer halves, shutdown). It knows nothing
//! about framing; see `radctl-frame` for that.

pub mod error;

#[cfg(unix)]
pub mod stream;
#[cfg(unix)]
pub mod uds;

pub use error::{Result, TransportError};
#[cfg(unix)]
pub use stream::ControlStream;
#[cfg(unix)]
pub use uds::connect;
