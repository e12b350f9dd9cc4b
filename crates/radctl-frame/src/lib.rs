//! Channel-tagged, length-prefixed framing for the control socket.
//!
//! Every message on the wire is framed with an 8-byte header:
//! - A 4-byte big-endian channel tag (see [`Channel`])
//! - A 4-byte big-endian payload length
//!
//! The reader always hands up whole frames. When the daemon declares more
//! payload than the caller is willing to buffer, the excess is drained from
//! the stream so the next frame starts on a header boundary.

pub mod channel;
pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use channel::Channel;
pub use codec::{encode_frame, Frame, FrameConfig, FrameHeader, HEADER_SIZE};
pub use error::{FrameError, Result};
pub use reader::{ChannelReader, DRAIN_CHUNK_SIZE};
pub use writer::ChannelWriter;
