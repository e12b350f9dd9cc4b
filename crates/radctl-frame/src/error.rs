use std::io::ErrorKind;

/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The header carries a channel tag outside the known set.
    #[error("unknown channel tag {0}")]
    UnknownChannel(u32),

    /// The stream ended part-way through a frame header.
    #[error("short frame header ({got} of 8 bytes)")]
    ShortHeader { got: usize },

    /// The payload does not fit the 32-bit length field.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The stream ended while discarding payload beyond the receive capacity.
    #[error("connection closed while discarding oversized payload ({remaining} bytes left)")]
    DrainAborted { remaining: u64 },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The connection was closed before a complete frame was exchanged.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

impl FrameError {
    /// True when a socket deadline expired.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            FrameError::Io(err)
                if err.kind() == ErrorKind::WouldBlock || err.kind() == ErrorKind::TimedOut
        )
    }

    /// True when the error is a malformed frame rather than a broken stream.
    pub fn is_protocol(&self) -> bool {
        matches!(
            self,
            FrameError::UnknownChannel(_)
                | FrameError::ShortHeader { .. }
                | FrameError::PayloadTooLarge { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
