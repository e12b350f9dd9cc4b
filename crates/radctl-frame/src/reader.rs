use std::io::{ErrorKind, Read};

use bytes::BytesMut;
#[cfg(unix)]
use radctl_transport::ControlStream;
use radctl_transport::TransportError;
use tracing::{debug, trace};

use crate::codec::{Frame, FrameConfig, FrameHeader, HEADER_SIZE};
use crate::error::{FrameError, Result};

/// Bytes discarded per read when draining an oversized payload.
pub const DRAIN_CHUNK_SIZE: usize = 64;

/// Reads complete frames from any `Read` stream.
///
/// Handles partial reads internally; callers always get complete frames,
/// and the stream is left on a header boundary after every successful call.
pub struct ChannelReader<T> {
    inner: T,
    config: FrameConfig,
}

impl<T: Read> ChannelReader<T> {
    /// Create a new channel reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new channel reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self { inner, config }
    }

    /// Receive the next frame, keeping at most `capacity` payload bytes (blocking).
    ///
    /// Payload declared beyond `capacity` is read off the wire in
    /// [`DRAIN_CHUNK_SIZE`] pieces and dropped. The returned frame keeps the
    /// declared length so callers can tell it was truncated.
    ///
    /// Returns `Err(FrameError::ConnectionClosed)` when EOF is reached before
    /// a header or in the middle of a payload.
    pub fn receive(&mut self, capacity: usize) -> Result<Frame> {
        let header = self.read_header()?;
        trace!(tag = header.tag, length = header.length, "frame header");

        let captured = (header.length as usize).min(capacity);
        let mut payload = BytesMut::zeroed(captured);
        if read_full(&mut self.inner, &mut payload)? < captured {
            return Err(FrameError::ConnectionClosed);
        }

        let excess = u64::from(header.length) - captured as u64;
        if excess > 0 {
            debug!(
                tag = header.tag,
                declared = header.length,
                capacity,
                excess,
                "discarding oversized frame payload"
            );
            self.drain(excess)?;
        }

        // Validated last so an unknown tag still leaves the stream aligned.
        let channel = header.channel()?;

        Ok(Frame {
            channel,
            payload: payload.freeze(),
            declared_len: header.length,
        })
    }

    fn read_header(&mut self) -> Result<FrameHeader> {
        let mut raw = [0u8; HEADER_SIZE];
        match read_full(&mut self.inner, &mut raw)? {
            0 => Err(FrameError::ConnectionClosed),
            HEADER_SIZE => Ok(FrameHeader::decode(&raw)),
            got => Err(FrameError::ShortHeader { got }),
        }
    }

    fn drain(&mut self, mut remaining: u64) -> Result<()> {
        let mut chunk = [0u8; DRAIN_CHUNK_SIZE];
        while remaining > 0 {
            let want = remaining.min(DRAIN_CHUNK_SIZE as u64) as usize;
            let got = read_full(&mut self.inner, &mut chunk[..want])?;
            remaining -= got as u64;
            if got < want {
                return Err(FrameError::DrainAborted { remaining });
            }
        }
        Ok(())
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current channel reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

#[cfg(unix)]
impl ChannelReader<ControlStream> {
    /// Create a channel reader for `ControlStream` and apply read timeout from config.
    pub fn with_config_stream(inner: ControlStream, config: FrameConfig) -> Result<Self> {
        inner
            .set_read_timeout(config.read_timeout)
            .map_err(transport_to_frame_error)?;
        Ok(Self::with_config(inner, config))
    }
}

/// Read until `buf` is full or EOF. Returns the number of bytes read.
fn read_full<R: Read>(inner: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0usize;
    while filled < buf.len() {
        match inner.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(FrameError::Io(err)),
        }
    }
    Ok(filled)
}

pub(crate) fn transport_to_frame_error(err: TransportError) -> FrameError {
    match err {
        TransportError::Io(io) | TransportError::Connect { source: io, .. } => FrameError::Io(io),
        other => FrameError::Io(std::io::Error::other(other.to_string())),
    }
}
