use std::borrow::Cow;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::channel::Channel;
use crate::error::{FrameError, Result};

/// Frame header: channel tag (4) + length (4) = 8 bytes.
pub const HEADER_SIZE: usize = 8;

/// Raw frame header as it appears on the wire.
///
/// The tag is kept undecoded so the reader can consume a frame with an
/// unknown tag before rejecting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Channel tag.
    pub tag: u32,
    /// Declared payload length in bytes.
    pub length: u32,
}

impl FrameHeader {
    /// Encode the header into a byte buffer.
    pub fn encode(&self, dst: &mut BytesMut) {
        dst.reserve(HEADER_SIZE);
        dst.put_u32(self.tag);
        dst.put_u32(self.length);
    }

    /// Decode a header from exactly [`HEADER_SIZE`] bytes.
    pub fn decode(src: &[u8; HEADER_SIZE]) -> Self {
        let mut src = &src[..];
        let tag = src.get_u32();
        let length = src.get_u32();
        Self { tag, length }
    }

    /// The channel named by the tag.
    pub fn channel(&self) -> Result<Channel> {
        Channel::try_from(self.tag)
    }
}

/// A received frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The channel this frame belongs to.
    pub channel: Channel,
    /// Captured payload, at most the receive capacity.
    pub payload: Bytes,
    /// Length the sender declared in the header.
    pub declared_len: u32,
}

impl Frame {
    /// Create a frame whose payload was captured in full.
    pub fn new(channel: Channel, payload: impl Into<Bytes>) -> Self {
        let payload = payload.into();
        let declared_len = payload.len() as u32;
        Self {
            channel,
            payload,
            declared_len,
        }
    }

    /// True if part of the declared payload was discarded.
    pub fn is_truncated(&self) -> bool {
        self.payload.len() < self.declared_len as usize
    }

    /// Payload as text with trailing whitespace removed.
    ///
    /// Invalid UTF-8 is replaced rather than rejected; the daemon's output is
    /// meant for humans.
    pub fn text(&self) -> Cow<'_, str> {
        match String::from_utf8_lossy(&self.payload) {
            Cow::Borrowed(text) => Cow::Borrowed(text.trim_end()),
            Cow::Owned(text) => Cow::Owned(text.trim_end().to_string()),
        }
    }

    /// The total wire size of this frame (header + declared payload).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.declared_len as usize
    }
}

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────────────┬──────────────┬──────────────────┐
/// │ Channel (4B) │ Length (4B)  │ Payload          │
/// │ big-endian   │ big-endian   │ (Length bytes)   │
/// └──────────────┴──────────────┴──────────────────┘
/// ```
pub fn encode_frame(channel: Channel, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    let length = u32::try_from(payload.len()).map_err(|_| FrameError::PayloadTooLarge {
        size: payload.len(),
        max: u32::MAX as usize,
    })?;
    dst.reserve(HEADER_SIZE + payload.len());
    FrameHeader {
        tag: channel.as_u32(),
        length,
    }
    .encode(dst);
    dst.put_slice(payload);
    Ok(())
}

/// Socket deadlines applied when framing a [`ControlStream`].
///
/// [`ControlStream`]: radctl_transport::ControlStream
#[derive(Debug, Clone, Default)]
pub struct FrameConfig {
    /// Read timeout for blocking operations.
    pub read_timeout: Option<std::time::Duration>,
    /// Write timeout for blocking operations.
    pub write_timeout: Option<std::time::Duration>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_is_big_endian() {
        let mut buf = BytesMut::new();
        encode_frame(Channel::InitAck, b"abc", &mut buf).unwrap();

        assert_eq!(&buf[..HEADER_SIZE], &[0, 0, 0, 4, 0, 0, 0, 3]);
        assert_eq!(&buf[HEADER_SIZE..], b"abc");
    }

    #[test]
    fn test_header_decode() {
        let raw = [0, 0, 0, 3, 0x01, 0x02, 0x03, 0x04];
        let header = FrameHeader::decode(&raw);

        assert_eq!(header.tag, 3);
        assert_eq!(header.length, 0x0102_0304);
        assert_eq!(header.channel().unwrap(), Channel::CmdStatus);
    }

    #[test]
    fn test_header_unknown_channel() {
        let header = FrameHeader::decode(&[0, 0, 1, 0, 0, 0, 0, 0]);
        assert!(matches!(
            header.channel(),
            Err(FrameError::UnknownChannel(256))
        ));
    }

    #[test]
    fn test_empty_payload() {
        let mut buf = BytesMut::new();
        encode_frame(Channel::Stdin, b"", &mut buf).unwrap();
        assert_eq!(buf.len(), HEADER_SIZE);
    }

    #[test]
    fn test_text_trims_trailing_whitespace() {
        let frame = Frame::new(Channel::Stdout, &b"  client list\r\n\n"[..]);
        assert_eq!(frame.text(), "  client list");
    }

    #[test]
    fn test_text_replaces_invalid_utf8() {
        let frame = Frame::new(Channel::Stderr, vec![b'o', b'k', 0xFF, b'\n']);
        assert_eq!(frame.text(), "ok\u{FFFD}");
    }

    #[test]
    fn test_truncation_and_wire_size() {
        let frame = Frame {
            channel: Channel::Stdout,
            payload: Bytes::from_static(b"abcd"),
            declared_len: 100,
        };
        assert!(frame.is_truncated());
        assert_eq!(frame.wire_size(), HEADER_SIZE + 100);
        assert!(!Frame::new(Channel::Stdout, &b"abcd"[..]).is_truncated());
    }
}
