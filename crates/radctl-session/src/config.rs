use std::time::Duration;

use radctl_frame::FrameConfig;

/// Handshake magic: the daemon must echo `(MAGIC, 0)` back unchanged.
pub const MAGIC: u32 = 0xF7EE_AD16;

/// Byte order of the 4-byte `CMD_STATUS` payload.
///
/// Header fields are always big-endian. The status word is written by the
/// daemon in its host order, which for a local socket is ours, so `Native` is
/// the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusByteOrder {
    #[default]
    Native,
    Big,
    Little,
}

impl StatusByteOrder {
    /// Decode a status word.
    pub fn decode(self, raw: [u8; 4]) -> u32 {
        match self {
            StatusByteOrder::Native => u32::from_ne_bytes(raw),
            StatusByteOrder::Big => u32::from_be_bytes(raw),
            StatusByteOrder::Little => u32::from_le_bytes(raw),
        }
    }
}

/// Control session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Handshake magic. Only change this to talk to a nonstandard daemon.
    pub magic: u32,
    /// Deadline for each blocking read. `None` waits for the daemon forever.
    pub read_timeout: Option<Duration>,
    /// Deadline for each blocking write.
    pub write_timeout: Option<Duration>,
    /// How to decode `CMD_STATUS` payloads.
    pub status_byte_order: StatusByteOrder,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            magic: MAGIC,
            read_timeout: None,
            write_timeout: None,
            status_byte_order: StatusByteOrder::default(),
        }
    }
}

impl SessionConfig {
    /// Apply the same deadline to reads and writes.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self.write_timeout = Some(timeout);
        self
    }

    /// Frame-layer view of the deadlines.
    pub fn frame_config(&self) -> FrameConfig {
        FrameConfig {
            read_timeout: self.read_timeout,
            write_timeout: self.write_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_byte_orders() {
        let raw = [0x01, 0x00, 0x00, 0x00];
        assert_eq!(StatusByteOrder::Little.decode(raw), 1);
        assert_eq!(StatusByteOrder::Big.decode(raw), 0x0100_0000);
        assert_eq!(
            StatusByteOrder::Native.decode(raw),
            u32::from_ne_bytes(raw)
        );
    }

    #[test]
    fn default_has_protocol_magic_and_no_deadline() {
        let cfg = SessionConfig::default();
        assert_eq!(cfg.magic, 0xF7EEAD16);
        assert!(cfg.read_timeout.is_none());
        assert!(cfg.write_timeout.is_none());
        assert_eq!(cfg.status_byte_order, StatusByteOrder::Native);
    }

    #[test]
    fn with_timeout_sets_both_directions() {
        let cfg = SessionConfig::default().with_timeout(Duration::from_secs(2));
        let frame = cfg.frame_config();
        assert_eq!(frame.read_timeout, Some(Duration::from_secs(2)));
        assert_eq!(frame.write_timeout, Some(Duration::from_secs(2)));
    }
}
