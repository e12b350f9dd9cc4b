//! Channel tags.
//!
//! The set is closed: anything outside 0..=7 is a protocol error.

use std::fmt;

use crate::error::FrameError;

/// Logical sub-stream a frame belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Channel {
    /// Command text, client to daemon.
    Stdin = 0,
    /// Command output, daemon to client.
    Stdout = 1,
    /// Command error text; ends a command.
    Stderr = 2,
    /// Command exit status; ends a command.
    CmdStatus = 3,
    /// Handshake magic exchange.
    InitAck = 4,
    AuthChallenge = 5,
    AuthResponse = 6,
    WantMore = 7,
}

impl Channel {
    /// Every channel, in tag order.
    pub const ALL: [Channel; 8] = [
        Channel::Stdin,
        Channel::Stdout,
        Channel::Stderr,
        Channel::CmdStatus,
        Channel::InitAck,
        Channel::AuthChallenge,
        Channel::AuthResponse,
        Channel::WantMore,
    ];

    /// The wire tag.
    pub fn as_u32(self) -> u32 {
        self as u32
    }

    /// Returns a human-readable name for the channel.
    pub fn name(self) -> &'static str {
        match self {
            Channel::Stdin => "STDIN",
            Channel::Stdout => "STDOUT",
            Channel::Stderr => "STDERR",
            Channel::CmdStatus => "CMD_STATUS",
            Channel::InitAck => "INIT_ACK",
            Channel::AuthChallenge => "AUTH_CHALLENGE",
            Channel::AuthResponse => "AUTH_RESPONSE",
            Channel::WantMore => "WANT_MORE",
        }
    }
}

impl TryFrom<u32> for Channel {
    type Error = FrameError;

    fn try_from(tag: u32) -> Result<Self, Self::Error> {
        Channel::ALL
            .get(tag as usize)
            .copied()
            .ok_or(FrameError::UnknownChannel(tag))
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
