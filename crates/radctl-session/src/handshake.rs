use std::io::{Read, Write};

use bytes::{BufMut, Bytes, BytesMut};
use radctl_frame::{Channel, ChannelReader, ChannelWriter, FrameError};
use tracing::{debug, trace};

use crate::error::{Result, SessionError};

/// Receive capacity for the handshake reply; anything longer is a mismatch.
pub const HANDSHAKE_CAPACITY: usize = 8;

/// Build the 8-byte INIT_ACK payload: big-endian `(magic, 0)`.
pub fn handshake_payload(magic: u32) -> Bytes {
    let mut buf = BytesMut::with_capacity(HANDSHAKE_CAPACITY);
    buf.put_u32(magic);
    buf.put_u32(0);
    buf.freeze()
}

/// Perform the client side of the echo handshake.
///
/// Sends `(magic, 0)` on INIT_ACK and requires the daemon to send the exact
/// same 8 bytes back on INIT_ACK. There is no negotiation: any difference in
/// channel, length or content is fatal.
///
/// This leaves the stream alone on failure; [`PendingSession::handshake`]
/// is responsible for closing it.
///
/// [`PendingSession::handshake`]: crate::PendingSession::handshake
pub fn handshake_client<R: Read, W: Write>(
    reader: &mut ChannelReader<R>,
    writer: &mut ChannelWriter<W>,
    magic: u32,
) -> Result<()> {
    let payload = handshake_payload(magic);
    writer.send(Channel::InitAck, &payload)?;
    trace!("sent handshake magic {magic:#010x}");

    let reply = match reader.receive(HANDSHAKE_CAPACITY) {
        Ok(frame) => frame,
        Err(FrameError::ConnectionClosed) => return Err(SessionError::EmptyHandshake),
        Err(err) => return Err(err.into()),
    };

    if reply.payload.is_empty() {
        return Err(SessionError::EmptyHandshake);
    }

    if reply.channel != Channel::InitAck
        || reply.declared_len as usize != HANDSHAKE_CAPACITY
        || reply.payload != payload
    {
        return Err(SessionError::IncompatibleVersion {
            channel: reply.channel,
            len: reply.declared_len as usize,
        });
    }

    debug!("control handshake accepted");
    Ok(())
}
