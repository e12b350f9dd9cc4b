use std::io::{Read, Write};

use radctl_frame::{Channel, ChannelReader, ChannelWriter, Frame};
use tracing::{debug, warn};

use crate::config::StatusByteOrder;
use crate::error::{Result, SessionError};

/// Per-frame receive capacity while a command runs.
pub const COMMAND_FRAME_CAPACITY: usize = 1024;

/// Status reported when the daemon's `CMD_STATUS` payload is too short to decode.
pub const DEGRADED_STATUS: u32 = 1;

/// How a command finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The daemon reported an exit status on `CMD_STATUS`.
    Status(u32),
    /// The daemon wrote to `STDERR`, which ends the command.
    Failed { message: String },
}

impl CommandOutcome {
    /// Process-style result code: the status, or -1 for a `STDERR` failure.
    pub fn exit_code(&self) -> i64 {
        match self {
            CommandOutcome::Status(status) => i64::from(*status),
            CommandOutcome::Failed { .. } => -1,
        }
    }

    /// True only for status 0.
    pub fn is_success(&self) -> bool {
        matches!(self, CommandOutcome::Status(0))
    }
}

/// Receives command output as it arrives.
pub trait CommandOutput {
    /// One `STDOUT` frame, trailing whitespace trimmed.
    fn stdout(&mut self, text: &str);
    /// The `STDERR` frame that ended the command.
    fn stderr(&mut self, text: &str);
}

/// Writes output to the process's stdout and stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdioOutput;

impl CommandOutput for StdioOutput {
    fn stdout(&mut self, text: &str) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{text}");
        let _ = out.flush();
    }

    fn stderr(&mut self, text: &str) {
        let _ = writeln!(std::io::stderr().lock(), "{text}");
    }
}

/// Buffers output in memory.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CollectedOutput {
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
}

impl CommandOutput for CollectedOutput {
    fn stdout(&mut self, text: &str) {
        self.stdout.push(text.to_string());
    }

    fn stderr(&mut self, text: &str) {
        self.stderr.push(text.to_string());
    }
}

/// Send `command` on STDIN and interpret frames until a terminal one arrives.
///
/// STDOUT frames are forwarded to `output` and the loop continues.
/// CMD_STATUS and STDERR end the command. Any other channel is a protocol
/// violation.
///
/// There is no bound on how many STDOUT frames may arrive or how long the
/// daemon may take: the call returns only when the daemon sends a terminal
/// frame or the stream fails. Bound it with a read deadline on the stream.
pub fn run_command<R, W, O>(
    reader: &mut ChannelReader<R>,
    writer: &mut ChannelWriter<W>,
    command: &str,
    status_order: StatusByteOrder,
    output: &mut O,
) -> Result<CommandOutcome>
where
    R: Read,
    W: Write,
    O: CommandOutput + ?Sized,
{
    writer.send(Channel::Stdin, command.as_bytes())?;
    debug!(command, "command sent");

    loop {
        let frame = reader.receive(COMMAND_FRAME_CAPACITY)?;
        if frame.is_truncated() {
            debug!(
                channel = %frame.channel,
                declared = frame.declared_len,
                "frame exceeded receive capacity; output truncated"
            );
        }

        match frame.channel {
            Channel::Stdout => output.stdout(&frame.text()),
            Channel::CmdStatus => {
                let outcome = CommandOutcome::Status(decode_status(&frame, status_order));
                debug!(command, ?outcome, "command finished");
                return Ok(outcome);
            }
            Channel::Stderr => {
                let message = frame.text().into_owned();
                output.stderr(&message);
                debug!(command, "command failed");
                return Ok(CommandOutcome::Failed { message });
            }
            other => return Err(SessionError::UnexpectedChannel(other)),
        }
    }
}

fn decode_status(frame: &Frame, order: StatusByteOrder) -> u32 {
    let raw = frame
        .payload
        .get(..4)
        .and_then(|word| <[u8; 4]>::try_from(word).ok());
    match raw {
        Some(raw) => order.decode(raw),
        None => {
            warn!(
                len = frame.payload.len(),
                "status payload shorter than 4 bytes"
            );
            DEGRADED_STATUS
        }
    }
}
