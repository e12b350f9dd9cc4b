use std::io::Write;

use clap::ValueEnum;
use radctl_session::{CollectedOutput, CommandOutcome};
use serde::Serialize;

use crate::exit::{CliError, CliResult, INTERNAL};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Stream command output as it arrives.
    Text,
    /// One JSON object per command.
    Json,
}

#[derive(Debug, Serialize)]
pub struct CommandRecord<'a> {
    pub command: &'a str,
    /// Exit status reported by the daemon; absent when it wrote to STDERR.
    pub status: Option<u32>,
    pub stdout: &'a [String],
    pub error: Option<&'a str>,
}

impl<'a> CommandRecord<'a> {
    pub fn new(command: &'a str, outcome: &'a CommandOutcome, output: &'a CollectedOutput) -> Self {
        let (status, error) = match outcome {
            CommandOutcome::Status(status) => (Some(*status), None),
            CommandOutcome::Failed { message } => (None, Some(message.as_str())),
        };
        Self {
            command,
            status,
            stdout: &output.stdout,
            error,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CheckRecord<'a> {
    pub socket: &'a str,
    pub handshake: &'static str,
    pub magic: String,
    pub peer_uid: Option<u32>,
    pub peer_gid: Option<u32>,
    pub peer_pid: Option<u32>,
}

pub fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    let line = serde_json::to_string(value)
        .map_err(|err| CliError::new(INTERNAL, format!("failed to encode output: {err}")))?;
    let mut out = std::io::stdout().lock();
    let _ = writeln!(out, "{line}");
    let _ = out.flush();
    Ok(())
}
