use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand, ValueEnum};
use radctl_session::{SessionConfig, StatusByteOrder};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod check;
pub mod run;
pub mod version;

/// Environment variable consulted when `--socket` is not given.
pub const SOCKET_ENV: &str = "RADCTL_SOCKET";

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a command, or one command per stdin line.
    Run(RunArgs),
    /// Connect and handshake without running anything.
    Check(CheckArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Run(args) => run::run(args, format),
        Command::Check(args) => check::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum StatusOrderArg {
    Native,
    Big,
    Little,
}

impl From<StatusOrderArg> for StatusByteOrder {
    fn from(arg: StatusOrderArg) -> Self {
        match arg {
            StatusOrderArg::Native => StatusByteOrder::Native,
            StatusOrderArg::Big => StatusByteOrder::Big,
            StatusOrderArg::Little => StatusByteOrder::Little,
        }
    }
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Control socket path.
    #[arg(long, short = 's', env = SOCKET_ENV)]
    pub socket: PathBuf,
    /// Deadline for each socket read and write (e.g. 30s, 500ms). Default: none.
    #[arg(long)]
    pub timeout: Option<String>,
    /// Byte order of the daemon's exit status word.
    #[arg(long, value_enum, default_value = "native")]
    pub status_byte_order: StatusOrderArg,
    /// Command words, joined with spaces.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Control socket path.
    #[arg(long, short = 's', env = SOCKET_ENV)]
    pub socket: PathBuf,
    /// Handshake deadline (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub timeout: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show build target and compiled features.
    #[arg(long)]
    pub extended: bool,
}

pub fn session_config(
    timeout: Option<&str>,
    status_byte_order: StatusOrderArg,
) -> CliResult<SessionConfig> {
    let mut config = SessionConfig {
        status_byte_order: status_byte_order.into(),
        ..SessionConfig::default()
    };
    if let Some(timeout) = timeout {
        config = config.with_timeout(parse_duration(timeout)?);
    }
    Ok(config)
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    if millis {
        Ok(Duration::from_millis(value))
    } else {
        Ok(Duration::from_secs(value))
    }
}
