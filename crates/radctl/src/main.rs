mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "radctl",
    version,
    about = "Run commands over the RADIUS daemon's control socket"
)]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    format: OutputFormat,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr). RADCTL_LOG overrides this with a filter directive.
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    match cmd::run(cli.command, cli.format) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_subcommand_with_words() {
        let cli = Cli::try_parse_from([
            "radctl",
            "run",
            "--socket",
            "/tmp/control.sock",
            "show",
            "client",
            "list",
        ])
        .expect("run args should parse");

        match cli.command {
            Command::Run(args) => assert_eq!(args.command, vec!["show", "client", "list"]),
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn parses_check_subcommand() {
        let cli = Cli::try_parse_from([
            "radctl",
            "--format",
            "json",
            "check",
            "-s",
            "/tmp/control.sock",
            "--timeout",
            "500ms",
        ])
        .expect("check args should parse");
        assert!(matches!(cli.command, Command::Check(_)));
        assert!(matches!(cli.format, OutputFormat::Json));
    }

    #[test]
    fn rejects_unknown_status_order() {
        let err = Cli::try_parse_from([
            "radctl",
            "run",
            "-s",
            "/tmp/control.sock",
            "--status-byte-order",
            "middle",
            "stats",
        ])
        .expect_err("unknown byte order should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }
}
