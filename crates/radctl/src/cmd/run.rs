use std::io::BufRead;

use radctl_session::{
    connect_with_config, CollectedOutput, CommandOutcome, CommandOutput, SessionError,
    SocketSession, StdioOutput,
};

use crate::cmd::{session_config, RunArgs};
use crate::exit::{io_error, outcome_code, session_error, CliError, CliResult, USAGE};
use crate::output::{print_json, CommandRecord, OutputFormat};

pub fn run(args: RunArgs, format: OutputFormat) -> CliResult<i32> {
    let config = session_config(args.timeout.as_deref(), args.status_byte_order)?;
    let mut session = connect_with_config(&args.socket, &config)
        .map_err(|err| session_error("connect failed", err))?;

    let code = if args.command.is_empty() {
        let stdin = std::io::stdin();
        run_lines(stdin.lock(), |command| execute(&mut session, command, format))?
    } else {
        let command = args.command.join(" ");
        execute(&mut session, &command, format)?
    };

    session.close();
    Ok(code)
}

/// Run each non-blank, non-comment line. The last command's code wins.
fn run_lines<B, F>(input: B, mut exec: F) -> CliResult<i32>
where
    B: BufRead,
    F: FnMut(&str) -> CliResult<i32>,
{
    let mut code = None;
    for line in input.lines() {
        let line = line.map_err(|err| io_error("failed reading commands", err))?;
        let command = line.trim();
        if command.is_empty() || command.starts_with('#') {
            continue;
        }
        code = Some(exec(command)?);
    }
    code.ok_or_else(|| CliError::new(USAGE, "no command given"))
}

trait CommandRunner {
    fn run(
        &mut self,
        command: &str,
        output: &mut dyn CommandOutput,
    ) -> Result<CommandOutcome, SessionError>;
}

impl CommandRunner for SocketSession {
    fn run(
        &mut self,
        command: &str,
        output: &mut dyn CommandOutput,
    ) -> Result<CommandOutcome, SessionError> {
        self.run_command(command, output)
    }
}

fn execute<R: CommandRunner>(
    runner: &mut R,
    command: &str,
    format: OutputFormat,
) -> CliResult<i32> {
    match format {
        OutputFormat::Text => {
            let outcome = runner
                .run(command, &mut StdioOutput)
                .map_err(|err| session_error("command failed", err))?;
            Ok(outcome_code(&outcome))
        }
        OutputFormat::Json => {
            let mut output = CollectedOutput::default();
            let outcome = runner
                .run(command, &mut output)
                .map_err(|err| session_error("command failed", err))?;
            print_json(&CommandRecord::new(command, &outcome, &output))?;
            Ok(outcome_code(&outcome))
        }
    }
}
