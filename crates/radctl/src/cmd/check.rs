use radctl_session::{connect_with_config, SessionConfig};

use crate::cmd::{parse_duration, CheckArgs};
use crate::exit::{session_error, CliResult, SUCCESS};
use crate::output::{print_json, CheckRecord, OutputFormat};

pub fn run(args: CheckArgs, format: OutputFormat) -> CliResult<i32> {
    let config = SessionConfig::default().with_timeout(parse_duration(&args.timeout)?);
    let session = connect_with_config(&args.socket, &config)
        .map_err(|err| session_error("handshake failed", err))?;

    let creds = session.peer_credentials();
    let socket = args.socket.display().to_string();
    let record = CheckRecord {
        socket: &socket,
        handshake: "ok",
        magic: format!("{:#010x}", config.magic),
        peer_uid: creds.map(|(uid, _, _)| uid),
        peer_gid: creds.map(|(_, gid, _)| gid),
        peer_pid: creds.map(|(_, _, pid)| pid),
    };
    session.close();

    match format {
        OutputFormat::Json => print_json(&record)?,
        OutputFormat::Text => {
            println!("socket:    {}", record.socket);
            println!("handshake: {} (magic {})", record.handshake, record.magic);
            match creds {
                Some((uid, gid, pid)) => println!("daemon:    pid={pid} uid={uid} gid={gid}"),
                None => println!("daemon:    credentials unavailable"),
            }
        }
    }

    Ok(SUCCESS)
}
