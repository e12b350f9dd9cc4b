use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    println!("radctl {}", env!("CARGO_PKG_VERSION"));
    if !args.extended {
        return Ok(SUCCESS);
    }

    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!(
        "protocol: magic={:#010x} frame_header=8 command_capacity={}",
        radctl_session::MAGIC,
        radctl_session::COMMAND_FRAME_CAPACITY
    );

    Ok(SUCCESS)
}
