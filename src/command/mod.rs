use std::io::Write;

use crate::communication::LineHandle;

mod error;
pub use error::CommandError;
mod handlers;
pub use handlers::PING_RESPONSE;
mod parse;
pub use parse::{Command, CommandLine};

pub type CommandResult<T = ()> = Result<T, CommandError>;

/// What the loop does after a line was processed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Closed,
}

/// Main routine. Reads lines from `com` and processes them until a `close` command arrives.
///
/// Any error ends the loop and is returned. `com` is dropped on return, so the transport is
/// released on every path.
pub fn run(mut com: impl LineHandle, out: &mut impl Write) -> CommandResult {
    loop {
        let line = com.receive_line()?;
        if process_line(&mut com, &line, out)? == Flow::Closed {
            return Ok(());
        }
    }
}

/// Echoes `line` to `out`, then executes the command it contains
pub fn process_line(
    com: &mut impl LineHandle,
    line: &str,
    out: &mut impl Write,
) -> CommandResult<Flow> {
    let command_line = CommandLine::parse(line);
    writeln!(out, "{command_line}").map_err(CommandError::Output)?;

    let command = Command::try_from(&command_line).inspect_err(|e| {
        log::error!("Could not parse {line:?}: {e}");
    })?;
    log::info!("Received {command:?}");

    match command {
        Command::Ping => handlers::ping(com)?,
        Command::Flood(size) => handlers::flood(com, size)?,
        Command::Close => {
            handlers::close(com)?;
            return Ok(Flow::Closed);
        }
        Command::Unknown(_) => (),
    }

    Ok(Flow::Continue)
}
