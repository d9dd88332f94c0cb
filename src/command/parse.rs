use std::{fmt, num::ParseIntError};

use super::CommandError;

/// A received line, split on runs of whitespace.
///
/// Leading and trailing whitespace produce an empty first or last token, so an empty line
/// still has an (empty) command name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    argv: Vec<String>,
}

impl CommandLine {
    pub fn parse(line: &str) -> Self {
        let pieces: Vec<&str> = line.split(is_separator).collect();
        let last = pieces.len() - 1;

        let argv = pieces
            .iter()
            .enumerate()
            .filter(|(i, piece)| !piece.is_empty() || *i == 0 || *i == last)
            .map(|(_, piece)| piece.to_string())
            .collect();

        Self { argv }
    }

    /// The first token, as received
    pub fn name(&self) -> &str {
        &self.argv[0]
    }

    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }
}

/// Whitespace as the line protocol understands it. The ASCII file, group, record and unit
/// separators count as whitespace too.
fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}

/// Parses a flood size. Single `_` between digits is accepted as a digit separator, `1_000`.
fn parse_size(token: &str) -> Result<usize, ParseIntError> {
    let digits = token.strip_prefix('+').unwrap_or(token);
    let separators_valid = digits.bytes().all(|b| b.is_ascii_digit() || b == b'_')
        && !digits.starts_with('_')
        && !digits.ends_with('_')
        && !digits.contains("__");

    if separators_valid {
        digits.replace('_', "").parse()
    } else {
        token.parse()
    }
}

/// Console representation: `$NAME arg1 arg2`. The separating space is always present.
impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${} {}", self.name().to_ascii_uppercase(), self.args().join(" "))
    }
}

#[derive(Clone, Copy, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
enum Keyword {
    Ping,
    Flood,
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Answer with a single `0x01` byte
    Ping,
    /// Send this many zero bytes
    Flood(usize),
    /// Close the port and stop
    Close,
    /// Anything else, ignored
    Unknown(Vec<String>),
}

impl TryFrom<&CommandLine> for Command {
    type Error = CommandError;

    /// Keywords are matched case sensitively, `PING` is an unknown command
    fn try_from(line: &CommandLine) -> Result<Self, Self::Error> {
        let Ok(keyword) = line.name().parse::<Keyword>() else {
            return Ok(Command::Unknown(line.argv().to_vec()));
        };

        let command = match keyword {
            Keyword::Ping => Command::Ping,
            Keyword::Flood => {
                let size = line.args().first().ok_or(CommandError::MissingArgument("size"))?;
                Command::Flood(parse_size(size)?)
            }
            Keyword::Close => Command::Close,
        };

        Ok(command)
    }
}
