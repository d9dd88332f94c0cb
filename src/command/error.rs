use std::num::ParseIntError;

use crate::communication::CommunicationError;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Missing argument <{0}>")]
    MissingArgument(&'static str),
    #[error("Invalid flood size: {0}")]
    InvalidSize(#[from] ParseIntError),
    #[error("Communication: {0}")]
    Communication(#[from] CommunicationError),
    /// Writing the echo to the console failed
    #[error("Output: {0}")]
    Output(std::io::Error),
}
