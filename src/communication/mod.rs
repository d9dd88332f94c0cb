mod connection;
pub use connection::Connection;
mod open;
pub use open::{open_serial, open_with_retry, RetryPolicy};

pub type ComResult<T> = Result<T, CommunicationError>;

/// A blocking, line oriented link to the device under test.
///
/// Commands arrive as `\n` terminated ASCII lines, responses are raw bytes without any framing.
pub trait LineHandle {
    /// Blocks until a complete line was received and returns it without the `\n`
    fn receive_line(&mut self) -> ComResult<String>;

    /// Writes all of `bytes` and flushes them to the transport
    fn send_bytes(&mut self, bytes: &[u8]) -> ComResult<()>;

    /// Releases the underlying transport. Every later call fails with
    /// [`CommunicationError::Closed`].
    fn close(&mut self) -> ComResult<()>;
}

impl<H: LineHandle + ?Sized> LineHandle for &mut H {
    fn receive_line(&mut self) -> ComResult<String> {
        (**self).receive_line()
    }

    fn send_bytes(&mut self, bytes: &[u8]) -> ComResult<()> {
        (**self).send_bytes(bytes)
    }

    fn close(&mut self) -> ComResult<()> {
        (**self).close()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommunicationError {
    /// The serial port could not be opened
    #[error("Could not open port: {0}")]
    Open(#[from] serialport::Error),
    /// Signals that the underlying sending or receiving failed. Not recoverable on its own.
    #[error("Io: {0}")]
    Io(std::io::Error),
    /// A received line contained non ASCII bytes
    #[error("Received line is not valid ASCII")]
    Decode,
    /// The peer hung up before sending a line
    #[error("Connection reached end of stream")]
    Disconnected,
    /// The connection was already closed
    #[error("Connection is closed")]
    Closed,
}

impl From<std::io::Error> for CommunicationError {
    fn from(value: std::io::Error) -> Self {
        match value.kind() {
            std::io::ErrorKind::UnexpectedEof => CommunicationError::Disconnected,
            std::io::ErrorKind::InvalidData => CommunicationError::Decode,
            _ => CommunicationError::Io(value),
        }
    }
}
