use std::io::{BufRead, BufReader, ErrorKind, Read, Write};

use super::{ComResult, CommunicationError, LineHandle};

/// Owns a byte transport and reads it line by line.
///
/// The transport is released when [`LineHandle::close`] is called or when the connection is
/// dropped, whichever happens first.
pub struct Connection<T: Read + Write> {
    port: String,
    stream: Option<BufReader<T>>,
}

impl<T: Read + Write> Connection<T> {
    pub fn new(port: impl Into<String>, transport: T) -> Self {
        Self { port: port.into(), stream: Some(BufReader::new(transport)) }
    }

    pub fn port(&self) -> &str {
        &self.port
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Returns the transport, or `None` if the connection was closed
    pub fn into_inner(self) -> Option<T> {
        self.stream.map(BufReader::into_inner)
    }

    fn stream(&mut self) -> ComResult<&mut BufReader<T>> {
        self.stream.as_mut().ok_or(CommunicationError::Closed)
    }
}

impl<T: Read + Write> LineHandle for Connection<T> {
    fn receive_line(&mut self) -> ComResult<String> {
        let stream = self.stream()?;
        let mut buffer = Vec::new();

        loop {
            match stream.read_until(b'\n', &mut buffer) {
                Ok(_) if buffer.ends_with(b"\n") => break,
                Ok(_) => {
                    if !buffer.is_empty() {
                        log::warn!("Dropping unterminated line {buffer:?}");
                    }
                    return Err(CommunicationError::Disconnected);
                }
                // serial ports report an expired read timeout as an error, keep blocking
                Err(e) if e.kind() == ErrorKind::TimedOut => continue,
                Err(e) => return Err(e.into()),
            }
        }

        if !buffer.is_ascii() {
            log::error!("Received non ASCII line {buffer:?}");
            return Err(CommunicationError::Decode);
        }
        let mut line = String::from_utf8(buffer).map_err(|_| CommunicationError::Decode)?;
        line.pop();

        Ok(line)
    }

    fn send_bytes(&mut self, bytes: &[u8]) -> ComResult<()> {
        let transport = self.stream()?.get_mut();
        transport.write_all(bytes)?;
        transport.flush()?;
        Ok(())
    }

    fn close(&mut self) -> ComResult<()> {
        if let Some(mut stream) = self.stream.take() {
            log::info!("Closing {}", self.port);
            stream.get_mut().flush()?;
        }
        Ok(())
    }
}
