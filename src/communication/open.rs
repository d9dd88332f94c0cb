use std::{io::Write, num::NonZeroU32, time::Duration};

use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};

use super::{ComResult, CommunicationError, Connection};

/// Reads block for at most this long before the port reports `TimedOut`. The connection
/// retries timed out reads, so this only bounds a single syscall.
const READ_TIMEOUT: Duration = Duration::from_secs(3600);

/// Printed to the console once the port is open
pub const OPENED_MESSAGE: &str = "Serial port opened";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Pause between two failed attempts
    pub interval: Duration,
    /// `None` retries forever
    pub max_attempts: Option<NonZeroU32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { interval: Duration::from_millis(100), max_attempts: None }
    }
}

/// Opens `path` as an 8N1 serial port without flow control
pub fn open_serial(path: &str, baudrate: u32) -> ComResult<Connection<Box<dyn SerialPort>>> {
    let port = serialport::new(path, baudrate)
        .data_bits(DataBits::Eight)
        .stop_bits(StopBits::One)
        .parity(Parity::None)
        .flow_control(FlowControl::None)
        .timeout(READ_TIMEOUT)
        .open()?;

    Ok(Connection::new(path, port))
}

/// Calls `open` until it succeeds or the attempts in `policy` are used up, calling `sleep` with
/// the retry interval after every failure. On success [`OPENED_MESSAGE`] is written to `out`.
///
/// ## Returns
/// * `Ok`: the opened handle
/// * `Err`: the error of the last attempt, if `policy.max_attempts` was reached
pub fn open_with_retry<T>(
    policy: &RetryPolicy,
    out: &mut impl Write,
    mut open: impl FnMut() -> ComResult<T>,
    mut sleep: impl FnMut(Duration),
) -> ComResult<T> {
    let mut attempt: u32 = 0;

    let handle = loop {
        attempt = attempt.saturating_add(1);
        match open() {
            Ok(handle) => break handle,
            Err(e) => {
                if policy.max_attempts.is_some_and(|max| attempt >= max.get()) {
                    log::error!("Giving up after {attempt} attempt(s): {e}");
                    return Err(e);
                }
                log::warn!("Open attempt {attempt} failed: {e}; retrying in {:?}", policy.interval);
                sleep(policy.interval);
            }
        }
    };

    log::info!("Port opened after {attempt} attempt(s)");
    writeln!(out, "{OPENED_MESSAGE}").map_err(CommunicationError::Io)?;
    Ok(handle)
}
