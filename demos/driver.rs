//! Plays the device side of the link: sends command lines to a running `uart_responder` and
//! reports what comes back.
//!
//! ```sh
//! socat -d -d pty,raw,echo=0,link=/tmp/ttyA pty,raw,echo=0,link=/tmp/ttyB &
//! cargo run -- /tmp/ttyA
//! cargo run --example driver -- /tmp/ttyB
//! ```
use std::{
    error::Error,
    io::{ErrorKind, Read, Write},
    time::{Duration, Instant},
};

use serialport::SerialPort;

const PING_INTERVAL: Duration = Duration::from_millis(100);
const FLOOD_WINDOW: Duration = Duration::from_secs(1);

const COMMANDS: &[&str] = &["ping", "flood", "close", "raw line"];

fn main() -> Result<(), Box<dyn Error>> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "/dev/pts/2".to_string());
    let mut port = serialport::new(&path, 115200).timeout(PING_INTERVAL).open()?;
    println!("Connected to {path}");

    loop {
        let command = inquire::Select::new("Select command", COMMANDS.to_vec()).prompt()?;
        match command {
            "ping" => ping(port.as_mut())?,
            "flood" => {
                let size: usize =
                    inquire::Text::new("Size:").with_default("65").prompt()?.parse()?;
                flood(port.as_mut(), size)?;
            }
            "close" => {
                writeln!(port, "close")?;
                println!("Sent close");
                return Ok(());
            }
            _ => {
                let line = inquire::Text::new("Line:").prompt()?;
                writeln!(port, "{line}")?;
            }
        }
        println!("------------------------");
    }
}

/// Repeats `ping` until any byte is answered
fn ping(port: &mut dyn SerialPort) -> Result<(), Box<dyn Error>> {
    let start = Instant::now();
    let mut byte = [0u8; 1];
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        writeln!(port, "ping")?;
        match port.read(&mut byte) {
            Ok(1) => {
                println!("Received {:#04x} after {attempt} ping(s), {:?}", byte[0], start.elapsed());
                return Ok(());
            }
            Ok(_) => (),
            Err(e) if e.kind() == ErrorKind::TimedOut => (),
            Err(e) => return Err(e.into()),
        }
    }
}

/// Requests `size` bytes and counts the zero bytes that arrive within [`FLOOD_WINDOW`]
fn flood(port: &mut dyn SerialPort, size: usize) -> Result<(), Box<dyn Error>> {
    writeln!(port, "flood {size}")?;

    let deadline = Instant::now() + FLOOD_WINDOW;
    let mut buffer = [0u8; 256];
    let (mut zeros, mut other) = (0usize, 0usize);

    while Instant::now() < deadline && zeros + other < size {
        match port.read(&mut buffer) {
            Ok(n) => {
                let received = &buffer[..n];
                let z = received.iter().filter(|b| **b == 0).count();
                zeros += z;
                other += n - z;
            }
            Err(e) if e.kind() == ErrorKind::TimedOut => (),
            Err(e) => return Err(e.into()),
        }
    }

    println!("Received {zeros}/{size} zero bytes, {other} unexpected");
    Ok(())
}
