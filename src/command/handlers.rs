use crate::communication::LineHandle;

use super::CommandResult;

/// The single byte answered to a `ping`. A raw 1, not the ASCII digit.
pub const PING_RESPONSE: u8 = 0x01;

/// Flood data is written in chunks of this size, so huge requests do not allocate
const FLOOD_CHUNK: [u8; 256] = [0; 256];

pub fn ping(com: &mut impl LineHandle) -> CommandResult {
    com.send_bytes(&[PING_RESPONSE])?;
    Ok(())
}

/// Writes `size` zero bytes
pub fn flood(com: &mut impl LineHandle, size: usize) -> CommandResult {
    log::info!("Flooding {size} bytes");

    let mut remaining = size;
    while remaining > 0 {
        let n = remaining.min(FLOOD_CHUNK.len());
        com.send_bytes(&FLOOD_CHUNK[..n])?;
        remaining -= n;
    }

    Ok(())
}

pub fn close(com: &mut impl LineHandle) -> CommandResult {
    com.close()?;
    Ok(())
}
