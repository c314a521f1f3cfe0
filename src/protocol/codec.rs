//! Protocol codec
//!
//! Encoding of commands and decoding of response headers.
//!
//! ## Wire Format
//!
//! ### Request (Command) Format
//! ```text
//! V01,<cmd>,<level>,<subLevel>,<key>[,<lifetime>][,<payloadLength>]\n[payload]
//! ```
//!
//! ### Response Header Format
//! ```text
//! ┌───────────┬─────────────┬──────────────────┬────────┐
//! │ Status(1) │ Reserved(1) │ Len (8 hex ASCII)│ \n (1) │
//! └───────────┴─────────────┴──────────────────┴────────┘
//! ```

use std::io::{Read, Write};

use crate::error::{NomosError, Result};
use super::{CacheKey, Command, KeyToken, ResponseHeader, Status};

/// Version token leading every command line
pub const PROTOCOL_VERSION: &str = "V01";

/// Header size: status + reserved + 8 hex digits + newline
pub const HEADER_SIZE: usize = 11;

/// Text inside an error header telling the client to drop the connection
pub const RESET_MARKER: &str = "ERR_CR";

/// Largest payload the 8-hex-digit length field can describe
pub const MAX_PAYLOAD_SIZE: usize = u32::MAX as usize;

const FIELD_DELIMITER: char = ',';

// =============================================================================
// Command Encoding
// =============================================================================

/// Reject keys that cannot be framed on a comma-separated line
pub fn validate_key(key: &CacheKey) -> Result<()> {
    if let KeyToken::Str(token) = &key.key {
        if token.is_empty() {
            return Err(NomosError::InvalidKey("empty key token".to_string()));
        }
        if token.contains([FIELD_DELIMITER, '\n', '\r']) {
            return Err(NomosError::InvalidKey(format!(
                "key token {:?} contains a delimiter",
                token
            )));
        }
    }
    Ok(())
}

/// Encode a command to bytes
///
/// For `Store` the payload follows the command line directly, so the result
/// is a single write.
pub fn encode_command(command: &Command) -> Result<Vec<u8>> {
    validate_key(command.key())?;

    let cmd = command.command_type().as_char();
    let (line, payload): (String, &[u8]) = match command {
        Command::Fetch { key, lifetime } | Command::Refresh { key, lifetime } => (
            format!("{},{},{},{}\n", PROTOCOL_VERSION, cmd, key, lifetime),
            &[][..],
        ),
        Command::Store {
            key,
            lifetime,
            payload,
        } => {
            if payload.len() > MAX_PAYLOAD_SIZE {
                return Err(NomosError::Protocol(format!(
                    "Payload too large: {} bytes (max {})",
                    payload.len(),
                    MAX_PAYLOAD_SIZE
                )));
            }
            (
                format!(
                    "{},{},{},{},{}\n",
                    PROTOCOL_VERSION,
                    cmd,
                    key,
                    lifetime,
                    payload.len()
                ),
                &payload[..],
            )
        }
        Command::Remove { key } => (format!("{},{},{}\n", PROTOCOL_VERSION, cmd, key), &[][..]),
    };

    let mut message = Vec::with_capacity(line.len() + payload.len());
    message.extend_from_slice(line.as_bytes());
    message.extend_from_slice(payload);

    Ok(message)
}

// =============================================================================
// Response Header Decoding
// =============================================================================

/// Decode a response header
///
/// Any framing fault here means client and server no longer agree on the
/// stream position, so every error is a `Desync`.
pub fn decode_header(bytes: &[u8]) -> Result<ResponseHeader> {
    let raw: [u8; HEADER_SIZE] = bytes.try_into().map_err(|_| {
        NomosError::Desync(format!(
            "Response header must be {} bytes, got {}",
            HEADER_SIZE,
            bytes.len()
        ))
    })?;

    if raw[HEADER_SIZE - 1] != b'\n' {
        return Err(NomosError::Desync(format!(
            "Response header not newline-terminated: {:?}",
            String::from_utf8_lossy(&raw)
        )));
    }

    let status = match raw[0] {
        b'O' => Status::Ok,
        b'E' => Status::Error,
        other => {
            return Err(NomosError::Desync(format!(
                "Unknown response status: 0x{:02x}",
                other
            )))
        }
    };

    Ok(ResponseHeader::new(raw, status))
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    let bytes = encode_command(command)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Read a response header from a stream
///
/// Blocks until all header bytes arrive or the stream fails
pub fn read_header<R: Read>(reader: &mut R) -> Result<ResponseHeader> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;
    decode_header(&header)
}
