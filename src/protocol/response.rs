//! Response definitions
//!
//! Represents the fixed-size status header sent back by the server.

use std::fmt;

use crate::error::{NomosError, Result};
use super::codec::{HEADER_SIZE, RESET_MARKER};

/// Response status byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Ok = b'O',
    Error = b'E',
}

/// A decoded 11-byte response header
///
/// The raw bytes are kept as-is: store, refresh and remove hand the header
/// back to the caller as an acknowledgement token.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ResponseHeader {
    raw: [u8; HEADER_SIZE],
    status: Status,
}

impl ResponseHeader {
    pub(crate) fn new(raw: [u8; HEADER_SIZE], status: Status) -> Self {
        Self { raw, status }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }

    /// Raw header bytes, trailing newline included
    pub fn as_bytes(&self) -> &[u8; HEADER_SIZE] {
        &self.raw
    }

    /// Header text between the status byte and the newline
    pub fn message(&self) -> String {
        String::from_utf8_lossy(&self.raw[1..HEADER_SIZE - 1]).into_owned()
    }

    /// Length of the payload following an OK header
    ///
    /// Only meaningful for fetch responses; other acknowledgements may carry
    /// anything in this field.
    pub fn payload_len(&self) -> Result<usize> {
        let field = &self.raw[2..HEADER_SIZE - 1];
        let text = std::str::from_utf8(field).map_err(|_| {
            NomosError::Desync(format!("non-ASCII length field: {:02x?}", field))
        })?;

        // from_str_radix tolerates a leading sign; the field must be digits only
        if !text.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(NomosError::Desync(format!(
                "invalid hex length field: {:?}",
                text
            )));
        }

        let len = u32::from_str_radix(text, 16)
            .map_err(|e| NomosError::Desync(format!("invalid hex length field {:?}: {}", text, e)))?;
        Ok(len as usize)
    }

    /// Server asked for the connection to be dropped
    pub fn reset_required(&self) -> bool {
        self.status == Status::Error
            && self
                .raw
                .windows(RESET_MARKER.len())
                .any(|w| w == RESET_MARKER.as_bytes())
    }

    /// Convert an error header into the matching client error
    pub fn into_error(self) -> NomosError {
        NomosError::Server {
            message: self.message(),
            reset_required: self.reset_required(),
        }
    }
}

impl fmt::Debug for ResponseHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseHeader")
            .field("status", &self.status)
            .field("raw", &String::from_utf8_lossy(&self.raw))
            .finish()
    }
}
