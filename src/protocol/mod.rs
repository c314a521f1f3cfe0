//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Protocol Format (V01 - Text Command Line + Binary Payload)
//!
//! ### Request Format
//! One comma-separated ASCII line, optionally followed by raw payload bytes.
//!
//! ### Commands
//! - G: FETCH   - `V01,G,<level>,<subLevel>,<key>,<lifetime>\n`
//! - P: STORE   - `V01,P,<level>,<subLevel>,<key>,<lifetime>,<len>\n` + payload
//! - T: REFRESH - `V01,T,<level>,<subLevel>,<key>,<lifetime>\n`
//! - R: REMOVE  - `V01,R,<level>,<subLevel>,<key>\n`
//!
//! ### Response Format
//! ```text
//! ┌───────────┬─────────────┬──────────────────┬────────┐
//! │ Status(1) │ Reserved(1) │ Len (8 hex ASCII)│ \n (1) │
//! └───────────┴─────────────┴──────────────────┴────────┘
//! ```
//! A FETCH response carries `Len` payload bytes after the header.
//!
//! ### Status Codes
//! - `O`: OK
//! - `E`: ERROR (header text may carry the `ERR_CR` reset marker)

mod command;
mod response;
mod codec;

pub use command::{CacheKey, Command, CommandType, KeyToken};
pub use response::{ResponseHeader, Status};
pub use codec::{
    decode_header, encode_command, read_header, validate_key, write_command, HEADER_SIZE,
    MAX_PAYLOAD_SIZE, PROTOCOL_VERSION, RESET_MARKER,
};
