//! # Nomos Client
//!
//! A blocking client for the Nomos cache protocol:
//! - Line-framed text commands with a raw binary payload
//! - Fixed 11-byte response headers
//! - Exact-length reads across TCP fragmentation
//! - Connection reset on protocol desynchronization
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Client                                  │
//! │        fetch / store / refresh / remove                      │
//! └──────────────┬─────────────────────────────┬────────────────┘
//!                │                             │
//!                ▼                             ▼
//!        ┌──────────────┐              ┌──────────────┐
//!        │    Codec     │              │  Transport   │
//!        │ (encode/hdr) │              │ (one stream) │
//!        └──────────────┘              └──────┬───────┘
//!                                             │
//!                                             ▼
//!                                      ┌──────────────┐
//!                                      │  Connector   │
//!                                      │    (TCP)     │
//!                                      └──────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use nomos_client::{CacheKey, Client};
//!
//! let mut client = Client::connect_to("localhost", 7007)?;
//! let key = CacheKey::new(1, 2, "session-42");
//!
//! client.store(&key, 3600, b"payload".to_vec());
//! if let Some(bytes) = client.fetch(&key, 0) {
//!     assert_eq!(&bytes[..], b"payload");
//! }
//! # Ok::<(), nomos_client::NomosError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{NomosError, Result};
pub use config::ClientConfig;
pub use network::{Client, ConnectionState, Connector, TcpConnector};
pub use protocol::{CacheKey, KeyToken, ResponseHeader, Status};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the client
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
