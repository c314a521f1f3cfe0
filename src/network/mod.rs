//! Network Module
//!
//! Connection management and the protocol client.
//!
//! ## Architecture
//! - `Connector` opens streams (TCP in production, fakes in tests)
//! - `Transport` owns one stream: lazy connect, send, exact-length receive
//! - `Client` runs one request/response round trip per operation

mod connector;
mod transport;
mod client;

pub use connector::{Connector, TcpConnector};
pub use transport::{ConnectionState, Transport};
pub use client::Client;
