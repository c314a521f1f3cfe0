//! Protocol Client
//!
//! The four cache operations on top of the codec and the transport.
//!
//! ## Connection-Reset Policy
//! - `E` header carrying the reset marker: connection dropped, next call
//!   reconnects
//! - any other `E` header: connection kept, operation fails
//! - EOF mid-frame or a malformed header: connection dropped

use bytes::Bytes;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::protocol::{decode_header, encode_command, CacheKey, Command, ResponseHeader, HEADER_SIZE};
use super::{ConnectionState, Connector, TcpConnector, Transport};

/// Blocking client owning one connection
///
/// Operations take `&mut self`: a request and its response must not
/// interleave with another on the same stream. Use one client per worker.
pub struct Client<C: Connector = TcpConnector> {
    config: ClientConfig,
    transport: Transport<C>,
}

impl Client<TcpConnector> {
    /// Create a TCP client; no connection is opened until the first call
    pub fn new(config: ClientConfig) -> Result<Self> {
        let connector = TcpConnector::from_config(&config);
        Self::with_connector(config, connector)
    }

    /// Create a TCP client for `host:port` with default settings
    pub fn connect_to(host: impl Into<String>, port: u16) -> Result<Self> {
        let config = ClientConfig::builder().host(host).port(port).build()?;
        Self::new(config)
    }
}

impl<C: Connector> Client<C> {
    /// Create a client over a custom connector
    pub fn with_connector(config: ClientConfig, connector: C) -> Result<Self> {
        config.validate()?;
        let transport = Transport::new(connector, config.max_chunk_size);
        Ok(Self { config, transport })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.transport.state() == ConnectionState::Open
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.transport.state()
    }

    /// Successful connects so far, reconnects included
    pub fn connect_count(&self) -> u64 {
        self.transport.connect_count()
    }

    pub fn transport(&self) -> &Transport<C> {
        &self.transport
    }

    /// Drop the current connection, if any
    pub fn close(&mut self) {
        self.transport.close();
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Fetch an entry; `None` when missing or on any failure
    pub fn fetch(&mut self, key: &CacheKey, lifetime: u64) -> Option<Bytes> {
        match self.try_fetch(key, lifetime) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!("Fetch {} failed: {}", key, e);
                None
            }
        }
    }

    /// Store an entry; returns the server's acknowledgement header
    pub fn store(
        &mut self,
        key: &CacheKey,
        lifetime: u64,
        payload: impl Into<Bytes>,
    ) -> Option<ResponseHeader> {
        match self.try_store(key, lifetime, payload) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!("Store {} failed: {}", key, e);
                None
            }
        }
    }

    /// Refresh an entry's lifetime
    pub fn refresh(&mut self, key: &CacheKey, lifetime: u64) -> Option<ResponseHeader> {
        match self.try_refresh(key, lifetime) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!("Refresh {} failed: {}", key, e);
                None
            }
        }
    }

    /// Remove an entry
    pub fn remove(&mut self, key: &CacheKey) -> Option<ResponseHeader> {
        match self.try_remove(key) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!("Remove {} failed: {}", key, e);
                None
            }
        }
    }

    /// Fetch an entry, reporting why it failed
    pub fn try_fetch(&mut self, key: &CacheKey, lifetime: u64) -> Result<Bytes> {
        let header = self.round_trip(&Command::Fetch {
            key: key.clone(),
            lifetime,
        })?;

        let len = match header.payload_len() {
            Ok(len) => len,
            Err(e) => {
                // Payload size unknown: the rest of the stream is unreadable
                self.transport.close();
                return Err(e);
            }
        };

        tracing::trace!("Fetch {}: receiving {} payload bytes", key, len);
        self.transport.receive_exact(len)
    }

    /// Store an entry, reporting why it failed
    pub fn try_store(
        &mut self,
        key: &CacheKey,
        lifetime: u64,
        payload: impl Into<Bytes>,
    ) -> Result<ResponseHeader> {
        self.round_trip(&Command::Store {
            key: key.clone(),
            lifetime,
            payload: payload.into(),
        })
    }

    /// Refresh an entry's lifetime, reporting why it failed
    pub fn try_refresh(&mut self, key: &CacheKey, lifetime: u64) -> Result<ResponseHeader> {
        self.round_trip(&Command::Refresh {
            key: key.clone(),
            lifetime,
        })
    }

    /// Remove an entry, reporting why it failed
    pub fn try_remove(&mut self, key: &CacheKey) -> Result<ResponseHeader> {
        self.round_trip(&Command::Remove { key: key.clone() })
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Send one command and read its header
    ///
    /// Only OK headers are returned; error headers become `Server` errors
    /// after the reset policy has been applied.
    fn round_trip(&mut self, command: &Command) -> Result<ResponseHeader> {
        // Rejected keys never reach the socket
        let request = encode_command(command)?;

        self.transport.connect()?;

        tracing::trace!(
            "Sending {:?} for {} ({} bytes)",
            command.command_type(),
            command.key(),
            request.len()
        );
        self.transport.send(&request);

        let raw = self.transport.receive_exact(HEADER_SIZE)?;
        let header = match decode_header(&raw) {
            Ok(header) => header,
            Err(e) => {
                tracing::warn!("Dropping connection after malformed header: {}", e);
                self.transport.close();
                return Err(e);
            }
        };
        tracing::trace!("Received {:?}", header);

        if header.is_ok() {
            return Ok(header);
        }

        if header.reset_required() {
            tracing::debug!("Server requested connection reset: {}", header.message());
            self.transport.close();
        } else {
            tracing::debug!("Server error: {}", header.message());
        }
        Err(header.into_error())
    }
}

impl<C: Connector> std::fmt::Debug for Client<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("target", &self.transport.connector().target())
            .field("state", &self.transport.state())
            .field("connects", &self.transport.connect_count())
            .finish()
    }
}
