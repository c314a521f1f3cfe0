//! Transport
//!
//! Owns the single connection of a client and hides TCP fragmentation
//! from the protocol layer.

use std::io::{self, Read, Write};

use bytes::{Bytes, BytesMut};

use crate::error::{NomosError, Result};
use super::Connector;

/// Upper bound on the buffer reserved up front for one receive
const MAX_INITIAL_RESERVE: usize = 1024 * 1024;

/// Connection lifecycle
///
/// There is no half-open state: any read or write failure drops straight
/// back to `Absent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Absent,
    Open,
}

/// A lazily opened connection with exact-length receive
pub struct Transport<C: Connector> {
    /// Opens new streams on demand
    connector: C,

    /// Current connection, `None` while `Absent`
    stream: Option<C::Stream>,

    /// Max bytes requested from the stream per read
    max_chunk_size: usize,

    /// Successful connects over the transport's lifetime
    connects: u64,
}

impl<C: Connector> Transport<C> {
    pub fn new(connector: C, max_chunk_size: usize) -> Self {
        Self {
            connector,
            stream: None,
            max_chunk_size: max_chunk_size.max(1),
            connects: 0,
        }
    }

    pub fn state(&self) -> ConnectionState {
        if self.stream.is_some() {
            ConnectionState::Open
        } else {
            ConnectionState::Absent
        }
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    pub fn connect_count(&self) -> u64 {
        self.connects
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Open a connection unless one is already open
    ///
    /// Never retries; a failure leaves the transport `Absent`.
    pub fn connect(&mut self) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }

        match self.connector.connect() {
            Ok(stream) => {
                self.stream = Some(stream);
                self.connects += 1;
                tracing::debug!(
                    "Connected to {} (connect #{})",
                    self.connector.target(),
                    self.connects
                );
                Ok(())
            }
            Err(e) => {
                tracing::debug!("Cannot connect to {}: {}", self.connector.target(), e);
                Err(NomosError::Unavailable(format!(
                    "{}: {}",
                    self.connector.target(),
                    e
                )))
            }
        }
    }

    /// Write all bytes to the connection
    ///
    /// Errors are not returned. A failed write tears the connection down and
    /// the caller sees `NotConnected` on its next receive.
    pub fn send(&mut self, bytes: &[u8]) {
        let Some(stream) = self.stream.as_mut() else {
            tracing::trace!("Send of {} bytes skipped: no connection", bytes.len());
            return;
        };

        if let Err(e) = stream.write_all(bytes).and_then(|_| stream.flush()) {
            tracing::warn!("Write to {} failed: {}", self.connector.target(), e);
            self.close();
        }
    }

    /// Receive exactly `n` bytes
    ///
    /// Reads in chunks of at most `max_chunk_size` until `n` bytes have
    /// accumulated. End of stream or a read error before that is fatal to
    /// the connection.
    pub fn receive_exact(&mut self, n: usize) -> Result<Bytes> {
        let Some(stream) = self.stream.as_mut() else {
            return Err(NomosError::NotConnected);
        };

        if n == 0 {
            return Ok(Bytes::new());
        }

        let result = read_chunked(stream, n, self.max_chunk_size);
        if let Err(e) = &result {
            tracing::warn!("Read from {} failed: {}", self.connector.target(), e);
            self.close();
        }
        result
    }

    /// Drop the connection; the next `connect` opens a fresh one
    pub fn close(&mut self) {
        if self.stream.take().is_some() {
            tracing::debug!("Closed connection to {}", self.connector.target());
        }
    }
}

fn read_chunked<S: Read>(stream: &mut S, n: usize, max_chunk_size: usize) -> Result<Bytes> {
    let mut buf = BytesMut::with_capacity(n.min(MAX_INITIAL_RESERVE));
    let mut chunk = vec![0u8; n.min(max_chunk_size)];

    while buf.len() < n {
        let want = (n - buf.len()).min(chunk.len());
        match stream.read(&mut chunk[..want]) {
            Ok(0) => {
                return Err(NomosError::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("stream closed after {} of {} bytes", buf.len(), n),
                )))
            }
            Ok(read) => buf.extend_from_slice(&chunk[..read]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(buf.freeze())
}
