//! Connectors
//!
//! Open the byte stream a transport runs over.

use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::ClientConfig;

/// Opens a fresh stream to the server
///
/// The transport calls this only when it holds no connection, so an
/// implementation never has to track an existing stream.
pub trait Connector {
    type Stream: Read + Write;

    /// Open a new stream
    fn connect(&mut self) -> io::Result<Self::Stream>;

    /// Human-readable target, used in logs and errors
    fn target(&self) -> &str;
}

/// Connects over TCP with a bounded connect timeout
#[derive(Debug, Clone)]
pub struct TcpConnector {
    host: String,
    port: u16,
    addr: String,
    timeout: Duration,
}

impl TcpConnector {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        let host = host.into();
        let addr = format!("{}:{}", host, port);
        Self {
            host,
            port,
            addr,
            timeout,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.host.clone(), config.port, config.connect_timeout())
    }
}

impl Connector for TcpConnector {
    type Stream = TcpStream;

    /// Resolve the host and try each address in turn
    ///
    /// Resolution happens on every connect so a reconnect after a reset
    /// follows DNS changes.
    fn connect(&mut self) -> io::Result<TcpStream> {
        let mut last_err = None;

        for addr in (self.host.as_str(), self.port).to_socket_addrs()? {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(stream) => {
                    // Disable Nagle's algorithm for low latency
                    stream.set_nodelay(true)?;
                    return Ok(stream);
                }
                Err(e) => {
                    tracing::trace!("Connect to {} failed: {}", addr, e);
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| {
            io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                format!("{} resolved to no addresses", self.addr),
            )
        }))
    }

    fn target(&self) -> &str {
        &self.addr
    }
}
