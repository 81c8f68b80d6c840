//! Server configuration.

use std::net::{Ipv4Addr, SocketAddr};

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The address to bind to.
    pub addr: SocketAddr,
    /// Connections beyond this limit are answered with 503 and closed.
    pub max_connections: usize,
    /// Bytes requested from the socket per read.
    pub read_buffer_size: usize,
    /// Requests whose header section and declared body exceed this many bytes
    /// are answered with 413.
    pub max_request_size: usize,
}

impl ServerConfig {
    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 8080)),
            max_connections: 1024,
            read_buffer_size: 8192,
            max_request_size: 1024 * 1024,
        }
    }
}
