//! Web server configuration.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

/// Which wildcard address the listener binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AddressFamily {
    /// `0.0.0.0`
    #[default]
    Ipv4,
    /// `::`
    Ipv6,
}

/// Configuration for the web server, fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address family of the wildcard bind address
    pub family: AddressFamily,
    /// Port to bind the server to
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            family: AddressFamily::Ipv4,
            port: crate::DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Create a configuration from the `--enableipv6` flag.
    pub fn new(enable_ipv6: bool) -> Self {
        Self::default().with_ipv6(enable_ipv6)
    }

    /// Bind the IPv6 wildcard address instead of the IPv4 one.
    pub fn with_ipv6(mut self, enable_ipv6: bool) -> Self {
        self.family = if enable_ipv6 {
            AddressFamily::Ipv6
        } else {
            AddressFamily::Ipv4
        };
        self
    }

    /// Set the port for the web server.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Get the full bind address.
    pub fn bind_address(&self) -> SocketAddr {
        let ip = match self.family {
            AddressFamily::Ipv4 => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            AddressFamily::Ipv6 => IpAddr::V6(Ipv6Addr::UNSPECIFIED),
        };
        SocketAddr::new(ip, self.port)
    }
}
