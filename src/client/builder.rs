//! Turning a target string into a connected [`Client`].

use std::net::{IpAddr, SocketAddr, ToSocketAddrs};
use std::time::Duration;

use bytes::Bytes;

use super::{Client, ClientConfig, DEFAULT_PORT};
use crate::error::{Error, Result};
use crate::transport::{Transport, UdpTransport};

/// Collects target, community and timeout for a [`Client`].
///
/// ```rust,no_run
/// use cyberpower_pdu::ClientBuilder;
/// use std::time::Duration;
///
/// # async fn example() -> cyberpower_pdu::Result<()> {
/// let client = ClientBuilder::new("pdu1.lab:161")
///     .community("private")
///     .timeout(Duration::from_secs(2))
///     .connect()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    target: String,
    config: ClientConfig,
}

impl ClientBuilder {
    /// `target` is `host` or `host:port`; the port defaults to 161. IPv6
    /// literals may be bare (`fe80::1`) or bracketed (`[fe80::1]:161`).
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            config: ClientConfig::default(),
        }
    }

    /// Set the write community (default `private`).
    pub fn community(mut self, community: impl AsRef<[u8]>) -> Self {
        self.config.community = Bytes::copy_from_slice(community.as_ref());
        self
    }

    /// Set the reply timeout (default 5 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Resolve the target with the system resolver, which may block briefly
    /// for hostnames.
    pub fn resolve_target(&self) -> Result<SocketAddr> {
        let target = self.target.trim();
        if target.is_empty() {
            return Err(Error::Config("empty target address".into()).boxed());
        }
        let unbracketed = target
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or(target);

        let lookup = match unbracketed.parse::<IpAddr>() {
            Ok(ip) => return Ok(SocketAddr::new(ip, DEFAULT_PORT)),
            Err(_) if target.contains(':') => target.to_socket_addrs(),
            Err(_) => (target, DEFAULT_PORT).to_socket_addrs(),
        };
        let unresolved = |detail: String| {
            Error::Config(format!("could not resolve address '{}'{}", target, detail).into())
                .boxed()
        };
        lookup
            .map_err(|e| unresolved(format!(": {}", e)))?
            .next()
            .ok_or_else(|| unresolved(String::new()))
    }

    /// Build over an existing transport; the target string is not consulted.
    pub fn build_with<T: Transport>(self, transport: T) -> Client<T> {
        Client::new(transport, self.config)
    }

    /// Resolve the target and connect a UDP transport to it.
    pub async fn connect(self) -> Result<Client<UdpTransport>> {
        let addr = self.resolve_target()?;
        tracing::debug!(target: "cyberpower_pdu::client", { snmp.target = %addr }, "connecting");
        let transport = UdpTransport::connect(addr).await?;
        Ok(self.build_with(transport))
    }
}
