//! UDP transport.

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;

use super::Transport;
use crate::error::{Error, Result};

/// Largest datagram accepted from an agent.
const MAX_DATAGRAM: usize = 65_507;

/// A UDP socket connected to one agent.
///
/// Because the socket is connected, the kernel discards datagrams from any
/// other address.
#[derive(Clone)]
pub struct UdpTransport {
    socket: Arc<UdpSocket>,
    peer: SocketAddr,
}

impl UdpTransport {
    /// Bind an ephemeral local port and connect it to `peer`.
    pub async fn connect(peer: SocketAddr) -> Result<Self> {
        let io_err = |source| Error::Io { target: peer, source }.boxed();
        let socket = ephemeral_socket(peer).map_err(io_err)?;
        socket.connect(peer).await.map_err(io_err)?;
        tracing::debug!(
            target: "cyberpower_pdu::transport",
            { snmp.target = %peer, snmp.local = ?socket.local_addr().ok() },
            "UDP socket connected"
        );
        Ok(Self {
            socket: Arc::new(socket),
            peer,
        })
    }

    /// Local address the socket was bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.socket.local_addr().map_err(|source| {
            Error::Io {
                target: self.peer,
                source,
            }
            .boxed()
        })
    }
}

/// Unbound-address socket in `peer`'s family. IPv6 sockets are v6-only.
fn ephemeral_socket(peer: SocketAddr) -> io::Result<UdpSocket> {
    let (domain, local) = match peer {
        SocketAddr::V4(_) => (Domain::IPV4, SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))),
        SocketAddr::V6(_) => (Domain::IPV6, SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))),
    };
    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if peer.is_ipv6() {
        socket.set_only_v6(true)?;
    }
    socket.set_nonblocking(true)?;
    socket.bind(&local.into())?;
    UdpSocket::from_std(socket.into())
}

impl Transport for UdpTransport {
    async fn send(&self, datagram: &[u8]) -> Result<()> {
        tracing::trace!(target: "cyberpower_pdu::transport", { snmp.target = %self.peer, snmp.bytes = datagram.len() }, "send");
        self.socket
            .send(datagram)
            .await
            .map(drop)
            .map_err(|source| {
                Error::Io {
                    target: self.peer,
                    source,
                }
                .boxed()
            })
    }

    async fn recv(&self, timeout: Duration) -> Result<Bytes> {
        let mut buf = vec![0u8; MAX_DATAGRAM];
        let received = tokio::time::timeout(timeout, self.socket.recv(&mut buf)).await;
        match received {
            Ok(Ok(len)) => {
                buf.truncate(len);
                tracing::trace!(target: "cyberpower_pdu::transport", { snmp.target = %self.peer, snmp.bytes = len }, "recv");
                Ok(Bytes::from(buf))
            }
            // A refused port shows up here once the ICMP error arrives
            Ok(Err(source)) => Err(Error::Io {
                target: self.peer,
                source,
            }
            .boxed()),
            Err(_) => Err(Error::Timeout {
                target: self.peer,
                elapsed: timeout,
            }
            .boxed()),
        }
    }

    fn peer_addr(&self) -> SocketAddr {
        self.peer
    }
}
