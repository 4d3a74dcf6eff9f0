//! How request datagrams reach a PDU.
//!
//! [`UdpTransport`] talks to real hardware. With the `testing` feature,
//! [`MockTransport`] replays scripted replies and records what was sent.

mod udp;

#[cfg(any(test, feature = "testing"))]
mod mock;

pub use udp::UdpTransport;

#[cfg(any(test, feature = "testing"))]
pub use mock::{MockTransport, RecordedRequest, ResponseBuilder};

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use bytes::Bytes;

use crate::error::Result;

/// A datagram channel to one SNMP agent.
///
/// Clones share the underlying channel.
pub trait Transport: Send + Sync + Clone {
    /// Send one datagram to the agent.
    fn send(&self, datagram: &[u8]) -> impl Future<Output = Result<()>> + Send;

    /// Wait up to `timeout` for the next datagram from the agent.
    fn recv(&self, timeout: Duration) -> impl Future<Output = Result<Bytes>> + Send;

    /// Address of the agent; named in every error.
    fn peer_addr(&self) -> SocketAddr;
}
