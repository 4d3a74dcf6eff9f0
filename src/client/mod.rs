//! The SNMP manager side.
//!
//! Every operation is one request datagram and one reply datagram. A
//! timeout is final; nothing is resent.

mod builder;

pub use builder::ClientBuilder;

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use bytes::Bytes;
use tracing::{Span, instrument};

use crate::error::{Error, ErrorStatus, Result};
use crate::message::{Message, PduKind, SNMP_V1};
use crate::oid::Oid;
use crate::transport::{Transport, UdpTransport};

/// How long to wait for a reply.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// SNMP agent port.
pub const DEFAULT_PORT: u16 = 161;

/// CyberPower PDUs ship with `private` as the write community.
pub const DEFAULT_COMMUNITY: &str = "private";

impl Client<UdpTransport> {
    /// Start building a UDP client for `target` (`host` or `host:port`).
    ///
    /// ```rust,no_run
    /// use cyberpower_pdu::{Client, oid};
    ///
    /// # async fn example() -> cyberpower_pdu::Result<()> {
    /// let client = Client::builder("10.0.0.5").community("private").connect().await?;
    /// client
    ///     .set(&oid!(1, 3, 6, 1, 4, 1, 3808, 1, 1, 3, 3, 3, 1, 1, 4, 3), 1)
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder(target: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(target)
    }
}

/// An SNMPv1 client bound to one agent.
///
/// Cheap to clone; clones share the transport and the request-id counter.
#[derive(Clone)]
pub struct Client<T: Transport = UdpTransport> {
    inner: Arc<Shared<T>>,
}

struct Shared<T: Transport> {
    transport: T,
    config: ClientConfig,
    request_ids: AtomicI32,
}

/// Settings applied to every request.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Write community (default `private`).
    pub community: Bytes,
    /// How long to wait for each reply (default 5 seconds).
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            community: Bytes::from_static(DEFAULT_COMMUNITY.as_bytes()),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

// Clock-derived so that back-to-back CLI runs do not start on the same id
fn seed_request_id() -> i32 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(1, |d| d.subsec_nanos() ^ (d.as_secs() as u32));
    (nanos & 0x7FFF_FFFF).max(1) as i32
}

impl<T: Transport> Client<T> {
    /// A client over `transport`; does no I/O.
    pub fn new(transport: T, config: ClientConfig) -> Self {
        Self {
            inner: Arc::new(Shared {
                transport,
                config,
                request_ids: AtomicI32::new(seed_request_id()),
            }),
        }
    }

    /// Address of the agent.
    pub fn peer_addr(&self) -> SocketAddr {
        self.inner.transport.peer_addr()
    }

    /// Settings this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Next request id, always in `1..=i32::MAX`.
    fn request_id(&self) -> i32 {
        let id = self.inner.request_ids.fetch_add(1, Ordering::Relaxed);
        if id > 0 {
            return id;
        }
        self.inner.request_ids.store(2, Ordering::Relaxed);
        1
    }

    /// Write one INTEGER value.
    ///
    /// Sends exactly one SetRequest. A reply with error status zero is
    /// success whatever bindings it carries; a nonzero status becomes
    /// [`Error::Snmp`] naming the request binding at the error index.
    #[instrument(
        level = "debug",
        skip(self),
        err,
        fields(
            snmp.target = %self.peer_addr(),
            snmp.oid = %oid,
            snmp.request_id = tracing::field::Empty,
            snmp.elapsed_ms = tracing::field::Empty,
        )
    )]
    pub async fn set(&self, oid: &Oid, value: i32) -> Result<()> {
        let target = self.peer_addr();
        let config = &self.inner.config;
        let request = Message::set_request(config.community.clone(), self.request_id(), oid.clone(), value);
        Span::current().record("snmp.request_id", request.request_id);

        let started = Instant::now();
        self.inner.transport.send(&request.encode()).await?;
        let data = self.inner.transport.recv(config.timeout).await?;
        Span::current().record("snmp.elapsed_ms", started.elapsed().as_millis() as u64);

        let reply = Message::decode(data, target)?;
        if reply.version != SNMP_V1 || reply.kind != PduKind::Response {
            tracing::debug!(target: "cyberpower_pdu::client", { snmp.version = reply.version, snmp.pdu = ?reply.kind }, "reply is not an SNMPv1 Response");
            return Err(Error::MalformedResponse { target }.boxed());
        }
        if reply.request_id != request.request_id {
            tracing::debug!(target: "cyberpower_pdu::client", { snmp.expected = request.request_id, snmp.actual = reply.request_id }, "reply answers another request");
            return Err(Error::MalformedResponse { target }.boxed());
        }

        if reply.error_status == 0 {
            return Ok(());
        }
        // A zero index means the whole request; agents need not echo bindings
        let oid = request.binding_at(reply.error_index).map(|b| b.oid.clone());
        Err(Error::Snmp {
            target,
            status: ErrorStatus::from_code(reply.error_status),
            index: u32::try_from(reply.error_index).unwrap_or(0),
            oid,
        }
        .boxed())
    }
}
