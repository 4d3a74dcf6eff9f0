//! The PDU outlet client.

use std::time::Duration;

use tracing::instrument;

use crate::client::{ClientBuilder, DEFAULT_COMMUNITY, DEFAULT_TIMEOUT};
use crate::transport::Transport;

use super::{OutletCommand, OutletId, PduHost, SnmpError, outlet_command_oid};

/// Controls the outlets of one CyberPower PDU.
///
/// Construction does no I/O. Each operation resolves the host, opens a fresh
/// UDP socket, sends one SNMPv1 SET and waits for one reply.
///
/// # Example
///
/// ```rust,no_run
/// use cyberpower_pdu::{OutletId, PduClient, PduHost};
///
/// # async fn example() -> Result<(), cyberpower_pdu::SnmpError> {
/// let pdu = PduClient::new(PduHost::new("10.0.0.5"));
/// pdu.set_outlet_power(OutletId::new(3).unwrap(), true).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PduClient {
    host: PduHost,
    community: String,
    timeout: Duration,
}

impl PduClient {
    /// A client for `host` with the `private` community and a 5 second timeout.
    pub fn new(host: impl Into<PduHost>) -> Self {
        Self {
            host: host.into(),
            community: DEFAULT_COMMUNITY.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the write community (default: `private`).
    pub fn community(mut self, community: impl Into<String>) -> Self {
        self.community = community.into();
        self
    }

    /// Set how long to wait for the reply (default: 5 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The PDU this client addresses.
    pub fn host(&self) -> &PduHost {
        &self.host
    }

    fn builder(&self) -> ClientBuilder {
        ClientBuilder::new(self.host.as_str())
            .community(&self.community)
            .timeout(self.timeout)
    }

    /// Switch `outlet` on or off immediately.
    pub async fn set_outlet_power(&self, outlet: OutletId, on: bool) -> Result<(), SnmpError> {
        self.send_command(outlet, OutletCommand::from_power(on)).await
    }

    /// Write `command` to `outlet`'s control object.
    #[instrument(skip(self), err, fields(pdu.host = %self.host, pdu.outlet = %outlet, pdu.command = %command))]
    pub async fn send_command(
        &self,
        outlet: OutletId,
        command: OutletCommand,
    ) -> Result<(), SnmpError> {
        let client = self.builder().connect().await?;
        let oid = outlet_command_oid(outlet);
        client.set(&oid, command.code()).await?;
        tracing::debug!(target: "cyberpower_pdu::outlet", "command accepted");
        Ok(())
    }

    /// [`set_outlet_power`](Self::set_outlet_power) over a caller-supplied transport.
    pub async fn set_outlet_power_over<T: Transport>(
        &self,
        transport: T,
        outlet: OutletId,
        on: bool,
    ) -> Result<(), SnmpError> {
        self.send_command_over(transport, outlet, OutletCommand::from_power(on))
            .await
    }

    /// [`send_command`](Self::send_command) over a caller-supplied transport.
    ///
    /// The host is not resolved; the transport already knows its peer.
    #[instrument(skip(self, transport), err, fields(pdu.target = %transport.peer_addr(), pdu.outlet = %outlet, pdu.command = %command))]
    pub async fn send_command_over<T: Transport>(
        &self,
        transport: T,
        outlet: OutletId,
        command: OutletCommand,
    ) -> Result<(), SnmpError> {
        let client = self.builder().build_with(transport);
        let oid = outlet_command_oid(outlet);
        client.set(&oid, command.code()).await?;
        Ok(())
    }

    /// Blocking form of [`set_outlet_power`](Self::set_outlet_power).
    ///
    /// Runs the exchange on a private current-thread runtime. Must not be
    /// called from inside an async context.
    pub fn set_outlet_power_blocking(&self, outlet: OutletId, on: bool) -> Result<(), SnmpError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| SnmpError::Indication(format!("failed to start runtime: {}", e)))?;
        runtime.block_on(self.set_outlet_power(outlet, on))
    }
}
