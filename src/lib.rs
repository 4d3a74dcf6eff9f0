//! # cyberpower-pdu
//!
//! Outlet control for CyberPower switched PDUs over SNMP.
//!
//! Each operation sends a single SNMPv1 SET to the PDU's outlet control
//! table and reports whether the device accepted it. There is no session,
//! no retry and no cached device state.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cyberpower_pdu::{OutletId, PduClient, PduHost, SnmpError};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), SnmpError> {
//!     let pdu = PduClient::new(PduHost::new("10.0.0.5"));
//!     pdu.set_outlet_power(OutletId::new(3).unwrap(), true).await?;
//!     Ok(())
//! }
//! ```
//!
//! Callers without a Tokio runtime can use
//! [`PduClient::set_outlet_power_blocking`].
//!
//! ## Lower-level access
//!
//! [`Client`] writes a single INTEGER to any OID over any [`Transport`]:
//!
//! ```rust,no_run
//! use cyberpower_pdu::{Client, oid};
//!
//! # async fn example() -> cyberpower_pdu::Result<()> {
//! let client = Client::builder("10.0.0.5").community("private").connect().await?;
//! client
//!     .set(&oid!(1, 3, 6, 1, 4, 1, 3808, 1, 1, 3, 3, 3, 1, 1, 4, 3), 1)
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub(crate) mod ber;
pub mod client;
pub mod error;
pub mod message;
pub mod oid;
pub mod outlet;
pub mod transport;

#[cfg(feature = "cli")]
pub mod cli;

pub use client::{Client, ClientBuilder, ClientConfig};
pub use error::{Error, ErrorStatus, Result};
pub use message::{Binding, BindingValue, Message, PduKind};
pub use oid::Oid;
pub use outlet::{
    FailingBinding, OUTLET_COMMAND_OID, OutletCommand, OutletId, PduClient, PduHost, SnmpError,
    outlet_command_oid,
};
pub use transport::{Transport, UdpTransport};
