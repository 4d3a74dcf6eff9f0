//! CyberPower PDU outlet control.
//!
//! The PDU exposes each outlet as a row of `ePDUOutletControlOutletCommand`.
//! Writing an [`OutletCommand`] code to the row switches, reboots or identifies
//! that outlet. [`PduClient`] performs exactly one such write per call.

mod client;
mod command;
mod error;

pub use client::PduClient;
pub use command::{OUTLET_COMMAND_OID, OutletCommand, UnknownCommand, outlet_command_oid};
pub use error::{FailingBinding, SnmpError};

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use crate::client::DEFAULT_PORT;

/// A PDU outlet number, starting at 1.
///
/// Only positivity is checked; the device rejects indices it does not have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OutletId(NonZeroU32);

impl OutletId {
    /// Returns `None` for outlet 0.
    pub fn new(outlet: u32) -> Option<Self> {
        NonZeroU32::new(outlet).map(Self)
    }

    /// The outlet number, always at least 1.
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for OutletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<NonZeroU32> for OutletId {
    fn from(n: NonZeroU32) -> Self {
        Self(n)
    }
}

/// Error parsing an [`OutletId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid outlet '{0}': expected a positive integer")]
pub struct InvalidOutlet(pub String);

impl FromStr for OutletId {
    type Err = InvalidOutlet;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| InvalidOutlet(s.to_owned()))
    }
}

/// Network address of a PDU: a hostname or IP literal, optionally with `:port`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PduHost(String);

impl PduHost {
    /// Wraps `host` unchecked; it is resolved when a command is sent.
    pub fn new(host: impl Into<String>) -> Self {
        Self(host.into())
    }

    /// The host as given, including any port.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Explicit port, if one was given.
    ///
    /// Bare IPv6 literals such as `fe80::1` carry no port; use brackets
    /// (`[fe80::1]:1161`) to give one.
    pub fn port(&self) -> Option<u16> {
        let host = self.0.trim();
        if let Some(rest) = host.strip_prefix('[') {
            return rest.split_once("]:").and_then(|(_, port)| port.parse().ok());
        }
        match host.split_once(':') {
            Some((_, port)) if !port.contains(':') => port.parse().ok(),
            _ => None,
        }
    }

    /// The port requests are sent to.
    pub fn effective_port(&self) -> u16 {
        self.port().unwrap_or(DEFAULT_PORT)
    }
}

impl fmt::Display for PduHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PduHost {
    fn from(host: &str) -> Self {
        Self::new(host)
    }
}

impl From<String> for PduHost {
    fn from(host: String) -> Self {
        Self(host)
    }
}

impl FromStr for PduHost {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outlet_id_rejects_zero() {
        assert_eq!(OutletId::new(0), None);
        assert_eq!(OutletId::new(3).map(OutletId::get), Some(3));
    }

    #[test]
    fn test_outlet_id_parse() {
        assert_eq!("8".parse::<OutletId>().unwrap().get(), 8);
        assert_eq!(" 2 ".parse::<OutletId>().unwrap().get(), 2);
        assert!("0".parse::<OutletId>().is_err());
        assert!("-1".parse::<OutletId>().is_err());
        assert_eq!(
            "one".parse::<OutletId>().unwrap_err().to_string(),
            "invalid outlet 'one': expected a positive integer"
        );
    }

    #[test]
    fn test_host_ports() {
        assert_eq!(PduHost::new("10.0.0.5").port(), None);
        assert_eq!(PduHost::new("10.0.0.5").effective_port(), 161);
        assert_eq!(PduHost::new("pdu1.lab:1161").port(), Some(1161));
        assert_eq!(PduHost::new("fe80::1").port(), None);
        assert_eq!(PduHost::new("[fe80::1]:1161").port(), Some(1161));
        assert_eq!(PduHost::new("[fe80::1]").effective_port(), 161);
    }

    #[test]
    fn test_host_display_keeps_input() {
        let host: PduHost = "pdu1.lab:1161".parse().unwrap();
        assert_eq!(host.to_string(), "pdu1.lab:1161");
        assert_eq!(host.as_str(), "pdu1.lab:1161");
    }
}
