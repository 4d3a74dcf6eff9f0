//! Outcome errors for outlet operations.

use crate::error::Error;
use crate::oid::Oid;

/// The request binding an agent blamed for an error status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailingBinding {
    /// 1-based position in the request's variable-binding list.
    pub index: u32,
    /// OID of that binding.
    pub oid: Oid,
}

/// Why an outlet operation failed.
///
/// `Indication` means the exchange never completed; `Status` means the PDU
/// answered and refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnmpError {
    /// The exchange could not complete (unreachable host, timeout,
    /// undecodable reply, ...). Carries the engine's message.
    #[error("{0}")]
    Indication(String),

    /// The agent returned a nonzero error status.
    #[error("{message} at {}", binding_location(.failing_binding))]
    Status {
        /// Error status name, e.g. `noSuchName`.
        message: String,
        /// The offending request binding, when the error index resolves to one.
        failing_binding: Option<FailingBinding>,
    },
}

fn binding_location(binding: &Option<FailingBinding>) -> String {
    binding
        .as_ref()
        .map_or_else(|| "?".to_owned(), |binding| binding.oid.to_string())
}

impl SnmpError {
    /// True for [`SnmpError::Status`].
    pub fn is_status(&self) -> bool {
        matches!(self, Self::Status { .. })
    }
}

impl From<Box<Error>> for SnmpError {
    fn from(err: Box<Error>) -> Self {
        match *err {
            Error::Snmp {
                status, index, oid, ..
            } => SnmpError::Status {
                message: status.to_string(),
                failing_binding: oid.map(|oid| FailingBinding { index, oid }),
            },
            other => SnmpError::Indication(other.to_string()),
        }
    }
}
