//! Engine errors.
//!
//! [`Error`] covers everything that can go wrong in one SNMP exchange. The
//! outlet API folds it into [`SnmpError`](crate::SnmpError); match on this
//! type only when driving [`Client`](crate::Client) directly.
//!
//! ```rust
//! use cyberpower_pdu::{Error, ErrorStatus};
//!
//! fn describe(err: &Error) -> String {
//!     match err {
//!         Error::Snmp { status: ErrorStatus::NoSuchName, .. } => "no such outlet".into(),
//!         Error::Timeout { .. } => "PDU did not answer".into(),
//!         other => other.to_string(),
//!     }
//! }
//! ```

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use crate::oid::Oid;

/// Boxed so that `Result<()>` stays one pointer wide.
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Everything that can fail in one exchange with an agent.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Socket failure, including ICMP port-unreachable reported on receive.
    #[error("network error communicating with {target}: {source}")]
    Io {
        target: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// No reply arrived in time. Requests are never resent.
    #[error("timed out after {elapsed:?} waiting for {target}")]
    Timeout {
        target: SocketAddr,
        elapsed: Duration,
    },

    /// The agent answered with a nonzero error status.
    ///
    /// `oid` is the request binding at the 1-based `index`, when there is one.
    #[error("{target} rejected the request: {status} at index {index}")]
    Snmp {
        target: SocketAddr,
        status: ErrorStatus,
        index: u32,
        oid: Option<Oid>,
    },

    /// The reply could not be decoded or did not answer our request.
    #[error("malformed response from {target}")]
    MalformedResponse { target: SocketAddr },

    #[error("invalid OID '{0}'")]
    InvalidOid(Box<str>),

    /// Bad or unresolvable target address.
    #[error("configuration error: {0}")]
    Config(Box<str>),
}

impl Error {
    /// Box for use as the error half of [`Result`].
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }
}

/// Response error-status values: RFC 1157 (0 to 5) and RFC 3416 (6 to 18).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorStatus {
    NoError,
    TooBig,
    NoSuchName,
    BadValue,
    ReadOnly,
    GenErr,
    NoAccess,
    WrongType,
    WrongLength,
    WrongEncoding,
    WrongValue,
    NoCreation,
    InconsistentValue,
    ResourceUnavailable,
    CommitFailed,
    UndoFailed,
    AuthorizationError,
    NotWritable,
    InconsistentName,
    /// A code outside the assigned range.
    Unknown(i32),
}

/// Assigned statuses in code order, with their MIB labels.
const ASSIGNED: [(ErrorStatus, &str); 19] = [
    (ErrorStatus::NoError, "noError"),
    (ErrorStatus::TooBig, "tooBig"),
    (ErrorStatus::NoSuchName, "noSuchName"),
    (ErrorStatus::BadValue, "badValue"),
    (ErrorStatus::ReadOnly, "readOnly"),
    (ErrorStatus::GenErr, "genErr"),
    (ErrorStatus::NoAccess, "noAccess"),
    (ErrorStatus::WrongType, "wrongType"),
    (ErrorStatus::WrongLength, "wrongLength"),
    (ErrorStatus::WrongEncoding, "wrongEncoding"),
    (ErrorStatus::WrongValue, "wrongValue"),
    (ErrorStatus::NoCreation, "noCreation"),
    (ErrorStatus::InconsistentValue, "inconsistentValue"),
    (ErrorStatus::ResourceUnavailable, "resourceUnavailable"),
    (ErrorStatus::CommitFailed, "commitFailed"),
    (ErrorStatus::UndoFailed, "undoFailed"),
    (ErrorStatus::AuthorizationError, "authorizationError"),
    (ErrorStatus::NotWritable, "notWritable"),
    (ErrorStatus::InconsistentName, "inconsistentName"),
];

impl ErrorStatus {
    /// Map a wire code; unassigned codes become `Unknown`.
    pub fn from_code(code: i32) -> Self {
        usize::try_from(code)
            .ok()
            .and_then(|i| ASSIGNED.get(i))
            .map_or(Self::Unknown(code), |&(status, _)| status)
    }

    /// The wire code.
    pub fn code(self) -> i32 {
        match self {
            Self::Unknown(code) => code,
            known => ASSIGNED
                .iter()
                .position(|&(status, _)| status == known)
                .map_or(-1, |i| i as i32),
        }
    }
}

impl fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match ASSIGNED.iter().find(|&&(status, _)| status == *self) {
            Some((_, name)) => f.write_str(name),
            None => write!(f, "unknown({})", self.code()),
        }
    }
}
