//! The subset of BER (X.690) that SNMPv1 outlet commands need.
//!
//! Only definite lengths and the universal INTEGER, OCTET STRING, NULL,
//! OBJECT IDENTIFIER and SEQUENCE types are understood. Anything else inside
//! a response is carried as an opaque TLV.

mod decode;
mod encode;

pub(crate) use decode::{Decoder, decode_integer};
pub(crate) use encode::{write_constructed, write_integer, write_null, write_octet_string, write_oid};

pub(crate) const INTEGER: u8 = 0x02;
pub(crate) const OCTET_STRING: u8 = 0x04;
pub(crate) const NULL: u8 = 0x05;
pub(crate) const OBJECT_IDENTIFIER: u8 = 0x06;
pub(crate) const SEQUENCE: u8 = 0x30;

/// Why a datagram could not be decoded.
///
/// Logged at debug level; callers only ever see
/// [`Error::MalformedResponse`](crate::Error::MalformedResponse).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub(crate) enum DecodeErrorKind {
    #[error("data ends inside an element")]
    Truncated,
    #[error("indefinite or oversized length")]
    BadLength,
    #[error("expected tag 0x{expected:02X}, found 0x{found:02X}")]
    UnexpectedTag { expected: u8, found: u8 },
    #[error("empty INTEGER")]
    EmptyInteger,
    #[error("INTEGER does not fit in 32 bits")]
    IntegerOverflow,
    #[error("unterminated or oversized OID subidentifier")]
    BadSubidentifier,
    #[error("OID exceeds {} arcs", crate::oid::MAX_OID_LEN)]
    OidTooLong,
    #[error("{0} unexpected bytes after element")]
    TrailingData(usize),
    #[error("PDU tag 0x{0:02X} is not a SetRequest or Response")]
    UnexpectedPdu(u8),
}
