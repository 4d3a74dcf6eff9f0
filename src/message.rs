//! SNMPv1 messages for outlet commands.
//!
//! A [`Message`] is the community envelope and its PDU flattened into one
//! struct. Requests carry a single INTEGER binding; responses may echo any
//! value type, but only INTEGER values are interpreted.

use std::net::SocketAddr;

use bytes::{Bytes, BytesMut};

use crate::ber::{self, DecodeErrorKind, Decoder};
use crate::error::{Error, Result};
use crate::oid::Oid;

/// The version field of an SNMPv1 message.
pub const SNMP_V1: i32 = 0;

/// PDU types this crate sends or accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PduKind {
    Response,
    SetRequest,
}

impl PduKind {
    const RESPONSE_TAG: u8 = 0xA2;
    const SET_REQUEST_TAG: u8 = 0xA3;

    /// BER tag of the PDU.
    pub fn tag(self) -> u8 {
        match self {
            Self::Response => Self::RESPONSE_TAG,
            Self::SetRequest => Self::SET_REQUEST_TAG,
        }
    }

    fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            Self::RESPONSE_TAG => Some(Self::Response),
            Self::SET_REQUEST_TAG => Some(Self::SetRequest),
            _ => None,
        }
    }
}

/// Value half of a variable binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingValue {
    Integer(i32),
    Null,
    /// Any other type, kept as its tag and raw content.
    Other { tag: u8, content: Bytes },
}

/// One (OID, value) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub oid: Oid,
    pub value: BindingValue,
}

impl Binding {
    /// An INTEGER binding.
    pub fn integer(oid: Oid, value: i32) -> Self {
        Self {
            oid,
            value: BindingValue::Integer(value),
        }
    }
}

/// A community-authenticated SNMP message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub version: i32,
    pub community: Bytes,
    pub kind: PduKind,
    pub request_id: i32,
    pub error_status: i32,
    pub error_index: i32,
    pub bindings: Vec<Binding>,
}

impl Message {
    /// An SNMPv1 SetRequest writing `value` to `oid`.
    pub fn set_request(community: impl Into<Bytes>, request_id: i32, oid: Oid, value: i32) -> Self {
        Self {
            version: SNMP_V1,
            community: community.into(),
            kind: PduKind::SetRequest,
            request_id,
            error_status: 0,
            error_index: 0,
            bindings: vec![Binding::integer(oid, value)],
        }
    }

    /// The binding a 1-based error index points at.
    pub fn binding_at(&self, index: i32) -> Option<&Binding> {
        let index = usize::try_from(index).ok()?.checked_sub(1)?;
        self.bindings.get(index)
    }

    /// BER-encode the whole message.
    pub fn encode(&self) -> Bytes {
        let mut out = BytesMut::with_capacity(64);
        ber::write_constructed(&mut out, ber::SEQUENCE, |msg| {
            ber::write_integer(msg, self.version);
            ber::write_octet_string(msg, &self.community);
            ber::write_constructed(msg, self.kind.tag(), |pdu| {
                ber::write_integer(pdu, self.request_id);
                ber::write_integer(pdu, self.error_status);
                ber::write_integer(pdu, self.error_index);
                ber::write_constructed(pdu, ber::SEQUENCE, |list| {
                    for binding in &self.bindings {
                        ber::write_constructed(list, ber::SEQUENCE, |pair| {
                            ber::write_oid(pair, &binding.oid);
                            match &binding.value {
                                BindingValue::Integer(v) => ber::write_integer(pair, *v),
                                BindingValue::Null => ber::write_null(pair),
                                BindingValue::Other { tag, content } => {
                                    ber::write_constructed(pair, *tag, |raw| {
                                        raw.extend_from_slice(content)
                                    })
                                }
                            }
                        });
                    }
                });
            });
        });
        out.freeze()
    }

    /// Decode a datagram received from `source`.
    ///
    /// The detailed reason for a failure is logged at debug level.
    pub fn decode(data: Bytes, source: SocketAddr) -> Result<Self> {
        Self::parse(data).map_err(|kind| {
            tracing::debug!(target: "cyberpower_pdu::message", { snmp.source = %source, kind = %kind }, "undecodable message");
            Error::MalformedResponse { target: source }.boxed()
        })
    }

    pub(crate) fn parse(data: Bytes) -> std::result::Result<Self, DecodeErrorKind> {
        let mut outer = Decoder::new(data);
        let mut msg = outer.read_constructed(ber::SEQUENCE)?;
        outer.finish()?;

        let version = msg.read_integer()?;
        let community = msg.read_octet_string()?;
        let (tag, pdu) = msg.read_any()?;
        msg.finish()?;
        let kind = PduKind::from_tag(tag).ok_or(DecodeErrorKind::UnexpectedPdu(tag))?;

        let mut pdu = Decoder::new(pdu);
        let request_id = pdu.read_integer()?;
        let error_status = pdu.read_integer()?;
        let error_index = pdu.read_integer()?;
        let mut list = pdu.read_constructed(ber::SEQUENCE)?;
        pdu.finish()?;

        let mut bindings = Vec::new();
        while !list.is_empty() {
            let mut pair = list.read_constructed(ber::SEQUENCE)?;
            let oid = pair.read_oid()?;
            let value = match pair.read_any()? {
                (ber::INTEGER, content) => BindingValue::Integer(ber::decode_integer(&content)?),
                (ber::NULL, _) => BindingValue::Null,
                (tag, content) => BindingValue::Other { tag, content },
            };
            pair.finish()?;
            bindings.push(Binding { oid, value });
        }

        Ok(Self {
            version,
            community,
            kind,
            request_id,
            error_status,
            error_index,
            bindings,
        })
    }
}
