//! Object identifiers.

use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

use crate::ber::DecodeErrorKind;
use crate::error::{Error, Result};

/// Most arcs accepted from the wire (RFC 2578 section 3.5).
pub const MAX_OID_LEN: usize = 128;

/// An OID such as `1.3.6.1.4.1.3808.1.1.3.3.3.1.1.4.3`.
///
/// Arcs are kept inline up to 16, which covers every outlet-control OID.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Oid(SmallVec<[u32; 16]>);

impl Oid {
    /// An OID with the given arcs.
    pub fn from_slice(arcs: &[u32]) -> Self {
        Self(SmallVec::from_slice(arcs))
    }

    /// Parse dotted-decimal notation. A single leading dot is allowed.
    ///
    /// ```
    /// use cyberpower_pdu::Oid;
    ///
    /// let oid = Oid::parse(".1.3.6.1.4.1.3808").unwrap();
    /// assert_eq!(oid.arcs(), &[1, 3, 6, 1, 4, 1, 3808]);
    /// assert!(Oid::parse("1.3.x").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let body = s.strip_prefix('.').unwrap_or(s);
        let invalid = || Error::InvalidOid(s.into()).boxed();
        if body.is_empty() {
            return Err(invalid());
        }
        body.split('.')
            .map(|arc| arc.parse::<u32>().map_err(|_| invalid()))
            .collect::<Result<SmallVec<_>>>()
            .map(Self)
    }

    /// The arcs, root first.
    pub fn arcs(&self) -> &[u32] {
        &self.0
    }

    /// Number of arcs.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the zero-length OID.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if `prefix` is this OID or one of its ancestors.
    pub fn starts_with(&self, prefix: &Oid) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// The OID with its last arc removed, or `None` if it is empty.
    pub fn parent(&self) -> Option<Oid> {
        self.0.split_last().map(|(_, head)| Self::from_slice(head))
    }

    /// This OID extended by one arc, e.g. a table column plus a row index.
    pub fn child(&self, arc: u32) -> Oid {
        let mut arcs = self.0.clone();
        arcs.push(arc);
        Self(arcs)
    }

    /// Decode the content octets of an OBJECT IDENTIFIER.
    pub(crate) fn from_ber_content(content: &[u8]) -> std::result::Result<Self, DecodeErrorKind> {
        let mut arcs = SmallVec::new();
        let mut subid: u64 = 0;
        let mut first = true;
        for (i, &byte) in content.iter().enumerate() {
            if subid > u64::MAX >> 7 {
                return Err(DecodeErrorKind::BadSubidentifier);
            }
            subid = (subid << 7) | u64::from(byte & 0x7F);
            if byte & 0x80 != 0 {
                if i + 1 == content.len() {
                    return Err(DecodeErrorKind::BadSubidentifier);
                }
                continue;
            }
            if first {
                let (a, b) = match subid {
                    0..40 => (0, subid),
                    40..80 => (1, subid - 40),
                    _ => (2, subid - 80),
                };
                arcs.push(a);
                arcs.push(u32::try_from(b).map_err(|_| DecodeErrorKind::BadSubidentifier)?);
                first = false;
            } else {
                arcs.push(u32::try_from(subid).map_err(|_| DecodeErrorKind::BadSubidentifier)?);
            }
            if arcs.len() > MAX_OID_LEN {
                return Err(DecodeErrorKind::OidTooLong);
            }
            subid = 0;
        }
        Ok(Self(arcs))
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut arcs = self.0.iter();
        if let Some(first) = arcs.next() {
            write!(f, "{}", first)?;
        }
        for arc in arcs {
            write!(f, ".{}", arc)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Oid({})", self)
    }
}

impl FromStr for Oid {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl<const N: usize> From<[u32; N]> for Oid {
    fn from(arcs: [u32; N]) -> Self {
        Self::from_slice(&arcs)
    }
}

/// Build an [`Oid`] from literal arcs.
///
/// ```
/// use cyberpower_pdu::oid;
///
/// assert_eq!(oid!(1, 3, 6, 1).to_string(), "1.3.6.1");
/// ```
#[macro_export]
macro_rules! oid {
    ($($arc:expr),* $(,)?) => {
        $crate::oid::Oid::from_slice(&[$($arc),*])
    };
}
