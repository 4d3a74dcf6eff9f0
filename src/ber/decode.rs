//! Zero-copy BER reader.

use bytes::Bytes;

use super::{DecodeErrorKind, INTEGER, OBJECT_IDENTIFIER, OCTET_STRING};
use crate::oid::Oid;

type DecodeResult<T> = Result<T, DecodeErrorKind>;

/// Reads consecutive TLVs out of a shared buffer.
///
/// Constructed elements are read into a child `Decoder` over the same
/// allocation, so nothing is copied.
#[derive(Debug, Clone)]
pub(crate) struct Decoder {
    data: Bytes,
    pos: usize,
}

impl Decoder {
    pub(crate) fn new(data: Bytes) -> Self {
        Self { data, pos: 0 }
    }

    fn rest(&self) -> &[u8] {
        &self.data[self.pos..]
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Fail unless every byte has been consumed.
    pub(crate) fn finish(&self) -> DecodeResult<()> {
        match self.rest().len() {
            0 => Ok(()),
            n => Err(DecodeErrorKind::TrailingData(n)),
        }
    }

    /// Read the next TLV of any tag.
    pub(crate) fn read_any(&mut self) -> DecodeResult<(u8, Bytes)> {
        let (&tag, rest) = self.rest().split_first().ok_or(DecodeErrorKind::Truncated)?;
        let (len, len_octets) = read_length(rest)?;
        let start = self.pos + 1 + len_octets;
        let end = start.checked_add(len).ok_or(DecodeErrorKind::BadLength)?;
        if end > self.data.len() {
            return Err(DecodeErrorKind::Truncated);
        }
        self.pos = end;
        Ok((tag, self.data.slice(start..end)))
    }

    /// Read the next TLV, which must carry `tag`.
    pub(crate) fn read(&mut self, tag: u8) -> DecodeResult<Bytes> {
        let (found, content) = self.read_any()?;
        if found != tag {
            return Err(DecodeErrorKind::UnexpectedTag {
                expected: tag,
                found,
            });
        }
        Ok(content)
    }

    /// Enter a constructed element.
    pub(crate) fn read_constructed(&mut self, tag: u8) -> DecodeResult<Decoder> {
        self.read(tag).map(Decoder::new)
    }

    /// INTEGER. Non-minimal encodings are accepted as long as the value fits.
    pub(crate) fn read_integer(&mut self) -> DecodeResult<i32> {
        let content = self.read(INTEGER)?;
        decode_integer(&content)
    }

    pub(crate) fn read_octet_string(&mut self) -> DecodeResult<Bytes> {
        self.read(OCTET_STRING)
    }

    pub(crate) fn read_oid(&mut self) -> DecodeResult<Oid> {
        let content = self.read(OBJECT_IDENTIFIER)?;
        Oid::from_ber_content(&content)
    }
}

/// Returns the length and how many octets encoded it.
fn read_length(data: &[u8]) -> DecodeResult<(usize, usize)> {
    let (&first, rest) = data.split_first().ok_or(DecodeErrorKind::Truncated)?;
    if first < 0x80 {
        return Ok((usize::from(first), 1));
    }
    let count = usize::from(first & 0x7F);
    // 0x80 is the indefinite form; more than four octets is never a datagram
    if count == 0 || count > 4 {
        return Err(DecodeErrorKind::BadLength);
    }
    let octets = rest.get(..count).ok_or(DecodeErrorKind::Truncated)?;
    let len = octets
        .iter()
        .fold(0usize, |acc, &b| (acc << 8) | usize::from(b));
    Ok((len, 1 + count))
}

pub(crate) fn decode_integer(content: &[u8]) -> DecodeResult<i32> {
    let (&first, _) = content.split_first().ok_or(DecodeErrorKind::EmptyInteger)?;
    let negative = first & 0x80 != 0;
    let fill = if negative { 0xFF } else { 0x00 };
    // Sign-extension octets carry no value
    let mut digits = content;
    while digits.len() > 1 && digits[0] == fill && (digits[1] & 0x80 != 0) == negative {
        digits = &digits[1..];
    }
    if digits.len() > 4 {
        return Err(DecodeErrorKind::IntegerOverflow);
    }
    let init: i64 = if negative { -1 } else { 0 };
    let value = digits
        .iter()
        .fold(init, |acc, &b| (acc << 8) | i64::from(b));
    i32::try_from(value).map_err(|_| DecodeErrorKind::IntegerOverflow)
}
