//! Front-to-back BER writers.
//!
//! Constructed elements are staged in a scratch buffer so their length is
//! known before the header is written. Outlet commands are a few dozen bytes,
//! so the extra copy is irrelevant.

use bytes::{BufMut, BytesMut};

use super::{INTEGER, NULL, OBJECT_IDENTIFIER, OCTET_STRING};
use crate::oid::Oid;

fn write_length(out: &mut BytesMut, len: usize) {
    if len < 0x80 {
        out.put_u8(len as u8);
        return;
    }
    let octets = (len as u64).to_be_bytes();
    let skip = octets.iter().take_while(|&&b| b == 0).count();
    out.put_u8(0x80 | (octets.len() - skip) as u8);
    out.put_slice(&octets[skip..]);
}

fn write_tlv(out: &mut BytesMut, tag: u8, content: &[u8]) {
    out.put_u8(tag);
    write_length(out, content.len());
    out.put_slice(content);
}

/// Write `tag` around whatever `content` writes.
pub(crate) fn write_constructed(out: &mut BytesMut, tag: u8, content: impl FnOnce(&mut BytesMut)) {
    let mut inner = BytesMut::new();
    content(&mut inner);
    write_tlv(out, tag, &inner);
}

/// INTEGER in its shortest two's-complement form.
pub(crate) fn write_integer(out: &mut BytesMut, value: i32) {
    let octets = value.to_be_bytes();
    // A leading octet is redundant when it only repeats the sign of the next one
    let skip = octets
        .windows(2)
        .take_while(|pair| (pair[0] == 0x00 && pair[1] < 0x80) || (pair[0] == 0xFF && pair[1] >= 0x80))
        .count();
    write_tlv(out, INTEGER, &octets[skip..]);
}

pub(crate) fn write_octet_string(out: &mut BytesMut, value: &[u8]) {
    write_tlv(out, OCTET_STRING, value);
}

pub(crate) fn write_null(out: &mut BytesMut) {
    write_tlv(out, NULL, &[]);
}

pub(crate) fn write_oid(out: &mut BytesMut, oid: &Oid) {
    let mut content = BytesMut::new();
    let arcs = oid.arcs();
    // X.690 8.19.4: the first two arcs share one subidentifier
    let first = match arcs {
        [] => None,
        [a] => Some(u64::from(*a) * 40),
        [a, b, ..] => Some(u64::from(*a) * 40 + u64::from(*b)),
    };
    for subid in first.into_iter().chain(arcs.iter().skip(2).map(|&arc| u64::from(arc))) {
        write_subidentifier(&mut content, subid);
    }
    write_tlv(out, OBJECT_IDENTIFIER, &content);
}

fn write_subidentifier(out: &mut BytesMut, value: u64) {
    let groups = (64 - value.leading_zeros()).div_ceil(7).max(1);
    for group in (0..groups).rev() {
        let septet = ((value >> (group * 7)) & 0x7F) as u8;
        out.put_u8(if group == 0 { septet } else { septet | 0x80 });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(f: impl FnOnce(&mut BytesMut)) -> Vec<u8> {
        let mut out = BytesMut::new();
        f(&mut out);
        out.to_vec()
    }

    #[test]
    fn integers_are_minimal() {
        let cases: [(i32, &[u8]); 8] = [
            (0, &[0x02, 0x01, 0x00]),
            (1, &[0x02, 0x01, 0x01]),
            (127, &[0x02, 0x01, 0x7F]),
            (128, &[0x02, 0x02, 0x00, 0x80]),
            (-1, &[0x02, 0x01, 0xFF]),
            (-129, &[0x02, 0x02, 0xFF, 0x7F]),
            (i32::MAX, &[0x02, 0x04, 0x7F, 0xFF, 0xFF, 0xFF]),
            (i32::MIN, &[0x02, 0x04, 0x80, 0x00, 0x00, 0x00]),
        ];
        for (value, expected) in cases {
            assert_eq!(encoded(|out| write_integer(out, value)), expected, "{}", value);
        }
    }

    #[test]
    fn long_form_length() {
        let content = vec![0xAB; 200];
        let bytes = encoded(|out| write_octet_string(out, &content));
        assert_eq!(&bytes[..3], &[0x04, 0x81, 200]);
        assert_eq!(bytes.len(), 203);

        let content = vec![0; 0x1234];
        let bytes = encoded(|out| write_octet_string(out, &content));
        assert_eq!(&bytes[..4], &[0x04, 0x82, 0x12, 0x34]);
    }

    #[test]
    fn vendor_oid_uses_multi_byte_subidentifier() {
        let oid = Oid::from_slice(&[1, 3, 6, 1, 4, 1, 3808]);
        // 3808 = 0x1D * 128 + 0x60
        assert_eq!(
            encoded(|out| write_oid(out, &oid)),
            [0x06, 0x07, 0x2B, 0x06, 0x01, 0x04, 0x01, 0x9D, 0x60]
        );
    }

    #[test]
    fn large_second_arc_does_not_overflow() {
        let oid = Oid::from_slice(&[2, u32::MAX]);
        let bytes = encoded(|out| write_oid(out, &oid));
        // 2 * 40 + 0xFFFF_FFFF = 0x1_0000_004F needs five septets
        assert_eq!(bytes, [0x06, 0x05, 0x90, 0x80, 0x80, 0x80, 0x4F]);
    }

    #[test]
    fn constructed_wraps_content() {
        let bytes = encoded(|out| {
            write_constructed(out, 0x30, |seq| {
                write_null(seq);
                write_integer(seq, 2);
            })
        });
        assert_eq!(bytes, [0x30, 0x05, 0x05, 0x00, 0x02, 0x01, 0x02]);
    }
}
