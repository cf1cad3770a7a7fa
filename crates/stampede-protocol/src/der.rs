//! Distinguished Encoding Rules primitives.
//!
//! Encoders append a complete tag-length-value to an output buffer. The `*_size` companions
//! return the number of bytes the encoder will append so callers can pre-size buffers and
//! compute enclosing SEQUENCE lengths without encoding twice.

use crate::error::Error;

/// Universal class tags used by the time-stamp protocol
pub mod tag {
    pub const BOOLEAN: u8 = 0x01;
    pub const INTEGER: u8 = 0x02;
    pub const BIT_STRING: u8 = 0x03;
    pub const OCTET_STRING: u8 = 0x04;
    pub const NULL: u8 = 0x05;
    pub const OID: u8 = 0x06;
    pub const UTF8_STRING: u8 = 0x0c;
    pub const GENERALIZED_TIME: u8 = 0x18;
    pub const SEQUENCE: u8 = 0x30;
    pub const SET: u8 = 0x31;
    pub const CONTEXT_0: u8 = 0xa0;
}

/// DER BOOLEAN TRUE content octet
pub const TRUE: u8 = 0xff;

/// Number of octets needed to encode `len` as a DER length.
pub const fn length_size(len: usize) -> usize {
    if len < 0x80 {
        1
    } else {
        1 + significant_bytes(len)
    }
}

/// Total size of a TLV whose content is `content_len` bytes (single-octet tags only).
pub const fn tlv_size(content_len: usize) -> usize {
    1 + length_size(content_len) + content_len
}

/// Append a DER length. Short form for lengths up to 127, otherwise the long form with the
/// minimal number of length octets.
pub fn encode_length(len: usize, out: &mut Vec<u8>) {
    if len < 0x80 {
        out.push(len as u8);
        return;
    }

    let nbytes = significant_bytes(len);
    out.push(0x80 | nbytes as u8);
    out.extend_from_slice(&len.to_be_bytes()[size_of::<usize>() - nbytes..]);
}

/// Append a tag followed by the length of content that the caller will append next.
pub fn encode_header(tag: u8, content_len: usize, out: &mut Vec<u8>) {
    out.push(tag);
    encode_length(content_len, out);
}

pub fn encode_tlv(tag: u8, content: &[u8], out: &mut Vec<u8>) {
    encode_header(tag, content.len(), out);
    out.extend_from_slice(content);
}

pub fn encode_sequence(content: &[u8], out: &mut Vec<u8>) {
    encode_tlv(tag::SEQUENCE, content, out);
}

pub fn encode_octet_string(content: &[u8], out: &mut Vec<u8>) {
    encode_tlv(tag::OCTET_STRING, content, out);
}

pub fn encode_oid_tlv(content: &[u8], out: &mut Vec<u8>) {
    encode_tlv(tag::OID, content, out);
}

pub fn encode_null(out: &mut Vec<u8>) {
    out.extend_from_slice(&[tag::NULL, 0x00]);
}

pub fn encode_boolean(value: bool, out: &mut Vec<u8>) {
    out.extend_from_slice(&[tag::BOOLEAN, 0x01, if value { TRUE } else { 0x00 }]);
}

/// Append an INTEGER holding the non-negative value whose big-endian magnitude is `magnitude`.
///
/// Redundant leading zero bytes are dropped, a zero pad byte is prepended when the high bit
/// of the first remaining byte is set, and an empty or all-zero magnitude encodes as `02 01 00`.
pub fn encode_unsigned_integer(magnitude: &[u8], out: &mut Vec<u8>) {
    let magnitude = strip_leading_zeros(magnitude);
    let content_len = unsigned_content_size(magnitude);

    encode_header(tag::INTEGER, content_len, out);

    if content_len > magnitude.len() {
        out.push(0x00);
    }
    out.extend_from_slice(magnitude);
}

/// Number of bytes [`encode_unsigned_integer`] appends for `magnitude`.
pub fn unsigned_integer_size(magnitude: &[u8]) -> usize {
    tlv_size(unsigned_content_size(strip_leading_zeros(magnitude)))
}

/// Decode INTEGER content octets (two's complement, big-endian) into an `i64`.
pub fn decode_integer(content: &[u8]) -> Result<i64, Error> {
    if content.is_empty() {
        return Err(Error::BufferTooSmall(1, 0));
    }

    if content.len() > size_of::<i64>() {
        return Err(Error::IntegerOverflow(content.len()));
    }

    let fill = if content[0] & 0x80 != 0 { 0xff } else { 0x00 };
    let mut bytes = [fill; size_of::<i64>()];
    bytes[size_of::<i64>() - content.len()..].copy_from_slice(content);

    Ok(i64::from_be_bytes(bytes))
}

fn strip_leading_zeros(magnitude: &[u8]) -> &[u8] {
    match magnitude.iter().position(|&b| b != 0) {
        Some(first) => &magnitude[first..],
        None => &[],
    }
}

fn unsigned_content_size(stripped: &[u8]) -> usize {
    match stripped.first() {
        None => 1,
        Some(&first) if first & 0x80 != 0 => stripped.len() + 1,
        Some(_) => stripped.len(),
    }
}

const fn significant_bytes(value: usize) -> usize {
    let bits = usize::BITS - value.leading_zeros();
    bits.div_ceil(8) as usize
}
