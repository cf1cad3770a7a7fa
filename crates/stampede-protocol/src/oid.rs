//! Object identifier encoding.
//!
//! ```text
//! X.690 8.19.4: The numerical value of the first subidentifier is derived from the values
//! of the first two object identifier components in the object identifier value being
//! encoded, using the formula: (X*40) + Y
//! ```
//!
//! Each subidentifier is a big-endian base-128 number with the high bit set on every octet
//! except the last. The functions here produce and consume the *content* octets only; wrap them
//! with [`encode_oid_tlv`](crate::der::encode_oid_tlv) for a complete TLV.

use crate::error::Error;
use crate::error::Error::InvalidOid;

/// id-sha256, 2.16.840.1.101.3.4.2.1
pub const SHA256: &[u8] = &[0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01];

/// id-sha384, 2.16.840.1.101.3.4.2.2
pub const SHA384: &[u8] = &[0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x02];

/// id-sha512, 2.16.840.1.101.3.4.2.3
pub const SHA512: &[u8] = &[0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x03];

/// id-signedData, 1.2.840.113549.1.7.2
pub const SIGNED_DATA: &[u8] = &[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x07, 0x02];

/// id-ct-TSTInfo, 1.2.840.113549.1.9.16.1.4
pub const TST_INFO: &[u8] = &[
    0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x09, 0x10, 0x01, 0x04,
];

/// Encode a dotted-decimal object identifier (e.g. `"2.16.840.1.101.3.4.2.1"`) into DER
/// content octets.
pub fn encode_oid(dotted: &str) -> Result<Vec<u8>, Error> {
    let arcs = dotted
        .split('.')
        .map(|arc| parse_arc(arc, dotted))
        .collect::<Result<Vec<u64>, Error>>()?;

    if arcs.len() < 2 {
        return Err(InvalidOid(format!("'{dotted}' has fewer than two arcs")));
    }

    let (first, second) = (arcs[0], arcs[1]);

    if first > 2 {
        return Err(InvalidOid(format!("first arc of '{dotted}' must be 0, 1 or 2")));
    }

    if first < 2 && second >= 40 {
        return Err(InvalidOid(format!(
            "second arc of '{dotted}' must be below 40 when the first arc is {first}"
        )));
    }

    let combined = (first * 40)
        .checked_add(second)
        .ok_or_else(|| InvalidOid(format!("'{dotted}' overflows 64 bits")))?;

    let mut out = Vec::with_capacity(arcs.len() + 4);
    push_base128(combined, &mut out);
    for &arc in &arcs[2..] {
        push_base128(arc, &mut out);
    }

    Ok(out)
}

/// Decode DER content octets of an object identifier back into dotted-decimal form.
pub fn decode_oid(content: &[u8]) -> Result<String, Error> {
    if content.is_empty() {
        return Err(InvalidOid("empty content".to_string()));
    }

    let mut arcs: Vec<u64> = Vec::new();
    let mut value: u64 = 0;
    let mut in_arc = false;

    for &byte in content {
        // a leading 0x80 would be a redundant zero digit
        if !in_arc && byte == 0x80 {
            return Err(InvalidOid("subidentifier is not minimally encoded".to_string()));
        }

        if value > (u64::MAX >> 7) {
            return Err(InvalidOid("subidentifier overflows 64 bits".to_string()));
        }

        value = (value << 7) | u64::from(byte & 0x7f);

        if byte & 0x80 == 0 {
            arcs.push(value);
            value = 0;
            in_arc = false;
        } else {
            in_arc = true;
        }
    }

    if in_arc {
        return Err(InvalidOid("truncated subidentifier".to_string()));
    }

    let (first, second) = match arcs[0] {
        n @ 0..=39 => (0, n),
        n @ 40..=79 => (1, n - 40),
        n => (2, n - 80),
    };

    let mut dotted = format!("{first}.{second}");
    for arc in &arcs[1..] {
        dotted.push('.');
        dotted.push_str(&arc.to_string());
    }

    Ok(dotted)
}

fn parse_arc(arc: &str, dotted: &str) -> Result<u64, Error> {
    // u64::from_str accepts a leading '+', which is not a valid arc
    if arc.is_empty() || !arc.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InvalidOid(format!("bad arc '{arc}' in '{dotted}'")));
    }

    arc.parse::<u64>()
        .map_err(|_| InvalidOid(format!("arc '{arc}' in '{dotted}' overflows 64 bits")))
}

fn push_base128(mut value: u64, out: &mut Vec<u8>) {
    // ceil(64 / 7) digits are enough for any u64
    let mut digits = [0u8; 10];
    let mut start = digits.len();

    loop {
        start -= 1;
        digits[start] = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            break;
        }
    }

    let last = digits.len() - 1;
    for digit in &mut digits[start..last] {
        *digit |= 0x80;
    }

    out.extend_from_slice(&digits[start..]);
}
