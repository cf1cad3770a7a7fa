//! Encoding and decoding utilities for tokens and other binary data

use std::io::Write;

use data_encoding::{
    BASE64, BASE64_NOPAD, BASE64URL, BASE64URL_NOPAD, DecodeError, DecodeKind, HEXLOWER, HEXUPPER,
};

/// Attempt to decode `encoded_value` into a `Vec<u8>` using multiple encoding formats until
/// one succeeds.
pub fn try_decode(encoded_value: &str) -> Result<Vec<u8>, DecodeError> {
    let input = encoded_value.as_bytes();

    let value = HEXLOWER
        .decode(input)
        .or_else(|_| HEXUPPER.decode(input))
        .or_else(|_| BASE64.decode(input))
        .or_else(|_| BASE64_NOPAD.decode(input))
        .or_else(|_| BASE64URL.decode(input))
        .or_else(|_| BASE64URL_NOPAD.decode(input))?;

    Ok(value)
}

/// Decode a time-stamp token saved as text. Whitespace (including line breaks from wrapped
/// base64) is ignored, and the result must look like a DER SEQUENCE.
pub fn try_decode_token(text: &str) -> Result<Vec<u8>, DecodeError> {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let token = try_decode(&compact)?;

    if token.first() != Some(&0x30) {
        return Err(DecodeError {
            position: 0,
            kind: DecodeKind::Symbol,
        });
    }

    Ok(token)
}

/// Encode a token as standard padded base64, the form returned to callers.
pub fn encode_token(token: &[u8]) -> String {
    BASE64.encode(token)
}

/// Write a hex dump of the provided data to the writer.
///
/// Each line holds an 8-digit hex offset, 16 bytes in hex grouped in pairs, then the printable
/// ASCII rendering of those bytes.
pub fn hexdump<W: Write>(data: &[u8], writer: &mut W) -> std::io::Result<()> {
    const BYTES_PER_LINE: usize = 16;
    // two hex digits per byte plus a space after every pair
    const HEX_COLUMN_WIDTH: usize = BYTES_PER_LINE * 2 + BYTES_PER_LINE / 2;

    for (line, chunk) in data.chunks(BYTES_PER_LINE).enumerate() {
        let mut hex = String::with_capacity(HEX_COLUMN_WIDTH);
        for pair in chunk.chunks(2) {
            hex.push_str(&HEXLOWER.encode(pair));
            hex.push(' ');
        }

        let ascii: String = chunk
            .iter()
            .map(|&b| {
                if b.is_ascii_graphic() || b == b' ' {
                    b as char
                } else {
                    '.'
                }
            })
            .collect();

        writeln!(
            writer,
            "{:08x}: {hex:<HEX_COLUMN_WIDTH$} |{ascii}|",
            line * BYTES_PER_LINE
        )?;
    }

    Ok(())
}

/// [`hexdump`] into a `String`, for log messages.
pub fn hexdump_string(data: &[u8]) -> String {
    let mut out = Vec::with_capacity(data.len() * 5);
    // writes to a Vec cannot fail
    let _ = hexdump(data, &mut out);
    String::from_utf8_lossy(&out).into_owned()
}
