//! GeneralizedTime extraction.
//!
//! RFC 3161 requires `genTime` to be expressed in UTC with a trailing `Z` and no trailing zeros
//! in the fraction. Accepted bodies are `YYYYMMDDHHmmssZ` optionally followed by a `.` and one to
//! nine fractional digits before the `Z`.

use jiff::Timestamp;
use jiff::civil::DateTime;
use jiff::tz::TimeZone;

use crate::der::tag;
use crate::error::Error;
use crate::error::Error::InvalidTime;

/// Shortest valid body: `YYYYMMDDHHmmssZ`
pub const MIN_LENGTH: usize = 15;

/// Longest valid body: `YYYYMMDDHHmmss.fffffffffZ`
pub const MAX_LENGTH: usize = 25;

/// Parse the content octets of a GeneralizedTime into a UTC instant.
pub fn parse_generalized_time(content: &[u8]) -> Result<Timestamp, Error> {
    if !(MIN_LENGTH..=MAX_LENGTH).contains(&content.len()) {
        return Err(InvalidTime(format!(
            "length {} outside {MIN_LENGTH}..={MAX_LENGTH}",
            content.len()
        )));
    }

    let (body, last) = content.split_at(content.len() - 1);
    if last != b"Z" {
        return Err(InvalidTime("missing trailing 'Z'".to_string()));
    }

    let (whole, fraction) = body.split_at(14);

    let nanos = match fraction {
        [] => 0,
        [b'.', frac @ ..] if !frac.is_empty() => parse_fraction(frac)?,
        _ => return Err(InvalidTime("malformed fractional seconds".to_string())),
    };

    let year = digits(&whole[0..4])? as i16;
    let month = digits(&whole[4..6])? as i8;
    let day = digits(&whole[6..8])? as i8;
    let hour = digits(&whole[8..10])? as i8;
    let minute = digits(&whole[10..12])? as i8;
    let second = digits(&whole[12..14])? as i8;

    let datetime = DateTime::new(year, month, day, hour, minute, second, nanos)
        .map_err(|e| InvalidTime(e.to_string()))?;

    let zoned = datetime
        .to_zoned(TimeZone::UTC)
        .map_err(|e| InvalidTime(e.to_string()))?;

    Ok(zoned.timestamp())
}

/// Return the first GeneralizedTime in `bytes` that parses.
///
/// This is a byte scan, not a structural walk: any `0x18` followed by a plausible length is
/// tried, so it tolerates tokens whose enclosing structure this crate does not decode.
pub fn find_generalized_time(bytes: &[u8]) -> Option<Timestamp> {
    bytes.windows(2).enumerate().find_map(|(idx, header)| {
        let len = header[1] as usize;
        if header[0] != tag::GENERALIZED_TIME || !(MIN_LENGTH..=MAX_LENGTH).contains(&len) {
            return None;
        }

        let start = idx + 2;
        let content = bytes.get(start..start + len)?;
        parse_generalized_time(content).ok()
    })
}

fn digits(ascii: &[u8]) -> Result<u32, Error> {
    ascii.iter().try_fold(0u32, |acc, &b| {
        if b.is_ascii_digit() {
            Ok(acc * 10 + u32::from(b - b'0'))
        } else {
            Err(InvalidTime(format!("non-digit byte {b:#04x}")))
        }
    })
}

fn parse_fraction(ascii: &[u8]) -> Result<i32, Error> {
    let value = digits(ascii)?;
    let scale = 10u32.pow(9 - ascii.len() as u32);
    Ok((value * scale) as i32)
}
