use std::fmt::{Debug, Formatter};

use jiff::Timestamp;

use crate::cursor::DerCursor;
use crate::der::{decode_integer, tag};
use crate::error::Error;
use crate::status::PkiStatus;
use crate::time::find_generalized_time;
use crate::wire::FromDer;

/// Complete OID TLV of `id-signedData` (1.2.840.113549.1.7.2). Its presence marks a response that
/// carries a time-stamp token.
pub const SIGNED_DATA_MARKER: [u8; 11] = [
    0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x07, 0x02,
];

/// The fields a client needs from an RFC 3161 response.
///
/// ```text
/// TimeStampResp ::= SEQUENCE  {
///    status                  PKIStatusInfo,
///    timeStampToken          TimeStampToken     OPTIONAL  }
///
/// PKIStatusInfo ::= SEQUENCE {
///    status        PKIStatus,
///    statusString  PKIFreeText     OPTIONAL,
///    failInfo      PKIFailureInfo  OPTIONAL  }
/// ```
///
/// Parsing is targeted extraction rather than a full decode: the token is kept as the opaque,
/// complete response bytes and the signed-data structure inside it is never decomposed.
/// **The authority's signature over the token is not verified.** Finding the signed-data marker
/// is treated as sufficient evidence that a token is present.
#[derive(Clone, PartialEq, Eq)]
pub struct TimeStampResp {
    token: Vec<u8>,
    status: Option<PkiStatus>,
    status_text: Option<String>,
    gen_time: Option<Timestamp>,
}

impl TimeStampResp {
    /// The raw response bytes, stored as the token
    pub fn token(&self) -> &[u8] {
        &self.token
    }

    pub fn into_token(self) -> Vec<u8> {
        self.token
    }

    /// The PKIStatus, when the PKIStatusInfo could be read
    pub fn status(&self) -> Option<PkiStatus> {
        self.status
    }

    pub fn status_text(&self) -> Option<&str> {
        self.status_text.as_deref()
    }

    /// The authority's asserted generation time. `None` means no GeneralizedTime could be
    /// extracted, which says nothing about the token's validity.
    pub fn gen_time(&self) -> Option<Timestamp> {
        self.gen_time
    }
}

impl FromDer for TimeStampResp {
    fn from_der(bytes: &[u8]) -> Result<Self, Error> {
        let first = *bytes.first().ok_or(Error::EmptyResponse)?;
        if first != tag::SEQUENCE {
            return Err(Error::NotASequence(first));
        }

        let status_info = read_status_info(bytes).ok();

        if !contains_signed_data(bytes) {
            return match status_info {
                Some((status, text)) if !status.is_granted() => Err(Error::Rejected { status, text }),
                _ => Err(Error::TokenNotFound),
            };
        }

        let (status, status_text) = match status_info {
            Some((status, text)) => (Some(status), text),
            None => (None, None),
        };

        Ok(Self {
            token: bytes.to_vec(),
            status,
            status_text,
            gen_time: find_generalized_time(bytes),
        })
    }
}

impl Debug for TimeStampResp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeStampResp")
            .field("token_len", &self.token.len())
            .field("status", &self.status)
            .field("status_text", &self.status_text)
            .field("gen_time", &self.gen_time)
            .finish()
    }
}

/// True if the signed-data content type OID appears anywhere in `bytes`
pub fn contains_signed_data(bytes: &[u8]) -> bool {
    bytes
        .windows(SIGNED_DATA_MARKER.len())
        .any(|window| window == SIGNED_DATA_MARKER)
}

/// Read `PKIStatusInfo` from the start of a response.
///
/// Only the outer SEQUENCE header is consumed, so a response whose outer length overstates the
/// bytes actually received still yields its status.
pub fn read_status_info(bytes: &[u8]) -> Result<(PkiStatus, Option<String>), Error> {
    let mut cursor = DerCursor::new(bytes);

    let outer = cursor.try_get_u8()?;
    if outer != tag::SEQUENCE {
        return Err(Error::NotASequence(outer));
    }
    cursor.try_get_length()?;

    let mut info = DerCursor::new(cursor.expect(tag::SEQUENCE)?);
    let status = PkiStatus::from(decode_integer(info.expect(tag::INTEGER)?)?);

    let text = match info.peek_tag() {
        Some(tag::SEQUENCE) => first_free_text(info.expect(tag::SEQUENCE)?),
        _ => None,
    };

    Ok((status, text))
}

// PKIFreeText ::= SEQUENCE SIZE (1..MAX) OF UTF8String
fn first_free_text(free_text: &[u8]) -> Option<String> {
    let mut cursor = DerCursor::new(free_text);
    let value = cursor.expect(tag::UTF8_STRING).ok()?;
    Some(String::from_utf8_lossy(value).into_owned())
}
