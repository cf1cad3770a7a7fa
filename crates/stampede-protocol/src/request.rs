use std::fmt::{Debug, Formatter};

use data_encoding::HEXLOWER;

use crate::der::{
    encode_boolean, encode_header, encode_unsigned_integer, tag, tlv_size, unsigned_integer_size,
};
use crate::imprint::MessageImprint;
use crate::wire::ToDer;

/// A single-use random value binding a request to its response.
///
/// Nonces are supplied by the caller (see `stampede_common::crypto::random_nonce`) so that
/// request construction stays a pure function.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Nonce([u8; Nonce::SIZE]);

impl Nonce {
    /// 64 bits, the size most authorities expect
    pub const SIZE: usize = 8;

    pub fn as_bytes(&self) -> &[u8; Self::SIZE] {
        &self.0
    }
}

impl From<[u8; Nonce::SIZE]> for Nonce {
    fn from(value: [u8; Nonce::SIZE]) -> Self {
        Self(value)
    }
}

impl AsRef<[u8]> for Nonce {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Debug for Nonce {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Nonce({})", HEXLOWER.encode(&self.0))
    }
}

/// An RFC 3161 time-stamp request.
///
/// ```text
/// TimeStampReq ::= SEQUENCE  {
///    version                      INTEGER  { v1(1) },
///    messageImprint               MessageImprint,
///    reqPolicy                    TSAPolicyId              OPTIONAL,
///    nonce                        INTEGER                  OPTIONAL,
///    certReq                      BOOLEAN                  DEFAULT FALSE,
///    extensions               [0] IMPLICIT Extensions      OPTIONAL  }
/// ```
///
/// Requests always carry a nonce and always ask for the signer's certificate. `reqPolicy` and
/// `extensions` are never sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampRequest {
    imprint: MessageImprint,
    nonce: Nonce,
    cert_req: bool,
}

impl TimestampRequest {
    pub const VERSION: u8 = 1;

    pub fn new(imprint: MessageImprint, nonce: Nonce) -> Self {
        Self {
            imprint,
            nonce,
            cert_req: true,
        }
    }

    pub fn imprint(&self) -> &MessageImprint {
        &self.imprint
    }

    pub fn nonce(&self) -> &Nonce {
        &self.nonce
    }

    pub fn cert_req(&self) -> bool {
        self.cert_req
    }

    fn content_len(&self) -> usize {
        // DER omits a BOOLEAN equal to its DEFAULT
        let cert_req_len = if self.cert_req { 3 } else { 0 };

        unsigned_integer_size(&[Self::VERSION])
            + self.imprint.der_size()
            + unsigned_integer_size(self.nonce.as_ref())
            + cert_req_len
    }
}

impl ToDer for TimestampRequest {
    fn der_size(&self) -> usize {
        tlv_size(self.content_len())
    }

    fn encode_der(&self, out: &mut Vec<u8>) {
        encode_header(tag::SEQUENCE, self.content_len(), out);
        encode_unsigned_integer(&[Self::VERSION], out);
        self.imprint.encode_der(out);
        encode_unsigned_integer(self.nonce.as_ref(), out);
        if self.cert_req {
            encode_boolean(true, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::DerCursor;
    use crate::hash::HashAlgorithm;

    fn request(nonce: [u8; 8]) -> TimestampRequest {
        let imprint = MessageImprint::new(HashAlgorithm::Sha256, [0xabu8; 32]).unwrap();
        TimestampRequest::new(imprint, Nonce::from(nonce))
    }

    #[test]
    fn encodes_expected_structure() {
        let req = request([0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08]);
        let der = req.to_der();

        assert_eq!(der.len(), req.der_size());
        assert_eq!(der[0], tag::SEQUENCE);
        assert_eq!(der[1] as usize, der.len() - 2);
        // version 1
        assert_eq!(&der[2..5], &[0x02, 0x01, 0x01]);
        // imprint
        assert_eq!(&der[5..56], req.imprint().to_der().as_slice());
        // nonce without padding, then certReq TRUE
        assert_eq!(
            &der[56..],
            &[0x02, 0x08, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x01, 0x01, 0xff]
        );
    }

    #[test]
    fn high_bit_nonce_is_padded() {
        let req = request([0x80, 0, 0, 0, 0, 0, 0, 1]);
        let der = req.to_der();

        assert_eq!(der.len(), req.der_size());
        assert_eq!(&der[56..59], &[0x02, 0x09, 0x00]);
    }

    #[test]
    fn nonce_with_leading_zero_is_minimal() {
        let req = request([0x00, 0x00, 0x7f, 0, 0, 0, 0, 1]);
        let der = req.to_der();

        assert_eq!(der.len(), req.der_size());
        assert_eq!(&der[56..59], &[0x02, 0x06, 0x7f]);
    }

    #[test]
    fn parses_back_with_der_cursor() {
        let req = request([9; 8]);
        let der = req.to_der();

        let mut outer = DerCursor::new(&der);
        let body = outer.expect(tag::SEQUENCE).unwrap();
        assert!(!outer.has_remaining());

        let mut fields = DerCursor::new(body);
        assert_eq!(fields.expect(tag::INTEGER).unwrap(), &[1]);
        let imprint = fields.expect(tag::SEQUENCE).unwrap();
        assert_eq!(imprint.len(), 49);
        assert_eq!(fields.expect(tag::INTEGER).unwrap(), &[9; 8]);
        assert_eq!(fields.expect(tag::BOOLEAN).unwrap(), &[0xff]);
        assert!(!fields.has_remaining());
    }

    #[test]
    fn different_nonces_share_imprint() {
        let a = request([1; 8]).to_der();
        let b = request([2; 8]).to_der();

        assert_ne!(a, b);
        assert_eq!(a[5..56], b[5..56]);
    }

    #[test]
    fn sha512_request_uses_short_form_outer_length() {
        let imprint = MessageImprint::new(HashAlgorithm::Sha512, [0x01u8; 64]).unwrap();
        let req = TimestampRequest::new(imprint, Nonce::from([0xff; 8]));
        let der = req.to_der();

        assert_eq!(der.len(), req.der_size());
        // 3 + 83 + 11 + 3 = 100 content bytes
        assert_eq!(&der[..2], &[0x30, 100]);
    }
}
