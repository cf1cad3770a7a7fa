//! Builders for realistic `TimeStampResp` bytes, for use in tests across the workspace.

use crate::der::{
    encode_boolean, encode_null, encode_octet_string, encode_oid_tlv, encode_sequence, encode_tlv,
    encode_unsigned_integer, tag,
};
use crate::imprint::MessageImprint;
use crate::oid;
use crate::request::Nonce;
use crate::wire::ToDer;

/// A granted response carrying a signed-data token whose TSTInfo holds `imprint`, `nonce` and a
/// GeneralizedTime with body `gen_time` (e.g. `"20260103123456Z"`). The signature is filler.
pub fn synthetic_response(imprint: &MessageImprint, nonce: &Nonce, gen_time: &str) -> Vec<u8> {
    // TSTInfo
    let mut tst_info = Vec::new();
    encode_unsigned_integer(&[1], &mut tst_info);
    encode_oid_tlv(TEST_POLICY, &mut tst_info);
    imprint.encode_der(&mut tst_info);
    encode_unsigned_integer(&[0x5e, 0x11, 0xa1, 0x00, 0x42], &mut tst_info);
    encode_tlv(tag::GENERALIZED_TIME, gen_time.as_bytes(), &mut tst_info);
    encode_boolean(false, &mut tst_info);
    encode_unsigned_integer(nonce.as_ref(), &mut tst_info);
    let tst_info = wrap(tag::SEQUENCE, &tst_info);

    // EncapsulatedContentInfo
    let mut econtent = Vec::new();
    encode_oid_tlv(oid::TST_INFO, &mut econtent);
    let mut octets = Vec::new();
    encode_octet_string(&tst_info, &mut octets);
    encode_tlv(tag::CONTEXT_0, &octets, &mut econtent);

    // SignedData
    let mut digest_algorithm = Vec::new();
    encode_oid_tlv(imprint.algorithm().oid(), &mut digest_algorithm);
    encode_null(&mut digest_algorithm);
    let digest_algorithm = wrap(tag::SEQUENCE, &digest_algorithm);

    let mut signer_info = Vec::new();
    encode_unsigned_integer(&[1], &mut signer_info);
    encode_sequence(&[], &mut signer_info);
    signer_info.extend_from_slice(&digest_algorithm);
    encode_octet_string(&[0xee; 64], &mut signer_info);

    let mut signed_data = Vec::new();
    encode_unsigned_integer(&[3], &mut signed_data);
    encode_tlv(tag::SET, &digest_algorithm, &mut signed_data);
    encode_sequence(&econtent, &mut signed_data);
    encode_tlv(tag::SET, &wrap(tag::SEQUENCE, &signer_info), &mut signed_data);
    let signed_data = wrap(tag::SEQUENCE, &signed_data);

    // ContentInfo
    let mut content_info = Vec::new();
    encode_oid_tlv(oid::SIGNED_DATA, &mut content_info);
    encode_tlv(tag::CONTEXT_0, &signed_data, &mut content_info);

    let mut resp = Vec::new();
    encode_sequence(&status_info(0, None), &mut resp);
    encode_sequence(&content_info, &mut resp);

    wrap(tag::SEQUENCE, &resp)
}

/// A response holding only a `PKIStatusInfo`, as sent when an authority refuses a request.
pub fn status_only_response(status: u8, text: Option<&str>) -> Vec<u8> {
    let info = wrap(tag::SEQUENCE, &status_info(status, text));
    wrap(tag::SEQUENCE, &info)
}

// 1.3.6.1.4.1.4146.2.3
const TEST_POLICY: &[u8] = &[0x2b, 0x06, 0x01, 0x04, 0x01, 0xa0, 0x32, 0x02, 0x03];

fn status_info(status: u8, text: Option<&str>) -> Vec<u8> {
    let mut out = Vec::new();
    encode_unsigned_integer(&[status], &mut out);

    if let Some(text) = text {
        let utf8 = wrap(tag::UTF8_STRING, text.as_bytes());
        encode_sequence(&utf8, &mut out);
    }

    out
}

fn wrap(tag: u8, content: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(content.len() + 6);
    encode_tlv(tag, content, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::DerCursor;
    use crate::hash::HashAlgorithm;
    use crate::oid::encode_oid;

    #[test]
    fn policy_constant() {
        assert_eq!(encode_oid("1.3.6.1.4.1.4146.2.3").unwrap(), TEST_POLICY);
    }

    #[test]
    fn synthetic_response_is_well_formed() {
        let imprint = MessageImprint::new(HashAlgorithm::Sha384, [1u8; 48]).unwrap();
        let bytes = synthetic_response(&imprint, &Nonce::from([2; 8]), "20260103123456Z");

        let mut cursor = DerCursor::new(&bytes);
        let body = cursor.expect(tag::SEQUENCE).unwrap();
        assert!(!cursor.has_remaining());

        let mut fields = DerCursor::new(body);
        let status = fields.expect(tag::SEQUENCE).unwrap();
        assert_eq!(status, &[0x02, 0x01, 0x00]);

        let mut content_info = DerCursor::new(fields.expect(tag::SEQUENCE).unwrap());
        assert_eq!(content_info.expect(tag::OID).unwrap(), oid::SIGNED_DATA);
        assert_eq!(content_info.peek_tag(), Some(tag::CONTEXT_0));
        assert!(!fields.has_remaining());
    }
}
