#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use stampede_protocol::cursor::DerCursor;
use stampede_protocol::der::tag;
use stampede_protocol::oid::{decode_oid, encode_oid};
use stampede_protocol::{HashAlgorithm, MessageImprint, Nonce, ToDer, TimestampRequest};

#[derive(Arbitrary, Debug)]
struct FuzzRequest {
    algorithm: u8,
    digest: [u8; 64],
    nonce: [u8; 8],
}

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    request: FuzzRequest,
    arcs: Vec<u64>,
}

fuzz_target!(|input: FuzzInput| {
    let FuzzRequest {
        algorithm,
        digest,
        nonce,
    } = input.request;

    let algorithm = HashAlgorithm::ALL[algorithm as usize % HashAlgorithm::ALL.len()];
    let imprint = MessageImprint::new(algorithm, &digest[..algorithm.output_len()]).unwrap();
    let request = TimestampRequest::new(imprint.clone(), Nonce::from(nonce));
    let der = request.to_der();

    // the encoding must be exactly one well-formed SEQUENCE
    assert_eq!(der.len(), request.der_size());
    let mut outer = DerCursor::new(&der);
    let body = outer.expect(tag::SEQUENCE).unwrap();
    assert!(!outer.has_remaining());

    let mut fields = DerCursor::new(body);
    assert_eq!(fields.expect(tag::INTEGER).unwrap(), &[1]);
    assert_eq!(fields.expect(tag::SEQUENCE).unwrap(), &imprint.to_der()[2..]);
    let nonce_value = fields.expect(tag::INTEGER).unwrap();
    assert!(nonce_value.len() <= Nonce::SIZE + 1);
    assert_eq!(fields.expect(tag::BOOLEAN).unwrap(), &[0xff]);
    assert!(!fields.has_remaining());

    // any OID that encodes must decode to the same dotted form
    let dotted = input
        .arcs
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(".");

    if let Ok(encoded) = encode_oid(&dotted) {
        assert_eq!(decode_oid(&encoded).unwrap(), dotted);
    }
});
