use std::fmt::{Debug, Formatter};

use data_encoding::HEXLOWER;

use crate::der::{encode_header, encode_null, encode_octet_string, encode_oid_tlv, tag, tlv_size};
use crate::error::Error;
use crate::hash::HashAlgorithm;
use crate::wire::ToDer;

/// The (algorithm, digest) pair identifying the content being timestamped.
///
/// ```text
/// MessageImprint ::= SEQUENCE  {
///      hashAlgorithm                AlgorithmIdentifier,
///      hashedMessage                OCTET STRING  }
/// ```
///
/// The digest length always matches the algorithm's output size. A `MessageImprint` is bound to
/// the exact bytes that were hashed and is never recomputed once created.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct MessageImprint {
    algorithm: HashAlgorithm,
    digest: Vec<u8>,
}

impl MessageImprint {
    pub fn new(algorithm: HashAlgorithm, digest: impl Into<Vec<u8>>) -> Result<Self, Error> {
        let digest = digest.into();

        if digest.len() != algorithm.output_len() {
            return Err(Error::WrongDigestLength {
                algorithm,
                expected: algorithm.output_len(),
                actual: digest.len(),
            });
        }

        Ok(Self { algorithm, digest })
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn digest(&self) -> &[u8] {
        &self.digest
    }

    /// True if the digest appears as a contiguous run of bytes anywhere in `haystack`.
    ///
    /// This is a containment check only; it says nothing about who signed `haystack`.
    pub fn is_contained_in(&self, haystack: &[u8]) -> bool {
        haystack
            .windows(self.digest.len())
            .any(|window| window == self.digest.as_slice())
    }

    fn algorithm_identifier_len(&self) -> usize {
        // OID plus a NULL parameters field
        tlv_size(self.algorithm.oid().len()) + 2
    }

    fn content_len(&self) -> usize {
        tlv_size(self.algorithm_identifier_len()) + tlv_size(self.digest.len())
    }
}

impl ToDer for MessageImprint {
    fn der_size(&self) -> usize {
        tlv_size(self.content_len())
    }

    fn encode_der(&self, out: &mut Vec<u8>) {
        encode_header(tag::SEQUENCE, self.content_len(), out);
        encode_header(tag::SEQUENCE, self.algorithm_identifier_len(), out);
        encode_oid_tlv(self.algorithm.oid(), out);
        encode_null(out);
        encode_octet_string(&self.digest, out);
    }
}

impl Debug for MessageImprint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageImprint")
            .field("algorithm", &self.algorithm)
            .field("digest", &HEXLOWER.encode(&self.digest))
            .finish()
    }
}
