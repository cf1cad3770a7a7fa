//! Checks a previously obtained token against the content it should cover.
//!
//! **This is not a cryptographic verification.** It confirms only that the content's digest
//! appears somewhere in the token, which catches a wrong file or a corrupted token. The
//! authority's signature, its certificate chain and the nonce binding are not checked.

use data_encoding::HEXLOWER;
use stampede_common::crypto::calculate_imprint;
use stampede_protocol::HashAlgorithm;
use tracing::debug;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("token is empty")]
    EmptyToken,

    #[error("{algorithm} digest {digest} of the content does not appear in the token")]
    DigestMismatch {
        algorithm: HashAlgorithm,
        digest: String,
    },
}

/// Check `token` against `content` using the default algorithm (SHA-256).
pub fn verify(content: &[u8], token: &[u8]) -> Result<(), VerificationError> {
    verify_with(HashAlgorithm::default(), content, token)
}

/// Check `token` against `content`, hashing with `algorithm`. Use the algorithm the token was
/// requested with.
pub fn verify_with(
    algorithm: HashAlgorithm,
    content: &[u8],
    token: &[u8],
) -> Result<(), VerificationError> {
    if token.is_empty() {
        return Err(VerificationError::EmptyToken);
    }

    let imprint = calculate_imprint(algorithm, content);

    if imprint.is_contained_in(token) {
        debug!("{algorithm} digest found in {} byte token", token.len());
        Ok(())
    } else {
        Err(VerificationError::DigestMismatch {
            algorithm,
            digest: HEXLOWER.encode(imprint.digest()),
        })
    }
}

#[cfg(test)]
mod tests {
    use stampede_protocol::Nonce;
    use stampede_protocol::test_utils::synthetic_response;

    use super::*;

    fn token_for(algorithm: HashAlgorithm, content: &[u8]) -> Vec<u8> {
        let imprint = calculate_imprint(algorithm, content);
        synthetic_response(&imprint, &Nonce::from([3; 8]), "20260103123456Z")
    }

    #[test]
    fn matching_content_verifies() {
        let token = token_for(HashAlgorithm::Sha256, b"test-document");
        assert_eq!(verify(b"test-document", &token), Ok(()));
    }

    #[test]
    fn different_content_is_a_mismatch() {
        let token = token_for(HashAlgorithm::Sha256, b"test-document");

        match verify(b"test-document!", &token) {
            Err(VerificationError::DigestMismatch { algorithm, digest }) => {
                assert_eq!(algorithm, HashAlgorithm::Sha256);
                assert_eq!(digest.len(), 64);
            }
            other => panic!("expected a digest mismatch, got {other:?}"),
        }
    }

    #[test]
    fn algorithm_must_match_the_token() {
        let token = token_for(HashAlgorithm::Sha512, b"doc");

        assert_eq!(verify_with(HashAlgorithm::Sha512, b"doc", &token), Ok(()));
        assert!(verify(b"doc", &token).is_err());
    }

    #[test]
    fn empty_token() {
        assert_eq!(verify(b"doc", &[]), Err(VerificationError::EmptyToken));
    }

    #[test]
    fn mismatch_message_names_the_digest() {
        let err = verify(b"abc", &[0x30, 0x00]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "SHA-256 digest ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad \
             of the content does not appear in the token"
        );
    }
}
