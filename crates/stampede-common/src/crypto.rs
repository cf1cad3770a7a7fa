//! Cryptographic utilities shared across the project

use aws_lc_rs::digest::{Algorithm, SHA256, SHA384, SHA512, digest};
use stampede_protocol::{HashAlgorithm, MessageImprint, Nonce};

fn digest_algorithm(algorithm: HashAlgorithm) -> &'static Algorithm {
    match algorithm {
        HashAlgorithm::Sha256 => &SHA256,
        HashAlgorithm::Sha384 => &SHA384,
        HashAlgorithm::Sha512 => &SHA512,
    }
}

/// Hash `content` with `algorithm`. The result is always `algorithm.output_len()` bytes.
pub fn calculate_digest(algorithm: HashAlgorithm, content: &[u8]) -> Vec<u8> {
    digest(digest_algorithm(algorithm), content).as_ref().to_vec()
}

/// Hash `content` and bind the digest to its algorithm.
pub fn calculate_imprint(algorithm: HashAlgorithm, content: &[u8]) -> MessageImprint {
    MessageImprint::new(algorithm, calculate_digest(algorithm, content))
        .expect("aws-lc-rs digest sizes match HashAlgorithm::output_len")
}

/// Generate cryptographically secure random bytes
pub fn random_bytes<const N: usize>() -> [u8; N] {
    let mut val = [0u8; N];
    aws_lc_rs::rand::fill(&mut val).expect("should be infallible");
    val
}

/// A fresh, single-use request nonce
pub fn random_nonce() -> Nonce {
    Nonce::from(random_bytes::<{ Nonce::SIZE }>())
}

#[cfg(test)]
mod tests {
    use data_encoding::HEXLOWER;

    use super::*;

    #[test]
    fn digest_sizes_match_algorithms() {
        for alg in HashAlgorithm::ALL {
            assert_eq!(calculate_digest(alg, b"abc").len(), alg.output_len());
            assert_eq!(calculate_imprint(alg, b"abc").digest().len(), alg.output_len());
        }
    }

    #[test]
    fn known_answer_sha256() {
        // FIPS 180-2 example
        assert_eq!(
            HEXLOWER.encode(&calculate_digest(HashAlgorithm::Sha256, b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn known_answer_sha384_and_sha512() {
        assert_eq!(
            HEXLOWER.encode(&calculate_digest(HashAlgorithm::Sha384, b"abc")),
            "cb00753f45a35e8bb5a03d699ac65007272c32ab0eded1631a8b605a43ff5bed\
             8086072ba1e7cc2358baeca134c825a7"
        );
        assert_eq!(
            HEXLOWER.encode(&calculate_digest(HashAlgorithm::Sha512, b"abc")),
            "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
             2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
        );
    }

    #[test]
    fn imprint_is_deterministic() {
        let a = calculate_imprint(HashAlgorithm::Sha256, b"test-document");
        let b = calculate_imprint(HashAlgorithm::Sha256, b"test-document");
        assert_eq!(a, b);
        assert_eq!(a.algorithm(), HashAlgorithm::Sha256);
    }

    #[test]
    fn random_values_differ() {
        let bytes1 = random_bytes::<32>();
        let bytes2 = random_bytes::<32>();

        // Should be different (extremely high probability)
        assert_ne!(bytes1, bytes2);
        assert_ne!(random_nonce(), random_nonce());
    }
}
