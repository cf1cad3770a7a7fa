//! Well-known time-stamp authorities.

use std::time::Duration;

use serde::Serialize;
use stampede_protocol::HashAlgorithm;

use crate::response::{serialize_display, serialize_secs};

/// Endpoint and defaults for a known authority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AuthorityPreset {
    /// Short identifier used on the command line and in `STAMPEDE_TSA_PRESET`
    pub id: &'static str,
    pub display_name: &'static str,
    pub url: &'static str,
    #[serde(serialize_with = "serialize_display")]
    pub hash_algorithm: HashAlgorithm,
    #[serde(rename = "timeout_secs", serialize_with = "serialize_secs")]
    pub timeout: Duration,
    /// Free public services with no availability guarantee. Never used in production mode.
    pub test_only: bool,
}

pub const DIGICERT: AuthorityPreset = AuthorityPreset {
    id: "digicert",
    display_name: "DigiCert Timestamp Authority",
    url: "http://timestamp.digicert.com",
    hash_algorithm: HashAlgorithm::Sha256,
    timeout: Duration::from_secs(10),
    test_only: false,
};

pub const SECTIGO: AuthorityPreset = AuthorityPreset {
    id: "sectigo",
    display_name: "Sectigo Timestamp Authority",
    url: "https://timestamp.sectigo.com",
    hash_algorithm: HashAlgorithm::Sha256,
    timeout: Duration::from_secs(10),
    test_only: false,
};

pub const FREETSA: AuthorityPreset = AuthorityPreset {
    id: "freetsa",
    display_name: "FreeTSA.org",
    url: "https://freetsa.org/tsr",
    hash_algorithm: HashAlgorithm::Sha512,
    timeout: Duration::from_secs(30),
    test_only: true,
};

/// Fallback authority outside production mode
pub const TEST_AUTHORITY: AuthorityPreset = FREETSA;

pub const PRESETS: &[AuthorityPreset] = &[DIGICERT, SECTIGO, FREETSA];

/// Case-insensitive lookup by identifier
pub fn find_preset(id: &str) -> Option<&'static AuthorityPreset> {
    let id = id.trim();
    PRESETS.iter().find(|p| p.id.eq_ignore_ascii_case(id))
}

/// The preset whose endpoint is `url`, ignoring a trailing slash
pub fn preset_for_url(url: &str) -> Option<&'static AuthorityPreset> {
    let url = url.trim().trim_end_matches('/');
    PRESETS
        .iter()
        .find(|p| p.url.trim_end_matches('/').eq_ignore_ascii_case(url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_id() {
        assert_eq!(find_preset("digicert"), Some(&DIGICERT));
        assert_eq!(find_preset(" FreeTSA "), Some(&FREETSA));
        assert_eq!(find_preset("nope"), None);
    }

    #[test]
    fn lookup_by_url() {
        assert_eq!(preset_for_url("https://timestamp.sectigo.com/"), Some(&SECTIGO));
        assert_eq!(preset_for_url("https://freetsa.org/tsr"), Some(&FREETSA));
        assert_eq!(preset_for_url("https://tsa.example.com"), None);
    }

    #[test]
    fn ids_are_unique_and_only_the_test_authority_is_test_only() {
        for (i, a) in PRESETS.iter().enumerate() {
            for b in &PRESETS[i + 1..] {
                assert_ne!(a.id, b.id);
            }
            assert_eq!(a.test_only, a.id == TEST_AUTHORITY.id);
        }
    }

    #[test]
    fn serializes_for_listing() {
        let json = serde_json::to_value(FREETSA).unwrap();
        assert_eq!(json["id"], "freetsa");
        assert_eq!(json["hash_algorithm"], "SHA-512");
        assert_eq!(json["timeout_secs"], 30);
        assert_eq!(json["test_only"], true);
    }
}
