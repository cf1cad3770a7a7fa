use std::fmt::Display;
use std::time::Duration;

use jiff::Timestamp;
use serde::{Serialize, Serializer};
use stampede_common::encoding::encode_token;
use stampede_protocol::{HashAlgorithm, PkiStatus, TimeStampResp};

/// A time-stamp obtained from an authority. Owned entirely by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimestampResponse {
    /// Raw DER bytes of the authority's reply
    #[serde(skip)]
    pub token: Vec<u8>,

    /// `token` as standard padded base64
    pub token_base64: String,

    /// Generation time asserted by the authority, when one could be extracted
    pub gen_time: Option<Timestamp>,

    pub authority: String,

    #[serde(serialize_with = "serialize_display")]
    pub hash_algorithm: HashAlgorithm,

    #[serde(serialize_with = "serialize_status")]
    pub status: Option<PkiStatus>,
}

impl TimestampResponse {
    pub(crate) fn new(resp: TimeStampResp, authority: &str, hash_algorithm: HashAlgorithm) -> Self {
        let status = resp.status();
        let gen_time = resp.gen_time();
        let token = resp.into_token();

        Self {
            token_base64: encode_token(&token),
            token,
            gen_time,
            authority: authority.to_string(),
            hash_algorithm,
            status,
        }
    }
}

pub(crate) fn serialize_display<T: Display, S: Serializer>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

pub(crate) fn serialize_secs<S: Serializer>(
    value: &Duration,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(value.as_secs())
}

fn serialize_status<S: Serializer>(
    value: &Option<PkiStatus>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(status) => serializer.serialize_some(&status.code()),
        None => serializer.serialize_none(),
    }
}
