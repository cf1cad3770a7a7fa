use thiserror::Error;

use crate::hash::HashAlgorithm;
use crate::status::PkiStatus;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("buffer too small: {0} bytes needed, {1} bytes available")]
    BufferTooSmall(usize, usize),

    #[error("empty response")]
    EmptyResponse,

    #[error("response is not a DER SEQUENCE: first byte {0:#04x}")]
    NotASequence(u8),

    #[error("unexpected tag: expected {expected:#04x}, got {found:#04x}")]
    UnexpectedTag { expected: u8, found: u8 },

    #[error("indefinite length encoding is not valid DER")]
    IndefiniteLength,

    #[error("length encoded in {0} octets, at most 4 are supported")]
    LengthTooLong(usize),

    #[error("INTEGER of {0} bytes does not fit in 64 bits")]
    IntegerOverflow(usize),

    #[error("invalid object identifier: {0}")]
    InvalidOid(String),

    #[error("unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("wrong digest size for {algorithm}: expected {expected} bytes, got {actual} bytes")]
    WrongDigestLength {
        algorithm: HashAlgorithm,
        expected: usize,
        actual: usize,
    },

    #[error("invalid GeneralizedTime: {0}")]
    InvalidTime(String),

    #[error("timestamp token not found in response")]
    TokenNotFound,

    #[error("authority rejected request with status {status}")]
    Rejected {
        status: PkiStatus,
        text: Option<String>,
    },
}
