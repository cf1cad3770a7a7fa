//! Wire format of the RFC 3161 Time-Stamp Protocol.
//!
//! Builds DER-encoded `TimeStampReq` messages and extracts the handful of fields a client needs
//! (status, token, generation time) from a `TimeStampResp` without decoding the signed token.
//! Everything in this crate is a pure function of its inputs; entropy and transport live in
//! `stampede-common` and `stampede-client`.

// The protocol crate uses only safe Rust.
#![forbid(unsafe_code)]

pub mod cursor;
pub mod der;
pub mod error;
pub mod hash;
pub mod imprint;
pub mod oid;
pub mod request;
pub mod response;
pub mod status;
pub mod time;
pub mod wire;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export commonly used types
pub use hash::HashAlgorithm;
pub use imprint::MessageImprint;
pub use request::{Nonce, TimestampRequest};
pub use response::TimeStampResp;
pub use status::PkiStatus;
pub use wire::{FromDer, ToDer};
