//! Client for RFC 3161 time-stamp authorities.
//!
//! Hashes content, sends a `TimeStampReq` over HTTP and extracts the token, status and generation
//! time from the authority's reply. See [`get_timestamp`] for the one-call entry point and
//! [`Client`] for explicit configuration.

#![forbid(unsafe_code)]

pub mod args;
pub mod client;
pub mod config;
pub mod presets;
pub mod response;
pub mod transport;
pub mod verify;

pub use client::*;
pub use config::{Credentials, OperatingMode, TsaConfig};
pub use response::TimestampResponse;
pub use verify::{VerificationError, verify, verify_with};
