//! This crate provides shared functionality used by the client and the CLI, including digest
//! calculation, nonce entropy and encoding/decoding helpers.

#![forbid(unsafe_code)]

pub mod crypto;
pub mod encoding;
