#![no_main]

use libfuzzer_sys::fuzz_target;
use stampede_protocol::error::Error;
use stampede_protocol::response::{TimeStampResp, contains_signed_data};
use stampede_protocol::wire::FromDer;

fuzz_target!(|data: &[u8]| {
    match TimeStampResp::from_der(data) {
        Ok(resp) => {
            // these must be true for all accepted responses
            assert_eq!(data[0], 0x30);
            assert!(contains_signed_data(data));
            assert_eq!(resp.token(), data);
        }
        Err(Error::Rejected { status, .. }) => {
            assert!(!status.is_granted());
            assert!(!contains_signed_data(data));
        }
        Err(_) => {
            // Error is expected for most fuzz inputs
        }
    }
});
