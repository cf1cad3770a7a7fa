use crate::error::Error;

/// Implementations can serialize themselves into DER.
pub trait ToDer {
    /// Exact number of bytes `encode_der` appends
    fn der_size(&self) -> usize;

    fn encode_der(&self, out: &mut Vec<u8>);

    /// Convenience method to serialize this value into a new `Vec<u8>`.
    ///
    /// When encoding several values into one buffer use `encode_der` instead.
    fn to_der(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.der_size());
        self.encode_der(&mut out);
        debug_assert_eq!(out.len(), self.der_size());
        out
    }
}

/// Implementations can extract themselves from DER bytes received off the wire.
pub trait FromDer: Sized {
    fn from_der(bytes: &[u8]) -> Result<Self, Error>;
}
