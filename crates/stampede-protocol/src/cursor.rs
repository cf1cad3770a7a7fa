use Error::{BufferTooSmall, IndefiniteLength, LengthTooLong, UnexpectedTag};

use crate::error::Error;

/// A single tag-length-value read by a [`DerCursor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tlv<'a> {
    pub tag: u8,
    pub value: &'a [u8],
}

/// A read-only cursor over DER bytes. Every read is bounds checked; malformed input produces an
/// [`Error`] and never a panic.
///
/// Only single-octet tags are understood, which covers every field a time-stamp client reads.
pub struct DerCursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> DerCursor<'a> {
    /// Largest number of long-form length octets accepted (lengths up to 4 GiB)
    const MAX_LENGTH_OCTETS: usize = 4;

    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    #[inline]
    pub fn has_remaining(&self) -> bool {
        self.position < self.data.len()
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// The tag of the next TLV without advancing the cursor
    #[inline]
    pub fn peek_tag(&self) -> Option<u8> {
        self.data.get(self.position).copied()
    }

    /// Try to get a single byte, advancing the cursor
    #[inline]
    pub fn try_get_u8(&mut self) -> Result<u8, Error> {
        let byte = *self.data.get(self.position).ok_or(BufferTooSmall(1, 0))?;
        self.position += 1;
        Ok(byte)
    }

    /// Try to borrow the next `n` bytes, advancing the cursor
    #[inline]
    pub fn try_get_slice(&mut self, n: usize) -> Result<&'a [u8], Error> {
        if self.remaining() < n {
            return Err(BufferTooSmall(n, self.remaining()));
        }

        let data: &'a [u8] = self.data;
        let slice = &data[self.position..self.position + n];
        self.position += n;
        Ok(slice)
    }

    /// Read a DER length in short or long form
    pub fn try_get_length(&mut self) -> Result<usize, Error> {
        let first = self.try_get_u8()?;

        if first < 0x80 {
            return Ok(first as usize);
        }

        if first == 0x80 {
            return Err(IndefiniteLength);
        }

        let nbytes = (first & 0x7f) as usize;
        if nbytes > Self::MAX_LENGTH_OCTETS {
            return Err(LengthTooLong(nbytes));
        }

        let len = self
            .try_get_slice(nbytes)?
            .iter()
            .fold(0usize, |acc, &b| (acc << 8) | b as usize);

        Ok(len)
    }

    /// Read the next complete TLV, advancing past its value
    pub fn read_tlv(&mut self) -> Result<Tlv<'a>, Error> {
        let tag = self.try_get_u8()?;
        let len = self.try_get_length()?;
        let value = self.try_get_slice(len)?;

        Ok(Tlv { tag, value })
    }

    /// Read the next TLV and return its value if the tag is `expected`
    pub fn expect(&mut self, expected: u8) -> Result<&'a [u8], Error> {
        let tlv = self.read_tlv()?;

        if tlv.tag != expected {
            return Err(UnexpectedTag {
                expected,
                found: tlv.tag,
            });
        }

        Ok(tlv.value)
    }
}
