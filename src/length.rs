//! The length octets.
//!
//! This is a private module. The [`Length`] defined herein is not
//! publicly exposed.

use smallvec::SmallVec;
use crate::error::Error;


//------------ Length --------------------------------------------------------

/// The length octets of a DER encoded value.
///
/// # Encoding
///
/// The length can be encoded in one of two basic ways. Which one is used is
/// determined by the most significant bit of the first octet. If it is not
/// set, the length octets is one octet long and the remaining bits of this
/// first octet provide the length. Thus, if the first octet is less than
/// 128, it provides the length already.
///
/// If the most significant bit is set, the remaining bits of the first
/// octet specify the number of octets that follow to encode the actual
/// length. Those following octets give the big-endian encoding of the
/// length of the content octets.
///
/// A first octet of exactly 128 signals the indefinite length form which
/// is not allowed in DER. DER also requires the length to be encoded in the
/// minimum number of octets.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[repr(transparent)]
pub struct Length(usize);

impl Length {
    const LEN: usize = 0usize.to_ne_bytes().len();

    /// Creates a new length.
    pub fn new(len: usize) -> Self {
        Length(len)
    }

    /// Returns the length as a `usize`.
    pub fn value(self) -> usize {
        self.0
    }

    /// Parses DER length octets from the beginning of `data`.
    ///
    /// Returns the length and the number of octets the length octets took.
    pub fn take_from(data: &[u8]) -> Result<(Self, usize), Error> {
        let first = match data.first() {
            Some(first) => *first,
            None => xerr!(return Err(Error::parse("unexpected end of data")))
        };
        match first {
            // Bit 7 clear: single.
            n if n & 0x80 == 0 => return Ok((Length(n as usize), 1)),

            // 0x80: indefinite.
            0x80 => {
                xerr!(return Err(Error::parse(
                    "indefinite length not allowed in DER"
                )))
            }

            // 0xFF: illegal.
            0xFF => xerr!(return Err(Error::parse("illegal length octets"))),

            _ => { }
        }

        let count = (first & 0x7F) as usize;
        let octets = match data.get(1..=count) {
            Some(octets) => octets,
            None => xerr!(return Err(Error::parse("unexpected end of data")))
        };

        // The second octet can’t be zero and it can’t be less that 0x80 if
        // it is the last octet as well. In both cases, there is a shorter
        // encoding.
        if octets[0] == 0 || (octets[0] < 0x80 && count == 1) {
            xerr!(return Err(Error::parse("illegal length in DER")))
        }
        if count > Self::LEN {
            xerr!(return Err(Error::parse("excessive length")))
        }

        let mut res = 0usize.to_ne_bytes();
        res[Self::LEN - count..].copy_from_slice(octets);
        Ok((Length(usize::from_be_bytes(res)), count + 1))
    }

    /// Returns the length of the encoded representation of the value.
    pub fn encoded_len(self) -> usize {
        if self.0 > 0x7F {
            Self::LEN - self.encoded_start_idx() + 1
        }
        else {
            1
        }
    }

    /// Appends the encoded length to the end of `target`.
    pub fn append_encoded(self, target: &mut SmallVec<[u8; 16]>) {
        if self.0 > 0x7F {
            let idx = self.encoded_start_idx();
            debug_assert!(idx < Self::LEN);

            // LEN will never be greater than 126 bytes. Also, `idx` won’t be
            // greater than LEN, so the subtraction here is fine.
            target.push(((Self::LEN - idx) | 0x80) as u8);
            target.extend_from_slice(&self.0.to_be_bytes()[idx..])
        }
        else {
            target.push(self.0 as u8)
        }
    }

    /// Returns the index of the first non-zero octet of the length.
    fn encoded_start_idx(self) -> usize {
        (self.0.leading_zeros() / 8) as usize
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn take_from(data: &[u8]) -> Result<usize, Error> {
        let (len, used) = Length::take_from(data)?;
        if used == data.len() {
            Ok(len.value())
        }
        else {
            Err(Error::parse("TRAILING DATA"))
        }
    }

    #[test]
    fn der_take_from() {
        assert_eq!(take_from(b"\x00").unwrap(), 0x00);
        assert_eq!(take_from(b"\x12").unwrap(), 0x12);
        assert_eq!(take_from(b"\x7f").unwrap(), 0x7f);
        assert!(take_from(b"\x80").is_err());
        assert!(take_from(b"\x81\x00").is_err());
        assert!(take_from(b"\x81\x7f").is_err());
        assert_eq!(take_from(b"\x81\x80").unwrap(), 0x80);
        assert_eq!(take_from(b"\x81\xF0").unwrap(), 0xF0);
        assert!(take_from(b"\x82\x00\x00").is_err());
        assert_eq!(take_from(b"\x82\xF0\x0E").unwrap(), 0xF00E);
        assert!(take_from(b"\x82\x00\x0E").is_err());
        assert!(take_from(b"\x82\xF0").is_err());
        assert!(take_from(b"\xFF").is_err());
        assert!(take_from(b"").is_err());
    }

    #[test]
    fn encode() {
        fn step(len: usize, res: &[u8]) {
            let len = Length::new(len);
            let mut vec = SmallVec::new();
            len.append_encoded(&mut vec);
            assert_eq!(vec.as_slice(), res, "append failed for {len:?}");
            assert_eq!(len.encoded_len(), res.len());
        }

        step(0, b"\x00");
        step(0x12, b"\x12");
        step(0x7f, b"\x7f");
        step(0x80, b"\x81\x80");
        step(0xdead, b"\x82\xde\xad");
        step(0x01_0000, b"\x83\x01\x00\x00");
    }
}
