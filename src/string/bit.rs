//! DER encoded bit strings.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::collections::BTreeSet;
use bytes::Bytes;
use crate::cache::Cache;
use crate::error::Error;
use crate::tag::Tag;
use crate::tagging::Tagging;
use crate::value::Native;


//------------ BitNames ------------------------------------------------------

/// A table of names for bit positions.
///
/// The table is intended to be declared statically:
///
/// ```
/// use dervalue::BitNames;
///
/// static KEY_USAGE: BitNames = BitNames::new(&[
///     (0, "digitalSignature"), (1, "nonRepudiation"), (2, "keyEncipherment"),
/// ]);
/// ```
///
/// A bit string with named bits always has at least as many bits as are
/// needed for the highest named position.
#[derive(Debug)]
pub struct BitNames {
    names: &'static [(usize, &'static str)],
}

impl BitNames {
    /// Creates a new table from pairs of position and name.
    pub const fn new(names: &'static [(usize, &'static str)]) -> Self {
        BitNames { names }
    }

    /// Returns the name of the bit at the given position.
    pub fn name(&self, pos: usize) -> Option<&'static str> {
        self.names.iter().find(|item| item.0 == pos).map(|item| item.1)
    }

    /// Returns the position of the bit with the given name.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().find(|item| item.1 == name).map(|item| item.0)
    }

    /// Returns the number of bits covered by the table.
    pub fn width(&self) -> usize {
        self.names.iter().map(|item| item.0 + 1).max().unwrap_or(0)
    }

    /// Returns the bit for a position.
    fn bit(&self, pos: usize) -> Bit {
        match self.name(pos) {
            Some(name) => Bit::Named(name),
            None => Bit::Unnamed(pos),
        }
    }

    /// Returns the position of a bit.
    fn resolve(&self, bit: Bit) -> Result<usize, Error> {
        let pos = match bit {
            Bit::Named(name) => match self.position(name) {
                Some(pos) => pos,
                None => {
                    xerr!(return Err(Error::type_err(format!(
                        "unknown bit name '{}'", name
                    ))))
                }
            }
            Bit::Unnamed(pos) => pos,
        };
        self.check(pos)?;
        Ok(pos)
    }

    /// Checks that a position is within the declared width.
    fn check(&self, pos: usize) -> Result<(), Error> {
        if pos >= self.width() {
            xerr!(Err(Error::encoding(format!(
                "bit {} beyond the {} declared bits", pos, self.width()
            ))))
        }
        else {
            Ok(())
        }
    }
}


//------------ Bit -----------------------------------------------------------

/// A set bit in a bit string with named bits.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Bit {
    /// A bit that has a name in the table.
    Named(&'static str),

    /// A bit at a position without a name.
    Unnamed(usize),
}


//------------ BitString -----------------------------------------------------

/// A bit string value.
///
/// Bit strings are a sequence of bits. Unlike
/// [`OctetString`][crate::OctetString]s, they do not need to contain a
/// multiple of eight bits.
///
/// A plain bit string keeps exactly the bits it was given. A bit string
/// with [`BitNames`] always covers the full width of the table and allows
/// accessing bits by name. Its native value is the set of bits that are
/// set.
///
/// # DER Encoding
///
/// The first octet of the content contains the number of unused bits in
/// the last octet. The following octets contain the bits with the first
/// bit in the most significant bit of the octet. The unused bits must be
/// zero. An empty bit string is encoded as a single zero octet.
#[derive(Clone, Debug)]
pub struct BitString {
    tagging: Tagging,
    names: Option<&'static BitNames>,
    cache: Cache<Vec<bool>>,
}

impl BitString {
    /// Creates a new plain bit string.
    pub fn new(bits: impl Into<Vec<bool>>) -> Self {
        BitString {
            tagging: Tagging::new(Tag::BIT_STRING, false),
            names: None,
            cache: Cache::from_native(bits.into()),
        }
    }

    /// Creates a bit string with named bits with all bits cleared.
    pub fn named(names: &'static BitNames) -> Self {
        BitString {
            tagging: Tagging::new(Tag::BIT_STRING, false),
            names: Some(names),
            cache: Cache::from_native(vec![false; names.width()]),
        }
    }

    /// Creates a bit string with named bits from a sequence of bits.
    ///
    /// Missing bits up to the declared width are cleared. Fails if a bit
    /// beyond the declared width is set.
    pub fn named_from_bits(
        names: &'static BitNames, bits: impl Into<Vec<bool>>
    ) -> Result<Self, Error> {
        let mut bits = bits.into();
        if let Some(pos) = bits.iter().rposition(|bit| *bit) {
            names.check(pos)?;
        }
        bits.resize(names.width(), false);
        let mut res = Self::named(names);
        res.cache.set_native(bits);
        Ok(res)
    }

    /// Creates a bit string with named bits from the set bits.
    pub fn named_from_set(
        names: &'static BitNames, set: &BTreeSet<Bit>
    ) -> Result<Self, Error> {
        let mut bits = vec![false; names.width()];
        for bit in set {
            bits[names.resolve(*bit)?] = true;
        }
        let mut res = Self::named(names);
        res.cache.set_native(bits);
        Ok(res)
    }

    /// Loads a plain bit string from its complete encoding.
    pub fn load(data: &[u8]) -> Result<Self, Error> {
        Self::load_with(None, data)
    }

    /// Loads a bit string with named bits from its complete encoding.
    pub fn load_named(
        names: &'static BitNames, data: &[u8]
    ) -> Result<Self, Error> {
        Self::load_with(Some(names), data)
    }

    fn load_with(
        names: Option<&'static BitNames>, data: &[u8]
    ) -> Result<Self, Error> {
        let tagging = Tagging::new(Tag::BIT_STRING, false);
        let (_, contents) = tagging.strip(
            &Bytes::copy_from_slice(data), true
        )?;
        Ok(Self::from_parts(names, tagging, contents))
    }

    pub(crate) fn from_parts(
        names: Option<&'static BitNames>, tagging: Tagging, contents: Bytes
    ) -> Self {
        BitString { tagging, names, cache: Cache::from_contents(contents) }
    }

    /// Returns the table of bit names if there is one.
    pub fn names(&self) -> Option<&'static BitNames> {
        self.names
    }

    /// Returns the bits of the string.
    pub fn bits(&self) -> Result<&[bool], Error> {
        self.cache.native(|contents| decode_bits(contents)).map(Vec::as_slice)
    }

    /// Returns the number of bits.
    pub fn len(&self) -> Result<usize, Error> {
        self.bits().map(<[bool]>::len)
    }

    /// Returns whether the bit string contains no bits.
    pub fn is_empty(&self) -> Result<bool, Error> {
        self.bits().map(<[bool]>::is_empty)
    }

    /// Returns the value of the bit at the given position.
    ///
    /// Bits beyond the end of the string are considered cleared.
    pub fn bit(&self, pos: usize) -> Result<bool, Error> {
        Ok(self.bits()?.get(pos).copied().unwrap_or(false))
    }

    /// Changes the value of the bit at the given position.
    ///
    /// A plain bit string grows as necessary. For a bit string with named
    /// bits, the position must be within the declared width.
    pub fn set_bit(&mut self, pos: usize, value: bool) -> Result<(), Error> {
        if let Some(names) = self.names {
            names.check(pos)?;
        }
        let new_len = match pos.checked_add(1) {
            Some(len) => len,
            None => {
                xerr!(return Err(Error::encoding(format!(
                    "bit position {} out of range", pos
                ))))
            }
        };
        let bits = self.cache.native_mut(|contents| decode_bits(contents))?;
        if new_len > bits.len() {
            if bits.try_reserve_exact(new_len - bits.len()).is_err() {
                xerr!(return Err(Error::encoding(format!(
                    "bit position {} out of range", pos
                ))))
            }
            bits.resize(new_len, false);
        }
        bits[pos] = value;
        Ok(())
    }

    /// Returns the value of the bit with the given name.
    pub fn named_bit(&self, name: &str) -> Result<bool, Error> {
        let pos = self.position(name)?;
        self.bit(pos)
    }

    /// Changes the value of the bit with the given name.
    pub fn set_named_bit(
        &mut self, name: &str, value: bool
    ) -> Result<(), Error> {
        let pos = self.position(name)?;
        self.set_bit(pos, value)
    }

    /// Returns the set bits.
    ///
    /// Bits with a name in the table are returned by name, all others by
    /// position. For a plain bit string, all bits are unnamed.
    pub fn set_bits(&self) -> Result<BTreeSet<Bit>, Error> {
        let bits = self.bits()?;
        Ok(bits.iter().enumerate().filter(|(_, bit)| **bit).map(|(pos, _)| {
            match self.names {
                Some(names) => names.bit(pos),
                None => Bit::Unnamed(pos),
            }
        }).collect())
    }

    fn position(&self, name: &str) -> Result<usize, Error> {
        match self.names.and_then(|names| names.position(name)) {
            Some(pos) => Ok(pos),
            None => {
                xerr!(Err(Error::type_err(format!(
                    "unknown bit name '{}'", name
                ))))
            }
        }
    }
}

primitive_value!(
    BitString, decode_bits, encode_bits,
    |this: &BitString| {
        if this.names.is_some() {
            this.set_bits().map(Native::NamedBits)
        }
        else {
            this.bits().map(|bits| Native::Bits(bits.into()))
        }
    }
);


//------------ Encoding and Decoding -----------------------------------------

/// Returns the content octets for a sequence of bits.
pub fn encode_bits(bits: &Vec<bool>) -> Bytes {
    let unused = (8 - bits.len() % 8) % 8;
    let mut res = Vec::with_capacity(bits.len().div_ceil(8) + 1);
    res.push(unused as u8);
    for chunk in bits.chunks(8) {
        let mut octet = 0u8;
        for (idx, bit) in chunk.iter().enumerate() {
            if *bit {
                octet |= 0x80 >> idx;
            }
        }
        res.push(octet);
    }
    res.into()
}

/// Decodes the content octets of a bit string.
pub fn decode_bits(contents: &[u8]) -> Result<Vec<bool>, Error> {
    let (unused, octets) = match contents.split_first() {
        Some((unused, octets)) => (*unused as usize, octets),
        None => xerr!(return Err(Error::parse("missing unused bits octet")))
    };
    if unused > 7 {
        xerr!(return Err(Error::parse("invalid number of unused bits")))
    }
    let last = match octets.last() {
        Some(last) => *last,
        None => {
            if unused != 0 {
                xerr!(return Err(Error::parse(
                    "unused bits in empty bit string"
                )))
            }
            return Ok(Vec::new())
        }
    };
    if last & ((1u8 << unused) - 1) != 0 {
        xerr!(return Err(Error::parse("unused bits must be zero in DER")))
    }
    let len = octets.len() * 8 - unused;
    Ok((0..len).map(|pos| octets[pos / 8] & (0x80 >> (pos % 8)) != 0).collect())
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ErrorKind;
    use crate::value::Asn1Value;

    static NAMES: BitNames = BitNames::new(&[
        (0, "zero"), (1, "one"), (2, "two"), (3, "three"), (4, "four"),
        (6, "six"), (7, "seven"),
    ]);

    fn bits(positions: &[u8]) -> Vec<bool> {
        positions.iter().map(|bit| *bit != 0).collect()
    }

    #[test]
    fn plain_encoding() {
        assert_eq!(
            BitString::new(bits(&[0, 1, 1])).dump().unwrap().as_ref(),
            b"\x03\x02\x05\x60"
        );
        assert_eq!(
            BitString::new(
                bits(&[0, 1, 1, 0, 0, 0, 0, 0])
            ).dump().unwrap().as_ref(),
            b"\x03\x02\x00\x60"
        );
        assert_eq!(
            BitString::new(Vec::new()).dump().unwrap().as_ref(),
            b"\x03\x01\x00"
        );
        let string = BitString::load(b"\x03\x02\x05\x60").unwrap();
        assert_eq!(string.bits().unwrap(), bits(&[0, 1, 1]).as_slice());
    }

    #[test]
    fn named_encoding() {
        let mut string = BitString::named(&NAMES);
        string.set_named_bit("one", true).unwrap();
        string.set_named_bit("two", true).unwrap();
        assert_eq!(string.dump().unwrap().as_ref(), b"\x03\x02\x00\x60");
        assert!(string.named_bit("one").unwrap());
        assert!(!string.named_bit("zero").unwrap());

        let string = BitString::named_from_bits(&NAMES, bits(&[0])).unwrap();
        assert_eq!(string.dump().unwrap().as_ref(), b"\x03\x02\x00\x00");

        let set = [Bit::Named("one"), Bit::Named("two")].into_iter().collect();
        let string = BitString::named_from_set(&NAMES, &set).unwrap();
        assert_eq!(string.dump().unwrap().as_ref(), b"\x03\x02\x00\x60");
        assert_eq!(string.to_native().unwrap(), Native::NamedBits(set));
    }

    #[test]
    fn named_failures() {
        let mut string = BitString::named(&NAMES);
        assert_eq!(
            string.set_bit(8, true).unwrap_err().kind(), ErrorKind::Encoding
        );
        assert_eq!(
            string.set_named_bit("eight", true).unwrap_err().kind(),
            ErrorKind::Type
        );
        assert_eq!(
            BitString::named_from_bits(
                &NAMES, bits(&[0, 0, 0, 0, 0, 0, 0, 0, 1])
            ).unwrap_err().kind(),
            ErrorKind::Encoding
        );
        let set = [Bit::Unnamed(9)].into_iter().collect();
        assert_eq!(
            BitString::named_from_set(&NAMES, &set).unwrap_err().kind(),
            ErrorKind::Encoding
        );
    }

    #[test]
    fn unnamed_positions() {
        let string = BitString::load_named(&NAMES, b"\x03\x02\x00\x24").unwrap();
        assert_eq!(
            string.set_bits().unwrap(),
            [Bit::Named("two"), Bit::Unnamed(5)].into_iter().collect()
        );
    }

    #[test]
    fn set_bit_grows() {
        let mut string = BitString::new(bits(&[1]));
        string.set_bit(9, true).unwrap();
        assert_eq!(string.len().unwrap(), 10);
        assert_eq!(string.dump().unwrap().as_ref(), b"\x03\x03\x06\x80\x40");
    }

    #[test]
    fn set_bit_out_of_range() {
        let mut string = BitString::new(bits(&[1]));
        assert_eq!(
            string.set_bit(usize::MAX, true).unwrap_err().kind(),
            ErrorKind::Encoding
        );
        assert_eq!(
            string.set_bit(usize::MAX / 2, true).unwrap_err().kind(),
            ErrorKind::Encoding
        );
        assert_eq!(string.bits().unwrap(), [true]);
        assert_eq!(string.dump().unwrap().as_ref(), b"\x03\x02\x07\x80");
    }

    #[test]
    fn decode_failures() {
        assert!(decode_bits(b"").is_err());
        assert!(decode_bits(b"\x08\x00").is_err());
        assert!(decode_bits(b"\x01").is_err());
        assert!(decode_bits(b"\x01\x01").is_err());
        assert_eq!(decode_bits(b"\x00").unwrap(), Vec::<bool>::new());
        assert_eq!(decode_bits(b"\x07\x80").unwrap(), vec![true]);
    }
}
