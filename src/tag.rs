//! The identifier octets of a DER encoded value.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::fmt;
use smallvec::SmallVec;
use crate::error::Error;


//------------ Tag -----------------------------------------------------------

/// The tag of a value.
///
/// In ASN.1, tags are used to identify the type of a value. Tags consist of
/// one of four classes, represented by the [`Class`] enum, and a number
/// within this class. The number is an unsigned integer.
///
/// In DER encoding, the tag becomes part of the identifier octets by
/// combining it with a bit indicating whether a value is primitive or
/// constructed. This combination is represented by [`Ident`].
///
/// # Limitations
///
/// We only support tag numbers that fit into a `u32`. This should be more
/// than enough in practice.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Tag {
    class: Class,
    number: u32,
}

impl Tag {
    /// Creates a tag from a class and number.
    pub const fn new(class: Class, number: u32) -> Self {
        Tag { class, number }
    }

    /// Creates a new tag in the universal class with the given number.
    pub const fn universal(number: u32) -> Self {
        Self::new(Class::Universal, number)
    }

    /// Creates a new tag in the application class with the given number.
    pub const fn application(number: u32) -> Self {
        Self::new(Class::Application, number)
    }

    /// Creates a new tag in class “context specific” with the given number.
    pub const fn ctx(number: u32) -> Self {
        Self::new(Class::Context, number)
    }

    /// Creates a new tag in the private class with the given number.
    pub const fn private(number: u32) -> Self {
        Self::new(Class::Private, number)
    }

    /// Returns the class of the tag.
    pub const fn class(self) -> Class {
        self.class
    }

    /// Returns the number of the tag.
    pub const fn number(self) -> u32 {
        self.number
    }
}

/// # Constants for universal tags.
///
/// See clause 8.4 of ITU Recommendation X.690. Only the tags of types
/// implemented by this crate or commonly found inside them are provided.
///
impl Tag {
    /// The tag for the BOOLEAN type, UNIVERSAL 1.
    pub const BOOLEAN: Self = Self::universal(1);

    /// The tag for the INTEGER type, UNIVERSAL 2.
    pub const INTEGER: Self = Self::universal(2);

    /// The tag for the BIT STRING type, UNIVERSAL 3.
    pub const BIT_STRING: Self = Self::universal(3);

    /// The tag for the OCTET STRING type, UNIVERSAL 4.
    pub const OCTET_STRING: Self = Self::universal(4);

    /// The tag for the NULL type, UNIVERSAL 5.
    pub const NULL: Self = Self::universal(5);

    /// The tag for the OBJECT IDENTIFIER type, UNIVERSAL 6.
    pub const OID: Self = Self::universal(6);

    /// The tag for the UTF8String type, UNIVERSAL 12
    pub const UTF8_STRING: Self = Self::universal(12);

    /// The tag for the SEQUENCE and SEQUENCE OF types, UNIVERSAL 16.
    pub const SEQUENCE: Self = Self::universal(16);

    /// The tag for the SET and SET OF types, UNIVERSAL 17.
    pub const SET: Self = Self::universal(17);
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Tag::BOOLEAN => write!(f, "BOOLEAN"),
            Tag::INTEGER => write!(f, "INTEGER"),
            Tag::BIT_STRING => write!(f, "BIT STRING"),
            Tag::OCTET_STRING => write!(f, "OCTET STRING"),
            Tag::NULL => write!(f, "NULL"),
            Tag::OID => write!(f, "OBJECT IDENTIFIER"),
            Tag::UTF8_STRING => write!(f, "UTF8String"),
            Tag::SEQUENCE => write!(f, "SEQUENCE"),
            Tag::SET => write!(f, "SET"),
            tag => {
                match tag.class {
                    Class::Universal => write!(f, "[UNIVERSAL ")?,
                    Class::Application => write!(f, "[APPLICATION ")?,
                    Class::Context => write!(f, "[")?,
                    Class::Private => write!(f, "[PRIVATE ")?,
                }
                write!(f, "{}]", tag.number)
            }
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag({})", self)
    }
}


//------------ Ident ---------------------------------------------------------

/// The identifier octets of a value.
///
/// This is a tag plus the flag whether the value uses constructed encoding.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Ident {
    tag: Tag,
    constructed: bool,
}

impl Ident {
    /// The bit in the first octet that marks constructed encoding.
    const CONSTRUCTED_MASK: u8 = 0x20;

    /// The bits of the first octet holding a low tag number.
    const SINGLEBYTE_DATA_MASK: u8 = 0x1f;

    /// The bits of each subsequent octet holding part of the tag number.
    const MULTIBYTE_DATA_MASK: u8 = 0x7f;

    /// The bit that is set in all but the last octet of a long tag number.
    const MORE_OCTETS_MASK: u8 = 0x80;

    /// Creates identifier octets from a tag.
    pub const fn new(tag: Tag, constructed: bool) -> Self {
        Ident { tag, constructed }
    }

    /// Returns the tag of the identifier octets.
    pub const fn tag(self) -> Tag {
        self.tag
    }

    /// Returns whether the value is to be a constructed value.
    pub const fn is_constructed(self) -> bool {
        self.constructed
    }

    /// Parses identifier octets from the beginning of `data`.
    ///
    /// Returns the identifier and the number of octets it occupied. Long
    /// form tag numbers must be minimal, i.e., must not start with a padding
    /// octet and must not be used for numbers below 31.
    pub fn take_from(data: &[u8]) -> Result<(Self, usize), Error> {
        let first = match data.first() {
            Some(first) => *first,
            None => xerr!(return Err(Error::parse("unexpected end of data")))
        };
        let class = Class::from_u8(first);
        let constructed = first & Self::CONSTRUCTED_MASK != 0;

        // If we have a single octet tag, we can already return.
        if first & Self::SINGLEBYTE_DATA_MASK != Self::SINGLEBYTE_DATA_MASK {
            let number = u32::from(first & Self::SINGLEBYTE_DATA_MASK);
            return Ok((Self::new(Tag::new(class, number), constructed), 1))
        }

        let mut number = 0u32;
        for (idx, &octet) in data.iter().enumerate().skip(1) {
            if idx == 1 && octet == Self::MORE_OCTETS_MASK {
                xerr!(return Err(Error::parse("non-minimal tag number")))
            }
            if number > u32::MAX >> 7 {
                xerr!(return Err(Error::parse("tag number exceeds 32 bits")))
            }
            number = number << 7
                | u32::from(octet & Self::MULTIBYTE_DATA_MASK);
            if octet & Self::MORE_OCTETS_MASK == 0 {
                if number < u32::from(Self::SINGLEBYTE_DATA_MASK) {
                    xerr!(return Err(Error::parse(
                        "long form used for low tag number"
                    )))
                }
                return Ok((
                    Self::new(Tag::new(class, number), constructed),
                    idx + 1
                ))
            }
        }
        xerr!(Err(Error::parse("unexpected end of data")))
    }

    /// Returns the encoded identifier octets.
    ///
    /// There are two forms:
    /// * low tag number (for tag numbers between 0 and 30):
    ///     One octet. Bits 8 and 7 specify the class, bit 6 indicates whether
    ///     the encoding is constructed, and bits 5-1 give the tag number.
    /// * high tag number (for tag numbers 31 and greater):
    ///     Two or more octets. First octet is as in low-tag-number form,
    ///     except that bits 5-1 all have value 1. Second and following octets
    ///     give the tag number, base 128, most significant digit first, with
    ///     as few digits as possible, and with the bit 8 of each octet except
    ///     the last set to 1.
    pub fn to_octets(self) -> SmallVec<[u8; 6]> {
        let mut first = self.tag.class.into_u8();
        if self.constructed {
            first |= Self::CONSTRUCTED_MASK
        }
        let mut res = SmallVec::new();
        let number = self.tag.number;
        if number < u32::from(Self::SINGLEBYTE_DATA_MASK) {
            res.push(first | number as u8);
            return res
        }
        res.push(first | Self::SINGLEBYTE_DATA_MASK);

        // Collect the base 128 digits least significant first, then append
        // them in reverse.
        let mut digits = [0u8; 5];
        let mut count = 0;
        let mut rest = number;
        loop {
            digits[count] = (rest as u8) & Self::MULTIBYTE_DATA_MASK;
            count += 1;
            rest >>= 7;
            if rest == 0 {
                break
            }
        }
        for idx in (0..count).rev() {
            if idx == 0 {
                res.push(digits[idx])
            }
            else {
                res.push(digits[idx] | Self::MORE_OCTETS_MASK)
            }
        }
        res
    }

    /// Returns the number of identifier octets.
    pub fn encoded_len(self) -> usize {
        self.to_octets().len()
    }
}


//------------ Class ---------------------------------------------------------

/// The class of a tag.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Class {
    /// Types defined by X.680.
    Universal,

    /// Types specific to an application.
    Application,

    /// Tags specific to the surrounding type.
    Context,

    /// Types specific to an enterprise.
    Private,
}

impl Class {
    const fn from_u8(octet: u8) -> Self {
        match octet {
            0x00..=0x3F => Self::Universal,
            0x40..=0x7F => Self::Application,
            0x80..=0xBF => Self::Context,
            0xC0..=0xFF => Self::Private
        }
    }

    const fn into_u8(self) -> u8 {
        match self {
            Self::Universal => 0x00,
            Self::Application => 0x40,
            Self::Context => 0x80,
            Self::Private => 0xC0,
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    const CLASSES: &[Class] = &[
        Class::Universal, Class::Application, Class::Context, Class::Private
    ];

    fn round_trip(ident: Ident, expected: &[u8]) {
        assert_eq!(ident.to_octets().as_slice(), expected);
        assert_eq!(Ident::take_from(expected), Ok((ident, expected.len())));
    }

    #[test]
    fn single_octet_tags() {
        round_trip(Ident::new(Tag::INTEGER, false), b"\x02");
        round_trip(Ident::new(Tag::SEQUENCE, true), b"\x30");
        round_trip(Ident::new(Tag::ctx(0), true), b"\xa0");
        round_trip(Ident::new(Tag::application(30), false), b"\x5e");
        round_trip(Ident::new(Tag::private(1), false), b"\xc1");
        for &class in CLASSES {
            for number in 0..31 {
                let ident = Ident::new(Tag::new(class, number), false);
                assert_eq!(ident.encoded_len(), 1);
                assert_eq!(Ident::take_from(&ident.to_octets()).unwrap().0, ident);
            }
        }
    }

    #[test]
    fn multi_octet_tags() {
        round_trip(Ident::new(Tag::ctx(31), false), b"\x9f\x1f");
        round_trip(Ident::new(Tag::ctx(127), true), b"\xbf\x7f");
        round_trip(Ident::new(Tag::ctx(128), false), b"\x9f\x81\x00");
        round_trip(Ident::new(Tag::ctx(0x3fff), false), b"\x9f\xff\x7f");
        round_trip(
            Ident::new(Tag::universal(u32::MAX), false),
            b"\x1f\x8f\xff\xff\xff\x7f"
        );
    }

    #[test]
    fn tags_failures() {
        // Padding octet.
        assert!(Ident::take_from(b"\x1f\x80\x01").is_err());
        // Long form for a short number.
        assert!(Ident::take_from(b"\x1f\x05").is_err());
        // Truncated.
        assert!(Ident::take_from(b"\x1f\x81").is_err());
        assert!(Ident::take_from(b"").is_err());
        // Too large.
        assert!(Ident::take_from(b"\x1f\x9f\xff\xff\xff\x7f").is_err());
    }

    #[test]
    fn display() {
        assert_eq!(Tag::INTEGER.to_string(), "INTEGER");
        assert_eq!(Tag::ctx(3).to_string(), "[3]");
        assert_eq!(Tag::application(7).to_string(), "[APPLICATION 7]");
    }
}
