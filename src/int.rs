//! DER encoded integers.
//!
//! This is a private module. Its public items are re-exported by the parent.

use bytes::Bytes;
use num_bigint::BigInt;
use crate::cache::Cache;
use crate::error::Error;
use crate::tag::Tag;
use crate::tagging::Tagging;
use crate::value::Native;


//------------ Integer -------------------------------------------------------

/// A DER encoded integer of arbitrary size.
///
/// The content of an integer is the big-endian two’s complement
/// representation of its value using the minimal number of octets. A value
/// of this type can be created either from its encoding, in which case the
/// content is only decoded when the value is first requested, or from any
/// value that converts into a [`BigInt`].
#[derive(Clone, Debug)]
pub struct Integer {
    tagging: Tagging,
    cache: Cache<BigInt>,
}

impl Integer {
    /// Creates a new integer from a native value.
    pub fn new(value: impl Into<BigInt>) -> Self {
        Integer {
            tagging: Tagging::new(Tag::INTEGER, false),
            cache: Cache::from_native(value.into()),
        }
    }

    /// Loads an integer from its complete encoding.
    pub fn load(data: &[u8]) -> Result<Self, Error> {
        let tagging = Tagging::new(Tag::INTEGER, false);
        let (_, contents) = tagging.strip(
            &Bytes::copy_from_slice(data), true
        )?;
        Ok(Self::from_parts(tagging, contents))
    }

    pub(crate) fn from_parts(tagging: Tagging, contents: Bytes) -> Self {
        Integer { tagging, cache: Cache::from_contents(contents) }
    }

    /// Returns the value of the integer.
    pub fn value(&self) -> Result<&BigInt, Error> {
        self.cache.native(|contents| decode_integer(contents))
    }

    /// Returns the value of the integer if it fits into an `i64`.
    pub fn to_i64(&self) -> Result<i64, Error> {
        i64::try_from(self.value()?).map_err(|_| {
            Error::type_err("integer value does not fit into i64")
        })
    }

    /// Replaces the value of the integer.
    pub fn set(&mut self, value: impl Into<BigInt>) {
        self.cache.set_native(value.into())
    }
}

primitive_value!(
    Integer, decode_integer, encode_integer,
    |this: &Integer| this.value().map(|value| Native::Integer(value.clone()))
);


//------------ Encoding and Decoding -----------------------------------------

/// Returns the content octets of an integer.
pub fn encode_integer(value: &BigInt) -> Bytes {
    value.to_signed_bytes_be().into()
}

/// Decodes the content octets of an integer.
///
/// The content must not be empty. If there is more than one octet, the
/// first nine bits must not all be the same since the value would have a
/// shorter encoding otherwise.
pub fn decode_integer(contents: &[u8]) -> Result<BigInt, Error> {
    match (contents.first(), contents.get(1).map(|x| x & 0x80 != 0)) {
        (None, _) => {
            xerr!(Err(Error::parse("empty integer")))
        }
        (Some(0), Some(false)) | (Some(0xFF), Some(true)) => {
            xerr!(Err(Error::parse("non-minimal integer encoding")))
        }
        _ => Ok(BigInt::from_signed_bytes_be(contents))
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::cache::State;
    use crate::error::ErrorKind;
    use crate::value::Asn1Value;

    #[test]
    fn encode() {
        fn step(value: i64, der: &[u8]) {
            assert_eq!(
                Integer::new(value).dump().unwrap().as_ref(), der,
                "encoding {value}"
            );
            assert_eq!(Integer::load(der).unwrap().to_i64().unwrap(), value);
        }

        step(0, b"\x02\x01\x00");
        step(255, b"\x02\x02\x00\xff");
        step(128, b"\x02\x02\x00\x80");
        step(127, b"\x02\x01\x7f");
        step(-127, b"\x02\x01\x81");
        step(-128, b"\x02\x01\x80");
        step(32768, b"\x02\x03\x00\x80\x00");
        step(-32768, b"\x02\x02\x80\x00");
        step(-32769, b"\x02\x03\xff\x7f\xff");
    }

    #[test]
    fn big_values() {
        let value: BigInt = BigInt::from(u64::MAX) * 16;
        let int = Integer::new(value.clone());
        let der = int.dump().unwrap();
        assert_eq!(der.as_ref(), b"\x02\x09\x0f\xff\xff\xff\xff\xff\xff\xff\xf0");
        assert_eq!(*Integer::load(&der).unwrap().value().unwrap(), value);
        assert_eq!(int.to_i64().unwrap_err().kind(), ErrorKind::Type);
    }

    #[test]
    fn decode_failures() {
        assert!(decode_integer(b"").is_err());
        assert!(decode_integer(b"\x00\x7f").is_err());
        assert!(decode_integer(b"\xff\x80").is_err());
        assert!(decode_integer(b"\x00\x80").is_ok());
        assert!(decode_integer(b"\xff\x7f").is_ok());

        // Loading is lazy, so only the first access fails.
        let int = Integer::load(b"\x02\x02\x00\x01").unwrap();
        assert_eq!(int.value().unwrap_err().kind(), ErrorKind::Parse);
        assert_eq!(int.dump().unwrap().as_ref(), b"\x02\x02\x00\x01");
    }

    #[test]
    fn set_invalidates() {
        let mut int = Integer::load(b"\x02\x01\x05").unwrap();
        assert_eq!(int.state(), State::RawOnly);
        assert_eq!(int.to_i64().unwrap(), 5);
        assert_eq!(int.state(), State::Synced);
        int.set(-1);
        assert_eq!(int.state(), State::NativeOnly);
        assert_eq!(int.dump().unwrap().as_ref(), b"\x02\x01\xff");
        assert_eq!(int.state(), State::Synced);
    }
}
