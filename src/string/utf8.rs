//! DER encoded UTF8String values.
//!
//! This is a private module. Its public items are re-exported by the parent.

use bytes::Bytes;
use crate::cache::Cache;
use crate::error::Error;
use crate::tag::Tag;
use crate::tagging::Tagging;
use crate::value::Native;


//------------ Utf8String ----------------------------------------------------

/// A string of Unicode characters encoded as UTF-8.
#[derive(Clone, Debug)]
pub struct Utf8String {
    tagging: Tagging,
    cache: Cache<String>,
}

impl Utf8String {
    /// Creates a new string value.
    pub fn new(text: impl Into<String>) -> Self {
        Utf8String {
            tagging: Tagging::new(Tag::UTF8_STRING, false),
            cache: Cache::from_native(text.into()),
        }
    }

    /// Loads a string from its complete encoding.
    pub fn load(data: &[u8]) -> Result<Self, Error> {
        let tagging = Tagging::new(Tag::UTF8_STRING, false);
        let (_, contents) = tagging.strip(
            &Bytes::copy_from_slice(data), true
        )?;
        Ok(Self::from_parts(tagging, contents))
    }

    pub(crate) fn from_parts(tagging: Tagging, contents: Bytes) -> Self {
        Utf8String { tagging, cache: Cache::from_contents(contents) }
    }

    /// Returns the text of the string.
    ///
    /// Fails if the content isn’t valid UTF-8.
    pub fn as_str(&self) -> Result<&str, Error> {
        self.cache.native(|contents| decode_utf8(contents)).map(String::as_str)
    }

    /// Replaces the text of the string.
    pub fn set(&mut self, text: impl Into<String>) {
        self.cache.set_native(text.into())
    }
}

primitive_value!(
    Utf8String, decode_utf8, encode_utf8,
    |this: &Utf8String| this.as_str().map(|text| Native::Utf8(text.into()))
);

fn encode_utf8(text: &String) -> Bytes {
    Bytes::copy_from_slice(text.as_bytes())
}

fn decode_utf8(contents: &[u8]) -> Result<String, Error> {
    match std::str::from_utf8(contents) {
        Ok(text) => Ok(text.into()),
        Err(_) => xerr!(Err(Error::parse("invalid UTF-8 in UTF8String")))
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ErrorKind;
    use crate::value::Asn1Value;

    #[test]
    fn encode_and_load() {
        let string = Utf8String::new("Hällo");
        assert_eq!(string.dump().unwrap().as_ref(), b"\x0c\x06H\xc3\xa4llo");
        let string = Utf8String::load(b"\x0c\x06H\xc3\xa4llo").unwrap();
        assert_eq!(string.as_str().unwrap(), "Hällo");
    }

    #[test]
    fn invalid_utf8() {
        let string = Utf8String::load(b"\x0c\x02\xc3\x28").unwrap();
        assert_eq!(string.as_str().unwrap_err().kind(), ErrorKind::Parse);
    }
}
