//! DER encoded octet strings.
//!
//! This is a private module. Its public items are re-exported by the parent.

use bytes::Bytes;
use crate::cache::Cache;
use crate::error::Error;
use crate::tag::Tag;
use crate::tagging::Tagging;
use crate::value::Native;


//------------ OctetString ---------------------------------------------------

/// An octet string value.
///
/// In DER, octet strings always use the primitive encoding and the content
/// octets are the string itself. Because of that, a loaded octet string
/// shares the data it was loaded from.
#[derive(Clone, Debug)]
pub struct OctetString {
    tagging: Tagging,
    cache: Cache<Bytes>,
}

impl OctetString {
    /// Creates a new octet string from the given octets.
    pub fn new(octets: impl Into<Bytes>) -> Self {
        OctetString {
            tagging: Tagging::new(Tag::OCTET_STRING, false),
            cache: Cache::from_native(octets.into()),
        }
    }

    /// Loads an octet string from its complete encoding.
    pub fn load(data: &[u8]) -> Result<Self, Error> {
        let tagging = Tagging::new(Tag::OCTET_STRING, false);
        let (_, contents) = tagging.strip(
            &Bytes::copy_from_slice(data), true
        )?;
        Ok(Self::from_parts(tagging, contents))
    }

    pub(crate) fn from_parts(tagging: Tagging, contents: Bytes) -> Self {
        OctetString { tagging, cache: Cache::from_contents(contents) }
    }

    /// Returns the octets of the string.
    pub fn octets(&self) -> Result<&Bytes, Error> {
        self.cache.native(decode_octets)
    }

    /// Replaces the octets of the string.
    pub fn set(&mut self, octets: impl Into<Bytes>) {
        self.cache.set_native(octets.into())
    }
}

primitive_value!(
    OctetString, decode_octets, Bytes::clone,
    |this: &OctetString| {
        this.octets().map(|octets| Native::Octets(octets.clone()))
    }
);

fn decode_octets(contents: &Bytes) -> Result<Bytes, Error> {
    Ok(contents.clone())
}


//============ Tests =========================================================
