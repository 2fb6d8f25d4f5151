//! Values of any type.
//!
//! This is a private module. Its public items are re-exported by the parent.

use bytes::Bytes;
use log::trace;
use crate::cache::State;
use crate::error::Error;
use crate::tag::Tag;
use crate::tagging::{TagKind, Tagging};
use crate::value::{Asn1Value, Native, Spec, Value};


//------------ Any -----------------------------------------------------------

/// A value of unknown type.
///
/// The value keeps the tag and content octets it was created from. It can
/// later be parsed into a typed value once the type is known.
///
/// Since the type isn’t known, there is no native value to derive the
/// content from. The content octets are always the ones originally
/// captured.
#[derive(Clone, Debug)]
pub struct Any {
    tagging: Tagging,
    contents: Bytes,
}

impl Any {
    /// Loads a value from its complete encoding.
    pub fn load(data: &[u8]) -> Result<Self, Error> {
        Self::load_tagged(&[], Bytes::copy_from_slice(data))
    }

    /// Creates a value from the encoding of a typed value.
    pub fn from_value<T: Asn1Value>(value: &T) -> Result<Self, Error> {
        Self::load_tagged(&[], value.dump()?)
    }

    /// Loads a value inside the given explicit tags.
    pub(crate) fn load_tagged(
        layers: &[(TagKind, Tag)], data: Bytes
    ) -> Result<Self, Error> {
        // The base tag is irrelevant since the inner header isn’t checked.
        let tagging = Tagging::with_layers(Tag::NULL, false, layers);
        let (ident, contents) = tagging.strip(&data, false)?;
        trace!("captured value with tag {}", ident.tag());
        Ok(Any { tagging: tagging.capture(ident), contents })
    }

    pub(crate) fn from_parts(tagging: Tagging, contents: Bytes) -> Self {
        Any { tagging, contents }
    }

    /// Returns the tag of the captured value.
    pub fn tag(&self) -> Tag {
        self.tagging.base()
    }

    /// Returns whether the captured value uses constructed encoding.
    pub fn is_constructed(&self) -> bool {
        self.tagging.is_constructed()
    }

    /// Parses the captured value as a value of the given type.
    ///
    /// Explicit tags applied to this value are not part of what is parsed.
    pub fn parse(&self, spec: Spec) -> Result<Value, Error> {
        spec.load_tagged(&[], self.inner())
    }

    /// Parses the captured value as a tagged value of the given type.
    pub fn parse_tagged(
        &self, spec: Spec, kind: TagKind, tag: Tag
    ) -> Result<Value, Error> {
        spec.load_tagged(&[(kind, tag)], self.inner())
    }

    /// Parses the complete encoding using the given tagging layers.
    pub(crate) fn parse_with(
        &self, spec: Spec, layers: &[(TagKind, Tag)]
    ) -> Result<Value, Error> {
        spec.load_tagged(layers, self.dump()?)
    }

    /// Returns the encoding of the captured value without explicit tags.
    fn inner(&self) -> Bytes {
        self.tagging.untagged().encode(&self.contents)
    }
}

impl Asn1Value for Any {
    fn tagging(&self) -> &Tagging {
        &self.tagging
    }

    fn tagging_mut(&mut self) -> &mut Tagging {
        &mut self.tagging
    }

    fn contents(&self) -> Result<Bytes, Error> {
        Ok(self.contents.clone())
    }

    fn to_native(&self) -> Result<Native, Error> {
        self.dump().map(Native::Any)
    }

    fn state(&self) -> State {
        State::RawOnly
    }

    fn refresh(&mut self) -> Result<(), Error> {
        Ok(())
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn capture_and_parse() {
        let any = Any::load(b"\x04\x03foo").unwrap();
        assert_eq!(any.tag(), Tag::OCTET_STRING);
        assert!(!any.is_constructed());
        assert_eq!(any.contents().unwrap().as_ref(), b"foo");
        assert_eq!(any.dump().unwrap().as_ref(), b"\x04\x03foo");

        let value = any.parse(Spec::OctetString).unwrap();
        assert_eq!(
            value.as_octet_string().unwrap().octets().unwrap().as_ref(),
            b"foo"
        );
        assert_eq!(
            any.parse(Spec::Integer).unwrap_err().kind(), ErrorKind::Parse
        );
    }

    #[test]
    fn parse_tagged() {
        let any = Any::load(b"\x80\x01\x05").unwrap();
        assert_eq!(any.tag(), Tag::ctx(0));
        let value = any.parse_tagged(
            Spec::Integer, TagKind::Implicit, Tag::ctx(0)
        ).unwrap();
        assert_eq!(value.as_integer().unwrap().to_i64().unwrap(), 5);
        assert_eq!(value.dump().unwrap().as_ref(), b"\x80\x01\x05");
    }

    #[test]
    fn explicit_layers() {
        let any = Any::load_tagged(
            &[(TagKind::Explicit, Tag::ctx(1))],
            Bytes::from_static(b"\xa1\x03\x02\x01\x05")
        ).unwrap();
        assert_eq!(any.tag(), Tag::INTEGER);
        assert_eq!(any.dump().unwrap().as_ref(), b"\xa1\x03\x02\x01\x05");
        assert_eq!(
            any.parse(Spec::Integer).unwrap().dump().unwrap().as_ref(),
            b"\x02\x01\x05"
        );
    }

    #[test]
    fn native_is_encoding() {
        let any = Any::load(b"\x05\x00").unwrap();
        assert_eq!(
            any.to_native().unwrap(),
            Native::Any(Bytes::from_static(b"\x05\x00"))
        );
        assert_eq!(any.state(), State::RawOnly);
    }
}
