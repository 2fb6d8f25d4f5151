//! Typed values and their native representations.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::{fmt, ptr};
use std::collections::BTreeSet;
use bytes::Bytes;
use log::trace;
use num_bigint::BigInt;
use crate::any::Any;
use crate::cache::State;
use crate::error::Error;
use crate::int::Integer;
use crate::oid::{ObjectIdentifier, Oid};
use crate::sequence::{Sequence, SequenceSpec};
use crate::sequence_of::SequenceOf;
use crate::string::{Bit, BitNames, BitString, OctetString, Utf8String};
use crate::tag::Tag;
use crate::tagging::{TagKind, Tagging};


//------------ Asn1Value -----------------------------------------------------

/// The operations shared by all typed values.
///
/// A value always knows its tagging and can produce its content octets,
/// either because it was loaded from them or by encoding its native value.
/// The complete encoding returned by [`dump`][Self::dump] is derived from
/// these two.
pub trait Asn1Value: Clone {
    /// Returns the tagging of the value.
    fn tagging(&self) -> &Tagging;

    /// Returns a mutable reference to the tagging of the value.
    fn tagging_mut(&mut self) -> &mut Tagging;

    /// Returns the content octets of the value.
    ///
    /// This is the value of the innermost header only. Explicit tagging
    /// adds headers around it but does not change the content.
    fn contents(&self) -> Result<Bytes, Error>;

    /// Returns the native value.
    fn to_native(&self) -> Result<Native, Error>;

    /// Returns which representations are currently available.
    fn state(&self) -> State;

    /// Re-encodes the content octets from the native value.
    ///
    /// For aggregate values this happens recursively for all children.
    fn refresh(&mut self) -> Result<(), Error>;

    /// Returns the complete DER encoding of the value.
    ///
    /// For a loaded value that hasn’t been changed, this is the exact data
    /// it was loaded from.
    fn dump(&self) -> Result<Bytes, Error> {
        Ok(self.tagging().encode(&self.contents()?))
    }

    /// Re-encodes the value from its native value and returns the encoding.
    fn force_dump(&mut self) -> Result<Bytes, Error> {
        self.refresh()?;
        self.dump()
    }

    /// Returns a copy of the value with another layer of tagging applied.
    fn retag(&self, kind: TagKind, tag: Tag) -> Self {
        let mut res = self.clone();
        res.tagging_mut().push(kind, tag);
        res
    }

    /// Returns a copy of the value with the most recent tagging removed.
    ///
    /// If the value isn’t tagged, the copy is unchanged.
    fn untag(&self) -> Self {
        let mut res = self.clone();
        res.tagging_mut().pop();
        res
    }

    /// Returns an independent copy of the value.
    ///
    /// Changes to the copy, including changes to nested values, never
    /// affect the original and vice versa.
    fn copy(&self) -> Self {
        self.clone()
    }

    /// Returns whether two values have the same content octets.
    ///
    /// Returns `false` if either value cannot be encoded.
    fn content_eq<T: Asn1Value>(&self, other: &T) -> bool {
        match (self.contents(), other.contents()) {
            (Ok(left), Ok(right)) => left == right,
            _ => false
        }
    }
}


//------------ primitive_value -----------------------------------------------

/// Implements `Asn1Value` for a primitive value type.
///
/// The type needs a `tagging` field and a `cache` field. The decode
/// function turns content octets into the native value, the encode
/// function does the reverse and must not fail. The last argument converts
/// a reference to the type into a `Native`.
macro_rules! primitive_value {
    ( $type:ident, $decode:expr, $encode:expr, $to_native:expr ) => {
        impl $crate::value::Asn1Value for $type {
            fn tagging(&self) -> &$crate::tagging::Tagging {
                &self.tagging
            }

            fn tagging_mut(&mut self) -> &mut $crate::tagging::Tagging {
                &mut self.tagging
            }

            fn contents(
                &self
            ) -> Result<bytes::Bytes, $crate::error::Error> {
                self.cache.contents(|native| Ok($encode(native)))
            }

            fn to_native(
                &self
            ) -> Result<$crate::value::Native, $crate::error::Error> {
                $to_native(self)
            }

            fn state(&self) -> $crate::cache::State {
                self.cache.state()
            }

            fn refresh(&mut self) -> Result<(), $crate::error::Error> {
                self.cache.refresh(
                    |contents: &bytes::Bytes| $decode(contents),
                    |native| Ok($encode(native))
                )
            }
        }
    }
}


//------------ Spec ----------------------------------------------------------

/// The declared type of a value.
///
/// Constructed types refer to static declarations, so a `Spec` is cheap to
/// copy and can itself be used in static declarations.
#[derive(Clone, Copy)]
pub enum Spec {
    /// An INTEGER.
    Integer,

    /// A BIT STRING without named bits.
    BitString,

    /// A BIT STRING with the given named bits.
    NamedBitString(&'static BitNames),

    /// An OCTET STRING.
    OctetString,

    /// A UTF8String.
    Utf8String,

    /// An OBJECT IDENTIFIER.
    Oid,

    /// A SEQUENCE with the given fields.
    Sequence(&'static SequenceSpec),

    /// A SEQUENCE OF elements of the given type.
    SequenceOf(&'static Spec),

    /// A value of any type.
    Any,
}

impl Spec {
    /// Returns the universal tag of the type.
    ///
    /// Returns `None` for [`Spec::Any`] which takes whatever tag it finds.
    pub fn tag(self) -> Option<Tag> {
        match self {
            Spec::Integer => Some(Tag::INTEGER),
            Spec::BitString | Spec::NamedBitString(_) => {
                Some(Tag::BIT_STRING)
            }
            Spec::OctetString => Some(Tag::OCTET_STRING),
            Spec::Utf8String => Some(Tag::UTF8_STRING),
            Spec::Oid => Some(Tag::OID),
            Spec::Sequence(_) | Spec::SequenceOf(_) => Some(Tag::SEQUENCE),
            Spec::Any => None,
        }
    }

    /// Returns whether the type uses constructed encoding.
    pub fn is_constructed(self) -> bool {
        matches!(self, Spec::Sequence(_) | Spec::SequenceOf(_))
    }

    /// Returns whether this is the open type [`Spec::Any`].
    pub fn is_any(self) -> bool {
        matches!(self, Spec::Any)
    }

    /// Returns a human readable name of the type.
    pub fn name(self) -> &'static str {
        match self {
            Spec::Integer => "INTEGER",
            Spec::BitString | Spec::NamedBitString(_) => "BIT STRING",
            Spec::OctetString => "OCTET STRING",
            Spec::Utf8String => "UTF8String",
            Spec::Oid => "OBJECT IDENTIFIER",
            Spec::Sequence(spec) => spec.name,
            Spec::SequenceOf(_) => "SEQUENCE OF",
            Spec::Any => "ANY",
        }
    }

    /// Loads a value of this type from its complete encoding.
    ///
    /// The data must contain exactly one value. Only the headers are
    /// checked. The content is decoded when it is first needed.
    pub fn load(self, data: &[u8]) -> Result<Value, Error> {
        self.load_tagged(&[], Bytes::copy_from_slice(data))
    }

    /// Loads a value of this type with the given tagging applied.
    pub(crate) fn load_tagged(
        self, layers: &[(TagKind, Tag)], data: Bytes
    ) -> Result<Value, Error> {
        trace!("loading {} from {} octets", self, data.len());
        let tag = match self.tag() {
            Some(tag) => tag,
            None => return Any::load_tagged(layers, data).map(Value::Any)
        };
        let tagging = Tagging::with_layers(tag, self.is_constructed(), layers);
        let (_, contents) = tagging.strip(&data, true)?;
        Ok(match self {
            Spec::Integer => {
                Value::Integer(Integer::from_parts(tagging, contents))
            }
            Spec::BitString => {
                Value::BitString(
                    BitString::from_parts(None, tagging, contents)
                )
            }
            Spec::NamedBitString(names) => {
                Value::BitString(
                    BitString::from_parts(Some(names), tagging, contents)
                )
            }
            Spec::OctetString => {
                Value::OctetString(OctetString::from_parts(tagging, contents))
            }
            Spec::Utf8String => {
                Value::Utf8String(Utf8String::from_parts(tagging, contents))
            }
            Spec::Oid => {
                Value::ObjectIdentifier(
                    ObjectIdentifier::from_parts(tagging, contents)
                )
            }
            Spec::Sequence(spec) => {
                Value::Sequence(Sequence::from_parts(spec, tagging, contents))
            }
            Spec::SequenceOf(child) => {
                Value::SequenceOf(
                    SequenceOf::from_parts(child, tagging, contents)
                )
            }
            Spec::Any => Value::Any(Any::from_parts(tagging, contents)),
        })
    }

    /// Creates a value of this type from a native value.
    ///
    /// Fails with a type error if the native value doesn’t fit the type.
    /// Since [`Spec::Any`] cannot tell which type a native value should be
    /// encoded as, it only accepts the complete encoding via
    /// [`Native::Any`].
    pub fn wrap(self, native: Native) -> Result<Value, Error> {
        Ok(match (self, native) {
            (Spec::Integer, Native::Integer(value)) => {
                Value::Integer(Integer::new(value))
            }
            (Spec::BitString, Native::Bits(bits)) => {
                Value::BitString(BitString::new(bits))
            }
            (Spec::NamedBitString(names), Native::Bits(bits)) => {
                Value::BitString(BitString::named_from_bits(names, bits)?)
            }
            (Spec::NamedBitString(names), Native::NamedBits(set)) => {
                Value::BitString(BitString::named_from_set(names, &set)?)
            }
            (Spec::OctetString, Native::Octets(octets)) => {
                Value::OctetString(OctetString::new(octets))
            }
            (Spec::Utf8String, Native::Utf8(text)) => {
                Value::Utf8String(Utf8String::new(text))
            }
            (Spec::Oid, Native::Oid(oid)) => {
                Value::ObjectIdentifier(ObjectIdentifier::new(oid))
            }
            (Spec::Oid, Native::Utf8(text)) => {
                Value::ObjectIdentifier(ObjectIdentifier::new(text.parse()?))
            }
            (Spec::Sequence(spec), Native::Fields(fields)) => {
                Value::Sequence(Sequence::from_native(spec, fields)?)
            }
            (Spec::SequenceOf(child), Native::Items(items)) => {
                Value::SequenceOf(SequenceOf::from_native(child, items)?)
            }
            (Spec::Any, Native::Any(data)) => Value::Any(Any::load(&data)?),
            (Spec::Any, _) => {
                xerr!(return Err(Error::type_err(
                    "cannot determine the type of a native value for ANY"
                )))
            }
            (spec, native) => {
                xerr!(return Err(Error::type_err(format!(
                    "{} cannot hold {}", spec, native.kind()
                ))))
            }
        })
    }
}

impl PartialEq for Spec {
    fn eq(&self, other: &Self) -> bool {
        match (*self, *other) {
            (Spec::Integer, Spec::Integer) => true,
            (Spec::BitString, Spec::BitString) => true,
            (Spec::NamedBitString(left), Spec::NamedBitString(right)) => {
                ptr::eq(left, right)
            }
            (Spec::OctetString, Spec::OctetString) => true,
            (Spec::Utf8String, Spec::Utf8String) => true,
            (Spec::Oid, Spec::Oid) => true,
            (Spec::Sequence(left), Spec::Sequence(right)) => {
                ptr::eq(left, right)
            }
            (Spec::SequenceOf(left), Spec::SequenceOf(right)) => {
                left == right
            }
            (Spec::Any, Spec::Any) => true,
            _ => false
        }
    }
}

impl Eq for Spec { }

impl fmt::Display for Spec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Debug for Spec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Spec::SequenceOf(child) => write!(f, "SequenceOf({:?})", child),
            _ => write!(f, "Spec({})", self.name())
        }
    }
}


//------------ Native --------------------------------------------------------

/// The native representation of a value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Native {
    /// The value of an INTEGER.
    Integer(BigInt),

    /// The bits of a BIT STRING.
    Bits(Vec<bool>),

    /// The set bits of a BIT STRING with named bits.
    NamedBits(BTreeSet<Bit>),

    /// The content of an OCTET STRING.
    Octets(Bytes),

    /// The text of a UTF8String.
    Utf8(String),

    /// An OBJECT IDENTIFIER.
    Oid(Oid),

    /// The present fields of a SEQUENCE in declaration order.
    Fields(Vec<(&'static str, Native)>),

    /// The elements of a SEQUENCE OF.
    Items(Vec<Native>),

    /// The complete encoding of a value of unknown type.
    Any(Bytes),
}

impl Native {
    /// Returns a human readable name of the kind of native value.
    pub fn kind(&self) -> &'static str {
        match *self {
            Native::Integer(_) => "an integer",
            Native::Bits(_) => "a bit sequence",
            Native::NamedBits(_) => "a set of named bits",
            Native::Octets(_) => "an octet sequence",
            Native::Utf8(_) => "a string",
            Native::Oid(_) => "an object identifier",
            Native::Fields(_) => "a list of fields",
            Native::Items(_) => "a list of items",
            Native::Any(_) => "an encoded value",
        }
    }

    /// Returns the native value of the named field.
    ///
    /// Returns `None` if this isn’t a list of fields or there is no field
    /// with that name.
    pub fn field(&self, name: &str) -> Option<&Native> {
        match *self {
            Native::Fields(ref fields) => {
                fields.iter().find_map(|(field, native)| {
                    (*field == name).then_some(native)
                })
            }
            _ => None
        }
    }
}

impl fmt::Display for Native {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Native::Integer(ref value) => fmt::Display::fmt(value, f),
            Native::Oid(ref oid) => fmt::Display::fmt(oid, f),
            Native::Utf8(ref text) => f.write_str(text),
            _ => f.write_str(self.kind())
        }
    }
}

macro_rules! native_from {
    ( $( $source:ty => $variant:ident, )* ) => {
        $(
            impl From<$source> for Native {
                fn from(src: $source) -> Self {
                    Native::$variant(src.into())
                }
            }
        )*
    }
}

native_from! {
    i8 => Integer, i16 => Integer, i32 => Integer, i64 => Integer,
    u8 => Integer, u16 => Integer, u32 => Integer, u64 => Integer,
    BigInt => Integer,
    Vec<bool> => Bits,
    BTreeSet<Bit> => NamedBits,
    Bytes => Octets,
    Vec<u8> => Octets,
    &'static [u8] => Octets,
    String => Utf8,
    &str => Utf8,
    Oid => Oid,
    Vec<Native> => Items,
}


//------------ Value ---------------------------------------------------------

/// A value of any of the supported types.
#[derive(Clone, Debug)]
pub enum Value {
    /// An INTEGER.
    Integer(Integer),

    /// A BIT STRING, with or without named bits.
    BitString(BitString),

    /// An OCTET STRING.
    OctetString(OctetString),

    /// A UTF8String.
    Utf8String(Utf8String),

    /// An OBJECT IDENTIFIER.
    ObjectIdentifier(ObjectIdentifier),

    /// A SEQUENCE with declared fields.
    Sequence(Sequence),

    /// A SEQUENCE OF.
    SequenceOf(SequenceOf),

    /// A value of unknown type.
    Any(Any),
}

macro_rules! each_variant {
    ( $value:expr, $inner:ident => $op:expr ) => {
        match $value {
            Value::Integer($inner) => $op,
            Value::BitString($inner) => $op,
            Value::OctetString($inner) => $op,
            Value::Utf8String($inner) => $op,
            Value::ObjectIdentifier($inner) => $op,
            Value::Sequence($inner) => $op,
            Value::SequenceOf($inner) => $op,
            Value::Any($inner) => $op,
        }
    }
}

impl Value {
    /// Loads a value of the given type from its complete encoding.
    pub fn load(spec: Spec, data: &[u8]) -> Result<Self, Error> {
        spec.load(data)
    }

    /// Creates a value of the given type from a native value.
    pub fn from_native(
        spec: Spec, native: impl Into<Native>
    ) -> Result<Self, Error> {
        spec.wrap(native.into())
    }

    /// Returns the type of the value.
    pub fn spec(&self) -> Spec {
        match *self {
            Value::Integer(_) => Spec::Integer,
            Value::BitString(ref value) => match value.names() {
                Some(names) => Spec::NamedBitString(names),
                None => Spec::BitString,
            }
            Value::OctetString(_) => Spec::OctetString,
            Value::Utf8String(_) => Spec::Utf8String,
            Value::ObjectIdentifier(_) => Spec::Oid,
            Value::Sequence(ref value) => Spec::Sequence(value.spec()),
            Value::SequenceOf(ref value) => {
                Spec::SequenceOf(value.child_spec())
            }
            Value::Any(_) => Spec::Any,
        }
    }

    /// Returns the integer if this is an INTEGER.
    pub fn as_integer(&self) -> Option<&Integer> {
        match *self {
            Value::Integer(ref value) => Some(value),
            _ => None
        }
    }

    /// Returns the integer mutably if this is an INTEGER.
    pub fn as_integer_mut(&mut self) -> Option<&mut Integer> {
        match *self {
            Value::Integer(ref mut value) => Some(value),
            _ => None
        }
    }

    /// Returns the bit string if this is a BIT STRING.
    pub fn as_bit_string(&self) -> Option<&BitString> {
        match *self {
            Value::BitString(ref value) => Some(value),
            _ => None
        }
    }

    /// Returns the bit string mutably if this is a BIT STRING.
    pub fn as_bit_string_mut(&mut self) -> Option<&mut BitString> {
        match *self {
            Value::BitString(ref mut value) => Some(value),
            _ => None
        }
    }

    /// Returns the octet string if this is an OCTET STRING.
    pub fn as_octet_string(&self) -> Option<&OctetString> {
        match *self {
            Value::OctetString(ref value) => Some(value),
            _ => None
        }
    }

    /// Returns the string if this is a UTF8String.
    pub fn as_utf8_string(&self) -> Option<&Utf8String> {
        match *self {
            Value::Utf8String(ref value) => Some(value),
            _ => None
        }
    }

    /// Returns the object identifier if this is one.
    pub fn as_oid(&self) -> Option<&ObjectIdentifier> {
        match *self {
            Value::ObjectIdentifier(ref value) => Some(value),
            _ => None
        }
    }

    /// Returns the sequence if this is a SEQUENCE with declared fields.
    pub fn as_sequence(&self) -> Option<&Sequence> {
        match *self {
            Value::Sequence(ref value) => Some(value),
            _ => None
        }
    }

    /// Returns the sequence mutably if this is a SEQUENCE.
    pub fn as_sequence_mut(&mut self) -> Option<&mut Sequence> {
        match *self {
            Value::Sequence(ref mut value) => Some(value),
            _ => None
        }
    }

    /// Returns the sequence if this is a SEQUENCE OF.
    pub fn as_sequence_of(&self) -> Option<&SequenceOf> {
        match *self {
            Value::SequenceOf(ref value) => Some(value),
            _ => None
        }
    }

    /// Returns the sequence mutably if this is a SEQUENCE OF.
    pub fn as_sequence_of_mut(&mut self) -> Option<&mut SequenceOf> {
        match *self {
            Value::SequenceOf(ref mut value) => Some(value),
            _ => None
        }
    }

    /// Returns the captured value if this is of unknown type.
    pub fn as_any(&self) -> Option<&Any> {
        match *self {
            Value::Any(ref value) => Some(value),
            _ => None
        }
    }
}

impl Asn1Value for Value {
    fn tagging(&self) -> &Tagging {
        each_variant!(self, inner => inner.tagging())
    }

    fn tagging_mut(&mut self) -> &mut Tagging {
        each_variant!(self, inner => inner.tagging_mut())
    }

    fn contents(&self) -> Result<Bytes, Error> {
        each_variant!(self, inner => inner.contents())
    }

    fn to_native(&self) -> Result<Native, Error> {
        each_variant!(self, inner => inner.to_native())
    }

    fn state(&self) -> State {
        each_variant!(self, inner => inner.state())
    }

    fn refresh(&mut self) -> Result<(), Error> {
        each_variant!(self, inner => inner.refresh())
    }
}

macro_rules! value_from {
    ( $( $type:ident, )* ) => {
        $(
            impl From<$type> for Value {
                fn from(src: $type) -> Self {
                    Value::$type(src)
                }
            }
        )*
    }
}

value_from! {
    Integer, BitString, OctetString, Utf8String, ObjectIdentifier,
    Sequence, SequenceOf, Any,
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ErrorKind;

    static INTS: Spec = Spec::SequenceOf(&Spec::Integer);

    #[test]
    fn load_dispatch() {
        let value = Spec::Integer.load(b"\x02\x01\x05").unwrap();
        assert_eq!(value.spec(), Spec::Integer);
        assert_eq!(value.state(), State::RawOnly);
        assert_eq!(value.to_native().unwrap(), Native::from(5));
        assert_eq!(value.dump().unwrap().as_ref(), b"\x02\x01\x05");

        let value = Spec::Any.load(b"\x04\x01\x05").unwrap();
        assert_eq!(value.spec(), Spec::Any);

        assert_eq!(
            Spec::Integer.load(b"\x04\x01\x05").unwrap_err().kind(),
            ErrorKind::Parse
        );
        assert_eq!(
            Spec::Integer.load(b"\x02\x01\x05\x00").unwrap_err().kind(),
            ErrorKind::Parse
        );
    }

    #[test]
    fn wrap() {
        let value = Value::from_native(Spec::Oid, "1.2.3").unwrap();
        assert_eq!(value.dump().unwrap().as_ref(), b"\x06\x02\x2a\x03");
        assert_eq!(
            Value::from_native(Spec::Integer, "1.2.3").unwrap_err().kind(),
            ErrorKind::Type
        );
        assert_eq!(
            Value::from_native(Spec::Any, 5).unwrap_err().kind(),
            ErrorKind::Type
        );
        let value = Value::from_native(
            Spec::Any, Native::Any(Bytes::from_static(b"\x05\x00"))
        ).unwrap();
        assert_eq!(value.dump().unwrap().as_ref(), b"\x05\x00");
    }

    #[test]
    fn spec_eq() {
        assert_eq!(INTS, Spec::SequenceOf(&Spec::Integer));
        assert_ne!(INTS, Spec::SequenceOf(&Spec::OctetString));
        assert_ne!(Spec::Integer, Spec::Any);
    }

    #[test]
    fn retag_untag() {
        let value = Value::from_native(Spec::Integer, 5).unwrap();
        let tagged = value.retag(TagKind::Explicit, Tag::ctx(0));
        assert_eq!(
            tagged.dump().unwrap().as_ref(), b"\xa0\x03\x02\x01\x05"
        );
        assert!(tagged.content_eq(&value));
        assert_eq!(tagged.untag().dump().unwrap(), value.dump().unwrap());
        assert_eq!(value.untag().dump().unwrap(), value.dump().unwrap());
        assert_eq!(value.dump().unwrap().as_ref(), b"\x02\x01\x05");
    }
}
