//! Sequences with declared fields.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::borrow::Cow;
use bytes::{BufMut, Bytes, BytesMut};
use log::{debug, trace};
use num_bigint::BigInt;
use crate::cache::{Cache, State};
use crate::error::Error;
use crate::header::take_value;
use crate::oid::Oid;
use crate::tag::Tag;
use crate::tagging::{TagKind, Tagging};
use crate::value::{Asn1Value, Native, Spec, Value};


//------------ Field ---------------------------------------------------------

/// The declaration of a field of a sequence.
///
/// Fields are created with [`Field::new`] and then refined through the
/// other const functions:
///
/// ```
/// use dervalue::{Field, Native, Spec, Tag};
///
/// fn v1() -> Native { Native::from(0) }
///
/// static FIELDS: [Field; 2] = [
///     Field::new("version", Spec::Integer)
///         .explicit(Tag::ctx(0)).with_default(v1),
///     Field::new("comment", Spec::Utf8String).optional(),
/// ];
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Field {
    name: &'static str,
    spec: Spec,
    tagging: Option<(TagKind, Tag)>,
    optional: bool,
    default: Option<fn() -> Native>,
}

impl Field {
    /// Creates a required, untagged field.
    pub const fn new(name: &'static str, spec: Spec) -> Self {
        Field { name, spec, tagging: None, optional: false, default: None }
    }

    /// Makes the field optional.
    pub const fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Applies an implicit tag to the field.
    pub const fn implicit(mut self, tag: Tag) -> Self {
        self.tagging = Some((TagKind::Implicit, tag));
        self
    }

    /// Applies an explicit tag to the field.
    pub const fn explicit(mut self, tag: Tag) -> Self {
        self.tagging = Some((TagKind::Explicit, tag));
        self
    }

    /// Gives the field a default value.
    ///
    /// A field with a default value may be absent. Reading it then returns
    /// the default. If the field’s value equals the default, it is left
    /// out of the encoding.
    pub const fn with_default(mut self, default: fn() -> Native) -> Self {
        self.default = Some(default);
        self
    }

    /// Returns the name of the field.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the declared type of the field.
    pub fn spec(&self) -> Spec {
        self.spec
    }

    /// Returns the default value of the field if it has one.
    pub fn default_value(&self) -> Option<Native> {
        self.default.map(|default| default())
    }

    /// Returns whether the field may be missing.
    pub fn may_be_absent(&self) -> bool {
        self.optional || self.default.is_some()
    }

    fn layers(&self) -> &[(TagKind, Tag)] {
        self.tagging.as_slice()
    }

    /// Returns the outermost tag of the field if it is fixed.
    fn outer_tag(&self) -> Option<Tag> {
        match self.tagging {
            Some((_, tag)) => Some(tag),
            None => self.spec.tag(),
        }
    }

    /// Creates a value for this field from a native value.
    fn wrap(&self, spec: Spec, native: Native) -> Result<Value, Error> {
        let mut value = spec.wrap(native)?;
        for &(kind, tag) in self.layers() {
            value.tagging_mut().push(kind, tag)
        }
        Ok(value)
    }
}


//------------ Discriminant --------------------------------------------------

/// A value of the field that selects the type of an open type field.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Discriminant {
    /// An object identifier in dotted notation.
    Oid(&'static str),

    /// An integer.
    Integer(i64),
}

impl Discriminant {
    /// Returns whether the native value of a field matches.
    pub fn matches(&self, native: &Native) -> bool {
        match (*self, native) {
            (Discriminant::Oid(oid), Native::Oid(value)) => {
                oid.parse::<Oid>().is_ok_and(|oid| oid == *value)
            }
            (Discriminant::Integer(int), Native::Integer(value)) => {
                BigInt::from(int) == *value
            }
            _ => false
        }
    }
}


//------------ OpenType ------------------------------------------------------

/// The declaration of an open type in a sequence.
///
/// The type of the `dependent` field is determined by the value of the
/// `discriminant` field. It is looked up in `types` every time the field is
/// accessed, so changing the discriminant changes how the dependent field
/// is interpreted.
#[derive(Clone, Copy, Debug)]
pub struct OpenType {
    /// The name of the field whose value selects the type.
    pub discriminant: &'static str,

    /// The name of the field whose type is selected.
    pub dependent: &'static str,

    /// The types for the known discriminant values.
    pub types: &'static [(Discriminant, Spec)],

    /// The type to use for unknown discriminant values.
    ///
    /// If this is `None`, unknown values are an error.
    pub fallback: Option<Spec>,
}

impl OpenType {
    /// Returns the type selected by a discriminant value.
    pub fn resolve(&self, discriminant: &Native) -> Result<Spec, Error> {
        if let Some(&(_, spec)) = self.types.iter().find(|(item, _)| {
            item.matches(discriminant)
        }) {
            return Ok(spec)
        }
        match self.fallback {
            Some(spec) => {
                debug!(
                    "no type for discriminant {}, using {}",
                    discriminant, spec
                );
                Ok(spec)
            }
            None => {
                xerr!(Err(Error::UnknownOpenType(discriminant.to_string())))
            }
        }
    }
}


//------------ SequenceSpec --------------------------------------------------

/// The declaration of a sequence type.
///
/// Sequence types are declared statically:
///
/// ```
/// use dervalue::{Discriminant, Field, OpenType, SequenceSpec, Spec};
///
/// static ALGORITHM: SequenceSpec = SequenceSpec {
///     name: "AlgorithmIdentifier",
///     fields: &[
///         Field::new("algorithm", Spec::Oid),
///         Field::new("parameters", Spec::Any).optional(),
///     ],
///     open_type: Some(OpenType {
///         discriminant: "algorithm",
///         dependent: "parameters",
///         types: &[
///             (Discriminant::Oid("1.2.840.113549.1.1.1"), Spec::Any),
///         ],
///         fallback: Some(Spec::Any),
///     }),
/// };
/// ```
#[derive(Debug)]
pub struct SequenceSpec {
    /// The name of the type.
    pub name: &'static str,

    /// The fields in the order they are encoded.
    pub fields: &'static [Field],

    /// An open type among the fields.
    pub open_type: Option<OpenType>,
}

impl SequenceSpec {
    /// Returns the field with the given name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    fn index(&self, name: &str) -> Result<usize, Error> {
        match self.fields.iter().position(|field| field.name == name) {
            Some(idx) => Ok(idx),
            None => {
                xerr!(Err(Error::type_err(format!(
                    "{} has no field '{}'", self.name, name
                ))))
            }
        }
    }

    fn is_dependent(&self, field: &Field) -> bool {
        self.open_type.is_some_and(|open| open.dependent == field.name)
    }
}


//------------ Sequence ------------------------------------------------------

/// A sequence value with declared fields.
///
/// The fields of a loaded sequence are only parsed when one of them is
/// first accessed. Accessing a field mutably drops the content octets of
/// the sequence, so they will be encoded anew from the fields the next
/// time they are needed.
#[derive(Clone, Debug)]
pub struct Sequence {
    spec: &'static SequenceSpec,
    tagging: Tagging,
    cache: Cache<Vec<Option<Value>>>,
}

impl Sequence {
    /// Creates a new sequence with all fields absent.
    pub fn new(spec: &'static SequenceSpec) -> Self {
        Sequence {
            spec,
            tagging: Tagging::new(Tag::SEQUENCE, true),
            cache: Cache::from_native(vec![None; spec.fields.len()]),
        }
    }

    /// Creates a sequence from the native values of its fields.
    ///
    /// The fields are set in declaration order, so the discriminant of an
    /// open type is known before the dependent field is set.
    pub fn from_native(
        spec: &'static SequenceSpec, fields: Vec<(&'static str, Native)>
    ) -> Result<Self, Error> {
        let mut fields = fields;
        let mut res = Self::new(spec);
        for field in spec.fields {
            if let Some(pos) = fields.iter().position(|item| {
                item.0 == field.name
            }) {
                let (name, native) = fields.remove(pos);
                res.set(name, native)?;
            }
        }
        if let Some((name, _)) = fields.first() {
            xerr!(return Err(Error::type_err(format!(
                "unexpected field '{}' for {}", name, spec.name
            ))))
        }
        Ok(res)
    }

    /// Loads a sequence from its complete encoding.
    pub fn load(
        spec: &'static SequenceSpec, data: &[u8]
    ) -> Result<Self, Error> {
        let tagging = Tagging::new(Tag::SEQUENCE, true);
        let (_, contents) = tagging.strip(
            &Bytes::copy_from_slice(data), true
        )?;
        Ok(Self::from_parts(spec, tagging, contents))
    }

    pub(crate) fn from_parts(
        spec: &'static SequenceSpec, tagging: Tagging, contents: Bytes
    ) -> Self {
        Sequence { spec, tagging, cache: Cache::from_contents(contents) }
    }

    /// Returns the declaration of the sequence type.
    pub fn spec(&self) -> &'static SequenceSpec {
        self.spec
    }

    /// Returns the current type of the named field.
    ///
    /// For the dependent field of an open type, this is the type selected
    /// by the current value of the discriminant or the declared type if
    /// the discriminant is absent.
    pub fn field_spec(&self, name: &str) -> Result<Spec, Error> {
        self.resolved_spec(self.spec.index(name)?)
    }

    /// Returns the value of the named field.
    ///
    /// Returns the default value if the field is absent but has one and
    /// `None` if it is absent otherwise. The dependent field of an open
    /// type is returned as the type currently selected by its
    /// discriminant.
    pub fn get(&self, name: &str) -> Result<Option<Cow<'_, Value>>, Error> {
        self.get_index(self.spec.index(name)?)
    }

    /// Returns a mutable reference to the value of the named field.
    ///
    /// Returns `None` if the field is absent, even if it has a default
    /// value. Use [`set`][Self::set] to add it.
    pub fn get_mut(
        &mut self, name: &str
    ) -> Result<Option<&mut Value>, Error> {
        let spec = self.spec;
        let idx = spec.index(name)?;
        let field = &spec.fields[idx];
        let resolved = self.resolved_spec(idx)?;
        let children = self.children_mut()?;
        if spec.is_dependent(field) && !resolved.is_any() {
            let parsed = match children[idx] {
                Some(Value::Any(ref any)) => {
                    Some(any.parse_with(resolved, field.layers())?)
                }
                _ => None
            };
            if parsed.is_some() {
                children[idx] = parsed;
            }
        }
        Ok(children[idx].as_mut())
    }

    /// Sets the named field from a native value.
    pub fn set(
        &mut self, name: &str, native: impl Into<Native>
    ) -> Result<(), Error> {
        let spec = self.spec;
        let idx = spec.index(name)?;
        let field = &spec.fields[idx];
        let value = field.wrap(self.resolved_spec(idx)?, native.into())?;
        self.children_mut()?[idx] = Some(value);
        Ok(())
    }

    /// Sets the named field to a value.
    ///
    /// The value must be of the field’s current type unless that is
    /// [`Spec::Any`]. If the value isn’t tagged, the field’s tagging is
    /// applied to it.
    pub fn set_value(
        &mut self, name: &str, value: impl Into<Value>
    ) -> Result<(), Error> {
        let declared = self.spec;
        let idx = declared.index(name)?;
        let field = &declared.fields[idx];
        let spec = self.resolved_spec(idx)?;
        let mut value = value.into();
        if !spec.is_any() && value.spec() != spec {
            xerr!(return Err(Error::type_err(format!(
                "field '{}' expects {} but got {}",
                field.name, spec, value.spec()
            ))))
        }
        if !value.tagging().is_tagged() {
            for &(kind, tag) in field.layers() {
                value.tagging_mut().push(kind, tag)
            }
        }
        self.children_mut()?[idx] = Some(value);
        Ok(())
    }

    /// Removes the value of the named field.
    pub fn remove(&mut self, name: &str) -> Result<Option<Value>, Error> {
        let idx = self.spec.index(name)?;
        Ok(self.children_mut()?[idx].take())
    }

    fn get_index(&self, idx: usize) -> Result<Option<Cow<'_, Value>>, Error> {
        let field = &self.spec.fields[idx];
        let value = match self.children()?[idx] {
            Some(ref value) => value,
            None => {
                return match field.default {
                    Some(default) => {
                        field.wrap(field.spec, default()).map(|value| {
                            Some(Cow::Owned(value))
                        })
                    }
                    None => Ok(None)
                }
            }
        };
        if let Value::Any(ref any) = *value {
            if self.spec.is_dependent(field) {
                let spec = self.resolved_spec(idx)?;
                if !spec.is_any() {
                    return any.parse_with(spec, field.layers()).map(|value| {
                        Some(Cow::Owned(value))
                    })
                }
            }
        }
        Ok(Some(Cow::Borrowed(value)))
    }

    fn resolved_spec(&self, idx: usize) -> Result<Spec, Error> {
        let field = &self.spec.fields[idx];
        let open = match self.spec.open_type {
            Some(open) if open.dependent == field.name => open,
            _ => return Ok(field.spec)
        };
        if open.discriminant == open.dependent {
            xerr!(return Err(Error::type_err(format!(
                "open type field '{}' of {} selects its own type",
                field.name, self.spec.name
            ))))
        }
        match self.get_index(self.spec.index(open.discriminant)?)? {
            Some(discriminant) => open.resolve(&discriminant.to_native()?),
            None => Ok(field.spec)
        }
    }

    fn children(&self) -> Result<&Vec<Option<Value>>, Error> {
        let spec = self.spec;
        self.cache.native(|contents| decode_fields(spec, contents))
    }

    fn children_mut(&mut self) -> Result<&mut Vec<Option<Value>>, Error> {
        let spec = self.spec;
        self.cache.native_mut(|contents| decode_fields(spec, contents))
    }
}

impl Asn1Value for Sequence {
    fn tagging(&self) -> &Tagging {
        &self.tagging
    }

    fn tagging_mut(&mut self) -> &mut Tagging {
        &mut self.tagging
    }

    fn contents(&self) -> Result<Bytes, Error> {
        let spec = self.spec;
        self.cache.contents(|children| encode_fields(spec, children))
    }

    fn to_native(&self) -> Result<Native, Error> {
        let mut res = Vec::new();
        for (idx, field) in self.spec.fields.iter().enumerate() {
            if let Some(value) = self.get_index(idx)? {
                res.push((field.name, value.to_native()?))
            }
        }
        Ok(Native::Fields(res))
    }

    fn state(&self) -> State {
        self.cache.state()
    }

    fn refresh(&mut self) -> Result<(), Error> {
        let spec = self.spec;
        for child in self.children_mut()?.iter_mut().flatten() {
            child.refresh()?;
        }
        self.cache.refresh(
            |contents| decode_fields(spec, contents),
            |children| encode_fields(spec, children),
        )
    }
}


//------------ Encoding and Decoding -----------------------------------------

/// Parses the content of a sequence into its fields.
///
/// Elements are assigned to fields in declaration order. If an element’s
/// tag doesn’t match a field that may be absent, the field is skipped.
fn decode_fields(
    spec: &'static SequenceSpec, contents: &Bytes
) -> Result<Vec<Option<Value>>, Error> {
    trace!("decoding fields of {}", spec.name);
    let mut res = vec![None; spec.fields.len()];
    let mut fields = spec.fields.iter().enumerate();
    let mut pos = 0;
    while pos < contents.len() {
        let (header, range) = take_value(contents, pos)?;
        let (idx, field) = loop {
            let (idx, field) = match fields.next() {
                Some(item) => item,
                None => {
                    xerr!(return Err(Error::parse(format!(
                        "trailing element in {}", spec.name
                    ))))
                }
            };
            if field.outer_tag().map_or(true, |tag| tag == header.tag()) {
                break (idx, field)
            }
            if !field.may_be_absent() {
                xerr!(return Err(Error::parse(format!(
                    "unexpected tag {} for field '{}' of {}",
                    header.tag(), field.name, spec.name
                ))))
            }
        };
        pos = range.end;
        res[idx] = Some(
            field.spec.load_tagged(field.layers(), contents.slice(range))?
        );
    }
    for (_, field) in fields {
        if !field.may_be_absent() {
            xerr!(return Err(Error::parse(format!(
                "missing field '{}' in {}", field.name, spec.name
            ))))
        }
    }
    Ok(res)
}

/// Encodes the fields of a sequence.
///
/// Fields equal to their default value are left out.
fn encode_fields(
    spec: &'static SequenceSpec, children: &[Option<Value>]
) -> Result<Bytes, Error> {
    let mut res = BytesMut::new();
    for (field, child) in spec.fields.iter().zip(children) {
        match *child {
            Some(ref value) => {
                if let Some(default) = field.default {
                    if value.to_native().is_ok_and(|native| {
                        native == default()
                    }) {
                        continue
                    }
                }
                res.put_slice(&value.dump()?)
            }
            None => {
                if !field.may_be_absent() {
                    xerr!(return Err(Error::MissingField(field.name)))
                }
            }
        }
    }
    Ok(res.freeze())
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ErrorKind;

    static SEQ: SequenceSpec = SequenceSpec {
        name: "Seq",
        fields: &[
            Field::new("id", Spec::Oid),
            Field::new("value", Spec::Any),
        ],
        open_type: Some(OpenType {
            discriminant: "id",
            dependent: "value",
            types: &[
                (Discriminant::Oid("1.2.3"), Spec::Integer),
                (Discriminant::Oid("2.3.4"), Spec::OctetString),
            ],
            fallback: None,
        }),
    };

    static LENIENT: SequenceSpec = SequenceSpec {
        name: "Lenient",
        fields: &[
            Field::new("kind", Spec::Integer),
            Field::new("value", Spec::Any),
        ],
        open_type: Some(OpenType {
            discriminant: "kind",
            dependent: "value",
            types: &[(Discriminant::Integer(1), Spec::Utf8String)],
            fallback: Some(Spec::Any),
        }),
    };

    fn zero() -> Native {
        Native::from(0)
    }

    static TAGGED: SequenceSpec = SequenceSpec {
        name: "Tagged",
        fields: &[
            Field::new("version", Spec::Integer)
                .explicit(Tag::ctx(0)).with_default(zero),
            Field::new("name", Spec::Utf8String)
                .implicit(Tag::ctx(1)).optional(),
            Field::new("count", Spec::Integer),
        ],
        open_type: None,
    };

    #[test]
    fn open_type_resolution() {
        let mut seq = Sequence::new(&SEQ);
        assert_eq!(seq.field_spec("value").unwrap(), Spec::Any);
        seq.set("id", "1.2.3").unwrap();
        assert_eq!(seq.field_spec("value").unwrap(), Spec::Integer);
        seq.set("id", "2.3.4").unwrap();
        assert_eq!(seq.field_spec("value").unwrap(), Spec::OctetString);
        seq.set("id", "1.2.4").unwrap();
        assert_eq!(
            seq.field_spec("value").unwrap_err().kind(),
            ErrorKind::UnknownOpenType
        );
    }

    #[test]
    fn load_open_type() {
        let data = b"\x30\x07\x06\x02\x2a\x03\x02\x01\x05";
        let seq = Sequence::load(&SEQ, data).unwrap();
        let value = seq.get("value").unwrap().unwrap();
        assert_eq!(value.spec(), Spec::Integer);
        assert_eq!(value.to_native().unwrap(), Native::from(5));
        assert_eq!(seq.dump().unwrap().as_ref(), data);

        let seq = Sequence::load(
            &SEQ, b"\x30\x07\x06\x02\x2a\x04\x02\x01\x05"
        ).unwrap();
        assert_eq!(
            seq.get("value").unwrap_err().kind(),
            ErrorKind::UnknownOpenType
        );

        let seq = Sequence::load(
            &LENIENT, b"\x30\x06\x02\x01\x01\x0c\x01x"
        ).unwrap();
        assert_eq!(
            seq.get("value").unwrap().unwrap().to_native().unwrap(),
            Native::from("x")
        );
        let seq = Sequence::load(
            &LENIENT, b"\x30\x05\x02\x01\x02\x05\x00"
        ).unwrap();
        assert_eq!(seq.get("value").unwrap().unwrap().spec(), Spec::Any);
    }

    #[test]
    fn get_mut_resolves() {
        let data = b"\x30\x07\x06\x02\x2a\x03\x02\x01\x05";
        let mut seq = Sequence::load(&SEQ, data).unwrap();
        let value = seq.get_mut("value").unwrap().unwrap();
        value.as_integer_mut().unwrap().set(6);
        assert_eq!(seq.state(), State::NativeOnly);
        assert_eq!(
            seq.dump().unwrap().as_ref(),
            b"\x30\x07\x06\x02\x2a\x03\x02\x01\x06"
        );
    }

    #[test]
    fn defaults_and_tags() {
        let mut seq = Sequence::new(&TAGGED);
        assert_eq!(
            seq.dump().unwrap_err(), Error::MissingField("count")
        );
        seq.set("count", 5).unwrap();
        assert_eq!(seq.dump().unwrap().as_ref(), b"\x30\x03\x02\x01\x05");
        assert_eq!(
            seq.get("version").unwrap().unwrap().to_native().unwrap(),
            Native::from(0)
        );
        seq.set("version", 0).unwrap();
        assert_eq!(seq.dump().unwrap().as_ref(), b"\x30\x03\x02\x01\x05");

        seq.set("version", 2).unwrap();
        seq.set("name", "x").unwrap();
        let data = seq.dump().unwrap();
        assert_eq!(
            data.as_ref(),
            b"\x30\x0b\xa0\x03\x02\x01\x02\x81\x01x\x02\x01\x05"
        );

        let seq = Sequence::load(&TAGGED, &data).unwrap();
        assert_eq!(
            seq.to_native().unwrap(),
            Native::Fields(vec![
                ("version", Native::from(2)),
                ("name", Native::from("x")),
                ("count", Native::from(5)),
            ])
        );

        let seq = Sequence::load(&TAGGED, b"\x30\x03\x02\x01\x05").unwrap();
        assert!(seq.get("name").unwrap().is_none());
        assert_eq!(
            seq.get("version").unwrap().unwrap().to_native().unwrap(),
            Native::from(0)
        );
    }

    #[test]
    fn parse_failures() {
        assert_eq!(
            Sequence::load(&TAGGED, b"\x30\x00").unwrap()
                .get("count").unwrap_err().kind(),
            ErrorKind::Parse
        );
        assert!(
            Sequence::load(&TAGGED, b"\x30\x06\x02\x01\x05\x02\x01\x06")
                .unwrap().to_native().is_err()
        );
        assert!(
            Sequence::load(&TAGGED, b"\x30\x03\x04\x01\x05")
                .unwrap().to_native().is_err()
        );
        assert!(Sequence::load(&TAGGED, b"\x31\x00").is_err());
    }

    #[test]
    fn from_native() {
        let seq = Sequence::from_native(&SEQ, vec![
            ("value", Native::from(5)),
            ("id", Native::from("1.2.3")),
        ]).unwrap();
        assert_eq!(
            seq.dump().unwrap().as_ref(),
            b"\x30\x07\x06\x02\x2a\x03\x02\x01\x05"
        );
        assert_eq!(
            Sequence::from_native(&SEQ, vec![("nope", Native::from(5))])
                .unwrap_err().kind(),
            ErrorKind::Type
        );
        assert_eq!(
            Sequence::from_native(&SEQ, vec![
                ("id", Native::from("1.2.3")),
                ("value", Native::from("five")),
            ]).unwrap_err().kind(),
            ErrorKind::Type
        );
    }

    #[test]
    fn set_value_checks_type() {
        let mut seq = Sequence::new(&TAGGED);
        assert_eq!(
            seq.set_value(
                "count", crate::string::Utf8String::new("x")
            ).unwrap_err().kind(),
            ErrorKind::Type
        );
        seq.set_value("version", crate::int::Integer::new(3)).unwrap();
        seq.set("count", 1).unwrap();
        assert_eq!(
            seq.dump().unwrap().as_ref(),
            b"\x30\x08\xa0\x03\x02\x01\x03\x02\x01\x01"
        );
        assert!(seq.remove("version").unwrap().is_some());
        assert_eq!(seq.dump().unwrap().as_ref(), b"\x30\x03\x02\x01\x01");
    }

    static SELF_SELECTING: SequenceSpec = SequenceSpec {
        name: "SelfSelecting",
        fields: &[Field::new("value", Spec::Any)],
        open_type: Some(OpenType {
            discriminant: "value",
            dependent: "value",
            types: &[(Discriminant::Integer(5), Spec::Integer)],
            fallback: None,
        }),
    };

    #[test]
    fn self_selecting_open_type() {
        let data = b"\x30\x03\x02\x01\x05";
        let mut seq = Sequence::load(&SELF_SELECTING, data).unwrap();
        assert_eq!(seq.get("value").unwrap_err().kind(), ErrorKind::Type);
        assert_eq!(
            seq.field_spec("value").unwrap_err().kind(), ErrorKind::Type
        );
        assert_eq!(seq.dump().unwrap().as_ref(), data);
        assert_eq!(seq.set("value", 5).unwrap_err().kind(), ErrorKind::Type);
        assert_eq!(seq.get_mut("value").unwrap_err().kind(), ErrorKind::Type);
    }
}
