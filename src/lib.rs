//! A value model for data encoded in the Distinguished Encoding Rules.
//!
//! This crate represents ASN.1 values encoded in DER as typed values that
//! keep both their encoded content and their native value. Values loaded
//! from encoded data are only decoded when their native value is first
//! needed. Values created from native values are only encoded when their
//! encoding is first needed. Unchanged loaded values re-encode to exactly
//! the data they were loaded from.
//!
//! The supported types are [`Integer`], [`BitString`] (optionally with
//! named bits), [`OctetString`], [`Utf8String`], [`ObjectIdentifier`],
//! [`Sequence`] with declared fields, [`SequenceOf`], and [`Any`] for
//! values of unknown type. All of them implement the [`Asn1Value`] trait
//! and can be wrapped into the [`Value`] enum.
//!
//! Types are described by a [`Spec`]. Sequence types are declared through
//! static [`SequenceSpec`]s which may contain an [`OpenType`], a field
//! whose type is selected by the value of another field:
//!
//! ```
//! use dervalue::{
//!     Asn1Value, Discriminant, Field, Native, OpenType, Sequence,
//!     SequenceSpec, Spec,
//! };
//!
//! static ATTRIBUTE: SequenceSpec = SequenceSpec {
//!     name: "Attribute",
//!     fields: &[
//!         Field::new("type", Spec::Oid),
//!         Field::new("value", Spec::Any),
//!     ],
//!     open_type: Some(OpenType {
//!         discriminant: "type",
//!         dependent: "value",
//!         types: &[(Discriminant::Oid("1.2.3"), Spec::Integer)],
//!         fallback: None,
//!     }),
//! };
//!
//! let attr = Sequence::load(
//!     &ATTRIBUTE, b"\x30\x07\x06\x02\x2a\x03\x02\x01\x05"
//! ).unwrap();
//! let value = attr.get("value").unwrap().unwrap();
//! assert_eq!(value.to_native().unwrap(), Native::from(5));
//! ```

//--- Re-exports

pub use self::any::Any;
pub use self::cache::State;
pub use self::error::{Error, ErrorKind};
pub use self::int::Integer;
pub use self::oid::{ObjectIdentifier, Oid};
pub use self::sequence::{
    Discriminant, Field, OpenType, Sequence, SequenceSpec
};
pub use self::sequence_of::SequenceOf;
pub use self::string::{Bit, BitNames, BitString, OctetString, Utf8String};
pub use self::tag::{Class, Ident, Tag};
pub use self::tagging::{TagKind, Tagging};
pub use self::value::{Asn1Value, Native, Spec, Value};


//--- Public modules

#[macro_use] pub mod debug;
#[macro_use] mod value;

pub mod header;
pub mod string;


//--- Private modules

mod any;
mod cache;
mod error;
mod int;
mod length;
mod oid;
mod sequence;
mod sequence_of;
mod tag;
mod tagging;
