//! ASN.1 Object Identifiers.
//!
//! This module contains the [`Oid`] type that holds the arcs of an object
//! identifier and the [`ObjectIdentifier`] value type for encoding it. Both
//! are re-exported at the top-level.

use std::fmt;
use std::str::FromStr;
use bytes::Bytes;
use smallvec::SmallVec;
use crate::cache::Cache;
use crate::error::Error;
use crate::tag::Tag;
use crate::tagging::Tagging;
use crate::value::Native;


//------------ Oid -----------------------------------------------------------

/// An object identifer.
///
/// Object identifiers are globally unique, hierarchical values that are used
/// to identify objects or their type. When written, they are presented as a
/// sequence of integers separated by dots such as ‘1.3.6.1.5.5.7.1’. These
/// integers are called arcs.
///
/// Since the first two arcs are combined into a single sub-identifier when
/// encoding, there must be at least two arcs, the first one must be 0, 1,
/// or 2, and the second one must be less than 40 unless the first one is 2.
/// Values of this type always fulfil these conditions.
#[derive(Clone, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Oid {
    arcs: SmallVec<[u64; 10]>,
}

impl Oid {
    /// Creates a new object identifier from its arcs.
    pub fn new(arcs: &[u64]) -> Result<Self, Error> {
        match *arcs {
            [first, second, ..] => {
                if first > 2 {
                    xerr!(return Err(Error::encoding(
                        "first arc of object identifier must be 0, 1, or 2"
                    )))
                }
                if first < 2 && second >= 40 {
                    xerr!(return Err(Error::encoding(
                        "second arc of object identifier must be less than 40"
                    )))
                }
                if second.checked_add(first * 40).is_none() {
                    xerr!(return Err(Error::encoding(
                        "second arc of object identifier too large"
                    )))
                }
            }
            _ => {
                xerr!(return Err(Error::encoding(
                    "object identifier needs at least two arcs"
                )))
            }
        }
        Ok(Oid { arcs: arcs.into() })
    }

    /// Returns the arcs of the object identifier.
    pub fn arcs(&self) -> &[u64] {
        &self.arcs
    }

    /// Returns the content octets of the object identifier.
    pub fn to_content(&self) -> Bytes {
        let mut res = Vec::new();
        push_subidentifier(&mut res, self.arcs[0] * 40 + self.arcs[1]);
        for arc in &self.arcs[2..] {
            push_subidentifier(&mut res, *arc);
        }
        res.into()
    }

    /// Decodes the content octets of an object identifier.
    pub fn from_content(content: &[u8]) -> Result<Self, Error> {
        if content.is_empty() {
            xerr!(return Err(Error::parse("empty object identifier")))
        }
        let mut arcs = SmallVec::new();
        let mut value = 0u64;
        let mut in_subidentifier = false;
        for &octet in content {
            if !in_subidentifier && octet == 0x80 {
                xerr!(return Err(Error::parse(
                    "non-minimal sub-identifier in object identifier"
                )))
            }
            if value > u64::MAX >> 7 {
                xerr!(return Err(Error::parse(
                    "sub-identifier in object identifier too large"
                )))
            }
            value = (value << 7) | u64::from(octet & 0x7F);
            in_subidentifier = octet & 0x80 != 0;
            if !in_subidentifier {
                if arcs.is_empty() {
                    match value {
                        0..=39 => arcs.extend([0, value]),
                        40..=79 => arcs.extend([1, value - 40]),
                        _ => arcs.extend([2, value - 80]),
                    }
                }
                else {
                    arcs.push(value)
                }
                value = 0;
            }
        }
        if in_subidentifier {
            xerr!(return Err(Error::parse("truncated object identifier")))
        }
        Ok(Oid { arcs })
    }
}

fn push_subidentifier(target: &mut Vec<u8>, value: u64) {
    let mut groups = SmallVec::<[u8; 10]>::new();
    let mut value = value;
    loop {
        groups.push((value & 0x7F) as u8);
        value >>= 7;
        if value == 0 {
            break
        }
    }
    let last = groups.len() - 1;
    for (idx, group) in groups.iter().rev().enumerate() {
        target.push(if idx < last { group | 0x80 } else { *group });
    }
}


//--- FromStr

impl FromStr for Oid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let arcs = s.split('.').map(|arc| {
            u64::from_str(arc).map_err(|_| {
                Error::type_err(format!("invalid object identifier '{}'", s))
            })
        }).collect::<Result<SmallVec<[u64; 10]>, _>>()?;
        Self::new(&arcs)
    }
}


//--- Display and Debug

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut arcs = self.arcs.iter();
        if let Some(first) = arcs.next() {
            write!(f, "{}", first)?;
        }
        for arc in arcs {
            write!(f, ".{}", arc)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Oid({})", self)
    }
}


//------------ ObjectIdentifier ----------------------------------------------

/// An object identifier value.
#[derive(Clone, Debug)]
pub struct ObjectIdentifier {
    tagging: Tagging,
    cache: Cache<Oid>,
}

impl ObjectIdentifier {
    /// Creates a new value from an object identifier.
    pub fn new(oid: Oid) -> Self {
        ObjectIdentifier {
            tagging: Tagging::new(Tag::OID, false),
            cache: Cache::from_native(oid),
        }
    }

    /// Loads a value from its complete encoding.
    pub fn load(data: &[u8]) -> Result<Self, Error> {
        let tagging = Tagging::new(Tag::OID, false);
        let (_, contents) = tagging.strip(
            &Bytes::copy_from_slice(data), true
        )?;
        Ok(Self::from_parts(tagging, contents))
    }

    pub(crate) fn from_parts(tagging: Tagging, contents: Bytes) -> Self {
        ObjectIdentifier { tagging, cache: Cache::from_contents(contents) }
    }

    /// Returns the object identifier.
    pub fn oid(&self) -> Result<&Oid, Error> {
        self.cache.native(|contents| Oid::from_content(contents))
    }

    /// Replaces the object identifier.
    pub fn set(&mut self, oid: Oid) {
        self.cache.set_native(oid)
    }
}

primitive_value!(
    ObjectIdentifier, Oid::from_content, Oid::to_content,
    |this: &ObjectIdentifier| this.oid().map(|oid| Native::Oid(oid.clone()))
);


//============ Tests =========================================================
