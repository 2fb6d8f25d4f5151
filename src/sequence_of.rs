//! Homogeneous sequences.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::slice;
use bytes::{BufMut, Bytes, BytesMut};
use log::trace;
use crate::cache::{Cache, State};
use crate::error::Error;
use crate::header::take_value;
use crate::tag::Tag;
use crate::tagging::Tagging;
use crate::value::{Asn1Value, Native, Spec, Value};


//------------ SequenceOf ----------------------------------------------------

/// A sequence of values of the same type.
///
/// The elements of a loaded sequence are only parsed when first accessed.
/// Any change drops the content octets of the sequence.
///
/// If the element type is [`Spec::Any`], elements can only be added as
/// values since there is no way to tell how a native value should be
/// encoded. Such elements may carry any tagging. Otherwise, elements must
/// be of the element type and untagged.
#[derive(Clone, Debug)]
pub struct SequenceOf {
    child: &'static Spec,
    tagging: Tagging,
    cache: Cache<Vec<Value>>,
}

impl SequenceOf {
    /// Creates a new, empty sequence.
    pub fn new(child: &'static Spec) -> Self {
        SequenceOf {
            child,
            tagging: Tagging::new(Tag::SEQUENCE, true),
            cache: Cache::from_native(Vec::new()),
        }
    }

    /// Creates a sequence from the native values of its elements.
    pub fn from_native(
        child: &'static Spec, items: Vec<Native>
    ) -> Result<Self, Error> {
        let mut res = Self::new(child);
        for item in items {
            res.push(item)?;
        }
        Ok(res)
    }

    /// Loads a sequence from its complete encoding.
    pub fn load(child: &'static Spec, data: &[u8]) -> Result<Self, Error> {
        let tagging = Tagging::new(Tag::SEQUENCE, true);
        let (_, contents) = tagging.strip(
            &Bytes::copy_from_slice(data), true
        )?;
        Ok(Self::from_parts(child, tagging, contents))
    }

    pub(crate) fn from_parts(
        child: &'static Spec, tagging: Tagging, contents: Bytes
    ) -> Self {
        SequenceOf { child, tagging, cache: Cache::from_contents(contents) }
    }

    /// Returns the type of the elements.
    pub fn spec(&self) -> Spec {
        *self.child
    }

    pub(crate) fn child_spec(&self) -> &'static Spec {
        self.child
    }

    /// Returns the number of elements.
    pub fn len(&self) -> Result<usize, Error> {
        Ok(self.children()?.len())
    }

    /// Returns whether there are no elements.
    pub fn is_empty(&self) -> Result<bool, Error> {
        Ok(self.children()?.is_empty())
    }

    /// Returns an iterator over the elements.
    pub fn iter(&self) -> Result<slice::Iter<'_, Value>, Error> {
        Ok(self.children()?.iter())
    }

    /// Returns the element at the given index.
    pub fn get(&self, idx: usize) -> Result<Option<&Value>, Error> {
        Ok(self.children()?.get(idx))
    }

    /// Returns a mutable reference to the element at the given index.
    pub fn get_mut(
        &mut self, idx: usize
    ) -> Result<Option<&mut Value>, Error> {
        Ok(self.children_mut()?.get_mut(idx))
    }

    /// Sets the element at the given index from a native value.
    ///
    /// If the index equals the number of elements, the element is
    /// appended.
    pub fn set(
        &mut self, idx: usize, native: impl Into<Native>
    ) -> Result<(), Error> {
        let value = self.wrap(native.into())?;
        self.store(idx, value)
    }

    /// Sets the element at the given index to a value.
    ///
    /// If the index equals the number of elements, the element is
    /// appended.
    pub fn set_value(
        &mut self, idx: usize, value: impl Into<Value>
    ) -> Result<(), Error> {
        let value = self.check(value.into())?;
        self.store(idx, value)
    }

    /// Appends an element from a native value.
    pub fn push(&mut self, native: impl Into<Native>) -> Result<(), Error> {
        let value = self.wrap(native.into())?;
        self.children_mut()?.push(value);
        Ok(())
    }

    /// Appends a value.
    pub fn push_value(
        &mut self, value: impl Into<Value>
    ) -> Result<(), Error> {
        let value = self.check(value.into())?;
        self.children_mut()?.push(value);
        Ok(())
    }

    /// Removes the element at the given index and returns it.
    pub fn remove(&mut self, idx: usize) -> Result<Value, Error> {
        let children = self.children_mut()?;
        if idx >= children.len() {
            xerr!(return Err(Error::Index(idx)))
        }
        Ok(children.remove(idx))
    }

    fn wrap(&self, native: Native) -> Result<Value, Error> {
        if self.child.is_any() {
            xerr!(return Err(Error::type_err(
                "elements of ANY cannot be created from native values"
            )))
        }
        self.child.wrap(native)
    }

    fn check(&self, value: Value) -> Result<Value, Error> {
        if self.child.is_any() {
            return Ok(value)
        }
        if value.spec() != *self.child {
            xerr!(return Err(Error::type_err(format!(
                "expected {} element but got {}", self.child, value.spec()
            ))))
        }
        // Elements are decoded with their universal tag only.
        if value.tagging().is_tagged() {
            xerr!(return Err(Error::type_err(format!(
                "tagged {} cannot be an element", value.spec()
            ))))
        }
        Ok(value)
    }

    fn store(&mut self, idx: usize, value: Value) -> Result<(), Error> {
        let children = self.children_mut()?;
        match idx.cmp(&children.len()) {
            std::cmp::Ordering::Less => children[idx] = value,
            std::cmp::Ordering::Equal => children.push(value),
            std::cmp::Ordering::Greater => {
                xerr!(return Err(Error::Index(idx)))
            }
        }
        Ok(())
    }

    fn children(&self) -> Result<&Vec<Value>, Error> {
        let child = *self.child;
        self.cache.native(|contents| decode_items(child, contents))
    }

    fn children_mut(&mut self) -> Result<&mut Vec<Value>, Error> {
        let child = *self.child;
        self.cache.native_mut(|contents| decode_items(child, contents))
    }
}

impl Asn1Value for SequenceOf {
    fn tagging(&self) -> &Tagging {
        &self.tagging
    }

    fn tagging_mut(&mut self) -> &mut Tagging {
        &mut self.tagging
    }

    fn contents(&self) -> Result<Bytes, Error> {
        self.cache.contents(|children| encode_items(children))
    }

    fn to_native(&self) -> Result<Native, Error> {
        self.iter()?.map(Asn1Value::to_native).collect::<Result<_, _>>()
            .map(Native::Items)
    }

    fn state(&self) -> State {
        self.cache.state()
    }

    fn refresh(&mut self) -> Result<(), Error> {
        let child = *self.child;
        for item in self.children_mut()? {
            item.refresh()?;
        }
        self.cache.refresh(
            |contents| decode_items(child, contents),
            |children| encode_items(children),
        )
    }
}


//------------ Encoding and Decoding -----------------------------------------

fn decode_items(child: Spec, contents: &Bytes) -> Result<Vec<Value>, Error> {
    trace!("decoding elements of {}", child);
    let mut res = Vec::new();
    let mut pos = 0;
    while pos < contents.len() {
        let (_, range) = take_value(contents, pos)?;
        pos = range.end;
        res.push(child.load_tagged(&[], contents.slice(range))?);
    }
    Ok(res)
}

fn encode_items(children: &[Value]) -> Result<Bytes, Error> {
    let mut res = BytesMut::new();
    for item in children {
        res.put_slice(&item.dump()?);
    }
    Ok(res.freeze())
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ErrorKind;
    use crate::int::Integer;
    use crate::tagging::TagKind;

    static INTS: Spec = Spec::Integer;
    static ANY: Spec = Spec::Any;

    fn ints(seq: &SequenceOf) -> Vec<i64> {
        seq.iter().unwrap().map(|item| {
            item.as_integer().unwrap().to_i64().unwrap()
        }).collect()
    }

    #[test]
    fn index_access() {
        let mut seq = SequenceOf::from_native(
            &INTS, vec![Native::from(1), Native::from(2)]
        ).unwrap();
        assert_eq!(seq.len().unwrap(), 2);
        assert_eq!(
            seq.get(1).unwrap().unwrap().to_native().unwrap(),
            Native::from(2)
        );
        assert!(seq.get(2).unwrap().is_none());

        seq.set(0, 5).unwrap();
        assert_eq!(ints(&seq), [5, 2]);
        seq.set(2, 5).unwrap();
        seq.push(6).unwrap();
        assert_eq!(ints(&seq), [5, 2, 5, 6]);
        assert_eq!(seq.set(5, 1).unwrap_err(), Error::Index(5));
        seq.remove(0).unwrap();
        assert_eq!(ints(&seq), [2, 5, 6]);
        assert_eq!(seq.remove(3).unwrap_err().kind(), ErrorKind::Index);
        assert_eq!(
            seq.dump().unwrap().as_ref(),
            b"\x30\x09\x02\x01\x02\x02\x01\x05\x02\x01\x06"
        );
    }

    #[test]
    fn load_lazily() {
        let data = b"\x30\x06\x02\x01\x01\x02\x01\x02";
        let mut seq = SequenceOf::load(&INTS, data).unwrap();
        assert_eq!(seq.state(), State::RawOnly);
        assert_eq!(ints(&seq), [1, 2]);
        assert_eq!(seq.state(), State::Synced);
        assert_eq!(seq.dump().unwrap().as_ref(), data);
        seq.get_mut(0).unwrap().unwrap().as_integer_mut().unwrap().set(3);
        assert_eq!(
            seq.dump().unwrap().as_ref(),
            b"\x30\x06\x02\x01\x03\x02\x01\x02"
        );

        let seq = SequenceOf::load(&INTS, b"\x30\x03\x04\x01\x01").unwrap();
        assert_eq!(seq.len().unwrap_err().kind(), ErrorKind::Parse);
    }

    #[test]
    fn any_elements() {
        let mut seq = SequenceOf::new(&ANY);
        assert_eq!(seq.spec(), Spec::Any);
        assert_eq!(seq.push(5).unwrap_err().kind(), ErrorKind::Type);
        seq.push_value(Integer::new(5)).unwrap();
        assert_eq!(
            seq.to_native().unwrap(),
            Native::Items(vec![Native::from(5)])
        );
        assert_eq!(seq.dump().unwrap().as_ref(), b"\x30\x03\x02\x01\x05");
    }

    #[test]
    fn typed_elements() {
        let mut seq = SequenceOf::new(&INTS);
        assert_eq!(
            seq.push_value(
                crate::string::OctetString::new(Bytes::new())
            ).unwrap_err().kind(),
            ErrorKind::Type
        );
        assert_eq!(
            seq.push_value(
                Integer::new(5).retag(TagKind::Implicit, Tag::ctx(0))
            ).unwrap_err().kind(),
            ErrorKind::Type
        );
        assert_eq!(
            seq.set_value(
                0, Integer::new(5).retag(TagKind::Explicit, Tag::ctx(0))
            ).unwrap_err().kind(),
            ErrorKind::Type
        );
        assert!(seq.is_empty().unwrap());
        assert_eq!(seq.dump().unwrap().as_ref(), b"\x30\x00");

        let mut seq = SequenceOf::new(&ANY);
        seq.push_value(
            Integer::new(5).retag(TagKind::Implicit, Tag::ctx(0))
        ).unwrap();
        let data = seq.dump().unwrap();
        assert_eq!(data.as_ref(), b"\x30\x03\x80\x01\x05");
        assert_eq!(SequenceOf::load(&ANY, &data).unwrap().len().unwrap(), 1);
    }
}
