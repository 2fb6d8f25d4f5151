//! Implicit and explicit tagging.
//!
//! This is a private module. Its public items are re-exported by the parent.

use bytes::{BufMut, Bytes, BytesMut};
use smallvec::SmallVec;
use crate::error::Error;
use crate::header::{decode_header, encode_header};
use crate::tag::{Ident, Tag};


//------------ TagKind -------------------------------------------------------

/// The way a tag is applied to a value.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TagKind {
    /// The tag replaces the outermost tag of the value.
    Implicit,

    /// The complete encoding of the value becomes the content of a new
    /// constructed value with the tag.
    Explicit,
}


//------------ Tagging -------------------------------------------------------

/// The tags a value is encoded with.
///
/// Every value has a base tag, normally the universal tag of its type, and
/// a fixed choice of primitive or constructed encoding. On top of that, any
/// number of tagging operations can be layered. They are kept in the order
/// they were applied so that the most recent one can be undone again.
///
/// The headers of the encoding are always derived from these layers, so
/// they can never get out of step with the content.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tagging {
    /// The tag of the type itself.
    base: Tag,

    /// Whether the type uses constructed encoding.
    constructed: bool,

    /// The tagging operations, oldest first.
    layers: SmallVec<[(TagKind, Tag); 2]>,
}

impl Tagging {
    /// Creates an untagged tagging for the given base tag.
    pub fn new(base: Tag, constructed: bool) -> Self {
        Tagging { base, constructed, layers: SmallVec::new() }
    }

    /// Creates a tagging with the given layers already applied.
    pub fn with_layers(
        base: Tag, constructed: bool, layers: &[(TagKind, Tag)]
    ) -> Self {
        Tagging { base, constructed, layers: layers.iter().copied().collect() }
    }

    /// Returns the base tag.
    pub fn base(&self) -> Tag {
        self.base
    }

    /// Returns whether the innermost value uses constructed encoding.
    pub fn is_constructed(&self) -> bool {
        self.constructed
    }

    /// Returns the tagging layers, oldest first.
    pub fn layers(&self) -> &[(TagKind, Tag)] {
        &self.layers
    }

    /// Returns whether any tagging has been applied.
    pub fn is_tagged(&self) -> bool {
        !self.layers.is_empty()
    }

    /// Applies another layer of tagging.
    pub fn push(&mut self, kind: TagKind, tag: Tag) {
        self.layers.push((kind, tag))
    }

    /// Removes the most recently applied layer of tagging.
    ///
    /// Returns the removed layer or `None` if the value wasn’t tagged.
    pub fn pop(&mut self) -> Option<(TagKind, Tag)> {
        self.layers.pop()
    }

    /// Returns the tag of the outermost header.
    pub fn outer_tag(&self) -> Tag {
        let (inner, wrappers) = self.resolve();
        wrappers.last().copied().unwrap_or(inner)
    }

    /// Folds the layers into the innermost tag and the explicit wrappers.
    ///
    /// The wrappers are returned innermost first. An implicit layer
    /// replaces whatever tag is outermost at the time it is applied.
    fn resolve(&self) -> (Tag, SmallVec<[Tag; 2]>) {
        let mut inner = self.base;
        let mut wrappers = SmallVec::<[Tag; 2]>::new();
        for &(kind, tag) in &self.layers {
            match kind {
                TagKind::Implicit => {
                    match wrappers.last_mut() {
                        Some(outer) => *outer = tag,
                        None => inner = tag,
                    }
                }
                TagKind::Explicit => wrappers.push(tag)
            }
        }
        (inner, wrappers)
    }

    /// Returns a tagging for a value found inside this tagging.
    ///
    /// The base tag and encoding are taken from `ident` and the explicit
    /// wrappers are kept. This is used for values that accept any tag.
    pub fn capture(&self, ident: Ident) -> Self {
        let (_, wrappers) = self.resolve();
        Tagging {
            base: ident.tag(),
            constructed: ident.is_constructed(),
            layers: wrappers.into_iter().map(|tag| {
                (TagKind::Explicit, tag)
            }).collect(),
        }
    }

    /// Returns the tagging without any layers.
    pub fn untagged(&self) -> Self {
        Tagging::new(self.base, self.constructed)
    }

    /// Returns the complete encoding of a value with the given content.
    pub fn encode(&self, contents: &[u8]) -> Bytes {
        let (inner, wrappers) = self.resolve();
        let mut headers = SmallVec::<[SmallVec<[u8; 16]>; 3]>::new();
        headers.push(encode_header(inner, self.constructed, contents.len()));
        let mut len = headers[0].len() + contents.len();
        for &tag in &wrappers {
            let header = encode_header(tag, true, len);
            len += header.len();
            headers.push(header);
        }
        let mut res = BytesMut::with_capacity(len);
        for header in headers.iter().rev() {
            res.put_slice(header)
        }
        res.put_slice(contents);
        res.freeze()
    }

    /// Removes all headers from a complete encoding.
    ///
    /// The data must contain exactly one value. Explicit wrappers must have
    /// the expected tags and constructed encoding. If `check_inner` is
    /// `true`, the innermost header must match the expected tag and
    /// encoding, too.
    ///
    /// Returns the identifier of the innermost header and its content.
    pub fn strip(
        &self, data: &Bytes, check_inner: bool
    ) -> Result<(Ident, Bytes), Error> {
        let (inner, wrappers) = self.resolve();
        let mut start = 0;
        for &tag in wrappers.iter().rev() {
            let header = Self::take_exact(data, start)?;
            if header.tag() != tag || !header.is_constructed() {
                xerr!(return Err(Error::parse(format!(
                    "expected explicit tag {} but found {}",
                    tag, header.tag()
                ))))
            }
            start += header.header_len();
        }
        let header = Self::take_exact(data, start)?;
        if check_inner {
            if header.tag() != inner {
                xerr!(return Err(Error::parse(format!(
                    "expected tag {} but found {}", inner, header.tag()
                ))))
            }
            if header.is_constructed() != self.constructed {
                xerr!(return Err(Error::parse(if self.constructed {
                    "expected constructed encoding"
                }
                else {
                    "expected primitive encoding"
                })))
            }
        }
        Ok((header.ident(), data.slice(start + header.header_len()..)))
    }

    /// Decodes a header and checks that it covers all remaining data.
    fn take_exact(
        data: &[u8], start: usize
    ) -> Result<crate::header::Header, Error> {
        let header = decode_header(data, start)?;
        let remaining = data.len() - start;
        let total_len = header.total_len()?;
        if total_len > remaining {
            xerr!(Err(Error::parse("declared length exceeds available data")))
        }
        else if total_len < remaining {
            xerr!(Err(Error::parse("trailing data after value")))
        }
        else {
            Ok(header)
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn untagged() {
        let tagging = Tagging::new(Tag::INTEGER, false);
        let data = tagging.encode(b"\x05");
        assert_eq!(data.as_ref(), b"\x02\x01\x05");
        let (ident, contents) = tagging.strip(&data, true).unwrap();
        assert_eq!(ident, Ident::new(Tag::INTEGER, false));
        assert_eq!(contents.as_ref(), b"\x05");
    }

    #[test]
    fn implicit_and_explicit() {
        let mut tagging = Tagging::new(Tag::INTEGER, false);
        tagging.push(TagKind::Implicit, Tag::ctx(1));
        assert_eq!(tagging.encode(b"\x05").as_ref(), b"\x81\x01\x05");
        assert_eq!(tagging.outer_tag(), Tag::ctx(1));

        tagging.push(TagKind::Explicit, Tag::ctx(2));
        let data = tagging.encode(b"\x05");
        assert_eq!(data.as_ref(), b"\xa2\x03\x81\x01\x05");
        assert_eq!(tagging.strip(&data, true).unwrap().1.as_ref(), b"\x05");

        // An implicit tag on top of an explicit one replaces the wrapper.
        tagging.push(TagKind::Implicit, Tag::application(3));
        assert_eq!(
            tagging.encode(b"\x05").as_ref(), b"\x63\x03\x81\x01\x05"
        );

        assert_eq!(
            tagging.pop(), Some((TagKind::Implicit, Tag::application(3)))
        );
        tagging.pop();
        tagging.pop();
        assert!(!tagging.is_tagged());
        assert_eq!(tagging.pop(), None);
    }

    #[test]
    fn strip_failures() {
        let tagging = Tagging::new(Tag::INTEGER, false);
        let data = Bytes::from_static(b"\x04\x01\x05");
        assert!(tagging.strip(&data, true).is_err());
        assert!(tagging.strip(&data, false).is_ok());
        let data = Bytes::from_static(b"\x02\x01\x05\x00");
        assert!(tagging.strip(&data, true).is_err());
        let data = Bytes::from_static(b"\x02\x02\x05");
        assert!(tagging.strip(&data, true).is_err());
        let data = Bytes::from_static(b"\x22\x01\x05");
        assert!(tagging.strip(&data, true).is_err());

        let mut tagging = tagging;
        tagging.push(TagKind::Explicit, Tag::ctx(0));
        let data = Bytes::from_static(b"\xa1\x03\x02\x01\x05");
        assert!(tagging.strip(&data, true).is_err());
        let data = Bytes::from_static(b"\x80\x03\x02\x01\x05");
        assert!(tagging.strip(&data, true).is_err());
    }
}
