//! Encoding and decoding of value headers.
//!
//! Every DER encoded value starts with a header consisting of the
//! identifier octets and the length octets. This module combines the two.

use smallvec::SmallVec;
use crate::error::Error;
use crate::length::Length;
use crate::tag::{Ident, Tag};


//------------ Header --------------------------------------------------------

/// The decoded header of a value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Header {
    /// The identifier octets.
    ident: Ident,

    /// The number of content octets.
    content_len: usize,

    /// The number of octets used by the header itself.
    header_len: usize,
}

impl Header {
    /// Returns the identifier of the value.
    pub fn ident(&self) -> Ident {
        self.ident
    }

    /// Returns the tag of the value.
    pub fn tag(&self) -> Tag {
        self.ident.tag()
    }

    /// Returns whether the value uses constructed encoding.
    pub fn is_constructed(&self) -> bool {
        self.ident.is_constructed()
    }

    /// Returns the number of content octets announced by the header.
    pub fn content_len(&self) -> usize {
        self.content_len
    }

    /// Returns the number of octets the header occupies.
    pub fn header_len(&self) -> usize {
        self.header_len
    }

    /// Returns the number of octets of header and content together.
    ///
    /// Fails if the announced length doesn’t fit into a `usize`.
    pub fn total_len(&self) -> Result<usize, Error> {
        match self.header_len.checked_add(self.content_len) {
            Some(len) => Ok(len),
            None => {
                xerr!(Err(Error::parse(
                    "declared length exceeds available data"
                )))
            }
        }
    }
}


//------------ Functions -----------------------------------------------------

/// Returns the encoded header for a value.
pub fn encode_header(
    tag: Tag, constructed: bool, content_len: usize
) -> SmallVec<[u8; 16]> {
    let mut res = SmallVec::new();
    res.extend_from_slice(&Ident::new(tag, constructed).to_octets());
    Length::new(content_len).append_encoded(&mut res);
    res
}

/// Decodes the header of the value starting at `offset` in `data`.
///
/// Fails if the header is truncated or not valid DER. It does not check
/// whether `data` actually holds as many content octets as announced. Use
/// [`take_value`] for that.
pub fn decode_header(data: &[u8], offset: usize) -> Result<Header, Error> {
    let data = match data.get(offset..) {
        Some(data) => data,
        None => xerr!(return Err(Error::parse("unexpected end of data")))
    };
    let (ident, ident_len) = Ident::take_from(data)?;
    let (length, length_len) = Length::take_from(&data[ident_len..])?;
    Ok(Header {
        ident,
        content_len: length.value(),
        header_len: ident_len + length_len,
    })
}

/// Decodes the header of the value at `offset` and checks its extent.
///
/// Returns the header and the range of `data` covered by the complete
/// value.
pub fn take_value(
    data: &[u8], offset: usize
) -> Result<(Header, std::ops::Range<usize>), Error> {
    let header = decode_header(data, offset)?;
    let end = match offset.checked_add(header.total_len()?) {
        Some(end) if end <= data.len() => end,
        _ => {
            xerr!(return Err(Error::parse(
                "declared length exceeds available data"
            )))
        }
    };
    Ok((header, offset..end))
}


//============ Tests =========================================================
