//! Error handling.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::borrow::Cow;
use thiserror::Error;


//------------ Error ---------------------------------------------------------

/// An error happened while parsing, encoding, or manipulating a value.
///
/// Each variant represents one kind of failure. The message of the first
/// three variants is a human readable description that is usually a static
/// string and thus doesn’t allocate.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    /// The encoded data was malformed or not valid DER.
    #[error("parse error: {0}")]
    Parse(Cow<'static, str>),

    /// A native value cannot be encoded by the type it was given to.
    #[error("encoding error: {0}")]
    Encoding(Cow<'static, str>),

    /// A native value or value has the wrong shape for its type.
    #[error("type error: {0}")]
    Type(Cow<'static, str>),

    /// A required field of a sequence is absent.
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    /// An open type discriminant has no type mapped to it.
    #[error("no type mapped for open type discriminant {0}")]
    UnknownOpenType(String),

    /// An element index is beyond the end of a sequence-of.
    #[error("index {0} out of range")]
    Index(usize),
}

impl Error {
    /// Creates a parse error with the given message.
    pub fn parse(msg: impl Into<Cow<'static, str>>) -> Self {
        Error::Parse(msg.into())
    }

    /// Creates an encoding error with the given message.
    pub fn encoding(msg: impl Into<Cow<'static, str>>) -> Self {
        Error::Encoding(msg.into())
    }

    /// Creates a type error with the given message.
    pub fn type_err(msg: impl Into<Cow<'static, str>>) -> Self {
        Error::Type(msg.into())
    }

    /// Returns the kind of the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Parse(_) => ErrorKind::Parse,
            Error::Encoding(_) => ErrorKind::Encoding,
            Error::Type(_) => ErrorKind::Type,
            Error::MissingField(_) => ErrorKind::MissingField,
            Error::UnknownOpenType(_) => ErrorKind::UnknownOpenType,
            Error::Index(_) => ErrorKind::Index,
        }
    }
}


//------------ ErrorKind -----------------------------------------------------

/// The category of an [`Error`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// Encoded data is malformed or not valid DER.
    Parse,

    /// A native value cannot be encoded.
    Encoding,

    /// A value or native value is of the wrong type.
    Type,

    /// A required field is absent.
    MissingField,

    /// The discriminant of an open type has no known type.
    UnknownOpenType,

    /// An element index is out of range.
    Index,
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(
            Error::parse("indefinite length").to_string(),
            "parse error: indefinite length"
        );
        assert_eq!(
            Error::MissingField("name").to_string(),
            "missing required field 'name'"
        );
        assert_eq!(
            Error::UnknownOpenType("1.2.3".into()).kind(),
            ErrorKind::UnknownOpenType
        );
    }
}
