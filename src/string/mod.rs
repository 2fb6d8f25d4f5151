//! DER encoding for various string types.
//!
//! There are two types of strings for binary data. [`OctetString`]s contain
//! an unrestricted sequence of octets while [`BitString`]s contain a
//! sequence of bits that does not need to be of a length divisible by eight.
//! A bit string can be given a table of [`BitNames`] so that its bits can
//! be addressed by name.
//!
//! Of the character strings, only [`Utf8String`] is currently supported.

//--- Re-exports

pub use self::bit::{Bit, BitNames, BitString};
pub use self::octet::OctetString;
pub use self::utf8::Utf8String;

//--- Private modules

mod bit;
mod octet;
mod utf8;
