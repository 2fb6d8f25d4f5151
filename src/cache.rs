//! The dual representation of values.
//!
//! This is a private module. Its public items are re-exported by the parent.

use std::sync::OnceLock;
use bytes::Bytes;
use crate::error::Error;


//------------ State ---------------------------------------------------------

/// Which representations of a value are currently available.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum State {
    /// Only the content octets are known. The native value will be decoded
    /// from them when first requested.
    RawOnly,

    /// Only the native value is known. The content octets will be encoded
    /// from it when first requested.
    NativeOnly,

    /// Both representations are known and agree with each other.
    Synced,
}


//------------ Cache ---------------------------------------------------------

/// The content octets and native value of a value.
///
/// At least one of the two is always present. The missing one is derived
/// on demand through a shared reference and kept afterwards. This makes it
/// possible to read values concurrently while still decoding lazily.
///
/// Changing the native value requires a mutable reference and drops the
/// content octets, so they are always consistent with the native value.
#[derive(Clone, Debug)]
pub struct Cache<N> {
    contents: OnceLock<Bytes>,
    native: OnceLock<N>,
}

impl<N> Cache<N> {
    /// Creates a cache from content octets.
    pub fn from_contents(contents: Bytes) -> Self {
        Cache { contents: OnceLock::from(contents), native: OnceLock::new() }
    }

    /// Creates a cache from a native value.
    pub fn from_native(native: N) -> Self {
        Cache { contents: OnceLock::new(), native: OnceLock::from(native) }
    }

    /// Returns the current state.
    pub fn state(&self) -> State {
        match (self.contents.get().is_some(), self.native.get().is_some()) {
            (true, true) => State::Synced,
            (false, true) => State::NativeOnly,
            _ => State::RawOnly,
        }
    }

    /// Returns the native value, decoding it with `decode` if necessary.
    ///
    /// If decoding fails, the cache stays unchanged and the next call will
    /// try again.
    pub fn native(
        &self, decode: impl FnOnce(&Bytes) -> Result<N, Error>
    ) -> Result<&N, Error> {
        if let Some(native) = self.native.get() {
            return Ok(native)
        }
        let native = decode(self.raw()?)?;
        Ok(self.native.get_or_init(|| native))
    }

    /// Returns the content octets, encoding them with `encode` if necessary.
    ///
    /// If encoding fails, the cache stays unchanged.
    pub fn contents(
        &self, encode: impl FnOnce(&N) -> Result<Bytes, Error>
    ) -> Result<Bytes, Error> {
        if let Some(contents) = self.contents.get() {
            return Ok(contents.clone())
        }
        let native = match self.native.get() {
            Some(native) => native,
            None => xerr!(return Err(Error::type_err("value has no content")))
        };
        let contents = encode(native)?;
        Ok(self.contents.get_or_init(|| contents).clone())
    }

    /// Returns a mutable reference to the native value.
    ///
    /// The value is decoded first if necessary. Since the caller may change
    /// it, the content octets are dropped.
    pub fn native_mut(
        &mut self, decode: impl FnOnce(&Bytes) -> Result<N, Error>
    ) -> Result<&mut N, Error> {
        self.native(decode)?;
        self.contents.take();
        match self.native.get_mut() {
            Some(native) => Ok(native),
            None => xerr!(Err(Error::type_err("value has no content")))
        }
    }

    /// Replaces the native value and drops the content octets.
    pub fn set_native(&mut self, native: N) {
        self.native = OnceLock::from(native);
        self.contents = OnceLock::new();
    }

    /// Re-encodes the content octets from the native value.
    ///
    /// If either decoding or encoding fails, the cache stays unchanged.
    pub fn refresh(
        &mut self,
        decode: impl FnOnce(&Bytes) -> Result<N, Error>,
        encode: impl FnOnce(&N) -> Result<Bytes, Error>,
    ) -> Result<(), Error> {
        let contents = encode(self.native(decode)?)?;
        self.contents = OnceLock::from(contents);
        Ok(())
    }

    fn raw(&self) -> Result<&Bytes, Error> {
        match self.contents.get() {
            Some(contents) => Ok(contents),
            None => xerr!(Err(Error::type_err("value has no content")))
        }
    }
}


//============ Tests =========================================================
