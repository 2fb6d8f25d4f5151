//! Macros for last-resort debugging.
//!
//! Error reporting in this crate is deliberately terse: an error tells you
//! what went wrong but not where in the crate it was detected. To remedy
//! this somewhat, this module contains a macro `xerr!()` that will log the
//! source location through the `log` facade if the `extra-debug` feature is
//! enabled before resolving into whatever the expression it encloses
//! resolves to otherwise. Use it whenever you initially produce an error,
//! i.e.:
//!
//! ```rust,ignore
//! if foo {
//!     xerr!(Err(Error::parse("bad foo")))
//! }
//! ```
//!
//! or, with an early return:
//!
//! ```rust,ignore
//! if foo {
//!     xerr!(return Err(Error::parse("bad foo")));
//! }
//! ```

#[cfg(feature = "extra-debug")]
#[macro_export]
macro_rules! xerr {
    ($test:expr) => {{
        log::debug!("error raised at {}:{}", file!(), line!());
        $test
    }}
}

#[cfg(not(feature = "extra-debug"))]
#[macro_export]
macro_rules! xerr {
    ($test:expr) => { $test };
}
