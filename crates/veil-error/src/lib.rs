//! # veil-error
//!
//! Unified error handling for veil.
//!
//! ## Design Philosophy
//!
//! - **ErrorKind**: Know what error occurred (e.g., ParseFailed, IoFailed)
//! - **ErrorStatus**: Decide how to handle it (Permanent, Temporary, Persistent)
//! - **Error Context**: Assist in locating the cause with rich context
//! - **Error Source**: Wrap underlying errors without leaking raw types
//!
//! ## Usage
//!
//! ```rust
//! use veil_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::ParseFailed, "no parse tree produced")
//!         .with_operation("js::parse_program")
//!         .with_context("file", "lib/secret.js"))
//! }
//! ```
//!
//! Note that the engine itself (tag resolution, stringification, trace
//! capture) is total by design; this crate covers the fallible edges
//! around it: I/O, grammar loading, encoding, and CLI argument handling.

mod error;
mod kind;
mod status;

pub use error::Error;
pub use kind::ErrorKind;
pub use status::ErrorStatus;

/// Result type alias using veil Error
pub type Result<T> = std::result::Result<T, Error>;
