//! `regview` extracts CPU register state from GDB's textual register dumps and
//! renders it as tables under different numeric interpretations.
//!
//! The pipeline is `raw text -> parser -> snapshot -> view`:
//!
//! - [`core::parser`] turns an `info all-registers` dump into a [`RegisterSnapshot`].
//! - [`core::codec`] reinterprets hexadecimal lanes as integers, floats, and doubles.
//! - [`core::detect`] guesses whether a vector register holds integer or float data.
//! - [`core::view`] formats the snapshot into rows of cells per register class.

#![deny(missing_docs, missing_debug_implementations, unreachable_pub)]
#![warn(rust_2018_idioms)]

mod config;
mod error;

pub mod core;
pub mod utils;

pub use crate::core::parser::{RegisterSnapshot, parse_dump};
pub use config::Config;
pub use error::{Error, Result};
