#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
pub mod error;

/// Text dumps with one hexadecimal word per line.
pub mod hex;

/// Conversions between 8-bit pixels and memory words.
pub mod pixels;

/// PNG image encoding and decoding.
pub mod png;

pub use crate::error::IoError;
