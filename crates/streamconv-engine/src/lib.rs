#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Engine configuration.
pub mod config;

/// The streaming convolution engine.
pub mod engine;

/// Error types for the engine module.
pub mod error;

/// Circular three-row buffer and border extension.
pub mod row_buffer;

pub use crate::config::EngineConfig;
pub use crate::engine::{ConvolutionEngine, RunReport};
pub use crate::error::EngineError;
pub use crate::row_buffer::{Role, Row, RowBuffer};
