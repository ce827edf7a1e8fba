#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use streamconv_core as core;

#[doc(inline)]
pub use streamconv_kernel as kernel;

#[doc(inline)]
pub use streamconv_engine as engine;

#[doc(inline)]
pub use streamconv_io as io;
