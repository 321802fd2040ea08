//! Decoder options.
//!
//! All decoders in the raster family share one options struct so that a
//! caller configuring width/height guards or strict mode does not need to
//! learn a new struct per crate.

pub mod decoder;

pub use decoder::DecoderOptions;
