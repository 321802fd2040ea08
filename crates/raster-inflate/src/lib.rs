//! A DEFLATE (RFC 1951) / zlib (RFC 1950) decompressor.

pub use decoder::{DeflateDecoder, DeflateOptions};

mod bitstream;
mod constants;
mod decoder;
pub mod errors;
mod huffman;

pub use errors::InflateError;
