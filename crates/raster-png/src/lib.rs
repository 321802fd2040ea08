//! PNG decoding: chunk parsing, zlib inflation via `raster-inflate`,
//! scanline de-filtering, and color-mode conversion to RGBA.

pub use decoder::PngDecoder;
pub use error::PngError;
pub use headers::PngInfo;

mod constants;
mod decoder;
mod enums;
pub mod error;
mod filters;
mod headers;
mod options;
mod utils;

pub use options::{default_chunk_handler, UnknownChunkHandler};
