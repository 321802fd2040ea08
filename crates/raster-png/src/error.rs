use std::fmt::{Debug, Formatter};

use raster_inflate::InflateError;

/// Reasons a PNG stream fails to decode.
///
/// As with [`InflateError`], no variant carries partial decoded output: a
/// failed decode leaves no persistent state.
pub enum PngError
{
    /// The 8-byte PNG signature did not match.
    NotPng,
    /// A format variant this decoder rejects by design (non-8-bit depth,
    /// an interlaced image, an unsupported color type, a non-zero
    /// compression/filter method).
    UnsupportedFormat(String),
    /// A chunk was structurally inconsistent (bad length, invalid PLTE
    /// size, missing required PLTE for an indexed image, chunks out of
    /// the order this decoder requires).
    MalformedChunk(String),
    /// The IDAT stream failed to inflate.
    Inflate(InflateError),
    /// A scanline's filter-type byte was not one of None/Sub/Up/Average/Paeth.
    FilterError(u8),
    /// The input ended before a chunk, header, or scanline could be read in full.
    ShortRead
}

impl Debug for PngError
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        match self
        {
            Self::NotPng => writeln!(f, "not a PNG file: bad signature"),
            Self::UnsupportedFormat(reason) => writeln!(f, "unsupported PNG format: {reason}"),
            Self::MalformedChunk(reason) => writeln!(f, "malformed chunk: {reason}"),
            Self::Inflate(err) => writeln!(f, "error inflating IDAT stream: {err:?}"),
            Self::FilterError(byte) => writeln!(f, "unknown scanline filter type {byte}"),
            Self::ShortRead => writeln!(f, "unexpected end of input")
        }
    }
}

impl From<&'static str> for PngError
{
    fn from(val: &'static str) -> Self
    {
        Self::MalformedChunk(val.to_string())
    }
}

impl From<String> for PngError
{
    fn from(val: String) -> Self
    {
        Self::MalformedChunk(val)
    }
}

impl From<InflateError> for PngError
{
    fn from(val: InflateError) -> Self
    {
        Self::Inflate(val)
    }
}
