use std::fmt::{Debug, Formatter};

/// Reasons a DEFLATE/zlib stream fails to decode.
///
/// Unlike some inflaters, this one never hands back partially decoded bytes
/// alongside an error: a failed decode leaves no observable state on the
/// caller's side, so the error carries only diagnostic context.
pub enum InflateError
{
    /// The bit reader ran out of input before a field/codeword was complete.
    ShortRead,
    /// zlib `CMF.CM` was not 8 (the only compression method zlib defines).
    UnsupportedCompressionMethod(u8),
    /// A block's 2-bit type field was `0b11`, which DEFLATE reserves.
    ReservedBlockType,
    /// A stored block's LEN and NLEN fields did not complement each other.
    LenNlenMismatch { len: u16, nlen: u16 },
    /// A bit sequence did not correspond to any codeword in the active
    /// Huffman table.
    InvalidHuffmanCode,
    /// A back-reference pointed further behind the output than has been
    /// produced so far.
    BackReferenceOutOfRange { offset: usize, available: usize },
    /// Catch-all for structurally malformed input that doesn't fit a more
    /// specific case above.
    CorruptData(&'static str),
    /// The trailing Adler-32 did not match the decompressed output.
    ///
    /// Only produced when [`DeflateOptions::confirm_adler32`] is set.
    ///
    /// [`DeflateOptions::confirm_adler32`]: crate::decoder::DeflateOptions::confirm_adler32
    MismatchedAdler32 { expected: u32, found: u32 }
}

impl Debug for InflateError
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        match self
        {
            Self::ShortRead => writeln!(f, "ran out of input before stream ended"),
            Self::UnsupportedCompressionMethod(cm) =>
            {
                writeln!(f, "unsupported zlib compression method: {cm}")
            }
            Self::ReservedBlockType => writeln!(f, "block used the reserved type 0b11"),
            Self::LenNlenMismatch { len, nlen } =>
            {
                writeln!(f, "stored block LEN {len} does not complement NLEN {nlen}")
            }
            Self::InvalidHuffmanCode => writeln!(f, "bit sequence does not match any Huffman code"),
            Self::BackReferenceOutOfRange { offset, available } => writeln!(
                f,
                "back-reference offset {offset} exceeds {available} bytes decoded so far"
            ),
            Self::CorruptData(reason) => writeln!(f, "corrupt deflate stream: {reason}"),
            Self::MismatchedAdler32 { expected, found } =>
            {
                writeln!(f, "mismatched Adler-32, expected {expected:#010x} but found {found:#010x}")
            }
        }
    }
}
