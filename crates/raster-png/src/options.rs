use log::trace;
use raster_core::ByteReader;

use crate::error::PngError;

/// Callback invoked for any chunk type this decoder does not itself
/// interpret (anything beyond IHDR/PLTE/tRNS/IDAT/IEND).
///
/// Receives the chunk's payload length and 4-byte type, and the reader
/// positioned at the start of the payload; must leave the reader positioned
/// just past the payload (i.e. consume exactly `length` bytes) so chunk
/// iteration can resume.
pub type UnknownChunkHandler =
    fn(length: usize, chunk_type: [u8; 4], reader: &mut ByteReader) -> Result<(), PngError>;

/// Default handler: critical chunks (bit 5 of the first type byte unset)
/// this decoder doesn't recognize are a hard error; ancillary chunks are
/// silently skipped.
pub fn default_chunk_handler(
    length: usize, chunk_type: [u8; 4], reader: &mut ByteReader
) -> Result<(), PngError>
{
    let chunk_name = std::str::from_utf8(&chunk_type).unwrap_or("????");

    if chunk_type[0] & (1 << 5) == 0
    {
        return Err(PngError::MalformedChunk(format!(
            "critical chunk {chunk_name} is not supported"
        )));
    }

    trace!("skipping unknown ancillary chunk {chunk_name} ({length} bytes)");
    reader.skip(length);
    Ok(())
}
