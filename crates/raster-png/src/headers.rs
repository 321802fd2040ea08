use log::{error, warn};
use raster_core::ByteReader;

use crate::enums::PngColor;
use crate::error::PngError;

#[derive(Debug, Copy, Clone, Default)]
pub struct PngInfo
{
    pub width:  u32,
    pub height: u32,
    pub depth:  u8,
    pub color:  Option<PngColor>
}

/// Parse the 13-byte IHDR payload.
pub fn parse_ihdr(payload: &[u8], max_width: usize, max_height: usize) -> Result<PngInfo, PngError>
{
    if payload.len() != 13
    {
        return Err(PngError::MalformedChunk(format!(
            "IHDR must be 13 bytes, got {}",
            payload.len()
        )));
    }

    let mut reader = ByteReader::new(payload);

    let width = reader.read_u32_be().map_err(|_| PngError::ShortRead)?;
    let height = reader.read_u32_be().map_err(|_| PngError::ShortRead)?;
    let depth = reader.read_u8().map_err(|_| PngError::ShortRead)?;
    let color_type = reader.read_u8().map_err(|_| PngError::ShortRead)?;
    let compression = reader.read_u8().map_err(|_| PngError::ShortRead)?;
    let filter = reader.read_u8().map_err(|_| PngError::ShortRead)?;
    let interlace = reader.read_u8().map_err(|_| PngError::ShortRead)?;

    if width == 0 || height == 0
    {
        return Err(PngError::MalformedChunk("width and height must be non-zero".to_string()));
    }
    if width as usize > max_width || height as usize > max_height
    {
        error!("image dimensions {width}x{height} exceed configured limits");
        return Err(PngError::UnsupportedFormat(format!(
            "dimensions {width}x{height} exceed configured max of {max_width}x{max_height}"
        )));
    }
    if depth != 8
    {
        return Err(PngError::UnsupportedFormat(format!(
            "bit depth {depth} is not supported, only 8-bit channels are"
        )));
    }
    let color = PngColor::from_int(color_type)
        .ok_or_else(|| PngError::UnsupportedFormat(format!("unsupported color type {color_type}")))?;

    if compression != 0
    {
        return Err(PngError::UnsupportedFormat(format!(
            "unknown compression method {compression}"
        )));
    }
    if filter != 0
    {
        return Err(PngError::UnsupportedFormat(format!("unknown filter method {filter}")));
    }
    if interlace != 0
    {
        warn!("Adam7 interlacing requested but is not supported");
        return Err(PngError::UnsupportedFormat("Adam7 interlacing is not supported".to_string()));
    }

    Ok(PngInfo { width, height, depth, color: Some(color) })
}

/// Parse a PLTE payload into RGB triples.
pub fn parse_plte(payload: &[u8]) -> Result<Vec<[u8; 3]>, PngError>
{
    if payload.len() % 3 != 0
    {
        return Err(PngError::MalformedChunk(format!(
            "PLTE length {} is not a multiple of 3",
            payload.len()
        )));
    }
    Ok(payload.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect())
}

/// Parse a tRNS payload. For indexed images this is a per-palette-entry
/// alpha table; this decoder has no use for tRNS on any other color type,
/// so it is accepted and simply stored.
pub fn parse_trns(payload: &[u8]) -> Vec<u8>
{
    payload.to_vec()
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn sample_ihdr(color_type: u8, interlace: u8, depth: u8) -> Vec<u8>
    {
        let mut v = Vec::new();
        v.extend_from_slice(&1u32.to_be_bytes());
        v.extend_from_slice(&1u32.to_be_bytes());
        v.push(depth);
        v.push(color_type);
        v.push(0);
        v.push(0);
        v.push(interlace);
        v
    }

    #[test]
    fn valid_rgb_header_parses()
    {
        let payload = sample_ihdr(2, 0, 8);
        let info = parse_ihdr(&payload, 1 << 14, 1 << 14).unwrap();
        assert_eq!(info.color, Some(PngColor::Rgb));
    }

    #[test]
    fn interlaced_is_rejected()
    {
        let payload = sample_ihdr(2, 1, 8);
        assert!(parse_ihdr(&payload, 1 << 14, 1 << 14).is_err());
    }

    #[test]
    fn non_8_bit_depth_is_rejected()
    {
        let payload = sample_ihdr(2, 0, 16);
        assert!(parse_ihdr(&payload, 1 << 14, 1 << 14).is_err());
    }

    #[test]
    fn plte_length_must_be_multiple_of_three()
    {
        assert!(parse_plte(&[1, 2]).is_err());
        assert!(parse_plte(&[1, 2, 3, 4, 5, 6]).is_ok());
    }
}
