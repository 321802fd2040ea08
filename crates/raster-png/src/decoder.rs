use log::{debug, trace};
use raster_core::{ByteReader, ColorSpace, DecoderOptions, RasterImage};
use raster_inflate::{DeflateDecoder, DeflateOptions};

use crate::constants::{IDAT, IEND, IHDR, PLTE, PNG_SIGNATURE, TRNS};
use crate::enums::PngColor;
use crate::error::PngError;
use crate::filters::reconstruct_scanline;
use crate::headers::{parse_ihdr, parse_plte, parse_trns, PngInfo};
use crate::options::{default_chunk_handler, UnknownChunkHandler};
use crate::utils::{expand_gray, expand_gray_alpha, expand_palette, expand_rgb};

/// Decodes a PNG byte stream into a [`RasterImage`].
///
/// One instance decodes one stream. A failed decode leaves no usable state
/// behind: construct a fresh decoder to try again.
pub struct PngDecoder<'a>
{
    stream:  ByteReader<'a>,
    options: DecoderOptions,

    seen_ihdr: bool,
    info:      PngInfo,
    palette:   Vec<[u8; 3]>,
    trns:      Vec<u8>,
    idat:      Vec<u8>,

    unknown_chunk_handler: UnknownChunkHandler
}

impl<'a> PngDecoder<'a>
{
    pub fn new(data: &'a [u8]) -> PngDecoder<'a>
    {
        PngDecoder::new_with_options(data, DecoderOptions::default())
    }

    pub fn new_with_options(data: &'a [u8], options: DecoderOptions) -> PngDecoder<'a>
    {
        PngDecoder {
            stream: ByteReader::new(data),
            options,
            seen_ihdr: false,
            info: PngInfo::default(),
            palette: Vec::new(),
            trns: Vec::new(),
            idat: Vec::new(),
            unknown_chunk_handler: default_chunk_handler
        }
    }

    /// Override the callback invoked for chunk types this decoder does not
    /// itself interpret.
    pub fn set_unknown_chunk_handler(&mut self, handler: UnknownChunkHandler)
    {
        self.unknown_chunk_handler = handler;
    }

    /// Whether `data` begins with the PNG signature. Does not consume `data`
    /// and never fails: a caller can use this to sniff a format before
    /// committing to a full decode.
    pub fn is_png(data: &[u8]) -> bool
    {
        data.len() >= PNG_SIGNATURE.len() && data[..PNG_SIGNATURE.len()] == PNG_SIGNATURE
    }

    /// Dimensions from IHDR, once it has been seen.
    pub const fn get_dimensions(&self) -> Option<(u32, u32)>
    {
        if !self.seen_ihdr
        {
            return None;
        }
        Some((self.info.width, self.info.height))
    }

    /// Run the full decode pipeline: signature check, chunk iteration,
    /// inflate, de-filter, color-mode conversion.
    pub fn decode(&mut self) -> Result<RasterImage, PngError>
    {
        self.verify_signature()?;
        self.read_chunks()?;

        if !self.seen_ihdr
        {
            return Err(PngError::MalformedChunk("no IHDR chunk present".to_string()));
        }
        if self.idat.is_empty()
        {
            return Err(PngError::MalformedChunk("no IDAT chunk present".to_string()));
        }

        let color = self.info.color.expect("IHDR parse always sets color on success");
        if color == PngColor::Indexed && self.palette.is_empty()
        {
            return Err(PngError::MalformedChunk(
                "indexed image has no PLTE chunk".to_string()
            ));
        }

        let raw = self.inflate()?;
        let unfiltered = self.reconstruct(&raw, color)?;
        let pixels = self.convert_to_rgba(&unfiltered, color)?;

        Ok(RasterImage::new(self.info.width, self.info.height, ColorSpace::Rgba, pixels))
    }

    fn verify_signature(&mut self) -> Result<(), PngError>
    {
        let sig = self.stream.read_bytes(PNG_SIGNATURE.len()).map_err(|_| PngError::NotPng)?;
        if sig != PNG_SIGNATURE
        {
            return Err(PngError::NotPng);
        }
        Ok(())
    }

    fn read_chunks(&mut self) -> Result<(), PngError>
    {
        loop
        {
            let length = self.stream.read_u32_be().map_err(|_| PngError::ShortRead)? as usize;
            let raw_type = self.stream.read_bytes(4).map_err(|_| PngError::ShortRead)?;
            let chunk_type: [u8; 4] = raw_type.try_into().expect("read_bytes(4) returns 4 bytes");

            match chunk_type
            {
                IHDR =>
                {
                    let payload = self.stream.read_bytes(length).map_err(|_| PngError::ShortRead)?;
                    if self.seen_ihdr
                    {
                        return Err(PngError::MalformedChunk("duplicate IHDR chunk".to_string()));
                    }
                    self.info =
                        parse_ihdr(payload, self.options.get_max_width(), self.options.get_max_height())?;
                    self.seen_ihdr = true;
                }
                PLTE =>
                {
                    let payload = self.stream.read_bytes(length).map_err(|_| PngError::ShortRead)?;
                    if !self.idat.is_empty()
                    {
                        return Err(PngError::MalformedChunk("PLTE after IDAT".to_string()));
                    }
                    self.palette = parse_plte(payload)?;
                }
                TRNS =>
                {
                    let payload = self.stream.read_bytes(length).map_err(|_| PngError::ShortRead)?;
                    if !self.idat.is_empty()
                    {
                        return Err(PngError::MalformedChunk("tRNS after IDAT".to_string()));
                    }
                    self.trns = parse_trns(payload);
                }
                IDAT =>
                {
                    let payload = self.stream.read_bytes(length).map_err(|_| PngError::ShortRead)?;
                    if !self.seen_ihdr
                    {
                        return Err(PngError::MalformedChunk("IDAT before IHDR".to_string()));
                    }
                    self.idat.extend_from_slice(payload);
                }
                IEND =>
                {
                    self.stream.skip(length);
                    self.stream.skip(4); // CRC, unverified
                    return Ok(());
                }
                other =>
                {
                    (self.unknown_chunk_handler)(length, other, &mut self.stream)?;
                    self.stream.skip(4); // CRC, unverified
                    continue;
                }
            }

            self.stream.skip(4); // CRC, unverified
        }
    }

    fn inflate(&self) -> Result<Vec<u8>, PngError>
    {
        debug!("inflating {} bytes of IDAT data", self.idat.len());
        let deflate_options = DeflateOptions::default().set_confirm_adler32(self.options.get_strict_mode());
        let mut decoder = DeflateDecoder::new_with_options(&self.idat, deflate_options);
        Ok(decoder.decode_zlib()?)
    }

    fn reconstruct(&self, raw: &[u8], color: PngColor) -> Result<Vec<u8>, PngError>
    {
        let channels = color.channels();
        let width = self.info.width as usize;
        let height = self.info.height as usize;
        let stride = width * channels;
        let row_len = stride + 1;

        if raw.len() != row_len * height
        {
            return Err(PngError::MalformedChunk(format!(
                "inflated output is {} bytes, expected {} for a {width}x{height} image",
                raw.len(),
                row_len * height
            )));
        }

        let mut out = Vec::with_capacity(stride * height);
        let mut prev_row = vec![0u8; stride];

        for y in 0..height
        {
            let row_start = y * row_len;
            let filter = raw[row_start];
            let mut current = raw[row_start + 1..row_start + row_len].to_vec();

            reconstruct_scanline(filter, &prev_row, &mut current, channels, y == 0)?;

            out.extend_from_slice(&current);
            prev_row = current;
        }

        trace!("reconstructed {height} scanlines");
        Ok(out)
    }

    fn convert_to_rgba(&self, unfiltered: &[u8], color: PngColor) -> Result<Vec<u8>, PngError>
    {
        let out = match color
        {
            PngColor::Rgba => unfiltered.to_vec(),
            PngColor::Rgb => expand_rgb(unfiltered),
            PngColor::Gray => expand_gray(unfiltered),
            PngColor::GrayAlpha => expand_gray_alpha(unfiltered),
            PngColor::Indexed =>
            {
                if let Some(&max_index) = unfiltered.iter().max()
                {
                    if max_index as usize >= self.palette.len()
                    {
                        return Err(PngError::MalformedChunk(format!(
                            "palette index {max_index} out of range for a {}-entry palette",
                            self.palette.len()
                        )));
                    }
                }
                expand_palette(unfiltered, &self.palette, &self.trns)
            }
        };

        debug_assert_eq!(out.len(), self.info.width as usize * self.info.height as usize * 4);
        Ok(out)
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn adler32(data: &[u8]) -> u32
    {
        let mut a: u32 = 1;
        let mut b: u32 = 0;
        for &byte in data
        {
            a = (a + byte as u32) % 65521;
            b = (b + a) % 65521;
        }
        (b << 16) | a
    }

    fn stored_zlib(data: &[u8]) -> Vec<u8>
    {
        // zlib header: CMF=0x78 (CM=8, CINFO=7), FLG=0x01, no dictionary.
        let mut out = vec![0x78, 0x01];
        out.push(0b0000_0001); // BFINAL=1, BTYPE=00, packed LSB-first
        out.extend_from_slice(&(data.len() as u16).to_le_bytes());
        out.extend_from_slice(&(!(data.len() as u16)).to_le_bytes());
        out.extend_from_slice(data);
        out.extend_from_slice(&adler32(data).to_be_bytes());
        out
    }

    fn png_chunk(chunk_type: &[u8; 4], payload: &[u8]) -> Vec<u8>
    {
        let mut out = Vec::new();
        out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        out.extend_from_slice(chunk_type);
        out.extend_from_slice(payload);
        out.extend_from_slice(&[0, 0, 0, 0]); // unverified CRC
        out
    }

    fn build_png(ihdr: &[u8], extra: &[(&[u8; 4], &[u8])], idat_raw: &[u8]) -> Vec<u8>
    {
        let mut bytes = PNG_SIGNATURE.to_vec();
        bytes.extend(png_chunk(&IHDR, ihdr));
        for (ty, payload) in extra
        {
            bytes.extend(png_chunk(ty, payload));
        }
        bytes.extend(png_chunk(&IDAT, &stored_zlib(idat_raw)));
        bytes.extend(png_chunk(&IEND, &[]));
        bytes
    }

    fn ihdr_payload(width: u32, height: u32, color_type: u8) -> Vec<u8>
    {
        let mut v = Vec::new();
        v.extend_from_slice(&width.to_be_bytes());
        v.extend_from_slice(&height.to_be_bytes());
        v.push(8); // bit depth
        v.push(color_type);
        v.push(0);
        v.push(0);
        v.push(0);
        v
    }

    #[test]
    fn rejects_missing_signature()
    {
        let bytes = vec![0u8; 16];
        assert!(PngDecoder::new(&bytes).decode().is_err());
    }

    #[test]
    fn decodes_rgb_image()
    {
        // 2x1 RGB image, pixels (255,0,0), (0,255,0), None filter.
        let raw = [0u8, 255, 0, 0, 0, 255, 0];
        let png = build_png(&ihdr_payload(2, 1, 2), &[], &raw);

        let image = PngDecoder::new(&png).decode().unwrap();
        assert_eq!(image.width, 2);
        assert_eq!(image.height, 1);
        assert_eq!(image.pixels, vec![255, 0, 0, 255, 0, 255, 0, 255]);
    }

    #[test]
    fn decodes_palette_image_with_trns()
    {
        let raw = [0u8, 0]; // filter None, index 0
        let plte = [0xff, 0x00, 0x00];
        let trns = [0x80];
        let png = build_png(
            &ihdr_payload(1, 1, 3),
            &[(&PLTE, &plte), (&TRNS, &trns)],
            &raw
        );

        let image = PngDecoder::new(&png).decode().unwrap();
        assert_eq!(image.pixels, vec![0xff, 0x00, 0x00, 0x80]);
    }

    #[test]
    fn decodes_grayscale_image()
    {
        let raw = [0u8, 0x77];
        let png = build_png(&ihdr_payload(1, 1, 0), &[], &raw);

        let image = PngDecoder::new(&png).decode().unwrap();
        assert_eq!(image.pixels, vec![0x77, 0x77, 0x77, 0xff]);
    }

    #[test]
    fn indexed_image_without_palette_errors()
    {
        let raw = [0u8, 0];
        let png = build_png(&ihdr_payload(1, 1, 3), &[], &raw);
        assert!(PngDecoder::new(&png).decode().is_err());
    }

    #[test]
    fn is_png_does_not_consume_input()
    {
        let png = build_png(&ihdr_payload(1, 1, 0), &[], &[0u8, 1]);
        assert!(PngDecoder::is_png(&png));
        assert!(!PngDecoder::is_png(b"not a png"));
    }
}
