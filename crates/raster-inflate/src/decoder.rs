use crate::bitstream::BitReader;
use crate::constants::{
    fixed_dist_lengths, fixed_litlen_lengths, DIST_BASE, DIST_EXTRA_BITS, LENGTH_BASE,
    LENGTH_EXTRA_BITS, NUM_PRECODE_SYMS, PRECODE_LENS_PERMUTATION
};
use crate::errors::InflateError;
use crate::huffman::HuffmanTable;

const END_OF_BLOCK: u16 = 256;

/// Options controlling how [`DeflateDecoder`] behaves.
#[derive(Debug, Copy, Clone, Default)]
pub struct DeflateOptions
{
    confirm_adler32: bool
}

impl DeflateOptions
{
    /// Whether `decode_zlib` should validate the trailing Adler-32 checksum
    /// against the decompressed output.
    ///
    /// Off by default: the checksum trailer is read and discarded without
    /// being recomputed.
    pub fn set_confirm_adler32(mut self, yes: bool) -> Self
    {
        self.confirm_adler32 = yes;
        self
    }

    pub const fn confirm_adler32(&self) -> bool
    {
        self.confirm_adler32
    }
}

/// A DEFLATE (RFC 1951) / zlib (RFC 1950) decompressor.
///
/// One instance decodes one complete stream; there is no persistent state
/// between calls and a failed decode never yields partial output.
pub struct DeflateDecoder<'a>
{
    data:    &'a [u8],
    options: DeflateOptions
}

impl<'a> DeflateDecoder<'a>
{
    pub fn new(data: &'a [u8]) -> Self
    {
        DeflateDecoder { data, options: DeflateOptions::default() }
    }

    pub fn new_with_options(data: &'a [u8], options: DeflateOptions) -> Self
    {
        DeflateDecoder { data, options }
    }

    /// Decode a zlib-wrapped (RFC 1950) DEFLATE stream.
    pub fn decode_zlib(&mut self) -> Result<Vec<u8>, InflateError>
    {
        let mut reader = BitReader::new(self.data);

        let cm = reader.pop_bits_lsb(4)? as u8;
        let _cinfo = reader.pop_bits_lsb(4)?;
        let _fcheck = reader.pop_bits_lsb(5)?;
        let fdict = reader.pop_bits_lsb(1)?;
        let _flevel = reader.pop_bits_lsb(2)?;

        if cm != 8
        {
            return Err(InflateError::UnsupportedCompressionMethod(cm));
        }

        if fdict == 1
        {
            // Discard the 4-byte preset dictionary id.
            reader.pop_bits_lsb(32)?;
        }

        let out = decode_blocks(&mut reader)?;

        if self.options.confirm_adler32
        {
            reader.align_to_byte();
            let expected = (reader.pop_bits_lsb(32)? as u32).swap_bytes();
            let found = adler32(&out);
            if expected != found
            {
                return Err(InflateError::MismatchedAdler32 { expected, found });
            }
        }

        Ok(out)
    }

    /// Decode a raw (unwrapped) DEFLATE stream.
    pub fn decode_deflate(&mut self) -> Result<Vec<u8>, InflateError>
    {
        let mut reader = BitReader::new(self.data);
        decode_blocks(&mut reader)
    }
}

fn decode_blocks(reader: &mut BitReader) -> Result<Vec<u8>, InflateError>
{
    let mut out = Vec::new();
    loop
    {
        let is_final = reader.pop_bit()?;
        let block_type = reader.pop_bits_lsb(2)?;

        match block_type
        {
            0b00 => copy_stored_block(reader, &mut out)?,
            0b01 =>
            {
                let litlen = HuffmanTable::build(&fixed_litlen_lengths())?;
                let dist = HuffmanTable::build(&fixed_dist_lengths())?;
                decode_symbols(reader, &litlen, &dist, &mut out)?;
            }
            0b10 =>
            {
                let (litlen, dist) = read_dynamic_trees(reader)?;
                decode_symbols(reader, &litlen, &dist, &mut out)?;
            }
            _ => return Err(InflateError::ReservedBlockType)
        }

        if is_final
        {
            break;
        }
    }
    Ok(out)
}

fn copy_stored_block(reader: &mut BitReader, out: &mut Vec<u8>) -> Result<(), InflateError>
{
    reader.align_to_byte();
    let len = reader.pop_bits_lsb(16)? as u16;
    let nlen = reader.pop_bits_lsb(16)? as u16;
    if len != !nlen
    {
        return Err(InflateError::LenNlenMismatch { len, nlen });
    }
    for _ in 0..len
    {
        out.push(reader.pop_bits_lsb(8)? as u8);
    }
    Ok(())
}

fn read_dynamic_trees(reader: &mut BitReader) -> Result<(HuffmanTable, HuffmanTable), InflateError>
{
    let hlit = reader.pop_bits_lsb(5)? as usize + 257;
    let hdist = reader.pop_bits_lsb(5)? as usize + 1;
    let hclen = reader.pop_bits_lsb(4)? as usize + 4;

    let mut precode_lengths = [0u8; NUM_PRECODE_SYMS];
    for i in 0..hclen
    {
        precode_lengths[PRECODE_LENS_PERMUTATION[i] as usize] = reader.pop_bits_lsb(3)? as u8;
    }
    let precode = HuffmanTable::build(&precode_lengths)?;

    let mut lengths = Vec::with_capacity(hlit + hdist);
    while lengths.len() < hlit + hdist
    {
        let symbol = precode.decode_symbol(reader)?;
        match symbol
        {
            0..=15 => lengths.push(symbol as u8),
            16 =>
            {
                let prev = *lengths
                    .last()
                    .ok_or(InflateError::CorruptData("repeat-previous code with no preceding length"))?;
                let repeat = 3 + reader.pop_bits_lsb(2)?;
                for _ in 0..repeat
                {
                    lengths.push(prev);
                }
            }
            17 =>
            {
                let repeat = 3 + reader.pop_bits_lsb(3)?;
                for _ in 0..repeat
                {
                    lengths.push(0);
                }
            }
            18 =>
            {
                let repeat = 11 + reader.pop_bits_lsb(7)?;
                for _ in 0..repeat
                {
                    lengths.push(0);
                }
            }
            _ => return Err(InflateError::CorruptData("invalid precode symbol"))
        }
    }

    if lengths.len() != hlit + hdist
    {
        return Err(InflateError::CorruptData(
            "literal/distance length count overran HLIT+HDIST"
        ));
    }

    let litlen = HuffmanTable::build(&lengths[..hlit])?;
    let dist = HuffmanTable::build(&lengths[hlit..])?;
    Ok((litlen, dist))
}

fn decode_symbols(
    reader: &mut BitReader, litlen: &HuffmanTable, dist: &HuffmanTable, out: &mut Vec<u8>
) -> Result<(), InflateError>
{
    loop
    {
        let symbol = litlen.decode_symbol(reader)?;
        if symbol == END_OF_BLOCK
        {
            return Ok(());
        }
        if symbol < END_OF_BLOCK
        {
            out.push(symbol as u8);
            continue;
        }

        let length = length_from_symbol(symbol, reader)?;
        let dist_symbol = dist.decode_symbol(reader)?;
        let offset = offset_from_symbol(dist_symbol, reader)?;

        if offset > out.len()
        {
            return Err(InflateError::BackReferenceOutOfRange { offset, available: out.len() });
        }

        // Overlapping offset < length runs require copying one byte at a
        // time: a bulk slice copy would read bytes that haven't been
        // written yet.
        let start = out.len() - offset;
        for i in 0..length
        {
            let byte = out[start + i];
            out.push(byte);
        }
    }
}

fn length_from_symbol(symbol: u16, reader: &mut BitReader) -> Result<usize, InflateError>
{
    if !(257..=285).contains(&symbol)
    {
        return Err(InflateError::CorruptData("length symbol out of range"));
    }
    if symbol == 285
    {
        return Ok(258);
    }
    let idx = (symbol - 257) as usize;
    let extra = reader.pop_bits_lsb(LENGTH_EXTRA_BITS[idx] as u32)? as usize;
    Ok(LENGTH_BASE[idx] as usize + extra)
}

fn offset_from_symbol(symbol: u16, reader: &mut BitReader) -> Result<usize, InflateError>
{
    let idx = symbol as usize;
    if idx >= DIST_BASE.len()
    {
        return Err(InflateError::CorruptData("distance symbol out of range"));
    }
    let extra = reader.pop_bits_lsb(DIST_EXTRA_BITS[idx] as u32)? as usize;
    Ok(DIST_BASE[idx] as usize + extra)
}

#[cfg(feature = "zlib")]
fn adler32(data: &[u8]) -> u32
{
    simd_adler32::adler32(data)
}

#[cfg(not(feature = "zlib"))]
fn adler32(_data: &[u8]) -> u32
{
    0
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn stored_block_round_trips()
    {
        // BFINAL=1, BTYPE=00 (stored), packed LSB-first into one byte: 0b001
        let mut bytes = vec![0b0000_0001u8];
        bytes.extend_from_slice(&3u16.to_le_bytes());
        bytes.extend_from_slice(&(!3u16).to_le_bytes());
        bytes.extend_from_slice(b"abc");

        let mut decoder = DeflateDecoder::new(&bytes);
        let out = decoder.decode_deflate().unwrap();
        assert_eq!(out, b"abc");
    }

    #[test]
    fn stored_block_len_nlen_mismatch_errors()
    {
        let mut bytes = vec![0b0000_0001u8];
        bytes.extend_from_slice(&3u16.to_le_bytes());
        bytes.extend_from_slice(&3u16.to_le_bytes()); // should be !3
        bytes.extend_from_slice(b"abc");

        let mut decoder = DeflateDecoder::new(&bytes);
        assert!(decoder.decode_deflate().is_err());
    }

    #[test]
    fn length_257_is_three_with_no_extra_bits()
    {
        let data = [0u8];
        let mut r = BitReader::new(&data);
        assert_eq!(length_from_symbol(257, &mut r).unwrap(), 3);
    }

    #[test]
    fn length_285_is_258()
    {
        let data = [0u8];
        let mut r = BitReader::new(&data);
        assert_eq!(length_from_symbol(285, &mut r).unwrap(), 258);
    }

    #[test]
    fn offset_zero_symbol_is_one()
    {
        let data = [0u8];
        let mut r = BitReader::new(&data);
        assert_eq!(offset_from_symbol(0, &mut r).unwrap(), 1);
    }

    #[test]
    fn zlib_stored_block_decodes_hello()
    {
        let bytes = [
            0x78, 0x01, 0x01, 0x05, 0x00, 0xFA, 0xFF, 0x48, 0x65, 0x6C, 0x6C, 0x6F, 0x05, 0x06,
            0x01, 0xC5
        ];
        let mut decoder = DeflateDecoder::new(&bytes);
        assert_eq!(decoder.decode_zlib().unwrap(), b"Hello");
    }

    #[test]
    fn zlib_fixed_huffman_empty_block_decodes_to_nothing()
    {
        let bytes = [0x78, 0x01, 0x03, 0x00, 0x00, 0x00, 0x00, 0x01];
        let mut decoder = DeflateDecoder::new(&bytes);
        assert_eq!(decoder.decode_zlib().unwrap(), Vec::<u8>::new());
    }
}
