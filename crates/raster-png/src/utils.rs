//! Color-mode conversion: turning decoded-and-unfiltered scanline bytes
//! into the final width*height*4 RGBA raster (spec §4.G).

/// Expand indexed (color_type 3) pixel bytes into RGBA, consulting the
/// palette for color and the transparency table for alpha.
///
/// `indices` holds one byte per pixel. `palette` is the parsed PLTE table;
/// `trns` is the parsed tRNS table (may be shorter than `palette`, or empty).
pub fn expand_palette(indices: &[u8], palette: &[[u8; 3]], trns: &[u8]) -> Vec<u8>
{
    let mut out = Vec::with_capacity(indices.len() * 4);
    for &idx in indices
    {
        let entry = palette[idx as usize];
        let alpha = trns.get(idx as usize).copied().unwrap_or(255);
        out.extend_from_slice(&[entry[0], entry[1], entry[2], alpha]);
    }
    out
}

/// Expand grayscale (color_type 0) pixel bytes into RGBA: replicate the
/// single channel into R, G, B and set alpha to fully opaque.
pub fn expand_gray(samples: &[u8]) -> Vec<u8>
{
    let mut out = Vec::with_capacity(samples.len() * 4);
    for &g in samples
    {
        out.extend_from_slice(&[g, g, g, 255]);
    }
    out
}

/// Expand gray+alpha (color_type 4) pixel bytes into RGBA: replicate the
/// gray channel into R, G, B and carry the alpha channel through.
pub fn expand_gray_alpha(samples: &[u8]) -> Vec<u8>
{
    let mut out = Vec::with_capacity(samples.len() * 2);
    for pair in samples.chunks_exact(2)
    {
        out.extend_from_slice(&[pair[0], pair[0], pair[0], pair[1]]);
    }
    out
}

/// Expand RGB (color_type 2) pixel bytes into RGBA: copy R,G,B verbatim
/// and set alpha to fully opaque.
pub fn expand_rgb(samples: &[u8]) -> Vec<u8>
{
    let mut out = Vec::with_capacity(samples.len() / 3 * 4);
    for rgb in samples.chunks_exact(3)
    {
        out.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
    }
    out
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn palette_with_trns_expands_to_rgba()
    {
        let palette = [[0xff, 0x00, 0x00]];
        let trns = [0x80];
        let out = expand_palette(&[0], &palette, &trns);
        assert_eq!(out, vec![0xff, 0x00, 0x00, 0x80]);
    }

    #[test]
    fn palette_without_trns_is_opaque()
    {
        let palette = [[0xff, 0x00, 0x00]];
        let out = expand_palette(&[0], &palette, &[]);
        assert_eq!(out, vec![0xff, 0x00, 0x00, 255]);
    }

    #[test]
    fn gray_replicates_into_rgb()
    {
        assert_eq!(expand_gray(&[0x77]), vec![0x77, 0x77, 0x77, 255]);
    }

    #[test]
    fn rgb_gets_opaque_alpha()
    {
        assert_eq!(expand_rgb(&[255, 0, 0, 0, 255, 0]), vec![255, 0, 0, 255, 0, 255, 0, 255]);
    }
}
