//! Scanline de-filtering: the inverse of PNG's None/Sub/Up/Average/Paeth
//! per-row transforms (spec §6.2).
//!
//! Each function reconstructs one row in place given the row immediately
//! above it (all zero for the first row) and `bpp`, the number of bytes
//! between a byte and its "left" neighbor for this color type/depth.

use crate::enums::FilterType;
use crate::error::PngError;

pub fn paeth(a: u8, b: u8, c: u8) -> u8
{
    let (a, b, c) = (i32::from(a), i32::from(b), i32::from(c));
    let p = a + b - c;
    let pa = (p - a).abs();
    let pb = (p - b).abs();
    let pc = (p - c).abs();

    if pa <= pb && pa <= pc
    {
        a as u8
    }
    else if pb <= pc
    {
        b as u8
    }
    else
    {
        c as u8
    }
}

fn handle_sub(current: &mut [u8], bpp: usize)
{
    for i in bpp..current.len()
    {
        current[i] = current[i].wrapping_add(current[i - bpp]);
    }
}

fn handle_up(prev: &[u8], current: &mut [u8])
{
    for i in 0..current.len()
    {
        current[i] = current[i].wrapping_add(prev[i]);
    }
}

fn handle_average(prev: &[u8], current: &mut [u8], bpp: usize)
{
    for i in 0..current.len()
    {
        let left = if i >= bpp { u16::from(current[i - bpp]) } else { 0 };
        let up = u16::from(prev[i]);
        let avg = ((left + up) / 2) as u8;
        current[i] = current[i].wrapping_add(avg);
    }
}

fn handle_average_first(current: &mut [u8], bpp: usize)
{
    for i in 0..current.len()
    {
        let left = if i >= bpp { u16::from(current[i - bpp]) } else { 0 };
        let avg = (left / 2) as u8;
        current[i] = current[i].wrapping_add(avg);
    }
}

fn handle_paeth(prev: &[u8], current: &mut [u8], bpp: usize)
{
    for i in 0..current.len()
    {
        let left = if i >= bpp { current[i - bpp] } else { 0 };
        let up = prev[i];
        let up_left = if i >= bpp { prev[i - bpp] } else { 0 };
        current[i] = current[i].wrapping_add(paeth(left, up, up_left));
    }
}

fn handle_paeth_first(current: &mut [u8], bpp: usize)
{
    for i in 0..current.len()
    {
        let left = if i >= bpp { current[i - bpp] } else { 0 };
        current[i] = current[i].wrapping_add(paeth(left, 0, 0));
    }
}

/// De-filter one scanline in place.
///
/// `current` holds the filtered bytes (the filter-type byte already
/// stripped) for row `y`; `prev` is the *reconstructed* previous row, or an
/// all-zero slice of the same length when `y == 0`.
pub fn reconstruct_scanline(
    filter: u8, prev: &[u8], current: &mut [u8], bpp: usize, is_first_row: bool
) -> Result<(), PngError>
{
    let filter_type = FilterType::from_int(filter).ok_or(PngError::FilterError(filter))?;

    match (filter_type, is_first_row)
    {
        (FilterType::None, _) =>
        {}
        (FilterType::Sub, _) => handle_sub(current, bpp),
        (FilterType::Up, true) =>
        {} // Up degenerates to None on the first row: prev is all zero.
        (FilterType::Up, false) => handle_up(prev, current),
        (FilterType::Average, true) => handle_average_first(current, bpp),
        (FilterType::Average, false) => handle_average(prev, current, bpp),
        (FilterType::Paeth, true) => handle_paeth_first(current, bpp),
        (FilterType::Paeth, false) => handle_paeth(prev, current, bpp)
    }

    Ok(())
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn paeth_tie_break_favors_a_then_b_then_c()
    {
        // p = 10+20-15 = 15; pa=5, pb=5, pc=0 -> c wins (15)
        assert_eq!(paeth(10, 20, 15), 15);
        // p = 10+20-10 = 20; pa=10, pb=0, pc=10 -> b wins
        assert_eq!(paeth(10, 20, 10), 20);
        // pa==pb==pc
        assert_eq!(paeth(5, 5, 5), 5);
    }

    #[test]
    fn sub_filter_inverts_correctly()
    {
        // raw row [10, 20, 30] with bpp=1, filtered as Sub:
        // filt[0]=10, filt[1]=20-10=10, filt[2]=30-20=10
        let mut row = vec![10u8, 10, 10];
        handle_sub(&mut row, 1);
        assert_eq!(row, vec![10, 20, 30]);
    }

    #[test]
    fn up_filter_on_first_row_is_identity()
    {
        let zero = vec![0u8; 3];
        let mut row = vec![5u8, 6, 7];
        let expected = row.clone();
        reconstruct_scanline(2, &zero, &mut row, 1, true).unwrap();
        assert_eq!(row, expected);
    }

    #[test]
    fn unknown_filter_byte_errors()
    {
        let zero = vec![0u8; 1];
        let mut row = vec![0u8; 1];
        assert!(reconstruct_scanline(5, &zero, &mut row, 1, true).is_err());
    }
}
