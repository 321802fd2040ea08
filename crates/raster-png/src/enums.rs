/// PNG `IHDR.color_type` values this decoder accepts.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PngColor
{
    Gray,
    Rgb,
    Indexed,
    GrayAlpha,
    Rgba
}

impl PngColor
{
    /// Parse a raw `color_type` byte, or `None` if this decoder doesn't
    /// support it.
    pub const fn from_int(value: u8) -> Option<Self>
    {
        match value
        {
            0 => Some(Self::Gray),
            2 => Some(Self::Rgb),
            3 => Some(Self::Indexed),
            4 => Some(Self::GrayAlpha),
            6 => Some(Self::Rgba),
            _ => None
        }
    }

    /// Number of channels a raw (pre-RGBA-conversion) pixel carries.
    pub const fn channels(&self) -> usize
    {
        match self
        {
            Self::Gray | Self::Indexed => 1,
            Self::GrayAlpha => 2,
            Self::Rgb => 3,
            Self::Rgba => 4
        }
    }
}

/// Per-scanline filter type byte, PNG spec §6.2.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FilterType
{
    None,
    Sub,
    Up,
    Average,
    Paeth
}

impl FilterType
{
    pub const fn from_int(value: u8) -> Option<Self>
    {
        match value
        {
            0 => Some(Self::None),
            1 => Some(Self::Sub),
            2 => Some(Self::Up),
            3 => Some(Self::Average),
            4 => Some(Self::Paeth),
            _ => None
        }
    }
}
