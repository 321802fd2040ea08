#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ColorSpace
{
    Rgb,
    Rgba,
    Luma,
    LumaA
}

impl ColorSpace
{
    /// Number of channels a pixel in this colorspace carries.
    pub const fn num_components(&self) -> usize
    {
        match self
        {
            Self::Rgb => 3,
            Self::Rgba => 4,
            Self::Luma => 1,
            Self::LumaA => 2
        }
    }
}
