/// Options shared by every decoder in this workspace.
///
/// Not all options are respected by every decoder; each field documents
/// which ones honor it. Fields are public so callers don't need a forest of
/// getters for plain data.
#[derive(Debug, Copy, Clone)]
pub struct DecoderOptions
{
    /// Decoders refuse to decode an image wider than this.
    ///
    /// - Default: 16384
    pub max_width:  usize,
    /// Decoders refuse to decode an image taller than this.
    ///
    /// - Default: 16384
    pub max_height: usize,
    /// Treat recoverable non-conformance as an error instead of proceeding.
    ///
    /// Currently this is the one knob that decides whether
    /// `raster-inflate` confirms the Adler-32 trailer on a zlib stream.
    ///
    /// - Default: false
    pub strict_mode: bool
}

impl DecoderOptions
{
    /// Options with every conformance check enabled, at the cost of having
    /// to scan the whole output to confirm the Adler-32 trailer.
    pub fn new_safe() -> DecoderOptions
    {
        DecoderOptions::default().set_strict_mode(true)
    }

    /// Get the maximum width decoders configured with these options will accept.
    pub const fn get_max_width(&self) -> usize
    {
        self.max_width
    }

    /// Get the maximum height decoders configured with these options will accept.
    pub const fn get_max_height(&self) -> usize
    {
        self.max_height
    }

    /// Set the maximum width decoders configured with these options will accept.
    pub fn set_max_width(mut self, width: usize) -> Self
    {
        self.max_width = width;
        self
    }

    /// Set the maximum height decoders configured with these options will accept.
    pub fn set_max_height(mut self, height: usize) -> Self
    {
        self.max_height = height;
        self
    }

    /// Whether strict mode (reject anything non-conformant) is on.
    pub const fn get_strict_mode(&self) -> bool
    {
        self.strict_mode
    }

    /// Set whether strict mode is on.
    pub fn set_strict_mode(mut self, yes: bool) -> Self
    {
        self.strict_mode = yes;
        self
    }
}

impl Default for DecoderOptions
{
    fn default() -> Self
    {
        Self {
            max_width:   1 << 14,
            max_height:  1 << 14,
            strict_mode: false
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn default_does_not_confirm_adler()
    {
        assert!(!DecoderOptions::default().get_strict_mode());
    }

    #[test]
    fn new_safe_confirms_adler()
    {
        assert!(DecoderOptions::new_safe().get_strict_mode());
    }

    #[test]
    fn builder_round_trips()
    {
        let opts = DecoderOptions::default()
            .set_max_width(100)
            .set_strict_mode(false);

        assert_eq!(opts.get_max_width(), 100);
        assert!(!opts.get_strict_mode());
    }
}
