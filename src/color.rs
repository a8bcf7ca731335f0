//! RGB565 palette entries in the byte-swapped order display hardware keeps them in.

/// A palette color: RGB565 with its high and low bytes exchanged.
///
/// Display controllers that take RGB565 over a byte-wide bus want the low
/// byte first, so palettes destined for them store every entry pre-swapped.
/// Unswapping is the first step of every conversion here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct SwappedRgb565(u16);

impl SwappedRgb565 {
    /// Wrap a raw palette word exactly as stored.
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// The raw palette word exactly as stored.
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Pack a `0xRRGGBB` color, keeping the top 5/6/5 bits of each channel.
    pub const fn from_rgb888(rgb: u32) -> Self {
        let r = (rgb >> 16) & 0xFF;
        let g = (rgb >> 8) & 0xFF;
        let b = rgb & 0xFF;
        let packed = ((r & 0xF8) << 8) | ((g & 0xFC) << 3) | (b >> 3);
        Self((packed as u16).swap_bytes())
    }

    /// Native-order RGB565 (red in the top five bits).
    pub const fn to_rgb565(self) -> u16 {
        self.0.swap_bytes()
    }

    /// The three bytes a 24-bit BMP stores for this color, in file order.
    ///
    /// Each channel lands in the high bits of its byte; the low bits stay
    /// zero (no bit replication).
    pub const fn to_bgr(self) -> [u8; 3] {
        let c = self.to_rgb565();
        let blue = (c << 3) & 0xF8;
        let green = (c >> 3) & 0xFC;
        let red = (c >> 8) & 0xF8;
        [blue as u8, green as u8, red as u8]
    }

    /// Same expansion as [`to_bgr`](Self::to_bgr), as a typed RGB pixel.
    #[cfg(feature = "rgb")]
    pub fn to_rgb8(self) -> rgb::RGB8 {
        let [b, g, r] = self.to_bgr();
        rgb::RGB8::new(r, g, b)
    }
}

impl From<u16> for SwappedRgb565 {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl From<SwappedRgb565> for u16 {
    fn from(c: SwappedRgb565) -> Self {
        c.0
    }
}
