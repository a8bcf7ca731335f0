use alloc::vec::Vec;

#[cfg(feature = "rgb")]
use rgb::AsPixels as _;

use enough::Stop;

use crate::bmp::BmpInfo;
use crate::error::BitmapError;
use crate::limits::Limits;

/// A 24-bit BMP read back as top-down, tightly packed RGB bytes.
#[derive(Clone, Debug)]
pub struct DecodedBitmap {
    pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub info: BmpInfo,
}

impl DecodedBitmap {
    pub(crate) fn new(pixels: Vec<u8>, info: BmpInfo) -> Self {
        Self {
            pixels,
            width: info.width,
            height: info.height,
            info,
        }
    }

    /// RGB bytes, row 0 first.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// `[r, g, b]` at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let off = (y as usize * self.width as usize + x as usize) * 3;
        Some([self.pixels[off], self.pixels[off + 1], self.pixels[off + 2]])
    }

    /// Reinterpret pixel data as typed RGB pixels.
    #[cfg(feature = "rgb")]
    pub fn as_pixels(&self) -> &[rgb::RGB8] {
        self.pixels().as_pixels()
    }

    /// Zero-copy view as an [`imgref::ImgRef`].
    #[cfg(feature = "imgref")]
    pub fn as_imgref(&self) -> imgref::ImgRef<'_, rgb::RGB8> {
        imgref::ImgRef::new(self.as_pixels(), self.width as usize, self.height as usize)
    }

    /// Copy into an [`imgref::ImgVec`].
    #[cfg(feature = "imgref")]
    pub fn to_imgvec(&self) -> imgref::ImgVec<rgb::RGB8> {
        imgref::ImgVec::new(
            self.as_pixels().to_vec(),
            self.width as usize,
            self.height as usize,
        )
    }
}

/// Builder for reading a BMP back.
#[derive(Clone, Debug)]
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    limits: Option<&'a Limits>,
}

impl<'a> DecodeRequest<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, limits: None }
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Parse headers only.
    pub fn info(&self) -> Result<BmpInfo, BitmapError> {
        BmpInfo::from_bytes(self.data)
    }

    /// Decode an uncompressed 24-bit BMP to top-down RGB.
    pub fn decode(self, stop: impl Stop) -> Result<DecodedBitmap, BitmapError> {
        crate::bmp::decode_rgb24(self.data, self.limits, &stop)
    }
}

/// Decode an uncompressed 24-bit BMP to top-down RGB with no limits.
pub fn decode_rgb24(data: &[u8], stop: impl Stop) -> Result<DecodedBitmap, BitmapError> {
    DecodeRequest::new(data).decode(stop)
}
