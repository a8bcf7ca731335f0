//! BMP header parser and uncompressed 24-bit reader.
//!
//! Reads back what the encoder writes (and other plain 24-bit
//! BITMAPINFOHEADER files); paletted, bitfield, and RLE variants are
//! reported as unsupported.

use alloc::format;
use alloc::vec;
use alloc::vec::Vec;

use enough::Stop;

use crate::error::BitmapError;

// ── Cursor for reading from &[u8] ───────────────────────────────────

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn read_fixed_bytes<const N: usize>(&mut self) -> Result<[u8; N], BitmapError> {
        let end = self.pos.checked_add(N).ok_or(BitmapError::UnexpectedEof)?;
        let bytes = self
            .data
            .get(self.pos..end)
            .ok_or(BitmapError::UnexpectedEof)?;
        self.pos = end;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    fn get_u16_le(&mut self) -> Result<u16, BitmapError> {
        self.read_fixed_bytes().map(u16::from_le_bytes)
    }

    fn get_u32_le(&mut self) -> Result<u32, BitmapError> {
        self.read_fixed_bytes().map(u32::from_le_bytes)
    }

    fn get_i32_le(&mut self) -> Result<i32, BitmapError> {
        self.read_fixed_bytes().map(i32::from_le_bytes)
    }
}

/// Header fields of a BMP file with a BITMAPINFOHEADER-compatible DIB header.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct BmpInfo {
    pub file_size: u32,
    pub data_offset: u32,
    /// DIB header size: 40 for BITMAPINFOHEADER, larger for V2–V5.
    pub header_size: u32,
    pub width: u32,
    pub height: u32,
    /// Rows stored top row first (negative height field).
    pub top_down: bool,
    pub planes: u16,
    pub bits_per_pixel: u16,
    pub compression: u32,
    pub image_size: u32,
    pub colors_used: u32,
}

impl BmpInfo {
    /// Parse the file header and DIB header.
    pub fn from_bytes(data: &[u8]) -> Result<Self, BitmapError> {
        parse_bmp_header(data)
    }

    pub fn is_bottom_up(&self) -> bool {
        !self.top_down
    }

    /// Bytes per stored row, padded to 4 bytes.
    pub fn stride(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(usize::from(self.bits_per_pixel))?
            .checked_add(31)
            .map(|bits| bits / 32 * 4)
    }
}

pub(crate) fn parse_bmp_header(data: &[u8]) -> Result<BmpInfo, BitmapError> {
    let mut cursor = Cursor::new(data);
    let magic: [u8; 2] = cursor
        .read_fixed_bytes()
        .map_err(|_| BitmapError::UnrecognizedFormat)?;
    if &magic != b"BM" {
        return Err(BitmapError::UnrecognizedFormat);
    }
    let file_size = cursor.get_u32_le()?;
    let _reserved: [u8; 4] = cursor.read_fixed_bytes()?;
    let data_offset = cursor.get_u32_le()?;

    let header_size = cursor.get_u32_le()?;
    match header_size {
        40 | 52 | 56 | 108 | 124 => {}
        12 | 16 | 64 => {
            return Err(BitmapError::UnsupportedVariant(format!(
                "OS/2 DIB header ({header_size} bytes)"
            )));
        }
        _ => {
            return Err(BitmapError::InvalidHeader(format!(
                "invalid DIB header size {header_size}"
            )));
        }
    }

    let width = cursor.get_i32_le()?;
    let height = cursor.get_i32_le()?;
    if width <= 0 {
        return Err(BitmapError::InvalidHeader(format!(
            "BMP width must be positive, got {width}"
        )));
    }
    if height == 0 {
        return Err(BitmapError::InvalidHeader("BMP height is zero".into()));
    }
    if height == i32::MIN {
        return Err(BitmapError::InvalidHeader("BMP height out of range".into()));
    }
    let planes = cursor.get_u16_le()?;
    let bits_per_pixel = cursor.get_u16_le()?;
    let compression = cursor.get_u32_le()?;
    let image_size = cursor.get_u32_le()?;
    let _x_ppm = cursor.get_i32_le()?;
    let _y_ppm = cursor.get_i32_le()?;
    let colors_used = cursor.get_u32_le()?;
    let _important_colors = cursor.get_u32_le()?;

    Ok(BmpInfo {
        file_size,
        data_offset,
        header_size,
        width: width as u32,
        height: height.unsigned_abs(),
        top_down: height < 0,
        planes,
        bits_per_pixel,
        compression,
        image_size,
        colors_used,
    })
}

/// Read the pixel rows of a plain 24-bit BMP as top-down RGB.
pub(crate) fn decode_rgb24_pixels(
    data: &[u8],
    info: &BmpInfo,
    stop: &dyn Stop,
) -> Result<Vec<u8>, BitmapError> {
    if info.planes != 1 {
        return Err(BitmapError::InvalidHeader(format!(
            "BMP plane count must be 1, got {}",
            info.planes
        )));
    }
    if info.bits_per_pixel != 24 {
        return Err(BitmapError::UnsupportedVariant(format!(
            "{}-bit BMP (only 24-bit is read)",
            info.bits_per_pixel
        )));
    }
    if info.compression != 0 {
        return Err(BitmapError::UnsupportedVariant(format!(
            "compressed BMP (compression {})",
            info.compression
        )));
    }

    let (width, height) = (info.width, info.height);
    let w = width as usize;
    let h = height as usize;
    let row_bytes = w
        .checked_mul(3)
        .ok_or(BitmapError::DimensionsTooLarge { width, height })?;
    let stride = info
        .stride()
        .ok_or(BitmapError::DimensionsTooLarge { width, height })?;
    let out_size = row_bytes
        .checked_mul(h)
        .ok_or(BitmapError::DimensionsTooLarge { width, height })?;

    // The last stored row may omit its padding.
    let offset = info.data_offset as usize;
    let needed = stride
        .checked_mul(h - 1)
        .and_then(|n| n.checked_add(row_bytes))
        .and_then(|n| n.checked_add(offset))
        .ok_or(BitmapError::DimensionsTooLarge { width, height })?;
    if data.len() < needed {
        return Err(BitmapError::UnexpectedEof);
    }
    let pixel_data = &data[offset..];

    let mut out = vec![0u8; out_size];
    for (out_y, dst) in out.chunks_exact_mut(row_bytes).enumerate() {
        if out_y % 16 == 0 {
            stop.check()?;
        }
        let src_y = if info.top_down { out_y } else { h - 1 - out_y };
        let src = &pixel_data[src_y * stride..src_y * stride + row_bytes];
        for (d, s) in dst.chunks_exact_mut(3).zip(src.chunks_exact(3)) {
            d[0] = s[2];
            d[1] = s[1];
            d[2] = s[0];
        }
    }
    Ok(out)
}
