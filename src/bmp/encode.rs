//! BMP encoder: palette-indexed RGB565 source to uncompressed 24-bit BMP.

use alloc::format;
use alloc::vec;
use enough::Stop;

use crate::color::SwappedRgb565;
use crate::error::BitmapError;
use crate::image::IndexedImage;
use crate::limits::Limits;
use crate::palette::Palette;
use crate::sink::ByteSink;

/// Size of the file header plus the BITMAPINFOHEADER.
pub const HEADER_SIZE: usize = 54;

const FILE_HEADER_SIZE: usize = 14;
const INFO_HEADER_SIZE: u32 = 40;
const BITS_PER_PIXEL: u16 = 24;

/// Byte layout of a 24-bit BMP for given dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BmpLayout {
    pub width: u32,
    pub height: u32,
    /// Zero bytes appended to each row.
    pub padding: usize,
    /// Bytes per row including padding; always a multiple of 4.
    pub stride: usize,
    pub pixel_data_size: usize,
    pub file_size: usize,
}

impl BmpLayout {
    /// Compute the layout, rejecting zero dimensions and sizes the
    /// header fields cannot represent.
    pub fn new(width: u32, height: u32) -> Result<Self, BitmapError> {
        if width == 0 || height == 0 {
            return Err(BitmapError::InvalidInput(format!(
                "image dimensions must be non-zero, got {width}x{height}"
            )));
        }
        if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
            return Err(BitmapError::DimensionsTooLarge { width, height });
        }
        let too_large = BitmapError::DimensionsTooLarge { width, height };
        let unpadded = (width as usize).checked_mul(3).ok_or(too_large)?;
        let padding = (4 - unpadded % 4) % 4;
        let stride = unpadded
            .checked_add(padding)
            .ok_or(BitmapError::DimensionsTooLarge { width, height })?;
        let pixel_data_size = stride
            .checked_mul(height as usize)
            .ok_or(BitmapError::DimensionsTooLarge { width, height })?;
        let file_size = pixel_data_size
            .checked_add(HEADER_SIZE)
            .filter(|&size| u32::try_from(size).is_ok())
            .ok_or(BitmapError::DimensionsTooLarge { width, height })?;
        Ok(Self {
            width,
            height,
            padding,
            stride,
            pixel_data_size,
            file_size,
        })
    }

    /// Pixel bytes per row, without padding.
    pub fn row_bytes(&self) -> usize {
        self.stride - self.padding
    }
}

/// Serialize the file header and BITMAPINFOHEADER.
pub(crate) fn write_headers(layout: &BmpLayout) -> [u8; HEADER_SIZE] {
    let mut out = [0u8; HEADER_SIZE];

    // File header (14 bytes)
    out[0..2].copy_from_slice(b"BM");
    out[2..6].copy_from_slice(&(layout.file_size as u32).to_le_bytes());
    // 6..10: two reserved u16, zero
    out[10..14].copy_from_slice(&(HEADER_SIZE as u32).to_le_bytes()); // data offset

    // DIB header (BITMAPINFOHEADER, 40 bytes)
    let dib = &mut out[FILE_HEADER_SIZE..];
    dib[0..4].copy_from_slice(&INFO_HEADER_SIZE.to_le_bytes());
    dib[4..8].copy_from_slice(&(layout.width as i32).to_le_bytes());
    dib[8..12].copy_from_slice(&(layout.height as i32).to_le_bytes()); // positive = bottom-up
    dib[12..14].copy_from_slice(&1u16.to_le_bytes()); // planes
    dib[14..16].copy_from_slice(&BITS_PER_PIXEL.to_le_bytes());
    // 16..40: compression, image size (0 = infer), resolution x/y,
    // colors used, important colors; all zero

    out
}

/// Fail before any output if a pixel refers past the end of the palette.
fn validate_indices<I, P>(image: &I, palette: &P, stop: &dyn Stop) -> Result<(), BitmapError>
where
    I: IndexedImage + ?Sized,
    P: Palette + ?Sized,
{
    let palette_len = palette.len();
    for y in 0..image.height() {
        if y % 16 == 0 {
            stop.check()?;
        }
        for x in 0..image.width() {
            let index = image.index(x, y);
            if index >= palette_len {
                return Err(BitmapError::IndexOutOfRange {
                    x,
                    y,
                    index,
                    palette_len,
                });
            }
        }
    }
    Ok(())
}

/// Check everything that can fail without touching a sink: dimensions,
/// palette, limits, cancellation, and every pixel index.
///
/// Path-based saves run this before creating the file, so rejected input
/// leaves an existing file untouched.
pub(crate) fn prepare<I, P>(
    image: &I,
    palette: &P,
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<BmpLayout, BitmapError>
where
    I: IndexedImage + ?Sized,
    P: Palette + ?Sized,
{
    let layout = BmpLayout::new(image.width(), image.height())?;
    if palette.is_empty() {
        return Err(BitmapError::InvalidInput("palette has no colors".into()));
    }
    if let Some(limits) = limits {
        limits.check(layout.width, layout.height)?;
        limits.check_row_buffer(layout.stride)?;
    }
    log::debug!(
        "encoding {}x{} indexed image ({} colors): stride {}, padding {}, {} bytes",
        layout.width,
        layout.height,
        palette.len(),
        layout.stride,
        layout.padding,
        layout.file_size
    );

    stop.check()?;
    validate_indices(image, palette, stop)?;
    Ok(layout)
}

/// Emit headers then rows from the bottom of the image up, for a `layout`
/// returned by [`prepare`]. The sink is flushed but left open.
pub(crate) fn write_indexed<I, P, S>(
    image: &I,
    palette: &P,
    layout: &BmpLayout,
    sink: &mut S,
    stop: &dyn Stop,
) -> Result<(), BitmapError>
where
    I: IndexedImage + ?Sized,
    P: Palette + ?Sized,
    S: ByteSink + ?Sized,
{
    sink.reserve_hint(layout.file_size)?;
    sink.write_all_bytes(&write_headers(layout))?;

    let palette_len = palette.len();
    let row_bytes = layout.row_bytes();
    let mut row = vec![0u8; layout.stride];
    for y in (0..layout.height).rev() {
        if y % 16 == 0 {
            stop.check()?;
            log::trace!("row {y} of {}", layout.height);
        }
        for (x, px) in (0..layout.width).zip(row[..row_bytes].chunks_exact_mut(3)) {
            let index = image.index(x, y);
            let raw = palette
                .color(index)
                .ok_or(BitmapError::IndexOutOfRange {
                    x,
                    y,
                    index,
                    palette_len,
                })?;
            px.copy_from_slice(&SwappedRgb565::from_raw(raw).to_bgr());
        }
        // padding bytes past row_bytes are never written and stay zero
        sink.write_all_bytes(&row)?;
    }

    sink.flush_bytes()?;
    Ok(())
}

/// Validate, then encode `image` through `palette` into `sink`.
pub(crate) fn encode_indexed<I, P, S>(
    image: &I,
    palette: &P,
    sink: &mut S,
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<BmpLayout, BitmapError>
where
    I: IndexedImage + ?Sized,
    P: Palette + ?Sized,
    S: ByteSink + ?Sized,
{
    let layout = prepare(image, palette, limits, stop)?;
    write_indexed(image, palette, &layout, sink, stop)?;
    Ok(layout)
}
