//! BMP format code (internal).
//!
//! Use the top-level [`crate::encode_indexed`], [`crate::save_indexed`],
//! [`crate::decode_rgb24`], etc.

mod decode;
mod encode;

pub use decode::BmpInfo;
pub use encode::{BmpLayout, HEADER_SIZE};

use crate::decode::DecodedBitmap;
use crate::error::BitmapError;
use crate::image::IndexedImage;
use crate::limits::Limits;
use crate::palette::Palette;
use crate::sink::ByteSink;
use enough::Stop;

/// Decode a 24-bit BMP into top-down RGB.
pub(crate) fn decode_rgb24(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<DecodedBitmap, BitmapError> {
    let info = decode::parse_bmp_header(data)?;
    if let Some(limits) = limits {
        limits.check(info.width, info.height)?;
        let out_bytes = (info.width as usize)
            .saturating_mul(info.height as usize)
            .saturating_mul(3);
        limits.check_output_buffer(out_bytes)?;
    }
    stop.check()?;
    let pixels = decode::decode_rgb24_pixels(data, &info, stop)?;
    Ok(DecodedBitmap::new(pixels, info))
}

/// Encode an indexed image to BMP.
pub(crate) fn encode<I, P, S>(
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
    encode::encode_indexed(image, palette, sink, limits, stop)
}

/// Validate an encode without writing anything.
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
    encode::prepare(image, palette, limits, stop)
}

/// Write a BMP whose input already passed [`prepare`].
pub(crate) fn write<I, P, S>(
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
    encode::write_indexed(image, palette, layout, sink, stop)
}
