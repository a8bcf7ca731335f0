//! # palbmp
//!
//! Save palette-indexed images with RGB565 palettes as uncompressed 24-bit BMP.
//!
//! An indexed image is a grid of small integers; each one selects an entry in
//! a palette of 16-bit colors. Those palette words are RGB565 with their two
//! bytes exchanged, the order display hardware on small boards keeps them in.
//! The encoder unswaps each color, expands it to 8 bits per channel, and
//! writes a standard BMP: 14-byte file header, 40-byte BITMAPINFOHEADER, then
//! rows bottom-up in BGR order, each padded to a multiple of 4 bytes.
//!
//! ## Input
//!
//! Anything implementing [`IndexedImage`] and [`Palette`]. [`IndexedBitmap`]
//! is an owned grid; palettes can be `[u16]`, `Vec<u16>`, or
//! [`SwappedRgb565`] collections. With the `imgref` feature, `ImgRef<u8>` and
//! `ImgRef<u16>` grids work directly.
//!
//! ## Output
//!
//! - [`encode_indexed`] writes to any [`ByteSink`] the caller owns.
//! - [`encode_indexed_to_vec`] returns the file bytes.
//! - [`save_indexed`] (`std`) creates the file and always closes it.
//!
//! Every pixel index is checked against the palette before the first byte is
//! written, so a bad index never leaves a partial file behind. [`save_indexed`]
//! runs all input checks before it opens the path, so rejected input leaves
//! an existing file untouched.
//!
//! ## Reading back
//!
//! [`BmpInfo`], [`DecodeRequest`], and [`decode_rgb24`] read the header and
//! pixels of plain 24-bit BMPs. They exist to verify encoder output (tests,
//! fuzzing, sanity checks on saved files), not as a general BMP decoder:
//! paletted, bitfield, and RLE files are rejected as unsupported.
//!
//! ## Non-Goals
//!
//! - Compressed BMP (RLE, bitfields) output
//! - Output depths other than 24-bit
//! - Palette encodings other than byte-swapped RGB565
//!
//! ## Usage
//!
//! ```
//! use palbmp::{IndexedBitmap, SwappedRgb565, encode_indexed_to_vec};
//! use enough::Unstoppable;
//!
//! let palette = [
//!     SwappedRgb565::from_rgb888(0x000000),
//!     SwappedRgb565::from_rgb888(0xFF0000),
//! ];
//! let mut bitmap = IndexedBitmap::with_value_count(16, 16, 2)?;
//! for i in 0..16 {
//!     bitmap.set(i, i, 1)?;
//! }
//!
//! let bmp = encode_indexed_to_vec(&bitmap, &palette, Unstoppable)?;
//! assert_eq!(&bmp[..2], b"BM");
//! assert_eq!(bmp.len(), 54 + 48 * 16);
//! # Ok::<(), palbmp::BitmapError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod bmp;
mod color;
mod decode;
mod encode;
mod error;
mod image;
mod limits;
mod palette;
mod sink;

// Re-exports
pub use bmp::{BmpInfo, BmpLayout, HEADER_SIZE};
pub use color::SwappedRgb565;
pub use decode::{DecodeRequest, DecodedBitmap, decode_rgb24};
#[cfg(feature = "std")]
pub use encode::save_indexed;
pub use encode::{EncodeRequest, encode_indexed, encode_indexed_to_vec};
pub use enough::{Stop, Unstoppable};
pub use error::BitmapError;
pub use image::{IndexedBitmap, IndexedImage};
pub use limits::Limits;
pub use palette::Palette;
#[cfg(feature = "std")]
pub use sink::WriteSink;
pub use sink::{ByteSink, SliceSink};
