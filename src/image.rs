//! Indexed image sources.

use alloc::format;
use alloc::vec;
use alloc::vec::Vec;

use crate::error::BitmapError;

/// A raster whose pixels are palette indices.
///
/// The encoder only reads through this trait and calls
/// [`index`](IndexedImage::index) for `0 <= x < width`, `0 <= y < height`.
pub trait IndexedImage {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Palette index of the pixel at column `x`, row `y` (row 0 is the top).
    fn index(&self, x: u32, y: u32) -> usize;
}

impl<I: IndexedImage + ?Sized> IndexedImage for &I {
    fn width(&self) -> u32 {
        (**self).width()
    }

    fn height(&self) -> u32 {
        (**self).height()
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (**self).index(x, y)
    }
}

/// Owned, row-major grid of 8-bit palette indices.
///
/// `value_count` caps the index values the grid accepts, the way a
/// display bitmap is created for a fixed number of colors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedBitmap {
    width: u32,
    height: u32,
    value_count: u16,
    indices: Vec<u8>,
}

impl IndexedBitmap {
    /// Create a bitmap filled with index 0 that accepts all 256 index values.
    pub fn new(width: u32, height: u32) -> Result<Self, BitmapError> {
        Self::with_value_count(width, height, 256)
    }

    /// Create a bitmap filled with index 0 that accepts indices `0..value_count`.
    pub fn with_value_count(width: u32, height: u32, value_count: u16) -> Result<Self, BitmapError> {
        if value_count == 0 || value_count > 256 {
            return Err(BitmapError::InvalidInput(format!(
                "value count {value_count} must be in 1..=256"
            )));
        }
        let len = pixel_count(width, height)?;
        Ok(Self {
            width,
            height,
            value_count,
            indices: vec![0; len],
        })
    }

    /// Wrap an existing row-major index buffer of exactly `width * height` bytes.
    pub fn from_indices(width: u32, height: u32, indices: Vec<u8>) -> Result<Self, BitmapError> {
        let len = pixel_count(width, height)?;
        if indices.len() != len {
            return Err(BitmapError::InvalidInput(format!(
                "{width}x{height} bitmap needs {len} indices, got {}",
                indices.len()
            )));
        }
        Ok(Self {
            width,
            height,
            value_count: 256,
            indices,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn value_count(&self) -> u16 {
        self.value_count
    }

    /// Index at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        self.offset(x, y).map(|off| self.indices[off])
    }

    pub fn set(&mut self, x: u32, y: u32, index: u8) -> Result<(), BitmapError> {
        if u16::from(index) >= self.value_count {
            return Err(BitmapError::InvalidInput(format!(
                "index {index} exceeds value count {}",
                self.value_count
            )));
        }
        let off = self.offset(x, y).ok_or_else(|| {
            BitmapError::InvalidInput(format!(
                "({x}, {y}) is outside the {}x{} bitmap",
                self.width, self.height
            ))
        })?;
        self.indices[off] = index;
        Ok(())
    }

    pub fn fill(&mut self, index: u8) -> Result<(), BitmapError> {
        if u16::from(index) >= self.value_count {
            return Err(BitmapError::InvalidInput(format!(
                "index {index} exceeds value count {}",
                self.value_count
            )));
        }
        self.indices.fill(index);
        Ok(())
    }

    /// Row-major index buffer.
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    pub fn into_indices(self) -> Vec<u8> {
        self.indices
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }
}

impl IndexedImage for IndexedBitmap {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: u32, y: u32) -> usize {
        usize::from(self.indices[y as usize * self.width as usize + x as usize])
    }
}

fn pixel_count(width: u32, height: u32) -> Result<usize, BitmapError> {
    if width == 0 || height == 0 {
        return Err(BitmapError::InvalidInput(format!(
            "bitmap dimensions must be non-zero, got {width}x{height}"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .ok_or(BitmapError::DimensionsTooLarge { width, height })
}

// ── imgref interop ──────────────────────────────────────────────────

#[cfg(feature = "imgref")]
mod imgref_impls {
    use super::IndexedImage;
    use imgref::{ImgRef, ImgVec};

    macro_rules! impl_indexed_imgref {
        ($($t:ty),*) => {$(
            impl IndexedImage for ImgRef<'_, $t> {
                fn width(&self) -> u32 {
                    imgref::Img::width(self) as u32
                }

                fn height(&self) -> u32 {
                    imgref::Img::height(self) as u32
                }

                fn index(&self, x: u32, y: u32) -> usize {
                    usize::from(self[(x as usize, y as usize)])
                }
            }

            impl IndexedImage for ImgVec<$t> {
                fn width(&self) -> u32 {
                    imgref::Img::width(self) as u32
                }

                fn height(&self) -> u32 {
                    imgref::Img::height(self) as u32
                }

                fn index(&self, x: u32, y: u32) -> usize {
                    usize::from(self[(x as usize, y as usize)])
                }
            }
        )*};
    }

    impl_indexed_imgref!(u8, u16);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(matches!(
            IndexedBitmap::new(0, 4),
            Err(BitmapError::InvalidInput(_))
        ));
        assert!(matches!(
            IndexedBitmap::new(4, 0),
            Err(BitmapError::InvalidInput(_))
        ));
    }

    #[test]
    fn set_respects_value_count_and_bounds() {
        let mut bmp = IndexedBitmap::with_value_count(3, 2, 9).unwrap();
        bmp.set(2, 1, 8).unwrap();
        assert_eq!(bmp.get(2, 1), Some(8));
        assert_eq!(IndexedImage::index(&bmp, 2, 1), 8);
        assert!(bmp.set(0, 0, 9).is_err());
        assert!(bmp.set(3, 0, 1).is_err());
        assert_eq!(bmp.get(0, 2), None);
    }

    #[test]
    fn from_indices_checks_length() {
        assert!(IndexedBitmap::from_indices(2, 2, vec![0; 3]).is_err());
        let bmp = IndexedBitmap::from_indices(2, 2, vec![0, 1, 2, 3]).unwrap();
        assert_eq!(bmp.get(1, 1), Some(3));
        assert_eq!(bmp.get(0, 1), Some(2));
    }

    #[test]
    fn fill_sets_every_pixel() {
        let mut bmp = IndexedBitmap::new(4, 3).unwrap();
        bmp.fill(7).unwrap();
        assert!(bmp.indices().iter().all(|&i| i == 7));
        assert!(IndexedBitmap::with_value_count(1, 1, 2).unwrap().fill(2).is_err());
        assert!(IndexedBitmap::with_value_count(1, 1, 0).is_err());
    }
}
