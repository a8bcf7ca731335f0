//! Palette sources: lookup from pixel index to a byte-swapped RGB565 word.

use alloc::vec::Vec;

use crate::color::SwappedRgb565;

/// An ordered table of colors addressed by pixel index.
///
/// Entries are raw palette words in the byte-swapped RGB565 layout
/// described by [`SwappedRgb565`].
pub trait Palette {
    /// Number of entries.
    fn len(&self) -> usize;

    /// Raw palette word at `index`, or `None` past the end.
    fn color(&self, index: usize) -> Option<u16>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Palette for [u16] {
    fn len(&self) -> usize {
        <[u16]>::len(self)
    }

    fn color(&self, index: usize) -> Option<u16> {
        self.get(index).copied()
    }
}

impl Palette for [SwappedRgb565] {
    fn len(&self) -> usize {
        <[SwappedRgb565]>::len(self)
    }

    fn color(&self, index: usize) -> Option<u16> {
        self.get(index).map(|c| c.raw())
    }
}

impl<const N: usize> Palette for [u16; N] {
    fn len(&self) -> usize {
        N
    }

    fn color(&self, index: usize) -> Option<u16> {
        self.as_slice().color(index)
    }
}

impl<const N: usize> Palette for [SwappedRgb565; N] {
    fn len(&self) -> usize {
        N
    }

    fn color(&self, index: usize) -> Option<u16> {
        self.as_slice().color(index)
    }
}

impl Palette for Vec<u16> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn color(&self, index: usize) -> Option<u16> {
        self.as_slice().color(index)
    }
}

impl Palette for Vec<SwappedRgb565> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn color(&self, index: usize) -> Option<u16> {
        self.as_slice().color(index)
    }
}

impl<P: Palette + ?Sized> Palette for &P {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn color(&self, index: usize) -> Option<u16> {
        (**self).color(index)
    }
}
