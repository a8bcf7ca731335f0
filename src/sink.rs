//! Output sinks for the encoder.

use alloc::vec::Vec;

use crate::error::BitmapError;

/// Sequential byte destination.
///
/// The encoder writes the file header, the info header, then one padded
/// row at a time, and calls [`flush_bytes`](ByteSink::flush_bytes) once at
/// the end. It never closes a sink it was handed.
pub trait ByteSink {
    /// Write every byte of `buf` or fail.
    fn write_all_bytes(&mut self, buf: &[u8]) -> Result<(), BitmapError>;

    /// Push buffered bytes to the underlying storage.
    fn flush_bytes(&mut self) -> Result<(), BitmapError> {
        Ok(())
    }

    /// Total output size, announced before the first write.
    ///
    /// Only a hint: in-memory sinks may reserve, files ignore it.
    fn reserve_hint(&mut self, _total: usize) -> Result<(), BitmapError> {
        Ok(())
    }
}

impl<S: ByteSink + ?Sized> ByteSink for &mut S {
    fn write_all_bytes(&mut self, buf: &[u8]) -> Result<(), BitmapError> {
        (**self).write_all_bytes(buf)
    }

    fn flush_bytes(&mut self) -> Result<(), BitmapError> {
        (**self).flush_bytes()
    }

    fn reserve_hint(&mut self, total: usize) -> Result<(), BitmapError> {
        (**self).reserve_hint(total)
    }
}

impl ByteSink for Vec<u8> {
    fn write_all_bytes(&mut self, buf: &[u8]) -> Result<(), BitmapError> {
        self.extend_from_slice(buf);
        Ok(())
    }

    fn reserve_hint(&mut self, total: usize) -> Result<(), BitmapError> {
        self.try_reserve_exact(total)
            .map_err(|_| BitmapError::SinkFull {
                needed: total,
                available: self.capacity() - self.len(),
            })
    }
}

/// Fixed-size output buffer that records how much was written.
///
/// For targets without an allocator-backed sink, such as a frame buffer
/// or a DMA region.
#[derive(Debug)]
pub struct SliceSink<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> SliceSink<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes written so far.
    pub fn written(&self) -> usize {
        self.pos
    }
}

impl ByteSink for SliceSink<'_> {
    fn write_all_bytes(&mut self, buf: &[u8]) -> Result<(), BitmapError> {
        let available = self.buf.len() - self.pos;
        if buf.len() > available {
            return Err(BitmapError::SinkFull {
                needed: buf.len(),
                available,
            });
        }
        self.buf[self.pos..self.pos + buf.len()].copy_from_slice(buf);
        self.pos += buf.len();
        Ok(())
    }

    fn reserve_hint(&mut self, total: usize) -> Result<(), BitmapError> {
        let available = self.buf.len() - self.pos;
        if total > available {
            return Err(BitmapError::SinkFull {
                needed: total,
                available,
            });
        }
        Ok(())
    }
}

#[cfg(feature = "std")]
mod std_sinks {
    use super::ByteSink;
    use crate::error::BitmapError;
    use std::fs::File;
    use std::io::{BufWriter, Cursor, Write};

    impl ByteSink for File {
        fn write_all_bytes(&mut self, buf: &[u8]) -> Result<(), BitmapError> {
            Ok(self.write_all(buf)?)
        }

        fn flush_bytes(&mut self) -> Result<(), BitmapError> {
            Ok(self.flush()?)
        }
    }

    impl<W: Write> ByteSink for BufWriter<W> {
        fn write_all_bytes(&mut self, buf: &[u8]) -> Result<(), BitmapError> {
            Ok(self.write_all(buf)?)
        }

        fn flush_bytes(&mut self) -> Result<(), BitmapError> {
            Ok(self.flush()?)
        }
    }

    impl ByteSink for Cursor<Vec<u8>> {
        fn write_all_bytes(&mut self, buf: &[u8]) -> Result<(), BitmapError> {
            Ok(self.write_all(buf)?)
        }
    }

    /// Adapter for any other [`std::io::Write`] destination.
    #[derive(Debug)]
    pub struct WriteSink<W>(pub W);

    impl<W> WriteSink<W> {
        pub fn into_inner(self) -> W {
            self.0
        }
    }

    impl<W: Write> ByteSink for WriteSink<W> {
        fn write_all_bytes(&mut self, buf: &[u8]) -> Result<(), BitmapError> {
            Ok(self.0.write_all(buf)?)
        }

        fn flush_bytes(&mut self) -> Result<(), BitmapError> {
            Ok(self.0.flush()?)
        }
    }
}

#[cfg(feature = "std")]
pub use std_sinks::WriteSink;
