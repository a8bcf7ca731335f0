use alloc::vec::Vec;

use enough::Stop;

use crate::bmp::BmpLayout;
use crate::error::BitmapError;
use crate::image::IndexedImage;
use crate::limits::Limits;
use crate::palette::Palette;
use crate::sink::ByteSink;

/// Builder for saving an indexed image as a 24-bit BMP.
///
/// The image and palette are borrowed for the duration of the encode and
/// must not change underneath it.
pub struct EncodeRequest<'a, I: ?Sized, P: ?Sized> {
    image: &'a I,
    palette: &'a P,
    limits: Option<&'a Limits>,
}

impl<'a, I, P> EncodeRequest<'a, I, P>
where
    I: IndexedImage + ?Sized,
    P: Palette + ?Sized,
{
    pub fn new(image: &'a I, palette: &'a P) -> Self {
        Self {
            image,
            palette,
            limits: None,
        }
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Output layout for this image, without encoding.
    pub fn layout(&self) -> Result<BmpLayout, BitmapError> {
        BmpLayout::new(self.image.width(), self.image.height())
    }

    /// Write the BMP to a caller-owned sink. The sink is flushed, not closed.
    pub fn encode_into<S: ByteSink + ?Sized>(
        &self,
        sink: &mut S,
        stop: impl Stop,
    ) -> Result<BmpLayout, BitmapError> {
        crate::bmp::encode(self.image, self.palette, sink, self.limits, &stop)
    }

    /// Encode to a new buffer sized exactly to the file.
    pub fn encode(&self, stop: impl Stop) -> Result<Vec<u8>, BitmapError> {
        let layout = self.layout()?;
        if let Some(limits) = self.limits {
            limits.check_output_buffer(layout.file_size)?;
        }
        let mut out = Vec::new();
        crate::bmp::encode(self.image, self.palette, &mut out, self.limits, &stop)?;
        Ok(out)
    }

    /// Create (or truncate) the file at `path` and write the BMP to it.
    ///
    /// Input is fully validated before the file is opened, so rejected input
    /// or an early stop leaves `path` as it was. The file is synced and
    /// closed before returning on every path. A failed write leaves whatever
    /// was written so far; the file is not removed.
    #[cfg(feature = "std")]
    pub fn save(
        &self,
        path: impl AsRef<std::path::Path>,
        stop: impl Stop,
    ) -> Result<BmpLayout, BitmapError> {
        let path = path.as_ref();
        let result = crate::bmp::prepare(self.image, self.palette, self.limits, &stop)
            .and_then(|layout| {
                let mut file = std::fs::File::create(path)?;
                crate::bmp::write(self.image, self.palette, &layout, &mut file, &stop)?;
                file.sync_all()?;
                Ok(layout)
            });
        if let Err(e) = &result {
            log::error!("failed to save bitmap to {}: {e}", path.display());
        }
        result
    }
}

/// Encode an indexed image into a caller-owned sink.
pub fn encode_indexed<I, P, S>(
    image: &I,
    palette: &P,
    sink: &mut S,
    stop: impl Stop,
) -> Result<BmpLayout, BitmapError>
where
    I: IndexedImage + ?Sized,
    P: Palette + ?Sized,
    S: ByteSink + ?Sized,
{
    EncodeRequest::new(image, palette).encode_into(sink, stop)
}

/// Encode an indexed image to an in-memory BMP file.
pub fn encode_indexed_to_vec<I, P>(
    image: &I,
    palette: &P,
    stop: impl Stop,
) -> Result<Vec<u8>, BitmapError>
where
    I: IndexedImage + ?Sized,
    P: Palette + ?Sized,
{
    EncodeRequest::new(image, palette).encode(stop)
}

/// Encode an indexed image to a BMP file at `path`, creating or truncating it.
#[cfg(feature = "std")]
pub fn save_indexed<I, P>(
    image: &I,
    palette: &P,
    path: impl AsRef<std::path::Path>,
    stop: impl Stop,
) -> Result<BmpLayout, BitmapError>
where
    I: IndexedImage + ?Sized,
    P: Palette + ?Sized,
{
    EncodeRequest::new(image, palette).save(path, stop)
}
