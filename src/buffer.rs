//! Owned RGBA8 image.
//!
//! [`Image`] owns a tightly packed, row-major grid of [`Rgba<u8>`] pixels
//! behind an `Arc`. Views share that allocation instead of copying it.
//! Mutation through [`fill`](Image::fill) or [`set_pixel`](Image::set_pixel)
//! is copy-on-write: views created earlier keep the pixels they were created
//! from.

use core::fmt;
use std::path::Path;
use std::sync::Arc;

use imgref::ImgRef;
use rgb::{FromSlice, Rgba};

use crate::color::Color;
use crate::error::{Error, Result};
use crate::limits::ResourceLimits;
use crate::output::EncodeOutput;
use crate::view::{ImageView, ViewRect};

/// Pixel storage shared between an [`Image`] and its views.
///
/// `data.len() == width * height`; rows are not padded.
#[derive(Clone)]
pub(crate) struct Pixels {
    data: Vec<Rgba<u8>>,
    width: u32,
    height: u32,
}

impl Pixels {
    #[inline]
    pub(crate) fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub(crate) fn height(&self) -> u32 {
        self.height
    }

    pub(crate) fn get(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = y as usize * self.width as usize + x as usize;
        self.data.get(index).map(|&p| p.into())
    }

    /// The part of `rect` inside the image, or `None` if it has no pixels.
    pub(crate) fn region(&self, rect: ViewRect) -> Option<ImgRef<'_, Rgba<u8>>> {
        let clip = rect.clip(self.width, self.height)?;
        let full = ImgRef::new(&self.data, self.width as usize, self.height as usize);
        Some(full.sub_image(
            clip.x as usize,
            clip.y as usize,
            clip.width as usize,
            clip.height as usize,
        ))
    }
}

/// A shareable RGBA8 pixel buffer.
#[derive(Clone)]
pub struct Image {
    pixels: Arc<Pixels>,
}

impl Image {
    /// Allocate a transparent-black image.
    ///
    /// # Panics
    ///
    /// Panics if `width * height` overflows `usize`. Use
    /// [`try_new`](Self::try_new) for untrusted dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width as usize)
            .checked_mul(height as usize)
            .unwrap_or_else(|| panic!("image {width}x{height} is too large"));
        Self::from_parts(vec![Rgba::new(0, 0, 0, 0); len], width, height)
    }

    /// Allocate from runtime-origin dimensions, rejecting negative or
    /// oversized values with [`Error::InvalidArgument`].
    pub fn try_new(width: i64, height: i64) -> Result<Self> {
        let w = u32::try_from(width)
            .map_err(|_| Error::InvalidArgument(format!("invalid image width {width}")))?;
        let h = u32::try_from(height)
            .map_err(|_| Error::InvalidArgument(format!("invalid image height {height}")))?;
        if (w as usize).checked_mul(h as usize).is_none() {
            return Err(Error::InvalidArgument(format!("image {w}x{h} is too large")));
        }
        Ok(Self::new(w, h))
    }

    fn from_parts(data: Vec<Rgba<u8>>, width: u32, height: u32) -> Self {
        debug_assert_eq!(data.len(), width as usize * height as usize);
        Self {
            pixels: Arc::new(Pixels {
                data,
                width,
                height,
            }),
        }
    }

    /// Copy pixels out of an `imgref` image (any stride).
    pub fn from_img(img: ImgRef<'_, Rgba<u8>>) -> Self {
        let (buf, width, height) = img.to_contiguous_buf();
        Self::from_parts(buf.into_owned(), width as u32, height as u32)
    }

    /// Wrap tightly packed RGBA bytes (`width * height * 4` of them).
    pub fn from_rgba8(data: &[u8], width: u32, height: u32) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4));
        if expected != Some(data.len()) {
            return Err(Error::InvalidArgument(format!(
                "expected {width}x{height}x4 bytes, got {}",
                data.len()
            )));
        }
        Ok(Self::from_parts(data.as_rgba().to_vec(), width, height))
    }

    /// Decode an encoded image (any format compiled into the `image` crate).
    pub fn decode(data: &[u8]) -> Result<Self> {
        Self::decode_with_limits(data, &ResourceLimits::none())
    }

    /// Decode, rejecting inputs that exceed `limits` before decoding pixels.
    pub fn decode_with_limits(data: &[u8], limits: &ResourceLimits) -> Result<Self> {
        limits.check_file_size(data.len() as u64)?;
        if limits.has_any() {
            let (w, h) = image::ImageReader::new(std::io::Cursor::new(data))
                .with_guessed_format()?
                .into_dimensions()?;
            limits.check_dimensions(w, h)?;
        }
        let rgba = image::ImageReader::new(std::io::Cursor::new(data))
            .with_guessed_format()?
            .decode()?
            .into_rgba8();
        let (width, height) = rgba.dimensions();
        log::debug!(target: "imgview::image", "decoded {width}x{height} image");
        Self::from_rgba8(rgba.as_raw(), width, height)
    }

    /// Read and decode a file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_limits(path, &ResourceLimits::none())
    }

    /// Read and decode a file, checking `limits` first.
    pub fn open_with_limits(path: impl AsRef<Path>, limits: &ResourceLimits) -> Result<Self> {
        let path = path.as_ref();
        limits.check_file_size(std::fs::metadata(path)?.len())?;
        let data = std::fs::read(path)?;
        Self::decode_with_limits(&data, limits)
    }

    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.pixels.width
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.pixels.height
    }

    /// Pixel at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.pixels.get(x, y)
    }

    /// Overwrite one pixel.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) -> Result<()> {
        if x >= self.width() || y >= self.height() {
            return Err(Error::InvalidArgument(format!(
                "pixel ({x}, {y}) is outside {}x{}",
                self.width(),
                self.height()
            )));
        }
        let pixels = Arc::make_mut(&mut self.pixels);
        let index = y as usize * pixels.width as usize + x as usize;
        pixels.data[index] = color.into();
        Ok(())
    }

    /// Set every pixel to `color`.
    pub fn fill(&mut self, color: Color) {
        Arc::make_mut(&mut self.pixels).data.fill(color.into());
    }

    /// All pixels, row-major without padding.
    pub fn as_slice(&self) -> &[Rgba<u8>] {
        &self.pixels.data
    }

    /// Borrow as an `imgref` image. `None` when the image has no pixels.
    pub fn as_img(&self) -> Option<ImgRef<'_, Rgba<u8>>> {
        self.pixels
            .region(ViewRect::new(0, 0, self.width(), self.height()))
    }

    /// Create a view. The rectangle is not checked against the image bounds.
    pub fn view(&self, x: u32, y: u32, width: u32, height: u32) -> ImageView {
        ImageView::new(self, x, y, width, height)
    }

    /// Encode the whole image with the default encoder.
    pub fn encode(&self, format: &str) -> Result<EncodeOutput> {
        self.view(0, 0, self.width(), self.height())
            .encode_sync(format)
    }

    pub(crate) fn shared(&self) -> Arc<Pixels> {
        Arc::clone(&self.pixels)
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Image({}x{})", self.width(), self.height())
    }
}
