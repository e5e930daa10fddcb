//! Rectangular views over an [`Image`].
//!
//! An [`ImageView`] pairs a shared pixel snapshot with a rectangle. The
//! rectangle is not validated against the image: scans and encodes operate
//! on the part of it that lies inside the image, and
//! [`pixel`](ImageView::pixel) reads image coordinates relative to the view
//! origin.
//!
//! ```
//! use imgview::{Color, Image, SolidResult};
//!
//! let mut image = Image::new(64, 64);
//! image.fill(Color::WHITE);
//! let view = image.view(8, 8, 16, 16);
//! assert_eq!(view.is_solid_sync(), SolidResult::Uniform(Color::WHITE));
//! assert_eq!(view.pixel(0, 0), Some(Color::WHITE));
//! assert_eq!(view.pixel(99_999_999, 9_999_999), None);
//! ```

use core::fmt;
use core::str::FromStr;
use std::sync::Arc;

use crate::buffer::{Image, Pixels};
use crate::color::Color;
use crate::dispatch::{Dispatcher, Task};
use crate::encoder::ImageEncoder;
use crate::error::{Error, Result};
use crate::format::EncodeOptions;
use crate::output::EncodeOutput;
use crate::solid::{SolidResult, scan_solid};
use crate::traits::Encoding;

/// Placement of a view in image coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ViewRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ViewRect {
    /// Rectangle at `(x, y)` sized `width` x `height`.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Validate runtime-origin values. Negative or out-of-range components
    /// are [`Error::InvalidArgument`].
    pub fn try_from_i64(x: i64, y: i64, width: i64, height: i64) -> Result<Self> {
        let component = |name: &str, value: i64| {
            u32::try_from(value)
                .map_err(|_| Error::InvalidArgument(format!("view {name} {value} is out of range")))
        };
        Ok(Self::new(
            component("x", x)?,
            component("y", y)?,
            component("width", width)?,
            component("height", height)?,
        ))
    }

    /// Whether the rectangle has zero width or height.
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Intersection with a `width` x `height` image anchored at the origin.
    /// `None` if it contains no pixels.
    pub fn clip(&self, width: u32, height: u32) -> Option<ViewRect> {
        if self.x >= width || self.y >= height {
            return None;
        }
        let clipped = Self::new(
            self.x,
            self.y,
            self.width.min(width - self.x),
            self.height.min(height - self.y),
        );
        (!clipped.is_empty()).then_some(clipped)
    }
}

/// Parses `"x,y,width,height"`.
impl FromStr for ViewRect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [x, y, width, height] = parts.as_slice() else {
            return Err(Error::InvalidArgument(format!(
                "expected x,y,width,height, got {} values in {s:?}",
                parts.len()
            )));
        };
        let number = |part: &str| {
            part.parse::<i64>()
                .map_err(|_| Error::InvalidArgument(format!("{part:?} is not an integer")))
        };
        Self::try_from_i64(number(x)?, number(y)?, number(width)?, number(height)?)
    }
}

impl fmt::Display for ViewRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.x, self.y, self.width, self.height)
    }
}

/// A rectangle over a shared image snapshot.
///
/// Cloning is cheap. Async operations clone the view into the worker, so
/// the caller may drop it right after registering a continuation.
#[derive(Clone)]
pub struct ImageView {
    pixels: Arc<Pixels>,
    rect: ViewRect,
    dispatcher: Dispatcher,
    encoder: Arc<dyn Encoding>,
}

impl ImageView {
    /// View of `image` at `(x, y)` sized `width` x `height`.
    ///
    /// Later changes to `image` are not seen by the view.
    pub fn new(image: &Image, x: u32, y: u32, width: u32, height: u32) -> Self {
        Self::from_rect(image, ViewRect::new(x, y, width, height))
    }

    /// View of `image` over `rect`, not checked against the image bounds.
    pub fn from_rect(image: &Image, rect: ViewRect) -> Self {
        Self {
            pixels: image.shared(),
            rect,
            dispatcher: Dispatcher::global(),
            encoder: Arc::new(ImageEncoder::new()),
        }
    }

    /// Construct from runtime-origin values, see [`ViewRect::try_from_i64`].
    pub fn try_new(image: &Image, x: i64, y: i64, width: i64, height: i64) -> Result<Self> {
        Ok(Self::from_rect(
            image,
            ViewRect::try_from_i64(x, y, width, height)?,
        ))
    }

    /// Run async operations on `dispatcher` instead of rayon's global pool.
    pub fn with_dispatcher(mut self, dispatcher: Dispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    /// Encode with `encoder` instead of [`ImageEncoder`].
    pub fn with_encoder(mut self, encoder: Arc<dyn Encoding>) -> Self {
        self.encoder = encoder;
        self
    }

    /// Left edge in image coordinates.
    pub fn x(&self) -> u32 {
        self.rect.x
    }

    /// Top edge in image coordinates.
    pub fn y(&self) -> u32 {
        self.rect.y
    }

    /// Requested width, which may extend past the image.
    pub fn width(&self) -> u32 {
        self.rect.width
    }

    /// Requested height, which may extend past the image.
    pub fn height(&self) -> u32 {
        self.rect.height
    }

    /// The requested rectangle, before clipping.
    pub fn rect(&self) -> ViewRect {
        self.rect
    }

    /// Size of the underlying image snapshot.
    pub fn image_size(&self) -> (u32, u32) {
        (self.pixels.width(), self.pixels.height())
    }

    /// Dispatcher used by the async operations.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Pixel at image coordinates `(x + px, y + py)`, or `None` when that
    /// lies outside the image.
    pub fn pixel(&self, px: u32, py: u32) -> Option<Color> {
        let x = self.rect.x.checked_add(px)?;
        let y = self.rect.y.checked_add(py)?;
        self.pixels.get(x, y)
    }

    /// The in-bounds part of the view, or `None` if it is empty.
    pub fn clipped_rect(&self) -> Option<ViewRect> {
        self.rect.clip(self.pixels.width(), self.pixels.height())
    }

    /// Scan the in-bounds region on the calling thread.
    pub fn is_solid_sync(&self) -> SolidResult {
        match self.pixels.region(self.rect) {
            Some(region) => scan_solid(region),
            None => {
                log::trace!(target: "imgview::solid", "view {} has no pixels", self.rect);
                SolidResult::Empty
            }
        }
    }

    /// Scan on a worker and pass the result to `done`, exactly once.
    pub fn is_solid<C>(&self, done: C)
    where
        C: FnOnce(Result<SolidResult>) + Send + 'static,
    {
        let view = self.clone();
        self.dispatcher
            .spawn("is_solid", move || Ok(view.is_solid_sync()), done);
    }

    /// Scan on a worker and return a handle to the result.
    pub fn is_solid_task(&self) -> Task<SolidResult> {
        let view = self.clone();
        self.dispatcher
            .task("is_solid", move || Ok(view.is_solid_sync()))
    }

    /// Encode the in-bounds region on the calling thread.
    ///
    /// `format` is a name such as `png`, `jpeg80` or `webp`. Unknown names
    /// and formats the encoder lacks are [`Error::UnsupportedFormat`]; a
    /// view with no pixels inside the image is [`Error::EmptyRegion`].
    pub fn encode_sync(&self, format: &str) -> Result<EncodeOutput> {
        let options: EncodeOptions = format.parse()?;
        if !self.encoder.capabilities().supports(options.format) {
            return Err(Error::UnsupportedFormat(format.to_owned()));
        }
        let region = self.pixels.region(self.rect).ok_or(Error::EmptyRegion {
            x: self.rect.x,
            y: self.rect.y,
            width: self.rect.width,
            height: self.rect.height,
        })?;
        self.encoder.encode_rgba8(region, options)
    }

    /// Encode on a worker and pass the result to `done`, exactly once.
    ///
    /// Format errors are delivered to `done` like any other failure.
    pub fn encode<C>(&self, format: &str, done: C)
    where
        C: FnOnce(Result<EncodeOutput>) + Send + 'static,
    {
        let view = self.clone();
        let format = format.to_owned();
        self.dispatcher
            .spawn("encode", move || view.encode_sync(&format), done);
    }

    /// Encode on a worker and return a handle to the result.
    pub fn encode_task(&self, format: &str) -> Task<EncodeOutput> {
        let view = self.clone();
        let format = format.to_owned();
        self.dispatcher
            .task("encode", move || view.encode_sync(&format))
    }

    /// A view relative to this one, truncated to this view's rectangle.
    pub fn sub_view(&self, x: u32, y: u32, width: u32, height: u32) -> ImageView {
        let rect = ViewRect::new(
            self.rect.x.saturating_add(x),
            self.rect.y.saturating_add(y),
            width.min(self.rect.width.saturating_sub(x)),
            height.min(self.rect.height.saturating_sub(y)),
        );
        ImageView {
            rect,
            ..self.clone()
        }
    }

    /// Copy the in-bounds region into a new image. Empty views give a 0x0
    /// image.
    pub fn to_image(&self) -> Image {
        self.pixels
            .region(self.rect)
            .map_or_else(|| Image::new(0, 0), Image::from_img)
    }
}

impl fmt::Debug for ImageView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageView")
            .field("rect", &self.rect)
            .field("image_size", &self.image_size())
            .finish_non_exhaustive()
    }
}
