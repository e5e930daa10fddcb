//! Rectangular views over RGBA8 images, with solid-color detection and
//! encoding that run on a worker pool.
//!
//! - [`Image`]: shareable, copy-on-write RGBA8 pixel buffer
//! - [`ImageView`] / [`ViewRect`]: a rectangle over an image snapshot
//! - [`SolidResult`] / [`scan_solid`]: uniform-color scan
//! - [`Dispatcher`] / [`Task`]: rayon-backed async delivery
//! - [`Encoding`] / [`ImageEncoder`]: encoder trait and the `image`-crate default
//! - [`FormatCapabilities`] / [`ImageFormat`] / [`EncodeOptions`]: what can be encoded, and how
//! - [`ResourceLimits`]: decode and encode limits
//!
//! Async operations take a continuation that is called exactly once, on the
//! worker that finished the work:
//!
//! ```
//! use std::sync::mpsc;
//! use imgview::{Color, Image, SolidResult};
//!
//! let mut image = Image::new(256, 256);
//! image.fill(Color::new(2, 2, 2, 2));
//!
//! let (tx, rx) = mpsc::channel();
//! image.view(0, 0, 256, 256).is_solid(move |result| tx.send(result).unwrap());
//! assert_eq!(rx.recv().unwrap().unwrap(), SolidResult::Uniform(Color::new(2, 2, 2, 2)));
//! ```

#![forbid(unsafe_code)]

mod buffer;
mod capabilities;
mod color;
mod dispatch;
mod encoder;
mod error;
mod format;
mod limits;
mod output;
mod solid;
mod traits;
mod view;

pub use buffer::Image;
pub use capabilities::FormatCapabilities;
pub use color::Color;
pub use dispatch::{DispatchConfig, Dispatcher, Task, TaskState};
pub use encoder::ImageEncoder;
pub use error::{Error, Result};
pub use format::{EncodeOptions, ImageFormat};
pub use limits::{LimitExceeded, ResourceLimits};
pub use output::EncodeOutput;
pub use solid::{SolidResult, scan_solid};
pub use traits::Encoding;
pub use view::{ImageView, ViewRect};

// Re-exports for custom encoders.
pub use imgref::{Img, ImgRef, ImgVec};
pub use rgb;
pub use rgb::Rgba;
