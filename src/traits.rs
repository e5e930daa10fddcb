//! Encoder trait.
//!
//! Views hand the pixels inside their rectangle to an [`Encoding`]
//! implementation. The trait is object-safe so a view can carry any encoder
//! as `Arc<dyn Encoding>`; [`ImageEncoder`](crate::ImageEncoder) is the
//! default.

use imgref::ImgRef;
use rgb::Rgba;

use crate::capabilities::FormatCapabilities;
use crate::error::Result;
use crate::format::EncodeOptions;
use crate::output::EncodeOutput;

/// Common interface for encoders.
///
/// Implementations must be shareable across threads: encodes run on
/// dispatcher workers, possibly several at once.
pub trait Encoding: Send + Sync {
    /// Formats this encoder can produce.
    ///
    /// Callers check this before encoding; [`encode_rgba8`](Self::encode_rgba8)
    /// should still reject unsupported formats with
    /// [`Error::UnsupportedFormat`](crate::Error::UnsupportedFormat).
    fn capabilities(&self) -> &FormatCapabilities;

    /// Encode RGBA8 pixels. `img` may be a sub-image with a stride wider
    /// than its width.
    fn encode_rgba8(&self, img: ImgRef<'_, Rgba<u8>>, options: EncodeOptions)
    -> Result<EncodeOutput>;
}
