//! Encode capability table.
//!
//! Each [`Encoding`](crate::Encoding) implementation returns a
//! [`FormatCapabilities`] describing which formats it can write. Views
//! consult it before dispatching an encode, so unsupported formats fail
//! through the continuation instead of inside the codec.

use crate::format::{EncodeOptions, ImageFormat};

/// Which formats an encoder can produce.
///
/// The struct uses getter methods so fields can be added over time
/// without breaking changes.
///
/// # Example
///
/// ```
/// use imgview::{FormatCapabilities, ImageFormat};
///
/// static CAPS: FormatCapabilities = FormatCapabilities::new()
///     .with_png(true)
///     .with_jpeg(true);
///
/// assert!(CAPS.supports(ImageFormat::Png));
/// assert!(!CAPS.supports(ImageFormat::WebP));
/// assert!(CAPS.supports_name("jpeg80"));
/// ```
#[non_exhaustive]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FormatCapabilities {
    png: bool,
    jpeg: bool,
    webp: bool,
    tiff: bool,
    gif: bool,
    bmp: bool,
}

static BUILTIN: FormatCapabilities = FormatCapabilities::new()
    .with_png(cfg!(feature = "png"))
    .with_jpeg(cfg!(feature = "jpeg"))
    .with_webp(cfg!(feature = "webp"))
    .with_tiff(cfg!(feature = "tiff"))
    .with_gif(cfg!(feature = "gif"))
    .with_bmp(cfg!(feature = "bmp"));

impl Default for FormatCapabilities {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatCapabilities {
    /// Create capabilities with everything disabled.
    pub const fn new() -> Self {
        Self {
            png: false,
            jpeg: false,
            webp: false,
            tiff: false,
            gif: false,
            bmp: false,
        }
    }

    /// Formats compiled into this build (one cargo feature per format).
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Whether `format` can be encoded.
    pub const fn supports(&self, format: ImageFormat) -> bool {
        match format {
            ImageFormat::Png => self.png,
            ImageFormat::Jpeg => self.jpeg,
            ImageFormat::WebP => self.webp,
            ImageFormat::Tiff => self.tiff,
            ImageFormat::Gif => self.gif,
            ImageFormat::Bmp => self.bmp,
        }
    }

    /// Whether a format string (e.g. `"webp"`, `"jpeg80"`) names a
    /// supported format. Unparseable strings are unsupported.
    pub fn supports_name(&self, name: &str) -> bool {
        name.parse::<EncodeOptions>()
            .is_ok_and(|opts| self.supports(opts.format))
    }

    /// Iterate the supported formats.
    pub fn formats(&self) -> impl Iterator<Item = ImageFormat> + '_ {
        ImageFormat::ALL
            .into_iter()
            .filter(move |&format| self.supports(format))
    }

    /// Set PNG support.
    pub const fn with_png(mut self, v: bool) -> Self {
        self.png = v;
        self
    }

    /// Set JPEG support.
    pub const fn with_jpeg(mut self, v: bool) -> Self {
        self.jpeg = v;
        self
    }

    /// Set WebP support.
    pub const fn with_webp(mut self, v: bool) -> Self {
        self.webp = v;
        self
    }

    /// Set TIFF support.
    pub const fn with_tiff(mut self, v: bool) -> Self {
        self.tiff = v;
        self
    }

    /// Set GIF support.
    pub const fn with_gif(mut self, v: bool) -> Self {
        self.gif = v;
        self
    }

    /// Set BMP support.
    pub const fn with_bmp(mut self, v: bool) -> Self {
        self.bmp = v;
        self
    }
}

impl core::fmt::Debug for FormatCapabilities {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FormatCapabilities")
            .field("png", &self.png)
            .field("jpeg", &self.jpeg)
            .field("webp", &self.webp)
            .field("tiff", &self.tiff)
            .field("gif", &self.gif)
            .field("bmp", &self.bmp)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_all_false() {
        let caps = FormatCapabilities::new();
        for format in ImageFormat::ALL {
            assert!(!caps.supports(format), "{format}");
        }
        assert_eq!(caps.formats().count(), 0);
        assert_eq!(caps, FormatCapabilities::default());
    }

    #[test]
    fn builder_sets_fields() {
        let caps = FormatCapabilities::new().with_webp(true).with_tiff(true);
        assert!(caps.supports(ImageFormat::WebP));
        assert!(caps.supports(ImageFormat::Tiff));
        assert!(!caps.supports(ImageFormat::Png));
        assert!(!caps.supports(ImageFormat::Gif));
        let listed: Vec<_> = caps.formats().collect();
        assert_eq!(listed, [ImageFormat::WebP, ImageFormat::Tiff]);
    }

    #[test]
    fn supports_name_parses() {
        let caps = FormatCapabilities::new().with_jpeg(true);
        assert!(caps.supports_name("jpeg"));
        assert!(caps.supports_name("JPG75"));
        assert!(!caps.supports_name("png"));
        assert!(!caps.supports_name("foo"));
        assert!(!caps.supports_name(""));
    }

    #[test]
    fn builtin_matches_features() {
        let caps = FormatCapabilities::builtin();
        assert_eq!(caps.supports(ImageFormat::Png), cfg!(feature = "png"));
        assert_eq!(caps.supports(ImageFormat::Jpeg), cfg!(feature = "jpeg"));
        assert_eq!(caps.supports(ImageFormat::WebP), cfg!(feature = "webp"));
        assert_eq!(caps.supports(ImageFormat::Tiff), cfg!(feature = "tiff"));
        assert_eq!(caps.supports(ImageFormat::Gif), cfg!(feature = "gif"));
        assert_eq!(caps.supports(ImageFormat::Bmp), cfg!(feature = "bmp"));
    }

    #[test]
    fn debug_lists_fields() {
        let caps = FormatCapabilities::new().with_png(true);
        let s = format!("{caps:?}");
        assert!(s.contains("png: true"));
        assert!(s.contains("gif: false"));
    }
}
