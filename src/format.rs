//! Image format detection and encode format strings.

use core::str::FromStr;

use crate::error::Error;

/// Image formats known to this crate.
///
/// Whether a format can actually be encoded depends on the cargo features
/// the crate was built with; see [`FormatCapabilities`](crate::FormatCapabilities).
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
    Tiff,
    Gif,
    Bmp,
}

impl ImageFormat {
    /// All formats, in capability-table order.
    pub const ALL: [ImageFormat; 6] = [
        ImageFormat::Png,
        ImageFormat::Jpeg,
        ImageFormat::WebP,
        ImageFormat::Tiff,
        ImageFormat::Gif,
        ImageFormat::Bmp,
    ];

    /// Detect format from magic bytes. Returns `None` if unrecognized.
    pub fn detect(data: &[u8]) -> Option<Self> {
        // JPEG: FF D8 FF
        if data.len() >= 3 && data[0] == 0xFF && data[1] == 0xD8 && data[2] == 0xFF {
            return Some(ImageFormat::Jpeg);
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.len() >= 8 && data[..8] == [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A] {
            return Some(ImageFormat::Png);
        }

        // GIF: "GIF87a" or "GIF89a"
        if data.len() >= 6
            && data[..3] == *b"GIF"
            && data[3] == b'8'
            && (data[4] == b'7' || data[4] == b'9')
            && data[5] == b'a'
        {
            return Some(ImageFormat::Gif);
        }

        // WebP: "RIFF....WEBP"
        if data.len() >= 12 && data[..4] == *b"RIFF" && data[8..12] == *b"WEBP" {
            return Some(ImageFormat::WebP);
        }

        // TIFF: "II*\0" (little endian) or "MM\0*" (big endian)
        if data.len() >= 4 && (data[..4] == *b"II*\0" || data[..4] == *b"MM\0*") {
            return Some(ImageFormat::Tiff);
        }

        // BMP: "BM"
        if data.len() >= 2 && data[..2] == *b"BM" {
            return Some(ImageFormat::Bmp);
        }

        None
    }

    /// Detect format from file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" | "jpe" | "jfif" => Some(ImageFormat::Jpeg),
            "webp" => Some(ImageFormat::WebP),
            "tif" | "tiff" => Some(ImageFormat::Tiff),
            "gif" => Some(ImageFormat::Gif),
            "bmp" => Some(ImageFormat::Bmp),
            _ => None,
        }
    }

    /// MIME type string.
    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Tiff => "image/tiff",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Bmp => "image/bmp",
        }
    }

    /// Common file extensions.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            ImageFormat::Png => &["png"],
            ImageFormat::Jpeg => &["jpg", "jpeg", "jpe", "jfif"],
            ImageFormat::WebP => &["webp"],
            ImageFormat::Tiff => &["tiff", "tif"],
            ImageFormat::Gif => &["gif"],
            ImageFormat::Bmp => &["bmp"],
        }
    }

    /// Whether this format keeps the alpha channel. Encoders flatten to RGB
    /// for formats that do not.
    pub fn supports_alpha(self) -> bool {
        !matches!(self, ImageFormat::Jpeg)
    }

    pub(crate) fn to_image_crate(self) -> image::ImageFormat {
        match self {
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::WebP => image::ImageFormat::WebP,
            ImageFormat::Tiff => image::ImageFormat::Tiff,
            ImageFormat::Gif => image::ImageFormat::Gif,
            ImageFormat::Bmp => image::ImageFormat::Bmp,
        }
    }
}

impl core::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            ImageFormat::Png => "PNG",
            ImageFormat::Jpeg => "JPEG",
            ImageFormat::WebP => "WebP",
            ImageFormat::Tiff => "TIFF",
            ImageFormat::Gif => "GIF",
            ImageFormat::Bmp => "BMP",
        })
    }
}

/// Encode request parsed from a format string.
///
/// Accepted strings: `png`, `png32`, `jpeg`/`jpg` with an optional quality
/// suffix (`jpeg80`), `webp`, `tiff`/`tif`, `gif`, `bmp`. Matching is
/// case-insensitive.
///
/// ```
/// use imgview::{EncodeOptions, ImageFormat};
///
/// let opts: EncodeOptions = "jpeg80".parse().unwrap();
/// assert_eq!(opts.format, ImageFormat::Jpeg);
/// assert_eq!(opts.quality, Some(80));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct EncodeOptions {
    pub format: ImageFormat,
    /// Lossy quality, 1-100. `None` uses the codec default.
    pub quality: Option<u8>,
}

impl EncodeOptions {
    /// Default JPEG quality when none is given.
    pub const DEFAULT_JPEG_QUALITY: u8 = 85;

    /// Options for `format` with the codec's default quality.
    pub fn new(format: ImageFormat) -> Self {
        Self {
            format,
            quality: None,
        }
    }

    /// Set the quality, clamped to 1..=100. Only JPEG uses it.
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = Some(quality.clamp(1, 100));
        self
    }
}

impl From<ImageFormat> for EncodeOptions {
    fn from(format: ImageFormat) -> Self {
        Self::new(format)
    }
}

impl FromStr for EncodeOptions {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unsupported = || Error::UnsupportedFormat(s.to_owned());
        let lower = s.trim().to_ascii_lowercase();
        let format = match lower.as_str() {
            "png" | "png32" => return Ok(Self::new(ImageFormat::Png)),
            "webp" => return Ok(Self::new(ImageFormat::WebP)),
            "tif" | "tiff" => return Ok(Self::new(ImageFormat::Tiff)),
            "gif" => return Ok(Self::new(ImageFormat::Gif)),
            "bmp" => return Ok(Self::new(ImageFormat::Bmp)),
            _ => ImageFormat::Jpeg,
        };
        let digits = lower
            .strip_prefix("jpeg")
            .or_else(|| lower.strip_prefix("jpg"))
            .ok_or_else(unsupported)?;
        if digits.is_empty() {
            return Ok(Self::new(format));
        }
        match digits.parse::<u8>() {
            Ok(q @ 1..=100) => Ok(Self::new(format).with_quality(q)),
            _ => Err(unsupported()),
        }
    }
}
