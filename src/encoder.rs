//! Default encoder backed by the `image` crate.

use std::io::Cursor;

use imgref::ImgRef;
use rgb::{ComponentBytes, Rgba};

use crate::capabilities::FormatCapabilities;
use crate::error::{Error, Result};
use crate::format::{EncodeOptions, ImageFormat};
use crate::limits::ResourceLimits;
use crate::output::EncodeOutput;
use crate::traits::Encoding;

/// Encodes through the `image` crate's codecs.
///
/// Supports the formats enabled by this crate's cargo features (see
/// [`FormatCapabilities::builtin`]). JPEG output drops the alpha channel.
/// WebP output is lossless.
#[derive(Clone, Debug, Default)]
pub struct ImageEncoder {
    limits: ResourceLimits,
}

impl ImageEncoder {
    /// Encoder without resource limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply resource limits. `max_width`, `max_height` and `max_pixels`
    /// are checked before encoding, `max_output_bytes` after.
    pub fn with_limits(mut self, limits: ResourceLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Limits applied to each encode.
    pub fn limits(&self) -> &ResourceLimits {
        &self.limits
    }
}

impl Encoding for ImageEncoder {
    fn capabilities(&self) -> &FormatCapabilities {
        FormatCapabilities::builtin()
    }

    fn encode_rgba8(
        &self,
        img: ImgRef<'_, Rgba<u8>>,
        options: EncodeOptions,
    ) -> Result<EncodeOutput> {
        let format = options.format;
        if !self.capabilities().supports(format) {
            return Err(Error::UnsupportedFormat(format.to_string()));
        }
        let width = u32::try_from(img.width())
            .map_err(|_| Error::InvalidArgument("image width exceeds u32".into()))?;
        let height = u32::try_from(img.height())
            .map_err(|_| Error::InvalidArgument("image height exceeds u32".into()))?;
        if width == 0 || height == 0 {
            return Err(Error::InvalidArgument(format!(
                "cannot encode a {width}x{height} image"
            )));
        }
        self.limits.check_dimensions(width, height)?;

        let (pixels, _, _) = img.to_contiguous_buf();
        let mut out = Cursor::new(Vec::new());
        let written = if format.supports_alpha() {
            image::write_buffer_with_format(
                &mut out,
                pixels.as_bytes(),
                width,
                height,
                image::ExtendedColorType::Rgba8,
                format.to_image_crate(),
            )
            .map_err(Error::from)
        } else {
            let rgb: Vec<u8> = pixels.iter().flat_map(|p| [p.r, p.g, p.b]).collect();
            write_opaque(&mut out, &rgb, width, height, options)
        };
        if let Err(err) = written {
            log::warn!(target: "imgview::encode", "{format} encode of {width}x{height} failed: {err}");
            return Err(err);
        }

        let data = out.into_inner();
        self.limits.check_output_size(data.len() as u64)?;
        log::debug!(
            target: "imgview::encode",
            "encoded {width}x{height} as {format}: {} bytes",
            data.len()
        );
        Ok(EncodeOutput::new(data, format))
    }
}

// Formats without an alpha channel get RGB8.
fn write_opaque(
    out: &mut Cursor<Vec<u8>>,
    rgb: &[u8],
    width: u32,
    height: u32,
    options: EncodeOptions,
) -> Result<()> {
    match options.format {
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => {
            use image::ImageEncoder as _;
            use image::codecs::jpeg::JpegEncoder;

            let quality = options
                .quality
                .unwrap_or(EncodeOptions::DEFAULT_JPEG_QUALITY);
            JpegEncoder::new_with_quality(out, quality).write_image(
                rgb,
                width,
                height,
                image::ExtendedColorType::Rgb8,
            )?;
        }
        format => image::write_buffer_with_format(
            out,
            rgb,
            width,
            height,
            image::ExtendedColorType::Rgb8,
            format.to_image_crate(),
        )?,
    }
    Ok(())
}
