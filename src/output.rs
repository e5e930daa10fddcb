//! Encoded bytes returned by view and image encodes.

use std::path::Path;

use crate::buffer::Image;
use crate::error::{Error, Result};
use crate::format::ImageFormat;

/// Encoded image bytes tagged with their format.
///
/// The byte layout belongs to the codec and can change between codec
/// versions; compare [`decode`](Self::decode)d pixels rather than bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeOutput {
    data: Vec<u8>,
    format: ImageFormat,
}

impl EncodeOutput {
    /// Wrap bytes already encoded as `format`.
    pub fn new(data: Vec<u8>, format: ImageFormat) -> Self {
        Self { data, format }
    }

    /// Borrow the encoded bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Take the encoded bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Encoded byte count.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether no bytes were produced.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Format the bytes are encoded in.
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// `Content-Type` value for the bytes.
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// Decode back to pixels.
    pub fn decode(&self) -> Result<Image> {
        Image::decode(&self.data)
    }

    /// Write the bytes to `path`, replacing any existing file.
    ///
    /// A path extension naming another format (`out.png` for JPEG bytes)
    /// is [`Error::InvalidArgument`]. Unknown or missing extensions are
    /// written as given.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let named = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(ImageFormat::from_extension);
        if let Some(named) = named
            && named != self.format
        {
            return Err(Error::InvalidArgument(format!(
                "{} names {named} but the data is {}; use .{}",
                path.display(),
                self.format,
                self.format.extensions().join(" or .")
            )));
        }
        std::fs::write(path, &self.data)?;
        Ok(())
    }
}

impl AsRef<[u8]> for EncodeOutput {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl From<EncodeOutput> for Vec<u8> {
    fn from(output: EncodeOutput) -> Self {
        output.data
    }
}
