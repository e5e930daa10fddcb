//! Size caps applied when decoding into an [`Image`](crate::Image) and when
//! encoding a view.
//!
//! Checks run before pixel work where possible: file size and header
//! dimensions before decode, region dimensions before encode. Output size
//! can only be checked after the encoder has run.

use thiserror::Error;

/// Optional caps; `None` leaves a resource unbounded.
///
/// ```
/// use imgview::ResourceLimits;
///
/// let limits = ResourceLimits::none()
///     .with_max_pixels(100_000_000)
///     .with_max_file_size(64 * 1024 * 1024);
/// assert!(limits.check_dimensions(4096, 4096).is_ok());
/// assert!(limits.check_dimensions(20_000, 20_000).is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct ResourceLimits {
    /// Width × height.
    pub max_pixels: Option<u64>,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    /// Encoded input bytes, checked by `Image::decode_with_limits`.
    pub max_file_size: Option<u64>,
    /// Encoded output bytes, checked by `ImageEncoder`.
    pub max_output_bytes: Option<u64>,
}

fn cap<T: PartialOrd + Copy>(
    max: Option<T>,
    actual: T,
    exceeded: fn(T, T) -> LimitExceeded,
) -> Result<(), LimitExceeded> {
    match max {
        Some(max) if actual > max => Err(exceeded(actual, max)),
        _ => Ok(()),
    }
}

impl ResourceLimits {
    /// No limits (all fields `None`).
    pub const fn none() -> Self {
        Self {
            max_pixels: None,
            max_width: None,
            max_height: None,
            max_file_size: None,
            max_output_bytes: None,
        }
    }

    /// Cap width × height.
    pub const fn with_max_pixels(mut self, max: u64) -> Self {
        self.max_pixels = Some(max);
        self
    }

    /// Cap the width in pixels.
    pub const fn with_max_width(mut self, width: u32) -> Self {
        self.max_width = Some(width);
        self
    }

    /// Cap the height in pixels.
    pub const fn with_max_height(mut self, height: u32) -> Self {
        self.max_height = Some(height);
        self
    }

    /// Cap the encoded input size in bytes.
    pub const fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = Some(bytes);
        self
    }

    /// Cap the encoded output size in bytes.
    pub const fn with_max_output(mut self, bytes: u64) -> Self {
        self.max_output_bytes = Some(bytes);
        self
    }

    /// True when at least one cap is set. Decoding skips the header probe
    /// otherwise.
    pub fn has_any(&self) -> bool {
        *self != Self::none()
    }

    /// Width first, then height, then pixel count.
    pub fn check_dimensions(&self, width: u32, height: u32) -> Result<(), LimitExceeded> {
        cap(self.max_width, width, |actual, max| LimitExceeded::Width { actual, max })?;
        cap(self.max_height, height, |actual, max| LimitExceeded::Height { actual, max })?;
        cap(
            self.max_pixels,
            u64::from(width) * u64::from(height),
            |actual, max| LimitExceeded::Pixels { actual, max },
        )
    }

    /// Check encoded input size against `max_file_size`.
    pub fn check_file_size(&self, bytes: u64) -> Result<(), LimitExceeded> {
        cap(self.max_file_size, bytes, |actual, max| LimitExceeded::FileSize { actual, max })
    }

    /// Check encoded output size against `max_output_bytes`.
    pub fn check_output_size(&self, bytes: u64) -> Result<(), LimitExceeded> {
        cap(self.max_output_bytes, bytes, |actual, max| LimitExceeded::OutputSize {
            actual,
            max,
        })
    }
}

/// Which cap was hit, with the offending value and the cap.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum LimitExceeded {
    #[error("width {actual} exceeds limit {max}")]
    Width { actual: u32, max: u32 },
    #[error("height {actual} exceeds limit {max}")]
    Height { actual: u32, max: u32 },
    #[error("pixel count {actual} exceeds limit {max}")]
    Pixels { actual: u64, max: u64 },
    #[error("file size {actual} bytes exceeds limit {max}")]
    FileSize { actual: u64, max: u64 },
    #[error("output size {actual} bytes exceeds limit {max}")]
    OutputSize { actual: u64, max: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_has_no_limits() {
        let limits = ResourceLimits::none();
        assert!(!limits.has_any());
        assert!(limits.check_dimensions(u32::MAX, u32::MAX).is_ok());
        assert!(limits.check_file_size(u64::MAX).is_ok());
        assert!(limits.check_output_size(u64::MAX).is_ok());
    }

    #[test]
    fn builder_sets_fields() {
        let limits = ResourceLimits::none()
            .with_max_pixels(1000)
            .with_max_width(100)
            .with_max_height(50)
            .with_max_file_size(4096)
            .with_max_output(2048);
        assert!(limits.has_any());
        assert_eq!(limits.max_pixels, Some(1000));
        assert_eq!(limits.max_width, Some(100));
        assert_eq!(limits.max_height, Some(50));
        assert_eq!(limits.max_file_size, Some(4096));
        assert_eq!(limits.max_output_bytes, Some(2048));
    }

    #[test]
    fn check_dimensions_order() {
        let limits = ResourceLimits::none()
            .with_max_width(100)
            .with_max_height(100)
            .with_max_pixels(5000);
        assert_eq!(
            limits.check_dimensions(101, 10),
            Err(LimitExceeded::Width {
                actual: 101,
                max: 100
            })
        );
        assert_eq!(
            limits.check_dimensions(10, 200),
            Err(LimitExceeded::Height {
                actual: 200,
                max: 100
            })
        );
        assert_eq!(
            limits.check_dimensions(100, 100),
            Err(LimitExceeded::Pixels {
                actual: 10_000,
                max: 5000
            })
        );
        assert!(limits.check_dimensions(50, 100).is_ok());
    }

    #[test]
    fn check_sizes() {
        let limits = ResourceLimits::none()
            .with_max_file_size(10)
            .with_max_output(20);
        assert!(limits.check_file_size(10).is_ok());
        assert_eq!(
            limits.check_file_size(11),
            Err(LimitExceeded::FileSize { actual: 11, max: 10 })
        );
        assert!(limits.check_output_size(20).is_ok());
        assert_eq!(
            limits.check_output_size(21),
            Err(LimitExceeded::OutputSize { actual: 21, max: 20 })
        );
    }

    #[test]
    fn display_messages() {
        assert_eq!(
            LimitExceeded::Pixels {
                actual: 10,
                max: 5
            }
            .to_string(),
            "pixel count 10 exceeds limit 5"
        );
        assert_eq!(
            LimitExceeded::OutputSize {
                actual: 300,
                max: 200
            }
            .to_string(),
            "output size 300 bytes exceeds limit 200"
        );
    }
}
