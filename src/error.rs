//! Crate error type.
//!
//! Errors raised while building an image or a view are returned directly.
//! Errors that happen after a computation has been dispatched only ever
//! reach the caller through the continuation or the [`Task`](crate::Task)
//! handle.

use thiserror::Error;

use crate::limits::LimitExceeded;

/// Errors from image, view, and encode operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Malformed or missing construction arguments.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested encode format is unknown or not compiled in.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The view has no pixels inside the image, so there is nothing to encode.
    #[error("view {width}x{height} at ({x}, {y}) has no pixels inside the image")]
    EmptyRegion {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// A configured resource limit was exceeded.
    #[error(transparent)]
    Limit(#[from] LimitExceeded),

    /// The codec failed to encode or decode.
    #[error("codec error: {0}")]
    Codec(#[from] image::ImageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A background computation failed (worker panic, dropped task).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Shorthand for results carrying [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
