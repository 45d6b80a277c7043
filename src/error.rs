//! Error types for bitmap conversion and emission.
//!
//! This module defines all possible errors that can occur while loading
//! input images, validating configuration, and writing generated sources.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for bitmap conversion.
///
/// Every variant is fatal for the run that produced it; nothing is retried.
#[derive(Error, Debug)]
pub enum Error {
    /// Input image could not be opened or decoded.
    ///
    /// Wraps the underlying `image` error together with the offending path.
    #[error("Failed to load image {path:?}")]
    LoadImage {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// An output artifact could not be written.
    #[error("Failed to write {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generated text contains a byte outside of 7-bit ASCII.
    ///
    /// The consuming toolchain only accepts plain ASCII sources, so the
    /// artifact is rejected before anything reaches the disk.
    #[error("Non-ASCII byte in {artifact} at offset {offset}")]
    NonAscii { artifact: String, offset: usize },

    /// Invalid configuration parameter provided.
    #[error("Invalid configuration parameter: {0}")]
    InvalidConfig(String),

    #[error("No glyph image listed for code {0}")]
    MissingGlyph(u32),
}
