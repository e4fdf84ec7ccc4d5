//! Crate-level error type and `Result` alias.
//! Wraps underlying I/O, array, image, HTTP and archive errors, and provides
//! semantic variants for geometry preconditions, filter validation and
//! checksum failures.
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read {path:?}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },

    #[error("Size must be greater than 0, got: {size}")]
    ZeroSize { size: usize },

    #[error("Must be downscaling: source {axis} is {raw}, target is {target}")]
    Upscale {
        axis: &'static str,
        raw: usize,
        target: usize,
    },

    #[error("Crop window [{start}, {end}) falls outside scaled {axis} of {scaled}")]
    CropOutOfBounds {
        axis: &'static str,
        start: i64,
        end: i64,
        scaled: usize,
    },

    #[error("Unsupported channel count: {channels} (expected 1 to 4)")]
    UnsupportedChannels { channels: usize },

    #[error("Checksum mismatch for {path:?}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("Processing error: {0}")]
    Processing(String),
}

impl Error {
    pub fn processing<E: std::fmt::Display>(e: E) -> Self {
        Error::Processing(e.to_string())
    }
}
