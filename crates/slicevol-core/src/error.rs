//! Error types for slicevol.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to read a raw volume file.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// The file could not be opened or read.
    #[error("failed to read volume file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file ended before every voxel was read.
    #[error("volume file '{path}' is truncated: expected {expected} bytes, got {actual}")]
    ShortRead {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },
}

/// The main error type for slicevol operations.
#[derive(Error, Debug)]
pub enum SlicevolError {
    /// Loading the scan data failed.
    #[error("data load error: {0}")]
    DataLoad(#[from] DataLoadError),

    /// Data size mismatch.
    #[error("data size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// A volume dimension was zero.
    #[error("invalid volume dimensions {width}x{height}x{depth}")]
    InvalidDimensions { width: u32, height: u32, depth: u32 },
}

/// A specialized Result type for slicevol operations.
pub type Result<T> = std::result::Result<T, SlicevolError>;
