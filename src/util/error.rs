//! Error types for rmap.

use thiserror::Error;

/// Result alias for rmap operations.
pub type RmapResult<T> = std::result::Result<T, RmapError>;

/// Errors that can occur when building inputs, computing maps, or doing I/O.
///
/// Degenerate (zero-variance) voxels are not errors: they show up as NaN in
/// the correlation map.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RmapError {
    /// Matrix dimensions must be non-zero.
    #[error("invalid dimensions: {voxels} voxels x {samples} samples")]
    InvalidDimensions { voxels: usize, samples: usize },
    /// The row stride is smaller than the number of samples.
    #[error("invalid stride {stride} for {samples} samples")]
    InvalidStride { samples: usize, stride: usize },
    /// The backing buffer cannot hold the requested matrix.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// Sample count of the fingerprint matrix disagrees with the correlate length.
    #[error("shape mismatch: fingerprint matrix has {samples} samples but correlate vector has {correlates} values")]
    ShapeMismatch { samples: usize, correlates: usize },
    /// A flat map cannot be reshaped into the requested volume.
    #[error("reshape mismatch: {len} values cannot fill a {}x{}x{} volume ({expected} voxels)", dims[0], dims[1], dims[2])]
    ReshapeMismatch {
        len: usize,
        dims: [usize; 3],
        expected: usize,
    },
    /// A volume in a stack does not share the shape of the first one.
    #[error("volume {index} has shape {got:?}, expected {expected:?}")]
    VolumeShapeMismatch {
        index: usize,
        expected: [usize; 3],
        got: [usize; 3],
    },
    /// The fingerprint filter is missing the substring its mode requires.
    #[error("invalid filter configuration: {reason}")]
    InvalidFilter { reason: &'static str },
    /// No file in the directory passed the filter.
    #[error("no fingerprints matched in {dir}")]
    NoFingerprints { dir: String },
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// Filesystem access failed.
    #[error("i/o error at {path}: {reason}")]
    Io { path: String, reason: String },
    /// Volume decoding or encoding failed.
    #[error("nifti error: {reason}")]
    Nifti { reason: String },
}
