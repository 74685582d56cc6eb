//! Correlation kernel implementations.

use crate::fingerprint::FingerprintView;
use crate::util::{RmapError, RmapResult};

pub mod plan;
pub mod scalar;

#[cfg(feature = "simd")]
pub mod simd;

#[cfg(feature = "rayon")]
pub mod rayon;

pub use plan::CorrelatePlan;

/// Kernel trait for per-voxel scoring and full-map scans.
pub trait Kernel {
    /// Computes the coefficient of one voxel row against the planned correlate.
    ///
    /// `row.len()` must equal `plan.len()`; `scan` checks this once up front.
    fn score_row(row: &[f64], plan: &CorrelatePlan) -> f64;

    /// Computes one coefficient per voxel row, in row order.
    fn scan(fingerprints: FingerprintView<'_>, plan: &CorrelatePlan) -> RmapResult<Vec<f64>> {
        check_shape(fingerprints, plan)?;
        Ok(fingerprints
            .rows()
            .map(|row| Self::score_row(row, plan))
            .collect())
    }
}

/// Fails with `ShapeMismatch` unless the sample count matches the correlate length.
pub(crate) fn check_shape(fingerprints: FingerprintView<'_>, plan: &CorrelatePlan) -> RmapResult<()> {
    if fingerprints.samples() != plan.len() {
        return Err(RmapError::ShapeMismatch {
            samples: fingerprints.samples(),
            correlates: plan.len(),
        });
    }
    Ok(())
}
