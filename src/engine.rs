//! High-level R-map computation.
//!
//! `compute_rmap` picks a kernel from `RmapConfig` and returns one coefficient
//! per voxel. Degenerate voxels come back as NaN; replacing them is a separate
//! step through `sanitize`.

use crate::fingerprint::FingerprintView;
#[cfg(feature = "rayon")]
use crate::kernel::rayon::scan_par;
use crate::kernel::scalar::ReferenceScalar;
use crate::kernel::{CorrelatePlan, Kernel};
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::{RmapError, RmapResult};

#[cfg(not(feature = "simd"))]
use crate::kernel::scalar::FormulaScalar as Formula;
#[cfg(feature = "simd")]
use crate::kernel::simd::FormulaSimd as Formula;

/// Correlation algorithm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Method {
    /// Closed-form Pearson over raw sums.
    #[default]
    Formula,
    /// Independent two-pass Pearson per voxel.
    Reference,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Formula => "formula",
            Method::Reference => "reference",
        }
    }
}

/// Configuration for `compute_rmap`.
#[derive(Clone, Debug, Default)]
pub struct RmapConfig {
    pub method: Method,
    /// Split voxel rows across threads. Falls back to a sequential scan
    /// without the `rayon` feature.
    pub parallel: bool,
}

/// Computes the correlation map of every voxel row against `correlates`.
///
/// `Method::Formula` runs `FormulaSimd` when the `simd` feature is on and
/// `FormulaScalar` otherwise. Both shift each row, center the correlate and
/// use compensated sums, so the feature changes summation order only; maps
/// agree to rounding.
pub fn compute_rmap(
    fingerprints: FingerprintView<'_>,
    correlates: &[f64],
    cfg: &RmapConfig,
) -> RmapResult<Vec<f64>> {
    if fingerprints.samples() != correlates.len() {
        return Err(RmapError::ShapeMismatch {
            samples: fingerprints.samples(),
            correlates: correlates.len(),
        });
    }

    let _span = trace_span!(
        "rmap",
        voxels = fingerprints.voxels(),
        samples = fingerprints.samples(),
        method = cfg.method.as_str(),
        parallel = cfg.parallel
    )
    .entered();

    let plan = CorrelatePlan::new(correlates)?;
    if plan.is_degenerate() {
        trace_warn!("degenerate_correlate", samples = plan.len());
    }

    let map = match (cfg.method, cfg.parallel) {
        #[cfg(feature = "rayon")]
        (Method::Formula, true) => scan_par::<Formula>(fingerprints, &plan)?,
        #[cfg(feature = "rayon")]
        (Method::Reference, true) => scan_par::<ReferenceScalar>(fingerprints, &plan)?,
        (Method::Formula, _) => <Formula as Kernel>::scan(fingerprints, &plan)?,
        (Method::Reference, _) => <ReferenceScalar as Kernel>::scan(fingerprints, &plan)?,
    };

    trace_event!("rmap_done", degenerate = count_degenerate(&map));
    Ok(map)
}

/// Closed-form R-map with default settings.
pub fn rmap_formula(fingerprints: FingerprintView<'_>, correlates: &[f64]) -> RmapResult<Vec<f64>> {
    compute_rmap(fingerprints, correlates, &RmapConfig::default())
}

/// Reference R-map: one full correlation per voxel.
pub fn rmap_reference(
    fingerprints: FingerprintView<'_>,
    correlates: &[f64],
) -> RmapResult<Vec<f64>> {
    compute_rmap(
        fingerprints,
        correlates,
        &RmapConfig {
            method: Method::Reference,
            ..RmapConfig::default()
        },
    )
}

/// Counts NaN coefficients in a map.
pub fn count_degenerate(map: &[f64]) -> usize {
    map.iter().filter(|r| r.is_nan()).count()
}

/// What to do with NaN coefficients before writing a map.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum NanPolicy {
    /// Leave NaN in place.
    Keep,
    /// Replace NaN with 0.
    #[default]
    Zero,
    /// Replace NaN with a fixed value.
    Fill(f64),
}

/// Replaces NaN coefficients in place according to `policy`.
///
/// Returns the number of replaced entries.
pub fn sanitize(map: &mut [f64], policy: NanPolicy) -> usize {
    let fill = match policy {
        NanPolicy::Keep => return 0,
        NanPolicy::Zero => 0.0,
        NanPolicy::Fill(value) => value,
    };
    let mut replaced = 0;
    for r in map.iter_mut().filter(|r| r.is_nan()) {
        *r = fill;
        replaced += 1;
    }
    replaced
}
