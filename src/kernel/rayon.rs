//! Rayon-parallel scans (feature-gated).
//!
//! Voxel rows are independent given the shared correlate plan, so the map is
//! split over rows and each thread runs the sequential kernel on its share.

use crate::fingerprint::FingerprintView;
use crate::kernel::{check_shape, CorrelatePlan, Kernel};
use crate::util::RmapResult;
use rayon::prelude::*;

/// Rows handed to one rayon task at a time.
const MIN_ROWS_PER_TASK: usize = 1024;

/// Row-parallel full scan for any kernel.
///
/// Output order matches `K::scan`.
pub fn scan_par<K: Kernel>(
    fingerprints: FingerprintView<'_>,
    plan: &CorrelatePlan,
) -> RmapResult<Vec<f64>> {
    check_shape(fingerprints, plan)?;

    let map = (0..fingerprints.voxels())
        .into_par_iter()
        .with_min_len(MIN_ROWS_PER_TASK)
        .map(|voxel| {
            let row = fingerprints.row(voxel).expect("row within bounds");
            K::score_row(row, plan)
        })
        .collect();
    Ok(map)
}
