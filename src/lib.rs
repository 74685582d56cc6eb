//! rmap computes voxel-wise correlation maps ("R-maps") between connectivity
//! fingerprints and a per-subject outcome measure.
//!
//! Each voxel row of a fingerprint matrix is correlated (Pearson) with the
//! correlate vector. Two kernels produce the same map: a closed-form formula
//! over raw sums, and a per-voxel reference used as an oracle. Parallel scans
//! are available with the `rayon` feature, a SIMD formula kernel with `simd`,
//! and NIfTI reading and writing with `nifti-io`.

pub mod engine;
pub mod fingerprint;
pub mod io;
pub mod kernel;
pub mod lowlevel;
mod trace;
pub mod util;

pub use engine::{
    compute_rmap, count_degenerate, rmap_formula, rmap_reference, sanitize, Method, NanPolicy,
    RmapConfig,
};
pub use fingerprint::volume::{
    flatten_volumes, flatten_volumes_with_dims, reshape_map, Volume, VolumeDims,
};
pub use fingerprint::{FingerprintMatrix, FingerprintView};
pub use io::{Affine, FilterMode, FingerprintFilter};
pub use kernel::scalar::pearson;
pub use util::{RmapError, RmapResult};
