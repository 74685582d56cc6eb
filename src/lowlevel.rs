//! Low-level building blocks for custom pipelines.
//!
//! These expose the correlate plan, the kernel trait, and the concrete
//! kernels behind `compute_rmap`. Most users should call `compute_rmap`.

pub use crate::kernel::scalar::{FormulaScalar, ReferenceScalar};
pub use crate::kernel::{CorrelatePlan, Kernel};

#[cfg(feature = "rayon")]
pub use crate::kernel::rayon::scan_par;
#[cfg(feature = "simd")]
pub use crate::kernel::simd::FormulaSimd;
