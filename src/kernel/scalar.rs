//! Scalar kernels: the closed-form formula and the per-voxel reference.

use crate::kernel::{CorrelatePlan, Kernel};
use crate::util::math::{clamp_unit, compensated_sum, is_constant, CompensatedSum};
use crate::util::{RmapError, RmapResult};

/// Closed-form Pearson kernel over shifted sums.
///
/// Per voxel it accumulates `Σx`, `Σx²` and `Σxy` with every `x` shifted by
/// the row's first value, against the plan's centered correlate.
pub struct FormulaScalar;

/// Reference kernel: full two-pass Pearson correlation per voxel.
///
/// Ignores the plan's precomputed sums and correlates each row against the
/// raw correlate values, so it can serve as an oracle for `FormulaScalar`.
pub struct ReferenceScalar;

impl Kernel for FormulaScalar {
    fn score_row(row: &[f64], plan: &CorrelatePlan) -> f64 {
        let shift = row.first().copied().unwrap_or(0.0);
        let mut constant = true;
        let mut sum_x = CompensatedSum::new();
        let mut sum_x2 = CompensatedSum::new();
        let mut sum_xy = CompensatedSum::new();

        for (&x, &y) in row.iter().zip(plan.centered()) {
            if x != shift {
                constant = false;
            }
            let x = x - shift;
            sum_x.add(x);
            sum_x2.add(x * x);
            sum_xy.add(x * y);
        }

        formula_from_sums(
            sum_x.total(),
            sum_x2.total(),
            sum_xy.total(),
            constant,
            plan,
        )
    }
}

impl Kernel for ReferenceScalar {
    fn score_row(row: &[f64], plan: &CorrelatePlan) -> f64 {
        pearson_unchecked(row, plan.values())
    }
}

/// Finishes the closed-form coefficient from per-row sums.
///
/// The sums must be taken against `plan.centered()`; any constant shift of
/// the row itself cancels out.
///
/// Constant rows, a constant correlate, or a non-positive variance term
/// after rounding all yield NaN.
#[inline]
pub(crate) fn formula_from_sums(
    sum_x: f64,
    sum_x2: f64,
    sum_xy: f64,
    constant: bool,
    plan: &CorrelatePlan,
) -> f64 {
    if constant || plan.is_degenerate() {
        return f64::NAN;
    }
    let n = plan.n();
    let numer = n * sum_xy - sum_x * plan.sum_y();
    let denom_x = n * sum_x2 - sum_x * sum_x;
    if denom_x <= 0.0 {
        return f64::NAN;
    }
    clamp_unit(numer / (denom_x * plan.denom_y()).sqrt())
}

/// Pearson correlation of two equal-length vectors.
///
/// Returns NaN when either vector is constant. The result is symmetric in
/// its arguments bit for bit.
pub fn pearson(a: &[f64], b: &[f64]) -> RmapResult<f64> {
    if a.is_empty() || b.is_empty() {
        return Err(RmapError::InvalidInput("correlation needs non-empty vectors"));
    }
    if a.len() != b.len() {
        return Err(RmapError::ShapeMismatch {
            samples: a.len(),
            correlates: b.len(),
        });
    }
    Ok(pearson_unchecked(a, b))
}

pub(crate) fn pearson_unchecked(a: &[f64], b: &[f64]) -> f64 {
    if is_constant(a) || is_constant(b) {
        return f64::NAN;
    }
    let n = a.len() as f64;
    let mean_a = compensated_sum(a) / n;
    let mean_b = compensated_sum(b) / n;

    let mut cov = CompensatedSum::new();
    let mut var_a = CompensatedSum::new();
    let mut var_b = CompensatedSum::new();
    for (&x, &y) in a.iter().zip(b) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        cov.add(dx * dy);
        var_a.add(dx * dx);
        var_b.add(dy * dy);
    }

    let denom = (var_a.total() * var_b.total()).sqrt();
    if denom.is_nan() || denom <= 0.0 {
        return f64::NAN;
    }
    clamp_unit(cov.total() / denom)
}
