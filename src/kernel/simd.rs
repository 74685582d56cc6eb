//! SIMD-accelerated formula kernel using the `wide` crate.
//!
//! The sample loop is vectorized four lanes at a time with `f64x4`. Each lane
//! keeps its own compensated partial sums, which are folded into a scalar
//! compensated sum once per voxel; the tail continues on that scalar sum. The
//! results track `FormulaScalar` to rounding.

use crate::kernel::scalar::formula_from_sums;
use crate::kernel::{CorrelatePlan, Kernel};
use crate::util::math::CompensatedSum;
use wide::f64x4;

const LANES: usize = 4;

/// Load 4 f64 values into f64x4.
#[inline]
fn load_f64x4(slice: &[f64]) -> f64x4 {
    f64x4::from([slice[0], slice[1], slice[2], slice[3]])
}

/// Per-lane Kahan accumulator.
#[derive(Clone, Copy)]
struct LaneSum {
    sum: f64x4,
    comp: f64x4,
}

impl LaneSum {
    const ZERO: Self = Self {
        sum: f64x4::ZERO,
        comp: f64x4::ZERO,
    };

    #[inline]
    fn add(&mut self, value: f64x4) {
        let y = value - self.comp;
        let t = self.sum + y;
        self.comp = (t - self.sum) - y;
        self.sum = t;
    }

    /// Folds the lanes into a scalar compensated sum.
    #[inline]
    fn reduce(self) -> CompensatedSum {
        let mut acc = CompensatedSum::new();
        for (sum, comp) in self.sum.to_array().into_iter().zip(self.comp.to_array()) {
            acc.add(sum);
            acc.add(-comp);
        }
        acc
    }
}

/// SIMD closed-form Pearson kernel.
pub struct FormulaSimd;

impl Kernel for FormulaSimd {
    fn score_row(row: &[f64], plan: &CorrelatePlan) -> f64 {
        let ys = plan.centered();
        let len = row.len().min(ys.len());
        let simd_end = len / LANES * LANES;
        let shift = row.first().copied().unwrap_or(0.0);
        let shift_vec = f64x4::splat(shift);

        let mut sum_x_vec = LaneSum::ZERO;
        let mut sum_x2_vec = LaneSum::ZERO;
        let mut sum_xy_vec = LaneSum::ZERO;

        let mut i = 0;
        while i < simd_end {
            let x = load_f64x4(&row[i..]) - shift_vec;
            let y = load_f64x4(&ys[i..]);
            sum_x_vec.add(x);
            sum_x2_vec.add(x * x);
            sum_xy_vec.add(x * y);
            i += LANES;
        }

        let mut sum_x = sum_x_vec.reduce();
        let mut sum_x2 = sum_x2_vec.reduce();
        let mut sum_xy = sum_xy_vec.reduce();
        while i < len {
            let x = row[i] - shift;
            sum_x.add(x);
            sum_x2.add(x * x);
            sum_xy.add(x * ys[i]);
            i += 1;
        }

        let constant = row[..len].iter().all(|&x| x == shift);
        formula_from_sums(
            sum_x.total(),
            sum_x2.total(),
            sum_xy.total(),
            constant,
            plan,
        )
    }
}
