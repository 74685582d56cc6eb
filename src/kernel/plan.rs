//! Correlate precomputation shared by every voxel.

use crate::util::math::{compensated_sum, is_constant, CompensatedSum};
use crate::util::{RmapError, RmapResult};

/// Precomputed sums for a correlate vector.
///
/// The y-dependent half of the Pearson denominator does not change from voxel
/// to voxel, so it is computed once here. The sums are taken over the
/// mean-centered correlate: the coefficient is shift-invariant, and centering
/// keeps `N·Σy² − (Σy)²` from cancelling when outcomes sit on a large offset.
#[derive(Clone, Debug)]
pub struct CorrelatePlan {
    values: Vec<f64>,
    centered: Vec<f64>,
    n: f64,
    sum_y: f64,
    sum_y2: f64,
    degenerate: bool,
}

impl CorrelatePlan {
    /// Builds a plan from the per-sample outcome values.
    pub fn new(correlates: &[f64]) -> RmapResult<Self> {
        if correlates.is_empty() {
            return Err(RmapError::InvalidInput("correlate vector is empty"));
        }

        let n = correlates.len() as f64;
        let mean = compensated_sum(correlates) / n;
        let centered: Vec<f64> = correlates.iter().map(|&y| y - mean).collect();

        let mut sum = CompensatedSum::new();
        let mut sum_sq = CompensatedSum::new();
        for &y in &centered {
            sum.add(y);
            sum_sq.add(y * y);
        }
        let sum_y = sum.total();
        let sum_y2 = sum_sq.total();
        let degenerate = is_constant(correlates) || n * sum_y2 - sum_y * sum_y <= 0.0;

        Ok(Self {
            values: correlates.to_vec(),
            centered,
            n,
            sum_y,
            sum_y2,
            degenerate,
        })
    }

    /// Returns the number of samples (N).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; empty correlates are rejected by `new`.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the raw correlate values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the correlate values minus their mean.
    pub fn centered(&self) -> &[f64] {
        &self.centered
    }

    /// Returns N as a float.
    pub fn n(&self) -> f64 {
        self.n
    }

    /// Returns Σy over the centered correlate (zero up to rounding).
    pub fn sum_y(&self) -> f64 {
        self.sum_y
    }

    /// Returns Σy² over the centered correlate.
    pub fn sum_y2(&self) -> f64 {
        self.sum_y2
    }

    /// Returns `N·Σy² − (Σy)²` over the centered correlate.
    pub fn denom_y(&self) -> f64 {
        self.n * self.sum_y2 - self.sum_y * self.sum_y
    }

    /// True when the correlate has zero variance; every coefficient is then NaN.
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }
}

#[cfg(test)]
mod tests {
    use super::CorrelatePlan;

    #[test]
    fn plan_sums() {
        let plan = CorrelatePlan::new(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(plan.len(), 3);
        assert_eq!(plan.values(), &[1.0, 2.0, 3.0]);
        assert_eq!(plan.centered(), &[-1.0, 0.0, 1.0]);
        assert_eq!(plan.sum_y(), 0.0);
        assert_eq!(plan.sum_y2(), 2.0);
        assert_eq!(plan.denom_y(), 6.0);
        assert!(!plan.is_degenerate());
    }

    #[test]
    fn offset_does_not_change_centered_sums() {
        let base = [0.0, 3.0, 1.0, 7.0, 4.0];
        let shifted: Vec<f64> = base.iter().map(|v| v + 1e8).collect();
        let a = CorrelatePlan::new(&base).unwrap();
        let b = CorrelatePlan::new(&shifted).unwrap();
        assert!((a.denom_y() - b.denom_y()).abs() <= 1e-9 * a.denom_y());
        assert!(b.sum_y().abs() < 1e-6);
        assert!(!b.is_degenerate());
    }

    #[test]
    fn constant_correlate_is_degenerate() {
        let plan = CorrelatePlan::new(&[0.1, 0.1, 0.1, 0.1]).unwrap();
        assert!(plan.is_degenerate());
    }

    #[test]
    fn empty_correlate_rejected() {
        assert!(CorrelatePlan::new(&[]).is_err());
    }
}
