//! Numeric helpers shared by the correlation kernels.

/// Neumaier-compensated running sum.
///
/// Keeps a separate compensation term so long sums of squared values do not
/// drift when the sample count grows.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct CompensatedSum {
    sum: f64,
    comp: f64,
}

impl CompensatedSum {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn add(&mut self, value: f64) {
        let t = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.comp += (self.sum - t) + value;
        } else {
            self.comp += (value - t) + self.sum;
        }
        self.sum = t;
    }

    #[inline]
    pub(crate) fn total(&self) -> f64 {
        self.sum + self.comp
    }
}

/// Returns the compensated sum of a slice.
pub(crate) fn compensated_sum(values: &[f64]) -> f64 {
    let mut acc = CompensatedSum::new();
    for &v in values {
        acc.add(v);
    }
    acc.total()
}

/// Returns true when every element equals the first one (empty counts as constant).
pub(crate) fn is_constant(values: &[f64]) -> bool {
    match values.first() {
        Some(&first) => values.iter().all(|&v| v == first),
        None => true,
    }
}

/// Clamps a finite coefficient to [-1, 1]; NaN passes through.
#[inline]
pub(crate) fn clamp_unit(r: f64) -> f64 {
    if r.is_nan() {
        r
    } else {
        r.clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{clamp_unit, compensated_sum, is_constant};

    #[test]
    fn compensated_sum_recovers_small_terms() {
        let mut values = vec![1e16];
        values.extend(std::iter::repeat(1.0).take(1000));
        values.push(-1e16);
        assert_eq!(compensated_sum(&values), 1000.0);
    }

    #[test]
    fn constant_detection() {
        assert!(is_constant(&[4.0, 4.0, 4.0]));
        assert!(is_constant(&[]));
        assert!(!is_constant(&[4.0, 4.0, 4.000001]));
        assert!(!is_constant(&[f64::NAN, f64::NAN]));
    }

    #[test]
    fn clamp_keeps_nan() {
        assert!(clamp_unit(f64::NAN).is_nan());
        assert_eq!(clamp_unit(1.0 + 1e-15), 1.0);
        assert_eq!(clamp_unit(-1.0 - 1e-15), -1.0);
        assert_eq!(clamp_unit(0.25), 0.25);
    }
}
