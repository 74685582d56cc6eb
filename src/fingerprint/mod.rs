//! Fingerprint matrices: voxels as rows, samples as columns.
//!
//! `FingerprintView` is a borrowed 2D view into a 1D buffer with an explicit
//! stride. The stride counts elements between the starts of consecutive voxel
//! rows, so a stride larger than the sample count represents padded rows.
//! `FingerprintMatrix` owns a contiguous buffer and hands out views.

use crate::util::{RmapError, RmapResult};

pub mod volume;

/// Borrowed voxel-by-sample view with an explicit row stride.
#[derive(Copy, Clone, Debug)]
pub struct FingerprintView<'a> {
    data: &'a [f64],
    voxels: usize,
    samples: usize,
    stride: usize,
}

impl<'a> FingerprintView<'a> {
    /// Creates a contiguous view with `stride == samples`.
    pub fn from_slice(data: &'a [f64], voxels: usize, samples: usize) -> RmapResult<Self> {
        Self::new(data, voxels, samples, samples)
    }

    /// Creates a view with an explicit stride.
    pub fn new(data: &'a [f64], voxels: usize, samples: usize, stride: usize) -> RmapResult<Self> {
        let needed = required_len(voxels, samples, stride)?;
        if data.len() < needed {
            return Err(RmapError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            voxels,
            samples,
            stride,
        })
    }

    /// Returns the number of voxel rows (V).
    pub fn voxels(&self) -> usize {
        self.voxels
    }

    /// Returns the number of sample columns (N).
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [f64] {
        self.data
    }

    /// Returns the value of `voxel` in `sample` if it is within bounds.
    pub fn get(&self, voxel: usize, sample: usize) -> Option<f64> {
        if voxel >= self.voxels || sample >= self.samples {
            return None;
        }
        let idx = voxel.checked_mul(self.stride)?.checked_add(sample)?;
        self.data.get(idx).copied()
    }

    /// Returns the measurements of one voxel across all samples.
    pub fn row(&self, voxel: usize) -> Option<&'a [f64]> {
        if voxel >= self.voxels {
            return None;
        }
        let start = voxel.checked_mul(self.stride)?;
        let end = start.checked_add(self.samples)?;
        self.data.get(start..end)
    }

    /// Gathers one sample's values across all voxels.
    pub fn column(&self, sample: usize) -> Option<Vec<f64>> {
        if sample >= self.samples {
            return None;
        }
        self.rows().map(|row| row.get(sample).copied()).collect()
    }

    /// Iterates over voxel rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &'a [f64]> + 'a {
        let view = *self;
        (0..view.voxels).filter_map(move |v| view.row(v))
    }

    /// Returns a zero-copy view over the voxel range `start..start + len`.
    pub fn voxel_range(&self, start: usize, len: usize) -> RmapResult<FingerprintView<'a>> {
        let end = start.checked_add(len).ok_or(RmapError::InvalidDimensions {
            voxels: len,
            samples: self.samples,
        })?;
        if len == 0 || end > self.voxels {
            return Err(RmapError::InvalidDimensions {
                voxels: len,
                samples: self.samples,
            });
        }
        let offset = start * self.stride;
        let data = self
            .data
            .get(offset..)
            .ok_or(RmapError::BufferTooSmall {
                needed: offset.saturating_add(1),
                got: self.data.len(),
            })?;
        FingerprintView::new(data, len, self.samples, self.stride)
    }
}

/// Owned contiguous voxel-by-sample matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct FingerprintMatrix {
    data: Vec<f64>,
    voxels: usize,
    samples: usize,
}

impl FingerprintMatrix {
    /// Wraps a row-major buffer of exactly `voxels * samples` values.
    pub fn new(data: Vec<f64>, voxels: usize, samples: usize) -> RmapResult<Self> {
        let needed = required_len(voxels, samples, samples)?;
        if data.len() < needed {
            return Err(RmapError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(RmapError::InvalidDimensions { voxels, samples });
        }
        Ok(Self {
            data,
            voxels,
            samples,
        })
    }

    /// Builds a matrix from voxel rows of equal length.
    pub fn from_rows(rows: &[Vec<f64>]) -> RmapResult<Self> {
        let voxels = rows.len();
        let samples = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(voxels.saturating_mul(samples));
        for row in rows {
            if row.len() != samples {
                return Err(RmapError::InvalidInput("voxel rows must share one length"));
            }
            data.extend_from_slice(row);
        }
        Self::new(data, voxels, samples)
    }

    /// Returns the number of voxel rows (V).
    pub fn voxels(&self) -> usize {
        self.voxels
    }

    /// Returns the number of sample columns (N).
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Returns the row-major backing buffer.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Returns a borrowed view of the matrix.
    pub fn view(&self) -> FingerprintView<'_> {
        FingerprintView {
            data: &self.data,
            voxels: self.voxels,
            samples: self.samples,
            stride: self.samples,
        }
    }
}

fn required_len(voxels: usize, samples: usize, stride: usize) -> RmapResult<usize> {
    if voxels == 0 || samples == 0 {
        return Err(RmapError::InvalidDimensions { voxels, samples });
    }
    if stride < samples {
        return Err(RmapError::InvalidStride { samples, stride });
    }
    (voxels - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(samples))
        .ok_or(RmapError::InvalidDimensions { voxels, samples })
}

#[cfg(test)]
mod tests {
    use super::{FingerprintMatrix, FingerprintView};
    use crate::util::RmapError;

    #[test]
    fn padded_view_skips_padding() {
        let data = [1.0, 2.0, -9.0, 3.0, 4.0];
        let view = FingerprintView::new(&data, 2, 2, 3).unwrap();
        assert_eq!(view.row(0).unwrap(), &[1.0, 2.0]);
        assert_eq!(view.row(1).unwrap(), &[3.0, 4.0]);
        assert_eq!(view.get(1, 1), Some(4.0));
        assert_eq!(view.get(2, 0), None);
        assert_eq!(view.rows().count(), 2);
    }

    #[test]
    fn voxel_range_is_zero_copy() {
        let m = FingerprintMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]])
            .unwrap();
        let sub = m.view().voxel_range(1, 2).unwrap();
        assert_eq!(sub.voxels(), 2);
        assert_eq!(sub.row(0).unwrap(), &[3.0, 4.0]);
        assert_eq!(sub.row(1).unwrap(), &[5.0, 6.0]);
        assert!(m.view().voxel_range(2, 2).is_err());
    }

    #[test]
    fn ragged_rows_rejected() {
        let err = FingerprintMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert_eq!(
            err,
            RmapError::InvalidInput("voxel rows must share one length")
        );
    }

    #[test]
    fn oversized_buffer_rejected() {
        let err = FingerprintMatrix::new(vec![0.0; 7], 2, 3).unwrap_err();
        assert_eq!(
            err,
            RmapError::InvalidDimensions {
                voxels: 2,
                samples: 3
            }
        );
    }
}
