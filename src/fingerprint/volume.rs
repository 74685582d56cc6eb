//! 3-D volumes and the flatten/reshape pair that moves between volumes and
//! fingerprint matrices.
//!
//! Volumes store their voxels in column-major order (x fastest, then y, then
//! z), which is also the NIfTI on-disk order. `flatten_volumes` and
//! `reshape_map` both use this order, so a map computed from flattened
//! volumes lands back on the voxel it came from.

use crate::fingerprint::FingerprintMatrix;
use crate::util::{RmapError, RmapResult};

/// Canonical volume dimensions in voxels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VolumeDims {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
}

impl Default for VolumeDims {
    /// MNI 2 mm grid.
    fn default() -> Self {
        Self {
            nx: 91,
            ny: 109,
            nz: 91,
        }
    }
}

impl VolumeDims {
    pub fn new(nx: usize, ny: usize, nz: usize) -> Self {
        Self { nx, ny, nz }
    }

    /// Returns the dimensions as an array.
    pub fn as_array(&self) -> [usize; 3] {
        [self.nx, self.ny, self.nz]
    }

    /// Returns the voxel count, or `None` on overflow.
    pub fn voxel_count(&self) -> Option<usize> {
        self.nx.checked_mul(self.ny)?.checked_mul(self.nz)
    }

    /// Validates that every axis is non-empty and the product fits in memory.
    pub fn validate(&self) -> RmapResult<()> {
        if self.nx == 0 || self.ny == 0 || self.nz == 0 {
            return Err(RmapError::InvalidInput("volume dimensions must be non-zero"));
        }
        if self.voxel_count().is_none() {
            return Err(RmapError::InvalidInput("volume dimensions overflow"));
        }
        Ok(())
    }

    /// Linear column-major index of voxel `(x, y, z)`.
    #[inline]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        x + self.nx * (y + self.ny * z)
    }
}

/// Owned 3-D volume in column-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct Volume {
    dims: VolumeDims,
    data: Vec<f64>,
}

impl Volume {
    /// Wraps column-major data; its length must equal the voxel count.
    pub fn new(data: Vec<f64>, dims: VolumeDims) -> RmapResult<Self> {
        dims.validate()?;
        let expected = dims.voxel_count().unwrap_or(usize::MAX);
        if data.len() != expected {
            return Err(RmapError::ReshapeMismatch {
                len: data.len(),
                dims: dims.as_array(),
                expected,
            });
        }
        Ok(Self { dims, data })
    }

    /// Builds a volume by evaluating `f(x, y, z)` at every voxel.
    pub fn from_fn<F>(dims: VolumeDims, mut f: F) -> RmapResult<Self>
    where
        F: FnMut(usize, usize, usize) -> f64,
    {
        dims.validate()?;
        let mut data = Vec::with_capacity(dims.voxel_count().unwrap_or(0));
        for z in 0..dims.nz {
            for y in 0..dims.ny {
                for x in 0..dims.nx {
                    data.push(f(x, y, z));
                }
            }
        }
        Ok(Self { dims, data })
    }

    pub fn dims(&self) -> VolumeDims {
        self.dims
    }

    /// Returns the voxel values in column-major order.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn into_data(self) -> Vec<f64> {
        self.data
    }

    /// Returns the value at `(x, y, z)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize, z: usize) -> Option<f64> {
        if x >= self.dims.nx || y >= self.dims.ny || z >= self.dims.nz {
            return None;
        }
        self.data.get(self.dims.index(x, y, z)).copied()
    }
}

/// Stacks same-shaped volumes into a voxel-by-sample matrix.
///
/// Volume `j` becomes sample column `j`; voxel order follows each volume's
/// column-major element order.
pub fn flatten_volumes(volumes: &[Volume]) -> RmapResult<FingerprintMatrix> {
    let first = volumes
        .first()
        .ok_or(RmapError::InvalidInput("no volumes to flatten"))?;
    flatten_checked(volumes, first.dims())
}

/// Like `flatten_volumes`, but every volume must have exactly `dims`.
///
/// A map computed from the result can then be reshaped with `dims` without
/// transposing axes; a permuted shape with the same voxel count fails with
/// `VolumeShapeMismatch`.
pub fn flatten_volumes_with_dims(
    volumes: &[Volume],
    dims: VolumeDims,
) -> RmapResult<FingerprintMatrix> {
    if volumes.is_empty() {
        return Err(RmapError::InvalidInput("no volumes to flatten"));
    }
    flatten_checked(volumes, dims)
}

fn flatten_checked(volumes: &[Volume], dims: VolumeDims) -> RmapResult<FingerprintMatrix> {
    for (index, vol) in volumes.iter().enumerate() {
        if vol.dims() != dims {
            return Err(RmapError::VolumeShapeMismatch {
                index,
                expected: dims.as_array(),
                got: vol.dims().as_array(),
            });
        }
    }

    let voxels = volumes[0].data().len();
    let samples = volumes.len();
    let mut data = vec![0.0f64; matrix_len(voxels, samples)?];
    for (sample, vol) in volumes.iter().enumerate() {
        for (voxel, &value) in vol.data().iter().enumerate() {
            data[voxel * samples + sample] = value;
        }
    }
    FingerprintMatrix::new(data, voxels, samples)
}

fn matrix_len(voxels: usize, samples: usize) -> RmapResult<usize> {
    voxels
        .checked_mul(samples)
        .ok_or(RmapError::InvalidDimensions { voxels, samples })
}

/// Reshapes a flat correlation map back into a volume of `dims`.
///
/// Fails with `ReshapeMismatch` unless `map.len()` equals the voxel count.
pub fn reshape_map(map: &[f64], dims: VolumeDims) -> RmapResult<Volume> {
    Volume::new(map.to_vec(), dims)
}

#[cfg(test)]
mod tests {
    use super::{
        flatten_volumes, flatten_volumes_with_dims, matrix_len, reshape_map, Volume, VolumeDims,
    };
    use crate::util::RmapError;

    #[test]
    fn index_is_x_fastest() {
        let dims = VolumeDims::new(2, 3, 4);
        assert_eq!(dims.index(1, 0, 0), 1);
        assert_eq!(dims.index(0, 1, 0), 2);
        assert_eq!(dims.index(0, 0, 1), 6);
        assert_eq!(dims.index(1, 2, 3), 23);
    }

    #[test]
    fn flatten_puts_volumes_in_columns() {
        let dims = VolumeDims::new(2, 1, 1);
        let a = Volume::new(vec![1.0, 2.0], dims).unwrap();
        let b = Volume::new(vec![3.0, 4.0], dims).unwrap();
        let m = flatten_volumes(&[a, b]).unwrap();
        assert_eq!(m.voxels(), 2);
        assert_eq!(m.samples(), 2);
        assert_eq!(m.data(), &[1.0, 3.0, 2.0, 4.0]);
    }

    #[test]
    fn flatten_rejects_mixed_shapes() {
        let a = Volume::new(vec![0.0; 6], VolumeDims::new(1, 2, 3)).unwrap();
        let b = Volume::new(vec![0.0; 6], VolumeDims::new(3, 2, 1)).unwrap();
        let err = flatten_volumes(&[a, b]).unwrap_err();
        assert_eq!(
            err,
            RmapError::VolumeShapeMismatch {
                index: 1,
                expected: [1, 2, 3],
                got: [3, 2, 1],
            }
        );
    }

    #[test]
    fn permuted_dims_are_rejected() {
        let vol = Volume::new(vec![0.0; 6], VolumeDims::new(2, 3, 1)).unwrap();
        let err = flatten_volumes_with_dims(&[vol.clone()], VolumeDims::new(3, 2, 1)).unwrap_err();
        assert_eq!(
            err,
            RmapError::VolumeShapeMismatch {
                index: 0,
                expected: [3, 2, 1],
                got: [2, 3, 1],
            }
        );
        let m = flatten_volumes_with_dims(&[vol], VolumeDims::new(2, 3, 1)).unwrap();
        assert_eq!(m.voxels(), 6);
        assert!(flatten_volumes_with_dims(&[], VolumeDims::new(2, 3, 1)).is_err());
    }

    #[test]
    fn matrix_len_overflow_is_an_error() {
        assert_eq!(matrix_len(902_629, 40).unwrap(), 36_105_160);
        assert_eq!(
            matrix_len(usize::MAX, 2).unwrap_err(),
            RmapError::InvalidDimensions {
                voxels: usize::MAX,
                samples: 2,
            }
        );
    }

    #[test]
    fn reshape_checks_length() {
        let err = reshape_map(&[0.0; 5], VolumeDims::new(2, 2, 2)).unwrap_err();
        assert_eq!(
            err,
            RmapError::ReshapeMismatch {
                len: 5,
                dims: [2, 2, 2],
                expected: 8,
            }
        );
    }

    #[test]
    fn default_dims_are_mni_2mm() {
        let dims = VolumeDims::default();
        assert_eq!(dims.as_array(), [91, 109, 91]);
        assert_eq!(dims.voxel_count(), Some(902_629));
    }
}
