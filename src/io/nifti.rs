//! NIfTI-1 volume loading and saving via the `nifti` crate.
//!
//! Available when the `nifti-io` feature is enabled.

use crate::fingerprint::volume::{reshape_map, Volume, VolumeDims};
use crate::io::affine::{affine_from_quaternion, affine_from_srows, affine_to_srows, voxel_sizes};
use crate::io::filter::{list_fingerprints, FingerprintFilter};
use crate::io::Affine;
use crate::trace::{trace_event, trace_span};
use crate::util::{RmapError, RmapResult};
use ndarray::{Array3, ShapeBuilder};
use nifti::writer::WriterOptions;
use nifti::{IntoNdArray, NiftiHeader, NiftiObject, ReaderOptions};
use std::path::Path;

/// Default output file name for a saved map.
pub const DEFAULT_OUTPUT_NAME: &str = "img.nii";

/// Intent code for "aligned to another file's anatomy".
const XFORM_ALIGNED_ANAT: i16 = 2;

/// One selected fingerprint file and its contents.
#[derive(Clone, Debug)]
pub struct Fingerprint {
    pub name: String,
    pub volume: Volume,
    pub affine: Option<Affine>,
}

fn nifti_err(err: nifti::NiftiError) -> RmapError {
    RmapError::Nifti {
        reason: err.to_string(),
    }
}

/// Reads the voxel-to-world transform from a header.
///
/// Prefers the sform, falls back to the qform, and returns `None` when the
/// header carries neither.
pub fn header_affine(header: &NiftiHeader) -> Option<Affine> {
    if header.sform_code > 0 {
        return Some(affine_from_srows(
            header.srow_x,
            header.srow_y,
            header.srow_z,
        ));
    }
    if header.qform_code > 0 {
        let pixdim = header.pixdim;
        return Some(affine_from_quaternion(
            [
                header.quatern_b as f64,
                header.quatern_c as f64,
                header.quatern_d as f64,
            ],
            [
                header.quatern_x as f64,
                header.quatern_y as f64,
                header.quatern_z as f64,
            ],
            [pixdim[1] as f64, pixdim[2] as f64, pixdim[3] as f64],
            pixdim[0] as f64,
        ));
    }
    None
}

/// Loads a 3-D volume (trailing singleton axes are dropped) and its affine.
pub fn load_volume<P: AsRef<Path>>(path: P) -> RmapResult<(Volume, Option<Affine>)> {
    let obj = ReaderOptions::new()
        .read_file(path.as_ref())
        .map_err(nifti_err)?;
    let affine = header_affine(obj.header());
    let array = obj.into_volume().into_ndarray::<f64>().map_err(nifti_err)?;

    let shape = array.shape();
    if shape.len() < 3 || shape[3..].iter().any(|&extent| extent != 1) {
        return Err(RmapError::InvalidInput("fingerprint volume must be 3-D"));
    }
    let dims = VolumeDims::new(shape[0], shape[1], shape[2]);
    // Reversed axes iterate with x fastest, matching `Volume`'s layout.
    let data: Vec<f64> = array.t().iter().copied().collect();
    let volume = Volume::new(data, dims)?;
    Ok((volume, affine))
}

/// Loads every fingerprint in `dir` that passes `filter`, in sorted name order.
pub fn load_fingerprints<P: AsRef<Path>>(
    dir: P,
    filter: &FingerprintFilter,
) -> RmapResult<Vec<Fingerprint>> {
    let dir = dir.as_ref();
    let _span = trace_span!("load_fingerprints", dir = %dir.display()).entered();

    let names = list_fingerprints(dir, filter)?;
    if names.is_empty() {
        return Err(RmapError::NoFingerprints {
            dir: dir.display().to_string(),
        });
    }
    trace_event!("fingerprints_selected", count = names.len());

    let mut out = Vec::with_capacity(names.len());
    for name in names {
        let (volume, affine) = load_volume(dir.join(&name))?;
        out.push(Fingerprint {
            name,
            volume,
            affine,
        });
    }
    Ok(out)
}

/// Writes a volume with an optional affine.
///
/// With an affine the sform is set (aligned-anatomy code) and voxel sizes are
/// derived from it; without one the header keeps no transform.
pub fn save_volume<P: AsRef<Path>>(
    path: P,
    volume: &Volume,
    affine: Option<&Affine>,
) -> RmapResult<()> {
    let path = path.as_ref();
    let _span = trace_span!("save_volume", path = %path.display()).entered();

    let dims = volume.dims();
    let array = Array3::from_shape_vec((dims.nx, dims.ny, dims.nz).f(), volume.data().to_vec())
        .map_err(|_| RmapError::ReshapeMismatch {
            len: volume.data().len(),
            dims: dims.as_array(),
            expected: dims.voxel_count().unwrap_or(usize::MAX),
        })?;

    let mut header = NiftiHeader::default();
    if let Some(affine) = affine {
        let [srow_x, srow_y, srow_z] = affine_to_srows(affine);
        header.srow_x = srow_x;
        header.srow_y = srow_y;
        header.srow_z = srow_z;
        header.sform_code = XFORM_ALIGNED_ANAT;
        let sizes = voxel_sizes(affine);
        header.pixdim[1] = sizes[0] as f32;
        header.pixdim[2] = sizes[1] as f32;
        header.pixdim[3] = sizes[2] as f32;
    }

    WriterOptions::new(path)
        .reference_header(&header)
        .write_nifti(&array)
        .map_err(nifti_err)
}

/// Reshapes a flat map to `dims` and writes it.
pub fn save_map<P: AsRef<Path>>(
    path: P,
    map: &[f64],
    dims: VolumeDims,
    affine: Option<&Affine>,
) -> RmapResult<()> {
    let volume = reshape_map(map, dims)?;
    save_volume(path, &volume, affine)
}
