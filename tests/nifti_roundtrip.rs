#![cfg(feature = "nifti-io")]

use rmap::io::affine::IDENTITY;
use rmap::io::{load_fingerprints, load_volume, save_map, save_volume};
use rmap::{
    flatten_volumes, rmap_formula, FingerprintFilter, RmapError, Volume, VolumeDims,
};
use std::fs;
use std::path::PathBuf;

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("rmap-nii-{tag}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn mni_affine() -> [[f64; 4]; 4] {
    [
        [-2.0, 0.0, 0.0, 90.0],
        [0.0, 2.0, 0.0, -126.0],
        [0.0, 0.0, 2.0, -72.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

#[test]
fn volume_and_affine_survive_save_and_load() {
    let dir = scratch_dir("volume");
    let dims = VolumeDims::new(5, 4, 3);
    let volume = Volume::from_fn(dims, |x, y, z| (x * 16 + y * 4 + z) as f64 - 7.5).unwrap();
    let affine = mni_affine();
    let path = dir.join("vol.nii");

    save_volume(&path, &volume, Some(&affine)).unwrap();
    let (loaded, loaded_affine) = load_volume(&path).unwrap();
    assert_eq!(loaded.dims(), dims);
    assert_eq!(loaded, volume);
    assert_eq!(loaded_affine, Some(affine));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn map_written_from_fingerprints_lines_up_with_voxels() {
    let dir = scratch_dir("pipeline");
    let dims = VolumeDims::new(3, 2, 2);
    let correlates = [1.0, 2.0, 4.0];
    for (i, &scale) in correlates.iter().enumerate() {
        // Voxel (1, 1, 1) varies with the correlate; every other voxel is flat.
        let volume = Volume::from_fn(dims, |x, y, z| {
            if (x, y, z) == (1, 1, 1) {
                scale
            } else {
                0.5
            }
        })
        .unwrap();
        save_volume(dir.join(format!("Berlin_{i}_AvgR_Fz.nii")), &volume, Some(&IDENTITY)).unwrap();
    }

    let filter = FingerprintFilter::keep("Berlin").unwrap();
    let fingerprints = load_fingerprints(&dir, &filter).unwrap();
    assert_eq!(fingerprints.len(), 3);
    assert_eq!(fingerprints[0].affine, Some(IDENTITY));

    let volumes: Vec<Volume> = fingerprints.into_iter().map(|f| f.volume).collect();
    let matrix = flatten_volumes(&volumes).unwrap();
    let map = rmap_formula(matrix.view(), &correlates).unwrap();

    let out = dir.join("img.nii");
    save_map(&out, &map, dims, Some(&IDENTITY)).unwrap();
    let (written, _) = load_volume(&out).unwrap();
    assert!((written.get(1, 1, 1).unwrap() - 1.0).abs() < 1e-12);
    assert!(written.get(0, 1, 1).unwrap().is_nan());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn empty_selection_is_reported() {
    let dir = scratch_dir("empty");
    let filter = FingerprintFilter::keep("Berlin").unwrap();
    assert!(matches!(
        load_fingerprints(&dir, &filter),
        Err(RmapError::NoFingerprints { .. })
    ));
    fs::remove_dir_all(&dir).unwrap();
}
