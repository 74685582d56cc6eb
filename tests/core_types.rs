use rmap::{
    flatten_volumes, flatten_volumes_with_dims, reshape_map, FingerprintMatrix, FingerprintView,
    RmapError, Volume, VolumeDims,
};

#[test]
fn view_rejects_invalid_dimensions() {
    let data = [0.0f64; 4];

    let err = FingerprintView::from_slice(&data, 0, 1).err().unwrap();
    assert_eq!(
        err,
        RmapError::InvalidDimensions {
            voxels: 0,
            samples: 1,
        }
    );

    let err = FingerprintView::from_slice(&data, 1, 0).err().unwrap();
    assert_eq!(
        err,
        RmapError::InvalidDimensions {
            voxels: 1,
            samples: 0,
        }
    );
}

#[test]
fn view_rejects_invalid_stride() {
    let data = [0.0f64; 8];
    let err = FingerprintView::new(&data, 1, 4, 3).err().unwrap();
    assert_eq!(
        err,
        RmapError::InvalidStride {
            samples: 4,
            stride: 3,
        }
    );
}

#[test]
fn view_rejects_short_buffer() {
    let data = [0.0f64; 5];
    let err = FingerprintView::from_slice(&data, 2, 3).err().unwrap();
    assert_eq!(err, RmapError::BufferTooSmall { needed: 6, got: 5 });
}

#[test]
fn matrix_view_round_trip() {
    let matrix = FingerprintMatrix::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3).unwrap();
    let view = matrix.view();
    assert_eq!(view.voxels(), 2);
    assert_eq!(view.samples(), 3);
    assert_eq!(view.row(1).unwrap(), &[4.0, 5.0, 6.0]);
    assert_eq!(view.column(2).unwrap(), vec![3.0, 6.0]);
    assert!(view.column(3).is_none());
}

#[test]
fn flatten_then_reshape_reproduces_volume() {
    let dims = VolumeDims::new(4, 3, 5);
    let volume = Volume::from_fn(dims, |x, y, z| (x * 100 + y * 10 + z) as f64 * 0.5).unwrap();
    let other = Volume::from_fn(dims, |x, y, z| (x + y + z) as f64).unwrap();

    let matrix = flatten_volumes(&[volume.clone(), other.clone()]).unwrap();
    assert_eq!(matrix.voxels(), 60);
    assert_eq!(matrix.samples(), 2);

    let first = matrix.view().column(0).unwrap();
    let second = matrix.view().column(1).unwrap();
    assert_eq!(reshape_map(&first, dims).unwrap(), volume);
    assert_eq!(reshape_map(&second, dims).unwrap(), other);
    assert_eq!(
        reshape_map(&first, dims).unwrap().get(3, 2, 4),
        Some(324.0 * 0.5)
    );
}

#[test]
fn reshape_with_wrong_dims_fails() {
    let err = reshape_map(&[0.0; 10], VolumeDims::new(91, 109, 91)).unwrap_err();
    assert_eq!(
        err,
        RmapError::ReshapeMismatch {
            len: 10,
            dims: [91, 109, 91],
            expected: 902_629,
        }
    );
}

#[test]
fn zero_sized_dims_rejected() {
    assert!(VolumeDims::new(0, 2, 2).validate().is_err());
    assert!(Volume::new(Vec::new(), VolumeDims::new(2, 0, 2)).is_err());
}

#[test]
fn flatten_with_permuted_dims_fails_instead_of_scrambling() {
    let loaded = VolumeDims::new(4, 5, 6);
    let configured = VolumeDims::new(5, 4, 6);
    let volumes = vec![
        Volume::from_fn(loaded, |x, y, z| (x + 10 * y + 100 * z) as f64).unwrap(),
        Volume::from_fn(loaded, |x, _, _| x as f64).unwrap(),
    ];

    // Same voxel count, so a length check alone would accept it.
    assert_eq!(loaded.voxel_count(), configured.voxel_count());
    let err = flatten_volumes_with_dims(&volumes, configured).unwrap_err();
    assert_eq!(
        err,
        RmapError::VolumeShapeMismatch {
            index: 0,
            expected: [5, 4, 6],
            got: [4, 5, 6],
        }
    );

    let matrix = flatten_volumes_with_dims(&volumes, loaded).unwrap();
    assert_eq!(matrix.voxels(), 120);
    assert_eq!(matrix.samples(), 2);
}
