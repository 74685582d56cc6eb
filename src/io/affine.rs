//! Voxel-to-world affine transforms.

/// Row-major 4x4 matrix mapping voxel indices to physical coordinates.
pub type Affine = [[f64; 4]; 4];

/// Identity transform.
pub const IDENTITY: Affine = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Builds an affine from the three sform rows of a NIfTI header.
pub fn affine_from_srows(srow_x: [f32; 4], srow_y: [f32; 4], srow_z: [f32; 4]) -> Affine {
    let row = |r: [f32; 4]| [r[0] as f64, r[1] as f64, r[2] as f64, r[3] as f64];
    [row(srow_x), row(srow_y), row(srow_z), [0.0, 0.0, 0.0, 1.0]]
}

/// Splits an affine into sform rows for a NIfTI header.
pub fn affine_to_srows(affine: &Affine) -> [[f32; 4]; 3] {
    let row = |r: &[f64; 4]| [r[0] as f32, r[1] as f32, r[2] as f32, r[3] as f32];
    [row(&affine[0]), row(&affine[1]), row(&affine[2])]
}

/// Builds the qform affine from quaternion parameters.
///
/// `quatern` holds (b, c, d); `a` is recovered from the unit-norm
/// constraint. `qfac` must be -1 or 1; anything else is treated as 1.
pub fn affine_from_quaternion(
    quatern: [f64; 3],
    offset: [f64; 3],
    voxel_size: [f64; 3],
    qfac: f64,
) -> Affine {
    let [b, c, d] = quatern;
    let a = (1.0 - (b * b + c * c + d * d)).max(0.0).sqrt();
    let rot = [
        [
            a * a + b * b - c * c - d * d,
            2.0 * (b * c - a * d),
            2.0 * (b * d + a * c),
        ],
        [
            2.0 * (b * c + a * d),
            a * a + c * c - b * b - d * d,
            2.0 * (c * d - a * b),
        ],
        [
            2.0 * (b * d - a * c),
            2.0 * (c * d + a * b),
            a * a + d * d - b * b - c * c,
        ],
    ];
    let qfac = if qfac == -1.0 { -1.0 } else { 1.0 };
    let scale = [voxel_size[0], voxel_size[1], voxel_size[2] * qfac];

    let mut out = IDENTITY;
    for i in 0..3 {
        for j in 0..3 {
            out[i][j] = rot[i][j] * scale[j];
        }
        out[i][3] = offset[i];
    }
    out
}

/// Voxel sizes implied by the affine (column norms of the linear part).
pub fn voxel_sizes(affine: &Affine) -> [f64; 3] {
    let mut sizes = [0.0; 3];
    for (j, size) in sizes.iter_mut().enumerate() {
        *size = (0..3).map(|i| affine[i][j] * affine[i][j]).sum::<f64>().sqrt();
    }
    sizes
}

/// Maps a voxel index to physical coordinates.
pub fn apply(affine: &Affine, voxel: [f64; 3]) -> [f64; 3] {
    let mut out = [0.0; 3];
    for (i, coord) in out.iter_mut().enumerate() {
        *coord = affine[i][0] * voxel[0]
            + affine[i][1] * voxel[1]
            + affine[i][2] * voxel[2]
            + affine[i][3];
    }
    out
}
