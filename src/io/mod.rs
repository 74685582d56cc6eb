//! Fingerprint discovery, affine transforms, and NIfTI volume I/O.
//!
//! File selection and affine math are always available; reading and writing
//! NIfTI files needs the `nifti-io` feature.

pub mod affine;
pub mod filter;

#[cfg(feature = "nifti-io")]
pub mod nifti;

pub use affine::Affine;
pub use filter::{
    list_fingerprints, select_fingerprint_names, FilterMode, FingerprintFilter,
    DEFAULT_CONNECTIVITY_NAME,
};

#[cfg(feature = "nifti-io")]
pub use self::nifti::{
    load_fingerprints, load_volume, save_map, save_volume, Fingerprint, DEFAULT_OUTPUT_NAME,
};
