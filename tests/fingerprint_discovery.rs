use rmap::io::{list_fingerprints, FilterMode, FingerprintFilter};
use rmap::RmapError;
use std::fs;
use std::path::PathBuf;

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("rmap-{tag}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn touch_all(dir: &PathBuf, names: &[&str]) {
    for name in names {
        fs::write(dir.join(name), b"").unwrap();
    }
}

#[test]
fn lists_cohort_in_sorted_order() {
    let dir = scratch_dir("keep");
    touch_all(
        &dir,
        &[
            "Berlin_010_AvgR_Fz.nii",
            "Berlin_002_AvgR_Fz.nii",
            "Pittsburgh_001_AvgR_Fz.nii",
            "Berlin_002_AvgR.nii",
            "notes.txt",
        ],
    );

    let keep = FingerprintFilter::keep("Berlin").unwrap();
    assert_eq!(
        list_fingerprints(&dir, &keep).unwrap(),
        vec!["Berlin_002_AvgR_Fz.nii", "Berlin_010_AvgR_Fz.nii"]
    );

    let omit = FingerprintFilter::omit("Berlin").unwrap();
    assert_eq!(
        list_fingerprints(&dir, &omit).unwrap(),
        vec!["Pittsburgh_001_AvgR_Fz.nii"]
    );

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn missing_directory_is_an_io_error() {
    let dir = std::env::temp_dir().join("rmap-does-not-exist-8c1f");
    let filter = FingerprintFilter::keep("Berlin").unwrap();
    assert!(matches!(
        list_fingerprints(&dir, &filter),
        Err(RmapError::Io { .. })
    ));
}

#[test]
fn omit_mode_without_exclusion_fails_explicitly() {
    let err =
        FingerprintFilter::from_mode(FilterMode::Omit, "_AvgR_Fz.nii", Some("Berlin"), None)
            .unwrap_err();
    assert_eq!(
        err,
        RmapError::InvalidFilter {
            reason: "omit mode requires an exclusion substring"
        }
    );
}
