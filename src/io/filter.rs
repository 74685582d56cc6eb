//! Fingerprint file selection by naming convention.

use crate::util::{RmapError, RmapResult};
use std::fs;
use std::path::Path;

/// Substring that marks averaged Fisher-z connectivity volumes.
pub const DEFAULT_CONNECTIVITY_NAME: &str = "_AvgR_Fz.nii";

/// Selection mode for a cohort.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterMode {
    /// Keep files that contain the inclusion substring.
    Keep,
    /// Drop files that contain the exclusion substring.
    Omit,
}

/// File-name filter; each mode carries the substring it needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FingerprintFilter {
    Keep {
        connectivity: String,
        include: String,
    },
    Omit {
        connectivity: String,
        exclude: String,
    },
}

impl FingerprintFilter {
    /// Keeps connectivity files whose name contains `include`.
    pub fn keep(include: &str) -> RmapResult<Self> {
        Self::from_mode(FilterMode::Keep, DEFAULT_CONNECTIVITY_NAME, Some(include), None)
    }

    /// Keeps connectivity files whose name does not contain `exclude`.
    pub fn omit(exclude: &str) -> RmapResult<Self> {
        Self::from_mode(FilterMode::Omit, DEFAULT_CONNECTIVITY_NAME, None, Some(exclude))
    }

    /// Builds a filter from loosely typed parts (config files, bindings).
    ///
    /// Fails when the chosen mode lacks its substring; empty strings count
    /// as missing. The substring of the other mode is ignored.
    pub fn from_mode(
        mode: FilterMode,
        connectivity: &str,
        include: Option<&str>,
        exclude: Option<&str>,
    ) -> RmapResult<Self> {
        if connectivity.is_empty() {
            return Err(RmapError::InvalidFilter {
                reason: "connectivity substring must not be empty",
            });
        }
        let connectivity = connectivity.to_string();
        match mode {
            FilterMode::Keep => match include {
                Some(include) if !include.is_empty() => Ok(Self::Keep {
                    connectivity,
                    include: include.to_string(),
                }),
                _ => Err(RmapError::InvalidFilter {
                    reason: "keep mode requires an inclusion substring",
                }),
            },
            FilterMode::Omit => match exclude {
                Some(exclude) if !exclude.is_empty() => Ok(Self::Omit {
                    connectivity,
                    exclude: exclude.to_string(),
                }),
                _ => Err(RmapError::InvalidFilter {
                    reason: "omit mode requires an exclusion substring",
                }),
            },
        }
    }

    /// Replaces the connectivity substring.
    pub fn with_connectivity(self, connectivity: &str) -> RmapResult<Self> {
        match self {
            Self::Keep { include, .. } => {
                Self::from_mode(FilterMode::Keep, connectivity, Some(include.as_str()), None)
            }
            Self::Omit { exclude, .. } => {
                Self::from_mode(FilterMode::Omit, connectivity, None, Some(exclude.as_str()))
            }
        }
    }

    pub fn mode(&self) -> FilterMode {
        match self {
            Self::Keep { .. } => FilterMode::Keep,
            Self::Omit { .. } => FilterMode::Omit,
        }
    }

    pub fn connectivity(&self) -> &str {
        match self {
            Self::Keep { connectivity, .. } | Self::Omit { connectivity, .. } => connectivity,
        }
    }

    /// Returns true when `name` passes the filter.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Keep {
                connectivity,
                include,
            } => name.contains(connectivity.as_str()) && name.contains(include.as_str()),
            Self::Omit {
                connectivity,
                exclude,
            } => name.contains(connectivity.as_str()) && !name.contains(exclude.as_str()),
        }
    }
}

/// Filters names and sorts them; the sorted order is the sample order.
pub fn select_fingerprint_names<I, S>(names: I, filter: &FingerprintFilter) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut selected: Vec<String> = names
        .into_iter()
        .filter(|name| filter.matches(name.as_ref()))
        .map(|name| name.as_ref().to_string())
        .collect();
    selected.sort();
    selected
}

/// Lists the file names in `dir` that pass `filter`, sorted.
///
/// Entries whose names are not valid UTF-8 are skipped.
pub fn list_fingerprints<P: AsRef<Path>>(
    dir: P,
    filter: &FingerprintFilter,
) -> RmapResult<Vec<String>> {
    let dir = dir.as_ref();
    let io_err = |err: std::io::Error| RmapError::Io {
        path: dir.display().to_string(),
        reason: err.to_string(),
    };
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        if let Ok(name) = entry.file_name().into_string() {
            names.push(name);
        }
    }
    Ok(select_fingerprint_names(names, filter))
}
