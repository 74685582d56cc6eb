//! Python bindings for the rmap correlation engine.
//!
//! Exposes map computation, the pairwise correlation helper, NaN
//! sanitization, and NIfTI fingerprint I/O to Python via PyO3.

use numpy::{
    PyArray1, PyArray2, PyArrayMethods, PyReadonlyArray1, PyReadonlyArray2,
    PyUntypedArrayMethods,
};
use pyo3::exceptions::{PyIOError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use rmap::io::{
    list_fingerprints, load_fingerprints as rust_load_fingerprints, save_map as rust_save_map,
    DEFAULT_CONNECTIVITY_NAME,
};
use rmap::{
    compute_rmap as rust_compute_rmap, flatten_volumes, pearson as rust_pearson, sanitize,
    Affine, FilterMode, FingerprintFilter, FingerprintView, Method, NanPolicy, RmapConfig,
    RmapError, Volume, VolumeDims,
};

/// Convert an RmapError to a Python exception.
fn to_py_err(err: RmapError) -> PyErr {
    match err {
        RmapError::Io { .. } => PyIOError::new_err(err.to_string()),
        RmapError::Nifti { .. } => PyRuntimeError::new_err(err.to_string()),
        _ => PyValueError::new_err(err.to_string()),
    }
}

fn parse_method(method: &str) -> PyResult<Method> {
    match method.to_lowercase().as_str() {
        "formula" => Ok(Method::Formula),
        "reference" => Ok(Method::Reference),
        _ => Err(PyValueError::new_err(
            "method must be 'formula' or 'reference'",
        )),
    }
}

fn parse_filter(
    mode: &str,
    include: Option<&str>,
    exclude: Option<&str>,
    connectivity_name: &str,
) -> PyResult<FingerprintFilter> {
    let mode = match mode.to_lowercase().as_str() {
        "keep" => FilterMode::Keep,
        "omit" => FilterMode::Omit,
        _ => return Err(PyValueError::new_err("mode must be 'keep' or 'omit'")),
    };
    FingerprintFilter::from_mode(mode, connectivity_name, include, exclude).map_err(to_py_err)
}

fn affine_from_array(affine: &PyReadonlyArray2<'_, f64>) -> PyResult<Affine> {
    if affine.shape() != [4, 4] {
        return Err(PyValueError::new_err("affine must have shape (4, 4)"));
    }
    let mut out = [[0.0f64; 4]; 4];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, value) in row.iter_mut().enumerate() {
            *value = *affine
                .get([i, j])
                .ok_or_else(|| PyValueError::new_err("affine index out of range"))?;
        }
    }
    Ok(out)
}

/// Compute the R-map of a fingerprint matrix against a correlate vector.
///
/// Args:
///     fingerprints: 2D float64 array (voxels x samples), C-contiguous
///     correlates: 1D float64 array (samples)
///     method: "formula" or "reference" (default: "formula")
///     parallel: Split voxels across threads (default: False)
///
/// Returns:
///     1D float64 array with one coefficient per voxel; NaN for
///     zero-variance voxels
#[pyfunction]
#[pyo3(name = "rmap", signature = (fingerprints, correlates, method = "formula", parallel = false))]
fn compute_rmap<'py>(
    py: Python<'py>,
    fingerprints: PyReadonlyArray2<'py, f64>,
    correlates: PyReadonlyArray1<'py, f64>,
    method: &str,
    parallel: bool,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let shape = fingerprints.shape();
    let voxels = shape[0];
    let samples = shape[1];
    let data = fingerprints.as_slice()?;
    let view = FingerprintView::from_slice(data, voxels, samples).map_err(to_py_err)?;

    let cfg = RmapConfig {
        method: parse_method(method)?,
        parallel,
    };
    let map = rust_compute_rmap(view, correlates.as_slice()?, &cfg).map_err(to_py_err)?;
    Ok(PyArray1::from_vec(py, map))
}

/// Pearson correlation of two equal-length vectors.
///
/// Returns NaN when either vector is constant.
#[pyfunction]
fn pearson(a: PyReadonlyArray1<'_, f64>, b: PyReadonlyArray1<'_, f64>) -> PyResult<f64> {
    rust_pearson(a.as_slice()?, b.as_slice()?).map_err(to_py_err)
}

/// Return a copy of the map with NaN replaced by `fill`.
///
/// Args:
///     map: 1D float64 array
///     fill: Replacement value (default: 0.0); None keeps NaN
#[pyfunction]
#[pyo3(signature = (map, fill = Some(0.0)))]
fn nan_to_num<'py>(
    py: Python<'py>,
    map: PyReadonlyArray1<'py, f64>,
    fill: Option<f64>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let mut out = map.as_slice()?.to_vec();
    let policy = match fill {
        None => NanPolicy::Keep,
        Some(value) if value == 0.0 => NanPolicy::Zero,
        Some(value) => NanPolicy::Fill(value),
    };
    sanitize(&mut out, policy);
    Ok(PyArray1::from_vec(py, out))
}

/// List fingerprint file names in a directory, sorted.
///
/// Args:
///     path: Directory to scan
///     mode: "keep" or "omit" (default: "keep")
///     include: Substring required in keep mode
///     exclude: Substring rejected in omit mode
///     connectivity_name: Substring every file must contain
#[pyfunction]
#[pyo3(signature = (path, mode = "keep", include = None, exclude = None, connectivity_name = DEFAULT_CONNECTIVITY_NAME))]
fn select_fingerprints(
    path: &str,
    mode: &str,
    include: Option<&str>,
    exclude: Option<&str>,
    connectivity_name: &str,
) -> PyResult<Vec<String>> {
    let filter = parse_filter(mode, include, exclude, connectivity_name)?;
    list_fingerprints(path, &filter).map_err(to_py_err)
}

/// Load and flatten the selected fingerprints.
///
/// Returns:
///     (names, fingerprints, dims, affine): sorted file names, a float64
///     (voxels x samples) array, the volume shape, and the first file's
///     4x4 affine (or None)
#[pyfunction]
#[pyo3(signature = (path, mode = "keep", include = None, exclude = None, connectivity_name = DEFAULT_CONNECTIVITY_NAME))]
#[allow(clippy::type_complexity)]
fn load_fingerprints<'py>(
    py: Python<'py>,
    path: &str,
    mode: &str,
    include: Option<&str>,
    exclude: Option<&str>,
    connectivity_name: &str,
) -> PyResult<(
    Vec<String>,
    Bound<'py, PyArray2<f64>>,
    (usize, usize, usize),
    Option<Bound<'py, PyArray2<f64>>>,
)> {
    let filter = parse_filter(mode, include, exclude, connectivity_name)?;
    let fingerprints = rust_load_fingerprints(path, &filter).map_err(to_py_err)?;

    let affine = fingerprints.first().and_then(|f| f.affine);
    let names: Vec<String> = fingerprints.iter().map(|f| f.name.clone()).collect();
    let volumes: Vec<Volume> = fingerprints.into_iter().map(|f| f.volume).collect();
    let dims = volumes
        .first()
        .map(|v| v.dims())
        .ok_or_else(|| PyValueError::new_err("no fingerprints loaded"))?;
    let matrix = flatten_volumes(&volumes).map_err(to_py_err)?;

    let (voxels, samples) = (matrix.voxels(), matrix.samples());
    let array = PyArray1::from_slice(py, matrix.data()).reshape([voxels, samples])?;
    let affine = match affine {
        Some(rows) => {
            let rows: Vec<Vec<f64>> = rows.iter().map(|r| r.to_vec()).collect();
            Some(PyArray2::from_vec2(py, &rows)?)
        }
        None => None,
    };
    Ok((names, array, (dims.nx, dims.ny, dims.nz), affine))
}

/// Reshape a flat map to `dims` and save it as NIfTI.
///
/// Args:
///     path: Output file (default: "img.nii")
///     map: 1D float64 array
///     dims: Volume shape (default: (91, 109, 91))
///     affine: Optional 4x4 float64 voxel-to-world transform
#[pyfunction]
#[pyo3(signature = (map, path = "img.nii", dims = (91, 109, 91), affine = None))]
fn save_map(
    map: PyReadonlyArray1<'_, f64>,
    path: &str,
    dims: (usize, usize, usize),
    affine: Option<PyReadonlyArray2<'_, f64>>,
) -> PyResult<()> {
    let affine = affine.as_ref().map(affine_from_array).transpose()?;
    let dims = VolumeDims::new(dims.0, dims.1, dims.2);
    rust_save_map(path, map.as_slice()?, dims, affine.as_ref()).map_err(to_py_err)
}

/// Python module for rmap.
#[pymodule]
fn _rmap(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(compute_rmap, m)?)?;
    m.add_function(wrap_pyfunction!(pearson, m)?)?;
    m.add_function(wrap_pyfunction!(nan_to_num, m)?)?;
    m.add_function(wrap_pyfunction!(select_fingerprints, m)?)?;
    m.add_function(wrap_pyfunction!(load_fingerprints, m)?)?;
    m.add_function(wrap_pyfunction!(save_map, m)?)?;

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
