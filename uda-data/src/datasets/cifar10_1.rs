// uda-data/src/datasets/cifar10_1.rs

//! Loader for CIFAR-10.1 (v6), a fresh test set for CIFAR-10 classifiers.
//!
//! Recht et al., "Do CIFAR-10 Classifiers Generalize to CIFAR-10?" (2018),
//! <https://github.com/modestyachts/CIFAR-10.1>. The set is shipped as two
//! `.npy` files: `uint8` images of shape `[N, 32, 32, 3]` and integer labels.

use std::path::{Path, PathBuf};

use log::info;
use ndarray::{Array1, Array4};
use ndarray_npy::{read_npy, ReadNpyError, ReadableElement};
use uda_core::{Label, UdaError};

pub const LABELS_FILE: &str = "v6_labels.npy";
pub const IMAGES_FILE: &str = "v6_data.npy";

/// The `cifar10_1` directory shipped next to this crate.
pub fn default_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("cifar10_1")
}

/// Reads the CIFAR-10.1 images and labels from `dir`.
///
/// Labels stored with any integer dtype, or as whole-valued floats, are
/// converted to [`Label`].
///
/// # Errors
///
/// Returns `UdaError::Io` if a file is missing and `UdaError::Npy` if a file
/// cannot be parsed.
pub fn load_cifar10_1(dir: impl AsRef<Path>) -> Result<(Array4<u8>, Array1<Label>), UdaError> {
    let dir = dir.as_ref();
    let labels_path = dir.join(LABELS_FILE);
    let images_path = dir.join(IMAGES_FILE);

    info!("Loading labels from file {}", labels_path.display());
    let labels = read_labels(&labels_path)?;
    info!("Loading image data from file {}", images_path.display());
    let images: Array4<u8> = read_npy(&images_path).map_err(|e| npy_error(&images_path, e))?;

    Ok((images, labels))
}

fn npy_error(path: &Path, err: ReadNpyError) -> UdaError {
    match err {
        ReadNpyError::Io(e) => UdaError::Io(e),
        other => UdaError::Npy(format!("{}: {}", path.display(), other)),
    }
}

// `Ok(None)` when the file holds another dtype.
fn try_read<A: ReadableElement>(path: &Path) -> Result<Option<Array1<A>>, UdaError> {
    match read_npy::<_, Array1<A>>(path) {
        Ok(array) => Ok(Some(array)),
        Err(ReadNpyError::WrongDescriptor(_)) => Ok(None),
        Err(e) => Err(npy_error(path, e)),
    }
}

fn read_labels(path: &Path) -> Result<Array1<Label>, UdaError> {
    if let Some(labels) = try_read::<i64>(path)? {
        return Ok(labels);
    }
    if let Some(labels) = try_read::<i32>(path)? {
        return Ok(labels.mapv(Label::from));
    }
    if let Some(labels) = try_read::<u8>(path)? {
        return Ok(labels.mapv(Label::from));
    }
    if let Some(labels) = try_read::<i16>(path)? {
        return Ok(labels.mapv(Label::from));
    }
    if let Some(labels) = try_read::<u16>(path)? {
        return Ok(labels.mapv(Label::from));
    }
    if let Some(labels) = try_read::<u32>(path)? {
        return Ok(labels.mapv(Label::from));
    }
    if let Some(labels) = try_read::<u64>(path)? {
        return labels
            .iter()
            .map(|&v| {
                Label::try_from(v)
                    .map_err(|_| UdaError::Npy(format!("{}: label {} overflows", path.display(), v)))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Array1::from);
    }
    if let Some(labels) = try_read::<f32>(path)? {
        return float_labels(path, labels.iter().map(|&v| f64::from(v)));
    }
    if let Some(labels) = try_read::<f64>(path)? {
        return float_labels(path, labels.iter().copied());
    }
    Err(UdaError::Npy(format!(
        "{}: unsupported label dtype",
        path.display()
    )))
}

fn float_labels(path: &Path, values: impl Iterator<Item = f64>) -> Result<Array1<Label>, UdaError> {
    values
        .map(|v| {
            if v.is_finite() && v.fract() == 0.0 {
                Ok(v as Label)
            } else {
                Err(UdaError::Npy(format!(
                    "{}: label {} is not an integer",
                    path.display(),
                    v
                )))
            }
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Array1::from)
}

#[cfg(test)]
#[path = "cifar10_1_test.rs"]
mod tests;
