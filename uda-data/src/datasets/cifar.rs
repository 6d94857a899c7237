//! The CIFAR-10 and CIFAR-100 datasets, read from the official binary archives.
//!
//! The files can be downloaded from <https://www.cs.toronto.edu/~kriz/cifar.html>.
//! Every record is one (CIFAR-10) or two (CIFAR-100: coarse, fine) label bytes
//! followed by a 32×32 image stored as three 1024-byte planes (R, G, B).

use std::fs;
use std::path::{Path, PathBuf};

use image::RgbImage;
use log::info;
use uda_core::tensor::{planar_to_image, CHANNELS};
use uda_core::{Label, UdaError};

use super::traits::{out_of_bounds, Dataset};
use crate::download::download_and_extract;
use crate::transforms::{Normalize, Transform};

/// Side length of every CIFAR image.
pub const IMAGE_SIZE: usize = 32;

/// Bytes of pixel data per CIFAR image.
pub const PIXELS_PER_IMAGE: usize = CHANNELS * IMAGE_SIZE * IMAGE_SIZE;

const CIFAR10_URL: &str = "https://www.cs.toronto.edu/~kriz/cifar-10-binary.tar.gz";
const CIFAR100_URL: &str = "https://www.cs.toronto.edu/~kriz/cifar-100-binary.tar.gz";

/// Which CIFAR dataset to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CifarKind {
    /// 10 classes, 50,000 training and 10,000 test images.
    Cifar10,
    /// 100 fine-grained classes, 50,000 training and 10,000 test images.
    Cifar100,
}

impl CifarKind {
    /// 10 classes selects CIFAR-10; any other count is treated as CIFAR-100.
    pub fn from_class_count(num_classes: usize) -> Self {
        if num_classes == 10 {
            CifarKind::Cifar10
        } else {
            CifarKind::Cifar100
        }
    }

    pub fn num_classes(self) -> usize {
        match self {
            CifarKind::Cifar10 => 10,
            CifarKind::Cifar100 => 100,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CifarKind::Cifar10 => "CIFAR10",
            CifarKind::Cifar100 => "CIFAR100",
        }
    }

    /// Per-channel statistics of the training split.
    pub fn normalize(self) -> Normalize {
        match self {
            CifarKind::Cifar10 => Normalize::new([0.4914, 0.4822, 0.4465], [0.2023, 0.1994, 0.2010]),
            CifarKind::Cifar100 => Normalize::new([0.507, 0.487, 0.441], [0.267, 0.256, 0.276]),
        }
    }

    pub fn url(self) -> &'static str {
        match self {
            CifarKind::Cifar10 => CIFAR10_URL,
            CifarKind::Cifar100 => CIFAR100_URL,
        }
    }

    /// Name of the directory the archive extracts to.
    pub fn dir_name(self) -> &'static str {
        match self {
            CifarKind::Cifar10 => "cifar-10-batches-bin",
            CifarKind::Cifar100 => "cifar-100-binary",
        }
    }

    /// Binary files making up the requested split, in order.
    pub fn split_files(self, train: bool) -> &'static [&'static str] {
        match (self, train) {
            (CifarKind::Cifar10, true) => &[
                "data_batch_1.bin",
                "data_batch_2.bin",
                "data_batch_3.bin",
                "data_batch_4.bin",
                "data_batch_5.bin",
            ],
            (CifarKind::Cifar10, false) => &["test_batch.bin"],
            (CifarKind::Cifar100, true) => &["train.bin"],
            (CifarKind::Cifar100, false) => &["test.bin"],
        }
    }

    /// Label bytes preceding the pixels of each record.
    pub fn label_bytes(self) -> usize {
        match self {
            CifarKind::Cifar10 => 1,
            CifarKind::Cifar100 => 2,
        }
    }

    pub fn record_size(self) -> usize {
        self.label_bytes() + PIXELS_PER_IMAGE
    }
}

/// A CIFAR split held in memory, yielding `(transform(image), label)` pairs.
pub struct CifarDataset<T> {
    kind: CifarKind,
    train: bool,
    pixels: Vec<u8>,
    labels: Vec<Label>,
    transform: T,
}

impl<T> CifarDataset<T> {
    /// Loads a CIFAR split from `root`.
    ///
    /// # Arguments
    ///
    /// * `root` - Directory containing (or receiving) the extracted archive.
    /// * `kind` - CIFAR-10 or CIFAR-100.
    /// * `train` - Training split if `true`, test split otherwise.
    /// * `download` - Download and extract the archive if it is not present.
    /// * `transform` - Applied to every image on access.
    ///
    /// # Errors
    ///
    /// Download and I/O failures propagate unchanged; a file whose size is not
    /// a whole number of records yields `UdaError::Format`.
    pub fn new(
        root: impl AsRef<Path>,
        kind: CifarKind,
        train: bool,
        download: bool,
        transform: T,
    ) -> Result<Self, UdaError> {
        let dir = ensure_present(root.as_ref(), kind, download)?;
        let mut pixels = Vec::new();
        let mut labels = Vec::new();
        for file in kind.split_files(train) {
            read_records(&dir.join(file), kind, &mut pixels, &mut labels)?;
        }
        info!(
            "Loaded {} {} images from {}",
            labels.len(),
            if train { "training" } else { "test" },
            dir.display()
        );
        Ok(Self {
            kind,
            train,
            pixels,
            labels,
            transform,
        })
    }

    pub fn kind(&self) -> CifarKind {
        self.kind
    }

    pub fn is_train(&self) -> bool {
        self.train
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }
}

impl<T> Dataset for CifarDataset<T>
where
    T: Transform<RgbImage>,
    T::Output: Send + 'static,
{
    type Item = (T::Output, Label);

    fn get(&self, index: usize) -> Result<Self::Item, UdaError> {
        let label = *self
            .labels
            .get(index)
            .ok_or_else(|| out_of_bounds(index, self.labels.len()))?;
        let start = index * PIXELS_PER_IMAGE;
        let bytes = &self.pixels[start..start + PIXELS_PER_IMAGE];
        let image = planar_to_image(bytes, IMAGE_SIZE, IMAGE_SIZE)?;
        Ok((self.transform.apply(image)?, label))
    }

    fn len(&self) -> usize {
        self.labels.len()
    }
}

fn ensure_present(root: &Path, kind: CifarKind, download: bool) -> Result<PathBuf, UdaError> {
    let dir = root.join(kind.dir_name());
    if dir.is_dir() {
        return Ok(dir);
    }
    if !download {
        return Err(UdaError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} not found and download disabled", dir.display()),
        )));
    }
    download_and_extract(kind.url(), root)?;
    if !dir.is_dir() {
        return Err(UdaError::Format {
            path: dir,
            message: "archive did not contain the expected directory".to_string(),
        });
    }
    Ok(dir)
}

/// Appends the records of one binary file to `pixels` and `labels`.
///
/// For CIFAR-100 the fine label (second byte) is kept.
pub fn read_records(
    path: &Path,
    kind: CifarKind,
    pixels: &mut Vec<u8>,
    labels: &mut Vec<Label>,
) -> Result<(), UdaError> {
    let data = fs::read(path)?;
    let record_size = kind.record_size();
    if data.len() % record_size != 0 {
        return Err(UdaError::Format {
            path: path.to_path_buf(),
            message: format!(
                "size {} is not a multiple of the record size {}",
                data.len(),
                record_size
            ),
        });
    }
    let label_bytes = kind.label_bytes();
    pixels.reserve(data.len() / record_size * PIXELS_PER_IMAGE);
    for record in data.chunks_exact(record_size) {
        labels.push(Label::from(record[label_bytes - 1]));
        pixels.extend_from_slice(&record[label_bytes..]);
    }
    Ok(())
}

/// Encodes one record in the binary layout of `kind`. The inverse of [`read_records`].
///
/// `pixels` must hold the three colour planes. CIFAR-100 records get a zero
/// coarse label.
pub fn encode_record(kind: CifarKind, label: u8, pixels: &[u8]) -> Vec<u8> {
    let mut record = Vec::with_capacity(kind.record_size());
    if kind == CifarKind::Cifar100 {
        record.push(0);
    }
    record.push(label);
    record.extend_from_slice(pixels);
    record
}

#[cfg(test)]
#[path = "cifar_test.rs"]
mod tests;
