// uda-data/src/assembly.rs

//! Ready-made train/test loader pairs for CIFAR-10 and CIFAR-100.
//!
//! [`get_standard`] builds the supervised pipeline. [`get_uda`] builds the
//! consistency-training pipeline, whose train batches carry a clean and an
//! augmented view of every image.

use std::path::{Path, PathBuf};

use log::info;
use uda_core::{ImageTensor, Label, UdaError};

use crate::collate::{self, ImageBatch, ViewBatch};
use crate::dataloader::{DataLoader, DataLoaderConfig};
use crate::datasets::cifar10_1::{self, load_cifar10_1};
use crate::datasets::paired_view::CleanTransform;
use crate::datasets::{ArrayImageDataset, BoxedDataset, CifarDataset, CifarKind, PairedViewDataset};
use crate::transforms::{RandomCrop, RandomHorizontalFlip, Then, ToTensor, Transform};

/// Default number of loader worker threads.
pub const NUM_WORKERS: usize = 4;

/// Default for substituting CIFAR-10.1 as the CIFAR-10 test set.
pub const USE_CIFAR_10_1: bool = false;

/// Settings shared by [`get_standard`] and [`get_uda`].
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyConfig {
    pub num_workers: usize,
    pub pin_memory: bool,
    /// Evaluate CIFAR-10 runs on CIFAR-10.1. Ignored for CIFAR-100.
    pub use_cifar10_1: bool,
    /// Directory holding the CIFAR-10.1 `.npy` files.
    pub cifar10_1_dir: PathBuf,
    /// Fetch the CIFAR archive when it is missing from the data directory.
    pub download: bool,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            num_workers: NUM_WORKERS,
            pin_memory: true,
            use_cifar10_1: USE_CIFAR_10_1,
            cifar10_1_dir: cifar10_1::default_dir(),
            download: true,
        }
    }
}

impl AssemblyConfig {
    pub fn num_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers;
        self
    }
    pub fn pin_memory(mut self, pin_memory: bool) -> Self {
        self.pin_memory = pin_memory;
        self
    }
    pub fn use_cifar10_1(mut self, use_cifar10_1: bool) -> Self {
        self.use_cifar10_1 = use_cifar10_1;
        self
    }
    pub fn cifar10_1_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cifar10_1_dir = dir.into();
        self
    }
    pub fn download(mut self, download: bool) -> Self {
        self.download = download;
        self
    }

    fn loader_config(&self, batch_size: usize, shuffle: bool) -> DataLoaderConfig {
        DataLoaderConfig::default()
            .batch_size(batch_size)
            .shuffle(shuffle)
            .num_workers(self.num_workers)
            .pin_memory(self.pin_memory)
    }
}

/// Random crop with 4 pixels of padding, then a horizontal flip.
pub type ImageAugment = Then<RandomCrop, RandomHorizontalFlip>;

/// The default CIFAR test split, or CIFAR-10.1.
pub type TestSet = BoxedDataset<(ImageTensor, Label)>;
pub type StandardTrainSet = CifarDataset<Then<ImageAugment, CleanTransform>>;
pub type UdaTrainSet = PairedViewDataset<CifarDataset<ImageAugment>>;

pub type TestLoader = DataLoader<TestSet, ImageBatch>;
pub type StandardTrainLoader = DataLoader<StandardTrainSet, ImageBatch>;
pub type UdaTrainLoader = DataLoader<UdaTrainSet, ViewBatch>;

fn image_augment() -> ImageAugment {
    RandomCrop::new(32, 4).then(RandomHorizontalFlip::default())
}

fn tensor_transform(kind: CifarKind) -> CleanTransform {
    ToTensor.then(kind.normalize())
}

fn select(class_count: usize) -> CifarKind {
    let kind = CifarKind::from_class_count(class_count);
    info!("=> loading {}...", kind.name());
    kind
}

fn test_set(kind: CifarKind, data_dir: &Path, config: &AssemblyConfig) -> Result<TestSet, UdaError> {
    if config.use_cifar10_1 && kind == CifarKind::Cifar10 {
        info!("Using CIFAR-10.1 from {} as the test set", config.cifar10_1_dir.display());
        let (images, labels) = load_cifar10_1(&config.cifar10_1_dir)?;
        return Ok(Box::new(ArrayImageDataset::with_transform(
            images,
            labels,
            tensor_transform(kind),
        )));
    }
    Ok(Box::new(CifarDataset::new(
        data_dir,
        kind,
        false,
        config.download,
        tensor_transform(kind),
    )?))
}

fn test_loader(
    kind: CifarKind,
    data_dir: &Path,
    batch_size: usize,
    config: &AssemblyConfig,
) -> Result<TestLoader, UdaError> {
    DataLoader::with_collate(
        test_set(kind, data_dir, config)?,
        config.loader_config(batch_size, false),
        collate::labeled_images,
    )
}

/// Builds the supervised `(train, test)` loaders.
///
/// `class_count == 10` selects CIFAR-10; any other value selects CIFAR-100.
/// Train images are randomly cropped and flipped before normalization and are
/// reshuffled every epoch. Test images are only normalized and keep their
/// order.
///
/// # Errors
///
/// Download, I/O and format errors from reading the datasets, and
/// `UdaError::InvalidArgument` for a zero `batch_size`.
pub fn get_standard(
    class_count: usize,
    data_dir: impl AsRef<Path>,
    batch_size: usize,
    config: &AssemblyConfig,
) -> Result<(StandardTrainLoader, TestLoader), UdaError> {
    let data_dir = data_dir.as_ref();
    let kind = select(class_count);

    let train_set = CifarDataset::new(
        data_dir,
        kind,
        true,
        config.download,
        image_augment().then(tensor_transform(kind)),
    )?;
    let train_loader = DataLoader::with_collate(
        train_set,
        config.loader_config(batch_size, true),
        collate::labeled_images,
    )?;

    Ok((train_loader, test_loader(kind, data_dir, batch_size, config)?))
}

/// Builds the `(train, test)` loaders for consistency training.
///
/// Identical to [`get_standard`] except on the train side: images are cropped
/// and flipped, then [`PairedViewDataset`] emits a normalized clean view and a
/// normalized policy-augmented view of each, so train batches are
/// [`ViewBatch::Paired`].
///
/// # Errors
///
/// Same as [`get_standard`].
pub fn get_uda(
    class_count: usize,
    data_dir: impl AsRef<Path>,
    batch_size: usize,
    config: &AssemblyConfig,
) -> Result<(UdaTrainLoader, TestLoader), UdaError> {
    let data_dir = data_dir.as_ref();
    let kind = select(class_count);

    let base: CifarDataset<ImageAugment> =
        CifarDataset::new(data_dir, kind, true, config.download, image_augment())?;
    let train_set = PairedViewDataset::new(base, true, kind.normalize());
    let train_loader = DataLoader::with_collate(
        train_set,
        config.loader_config(batch_size, true),
        collate::views,
    )?;

    Ok((train_loader, test_loader(kind, data_dir, batch_size, config)?))
}

#[cfg(test)]
#[path = "assembly_test.rs"]
mod tests;
