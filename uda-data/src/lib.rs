//! CIFAR data pipelines for supervised and consistency (UDA) training.
//!
//! Datasets yield `(sample, label)` items, transforms turn images into
//! normalized tensors, and [`DataLoader`] groups items into batches, optionally
//! on background worker threads. [`get_standard`] and [`get_uda`] put the
//! pieces together for CIFAR-10 and CIFAR-100.

pub mod assembly;
pub mod collate;
pub mod dataloader;
pub mod datasets;
pub mod download;
pub mod samplers;
pub mod transforms;

// Re-export main components
pub use assembly::{get_standard, get_uda, AssemblyConfig, NUM_WORKERS, USE_CIFAR_10_1};
pub use collate::{ImageBatch, ViewBatch};
pub use dataloader::{DataLoader, DataLoaderConfig};
pub use datasets::{
    load_cifar10_1, ArrayImageDataset, CifarDataset, CifarKind, Dataset, PairedViewDataset,
    VecDataset, ViewSample,
};
pub use transforms::Transform;
