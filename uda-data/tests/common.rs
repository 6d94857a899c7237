use std::fs;
use std::path::Path;

use ndarray::{Array1, Array4};
use ndarray_npy::write_npy;
use uda_data::datasets::cifar::{encode_record, PIXELS_PER_IMAGE};
use uda_data::datasets::cifar10_1::{IMAGES_FILE, LABELS_FILE};
use uda_data::CifarKind;

// Each integration test binary uses a different subset of these helpers.
#[allow(dead_code)]
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Label of synthetic image `i`.
#[allow(dead_code)]
pub fn label_of(kind: CifarKind, i: usize) -> i64 {
    (i % kind.num_classes()) as i64
}

/// Pixel value shared by every pixel of synthetic image `i`.
#[allow(dead_code)]
pub fn pixel_of(i: usize) -> u8 {
    (i * 7 % 256) as u8
}

/// Serializes `count` synthetic records, numbered from `first`.
#[allow(dead_code)]
pub fn cifar_bytes(kind: CifarKind, first: usize, count: usize) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(count * kind.record_size());
    for i in first..first + count {
        let pixels = [pixel_of(i); PIXELS_PER_IMAGE];
        bytes.extend(encode_record(kind, label_of(kind, i) as u8, &pixels));
    }
    bytes
}

/// Writes an extracted CIFAR archive into `root`, as if it had been downloaded.
///
/// Training records are spread over the split files in order, so training
/// image `i` carries `label_of(kind, i)`. Test images are numbered from 0 too.
#[allow(dead_code)]
pub fn write_cifar(root: &Path, kind: CifarKind, train_count: usize, test_count: usize) {
    let dir = root.join(kind.dir_name());
    fs::create_dir_all(&dir).expect("Failed to create dataset directory");

    let files = kind.split_files(true);
    let per_file = train_count.div_ceil(files.len());
    let mut first = 0;
    for file in files {
        let count = per_file.min(train_count - first);
        fs::write(dir.join(file), cifar_bytes(kind, first, count)).expect("Failed to write split");
        first += count;
    }

    for file in kind.split_files(false) {
        fs::write(dir.join(file), cifar_bytes(kind, 0, test_count)).expect("Failed to write split");
    }
}

/// Writes a CIFAR-10.1 pair of `.npy` files whose image `i` is filled with
/// `pixel_of(i)` and labelled `9 - i % 10`.
#[allow(dead_code)]
pub fn write_cifar10_1(dir: &Path, count: usize) {
    fs::create_dir_all(dir).expect("Failed to create CIFAR-10.1 directory");
    let images = Array4::from_shape_fn((count, 32, 32, 3), |(n, _, _, _)| pixel_of(n));
    let labels = Array1::from_shape_fn(count, |n| 9 - (n % 10) as i64);
    write_npy(dir.join(IMAGES_FILE), &images).expect("Failed to write images");
    write_npy(dir.join(LABELS_FILE), &labels).expect("Failed to write labels");
}
