// uda-data/src/datasets/cifar10_1_test.rs

use super::*;
use ndarray::{array, Array4};
use ndarray_npy::write_npy;
use tempfile::TempDir;

fn write_images(dir: &Path, count: usize) -> Array4<u8> {
    let images = Array4::from_shape_fn((count, 32, 32, 3), |(n, y, x, c)| (n + y + x + c) as u8);
    write_npy(dir.join(IMAGES_FILE), &images).unwrap();
    images
}

#[test]
fn test_round_trip_int64_labels() {
    let dir = TempDir::new().unwrap();
    let images = write_images(dir.path(), 4);
    write_npy(dir.path().join(LABELS_FILE), &array![3i64, 0, 9, 5]).unwrap();

    let (loaded_images, labels) = load_cifar10_1(dir.path()).unwrap();
    assert_eq!(loaded_images, images);
    assert_eq!(loaded_images.shape()[0], labels.len());
    assert_eq!(labels, array![3i64, 0, 9, 5]);
}

#[test]
fn test_round_trip_narrow_integer_labels() {
    let dir = TempDir::new().unwrap();
    write_images(dir.path(), 3);
    write_npy(dir.path().join(LABELS_FILE), &array![1u8, 2, 7]).unwrap();
    let (_, labels) = load_cifar10_1(dir.path()).unwrap();
    assert_eq!(labels, array![1i64, 2, 7]);

    write_npy(dir.path().join(LABELS_FILE), &array![4i32, 8, 6]).unwrap();
    let (_, labels) = load_cifar10_1(dir.path()).unwrap();
    assert_eq!(labels, array![4i64, 8, 6]);
}

#[test]
fn test_float_labels_are_converted() {
    let dir = TempDir::new().unwrap();
    write_images(dir.path(), 2);
    write_npy(dir.path().join(LABELS_FILE), &array![6.0f64, 2.0]).unwrap();
    let (_, labels) = load_cifar10_1(dir.path()).unwrap();
    assert_eq!(labels, array![6i64, 2]);
}

#[test]
fn test_fractional_labels_are_rejected() {
    let dir = TempDir::new().unwrap();
    write_images(dir.path(), 2);
    write_npy(dir.path().join(LABELS_FILE), &array![6.5f32, 2.0]).unwrap();
    assert!(matches!(load_cifar10_1(dir.path()), Err(UdaError::Npy(_))));
}

#[test]
fn test_missing_files() {
    let dir = TempDir::new().unwrap();
    match load_cifar10_1(dir.path()) {
        Err(UdaError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
        other => panic!("Expected a not-found error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_malformed_file() {
    let dir = TempDir::new().unwrap();
    write_images(dir.path(), 2);
    std::fs::write(dir.path().join(LABELS_FILE), b"not an npy file").unwrap();
    assert!(matches!(load_cifar10_1(dir.path()), Err(UdaError::Npy(_))));
}

#[test]
fn test_default_dir_is_next_to_crate() {
    assert!(default_dir().ends_with("cifar10_1"));
}
