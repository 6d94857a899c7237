// uda-data/src/datasets/array_image_dataset_test.rs

use super::*;
use crate::transforms::{Normalize, ToTensor};
use approx::assert_relative_eq;
use ndarray::array;

// Image `n` has every pixel set to `10 * n`.
fn create_images(count: usize) -> Array4<u8> {
    Array4::from_shape_fn((count, 4, 4, 3), |(n, _, _, _)| (10 * n) as u8)
}

#[test]
fn test_array_image_dataset_len() {
    let dataset = ArrayImageDataset::new(create_images(5), Array1::from(vec![0, 1, 2, 3, 4]));
    assert_eq!(dataset.len(), 5);
    assert!(!dataset.is_empty());
}

#[test]
fn test_array_image_dataset_get_without_transform() {
    let dataset = ArrayImageDataset::new(create_images(3), array![7, 8, 9]);
    let (image, label) = dataset.get(2).unwrap();
    assert_eq!(label, 9);
    assert_eq!(image.dimensions(), (4, 4));
    assert!(image.pixels().all(|p| p.0 == [20; 3]));
}

#[test]
fn test_array_image_dataset_get_with_transform() {
    let transform = ToTensor.then(Normalize::new([0.0; 3], [0.5; 3]));
    let dataset = ArrayImageDataset::with_transform(create_images(3), array![7, 8, 9], transform);
    let (tensor, label) = dataset.get(1).unwrap();
    assert_eq!(label, 8);
    assert_eq!(tensor.dim(), (3, 4, 4));
    assert_relative_eq!(tensor[[1, 2, 3]], 10.0 / 255.0 / 0.5);
}

#[test]
fn test_array_image_dataset_out_of_bounds() {
    let dataset = ArrayImageDataset::new(create_images(2), array![0, 1]);
    match dataset.get(2) {
        Err(UdaError::IndexOutOfBounds { index, shape }) => {
            assert_eq!(index, vec![2]);
            assert_eq!(shape, vec![2]);
        }
        other => panic!("Expected IndexOutOfBounds, got {:?}", other.map(|(_, l)| l)),
    }
}

#[test]
fn test_array_image_dataset_short_labels() {
    // Mismatched arrays are not rejected up front, only on access.
    let dataset = ArrayImageDataset::new(create_images(3), array![0, 1]);
    assert_eq!(dataset.len(), 3);
    assert!(dataset.get(1).is_ok());
    assert!(matches!(
        dataset.get(2),
        Err(UdaError::IndexOutOfBounds { .. })
    ));
}
