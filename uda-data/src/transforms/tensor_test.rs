// uda-data/src/transforms/tensor_test.rs

use super::*;
use approx::assert_relative_eq;
use image::{Rgb, RgbImage};
use ndarray::Array3;
use uda_core::{ImageTensor, UdaError};

#[test]
fn test_to_tensor_then_normalize() {
    let image = RgbImage::from_pixel(2, 2, Rgb([255, 0, 51]));
    let pipeline = ToTensor.then(Normalize::new([0.5, 0.5, 0.5], [0.5, 0.25, 0.2]));
    let tensor = pipeline.apply(image).unwrap();
    assert_eq!(tensor.dim(), (3, 2, 2));
    assert_relative_eq!(tensor[[0, 0, 0]], 1.0);
    assert_relative_eq!(tensor[[1, 1, 1]], -2.0);
    assert_relative_eq!(tensor[[2, 0, 1]], -1.5, epsilon = 1e-5);
}

#[test]
fn test_normalize_rejects_wrong_channel_count() {
    let normalize = Normalize::new([0.0; 3], [1.0; 3]);
    let tensor = Array3::<f32>::zeros((1, 4, 4));
    match normalize.apply(tensor) {
        Err(UdaError::ShapeMismatch { operation, .. }) => assert_eq!(operation, "Normalize"),
        other => panic!("Expected ShapeMismatch, got {:?}", other),
    }
}

#[test]
fn test_identity_and_compose() {
    assert_eq!(Transform::<i32>::apply(&Identity, 7).unwrap(), 7);

    let pipeline: Compose<RgbImage> = Compose::new(vec![
        Box::new(RandomHorizontalFlip::new(1.0)),
        Box::new(RandomHorizontalFlip::new(1.0)),
    ]);
    assert_eq!(pipeline.len(), 2);
    let image = RgbImage::from_fn(3, 1, |x, _| Rgb([x as u8, 0, 0]));
    assert_eq!(pipeline.apply(image.clone()).unwrap(), image);

    let empty: Compose<RgbImage> = Compose::new(Vec::new());
    assert!(empty.is_empty());
}

#[test]
fn test_then_propagates_errors() {
    let pipeline =
        <Identity as Transform<ImageTensor>>::then(Identity, Normalize::new([0.0; 3], [1.0; 3]));
    assert!(pipeline.apply(Array3::<f32>::zeros((2, 1, 1))).is_err());
}
