use super::*;
use ndarray::{array, Array3};

fn image(fill: f32) -> ImageTensor {
    Array3::from_elem((3, 2, 2), fill)
}

#[test]
fn test_labeled_images_stacks_in_order() {
    let batch = labeled_images(vec![(image(0.0), 4), (image(1.0), 2), (image(2.0), 9)]).unwrap();
    assert_eq!(batch.images.dim(), (3, 3, 2, 2));
    assert_eq!(batch.labels, array![4, 2, 9]);
    assert_eq!(batch.len(), 3);
    assert_eq!(batch.images[[1, 2, 1, 0]], 1.0);
    assert_eq!(batch.images[[2, 0, 0, 0]], 2.0);
}

#[test]
fn test_labeled_images_rejects_shape_mismatch() {
    let odd = Array3::zeros((3, 4, 4));
    assert!(matches!(
        labeled_images(vec![(image(0.0), 0), (odd, 1)]),
        Err(UdaError::Ndarray(_))
    ));
}

#[test]
fn test_views_single() {
    let samples = vec![
        ViewSample::Single { image: image(0.5), label: 1 },
        ViewSample::Single { image: image(0.25), label: 0 },
    ];
    match views(samples).unwrap() {
        ViewBatch::Single(batch) => {
            assert_eq!(batch.images.dim(), (2, 3, 2, 2));
            assert_eq!(batch.labels, array![1, 0]);
        }
        other => panic!("Expected a single-view batch, got {:?}", other),
    }
}

#[test]
fn test_views_paired() {
    let samples = (0..4)
        .map(|i| ViewSample::Paired {
            clean: image(i as f32),
            augmented: image(-(i as f32)),
            label: i,
        })
        .collect();
    let batch = views(samples).unwrap();
    assert_eq!(batch.len(), 4);
    match batch {
        ViewBatch::Paired { clean, augmented, labels } => {
            assert_eq!(clean.dim(), (4, 3, 2, 2));
            assert_eq!(augmented.dim(), (4, 3, 2, 2));
            assert_eq!(labels, array![0, 1, 2, 3]);
            assert_eq!(clean[[3, 0, 0, 0]], 3.0);
            assert_eq!(augmented[[3, 0, 0, 0]], -3.0);
        }
        other => panic!("Expected a paired batch, got {:?}", other),
    }
}

#[test]
fn test_views_rejects_mixed_arity() {
    let samples = vec![
        ViewSample::Paired {
            clean: image(0.0),
            augmented: image(0.0),
            label: 0,
        },
        ViewSample::Single { image: image(0.0), label: 1 },
    ];
    assert!(matches!(views(samples), Err(UdaError::Collate(_))));
}

#[test]
fn test_views_rejects_empty_batch() {
    assert!(matches!(views(Vec::new()), Err(UdaError::InvalidArgument(_))));
}
