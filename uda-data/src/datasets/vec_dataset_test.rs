// uda-data/src/datasets/vec_dataset_test.rs

use super::*;
use std::sync::Arc;

#[test]
fn test_vec_dataset_get_valid_index() {
    let dataset = VecDataset::new(vec![10, 20, 30]);
    assert_eq!(dataset.get(0).unwrap(), 10);
    assert_eq!(dataset.get(2).unwrap(), 30);
}

#[test]
fn test_vec_dataset_get_invalid_index() {
    let dataset = VecDataset::new(vec![10, 20, 30]);
    match dataset.get(3) {
        Err(UdaError::IndexOutOfBounds { index, shape }) => {
            assert_eq!(index, vec![3]);
            assert_eq!(shape, vec![3]);
        }
        other => panic!("Expected IndexOutOfBounds error, got {:?}", other),
    }
}

#[test]
fn test_vec_dataset_len_empty() {
    let dataset: VecDataset<i32> = VecDataset::new(Vec::new());
    assert_eq!(dataset.len(), 0);
    assert!(dataset.is_empty());
    assert!(dataset.get(0).is_err());
}

#[test]
fn test_vec_dataset_item_type() {
    let dataset = VecDataset::new(vec![(1, "one"), (2, "two")]);
    let item: (i32, &'static str) = dataset.get(1).unwrap();
    assert_eq!(item, (2, "two"));
}

#[test]
fn test_boxed_and_shared_datasets_delegate() {
    let boxed: Box<dyn Dataset<Item = i32>> = Box::new(VecDataset::new(vec![1, 2, 3]));
    assert_eq!(boxed.len(), 3);
    assert_eq!(boxed.get(1).unwrap(), 2);

    let shared = Arc::new(VecDataset::new(vec![4, 5]));
    assert_eq!(Dataset::len(&shared), 2);
    assert_eq!(Dataset::get(&shared, 0).unwrap(), 4);
}
