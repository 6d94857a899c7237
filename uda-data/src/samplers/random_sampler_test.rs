// uda-data/src/samplers/random_sampler_test.rs

use super::*;
use std::collections::HashSet;

fn distinct(indices: &[usize]) -> usize {
    indices.iter().collect::<HashSet<_>>().len()
}

#[test]
fn test_len_follows_num_samples() {
    assert_eq!(RandomSampler::default().len(10), 10);
    assert_eq!(RandomSampler::new(false, Some(5)).len(10), 5);
    assert_eq!(RandomSampler::new(true, Some(25)).len(10), 25);
}

#[test]
fn test_full_permutation_without_replacement() {
    let indices: Vec<usize> = RandomSampler::default().iter(40).collect();
    let mut sorted = indices.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, (0..40).collect::<Vec<_>>());
}

#[test]
fn test_partial_draw_without_replacement() {
    let indices: Vec<usize> = RandomSampler::new(false, Some(6)).iter(10).collect();
    assert_eq!(indices.len(), 6);
    assert_eq!(distinct(&indices), 6);
    assert!(indices.iter().all(|&i| i < 10));
}

#[test]
fn test_oversized_draw_without_replacement_is_empty() {
    let sampler = RandomSampler::new(false, Some(10));
    assert_eq!(sampler.iter(5).count(), 0);
    assert_eq!(sampler.len(5), 0);
    assert_eq!(sampler.len(10), 10);
}

#[test]
fn test_draw_with_replacement_stays_in_range() {
    for num_samples in [None, Some(3), Some(50)] {
        let sampler = RandomSampler::new(true, num_samples);
        let indices: Vec<usize> = sampler.iter(7).collect();
        assert_eq!(indices.len(), sampler.len(7));
        assert!(indices.iter().all(|&i| i < 7));
    }
}

#[test]
fn test_empty_dataset_yields_nothing() {
    for replacement in [false, true] {
        for num_samples in [None, Some(5)] {
            let sampler = RandomSampler::new(replacement, num_samples);
            assert_eq!(sampler.iter(0).count(), 0);
        }
    }
}

#[test]
fn test_new_order_each_epoch() {
    let sampler = RandomSampler::default();
    let first: Vec<usize> = sampler.iter(100).collect();
    // Ten identical draws in a row would mean no shuffling.
    let reshuffled = (0..10).any(|_| sampler.iter(100).collect::<Vec<_>>() != first);
    assert!(reshuffled, "RandomSampler did not reshuffle between epochs");
}
