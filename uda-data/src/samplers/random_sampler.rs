// uda-data/src/samplers/random_sampler.rs

use super::traits::Sampler;
use log::warn;
use rand::seq::{index, SliceRandom};
use rand::Rng;

/// Draws dataset indices in random order.
///
/// Every call to [`Sampler::iter`] draws again, so two epochs over the same
/// loader visit samples in different orders.
#[derive(Debug, Clone, Default)]
pub struct RandomSampler {
    replacement: bool,
    num_samples: Option<usize>,
}

impl RandomSampler {
    /// # Arguments
    ///
    /// * `replacement`: Draw every index independently, so repeats are possible.
    /// * `num_samples`: Indices per epoch. `None` means one per dataset item.
    pub fn new(replacement: bool, num_samples: Option<usize>) -> Self {
        RandomSampler {
            replacement,
            num_samples,
        }
    }

    fn draw(&self, dataset_len: usize) -> Vec<usize> {
        let count = self.num_samples.unwrap_or(dataset_len);
        let mut rng = rand::thread_rng();
        if self.replacement {
            return (0..count).map(|_| rng.gen_range(0..dataset_len)).collect();
        }
        if count > dataset_len {
            warn!(
                "RandomSampler: cannot draw {} distinct indices from {} items; yielding none",
                count, dataset_len
            );
            return Vec::new();
        }
        if count == dataset_len {
            let mut indices: Vec<usize> = (0..dataset_len).collect();
            indices.shuffle(&mut rng);
            indices
        } else {
            index::sample(&mut rng, dataset_len, count).into_vec()
        }
    }
}

impl Sampler for RandomSampler {
    fn iter(&self, dataset_len: usize) -> Box<dyn Iterator<Item = usize> + Send + Sync> {
        if dataset_len == 0 {
            return Box::new(std::iter::empty());
        }
        Box::new(self.draw(dataset_len).into_iter())
    }

    // Matches `draw`, which yields nothing for an oversized draw without
    // replacement.
    fn len(&self, dataset_len: usize) -> usize {
        match self.num_samples {
            Some(count) if !self.replacement && count > dataset_len => 0,
            Some(count) => count,
            None => dataset_len,
        }
    }
}

#[cfg(test)]
#[path = "random_sampler_test.rs"]
mod tests;
