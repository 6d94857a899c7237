use uda_core::UdaError;

use super::traits::{out_of_bounds, Dataset};

/// A simple dataset that wraps a `Vec` of items.
///
/// Each item in the `Vec` corresponds to a sample in the dataset.
///
/// # Type Parameters
///
/// * `T`: The type of the items stored in the dataset. Must be `Clone + Send + Sync + 'static`.
#[derive(Debug, Clone)]
pub struct VecDataset<T: Clone + Send + Sync + 'static> {
    data: Vec<T>,
}

impl<T: Clone + Send + Sync + 'static> VecDataset<T> {
    /// Creates a new `VecDataset` from a vector of items.
    ///
    /// # Arguments
    ///
    /// * `data` - A vector of items that will constitute the dataset.
    pub fn new(data: Vec<T>) -> Self {
        Self { data }
    }
}

impl<T: Clone + Send + Sync + 'static> Dataset for VecDataset<T> {
    type Item = T;

    /// Returns a clone of the item at the given index.
    ///
    /// # Errors
    ///
    /// Returns `UdaError::IndexOutOfBounds` if the index is out of bounds.
    fn get(&self, index: usize) -> Result<Self::Item, UdaError> {
        self.data
            .get(index)
            .cloned()
            .ok_or_else(|| out_of_bounds(index, self.data.len()))
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
#[path = "vec_dataset_test.rs"]
mod tests;
