use std::sync::Arc;

use uda_core::UdaError;

/// Represents a dataset that can be accessed by index.
///
/// A dataset is a fixed-length collection of items, where each item is usually
/// an `(image, label)` pair. Datasets are immutable once built and are shared
/// with loader worker threads, hence the `Send + Sync` bound.
pub trait Dataset: Send + Sync {
    /// The type of a single item returned by the dataset.
    ///
    /// This type must be `Send` and `'static` so that worker threads can hand
    /// items back to the consumer.
    type Item: Send + 'static;

    /// Returns the item at the given index.
    ///
    /// # Arguments
    ///
    /// * `index` - The index of the item to retrieve.
    ///
    /// # Errors
    ///
    /// Returns `UdaError::IndexOutOfBounds` if the index is out of bounds, or
    /// any error raised while transforming the item.
    fn get(&self, index: usize) -> Result<Self::Item, UdaError>;

    /// Returns the total number of items in the dataset.
    fn len(&self) -> usize;

    /// Checks if the dataset is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<D: Dataset + ?Sized> Dataset for Box<D> {
    type Item = D::Item;

    fn get(&self, index: usize) -> Result<Self::Item, UdaError> {
        (**self).get(index)
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}

impl<D: Dataset + ?Sized> Dataset for Arc<D> {
    type Item = D::Item;

    fn get(&self, index: usize) -> Result<Self::Item, UdaError> {
        (**self).get(index)
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}

/// A dataset chosen at runtime, e.g. the default test split or an alternate one.
pub type BoxedDataset<I> = Box<dyn Dataset<Item = I>>;

/// Builds the error returned for an index past the end of a dataset.
pub(crate) fn out_of_bounds(index: usize, len: usize) -> UdaError {
    UdaError::IndexOutOfBounds {
        index: vec![index],
        shape: vec![len],
    }
}
