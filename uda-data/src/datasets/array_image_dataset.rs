use image::RgbImage;
use ndarray::{Array1, Array4, Axis};
use uda_core::tensor::hwc_to_image;
use uda_core::{Label, UdaError};

use super::traits::{out_of_bounds, Dataset};
use crate::transforms::{Identity, Transform};

/// A dataset over pre-loaded parallel arrays of images and labels.
///
/// `images` is laid out as `[N, H, W, 3]`, the layout of image arrays saved to
/// disk, and `labels[i]` is the class of `images[i]`. An optional transform is
/// applied to each image after it is fetched.
///
/// The two arrays are expected to share their leading dimension. This is not
/// checked on construction; [`Dataset::len`] reports the number of images.
#[derive(Debug, Clone)]
pub struct ArrayImageDataset<T = Identity> {
    images: Array4<u8>,
    labels: Array1<Label>,
    transform: T,
}

impl ArrayImageDataset<Identity> {
    /// Creates a dataset that returns images untransformed.
    pub fn new(images: Array4<u8>, labels: Array1<Label>) -> Self {
        Self::with_transform(images, labels, Identity)
    }
}

impl<T> ArrayImageDataset<T> {
    /// Creates a dataset applying `transform` to every fetched image.
    pub fn with_transform(images: Array4<u8>, labels: Array1<Label>, transform: T) -> Self {
        Self {
            images,
            labels,
            transform,
        }
    }

    pub fn images(&self) -> &Array4<u8> {
        &self.images
    }

    pub fn labels(&self) -> &Array1<Label> {
        &self.labels
    }
}

impl<T> Dataset for ArrayImageDataset<T>
where
    T: Transform<RgbImage>,
    T::Output: Send + 'static,
{
    type Item = (T::Output, Label);

    /// Returns `(transform(images[index]), labels[index])`.
    ///
    /// # Errors
    ///
    /// Returns `UdaError::IndexOutOfBounds` if `index` is past the images, or
    /// past the labels when the arrays disagree in length.
    fn get(&self, index: usize) -> Result<Self::Item, UdaError> {
        if index >= self.len() {
            return Err(out_of_bounds(index, self.len()));
        }
        let label = *self
            .labels
            .get(index)
            .ok_or_else(|| out_of_bounds(index, self.labels.len()))?;
        let image = hwc_to_image(self.images.index_axis(Axis(0), index))?;
        Ok((self.transform.apply(image)?, label))
    }

    fn len(&self) -> usize {
        self.images.len_of(Axis(0))
    }
}

#[cfg(test)]
#[path = "array_image_dataset_test.rs"]
mod tests;
