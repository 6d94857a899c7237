// uda-data/src/datasets/paired_view.rs

use image::RgbImage;
use uda_core::{ImageTensor, Label, UdaError};

use super::traits::Dataset;
use crate::transforms::{Cifar10Policy, Normalize, Then, ToTensor, Transform};

/// Clean branch: tensor conversion followed by normalization.
pub type CleanTransform = Then<ToTensor, Normalize>;

/// Augmented branch: the CIFAR-10 policy, then the clean branch.
pub type AugmentedTransform = Then<Cifar10Policy, CleanTransform>;

/// A sample produced by [`PairedViewDataset`].
#[derive(Debug, Clone)]
pub enum ViewSample {
    /// `(image, label)`: augmentation mode off.
    Single { image: ImageTensor, label: Label },
    /// `(clean, augmented, label)`: both views come from the same source image.
    Paired {
        clean: ImageTensor,
        augmented: ImageTensor,
        label: Label,
    },
}

impl ViewSample {
    pub fn label(&self) -> Label {
        match self {
            ViewSample::Single { label, .. } | ViewSample::Paired { label, .. } => *label,
        }
    }

    /// Number of elements in the sample: 2 for `Single`, 3 for `Paired`.
    pub fn arity(&self) -> usize {
        match self {
            ViewSample::Single { .. } => 2,
            ViewSample::Paired { .. } => 3,
        }
    }
}

/// Wraps a dataset of raw images and emits normalized views of each one.
///
/// With augmentation mode on (UDA), every access returns a clean view and a
/// policy-augmented view of the same image, for consistency training. Both
/// branches share the normalization of the underlying dataset. The augmented
/// view is random, so repeated accesses to one index differ in content but
/// never in label or shape.
pub struct PairedViewDataset<D> {
    dataset: D,
    uda: bool,
    clean: CleanTransform,
    augmented: AugmentedTransform,
}

impl<D> PairedViewDataset<D> {
    /// # Arguments
    ///
    /// * `dataset` - Source of `(RgbImage, Label)` samples.
    /// * `uda` - Emit `(clean, augmented, label)` instead of `(clean, label)`.
    /// * `normalize` - Dataset-specific normalization used by both branches.
    pub fn new(dataset: D, uda: bool, normalize: Normalize) -> Self {
        Self {
            dataset,
            uda,
            clean: ToTensor.then(normalize),
            augmented: Cifar10Policy::new().then(ToTensor.then(normalize)),
        }
    }

    pub fn is_uda(&self) -> bool {
        self.uda
    }

    pub fn inner(&self) -> &D {
        &self.dataset
    }
}

impl<D> Dataset for PairedViewDataset<D>
where
    D: Dataset<Item = (RgbImage, Label)>,
{
    type Item = ViewSample;

    fn get(&self, index: usize) -> Result<ViewSample, UdaError> {
        let (image, label) = self.dataset.get(index)?;
        if self.uda {
            let augmented = self.augmented.apply(image.clone())?;
            let clean = self.clean.apply(image)?;
            Ok(ViewSample::Paired {
                clean,
                augmented,
                label,
            })
        } else {
            Ok(ViewSample::Single {
                image: self.clean.apply(image)?,
                label,
            })
        }
    }

    fn len(&self) -> usize {
        self.dataset.len()
    }
}

#[cfg(test)]
#[path = "paired_view_test.rs"]
mod tests;
