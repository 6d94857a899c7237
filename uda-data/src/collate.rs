// uda-data/src/collate.rs

//! Collation functions that stack per-sample tensors into batch tensors.

use ndarray::Array1;
use uda_core::tensor::stack_images;
use uda_core::{BatchTensor, ImageTensor, Label, LabelTensor, UdaError};

use crate::datasets::ViewSample;

/// Images stacked along a new leading axis, plus their labels.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBatch {
    /// `[N, C, H, W]`
    pub images: BatchTensor,
    /// `[N]`
    pub labels: LabelTensor,
}

impl ImageBatch {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// A batch of [`ViewSample`]s. A batch never mixes the two arities.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewBatch {
    Single(ImageBatch),
    Paired {
        clean: BatchTensor,
        augmented: BatchTensor,
        labels: LabelTensor,
    },
}

impl ViewBatch {
    pub fn labels(&self) -> &LabelTensor {
        match self {
            ViewBatch::Single(batch) => &batch.labels,
            ViewBatch::Paired { labels, .. } => labels,
        }
    }

    pub fn len(&self) -> usize {
        self.labels().len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels().is_empty()
    }
}

/// Stacks `(image, label)` samples into an [`ImageBatch`].
///
/// # Errors
///
/// `UdaError::InvalidArgument` for an empty batch, `UdaError::ShapeMismatch`
/// if the images do not share a shape.
pub fn labeled_images(samples: Vec<(ImageTensor, Label)>) -> Result<ImageBatch, UdaError> {
    let (images, labels): (Vec<_>, Vec<_>) = samples.into_iter().unzip();
    Ok(ImageBatch {
        images: stack_images(&images)?,
        labels: Array1::from(labels),
    })
}

/// Stacks view samples position-wise.
///
/// # Errors
///
/// Returns `UdaError::Collate` if single and paired samples are mixed, plus
/// any error from [`labeled_images`].
pub fn views(samples: Vec<ViewSample>) -> Result<ViewBatch, UdaError> {
    let paired = match samples.first() {
        Some(sample) => sample.arity() == 3,
        None => return Err(UdaError::InvalidArgument("cannot collate an empty batch".into())),
    };

    if !paired {
        let singles = samples
            .into_iter()
            .map(|sample| match sample {
                ViewSample::Single { image, label } => Ok((image, label)),
                ViewSample::Paired { .. } => Err(mixed_arity()),
            })
            .collect::<Result<Vec<_>, _>>()?;
        return labeled_images(singles).map(ViewBatch::Single);
    }

    let mut clean = Vec::with_capacity(samples.len());
    let mut augmented = Vec::with_capacity(samples.len());
    let mut labels = Vec::with_capacity(samples.len());
    for sample in samples {
        match sample {
            ViewSample::Paired {
                clean: c,
                augmented: a,
                label,
            } => {
                clean.push(c);
                augmented.push(a);
                labels.push(label);
            }
            ViewSample::Single { .. } => return Err(mixed_arity()),
        }
    }
    Ok(ViewBatch::Paired {
        clean: stack_images(&clean)?,
        augmented: stack_images(&augmented)?,
        labels: Array1::from(labels),
    })
}

fn mixed_arity() -> UdaError {
    UdaError::Collate("batch mixes single and paired view samples".into())
}

#[cfg(test)]
#[path = "collate_test.rs"]
mod tests;
