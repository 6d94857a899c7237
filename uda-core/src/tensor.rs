// uda-core/src/tensor.rs

//! Conversions between decoded images and the `ndarray` tensors fed to models.
//!
//! Images travel through augmentation as [`RgbImage`] (height × width × RGB,
//! `u8`). Once converted they become channel-first `f32` tensors in `[0, 1]`,
//! and batches stack them along a new leading axis.

use image::{Rgb, RgbImage};
use ndarray::{Array1, Array3, Array4, ArrayView3, Axis};

use crate::error::UdaError;

/// Class label with long-integer semantics.
pub type Label = i64;

/// A single image tensor, laid out as `[C, H, W]`.
pub type ImageTensor = Array3<f32>;

/// A batch of image tensors, laid out as `[N, C, H, W]`.
pub type BatchTensor = Array4<f32>;

/// Labels of a batch, aligned with the batch's leading axis.
pub type LabelTensor = Array1<Label>;

/// Number of colour channels of every image handled by the pipeline.
pub const CHANNELS: usize = 3;

/// Converts an RGB image into a `[3, H, W]` tensor scaled to `[0, 1]`.
pub fn image_to_chw(image: &RgbImage) -> ImageTensor {
    let (width, height) = image.dimensions();
    Array3::from_shape_fn(
        (CHANNELS, height as usize, width as usize),
        |(c, y, x)| f32::from(image.get_pixel(x as u32, y as u32)[c]) / 255.0,
    )
}

/// Builds an RGB image from an `[H, W, 3]` view, the layout of array files on disk.
///
/// # Errors
///
/// Returns `UdaError::ShapeMismatch` if the trailing dimension is not 3.
pub fn hwc_to_image(view: ArrayView3<'_, u8>) -> Result<RgbImage, UdaError> {
    let (height, width, channels) = view.dim();
    if channels != CHANNELS {
        return Err(UdaError::ShapeMismatch {
            expected: vec![height, width, CHANNELS],
            actual: vec![height, width, channels],
            operation: "hwc_to_image".to_string(),
        });
    }
    Ok(RgbImage::from_fn(width as u32, height as u32, |x, y| {
        let (x, y) = (x as usize, y as usize);
        Rgb([view[[y, x, 0]], view[[y, x, 1]], view[[y, x, 2]]])
    }))
}

/// Builds an RGB image from planar bytes: all red values, then green, then blue.
///
/// # Errors
///
/// Returns `UdaError::ShapeMismatch` if `bytes` does not hold exactly
/// `3 * height * width` values.
pub fn planar_to_image(bytes: &[u8], height: usize, width: usize) -> Result<RgbImage, UdaError> {
    let plane = height * width;
    if bytes.len() != CHANNELS * plane {
        return Err(UdaError::ShapeMismatch {
            expected: vec![CHANNELS * plane],
            actual: vec![bytes.len()],
            operation: "planar_to_image".to_string(),
        });
    }
    Ok(RgbImage::from_fn(width as u32, height as u32, |x, y| {
        let offset = y as usize * width + x as usize;
        Rgb([
            bytes[offset],
            bytes[plane + offset],
            bytes[2 * plane + offset],
        ])
    }))
}

/// Stacks image tensors of identical shape into one `[N, C, H, W]` batch.
///
/// # Errors
///
/// Returns `UdaError::InvalidArgument` for an empty list and
/// `UdaError::Ndarray` if the shapes differ.
pub fn stack_images(images: &[ImageTensor]) -> Result<BatchTensor, UdaError> {
    if images.is_empty() {
        return Err(UdaError::InvalidArgument(
            "cannot stack an empty list of images".to_string(),
        ));
    }
    let views: Vec<_> = images.iter().map(|image| image.view()).collect();
    Ok(ndarray::stack(Axis(0), &views)?)
}

#[cfg(test)]
#[path = "tensor_test.rs"]
mod tests;
