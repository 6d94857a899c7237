use image::RgbImage;
use uda_core::tensor::{image_to_chw, CHANNELS};
use uda_core::{ImageTensor, UdaError};

use super::traits::Transform;

/// Converts an `RgbImage` into a `[3, H, W]` tensor with values in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToTensor;

impl Transform<RgbImage> for ToTensor {
    type Output = ImageTensor;

    fn apply(&self, input: RgbImage) -> Result<ImageTensor, UdaError> {
        Ok(image_to_chw(&input))
    }
}

/// Per-channel affine rescaling: `x' = (x - mean[c]) / std[c]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalize {
    pub mean: [f32; CHANNELS],
    pub std: [f32; CHANNELS],
}

impl Normalize {
    pub fn new(mean: [f32; CHANNELS], std: [f32; CHANNELS]) -> Self {
        Self { mean, std }
    }
}

impl Transform<ImageTensor> for Normalize {
    type Output = ImageTensor;

    fn apply(&self, mut input: ImageTensor) -> Result<ImageTensor, UdaError> {
        let (channels, height, width) = input.dim();
        if channels != CHANNELS {
            return Err(UdaError::ShapeMismatch {
                expected: vec![CHANNELS, height, width],
                actual: vec![channels, height, width],
                operation: "Normalize".to_string(),
            });
        }
        for (c, mut plane) in input.outer_iter_mut().enumerate() {
            let (mean, std) = (self.mean[c], self.std[c]);
            plane.mapv_inplace(|v| (v - mean) / std);
        }
        Ok(input)
    }
}
