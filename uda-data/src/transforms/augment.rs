// uda-data/src/transforms/augment.rs
//
// Geometric augmentations applied to training images before tensor conversion.

use image::imageops;
use image::RgbImage;
use rand::Rng;
use uda_core::UdaError;

use super::traits::Transform;

/// Randomly crop an image to `size × size` after zero-padding every border by
/// `padding` pixels.
#[derive(Debug, Clone, Copy)]
pub struct RandomCrop {
    pub size: u32,
    pub padding: u32,
}

impl RandomCrop {
    pub fn new(size: u32, padding: u32) -> Self {
        Self { size, padding }
    }
}

impl Transform<RgbImage> for RandomCrop {
    type Output = RgbImage;

    fn apply(&self, input: RgbImage) -> Result<RgbImage, UdaError> {
        let (width, height) = input.dimensions();
        let pad = self.padding;
        let (padded_w, padded_h) = (width + 2 * pad, height + 2 * pad);
        if self.size > padded_w || self.size > padded_h {
            return Err(UdaError::ShapeMismatch {
                expected: vec![self.size as usize, self.size as usize],
                actual: vec![padded_h as usize, padded_w as usize],
                operation: "RandomCrop".to_string(),
            });
        }

        let mut padded = RgbImage::new(padded_w, padded_h);
        imageops::replace(&mut padded, &input, i64::from(pad), i64::from(pad));

        let mut rng = rand::thread_rng();
        let x0 = rng.gen_range(0..=padded_w - self.size);
        let y0 = rng.gen_range(0..=padded_h - self.size);
        Ok(imageops::crop_imm(&padded, x0, y0, self.size, self.size).to_image())
    }
}

/// Randomly flip an image horizontally with probability `p`.
#[derive(Debug, Clone, Copy)]
pub struct RandomHorizontalFlip {
    pub p: f64,
}

impl RandomHorizontalFlip {
    pub fn new(p: f64) -> Self {
        Self { p }
    }
}

impl Default for RandomHorizontalFlip {
    fn default() -> Self {
        Self { p: 0.5 }
    }
}

impl Transform<RgbImage> for RandomHorizontalFlip {
    type Output = RgbImage;

    fn apply(&self, input: RgbImage) -> Result<RgbImage, UdaError> {
        if rand::thread_rng().gen::<f64>() < self.p {
            Ok(imageops::flip_horizontal(&input))
        } else {
            Ok(input)
        }
    }
}

#[cfg(test)]
#[path = "augment_test.rs"]
mod tests;
