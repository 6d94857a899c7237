// uda-data/src/transforms/policy.rs

//! The AutoAugment policy learned on CIFAR-10.
//!
//! The policy is a list of 25 sub-policies. Each call picks one sub-policy
//! uniformly at random; a sub-policy is two operations, each applied with its
//! own probability at a fixed magnitude level in `0..10`. Geometric operations
//! fill uncovered pixels with mid grey.
//!
//! Photometric operations follow the usual enhancement model: the image is
//! blended with a "degenerate" version of itself (greyscale, mean grey, black,
//! smoothed) using a factor of `1 ± magnitude`.

use image::{imageops, Rgb, RgbImage};
use imageproc::geometric_transformations::{rotate_about_center, warp, Interpolation, Projection};
use rand::Rng;
use uda_core::UdaError;

use super::traits::Transform;

/// Number of discrete magnitude levels of every operation.
pub const MAGNITUDE_LEVELS: usize = 10;

/// Grey used for pixels uncovered by shear, translate and rotate.
pub const FILL: Rgb<u8> = Rgb([128, 128, 128]);

/// A single image operation of the augmentation search space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyOp {
    ShearX,
    ShearY,
    TranslateX,
    TranslateY,
    Rotate,
    Color,
    Posterize,
    Solarize,
    Contrast,
    Sharpness,
    Brightness,
    AutoContrast,
    Equalize,
    Invert,
}

impl PolicyOp {
    /// Magnitude at `level`, linearly spaced over the operation's range.
    ///
    /// Levels past the last one are clamped.
    pub fn magnitude(self, level: usize) -> f32 {
        let t = level.min(MAGNITUDE_LEVELS - 1) as f32 / (MAGNITUDE_LEVELS - 1) as f32;
        match self {
            PolicyOp::ShearX | PolicyOp::ShearY => 0.3 * t,
            PolicyOp::TranslateX | PolicyOp::TranslateY => 150.0 / 331.0 * t,
            PolicyOp::Rotate => 30.0 * t,
            PolicyOp::Color | PolicyOp::Contrast | PolicyOp::Sharpness | PolicyOp::Brightness => {
                0.9 * t
            }
            // bits kept, 8 down to 4
            PolicyOp::Posterize => (8.0 - 4.0 * t).round(),
            // threshold, 256 (no-op) down to 0
            PolicyOp::Solarize => 256.0 * (1.0 - t),
            PolicyOp::AutoContrast | PolicyOp::Equalize | PolicyOp::Invert => 0.0,
        }
    }

    /// Applies the operation at `level`. `sign` (`1.0` or `-1.0`) picks the
    /// direction of signed operations and is ignored by the others.
    pub fn apply(self, image: RgbImage, level: usize, sign: f32) -> RgbImage {
        let magnitude = self.magnitude(level);
        let (width, height) = image.dimensions();
        match self {
            PolicyOp::ShearX => shear(&image, magnitude * sign, true),
            PolicyOp::ShearY => shear(&image, magnitude * sign, false),
            PolicyOp::TranslateX => translate(&image, magnitude * sign * width as f32, 0.0),
            PolicyOp::TranslateY => translate(&image, 0.0, magnitude * sign * height as f32),
            PolicyOp::Rotate => rotate_about_center(
                &image,
                (magnitude * sign).to_radians(),
                Interpolation::Nearest,
                FILL,
            ),
            PolicyOp::Color => {
                let degenerate = grayscale_rgb(&image);
                blend(&degenerate, &image, 1.0 + magnitude * sign)
            }
            PolicyOp::Contrast => {
                let mean = mean_luma(&image);
                let degenerate = RgbImage::from_pixel(width, height, Rgb([mean; 3]));
                blend(&degenerate, &image, 1.0 + magnitude * sign)
            }
            PolicyOp::Sharpness => {
                let degenerate = smooth(&image);
                blend(&degenerate, &image, 1.0 + magnitude * sign)
            }
            PolicyOp::Brightness => {
                let degenerate = RgbImage::new(width, height);
                blend(&degenerate, &image, 1.0 + magnitude * sign)
            }
            PolicyOp::Posterize => posterize(image, magnitude as u32),
            // Pixels strictly below the real-valued threshold are kept.
            PolicyOp::Solarize => solarize(image, magnitude.ceil() as u32),
            PolicyOp::AutoContrast => autocontrast(image),
            PolicyOp::Equalize => equalize(image),
            PolicyOp::Invert => {
                let mut image = image;
                imageops::invert(&mut image);
                image
            }
        }
    }
}

/// Two operations, each applied with its own probability at a fixed level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubPolicy {
    pub first: (PolicyOp, f64, usize),
    pub second: (PolicyOp, f64, usize),
}

impl SubPolicy {
    pub const fn new(
        p1: f64,
        op1: PolicyOp,
        level1: usize,
        p2: f64,
        op2: PolicyOp,
        level2: usize,
    ) -> Self {
        Self {
            first: (op1, p1, level1),
            second: (op2, p2, level2),
        }
    }

    pub fn apply<R: Rng>(&self, mut image: RgbImage, rng: &mut R) -> RgbImage {
        for &(op, p, level) in [&self.first, &self.second] {
            if rng.gen::<f64>() < p {
                let sign = if rng.gen::<bool>() { 1.0 } else { -1.0 };
                image = op.apply(image, level, sign);
            }
        }
        image
    }
}

/// AutoAugment policy for CIFAR-10 images.
#[derive(Debug, Clone)]
pub struct Cifar10Policy {
    sub_policies: Vec<SubPolicy>,
}

impl Cifar10Policy {
    pub fn new() -> Self {
        use PolicyOp::*;
        let sub_policies = vec![
            SubPolicy::new(0.1, Invert, 7, 0.2, Contrast, 6),
            SubPolicy::new(0.7, Rotate, 2, 0.3, TranslateX, 9),
            SubPolicy::new(0.8, Sharpness, 1, 0.9, Sharpness, 3),
            SubPolicy::new(0.5, ShearY, 8, 0.7, TranslateY, 9),
            SubPolicy::new(0.5, AutoContrast, 8, 0.9, Equalize, 2),
            SubPolicy::new(0.2, ShearY, 7, 0.3, Posterize, 7),
            SubPolicy::new(0.4, Color, 3, 0.6, Brightness, 7),
            SubPolicy::new(0.3, Sharpness, 9, 0.7, Brightness, 9),
            SubPolicy::new(0.6, Equalize, 5, 0.5, Equalize, 1),
            SubPolicy::new(0.6, Contrast, 7, 0.6, Sharpness, 5),
            SubPolicy::new(0.7, Color, 7, 0.5, TranslateX, 8),
            SubPolicy::new(0.3, Equalize, 7, 0.4, AutoContrast, 8),
            SubPolicy::new(0.4, TranslateY, 3, 0.2, Sharpness, 6),
            SubPolicy::new(0.9, Brightness, 6, 0.2, Color, 8),
            SubPolicy::new(0.5, Solarize, 2, 0.0, Invert, 3),
            SubPolicy::new(0.2, Equalize, 0, 0.6, AutoContrast, 0),
            SubPolicy::new(0.2, Equalize, 8, 0.8, Equalize, 4),
            SubPolicy::new(0.9, Color, 9, 0.6, Equalize, 6),
            SubPolicy::new(0.8, AutoContrast, 4, 0.2, Solarize, 8),
            SubPolicy::new(0.1, Brightness, 3, 0.7, Color, 0),
            SubPolicy::new(0.4, Solarize, 5, 0.9, AutoContrast, 3),
            SubPolicy::new(0.9, TranslateY, 9, 0.7, TranslateY, 9),
            SubPolicy::new(0.9, AutoContrast, 2, 0.8, Solarize, 3),
            SubPolicy::new(0.8, Equalize, 8, 0.1, Invert, 3),
            SubPolicy::new(0.7, TranslateY, 9, 0.9, AutoContrast, 1),
        ];
        Self { sub_policies }
    }

    pub fn sub_policies(&self) -> &[SubPolicy] {
        &self.sub_policies
    }
}

impl Default for Cifar10Policy {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform<RgbImage> for Cifar10Policy {
    type Output = RgbImage;

    fn apply(&self, input: RgbImage) -> Result<RgbImage, UdaError> {
        let mut rng = rand::thread_rng();
        let idx = rng.gen_range(0..self.sub_policies.len());
        Ok(self.sub_policies[idx].apply(input, &mut rng))
    }
}

// Output pixel (x, y) samples input (x + f*y, y) (or (x, y + f*x) vertically);
// `warp` expects the forward map, i.e. the inverse of that.
fn shear(image: &RgbImage, factor: f32, horizontal: bool) -> RgbImage {
    let matrix = if horizontal {
        [1.0, -factor, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]
    } else {
        [1.0, 0.0, 0.0, -factor, 1.0, 0.0, 0.0, 0.0, 1.0]
    };
    match Projection::from_matrix(matrix) {
        Some(projection) => warp(image, &projection, Interpolation::Bicubic, FILL),
        None => image.clone(),
    }
}

fn translate(image: &RgbImage, dx: f32, dy: f32) -> RgbImage {
    warp(
        image,
        &Projection::translate(-dx, -dy),
        Interpolation::Nearest,
        FILL,
    )
}

fn luma(p: &Rgb<u8>) -> u8 {
    let [r, g, b] = p.0;
    ((u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114) / 1000) as u8
}

fn grayscale_rgb(image: &RgbImage) -> RgbImage {
    let mut out = image.clone();
    for p in out.pixels_mut() {
        let l = luma(p);
        *p = Rgb([l; 3]);
    }
    out
}

fn mean_luma(image: &RgbImage) -> u8 {
    let count = u64::from(image.width()) * u64::from(image.height());
    if count == 0 {
        return 0;
    }
    let total: u64 = image.pixels().map(|p| u64::from(luma(p))).sum();
    ((total as f64 / count as f64) + 0.5) as u8
}

// 3x3 smoothing kernel; border pixels keep their original value.
fn smooth(image: &RgbImage) -> RgbImage {
    const KERNEL: [f32; 9] = [1.0, 1.0, 1.0, 1.0, 5.0, 1.0, 1.0, 1.0, 1.0];
    let mut out: RgbImage = imageops::filter3x3(image, &KERNEL);
    let (width, height) = image.dimensions();
    for (x, y, p) in out.enumerate_pixels_mut() {
        if x == 0 || y == 0 || x + 1 == width || y + 1 == height {
            *p = *image.get_pixel(x, y);
        }
    }
    out
}

/// `degenerate + factor * (image - degenerate)`, clamped to `u8`.
fn blend(degenerate: &RgbImage, image: &RgbImage, factor: f32) -> RgbImage {
    let mut out = image.clone();
    for ((o, d), i) in out.pixels_mut().zip(degenerate.pixels()).zip(image.pixels()) {
        for c in 0..3 {
            let (dv, iv) = (f32::from(d[c]), f32::from(i[c]));
            o[c] = (dv + factor * (iv - dv)).round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}

fn posterize(mut image: RgbImage, bits: u32) -> RgbImage {
    let bits = bits.clamp(1, 8);
    let mask = !((1u16 << (8 - bits)) - 1) as u8;
    for p in image.pixels_mut() {
        for v in p.0.iter_mut() {
            *v &= mask;
        }
    }
    image
}

fn solarize(mut image: RgbImage, threshold: u32) -> RgbImage {
    for p in image.pixels_mut() {
        for v in p.0.iter_mut() {
            if u32::from(*v) >= threshold {
                *v = 255 - *v;
            }
        }
    }
    image
}

fn apply_luts(mut image: RgbImage, luts: &[[u8; 256]; 3]) -> RgbImage {
    for p in image.pixels_mut() {
        for (c, v) in p.0.iter_mut().enumerate() {
            *v = luts[c][*v as usize];
        }
    }
    image
}

fn histograms(image: &RgbImage) -> [[u32; 256]; 3] {
    let mut hist = [[0u32; 256]; 3];
    for p in image.pixels() {
        for c in 0..3 {
            hist[c][p[c] as usize] += 1;
        }
    }
    hist
}

fn identity_lut() -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (i, v) in lut.iter_mut().enumerate() {
        *v = i as u8;
    }
    lut
}

// Per channel, stretch [min, max] to [0, 255].
fn autocontrast(image: RgbImage) -> RgbImage {
    let hist = histograms(&image);
    let mut luts = [identity_lut(); 3];
    for c in 0..3 {
        let lo = hist[c].iter().position(|&n| n > 0);
        let hi = hist[c].iter().rposition(|&n| n > 0);
        if let (Some(lo), Some(hi)) = (lo, hi) {
            if hi > lo {
                let scale = 255.0 / (hi - lo) as f64;
                let offset = -(lo as f64) * scale;
                for (i, v) in luts[c].iter_mut().enumerate() {
                    // Truncated, not rounded.
                    *v = (i as f64 * scale + offset).clamp(0.0, 255.0) as u8;
                }
            }
        }
    }
    apply_luts(image, &luts)
}

// Per-channel histogram equalization.
fn equalize(image: RgbImage) -> RgbImage {
    let hist = histograms(&image);
    let mut luts = [identity_lut(); 3];
    for c in 0..3 {
        let used: Vec<u32> = hist[c].iter().copied().filter(|&n| n > 0).collect();
        if used.len() <= 1 {
            continue;
        }
        let total: u32 = used.iter().sum();
        let step = (total - used[used.len() - 1]) / 255;
        if step == 0 {
            continue;
        }
        let mut n = step / 2;
        for (i, v) in luts[c].iter_mut().enumerate() {
            *v = (n / step).min(255) as u8;
            n += hist[c][i];
        }
    }
    apply_luts(image, &luts)
}

#[cfg(test)]
#[path = "policy_test.rs"]
mod tests;
