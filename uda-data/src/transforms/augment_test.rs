use super::*;
use image::Rgb;

fn solid_image(size: u32, value: u8) -> RgbImage {
    RgbImage::from_pixel(size, size, Rgb([value, value, value]))
}

#[test]
fn test_random_crop_keeps_size() {
    let crop = RandomCrop::new(32, 4);
    let out = crop.apply(solid_image(32, 200)).unwrap();
    assert_eq!(out.dimensions(), (32, 32));
}

#[test]
fn test_random_crop_pixels_come_from_image_or_padding() {
    let crop = RandomCrop::new(8, 2);
    for _ in 0..20 {
        let out = crop.apply(solid_image(8, 200)).unwrap();
        assert!(out.pixels().all(|p| p.0 == [200; 3] || p.0 == [0; 3]));
        // The centre pixel is always inside the original image.
        assert_eq!(out.get_pixel(4, 4).0, [200; 3]);
    }
}

#[test]
fn test_random_crop_without_padding_is_identity_at_full_size() {
    let image = RgbImage::from_fn(4, 4, |x, y| Rgb([x as u8, y as u8, 0]));
    let out = RandomCrop::new(4, 0).apply(image.clone()).unwrap();
    assert_eq!(out, image);
}

#[test]
fn test_random_crop_too_large() {
    let crop = RandomCrop::new(40, 2);
    assert!(matches!(
        crop.apply(solid_image(32, 0)),
        Err(UdaError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_random_horizontal_flip_always() {
    let image = RgbImage::from_fn(3, 1, |x, _| Rgb([x as u8, 0, 0]));
    let out = RandomHorizontalFlip::new(1.0).apply(image).unwrap();
    assert_eq!(out.get_pixel(0, 0).0, [2, 0, 0]);
    assert_eq!(out.get_pixel(2, 0).0, [0, 0, 0]);
}

#[test]
fn test_random_horizontal_flip_never() {
    let image = RgbImage::from_fn(3, 1, |x, _| Rgb([x as u8, 0, 0]));
    let out = RandomHorizontalFlip::new(0.0).apply(image.clone()).unwrap();
    assert_eq!(out, image);
}
