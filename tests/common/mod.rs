#![allow(dead_code)]

use std::fs;
use std::path::Path;

use image::{GrayImage, ImageFormat, Luma, Rgb, RgbImage};

/// A deterministic, high-variance RGB pattern.
pub fn textured_rgb(width: u32, height: u32, seed: u8) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let base = x.wrapping_mul(7).wrapping_add(y.wrapping_mul(13)) as u8;
        Rgb([
            base.wrapping_add(seed),
            base.wrapping_mul(3),
            (x ^ y) as u8,
        ])
    })
}

pub fn flat_rgb(width: u32, height: u32, value: u8) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb([value, value, value]))
}

pub fn textured_gray(width: u32, height: u32) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| Luma([(x * 5 + y * 3) as u8]))
}

/// Writes PNG-encoded content under any file name; decoding sniffs the bytes.
pub fn write_rgb(path: &Path, image: &RgbImage) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    image
        .save_with_format(path, ImageFormat::Png)
        .expect("write png content");
}

/// Writes `image` encoded as `format`, whatever the file name says.
pub fn write_rgb_as(path: &Path, image: &RgbImage, format: ImageFormat) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    image
        .save_with_format(path, format)
        .expect("write encoded image");
}

/// Writes a textured CMYK JPEG.
pub fn write_cmyk_jpeg(path: &Path, width: u16, height: u16) {
    let data: Vec<u8> = (0..width as usize * height as usize * 4)
        .map(|i| (i * 37 % 256) as u8)
        .collect();
    let mut bytes = Vec::new();
    jpeg_encoder::Encoder::new(&mut bytes, 90)
        .encode(&data, width, height, jpeg_encoder::ColorType::Cmyk)
        .expect("encode cmyk jpeg");
    write_bytes(path, &bytes);
}

pub fn write_gray(path: &Path, image: &GrayImage) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    image
        .save_with_format(path, ImageFormat::Png)
        .expect("write png content");
}

pub fn write_bytes(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, bytes).expect("write file");
}

pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .expect("read text file")
        .lines()
        .map(str::to_string)
        .collect()
}

/// Input tree exercising every rejection code once plus two accepted files.
///
/// Sorted order: a_wrong.png, b_big.jpg, c_broken.jpg, d_small.jpg,
/// e_flat.jpg, f_cat01.jpg, g_cat02.jpg (duplicate of f), h_dog7.JPG.
pub fn mixed_input(root: &Path) {
    write_rgb(&root.join("a_wrong.png"), &textured_rgb(150, 150, 1));
    write_bytes(&root.join("b_big.jpg"), &vec![0u8; 260_000]);
    write_bytes(&root.join("c_broken.jpg"), b"definitely not an image");
    write_rgb(&root.join("d_small.jpg"), &textured_rgb(50, 150, 2));
    write_rgb(&root.join("e_flat.jpg"), &flat_rgb(150, 150, 128));
    write_rgb(&root.join("f_cat01.jpg"), &textured_rgb(150, 120, 3));
    write_rgb(&root.join("g_cat02.jpg"), &textured_rgb(150, 120, 3));
    write_rgb(&root.join("nested/h_dog7.JPG"), &textured_rgb(120, 160, 4));
}
