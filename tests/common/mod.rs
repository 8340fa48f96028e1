//! Synthetic test images shared by the integration tests.

#![allow(dead_code)]

use imgref::ImgVec;
use rgb::{RGB16, RGB8};

/// Create a simple gradient test image
pub fn gradient_image(width: usize, height: usize) -> ImgVec<RGB8> {
    let mut pixels = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let r = (x * 255 / width) as u8;
            let g = (y * 255 / height) as u8;
            let b = ((x + y) * 255 / (width + height)) as u8;
            pixels.push(RGB8::new(r, g, b));
        }
    }
    ImgVec::new(pixels, width, height)
}

/// Create a uniform color test image
pub fn uniform_image(width: usize, height: usize, color: RGB8) -> ImgVec<RGB8> {
    ImgVec::new(vec![color; width * height], width, height)
}

/// Largest per-channel distance between a reconstruction and one color
pub fn max_distance_from(image: &ImgVec<RGB16>, color: RGB8) -> i32 {
    image
        .buf()
        .iter()
        .map(|px| {
            let dr = (px.r as i32 - color.r as i32).abs();
            let dg = (px.g as i32 - color.g as i32).abs();
            let db = (px.b as i32 - color.b as i32).abs();
            dr.max(dg).max(db)
        })
        .max()
        .unwrap_or(0)
}

/// Deterministic pseudo-random values (LCG), so tests need no RNG crate
pub fn pseudo_random(seed: u64, count: usize) -> Vec<u64> {
    let mut state = seed;
    (0..count)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            state >> 33
        })
        .collect()
}
