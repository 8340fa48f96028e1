//! Color space conversion between RGB and Y/Cr/Cb
//!
//! The forward direction works on 8-bit input. The inverse direction works on
//! 16-bit samples because reconstructed blocks are not clamped to 255.

use imgref::{ImgRef, ImgVec};
use rgb::{RGB16, RGB8};

/// Convert one RGB pixel to (Y, Cr, Cb)
///
/// The conversion formula is:
/// - Y  = 0.299 * R + 0.587 * G + 0.114 * B
/// - Cr = (R - Y) * 0.713 + 128
/// - Cb = (B - Y) * 0.564 + 128
#[inline]
pub fn rgb_to_ycrcb(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let r = r as f32;
    let g = g as f32;
    let b = b as f32;

    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let cr = (r - y) * 0.713 + 128.0;
    let cb = (b - y) * 0.564 + 128.0;

    (
        y.round().clamp(0.0, 255.0) as u8,
        cr.round().clamp(0.0, 255.0) as u8,
        cb.round().clamp(0.0, 255.0) as u8,
    )
}

/// Convert one (Y, Cr, Cb) sample triple back to RGB.
///
/// Results saturate to the u16 range, not to 255.
#[inline]
pub fn ycrcb_to_rgb(y: u16, cr: u16, cb: u16) -> (u16, u16, u16) {
    let y = y as f32;
    let cr = cr as f32 - 128.0;
    let cb = cb as f32 - 128.0;

    let r = y + 1.403 * cr;
    let g = y - 0.714 * cr - 0.344 * cb;
    let b = y + 1.773 * cb;

    // float -> int `as` casts saturate, negative values land on 0
    (r.round() as u16, g.round() as u16, b.round() as u16)
}

/// Convert an RGB image to Y/Cr/Cb, stored in the r/g/b slots of `RGB8`
pub fn convert_rgb_to_ycrcb(image: ImgRef<'_, RGB8>) -> ImgVec<RGB8> {
    let mut out = Vec::with_capacity(image.width() * image.height());
    for row in image.rows() {
        for px in row {
            let (y, cr, cb) = rgb_to_ycrcb(px.r, px.g, px.b);
            out.push(RGB8::new(y, cr, cb));
        }
    }
    ImgVec::new(out, image.width(), image.height())
}

/// Convert a Y/Cr/Cb image (stored in r/g/b slots) back to RGB
pub fn convert_ycrcb_to_rgb(image: ImgRef<'_, RGB16>) -> ImgVec<RGB16> {
    let mut out = Vec::with_capacity(image.width() * image.height());
    for row in image.rows() {
        for px in row {
            let (r, g, b) = ycrcb_to_rgb(px.r, px.g, px.b);
            out.push(RGB16::new(r, g, b));
        }
    }
    ImgVec::new(out, image.width(), image.height())
}
