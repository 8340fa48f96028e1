//! Constants and tables for the block-transform codec
//!
//! Block geometry, the level shift applied before the transform, and the
//! standard perceptual quantization tables.

/// DCT block dimension
pub const DCTSIZE: usize = 8;

/// DCT block size (8x8 = 64)
pub const DCTSIZE2: usize = 64;

/// Number of color components carried per block (Y, Cr, Cb)
pub const BLOCK_CHANNELS: usize = 3;

/// Offset subtracted from every sample before the forward transform
/// and added back after the inverse transform.
pub const LEVEL_SHIFT: f32 = 128.0;

/// Default quantization scale
pub const DEFAULT_QUALITY: f32 = 70.0;

/// Zigzag scan order: maps zigzag position to natural (row-major) position.
/// Example: natural_pos = JPEG_NATURAL_ORDER[zigzag_pos]
pub const JPEG_NATURAL_ORDER: [usize; 64] = [
    0, 1, 8, 16, 9, 2, 3, 10, 17, 24, 32, 25, 18, 11, 4, 5, 12, 19, 26, 33, 40, 48, 41, 34, 27, 20,
    13, 6, 7, 14, 21, 28, 35, 42, 49, 56, 57, 50, 43, 36, 29, 22, 15, 23, 30, 37, 44, 51, 58, 59,
    52, 45, 38, 31, 39, 46, 53, 60, 61, 54, 47, 55, 62, 63,
];

/// Standard JPEG Annex K luminance quantization table
#[rustfmt::skip]
pub const STD_LUMA_QUANT: [u16; 64] = [
    16, 11, 10, 16,  24,  40,  51,  61,
    12, 12, 14, 19,  26,  58,  60,  55,
    14, 13, 16, 24,  40,  57,  69,  56,
    14, 17, 22, 29,  51,  87,  80,  62,
    18, 22, 37, 56,  68, 109, 103,  77,
    24, 35, 55, 64,  81, 104, 113,  92,
    49, 64, 78, 87, 103, 121, 120, 101,
    72, 92, 95, 98, 112, 100, 103,  99,
];

/// Standard JPEG Annex K chrominance quantization table
#[rustfmt::skip]
pub const STD_CHROMA_QUANT: [u16; 64] = [
    17, 18, 24, 47, 99, 99, 99, 99,
    18, 21, 26, 66, 99, 99, 99, 99,
    24, 26, 56, 99, 99, 99, 99, 99,
    47, 66, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
];
