//! Forward and inverse 8x8 DCT
//!
//! Both directions use the orthonormal DCT-II / DCT-III pair, applied
//! separably (rows, then columns). A block of constant value `v` therefore
//! transforms to a DC coefficient of `8 * v` and zero AC coefficients.

use std::sync::OnceLock;

use crate::consts::{DCTSIZE, DCTSIZE2, LEVEL_SHIFT};

/// Orthonormal DCT basis: `basis[k][n] = a(k) * cos((2n + 1) k pi / 16)`
fn dct_basis() -> &'static [[f32; DCTSIZE]; DCTSIZE] {
    static BASIS: OnceLock<[[f32; DCTSIZE]; DCTSIZE]> = OnceLock::new();
    BASIS.get_or_init(|| {
        let mut basis = [[0.0f32; DCTSIZE]; DCTSIZE];
        let n = DCTSIZE as f64;
        for (k, row) in basis.iter_mut().enumerate() {
            let scale = if k == 0 { (1.0 / n).sqrt() } else { (2.0 / n).sqrt() };
            for (i, value) in row.iter_mut().enumerate() {
                let angle = (2.0 * i as f64 + 1.0) * k as f64 * std::f64::consts::PI / (2.0 * n);
                *value = (scale * angle.cos()) as f32;
            }
        }
        basis
    })
}

/// Level-shift a block of samples for the DCT (subtract 128)
pub fn level_shift(samples: &[u8; DCTSIZE2]) -> [f32; DCTSIZE2] {
    let mut output = [0.0f32; DCTSIZE2];
    for i in 0..DCTSIZE2 {
        output[i] = samples[i] as f32 - LEVEL_SHIFT;
    }
    output
}

/// Undo the level shift and cast to u16.
///
/// The cast truncates toward zero and saturates: negative values become 0.
/// Values above 255 are kept.
pub fn level_unshift(samples: &[f32; DCTSIZE2]) -> [u16; DCTSIZE2] {
    let mut output = [0u16; DCTSIZE2];
    for i in 0..DCTSIZE2 {
        output[i] = (samples[i] + LEVEL_SHIFT) as u16;
    }
    output
}

/// Forward orthonormal 2-D DCT of one level-shifted 8x8 channel
pub fn forward_dct_8x8(block: &[f32; DCTSIZE2]) -> [f32; DCTSIZE2] {
    let basis = dct_basis();

    // rows: tmp[y][u] = sum_x block[y][x] * basis[u][x]
    let mut tmp = [0.0f32; DCTSIZE2];
    for y in 0..DCTSIZE {
        for u in 0..DCTSIZE {
            let mut sum = 0.0f32;
            for x in 0..DCTSIZE {
                sum += block[y * DCTSIZE + x] * basis[u][x];
            }
            tmp[y * DCTSIZE + u] = sum;
        }
    }

    // columns: out[v][u] = sum_y tmp[y][u] * basis[v][y]
    let mut output = [0.0f32; DCTSIZE2];
    for v in 0..DCTSIZE {
        for u in 0..DCTSIZE {
            let mut sum = 0.0f32;
            for y in 0..DCTSIZE {
                sum += tmp[y * DCTSIZE + u] * basis[v][y];
            }
            output[v * DCTSIZE + u] = sum;
        }
    }

    output
}

/// Inverse orthonormal 2-D DCT of one 8x8 coefficient channel
pub fn inverse_dct_8x8(coeffs: &[f32; DCTSIZE2]) -> [f32; DCTSIZE2] {
    let basis = dct_basis();

    // columns: tmp[y][u] = sum_v coeffs[v][u] * basis[v][y]
    let mut tmp = [0.0f32; DCTSIZE2];
    for y in 0..DCTSIZE {
        for u in 0..DCTSIZE {
            let mut sum = 0.0f32;
            for v in 0..DCTSIZE {
                sum += coeffs[v * DCTSIZE + u] * basis[v][y];
            }
            tmp[y * DCTSIZE + u] = sum;
        }
    }

    // rows: out[y][x] = sum_u tmp[y][u] * basis[u][x]
    let mut output = [0.0f32; DCTSIZE2];
    for y in 0..DCTSIZE {
        for x in 0..DCTSIZE {
            let mut sum = 0.0f32;
            for u in 0..DCTSIZE {
                sum += tmp[y * DCTSIZE + u] * basis[u][x];
            }
            output[y * DCTSIZE + x] = sum;
        }
    }

    output
}
