//! Reconstruction quality and compactness measurements
//!
//! Compares an 8-bit source against a 16-bit reconstruction over the
//! reconstructed area (the source may be larger when it was cropped).

use imgref::ImgRef;
use rgb::{RGB16, RGB8};

use crate::codec::{CompressedBlock, CompressedImage};
use crate::consts::{BLOCK_CHANNELS, DCTSIZE2};

/// Sum and count of per-sample errors over the shared region
fn sample_errors(
    original: ImgRef<'_, RGB8>,
    reconstructed: ImgRef<'_, RGB16>,
    mut f: impl FnMut(f64),
) -> usize {
    let width = original.width().min(reconstructed.width());
    let height = original.height().min(reconstructed.height());

    for (src_row, out_row) in original.rows().zip(reconstructed.rows()).take(height) {
        for (a, b) in src_row[..width].iter().zip(&out_row[..width]) {
            f(a.r as f64 - b.r as f64);
            f(a.g as f64 - b.g as f64);
            f(a.b as f64 - b.b as f64);
        }
    }

    width * height * 3
}

/// Mean absolute per-channel difference
pub fn mean_absolute_error(original: ImgRef<'_, RGB8>, reconstructed: ImgRef<'_, RGB16>) -> f64 {
    let mut total = 0.0;
    let samples = sample_errors(original, reconstructed, |d| total += d.abs());
    if samples == 0 {
        return 0.0;
    }
    total / samples as f64
}

/// Largest absolute per-channel difference
pub fn max_absolute_error(original: ImgRef<'_, RGB8>, reconstructed: ImgRef<'_, RGB16>) -> f64 {
    let mut max = 0.0f64;
    sample_errors(original, reconstructed, |d| max = max.max(d.abs()));
    max
}

/// Peak signal-to-noise ratio in dB against a peak of 255.
///
/// Identical images give `f64::INFINITY`.
pub fn psnr(original: ImgRef<'_, RGB8>, reconstructed: ImgRef<'_, RGB16>) -> f64 {
    let mut total = 0.0;
    let samples = sample_errors(original, reconstructed, |d| total += d * d);
    if samples == 0 || total == 0.0 {
        return f64::INFINITY;
    }
    let mse = total / samples as f64;
    10.0 * (255.0 * 255.0 / mse).log10()
}

/// Size summary of a compressed image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionStats {
    /// Number of 8x8x3 blocks
    pub blocks: usize,
    /// Total `(count, value)` runs over all blocks and channels
    pub runs: usize,
    /// Quantized coefficients represented (64 per channel per block)
    pub coefficients: usize,
}

impl CompressionStats {
    pub fn from_compressed(data: &CompressedImage) -> Self {
        let blocks = data.len();
        Self {
            blocks,
            runs: data.blocks().iter().map(CompressedBlock::run_count).sum(),
            coefficients: blocks * BLOCK_CHANNELS * DCTSIZE2,
        }
    }

    /// Average runs per block (3 is the minimum, 192 the maximum)
    #[must_use]
    pub fn runs_per_block(&self) -> f64 {
        if self.blocks == 0 {
            return 0.0;
        }
        self.runs as f64 / self.blocks as f64
    }

    /// Coefficients per run; higher is more compact
    #[must_use]
    pub fn ratio(&self) -> f64 {
        if self.runs == 0 {
            return 0.0;
        }
        self.coefficients as f64 / self.runs as f64
    }
}
