//! Block-transform codec
//!
//! [`BlockTransformCodec::compress`] runs the full forward pipeline:
//! color conversion, crop to whole blocks, tiling, level shift, DCT,
//! quantization, scan and run-length coding. It returns the compressed
//! blocks together with a [`BlockTransformSession`] describing the cropped
//! raster. [`BlockTransformCodec::decompress`] requires that session and
//! undoes every stage in reverse order.
//!
//! Per-block work is independent. With the `rayon` feature enabled blocks
//! are processed in parallel; output order always matches the sequential
//! row-major block order.

use imgref::{ImgRef, ImgVec};
use rgb::{RGB16, RGB8};

use crate::block::{aligned_dimensions, assemble_blocks, extract_blocks};
use crate::color::{convert_rgb_to_ycrcb, convert_ycrcb_to_rgb};
use crate::consts::{BLOCK_CHANNELS, DCTSIZE, DCTSIZE2, DEFAULT_QUALITY};
use crate::dct::{forward_dct_8x8, inverse_dct_8x8, level_shift, level_unshift};
use crate::error::Error;
use crate::quant::{dequantize_block, quantize_block, QuantTableSet};
use crate::rle::{decode_runs, encode_runs, Run};
use crate::scan::{flatten, unflatten};
use crate::types::{BlockPlanes, Component, Dequantization, ScanOrder};
use crate::Result;

/// Run-length coded form of one 8x8x3 block: one run sequence per channel
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompressedBlock {
    /// Runs for Y, Cr and Cb, in that order
    pub channels: [Vec<Run>; BLOCK_CHANNELS],
}

impl CompressedBlock {
    /// Total number of runs across all channels
    #[must_use]
    pub fn run_count(&self) -> usize {
        self.channels.iter().map(Vec::len).sum()
    }
}

/// Compressed image: one [`CompressedBlock`] per block, row-major block order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompressedImage {
    blocks: Vec<CompressedBlock>,
}

impl CompressedImage {
    pub fn new(blocks: Vec<CompressedBlock>) -> Self {
        Self { blocks }
    }

    pub fn blocks(&self) -> &[CompressedBlock] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<CompressedBlock> {
        self.blocks
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Build from the loose nested form: block, channel, entry, and each
    /// entry either `[count, value]` or a bare `[value]`.
    ///
    /// Every block must carry exactly three channels. Run totals are checked
    /// when the image is decompressed.
    pub fn from_nested(nested: &[Vec<Vec<Vec<i64>>>]) -> Result<Self> {
        let mut blocks = Vec::with_capacity(nested.len());
        for (block_index, channels) in nested.iter().enumerate() {
            if channels.len() != BLOCK_CHANNELS {
                return Err(Error::malformed(
                    block_index,
                    channels.len().min(BLOCK_CHANNELS),
                    format!("block has {} channels, expected {}", channels.len(), BLOCK_CHANNELS),
                ));
            }
            let mut block = CompressedBlock::default();
            for (channel, entries) in channels.iter().enumerate() {
                block.channels[channel] = entries
                    .iter()
                    .map(|entry| Run::try_from(entry.as_slice()))
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(|e| Error::malformed(block_index, channel, e.to_string()))?;
            }
            blocks.push(block);
        }
        Ok(Self { blocks })
    }

    /// Loose nested form with every entry written as `[count, value]`
    pub fn to_nested(&self) -> Vec<Vec<Vec<Vec<i64>>>> {
        self.blocks
            .iter()
            .map(|block| {
                block
                    .channels
                    .iter()
                    .map(|runs| {
                        runs.iter()
                            .map(|run| vec![run.count as i64, run.value as i64])
                            .collect()
                    })
                    .collect()
            })
            .collect()
    }
}

/// Geometry and settings produced by a compress call.
///
/// Decompression needs the cropped dimensions to place blocks; the session
/// carries them from [`BlockTransformCodec::compress`] to
/// [`BlockTransformCodec::decompress`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockTransformSession {
    width: usize,
    height: usize,
    source_width: usize,
    source_height: usize,
    quality: f32,
    scan_order: ScanOrder,
    dequantization: Dequantization,
}

impl BlockTransformSession {
    /// Cropped width (multiple of 8)
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Cropped height (multiple of 8)
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Width of the image before cropping
    #[inline]
    pub fn source_width(&self) -> usize {
        self.source_width
    }

    /// Height of the image before cropping
    #[inline]
    pub fn source_height(&self) -> usize {
        self.source_height
    }

    #[inline]
    pub fn quality(&self) -> f32 {
        self.quality
    }

    #[inline]
    pub fn scan_order(&self) -> ScanOrder {
        self.scan_order
    }

    #[inline]
    pub fn dequantization(&self) -> Dequantization {
        self.dequantization
    }

    #[inline]
    pub fn blocks_wide(&self) -> usize {
        self.width / DCTSIZE
    }

    #[inline]
    pub fn blocks_high(&self) -> usize {
        self.height / DCTSIZE
    }

    /// Number of blocks the compressed data must contain
    #[inline]
    pub fn block_count(&self) -> usize {
        self.blocks_wide() * self.blocks_high()
    }
}

/// Block-transform codec with a fixed quantization scale
#[derive(Clone, Debug)]
pub struct BlockTransformCodec {
    quality: f32,
    scan_order: ScanOrder,
    dequantization: Dequantization,
    tables: QuantTableSet,
}

impl Default for BlockTransformCodec {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            scan_order: ScanOrder::default(),
            dequantization: Dequantization::default(),
            tables: QuantTableSet::for_block(DCTSIZE, DCTSIZE),
        }
    }
}

impl BlockTransformCodec {
    /// Create a codec with the given quantization scale.
    ///
    /// `quality` multiplies the quantized values; it is not a 0-100 JPEG
    /// quality. It must be finite and greater than zero.
    pub fn new(quality: f32) -> Result<Self> {
        if !quality.is_finite() || quality <= 0.0 {
            return Err(Error::InvalidQuality { value: quality });
        }
        Ok(Self {
            quality,
            ..Self::default()
        })
    }

    /// Set the scan order used to flatten quantized blocks
    pub fn scan_order(mut self, order: ScanOrder) -> Self {
        self.scan_order = order;
        self
    }

    /// Set how quantized values are mapped back on decompress
    pub fn dequantization(mut self, mode: Dequantization) -> Self {
        self.dequantization = mode;
        self
    }

    /// Quantization scale
    #[inline]
    pub fn quality(&self) -> f32 {
        self.quality
    }

    /// Session describing how this codec would lay out a `width` x `height`
    /// image. Useful when compressed data arrives without its session.
    pub fn session(&self, width: usize, height: usize) -> Result<BlockTransformSession> {
        if width < DCTSIZE || height < DCTSIZE {
            return Err(Error::InvalidDimensions {
                width,
                height,
                reason: "image must be at least one 8x8 block",
            });
        }
        let (cropped_width, cropped_height) = aligned_dimensions(width, height);
        Ok(BlockTransformSession {
            width: cropped_width,
            height: cropped_height,
            source_width: width,
            source_height: height,
            quality: self.quality,
            scan_order: self.scan_order,
            dequantization: self.dequantization,
        })
    }

    /// Compress an RGB image.
    ///
    /// Rows and columns beyond the last whole 8x8 block are discarded.
    /// Images smaller than 8x8 are rejected with
    /// [`Error::InvalidDimensions`].
    pub fn compress(
        &self,
        image: ImgRef<'_, RGB8>,
    ) -> Result<(CompressedImage, BlockTransformSession)> {
        let session = self.session(image.width(), image.height())?;
        if session.width != session.source_width || session.height != session.source_height {
            log::warn!(
                "zenblock: cropping {}x{} to {}x{}",
                session.source_width,
                session.source_height,
                session.width,
                session.height
            );
        }

        let ycrcb = convert_rgb_to_ycrcb(image);
        let blocks = extract_blocks(ycrcb.as_ref(), session.width, session.height);
        log::trace!("zenblock: tiled {} blocks", blocks.len());

        let compressed = map_blocks(&blocks, |_, planes| Ok(self.compress_block(planes)))?;
        let compressed = CompressedImage::new(compressed);

        log::debug!(
            "zenblock: compressed {}x{} into {} blocks, {} runs (quality {})",
            session.width,
            session.height,
            compressed.len(),
            compressed.blocks().iter().map(CompressedBlock::run_count).sum::<usize>(),
            self.quality
        );

        Ok((compressed, session))
    }

    /// Compress interleaved 8-bit RGB bytes
    pub fn compress_rgb(
        &self,
        pixels: &[u8],
        width: usize,
        height: usize,
    ) -> Result<(CompressedImage, BlockTransformSession)> {
        let expected = width * height * 3;
        if pixels.len() != expected {
            return Err(Error::InvalidPixelData {
                expected,
                actual: pixels.len(),
            });
        }
        let rgb: Vec<RGB8> = pixels
            .chunks_exact(3)
            .map(|c| RGB8::new(c[0], c[1], c[2]))
            .collect();
        self.compress(ImgRef::new(&rgb[..], width, height))
    }

    /// Reconstruct an RGB image from compressed blocks.
    ///
    /// The session must come from a compress call with the same settings
    /// (or from [`Self::session`]) and describe exactly as many blocks as
    /// `data` holds. Any malformed block fails the whole call.
    ///
    /// Samples are not clamped to 255.
    pub fn decompress(
        &self,
        data: &CompressedImage,
        session: &BlockTransformSession,
    ) -> Result<ImgVec<RGB16>> {
        self.check_session(data, session)?;

        let blocks = map_blocks(data.blocks(), |index, block| self.decompress_block(index, block))?;
        let ycrcb = assemble_blocks(&blocks, session.width, session.height);
        let rgb = convert_ycrcb_to_rgb(ycrcb.as_ref());

        log::debug!(
            "zenblock: decompressed {} blocks into {}x{}",
            blocks.len(),
            rgb.width(),
            rgb.height()
        );

        Ok(rgb)
    }

    fn check_session(&self, data: &CompressedImage, session: &BlockTransformSession) -> Result<()> {
        if session.quality != self.quality {
            return Err(Error::SessionMismatch {
                reason: format!(
                    "session quality {} differs from codec quality {}",
                    session.quality, self.quality
                ),
            });
        }
        if session.scan_order != self.scan_order {
            return Err(Error::SessionMismatch {
                reason: format!(
                    "session scan order {:?} differs from codec scan order {:?}",
                    session.scan_order, self.scan_order
                ),
            });
        }
        if session.dequantization != self.dequantization {
            return Err(Error::SessionMismatch {
                reason: format!(
                    "session dequantization {:?} differs from codec dequantization {:?}",
                    session.dequantization, self.dequantization
                ),
            });
        }
        if session.block_count() != data.len() {
            return Err(Error::SessionMismatch {
                reason: format!(
                    "session expects {} blocks for {}x{}, data holds {}",
                    session.block_count(),
                    session.width,
                    session.height,
                    data.len()
                ),
            });
        }
        Ok(())
    }

    fn compress_block(&self, planes: &BlockPlanes<u8>) -> CompressedBlock {
        let channels = std::array::from_fn(|c| {
            let table = self.tables.get(Component::from_index(c));
            let coeffs = forward_dct_8x8(&level_shift(&planes[c]));
            let quantized = quantize_block(&coeffs, table, self.quality);
            encode_runs(&flatten(&quantized, self.scan_order))
        });
        CompressedBlock { channels }
    }

    fn decompress_block(&self, index: usize, block: &CompressedBlock) -> Result<BlockPlanes<u16>> {
        let mut planes = [[0u16; DCTSIZE2]; BLOCK_CHANNELS];
        for (c, runs) in block.channels.iter().enumerate() {
            let scan = decode_runs(runs).map_err(|e| Error::malformed(index, c, e.to_string()))?;
            let quantized = unflatten(&scan, self.scan_order);
            let table = self.tables.get(Component::from_index(c));
            let coeffs = dequantize_block(&quantized, table, self.quality, self.dequantization);
            planes[c] = level_unshift(&inverse_dct_8x8(&coeffs));
        }
        Ok(planes)
    }
}

/// Apply `f` to every block, keeping block order. Stops at the first error.
#[cfg(feature = "rayon")]
fn map_blocks<T, U, F>(items: &[T], f: F) -> Result<Vec<U>>
where
    T: Sync,
    U: Send,
    F: Fn(usize, &T) -> Result<U> + Sync + Send,
{
    use rayon::prelude::*;
    items.par_iter().enumerate().map(|(i, item)| f(i, item)).collect()
}

/// Apply `f` to every block, keeping block order. Stops at the first error.
#[cfg(not(feature = "rayon"))]
fn map_blocks<T, U, F>(items: &[T], f: F) -> Result<Vec<U>>
where
    F: Fn(usize, &T) -> Result<U>,
{
    items.iter().enumerate().map(|(i, item)| f(i, item)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(width: usize, height: usize, color: RGB8) -> ImgVec<RGB8> {
        ImgVec::new(vec![color; width * height], width, height)
    }

    #[test]
    fn test_new_rejects_bad_quality() {
        assert!(matches!(
            BlockTransformCodec::new(0.0),
            Err(Error::InvalidQuality { .. })
        ));
        assert!(BlockTransformCodec::new(-3.0).is_err());
        assert!(BlockTransformCodec::new(f32::NAN).is_err());
        assert!(BlockTransformCodec::new(0.5).is_ok());
    }

    #[test]
    fn test_default_quality() {
        assert_eq!(BlockTransformCodec::default().quality(), DEFAULT_QUALITY);
    }

    #[test]
    fn test_session_geometry() {
        let codec = BlockTransformCodec::default();
        let session = codec.session(21, 17).unwrap();
        assert_eq!((session.width(), session.height()), (16, 16));
        assert_eq!((session.source_width(), session.source_height()), (21, 17));
        assert_eq!(session.block_count(), 4);
    }

    #[test]
    fn test_mid_gray_is_exact() {
        let codec = BlockTransformCodec::default();
        let img = uniform(16, 16, RGB8::new(128, 128, 128));
        let (data, session) = codec.compress(img.as_ref()).unwrap();
        for block in data.blocks() {
            for runs in &block.channels {
                assert_eq!(runs, &vec![Run::new(64, 0)]);
            }
        }
        let out = codec.decompress(&data, &session).unwrap();
        assert!(out.buf().iter().all(|&px| px == RGB16::new(128, 128, 128)));
    }

    #[test]
    fn test_dc_value_for_flat_block() {
        // Y = 141 -> shift 13 -> DC 104 -> 104 / 16 * 70 = 455
        let codec = BlockTransformCodec::default();
        let img = uniform(8, 8, RGB8::new(100, 150, 200));
        let (data, _) = codec.compress(img.as_ref()).unwrap();
        let luma = &data.blocks()[0].channels[0];
        assert_eq!(luma[0], Run::new(1, 455));
        assert_eq!(luma[1], Run::new(63, 0));
    }

    #[test]
    fn test_session_mismatch_rejected() {
        let codec = BlockTransformCodec::default();
        let img = uniform(16, 8, RGB8::new(10, 20, 30));
        let (data, session) = codec.compress(img.as_ref()).unwrap();

        let other = BlockTransformCodec::new(35.0).unwrap();
        assert!(other.decompress(&data, &session).unwrap_err().is_precondition_error());

        let zigzag = BlockTransformCodec::default().scan_order(ScanOrder::Zigzag);
        assert!(zigzag.decompress(&data, &session).unwrap_err().is_precondition_error());

        let small = codec.session(8, 8).unwrap();
        assert!(codec.decompress(&data, &small).unwrap_err().is_precondition_error());
    }

    #[test]
    fn test_nested_form_roundtrip() {
        let codec = BlockTransformCodec::default();
        let img = uniform(8, 16, RGB8::new(200, 30, 90));
        let (data, _) = codec.compress(img.as_ref()).unwrap();
        let nested = data.to_nested();
        assert_eq!(nested.len(), 2);
        assert_eq!(CompressedImage::from_nested(&nested).unwrap(), data);
    }

    #[test]
    fn test_from_nested_requires_three_channels() {
        let nested = vec![vec![vec![vec![64, 0]], vec![vec![64, 0]]]];
        let err = CompressedImage::from_nested(&nested).unwrap_err();
        assert!(err.is_format_error());
    }
}
