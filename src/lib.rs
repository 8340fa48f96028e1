//! # zenblock - Block-Transform Image Codec
//!
//! zenblock implements the classic lossy still-image pipeline stage by stage,
//! without any entropy coder or file format:
//!
//! 1. RGB to Y/Cr/Cb conversion
//! 2. Crop to whole 8x8 blocks (trailing rows and columns are dropped)
//! 3. Tiling into 8x8x3 blocks, row-major block order
//! 4. Level shift by -128 and orthonormal 2-D DCT per channel
//! 5. Quantization against the standard luma/chroma tables
//! 6. Flattening into a 64-value scan
//! 7. Run-length coding into `(count, value)` pairs
//!
//! Decompression runs every stage in reverse.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use zenblock::BlockTransformCodec;
//!
//! let codec = BlockTransformCodec::new(70.0)?;
//! let (compressed, session) = codec.compress(image.as_ref())?;
//! let restored = codec.decompress(&compressed, &session)?;
//! ```
//!
//! ## Quality
//!
//! `quality` is a scale factor applied after dividing by the quantization
//! table, not a 0-100 JPEG quality. With the default
//! [`Dequantization::Legacy`] mode the table is not multiplied back in on
//! decompress, so reconstructions drift toward mid-gray;
//! [`Dequantization::TableScaled`] is the exact inverse.
//!
//! Reconstructed samples are 16-bit and are not clamped to 255. Samples that
//! come out of the inverse transform below zero saturate to 0 rather than
//! wrapping around the u16 range.

// Core modules
pub mod analysis;
pub mod consts;
mod error;
mod types;

// Pipeline stages
pub mod block;
pub mod color;
pub mod dct;
pub mod quant;
pub mod rle;
pub mod scan;

// Codec
mod codec;

// Public API
pub use codec::{BlockTransformCodec, BlockTransformSession, CompressedBlock, CompressedImage};
pub use error::Error;
pub use rle::{Run, RunError};
pub use types::{BlockPlanes, Component, Dequantization, ScanOrder};

/// Result type for zenblock operations
pub type Result<T> = std::result::Result<T, Error>;
