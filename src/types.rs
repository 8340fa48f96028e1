//! Core types for zenblock

use crate::consts::{BLOCK_CHANNELS, DCTSIZE2};

/// One 8x8 block, stored as three planes of 64 samples in natural
/// (row-major) order. Plane 0 is Y, plane 1 is Cr, plane 2 is Cb.
pub type BlockPlanes<T> = [[T; DCTSIZE2]; BLOCK_CHANNELS];

/// Color component of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    /// Luma
    Y,
    /// Red-difference chroma
    Cr,
    /// Blue-difference chroma
    Cb,
}

impl Component {
    /// All components in plane order
    pub const ALL: [Component; BLOCK_CHANNELS] = [Component::Y, Component::Cr, Component::Cb];

    /// Component for a plane index (0 = Y, 1 = Cr, anything else = Cb)
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        match index {
            0 => Component::Y,
            1 => Component::Cr,
            _ => Component::Cb,
        }
    }

    /// Plane index of this component
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Component::Y => 0,
            Component::Cr => 1,
            Component::Cb => 2,
        }
    }

    /// Whether this component uses the luminance quantization table
    #[must_use]
    pub const fn is_luma(self) -> bool {
        matches!(self, Component::Y)
    }
}

/// Order in which a quantized 8x8 block is flattened into 64 values
/// before run-length coding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScanOrder {
    /// Plain row-major scan: outer loop over rows, inner over columns
    #[default]
    RowMajor,
    /// Diagonal JPEG zigzag scan, which groups the zeroed high
    /// frequencies into longer runs
    Zigzag,
}

/// How quantized coefficients are mapped back to transform coefficients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Dequantization {
    /// `round(value / quality)`. The quantization table is not multiplied
    /// back in, so reconstructed blocks lose contrast toward mid-gray.
    #[default]
    Legacy,
    /// `value * table / quality`, the exact inverse of the forward scaling
    TableScaled,
}
