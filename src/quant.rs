//! Quantization table handling
//!
//! Quantization divides each coefficient by its table entry and then
//! *multiplies* by `quality`, so a larger quality value keeps more precision
//! in the stored integers. Dequantization comes in two flavors, see
//! [`Dequantization`].

use crate::consts::{BLOCK_CHANNELS, DCTSIZE, DCTSIZE2, STD_CHROMA_QUANT, STD_LUMA_QUANT};
use crate::types::{Component, Dequantization};

/// Quantization table for a single component
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuantTable {
    /// Quantization values in natural order
    pub values: [u16; DCTSIZE2],
    /// Number of meaningful rows (8 unless cropped)
    pub rows: usize,
    /// Number of meaningful columns (8 unless cropped)
    pub cols: usize,
}

impl QuantTable {
    /// Standard luminance table
    pub fn luma() -> Self {
        Self::new(STD_LUMA_QUANT)
    }

    /// Standard chrominance table, shared by Cr and Cb
    pub fn chroma() -> Self {
        Self::new(STD_CHROMA_QUANT)
    }

    /// Full 8x8 table from an array
    pub fn new(values: [u16; DCTSIZE2]) -> Self {
        Self {
            values,
            rows: DCTSIZE,
            cols: DCTSIZE,
        }
    }

    /// Table for a component, cropped to the block shape
    pub fn for_component(component: Component, rows: usize, cols: usize) -> Self {
        let table = if component.is_luma() {
            Self::luma()
        } else {
            Self::chroma()
        };
        table.cropped(rows, cols)
    }

    /// Keep the top-left `rows` x `cols` entries. Entries outside the crop
    /// are zeroed and must not be used.
    #[must_use]
    pub fn cropped(&self, rows: usize, cols: usize) -> Self {
        let rows = rows.min(DCTSIZE);
        let cols = cols.min(DCTSIZE);
        let mut values = [0u16; DCTSIZE2];
        for y in 0..rows {
            for x in 0..cols {
                values[y * DCTSIZE + x] = self.values[y * DCTSIZE + x];
            }
        }
        Self { values, rows, cols }
    }

    /// Whether the table covers a full 8x8 block
    #[inline]
    pub fn is_full(&self) -> bool {
        self.rows == DCTSIZE && self.cols == DCTSIZE
    }
}

/// Per-component quantization tables for one block shape.
///
/// Cr and Cb both take the chrominance table.
#[derive(Clone, Debug)]
pub struct QuantTableSet {
    tables: [QuantTable; BLOCK_CHANNELS],
}

impl Default for QuantTableSet {
    fn default() -> Self {
        Self::standard()
    }
}

impl QuantTableSet {
    /// Standard tables for full 8x8 blocks
    pub fn standard() -> Self {
        Self::for_block(DCTSIZE, DCTSIZE)
    }

    /// Standard tables cropped to a `rows` x `cols` block
    pub fn for_block(rows: usize, cols: usize) -> Self {
        Self {
            tables: Component::ALL.map(|c| QuantTable::for_component(c, rows, cols)),
        }
    }

    /// Table for a component
    #[inline]
    pub fn get(&self, component: Component) -> &QuantTable {
        &self.tables[component.index()]
    }
}

/// Quantize one channel: `round(coeff / table * quality)`.
///
/// Ties round to even. The float-to-i16 cast saturates on overflow.
pub fn quantize_block(coeffs: &[f32; DCTSIZE2], table: &QuantTable, quality: f32) -> [i16; DCTSIZE2] {
    let mut output = [0i16; DCTSIZE2];
    for y in 0..table.rows {
        for x in 0..table.cols {
            let i = y * DCTSIZE + x;
            let q = table.values[i] as f32;
            output[i] = (coeffs[i] / q * quality).round_ties_even() as i16;
        }
    }
    output
}

/// Map quantized values back to transform coefficients
pub fn dequantize_block(
    values: &[i16; DCTSIZE2],
    table: &QuantTable,
    quality: f32,
    mode: Dequantization,
) -> [f32; DCTSIZE2] {
    let mut output = [0.0f32; DCTSIZE2];
    match mode {
        Dequantization::Legacy => {
            for i in 0..DCTSIZE2 {
                output[i] = (values[i] as f32 / quality).round_ties_even();
            }
        }
        Dequantization::TableScaled => {
            for y in 0..table.rows {
                for x in 0..table.cols {
                    let i = y * DCTSIZE + x;
                    output[i] = values[i] as f32 * table.values[i] as f32 / quality;
                }
            }
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chroma_shared_by_cr_and_cb() {
        let set = QuantTableSet::standard();
        assert_eq!(set.get(Component::Cr), set.get(Component::Cb));
        assert_eq!(set.get(Component::Y).values[0], 16);
        assert_eq!(set.get(Component::Cr).values[0], 17);
        assert!(Component::ALL.iter().all(|&c| set.get(c).is_full()));
    }

    #[test]
    fn test_cropped_set_crops_chroma_alike() {
        let set = QuantTableSet::for_block(4, 2);
        let cr = set.get(Component::Cr);
        assert_eq!(cr, set.get(Component::Cb));
        assert_eq!((cr.rows, cr.cols), (4, 2));
        assert_eq!(&cr.values[..3], &[17, 18, 0]);
        assert_eq!(&cr.values[24..26], &[47, 66]);
        assert_eq!(cr.values[32], 0);

        let y = set.get(Component::Y);
        assert_eq!(y, &QuantTable::luma().cropped(4, 2));
        assert_ne!(y, cr);
    }

    #[test]
    fn test_cropped_table() {
        let table = QuantTable::luma().cropped(2, 3);
        assert!(!table.is_full());
        assert_eq!(&table.values[..3], &[16, 11, 10]);
        assert_eq!(table.values[3], 0);
        assert_eq!(&table.values[8..11], &[12, 12, 14]);
        assert_eq!(table.values[16], 0);
    }

    #[test]
    fn test_quality_multiplies() {
        let mut coeffs = [0.0f32; DCTSIZE2];
        coeffs[0] = 160.0;
        let table = QuantTable::luma();
        assert_eq!(quantize_block(&coeffs, &table, 1.0)[0], 10);
        assert_eq!(quantize_block(&coeffs, &table, 2.0)[0], 20);
    }

    #[test]
    fn test_quantize_saturates() {
        let coeffs = [1.0e6f32; DCTSIZE2];
        let q = quantize_block(&coeffs, &QuantTable::luma(), 70.0);
        assert!(q.iter().all(|&v| v == i16::MAX));
    }

    #[test]
    fn test_legacy_dequant_ignores_table() {
        let mut values = [0i16; DCTSIZE2];
        values[0] = 455;
        values[1] = -36;
        let out = dequantize_block(&values, &QuantTable::luma(), 70.0, Dequantization::Legacy);
        // 6.5 ties to even
        assert_eq!(out[0], 6.0);
        assert_eq!(out[1], -1.0);
    }

    #[test]
    fn test_table_scaled_dequant_inverts_quantize() {
        let mut coeffs = [0.0f32; DCTSIZE2];
        coeffs[0] = 104.0;
        let table = QuantTable::luma();
        let q = quantize_block(&coeffs, &table, 70.0);
        let back = dequantize_block(&q, &table, 70.0, Dequantization::TableScaled);
        assert!((back[0] - 104.0).abs() < 0.2, "{}", back[0]);
    }
}
