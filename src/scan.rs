//! Flattening quantized blocks into a 64-value scan

use crate::consts::{DCTSIZE2, JPEG_NATURAL_ORDER};
use crate::types::ScanOrder;

/// Flatten a block (natural order) into scan order
pub fn flatten(block: &[i16; DCTSIZE2], order: ScanOrder) -> [i16; DCTSIZE2] {
    match order {
        // Natural storage is already row-major
        ScanOrder::RowMajor => *block,
        ScanOrder::Zigzag => {
            let mut out = [0i16; DCTSIZE2];
            for (z, &natural) in JPEG_NATURAL_ORDER.iter().enumerate() {
                out[z] = block[natural];
            }
            out
        }
    }
}

/// Inverse of [`flatten`]: put a scan back into natural order
pub fn unflatten(scan: &[i16; DCTSIZE2], order: ScanOrder) -> [i16; DCTSIZE2] {
    match order {
        ScanOrder::RowMajor => *scan,
        ScanOrder::Zigzag => {
            let mut out = [0i16; DCTSIZE2];
            for (z, &natural) in JPEG_NATURAL_ORDER.iter().enumerate() {
                out[natural] = scan[z];
            }
            out
        }
    }
}
