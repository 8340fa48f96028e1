//! Block tiling and reassembly
//!
//! Images are cropped (never padded) to a multiple of 8 in each direction,
//! then split into 8x8 blocks in row-major block order: outer loop over
//! block rows, inner loop over block columns.

use imgref::{ImgRef, ImgVec};
use rgb::{RGB16, RGB8};

use crate::consts::{DCTSIZE, DCTSIZE2};
use crate::types::BlockPlanes;

/// Truncate dimensions down to the nearest multiple of the block size
#[inline]
#[must_use]
pub const fn aligned_dimensions(width: usize, height: usize) -> (usize, usize) {
    (width - width % DCTSIZE, height - height % DCTSIZE)
}

/// Split the top-left `width` x `height` region of an image into blocks.
///
/// `width` and `height` must be multiples of 8 no larger than the image.
pub fn extract_blocks(image: ImgRef<'_, RGB8>, width: usize, height: usize) -> Vec<BlockPlanes<u8>> {
    debug_assert!(width % DCTSIZE == 0 && height % DCTSIZE == 0);
    debug_assert!(width <= image.width() && height <= image.height());

    let blocks_wide = width / DCTSIZE;
    let blocks_high = height / DCTSIZE;
    let mut blocks = Vec::with_capacity(blocks_wide * blocks_high);
    let rows: Vec<&[RGB8]> = image.rows().take(height).collect();

    for by in 0..blocks_high {
        for bx in 0..blocks_wide {
            let mut planes = [[0u8; DCTSIZE2]; 3];
            for y in 0..DCTSIZE {
                let row = rows[by * DCTSIZE + y];
                for x in 0..DCTSIZE {
                    let px = row[bx * DCTSIZE + x];
                    let i = y * DCTSIZE + x;
                    planes[0][i] = px.r;
                    planes[1][i] = px.g;
                    planes[2][i] = px.b;
                }
            }
            blocks.push(planes);
        }
    }

    blocks
}

/// Place blocks back into a `width` x `height` raster, in the same
/// row-major block order used by [`extract_blocks`].
pub fn assemble_blocks(blocks: &[BlockPlanes<u16>], width: usize, height: usize) -> ImgVec<RGB16> {
    let blocks_wide = width / DCTSIZE;
    debug_assert_eq!(blocks.len(), blocks_wide * (height / DCTSIZE));

    let mut pixels = vec![RGB16::new(0, 0, 0); width * height];
    for (index, planes) in blocks.iter().enumerate() {
        let origin_x = (index % blocks_wide) * DCTSIZE;
        let origin_y = (index / blocks_wide) * DCTSIZE;
        for y in 0..DCTSIZE {
            let row_start = (origin_y + y) * width + origin_x;
            for x in 0..DCTSIZE {
                let i = y * DCTSIZE + x;
                pixels[row_start + x] = RGB16::new(planes[0][i], planes[1][i], planes[2][i]);
            }
        }
    }

    ImgVec::new(pixels, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aligned_dimensions_truncate() {
        assert_eq!(aligned_dimensions(10, 10), (8, 8));
        assert_eq!(aligned_dimensions(16, 23), (16, 16));
        assert_eq!(aligned_dimensions(7, 64), (0, 64));
    }

    #[test]
    fn test_block_order_is_row_major() {
        // Tag each pixel with its block index in the red channel
        let width = 24;
        let height = 16;
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let block = (y / 8) * (width / 8) + x / 8;
                pixels.push(RGB8::new(block as u8, x as u8, y as u8));
            }
        }
        let img = ImgVec::new(pixels, width, height);
        let blocks = extract_blocks(img.as_ref(), width, height);

        assert_eq!(blocks.len(), 6);
        for (index, planes) in blocks.iter().enumerate() {
            assert!(planes[0].iter().all(|&v| v as usize == index));
        }
        // Block 4 is second row, second column
        assert_eq!(blocks[4][1][0], 8);
        assert_eq!(blocks[4][2][0], 8);
    }

    #[test]
    fn test_extract_then_assemble() {
        let width = 16;
        let height = 8;
        let pixels: Vec<RGB8> = (0..width * height)
            .map(|i| RGB8::new(i as u8, (i * 2) as u8, (i * 3) as u8))
            .collect();
        let img = ImgVec::new(pixels.clone(), width, height);

        let wide: Vec<BlockPlanes<u16>> = extract_blocks(img.as_ref(), width, height)
            .iter()
            .map(|p| {
                let mut out = [[0u16; DCTSIZE2]; 3];
                for c in 0..3 {
                    for i in 0..DCTSIZE2 {
                        out[c][i] = p[c][i] as u16;
                    }
                }
                out
            })
            .collect();
        let back = assemble_blocks(&wide, width, height);

        for (a, b) in pixels.iter().zip(back.buf().iter()) {
            assert_eq!((a.r as u16, a.g as u16, a.b as u16), (b.r, b.g, b.b));
        }
    }
}
