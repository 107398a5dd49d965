//! Block averaging and palette snapping.
//!
//! The source is scanned in `block_size` squares starting at the top left.
//! Blocks on the right and bottom edges are clipped to the bitmap. Every
//! source pixel is read exactly once.

use std::ops::Range;

use crate::bitmap::Bitmap;
use crate::palette_store::Palette;
use crate::sizing::{GridDimensions, Sizing};

/// Library level run configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PixelateOptions {
    pub sizing: Sizing,
}

/// Output of [`pixelate_with`].
#[derive(Debug, Clone)]
pub struct Pixelated {
    pub bitmap: Bitmap,
    pub grid: GridDimensions,
}

/// Flatten every block of `source` to its mean color, snapped to the
/// nearest `palette` entry when the palette is non-empty.
///
/// Output dimensions equal the source. Alpha is the block's mean alpha in
/// both cases. A zero `block_size` is treated as 1.
pub fn pixelate(source: &Bitmap, block_size: u32, palette: &Palette) -> Bitmap {
    let block = block_size.max(1);
    let (width, height) = source.dimensions();
    let src = source.as_raw();
    let mut out = vec![0u8; src.len()];

    for y in (0..height).step_by(block as usize) {
        let rows = y..y.saturating_add(block).min(height);
        for x in (0..width).step_by(block as usize) {
            let cols = x..x.saturating_add(block).min(width);
            let [r, g, b, a] = average_block(src, width, cols.clone(), rows.clone());
            let fill = match palette.nearest(r, g, b) {
                Some(c) => [c.r, c.g, c.b, a],
                None => [r, g, b, a],
            };
            fill_block(&mut out, width, cols, rows.clone(), fill);
        }
    }

    // Dimensions and length are taken from a valid source.
    Bitmap::from_rgba(width, height, out).unwrap_or_else(|_| source.clone())
}

/// Resolve `options.sizing` against the source width, then [`pixelate`].
pub fn pixelate_with(source: &Bitmap, options: &PixelateOptions, palette: &Palette) -> Pixelated {
    let grid = options.sizing.grid(source.width(), source.height());
    log::debug!(
        "Pixelating {}x{} bitmap: {grid}, palette of {} colors",
        source.width(),
        source.height(),
        palette.len()
    );
    Pixelated {
        bitmap: pixelate(source, grid.block_size, palette),
        grid,
    }
}

/// Per-channel mean over the block, rounded half up.
fn average_block(src: &[u8], width: u32, cols: Range<u32>, rows: Range<u32>) -> [u8; 4] {
    let mut sums = [0u64; 4];
    let stride = width as usize * 4;
    for y in rows.clone() {
        let row = y as usize * stride;
        let span = &src[row + cols.start as usize * 4..row + cols.end as usize * 4];
        for px in span.chunks_exact(4) {
            for (sum, &v) in sums.iter_mut().zip(px) {
                *sum += v as u64;
            }
        }
    }

    let count = (cols.len() * rows.len()) as u64;
    sums.map(|sum| ((2 * sum + count) / (2 * count)) as u8)
}

fn fill_block(out: &mut [u8], width: u32, cols: Range<u32>, rows: Range<u32>, rgba: [u8; 4]) {
    let stride = width as usize * 4;
    for y in rows {
        let row = y as usize * stride;
        let span = &mut out[row + cols.start as usize * 4..row + cols.end as usize * 4];
        for px in span.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }
}
