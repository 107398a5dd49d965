//! Grid pixelation with optional palette snapping.
//!
//! A source bitmap is cut into square blocks, each block is flattened to
//! its average color and, when a palette is set, snapped to the nearest
//! palette entry. Built both as a WebAssembly module (see [`web`]) and as a
//! native library backing the `pixelate-cli` binary.

pub mod bitmap;
pub mod color;
pub mod engine;
pub mod error;
pub mod extract;
pub mod palette_store;
pub mod persist;
pub mod sizing;
pub mod web;

pub use bitmap::Bitmap;
pub use color::{Color, format_color, parse_color};
pub use engine::{PixelateOptions, Pixelated, pixelate, pixelate_with};
pub use error::{PixelateError, Result};
pub use extract::extract_palette;
pub use palette_store::{AddOutcome, Palette};
pub use persist::{JsonFileStore, KeyValueStore, MemoryStore, PALETTE_STORAGE_KEY, PersistentPalette};
pub use sizing::{DEFAULT_BLOCK_SIZE, GridDimensions, Sizing, grid_dimensions, resolve_block_size};

/// Decode `input`, pixelate it and return the PNG encoded result along
/// with the grid that was used.
pub fn pixelate_bytes(
    input: &[u8],
    options: &PixelateOptions,
    palette: &Palette,
) -> Result<(Vec<u8>, GridDimensions)> {
    let source = Bitmap::decode(input)?;
    let out = pixelate_with(&source, options, palette);
    Ok((out.bitmap.encode_png()?, out.grid))
}
