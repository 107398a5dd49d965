//! Block size resolution.
//!
//! Granularity can be requested either as a number of blocks across the
//! width or as a block edge length in pixels. A valid block count always
//! wins over the pixel size.

use std::fmt;

/// Block size used when neither request is usable.
pub const DEFAULT_BLOCK_SIZE: u32 = 10;

/// The two alternative granularity requests. Zero means unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sizing {
    pub block_count: Option<u32>,
    pub block_size: Option<u32>,
}

impl Sizing {
    pub fn from_count(block_count: u32) -> Self {
        Self {
            block_count: Some(block_count),
            block_size: None,
        }
    }

    pub fn from_size(block_size: u32) -> Self {
        Self {
            block_count: None,
            block_size: Some(block_size),
        }
    }

    /// Build from signed values as handed over by JS number inputs;
    /// zero and negative values are unset.
    pub fn from_signed(block_count: Option<i64>, block_size: Option<i64>) -> Self {
        Self {
            block_count: block_count.and_then(positive),
            block_size: block_size.and_then(positive),
        }
    }

    fn count(&self) -> Option<u32> {
        self.block_count.filter(|&n| n > 0)
    }

    fn size(&self) -> Option<u32> {
        self.block_size.filter(|&n| n > 0)
    }

    pub fn resolve(&self, width: u32) -> u32 {
        resolve_block_size(width, self.block_count, self.block_size)
    }

    pub fn grid(&self, width: u32, height: u32) -> GridDimensions {
        let block_size = self.resolve(width);
        let count_x = match self.count() {
            Some(n) => n,
            None => width / block_size,
        };
        GridDimensions {
            block_size,
            count_x,
            count_y: height / block_size,
        }
    }
}

fn positive(v: i64) -> Option<u32> {
    u32::try_from(v).ok().filter(|&n| n > 0)
}

/// Effective block edge length in pixels, always at least 1.
pub fn resolve_block_size(width: u32, block_count: Option<u32>, block_size: Option<u32>) -> u32 {
    let sizing = Sizing {
        block_count,
        block_size,
    };
    match (sizing.count(), sizing.size()) {
        (Some(count), _) if width > 0 => (width / count).max(1),
        (_, Some(size)) => size,
        _ => DEFAULT_BLOCK_SIZE,
    }
}

/// Informational grid size, used for the status line only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDimensions {
    pub block_size: u32,
    pub count_x: u32,
    pub count_y: u32,
}

/// Blocks across and down for a `width` x `height` bitmap. `count_x`
/// echoes a valid requested count instead of recomputing it.
pub fn grid_dimensions(width: u32, height: u32, sizing: &Sizing) -> GridDimensions {
    sizing.grid(width, height)
}

impl fmt::Display for GridDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "blocks across: {}, blocks down: {} (block size {}px)",
            self.count_x, self.count_y, self.block_size
        )
    }
}
