use crate::error::{BlockAtlasError, Result};
use crate::model::{Cell, Layout, Placement};

/// Smallest power of two `>= v` (1 for 0 and 1).
pub fn next_pow2(mut v: u32) -> u32 {
    if v <= 1 {
        return 1;
    }
    v -= 1;
    v |= v >> 1;
    v |= v >> 2;
    v |= v >> 4;
    v |= v >> 8;
    v |= v >> 16;
    v + 1
}

fn ceil_sqrt(n: usize) -> usize {
    let r = n.isqrt();
    if r * r < n { r + 1 } else { r }
}

/// Cells per side for `count` tiles: `next_pow2(ceil(sqrt(count)))`.
///
/// `grid_size(0)` is 1; callers reject empty input before planning.
pub fn grid_size(count: usize) -> u32 {
    let side = u32::try_from(ceil_sqrt(count)).unwrap_or(u32::MAX);
    next_pow2(side)
}

/// Row-major cell for list position `index`.
pub fn cell_for_index(index: usize, grid_size: u32) -> Cell {
    let g = grid_size.max(1) as usize;
    Cell::new((index / g) as u32, (index % g) as u32)
}

/// Assigns every key the cell of its list position.
///
/// Positions are never compacted: a key whose tile later turns out to be
/// missing still consumes its cell, so the remaining keys land where they
/// would have without the gap.
pub fn plan<K: Clone>(keys: &[K], tile_width: u32, tile_height: u32) -> Result<Layout<K>> {
    if keys.is_empty() {
        return Err(BlockAtlasError::NoSuitableFiles);
    }
    if tile_width == 0 || tile_height == 0 {
        return Err(BlockAtlasError::InvalidConfig(format!(
            "tile dimensions must be non-zero, got {}x{}",
            tile_width, tile_height
        )));
    }
    let grid_size = grid_size(keys.len());
    if grid_size.checked_mul(tile_width).is_none() || grid_size.checked_mul(tile_height).is_none()
    {
        return Err(BlockAtlasError::AtlasTooLarge {
            grid_size,
            tile_width,
            tile_height,
        });
    }
    let placements = keys
        .iter()
        .enumerate()
        .map(|(index, key)| Placement {
            key: key.clone(),
            index,
            cell: cell_for_index(index, grid_size),
        })
        .collect();
    Ok(Layout {
        grid_size,
        tile_width,
        tile_height,
        placements,
    })
}
