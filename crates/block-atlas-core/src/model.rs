use serde::{Deserialize, Serialize};

/// Grid cell (row-major, zero-based).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Cell {
    pub row: u32,
    pub col: u32,
}

impl Cell {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

/// A tile assigned to a grid cell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Placement<K = String> {
    /// Tile identifier (file name without extension).
    pub key: K,
    /// Position in the input list; the cell is derived from it.
    pub index: usize,
    pub cell: Cell,
}

/// Square grid layout of equally sized tiles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layout<K = String> {
    /// Cells per side, always a power of two.
    pub grid_size: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    /// One placement per input key, in input order.
    pub placements: Vec<Placement<K>>,
}

impl<K> Layout<K> {
    /// Top-left pixel of `cell` in the atlas.
    pub fn origin(&self, cell: Cell) -> (u32, u32) {
        (cell.col * self.tile_width, cell.row * self.tile_height)
    }

    /// Atlas size in pixels (`grid_size * tile_width`, `grid_size * tile_height`).
    pub fn atlas_dimensions(&self) -> (u32, u32) {
        (
            self.grid_size * self.tile_width,
            self.grid_size * self.tile_height,
        )
    }

    pub fn capacity(&self) -> usize {
        (self.grid_size as usize) * (self.grid_size as usize)
    }
}

impl<K> Layout<K> {
    /// Cell of the first placement whose key equals `key`.
    pub fn cell_of<Q>(&self, key: &Q) -> Option<Cell>
    where
        K: PartialEq<Q>,
        Q: ?Sized,
    {
        self.placements
            .iter()
            .find(|p| p.key == *key)
            .map(|p| p.cell)
    }
}

/// Outcome of a build run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildReport {
    pub grid_size: u32,
    pub tile_size: (u32, u32),
    pub atlas_size: (u32, u32),
    /// Tiles written into the atlas.
    pub placed: usize,
    /// Listed identifiers whose source file was absent; their cells stay blank.
    pub skipped: Vec<String>,
}

impl BuildReport {
    /// Fraction of grid cells holding a tile (0.0 to 1.0).
    pub fn occupancy(&self) -> f64 {
        let cells = (self.grid_size as u64) * (self.grid_size as u64);
        if cells > 0 {
            self.placed as f64 / cells as f64
        } else {
            0.0
        }
    }

    /// Returns a human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "Grid: {g}x{g}, Tile: {}x{} px, Atlas: {}x{} px, Placed: {}, Skipped: {}, Occupancy: {:.2}%",
            self.tile_size.0,
            self.tile_size.1,
            self.atlas_size.0,
            self.atlas_size.1,
            self.placed,
            self.skipped.len(),
            self.occupancy() * 100.0,
            g = self.grid_size,
        )
    }
}
