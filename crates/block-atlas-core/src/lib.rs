//! Core library for packing block textures into a square grid atlas.
//!
//! - Layout: `grid_size` rounds `ceil(sqrt(count))` up to a power of two; tiles fill cells row-major by list position
//! - Compositing: one pass per tile writes the albedo atlas and, by tile category, the emissive, gloss and leaves maps
//! - Order: the placement order is persisted as a JSON array so a later run can reproduce the same layout
//!
//! Quick example:
//! ```ignore
//! use std::path::Path;
//! use block_atlas_core::{AtlasConfig, BuildMode, run};
//! # fn main() -> anyhow::Result<()> {
//! let cfg = AtlasConfig::default();
//! let report = run(Path::new("."), BuildMode::Discover, &cfg, false, |_, _| {})?;
//! println!("{}", report.summary());
//! # Ok(()) }
//! ```

pub mod classify;
pub mod compositing;
pub mod config;
pub mod error;
pub mod layout;
pub mod model;
pub mod order;
pub mod pipeline;
pub mod source;

pub use classify::*;
pub use compositing::*;
pub use config::*;
pub use error::*;
pub use layout::*;
pub use model::*;
pub use order::*;
pub use pipeline::*;
pub use source::*;

/// Convenience prelude for common types and functions.
/// Importing `block_atlas_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::classify::TileClass;
    pub use crate::compositing::{AtlasMaps, composite_tile};
    pub use crate::config::{
        AtlasConfig, AtlasConfigBuilder, Category, CategoryRule, RuleSet, Tint,
    };
    pub use crate::error::{BlockAtlasError, Result};
    pub use crate::layout::{cell_for_index, grid_size, plan};
    pub use crate::model::{BuildReport, Cell, Layout, Placement};
    pub use crate::order::OrderList;
    pub use crate::pipeline::{
        BuildMode, BuildOutput, build_atlas, build_atlas_with_progress, collect_entries,
        output_paths, run, write_outputs,
    };
    pub use crate::source::{Tile, TileEntry, discover, replay, resolve_source_dir};
}
