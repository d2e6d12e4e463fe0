use std::path::{Path, PathBuf};
use std::str::FromStr;

use image::ImageFormat;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::compositing::{AtlasMaps, composite_tile};
use crate::config::{AtlasConfig, RuleSet};
use crate::error::{BlockAtlasError, Result};
use crate::layout::plan;
use crate::model::{BuildReport, Layout};
use crate::order::OrderList;
use crate::source::{self, Tile, TileEntry};

/// Where the tile list comes from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    /// Scan the source directory and write every map plus a fresh order file.
    Discover,
    /// Follow the stored order file and write only the atlas.
    Replay,
}

impl FromStr for BuildMode {
    type Err = BlockAtlasError;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "1" => Ok(Self::Discover),
            "2" => Ok(Self::Replay),
            other => Err(BlockAtlasError::InvalidOption(other.to_string())),
        }
    }
}

/// Result of compositing a tile list.
pub struct BuildOutput {
    pub layout: Layout,
    pub maps: AtlasMaps,
    /// Identifiers actually placed, in placement order.
    pub order: OrderList,
    pub report: BuildReport,
}

/// Composites `entries` into a fresh set of maps.
pub fn build_atlas(entries: &[TileEntry], rules: &RuleSet) -> Result<BuildOutput> {
    build_atlas_with_progress(entries, rules, |_, _| {})
}

/// Like [`build_atlas`], calling `progress(index, key)` after each listed entry.
///
/// Notes:
/// - Tile size comes from the first entry whose file exists.
/// - Entries without a file are skipped but keep their cell, so later tiles
///   do not move.
/// - Each tile (and its overlay) is decoded, composited and dropped before
///   the next one is opened.
#[instrument(skip_all, fields(tiles = entries.len()))]
pub fn build_atlas_with_progress<F>(
    entries: &[TileEntry],
    rules: &RuleSet,
    mut progress: F,
) -> Result<BuildOutput>
where
    F: FnMut(usize, &str),
{
    rules.validate()?;
    if entries.is_empty() {
        return Err(BlockAtlasError::NoSuitableFiles);
    }
    let first = entries
        .iter()
        .find(|e| e.exists())
        .ok_or(BlockAtlasError::NoSuitableFiles)?;
    let (tile_width, tile_height) = image::image_dimensions(&first.path)?;

    let keys: Vec<String> = entries.iter().map(|e| e.key.clone()).collect();
    let layout = plan(&keys, tile_width, tile_height)?;
    let (width, height) = layout.atlas_dimensions();
    debug!(
        grid_size = layout.grid_size,
        tile_width, tile_height, width, height, "planned layout"
    );

    let mut maps = AtlasMaps::new(width, height);
    let mut order = OrderList::default();
    let mut skipped: Vec<String> = Vec::new();

    for (entry, placement) in entries.iter().zip(layout.placements.iter()) {
        if !entry.exists() {
            debug!(key = %entry.key, index = placement.index, "tile file missing, cell left blank");
            skipped.push(entry.key.clone());
            progress(placement.index, &entry.key);
            continue;
        }
        let tile = Tile::load(entry, rules)?;
        let origin = layout.origin(placement.cell);
        composite_tile(&tile, origin, (tile_width, tile_height), rules, &mut maps);
        debug!(
            key = %entry.key,
            row = placement.cell.row,
            col = placement.cell.col,
            categories = ?tile.class.categories(),
            "placed tile"
        );
        order.push(entry.key.clone());
        progress(placement.index, &entry.key);
    }

    let report = BuildReport {
        grid_size: layout.grid_size,
        tile_size: (tile_width, tile_height),
        atlas_size: (width, height),
        placed: order.len(),
        skipped,
    };
    Ok(BuildOutput {
        layout,
        maps,
        order,
        report,
    })
}

/// Paths written for `mode`, in write order.
pub fn output_paths(root: &Path, cfg: &AtlasConfig, mode: BuildMode) -> Vec<PathBuf> {
    match mode {
        BuildMode::Discover => vec![
            root.join(&cfg.order_file),
            root.join(&cfg.atlas_file),
            root.join(&cfg.emissive_file),
            root.join(&cfg.gloss_file),
            root.join(&cfg.leaves_file),
        ],
        BuildMode::Replay => vec![root.join(&cfg.atlas_file)],
    }
}

/// Persists `out` under `root`.
///
/// Discover writes the order file and all four maps; Replay writes the atlas
/// only and leaves the order file untouched.
#[instrument(skip_all, fields(mode = ?mode))]
pub fn write_outputs(
    out: &BuildOutput,
    root: &Path,
    cfg: &AtlasConfig,
    mode: BuildMode,
) -> Result<()> {
    if mode == BuildMode::Discover {
        let order_path = root.join(&cfg.order_file);
        out.order.save(&order_path)?;
        info!(path = %order_path.display(), "order of packed textures saved");
    }

    let atlas_path = root.join(&cfg.atlas_file);
    out.maps.albedo.save_with_format(&atlas_path, ImageFormat::Png)?;

    if mode == BuildMode::Discover {
        out.maps
            .emissive
            .save_with_format(root.join(&cfg.emissive_file), ImageFormat::Png)?;
        out.maps
            .gloss
            .save_with_format(root.join(&cfg.gloss_file), ImageFormat::Png)?;
        out.maps
            .leaves
            .save_with_format(root.join(&cfg.leaves_file), ImageFormat::Png)?;
    }
    info!(path = %atlas_path.display(), "packing complete, maps saved");
    Ok(())
}

/// Lists the tiles for `mode` from the source directory under `root`.
///
/// Replay fails with `MissingOrderFile` when the order file is absent.
pub fn collect_entries(
    root: &Path,
    cfg: &AtlasConfig,
    mode: BuildMode,
) -> Result<Vec<TileEntry>> {
    let dir = source::resolve_source_dir(root, &cfg.source_dirs)?;
    match mode {
        BuildMode::Discover => source::discover(&dir),
        BuildMode::Replay => {
            let order = OrderList::load(&root.join(&cfg.order_file))?;
            source::replay(&dir, &order)
        }
    }
}

/// Full run: collect, composite and, unless `dry_run`, write the outputs.
#[instrument(skip_all, fields(root = %root.display(), mode = ?mode))]
pub fn run<F>(
    root: &Path,
    mode: BuildMode,
    cfg: &AtlasConfig,
    dry_run: bool,
    progress: F,
) -> Result<BuildReport>
where
    F: FnMut(usize, &str),
{
    cfg.validate()?;
    let entries = collect_entries(root, cfg, mode)?;
    info!(count = entries.len(), "collected tiles");
    let out = build_atlas_with_progress(&entries, &cfg.rules, progress)?;
    if !dry_run {
        write_outputs(&out, root, cfg, mode)?;
    }
    Ok(out.report)
}
