use std::path::{Path, PathBuf};

use globset::GlobBuilder;
use image::{ImageReader, RgbaImage};
use tracing::{debug, instrument};
use walkdir::WalkDir;

use crate::classify::TileClass;
use crate::config::{Category, RuleSet};
use crate::error::{BlockAtlasError, Result};
use crate::order::OrderList;

/// A listed tile: identifier plus the file it is expected in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileEntry {
    pub key: String,
    pub path: PathBuf,
}

impl TileEntry {
    pub fn new(key: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            key: key.into(),
            path: path.into(),
        }
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}

/// Returns `root.join(candidate)` for the first candidate that is a directory.
pub fn resolve_source_dir(root: &Path, candidates: &[PathBuf]) -> Result<PathBuf> {
    let searched: Vec<PathBuf> = candidates.iter().map(|c| root.join(c)).collect();
    match searched.iter().find(|p| p.is_dir()) {
        Some(dir) => {
            debug!(dir = %dir.display(), "using source directory");
            Ok(dir.clone())
        }
        None => Err(BlockAtlasError::MissingSourceDirectory { searched }),
    }
}

/// Canonical tiles of `dir`: regular `*.png` files (any case) directly inside
/// it whose name has no digit, sorted by file name.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn discover(dir: &Path) -> Result<Vec<TileEntry>> {
    let png = GlobBuilder::new("*.png")
        .case_insensitive(true)
        .build()?
        .compile_matcher();
    let mut found: Vec<(String, PathBuf)> = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !png.is_match(&name) || name.chars().any(|c| c.is_ascii_digit()) {
            continue;
        }
        found.push((name, entry.into_path()));
    }
    found.sort_by(|a, b| a.0.cmp(&b.0));
    debug!(count = found.len(), "discovered tiles");
    Ok(found
        .into_iter()
        .map(|(name, path)| {
            let key = Path::new(&name)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or(name);
            TileEntry { key, path }
        })
        .collect())
}

/// Entries for a stored order: `<dir>/<key>.png` per identifier, in order.
///
/// When that exact file is absent, a sibling whose name matches `<key>.png`
/// ignoring case is used instead, so tiles discovered as `Foo.PNG` replay.
pub fn replay(dir: &Path, order: &OrderList) -> Result<Vec<TileEntry>> {
    order
        .iter()
        .map(|key| {
            let exact = dir.join(format!("{key}.png"));
            if exact.is_file() {
                return Ok(TileEntry::new(key, exact));
            }
            let path = find_ignoring_case(dir, &format!("{key}.png"))?.unwrap_or(exact);
            Ok(TileEntry::new(key, path))
        })
        .collect()
}

/// First regular file directly in `dir` (by name) matching `name` in any case.
fn find_ignoring_case(dir: &Path, name: &str) -> Result<Option<PathBuf>> {
    if !dir.is_dir() {
        return Ok(None);
    }
    let matcher = GlobBuilder::new(&globset::escape(name))
        .case_insensitive(true)
        .literal_separator(true)
        .build()?
        .compile_matcher();
    let mut hits: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = entry?;
        if entry.file_type().is_file() && matcher.is_match(entry.file_name()) {
            hits.push(entry.into_path());
        }
    }
    hits.sort();
    if let Some(hit) = hits.first() {
        debug!(name, found = %hit.display(), "matched tile file ignoring case");
    }
    Ok(hits.into_iter().next())
}

/// Sibling overlay path of a tile: `<stem><suffix>.<ext>` in the same directory.
pub fn overlay_path(tile_path: &Path, suffix: &str) -> Option<PathBuf> {
    let stem = tile_path.file_stem()?.to_string_lossy();
    let name = match tile_path.extension() {
        Some(ext) => format!("{stem}{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}{suffix}"),
    };
    Some(tile_path.with_file_name(name))
}

pub fn load_rgba(path: &Path) -> Result<RgbaImage> {
    let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    Ok(img.to_rgba8())
}

/// A decoded tile ready for compositing.
pub struct Tile {
    pub key: String,
    pub image: RgbaImage,
    pub class: TileClass,
    /// Grass overlay, resolved once at load time (grass tiles only).
    pub overlay: Option<RgbaImage>,
}

impl Tile {
    /// Decodes `entry`, classifies it and loads its overlay if it has one.
    pub fn load(entry: &TileEntry, rules: &RuleSet) -> Result<Self> {
        let image = load_rgba(&entry.path)?;
        let class = TileClass::of(&entry.key, rules);
        let overlay = if class.contains(Category::Grass) {
            match overlay_path(&entry.path, &rules.overlay_suffix) {
                Some(p) if p.is_file() => {
                    debug!(key = %entry.key, overlay = %p.display(), "grass overlay");
                    Some(load_rgba(&p)?)
                }
                _ => None,
            }
        } else {
            None
        };
        Ok(Self {
            key: entry.key.clone(),
            image,
            class,
            overlay,
        })
    }

    /// Builds a tile from an in-memory image (no overlay lookup on disk).
    pub fn from_image(
        key: impl Into<String>,
        image: RgbaImage,
        overlay: Option<RgbaImage>,
        rules: &RuleSet,
    ) -> Self {
        let key = key.into();
        let class = TileClass::of(&key, rules);
        let overlay = if class.contains(Category::Grass) {
            overlay
        } else {
            None
        };
        Self {
            key,
            image,
            class,
            overlay,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}
