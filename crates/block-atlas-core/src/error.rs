use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlockAtlasError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Glob pattern error: {0}")]
    Pattern(#[from] globset::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("No source directory found (searched: {})", display_paths(.searched))]
    MissingSourceDirectory { searched: Vec<PathBuf> },
    #[error("Can't match order because {} was not found", .0.display())]
    MissingOrderFile(PathBuf),
    #[error("No suitable block files found")]
    NoSuitableFiles,
    #[error("Invalid option: {0:?}")]
    InvalidOption(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Atlas too large: {grid_size}x{grid_size} cells of {tile_width}x{tile_height} px")]
    AtlasTooLarge {
        grid_size: u32,
        tile_width: u32,
        tile_height: u32,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, BlockAtlasError>;
