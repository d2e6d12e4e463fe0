use image::Rgba;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Tile categories recognised from the identifier.
/// Each category owns exactly one compositing effect:
///   - `Ore`: bright pixels go to the emissive map and become opaque black in the gloss map
///   - `GlowSource`: every pixel goes to the emissive map
///   - `Leaves`: leaves mask set to 255, albedo tinted with the grass tint
///   - `Grass`: albedo tinted with the grass tint (through the overlay when one exists)
///   - `Water`: albedo tinted with the water tint
///   - `Glass`: gloss map set to opaque black
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Ore,
    GlowSource,
    Leaves,
    Grass,
    Water,
    Glass,
}

impl FromStr for Category {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ore" => Ok(Self::Ore),
            "glow" | "glow_source" => Ok(Self::GlowSource),
            "leaves" => Ok(Self::Leaves),
            "grass" => Ok(Self::Grass),
            "water" => Ok(Self::Water),
            "glass" => Ok(Self::Glass),
            _ => Err(()),
        }
    }
}

/// Multiplicative color tint, each channel expressed over 255.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Tint(pub [u8; 4]);

impl Tint {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b, 255])
    }

    /// Component-wise `round(c * t / 255)`.
    ///
    /// Evaluated in integers so no channel depends on float rounding.
    pub fn apply(&self, px: Rgba<u8>) -> Rgba<u8> {
        let mut out = [0u8; 4];
        for (o, (c, t)) in out.iter_mut().zip(px.0.iter().zip(self.0.iter())) {
            let num = 2 * (*c as u32) * (*t as u32) + 255;
            *o = (num / 510) as u8;
        }
        Rgba(out)
    }
}

/// A matching rule: the identifier (lowercased) must contain at least one
/// `include` substring and none of the `exclude` substrings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryRule {
    pub category: Category,
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl CategoryRule {
    pub fn new(category: Category, include: &[&str], exclude: &[&str]) -> Self {
        Self {
            category,
            include: include.iter().map(|s| s.to_string()).collect(),
            exclude: exclude.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// `lowered` must already be lowercase.
    pub fn matches(&self, lowered: &str) -> bool {
        self.include.iter().any(|p| lowered.contains(p.as_str()))
            && !self.exclude.iter().any(|p| lowered.contains(p.as_str()))
    }
}

/// Classification rules and the constants their effects use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSet {
    /// Evaluated in order; albedo writes of later categories win.
    #[serde(default = "default_rules")]
    pub rules: Vec<CategoryRule>,
    #[serde(default = "default_grass_tint")]
    pub grass_tint: Tint,
    #[serde(default = "default_water_tint")]
    pub water_tint: Tint,
    /// Ore pixels are emissive when `max(r, g, b)` is strictly above this.
    #[serde(default = "default_ore_brightness_threshold")]
    pub ore_brightness_threshold: u8,
    /// Grass overlays live next to the tile as `<stem><suffix>.<ext>`.
    #[serde(default = "default_overlay_suffix")]
    pub overlay_suffix: String,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            rules: default_rules(),
            grass_tint: default_grass_tint(),
            water_tint: default_water_tint(),
            ore_brightness_threshold: default_ore_brightness_threshold(),
            overlay_suffix: default_overlay_suffix(),
        }
    }
}

impl RuleSet {
    /// Validates the rule table.
    ///
    /// Returns an error if a rule has no include pattern, a pattern is empty
    /// or not lowercase, or the overlay suffix is empty.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::BlockAtlasError;

        for rule in &self.rules {
            if rule.include.is_empty() {
                return Err(BlockAtlasError::InvalidConfig(format!(
                    "rule {:?} has no include pattern",
                    rule.category
                )));
            }
            for pat in rule.include.iter().chain(rule.exclude.iter()) {
                if pat.is_empty() {
                    return Err(BlockAtlasError::InvalidConfig(format!(
                        "rule {:?} has an empty pattern",
                        rule.category
                    )));
                }
                if pat.to_lowercase() != *pat {
                    return Err(BlockAtlasError::InvalidConfig(format!(
                        "pattern {:?} of rule {:?} must be lowercase",
                        pat, rule.category
                    )));
                }
            }
        }
        if self.overlay_suffix.is_empty() {
            return Err(BlockAtlasError::InvalidConfig(
                "overlay_suffix must not be empty".into(),
            ));
        }
        Ok(())
    }
}

fn default_rules() -> Vec<CategoryRule> {
    vec![
        CategoryRule::new(
            Category::Ore,
            &[
                "diamond_",
                "emerald_",
                "gold_",
                "iron_",
                "lapis_",
                "redstone_",
                "quartz_",
            ],
            &[],
        ),
        CategoryRule::new(Category::GlowSource, &["glowstone", "lava"], &[]),
        CategoryRule::new(Category::Leaves, &["leaves"], &[]),
        CategoryRule::new(Category::Grass, &["grass"], &["snow", "overlay"]),
        CategoryRule::new(Category::Water, &["water"], &[]),
        CategoryRule::new(Category::Glass, &["glass"], &[]),
    ]
}
fn default_grass_tint() -> Tint {
    Tint::rgb(145, 189, 89)
}
fn default_water_tint() -> Tint {
    Tint::rgb(63, 118, 228)
}
fn default_ore_brightness_threshold() -> u8 {
    150
}
fn default_overlay_suffix() -> String {
    "_overlay".into()
}

/// Fixed file layout of a run plus the classification rules.
/// Paths are relative to the run root (the working directory for the CLI).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtlasConfig {
    /// Source directories, first existing one wins.
    pub source_dirs: Vec<PathBuf>,
    pub atlas_file: PathBuf,
    pub emissive_file: PathBuf,
    pub gloss_file: PathBuf,
    pub leaves_file: PathBuf,
    pub order_file: PathBuf,
    #[serde(default)]
    pub rules: RuleSet,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            source_dirs: vec![PathBuf::from("block"), PathBuf::from("blocks")],
            atlas_file: PathBuf::from("packed_image.png"),
            emissive_file: PathBuf::from("emissive_map.png"),
            gloss_file: PathBuf::from("gloss_map.png"),
            leaves_file: PathBuf::from("leaves_map.png"),
            order_file: PathBuf::from("order.json"),
            rules: RuleSet::default(),
        }
    }
}

impl AtlasConfig {
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.source_dirs.is_empty() {
            return Err(crate::error::BlockAtlasError::InvalidConfig(
                "at least one source directory is required".into(),
            ));
        }
        self.rules.validate()
    }

    /// Create a fluent builder for `AtlasConfig`.
    pub fn builder() -> AtlasConfigBuilder {
        AtlasConfigBuilder::new()
    }
}

/// Builder for `AtlasConfig`.
#[derive(Debug, Default, Clone)]
pub struct AtlasConfigBuilder {
    cfg: AtlasConfig,
}

impl AtlasConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: AtlasConfig::default(),
        }
    }
    pub fn source_dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.cfg.source_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }
    pub fn atlas_file(mut self, v: impl Into<PathBuf>) -> Self {
        self.cfg.atlas_file = v.into();
        self
    }
    pub fn emissive_file(mut self, v: impl Into<PathBuf>) -> Self {
        self.cfg.emissive_file = v.into();
        self
    }
    pub fn gloss_file(mut self, v: impl Into<PathBuf>) -> Self {
        self.cfg.gloss_file = v.into();
        self
    }
    pub fn leaves_file(mut self, v: impl Into<PathBuf>) -> Self {
        self.cfg.leaves_file = v.into();
        self
    }
    pub fn order_file(mut self, v: impl Into<PathBuf>) -> Self {
        self.cfg.order_file = v.into();
        self
    }
    pub fn rules(mut self, v: RuleSet) -> Self {
        self.cfg.rules = v;
        self
    }
    pub fn build(self) -> AtlasConfig {
        self.cfg
    }
}
