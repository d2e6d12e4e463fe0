use image::{GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};

use crate::config::{Category, RuleSet, Tint};
use crate::source::Tile;

const OPAQUE_BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const LEAF: Luma<u8> = Luma([255]);

/// The four output maps, all the same pixel size.
pub struct AtlasMaps {
    /// Combined color map (RGBA, transparent where no tile was placed).
    pub albedo: RgbaImage,
    /// Self-illuminating pixels (RGB, black background).
    pub emissive: RgbImage,
    /// Reflectivity markers (RGBA, transparent background, opaque black markers).
    pub gloss: RgbaImage,
    /// Foliage mask (grayscale, 0 background, 255 markers).
    pub leaves: GrayImage,
}

impl AtlasMaps {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            albedo: RgbaImage::new(width, height),
            emissive: RgbImage::new(width, height),
            gloss: RgbaImage::new(width, height),
            leaves: GrayImage::new(width, height),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.albedo.dimensions()
    }
}

/// Copy the `(sw, sh)` top-left block of `src` into `canvas` at `(dx, dy)`.
/// Pixels that would fall outside `canvas` are dropped.
pub fn blit_rgba(src: &RgbaImage, canvas: &mut RgbaImage, dx: u32, dy: u32, sw: u32, sh: u32) {
    let (cw, ch) = canvas.dimensions();
    let (iw, ih) = src.dimensions();
    for yy in 0..sh.min(ih) {
        for xx in 0..sw.min(iw) {
            if dx + xx < cw && dy + yy < ch {
                canvas.put_pixel(dx + xx, dy + yy, *src.get_pixel(xx, yy));
            }
        }
    }
}

/// Region of a cell the compositor touches: the tile's own size, clipped to
/// the cell and the canvas.
struct Region {
    dx: u32,
    dy: u32,
    w: u32,
    h: u32,
}

impl Region {
    fn points(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (0..self.h).flat_map(move |y| (0..self.w).map(move |x| (x, y)))
    }
}

/// Write `tile` into the cell whose top-left pixel is `origin` and apply its
/// category effects to the auxiliary maps.
///
/// `cell_size` is the authoritative tile size of the layout; a larger tile is
/// clipped to it. Every effect reads the raw tile pixel, so applying the
/// categories one after another in rule order gives the same result as
/// evaluating all of them per pixel.
pub fn composite_tile(
    tile: &Tile,
    origin: (u32, u32),
    cell_size: (u32, u32),
    rules: &RuleSet,
    maps: &mut AtlasMaps,
) {
    let (aw, ah) = maps.dimensions();
    let (tw, th) = tile.dimensions();
    let (dx, dy) = origin;
    let region = Region {
        dx,
        dy,
        w: tw.min(cell_size.0).min(aw.saturating_sub(dx)),
        h: th.min(cell_size.1).min(ah.saturating_sub(dy)),
    };

    blit_rgba(&tile.image, &mut maps.albedo, dx, dy, region.w, region.h);

    for category in tile.class.categories() {
        match category {
            Category::Ore => apply_ore(tile, &region, rules.ore_brightness_threshold, maps),
            Category::GlowSource => apply_glow(tile, &region, maps),
            Category::Leaves => apply_leaves(tile, &region, rules, maps),
            Category::Grass => apply_grass(tile, &region, rules, maps),
            Category::Water => apply_tint(tile, &region, rules.water_tint, maps),
            Category::Glass => apply_glass(&region, maps),
        }
    }
}

/// Brightness is the largest color channel.
pub fn brightness(px: Rgba<u8>) -> u8 {
    px[0].max(px[1]).max(px[2])
}

fn rgb(px: Rgba<u8>) -> Rgb<u8> {
    Rgb([px[0], px[1], px[2]])
}

fn apply_ore(tile: &Tile, region: &Region, threshold: u8, maps: &mut AtlasMaps) {
    for (x, y) in region.points() {
        let px = *tile.image.get_pixel(x, y);
        if brightness(px) > threshold {
            maps.emissive.put_pixel(region.dx + x, region.dy + y, rgb(px));
            maps.gloss.put_pixel(region.dx + x, region.dy + y, OPAQUE_BLACK);
        }
    }
}

fn apply_glow(tile: &Tile, region: &Region, maps: &mut AtlasMaps) {
    for (x, y) in region.points() {
        let px = *tile.image.get_pixel(x, y);
        maps.emissive.put_pixel(region.dx + x, region.dy + y, rgb(px));
    }
}

fn apply_leaves(tile: &Tile, region: &Region, rules: &RuleSet, maps: &mut AtlasMaps) {
    for (x, y) in region.points() {
        maps.leaves.put_pixel(region.dx + x, region.dy + y, LEAF);
    }
    apply_tint(tile, region, rules.grass_tint, maps);
}

fn apply_grass(tile: &Tile, region: &Region, rules: &RuleSet, maps: &mut AtlasMaps) {
    let Some(overlay) = &tile.overlay else {
        apply_tint(tile, region, rules.grass_tint, maps);
        return;
    };
    let (ow, oh) = overlay.dimensions();
    for (x, y) in region.points() {
        // outside the overlay counts as transparent
        if x >= ow || y >= oh {
            continue;
        }
        let over = *overlay.get_pixel(x, y);
        if over[3] > 0 {
            maps.albedo.put_pixel(region.dx + x, region.dy + y, rules.grass_tint.apply(over));
        }
    }
}

fn apply_tint(tile: &Tile, region: &Region, tint: Tint, maps: &mut AtlasMaps) {
    for (x, y) in region.points() {
        let px = *tile.image.get_pixel(x, y);
        maps.albedo.put_pixel(region.dx + x, region.dy + y, tint.apply(px));
    }
}

fn apply_glass(region: &Region, maps: &mut AtlasMaps) {
    for (x, y) in region.points() {
        maps.gloss.put_pixel(region.dx + x, region.dy + y, OPAQUE_BLACK);
    }
}
