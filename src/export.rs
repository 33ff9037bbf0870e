//! Full-world export: the buffer as a PNG plus a JSON legend.
//!
//! The image is the whole world at zoom 1 with every object's name and
//! class stamped beside it, without any screen chrome or outline boxes.
//! Text uses the 8x8 bitmap font from `font8x8`. The same names go into a
//! legend file next to the image (`<stem>.json`).

use std::fs;
use std::path::{Path, PathBuf};

use font8x8::legacy::BASIC_LEGACY;
use glam::Vec2;
use image::{ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::controller::CanvasController;
use crate::error::ExportError;
use crate::object::{CelestialObject, ObjectKind};
use crate::raster::Raster;
use crate::world::World;

const GLYPH_SIZE: u32 = 8;
const NAME_SCALE: u32 = 3;
const CLASS_SCALE: u32 = 2;
const NAME_COLOR: [u8; 4] = [255, 255, 255, 255];
const NAME_STROKE: [u8; 4] = [40, 20, 0, 180];
const CLASS_COLOR: [u8; 4] = [200, 200, 200, 255];
/// Gap between an object's box edge and its label.
const LABEL_GAP: f32 = 16.0;
const LABEL_PAD: f32 = 8.0;

/// One object in the exported legend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub name: String,
    pub kind: ObjectKind,
    pub label: String,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

/// Paths written by an export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub image_path: PathBuf,
    pub legend_path: PathBuf,
    pub objects: usize,
}

/// Every object with its world position and name, in priority order.
pub fn legend(world: &World) -> Vec<LegendEntry> {
    world
        .iter()
        .map(|obj| LegendEntry {
            name: obj.name().to_owned(),
            kind: obj.kind(),
            label: obj.kind().label().to_owned(),
            x: obj.position.x,
            y: obj.position.y,
            radius: obj.radius,
        })
        .collect()
}

/// Copy of the buffer with every object's name and class label drawn at
/// its map position.
pub fn render_export(raster: &Raster, world: &World) -> RgbaImage {
    let mut image = raster.image().clone();
    for obj in world.iter() {
        let at = label_origin(obj, world.size());
        let (x, y) = (at.x.round() as i64, at.y.round() as i64);
        draw_text(&mut image, obj.name(), x, y, NAME_SCALE, NAME_COLOR, Some(NAME_STROKE));
        let class_y = y + (GLYPH_SIZE * NAME_SCALE) as i64;
        draw_text(&mut image, obj.kind().label(), x, class_y, CLASS_SCALE, CLASS_COLOR, None);
    }
    image
}

/// Size of the two-line name/class block in pixels, padding included.
pub fn label_block_size(name: &str, class: &str) -> Vec2 {
    let width = text_width(name, NAME_SCALE).max(text_width(class, CLASS_SCALE));
    let height = (GLYPH_SIZE * (NAME_SCALE + CLASS_SCALE)) as f32;
    Vec2::new(width + LABEL_PAD, height + LABEL_PAD)
}

/// Top-left of an object's label: right of its box, level with the box
/// top, pushed back inside the image when it would spill over an edge.
pub fn label_origin(obj: &CelestialObject, world: Vec2) -> Vec2 {
    let half = obj.screen_box_side(1.0) * 0.5;
    let size = label_block_size(obj.name(), obj.kind().label());
    let mut at = obj.position + Vec2::new(half + LABEL_GAP, -half);
    if at.x + size.x > world.x {
        at.x = world.x - size.x;
    }
    if at.y + size.y > world.y {
        at.y = world.y - size.y;
    }
    at.max(Vec2::ZERO)
}

fn text_width(text: &str, scale: u32) -> f32 {
    (text.chars().count() as u32 * GLYPH_SIZE * scale) as f32
}

fn glyph_for_char(ch: char) -> [u8; 8] {
    let index = ch as usize;
    if index < BASIC_LEGACY.len() {
        BASIC_LEGACY[index]
    } else {
        BASIC_LEGACY[b'?' as usize]
    }
}

/// Stamp `text` with its top-left at `(x, y)`. A stroke is drawn as four
/// one-pixel offset copies under the fill.
fn draw_text(
    image: &mut RgbaImage,
    text: &str,
    x: i64,
    y: i64,
    scale: u32,
    color: [u8; 4],
    stroke: Option<[u8; 4]>,
) {
    if let Some(stroke) = stroke {
        for (dx, dy) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
            draw_glyphs(image, text, x + dx, y + dy, scale, stroke);
        }
    }
    draw_glyphs(image, text, x, y, scale, color);
}

fn draw_glyphs(image: &mut RgbaImage, text: &str, x: i64, y: i64, scale: u32, color: [u8; 4]) {
    let advance = (GLYPH_SIZE * scale) as i64;
    let scale = scale as i64;
    for (col, ch) in text.chars().enumerate() {
        let glyph = glyph_for_char(ch);
        let glyph_x = x + col as i64 * advance;
        for (row, bits) in glyph.iter().enumerate() {
            for bit in 0..GLYPH_SIZE as i64 {
                if (bits >> bit) & 0x01 == 0 {
                    continue;
                }
                let px = glyph_x + bit * scale;
                let py = y + row as i64 * scale;
                for sy in 0..scale {
                    for sx in 0..scale {
                        blend_pixel(image, px + sx, py + sy, color);
                    }
                }
            }
        }
    }
}

fn blend_pixel(image: &mut RgbaImage, x: i64, y: i64, color: [u8; 4]) {
    if x < 0 || y < 0 || x >= image.width() as i64 || y >= image.height() as i64 {
        return;
    }
    let dst = image.get_pixel_mut(x as u32, y as u32);
    let a = color[3] as f32 / 255.0;
    for c in 0..3 {
        dst.0[c] = (color[c] as f32 * a + dst.0[c] as f32 * (1.0 - a)).round() as u8;
    }
    dst.0[3] = dst.0[3].max(color[3]);
}

/// Write the PNG and its legend. The legend path is `path` with a `.json`
/// extension.
pub fn export_world(raster: &Raster, world: &World, path: &Path) -> Result<ExportSummary, ExportError> {
    let image = render_export(raster, world);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    image.save_with_format(path, ImageFormat::Png)?;

    let entries = legend(world);
    let legend_path = path.with_extension("json");
    fs::write(&legend_path, serde_json::to_string_pretty(&entries)?)?;

    log::info!(
        "Exported {}x{} world with {} objects to {}",
        image.width(),
        image.height(),
        entries.len(),
        path.display()
    );
    Ok(ExportSummary {
        image_path: path.to_path_buf(),
        legend_path,
        objects: entries.len(),
    })
}

impl CanvasController {
    /// Export to the configured path.
    pub fn export(&self) -> Result<ExportSummary, ExportError> {
        self.export_to(&self.config().export_path)
    }

    pub fn export_to(&self, path: impl AsRef<Path>) -> Result<ExportSummary, ExportError> {
        export_world(self.compositor().raster(), self.world(), path.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CanvasConfig;

    fn canvas() -> CanvasController {
        let config = CanvasConfig::default()
            .with_seed(11)
            .with_star_count(30)
            .with_initial_population(1, 1, 1);
        CanvasController::new(100, 80, config).unwrap()
    }

    #[test]
    fn test_legend_lists_every_object() {
        let mut canvas = canvas();
        canvas.add_quasar(10.0, 20.0);
        let entries = legend(canvas.world());
        assert_eq!(entries.len(), 4);
        let quasar = entries.iter().find(|e| e.kind == ObjectKind::Quasar).unwrap();
        assert_eq!((quasar.x, quasar.y), (10.0, 20.0));
        assert_eq!(quasar.label, "Quasar");
    }

    #[test]
    fn test_labels_drawn_beside_objects() {
        let config = CanvasConfig::default()
            .with_seed(12)
            .with_star_count(0)
            .with_initial_population(0, 0, 0);
        let mut canvas = CanvasController::new(400, 300, config).unwrap();
        let id = canvas.add_pulsar(150.0, 200.0);
        let obj = canvas.get(id).unwrap();

        let raster = canvas.compositor().raster();
        let image = render_export(raster, canvas.world());
        let at = label_origin(obj, canvas.world().size());
        let size = label_block_size(obj.name(), obj.kind().label());

        let mut changed = 0;
        let mut white = 0;
        for (x, y, px) in image.enumerate_pixels() {
            if px == raster.image().get_pixel(x, y) {
                continue;
            }
            changed += 1;
            white += (px.0[..3] == [255, 255, 255]) as usize;
            let p = Vec2::new(x as f32, y as f32);
            // Only the label block (plus its one-pixel stroke) changes
            assert!(p.x >= at.x - 2.0 && p.x <= at.x + size.x + 1.0, "stray pixel at {:?}", p);
            assert!(p.y >= at.y - 2.0 && p.y <= at.y + size.y + 1.0, "stray pixel at {:?}", p);
        }
        assert!(changed > 0);
        assert!(white > 0);
        assert!(at.x > obj.position.x);
    }

    #[test]
    fn test_label_kept_inside_image() {
        let mut canvas = canvas();
        let world = canvas.world().size();
        for pos in [Vec2::new(world.x - 2.0, world.y - 2.0), Vec2::new(1.0, 1.0)] {
            let id = canvas.add_galaxy(pos.x, pos.y);
            let obj = canvas.get(id).unwrap();
            let at = label_origin(obj, world);
            let size = label_block_size(obj.name(), obj.kind().label());
            assert!(at.x >= 0.0 && at.y >= 0.0);
            assert!(at.x + size.x <= world.x + 1e-3);
            assert!(at.y + size.y <= world.y + 1e-3);
        }
    }

    #[test]
    fn test_glyph_fallback() {
        assert_eq!(glyph_for_char('é'), glyph_for_char('?'));
        assert_ne!(glyph_for_char('A'), [0; 8]);
        assert_eq!(glyph_for_char(' '), [0; 8]);
    }

    #[test]
    fn test_export_writes_files() {
        let canvas = canvas();
        let dir = std::env::temp_dir().join(format!("pointzero-export-{}", std::process::id()));
        let summary = canvas.export_to(dir.join("map.png")).unwrap();
        assert_eq!(summary.objects, 3);

        let decoded = image::open(&summary.image_path).unwrap();
        assert_eq!(decoded.width(), canvas.world().width());
        let json = fs::read_to_string(&summary.legend_path).unwrap();
        let entries: Vec<LegendEntry> = serde_json::from_str(&json).unwrap();
        assert_eq!(entries, legend(canvas.world()));
        let _ = fs::remove_dir_all(&dir);
    }
}
