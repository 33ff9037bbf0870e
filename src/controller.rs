//! The command surface of the canvas.
//!
//! [`CanvasController`] owns the world, the compositor buffer, the viewport
//! and the selection/hover state. Every mutation goes through one of its
//! methods; the windowed app, the egui overlay, demos and tests all drive
//! the canvas through the same calls. Nothing here needs a GPU.
//!
//! Structural changes (create, delete, cycle, resize) repaint the buffer
//! synchronously before returning. [`CanvasController::frame`] never
//! repaints; it advances panning and animations and describes what to draw.

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::compositor::{Compositor, RedrawStats};
use crate::config::CanvasConfig;
use crate::cycle;
use crate::error::CanvasError;
use crate::generate::generate;
use crate::object::{CelestialObject, ObjectId, ObjectKind};
use crate::selection::{layout_outline, Hover, Outline, Selection, SelectionPhase};
use crate::viewport::{Blit, ViewLimits, ViewportState, ZoomBar};
use crate::world::World;

/// Approximate label metrics used for on-screen clamping.
const LABEL_CHAR_WIDTH: f32 = 9.0;
const LABEL_NAME_HEIGHT: f32 = 14.0 * 1.27;
const LABEL_CLASS_HEIGHT: f32 = 14.0;

/// A property cycle on one object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Size,
    Density,
    Hue,
}

/// Outline and label for one highlighted object.
#[derive(Debug, Clone, PartialEq)]
pub struct Highlight {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub name: String,
    pub outline: Outline,
    /// Whether the name and class label should be drawn.
    pub show_label: bool,
}

impl Highlight {
    pub fn class_label(&self) -> &'static str {
        self.kind.label()
    }
}

/// Everything needed to present one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    /// Buffer-to-screen copies, at most one per visible world tile.
    pub blits: Vec<Blit>,
    /// Bumps whenever the buffer content changed.
    pub generation: u64,
    pub offset: Vec2,
    pub zoom: f32,
    pub zoom_bar: ZoomBar,
    pub zoom_bar_fraction: f32,
    pub selection: Option<Highlight>,
    pub hover: Option<Highlight>,
    /// Longitude/latitude under the pointer.
    pub pointer_geo: (f32, f32),
}

pub struct CanvasController {
    config: CanvasConfig,
    screen: (u32, u32),
    world: World,
    compositor: Compositor,
    viewport: ViewportState,
    selection: Selection,
    hover: Hover,
    dragging_zoom_bar: bool,
    pointer: Vec2,
    now_ms: f64,
    rng: SmallRng,
}

impl CanvasController {
    /// Build a canvas for a `width x height` viewport, seed the startup
    /// population and paint the buffer once.
    pub fn new(width: u32, height: u32, config: CanvasConfig) -> Result<Self, CanvasError> {
        config.validate()?;
        if width == 0 || height == 0 {
            return Err(CanvasError::InvalidViewport { width, height });
        }
        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let (world_w, world_h) = config.world_size_for(width, height);
        if (world_w, world_h) != (width.saturating_mul(config.world_multiple), height.saturating_mul(config.world_multiple)) {
            log::warn!(
                "World clamped to {}x{} (max dimension {})",
                world_w,
                world_h,
                config.max_world_dimension
            );
        }

        let world = World::new(world_w, world_h, config.star_count, &mut rng);
        let compositor = Compositor::new(world_w, world_h, config.background)?;
        let viewport = ViewportState::new(
            Vec2::new(width as f32, height as f32),
            world.size(),
            ViewLimits::from(&config),
        );
        let selection = Selection::new(config.label_anim_ms);

        let mut controller = Self {
            screen: (width, height),
            world,
            compositor,
            viewport,
            selection,
            hover: Hover::default(),
            dragging_zoom_bar: false,
            pointer: Vec2::new(width as f32, height as f32) * 0.5,
            now_ms: 0.0,
            rng,
            config,
        };
        controller.populate();
        controller.redraw();
        log::info!(
            "Canvas ready: viewport {}x{}, world {}x{}, {} objects",
            width,
            height,
            world_w,
            world_h,
            controller.world.len()
        );
        Ok(controller)
    }

    fn populate(&mut self) {
        let population = [
            (ObjectKind::Nebula, self.config.initial_nebulae),
            (ObjectKind::Galaxy, self.config.initial_galaxies),
            (ObjectKind::BlackHole, self.config.initial_black_holes),
        ];
        let size = self.world.size();
        for (kind, count) in population {
            for _ in 0..count {
                let pos = Vec2::new(
                    self.rng.gen_range(0.0..size.x),
                    self.rng.gen_range(0.0..size.y),
                );
                self.add(kind, pos, false);
            }
        }
    }

    #[inline]
    fn min_dim(&self) -> f32 {
        self.screen.0.min(self.screen.1) as f32
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn screen_size(&self) -> (u32, u32) {
        self.screen
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Advance the controller clock without producing a frame.
    pub fn set_time(&mut self, now_ms: f64) {
        self.now_ms = now_ms;
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    /// All objects in hit-test priority order.
    pub fn objects(&self) -> impl Iterator<Item = &CelestialObject> {
        self.world.iter()
    }

    pub fn get(&self, id: ObjectId) -> Option<&CelestialObject> {
        self.world.get(id)
    }

    /// Currently selected object, including one that is animating out.
    pub fn selected(&self) -> Option<&CelestialObject> {
        self.selection
            .selected_at(self.now_ms)
            .and_then(|id| self.world.get(id))
    }

    pub fn selection_phase(&self) -> SelectionPhase {
        self.selection.phase(self.now_ms)
    }

    /// Repaint the whole buffer.
    pub fn redraw(&mut self) -> RedrawStats {
        self.compositor.redraw(&self.world, &mut self.rng)
    }

    /// Create an object of `kind` at a world position (wrapped).
    pub fn add(&mut self, kind: ObjectKind, position: Vec2, redraw: bool) -> ObjectId {
        let id = self.world.allocate_id();
        let position = self.world.wrap(position);
        let obj = generate(kind, id, position, self.min_dim(), &mut self.rng);
        log::debug!(
            "Added {} '{}' at ({:.0}, {:.0}) r={:.1}",
            kind,
            obj.name(),
            position.x,
            position.y,
            obj.radius
        );
        self.world.insert(obj);
        if redraw {
            self.redraw();
        }
        id
    }

    pub fn add_nebula(&mut self, x: f32, y: f32) -> ObjectId {
        self.add(ObjectKind::Nebula, Vec2::new(x, y), true)
    }

    pub fn add_galaxy(&mut self, x: f32, y: f32) -> ObjectId {
        self.add(ObjectKind::Galaxy, Vec2::new(x, y), true)
    }

    pub fn add_black_hole(&mut self, x: f32, y: f32) -> ObjectId {
        self.add(ObjectKind::BlackHole, Vec2::new(x, y), true)
    }

    pub fn add_star_cluster(&mut self, x: f32, y: f32) -> ObjectId {
        self.add(ObjectKind::StarCluster, Vec2::new(x, y), true)
    }

    pub fn add_pulsar(&mut self, x: f32, y: f32) -> ObjectId {
        self.add(ObjectKind::Pulsar, Vec2::new(x, y), true)
    }

    pub fn add_quasar(&mut self, x: f32, y: f32) -> ObjectId {
        self.add(ObjectKind::Quasar, Vec2::new(x, y), true)
    }

    /// Create under a screen position.
    pub fn add_at_pointer(&mut self, kind: ObjectKind, pointer: Vec2) -> ObjectId {
        let pos = self.viewport.screen_to_world(pointer);
        self.add(kind, pos, true)
    }

    /// Create at the world point under the screen centre.
    pub fn add_at_centre(&mut self, kind: ObjectKind) -> ObjectId {
        let pos = self.viewport.offset();
        self.add(kind, pos, true)
    }

    /// Apply a property cycle to one object. Repaints when something changed.
    pub fn mutate(&mut self, id: ObjectId, mutation: Mutation) -> bool {
        let min_dim = self.min_dim();
        let Some(obj) = self.world.get_mut(id) else {
            return false;
        };
        let changed = match mutation {
            Mutation::Size => cycle::cycle_size(obj, min_dim),
            Mutation::Density => cycle::cycle_density(obj, min_dim, &mut self.rng),
            Mutation::Hue => cycle::cycle_hue(obj),
        };
        if changed {
            self.redraw();
        }
        changed
    }

    pub fn cycle_size(&mut self, id: ObjectId) -> bool {
        self.mutate(id, Mutation::Size)
    }

    pub fn cycle_density(&mut self, id: ObjectId) -> bool {
        self.mutate(id, Mutation::Density)
    }

    pub fn cycle_hue(&mut self, id: ObjectId) -> bool {
        self.mutate(id, Mutation::Hue)
    }

    /// Apply a property cycle to the selection, if any.
    pub fn mutate_selected(&mut self, mutation: Mutation) -> bool {
        match self.selection.selected_at(self.now_ms) {
            Some(id) => self.mutate(id, mutation),
            None => false,
        }
    }

    /// Remove the selected object. A no-op without a selection.
    pub fn delete_selected(&mut self) -> Option<CelestialObject> {
        let id = self.selection.selected_at(self.now_ms)?;
        self.selection.forget(id);
        let removed = self.world.remove(id)?;
        if self.hover.target() == Some(id) {
            self.hover.clear();
        }
        log::debug!("Deleted {} '{}'", removed.kind(), removed.name());
        self.redraw();
        Some(removed)
    }

    /// Empty every collection, scatter new stars and recentre.
    pub fn delete_all(&mut self) {
        let count = self.world.len();
        self.world.clear(&mut self.rng);
        self.selection.clear();
        self.hover.clear();
        self.viewport.recenter();
        self.redraw();
        log::info!("Canvas restarted, removed {} objects", count);
    }

    /// First object, in priority order, whose screen box contains `point`.
    pub fn object_at_screen_point(&self, point: Vec2) -> Option<&CelestialObject> {
        let zoom = self.viewport.zoom();
        self.world.iter().find(|obj| {
            let centre = self.viewport.world_to_screen(obj.position);
            let half = obj.screen_box_side(zoom) * 0.5;
            let d = (point - centre).abs();
            d.x <= half && d.y <= half
        })
    }

    /// Press: grab the zoom bar, or start a drag and select/release.
    pub fn pointer_down(&mut self, point: Vec2, now_ms: f64) {
        self.now_ms = now_ms;
        self.pointer = point;
        let bar = self.viewport.zoom_bar();
        if bar.contains(point) {
            self.dragging_zoom_bar = true;
            self.viewport.zoom_from_bar(bar.fraction_at(point.y));
            return;
        }
        self.viewport.begin_drag(point);
        match self.object_at_screen_point(point).map(|o| o.id()) {
            Some(id) => self.selection.select(id, now_ms),
            None => self.selection.release(now_ms),
        }
    }

    pub fn pointer_move(&mut self, point: Vec2) {
        self.pointer = point;
        if self.dragging_zoom_bar {
            let bar = self.viewport.zoom_bar();
            self.viewport.zoom_from_bar(bar.fraction_at(point.y));
        } else {
            self.viewport.drag_to(point);
        }
    }

    pub fn pointer_up(&mut self) {
        self.dragging_zoom_bar = false;
        self.viewport.end_drag();
    }

    pub fn is_dragging_zoom_bar(&self) -> bool {
        self.dragging_zoom_bar
    }

    /// Held pan direction, each axis in `{-1, 0, 1}`.
    pub fn set_key_pan(&mut self, direction: Vec2) {
        self.viewport.set_key_pan(direction);
    }

    pub fn step_zoom(&mut self, steps: f32) -> f32 {
        self.viewport.step_zoom(steps)
    }

    pub fn set_zoom(&mut self, zoom: f32) -> f32 {
        self.viewport.set_zoom(zoom)
    }

    pub fn zoom_from_bar(&mut self, fraction: f32) -> f32 {
        self.viewport.zoom_from_bar(fraction)
    }

    pub fn set_offset(&mut self, offset: Vec2) {
        self.viewport.set_offset(offset);
    }

    pub fn recenter(&mut self) {
        self.viewport.recenter();
    }

    /// Follow a viewport resize: rescale the world, reallocate and repaint.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), CanvasError> {
        if width == 0 || height == 0 {
            return Err(CanvasError::InvalidViewport { width, height });
        }
        if (width, height) == self.screen {
            return Ok(());
        }
        let (world_w, world_h) = self.config.world_size_for(width, height);
        self.compositor.resize(world_w, world_h)?;
        self.world.rescale(world_w, world_h);
        self.screen = (width, height);
        self.viewport.resize(
            Vec2::new(width as f32, height as f32),
            self.world.size(),
        );
        self.redraw();
        log::info!(
            "Viewport resized to {}x{}, world {}x{}",
            width,
            height,
            world_w,
            world_h
        );
        Ok(())
    }

    /// Advance panning and animations to `now_ms` and describe the frame.
    pub fn frame(&mut self, now_ms: f64) -> FramePlan {
        self.now_ms = now_ms;
        self.selection.update(now_ms);
        self.viewport.update();

        let hovered = self.object_at_screen_point(self.pointer).map(|o| o.id());
        self.hover.update(hovered, now_ms);

        let phase = self.selection.phase(now_ms);
        let selection = phase
            .target()
            .and_then(|id| self.highlight(id, phase.progress(), phase.shows_label()));

        let hover = match self.hover.target() {
            Some(id) if Some(id) != phase.target() => {
                let progress = self.hover.progress(now_ms, self.selection.duration_ms());
                self.highlight(id, progress, true)
            }
            _ => None,
        };

        FramePlan {
            blits: self.viewport.blits(),
            generation: self.compositor.generation(),
            offset: self.viewport.offset(),
            zoom: self.viewport.zoom(),
            zoom_bar: self.viewport.zoom_bar(),
            zoom_bar_fraction: self.viewport.bar_fraction(),
            selection,
            hover,
            pointer_geo: self
                .viewport
                .world_to_geo(self.viewport.screen_to_world(self.pointer)),
        }
    }

    fn highlight(&self, id: ObjectId, progress: f32, show_label: bool) -> Option<Highlight> {
        let obj = self.world.get(id)?;
        let centre = self.viewport.world_to_screen(obj.position);
        let side = obj.screen_box_side(self.viewport.zoom());
        let label_size = label_size(obj.name(), obj.kind().label());
        let outline = layout_outline(centre, side, progress, label_size, self.viewport.screen_size());
        Some(Highlight {
            id,
            kind: obj.kind(),
            name: obj.name().to_owned(),
            outline,
            show_label,
        })
    }
}

/// Estimated size of a two-line name/class label block.
pub fn label_size(name: &str, class: &str) -> Vec2 {
    let chars = name.chars().count().max(class.chars().count()) as f32;
    Vec2::new(
        chars * LABEL_CHAR_WIDTH + 8.0,
        LABEL_NAME_HEIGHT + LABEL_CLASS_HEIGHT + 8.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    fn empty() -> CanvasController {
        let config = CanvasConfig::default()
            .with_seed(3)
            .with_star_count(20)
            .with_initial_population(0, 0, 0);
        CanvasController::new(200, 150, config).unwrap()
    }

    #[test]
    fn test_startup_population() {
        let config = CanvasConfig::default().with_seed(1).with_star_count(50);
        let canvas = CanvasController::new(200, 150, config).unwrap();
        assert_eq!(canvas.world().count(ObjectKind::Nebula), 3);
        assert_eq!(canvas.world().count(ObjectKind::Galaxy), 3);
        assert_eq!(canvas.world().count(ObjectKind::BlackHole), 2);
        assert_eq!(canvas.compositor().generation(), 1);
        assert_eq!(canvas.world().width(), 1200);
    }

    #[test]
    fn test_zero_viewport_rejected() {
        let err = CanvasController::new(0, 100, CanvasConfig::default()).err();
        assert!(matches!(err, Some(CanvasError::InvalidViewport { width: 0, height: 100 })));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let inverted = CanvasConfig::default().with_zoom_range(3.0, 2.0);
        let err = CanvasController::new(200, 150, inverted).err();
        assert!(matches!(err, Some(CanvasError::Config(ConfigError::Invalid(_)))));

        let mut nan = CanvasConfig::default();
        nan.max_zoom = f32::NAN;
        assert!(matches!(
            CanvasController::new(200, 150, nan),
            Err(CanvasError::Config(_))
        ));
    }

    #[test]
    fn test_add_at_pointer_maps_through_zoom() {
        let mut canvas = empty();
        canvas.set_zoom(2.0);
        let id = canvas.add_at_pointer(ObjectKind::Pulsar, Vec2::new(150.0, 75.0));
        let obj = canvas.get(id).unwrap();
        assert_eq!(obj.position, Vec2::new(625.0, 450.0));
    }

    #[test]
    fn test_frame_reports_highlight() {
        let mut canvas = empty();
        let id = canvas.add_at_centre(ObjectKind::StarCluster);
        canvas.pointer_down(Vec2::new(100.0, 75.0), 0.0);
        canvas.pointer_up();
        let plan = canvas.frame(100.0);
        let sel = plan.selection.unwrap();
        assert_eq!(sel.id, id);
        assert!(!sel.show_label);
        assert!(plan.hover.is_none());
        let plan = canvas.frame(250.0);
        assert!(plan.selection.unwrap().show_label);
    }

    #[test]
    fn test_hover_distinct_from_selection() {
        let mut canvas = empty();
        let a = canvas.add(ObjectKind::StarCluster, Vec2::new(560.0, 450.0), false);
        let b = canvas.add(ObjectKind::StarCluster, Vec2::new(640.0, 450.0), true);
        canvas.pointer_down(Vec2::new(60.0, 75.0), 0.0);
        canvas.pointer_up();
        canvas.pointer_move(Vec2::new(140.0, 75.0));
        let plan = canvas.frame(300.0);
        assert_eq!(plan.selection.map(|h| h.id), Some(a));
        assert_eq!(plan.hover.map(|h| h.id), Some(b));
    }

    #[test]
    fn test_zoom_bar_drag() {
        let mut canvas = empty();
        let bar = canvas.viewport().zoom_bar();
        canvas.pointer_down(Vec2::new(bar.x, bar.top), 0.0);
        assert!(canvas.is_dragging_zoom_bar());
        assert_eq!(canvas.viewport().zoom(), 0.2);
        canvas.pointer_move(Vec2::new(bar.x - 40.0, bar.top + bar.height));
        assert_eq!(canvas.viewport().zoom(), 5.0);
        canvas.pointer_up();
        assert!(!canvas.is_dragging_zoom_bar());
        assert!(!canvas.viewport().is_dragging());
    }

    #[test]
    fn test_delete_selected_drops_selection() {
        let mut canvas = empty();
        let id = canvas.add_at_centre(ObjectKind::Pulsar);
        canvas.pointer_down(Vec2::new(100.0, 75.0), 0.0);
        canvas.pointer_up();
        canvas.pointer_move(Vec2::new(100.0, 75.0));
        canvas.frame(300.0);
        assert_eq!(canvas.selection_phase(), SelectionPhase::Selected(id));

        let removed = canvas.delete_selected().unwrap();
        assert_eq!(removed.id(), id);
        assert!(canvas.get(id).is_none());
        assert_eq!(canvas.selection_phase(), SelectionPhase::Unselected);
        let plan = canvas.frame(320.0);
        assert!(plan.selection.is_none());
        assert!(plan.hover.is_none());
        assert!(canvas.delete_selected().is_none());
    }

    #[test]
    fn test_mutate_missing_object() {
        let mut canvas = empty();
        assert!(!canvas.cycle_size(ObjectId(999)));
        assert!(!canvas.mutate_selected(Mutation::Hue));
    }

    #[test]
    fn test_label_size() {
        let size = label_size("Zeta Cloud", "Nebula");
        assert_eq!(size.x, 10.0 * LABEL_CHAR_WIDTH + 8.0);
    }
}
