//! Pan/zoom camera over the toroidal world.
//!
//! The viewport never moves world positions. It keeps an `offset` (the world
//! point under the screen centre) and a `zoom` scale, and turns those into a
//! handful of [`Blit`] rectangles that copy the offscreen buffer onto the
//! screen. Offsets always live in `[0, world)` on both axes; the blit plan
//! repeats the buffer wherever the screen would otherwise see past an edge.
//!
//! Panning has two independent sources that sum every frame:
//!
//! - key-held panning, a constant step per frame in the held direction
//! - momentum, seeded from the smoothed drag delta on release and decayed
//!   geometrically until it drops below an epsilon

use glam::Vec2;
use image::{Rgba, RgbaImage};

use crate::config::CanvasConfig;
use crate::raster::Raster;
use crate::world::{wrap_point, wrap_scalar};

/// Tunables copied out of [`CanvasConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewLimits {
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub zoom_step: f32,
    pub pan_step: f32,
    pub pan_friction: f32,
    pub pan_epsilon: f32,
    pub max_pan_velocity: f32,
    pub drag_smoothing: f32,
}

impl Default for ViewLimits {
    fn default() -> Self {
        Self::from(&CanvasConfig::default())
    }
}

impl From<&CanvasConfig> for ViewLimits {
    fn from(config: &CanvasConfig) -> Self {
        Self {
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            zoom_step: config.zoom_step,
            pan_step: config.pan_step,
            pan_friction: config.pan_friction,
            pan_epsilon: config.pan_epsilon,
            max_pan_velocity: config.max_pan_velocity,
            drag_smoothing: config.drag_smoothing,
        }
    }
}

/// Pointer-drag state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PanState {
    #[default]
    Idle,
    Dragging {
        /// Pointer position at the previous drag event, screen pixels.
        last: Vec2,
        /// Exponentially smoothed world-space delta, becomes momentum on release.
        smoothed: Vec2,
    },
}

/// One copy of the world buffer onto the screen.
///
/// `src_*` are buffer pixels, `dst_*` are screen pixels; both rectangles
/// are already clipped, so `dst` lies inside the screen and `src` inside
/// the buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blit {
    pub src_min: Vec2,
    pub src_max: Vec2,
    pub dst_min: Vec2,
    pub dst_max: Vec2,
}

impl Blit {
    pub fn dst_size(&self) -> Vec2 {
        self.dst_max - self.dst_min
    }

    pub fn src_size(&self) -> Vec2 {
        self.src_max - self.src_min
    }
}

/// Zoom indicator geometry on the right edge of the screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomBar {
    pub x: f32,
    pub top: f32,
    pub height: f32,
}

impl ZoomBar {
    /// Half-width of the grab area around the bar line.
    pub const GRAB: f32 = 12.0;

    pub fn for_screen(screen: Vec2) -> Self {
        let height = (0.32 * screen.y).clamp(120.0, 220.0);
        Self {
            x: screen.x - 24.0,
            top: (screen.y - height) / 2.0,
            height,
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        (p.x - self.x).abs() <= Self::GRAB && p.y >= self.top && p.y <= self.top + self.height
    }

    /// Fraction along the bar for a screen y, clamped to `[0, 1]`.
    pub fn fraction_at(&self, y: f32) -> f32 {
        ((y - self.top) / self.height).clamp(0.0, 1.0)
    }

    pub fn y_at(&self, fraction: f32) -> f32 {
        self.top + fraction.clamp(0.0, 1.0) * self.height
    }
}

#[derive(Debug, Clone)]
pub struct ViewportState {
    screen: Vec2,
    world: Vec2,
    offset: Vec2,
    zoom: f32,
    velocity: Vec2,
    pan: PanState,
    key_pan: Vec2,
    limits: ViewLimits,
}

impl ViewportState {
    /// A viewport centred on the world at zoom 1 (clamped into range).
    pub fn new(screen: Vec2, world: Vec2, limits: ViewLimits) -> Self {
        Self {
            screen,
            world,
            offset: world * 0.5,
            zoom: 1.0f32.clamp(limits.min_zoom, limits.max_zoom),
            velocity: Vec2::ZERO,
            pan: PanState::Idle,
            key_pan: Vec2::ZERO,
            limits,
        }
    }

    #[inline]
    pub fn screen_size(&self) -> Vec2 {
        self.screen
    }

    #[inline]
    pub fn world_size(&self) -> Vec2 {
        self.world
    }

    #[inline]
    pub fn screen_centre(&self) -> Vec2 {
        self.screen * 0.5
    }

    #[inline]
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    #[inline]
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    #[inline]
    pub fn pan_state(&self) -> PanState {
        self.pan
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.pan, PanState::Dragging { .. })
    }

    pub fn limits(&self) -> &ViewLimits {
        &self.limits
    }

    /// Move the centre to `offset`, wrapped into world space.
    pub fn set_offset(&mut self, offset: Vec2) {
        self.offset = wrap_point(offset, self.world);
    }

    /// Jump back to the world centre and drop any momentum.
    pub fn recenter(&mut self) {
        self.offset = self.world * 0.5;
        self.velocity = Vec2::ZERO;
    }

    /// Set the zoom, clamped to the configured range. Returns the applied value.
    pub fn set_zoom(&mut self, zoom: f32) -> f32 {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(self.limits.min_zoom, self.limits.max_zoom);
        }
        self.zoom
    }

    /// Step zoom in (`steps > 0`) or out by the configured increment.
    pub fn step_zoom(&mut self, steps: f32) -> f32 {
        self.set_zoom(self.zoom + steps * self.limits.zoom_step)
    }

    /// Linear map from the zoom bar (`0` at the top) onto the zoom range.
    pub fn zoom_from_bar(&mut self, fraction: f32) -> f32 {
        let t = fraction.clamp(0.0, 1.0);
        self.set_zoom(self.limits.min_zoom + t * (self.limits.max_zoom - self.limits.min_zoom))
    }

    /// Inverse of [`ViewportState::zoom_from_bar`].
    pub fn bar_fraction(&self) -> f32 {
        let span = self.limits.max_zoom - self.limits.min_zoom;
        if span <= 0.0 {
            return 0.0;
        }
        (self.zoom - self.limits.min_zoom) / span
    }

    pub fn zoom_bar(&self) -> ZoomBar {
        ZoomBar::for_screen(self.screen)
    }

    /// Replace screen and world sizes. The offset is recentred.
    pub fn resize(&mut self, screen: Vec2, world: Vec2) {
        self.screen = screen;
        self.world = world;
        self.recenter();
    }

    /// Held direction for key panning; each axis in `{-1, 0, 1}`.
    pub fn set_key_pan(&mut self, direction: Vec2) {
        self.key_pan = direction.clamp(Vec2::splat(-1.0), Vec2::splat(1.0));
    }

    pub fn key_pan(&self) -> Vec2 {
        self.key_pan
    }

    pub fn begin_drag(&mut self, pointer: Vec2) {
        self.velocity = Vec2::ZERO;
        self.pan = PanState::Dragging {
            last: pointer,
            smoothed: Vec2::ZERO,
        };
    }

    /// Follow the pointer. The grabbed world point stays under the cursor.
    pub fn drag_to(&mut self, pointer: Vec2) {
        let PanState::Dragging { last, smoothed } = self.pan else {
            return;
        };
        let delta = (pointer - last) / self.zoom;
        self.set_offset(self.offset - delta);
        let k = self.limits.drag_smoothing;
        self.pan = PanState::Dragging {
            last: pointer,
            smoothed: smoothed * k - delta * (1.0 - k),
        };
    }

    /// Release the drag; the smoothed delta becomes momentum.
    pub fn end_drag(&mut self) {
        if let PanState::Dragging { smoothed, .. } = self.pan {
            self.velocity = self.clamp_velocity(smoothed);
        }
        self.pan = PanState::Idle;
    }

    /// Advance one frame of key panning and momentum.
    pub fn update(&mut self) {
        let mut offset = self.offset + self.key_pan * self.limits.pan_step;
        offset += self.velocity;
        self.velocity = self.clamp_velocity(self.velocity * self.limits.pan_friction);
        if self.velocity.x.abs() < self.limits.pan_epsilon {
            self.velocity.x = 0.0;
        }
        if self.velocity.y.abs() < self.limits.pan_epsilon {
            self.velocity.y = 0.0;
        }
        self.set_offset(offset);
    }

    fn clamp_velocity(&self, v: Vec2) -> Vec2 {
        let max = Vec2::splat(self.limits.max_pan_velocity);
        v.clamp(-max, max)
    }

    /// Screen position of the nearest toroidal image of `p`.
    pub fn world_to_screen(&self, p: Vec2) -> Vec2 {
        let d = p - self.offset;
        let d = Vec2::new(nearest(d.x, self.world.x), nearest(d.y, self.world.y));
        d * self.zoom + self.screen_centre()
    }

    /// World point under a screen position, wrapped into world space.
    pub fn screen_to_world(&self, s: Vec2) -> Vec2 {
        wrap_point(self.offset + (s - self.screen_centre()) / self.zoom, self.world)
    }

    /// Longitude in `[-180, 180]` and latitude in `[90, -90]` for a world point.
    pub fn world_to_geo(&self, p: Vec2) -> (f32, f32) {
        let p = wrap_point(p, self.world);
        let lon = -180.0 + 360.0 * p.x / self.world.x.max(1.0);
        let lat = 90.0 - 180.0 * p.y / self.world.y.max(1.0);
        (lon, lat)
    }

    /// Clipped copies of the world buffer that together cover the screen.
    pub fn blits(&self) -> Vec<Blit> {
        let xs = axis_spans(self.offset.x, self.zoom, self.screen.x, self.world.x);
        let ys = axis_spans(self.offset.y, self.zoom, self.screen.y, self.world.y);
        let mut blits = Vec::with_capacity(xs.len() * ys.len());
        for &(sy0, sy1, dy0, dy1) in &ys {
            for &(sx0, sx1, dx0, dx1) in &xs {
                blits.push(Blit {
                    src_min: Vec2::new(sx0, sy0),
                    src_max: Vec2::new(sx1, sy1),
                    dst_min: Vec2::new(dx0, dy0),
                    dst_max: Vec2::new(dx1, dy1),
                });
            }
        }
        blits
    }

    /// Nearest-neighbour CPU rendering of the current view through
    /// [`ViewportState::blits`]. Used headless and by tests.
    pub fn render_view(&self, raster: &Raster, background: [u8; 3]) -> RgbaImage {
        let w = self.screen.x.max(0.0) as u32;
        let h = self.screen.y.max(0.0) as u32;
        let [r, g, b] = background;
        let mut out = RgbaImage::from_pixel(w, h, Rgba([r, g, b, 255]));
        for blit in self.blits() {
            let scale = blit.src_size() / blit.dst_size();
            let x0 = blit.dst_min.x.round() as u32;
            let x1 = (blit.dst_max.x.round() as u32).min(w);
            let y0 = blit.dst_min.y.round() as u32;
            let y1 = (blit.dst_max.y.round() as u32).min(h);
            for y in y0..y1 {
                for x in x0..x1 {
                    let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                    let s = blit.src_min + (d - blit.dst_min) * scale;
                    let px = raster.pixel(s.x.floor() as i64, s.y.floor() as i64);
                    out.put_pixel(x, y, Rgba(px));
                }
            }
        }
        out
    }
}

/// Signed distance of `d` folded into `[-size/2, size/2)`.
fn nearest(d: f32, size: f32) -> f32 {
    if size <= 0.0 {
        return d;
    }
    wrap_scalar(d + size * 0.5, size) - size * 0.5
}

/// `(src0, src1, dst0, dst1)` for every buffer copy along one axis.
fn axis_spans(offset: f32, zoom: f32, screen: f32, world: f32) -> Vec<(f32, f32, f32, f32)> {
    if world <= 0.0 || screen <= 0.0 || zoom <= 0.0 {
        return Vec::new();
    }
    let centre = screen * 0.5;
    let left = offset - centre / zoom;
    let right = offset + (screen - centre) / zoom;
    let first = (left / world).floor() as i64;
    let last = (right / world).ceil() as i64;
    let mut spans = Vec::new();
    for k in first..last {
        let origin = (k as f32 * world - offset) * zoom + centre;
        let dst0 = origin.max(0.0);
        let dst1 = (origin + world * zoom).min(screen);
        if dst1 - dst0 <= 1e-3 {
            continue;
        }
        spans.push((
            (dst0 - origin) / zoom,
            (dst1 - origin) / zoom,
            dst0,
            dst1,
        ));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> ViewportState {
        ViewportState::new(
            Vec2::new(200.0, 150.0),
            Vec2::new(1200.0, 900.0),
            ViewLimits::default(),
        )
    }

    fn covered_area(blits: &[Blit]) -> f32 {
        blits.iter().map(|b| b.dst_size().x * b.dst_size().y).sum()
    }

    #[test]
    fn test_starts_centred() {
        let vp = viewport();
        assert_eq!(vp.offset(), Vec2::new(600.0, 450.0));
        assert_eq!(vp.zoom(), 1.0);
        assert_eq!(vp.world_to_screen(vp.offset()), vp.screen_centre());
    }

    #[test]
    fn test_zoom_clamped() {
        let mut vp = viewport();
        assert_eq!(vp.set_zoom(99.0), 5.0);
        assert_eq!(vp.set_zoom(-3.0), 0.2);
        assert_eq!(vp.set_zoom(f32::NAN), 0.2);
        vp.set_zoom(1.0);
        let z = vp.step_zoom(1.0);
        assert!((z - 1.08).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_bar_mapping() {
        let mut vp = viewport();
        assert_eq!(vp.zoom_from_bar(0.0), 0.2);
        assert_eq!(vp.zoom_from_bar(1.0), 5.0);
        vp.zoom_from_bar(0.25);
        assert!((vp.bar_fraction() - 0.25).abs() < 1e-5);

        let bar = vp.zoom_bar();
        assert_eq!(bar.height, 120.0);
        assert_eq!(bar.x, 176.0);
        assert!(bar.contains(Vec2::new(176.0, 75.0)));
        assert_eq!(bar.fraction_at(bar.y_at(0.6)), 0.6);
    }

    #[test]
    fn test_offset_always_wrapped() {
        let mut vp = viewport();
        vp.set_key_pan(Vec2::new(1.0, -1.0));
        for _ in 0..500 {
            vp.update();
            let o = vp.offset();
            assert!(o.x >= 0.0 && o.x < 1200.0, "{:?}", o);
            assert!(o.y >= 0.0 && o.y < 900.0, "{:?}", o);
        }
    }

    #[test]
    fn test_drag_then_momentum_decays() {
        let mut vp = viewport();
        vp.begin_drag(Vec2::new(100.0, 100.0));
        for i in 1..=10 {
            vp.drag_to(Vec2::new(100.0 + 10.0 * i as f32, 100.0));
        }
        // Dragging right moves the camera left
        assert!((vp.offset().x - 500.0).abs() < 1e-3);
        vp.end_drag();
        assert!(vp.velocity().x < 0.0);
        assert!(!vp.is_dragging());

        let mut frames = 0;
        while vp.velocity() != Vec2::ZERO {
            vp.update();
            frames += 1;
            assert!(frames < 1000);
        }
        assert!(vp.offset().x < 500.0);
    }

    #[test]
    fn test_velocity_clamped() {
        let mut vp = viewport();
        vp.begin_drag(Vec2::ZERO);
        vp.drag_to(Vec2::new(-50_000.0, 0.0));
        vp.end_drag();
        assert_eq!(vp.velocity().x, 1000.0);
    }

    #[test]
    fn test_key_and_momentum_sum() {
        let mut vp = viewport();
        vp.begin_drag(Vec2::ZERO);
        vp.drag_to(Vec2::new(-100.0, 0.0));
        vp.end_drag();
        let v = vp.velocity().x;
        let before = vp.offset().x;
        vp.set_key_pan(Vec2::new(1.0, 0.0));
        vp.update();
        assert!((vp.offset().x - (before + 30.0 + v)).abs() < 1e-3);
    }

    #[test]
    fn test_screen_world_roundtrip() {
        let mut vp = viewport();
        vp.set_zoom(2.5);
        vp.set_offset(Vec2::new(5.0, 890.0));
        let s = Vec2::new(37.0, 121.0);
        let back = vp.world_to_screen(vp.screen_to_world(s));
        assert!((back - s).length() < 1e-2, "{:?}", back);
    }

    #[test]
    fn test_world_to_screen_uses_nearest_image() {
        let mut vp = viewport();
        vp.set_offset(Vec2::new(1190.0, 450.0));
        // x = 10 sits 20 units right of the camera across the seam
        let s = vp.world_to_screen(Vec2::new(10.0, 450.0));
        assert!((s.x - 120.0).abs() < 1e-3);
    }

    #[test]
    fn test_blits_cover_screen() {
        let mut vp = viewport();
        for (offset, zoom) in [
            (Vec2::new(600.0, 450.0), 1.0),
            (Vec2::new(10.0, 5.0), 1.0),
            (Vec2::new(1195.0, 899.0), 0.2),
            (Vec2::new(0.0, 0.0), 5.0),
        ] {
            vp.set_offset(offset);
            vp.set_zoom(zoom);
            let blits = vp.blits();
            assert!(!blits.is_empty() && blits.len() <= 9);
            assert!((covered_area(&blits) - 200.0 * 150.0).abs() < 1.0);
            for b in &blits {
                assert!(b.src_min.cmpge(Vec2::ZERO).all());
                assert!(b.src_max.cmple(Vec2::new(1200.0, 900.0) + 1e-3).all());
            }
        }
    }

    #[test]
    fn test_single_blit_away_from_edges() {
        let vp = viewport();
        let blits = vp.blits();
        assert_eq!(blits.len(), 1);
        assert_eq!(blits[0].src_min, Vec2::new(500.0, 375.0));
        assert_eq!(blits[0].dst_max, Vec2::new(200.0, 150.0));
    }

    #[test]
    fn test_full_period_pan_is_pixel_identical() {
        let mut raster = Raster::new(1200, 900).unwrap();
        for i in 0..300 {
            let p = Vec2::new((i * 37 % 1200) as f32, (i * 53 % 900) as f32);
            raster.plot(p, 3.0, [255.0, (i % 255) as f32, 80.0, 255.0]);
        }
        let mut vp = viewport();
        vp.set_offset(Vec2::new(1150.0, 20.0));
        vp.set_zoom(0.5);
        let before = vp.render_view(&raster, [5, 5, 5]);
        vp.set_offset(vp.offset() + Vec2::new(1200.0, 0.0));
        let after = vp.render_view(&raster, [5, 5, 5]);
        assert_eq!(before.as_raw(), after.as_raw());
    }

    #[test]
    fn test_world_to_geo() {
        let vp = viewport();
        assert_eq!(vp.world_to_geo(Vec2::ZERO), (-180.0, 90.0));
        assert_eq!(vp.world_to_geo(Vec2::new(600.0, 450.0)), (0.0, 0.0));
    }
}
