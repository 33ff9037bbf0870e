//! Offscreen point rasterizer.
//!
//! [`Raster`] wraps an [`image::RgbaImage`] and exposes one primitive,
//! [`Raster::plot`], which stamps a small round point with a blend mode.
//! Coordinates wrap at both edges so objects straddling the world seam
//! continue on the opposite side.
//!
//! The per-kind rasterizers live in submodules and all go through a [`Pen`],
//! which applies the object's rotation and counts plotted points.

mod black_hole;
mod galaxy;
mod nebula;
mod pulsar;
mod quasar;
mod star_cluster;

use glam::Vec2;
use image::RgbaImage;
use rand::Rng;

use crate::error::CanvasError;
use crate::object::{CelestialObject, ObjectParams};

/// How plotted colors combine with what is already in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// `dst + src * a`, saturating.
    Additive,
    /// `src * a + dst * (1 - a)`.
    Alpha,
}

/// The compositor surface.
#[derive(Debug, Clone)]
pub struct Raster {
    image: RgbaImage,
    blend: BlendMode,
}

impl Raster {
    /// Allocate a `width x height` buffer, reporting allocation failure
    /// instead of aborting.
    pub fn new(width: u32, height: u32) -> Result<Self, CanvasError> {
        if width == 0 || height == 0 {
            return Err(CanvasError::InvalidViewport { width, height });
        }
        let alloc_err = || CanvasError::BufferAllocation { width, height };
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(alloc_err)?;

        let mut buf: Vec<u8> = Vec::new();
        buf.try_reserve_exact(len).map_err(|_| alloc_err())?;
        buf.resize(len, 0);

        let image = RgbaImage::from_raw(width, height, buf).ok_or_else(alloc_err)?;
        Ok(Self {
            image,
            blend: BlendMode::Alpha,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Raw RGBA8 bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.blend
    }

    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend = mode;
    }

    /// Fill the whole buffer with an opaque color.
    pub fn clear(&mut self, rgb: [u8; 3]) {
        for px in self.image.pixels_mut() {
            px.0 = [rgb[0], rgb[1], rgb[2], 255];
        }
    }

    /// Pixel at wrapped coordinates.
    pub fn pixel(&self, x: i64, y: i64) -> [u8; 4] {
        let (x, y) = self.wrap(x, y);
        self.image.get_pixel(x, y).0
    }

    #[inline]
    fn wrap(&self, x: i64, y: i64) -> (u32, u32) {
        (
            x.rem_euclid(self.width() as i64) as u32,
            y.rem_euclid(self.height() as i64) as u32,
        )
    }

    /// Stamp a round point of diameter `weight` centred at `pos`.
    ///
    /// Channels are clamped to `[0, 255]` first. Every point covers at least
    /// the pixel containing its centre.
    pub fn plot(&mut self, pos: Vec2, weight: f32, rgba: [f32; 4]) {
        if !pos.is_finite() {
            return;
        }
        let color = [
            rgba[0].clamp(0.0, 255.0),
            rgba[1].clamp(0.0, 255.0),
            rgba[2].clamp(0.0, 255.0),
        ];
        let alpha = rgba[3].clamp(0.0, 255.0) / 255.0;
        if alpha <= 0.0 {
            return;
        }

        let radius = (weight * 0.5).max(0.0);
        let r2 = radius * radius;
        let x0 = (pos.x - radius).floor() as i64;
        let x1 = (pos.x + radius).floor() as i64;
        let y0 = (pos.y - radius).floor() as i64;
        let y1 = (pos.y + radius).floor() as i64;
        let (cx, cy) = (pos.x.floor() as i64, pos.y.floor() as i64);

        for py in y0..=y1 {
            for px in x0..=x1 {
                let dx = px as f32 + 0.5 - pos.x;
                let dy = py as f32 + 0.5 - pos.y;
                if dx * dx + dy * dy <= r2 || (px == cx && py == cy) {
                    self.blend_pixel(px, py, color, alpha);
                }
            }
        }
    }

    #[inline]
    fn blend_pixel(&mut self, x: i64, y: i64, color: [f32; 3], alpha: f32) {
        let (x, y) = self.wrap(x, y);
        let blend = self.blend;
        let dst = self.image.get_pixel_mut(x, y);
        for c in 0..3 {
            let d = dst.0[c] as f32;
            let out = match blend {
                BlendMode::Additive => d + color[c] * alpha,
                BlendMode::Alpha => color[c] * alpha + d * (1.0 - alpha),
            };
            dst.0[c] = out.round().clamp(0.0, 255.0) as u8;
        }
        dst.0[3] = 255;
    }
}

/// Object-local drawing context: translates, rotates and counts points.
pub struct Pen<'a> {
    raster: &'a mut Raster,
    origin: Vec2,
    rotation: Vec2,
    plotted: usize,
}

impl<'a> Pen<'a> {
    pub fn new(raster: &'a mut Raster, origin: Vec2, rotation: f32) -> Self {
        Self {
            raster,
            origin,
            rotation: Vec2::from_angle(rotation),
            plotted: 0,
        }
    }

    /// Plot at `local`, an offset from the object's centre in its own frame.
    #[inline]
    pub fn point(&mut self, local: Vec2, weight: f32, rgba: [f32; 4]) {
        let world = self.origin + self.rotation.rotate(local);
        self.raster.plot(world, weight, rgba);
        self.plotted += 1;
    }

    pub fn plotted(&self) -> usize {
        self.plotted
    }
}

#[inline]
pub(crate) fn polar(angle: f32, radius: f32) -> Vec2 {
    Vec2::new(angle.cos() * radius, angle.sin() * radius)
}

#[inline]
pub(crate) fn rgb_alpha(rgb: [u8; 3], alpha: f32) -> [f32; 4] {
    [rgb[0] as f32, rgb[1] as f32, rgb[2] as f32, alpha]
}

/// Rasterize one object, returning how many points were plotted.
pub fn draw_object<R: Rng + ?Sized>(obj: &CelestialObject, raster: &mut Raster, rng: &mut R) -> usize {
    let mut pen = Pen::new(raster, obj.position, obj.rotation);
    match &obj.params {
        ObjectParams::Nebula(p) => nebula::draw(obj, p, &mut pen, rng),
        ObjectParams::Galaxy(p) => galaxy::draw(obj, p, &mut pen, rng),
        ObjectParams::BlackHole(p) => black_hole::draw(obj, p, &mut pen, rng),
        ObjectParams::StarCluster(p) => star_cluster::draw(obj, p, &mut pen, rng),
        ObjectParams::Pulsar => pulsar::draw(obj, &mut pen, rng),
        ObjectParams::Quasar(_) => quasar::draw(obj, &mut pen, rng),
    }
    pen.plotted()
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::generate::generate;
    use crate::object::{ObjectId, ObjectKind};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    pub const SIZE: u32 = 512;

    /// A centred object on a black 512x512 buffer.
    pub fn setup(kind: ObjectKind, seed: u64) -> (CelestialObject, Raster, SmallRng) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let centre = Vec2::splat(SIZE as f32 / 2.0);
        let obj = generate(kind, ObjectId(1), centre, 400.0, &mut rng);
        let mut raster = Raster::new(SIZE, SIZE).unwrap();
        raster.clear([0, 0, 0]);
        raster.set_blend_mode(BlendMode::Additive);
        (obj, raster, rng)
    }

    /// Sum of RGB over pixels within `[r0, r1)` of `centre`, divided by ring area.
    pub fn ring_brightness(raster: &Raster, centre: Vec2, r0: f32, r1: f32) -> f32 {
        let mut total = 0.0;
        let mut count = 0.0;
        for (x, y, px) in raster.image().enumerate_pixels() {
            let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5).distance(centre);
            if d >= r0 && d < r1 {
                total += px.0[0] as f32 + px.0[1] as f32 + px.0[2] as f32;
                count += 1.0;
            }
        }
        if count > 0.0 {
            total / count
        } else {
            0.0
        }
    }

    pub fn lit_pixels(raster: &Raster) -> usize {
        raster
            .image()
            .pixels()
            .filter(|p| p.0[0] > 0 || p.0[1] > 0 || p.0[2] > 0)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_zero() {
        assert!(matches!(
            Raster::new(0, 10),
            Err(CanvasError::InvalidViewport { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_clear() {
        let mut r = Raster::new(4, 3).unwrap();
        r.clear([5, 5, 5]);
        assert!(r.image().pixels().all(|p| p.0 == [5, 5, 5, 255]));
        assert_eq!(r.as_bytes().len(), 4 * 3 * 4);
    }

    #[test]
    fn test_additive_accumulates_and_saturates() {
        let mut r = Raster::new(8, 8).unwrap();
        r.clear([0, 0, 0]);
        r.set_blend_mode(BlendMode::Additive);
        r.plot(Vec2::new(2.5, 2.5), 1.0, [100.0, 200.0, 0.0, 255.0]);
        assert_eq!(r.pixel(2, 2), [100, 200, 0, 255]);
        r.plot(Vec2::new(2.5, 2.5), 1.0, [100.0, 200.0, 0.0, 255.0]);
        assert_eq!(r.pixel(2, 2), [200, 255, 0, 255]);
    }

    #[test]
    fn test_additive_scales_by_alpha() {
        let mut r = Raster::new(8, 8).unwrap();
        r.clear([10, 10, 10]);
        r.set_blend_mode(BlendMode::Additive);
        r.plot(Vec2::new(1.5, 1.5), 1.0, [200.0, 200.0, 200.0, 127.5]);
        assert_eq!(r.pixel(1, 1), [110, 110, 110, 255]);
    }

    #[test]
    fn test_alpha_blend() {
        let mut r = Raster::new(8, 8).unwrap();
        r.clear([0, 0, 0]);
        r.set_blend_mode(BlendMode::Alpha);
        r.plot(Vec2::new(1.5, 1.5), 1.0, [255.0, 255.0, 100.0, 255.0]);
        assert_eq!(r.pixel(1, 1), [255, 255, 100, 255]);
        r.plot(Vec2::new(1.5, 1.5), 1.0, [0.0, 0.0, 0.0, 127.5]);
        assert_eq!(r.pixel(1, 1), [128, 128, 50, 255]);
    }

    #[test]
    fn test_plot_wraps_toroidally() {
        let mut r = Raster::new(10, 10).unwrap();
        r.clear([0, 0, 0]);
        r.set_blend_mode(BlendMode::Additive);
        r.plot(Vec2::new(-0.5, 10.5), 1.0, [255.0, 0.0, 0.0, 255.0]);
        assert_eq!(r.pixel(9, 0), [255, 0, 0, 255]);
    }

    #[test]
    fn test_plot_weight_covers_disc() {
        let mut r = Raster::new(32, 32).unwrap();
        r.clear([0, 0, 0]);
        r.set_blend_mode(BlendMode::Additive);
        r.plot(Vec2::new(16.0, 16.0), 6.0, [255.0, 255.0, 255.0, 255.0]);
        let lit = test_support::lit_pixels(&r);
        // Area of a radius-3 disc is ~28 pixels
        assert!((20..=40).contains(&lit), "lit {}", lit);
        assert_eq!(r.pixel(16, 16)[0], 255);
        assert_eq!(r.pixel(16, 22)[0], 0);
    }

    #[test]
    fn test_pen_rotates_local_offsets() {
        let mut r = Raster::new(32, 32).unwrap();
        r.clear([0, 0, 0]);
        r.set_blend_mode(BlendMode::Additive);
        let mut pen = Pen::new(&mut r, Vec2::new(16.5, 16.5), std::f32::consts::FRAC_PI_2);
        pen.point(Vec2::new(5.0, 0.0), 1.0, [255.0, 255.0, 255.0, 255.0]);
        assert_eq!(pen.plotted(), 1);
        // +x rotated a quarter turn lands on +y
        assert_eq!(r.pixel(16, 21)[0], 255);
    }

    #[test]
    fn test_non_finite_ignored() {
        let mut r = Raster::new(4, 4).unwrap();
        r.clear([0, 0, 0]);
        r.plot(Vec2::new(f32::NAN, 1.0), 2.0, [255.0; 4]);
        assert_eq!(test_support::lit_pixels(&r), 0);
    }
}
