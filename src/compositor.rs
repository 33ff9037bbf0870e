//! Owns the world-sized offscreen buffer and rebuilds it on demand.
//!
//! A redraw is a full synchronous rebuild: clear, rasterize every object
//! additively in kind order, then stamp the star field with normal alpha
//! blending. Per-frame rendering never comes through here; it only reads the
//! finished buffer. [`Compositor::generation`] bumps on every rebuild so a
//! presenter knows when to re-upload.

use std::time::{Duration, Instant};

use rand::Rng;

use crate::error::CanvasError;
use crate::raster::{draw_object, BlendMode, Raster};
use crate::world::World;

const STAR_ALPHA: f32 = 230.0;

/// Numbers from the most recent rebuild.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RedrawStats {
    pub objects: usize,
    pub points: usize,
    pub stars: usize,
    pub elapsed: Duration,
}

#[derive(Debug)]
pub struct Compositor {
    raster: Raster,
    background: [u8; 3],
    generation: u64,
    last_stats: RedrawStats,
}

impl Compositor {
    pub fn new(width: u32, height: u32, background: [u8; 3]) -> Result<Self, CanvasError> {
        let mut raster = Raster::new(width, height)?;
        raster.clear(background);
        Ok(Self {
            raster,
            background,
            generation: 0,
            last_stats: RedrawStats::default(),
        })
    }

    /// Rebuild the whole buffer from `world`.
    pub fn redraw<R: Rng + ?Sized>(&mut self, world: &World, rng: &mut R) -> RedrawStats {
        let start = Instant::now();
        self.raster.clear(self.background);

        self.raster.set_blend_mode(BlendMode::Additive);
        let mut points = 0;
        for obj in world.iter() {
            points += draw_object(obj, &mut self.raster, rng);
        }

        self.raster.set_blend_mode(BlendMode::Alpha);
        for star in world.stars().iter() {
            let color = [255.0, 255.0, star.brightness as f32, STAR_ALPHA];
            self.raster.plot(star.position, star.radius, color);
        }

        self.generation += 1;
        self.last_stats = RedrawStats {
            objects: world.len(),
            points,
            stars: world.stars().len(),
            elapsed: start.elapsed(),
        };
        log::debug!(
            "Redrew {} objects ({} points, {} stars) in {:.1?}",
            self.last_stats.objects,
            self.last_stats.points,
            self.last_stats.stars,
            self.last_stats.elapsed
        );
        self.last_stats
    }

    /// Reallocate for a new world size. The buffer is cleared but not
    /// repainted; callers follow with [`Compositor::redraw`].
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), CanvasError> {
        if width == self.raster.width() && height == self.raster.height() {
            return Ok(());
        }
        let mut raster = Raster::new(width, height)?;
        raster.clear(self.background);
        self.raster = raster;
        self.generation += 1;
        log::info!("Compositor buffer resized to {}x{}", width, height);
        Ok(())
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn last_stats(&self) -> RedrawStats {
        self.last_stats
    }

    pub fn background(&self) -> [u8; 3] {
        self.background
    }
}
