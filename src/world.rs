//! World state: per-kind object collections and the background star field.
//!
//! World space is a `width x height` torus. Objects keep insertion order
//! within their kind; iteration across kinds follows [`ObjectKind::ALL`].

use glam::Vec2;
use rand::Rng;

use crate::object::{CelestialObject, ObjectId, ObjectKind};

/// One background star.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub position: Vec2,
    pub radius: f32,
    pub brightness: u8,
}

/// Fixed-count background stars stored as parallel arrays.
#[derive(Debug, Clone, Default)]
pub struct StarField {
    xs: Vec<f32>,
    ys: Vec<f32>,
    radii: Vec<f32>,
    brightness: Vec<u8>,
}

impl StarField {
    /// Scatter `count` stars uniformly over a `width x height` world.
    pub fn generate<R: Rng + ?Sized>(count: usize, width: f32, height: f32, rng: &mut R) -> Self {
        let mut field = Self {
            xs: Vec::with_capacity(count),
            ys: Vec::with_capacity(count),
            radii: Vec::with_capacity(count),
            brightness: Vec::with_capacity(count),
        };
        for _ in 0..count {
            field.xs.push(rng.gen_range(0.0..width));
            field.ys.push(rng.gen_range(0.0..height));
            field.radii.push(rng.gen_range(0.5..2.5));
            field.brightness.push(rng.gen_range(180..=255));
        }
        field
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Star> + '_ {
        self.xs
            .iter()
            .zip(&self.ys)
            .zip(&self.radii)
            .zip(&self.brightness)
            .map(|(((&x, &y), &radius), &brightness)| Star {
                position: Vec2::new(x, y),
                radius,
                brightness,
            })
    }

    fn rescale(&mut self, scale: Vec2) {
        for x in &mut self.xs {
            *x *= scale.x;
        }
        for y in &mut self.ys {
            *y *= scale.y;
        }
    }
}

/// All live objects plus the star field.
#[derive(Debug, Clone)]
pub struct World {
    width: u32,
    height: u32,
    collections: [Vec<CelestialObject>; 6],
    stars: StarField,
    star_count: usize,
    next_id: u64,
}

impl World {
    pub fn new<R: Rng + ?Sized>(width: u32, height: u32, star_count: usize, rng: &mut R) -> Self {
        let stars = StarField::generate(star_count, width as f32, height as f32, rng);
        Self {
            width,
            height,
            collections: Default::default(),
            stars,
            star_count,
            next_id: 1,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    #[inline]
    pub fn centre(&self) -> Vec2 {
        self.size() * 0.5
    }

    /// Wrap a point into `[0, width) x [0, height)`.
    pub fn wrap(&self, p: Vec2) -> Vec2 {
        wrap_point(p, self.size())
    }

    /// Reserve a fresh id.
    pub fn allocate_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Append to the object's kind collection.
    pub fn insert(&mut self, obj: CelestialObject) -> ObjectId {
        let id = obj.id();
        self.collections[obj.kind().index()].push(obj);
        id
    }

    pub fn objects(&self, kind: ObjectKind) -> &[CelestialObject] {
        &self.collections[kind.index()]
    }

    pub fn count(&self, kind: ObjectKind) -> usize {
        self.collections[kind.index()].len()
    }

    /// Total number of objects across all kinds.
    pub fn len(&self) -> usize {
        self.collections.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every object in priority order, then insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CelestialObject> {
        self.collections.iter().flatten()
    }

    pub fn get(&self, id: ObjectId) -> Option<&CelestialObject> {
        self.iter().find(|o| o.id() == id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut CelestialObject> {
        self.collections.iter_mut().flatten().find(|o| o.id() == id)
    }

    /// Remove one object, keeping the order of the rest.
    pub fn remove(&mut self, id: ObjectId) -> Option<CelestialObject> {
        for list in &mut self.collections {
            if let Some(idx) = list.iter().position(|o| o.id() == id) {
                return Some(list.remove(idx));
            }
        }
        None
    }

    /// Drop every object and scatter a fresh star field.
    pub fn clear<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for list in &mut self.collections {
            list.clear();
        }
        self.stars = StarField::generate(self.star_count, self.width as f32, self.height as f32, rng);
    }

    pub fn stars(&self) -> &StarField {
        &self.stars
    }

    /// Resize world space, scaling object and star positions proportionally.
    pub fn rescale(&mut self, width: u32, height: u32) {
        let scale = Vec2::new(
            width as f32 / self.width.max(1) as f32,
            height as f32 / self.height.max(1) as f32,
        );
        self.width = width;
        self.height = height;
        let size = self.size();
        for obj in self.collections.iter_mut().flatten() {
            obj.position = wrap_point(obj.position * scale, size);
        }
        self.stars.rescale(scale);
    }
}

/// Wrap `p` into `[0, size)` on both axes.
pub fn wrap_point(p: Vec2, size: Vec2) -> Vec2 {
    Vec2::new(wrap_scalar(p.x, size.x), wrap_scalar(p.y, size.y))
}

#[inline]
pub(crate) fn wrap_scalar(v: f32, size: f32) -> f32 {
    if size <= 0.0 {
        return 0.0;
    }
    let w = v.rem_euclid(size);
    // rem_euclid can round up to exactly `size` for tiny negative inputs
    if w >= size {
        0.0
    } else {
        w
    }
}
