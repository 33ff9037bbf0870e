use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::{polar, rgb_alpha, Pen};
use crate::noise::{hsv_degrees, map_range};
use crate::object::CelestialObject;

const WEIGHT_SCALE: f32 = 1.5625;
const CORE_POINTS: usize = 10;
const HALO_POINTS: usize = 7;
const JET_POINTS: usize = 10;

/// Compact bright core, faint elliptical halo, two straight jets.
pub(super) fn draw<R: Rng + ?Sized>(obj: &CelestialObject, pen: &mut Pen<'_>, rng: &mut R) {
    let r = obj.radius;
    let hue = obj.hue_or_default();

    for _ in 0..CORE_POINTS {
        let rad = rng.gen_range(0.0..r * 0.25);
        let p = polar(rng.gen_range(0.0..TAU), rad);
        let rgb = hsv_degrees(
            hue + map_range(rad, 0.0, r, 0.0, 60.0),
            0.1 + 0.9 * rng.gen::<f32>(),
            1.0,
        );
        pen.point(p, rng.gen_range(2.0..5.0) * WEIGHT_SCALE, rgb_alpha(rgb, 255.0));
    }

    for _ in 0..HALO_POINTS {
        let angle = rng.gen_range(0.0..TAU);
        let rad = r * rng.gen_range(0.7..1.2);
        let p = Vec2::new(angle.cos() * rad * 1.2, angle.sin() * rad * 0.7);
        let alpha = rng.gen_range(120.0..180.0);
        pen.point(p, rng.gen_range(1.0..2.0) * WEIGHT_SCALE, [180.0, 220.0, 255.0, alpha]);
    }

    for side in [-1.0f32, 1.0] {
        for i in 0..JET_POINTS {
            let t = i as f32 / 40.0;
            let p = Vec2::new(0.0, side * (r * 0.5 + t * r * 7.5));
            let alpha = map_range(t, 0.0, 1.0, 255.0, 80.0);
            let weight = (2.5 + rng.gen_range(-1.0..1.0)) * WEIGHT_SCALE;
            pen.point(p, weight, [120.0, 200.0, 255.0, alpha]);
        }
    }
}
