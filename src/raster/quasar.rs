use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;

use super::{rgb_alpha, Pen};
use crate::noise::{hsv_degrees, map_range};
use crate::object::CelestialObject;

const WEIGHT_SCALE: f32 = 1.5625;
const CORE_POINTS: usize = 55;
const DISK_POINTS: usize = 50;
const JET_POINTS: usize = 15;
const HALO_POINTS: usize = 80;

/// Diffuse bright core, broad flat disk, bent jets and a wide faint halo.
pub(super) fn draw<R: Rng + ?Sized>(obj: &CelestialObject, pen: &mut Pen<'_>, rng: &mut R) {
    let r = obj.radius;
    let hue = obj.hue_or_default();

    for _ in 0..CORE_POINTS {
        let angle = rng.gen_range(0.0..TAU);
        let rad = rng.gen_range(0.0..r * 0.95);
        let p = Vec2::new(
            angle.cos() * rad * rng.gen_range(1.0..1.3),
            angle.sin() * rad * rng.gen_range(1.0..1.3),
        );
        let rgb = hsv_degrees(hue + map_range(rad, 0.0, r, 0.0, 60.0), 0.7, 1.0);
        pen.point(p, rng.gen_range(3.2..5.2), rgb_alpha(rgb, 255.0));
    }

    for _ in 0..DISK_POINTS {
        let angle = rng.gen_range(0.0..TAU);
        let rad = r * rng.gen_range(1.2..2.8);
        let p = Vec2::new(angle.cos() * rad * 2.2, angle.sin() * rad * 0.5);
        let color = [255.0, 255.0, rng.gen_range(120.0..220.0), rng.gen_range(200.0..255.0)];
        pen.point(p, rng.gen_range(0.8..1.8) * WEIGHT_SCALE, color);
    }

    for side in [-1.0f32, 1.0] {
        for i in 0..JET_POINTS {
            let t = i as f32 / 60.0;
            let bend = (t * PI).sin() * 38.0 * side;
            let p = Vec2::new(bend, side * (r * 0.7 + t * r * 14.2));
            let alpha = map_range(t, 0.0, 1.0, 220.0, 30.0);
            let weight = (1.2 + rng.gen_range(-0.5..0.5)) * WEIGHT_SCALE;
            pen.point(p, weight, [255.0, 255.0, 200.0, alpha]);
        }
    }

    for _ in 0..HALO_POINTS {
        let angle = rng.gen_range(0.0..TAU);
        let rad = rng.gen_range(r * 1.8..r * 4.2);
        let p = Vec2::new(
            angle.cos() * rad * rng.gen_range(0.8..1.5),
            angle.sin() * rad * rng.gen_range(0.7..1.3),
        );
        let alpha = rng.gen_range(120.0..200.0);
        pen.point(p, rng.gen_range(0.7..1.5) * WEIGHT_SCALE, [255.0, 220.0, 80.0, alpha]);
    }
}

#[cfg(test)]
mod tests {
    use super::super::draw_object;
    use super::super::test_support::{ring_brightness, setup, SIZE};
    use super::{CORE_POINTS, DISK_POINTS, HALO_POINTS, JET_POINTS};
    use crate::object::ObjectKind;
    use glam::Vec2;

    #[test]
    fn test_quasar_fixed_budget() {
        let (obj, mut raster, mut rng) = setup(ObjectKind::Quasar, 71);
        let plotted = draw_object(&obj, &mut raster, &mut rng);
        assert_eq!(plotted, CORE_POINTS + DISK_POINTS + 2 * JET_POINTS + HALO_POINTS);
    }

    #[test]
    fn test_quasar_core_outshines_halo() {
        let (obj, mut raster, mut rng) = setup(ObjectKind::Quasar, 72);
        draw_object(&obj, &mut raster, &mut rng);
        let centre = Vec2::splat(SIZE as f32 / 2.0);
        let core = ring_brightness(&raster, centre, 0.0, obj.radius);
        let halo = ring_brightness(&raster, centre, obj.radius * 3.0, obj.radius * 4.0);
        assert!(core > halo, "core {} halo {}", core, halo);
    }
}
