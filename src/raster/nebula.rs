use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::{polar, Pen};
use crate::noise::{hsv_degrees, map_range, noise1d};
use crate::object::{CelestialObject, NebulaParams};

const WEIGHT_SCALE: f32 = 1.5625;

/// Color for a cloud point: hue offset by `kind_t` of the spread.
fn cloud_color<R: Rng + ?Sized>(base_hue: f32, hue_spread: f32, rng: &mut R) -> [u8; 3] {
    let kind_t: f32 = rng.gen();
    let hue = base_hue + kind_t * hue_spread + rng.gen_range(-8.0..8.0);
    hsv_degrees(hue, rng.gen_range(0.7..1.0), rng.gen_range(0.7..1.0))
}

fn jittered<R: Rng + ?Sized>(rgb: [u8; 3], jitter: f32, alpha: f32, rng: &mut R) -> [f32; 4] {
    [
        rgb[0] as f32 + rng.gen_range(-jitter..jitter),
        rgb[1] as f32 + rng.gen_range(-jitter..jitter),
        rgb[2] as f32 + rng.gen_range(-jitter..jitter),
        alpha,
    ]
}

/// Layers of cloud blobs and filament strands, then a scatter of bright knots.
pub(super) fn draw<R: Rng + ?Sized>(
    obj: &CelestialObject,
    params: &NebulaParams,
    pen: &mut Pen<'_>,
    rng: &mut R,
) {
    let hue = obj.hue_or_default();

    for layer in &params.layers {
        let points = (180 + rng.gen_range(-40..60)) as f32;
        let layer_rad = layer.radius * 0.65;
        let falloff = layer_rad * 0.8;

        let groups = rng.gen_range(2..5);
        for _ in 0..groups {
            let centre = Vec2::new(
                rng.gen_range(-0.9..0.9) * layer_rad,
                rng.gen_range(-0.9..0.9) * layer_rad,
            );
            let group_rad = layer_rad * rng.gen_range(0.28..0.65);
            let group_points = (points / groups as f32 * rng.gen_range(1.2..2.2)) as usize;
            for _ in 0..group_points / 4 {
                let p = centre
                    + Vec2::new(
                        rng.gen_range(-group_rad..group_rad) + rng.gen_range(-18.0..18.0),
                        rng.gen_range(-group_rad..group_rad) + rng.gen_range(-18.0..18.0),
                    );
                if rng.gen::<f32>() >= 0.7 {
                    continue;
                }
                let d = p.length();
                let density = (-(d / falloff).powi(2)).exp();
                let alpha = map_range(d, 0.0, layer_rad * 1.1, layer.alpha * 7.2, 38.0)
                    * density
                    * rng.gen_range(1.1..1.7);
                let rgb = cloud_color(hue, params.hue_spread, rng);
                let color = jittered(rgb, 40.0, alpha, rng);
                pen.point(p, rng.gen_range(1.2..2.2) * WEIGHT_SCALE, color);
            }
        }

        // Filament count and lateral spread come from the layer record
        let filaments = (layer.arm_count / 3 + 3).min(9);
        let lateral = 4.0 + layer.arm_spread * 1.2;
        let steps = (points / 16.0) as usize;
        for f in 0..filaments {
            let start = Vec2::new(
                rng.gen_range(-0.6..0.6) * layer_rad,
                rng.gen_range(-0.6..0.6) * layer_rad,
            );
            let length = layer_rad * rng.gen_range(1.2..2.2);
            let dir = polar(rng.gen_range(0.0..TAU), 1.0);
            for i in 0..steps {
                let t = i as f32 / (points / 4.0);
                let p = start
                    + dir * length * t
                    + Vec2::new(
                        rng.gen_range(-lateral..lateral),
                        rng.gen_range(-lateral..lateral),
                    );
                if rng.gen::<f32>() >= 0.5 {
                    continue;
                }
                let d = p.length();
                let density = (-(d / falloff).powi(2)).exp();
                let clump = 0.6 + 0.8 * noise1d(layer.seed + f as f32 * 7.3 + t * 3.0);
                let alpha = map_range(d, 0.0, layer_rad * 1.1, layer.alpha * 8.2, 28.0)
                    * density
                    * rng.gen_range(1.1..2.0)
                    * clump;
                let rgb = cloud_color(hue, params.hue_spread, rng);
                let color = jittered(rgb, 60.0, alpha, rng);
                pen.point(p, rng.gen_range(1.2..2.2) * WEIGHT_SCALE, color);
            }
        }
    }

    let knots = (obj.radius * 0.25 * params.shape_factor) as usize / 4;
    for _ in 0..knots {
        let angle = rng.gen_range(0.0..TAU);
        let rad = rng.gen_range(obj.radius * 0.15..obj.radius * 0.7);
        let p = Vec2::new(
            angle.cos() * rad + rng.gen_range(-8.0..8.0),
            angle.sin() * rad * rng.gen_range(0.85..1.05) + rng.gen_range(-8.0..8.0),
        );
        let rgb = cloud_color(hue, params.hue_spread, rng);
        let alpha = rng.gen_range(230.0..255.0);
        pen.point(
            p,
            rng.gen_range(1.5..3.2) * WEIGHT_SCALE,
            [rgb[0] as f32, rgb[1] as f32, rgb[2] as f32, alpha],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::super::draw_object;
    use super::super::test_support::{lit_pixels, ring_brightness, setup, SIZE};
    use crate::object::{ObjectKind, ObjectParams};
    use glam::Vec2;

    #[test]
    fn test_nebula_point_budget() {
        let (obj, mut raster, mut rng) = setup(ObjectKind::Nebula, 21);
        let layers = match &obj.params {
            ObjectParams::Nebula(p) => p.layers.len(),
            _ => unreachable!(),
        };
        let plotted = draw_object(&obj, &mut raster, &mut rng);
        // Clouds plus filaments give a few dozen to a few hundred points per layer
        assert!(plotted >= layers * 20, "plotted {} for {} layers", plotted, layers);
        assert!(plotted <= layers * 600 + 200, "plotted {}", plotted);
        assert!(lit_pixels(&raster) > 100);
    }

    #[test]
    fn test_nebula_core_brighter_than_rim() {
        let (obj, mut raster, mut rng) = setup(ObjectKind::Nebula, 22);
        for _ in 0..4 {
            draw_object(&obj, &mut raster, &mut rng);
        }
        let centre = Vec2::splat(SIZE as f32 / 2.0);
        let core = ring_brightness(&raster, centre, 0.0, obj.radius * 0.4);
        let rim = ring_brightness(&raster, centre, obj.radius * 2.0, obj.radius * 2.5);
        assert!(core > rim, "core {} rim {}", core, rim);
    }
}
