use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;

use super::{polar, rgb_alpha, Pen};
use crate::noise::{hsv_degrees, lerp, noise1d};
use crate::object::{CelestialObject, GalaxyParams};

const CORE_SHARE: f32 = 0.18;
const ARM_SHARE: f32 = 0.82;
const HALO_SHARE: f32 = 0.12;
const TURNS: f32 = 4.5 * PI;

/// Hue drifts 60 degrees from core to arm tip.
fn arm_color<R: Rng + ?Sized>(t: f32, base_hue: f32, rng: &mut R) -> [u8; 3] {
    let hue = base_hue + t * 60.0 + rng.gen_range(-20.0..20.0);
    hsv_degrees(hue, rng.gen_range(0.7..1.0), rng.gen_range(0.7..1.0))
}

/// Dense core, logarithmic spiral arms with clumps and dust, sparse halo.
pub(super) fn draw<R: Rng + ?Sized>(
    obj: &CelestialObject,
    params: &GalaxyParams,
    pen: &mut Pen<'_>,
    rng: &mut R,
) {
    let r = obj.radius;
    let hue = obj.hue_or_default();
    let total = params.point_count as f32;

    let core = (total * CORE_SHARE) as usize;
    for i in 0..core {
        let t = i as f32 / core as f32;
        let max_rad = r * 0.13 * (0.7 + 0.5 * t);
        let p = polar(rng.gen_range(0.0..TAU), rng.gen_range(0.0..=max_rad));
        let rgb = arm_color(t, hue, rng);
        pen.point(p, 2.8, rgb_alpha(rgb, 255.0 - t * 60.0));
    }

    if !params.arms.is_empty() {
        let per_arm = (total * ARM_SHARE / params.arms.len() as f32) as usize;
        let factors = params.bulge_factors.len().min(params.dust_factors.len()).max(1);
        for arm in &params.arms {
            for i in 0..per_arm {
                let t = i as f32 / per_arm as f32;
                let theta = t * TURNS + rng.gen_range(-0.04..0.04);
                // Normalised so the arm tip lands near the stored radius
                let spiral = (params.spiral_a / 0.16) * (params.spiral_b * (theta - TURNS)).exp();
                let base_rad = r * spiral * (0.7 + 0.3 * t);
                let angle = arm.angle + theta + (arm.seed + t * 12.0).sin() * 0.13;

                let mut clump = 1.0 + 0.7 * noise1d(arm.clump_seed + t * 2.5);
                if rng.gen::<f32>() < 0.08 {
                    clump += rng.gen_range(0.7..2.2);
                }
                let bulge_f = params.bulge_factors.get(i % factors).copied().unwrap_or(0.16);
                let dust_f = params.dust_factors.get(i % factors).copied().unwrap_or(0.0);
                let bulge = (-(t * 2.1).powi(2)).exp() * r * bulge_f;
                let dust = (angle * 2.5 + t * 8.0).sin() * dust_f * r * (1.0 - t);
                let p = polar(angle, base_rad * clump + bulge + dust);

                let rgb = arm_color(t, hue, rng);
                let alpha = lerp(255.0, 80.0, t) * (0.8 + 0.7 * noise1d(arm.clump_seed + t * 3.5));
                if rng.gen::<f32>() < lerp(1.0, 0.45, t) {
                    pen.point(p, 2.8, rgb_alpha(rgb, alpha));
                }

                if t > 0.3 && t < 0.9 && rng.gen::<f32>() < 0.04 {
                    let lane = p + Vec2::new(rng.gen_range(-2.0..2.0), rng.gen_range(-2.0..2.0));
                    pen.point(lane, 2.7, [30.0, 30.0, 40.0, 60.0]);
                }
            }
        }
    }

    let halo = (total * HALO_SHARE) as usize;
    for i in 0..halo {
        let t = i as f32 / halo as f32;
        let rad = r * (0.9 + rng.gen_range(0.1..0.7));
        let p = polar(rng.gen_range(0.0..TAU), rad)
            + Vec2::new(rng.gen_range(-8.0..8.0), rng.gen_range(-8.0..8.0));
        let rgb = arm_color(t, hue, rng);
        pen.point(p, 2.2, rgb_alpha(rgb, rng.gen_range(40.0..90.0)));
    }
}

#[cfg(test)]
mod tests {
    use super::super::draw_object;
    use super::super::test_support::{ring_brightness, setup, SIZE};
    use crate::object::{ObjectKind, ObjectParams};
    use glam::Vec2;

    #[test]
    fn test_galaxy_point_count_tracks_params() {
        let (obj, mut raster, mut rng) = setup(ObjectKind::Galaxy, 31);
        let total = match &obj.params {
            ObjectParams::Galaxy(p) => p.point_count,
            _ => unreachable!(),
        };
        let plotted = draw_object(&obj, &mut raster, &mut rng);
        // Core and halo always plot; arms thin out towards the tips
        assert!(plotted as f32 >= total as f32 * 0.5, "plotted {} of {}", plotted, total);
        assert!(plotted as f32 <= total as f32 * 1.2, "plotted {} of {}", plotted, total);
    }

    #[test]
    fn test_galaxy_core_dominates() {
        let (obj, mut raster, mut rng) = setup(ObjectKind::Galaxy, 32);
        draw_object(&obj, &mut raster, &mut rng);
        let centre = Vec2::splat(SIZE as f32 / 2.0);
        let core = ring_brightness(&raster, centre, 0.0, obj.radius * 0.1);
        let outer = ring_brightness(&raster, centre, obj.radius * 0.9, obj.radius * 1.1);
        assert!(core > outer * 2.0, "core {} outer {}", core, outer);
    }
}
