use std::f32::consts::TAU;

use rand::Rng;

use super::{polar, rgb_alpha, Pen};
use crate::noise::{hsv_degrees, map_range};
use crate::object::{CelestialObject, StarClusterParams};

/// King-like profile: 70% of stars in a dense core, the rest thinning out,
/// plus a sparse ring of halo outliers.
pub(super) fn draw<R: Rng + ?Sized>(
    obj: &CelestialObject,
    params: &StarClusterParams,
    pen: &mut Pen<'_>,
    rng: &mut R,
) {
    let r = obj.radius;
    let hue = obj.hue_or_default();

    for _ in 0..params.star_count {
        let rad = if rng.gen::<f32>() < 0.7 {
            r * 0.45 * rng.gen::<f32>().sqrt()
        } else {
            r * rng.gen::<f32>().powf(0.35)
        };
        let p = polar(rng.gen_range(0.0..TAU), rad);
        let rgb = hsv_degrees(
            hue + map_range(rad, 0.0, r, 0.0, 40.0),
            map_range(rad, 0.0, r, 0.7, 0.3),
            map_range(rad, 0.0, r, 1.0, 0.7),
        );
        let alpha = map_range(rad, 0.0, r, 255.0, 160.0);
        let weight = if rng.gen::<f32>() < 0.04 {
            rng.gen_range(5.0..8.0)
        } else {
            rng.gen_range(2.0..3.5)
        };
        pen.point(p, weight, rgb_alpha(rgb, alpha));
    }

    let halo = (params.star_count as f32 * 0.12) as u32;
    for _ in 0..halo {
        let p = polar(rng.gen_range(0.0..TAU), r * rng.gen_range(1.05..1.35));
        let color = [
            rng.gen_range(220.0..255.0),
            rng.gen_range(220.0..255.0),
            rng.gen_range(200.0..255.0),
            rng.gen_range(80.0..160.0),
        ];
        pen.point(p, rng.gen_range(1.2..2.2), color);
    }
}

#[cfg(test)]
mod tests {
    use super::super::draw_object;
    use super::super::test_support::{ring_brightness, setup, SIZE};
    use crate::object::{ObjectKind, ObjectParams};
    use glam::Vec2;

    #[test]
    fn test_star_cluster_plots_count_plus_halo() {
        let (obj, mut raster, mut rng) = setup(ObjectKind::StarCluster, 51);
        let count = match &obj.params {
            ObjectParams::StarCluster(p) => p.star_count as usize,
            _ => unreachable!(),
        };
        let plotted = draw_object(&obj, &mut raster, &mut rng);
        assert_eq!(plotted, count + (count as f32 * 0.12) as usize);
    }

    #[test]
    fn test_star_cluster_radial_falloff() {
        let (mut obj, mut raster, mut rng) = setup(ObjectKind::StarCluster, 52);
        if let ObjectParams::StarCluster(p) = &mut obj.params {
            p.star_count = 600;
        }
        draw_object(&obj, &mut raster, &mut rng);
        let centre = Vec2::splat(SIZE as f32 / 2.0);
        let core = ring_brightness(&raster, centre, 0.0, obj.radius * 0.3);
        let outer = ring_brightness(&raster, centre, obj.radius * 0.7, obj.radius);
        assert!(core > outer, "core {} outer {}", core, outer);
    }
}
