//! Object generators.
//!
//! Every parameter is drawn from a fixed range scaled by the smaller viewport
//! dimension, so objects look proportionate on any screen. Only the world
//! position comes from the caller.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;

use crate::names::generate_name;
use crate::noise::lerp;
use crate::object::{
    BlackHoleParams, CelestialObject, GalaxyArm, GalaxyParams, NebulaLayer, NebulaParams,
    ObjectId, ObjectKind, ObjectParams, QuasarParams, StarClusterParams,
};

/// Build a fully parameterized object of `kind` centred at `position`.
pub fn generate<R: Rng + ?Sized>(
    kind: ObjectKind,
    id: ObjectId,
    position: Vec2,
    min_dim: f32,
    rng: &mut R,
) -> CelestialObject {
    let profile = kind.size_profile().scaled(min_dim);
    let radius = rng.gen_range(profile.min..=profile.max);
    let rotation = rng.gen_range(0.0..TAU);
    let base_hue = Some(rng.gen_range(0.0..360.0));

    let params = match kind {
        ObjectKind::Nebula => ObjectParams::Nebula(nebula_params(radius, rng)),
        ObjectKind::Galaxy => ObjectParams::Galaxy(galaxy_params(radius, rng)),
        ObjectKind::BlackHole => ObjectParams::BlackHole(black_hole_params(radius, rng)),
        ObjectKind::StarCluster => ObjectParams::StarCluster(StarClusterParams {
            star_count: rng.gen_range(40..=90),
            density_dir: 1,
        }),
        ObjectKind::Pulsar => ObjectParams::Pulsar,
        ObjectKind::Quasar => ObjectParams::Quasar(QuasarParams { density_dir: 1 }),
    };

    let name = generate_name(kind, rng);
    CelestialObject::new(id, name, position, radius, rotation, base_hue, params)
}

fn nebula_params<R: Rng + ?Sized>(radius: f32, rng: &mut R) -> NebulaParams {
    let hue_spread = rng.gen_range(30.0..60.0);
    let shape_factor = rng.gen_range(0.4..4.2);
    let count = rng.gen_range(2..=6);
    NebulaParams {
        layers: nebula_layers(radius, count, rng),
        hue_spread,
        shape_factor,
        density_dir: 1,
    }
}

/// Sample `count` nebula layers. Outer layers grow wider and fainter.
pub(crate) fn nebula_layers<R: Rng + ?Sized>(
    radius: f32,
    count: usize,
    rng: &mut R,
) -> Vec<NebulaLayer> {
    let denom = count.saturating_sub(1).max(1) as f32;
    (0..count)
        .map(|i| {
            let t = i as f32 / denom;
            let outer_scale = rng.gen_range(1.2..4.2);
            let inner_alpha = rng.gen_range(30.0..140.0);
            let outer_alpha = rng.gen_range(8.0..80.0);
            NebulaLayer {
                seed: rng.gen_range(0.0..10_000.0),
                radius: radius * lerp(1.0, outer_scale, t),
                alpha: lerp(inner_alpha, outer_alpha, t),
                arm_count: rng.gen_range(2..22),
                arm_spread: rng.gen_range(0.2..6.2),
            }
        })
        .collect()
}

fn galaxy_params<R: Rng + ?Sized>(radius: f32, rng: &mut R) -> GalaxyParams {
    let arm_count = rng.gen_range(3..=5);
    let point_count = ((radius * rng.gen_range(7.0..12.0)) as usize).max(1);
    let bulge_factors = (0..point_count).map(|_| rng.gen_range(0.10..0.22)).collect();
    let dust_factors = (0..point_count).map(|_| rng.gen_range(0.0..0.18)).collect();
    GalaxyParams {
        arms: galaxy_arms(arm_count, rng),
        point_count,
        bulge_factors,
        dust_factors,
        spiral_a: 0.16 + rng.gen_range(-0.03..0.03),
        spiral_b: 0.44 + rng.gen_range(-0.08..0.08),
        density_dir: 1,
    }
}

/// Sample `count` evenly spaced arms with a little angular jitter.
pub(crate) fn galaxy_arms<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<GalaxyArm> {
    let spacing = TAU / count.max(1) as f32;
    (0..count)
        .map(|i| GalaxyArm {
            seed: rng.gen_range(0.0..10_000.0),
            angle: spacing * i as f32 + rng.gen_range(-0.25..0.25),
            clump_seed: rng.gen_range(0.0..10_000.0),
        })
        .collect()
}

fn black_hole_params<R: Rng + ?Sized>(radius: f32, rng: &mut R) -> BlackHoleParams {
    BlackHoleParams {
        disk_tilt: rng.gen_range(-PI / 8.0..PI / 8.0),
        disk_eccentricity: rng.gen_range(0.5..0.8),
        core_point_count: (radius * rng.gen_range(32.0..60.0)) as u32,
        ring_point_count: (radius * rng.gen_range(16.0..28.0)) as u32,
        ring_eccentricity: rng.gen_range(0.7..1.0),
        jet_length: radius * rng.gen_range(2.5..4.5),
        jet_point_count: (radius * rng.gen_range(4.0..8.0)) as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{CLUSTER_STARS, GALAXY_ARMS, NEBULA_LAYERS};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    const MIN_DIM: f32 = 600.0;

    #[test]
    fn test_radius_within_profile() {
        let mut rng = SmallRng::seed_from_u64(1);
        for kind in ObjectKind::ALL {
            let profile = kind.size_profile().scaled(MIN_DIM);
            for i in 0..20 {
                let obj = generate(kind, ObjectId(i), Vec2::ZERO, MIN_DIM, &mut rng);
                assert!(profile.contains(obj.radius), "{:?} radius {}", kind, obj.radius);
                assert_eq!(obj.kind(), kind);
                assert!(obj.base_hue.is_some_and(|h| (0.0..360.0).contains(&h)));
            }
        }
    }

    #[test]
    fn test_counts_consistent() {
        let mut rng = SmallRng::seed_from_u64(2);
        for i in 0..20 {
            let neb = generate(ObjectKind::Nebula, ObjectId(i), Vec2::ZERO, MIN_DIM, &mut rng);
            let n = neb.density().unwrap();
            assert!((NEBULA_LAYERS.min..=6).contains(&n));

            let gal = generate(ObjectKind::Galaxy, ObjectId(i), Vec2::ZERO, MIN_DIM, &mut rng);
            if let ObjectParams::Galaxy(p) = &gal.params {
                assert!((3..=5).contains(&p.arms.len()));
                assert!(p.arms.len() as u32 >= GALAXY_ARMS.min);
                assert_eq!(p.bulge_factors.len(), p.point_count);
                assert_eq!(p.dust_factors.len(), p.point_count);
            } else {
                panic!("expected galaxy params");
            }

            let sc = generate(ObjectKind::StarCluster, ObjectId(i), Vec2::ZERO, MIN_DIM, &mut rng);
            let stars = sc.density().unwrap();
            assert!(stars >= CLUSTER_STARS.min && stars <= 90);
        }
    }

    #[test]
    fn test_nebula_layers_grow_outward() {
        let mut rng = SmallRng::seed_from_u64(3);
        let layers = nebula_layers(50.0, 5, &mut rng);
        assert_eq!(layers.len(), 5);
        assert_eq!(layers[0].radius, 50.0);
        for layer in &layers {
            assert!(layer.radius >= 50.0 && layer.radius <= 50.0 * 4.2);
            assert!((2..22).contains(&layer.arm_count));
        }
    }

    #[test]
    fn test_position_is_caller_supplied() {
        let mut rng = SmallRng::seed_from_u64(4);
        let obj = generate(ObjectKind::Quasar, ObjectId(9), Vec2::new(123.0, 456.0), MIN_DIM, &mut rng);
        assert_eq!(obj.position, Vec2::new(123.0, 456.0));
        assert_eq!(obj.id(), ObjectId(9));
    }
}
