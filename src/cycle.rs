//! In-place property cycling: size, density and hue.
//!
//! Size wraps: stepping past the maximum lands back on the minimum, and
//! nebula layers scale along with the radius. Density ping-pongs: stepping
//! past either bound clamps to it and reverses the direction for the next
//! press. Each function returns `true` when the object changed and the
//! buffer needs repainting.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::generate::{galaxy_arms, nebula_layers};
use crate::object::{
    CelestialObject, DensityRange, ObjectKind, ObjectParams, SizeProfile, CLUSTER_STARS,
    GALAXY_ARMS, NEBULA_LAYERS,
};

const NEBULA_STEPS: [u32; 4] = [2, 3, 4, 5];
const GALAXY_STEPS: [u32; 3] = [2, 3, 4];
const CLUSTER_STEPS: [u32; 3] = [40, 60, 80];
const HUE_STEP: f32 = 30.0;

#[inline]
fn tolerance(profile: &SizeProfile) -> f32 {
    profile.step * 1e-3
}

/// Number of presses after which size cycling repeats, once it has wrapped
/// to the minimum at least once.
pub fn size_cycle_period(profile: &SizeProfile) -> usize {
    ((profile.max - profile.min + tolerance(profile)) / profile.step).floor() as usize + 1
}

/// Grow the radius by one step, wrapping to the minimum past the maximum.
pub fn cycle_size(obj: &mut CelestialObject, min_dim: f32) -> bool {
    let profile = obj.kind().size_profile().scaled(min_dim);
    let tol = tolerance(&profile);
    let old = obj.radius;
    let next = old + profile.step;
    obj.radius = if next > profile.max + tol || next < profile.min - tol {
        profile.min
    } else {
        next
    };
    // Nebula clouds are sized by their layers, not the object radius
    if let ObjectParams::Nebula(p) = &mut obj.params {
        if old > 0.0 {
            let scale = obj.radius / old;
            for layer in &mut p.layers {
                layer.radius *= scale;
            }
        }
    }
    log::debug!("{} '{}' radius -> {:.1}", obj.kind(), obj.name(), obj.radius);
    true
}

/// Step a count by `step * dir`. Overshooting a bound clamps to it and
/// flips `dir`; landing exactly on a bound does not.
fn ping_pong(value: u32, step: u32, dir: &mut i8, range: DensityRange) -> u32 {
    let next = value as i64 + step as i64 * *dir as i64;
    if next > range.max as i64 {
        *dir = -1;
        range.max
    } else if next < range.min as i64 {
        *dir = 1;
        range.min
    } else {
        next as u32
    }
}

/// Change the kind's "amount of structure".
///
/// Nebula layers and galaxy arms regenerate their whole parameter arrays.
/// Black holes and pulsars have no density and are left untouched.
pub fn cycle_density<R: Rng + ?Sized>(obj: &mut CelestialObject, min_dim: f32, rng: &mut R) -> bool {
    let radius = obj.radius;
    let changed = match &mut obj.params {
        ObjectParams::Nebula(p) => {
            let step = NEBULA_STEPS.choose(rng).copied().unwrap_or(2);
            let count = ping_pong(p.layers.len() as u32, step, &mut p.density_dir, NEBULA_LAYERS);
            p.layers = nebula_layers(radius, count as usize, rng);
            true
        }
        ObjectParams::Galaxy(p) => {
            let step = GALAXY_STEPS.choose(rng).copied().unwrap_or(2);
            let count = ping_pong(p.arms.len() as u32, step, &mut p.density_dir, GALAXY_ARMS);
            p.arms = galaxy_arms(count as usize, rng);
            true
        }
        ObjectParams::StarCluster(p) => {
            let step = CLUSTER_STEPS.choose(rng).copied().unwrap_or(40);
            p.star_count = ping_pong(p.star_count, step, &mut p.density_dir, CLUSTER_STARS);
            true
        }
        ObjectParams::Quasar(p) => {
            let profile = ObjectKind::Quasar.size_profile().scaled(min_dim);
            let next = radius + 2.0 * profile.step * p.density_dir as f32;
            obj.radius = if next > profile.max {
                p.density_dir = -1;
                profile.max
            } else if next < profile.min {
                p.density_dir = 1;
                profile.min
            } else {
                next
            };
            true
        }
        ObjectParams::BlackHole(_) | ObjectParams::Pulsar => false,
    };

    if changed {
        log::debug!(
            "{} '{}' density -> {:?} (radius {:.1})",
            obj.kind(),
            obj.name(),
            obj.density(),
            obj.radius
        );
    }
    changed
}

/// Rotate the base hue by 30 degrees. Objects without a hue are unchanged.
pub fn cycle_hue(obj: &mut CelestialObject) -> bool {
    match obj.base_hue.as_mut() {
        Some(hue) => {
            *hue = (*hue + HUE_STEP).rem_euclid(360.0);
            true
        }
        None => false,
    }
}
