use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec2;
use rand::Rng;

use super::{polar, rgb_alpha, Pen};
use crate::noise::{hsv_degrees, lerp};
use crate::object::{BlackHoleParams, CelestialObject};

const DISK_TURNS: f32 = 2.2;
const DISK_GROWTH: f32 = 0.13;

/// Disk color by normalized position: blue, white, yellow, orange, red.
fn disk_band(t: f32) -> [f32; 3] {
    if t < 0.18 {
        [180.0, 220.0, 255.0]
    } else if t < 0.45 {
        [255.0, 255.0, 255.0]
    } else if t < 0.7 {
        [255.0, 220.0, 80.0]
    } else if t < 0.9 {
        [255.0, 140.0, 40.0]
    } else {
        [220.0, 40.0, 40.0]
    }
}

/// Near-black core, beamed spiral disk, lensing ring and twin jets.
pub(super) fn draw<R: Rng + ?Sized>(
    obj: &CelestialObject,
    params: &BlackHoleParams,
    pen: &mut Pen<'_>,
    rng: &mut R,
) {
    let r = obj.radius;
    let core_rgb = hsv_degrees(obj.hue_or_default(), 0.7, 0.12);

    for _ in 0..params.core_point_count {
        let p = polar(rng.gen_range(0.0..TAU), rng.gen_range(0.0..r * 0.7));
        pen.point(p, 2.2, rgb_alpha(core_rgb, rng.gen_range(230.0..255.0)));
    }

    let tilt = Vec2::from_angle(params.disk_tilt);
    let disk_points = ((params.ring_point_count as f32 * 1.1) as u32).max(18);
    for i in 0..disk_points {
        let t = i as f32 / disk_points as f32;
        let theta = DISK_TURNS * TAU * t;
        let rad = r * 1.13 * (DISK_GROWTH * theta).exp();
        let beaming = 0.7 + 0.7 * (theta - FRAC_PI_2).cos();
        let thickness = lerp(1.1, 1.35, 0.5 + 0.5 * (theta - FRAC_PI_2).sin());
        let on_disk = |rad: f32| {
            tilt.rotate(Vec2::new(
                theta.cos() * rad * thickness,
                theta.sin() * rad * params.disk_eccentricity * thickness,
            ))
        };

        let band = disk_band(t);
        let hot = if rng.gen::<f32>() < 0.07 { 1.5 } else { 1.0 };
        let gain = beaming * hot;
        let alpha = (180.0 + 120.0 * gain).clamp(60.0, 255.0);
        pen.point(
            on_disk(rad),
            2.2,
            [band[0] * gain, band[1] * gain, band[2] * gain, alpha],
        );

        if rng.gen::<f32>() < 0.08 {
            let outer = rad * rng.gen_range(1.05..1.18);
            pen.point(on_disk(outer), 1.1, [band[0], band[1], band[2], 60.0]);
        }
    }

    for i in 0..params.ring_point_count {
        let angle = i as f32 / params.ring_point_count as f32 * TAU;
        let rad = r * rng.gen_range(1.45..1.7);
        let p = Vec2::new(angle.cos() * rad, angle.sin() * rad * params.ring_eccentricity);
        pen.point(p, 1.2, [200.0, 220.0, 255.0, 80.0]);
    }

    let jet_points = params.jet_point_count * 2;
    for side in [-1.0f32, 1.0] {
        for i in 0..jet_points {
            let t = i as f32 / jet_points as f32;
            let p = Vec2::new(
                rng.gen_range(-1.5..1.5),
                side * (r * 0.3 + t * params.jet_length) + rng.gen_range(-2.0..2.0),
            );
            let mix = t * 0.7;
            let color = [
                lerp(180.0, 255.0, mix),
                lerp(220.0, 255.0, mix),
                255.0,
                lerp(220.0, 40.0, t),
            ];
            pen.point(p, 1.3, color);
        }
    }
}
