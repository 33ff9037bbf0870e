//! Scalar noise and color helpers shared by every rasterizer.
//!
//! [`noise2d`] is a lattice value noise: integer corners are hashed to a
//! pseudo-random value and the cell interior is blended with a smoothstep
//! curve, so nearby inputs give nearby outputs. Spiral arms and nebula
//! filaments sample it along their length to get coherent clumps instead of
//! per-point static.

/// Hash an integer lattice point to a value in `[0, 1)`.
#[inline]
fn hash_lattice(x: i32, y: i32) -> f32 {
    let mut n = (x as u32)
        .wrapping_mul(374761393)
        .wrapping_add((y as u32).wrapping_mul(668265263))
        .wrapping_add(1013904223);
    n = (n ^ (n >> 13)).wrapping_mul(1274126177);
    n ^= n >> 16;
    (n & 0x00FF_FFFF) as f32 / 16_777_216.0
}

#[inline]
fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// Smooth 2D value noise in `[0, 1)`.
pub fn noise2d(x: f32, y: f32) -> f32 {
    let x0 = x.floor();
    let y0 = y.floor();
    let tx = smoothstep(x - x0);
    let ty = smoothstep(y - y0);
    let (ix, iy) = (x0 as i32, y0 as i32);

    let a = hash_lattice(ix, iy);
    let b = hash_lattice(ix.wrapping_add(1), iy);
    let c = hash_lattice(ix, iy.wrapping_add(1));
    let d = hash_lattice(ix.wrapping_add(1), iy.wrapping_add(1));

    let top = a + (b - a) * tx;
    let bottom = c + (d - c) * tx;
    let v = top + (bottom - top) * ty;
    v.clamp(0.0, 0.999_999)
}

/// 1D slice of [`noise2d`] along `y = 0`.
#[inline]
pub fn noise1d(x: f32) -> f32 {
    noise2d(x, 0.0)
}

/// Convert HSV (`h` in `[0, 1)`, `s` and `v` in `[0, 1]`) to 8-bit RGB.
///
/// Hues outside `[0, 1)` wrap around, saturation and value are clamped.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [u8; 3] {
    let h = h.rem_euclid(1.0) * 6.0;
    let s = s.clamp(0.0, 1.0);
    let v = v.clamp(0.0, 1.0);

    let sector = (h.floor() as i32).rem_euclid(6);
    let f = h - h.floor();
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match sector {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    [to_byte(r), to_byte(g), to_byte(b)]
}

/// Same as [`hsv_to_rgb`] but takes the hue in degrees.
#[inline]
pub fn hsv_degrees(hue_deg: f32, s: f32, v: f32) -> [u8; 3] {
    hsv_to_rgb(hue_deg / 360.0, s, v)
}

#[inline]
fn to_byte(c: f32) -> u8 {
    (c * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Linear interpolation.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Map `v` from `[in_lo, in_hi]` onto `[out_lo, out_hi]` without clamping.
#[inline]
pub fn map_range(v: f32, in_lo: f32, in_hi: f32, out_lo: f32, out_hi: f32) -> f32 {
    if (in_hi - in_lo).abs() < f32::EPSILON {
        return out_lo;
    }
    out_lo + (v - in_lo) / (in_hi - in_lo) * (out_hi - out_lo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_range() {
        for i in 0..2000 {
            let x = i as f32 * 0.173 - 150.0;
            let y = i as f32 * 0.071 + 3.0;
            let n = noise2d(x, y);
            assert!((0.0..1.0).contains(&n), "noise out of range: {}", n);
        }
    }

    #[test]
    fn test_noise_deterministic() {
        assert_eq!(noise2d(12.5, -3.25), noise2d(12.5, -3.25));
    }

    #[test]
    fn test_noise_continuity() {
        // Small steps never jump far; the smoothstep derivative is bounded by 1.5
        let mut prev = noise1d(0.0);
        for i in 1..5000 {
            let x = i as f32 * 0.001;
            let n = noise1d(x);
            assert!((n - prev).abs() < 0.01, "jump at {}: {} -> {}", x, prev, n);
            prev = n;
        }
    }

    #[test]
    fn test_noise_varies() {
        let samples: Vec<f32> = (0..50).map(|i| noise1d(i as f32 * 1.37)).collect();
        let min = samples.iter().cloned().fold(f32::MAX, f32::min);
        let max = samples.iter().cloned().fold(f32::MIN, f32::max);
        assert!(max - min > 0.2);
    }

    #[test]
    fn test_hsv_primaries() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), [255, 0, 0]);
        assert_eq!(hsv_to_rgb(1.0 / 3.0, 1.0, 1.0), [0, 255, 0]);
        assert_eq!(hsv_to_rgb(2.0 / 3.0, 1.0, 1.0), [0, 0, 255]);
    }

    #[test]
    fn test_hsv_grey_and_black() {
        assert_eq!(hsv_to_rgb(0.42, 0.0, 1.0), [255, 255, 255]);
        assert_eq!(hsv_to_rgb(0.42, 0.8, 0.0), [0, 0, 0]);
    }

    #[test]
    fn test_hsv_hue_wraps() {
        assert_eq!(hsv_to_rgb(1.25, 1.0, 1.0), hsv_to_rgb(0.25, 1.0, 1.0));
        assert_eq!(hsv_degrees(420.0, 1.0, 1.0), hsv_degrees(60.0, 1.0, 1.0));
    }

    #[test]
    fn test_map_range() {
        assert_eq!(map_range(5.0, 0.0, 10.0, 0.0, 100.0), 50.0);
        assert_eq!(map_range(0.0, 0.0, 10.0, 90.0, -90.0), 90.0);
        assert_eq!(map_range(3.0, 1.0, 1.0, 7.0, 9.0), 7.0);
    }
}
