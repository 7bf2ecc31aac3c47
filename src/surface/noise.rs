// seamless noise over the unit square and the fractal sums built on it
//
// each axis of (u, v) walks a circle, so 4D noise sampled on the torus
// repeats with period one in both; everything returns values in [0, 1] so
// the blending stages can mix terms with plain weights

use std::f64::consts::TAU;

use ::noise::{NoiseFn, Value};

use crate::config::{FBM_GAIN, FBM_LACUNARITY, MAX_OCTAVES, MIN_OCTAVES};

// per-layer seed offsets
const DETAIL_SALT: u32 = 0xde7a;
const DRIFT_SALT: u32 = 0x610b;
const CRACK_SALT: u32 = 0xc4ac;
const DUNE_SALT: u32 = 0xd0e5;

pub fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// `noise` at `(u, v)` with `frequency` lattice cells across the unit square,
/// remapped to [0, 1] and periodic in both coordinates.
pub fn tileable<N: NoiseFn<f64, 4> + ?Sized>(noise: &N, u: f64, v: f64, frequency: f64) -> f64 {
    (signed_tileable(noise, u, v, frequency) * 0.5 + 0.5).clamp(0.0, 1.0)
}

/// Same as [`tileable`] left in [-1, 1]
pub fn signed_tileable<N: NoiseFn<f64, 4> + ?Sized>(noise: &N, u: f64, v: f64, frequency: f64) -> f64 {
    // circumference equals the frequency
    let r = frequency / TAU;
    let (su, cu) = (u * TAU).sin_cos();
    let (sv, cv) = (v * TAU).sin_cos();
    noise.get([cu * r, su * r, cv * r, sv * r]).clamp(-1.0, 1.0)
}

/// Continuous octave count, `lerp(1, 6, (complexity - 0.5) / 2.5)`
pub fn octaves_for_complexity(complexity: f64) -> f64 {
    let t = ((complexity - 0.5) / 2.5).clamp(0.0, 1.0);
    lerp(MIN_OCTAVES, MAX_OCTAVES, t)
}

/// Fractal sum of tileable noise, normalised back into [0, 1].
///
/// `octaves` may be fractional: the last octave is weighted by the
/// fractional part so detail fades in smoothly.
pub fn fbm<N: NoiseFn<f64, 4> + ?Sized>(noise: &N, u: f64, v: f64, frequency: f64, octaves: f64) -> f64 {
    let octaves = octaves.clamp(MIN_OCTAVES, MAX_OCTAVES);
    let whole = octaves.floor() as u32;
    let partial = octaves - whole as f64;

    let mut value = 0.0;
    let mut total = 0.0;
    let mut amplitude = 0.5;
    let mut frequency = frequency;

    for i in 0..=whole {
        let weight = if i < whole { 1.0 } else { partial };
        if weight <= 0.0 {
            break;
        }
        value += tileable(noise, u, v, frequency) * amplitude * weight;
        total += amplitude * weight;

        amplitude *= FBM_GAIN;
        frequency *= FBM_LACUNARITY;
    }

    if total > 0.0 { value / total } else { 0.5 }
}

/// Three very low-frequency octaves (0.5 / 0.3 / 0.2) that drift the whole
/// field so repeated tiles don't line up.
pub fn global_variation<N: NoiseFn<f64, 4> + ?Sized>(noise: &N, u: f64, v: f64, macro_scale: f64) -> f64 {
    let s = macro_scale;
    tileable(noise, u, v, s) * 0.5 + tileable(noise, u, v, s * 0.4) * 0.3 + tileable(noise, u, v, s * 0.1) * 0.2
}

/// Sharp crack ridges from domain-warped noise, `min(|n1|, |n2|)^5 * 2`
pub fn cracks<N: NoiseFn<f64, 4> + ?Sized>(noise: &N, u: f64, v: f64, scale: f64) -> f64 {
    let warp_u = signed_tileable(noise, u, v, 2.0) * 0.05;
    let warp_v = signed_tileable(noise, u + 0.5, v + 0.25, 2.0) * 0.05;

    let n1 = signed_tileable(noise, u + warp_u, v + warp_v, scale * 4.0).abs();
    let n2 = signed_tileable(noise, u + warp_v + 0.37, v + warp_u + 0.61, scale * 6.0).abs();

    n1.min(n2).powi(5) * 2.0
}

/// Soft two-frequency dunes, in [0, 1]
pub fn dunes<N: NoiseFn<f64, 4> + ?Sized>(noise: &N, u: f64, v: f64, scale: f64) -> f64 {
    let base = tileable(noise, u, v, scale * 2.0);
    let detail = tileable(noise, u + 0.31, v + 0.17, scale * 6.0);
    (base * 0.7 + detail * 0.3).powf(1.5)
}

/// One seeded noise source per surface layer
#[derive(Clone, Debug)]
pub struct NoiseLayers {
    pub base: Value,
    pub detail: Value,
    pub drift: Value,
    pub cracks: Value,
    pub dunes: Value,
}

impl NoiseLayers {
    pub fn new(seed: u32) -> Self {
        Self {
            base: Value::new(seed),
            detail: Value::new(seed.wrapping_add(DETAIL_SALT)),
            drift: Value::new(seed.wrapping_add(DRIFT_SALT)),
            cracks: Value::new(seed.wrapping_add(CRACK_SALT)),
            dunes: Value::new(seed.wrapping_add(DUNE_SALT)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> impl Iterator<Item = (f64, f64)> {
        (0..40).flat_map(|i| (0..40).map(move |j| (i as f64 * 0.37 - 5.0, j as f64 * 0.53 - 9.0)))
    }

    #[test]
    fn tileable_noise_is_bounded_and_wraps() {
        let noise = Value::new(3);
        for (u, v) in grid() {
            let n = tileable(&noise, u, v, 5.0);
            assert!((0.0..=1.0).contains(&n));
        }
        for i in 0..32 {
            let v = i as f64 / 32.0;
            let left = tileable(&noise, 0.0, v, 7.3);
            let right = tileable(&noise, 1.0, v, 7.3);
            assert!((left - right).abs() < 1e-9, "seam at v = {v}");
            assert!((tileable(&noise, v, 0.0, 7.3) - tileable(&noise, v, 1.0, 7.3)).abs() < 1e-9);
        }
    }

    #[test]
    fn seeds_change_the_noise() {
        let (a, b) = (Value::new(1), Value::new(2));
        let differs = grid().any(|(u, v)| tileable(&a, u, v, 6.0) != tileable(&b, u, v, 6.0));
        assert!(differs);
    }

    #[test]
    fn layers_are_independent() {
        let layers = NoiseLayers::new(9);
        let differs = grid().any(|(u, v)| tileable(&layers.base, u, v, 6.0) != tileable(&layers.detail, u, v, 6.0));
        assert!(differs);
    }

    #[test]
    fn octave_mapping_is_continuous() {
        assert_eq!(octaves_for_complexity(0.5), 1.0);
        assert_eq!(octaves_for_complexity(3.0), 6.0);
        assert_eq!(octaves_for_complexity(1.75), 3.5);
        assert_eq!(octaves_for_complexity(-10.0), 1.0);
    }

    #[test]
    fn fractional_octaves_blend_between_neighbours() {
        let noise = Value::new(5);
        let lo = fbm(&noise, 0.13, 0.27, 6.0, 2.0);
        let hi = fbm(&noise, 0.13, 0.27, 6.0, 3.0);
        let mid = fbm(&noise, 0.13, 0.27, 6.0, 2.5);
        let (min, max) = (lo.min(hi), lo.max(hi));
        assert!(mid >= min - 1e-12 && mid <= max + 1e-12);
    }

    #[test]
    fn fractal_terms_stay_in_range() {
        let layers = NoiseLayers::new(1);
        for (u, v) in grid() {
            assert!((0.0..=1.0).contains(&fbm(&layers.base, u, v, 6.0, 4.3)));
            assert!((0.0..=1.0).contains(&global_variation(&layers.drift, u, v, 2.0)));
            assert!((0.0..=2.0).contains(&cracks(&layers.cracks, u, v, 1.0)));
            assert!((0.0..=1.0).contains(&dunes(&layers.dunes, u, v, 0.7)));
        }
    }

    #[test]
    fn fractal_terms_wrap_at_the_unit_square() {
        let layers = NoiseLayers::new(17);
        for i in 0..16 {
            let v = i as f64 / 16.0;
            let pairs = [
                (fbm(&layers.base, 0.0, v, 6.0, 3.7), fbm(&layers.base, 1.0, v, 6.0, 3.7)),
                (global_variation(&layers.drift, 0.0, v, 2.0), global_variation(&layers.drift, 1.0, v, 2.0)),
                (cracks(&layers.cracks, 0.0, v, 1.0), cracks(&layers.cracks, 1.0, v, 1.0)),
                (dunes(&layers.dunes, v, 0.0, 0.7), dunes(&layers.dunes, v, 1.0, 0.7)),
            ];
            for (a, b) in pairs {
                assert!((a - b).abs() < 1e-9, "{a} vs {b} at {v}");
            }
        }
    }
}
