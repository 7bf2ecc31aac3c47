// polygon generators for courtyards, rooms and house footprints

use std::f32::consts::TAU;

use glam::Vec2;
use noise::NoiseFn;
use rand::Rng;
use tracing::warn;

use crate::config::HOUSE_SKEW;
use super::Polygon;

/// Generate a roughly regular polygon around `center`
///
/// Each vertex radius is scaled by `noise(cos θ, sin θ) * 0.2 + 0.9`.
/// If the noise hands back something non-finite the vertex falls back to
/// `0.9 + random * 0.2` so the shape is still usable.
pub fn generate_polygon<N, R>(
    center: Vec2,
    radius: f32,
    sides: usize,
    noise: &N,
    rng: &mut R,
) -> Polygon
where
    N: NoiseFn<f64, 2> + ?Sized,
    R: Rng,
{
    let sides = sides.max(3);
    let mut vertices = Vec::with_capacity(sides);

    for i in 0..sides {
        let angle = (i as f32 / sides as f32) * TAU;
        let (dir_y, dir_x) = angle.sin_cos();

        let sampled = noise.get([dir_x as f64, dir_y as f64]);
        let variation = if sampled.is_finite() {
            sampled as f32 * 0.2 + 0.9
        } else {
            warn!(vertex = i, "noise returned {sampled}, using random radius instead");
            0.9 + rng.random::<f32>() * 0.2
        };

        let r = radius * variation;
        vertices.push(center + Vec2::new(dir_x, dir_y) * r);
    }

    vertices
}

/// Add `(random * 2 - 1) * intensity` to each coordinate independently
pub fn perturb_polygon<R: Rng>(vertices: &[Vec2], intensity: f32, rng: &mut R) -> Polygon {
    vertices
        .iter()
        .map(|v| {
            let dx = (rng.random::<f32>() * 2.0 - 1.0) * intensity;
            let dy = (rng.random::<f32>() * 2.0 - 1.0) * intensity;
            *v + Vec2::new(dx, dy)
        })
        .collect()
}

/// Skewed, rotated box footprint for a house
///
/// Every corner is nudged independently within ±HOUSE_SKEW/2 of the
/// width/length before the whole thing is rotated about the centre,
/// which gives the slightly hand-built look.
pub fn generate_rectangular_house_with_rotation<R: Rng>(
    center: Vec2,
    width: f32,
    length: f32,
    rotation: f32,
    rng: &mut R,
) -> Polygon {
    let half_w = width / 2.0;
    let half_l = length / 2.0;

    let mut skew = |extent: f32| rng.random::<f32>() * HOUSE_SKEW * extent - HOUSE_SKEW * extent / 2.0;

    // corners in winding order: top-left, top-right, bottom-right, bottom-left
    let mut corners = [Vec2::ZERO; 4];
    for (corner, (sx, sy)) in corners.iter_mut().zip([(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)]) {
        let x = sx * half_w + skew(width);
        let y = sy * half_l + skew(length);
        *corner = Vec2::new(x, y);
    }

    let rot = Vec2::from_angle(rotation);
    corners.iter().map(|c| center + rot.rotate(*c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::poly::utils::{calculate_centroid, calculate_max_radius, is_valid_polygon};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    struct Flat(f64);

    impl NoiseFn<f64, 2> for Flat {
        fn get(&self, _point: [f64; 2]) -> f64 {
            self.0
        }
    }

    #[test]
    fn zero_noise_gives_regular_polygon_at_ninety_percent() {
        let mut rng = StdRng::seed_from_u64(1);
        let poly = generate_polygon(Vec2::new(3.0, -2.0), 10.0, 6, &Flat(0.0), &mut rng);
        assert_eq!(poly.len(), 6);
        for v in &poly {
            assert!((v.distance(Vec2::new(3.0, -2.0)) - 9.0).abs() < 1e-4);
        }
    }

    #[test]
    fn nan_noise_falls_back_to_random_radius() {
        let mut rng = StdRng::seed_from_u64(2);
        let poly = generate_polygon(Vec2::ZERO, 10.0, 5, &Flat(f64::NAN), &mut rng);
        assert!(is_valid_polygon(&poly));
        for v in &poly {
            let r = v.length();
            assert!((9.0..=11.0).contains(&r), "radius {r} outside fallback band");
        }
    }

    #[test]
    fn fewer_than_three_sides_is_raised() {
        let mut rng = StdRng::seed_from_u64(3);
        let poly = generate_polygon(Vec2::ZERO, 1.0, 1, &Flat(0.0), &mut rng);
        assert_eq!(poly.len(), 3);
    }

    #[test]
    fn perturbation_is_bounded_by_intensity() {
        let mut rng = StdRng::seed_from_u64(4);
        let square = vec![Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y];
        let moved = perturb_polygon(&square, 0.2, &mut rng);
        for (a, b) in square.iter().zip(&moved) {
            assert!((a.x - b.x).abs() <= 0.2);
            assert!((a.y - b.y).abs() <= 0.2);
        }
    }

    #[test]
    fn house_footprint_stays_near_its_box() {
        let mut rng = StdRng::seed_from_u64(5);
        let center = Vec2::new(10.0, 4.0);
        let house = generate_rectangular_house_with_rotation(center, 3.0, 2.0, 0.7, &mut rng);
        assert_eq!(house.len(), 4);
        assert!((calculate_centroid(&house) - center).length() < 0.3);

        // half diagonal plus the worst-case skew
        let limit = (1.5f32 + 0.225).hypot(1.0 + 0.15);
        assert!(calculate_max_radius(&house, center) <= limit + 1e-4);
    }
}
