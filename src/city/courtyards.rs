// courtyard placement around the platform

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use noise::NoiseFn;
use rand::Rng;
use tracing::trace;

use crate::config::*;
use super::platform::Platform;
use super::poly::shapes::generate_polygon;
use super::{Courtyard, LayoutParams};

/// Place up to `courtyard_count` courtyards in a loose ring around the platform.
///
/// Slot `i` aims at `i/count * 2π` with ±45° of jitter and a distance between
/// the platform exclusion radius and half the city radius, both stretched by
/// the spacing. A candidate is rejected when it crowds an earlier courtyard
/// (`(r_a + r_b) * spacing`) or falls inside the exclusion radius. A slot that
/// runs out of attempts is dropped.
pub fn place_courtyards<N, R>(
    params: &LayoutParams,
    platform: &Platform,
    noise: &N,
    rng: &mut R,
) -> Vec<Courtyard>
where
    N: NoiseFn<f64, 2> + ?Sized,
    R: Rng,
{
    let count = params.courtyard_count.max(0) as usize;
    let spacing = params.courtyard_spacing;
    let exclusion = platform.exclusion_radius();

    let dist_min = exclusion * spacing;
    let dist_max = CITY_RADIUS * 0.5 * spacing;

    let mut courtyards: Vec<Courtyard> = Vec::with_capacity(count);

    for i in 0..count {
        let angle_base = (i as f32 / count as f32) * TAU;
        let mut placed = None;

        for attempt in 0..COURTYARD_PLACEMENT_ATTEMPTS {
            let angle = angle_base + rng.random::<f32>() * PI * 0.5 - PI * 0.25;
            let distance = dist_min + rng.random::<f32>() * (dist_max - dist_min);
            let center = Vec2::from_angle(angle) * distance;

            let size = (COURTYARD_MIN_SIZE
                + rng.random::<f32>() * (COURTYARD_MAX_SIZE - COURTYARD_MIN_SIZE) * 0.7)
                * params.courtyard_size;

            let crowded = courtyards
                .iter()
                .any(|c| c.center.distance(center) < (c.radius + size) * spacing);

            if !crowded && center.length() >= exclusion {
                trace!(slot = i, attempt, "courtyard placed");
                placed = Some((center, size));
                break;
            }
        }

        match placed {
            Some((center, size)) => {
                let sides = 4 + rng.random_range(0..3usize);
                courtyards.push(Courtyard {
                    polygon: generate_polygon(center, size, sides, noise, rng),
                    center,
                    radius: size,
                    age: 1,
                });
            }
            None => trace!(slot = i, "courtyard slot exhausted its attempts"),
        }
    }

    courtyards
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::platform::generate_platform;
    use crate::seed::Seed;

    fn run(params: &LayoutParams) -> (Platform, Vec<Courtyard>) {
        let platform = generate_platform(&params.platform_seed, params.platform_size);
        let mut streams = params.seed.streams();
        let courtyards = place_courtyards(params, &platform, &streams.noise, &mut streams.rng);
        (platform, courtyards)
    }

    #[test]
    fn courtyards_respect_spacing_and_exclusion() {
        for seed in 0..20u64 {
            let params = LayoutParams { seed: Seed::Number(seed), ..Default::default() };
            let (platform, courtyards) = run(&params);
            assert!(courtyards.len() <= params.courtyard_count as usize);

            for (i, a) in courtyards.iter().enumerate() {
                assert!(a.center.length() >= platform.exclusion_radius() - 1e-3);
                assert!((4..=6).contains(&a.polygon.len()));
                for b in &courtyards[i + 1..] {
                    let min = (a.radius + b.radius) * params.courtyard_spacing;
                    assert!(a.center.distance(b.center) >= min - 1e-3);
                }
            }
        }
    }

    #[test]
    fn negative_count_places_nothing() {
        let params = LayoutParams { courtyard_count: -3, ..Default::default() };
        let (_, courtyards) = run(&params);
        assert!(courtyards.is_empty());
    }

    #[test]
    fn sizes_follow_the_size_multiplier() {
        let params = LayoutParams { courtyard_size: 0.5, ..Default::default() };
        let (_, courtyards) = run(&params);
        for c in &courtyards {
            assert!(c.radius >= COURTYARD_MIN_SIZE * 0.5 - 1e-4);
            assert!(c.radius <= (COURTYARD_MIN_SIZE + 4.0 * 0.7) * 0.5 + 1e-4);
        }
    }
}
