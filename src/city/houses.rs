// ring-tiered houses around every courtyard

use std::f32::consts::TAU;

use glam::Vec2;
use noise::NoiseFn;
use rand::Rng;
use tracing::trace;

use crate::config::*;
use super::collision::CollisionGrid;
use super::platform::Platform;
use super::poly::shapes::generate_rectangular_house_with_rotation;
use super::poly::utils::{calculate_centroid, calculate_max_radius};
use super::{Courtyard, House, LayoutParams, RingTier, Room};

// per-tier dimensions, (base, span) pairs drawn as base + random * span
struct TierShape {
    tier: RingTier,
    footprint: (f32, f32),
    height: (f32, f32),
    // height factor = floor + noise(p / noise_scale) * noise_amp * height_variation
    height_floor: f32,
    noise_scale: f32,
    noise_amp: f32,
    age: (f32, f32),
}

const LARGE: TierShape = TierShape {
    tier: RingTier::Large,
    footprint: (2.4, 1.2),
    height: (1.6, 0.8),
    height_floor: 0.9,
    noise_scale: 15.0,
    noise_amp: 0.2,
    age: (0.5, 0.5),
};

const MEDIUM: TierShape = TierShape {
    tier: RingTier::Medium,
    footprint: (1.8, 0.8),
    height: (1.4, 0.6),
    height_floor: 0.85,
    noise_scale: 18.0,
    noise_amp: 0.25,
    age: (0.8, 0.7),
};

const SMALL: TierShape = TierShape {
    tier: RingTier::Small,
    footprint: (1.2, 1.0),
    height: (1.0, 0.6),
    height_floor: 0.8,
    noise_scale: 20.0,
    noise_amp: 0.3,
    age: (1.2, 1.2),
};

const TINY: TierShape = TierShape {
    tier: RingTier::Tiny,
    footprint: (0.9, 0.7),
    height: (0.8, 0.5),
    height_floor: 0.7,
    noise_scale: 25.0,
    noise_amp: 0.3,
    age: (1.8, 1.0),
};

struct HousePlacer<'a, N: ?Sized> {
    grid: CollisionGrid,
    platform_radius: f32,
    height_variation: f32,
    noise: &'a N,
    houses: Vec<House>,
}

impl<N: NoiseFn<f64, 2> + ?Sized> HousePlacer<'_, N> {
    fn overlaps(&self, position: Vec2, half_extent: f32) -> bool {
        let clearance = self.platform_radius + half_extent + PLATFORM_HOUSE_CLEARANCE;
        position.length() < clearance || !self.grid.box_free(position, half_extent)
    }

    /// One candidate per slot, dimensions are drawn before the collision test
    /// and rotation/age only once it passes.
    fn try_place<R: Rng>(&mut self, shape: &TierShape, position: Vec2, courtyard_index: usize, rng: &mut R) {
        let width = shape.footprint.0 + rng.random::<f32>() * shape.footprint.1;
        let length = shape.footprint.0 + rng.random::<f32>() * shape.footprint.1;

        let base_height = shape.height.0 + rng.random::<f32>() * shape.height.1;
        let n = self.noise.get([
            (position.x / shape.noise_scale) as f64,
            (position.y / shape.noise_scale) as f64,
        ]) as f32;
        let height = base_height * (shape.height_floor + n * shape.noise_amp * self.height_variation);

        let half_extent = width.max(length) / 2.0 + HOUSE_PADDING;
        if self.overlaps(position, half_extent) {
            trace!(tier = ?shape.tier, x = position.x, z = position.y, "house rejected");
            return;
        }

        let rotation = rng.random::<f32>() * TAU;
        let age = shape.age.0 + rng.random::<f32>() * shape.age.1;
        let footprint = generate_rectangular_house_with_rotation(position, width, length, rotation, rng);

        self.grid.mark_box(position, half_extent);
        self.houses.push(House {
            position,
            width,
            length,
            height,
            rotation,
            age,
            courtyard_index,
            tier: shape.tier,
            footprint,
        });
    }
}

/// Place the inner/middle/outer rings (~45/35/20%) and a sparse outlier
/// tier around each courtyard.
///
/// Houses collide against the platform disc, every room and every earlier
/// house; a rejected slot is simply skipped.
pub fn place_houses<N, R>(
    params: &LayoutParams,
    platform: &Platform,
    courtyards: &[Courtyard],
    rooms: &[Room],
    noise: &N,
    rng: &mut R,
) -> Vec<House>
where
    N: NoiseFn<f64, 2> + ?Sized,
    R: Rng,
{
    let mut grid = CollisionGrid::new(HOUSE_CELL_SIZE);
    for room in rooms {
        let centroid = calculate_centroid(&room.polygon);
        grid.mark_disc(centroid, calculate_max_radius(&room.polygon, centroid));
    }

    let mut placer = HousePlacer {
        grid,
        platform_radius: platform.radius(),
        height_variation: params.height_variation,
        noise,
        houses: Vec::new(),
    };

    for (courtyard_index, courtyard) in courtyards.iter().enumerate() {
        let center = calculate_centroid(&courtyard.polygon);
        let radius = courtyard.radius;

        let size_ratio = (radius / 5.0).clamp(0.5, 1.5);
        let variation = 0.8 + rng.random::<f32>() * 0.4;
        let count = (HOUSES_PER_COURTYARD * size_ratio * variation).floor();

        let inner = (count * 0.45).ceil() as usize;
        let middle = (count * 0.35).floor() as usize;
        let outer = (count * 0.20).floor() as usize;
        let outliers = (count * 0.05).floor() as usize;

        // inner ring, evenly stepped and tight
        let step = TAU / inner.max(1) as f32;
        for i in 0..inner {
            let angle = i as f32 * step + (rng.random::<f32>() * 0.12 - 0.06);
            let distance = radius * 1.2 * (0.95 + rng.random::<f32>() * 0.1);
            let position = center + Vec2::from_angle(angle) * distance;
            placer.try_place(&LARGE, position, courtyard_index, rng);
        }

        // middle ring, stepped with more jitter
        for i in 0..middle {
            let angle = (i as f32 / middle as f32) * TAU + (rng.random::<f32>() * 0.3 - 0.15);
            let distance = radius * (1.9 + rng.random::<f32>() * 0.5);
            let position = center + Vec2::from_angle(angle) * distance;
            placer.try_place(&MEDIUM, position, courtyard_index, rng);
        }

        // outer ring, free angles
        for _ in 0..outer {
            let angle = rng.random::<f32>() * TAU;
            let distance = radius * (2.4 + rng.random::<f32>() * 1.1);
            let position = center + Vec2::from_angle(angle) * distance;
            placer.try_place(&SMALL, position, courtyard_index, rng);
        }

        // outliers, only inside the city
        for _ in 0..outliers {
            let angle = rng.random::<f32>() * TAU;
            let distance = radius * (3.3 + rng.random::<f32>() * 1.2);
            let position = center + Vec2::from_angle(angle) * distance;
            if position.length() > CITY_RADIUS {
                continue;
            }
            placer.try_place(&TINY, position, courtyard_index, rng);
        }
    }

    placer.houses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::platform::generate_platform;
    use crate::seed::Seed;

    fn courtyard_at(center: Vec2, radius: f32) -> Courtyard {
        let polygon = (0..5)
            .map(|i| center + Vec2::from_angle(i as f32 / 5.0 * TAU) * radius)
            .collect();
        Courtyard { polygon, center, radius, age: 1 }
    }

    fn houses_for(courtyards: &[Courtyard], rooms: &[Room], seed: u64) -> Vec<House> {
        let params = LayoutParams::default();
        let platform = generate_platform(&params.platform_seed, params.platform_size);
        let mut streams = Seed::Number(seed).streams();
        place_houses(&params, &platform, courtyards, rooms, &streams.noise, &mut streams.rng)
    }

    #[test]
    fn houses_never_overlap_each_other() {
        let houses = houses_for(&[courtyard_at(Vec2::new(45.0, 0.0), 6.0)], &[], 4);
        assert!(!houses.is_empty());

        for (i, a) in houses.iter().enumerate() {
            for b in &houses[i + 1..] {
                let min = a.width.max(a.length) / 2.0 + b.width.max(b.length) / 2.0;
                assert!(a.position.distance(b.position) >= min * 0.7, "{a:?} / {b:?}");
            }
        }
    }

    #[test]
    fn houses_keep_off_the_platform() {
        let houses = houses_for(&[courtyard_at(Vec2::new(38.0, 0.0), 8.0)], &[], 5);
        for house in &houses {
            assert!(house.position.length() > 25.0 + PLATFORM_HOUSE_CLEARANCE);
        }
    }

    #[test]
    fn tiers_follow_their_bands() {
        let radius = 6.0;
        let center = Vec2::new(0.0, 60.0);
        let houses = houses_for(&[courtyard_at(center, radius)], &[], 6);

        for house in &houses {
            let d = house.position.distance(center) / radius;
            let band = match house.tier {
                RingTier::Large => 1.0..=1.3,
                RingTier::Medium => 1.85..=2.45,
                RingTier::Small => 2.35..=3.55,
                RingTier::Tiny => 3.25..=4.55,
            };
            assert!(band.contains(&d), "{:?} at {d}", house.tier);
            assert_eq!(house.footprint.len(), 4);
            assert_eq!(house.courtyard_index, 0);
        }
        // the inner ring is tried first and always yields something
        assert!(houses.iter().any(|h| h.tier == RingTier::Large));
    }

    #[test]
    fn rooms_block_houses() {
        let center = Vec2::new(50.0, 0.0);
        let courtyard = courtyard_at(center, 5.0);
        let free = houses_for(std::slice::from_ref(&courtyard), &[], 7);

        // a big room covering the whole inner ring
        let blocker = Room {
            polygon: (0..8)
                .map(|i| center + Vec2::from_angle(i as f32 / 8.0 * TAU) * 8.0)
                .collect(),
            height: 3.0,
            age: 1,
            connections: Vec::new(),
            position: center,
        };
        let blocked = houses_for(&[courtyard], &[blocker], 7);

        assert!(free.iter().any(|h| h.tier == RingTier::Large));
        assert!(blocked.iter().all(|h| h.tier != RingTier::Large));
    }
}
