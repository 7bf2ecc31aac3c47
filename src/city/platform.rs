// central stepped mound the city grows around

use std::f32::consts::TAU;

use glam::Vec2;
use noise::NoiseFn;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::*;
use crate::seed::Seed;
use super::poly::Polygon;

/// One frustum-like tier: a base outline at `base_height` and a smaller
/// top outline `height` above it. Both outlines share vertex order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub base: Polygon,
    pub top: Polygon,
    pub base_height: f32,
    pub height: f32,
}

impl Tier {
    pub fn top_height(&self) -> f32 {
        self.base_height + self.height
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub width: f32,
    pub depth: f32,
    /// two stacked tiers, tier 2 starts exactly on tier 1's top outline
    pub tiers: Vec<Tier>,
    /// step count for the alternate stepped rendering, 3 or 4
    pub step_count: u32,
}

impl Platform {
    pub fn radius(&self) -> f32 {
        self.width.max(self.depth) / 2.0
    }

    /// Courtyards keep out of this circle
    pub fn exclusion_radius(&self) -> f32 {
        self.radius() * PLATFORM_EXCLUSION_FACTOR
    }

    pub fn total_height(&self) -> f32 {
        self.tiers.iter().map(|t| t.height).sum()
    }

    pub fn base(&self) -> &[Vec2] {
        self.tiers.first().map(|t| t.base.as_slice()).unwrap_or(&[])
    }

    /// The same mound as a flight of `step_count` shrinking steps.
    ///
    /// Each step scales the base outline by `1 - step/count * 0.65`, its top
    /// is another 10% in, and the total height is split evenly.
    pub fn stepped_tiers(&self) -> Vec<Tier> {
        let count = self.step_count.max(1);
        let step_height = self.total_height() / count as f32;
        let base = self.base();

        (0..count)
            .map(|step| {
                let scale = 1.0 - (step as f32 / count as f32) * 0.65;
                let top_scale = scale * 0.9;
                Tier {
                    base: base.iter().map(|v| *v * scale).collect(),
                    top: base.iter().map(|v| *v * top_scale).collect(),
                    base_height: step as f32 * step_height,
                    height: step_height,
                }
            })
            .collect()
    }
}

/// Build the two-tier platform from its own seed stream.
///
/// The outline walks `PLATFORM_SIDES` angles; angles facing the long axis
/// take half the depth, the rest half the width, and every radius is
/// scaled by `noise(cos θ, sin θ) * 0.15 + 0.95`.
pub fn generate_platform(seed: &Seed, size: f32) -> Platform {
    let mut streams = seed.streams();
    let rng = &mut streams.rng;
    let noise = &streams.noise;

    let width = PLATFORM_BASE_WIDTH * size;
    let depth = PLATFORM_BASE_DEPTH * size;
    let height = 1.2 + rng.random::<f32>() * 0.8;
    let top_scale = 0.85 + rng.random::<f32>() * 0.05;

    let base: Polygon = (0..PLATFORM_SIDES)
        .map(|i| {
            let angle = (i as f32 / PLATFORM_SIDES as f32) * TAU;
            let (sin, cos) = angle.sin_cos();

            let long_side = sin.abs() > cos.abs();
            let radius = if long_side { depth / 2.0 } else { width / 2.0 };
            let radius = radius * (noise.get([cos as f64, sin as f64]) as f32 * 0.15 + 0.95);

            Vec2::new(cos, sin) * radius
        })
        .collect();

    let top: Polygon = base.iter().map(|v| *v * top_scale).collect();

    let tier2_scale = 0.7 + rng.random::<f32>() * 0.1;
    let tier2_height = 0.6 + rng.random::<f32>() * 0.4;
    let tier2_top: Polygon = top.iter().map(|v| *v * tier2_scale).collect();

    // the stepped variant rolls its count from a fresh stream of the same seed
    let step_count = 3 + seed.streams().rng.random_range(0..2u32);

    Platform {
        width,
        depth,
        tiers: vec![
            Tier { base, top: top.clone(), base_height: 0.0, height },
            Tier { base: top, top: tier2_top, base_height: height, height: tier2_height },
        ],
        step_count,
    }
}
