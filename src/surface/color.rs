// piecewise-linear colour ramps

use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub at: f32,
    /// linear 0..1 rgb
    pub color: Vec3,
}

/// Ordered colour stops, sampled by a normalised field value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorRamp {
    stops: Vec<ColorStop>,
}

pub fn hex(rgb: u32) -> Vec3 {
    Vec3::new(
        ((rgb >> 16) & 0xff) as f32,
        ((rgb >> 8) & 0xff) as f32,
        (rgb & 0xff) as f32,
    ) / 255.0
}

impl ColorRamp {
    /// Stops are sorted by position, non-finite positions are dropped
    pub fn new(stops: impl IntoIterator<Item = ColorStop>) -> Self {
        let mut stops: Vec<ColorStop> = stops.into_iter().filter(|s| s.at.is_finite()).collect();
        stops.sort_by(|a, b| a.at.total_cmp(&b.at));
        Self { stops }
    }

    /// The ground's sand: darker sand, medium sand, light sand, then fine dust
    pub fn sand() -> Self {
        Self::new([
            ColorStop { at: 0.0, color: hex(0xc9b188) },
            ColorStop { at: 0.45, color: hex(0xd1bc91) },
            ColorStop { at: 0.65, color: hex(0xe4d5b7) },
            ColorStop { at: 1.0, color: hex(0xe8dcbf) },
        ])
    }

    /// Dark to light weathered stone, used for building materials
    pub fn stone() -> Self {
        Self::new([
            ColorStop { at: 0.0, color: Vec3::new(0.65, 0.6, 0.5) },
            ColorStop { at: 1.0, color: Vec3::new(0.9, 0.85, 0.75) },
        ])
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Blend every stop toward the ramp's average colour by `factor` (0..1),
    /// flattening contrast without moving the stop positions.
    pub fn subtle(&self, factor: f32) -> Self {
        if self.stops.is_empty() {
            return self.clone();
        }
        let factor = factor.clamp(0.0, 1.0);
        let average = self.stops.iter().map(|s| s.color).sum::<Vec3>() / self.stops.len() as f32;

        Self {
            stops: self
                .stops
                .iter()
                .map(|s| ColorStop { at: s.at, color: s.color.lerp(average, factor) })
                .collect(),
        }
    }

    pub fn sample(&self, t: f32) -> Vec3 {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return Vec3::ZERO;
        };
        if !(t > first.at) {
            // also catches NaN
            return first.color;
        }
        if t >= last.at {
            return last.color;
        }

        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.at {
                let span = b.at - a.at;
                let local = if span > 0.0 { (t - a.at) / span } else { 1.0 };
                return a.color.lerp(b.color, local);
            }
        }
        last.color
    }

    /// Per-channel lower and upper bound over all stops
    pub fn channel_bounds(&self) -> (Vec3, Vec3) {
        self.stops.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(lo, hi), s| (lo.min(s.color), hi.max(s.color)),
        )
    }
}

impl Default for ColorRamp {
    fn default() -> Self {
        Self::sand()
    }
}
