// this is the entry point for city layout generation
//
// generate() runs the whole pipeline: platform (own seed stream), courtyards,
// primary and secondary rooms, then the ring houses. Everything is a pure
// function of LayoutParams.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::*;
use crate::seed::{Seed, Streams};

pub mod collision;
pub mod courtyards;
pub mod houses;
pub mod platform;
pub mod poly;
pub mod rooms;

pub use collision::CollisionGrid;
pub use platform::{Platform, Tier};
pub use poly::Polygon;

/// City generation parameters
///
/// Out-of-range values are pulled back in by [`LayoutParams::sanitized`]
/// rather than rejected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    pub seed: Seed,
    pub complexity: f32,
    pub height_variation: f32,
    pub courtyard_count: i32,
    pub courtyard_size: f32,
    pub courtyard_spacing: f32,
    pub platform_seed: Seed,
    pub platform_size: f32,
    pub room_spread: f32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            seed: Seed::Number(DEFAULT_SEED),
            complexity: DEFAULT_COMPLEXITY,
            height_variation: DEFAULT_HEIGHT_VARIATION,
            courtyard_count: DEFAULT_COURTYARD_COUNT,
            courtyard_size: DEFAULT_COURTYARD_SIZE,
            courtyard_spacing: DEFAULT_COURTYARD_SPACING,
            platform_seed: Seed::Number(DEFAULT_PLATFORM_SEED),
            platform_size: DEFAULT_PLATFORM_SIZE,
            room_spread: DEFAULT_ROOM_SPREAD,
        }
    }
}

// non-finite values fall back to the default, the rest is clamped
fn clamp_or(value: f32, (lo, hi): (f32, f32), default: f32) -> f32 {
    if value.is_finite() { value.clamp(lo, hi) } else { default }
}

fn floor_or(value: f32, default: f32) -> f32 {
    if value.is_finite() { value.max(MIN_SCALE_PARAM) } else { default }
}

impl LayoutParams {
    /// Parse a (possibly partial) JSON parameter document, missing fields
    /// take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Copy with every field pulled into its usable range
    pub fn sanitized(&self) -> Self {
        Self {
            seed: self.seed.clone(),
            complexity: clamp_or(self.complexity, COMPLEXITY_RANGE, DEFAULT_COMPLEXITY),
            height_variation: clamp_or(self.height_variation, HEIGHT_VARIATION_RANGE, DEFAULT_HEIGHT_VARIATION),
            courtyard_count: self.courtyard_count.clamp(0, MAX_COURTYARD_COUNT),
            courtyard_size: floor_or(self.courtyard_size, DEFAULT_COURTYARD_SIZE),
            courtyard_spacing: floor_or(self.courtyard_spacing, DEFAULT_COURTYARD_SPACING),
            platform_seed: self.platform_seed.clone(),
            platform_size: floor_or(self.platform_size, DEFAULT_PLATFORM_SIZE),
            room_spread: floor_or(self.room_spread, DEFAULT_ROOM_SPREAD),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Courtyard {
    pub polygon: Polygon,
    pub center: Vec2,
    pub radius: f32,
    /// generation-order tag, drives weathering downstream
    pub age: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    Courtyard,
    Room,
}

/// What a room was grown from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub kind: ConnectionKind,
    pub index: usize,
}

impl Connection {
    pub fn courtyard(index: usize) -> Self {
        Self { kind: ConnectionKind::Courtyard, index }
    }

    pub fn room(index: usize) -> Self {
        Self { kind: ConnectionKind::Room, index }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub polygon: Polygon,
    pub height: f32,
    pub age: u32,
    pub connections: Vec<Connection>,
    /// where the room was seeded, before the outline jitter
    pub position: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RingTier {
    Large,
    Medium,
    Small,
    Tiny,
}

impl RingTier {
    pub const ALL: [RingTier; 4] = [RingTier::Large, RingTier::Medium, RingTier::Small, RingTier::Tiny];

    pub fn as_str(self) -> &'static str {
        match self {
            RingTier::Large => "large",
            RingTier::Medium => "medium",
            RingTier::Small => "small",
            RingTier::Tiny => "tiny",
        }
    }
}

/// Oriented box house, `footprint` is the decorative skewed outline
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct House {
    pub position: Vec2,
    pub width: f32,
    pub length: f32,
    pub height: f32,
    pub rotation: f32,
    pub age: f32,
    pub courtyard_index: usize,
    pub tier: RingTier,
    pub footprint: Polygon,
}

/// The generated city, plain data for whatever renders it
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub platform: Platform,
    pub courtyards: Vec<Courtyard>,
    pub rooms: Vec<Room>,
    pub houses: Vec<House>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LayoutStats {
    pub courtyards: usize,
    pub rooms: usize,
    pub primary_rooms: usize,
    pub houses: usize,
    /// indexed like [`RingTier::ALL`]
    pub houses_per_tier: [usize; 4],
    pub max_room_age: u32,
}

impl LayoutStats {
    pub fn houses_in(&self, tier: RingTier) -> usize {
        self.houses_per_tier[tier as usize]
    }
}

impl Layout {
    pub fn stats(&self) -> LayoutStats {
        let mut houses_per_tier = [0; 4];
        for house in &self.houses {
            houses_per_tier[house.tier as usize] += 1;
        }

        LayoutStats {
            courtyards: self.courtyards.len(),
            rooms: self.rooms.len(),
            primary_rooms: self
                .rooms
                .iter()
                .filter(|r| r.connections.iter().any(|c| c.kind == ConnectionKind::Courtyard))
                .count(),
            houses: self.houses.len(),
            houses_per_tier,
            max_room_age: self.rooms.iter().map(|r| r.age).max().unwrap_or(0),
        }
    }

    /// Every polygon in the document, platform outlines included
    pub fn polygons(&self) -> impl Iterator<Item = &Polygon> {
        self.platform
            .tiers
            .iter()
            .flat_map(|t| [&t.base, &t.top])
            .chain(self.courtyards.iter().map(|c| &c.polygon))
            .chain(self.rooms.iter().map(|r| &r.polygon))
            .chain(self.houses.iter().map(|h| &h.footprint))
    }
}

/// Generate a complete city layout, same params always give the same city.
pub fn generate(params: &LayoutParams) -> Layout {
    let params = params.sanitized();

    // the platform has its own stream so its shape survives city seed changes
    let platform = platform::generate_platform(&params.platform_seed, params.platform_size);

    let Streams { mut rng, noise } = params.seed.streams();
    let courtyards = courtyards::place_courtyards(&params, &platform, &noise, &mut rng);
    let rooms = rooms::grow_rooms(&params, &courtyards, &noise, &mut rng);
    let houses = houses::place_houses(&params, &platform, &courtyards, &rooms, &noise, &mut rng);

    let layout = Layout { platform, courtyards, rooms, houses };

    let stats = layout.stats();
    debug!(
        seed = %params.seed,
        courtyards = stats.courtyards,
        requested = params.courtyard_count,
        rooms = stats.rooms,
        houses = stats.houses,
        max_room_age = stats.max_room_age,
        "generated city layout"
    );

    layout
}
