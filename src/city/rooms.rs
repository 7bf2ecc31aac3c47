// rooms grown around courtyards, then around each other

use std::f32::consts::TAU;

use glam::Vec2;
use noise::NoiseFn;
use rand::Rng;

use crate::config::*;
use super::poly::shapes::{generate_polygon, perturb_polygon};
use super::poly::utils::{calculate_centroid, calculate_max_radius};
use super::{Connection, Courtyard, LayoutParams, Room};

// smooth spatial height modulation, neighbours end up with similar heights
fn height_factor<N: NoiseFn<f64, 2> + ?Sized>(noise: &N, at: Vec2, height_variation: f32) -> f32 {
    let n = noise.get([(at.x / 10.0) as f64, (at.y / 10.0) as f64]) as f32;
    0.5 + (n * 0.5 + 0.5) * height_variation
}

/// Primary rooms ring every courtyard, secondary rooms then attach to a
/// random existing room one generation older. All outlines get a final
/// jitter once connectivity is settled.
pub fn grow_rooms<N, R>(
    params: &LayoutParams,
    courtyards: &[Courtyard],
    noise: &N,
    rng: &mut R,
) -> Vec<Room>
where
    N: NoiseFn<f64, 2> + ?Sized,
    R: Rng,
{
    let mut rooms = primary_rooms(params, courtyards, noise, rng);
    secondary_rooms(params, &mut rooms, noise, rng);

    for room in &mut rooms {
        room.polygon = perturb_polygon(&room.polygon, ROOM_JITTER, rng);
    }

    rooms
}

fn primary_rooms<N, R>(
    params: &LayoutParams,
    courtyards: &[Courtyard],
    noise: &N,
    rng: &mut R,
) -> Vec<Room>
where
    N: NoiseFn<f64, 2> + ?Sized,
    R: Rng,
{
    let mut rooms = Vec::new();

    for (courtyard_index, courtyard) in courtyards.iter().enumerate() {
        let count = (courtyard.polygon.len() as f32 * (1.0 + params.complexity)).floor() as usize;
        let centroid = calculate_centroid(&courtyard.polygon);

        for i in 0..count {
            let angle = (i as f32 / count as f32) * TAU;
            let distance = courtyard.radius + (1.0 + rng.random::<f32>() * 2.0) * params.room_spread;
            let position = centroid + Vec2::from_angle(angle) * distance;

            let size = ROOM_MIN_SIZE + rng.random::<f32>() * (ROOM_MAX_SIZE - ROOM_MIN_SIZE);
            let base_height = WALL_HEIGHT * (0.8 + rng.random::<f32>() * 0.4);
            let height = base_height * height_factor(noise, position, params.height_variation);

            rooms.push(Room {
                polygon: generate_polygon(position, size, 4, noise, rng),
                height,
                age: courtyard.age,
                connections: vec![Connection::courtyard(courtyard_index)],
                position,
            });
        }
    }

    rooms
}

fn secondary_rooms<N, R>(params: &LayoutParams, rooms: &mut Vec<Room>, noise: &N, rng: &mut R)
where
    N: NoiseFn<f64, 2> + ?Sized,
    R: Rng,
{
    if rooms.is_empty() {
        return;
    }

    let count = (rooms.len() as f32 * params.complexity * 1.5).floor() as usize;
    let limit = CITY_RADIUS * SECONDARY_ROOM_LIMIT_FACTOR;

    for _ in 0..count {
        // parents may themselves be secondary rooms placed earlier in this loop
        let parent_index = rng.random_range(0..rooms.len());
        let parent = &rooms[parent_index];
        let parent_centroid = calculate_centroid(&parent.polygon);
        let (parent_height, parent_age) = (parent.height, parent.age);

        let angle = rng.random::<f32>() * TAU;
        let distance = calculate_max_radius(&parent.polygon, parent_centroid) + 0.5 + rng.random::<f32>() * 1.5;
        let position = parent_centroid + Vec2::from_angle(angle) * distance;

        let size = ROOM_MIN_SIZE + rng.random::<f32>() * (ROOM_MAX_SIZE - ROOM_MIN_SIZE) * 0.8;
        let base_height = parent_height * (0.8 + rng.random::<f32>() * 0.4);
        let height = base_height * height_factor(noise, position, params.height_variation);

        if position.length() <= limit {
            rooms.push(Room {
                polygon: generate_polygon(position, size, 4, noise, rng),
                height,
                age: parent_age + 1,
                connections: vec![Connection::room(parent_index)],
                position,
            });
        }
    }
}
