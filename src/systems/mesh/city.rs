use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ancient_city_gen::city::{Layout, RingTier};

use super::mesh_gen::{polygon_to_building, polygon_to_footprint, polygon_to_frustum};

// entity hierarchy components
#[derive(Component)]
pub struct City {
    pub seed: u64,
}

#[derive(Component)]
pub struct PlatformTier(pub usize);

#[derive(Component)]
pub struct CourtyardMarker(pub usize);

#[derive(Component)]
pub struct RoomMarker(pub usize);

#[derive(Component)]
pub struct HouseMarker {
    pub courtyard: usize,
    pub tier: RingTier,
}

// footprints sit a hair above the ground to avoid z-fighting
const FOOTPRINT_LIFT: f32 = 0.02;

fn tier_color(tier: RingTier) -> Color {
    match tier {
        RingTier::Large => Color::srgb(0.78, 0.66, 0.50),
        RingTier::Medium => Color::srgb(0.74, 0.63, 0.49),
        RingTier::Small => Color::srgb(0.70, 0.60, 0.47),
        RingTier::Tiny => Color::srgb(0.66, 0.57, 0.45),
    }
}

// older things read darker
fn weathered(color: Color, age: f32) -> Color {
    let k = 1.0 - (age.clamp(0.0, 10.0) * 0.025);
    let c = color.to_srgba();
    Color::srgb(c.red * k, c.green * k, c.blue * k)
}

pub fn spawn_city(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    layout: &Layout,
    seed: u64,
    stepped: bool,
) -> Entity {
    let city = commands.spawn((City { seed }, Transform::default(), Visibility::Visible)).id();

    // tint jitter only, geometry comes from the layout
    let mut rng = StdRng::seed_from_u64(seed);
    let mut jitter = |base: f32| (base + rng.random_range(-0.03_f32..0.03)).clamp(0.0, 1.0);

    // platform
    let stone = materials.add(StandardMaterial {
        base_color: Color::srgb(0.62, 0.58, 0.52),
        perceptual_roughness: 0.9,
        ..default()
    });
    let tiers = if stepped { layout.platform.stepped_tiers() } else { layout.platform.tiers.clone() };
    for (i, tier) in tiers.iter().enumerate() {
        let mesh = polygon_to_frustum(&tier.base, &tier.top, tier.base_height, tier.top_height());
        let entity = commands
            .spawn((PlatformTier(i), Mesh3d(meshes.add(mesh)), MeshMaterial3d(stone.clone()), Transform::default()))
            .id();
        commands.entity(city).add_child(entity);
    }

    // courtyards are open ground
    let paving = materials.add(StandardMaterial {
        base_color: Color::srgb(0.85, 0.78, 0.64),
        perceptual_roughness: 1.0,
        ..default()
    });
    for (i, courtyard) in layout.courtyards.iter().enumerate() {
        let mesh = polygon_to_footprint(&courtyard.polygon, FOOTPRINT_LIFT);
        let entity = commands
            .spawn((CourtyardMarker(i), Mesh3d(meshes.add(mesh)), MeshMaterial3d(paving.clone()), Transform::default()))
            .id();
        commands.entity(city).add_child(entity);
    }

    for (i, room) in layout.rooms.iter().enumerate() {
        let color = weathered(Color::srgb(jitter(0.80), jitter(0.72), jitter(0.60)), room.age as f32);
        let material = materials.add(StandardMaterial { base_color: color, ..default() });
        let mesh = polygon_to_building(&room.polygon, 0.0, room.height);
        let entity = commands
            .spawn((RoomMarker(i), Mesh3d(meshes.add(mesh)), MeshMaterial3d(material), Transform::default()))
            .id();
        commands.entity(city).add_child(entity);
    }

    // one material per tier, houses are too many to give each its own
    let house_materials: Vec<Handle<StandardMaterial>> = RingTier::ALL
        .iter()
        .map(|tier| materials.add(StandardMaterial { base_color: tier_color(*tier), ..default() }))
        .collect();
    for house in &layout.houses {
        let mesh = polygon_to_building(&house.footprint, 0.0, house.height);
        let entity = commands
            .spawn((
                HouseMarker { courtyard: house.courtyard_index, tier: house.tier },
                Mesh3d(meshes.add(mesh)),
                MeshMaterial3d(house_materials[house.tier as usize].clone()),
                Transform::default(),
            ))
            .id();
        commands.entity(city).add_child(entity);
    }

    let stats = layout.stats();
    info!(
        "spawned city: {} courtyards, {} rooms, {} houses",
        stats.courtyards, stats.rooms, stats.houses
    );
    city
}
