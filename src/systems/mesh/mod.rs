// this is the entry point for the city generation plugin
use bevy::prelude::*;

use ancient_city_gen::{generate, Layout, LayoutParams};

pub mod city;
pub mod mesh_gen;

use city::{spawn_city, City};

// resources
#[derive(Resource, Clone, Default)]
pub struct CityParams(pub LayoutParams);

#[derive(Resource, Default)]
pub struct CurrentLayout(pub Option<Layout>);

#[derive(Resource, Default)]
pub struct ViewOptions {
    // draw the platform as a flight of steps instead of two tiers
    pub stepped_platform: bool,
}

// rebuild the scene from the current CityParams
#[derive(Event)]
pub struct RegenerateEvent;

// main plugin for generation
pub struct CityGenerationPlugin {
    pub params: LayoutParams,
}

impl Plugin for CityGenerationPlugin {
    fn build(&self, app: &mut App) {
        app
            .insert_resource(CityParams(self.params.clone()))
            .insert_resource(CurrentLayout::default())
            .insert_resource(ViewOptions::default())
            .add_event::<RegenerateEvent>()
            .add_event::<crate::systems::export::ExportEvent>()
            .add_systems(Startup, |mut events: EventWriter<RegenerateEvent>| {
                events.write(RegenerateEvent);
            })
            .add_systems(Update, (handle_regeneration, crate::systems::export::handle_export).chain());
    }
}

pub fn handle_regeneration(
    mut commands: Commands,
    mut events: EventReader<RegenerateEvent>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    params: Res<CityParams>,
    options: Res<ViewOptions>,
    mut current: ResMut<CurrentLayout>,
    query: Query<Entity, With<City>>,
) {
    // several requests in one frame collapse into one rebuild
    if events.read().count() == 0 {
        return;
    }

    // cleanup existing city, children go with it
    for entity in query.iter() {
        commands.entity(entity).try_despawn();
    }

    let layout = generate(&params.0);
    spawn_city(
        &mut commands,
        &mut meshes,
        &mut materials,
        &layout,
        params.0.seed.value(),
        options.stepped_platform,
    );
    current.0 = Some(layout);
}
