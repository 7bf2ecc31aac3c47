use std::fs;

use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::math::bounding::Aabb2d;
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowPlugin};
use bevy_egui::EguiPlugin;
use bevy_rts_camera::*;

use ancient_city_gen::config::GROUND_SIZE;
use ancient_city_gen::LayoutParams;

pub mod systems;

// import modules here
use systems::ground::GroundPlugin;
use systems::mesh::CityGenerationPlugin;
use systems::ui::UIPlugin;

// optional first argument: a json file of layout params, missing keys take defaults
fn load_params() -> LayoutParams {
    let Some(path) = std::env::args().nth(1) else {
        return LayoutParams::default();
    };

    match fs::read_to_string(&path).map(|text| LayoutParams::from_json_str(&text)) {
        Ok(Ok(params)) => {
            info!("loaded params from {path}");
            params
        }
        Ok(Err(e)) => {
            warn!("ignoring {path}, bad params: {e}");
            LayoutParams::default()
        }
        Err(e) => {
            warn!("ignoring {path}: {e}");
            LayoutParams::default()
        }
    }
}

fn main() -> bevy::app::AppExit {
    let params = load_params();

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Ancient City".into(),
                mode: bevy::window::WindowMode::Windowed,
                resolution: bevy::window::WindowResolution::new(1920.0, 1080.0),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin::default())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .add_plugins(RtsCameraPlugin)

        // my custom plugins
        .add_plugins(GroundPlugin)
        .add_plugins(CityGenerationPlugin { params })
        .add_plugins(UIPlugin)

        .insert_resource(ClearColor(Color::srgb(0.62, 0.72, 0.82))) // sky
        .add_systems(Startup, (start, maximize_window))
        .add_systems(Update, handle_exit)
        .run()
}

fn maximize_window(mut windows: Query<&mut Window, With<PrimaryWindow>>) {
    for mut window in windows.iter_mut() {
        window.set_maximized(true);
    }
}

// application entry point here
fn start(
    mut commands: Commands
) {
    let half = GROUND_SIZE * 0.5;

    // spawn camera
    commands.spawn((
        RtsCamera {
            bounds: Aabb2d::new(Vec2::ZERO, Vec2::splat(half)),
            min_angle: 0.5,
            height_max: 180.0,
            ..default()
        },
        RtsCameraControls {
            key_up: KeyCode::KeyW,
            key_down: KeyCode::KeyS,
            key_left: KeyCode::KeyA,
            key_right: KeyCode::KeyD,
            key_rotate_left: KeyCode::F24,
            key_rotate_right: KeyCode::F23,
            pan_speed: 40.0,
            zoom_sensitivity: 0.15,
            edge_pan_width: 0.0,
            ..default()
        },
    ));

    // low sun so walls cast long shadows
    commands.spawn((
        DirectionalLight {
            illuminance: 6_000.,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(40.0, 30.0, 20.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

// application exit
fn handle_exit(
    keys: Res<ButtonInput<KeyCode>>,
    mut exit: EventWriter<AppExit>,
) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}
