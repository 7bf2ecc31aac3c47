use std::path::PathBuf;

use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin}; // fps
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPlugin, EguiPrimaryContextPass};

use ancient_city_gen::city::RingTier;
use ancient_city_gen::config::*;
use ancient_city_gen::surface::{ColorRamp, TerrainFeatures};
use ancient_city_gen::Seed;

use crate::systems::export::{ExportEvent, ExportFormat};
use crate::systems::ground::{GroundSurface, RefreshGroundEvent};
use crate::systems::mesh::{CityParams, CurrentLayout, RegenerateEvent, ViewOptions};

// text field contents for the seeds, applied on enter
#[derive(Resource, Default)]
pub struct SeedText {
    pub city: String,
    pub platform: String,
    pub ground: String,
}

pub struct UIPlugin;

impl Plugin for UIPlugin {
    fn build(&self, app: &mut App) {
        assert!(app.is_plugin_added::<EguiPlugin>());
        app
            .insert_resource(SeedText::default())
            .add_systems(EguiPrimaryContextPass, (ui_main, layout_stats, fps)); // UI rendering here
    }
}

fn seed_field(ui: &mut egui::Ui, label: &str, text: &mut String, seed: &mut Seed) -> bool {
    if text.is_empty() {
        *text = seed.to_string();
    }
    let mut changed = false;
    ui.horizontal(|ui| {
        ui.label(label);
        let response = ui.text_edit_singleline(text);
        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            let next = Seed::from(text.trim());
            changed = next != *seed;
            *seed = next;
        }
    });
    changed
}

fn ui_main(
    mut contexts: EguiContexts,
    mut params: ResMut<CityParams>,
    mut seed_text: ResMut<SeedText>,
    mut surface: ResMut<GroundSurface>,
    mut options: ResMut<ViewOptions>,
    mut regen_events: EventWriter<RegenerateEvent>,
    mut ground_events: EventWriter<RefreshGroundEvent>,
    mut export_events: EventWriter<ExportEvent>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    egui::SidePanel::left("config_panel")
        .default_width(260.0)
        .min_width(250.0)
        .max_width(400.0)
        .resizable(true)
        .show(ctx, |ui| {
            let mut regenerate = false;
            let mut refresh_ground = false;
            let params = &mut params.0;

            // camera
            ui.label("Camera: ");
            ui.label("WASD - Move");
            ui.label("Scroll - Zoom");
            ui.label("MMB - Rotate");

            ui.separator();

            egui::CollapsingHeader::new("Seed")
                .default_open(true)
                .show(ui, |ui| {
                    let SeedText { city, platform, .. } = &mut *seed_text;
                    regenerate |= seed_field(ui, "City:", city, &mut params.seed);
                    regenerate |= seed_field(ui, "Platform:", platform, &mut params.platform_seed);

                    if ui.button("Random Seed").clicked() {
                        params.seed = Seed::Number(rand::random());
                        *city = params.seed.to_string();
                        regenerate = true;
                    }
                });

            egui::CollapsingHeader::new("City")
                .default_open(true)
                .show(ui, |ui| {
                    regenerate |= ui.add(egui::Slider::new(&mut params.complexity, COMPLEXITY_RANGE.0..=COMPLEXITY_RANGE.1)
                        .text("Complexity"))
                        .on_hover_text("Outline detail and how many rooms grow off each courtyard.")
                        .changed();
                    regenerate |= ui.add(egui::Slider::new(&mut params.height_variation, HEIGHT_VARIATION_RANGE.0..=HEIGHT_VARIATION_RANGE.1)
                        .text("Height Variation"))
                        .on_hover_text("How much room heights drift with the noise field.")
                        .changed();
                    regenerate |= ui.add(egui::Slider::new(&mut params.room_spread, 0.5..=2.0)
                        .text("Room Spread"))
                        .on_hover_text("Distance of the first rooms from their courtyard.")
                        .changed();
                });

            egui::CollapsingHeader::new("Courtyards")
                .default_open(true)
                .show(ui, |ui| {
                    regenerate |= ui.add(egui::Slider::new(&mut params.courtyard_count, 1..=MAX_COURTYARD_COUNT)
                        .text("Count"))
                        .on_hover_text("Upper bound, crowded layouts may place fewer.")
                        .changed();
                    regenerate |= ui.add(egui::Slider::new(&mut params.courtyard_size, 0.5..=2.0)
                        .text("Size"))
                        .changed();
                    regenerate |= ui.add(egui::Slider::new(&mut params.courtyard_spacing, 1.0..=3.0)
                        .text("Spacing"))
                        .on_hover_text("Minimum gap between courtyards, as a multiple of their radii.")
                        .changed();
                });

            egui::CollapsingHeader::new("Platform")
                .default_open(false)
                .show(ui, |ui| {
                    regenerate |= ui.add(egui::Slider::new(&mut params.platform_size, 0.5..=2.0)
                        .text("Size"))
                        .changed();
                    regenerate |= ui.checkbox(&mut options.stepped_platform, "Stepped")
                        .on_hover_text("Draw the mound as a flight of steps")
                        .changed();
                });

            egui::CollapsingHeader::new("Ground")
                .default_open(false)
                .show(ui, |ui| {
                    let s = &mut surface.0;
                    refresh_ground |= seed_field(ui, "Seed:", &mut seed_text.ground, &mut s.seed);
                    refresh_ground |= ui.add(egui::Slider::new(&mut s.scale, 1.0..=20.0).text("Scale")).changed();
                    refresh_ground |= ui.add(egui::Slider::new(&mut s.complexity, 0.5..=3.0)
                        .text("Complexity"))
                        .on_hover_text("Octaves and fine detail")
                        .changed();
                    refresh_ground |= ui.add(egui::Slider::new(&mut s.subtleness, 0.0..=1.0).text("Subtleness")).changed();
                    refresh_ground |= ui.add(egui::Slider::new(&mut s.tile_repeat, 1.0..=8.0).text("Tile Repeat")).changed();
                    refresh_ground |= ui.checkbox(&mut s.anti_tiling, "Anti-tiling").changed();

                    let mut features = s.features.is_some();
                    if ui.checkbox(&mut features, "Cracks & Dunes").changed() {
                        s.features = features.then(TerrainFeatures::default);
                        refresh_ground = true;
                    }
                    if let Some(f) = s.features.as_mut() {
                        refresh_ground |= ui.add(egui::Slider::new(&mut f.intensity, 0.0..=1.0).text("Intensity")).changed();
                    }

                    ui.horizontal(|ui| {
                        if ui.button("Sand").clicked() {
                            s.ramp = ColorRamp::sand();
                            refresh_ground = true;
                        }
                        if ui.button("Stone").clicked() {
                            s.ramp = ColorRamp::stone();
                            refresh_ground = true;
                        }
                    });
                });

            ui.separator();

            ui.horizontal(|ui| {
                if ui.button("Export OBJ")
                    .on_hover_text("Export the scene meshes, current directory")
                    .clicked() {
                    export_events.write(ExportEvent { path: export_path(&params.seed, "obj"), format: ExportFormat::Obj });
                }
                if ui.button("Export JSON")
                    .on_hover_text("Export the layout document, current directory")
                    .clicked() {
                    export_events.write(ExportEvent { path: export_path(&params.seed, "json"), format: ExportFormat::Json });
                }
            });

            ui.separator();
            ui.label("ESC - Exit");

            // trigger regeneration on any parameter change
            if regenerate {
                regen_events.write(RegenerateEvent);
            }
            if refresh_ground {
                ground_events.write(RefreshGroundEvent);
            }
        });
}

// the seed names the file, regenerating the same seed overwrites it
fn export_path(seed: &Seed, extension: &str) -> PathBuf {
    PathBuf::from(format!("city_{}.{extension}", seed.value()))
}

fn layout_stats(mut contexts: EguiContexts, current: Res<CurrentLayout>) {
    let (Ok(ctx), Some(layout)) = (contexts.ctx_mut(), current.0.as_ref()) else {
        return;
    };
    let stats = layout.stats();

    egui::Area::new(egui::Id::new("layout_stats"))
        .anchor(egui::Align2::RIGHT_BOTTOM, egui::Vec2::new(-10.0, -10.0))
        .show(ctx, |ui| {
            ui.with_layout(egui::Layout::top_down(egui::Align::RIGHT), |ui| {
                ui.label(format!("{} courtyards", stats.courtyards));
                ui.label(format!("{} rooms ({} primary)", stats.rooms, stats.primary_rooms));
                for tier in RingTier::ALL {
                    ui.label(format!("{} {} houses", stats.houses_in(tier), tier.as_str()));
                }
            });
        });
}

fn fps(
    mut contexts: EguiContexts,
    diagnostics: Res<DiagnosticsStore>,
) {
    if let Ok(ctx) = contexts.ctx_mut() {
        egui::Area::new(egui::Id::new("fps_counter"))
            .anchor(egui::Align2::RIGHT_TOP, egui::Vec2::new(-10.0, 10.0))
            .show(ctx, |ui| {
                if let Some(fps) = diagnostics
                    .get(&FrameTimeDiagnosticsPlugin::FPS)
                    .and_then(|d| d.smoothed())
                {
                    ui.label(egui::RichText::new(format!("{:.0}", fps))
                        .size(26.0)
                        .color(egui::Color32::WHITE));
                }
            });
    }
}
