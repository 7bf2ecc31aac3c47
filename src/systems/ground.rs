// sand ground plane textured from the procedural surface field
use bevy::image::{ImageAddressMode, ImageSampler, ImageSamplerDescriptor};
use bevy::prelude::*;
use bevy::render::mesh::VertexAttributeValues;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

use ancient_city_gen::config::{GROUND_RESOLUTION, GROUND_SIZE};
use ancient_city_gen::surface::{Raster, RasterKind};
use ancient_city_gen::{FieldCache, SurfaceParams};

#[derive(Resource, Clone, Default)]
pub struct GroundSurface(pub SurfaceParams);

// rasters survive slider round trips
#[derive(Resource, Default)]
pub struct SurfaceCache(pub FieldCache);

#[derive(Component)]
pub struct Ground;

#[derive(Event)]
pub struct RefreshGroundEvent;

pub struct GroundPlugin;

impl Plugin for GroundPlugin {
    fn build(&self, app: &mut App) {
        app
            .insert_resource(GroundSurface::default())
            .insert_resource(SurfaceCache::default())
            .add_event::<RefreshGroundEvent>()
            .add_systems(Startup, |mut events: EventWriter<RefreshGroundEvent>| {
                events.write(RefreshGroundEvent);
            })
            .add_systems(Update, refresh_ground);
    }
}

pub fn raster_to_image(raster: &Raster) -> Image {
    let format = match raster.kind {
        RasterKind::Color => TextureFormat::Rgba8UnormSrgb,
        RasterKind::Normal => TextureFormat::Rgba8Unorm,
        RasterKind::Height | RasterKind::Roughness => TextureFormat::R8Unorm,
    };

    let mut image = Image::new(
        Extent3d { width: raster.width, height: raster.height, depth_or_array_layers: 1 },
        TextureDimension::D2,
        raster.data.clone(),
        format,
        RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
    );
    image.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
        address_mode_u: ImageAddressMode::Repeat,
        address_mode_v: ImageAddressMode::Repeat,
        ..default()
    });
    image
}

fn ground_mesh(tile_repeat: f32) -> Mesh {
    let mut mesh = Plane3d::default().mesh().size(GROUND_SIZE, GROUND_SIZE).build();
    if let Some(VertexAttributeValues::Float32x2(uvs)) = mesh.attribute_mut(Mesh::ATTRIBUTE_UV_0) {
        for uv in uvs.iter_mut() {
            uv[0] *= tile_repeat;
            uv[1] *= tile_repeat;
        }
    }
    if let Err(e) = mesh.generate_tangents() {
        warn!("ground tangents unavailable, normal map skipped: {e}");
    }
    mesh
}

pub fn refresh_ground(
    mut commands: Commands,
    mut events: EventReader<RefreshGroundEvent>,
    surface: Res<GroundSurface>,
    mut cache: ResMut<SurfaceCache>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut images: ResMut<Assets<Image>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    query: Query<Entity, With<Ground>>,
) {
    if events.read().count() == 0 {
        return;
    }

    for entity in query.iter() {
        commands.entity(entity).try_despawn();
    }

    let params = &surface.0;
    let color = cache.0.get_or_insert(params, GROUND_RESOLUTION, GROUND_RESOLUTION, RasterKind::Color);
    let normal = cache.0.get_or_insert(params, GROUND_RESOLUTION, GROUND_RESOLUTION, RasterKind::Normal);

    let material = materials.add(StandardMaterial {
        base_color_texture: Some(images.add(raster_to_image(&color))),
        normal_map_texture: Some(images.add(raster_to_image(&normal))),
        perceptual_roughness: 0.95,
        reflectance: 0.1,
        ..default()
    });

    let repeat = if params.tile_repeat.is_finite() { params.tile_repeat.max(1.0) as f32 } else { 1.0 };
    commands.spawn((
        Ground,
        Mesh3d(meshes.add(ground_mesh(repeat))),
        MeshMaterial3d(material),
        Transform::from_xyz(0.0, -0.01, 0.0),
    ));
    debug!("ground refreshed, {} rasters cached", cache.0.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_channel_rasters_map_to_r8() {
        let raster = Raster { width: 2, height: 2, kind: RasterKind::Height, data: vec![0, 64, 128, 255] };
        let image = raster_to_image(&raster);
        assert_eq!(image.texture_descriptor.format, TextureFormat::R8Unorm);
        assert_eq!(image.width(), 2);
    }
}
