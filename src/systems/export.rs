// saves the scene as an obj file by iterating through all the meshes,
// or the layout itself as json

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use bevy::render::mesh::{Indices, VertexAttributeValues};

use ancient_city_gen::export::write_layout_json;
use ancient_city_gen::ExportError;

use crate::systems::mesh::CurrentLayout;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Obj,
    Json,
}

// export event
#[derive(Event)]
pub struct ExportEvent {
    pub path: PathBuf,
    pub format: ExportFormat,
}

// OBJ indices start at 1
pub fn write_obj<'a, W: Write>(writer: &mut W, meshes: impl IntoIterator<Item = &'a Mesh>) -> std::io::Result<usize> {
    writeln!(writer, "# ancient city layout")?;

    let mut vertex_offset = 1u32;
    let mut mesh_count = 0;

    for mesh in meshes {
        let Some(VertexAttributeValues::Float32x3(vertices)) = mesh.attribute(Mesh::ATTRIBUTE_POSITION) else {
            continue;
        };

        writeln!(writer, "o Mesh_{mesh_count}")?;
        for v in vertices {
            writeln!(writer, "v {} {} {}", v[0], v[1], v[2])?;
        }

        let faces: Vec<u32> = match mesh.indices() {
            Some(Indices::U16(indices)) => indices.iter().map(|&i| i as u32).collect(),
            Some(Indices::U32(indices)) => indices.clone(),
            None => Vec::new(),
        };
        for tri in faces.chunks_exact(3) {
            writeln!(
                writer,
                "f {} {} {}",
                vertex_offset + tri[0],
                vertex_offset + tri[1],
                vertex_offset + tri[2]
            )?;
        }

        vertex_offset += vertices.len() as u32;
        writeln!(writer)?;
        mesh_count += 1;
    }

    Ok(mesh_count)
}

pub fn export_obj(
    meshes: &Assets<Mesh>,
    mesh_entities: &Query<&Mesh3d>,
    path: &Path,
) -> Result<usize, ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ExportError::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| ExportError::io(path, e))?;
    let mut writer = BufWriter::new(file);

    let count = write_obj(&mut writer, mesh_entities.iter().filter_map(|m| meshes.get(&m.0)))
        .and_then(|count| writer.flush().map(|_| count))
        .map_err(|e| ExportError::io(path, e))?;

    info!("exported {count} meshes to {}", path.display());
    Ok(count)
}

// handle export events
pub fn handle_export(
    mut events: EventReader<ExportEvent>,
    meshes: Res<Assets<Mesh>>,
    mesh_entities: Query<&Mesh3d>,
    current: Res<CurrentLayout>,
) {
    for event in events.read() {
        let result = match event.format {
            ExportFormat::Obj => export_obj(&meshes, &mesh_entities, &event.path).map(|_| ()),
            ExportFormat::Json => match &current.0 {
                Some(layout) => write_layout_json(layout, &event.path),
                None => {
                    warn!("nothing to export yet");
                    continue;
                }
            },
        };

        if let Err(e) = result {
            error!("export failed: {e}");
        }
    }
}
