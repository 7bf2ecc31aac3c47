use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;

use ancient_city_gen::city::poly::Polygon;
use ancient_city_gen::city::poly::utils::{polygon_area, polygon_bounds, polygon_centroid};

// all fills are centroid fans, fine for the star-shaped outlines the city
// produces but not for arbitrary concave footprints

fn empty_mesh() -> Mesh {
    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
    )
}

// counter-clockwise copy, the fan and wall winding below assume it
fn ccw(polygon: &[Vec2]) -> Polygon {
    let mut out = polygon.to_vec();
    if polygon_area(&out) < 0.0 {
        out.reverse();
    }
    out
}

#[derive(Default)]
struct MeshBuffers {
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
    indices: Vec<u32>,
}

impl MeshBuffers {
    fn vertex(&mut self, position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> u32 {
        self.positions.push(position);
        self.normals.push(normal);
        self.uvs.push(uv);
        (self.positions.len() - 1) as u32
    }

    // horizontal fan at height y
    fn cap(&mut self, polygon: &[Vec2], y: f32, up: bool) {
        let centroid = polygon_centroid(polygon, polygon_area(polygon));
        let (min, size) = match polygon_bounds(polygon) {
            Some(b) => (b.min, Vec2::new(b.width(), b.height()).max(Vec2::splat(f32::EPSILON))),
            None => return,
        };
        let normal = if up { [0.0, 1.0, 0.0] } else { [0.0, -1.0, 0.0] };
        let uv = |p: Vec2| {
            let t = (p - min) / size;
            [t.x, t.y]
        };

        let center = self.vertex([centroid.x, y, centroid.y], normal, uv(centroid));
        for v in polygon {
            self.vertex([v.x, y, v.y], normal, uv(*v));
        }
        let n = polygon.len() as u32;
        for i in 0..n {
            let a = center + 1 + i;
            let b = center + 1 + (i + 1) % n;
            if up {
                self.indices.extend([center, b, a]);
            } else {
                self.indices.extend([center, a, b]);
            }
        }
    }

    // quad strip joining the bottom ring to the top ring
    fn walls(&mut self, bottom: &[Vec2], bottom_y: f32, top: &[Vec2], top_y: f32) {
        let n = bottom.len().min(top.len());
        for i in 0..n {
            let next = (i + 1) % n;
            let (b1, b2, t1, t2) = (bottom[i], bottom[next], top[i], top[next]);

            let p = [
                Vec3::new(b1.x, bottom_y, b1.y),
                Vec3::new(b2.x, bottom_y, b2.y),
                Vec3::new(t1.x, top_y, t1.y),
                Vec3::new(t2.x, top_y, t2.y),
            ];
            // sloped for tapered tiers
            let normal = (p[2] - p[0]).cross(p[1] - p[0]).normalize_or_zero();
            let normal = normal.to_array();

            let run = b1.distance(b2);
            let rise = top_y - bottom_y;
            let base = self.vertex(p[0].to_array(), normal, [0.0, 0.0]);
            self.vertex(p[1].to_array(), normal, [run, 0.0]);
            self.vertex(p[2].to_array(), normal, [0.0, rise]);
            self.vertex(p[3].to_array(), normal, [run, rise]);

            self.indices.extend([base, base + 2, base + 1]);
            self.indices.extend([base + 1, base + 2, base + 3]);
        }
    }

    fn into_mesh(self) -> Mesh {
        let mut mesh = empty_mesh();
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, self.positions);
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, self.normals);
        mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, self.uvs);
        mesh.insert_indices(Indices::U32(self.indices));
        mesh
    }
}

/// Flat, upward-facing footprint at height `y`
pub fn polygon_to_footprint(polygon: &Polygon, y: f32) -> Mesh {
    if polygon.len() < 3 {
        return empty_mesh();
    }
    let mut buffers = MeshBuffers::default();
    buffers.cap(&ccw(polygon), y, true);
    buffers.into_mesh()
}

/// Vertical prism over the footprint, from `base_y` up by `height`
pub fn polygon_to_building(polygon: &Polygon, base_y: f32, height: f32) -> Mesh {
    polygon_to_frustum(polygon, polygon, base_y, base_y + height)
}

/// Tapered solid between two outlines with matching vertex counts,
/// used for platform tiers
pub fn polygon_to_frustum(base: &Polygon, top: &Polygon, base_y: f32, top_y: f32) -> Mesh {
    if base.len() < 3 || base.len() != top.len() {
        return empty_mesh();
    }

    let (base, top): (Polygon, Polygon) = if polygon_area(base) < 0.0 {
        (base.iter().rev().copied().collect(), top.iter().rev().copied().collect())
    } else {
        (base.clone(), top.clone())
    };

    let mut buffers = MeshBuffers::default();
    buffers.walls(&base, base_y, &top, top_y);
    buffers.cap(&base, base_y, false);
    buffers.cap(&top, top_y, true);
    buffers.into_mesh()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::render::mesh::VertexAttributeValues;

    fn square(half: f32) -> Polygon {
        vec![
            Vec2::new(-half, -half),
            Vec2::new(half, -half),
            Vec2::new(half, half),
            Vec2::new(-half, half),
        ]
    }

    fn positions(mesh: &Mesh) -> Vec<[f32; 3]> {
        match mesh.attribute(Mesh::ATTRIBUTE_POSITION) {
            Some(VertexAttributeValues::Float32x3(p)) => p.clone(),
            _ => Vec::new(),
        }
    }

    #[test]
    fn footprint_is_a_fan() {
        let mesh = polygon_to_footprint(&square(1.0), 0.0);
        assert_eq!(positions(&mesh).len(), 5);
        assert_eq!(mesh.indices().map(|i| i.len()), Some(12));
    }

    #[test]
    fn prism_spans_the_requested_height() {
        let mesh = polygon_to_building(&square(1.0), 2.0, 3.0);
        let ys: Vec<f32> = positions(&mesh).iter().map(|p| p[1]).collect();
        assert!(ys.iter().all(|y| (2.0..=5.0).contains(y)));
        assert!(ys.contains(&5.0));
    }

    #[test]
    fn clockwise_input_still_faces_up() {
        let mut cw = square(1.0);
        cw.reverse();
        let mesh = polygon_to_footprint(&cw, 0.0);
        let p = positions(&mesh);
        let Some(Indices::U32(idx)) = mesh.indices() else { panic!("u32 indices") };
        let [a, b, c] = [idx[0], idx[1], idx[2]].map(|i| Vec3::from_array(p[i as usize]));
        assert!((b - a).cross(c - a).y > 0.0);
    }

    #[test]
    fn mismatched_rings_give_an_empty_mesh() {
        let mesh = polygon_to_frustum(&square(2.0), &square(1.0)[..3].to_vec(), 0.0, 1.0);
        assert!(positions(&mesh).is_empty());
    }
}
