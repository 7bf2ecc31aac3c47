// occupancy grid used to reject overlapping placements

use std::collections::HashSet;

use glam::Vec2;

/// Sparse set of occupied cells, append-only for one generation run.
///
/// Continuous coordinates are bucketed with `floor(coord / cell_size)`.
#[derive(Clone, Debug)]
pub struct CollisionGrid {
    cell_size: f32,
    occupied: HashSet<(i32, i32)>,
}

impl CollisionGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: cell_size.max(f32::EPSILON),
            occupied: HashSet::new(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn cell(&self, x: f32, z: f32) -> (i32, i32) {
        (
            (x / self.cell_size).floor() as i32,
            (z / self.cell_size).floor() as i32,
        )
    }

    pub fn mark_occupied(&mut self, x: f32, z: f32) {
        let cell = self.cell(x, z);
        self.occupied.insert(cell);
    }

    pub fn is_occupied(&self, x: f32, z: f32) -> bool {
        self.occupied.contains(&self.cell(x, z))
    }

    pub fn len(&self) -> usize {
        self.occupied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupied.is_empty()
    }

    /// Mark every cell whose sample point lies within `radius` of `center`.
    ///
    /// Walks the bounding box in cell steps and tests distance squared,
    /// the disc is rasterised rather than stored.
    pub fn mark_disc(&mut self, center: Vec2, radius: f32) {
        let r_sq = radius * radius;
        let step = self.cell_size;
        let steps = (radius / step).ceil() as i32;

        for i in -steps..=steps {
            for j in -steps..=steps {
                let offset = Vec2::new(i as f32 * step, j as f32 * step);
                if offset.length_squared() <= r_sq {
                    let p = center + offset;
                    self.mark_occupied(p.x, p.y);
                }
            }
        }
        // the centre cell is always taken, even for tiny radii
        self.mark_occupied(center.x, center.y);
    }

    /// Cells covered by the axis-aligned box `center ± half_extent`
    fn box_cells(&self, center: Vec2, half_extent: f32) -> impl Iterator<Item = (i32, i32)> + use<> {
        let (min_x, min_z) = self.cell(center.x - half_extent, center.y - half_extent);
        let (max_x, max_z) = self.cell(center.x + half_extent, center.y + half_extent);
        (min_x..=max_x).flat_map(move |gx| (min_z..=max_z).map(move |gz| (gx, gz)))
    }

    /// True when no cell under the box is occupied
    pub fn box_free(&self, center: Vec2, half_extent: f32) -> bool {
        self.box_cells(center, half_extent)
            .all(|cell| !self.occupied.contains(&cell))
    }

    pub fn mark_box(&mut self, center: Vec2, half_extent: f32) {
        let cells: Vec<_> = self.box_cells(center, half_extent).collect();
        self.occupied.extend(cells);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HOUSE_CELL_SIZE;

    #[test]
    fn cells_are_floored() {
        let grid = CollisionGrid::new(3.0);
        assert_eq!(grid.cell(0.0, 0.0), (0, 0));
        assert_eq!(grid.cell(2.99, 5.9), (0, 1));
        assert_eq!(grid.cell(-0.1, -3.0), (-1, -1));
    }

    #[test]
    fn marking_is_per_cell() {
        let mut grid = CollisionGrid::new(3.0);
        assert!(!grid.is_occupied(1.0, 1.0));
        grid.mark_occupied(1.0, 1.0);
        assert!(grid.is_occupied(2.5, 0.1));
        assert!(!grid.is_occupied(3.5, 0.1));
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn disc_covers_centre_and_not_far_cells() {
        let mut grid = CollisionGrid::new(1.0);
        grid.mark_disc(Vec2::new(10.2, -4.7), 3.0);
        assert!(grid.is_occupied(10.2, -4.7));
        assert!(grid.is_occupied(12.2, -4.7));
        assert!(!grid.is_occupied(15.0, -4.7));
        assert!(!grid.is_occupied(10.2, 0.0));
    }

    #[test]
    fn boxes_collide_with_marked_cells() {
        let mut grid = CollisionGrid::new(1.0);
        assert!(grid.box_free(Vec2::new(5.0, 5.0), 1.2));
        grid.mark_box(Vec2::new(5.0, 5.0), 1.2);
        assert!(!grid.box_free(Vec2::new(6.5, 5.0), 0.5));
        assert!(grid.box_free(Vec2::new(9.5, 5.0), 0.5));
    }

    #[test]
    fn disc_catches_every_point_one_diagonal_inside() {
        let mut grid = CollisionGrid::new(HOUSE_CELL_SIZE);
        let center = Vec2::new(-7.35, 3.8);
        let radius = 4.6;
        grid.mark_disc(center, radius);

        let reach = radius - std::f32::consts::SQRT_2 * HOUSE_CELL_SIZE - 0.01;
        for i in 0..72 {
            for k in 0..=10 {
                let p = center + Vec2::from_angle(i as f32 * 0.0873) * reach * (k as f32 / 10.0);
                assert!(grid.is_occupied(p.x, p.y), "{p:?} missed");
            }
        }
    }
}
