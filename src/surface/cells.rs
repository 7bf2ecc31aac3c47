// cellular pattern used to break up tiling
//
// a handful of random sites, each with its own value; sampling returns the
// nearest site's value, softened toward the edge to the second nearest.
// sites repeat on a unit period so the pattern tiles like the rest of the field

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spade::{DelaunayTriangulation, HasPosition, Point2, Triangulation as _};

use ::noise::Value;

use super::noise::signed_tileable;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellSite {
    pub position: Point2<f64>,
    pub value: f64,
}

impl HasPosition for CellSite {
    type Scalar = f64;

    fn position(&self) -> Point2<f64> {
        self.position
    }
}

/// Random sites in [-0.5, 0.5)², copied onto the eight neighbouring periods
/// and kept in one Delaunay triangulation.
///
/// The second nearest site is always a Delaunay neighbour of the nearest, so
/// one nearest-neighbour walk plus a scan of its edges answers both. Queries
/// are wrapped into the centre period, where the copies make every distance
/// the periodic one.
pub struct CellPattern {
    triangulation: DelaunayTriangulation<CellSite>,
    sites: usize,
    distortion: Value,
}

impl CellPattern {
    pub fn new(count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut triangulation = DelaunayTriangulation::new();

        let sites: Vec<CellSite> = (0..count)
            .map(|_| {
                let x = rng.random::<f64>() - 0.5;
                let y = rng.random::<f64>() - 0.5;
                let value = rng.random::<f64>() * 0.5 + 0.25;
                CellSite { position: Point2::new(x, y), value }
            })
            .collect();

        for ox in [-1.0, 0.0, 1.0] {
            for oy in [-1.0, 0.0, 1.0] {
                for site in &sites {
                    let position = Point2::new(site.position.x + ox, site.position.y + oy);
                    triangulation.insert(CellSite { position, ..*site }).ok();
                }
            }
        }

        let distortion = Value::new(rng.random());
        Self { triangulation, sites: sites.len(), distortion }
    }

    /// Distinct sites, not counting the periodic copies
    pub fn len(&self) -> usize {
        self.sites
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Nearest value plus `ratio * 0.4` edge smoothing and `± 0.2` noise
    /// distortion, clamped to [0, 1]. `(u, v)` is mapped to `((u, v) - 0.5) * scale`
    /// and wrapped into the centre period.
    pub fn sample(&self, u: f64, v: f64, scale: f64) -> f64 {
        let wrap = |t: f64| ((t - 0.5) * scale + 0.5).rem_euclid(1.0) - 0.5;
        let query = Point2::new(wrap(u), wrap(v));

        let Some(nearest) = self.triangulation.nearest_neighbor(query) else {
            return 0.5;
        };

        let d1 = nearest.position().distance_2(query).sqrt();
        let d2 = nearest
            .out_edges()
            .map(|edge| edge.to().position().distance_2(query).sqrt())
            .fold(f64::INFINITY, f64::min);

        let ratio = if d2.is_finite() && d1 + d2 > 0.0 { d1 / (d1 + d2) } else { 0.5 };
        let distortion = signed_tileable(&self.distortion, u, v, 2.0) * 0.2;

        (nearest.data().value + ratio * 0.4 + distortion).clamp(0.0, 1.0)
    }
}
