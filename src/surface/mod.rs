// procedural sand / stone surface field
//
// a pure function of (u, v) built from seeded value noise, fractal sums, a
// cellular pattern and low-frequency drift; every layer repeats on the unit
// square so rasters tile without seams. rasterised images are memoised in a
// FieldCache

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::*;
use crate::seed::{splitmix, Seed};

pub mod cache;
pub mod cells;
pub mod color;
pub mod noise;

pub use cache::FieldCache;
pub use cells::CellPattern;
pub use color::{ColorRamp, ColorStop};

use self::noise::{cracks, dunes, fbm, global_variation, lerp, octaves_for_complexity, smoothstep, NoiseLayers};

// blend weights with anti-tiling on, they sum to one and none dominates fully
const BASE_WEIGHT: f64 = 0.72;
const CELL_WEIGHT: f64 = 0.18;
const GLOBAL_WEIGHT: f64 = 0.05;
const CROSS_WEIGHT: f64 = 0.05;

/// Optional cracks and dunes laid over the field
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainFeatures {
    pub scale: f64,
    pub intensity: f64,
}

impl Default for TerrainFeatures {
    fn default() -> Self {
        Self { scale: 1.0, intensity: 0.6 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceParams {
    pub seed: Seed,
    /// noise cells across the unit square for the base octave
    pub scale: f64,
    /// 0.5 - 3.0, maps continuously onto 1 - 6 octaves
    pub complexity: f64,
    pub ramp: ColorRamp,
    /// 0 - 1, flattens the colour ramp toward its average
    pub subtleness: f64,
    pub anti_tiling: bool,
    /// frequency of the global drift layer
    pub macro_scale: f64,
    /// how often the raster repeats across a surface, consumers apply it
    pub tile_repeat: f64,
    pub features: Option<TerrainFeatures>,
    /// slope multiplier for normal rasters
    pub normal_strength: f64,
}

impl Default for SurfaceParams {
    fn default() -> Self {
        Self {
            seed: Seed::default(),
            scale: 6.0,
            complexity: 1.5,
            ramp: ColorRamp::sand(),
            subtleness: 0.7,
            anti_tiling: true,
            macro_scale: 2.0,
            tile_repeat: 3.0,
            features: Some(TerrainFeatures::default()),
            normal_strength: 2.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RasterKind {
    /// rgba8
    Color,
    /// one channel
    Height,
    /// rgba8, tangent-space z-up normal
    Normal,
    /// one channel
    Roughness,
}

impl RasterKind {
    pub fn channels(self) -> usize {
        match self {
            RasterKind::Color | RasterKind::Normal => 4,
            RasterKind::Height | RasterKind::Roughness => 1,
        }
    }
}

/// Row-major 8-bit image
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    pub width: u32,
    pub height: u32,
    pub kind: RasterKind,
    pub data: Vec<u8>,
}

impl Raster {
    pub fn channels(&self) -> usize {
        self.kind.channels()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let c = self.channels();
        let start = (y as usize * self.width as usize + x as usize) * c;
        self.data.get(start..start + c)
    }
}

fn to_byte(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// A ready-to-sample surface. Building one precomputes the seed-derived
/// parts (cell sites, octave count, subtle ramp); sampling is pure.
pub struct SurfaceField {
    params: SurfaceParams,
    noise: NoiseLayers,
    octaves: f64,
    detail: f64,
    ramp: ColorRamp,
    cells: Option<CellPattern>,
}

impl SurfaceField {
    pub fn new(params: &SurfaceParams) -> Self {
        let complexity = if params.complexity.is_finite() { params.complexity } else { 1.5 };
        let subtleness = if params.subtleness.is_finite() { params.subtleness.clamp(0.0, 1.0) } else { 0.0 };

        Self {
            params: params.clone(),
            noise: NoiseLayers::new(params.seed.noise_seed()),
            octaves: octaves_for_complexity(complexity),
            detail: smoothstep(0.5, 3.0, complexity),
            ramp: params.ramp.subtle((subtleness * 0.7) as f32),
            cells: params
                .anti_tiling
                .then(|| CellPattern::new(VORONOI_CELL_COUNT, splitmix(params.seed.rng_seed() ^ 0xce11))),
        }
    }

    pub fn params(&self) -> &SurfaceParams {
        &self.params
    }

    pub fn octaves(&self) -> f64 {
        self.octaves
    }

    /// Field value at `(u, v)`, always in [0, 1] and periodic with period one
    pub fn sample_scalar(&self, u: f64, v: f64) -> f64 {
        let f = self.params.scale;
        let n = &self.noise;

        let mut value = fbm(&n.base, u, v, f, self.octaves);

        // detail layer: a second sum at twice the frequency fades in with complexity
        if self.detail > 0.0 {
            let fine = fbm(&n.detail, u, v, f * 2.0, self.octaves);
            value = lerp(value, fine, self.detail * 0.35);
        }

        if let Some(cells) = &self.cells {
            let cell = cells.sample(u, v, 1.0);
            let drift = global_variation(&n.drift, u, v, self.params.macro_scale);
            let cross = 0.5 * fbm(&n.base, u, v, f * CROSS_SCALE_LOW, self.octaves)
                + 0.5 * fbm(&n.base, u, v, f * CROSS_SCALE_HIGH, self.octaves);

            value = value * BASE_WEIGHT + cell * CELL_WEIGHT + drift * GLOBAL_WEIGHT + cross * CROSS_WEIGHT;
        }

        if let Some(features) = self.params.features {
            let crack = cracks(&n.cracks, u, v, features.scale) * features.intensity;
            if crack > 0.1 {
                value *= 1.0 - (crack * 2.0).min(1.0) * 0.35;
            }
            let dune = dunes(&n.dunes, u, v, 0.7 * features.scale);
            value += (dune - 0.5) * 0.15 * features.intensity;
        }

        // contrast rises with detail
        let value = value.clamp(0.0, 1.0).powf(lerp(1.0, 1.3, self.detail));
        if value.is_finite() { value.clamp(0.0, 1.0) } else { 0.5 }
    }

    /// Colour at `(u, v)` from the subtle ramp, linear rgb
    pub fn sample_color(&self, u: f64, v: f64) -> Vec3 {
        self.ramp.sample(self.sample_scalar(u, v) as f32)
    }

    pub fn sample_roughness(&self, u: f64, v: f64) -> f64 {
        (0.8 - (self.sample_scalar(u, v) - 0.5) * 0.3).clamp(0.0, 1.0)
    }

    /// Z-up normal from central differences of the scalar field, taken
    /// across the wrap at the square's edges
    pub fn sample_normal(&self, u: f64, v: f64, delta: f64) -> Vec3 {
        let wrap = |t: f64| t.rem_euclid(1.0);
        let dx = self.sample_scalar(wrap(u + delta), v) - self.sample_scalar(wrap(u - delta), v);
        let dy = self.sample_scalar(u, wrap(v + delta)) - self.sample_scalar(u, wrap(v - delta));
        let s = self.params.normal_strength;
        Vec3::new((-dx * s) as f32, (-dy * s) as f32, 1.0).normalize()
    }

    /// Rasterise the field over the unit square
    pub fn rasterize(&self, width: u32, height: u32, kind: RasterKind) -> Raster {
        let mut data = Vec::with_capacity(width as usize * height as usize * kind.channels());
        let delta = 1.0 / width.max(1) as f64;

        for py in 0..height {
            let v = py as f64 / height as f64;
            for px in 0..width {
                let u = px as f64 / width as f64;
                match kind {
                    RasterKind::Color => {
                        let c = self.sample_color(u, v);
                        data.extend([to_byte(c.x as f64), to_byte(c.y as f64), to_byte(c.z as f64), 255]);
                    }
                    RasterKind::Height => data.push(to_byte(self.sample_scalar(u, v))),
                    RasterKind::Normal => {
                        let n = self.sample_normal(u, v, delta) * 0.5 + Vec3::splat(0.5);
                        data.extend([to_byte(n.x as f64), to_byte(n.y as f64), to_byte(n.z as f64), 255]);
                    }
                    RasterKind::Roughness => data.push(to_byte(self.sample_roughness(u, v))),
                }
            }
        }

        Raster { width, height, kind, data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> impl Iterator<Item = (f64, f64)> {
        (0..24).flat_map(|i| (0..24).map(move |j| (i as f64 / 24.0, j as f64 / 24.0)))
    }

    #[test]
    fn scalar_stays_in_unit_range_for_all_knobs() {
        for complexity in [0.5, 1.2, 3.0, 10.0] {
            for anti_tiling in [false, true] {
                for features in [None, Some(TerrainFeatures { scale: 2.0, intensity: 1.0 })] {
                    let field = SurfaceField::new(&SurfaceParams {
                        complexity,
                        anti_tiling,
                        features,
                        ..Default::default()
                    });
                    for (u, v) in grid() {
                        let s = field.sample_scalar(u, v);
                        assert!((0.0..=1.0).contains(&s), "{s} at {u},{v}");
                    }
                }
            }
        }
    }

    #[test]
    fn colors_stay_inside_the_ramp() {
        let field = SurfaceField::new(&SurfaceParams { subtleness: 0.2, ..Default::default() });
        let (lo, hi) = ColorRamp::sand().channel_bounds();
        for (u, v) in grid() {
            let c = field.sample_color(u, v);
            assert!(c.cmpge(lo - 1e-5).all() && c.cmple(hi + 1e-5).all());
        }
    }

    #[test]
    fn out_of_square_coordinates_still_sample() {
        let field = SurfaceField::new(&SurfaceParams::default());
        for (u, v) in [(-3.5, 0.2), (12.0, -7.25), (1e6, 1e6)] {
            assert!((0.0..=1.0).contains(&field.sample_scalar(u, v)));
        }
    }

    #[test]
    fn rasters_have_the_right_shape() {
        let field = SurfaceField::new(&SurfaceParams::default());
        for kind in [RasterKind::Color, RasterKind::Height, RasterKind::Normal, RasterKind::Roughness] {
            let raster = field.rasterize(8, 5, kind);
            assert_eq!(raster.data.len(), 8 * 5 * kind.channels());
            assert_eq!(raster.pixel(7, 4).map(<[u8]>::len), Some(kind.channels()));
            assert!(raster.pixel(8, 0).is_none());
        }
    }

    #[test]
    fn normals_point_up() {
        let field = SurfaceField::new(&SurfaceParams::default());
        let raster = field.rasterize(6, 6, RasterKind::Normal);
        for px in raster.data.chunks(4) {
            assert!(px[2] >= 128, "normal z below horizon: {px:?}");
        }
    }

    #[test]
    fn field_repeats_across_the_unit_square() {
        for complexity in [0.5, 1.7, 3.0] {
            for anti_tiling in [false, true] {
                for features in [None, Some(TerrainFeatures { scale: 1.5, intensity: 1.0 })] {
                    let field = SurfaceField::new(&SurfaceParams {
                        complexity,
                        anti_tiling,
                        features,
                        ..Default::default()
                    });
                    for i in 0..24 {
                        let t = i as f64 / 24.0;
                        let (left, right) = (field.sample_scalar(0.0, t), field.sample_scalar(1.0, t));
                        assert!((left - right).abs() < 1e-6, "u seam {left} vs {right} at {t}");
                        let (top, bottom) = (field.sample_scalar(t, 0.0), field.sample_scalar(t, 1.0));
                        assert!((top - bottom).abs() < 1e-6, "v seam {top} vs {bottom} at {t}");
                    }
                }
            }
        }
    }

    #[test]
    fn raster_edges_meet_like_interior_pixels() {
        let field = SurfaceField::new(&SurfaceParams::default());
        let raster = field.rasterize(64, 64, RasterKind::Height);
        let at = |x: u32, y: u32| raster.pixel(x, y).map_or(0.0, |p| p[0] as f64);

        let (mut seam, mut inside) = (0.0, 0.0);
        for y in 0..64 {
            seam += (at(63, y) - at(0, y)).abs();
            inside += (at(32, y) - at(31, y)).abs();
        }
        // the wrap step is just another neighbour step
        assert!(seam <= inside * 2.0 + 64.0, "seam {seam} vs inside {inside}");
    }

    #[test]
    fn normals_agree_across_the_wrap() {
        let field = SurfaceField::new(&SurfaceParams::default());
        for i in 0..12 {
            let t = i as f64 / 12.0;
            let a = field.sample_normal(0.0, t, 1.0 / 128.0);
            let b = field.sample_normal(1.0, t, 1.0 / 128.0);
            assert!(a.abs_diff_eq(b, 1e-4), "{a} vs {b}");
        }
    }

    #[test]
    fn seed_changes_the_field() {
        let a = SurfaceField::new(&SurfaceParams::default());
        let b = SurfaceField::new(&SurfaceParams { seed: Seed::Number(DEFAULT_SEED + 1), ..Default::default() });
        assert!(grid().any(|(u, v)| a.sample_scalar(u, v) != b.sample_scalar(u, v)));
    }
}
