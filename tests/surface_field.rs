// Surface field sampling, rasterisation and caching seen from outside the crate.

use std::sync::Arc;

use ancient_city_gen::surface::{ColorRamp, RasterKind, TerrainFeatures};
use ancient_city_gen::{FieldCache, Seed, SurfaceField, SurfaceParams};
use pretty_assertions::{assert_eq, assert_ne};

fn stone(seed: u64) -> SurfaceParams {
    SurfaceParams {
        seed: Seed::Number(seed),
        ramp: ColorRamp::stone(),
        subtleness: 0.2,
        features: None,
        ..Default::default()
    }
}

#[test]
fn scalar_field_is_bounded_for_a_parameter_sweep() {
    for complexity in [0.5, 1.0, 2.0, 3.0] {
        for subtleness in [0.0, 0.7, 1.0] {
            for scale in [0.5, 6.0, 40.0] {
                let field = SurfaceField::new(&SurfaceParams {
                    complexity,
                    subtleness,
                    scale,
                    features: Some(TerrainFeatures { scale: 1.5, intensity: 1.0 }),
                    ..Default::default()
                });
                for i in 0..16 {
                    let (u, v) = (i as f64 / 16.0, (i * 7 % 16) as f64 / 16.0);
                    let s = field.sample_scalar(u, v);
                    assert!((0.0..=1.0).contains(&s));
                }
            }
        }
    }
}

#[test]
fn colors_stay_within_stone_stops() {
    let field = SurfaceField::new(&stone(5));
    let (lo, hi) = ColorRamp::stone().channel_bounds();
    for i in 0..32 {
        for j in 0..32 {
            let c = field.sample_color(i as f64 / 32.0, j as f64 / 32.0);
            assert!(c.cmpge(lo - 1e-5).all() && c.cmple(hi + 1e-5).all(), "{c:?}");
        }
    }
}

#[test]
fn sampling_is_deterministic() {
    let a = SurfaceField::new(&SurfaceParams::default()).rasterize(16, 16, RasterKind::Color);
    let b = SurfaceField::new(&SurfaceParams::default()).rasterize(16, 16, RasterKind::Color);
    assert_eq!(a, b);
}

#[test]
fn cache_returns_the_same_raster_for_the_same_tuple() {
    let mut cache = FieldCache::default();
    let first = cache.get_or_insert(&stone(1), 16, 16, RasterKind::Color);
    let again = cache.get_or_insert(&stone(1), 16, 16, RasterKind::Color);
    assert!(Arc::ptr_eq(&first, &again));

    let next_seed = cache.get_or_insert(&stone(2), 16, 16, RasterKind::Color);
    assert!(!Arc::ptr_eq(&first, &next_seed));
    assert_ne!(first.data, next_seed.data);
}

#[test]
fn any_single_knob_misses_the_cache() {
    let mut cache = FieldCache::default();
    let base = stone(9);
    cache.get_or_insert(&base, 8, 8, RasterKind::Height);

    let variants = [
        SurfaceParams { scale: base.scale + 1.0, ..base.clone() },
        SurfaceParams { complexity: 2.5, ..base.clone() },
        SurfaceParams { anti_tiling: false, ..base.clone() },
        SurfaceParams { subtleness: 0.9, ..base.clone() },
        SurfaceParams { ramp: ColorRamp::sand(), ..base.clone() },
    ];
    for variant in &variants {
        assert!(!cache.contains(variant, 8, 8, RasterKind::Height));
    }
    assert!(cache.contains(&base, 8, 8, RasterKind::Height));
}

#[test]
fn cache_stays_bounded() {
    let mut cache = FieldCache::default();
    for seed in 0..50 {
        cache.get_or_insert(&stone(seed), 4, 4, RasterKind::Roughness);
        assert!(cache.len() <= 20);
    }
}

#[test]
fn params_load_from_partial_json() {
    let params: SurfaceParams = serde_json::from_str(r#"{ "seed": "dunes", "anti_tiling": false }"#).unwrap();
    assert_eq!(params.seed, Seed::Text("dunes".into()));
    assert!(!params.anti_tiling);
    assert_eq!(params.ramp, ColorRamp::sand());
}
