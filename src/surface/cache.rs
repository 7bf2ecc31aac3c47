use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use tracing::debug;

use crate::config::SURFACE_CACHE_CAPACITY;
use super::{Raster, RasterKind, SurfaceField, SurfaceParams};

/// Canonical form of everything a raster depends on.
///
/// Floats are compared by their exact `Debug` rendering, which round-trips,
/// so two keys are equal exactly when every field is. `tile_repeat` is left
/// out, consumers apply it and the raster doesn't change with it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceKey(String);

impl SurfaceKey {
    pub fn new(params: &SurfaceParams, width: u32, height: u32, kind: RasterKind) -> Self {
        let params = SurfaceParams { tile_repeat: 0.0, ..params.clone() };
        Self(format!("{kind:?}|{width}x{height}|{params:?}"))
    }
}

/// Bounded memo of rasterised fields, oldest insertions go first.
///
/// Once the size passes `capacity` the oldest half is dropped in one go.
#[derive(Debug)]
pub struct FieldCache {
    capacity: usize,
    entries: HashMap<SurfaceKey, Arc<Raster>>,
    order: VecDeque<SurfaceKey>,
}

impl Default for FieldCache {
    fn default() -> Self {
        Self::new(SURFACE_CACHE_CAPACITY)
    }
}

impl FieldCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, params: &SurfaceParams, width: u32, height: u32, kind: RasterKind) -> bool {
        self.entries.contains_key(&SurfaceKey::new(params, width, height, kind))
    }

    /// Cached raster for this parameter tuple, rasterising on a miss
    pub fn get_or_insert(
        &mut self,
        params: &SurfaceParams,
        width: u32,
        height: u32,
        kind: RasterKind,
    ) -> Arc<Raster> {
        let key = SurfaceKey::new(params, width, height, kind);
        if let Some(hit) = self.entries.get(&key) {
            return Arc::clone(hit);
        }

        debug!(?kind, width, height, seed = %params.seed, "rasterising surface");
        let raster = Arc::new(SurfaceField::new(params).rasterize(width, height, kind));
        self.entries.insert(key.clone(), Arc::clone(&raster));
        self.order.push_back(key);

        if self.entries.len() > self.capacity {
            self.evict();
        }
        raster
    }

    fn evict(&mut self) {
        let drop_count = (self.capacity / 2).max(1);
        for _ in 0..drop_count {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        debug!(remaining = self.entries.len(), "evicted oldest surface rasters");
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}
