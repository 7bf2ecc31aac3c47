// procedural ancient-city layouts and the sand/stone surface fields that dress them
// everything in here is pure data generation, the viewer lives behind the `viewer` feature

pub mod city;
pub mod config;
pub mod error;
pub mod export;
pub mod seed;
pub mod surface;

pub use city::{generate, Layout, LayoutParams};
pub use error::ExportError;
pub use seed::Seed;
pub use surface::{FieldCache, SurfaceField, SurfaceParams};
