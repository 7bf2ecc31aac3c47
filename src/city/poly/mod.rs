use glam::Vec2;

pub mod shapes;
pub mod utils;

// 2d polygon datatype, x/z plane of the scene
// insertion order is the winding, closed implicitly
pub type Polygon = Vec<Vec2>;
