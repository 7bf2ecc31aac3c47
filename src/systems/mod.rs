pub mod export;
pub mod ground;
pub mod mesh;
pub mod ui;
