// Configuration file, 1 unit = 1 metre-ish (scene units)
// This controls the initial generation parameter settings

// City layout
pub const CITY_RADIUS: f32 = 50.0;          // nominal city radius; courtyards/outliers are measured against it
pub const COURTYARD_MIN_SIZE: f32 = 4.0;
pub const COURTYARD_MAX_SIZE: f32 = 8.0;
pub const ROOM_MIN_SIZE: f32 = 2.0;
pub const ROOM_MAX_SIZE: f32 = 4.0;
pub const WALL_HEIGHT: f32 = 3.0;

// Default generation parameters
pub const DEFAULT_SEED: u64 = 12345;
pub const DEFAULT_PLATFORM_SEED: u64 = 23456;
pub const DEFAULT_COMPLEXITY: f32 = 2.0;       // 0.5 - 3.0
pub const DEFAULT_HEIGHT_VARIATION: f32 = 0.4; // 0.1 - 2.0
pub const DEFAULT_COURTYARD_COUNT: i32 = 9;    // 1 - 20
pub const DEFAULT_COURTYARD_SIZE: f32 = 1.1;
pub const DEFAULT_COURTYARD_SPACING: f32 = 1.4;
pub const DEFAULT_PLATFORM_SIZE: f32 = 1.0;
pub const DEFAULT_ROOM_SPREAD: f32 = 1.0;

// Parameter clamps, anything outside gets pulled back in
pub const COMPLEXITY_RANGE: (f32, f32) = (0.5, 3.0);
pub const HEIGHT_VARIATION_RANGE: (f32, f32) = (0.1, 2.0);
pub const MAX_COURTYARD_COUNT: i32 = 20;
pub const MIN_SCALE_PARAM: f32 = 0.1; // floor for size/spacing/spread multipliers

// Platform
pub const PLATFORM_SIDES: usize = 16;
pub const PLATFORM_BASE_WIDTH: f32 = 40.0;
pub const PLATFORM_BASE_DEPTH: f32 = 50.0;
pub const PLATFORM_EXCLUSION_FACTOR: f32 = 1.5; // courtyards keep this multiple of the platform radius

// Placement budgets
pub const COURTYARD_PLACEMENT_ATTEMPTS: usize = 50;
pub const SECONDARY_ROOM_LIMIT_FACTOR: f32 = 10.0; // sanity bound, x CITY_RADIUS
pub const ROOM_JITTER: f32 = 0.2;

// Courtyard houses
pub const HOUSES_PER_COURTYARD: f32 = 220.0;  // before size ratio / variation
pub const HOUSE_PADDING: f32 = 0.3;
pub const HOUSE_SKEW: f32 = 0.15;            // corner skew span, fraction of width/length
pub const PLATFORM_HOUSE_CLEARANCE: f32 = 1.0;

// Collision grid
pub const HOUSE_CELL_SIZE: f32 = 1.0;       // rooms and ring houses share one fine grid

// Surface field
pub const VORONOI_CELL_COUNT: usize = 24;
pub const FBM_LACUNARITY: f64 = 2.1;
pub const FBM_GAIN: f64 = 0.5;
pub const MIN_OCTAVES: f64 = 1.0;
pub const MAX_OCTAVES: f64 = 6.0;
pub const CROSS_SCALE_LOW: f64 = 0.37;
pub const CROSS_SCALE_HIGH: f64 = 3.7;
pub const SURFACE_CACHE_CAPACITY: usize = 20;

// Viewer
pub const GROUND_SIZE: f32 = 300.0;
pub const GROUND_RESOLUTION: u32 = 512;
