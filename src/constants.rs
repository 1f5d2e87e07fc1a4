//! Visual and interaction tuning constants.
//!
//! The flow and easing numbers are tuned by eye; keep them exact so the
//! distortion looks the same across builds.

// Camera
pub const CAMERA_FOV_DEG: f32 = 45.0;
pub const CAMERA_Z: f32 = 20.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 100.0;

// Flow field
pub const FLOW_FALLOFF: f32 = 0.15; // spatial reach of an injected impulse (uv units)
pub const FLOW_DISSIPATION: f32 = 0.88; // per-frame retention of existing flow
pub const FLOW_ALPHA: f32 = 1.0; // impulse opacity
pub const VELOCITY_EASE: f32 = 0.1; // lerp factor toward the pointer velocity per frame

// Pointer
pub const MIN_EVENT_INTERVAL_MS: f64 = 14.0;
pub const POINTER_SENTINEL: f32 = -1.0;
pub const POINTER_QUEUE_CAPACITY: usize = 64;

// Media plane sizing: the plane is PLANE_HEIGHT_UNITS tall and
// PLANE_WIDTH_UNITS wide, measured in screen.height / PLANE_REFERENCE_UNIT.
pub const PLANE_REFERENCE_UNIT: f32 = 170.0;
pub const PLANE_HEIGHT_UNITS: f32 = 100.0;
pub const PLANE_WIDTH_UNITS: f32 = 175.0;
pub const PLANE_WIDTH_SEGMENTS: u32 = 100;
pub const PLANE_HEIGHT_SEGMENTS: u32 = 50;

// Per-frame plane animation; both zero keeps the plane flat and still.
pub const PLANE_SPEED: f32 = 0.0;
pub const PLANE_TIME_STEP: f32 = 0.0;

// Renderer
pub const CLEAR_COLOR: [f64; 4] = [0.10196, 0.10196, 0.10980, 1.0];
pub const DEFAULT_IMAGE: &str = "images/sky.jpg";
pub const DEFAULT_CAPTION: &str = "New Synagogue";
