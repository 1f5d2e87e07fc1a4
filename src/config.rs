//! Runtime configuration for the gallery.
//!
//! Every field defaults from `constants.rs`; the web front-end only overrides
//! the media list.

use crate::constants::*;

#[derive(Clone, Debug)]
pub struct CameraConfig {
    pub fov_deg: f32,
    pub z: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_deg: CAMERA_FOV_DEG,
            z: CAMERA_Z,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FlowConfig {
    pub falloff: f32,
    pub dissipation: f32,
    pub alpha: f32,
    pub velocity_ease: f32,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            falloff: FLOW_FALLOFF,
            dissipation: FLOW_DISSIPATION,
            alpha: FLOW_ALPHA,
            velocity_ease: VELOCITY_EASE,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PointerConfig {
    pub min_interval_ms: f64,
    pub queue_capacity: usize,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: MIN_EVENT_INTERVAL_MS,
            queue_capacity: POINTER_QUEUE_CAPACITY,
        }
    }
}

/// One image shown on its own plane.
#[derive(Clone, Debug, PartialEq)]
pub struct MediaEntry {
    pub source: String,
    pub caption: String,
}

impl MediaEntry {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            caption: String::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub camera: CameraConfig,
    pub flow: FlowConfig,
    pub pointer: PointerConfig,
    pub media: Vec<MediaEntry>,
    /// Run the distortion pass; when false the scene is drawn straight to
    /// the screen.
    pub distortion: bool,
    pub clear_color: [f64; 4],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            flow: FlowConfig::default(),
            pointer: PointerConfig::default(),
            media: vec![MediaEntry {
                source: DEFAULT_IMAGE.to_owned(),
                caption: DEFAULT_CAPTION.to_owned(),
            }],
            distortion: true,
            clear_color: CLEAR_COLOR,
        }
    }
}

impl AppConfig {
    /// Replace the media list from a comma-separated list of image URLs.
    /// Blank entries are skipped; an empty result keeps the current list.
    pub fn with_media_list(mut self, list: &str) -> Self {
        let media: Vec<MediaEntry> = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(MediaEntry::new)
            .collect();
        if !media.is_empty() {
            self.media = media;
        }
        self
    }
}
