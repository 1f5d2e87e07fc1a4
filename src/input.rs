use crate::config::PointerConfig;
use crate::constants::POINTER_SENTINEL;
use crate::viewport::Screen;
use glam::Vec2;
use std::collections::VecDeque;

/// One pointer reading in window pixels, stamped with a millisecond clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub x: f32,
    pub y: f32,
    pub time_ms: f64,
}

impl PointerSample {
    pub fn new(x: f32, y: f32, time_ms: f64) -> Self {
        Self { x, y, time_ms }
    }

    /// Build a sample from an event's explicit coordinates, falling back to
    /// its page coordinates when those are missing.
    #[inline]
    pub fn from_coords(client: Option<(f32, f32)>, page: (f32, f32), time_ms: f64) -> Self {
        let (x, y) = client.unwrap_or(page);
        Self { x, y, time_ms }
    }

    /// Sample for a touch event, taken from its first changed touch as
    /// `(client, page)` coordinates. A touch that just landed is the changed
    /// one even when other fingers are already down.
    pub fn from_changed_touch(
        first_changed: Option<((f32, f32), (f32, f32))>,
        time_ms: f64,
    ) -> Option<Self> {
        let (client, page) = first_changed?;
        Some(Self::from_coords(Some(client), page, time_ms))
    }
}

/// Bounded FIFO of samples waiting for the next tick.
///
/// When full the oldest sample is dropped; only the most recent motion
/// matters for the velocity the tick ends up with.
#[derive(Clone, Debug)]
pub struct PointerQueue {
    samples: VecDeque<PointerSample>,
    capacity: usize,
}

impl PointerQueue {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, sample: PointerSample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = PointerSample> + '_ {
        self.samples.drain(..)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackerState {
    Idle,
    Tracking,
}

/// Pointer position and velocity as seen by the flow field.
///
/// Velocity is in window pixels per millisecond with +Y pointing down the
/// page; position is normalized over the canvas with +Y pointing up.
#[derive(Clone, Debug)]
pub struct PointerTracker {
    state: TrackerState,
    position: Vec2,
    last_raw: Vec2,
    last_time_ms: Option<f64>,
    velocity: Vec2,
    dirty: bool,
    min_interval_ms: f64,
}

impl PointerTracker {
    pub fn new(config: &PointerConfig) -> Self {
        Self {
            state: TrackerState::Idle,
            position: Vec2::splat(POINTER_SENTINEL),
            last_raw: Vec2::ZERO,
            last_time_ms: None,
            velocity: Vec2::ZERO,
            dirty: false,
            min_interval_ms: config.min_interval_ms,
        }
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn record(&mut self, sample: PointerSample, canvas: Screen) {
        let raw = Vec2::new(sample.x, sample.y);
        self.position = normalize_pointer(raw, canvas);

        // First contact: no previous reading to diff against.
        let last_time = match self.last_time_ms {
            Some(t) => t,
            None => {
                self.last_raw = raw;
                sample.time_ms
            }
        };

        let delta = raw - self.last_raw;
        self.last_raw = raw;

        let dt = (sample.time_ms - last_time).max(self.min_interval_ms);
        self.last_time_ms = Some(sample.time_ms);

        self.velocity = delta / dt as f32;
        self.dirty = true;
        self.state = TrackerState::Tracking;
    }

    /// Once per frame: with no sample since the previous frame the pointer
    /// counts as gone and its velocity as zero.
    pub fn decay(&mut self) {
        if !self.dirty {
            self.position = Vec2::splat(POINTER_SENTINEL);
            self.velocity = Vec2::ZERO;
            self.state = TrackerState::Idle;
        }
        self.dirty = false;
    }

    /// Apply every queued sample, then run the per-frame decay.
    pub fn begin_frame(&mut self, queue: &mut PointerQueue, canvas: Screen) {
        for sample in queue.drain() {
            self.record(sample, canvas);
        }
        self.decay();
    }
}

/// Map window pixels to `[0, 1]` over the canvas with 0 at the bottom.
#[inline]
pub fn normalize_pointer(raw: Vec2, canvas: Screen) -> Vec2 {
    let w = canvas.width.max(1.0);
    let h = canvas.height.max(1.0);
    Vec2::new(raw.x / w, 1.0 - raw.y / h)
}
