// Host-side tests for pointer sampling and velocity tracking.

use flow_gallery::config::PointerConfig;
use flow_gallery::constants::POINTER_SENTINEL;
use flow_gallery::input::*;
use flow_gallery::viewport::Screen;
use glam::Vec2;

const CANVAS: Screen = Screen {
    width: 800.0,
    height: 600.0,
};

fn tracker() -> PointerTracker {
    PointerTracker::new(&PointerConfig::default())
}

#[test]
fn starts_idle_at_sentinel() {
    let t = tracker();
    assert_eq!(t.state(), TrackerState::Idle);
    assert_eq!(t.position(), Vec2::splat(POINTER_SENTINEL));
    assert_eq!(t.velocity(), Vec2::ZERO);
}

#[test]
fn first_sample_has_zero_velocity() {
    let mut t = tracker();
    t.record(PointerSample::new(400.0, 150.0, 5000.0), CANVAS);
    assert_eq!(t.velocity(), Vec2::ZERO);
    assert_eq!(t.state(), TrackerState::Tracking);
    assert_eq!(t.position(), Vec2::new(0.5, 0.75));
}

#[test]
fn velocity_is_pixels_per_millisecond() {
    let mut t = tracker();
    t.record(PointerSample::new(0.0, 0.0, 0.0), CANVAS);
    t.record(PointerSample::new(50.0, -25.0, 25.0), CANVAS);
    assert_eq!(t.velocity(), Vec2::new(2.0, -1.0));
}

#[test]
fn interval_floor_is_fourteen_ms() {
    let mut t = tracker();
    t.record(PointerSample::new(0.0, 0.0, 100.0), CANVAS);
    t.record(PointerSample::new(100.0, 0.0, 102.0), CANVAS);
    assert!((t.velocity().x - 100.0 / 14.0).abs() < 1e-5);

    // Same timestamp twice must not divide by zero.
    t.record(PointerSample::new(114.0, 0.0, 102.0), CANVAS);
    assert!((t.velocity().x - 1.0).abs() < 1e-5);
}

#[test]
fn idle_frame_resets_to_sentinel() {
    let mut t = tracker();
    t.record(PointerSample::new(10.0, 10.0, 0.0), CANVAS);
    t.record(PointerSample::new(38.0, 10.0, 14.0), CANVAS);

    // The frame that saw motion keeps it.
    t.decay();
    assert_eq!(t.state(), TrackerState::Tracking);
    assert_eq!(t.velocity(), Vec2::new(2.0, 0.0));
    assert!(!t.is_dirty());

    // The next one without samples does not.
    t.decay();
    assert_eq!(t.state(), TrackerState::Idle);
    assert_eq!(t.velocity(), Vec2::ZERO);
    assert_eq!(t.position(), Vec2::splat(POINTER_SENTINEL));
}

#[test]
fn begin_frame_drains_queue_then_decays() {
    let mut t = tracker();
    let mut q = PointerQueue::new(8);
    q.push(PointerSample::new(0.0, 300.0, 0.0));
    q.push(PointerSample::new(28.0, 300.0, 14.0));
    t.begin_frame(&mut q, CANVAS);
    assert!(q.is_empty());
    assert_eq!(t.state(), TrackerState::Tracking);
    assert_eq!(t.velocity(), Vec2::new(2.0, 0.0));
    assert_eq!(t.position(), Vec2::new(28.0 / 800.0, 0.5));

    t.begin_frame(&mut q, CANVAS);
    assert_eq!(t.state(), TrackerState::Idle);
    assert_eq!(t.velocity(), Vec2::ZERO);
}

#[test]
fn movement_after_idle_diffs_against_last_reading() {
    let mut t = tracker();
    t.record(PointerSample::new(0.0, 0.0, 0.0), CANVAS);
    t.decay();
    t.decay();
    t.record(PointerSample::new(140.0, 0.0, 1000.0), CANVAS);
    assert!((t.velocity().x - 0.14).abs() < 1e-6);
}

#[test]
fn page_coordinates_are_the_fallback() {
    let s = PointerSample::from_coords(None, (12.0, 34.0), 1.0);
    assert_eq!((s.x, s.y), (12.0, 34.0));
    let s = PointerSample::from_coords(Some((1.0, 2.0)), (12.0, 34.0), 1.0);
    assert_eq!((s.x, s.y), (1.0, 2.0));
}

#[test]
fn queue_drops_oldest_when_full() {
    let mut q = PointerQueue::new(3);
    for i in 0..5 {
        q.push(PointerSample::new(i as f32, 0.0, i as f64));
    }
    assert_eq!(q.len(), 3);
    let xs: Vec<f32> = q.drain().map(|s| s.x).collect();
    assert_eq!(xs, vec![2.0, 3.0, 4.0]);
}

#[test]
fn normalize_flips_y() {
    assert_eq!(normalize_pointer(Vec2::new(0.0, 600.0), CANVAS), Vec2::ZERO);
    assert_eq!(normalize_pointer(Vec2::new(800.0, 0.0), CANVAS), Vec2::ONE);
}

#[test]
fn touch_sample_uses_the_changed_touch() {
    let s = PointerSample::from_changed_touch(Some(((40.0, 50.0), (40.0, 550.0))), 7.0);
    assert_eq!(s, Some(PointerSample::new(40.0, 50.0, 7.0)));
    assert_eq!(PointerSample::from_changed_touch(None, 7.0), None);
}
