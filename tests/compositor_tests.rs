// Host-side tests for the post-processing chain, driven through the
// recording backend.

use flow_gallery::backend::headless::{Call, HeadlessBackend};
use flow_gallery::backend::Target;
use flow_gallery::compositor::{Compositor, Pass};
use flow_gallery::config::CameraConfig;
use flow_gallery::scene::{Geometry, Scene};
use flow_gallery::viewport::{Camera, Screen};

fn fixture() -> (HeadlessBackend, Scene, Camera) {
    (
        HeadlessBackend::new(),
        Scene::new(Geometry::plane(2, 2)),
        Camera::new(&CameraConfig::default()),
    )
}

fn draw_pass(index: usize, input: Target, output: Target) -> Call {
    Call::DrawPass {
        index,
        label: "distort",
        input,
        output,
    }
}

#[test]
fn single_pass_reads_buffer_and_writes_screen() {
    let (mut backend, scene, camera) = fixture();
    let mut c = Compositor::new(Screen::new(800.0, 600.0));
    c.add_pass(Pass::distortion(0.15));
    c.render(&mut backend, &scene, &camera, 0.0);
    assert_eq!(
        backend.calls(),
        &[
            Call::Render(Target::Buffer(0)),
            draw_pass(0, Target::Buffer(0), Target::Screen),
        ]
    );
}

#[test]
fn passes_ping_pong_between_buffers() {
    let (mut backend, scene, camera) = fixture();
    let mut c = Compositor::new(Screen::new(800.0, 600.0));
    c.add_pass(Pass::distortion(0.15));
    c.add_pass(Pass::distortion(0.15));
    c.add_pass(Pass::distortion(0.15));
    c.render(&mut backend, &scene, &camera, 0.0);
    assert_eq!(
        backend.calls(),
        &[
            Call::Render(Target::Buffer(0)),
            draw_pass(0, Target::Buffer(0), Target::Buffer(1)),
            draw_pass(1, Target::Buffer(1), Target::Buffer(0)),
            draw_pass(2, Target::Buffer(0), Target::Screen),
        ]
    );
}

#[test]
fn disabled_passes_fall_back_to_direct_render() {
    let (mut backend, scene, camera) = fixture();
    let mut c = Compositor::new(Screen::new(800.0, 600.0));
    c.add_pass(Pass::distortion(0.15));
    if let Some(p) = c.pass_mut(0) {
        p.enabled = false;
    }
    assert!(!c.has_active_passes());
    c.render(&mut backend, &scene, &camera, 0.0);
    assert_eq!(backend.calls(), &[Call::Render(Target::Screen)]);
}

#[test]
fn disabled_pass_is_skipped_in_chain() {
    let (mut backend, scene, camera) = fixture();
    let mut c = Compositor::new(Screen::new(800.0, 600.0));
    c.add_pass(Pass::distortion(0.15));
    c.add_pass(Pass::distortion(0.15));
    if let Some(p) = c.pass_mut(1) {
        p.enabled = false;
    }
    c.render(&mut backend, &scene, &camera, 0.0);
    assert_eq!(
        backend.calls().last(),
        Some(&draw_pass(0, Target::Buffer(0), Target::Screen))
    );
}

#[test]
fn distortion_pass_carries_falloff_and_resolution() {
    let mut c = Compositor::new(Screen::new(640.0, 480.0));
    let index = c.add_pass(Pass::distortion(0.15));
    let pass = &c.passes()[index];
    assert_eq!(pass.label, "distort");
    assert_eq!(pass.uniforms.falloff, 0.15);
    assert_eq!(pass.uniforms.resolution, [640.0, 480.0]);
    assert!(pass.fragment.contains("fn fs_main"));
}

#[test]
fn resize_updates_passes_and_targets() {
    let (mut backend, _, _) = fixture();
    let mut c = Compositor::new(Screen::new(640.0, 480.0));
    c.add_pass(Pass::distortion(0.15));
    let screen = Screen::new(1024.0, 768.0);
    c.resize(&mut backend, screen);
    assert_eq!(c.passes()[0].uniforms.resolution, [1024.0, 768.0]);
    assert_eq!(backend.calls(), &[Call::ResizeTargets(screen)]);
}

#[test]
fn render_stamps_time() {
    let (mut backend, scene, camera) = fixture();
    let mut c = Compositor::new(Screen::new(800.0, 600.0));
    c.add_pass(Pass::distortion(0.15));
    c.render(&mut backend, &scene, &camera, 2.5);
    assert_eq!(c.passes()[0].uniforms.time, 2.5);
}
