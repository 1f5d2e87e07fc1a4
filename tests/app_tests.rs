// End-to-end tests of the tick sequence against the headless backend.

use flow_gallery::app::App;
use flow_gallery::backend::headless::{Call, HeadlessBackend};
use flow_gallery::backend::Target;
use flow_gallery::config::AppConfig;
use flow_gallery::constants::{FLOW_DISSIPATION, POINTER_SENTINEL};
use flow_gallery::input::{PointerSample, TrackerState};
use flow_gallery::media::{ImageData, ImageLoadError, ImageLoader, ImageSlot, TextureState};
use flow_gallery::viewport::Screen;
use glam::Vec2;

/// Hands out pending slots and keeps them so tests can resolve loads.
#[derive(Default)]
struct ManualLoader {
    requests: Vec<(String, ImageSlot)>,
}

impl ImageLoader for ManualLoader {
    fn load(&mut self, source: &str) -> ImageSlot {
        let slot = ImageSlot::pending();
        self.requests.push((source.to_string(), slot.clone()));
        slot
    }
}

fn app_with(config: AppConfig, screen: Screen) -> (App<HeadlessBackend>, ManualLoader) {
    let mut loader = ManualLoader::default();
    let app = App::new(config, HeadlessBackend::new(), screen, &mut loader);
    (app, loader)
}

fn pixels(width: u32, height: u32) -> ImageData {
    ImageData {
        width,
        height,
        rgba: vec![128; (width * height * 4) as usize],
    }
}

fn kinds(calls: &[Call]) -> Vec<&'static str> {
    calls
        .iter()
        .map(|c| match c {
            Call::SetSize(_) => "set_size",
            Call::ResizeTargets(_) => "resize_targets",
            Call::UploadImage { .. } => "upload_image",
            Call::UpdateFlow(_) => "update_flow",
            Call::Render(Target::Screen) => "render_screen",
            Call::Render(Target::Buffer(_)) => "render_buffer",
            Call::DrawPass { .. } => "draw_pass",
            Call::FinishFrame => "finish_frame",
        })
        .collect()
}

#[test]
fn builds_one_plane_per_configured_image() {
    let config = AppConfig::default().with_media_list("a.jpg, b.jpg,,c.jpg");
    let (app, loader) = app_with(config, Screen::new(800.0, 600.0));
    assert_eq!(app.scene().planes().len(), 3);
    let sources: Vec<&str> = loader.requests.iter().map(|(s, _)| s.as_str()).collect();
    assert_eq!(sources, vec!["a.jpg", "b.jpg", "c.jpg"]);
    let plane = &app.scene().planes()[2];
    assert_eq!((plane.desc.index, plane.desc.total), (2, 3));
}

#[test]
fn default_config_loads_the_sample_image() {
    let (app, loader) = app_with(AppConfig::default(), Screen::new(800.0, 600.0));
    assert_eq!(loader.requests.len(), 1);
    assert_eq!(loader.requests[0].0, "images/sky.jpg");
    assert_eq!(app.config().media[0].caption, "New Synagogue");
    assert_eq!(
        kinds(app.backend().calls()),
        vec!["set_size", "resize_targets"]
    );
}

#[test]
fn empty_media_override_keeps_defaults() {
    let config = AppConfig::default().with_media_list(" , ");
    assert_eq!(config.media.len(), 1);
    assert_eq!(config.media[0].source, "images/sky.jpg");
}

#[test]
fn loaded_image_reaches_the_plane_uniforms() {
    let (mut app, loader) = app_with(AppConfig::default(), Screen::new(800.0, 600.0));
    app.tick(0.0);
    assert_eq!(app.images_loaded(), 0);
    assert!(!app.all_images_loaded());

    loader.requests[0].1.complete(Ok(pixels(800, 600)));
    app.backend_mut().clear_calls();
    app.tick(16.0);
    assert!(app.backend().calls().contains(&Call::UploadImage {
        plane: 0,
        width: 800,
        height: 600,
    }));
    assert_eq!(app.backend().drawn()[0].image_sizes, [800.0, 600.0]);
    assert_eq!(app.scene().planes()[0].texture(), TextureState::Ready);
    assert!(app.all_images_loaded());

    app.backend_mut().clear_calls();
    app.tick(32.0);
    assert!(!kinds(app.backend().calls()).contains(&"upload_image"));
}

#[test]
fn failed_image_never_counts_as_loaded() {
    let config = AppConfig::default().with_media_list("ok.jpg,missing.jpg");
    let (mut app, loader) = app_with(config, Screen::new(800.0, 600.0));
    loader.requests[0].1.complete(Ok(pixels(4, 4)));
    loader.requests[1].1.complete(Err(ImageLoadError::Network {
        url: "missing.jpg".into(),
        reason: "404".into(),
    }));
    for i in 0..3 {
        app.tick(i as f64 * 16.0);
    }
    assert_eq!(app.images_loaded(), 1);
    assert!(!app.all_images_loaded());
    assert_eq!(app.backend().drawn()[1].image_sizes, [0.0, 0.0]);
}

#[test]
fn tick_runs_flow_then_chain_then_present() {
    let (mut app, _) = app_with(AppConfig::default(), Screen::new(64.0, 48.0));
    app.backend_mut().clear_calls();
    app.tick(0.0);
    assert_eq!(
        kinds(app.backend().calls()),
        vec!["update_flow", "render_buffer", "draw_pass", "finish_frame"]
    );
    assert!(app.backend().calls().contains(&Call::DrawPass {
        index: 0,
        label: "distort",
        input: Target::Buffer(0),
        output: Target::Screen,
    }));
    assert_eq!(app.frame(), 1);
    assert_eq!(app.backend().frames(), 1);
}

#[test]
fn without_distortion_the_scene_goes_straight_to_screen() {
    let config = AppConfig {
        distortion: false,
        ..AppConfig::default()
    };
    let (mut app, _) = app_with(config, Screen::new(64.0, 48.0));
    assert!(app.compositor().is_none());
    assert_eq!(kinds(app.backend().calls()), vec!["set_size"]);
    app.backend_mut().clear_calls();
    app.tick(0.0);
    assert_eq!(
        kinds(app.backend().calls()),
        vec!["update_flow", "render_screen", "finish_frame"]
    );
}

#[test]
fn compositor_can_be_removed_at_runtime() {
    let (mut app, _) = app_with(AppConfig::default(), Screen::new(64.0, 48.0));
    app.set_compositor(None);
    app.backend_mut().clear_calls();
    app.tick(0.0);
    assert!(kinds(app.backend().calls()).contains(&"render_screen"));
}

#[test]
fn resize_reaches_every_dependent() {
    let (mut app, _) = app_with(AppConfig::default(), Screen::new(800.0, 600.0));
    app.backend_mut().clear_calls();
    let screen = Screen::new(1000.0, 170.0);
    app.resize(screen);

    assert_eq!(
        app.backend().calls(),
        &[Call::SetSize(screen), Call::ResizeTargets(screen)]
    );
    assert_eq!(app.screen(), screen);
    assert!((app.camera().aspect - 1000.0 / 170.0).abs() < 1e-5);
    let grid = app.backend().flow();
    assert_eq!((grid.width(), grid.height()), (1000, 170));
    assert!((app.flow().aspect - 1000.0 / 170.0).abs() < 1e-5);
    assert_eq!(
        app.compositor().map(|c| c.passes()[0].uniforms.resolution),
        Some([1000.0, 170.0])
    );

    let v = app.viewport();
    assert!((v.height - 16.568542).abs() < 1e-4);
    let sizes = app.scene().planes()[0].uniforms.plane_sizes;
    assert!((sizes[0] - v.width * 175.0 / 1000.0).abs() < 1e-4);
    assert!((sizes[1] - v.height * 100.0 / 170.0).abs() < 1e-4);
}

#[test]
fn pointer_samples_drive_the_flow_uniforms() {
    let screen = Screen::new(40.0, 30.0);
    let (mut app, _) = app_with(AppConfig::default(), screen);
    app.push_pointer(PointerSample::new(20.0, 15.0, 0.0));
    app.push_pointer(PointerSample::new(30.0, 15.0, 20.0));
    app.tick(20.0);

    assert_eq!(app.tracker().state(), TrackerState::Tracking);
    assert_eq!(app.flow().mouse, Vec2::new(0.75, 0.5));
    // 10px over 20ms, eased by 0.1.
    assert!((app.flow().velocity.x - 0.05).abs() < 1e-6);
    assert!(app.backend().flow().max_displacement() > 0.0);

    app.tick(36.0);
    assert_eq!(app.tracker().state(), TrackerState::Idle);
    assert_eq!(app.flow().mouse, Vec2::splat(POINTER_SENTINEL));
    assert!((app.flow().velocity.x - 0.045).abs() < 1e-6);
}

#[test]
fn idle_flow_fades_by_dissipation() {
    let (mut app, _) = app_with(AppConfig::default(), Screen::new(40.0, 30.0));
    app.push_pointer(PointerSample::new(10.0, 10.0, 0.0));
    app.push_pointer(PointerSample::new(24.0, 10.0, 14.0));
    app.tick(14.0);
    let start = app.backend().flow().max_displacement();
    assert!(start > 0.0);

    for frame in 1..=4 {
        app.tick(14.0 + frame as f64 * 16.0);
        let expected = start * FLOW_DISSIPATION.powi(frame);
        let got = app.backend().flow().max_displacement();
        assert!((got - expected).abs() < 1e-5, "frame {}: {} vs {}", frame, got, expected);
    }
}

#[test]
fn pass_time_counts_from_first_tick() {
    let (mut app, _) = app_with(AppConfig::default(), Screen::new(32.0, 32.0));
    app.tick(5000.0);
    app.tick(6500.0);
    let time = app.compositor().map(|c| c.passes()[0].uniforms.time);
    assert_eq!(time, Some(1.5));
}

fn assert_reference_plane_sizes(app: &App<HeadlessBackend>, screen: Screen) {
    let v = app.viewport();
    let unit = screen.height / 170.0;
    let sizes = app.scene().planes()[0].uniforms.plane_sizes;
    assert!((sizes[0] - v.width * (175.0 * unit) / screen.width).abs() < 1e-4);
    assert!((sizes[1] - v.height * (100.0 * unit) / screen.height).abs() < 1e-4);
    assert_eq!(app.backend().drawn()[0].plane_sizes, sizes);
}

#[test]
fn image_load_after_resizes_keeps_both() {
    let (mut app, loader) = app_with(AppConfig::default(), Screen::new(800.0, 600.0));
    let screen = Screen::new(1000.0, 170.0);
    app.resize(screen);
    app.tick(0.0);
    app.resize(screen);

    loader.requests[0].1.complete(Ok(pixels(800, 600)));
    app.tick(16.0);

    assert_eq!(app.scene().planes()[0].uniforms.image_sizes, [800.0, 600.0]);
    assert_eq!(app.backend().drawn()[0].image_sizes, [800.0, 600.0]);
    assert_reference_plane_sizes(&app, screen);
}

#[test]
fn resize_after_image_load_keeps_both() {
    let (mut app, loader) = app_with(AppConfig::default(), Screen::new(800.0, 600.0));
    loader.requests[0].1.complete(Ok(pixels(800, 600)));
    app.tick(0.0);

    let screen = Screen::new(1000.0, 170.0);
    app.resize(screen);
    app.resize(screen);
    app.tick(16.0);

    assert_eq!(app.backend().drawn()[0].image_sizes, [800.0, 600.0]);
    assert_eq!(app.scene().planes()[0].texture(), TextureState::Ready);
    assert_reference_plane_sizes(&app, screen);
}

#[test]
fn empty_screen_resize_is_ignored() {
    let (mut app, _) = app_with(AppConfig::default(), Screen::new(800.0, 600.0));
    let before = app.scene().planes()[0].uniforms;
    app.backend_mut().clear_calls();

    app.resize(Screen::new(800.0, 0.0));
    app.resize(Screen::new(0.0, 600.0));

    assert!(app.backend().calls().is_empty());
    assert_eq!(app.screen(), Screen::new(800.0, 600.0));
    assert_eq!(app.scene().planes()[0].uniforms, before);
    assert!((app.camera().aspect - 800.0 / 600.0).abs() < 1e-6);
}

#[test]
fn empty_starting_screen_stays_finite() {
    let (mut app, _) = app_with(AppConfig::default(), Screen::new(0.0, 0.0));
    app.tick(0.0);
    let u = app.scene().planes()[0].uniforms;
    assert!(u.plane_sizes.iter().all(|v| v.is_finite()));
    assert!(u.viewport_sizes.iter().all(|v| v.is_finite()));
}
