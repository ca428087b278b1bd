//! # Application Tests
//!
//! The application context end to end with a recording renderer: panel
//! keys reach the uniforms through the observers, scene loads succeed or
//! fail visibly, and resizes reach the fireflies uniform.

use std::time::{Duration, Instant};

use portal::core::{Color, ManualClock, ParameterId, ParameterValue, PortalConfig, PortalError};
use portal::rendering::scene::{MaterialAssignment, MaterialKind};
use portal::rendering::{
    FrameOutcome, PerspectiveCamera, ProceduralPortalScene, RenderError, RenderResult,
    SceneGraph, SceneLoader, SceneRenderer, ShaderUniforms, Viewport,
};
use portal::ui::{Key, Modifiers};
use portal::{AppError, Application, SceneState};

#[derive(Default)]
struct RecordingRenderer {
    frames: Vec<ShaderUniforms>,
    uploads: Vec<Vec<MaterialKind>>,
    size: (u32, u32),
    pixel_ratio: f32,
}

impl SceneRenderer for RecordingRenderer {
    fn render(
        &mut self,
        uniforms: &ShaderUniforms,
        _: &PerspectiveCamera,
    ) -> RenderResult<FrameOutcome> {
        self.frames.push(*uniforms);
        Ok(FrameOutcome::Presented)
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn set_pixel_ratio(&mut self, ratio: f32) {
        self.pixel_ratio = ratio;
    }

    fn upload_scene(&mut self, _: &SceneGraph, materials: &MaterialAssignment) -> RenderResult<()> {
        self.uploads.push(materials.kinds.clone());
        Ok(())
    }
}

struct MissingFileLoader;

impl SceneLoader for MissingFileLoader {
    fn load(&self, path: &str) -> RenderResult<SceneGraph> {
        Err(RenderError::SceneLoad {
            path: path.to_string(),
            reason: "no such file".into(),
        })
    }
}

fn seeded_config() -> PortalConfig {
    let mut config = PortalConfig::default();
    config.particles.seed = Some(7);
    config
}

fn wait_for_scene(app: &mut Application, renderer: &mut RecordingRenderer) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !app.poll_scene(renderer) {
        assert!(Instant::now() < deadline, "scene load timed out");
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn test_startup_state() {
    let app = Application::new(seeded_config(), 3.0).unwrap();

    assert_eq!(app.field().count(), 50);
    assert_eq!(app.fireflies().instance_count(), 50);
    assert!((app.uniforms().fireflies.pixel_ratio - 2.0).abs() < f32::EPSILON);
    assert!((app.uniforms().fireflies.size - 100.0).abs() < f32::EPSILON);
    assert!((app.uniforms().portal.strength - 5.0).abs() < f32::EPSILON);
    assert_eq!(app.uniforms().clear_color, Color::hex(0x38_3e_38));
    assert_eq!(app.scene_state(), &SceneState::Loading);
}

#[test]
fn test_invalid_config_rejected() {
    let mut config = PortalConfig::default();
    config.particles.count = 0;
    let result = Application::new(config, 1.0);
    assert!(matches!(
        result,
        Err(AppError::Core(PortalError::InvalidParticleCount(0)))
    ));

    let mut config = PortalConfig::default();
    config.camera.far = 0.05;
    let result = Application::new(config, 1.0);
    assert!(matches!(result, Err(AppError::Core(PortalError::InvalidConfig(_)))));
}

#[test]
fn test_panel_edit_reaches_uniform_before_next_draw() {
    let mut app = Application::new(seeded_config(), 1.0).unwrap();
    let mut renderer = RecordingRenderer::default();
    let mut clock = ManualClock::new(0.0);
    let none = Modifiers::default();

    app.handle_panel_key(Key::Down, none);
    app.handle_panel_key(Key::Down, none);
    let mut last = None;
    for _ in 0..60 {
        if let Some(value) = app.handle_panel_key(Key::Right, Modifiers::SHIFT) {
            last = Some(value);
        }
    }
    assert_eq!(last, Some(ParameterValue::Scalar(10.0)));
    assert!((app.params().portal_strength - 10.0).abs() < 1e-4);

    clock.advance(0.5);
    app.run_frame(&mut clock, &mut renderer).unwrap();

    let drawn = renderer.frames.last().unwrap();
    assert!((drawn.portal.strength - 10.0).abs() < 1e-4);
    assert!((drawn.portal.time - 0.5).abs() < f32::EPSILON);
    assert!((drawn.fireflies.time - 0.5).abs() < f32::EPSILON);
    println!("Title after edit: {}", app.window_title());
}

#[test]
fn test_set_parameter_passes_values_through() {
    let mut app = Application::new(seeded_config(), 1.0).unwrap();

    let value = app
        .set_parameter(ParameterId::PortalStrength, ParameterValue::Scalar(12.0))
        .unwrap();
    assert_eq!(value, ParameterValue::Scalar(12.0));
    assert!((app.uniforms().portal.strength - 12.0).abs() < f32::EPSILON);

    let wrong = app.set_parameter(ParameterId::ClearColor, ParameterValue::Scalar(1.0));
    assert!(matches!(wrong, Err(AppError::Core(PortalError::ParameterKind { .. }))));
}

#[test]
fn test_colour_edit_converts_to_linear() {
    let mut app = Application::new(seeded_config(), 1.0).unwrap();
    let red = Color::hex(0xff_00_00);

    app.set_parameter(ParameterId::PortalColorEnd, ParameterValue::Color(red))
        .unwrap();

    assert_eq!(app.uniforms().portal.color_end, red.to_linear());
    assert_eq!(app.uniforms().portal.color_start, Color::WHITE.to_linear());
}

#[test]
fn test_scene_load_uploads_materials() {
    let mut app = Application::new(seeded_config(), 1.0).unwrap();
    let mut renderer = RecordingRenderer::default();

    app.start_scene_load(ProceduralPortalScene::default()).unwrap();
    assert!(app.is_loading());
    wait_for_scene(&mut app, &mut renderer);

    assert!(app.scene_state().is_ready());
    assert!(!app.is_loading());
    assert_eq!(renderer.uploads.len(), 1);
    let kinds = &renderer.uploads[0];
    assert_eq!(kinds.iter().filter(|&&k| k == MaterialKind::PoleLight).count(), 2);
    assert_eq!(kinds.iter().filter(|&&k| k == MaterialKind::Portal).count(), 1);
    assert!(app.window_title().contains("ready"));
}

#[test]
fn test_failed_load_is_visible_and_fireflies_keep_drawing() {
    let mut app = Application::new(seeded_config(), 1.0).unwrap();
    let mut renderer = RecordingRenderer::default();
    let mut clock = ManualClock::new(0.0);

    app.start_scene_load(MissingFileLoader).unwrap();
    wait_for_scene(&mut app, &mut renderer);

    assert!(app.scene_state().is_failed());
    assert!(renderer.uploads.is_empty());
    assert!(app.window_title().contains("scene failed"));

    for _ in 0..3 {
        clock.advance(0.1);
        app.run_frame(&mut clock, &mut renderer).unwrap();
    }
    assert_eq!(renderer.frames.len(), 3);
}

#[test]
fn test_resize_caps_pixel_ratio() {
    let mut app = Application::new(seeded_config(), 1.0).unwrap();
    let mut renderer = RecordingRenderer::default();

    let cap = app.handle_resize(Viewport::from_physical(3000, 1500, 3.0), &mut renderer);

    assert!((cap - 2.0).abs() < f32::EPSILON);
    assert_eq!(renderer.size, (1000, 500));
    assert!((renderer.pixel_ratio - 2.0).abs() < f32::EPSILON);
    assert!((app.uniforms().fireflies.pixel_ratio - 2.0).abs() < f32::EPSILON);
    assert!((app.camera().aspect - 2.0).abs() < 1e-6);
}

#[test]
fn test_scale_change_keeps_logical_size() {
    let mut app = Application::new(seeded_config(), 1.0).unwrap();
    let mut renderer = RecordingRenderer::default();

    app.handle_resize(Viewport::from_physical(1600, 1200, 1.0), &mut renderer);
    // Window dragged to a 2x display: physical size doubles with the scale
    let cap = app.handle_resize(Viewport::from_physical(3200, 2400, 2.0), &mut renderer);

    assert!((cap - 2.0).abs() < f32::EPSILON);
    assert_eq!(renderer.size, (1600, 1200));
    assert!((app.camera().aspect - 4.0 / 3.0).abs() < 1e-6);
    assert_eq!(app.stats().resizes, 2);
}

#[test]
fn test_config_cannot_raise_pixel_ratio_cap() {
    let mut config = seeded_config();
    config.render.max_pixel_ratio = 4.0;
    assert!(matches!(
        Application::new(config, 3.0),
        Err(AppError::Core(PortalError::InvalidConfig(_)))
    ));

    let mut config = seeded_config();
    config.render.max_pixel_ratio = 1.5;
    let app = Application::new(config, 3.0).unwrap();
    assert!((app.uniforms().fireflies.pixel_ratio - 1.5).abs() < f32::EPSILON);
}

#[test]
fn test_drag_moves_camera_over_frames() {
    let mut app = Application::new(seeded_config(), 1.0).unwrap();
    let mut renderer = RecordingRenderer::default();
    let mut clock = ManualClock::new(0.0);
    let start = app.camera().position;

    let input = app.input_mut();
    input.set_mouse_pos(100.0, 100.0);
    input.begin_frame();
    input.mouse_button_down(portal::ui::MouseButton::Left);
    input.set_mouse_pos(200.0, 100.0);

    for _ in 0..10 {
        clock.advance(1.0 / 60.0);
        app.run_frame(&mut clock, &mut renderer).unwrap();
    }

    let moved = app.camera().position;
    assert!((moved[0] - start[0]).abs() > 1e-3 || (moved[2] - start[2]).abs() > 1e-3);
}
