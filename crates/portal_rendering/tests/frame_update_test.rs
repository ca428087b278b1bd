//! # Frame Update Tests
//!
//! Drives `RenderLoop` with recording collaborators and checks the order of
//! one frame: time is written into both shaders before the draw, and the
//! controls move the camera only after the draw has seen it.

use std::cell::RefCell;
use std::rc::Rc;

use portal_core::{AnimationState, ManualClock, ParameterId, ParameterValue, TunableParameters};
use portal_rendering::scene::{MaterialAssignment, SceneGraph};
use portal_rendering::{
    CameraControls, FrameOutcome, PerspectiveCamera, RenderLoop, RenderLoopConfig, RenderResult,
    SceneRenderer, ShaderUniforms, Viewport,
};

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Render {
        portal_time: f32,
        fireflies_time: f32,
        camera_x: f32,
    },
    Controls,
    Size(u32, u32),
    PixelRatio(f32),
}

type Log = Rc<RefCell<Vec<Event>>>;

struct RecordingRenderer {
    log: Log,
}

impl SceneRenderer for RecordingRenderer {
    fn render(
        &mut self,
        uniforms: &ShaderUniforms,
        camera: &PerspectiveCamera,
    ) -> RenderResult<FrameOutcome> {
        self.log.borrow_mut().push(Event::Render {
            portal_time: uniforms.portal.time,
            fireflies_time: uniforms.fireflies.time,
            camera_x: camera.position[0],
        });
        Ok(FrameOutcome::Presented)
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.log.borrow_mut().push(Event::Size(width, height));
    }

    fn set_pixel_ratio(&mut self, ratio: f32) {
        self.log.borrow_mut().push(Event::PixelRatio(ratio));
    }

    fn upload_scene(&mut self, _: &SceneGraph, _: &MaterialAssignment) -> RenderResult<()> {
        Ok(())
    }
}

struct SlidingControls {
    log: Log,
}

impl CameraControls for SlidingControls {
    fn update(&mut self, camera: &mut PerspectiveCamera) {
        camera.position[0] += 1.0;
        self.log.borrow_mut().push(Event::Controls);
    }
}

fn setup(device_ratio: f32) -> (RenderLoop, RecordingRenderer, SlidingControls, Log) {
    let log: Log = Rc::default();
    let render_loop = RenderLoop::new(
        RenderLoopConfig::default(),
        AnimationState::new(device_ratio),
        ShaderUniforms::from_parameters(&TunableParameters::default(), 1.0),
    );
    (
        render_loop,
        RecordingRenderer { log: Rc::clone(&log) },
        SlidingControls { log: Rc::clone(&log) },
        log,
    )
}

#[test]
fn test_time_written_before_draw_and_controls_after() {
    let (mut render_loop, mut renderer, mut controls, log) = setup(1.0);
    let mut camera = PerspectiveCamera::default();
    let start_x = camera.position[0];
    let mut clock = ManualClock::new(0.5);

    render_loop
        .frame(&mut clock, &mut renderer, &mut controls, &mut camera)
        .unwrap();

    let events = log.borrow();
    assert_eq!(events.len(), 2);
    match &events[0] {
        Event::Render {
            portal_time,
            fireflies_time,
            camera_x,
        } => {
            assert!((portal_time - 0.5).abs() < f32::EPSILON);
            assert!((fireflies_time - 0.5).abs() < f32::EPSILON);
            assert!((camera_x - start_x).abs() < f32::EPSILON);
        }
        other => panic!("expected render first, got {other:?}"),
    }
    assert_eq!(events[1], Event::Controls);

    println!("Frame order: {:?}", *events);
}

#[test]
fn test_camera_moved_last_frame_is_drawn_next_frame() {
    let (mut render_loop, mut renderer, mut controls, log) = setup(1.0);
    let mut camera = PerspectiveCamera::default();
    let start_x = camera.position[0];
    let mut clock = ManualClock::new(0.0);

    for _ in 0..3 {
        clock.advance(1.0 / 60.0);
        render_loop
            .frame(&mut clock, &mut renderer, &mut controls, &mut camera)
            .unwrap();
    }

    let drawn_x: Vec<f32> = log
        .borrow()
        .iter()
        .filter_map(|event| match event {
            Event::Render { camera_x, .. } => Some(*camera_x),
            _ => None,
        })
        .collect();
    assert_eq!(drawn_x.len(), 3);
    for (i, x) in drawn_x.iter().enumerate() {
        assert!((x - (start_x + i as f32)).abs() < 1e-5);
    }
}

#[test]
fn test_time_never_goes_backwards() {
    let (mut render_loop, mut renderer, mut controls, log) = setup(1.0);
    let mut camera = PerspectiveCamera::default();
    let mut clock = ManualClock::new(2.0);

    render_loop
        .frame(&mut clock, &mut renderer, &mut controls, &mut camera)
        .unwrap();
    clock.set(1.0);
    let result = render_loop
        .frame(&mut clock, &mut renderer, &mut controls, &mut camera)
        .unwrap();

    assert!(result.elapsed_time >= 2.0);
    let times: Vec<f32> = log
        .borrow()
        .iter()
        .filter_map(|event| match event {
            Event::Render { portal_time, .. } => Some(*portal_time),
            _ => None,
        })
        .collect();
    assert!(times.windows(2).all(|w| w[1] >= w[0]), "{times:?}");
}

#[test]
fn test_resize_updates_renderer_camera_and_uniform() {
    let (mut render_loop, mut renderer, _, log) = setup(1.0);
    let mut camera = PerspectiveCamera::default();

    let cap = render_loop.resize(Viewport::new(800, 400, 3.0), &mut renderer, &mut camera);

    assert!((cap - 2.0).abs() < f32::EPSILON);
    assert!((camera.aspect - 2.0).abs() < 1e-6);
    assert!((render_loop.uniforms().fireflies.pixel_ratio - 2.0).abs() < f32::EPSILON);
    assert_eq!(
        *log.borrow(),
        vec![Event::Size(800, 400), Event::PixelRatio(2.0)]
    );

    let cap = render_loop.resize(Viewport::new(800, 400, 1.25), &mut renderer, &mut camera);
    assert!((cap - 1.25).abs() < f32::EPSILON);
    assert!((render_loop.uniforms().fireflies.pixel_ratio - 1.25).abs() < f32::EPSILON);
}

#[test]
fn test_edits_between_frames_reach_next_draw() {
    let (mut render_loop, mut renderer, mut controls, _) = setup(1.0);
    let mut camera = PerspectiveCamera::default();
    let mut clock = ManualClock::new(0.1);
    let mut params = TunableParameters::default();
    let mut bindings = ShaderUniforms::bindings();

    let value = params
        .set(ParameterId::PortalStrength, ParameterValue::Scalar(10.0))
        .unwrap();
    bindings.notify(ParameterId::PortalStrength, value, render_loop.uniforms_mut());

    render_loop
        .frame(&mut clock, &mut renderer, &mut controls, &mut camera)
        .unwrap();

    assert!((render_loop.uniforms().portal.strength - 10.0).abs() < f32::EPSILON);
    assert!((render_loop.uniforms().portal.time - 0.1).abs() < f32::EPSILON);
}
