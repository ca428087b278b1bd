//! Render Loop - the per-frame update rule
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      FRAME TIMELINE                      │
//! ├──────────────────────────────────────────────────────────┤
//! │  1. Sample the clock (one fresh sample, never reused)    │
//! │  2. Write it into portal.time and fireflies.time         │
//! │  3. SceneRenderer::render(uniforms, camera)              │
//! │  4. CameraControls::update(camera)                       │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The order is fixed. Uniform writes land before the draw of the same
//! frame. Resize is a separate, synchronous step that runs between frames.

use std::time::Instant;

use portal_core::{AnimationState, Clock};
use tracing::{debug, warn};

use crate::camera::PerspectiveCamera;
use crate::error::RenderResult;
use crate::integration::Viewport;
use crate::scene::{MaterialAssignment, SceneGraph};
use crate::uniforms::ShaderUniforms;

/// What happened to a frame the renderer was asked to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The frame was drawn and presented.
    Presented,
    /// No image was available (surface lost, outdated or timed out); nothing
    /// was drawn.
    Skipped,
}

/// Draws the scene.
pub trait SceneRenderer {
    /// Draws one frame with the given uniforms and camera.
    ///
    /// # Errors
    ///
    /// Returns an error when the frame could not be drawn or presented.
    fn render(
        &mut self,
        uniforms: &ShaderUniforms,
        camera: &PerspectiveCamera,
    ) -> RenderResult<FrameOutcome>;

    /// Sets the logical output size.
    fn set_size(&mut self, width: u32, height: u32);

    /// Sets the pixel ratio (already capped).
    fn set_pixel_ratio(&mut self, ratio: f32);

    /// Uploads a loaded scene with its per-node materials.
    ///
    /// # Errors
    ///
    /// Returns an error when the scene cannot be uploaded.
    fn upload_scene(
        &mut self,
        scene: &SceneGraph,
        materials: &MaterialAssignment,
    ) -> RenderResult<()>;
}

/// Moves the camera once per frame, after the draw.
pub trait CameraControls {
    /// Applies pending input (and damping) to `camera`.
    fn update(&mut self, camera: &mut PerspectiveCamera);
}

/// Configuration for the render loop
#[derive(Debug, Clone, Copy)]
pub struct RenderLoopConfig {
    /// Maximum frame time before warning (microseconds)
    pub frame_budget_us: u32,
}

impl Default for RenderLoopConfig {
    fn default() -> Self {
        Self {
            frame_budget_us: 16_666, // ~16ms for 60fps
        }
    }
}

/// Result of a single frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameResult {
    /// Frame number, starting at 1
    pub frame_number: u64,
    /// Time written into the uniforms this frame
    pub elapsed_time: f32,
    /// Total frame time (microseconds)
    pub frame_time_us: u32,
    /// Time spent in the renderer
    pub render_us: u32,
    /// Time spent updating controls
    pub controls_us: u32,
    /// Whether the renderer presented or skipped the frame
    pub outcome: FrameOutcome,
    /// Over budget warning
    pub over_budget: bool,
}

/// Statistics for the render loop
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RenderLoopStats {
    /// Total frames drawn and presented
    pub total_frames: u64,
    /// Frames the renderer skipped without drawing
    pub skipped_frames: u64,
    /// Average frame time (microseconds)
    pub avg_frame_time_us: u32,
    /// Worst frame time (microseconds)
    pub worst_frame_time_us: u32,
    /// Frames over budget
    pub frames_over_budget: u32,
    /// Frames whose draw failed
    pub render_errors: u32,
    /// Resize events handled
    pub resizes: u32,
}

impl RenderLoopStats {
    /// Frames per second implied by the average frame time.
    #[must_use]
    pub fn fps(&self) -> f32 {
        if self.avg_frame_time_us == 0 {
            0.0
        } else {
            1_000_000.0 / self.avg_frame_time_us as f32
        }
    }
}

/// Owns the animation state and the uniform set, and runs the update rule.
#[derive(Debug)]
pub struct RenderLoop {
    config: RenderLoopConfig,
    animation: AnimationState,
    uniforms: ShaderUniforms,
    frame_count: u64,
    stats: RenderLoopStats,
}

impl RenderLoop {
    /// Creates a loop around the initial animation state and uniforms.
    ///
    /// The fireflies pixel ratio is taken from `animation`.
    #[must_use]
    pub fn new(config: RenderLoopConfig, animation: AnimationState, uniforms: ShaderUniforms) -> Self {
        let mut uniforms = uniforms;
        uniforms.fireflies.pixel_ratio = animation.pixel_ratio_cap();
        Self {
            config,
            animation,
            uniforms,
            frame_count: 0,
            stats: RenderLoopStats::default(),
        }
    }

    /// Executes one frame.
    ///
    /// Controls are updated even when the draw fails, so input is never
    /// lost; the draw error is returned afterwards.
    ///
    /// # Errors
    ///
    /// Returns the renderer's error for this frame.
    pub fn frame<C, R, K>(
        &mut self,
        clock: &mut C,
        renderer: &mut R,
        controls: &mut K,
        camera: &mut PerspectiveCamera,
    ) -> RenderResult<FrameResult>
    where
        C: Clock + ?Sized,
        R: SceneRenderer + ?Sized,
        K: CameraControls + ?Sized,
    {
        let frame_start = Instant::now();
        self.frame_count += 1;

        // === PHASE 1: Sample time ===
        let elapsed_time = self.animation.sample(clock);

        // === PHASE 2: Uniform writes ===
        self.uniforms.set_time(elapsed_time);

        // === PHASE 3: Draw ===
        let render_start = Instant::now();
        let rendered = renderer.render(&self.uniforms, camera);
        let render_time = render_start.elapsed();

        // === PHASE 4: Controls ===
        let controls_start = Instant::now();
        controls.update(camera);
        let controls_time = controls_start.elapsed();

        let outcome = match rendered {
            Ok(outcome) => outcome,
            Err(error) => {
                self.stats.render_errors += 1;
                warn!(frame = self.frame_count, %error, "frame draw failed");
                return Err(error);
            }
        };

        let total_us = micros(frame_start.elapsed());
        let over_budget = total_us > self.config.frame_budget_us;
        match outcome {
            FrameOutcome::Presented => self.record(total_us),
            FrameOutcome::Skipped => {
                self.stats.skipped_frames += 1;
                debug!(frame = self.frame_count, "frame skipped");
            }
        }

        Ok(FrameResult {
            frame_number: self.frame_count,
            elapsed_time,
            frame_time_us: total_us,
            render_us: micros(render_time),
            controls_us: micros(controls_time),
            outcome,
            over_budget,
        })
    }

    /// Reacts to a window size or pixel ratio change.
    ///
    /// Recomputes the cap, resizes the renderer and the camera projection,
    /// and writes the cap into the fireflies uniform. Returns the new cap.
    pub fn resize<R: SceneRenderer + ?Sized>(
        &mut self,
        viewport: Viewport,
        renderer: &mut R,
        camera: &mut PerspectiveCamera,
    ) -> f32 {
        let cap = self
            .animation
            .set_device_pixel_ratio(viewport.device_pixel_ratio);

        camera.set_viewport(viewport.width, viewport.height);
        renderer.set_size(viewport.width, viewport.height);
        renderer.set_pixel_ratio(cap);
        self.uniforms.fireflies.pixel_ratio = cap;

        self.stats.resizes += 1;
        debug!(
            width = viewport.width,
            height = viewport.height,
            device_pixel_ratio = viewport.device_pixel_ratio,
            pixel_ratio_cap = cap,
            "viewport resized"
        );
        cap
    }

    fn record(&mut self, total_us: u32) {
        let stats = &mut self.stats;
        stats.total_frames += 1;
        let n = stats.total_frames;
        let avg = u64::from(stats.avg_frame_time_us);
        let next = (avg * (n - 1) + u64::from(total_us)) / n;
        stats.avg_frame_time_us = u32::try_from(next).unwrap_or(u32::MAX);
        stats.worst_frame_time_us = stats.worst_frame_time_us.max(total_us);
        if total_us > self.config.frame_budget_us {
            stats.frames_over_budget += 1;
        }
    }

    /// Current uniforms.
    #[must_use]
    pub fn uniforms(&self) -> &ShaderUniforms {
        &self.uniforms
    }

    /// Mutable uniforms, for the tunable observers.
    pub fn uniforms_mut(&mut self) -> &mut ShaderUniforms {
        &mut self.uniforms
    }

    /// Animation state.
    #[must_use]
    pub fn animation(&self) -> &AnimationState {
        &self.animation
    }

    /// Returns statistics
    #[must_use]
    pub fn stats(&self) -> RenderLoopStats {
        self.stats
    }

    /// Returns the current frame count
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

fn micros(duration: std::time::Duration) -> u32 {
    u32::try_from(duration.as_micros()).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use portal_core::ManualClock;

    #[derive(Default)]
    struct MockRenderer {
        times: Vec<f32>,
        size: (u32, u32),
        ratio: f32,
        fail_next: bool,
        skip_next: bool,
    }

    impl SceneRenderer for MockRenderer {
        fn render(
            &mut self,
            uniforms: &ShaderUniforms,
            _: &PerspectiveCamera,
        ) -> RenderResult<FrameOutcome> {
            if std::mem::take(&mut self.fail_next) {
                return Err(RenderError::Surface("lost".into()));
            }
            if std::mem::take(&mut self.skip_next) {
                return Ok(FrameOutcome::Skipped);
            }
            assert_eq!(uniforms.portal.time, uniforms.fireflies.time);
            self.times.push(uniforms.portal.time);
            Ok(FrameOutcome::Presented)
        }

        fn set_size(&mut self, width: u32, height: u32) {
            self.size = (width, height);
        }

        fn set_pixel_ratio(&mut self, ratio: f32) {
            self.ratio = ratio;
        }

        fn upload_scene(&mut self, _: &SceneGraph, _: &MaterialAssignment) -> RenderResult<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingControls {
        updates: u32,
    }

    impl CameraControls for CountingControls {
        fn update(&mut self, _: &mut PerspectiveCamera) {
            self.updates += 1;
        }
    }

    fn new_loop(device_ratio: f32) -> RenderLoop {
        RenderLoop::new(
            RenderLoopConfig::default(),
            AnimationState::new(device_ratio),
            ShaderUniforms::default(),
        )
    }

    #[test]
    fn test_render_loop_frame() {
        let mut render_loop = new_loop(1.0);
        let mut clock = ManualClock::new(0.25);
        let mut renderer = MockRenderer::default();
        let mut controls = CountingControls::default();
        let mut camera = PerspectiveCamera::default();

        let result = render_loop
            .frame(&mut clock, &mut renderer, &mut controls, &mut camera)
            .unwrap();

        assert_eq!(result.frame_number, 1);
        assert_eq!(result.outcome, FrameOutcome::Presented);
        assert!((result.elapsed_time - 0.25).abs() < f32::EPSILON);
        assert_eq!(renderer.times, vec![0.25]);
        assert_eq!(controls.updates, 1);
        assert_eq!(render_loop.stats().total_frames, 1);
    }

    #[test]
    fn test_every_frame_gets_fresh_time() {
        let mut render_loop = new_loop(1.0);
        let mut clock = ManualClock::new(0.0);
        let mut renderer = MockRenderer::default();
        let mut controls = CountingControls::default();
        let mut camera = PerspectiveCamera::default();

        for _ in 0..5 {
            clock.advance(0.1);
            render_loop
                .frame(&mut clock, &mut renderer, &mut controls, &mut camera)
                .unwrap();
        }
        assert_eq!(renderer.times.len(), 5);
        assert!(renderer.times.windows(2).all(|w| w[1] > w[0]));
        assert_eq!(render_loop.frame_count(), 5);
    }

    #[test]
    fn test_render_error_still_updates_controls() {
        let mut render_loop = new_loop(1.0);
        let mut clock = ManualClock::new(1.0);
        let mut renderer = MockRenderer {
            fail_next: true,
            ..MockRenderer::default()
        };
        let mut controls = CountingControls::default();
        let mut camera = PerspectiveCamera::default();

        let result = render_loop.frame(&mut clock, &mut renderer, &mut controls, &mut camera);
        assert!(result.is_err());
        assert_eq!(controls.updates, 1);
        assert_eq!(render_loop.stats().render_errors, 1);
        assert_eq!(render_loop.stats().total_frames, 0);
    }

    #[test]
    fn test_skipped_frame_not_counted_as_drawn() {
        let mut render_loop = new_loop(1.0);
        let mut clock = ManualClock::new(0.5);
        let mut renderer = MockRenderer {
            skip_next: true,
            ..MockRenderer::default()
        };
        let mut controls = CountingControls::default();
        let mut camera = PerspectiveCamera::default();

        let skipped = render_loop
            .frame(&mut clock, &mut renderer, &mut controls, &mut camera)
            .unwrap();
        assert_eq!(skipped.outcome, FrameOutcome::Skipped);
        assert_eq!(render_loop.stats().total_frames, 0);
        assert_eq!(render_loop.stats().skipped_frames, 1);
        assert_eq!(render_loop.stats().avg_frame_time_us, 0);
        assert_eq!(controls.updates, 1);

        clock.advance(0.1);
        render_loop
            .frame(&mut clock, &mut renderer, &mut controls, &mut camera)
            .unwrap();
        assert_eq!(render_loop.stats().total_frames, 1);
        assert_eq!(render_loop.stats().skipped_frames, 1);
        assert_eq!(render_loop.frame_count(), 2);
    }

    #[test]
    fn test_resize_caps_pixel_ratio() {
        let mut render_loop = new_loop(1.0);
        let mut renderer = MockRenderer::default();
        let mut camera = PerspectiveCamera::default();

        let cap = render_loop.resize(Viewport::new(1000, 500, 3.0), &mut renderer, &mut camera);
        assert!((cap - 2.0).abs() < f32::EPSILON);
        assert_eq!(renderer.size, (1000, 500));
        assert!((renderer.ratio - 2.0).abs() < f32::EPSILON);
        assert!((render_loop.uniforms().fireflies.pixel_ratio - 2.0).abs() < f32::EPSILON);
        assert!((camera.aspect - 2.0).abs() < f32::EPSILON);
        assert_eq!(render_loop.stats().resizes, 1);
    }

    #[test]
    fn test_initial_pixel_ratio_from_animation() {
        let render_loop = new_loop(1.5);
        assert!((render_loop.uniforms().fireflies.pixel_ratio - 1.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_fps() {
        let stats = RenderLoopStats {
            avg_frame_time_us: 16_000,
            ..RenderLoopStats::default()
        };
        assert!((stats.fps() - 62.5).abs() < 0.01);
        assert!(RenderLoopStats::default().fps().abs() < f32::EPSILON);
    }
}
