//! The application context.
//!
//! Every window callback goes through [`Application`]; there is no global
//! state. The renderer is passed in per call so the same context drives the
//! wgpu renderer in the client and recording renderers in tests.

use portal_core::{
    AnimationState, Clock, ObserverRegistry, ParameterId, ParameterValue, ParticleField,
    PortalConfig, TunableParameters,
};
use portal_rendering::{
    assign_materials, FireflyCloud, FrameResult, PerspectiveCamera, RenderLoop, RenderLoopConfig,
    RenderLoopStats, RenderResult, SceneGraph, SceneLoader, SceneRenderer, ShaderUniforms,
    Viewport,
};
use portal_ui::{DebugPanel, InputState, Key, Modifiers};
use tracing::{debug, error, info, warn};

use crate::controls::OrbitControls;
use crate::error::AppResult;
use crate::loading::{SceneLoadHandle, SceneState};

/// Scene, parameters, camera and panel of one running portal.
pub struct Application {
    config: PortalConfig,
    field: ParticleField,
    fireflies: FireflyCloud,
    params: TunableParameters,
    observers: ObserverRegistry<ShaderUniforms>,
    render_loop: RenderLoop,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    panel: DebugPanel,
    input: InputState,
    scene_state: SceneState,
    pending_load: Option<SceneLoadHandle>,
}

impl Application {
    /// Builds the application from a validated config.
    ///
    /// Generates the particle field (seeded when the config has a seed),
    /// installs the tunable observers and pushes the initial values into
    /// the uniforms.
    ///
    /// # Errors
    ///
    /// Returns the validation or generation error.
    pub fn new(config: PortalConfig, device_pixel_ratio: f32) -> AppResult<Self> {
        config.validate()?;

        let field = match config.particles.seed {
            Some(seed) => ParticleField::generate_seeded(config.particles.count, seed)?,
            None => ParticleField::generate(config.particles.count)?,
        };
        let fireflies = FireflyCloud::from_field(&field);

        let params = config.tunables;
        let mut observers = ShaderUniforms::bindings();
        let animation =
            AnimationState::with_max_pixel_ratio(config.render.max_pixel_ratio, device_pixel_ratio);
        let mut uniforms = ShaderUniforms::default();
        observers.apply_all(&params, &mut uniforms);
        let render_loop = RenderLoop::new(RenderLoopConfig::default(), animation, uniforms);

        #[allow(clippy::cast_precision_loss)]
        let aspect = config.window.width as f32 / config.window.height as f32;
        let camera = PerspectiveCamera::from_config(&config.camera, aspect);
        let mut controls = OrbitControls::from_config(&config.camera);
        controls.set_viewport_height(config.window.height);

        info!(
            particles = field.count(),
            seeded = config.particles.seed.is_some(),
            pixel_ratio_cap = render_loop.animation().pixel_ratio_cap(),
            "application initialised"
        );

        Ok(Self {
            config,
            field,
            fireflies,
            params,
            observers,
            render_loop,
            camera,
            controls,
            panel: DebugPanel::new(),
            input: InputState::new(),
            scene_state: SceneState::Loading,
            pending_load: None,
        })
    }

    /// Starts loading the configured model path with `loader` in the
    /// background.
    ///
    /// # Errors
    ///
    /// Returns the thread spawn error.
    pub fn start_scene_load<L>(&mut self, loader: L) -> AppResult<()>
    where
        L: SceneLoader + Send + 'static,
    {
        let handle = SceneLoadHandle::spawn(loader, self.config.scene.model_path.clone())?;
        self.pending_load = Some(handle);
        self.scene_state = SceneState::Loading;
        Ok(())
    }

    /// Applies the scene load result if it has arrived.
    ///
    /// Returns whether a result was applied.
    pub fn poll_scene<R: SceneRenderer + ?Sized>(&mut self, renderer: &mut R) -> bool {
        let Some(result) = self.pending_load.as_ref().and_then(SceneLoadHandle::try_take) else {
            return false;
        };
        self.pending_load = None;
        self.on_scene_loaded(result, renderer);
        true
    }

    /// Uploads a loaded scene, or records why it could not be loaded.
    ///
    /// A failure is logged and kept in [`SceneState::Failed`]; the
    /// fireflies keep drawing either way.
    pub fn on_scene_loaded<R: SceneRenderer + ?Sized>(
        &mut self,
        result: RenderResult<SceneGraph>,
        renderer: &mut R,
    ) {
        let uploaded = result.and_then(|scene| {
            let materials = assign_materials(&scene);
            renderer.upload_scene(&scene, &materials)?;
            Ok((scene.len(), materials.missing.len()))
        });

        self.scene_state = match uploaded {
            Ok((nodes, missing_nodes)) => {
                info!(nodes, missing_nodes, "scene ready");
                SceneState::Ready {
                    nodes,
                    missing_nodes,
                }
            }
            Err(e) => {
                error!(error = %e, "scene load failed; drawing fireflies only");
                SceneState::Failed(e.to_string())
            }
        };
    }

    /// Changes a tunable and runs its observers against the uniforms.
    ///
    /// Values are stored as given; range limits belong to the panel.
    ///
    /// # Errors
    ///
    /// Returns [`portal_core::PortalError::ParameterKind`] when `value` has
    /// the wrong kind for `id`.
    pub fn set_parameter(
        &mut self,
        id: ParameterId,
        value: ParameterValue,
    ) -> AppResult<ParameterValue> {
        let stored = self.params.set(id, value)?;
        let notified = self
            .observers
            .notify(id, stored, self.render_loop.uniforms_mut());
        debug!(parameter = %id, value = %stored, observers = notified, "parameter changed");
        Ok(stored)
    }

    /// Feeds a key press to the debug panel and applies the resulting edit.
    ///
    /// Returns the new value when the key changed a parameter.
    pub fn handle_panel_key(&mut self, key: Key, modifiers: Modifiers) -> Option<ParameterValue> {
        let edit = self.panel.handle_key(key, modifiers, &self.params)?;
        match self.set_parameter(edit.id, edit.value) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(error = %e, "panel edit rejected");
                None
            }
        }
    }

    /// Runs one frame: queued input moves the controls, then the render
    /// loop samples the clock, writes the time, draws and updates the
    /// camera.
    ///
    /// # Errors
    ///
    /// Returns the renderer's error; the frame's input is consumed anyway.
    pub fn run_frame<C, R>(&mut self, clock: &mut C, renderer: &mut R) -> AppResult<FrameResult>
    where
        C: Clock + ?Sized,
        R: SceneRenderer + ?Sized,
    {
        self.controls.handle_input(&self.input);
        self.input.begin_frame();
        let result = self
            .render_loop
            .frame(clock, renderer, &mut self.controls, &mut self.camera)?;
        Ok(result)
    }

    /// Reacts to a window resize or scale factor change.
    ///
    /// Returns the new pixel ratio cap.
    pub fn handle_resize<R: SceneRenderer + ?Sized>(
        &mut self,
        viewport: Viewport,
        renderer: &mut R,
    ) -> f32 {
        self.controls.set_viewport_height(viewport.height);
        self.render_loop
            .resize(viewport, renderer, &mut self.camera)
    }

    /// Window title: config title, scene state and the panel status.
    #[must_use]
    pub fn window_title(&self) -> String {
        format!(
            "{} | {} | {}",
            self.config.window.title,
            self.scene_state,
            self.panel.status_line(&self.params)
        )
    }

    /// Configuration the application was built from.
    #[must_use]
    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    /// The particle field (never mutated after construction).
    #[must_use]
    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    /// Firefly instances for the renderer.
    #[must_use]
    pub fn fireflies(&self) -> &FireflyCloud {
        &self.fireflies
    }

    /// Current tunables.
    #[must_use]
    pub fn params(&self) -> &TunableParameters {
        &self.params
    }

    /// Current uniforms.
    #[must_use]
    pub fn uniforms(&self) -> &ShaderUniforms {
        self.render_loop.uniforms()
    }

    /// Camera.
    #[must_use]
    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    /// Debug panel.
    #[must_use]
    pub fn panel(&self) -> &DebugPanel {
        &self.panel
    }

    /// Input state, for the window layer to fill.
    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    /// Scene lifecycle.
    #[must_use]
    pub fn scene_state(&self) -> &SceneState {
        &self.scene_state
    }

    /// Whether a scene load is still in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.pending_load.is_some()
    }

    /// Frame statistics.
    #[must_use]
    pub fn stats(&self) -> RenderLoopStats {
        self.render_loop.stats()
    }
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("particles", &self.field.count())
            .field("params", &self.params)
            .field("scene_state", &self.scene_state)
            .field("frames", &self.render_loop.frame_count())
            .finish_non_exhaustive()
    }
}
