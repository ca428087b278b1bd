//! # Portal Client
//!
//! Opens a window and draws the portal scene.
//!
//! ```text
//! portal_client [config.toml]
//!
//!   drag          orbit the camera
//!   wheel         zoom
//!   Tab / arrows  debug panel (status in the window title)
//!   R / G / B     colour channel
//!   H             show / hide the panel
//!   Escape        hide the panel, then quit
//! ```
//!
//! Log level comes from `RUST_LOG` (default `info`).

use std::sync::Arc;

use portal::core::{FrameClock, PortalConfig};
use portal::rendering::{GpuContext, GpuRenderer, ProceduralPortalScene, Viewport};
use portal::ui::{Key, Modifiers, MouseButton};
use portal::Application;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use winit::{
    dpi::LogicalSize,
    event::{ElementState, Event, KeyEvent, MouseScrollDelta, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

/// Wheel pixels per line on touchpads.
const PIXELS_PER_LINE: f64 = 50.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!(%path, "loading config");
            PortalConfig::load(&path)?
        }
        None => PortalConfig::default(),
    };

    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window.title.as_str())
            .with_inner_size(LogicalSize::new(config.window.width, config.window.height))
            .build(&event_loop)?,
    );

    let physical = window.inner_size();
    let viewport = Viewport::from_physical(physical.width, physical.height, window.scale_factor());

    let mut app = Application::new(config.clone(), viewport.device_pixel_ratio)?;
    let context = pollster::block_on(GpuContext::new(
        Arc::clone(&window),
        physical.width,
        physical.height,
        config.render.vsync,
    ))?;
    let mut renderer = GpuRenderer::new(context, app.fireflies(), (viewport.width, viewport.height));
    app.handle_resize(viewport, &mut renderer);
    app.start_scene_load(ProceduralPortalScene::default())?;

    let mut clock = FrameClock::new();
    let mut title = String::new();
    // Set by ScaleFactorChanged, applied once the new physical size is in.
    let mut scale_dirty = false;

    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { event, window_id } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => elwt.exit(),

                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            physical_key: PhysicalKey::Code(code),
                            state: ElementState::Pressed,
                            ..
                        },
                    ..
                } => {
                    if code == KeyCode::Escape && !app.panel().is_visible() {
                        elwt.exit();
                        return;
                    }
                    if let Some(key) = map_key(code) {
                        let modifiers = app.input_mut().modifiers;
                        let was_visible = app.panel().is_visible();
                        app.handle_panel_key(key, modifiers);
                        if !was_visible && app.panel().is_visible() {
                            for line in app.panel().lines(app.params()) {
                                info!("{line}");
                            }
                        }
                    }
                }

                WindowEvent::ModifiersChanged(modifiers) => {
                    let state = modifiers.state();
                    app.input_mut().modifiers = Modifiers {
                        shift: state.shift_key(),
                        ctrl: state.control_key(),
                        alt: state.alt_key(),
                    };
                }

                WindowEvent::CursorMoved { position, .. } => {
                    let logical = position.to_logical::<f32>(window.scale_factor());
                    app.input_mut().set_mouse_pos(logical.x, logical.y);
                }

                WindowEvent::MouseInput { state, button, .. } => {
                    let button = match button {
                        winit::event::MouseButton::Left => MouseButton::Left,
                        winit::event::MouseButton::Right => MouseButton::Right,
                        winit::event::MouseButton::Middle => MouseButton::Middle,
                        _ => return,
                    };
                    match state {
                        ElementState::Pressed => app.input_mut().mouse_button_down(button),
                        ElementState::Released => app.input_mut().mouse_button_up(button),
                    }
                }

                WindowEvent::MouseWheel { delta, .. } => {
                    let lines = match delta {
                        MouseScrollDelta::LineDelta(_, y) => y,
                        #[allow(clippy::cast_possible_truncation)]
                        MouseScrollDelta::PixelDelta(p) => (p.y / PIXELS_PER_LINE) as f32,
                    };
                    app.input_mut().scroll(lines);
                }

                WindowEvent::Resized(size) => {
                    scale_dirty = false;
                    renderer.resize_surface(size.width, size.height);
                    let viewport =
                        Viewport::from_physical(size.width, size.height, window.scale_factor());
                    app.handle_resize(viewport, &mut renderer);
                }

                WindowEvent::ScaleFactorChanged { .. } => {
                    scale_dirty = true;
                }

                WindowEvent::RedrawRequested => {
                    if std::mem::take(&mut scale_dirty) {
                        let size = window.inner_size();
                        renderer.resize_surface(size.width, size.height);
                        let viewport =
                            Viewport::from_physical(size.width, size.height, window.scale_factor());
                        app.handle_resize(viewport, &mut renderer);
                    }
                    app.poll_scene(&mut renderer);
                    if let Err(e) = app.run_frame(&mut clock, &mut renderer) {
                        error!(error = %e, "frame failed");
                    }
                    let next = app.window_title();
                    if next != title {
                        window.set_title(&next);
                        title = next;
                    }
                }

                _ => {}
            },

            Event::AboutToWait => {
                window.request_redraw();
            }

            Event::LoopExiting => {
                let stats = app.stats();
                info!(
                    presented = renderer.frames_presented(),
                    skipped = stats.skipped_frames,
                    meshes = renderer.mesh_count(),
                    fps = stats.fps(),
                    "shutting down"
                );
            }

            _ => {}
        }
    })?;

    Ok(())
}

fn map_key(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::Escape => Key::Escape,
        KeyCode::Tab => Key::Tab,
        KeyCode::ArrowUp => Key::Up,
        KeyCode::ArrowDown => Key::Down,
        KeyCode::ArrowLeft => Key::Left,
        KeyCode::ArrowRight => Key::Right,
        KeyCode::KeyR => Key::R,
        KeyCode::KeyG => Key::G,
        KeyCode::KeyB => Key::B,
        KeyCode::KeyH => Key::H,
        _ => return None,
    };
    Some(key)
}
