//! # Portal Core
//!
//! GPU-free logic behind the portal scene:
//!
//! - **Particle field** - the firefly cloud, generated once at startup and
//!   never mutated afterwards
//! - **Animation state** - elapsed time sampled once per frame, plus the
//!   device pixel ratio cap
//! - **Tunables** - the live-editable shader parameters and the per-field
//!   observers that push edits into uniforms
//! - **Configuration** - everything above, loaded from a TOML file
//!
//! ## Frame Contract
//!
//! ```text
//! Clock ──► AnimationState ──► time uniforms ──► render ──► controls
//!                                   ▲
//! DebugPanel ──► TunableParameters ─┘ (observers, same thread)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use portal_core::{ParticleField, DEFAULT_PARTICLE_COUNT};
//!
//! let field = ParticleField::generate_seeded(DEFAULT_PARTICLE_COUNT, 7).unwrap();
//! assert_eq!(field.positions().len(), field.scales().len());
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod animation;
pub mod clock;
pub mod color;
pub mod config;
pub mod error;
pub mod particles;
pub mod tunables;

pub use animation::{cap_pixel_ratio, pixel_ratio_cap, AnimationState, MAX_PIXEL_RATIO};
pub use clock::{Clock, FrameClock, ManualClock};
pub use color::Color;
pub use config::{
    CameraConfig, ParticleConfig, PortalConfig, RenderConfig, SceneConfig, WindowConfig,
};
pub use error::{PortalError, PortalResult};
pub use particles::{ParticleBounds, ParticleField, DEFAULT_PARTICLE_COUNT};
pub use tunables::{
    ObserverRegistry, ParameterId, ParameterSpec, ParameterValue, TunableParameters,
};
