//! Tunable Shader Parameters
//!
//! The live-editable values behind the debug panel, plus the observers that
//! forward each edit into whatever owns the uniforms.
//!
//! ## Flow
//!
//! ```text
//! panel edit ──► TunableParameters::set(id, value) ──► accepted value
//!                                                        │
//!                  ObserverRegistry::notify(id, value, &mut uniforms)
//!                                                        │
//!                      only the observers registered for `id` run
//! ```
//!
//! Values pass through unmodified. Range limits live in [`ParameterSpec`]
//! and are enforced by the panel, not here.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::{PortalError, PortalResult};

/// Identifies one tunable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterId {
    /// Portal colour at the centre of the disc.
    PortalColorStart,
    /// Portal colour at the rim of the disc.
    PortalColorEnd,
    /// Portal glow multiplier.
    PortalStrength,
    /// Base firefly sprite size in pixels.
    FirefliesSize,
    /// Renderer background.
    ClearColor,
}

impl ParameterId {
    /// Every parameter, in panel order.
    pub const ALL: [Self; 5] = [
        Self::PortalColorStart,
        Self::PortalColorEnd,
        Self::PortalStrength,
        Self::FirefliesSize,
        Self::ClearColor,
    ];

    /// Panel label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PortalColorStart => "Portal Color A",
            Self::PortalColorEnd => "Portal Color B",
            Self::PortalStrength => "portalStrength",
            Self::FirefliesSize => "firefliesSize",
            Self::ClearColor => "clearColor",
        }
    }

    /// Slider range for scalar parameters, `None` for colours.
    #[must_use]
    pub const fn spec(self) -> Option<ParameterSpec> {
        match self {
            Self::PortalStrength => Some(ParameterSpec::PORTAL_STRENGTH),
            Self::FirefliesSize => Some(ParameterSpec::FIREFLIES_SIZE),
            Self::PortalColorStart | Self::PortalColorEnd | Self::ClearColor => None,
        }
    }

    /// Whether the parameter holds a colour.
    #[must_use]
    pub const fn is_color(self) -> bool {
        self.spec().is_none()
    }
}

impl fmt::Display for ParameterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A value written to or read from a tunable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterValue {
    /// Slider value.
    Scalar(f32),
    /// Colour picker value.
    Color(Color),
}

impl ParameterValue {
    /// The scalar, if this is one.
    #[must_use]
    pub const fn as_scalar(self) -> Option<f32> {
        match self {
            Self::Scalar(v) => Some(v),
            Self::Color(_) => None,
        }
    }

    /// The colour, if this is one.
    #[must_use]
    pub const fn as_color(self) -> Option<Color> {
        match self {
            Self::Color(c) => Some(c),
            Self::Scalar(_) => None,
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(v) => write!(f, "{v}"),
            Self::Color(c) => write!(f, "{c}"),
        }
    }
}

/// Slider configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSpec {
    /// Lowest allowed value.
    pub min: f32,
    /// Highest allowed value.
    pub max: f32,
    /// Increment between allowed values.
    pub step: f32,
}

impl ParameterSpec {
    /// `portalStrength` slider.
    pub const PORTAL_STRENGTH: Self = Self::new(0.0, 10.0, 0.1);
    /// `firefliesSize` slider.
    pub const FIREFLIES_SIZE: Self = Self::new(0.0, 500.0, 1.0);

    /// Creates a slider range.
    #[must_use]
    pub const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    /// Clamps into `[min, max]`.
    #[must_use]
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    /// Rounds to the nearest step above `min`, then clamps.
    #[must_use]
    pub fn snap(&self, value: f32) -> f32 {
        if self.step <= 0.0 {
            return self.clamp(value);
        }
        let steps = ((value - self.min) / self.step).round();
        self.clamp(self.min + steps * self.step)
    }

    /// Whether `value` is inside `[min, max]`.
    #[must_use]
    pub fn contains(&self, value: f32) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// The live-editable shader parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TunableParameters {
    /// Portal centre colour.
    pub portal_color_start: Color,
    /// Portal rim colour.
    pub portal_color_end: Color,
    /// Portal glow multiplier.
    pub portal_strength: f32,
    /// Base firefly size in pixels.
    pub fireflies_size: f32,
    /// Renderer background.
    pub clear_color: Color,
}

impl Default for TunableParameters {
    fn default() -> Self {
        Self {
            portal_color_start: Color::hex(0xff_ff_ff),
            portal_color_end: Color::hex(0x00_00_00),
            portal_strength: 5.0,
            fireflies_size: 100.0,
            clear_color: Color::hex(0x38_3e_38),
        }
    }
}

impl TunableParameters {
    /// Reads one parameter.
    #[must_use]
    pub fn get(&self, id: ParameterId) -> ParameterValue {
        match id {
            ParameterId::PortalColorStart => ParameterValue::Color(self.portal_color_start),
            ParameterId::PortalColorEnd => ParameterValue::Color(self.portal_color_end),
            ParameterId::PortalStrength => ParameterValue::Scalar(self.portal_strength),
            ParameterId::FirefliesSize => ParameterValue::Scalar(self.fireflies_size),
            ParameterId::ClearColor => ParameterValue::Color(self.clear_color),
        }
    }

    /// Writes one parameter and returns the value that was stored.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::ParameterKind`] when a scalar is written to a
    /// colour field or the other way round.
    pub fn set(&mut self, id: ParameterId, value: ParameterValue) -> PortalResult<ParameterValue> {
        let kind_error = || PortalError::ParameterKind {
            id,
            expected: if id.is_color() { "colour" } else { "scalar" },
        };

        match (id, value) {
            (ParameterId::PortalColorStart, ParameterValue::Color(c)) => {
                self.portal_color_start = c;
            }
            (ParameterId::PortalColorEnd, ParameterValue::Color(c)) => self.portal_color_end = c,
            (ParameterId::ClearColor, ParameterValue::Color(c)) => self.clear_color = c,
            (ParameterId::PortalStrength, ParameterValue::Scalar(v)) => self.portal_strength = v,
            (ParameterId::FirefliesSize, ParameterValue::Scalar(v)) => self.fireflies_size = v,
            _ => return Err(kind_error()),
        }

        tracing::debug!(parameter = %id, %value, "tunable updated");
        Ok(value)
    }
}

type Observer<T> = Box<dyn FnMut(ParameterValue, &mut T)>;

/// Per-field change observers.
///
/// `T` is whatever the observers write into (the uniform set in the
/// renderer). It is passed in on every notification, so observers hold no
/// references of their own.
pub struct ObserverRegistry<T> {
    observers: HashMap<ParameterId, Vec<Observer<T>>>,
}

impl<T> ObserverRegistry<T> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            observers: HashMap::new(),
        }
    }

    /// Registers `observer` for changes to `id`.
    pub fn on_change<F>(&mut self, id: ParameterId, observer: F) -> &mut Self
    where
        F: FnMut(ParameterValue, &mut T) + 'static,
    {
        self.observers.entry(id).or_default().push(Box::new(observer));
        self
    }

    /// Runs the observers of `id`, in registration order.
    ///
    /// Returns how many observers ran.
    pub fn notify(&mut self, id: ParameterId, value: ParameterValue, target: &mut T) -> usize {
        let Some(observers) = self.observers.get_mut(&id) else {
            return 0;
        };
        for observer in observers.iter_mut() {
            observer(value, target);
        }
        observers.len()
    }

    /// Pushes every current value through its observers.
    ///
    /// Used once at startup so the uniforms start from the parameters.
    pub fn apply_all(&mut self, parameters: &TunableParameters, target: &mut T) -> usize {
        ParameterId::ALL
            .iter()
            .map(|&id| self.notify(id, parameters.get(id), target))
            .sum()
    }

    /// Number of observers registered for `id`.
    #[must_use]
    pub fn observer_count(&self, id: ParameterId) -> usize {
        self.observers.get(&id).map_or(0, Vec::len)
    }
}

impl<T> Default for ObserverRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ObserverRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut counts: Vec<_> = ParameterId::ALL
            .iter()
            .map(|&id| (id, self.observer_count(id)))
            .filter(|&(_, n)| n > 0)
            .collect();
        counts.sort_by_key(|&(id, _)| id.label());
        f.debug_struct("ObserverRegistry")
            .field("observers", &counts)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Sink {
        strength: f32,
        size: f32,
        writes: u32,
    }

    #[test]
    fn test_defaults() {
        let params = TunableParameters::default();
        assert_eq!(params.portal_color_start.to_hex(), 0xff_ff_ff);
        assert_eq!(params.portal_color_end.to_hex(), 0x00_00_00);
        assert!((params.portal_strength - 5.0).abs() < f32::EPSILON);
        assert!((params.fireflies_size - 100.0).abs() < f32::EPSILON);
        assert_eq!(params.clear_color.to_hex(), 0x38_3e_38);
    }

    #[test]
    fn test_set_passes_through_unmodified() {
        let mut params = TunableParameters::default();
        let accepted = params
            .set(ParameterId::PortalStrength, ParameterValue::Scalar(12.0))
            .unwrap();
        assert_eq!(accepted, ParameterValue::Scalar(12.0));
        assert!((params.portal_strength - 12.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_set_rejects_wrong_kind() {
        let mut params = TunableParameters::default();
        let err = params
            .set(ParameterId::ClearColor, ParameterValue::Scalar(1.0))
            .unwrap_err();
        assert_eq!(
            err,
            PortalError::ParameterKind {
                id: ParameterId::ClearColor,
                expected: "colour"
            }
        );
        assert!(params
            .set(ParameterId::FirefliesSize, ParameterValue::Color(Color::WHITE))
            .is_err());
        assert_eq!(params, TunableParameters::default());
    }

    #[test]
    fn test_get_matches_fields() {
        let params = TunableParameters::default();
        for id in ParameterId::ALL {
            assert_eq!(params.get(id).as_color().is_some(), id.is_color());
        }
    }

    #[test]
    fn test_spec_snap_and_clamp() {
        let spec = ParameterSpec::PORTAL_STRENGTH;
        assert!((spec.snap(5.04) - 5.0).abs() < 1e-5);
        assert!((spec.snap(5.06) - 5.1).abs() < 1e-5);
        assert!((spec.snap(12.0) - 10.0).abs() < f32::EPSILON);
        assert!((spec.snap(-1.0)).abs() < f32::EPSILON);
        assert!(spec.contains(10.0));
        assert!(!spec.contains(10.1));

        let size = ParameterSpec::FIREFLIES_SIZE;
        assert!((size.snap(100.4) - 100.0).abs() < f32::EPSILON);
        assert!((size.snap(9999.0) - 500.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_observers_fire_only_for_their_field() {
        let mut registry = ObserverRegistry::<Sink>::new();
        registry
            .on_change(ParameterId::PortalStrength, |value, sink: &mut Sink| {
                sink.strength = value.as_scalar().unwrap_or_default();
                sink.writes += 1;
            })
            .on_change(ParameterId::FirefliesSize, |value, sink: &mut Sink| {
                sink.size = value.as_scalar().unwrap_or_default();
                sink.writes += 1;
            });

        let mut sink = Sink::default();
        let fired = registry.notify(
            ParameterId::PortalStrength,
            ParameterValue::Scalar(7.5),
            &mut sink,
        );
        assert_eq!(fired, 1);
        assert!((sink.strength - 7.5).abs() < f32::EPSILON);
        assert!(sink.size.abs() < f32::EPSILON);
        assert_eq!(sink.writes, 1);

        let fired = registry.notify(
            ParameterId::ClearColor,
            ParameterValue::Color(Color::BLACK),
            &mut sink,
        );
        assert_eq!(fired, 0);
        assert_eq!(sink.writes, 1);
    }

    #[test]
    fn test_apply_all() {
        let mut registry = ObserverRegistry::<Sink>::new();
        registry.on_change(ParameterId::FirefliesSize, |value, sink: &mut Sink| {
            sink.size = value.as_scalar().unwrap_or_default();
        });
        let mut sink = Sink::default();
        assert_eq!(registry.apply_all(&TunableParameters::default(), &mut sink), 1);
        assert!((sink.size - 100.0).abs() < f32::EPSILON);
        assert_eq!(registry.observer_count(ParameterId::FirefliesSize), 1);
        assert_eq!(registry.observer_count(ParameterId::ClearColor), 0);
    }
}
