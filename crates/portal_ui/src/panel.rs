//! The debug panel.
//!
//! ```text
//! Tab / Down      next control        Shift+Tab / Up   previous control
//! Left / Right    step the value      Shift            ten steps at once
//! R / G / B       colour channel      H / Escape       show / hide
//! ```
//!
//! Slider values are snapped to `step` and clamped to `[min, max]`. Colour
//! channels move in 8/255 increments and stay inside `[0, 1]`.

use std::fmt;

use portal_core::{Color, ParameterId, ParameterSpec, ParameterValue, TunableParameters};
use tracing::debug;

use crate::input::{Key, Modifiers};

/// How a control edits its value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlKind {
    /// Numeric slider.
    Slider(ParameterSpec),
    /// RGB colour, one channel at a time.
    Color,
}

/// One panel row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Control {
    /// Text shown in the panel.
    pub label: &'static str,
    /// Parameter the control edits.
    pub id: ParameterId,
    /// Editing behaviour.
    pub kind: ControlKind,
}

impl Control {
    /// The standard control for a parameter.
    #[must_use]
    pub const fn for_parameter(id: ParameterId) -> Self {
        let kind = match id.spec() {
            Some(spec) => ControlKind::Slider(spec),
            None => ControlKind::Color,
        };
        Self {
            label: id.label(),
            id,
            kind,
        }
    }
}

/// Colour channel edited by Left/Right on a colour control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorChannel {
    /// Red.
    #[default]
    Red,
    /// Green.
    Green,
    /// Blue.
    Blue,
}

impl ColorChannel {
    const fn get(self, color: Color) -> f32 {
        match self {
            Self::Red => color.r,
            Self::Green => color.g,
            Self::Blue => color.b,
        }
    }

    const fn with(self, color: Color, value: f32) -> Color {
        match self {
            Self::Red => Color::rgb(value, color.g, color.b),
            Self::Green => Color::rgb(color.r, value, color.b),
            Self::Blue => Color::rgb(color.r, color.g, value),
        }
    }
}

impl fmt::Display for ColorChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Red => "R",
            Self::Green => "G",
            Self::Blue => "B",
        };
        f.write_str(name)
    }
}

/// A value change requested by the panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelEdit {
    /// Parameter to change.
    pub id: ParameterId,
    /// New value, already clamped and snapped.
    pub value: ParameterValue,
}

/// Keyboard-driven list of controls.
#[derive(Debug, Clone)]
pub struct DebugPanel {
    controls: Vec<Control>,
    selected: usize,
    channel: ColorChannel,
    visible: bool,
}

impl DebugPanel {
    /// Colour channel increment per key press.
    pub const COLOR_STEP: f32 = 8.0 / 255.0;
    /// Steps taken per key press while Shift is held.
    pub const SHIFT_MULTIPLIER: f32 = 10.0;

    /// Panel with one control per tunable, in registration order.
    #[must_use]
    pub fn new() -> Self {
        Self::with_controls(ParameterId::ALL.iter().map(|&id| Control::for_parameter(id)))
    }

    /// Panel with a custom control list.
    #[must_use]
    pub fn with_controls(controls: impl IntoIterator<Item = Control>) -> Self {
        Self {
            controls: controls.into_iter().collect(),
            selected: 0,
            channel: ColorChannel::default(),
            visible: true,
        }
    }

    /// All controls.
    #[must_use]
    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    /// Index of the selected control.
    #[must_use]
    pub const fn selected(&self) -> usize {
        self.selected
    }

    /// The selected control, `None` for an empty panel.
    #[must_use]
    pub fn selected_control(&self) -> Option<&Control> {
        self.controls.get(self.selected)
    }

    /// Current colour channel.
    #[must_use]
    pub const fn channel(&self) -> ColorChannel {
        self.channel
    }

    /// Whether the panel is shown.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Shows or hides the panel.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Selects the next control, wrapping around.
    pub fn select_next(&mut self) {
        if !self.controls.is_empty() {
            self.selected = (self.selected + 1) % self.controls.len();
        }
    }

    /// Selects the previous control, wrapping around.
    pub fn select_previous(&mut self) {
        if !self.controls.is_empty() {
            self.selected = (self.selected + self.controls.len() - 1) % self.controls.len();
        }
    }

    /// Reacts to a key press.
    ///
    /// Returns the edit to apply, or `None` when the key only changed the
    /// panel itself (selection, channel, visibility) or the value is
    /// already at its bound. A hidden panel only reacts to `H`.
    pub fn handle_key(
        &mut self,
        key: Key,
        modifiers: Modifiers,
        params: &TunableParameters,
    ) -> Option<PanelEdit> {
        if !self.visible {
            if key == Key::H {
                self.visible = true;
            }
            return None;
        }

        match key {
            Key::H | Key::Escape => {
                self.visible = false;
                None
            }
            Key::Tab if modifiers.shift => {
                self.select_previous();
                None
            }
            Key::Tab | Key::Down => {
                self.select_next();
                None
            }
            Key::Up => {
                self.select_previous();
                None
            }
            Key::R | Key::G | Key::B => {
                self.channel = match key {
                    Key::R => ColorChannel::Red,
                    Key::G => ColorChannel::Green,
                    _ => ColorChannel::Blue,
                };
                None
            }
            Key::Left => self.step(-1.0, modifiers, params),
            Key::Right => self.step(1.0, modifiers, params),
        }
    }

    fn step(
        &self,
        direction: f32,
        modifiers: Modifiers,
        params: &TunableParameters,
    ) -> Option<PanelEdit> {
        let control = self.selected_control()?;
        let multiplier = if modifiers.shift {
            Self::SHIFT_MULTIPLIER
        } else {
            1.0
        };
        let current = params.get(control.id);

        let value = match control.kind {
            ControlKind::Slider(spec) => {
                let old = current.as_scalar()?;
                let new = spec.snap(old + direction * spec.step * multiplier);
                if (new - old).abs() <= f32::EPSILON {
                    return None;
                }
                ParameterValue::Scalar(new)
            }
            ControlKind::Color => {
                let old = current.as_color()?;
                let channel = self.channel.get(old);
                let moved = (channel + direction * Self::COLOR_STEP * multiplier).clamp(0.0, 1.0);
                let new = (moved * 255.0).round() / 255.0;
                if (new - channel).abs() <= f32::EPSILON {
                    return None;
                }
                ParameterValue::Color(self.channel.with(old, new))
            }
        };

        debug!(parameter = control.label, %value, "panel edit");
        Some(PanelEdit {
            id: control.id,
            value,
        })
    }

    /// The selected control as one line of text.
    #[must_use]
    pub fn status_line(&self, params: &TunableParameters) -> String {
        if !self.visible {
            return "press H for the debug panel".to_string();
        }
        let Some(control) = self.selected_control() else {
            return String::new();
        };
        format!(
            "[{}/{}] {}",
            self.selected + 1,
            self.controls.len(),
            self.describe(control, params)
        )
    }

    /// Every control as text, the selected one marked with `>`.
    #[must_use]
    pub fn lines(&self, params: &TunableParameters) -> Vec<String> {
        self.controls
            .iter()
            .enumerate()
            .map(|(i, control)| {
                let marker = if i == self.selected { '>' } else { ' ' };
                format!("{marker} {}", self.describe(control, params))
            })
            .collect()
    }

    fn describe(&self, control: &Control, params: &TunableParameters) -> String {
        let value = params.get(control.id);
        match (control.kind, value) {
            (ControlKind::Slider(spec), ParameterValue::Scalar(v)) => {
                let decimals = decimals_for(spec.step);
                format!(
                    "{}: {v:.decimals$} ({}..{})",
                    control.label, spec.min, spec.max
                )
            }
            (ControlKind::Color, ParameterValue::Color(c)) => {
                format!("{}: {c} [{}]", control.label, self.channel)
            }
            (_, other) => format!("{}: {other}", control.label),
        }
    }
}

impl Default for DebugPanel {
    fn default() -> Self {
        Self::new()
    }
}

fn decimals_for(step: f32) -> usize {
    step.to_string()
        .split_once('.')
        .map_or(0, |(_, fraction)| fraction.len())
}
