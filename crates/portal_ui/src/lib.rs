//! # Portal UI
//!
//! A minimal debug panel: one control per tunable parameter, driven from
//! the keyboard, rendered as a single status line.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                      PANEL FLOW                        │
//! ├────────────────────────────────────────────────────────┤
//! │  Key → DebugPanel::handle_key → PanelEdit              │
//! │                                    ↓                   │
//! │              Application::set_parameter → observers    │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! The panel reads the current values but never writes them. Every change
//! leaves as a [`PanelEdit`].

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod input;
pub mod panel;

pub use input::{InputState, Key, Modifiers, MouseButton};
pub use panel::{ColorChannel, Control, ControlKind, DebugPanel, PanelEdit};
