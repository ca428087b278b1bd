//! # Panel Session Tests
//!
//! Replays keyboard sessions through `InputState` and the panel, applying
//! each edit to a parameter set the way the application does.

use portal_core::{Color, ParameterId, TunableParameters};
use portal_ui::{DebugPanel, InputState, Key, Modifiers};

fn replay(panel: &mut DebugPanel, params: &mut TunableParameters, keys: &[(Key, Modifiers)]) -> usize {
    let mut input = InputState::new();
    let mut applied = 0;
    for &(key, modifiers) in keys {
        input.begin_frame();
        input.modifiers = modifiers;
        input.key_down(key);
        for &pressed in input.keys_pressed() {
            if let Some(edit) = panel.handle_key(pressed, input.modifiers, params) {
                params.set(edit.id, edit.value).unwrap();
                applied += 1;
            }
        }
        input.key_up(key);
    }
    applied
}

#[test]
fn test_strength_session_stays_in_range() {
    let mut panel = DebugPanel::new();
    let mut params = TunableParameters::default();
    let none = Modifiers::default();

    let mut keys = vec![(Key::Down, none), (Key::Down, none)];
    keys.extend(std::iter::repeat((Key::Right, Modifiers::SHIFT)).take(20));
    let applied = replay(&mut panel, &mut params, &keys);

    assert_eq!(panel.selected_control().unwrap().id, ParameterId::PortalStrength);
    assert!((params.portal_strength - 10.0).abs() < 1e-4);
    assert_eq!(applied, 5);
    println!("Strength after session: {}", params.portal_strength);
}

#[test]
fn test_clear_color_session() {
    let mut panel = DebugPanel::new();
    let mut params = TunableParameters::default();
    let none = Modifiers::default();

    let keys = [
        (Key::Up, none),
        (Key::B, none),
        (Key::Right, none),
        (Key::Right, none),
    ];
    replay(&mut panel, &mut params, &keys);

    let start = Color::hex(0x38_3e_38);
    assert!((params.clear_color.r - start.r).abs() < 1e-6);
    assert!((params.clear_color.g - start.g).abs() < 1e-6);
    assert!((params.clear_color.b - (start.b + 16.0 / 255.0)).abs() < 1e-5);
    assert_eq!(params.clear_color.to_string(), "#383e48");
}

#[test]
fn test_hidden_panel_session_changes_nothing() {
    let mut panel = DebugPanel::new();
    let mut params = TunableParameters::default();
    let none = Modifiers::default();

    let keys = [(Key::Escape, none), (Key::Right, none), (Key::Down, none)];
    let applied = replay(&mut panel, &mut params, &keys);

    assert_eq!(applied, 0);
    assert_eq!(params, TunableParameters::default());
    assert_eq!(panel.selected(), 0);
}
