// Input-layer tests (native) for the `chat-arcade` crate.
// These tests avoid wasm-specific functionality and exercise pure Rust logic so
// they can run under `cargo test` on the host.

use chat_arcade::error::EngineError;
use chat_arcade::input::{
    InputMode, InputSnapshot, PadAxis, PadButton, PadButtonState, PadSnapshot, PointerButton,
    PointerSnapshot, normalize_key, validate_modes,
};

#[test]
fn empty_mode_list_is_rejected() {
    assert!(matches!(validate_modes(&[]), Err(EngineError::NoInputModes)));
}

#[test]
fn duplicate_mode_is_rejected() {
    let modes = [InputMode::Keyboard, InputMode::Pointer, InputMode::Keyboard];
    assert!(matches!(
        validate_modes(&modes),
        Err(EngineError::DuplicateInputMode(InputMode::Keyboard))
    ));
}

#[test]
fn all_three_modes_together_are_valid() {
    let modes = [InputMode::Pointer, InputMode::Keyboard, InputMode::Gamepad];
    assert!(validate_modes(&modes).is_ok());
}

#[test]
fn space_key_gets_a_readable_name() {
    assert_eq!(normalize_key(" "), "Space");
    assert_eq!(normalize_key("ArrowLeft"), "ArrowLeft");
    assert_eq!(normalize_key("a"), "a");
}

#[test]
fn pointer_button_codes_follow_the_platform_table() {
    assert_eq!(PointerButton::from_code(0), Some(PointerButton::Left));
    assert_eq!(PointerButton::from_code(1), Some(PointerButton::Right));
    assert_eq!(PointerButton::from_code(2), Some(PointerButton::Wheel));
    assert_eq!(PointerButton::from_code(3), Some(PointerButton::Back));
    assert_eq!(PointerButton::from_code(4), Some(PointerButton::Forward));
    assert_eq!(PointerButton::from_code(5), None);
    assert_eq!(PointerButton::from_code(-1), None);
}

#[test]
fn pointer_snapshot_tracks_buttons_independently() {
    let mut pointer = PointerSnapshot::default();
    assert!(!pointer.button_pressed(PointerButton::Left));
    pointer.set_button(PointerButton::Left, true);
    pointer.set_button(PointerButton::Right, true);
    pointer.set_button(PointerButton::Right, false);
    assert!(pointer.button_pressed(PointerButton::Left));
    assert!(!pointer.button_pressed(PointerButton::Right));
}

#[test]
fn standard_mapping_indices_are_stable() {
    assert_eq!(PadButton::A as usize, 0);
    assert_eq!(PadButton::Rt as usize, 7);
    assert_eq!(PadButton::Center as usize, 16);
    assert_eq!(PadAxis::LsX as usize, 0);
    assert_eq!(PadAxis::RsX as usize, 4);
    assert_eq!(PadAxis::UbY as usize, 7);
}

#[test]
fn pad_snapshot_accessors_tolerate_short_devices() {
    let pad = PadSnapshot {
        index: 0,
        axes: vec![0.25, -1.0],
        buttons: vec![PadButtonState {
            pressed: true,
            value: 1.0,
        }],
    };
    assert_eq!(pad.axis(PadAxis::LsX), Some(0.25));
    assert_eq!(pad.axis(PadAxis::RsX), None);
    assert!(pad.button_pressed(PadButton::A));
    assert!(!pad.button_pressed(PadButton::Rt));
}

#[test]
fn snapshot_reports_keys_and_lowest_indexed_pad() {
    let mut snapshot = InputSnapshot::default();
    assert!(!snapshot.key_pressed("Space"));
    snapshot.keys.insert("Space".to_string(), 123.0);
    assert!(snapshot.key_pressed("Space"));

    assert!(snapshot.first_pad().is_none());
    snapshot.pads.insert(
        3,
        PadSnapshot {
            index: 3,
            ..PadSnapshot::default()
        },
    );
    snapshot.pads.insert(
        1,
        PadSnapshot {
            index: 1,
            ..PadSnapshot::default()
        },
    );
    assert_eq!(snapshot.first_pad().map(|p| p.index), Some(1));
}
