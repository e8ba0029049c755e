//! Standard-mapping gamepad tables and plain-data device snapshots.
//!
//! Button and axis indices follow the W3C "standard" mapping as the original
//! control scheme expects it; devices reporting other mappings are read
//! through the same tables on a best-effort basis.

use wasm_bindgen::JsCast;

/// Button order of the standard mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadButton {
    A = 0,
    B,
    X,
    Y,
    Lb,
    Rb,
    Lt,
    Rt,
    Select,
    Start,
    Ls,
    Rs,
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
    Center,
}

/// Axis order of the standard mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadAxis {
    LsX = 0,
    LsY,
    UaX,
    UaY,
    RsX,
    RsY,
    UbX,
    UbY,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PadButtonState {
    pub pressed: bool,
    pub value: f64,
}

/// Last-seen state of one connected device. Axes are in [-1, 1].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PadSnapshot {
    pub index: u32,
    pub axes: Vec<f64>,
    pub buttons: Vec<PadButtonState>,
}

impl PadSnapshot {
    pub fn axis(&self, axis: PadAxis) -> Option<f64> {
        self.axes.get(axis as usize).copied()
    }

    pub fn button(&self, button: PadButton) -> Option<PadButtonState> {
        self.buttons.get(button as usize).copied()
    }

    pub fn button_pressed(&self, button: PadButton) -> bool {
        self.button(button).is_some_and(|b| b.pressed)
    }
}

/// Read a connected device into a plain snapshot.
pub(crate) fn snapshot_of(pad: &web_sys::Gamepad) -> PadSnapshot {
    let axes = pad
        .axes()
        .iter()
        .map(|v| v.as_f64().unwrap_or(0.0))
        .collect();
    let buttons = pad
        .buttons()
        .iter()
        .filter_map(|v| v.dyn_into::<web_sys::GamepadButton>().ok())
        .map(|b| PadButtonState {
            pressed: b.pressed(),
            value: b.value(),
        })
        .collect();
    PadSnapshot {
        index: pad.index(),
        axes,
        buttons,
    }
}

/// Currently-connected devices as reported by `navigator.getGamepads()`.
/// Entries for disconnected slots are null and skipped.
pub(crate) fn connected_pads(navigator: &web_sys::Navigator) -> Result<Vec<PadSnapshot>, wasm_bindgen::JsValue> {
    let pads = navigator.get_gamepads()?;
    Ok(pads
        .iter()
        .filter_map(|v| v.dyn_into::<web_sys::Gamepad>().ok())
        .filter(|p| p.connected())
        .map(|p| snapshot_of(&p))
        .collect())
}
