//! Unified keyboard / pointer / gamepad input.
//!
//! The aggregator owns the OS-level event hooks as a scoped resource:
//! [`InputAggregator::activate`] installs capture-phase window listeners,
//! [`InputAggregator::deactivate`] removes them, both idempotently. Game
//! input is intercepted at the topmost capture phase and not propagated, so
//! the host page never reacts to game keys or clicks.
//!
//! Gameplay code never touches the live state bags; it consumes the plain
//! [`InputSnapshot`] returned by [`InputAggregator::poll`], which keeps every
//! consumer natively testable with hand-built snapshots.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use crate::error::EngineError;

pub mod gamepad;

pub use gamepad::{PadAxis, PadButton, PadButtonState, PadSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Pointer,
    Keyboard,
    Gamepad,
}

/// Pointer buttons in platform button-code order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left = 0,
    Right,
    Wheel,
    Back,
    Forward,
}

impl PointerButton {
    pub const COUNT: usize = 5;

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::Left),
            1 => Some(Self::Right),
            2 => Some(Self::Wheel),
            3 => Some(Self::Back),
            4 => Some(Self::Forward),
            _ => None,
        }
    }
}

/// The whitespace key reports as `" "`; everything else keeps its DOM name.
pub fn normalize_key(key: &str) -> &str {
    if key == " " { "Space" } else { key }
}

/// Modes must be non-empty and duplicate-free; checked before any listener
/// exists so a misconfigured session aborts cleanly.
pub fn validate_modes(modes: &[InputMode]) -> Result<(), EngineError> {
    if modes.is_empty() {
        return Err(EngineError::NoInputModes);
    }
    for (i, mode) in modes.iter().enumerate() {
        if modes[..i].contains(mode) {
            return Err(EngineError::DuplicateInputMode(*mode));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct PointerSnapshot {
    /// Last known press position in canvas-local coordinates; None while no
    /// button is held.
    pub position: Option<(f64, f64)>,
    buttons: [bool; PointerButton::COUNT],
}

impl PointerSnapshot {
    pub fn button_pressed(&self, button: PointerButton) -> bool {
        self.buttons[button as usize]
    }

    pub fn set_button(&mut self, button: PointerButton, down: bool) {
        self.buttons[button as usize] = down;
    }
}

/// One frame's view of every enabled input mode.
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    /// Pressed keys mapped to their press timestamp (ms since epoch).
    pub keys: HashMap<String, f64>,
    pub pointer: PointerSnapshot,
    /// Connected gamepads by device index.
    pub pads: BTreeMap<u32, PadSnapshot>,
}

impl InputSnapshot {
    pub fn key_pressed(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    /// The first connected pad, if any; the game reads a single device.
    pub fn first_pad(&self) -> Option<&PadSnapshot> {
        self.pads.values().next()
    }
}

#[derive(Default)]
struct AggregatorState {
    keys: HashMap<String, f64>,
    pointer: PointerSnapshot,
    pads: BTreeMap<u32, PadSnapshot>,
}

impl AggregatorState {
    fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            keys: self.keys.clone(),
            pointer: self.pointer.clone(),
            pads: self.pads.clone(),
        }
    }
}

struct EventHook {
    event: &'static str,
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

pub struct InputAggregator {
    state: Rc<RefCell<AggregatorState>>,
    hooks: Vec<EventHook>,
    active: bool,
    gamepad_enabled: bool,
}

impl InputAggregator {
    /// Build the aggregator for the requested modes. Keyboard and pointer
    /// hooks are created but not installed until [`Self::activate`]; gamepad
    /// support is probed here and degraded to disabled (never fatal) when the
    /// platform lacks it or denies permission.
    pub fn new(modes: &[InputMode], canvas: &HtmlCanvasElement) -> Result<Self, EngineError> {
        validate_modes(modes)?;

        let state = Rc::new(RefCell::new(AggregatorState::default()));
        let mut hooks = Vec::new();
        let mut gamepad_enabled = false;

        for mode in modes {
            match mode {
                InputMode::Keyboard => Self::install_keyboard(&state, &mut hooks),
                InputMode::Pointer => Self::install_pointer(&state, canvas, &mut hooks),
                InputMode::Gamepad => {
                    gamepad_enabled = Self::install_gamepad(&state, &mut hooks);
                }
            }
        }

        Ok(Self {
            state,
            hooks,
            active: false,
            gamepad_enabled,
        })
    }

    fn install_keyboard(state: &Rc<RefCell<AggregatorState>>, hooks: &mut Vec<EventHook>) {
        let down_state = state.clone();
        let keydown = Closure::wrap(Box::new(move |e: web_sys::Event| {
            if let Some(key_event) = e.dyn_ref::<web_sys::KeyboardEvent>() {
                let key = normalize_key(&key_event.key()).to_string();
                down_state.borrow_mut().keys.insert(key, js_sys::Date::now());
            }
            e.stop_propagation();
            e.prevent_default();
        }) as Box<dyn FnMut(web_sys::Event)>);

        let up_state = state.clone();
        let keyup = Closure::wrap(Box::new(move |e: web_sys::Event| {
            if let Some(key_event) = e.dyn_ref::<web_sys::KeyboardEvent>() {
                let key = normalize_key(&key_event.key()).to_string();
                up_state.borrow_mut().keys.remove(&key);
            }
            e.stop_propagation();
            e.prevent_default();
        }) as Box<dyn FnMut(web_sys::Event)>);

        hooks.push(EventHook {
            event: "keydown",
            callback: keydown,
        });
        hooks.push(EventHook {
            event: "keyup",
            callback: keyup,
        });
    }

    fn install_pointer(
        state: &Rc<RefCell<AggregatorState>>,
        canvas: &HtmlCanvasElement,
        hooks: &mut Vec<EventHook>,
    ) {
        let down_state = state.clone();
        let down_canvas = canvas.clone();
        let mousedown = Closure::wrap(Box::new(move |e: web_sys::Event| {
            if let Some(mouse) = e.dyn_ref::<web_sys::MouseEvent>() {
                if let Some(button) = PointerButton::from_code(mouse.button()) {
                    // Translate into canvas-local coordinates.
                    let rect = down_canvas.get_bounding_client_rect();
                    let x = mouse.client_x() as f64 - rect.left();
                    let y = mouse.client_y() as f64 - rect.top();
                    let mut state = down_state.borrow_mut();
                    state.pointer.set_button(button, true);
                    state.pointer.position = Some((x, y));
                }
            }
            e.stop_propagation();
            e.prevent_default();
        }) as Box<dyn FnMut(web_sys::Event)>);

        let up_state = state.clone();
        let mouseup = Closure::wrap(Box::new(move |e: web_sys::Event| {
            if let Some(mouse) = e.dyn_ref::<web_sys::MouseEvent>() {
                if let Some(button) = PointerButton::from_code(mouse.button()) {
                    let mut state = up_state.borrow_mut();
                    state.pointer.set_button(button, false);
                    state.pointer.position = None;
                }
            }
            e.stop_propagation();
            e.prevent_default();
        }) as Box<dyn FnMut(web_sys::Event)>);

        hooks.push(EventHook {
            event: "mousedown",
            callback: mousedown,
        });
        hooks.push(EventHook {
            event: "mouseup",
            callback: mouseup,
        });
    }

    /// Returns whether the mode ends up enabled. Absence of platform support
    /// and permission denials degrade to disabled.
    fn install_gamepad(state: &Rc<RefCell<AggregatorState>>, hooks: &mut Vec<EventHook>) -> bool {
        let Some(window) = web_sys::window() else {
            log::warn!("no window object; gamepad input disabled");
            return false;
        };
        let navigator = window.navigator();
        let has_api = js_sys::Reflect::has(navigator.as_ref(), &JsValue::from_str("getGamepads"))
            .unwrap_or(false);
        if !has_api {
            log::error!("this browser does not have support for gamepads");
            return false;
        }

        // Initial enumeration of already-connected devices.
        match gamepad::connected_pads(&navigator) {
            Ok(pads) => {
                let mut state = state.borrow_mut();
                for pad in pads {
                    state.pads.insert(pad.index, pad);
                }
            }
            Err(err) => {
                if err
                    .dyn_ref::<web_sys::DomException>()
                    .is_some_and(|e| e.name() == "SecurityError")
                {
                    log::warn!("this window context does not allow gamepads in the permission policy");
                } else {
                    log::warn!("gamepad enumeration failed, disabling gamepad input");
                }
                return false;
            }
        }

        let connect_state = state.clone();
        let connected = Closure::wrap(Box::new(move |e: web_sys::Event| {
            if let Some(event) = e.dyn_ref::<web_sys::GamepadEvent>() {
                if let Some(pad) = event.gamepad() {
                    if !pad.connected() {
                        log::warn!("expected the gamepad to be connected");
                        return;
                    }
                    let snapshot = gamepad::snapshot_of(&pad);
                    connect_state.borrow_mut().pads.insert(snapshot.index, snapshot);
                }
            }
        }) as Box<dyn FnMut(web_sys::Event)>);

        let disconnect_state = state.clone();
        let disconnected = Closure::wrap(Box::new(move |e: web_sys::Event| {
            if let Some(event) = e.dyn_ref::<web_sys::GamepadEvent>() {
                if let Some(pad) = event.gamepad() {
                    disconnect_state.borrow_mut().pads.remove(&pad.index());
                }
            }
        }) as Box<dyn FnMut(web_sys::Event)>);

        hooks.push(EventHook {
            event: "gamepadconnected",
            callback: connected,
        });
        hooks.push(EventHook {
            event: "gamepaddisconnected",
            callback: disconnected,
        });
        true
    }

    /// Install all window hooks. Calling twice is a no-op.
    pub fn activate(&mut self) {
        if self.active {
            return;
        }
        let Some(window) = web_sys::window() else {
            return;
        };
        for hook in &self.hooks {
            if let Err(err) = window.add_event_listener_with_callback_and_bool(
                hook.event,
                hook.callback.as_ref().unchecked_ref(),
                true,
            ) {
                log::warn!("failed to install {} listener: {err:?}", hook.event);
            }
        }
        self.active = true;
    }

    /// Remove all window hooks. Safe without a prior [`Self::activate`], so a
    /// stale session can be torn down defensively on abnormal restart.
    pub fn deactivate(&mut self) {
        if !self.active {
            return;
        }
        let Some(window) = web_sys::window() else {
            return;
        };
        for hook in &self.hooks {
            let _ = window.remove_event_listener_with_callback_and_bool(
                hook.event,
                hook.callback.as_ref().unchecked_ref(),
                true,
            );
        }
        self.active = false;
    }

    /// Refresh device state and return this frame's snapshot. Gamepads are
    /// re-read from `navigator.getGamepads()` every poll, which doubles as
    /// the fallback on platforms without connect/disconnect events.
    pub fn poll(&mut self, _delta: f64) -> InputSnapshot {
        if self.gamepad_enabled {
            if let Some(window) = web_sys::window() {
                if let Ok(pads) = gamepad::connected_pads(&window.navigator()) {
                    let mut state = self.state.borrow_mut();
                    for pad in pads {
                        state.pads.insert(pad.index, pad);
                    }
                }
            }
        }
        self.state.borrow().snapshot()
    }
}
