//! Configuration and data errors raised during session setup.
//!
//! The per-tick path is intentionally free of fallible operations; everything
//! that can go wrong does so before a session starts (bad input-mode list,
//! bad world dimensions, malformed profile payload) and is surfaced through
//! this enum. Browser-API failures stay `JsValue` and are propagated with `?`
//! at the wasm boundary.

use thiserror::Error;
use wasm_bindgen::JsValue;

use crate::input::InputMode;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("at least one input mode must be enabled")]
    NoInputModes,
    #[error("input mode {0:?} was requested more than once")]
    DuplicateInputMode(InputMode),
    #[error("world dimensions must be positive, got {width}x{height}")]
    InvalidWorldSize { width: f64, height: f64 },
    #[error("failed to parse profile payload: {0}")]
    ProfilePayload(#[from] serde_json::Error),
}

impl From<EngineError> for JsValue {
    fn from(err: EngineError) -> JsValue {
        JsValue::from_str(&err.to_string())
    }
}
