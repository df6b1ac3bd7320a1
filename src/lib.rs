pub mod animate;
pub mod arc;
pub mod config;
pub mod estimate;
pub mod parser;
pub mod toolpath;

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Estimates total machining time of a G-code program as `HH:MM:SS`.
#[wasm_bindgen]
pub fn estimate_machining_time(gcode: &str) -> String {
    estimate::estimate_formatted(gcode)
}

/// Replays a G-code program and returns the motion-event stream (poses,
/// trail segments, material-removal events, tool changes) for a JS renderer.
#[wasm_bindgen]
pub fn trace_gcode(gcode: &str) -> Result<JsValue, JsValue> {
    let events = animate::trace_program(gcode);
    serde_wasm_bindgen::to_value(&events).map_err(|e| JsValue::from_str(&e.to_string()))
}
