//! `#[wasm_bindgen]` exports for the saber session.
//!
//! TypeScript calls `saber_init` once, then `saber_tick` from its
//! `requestAnimationFrame` callback with the tracker output and the frame
//! timestamp, and reads the packed frame back through `get_frame_view`.

use std::cell::RefCell;

use saber_engine::{GameMode, InputEvent};
use wasm_bindgen::prelude::*;

pub mod runner;

pub use runner::SessionRunner;

thread_local! {
    static RUNNER: RefCell<Option<SessionRunner>> = const { RefCell::new(None) };
}

fn with_runner<R>(f: impl FnOnce(&mut SessionRunner) -> R) -> R {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        let runner = borrow.as_mut().expect("Session not initialized. Call saber_init() first.");
        f(runner)
    })
}

fn mode_from_flag(duel: bool) -> GameMode {
    if duel {
        GameMode::Duel
    } else {
        GameMode::Solo
    }
}

#[wasm_bindgen]
pub fn saber_init(config_json: Option<String>, duel: bool) {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let runner = SessionRunner::from_json(config_json.as_deref(), mode_from_flag(duel));
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("saber: initialized");
}

/// `hand_data`: 64 floats per hand (handedness code, then x/y/z × 21).
/// `face_data`: 2 floats per face. Returns false if the frame was rejected.
#[wasm_bindgen]
pub fn saber_tick(hand_data: &[f32], face_data: &[f32], timestamp_ms: f64) -> bool {
    with_runner(|r| r.tick(hand_data, face_data, timestamp_ms))
}

#[wasm_bindgen]
pub fn saber_toggle_active() {
    with_runner(|r| r.push_input(InputEvent::ToggleActive));
}

#[wasm_bindgen]
pub fn saber_set_mode(duel: bool) {
    with_runner(|r| r.push_input(InputEvent::SetMode(mode_from_flag(duel))));
}

#[wasm_bindgen]
pub fn saber_restart() {
    with_runner(|r| r.push_input(InputEvent::Restart));
}

// ---- Data accessors ----

/// Zero-copy view over the packed frame.
/// Invalidated by any wasm memory growth; re-fetch after every tick.
#[wasm_bindgen]
pub fn get_frame_view() -> js_sys::Float32Array {
    // SAFETY: the view is read synchronously by JS before the next call into
    // wasm, and the buffer is never reallocated after init.
    with_runner(|r| unsafe { js_sys::Float32Array::view(r.buffer()) })
}

#[wasm_bindgen]
pub fn get_frame_ptr() -> *const f32 {
    with_runner(|r| r.buffer_ptr())
}

#[wasm_bindgen]
pub fn get_frame_len() -> u32 {
    with_runner(|r| r.buffer_len())
}

#[wasm_bindgen]
pub fn get_frame_counter() -> u32 {
    with_runner(|r| r.frame_counter())
}

#[wasm_bindgen]
pub fn get_rejected_frames() -> u32 {
    with_runner(|r| r.rejected_frames())
}

#[wasm_bindgen]
pub fn get_snapshot_json() -> String {
    with_runner(|r| r.snapshot_json())
}

// ---- Capacity accessors ----

#[wasm_bindgen]
pub fn get_max_enemies() -> u32 {
    with_runner(|r| r.max_enemies())
}

#[wasm_bindgen]
pub fn get_max_requests() -> u32 {
    with_runner(|r| r.max_requests())
}

#[wasm_bindgen]
pub fn get_max_events() -> u32 {
    with_runner(|r| r.max_events())
}

#[wasm_bindgen]
pub fn get_buffer_total_floats() -> u32 {
    with_runner(|r| r.buffer_total_floats())
}
