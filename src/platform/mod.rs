//! Platform layer
//!
//! Logger setup for both targets, and on wasm32 the exports the browser page
//! calls once per animation frame. The page owns the canvas, audio and input
//! sampling; it hands raw button states in and reads the arrays back out of
//! linear memory.

use crate::preferences::GainLevel;
use crate::sim::{DataArray, InputState, ScrollDirection};
use crate::{Engine, Preferences};

/// Install the log backend for this target
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    // A second call finds the logger already set; that is fine
    let _ = console_log::init_with_level(log::Level::Info);
}

#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Advance `engine` one frame from raw host values; returns 0 for no sound
pub fn step_raw(engine: &mut Engine, dt: f32, action: i32, left: i32, right: i32) -> u32 {
    engine
        .step(dt, InputState::from_raw(action, left, right))
        .map_or(0, |event| event.as_raw())
}

/// Address of an exported array in linear memory, 0 for unknown ids
pub fn data_address(engine: &Engine, id: u32) -> usize {
    DataArray::from_raw(id).map_or(0, |array| {
        engine.column(array).as_bytes().as_ptr() as usize
    })
}

/// Gain for one host audio bus, 0 for unknown buses
pub fn bus_gain(prefs: &Preferences, bus: u32) -> f32 {
    GainLevel::from_raw(bus).map_or(0.0, |level| prefs.gain(level))
}

/// Positive steps page down, anything else pages up
pub fn scroll_direction(raw: i32) -> ScrollDirection {
    if raw > 0 {
        ScrollDirection::Down
    } else {
        ScrollDirection::Up
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use wasm_bindgen::prelude::*;

    use crate::{Engine, Preferences};

    thread_local! {
        static ENGINE: RefCell<Engine> = RefCell::new(Engine::default());
        static PREFERENCES: RefCell<Preferences> = RefCell::new(Preferences::default());
    }

    fn with_engine<R>(f: impl FnOnce(&mut Engine) -> R) -> R {
        ENGINE.with(|engine| f(&mut engine.borrow_mut()))
    }

    #[wasm_bindgen(start)]
    pub fn start() {
        super::init_logging();
        PREFERENCES.with(|prefs| *prefs.borrow_mut() = Preferences::load());
        log::info!("Balloon Hop core loaded");
    }

    /// Start a fresh session; always 1
    #[wasm_bindgen]
    pub fn init() -> i32 {
        with_engine(|engine| {
            engine.init();
        });
        1
    }

    #[wasm_bindgen]
    pub fn step(dt: f32, action: i32, left: i32, right: i32) -> u32 {
        with_engine(|engine| super::step_raw(engine, dt, action, left, right))
    }

    #[wasm_bindgen]
    pub fn data_pointer(id: u32) -> u32 {
        with_engine(|engine| super::data_address(engine, id) as u32)
    }

    /// Length of every exported array
    #[wasm_bindgen]
    pub fn buffer_length() -> u32 {
        with_engine(|engine| engine.capacity() as u32)
    }

    #[wasm_bindgen]
    pub fn set_paused(paused: bool) {
        with_engine(|engine| engine.set_paused(paused));
    }

    #[wasm_bindgen]
    pub fn toggle_debug() -> bool {
        with_engine(|engine| engine.toggle_debug())
    }

    #[wasm_bindgen]
    pub fn toggle_debug_pause() -> bool {
        with_engine(|engine| engine.toggle_debug_pause())
    }

    #[wasm_bindgen]
    pub fn scroll_debug_list(direction: i32) -> i32 {
        with_engine(|engine| engine.scroll_debug_list(super::scroll_direction(direction)))
    }

    #[wasm_bindgen]
    pub fn volume() -> f32 {
        PREFERENCES.with(|prefs| prefs.borrow().volume)
    }

    /// Gain the host applies to audio bus `bus` (0 quiet, 1 normal, 2 loud)
    #[wasm_bindgen]
    pub fn gain(bus: u32) -> f32 {
        PREFERENCES.with(|prefs| super::bus_gain(&prefs.borrow(), bus))
    }

    /// Store a new volume; returns the clamped value
    #[wasm_bindgen]
    pub fn set_volume(volume: f32) -> f32 {
        PREFERENCES.with(|prefs| {
            let mut prefs = prefs.borrow_mut();
            prefs.set_volume(volume);
            prefs.save();
            prefs.volume
        })
    }
}
