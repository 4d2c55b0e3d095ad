//! Balloon Hop - a tiny balloon-catching minigame core
//!
//! Core modules:
//! - `sim`: Headless simulation (entity store, physics, session state)
//! - `platform`: Browser/native glue (wasm exports, logger setup)
//! - `preferences`: The persisted volume preference

pub mod platform;
pub mod preferences;
pub mod sim;

pub use preferences::Preferences;
pub use sim::{Engine, EngineConfig, InputState, SoundEvent};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Default entity pool capacity (also the settings vector length)
    pub const ENTITY_MAX: usize = 100;
    /// Settings slots needed by the fixed index contract
    pub const MIN_CAPACITY: usize = 10;
    /// Rows shown per page of the debug entity list
    pub const DEBUG_PAGE: i32 = 10;

    /// World dimensions (pixels)
    pub const WORLD_WIDTH: f32 = 90.0;
    pub const WORLD_HEIGHT: f32 = 90.0;
    /// Level floor (screen coords, +y is down)
    pub const FLOOR_Y: f32 = 72.0;

    /// Largest frame delta the engine integrates in one step (seconds)
    pub const MAX_FRAME_DT: f32 = 0.25;

    /// Player defaults
    pub const PLAYER_JUMP_SPEED: f32 = -120.0;
    pub const PLAYER_MOVE_SPEED: f32 = 50.0;
    /// Horizontal acceleration toward the held direction (pixels/s²)
    pub const PLAYER_ACCEL: f32 = 600.0;
    /// Horizontal deceleration with no direction held (pixels/s²)
    pub const PLAYER_FRICTION: f32 = 600.0;
    pub const GRAVITY: f32 = 300.0;
    pub const PLAYER_HALF_EXTENTS: [f32; 2] = [3.0, 3.0];

    /// Player animation: two halves of a 60-unit cycle
    pub const WALK_FRAME_RATE: f32 = 220.0;
    pub const FRAME_HALF: f32 = 30.0;
    pub const FRAME_PERIOD: f32 = 60.0;
    pub const AIRBORNE_FRAME: f32 = 35.0;

    /// Collectible defaults
    pub const COLLECTIBLE_HALF_EXTENTS: [f32; 2] = [3.0, 3.0];
    /// Collectibles spawn this far below the vertical center
    pub const COLLECTIBLE_SPAWN_DROP: f32 = 10.0;

    /// Session defaults
    pub const ROUND_SECONDS: f32 = 60.0;
    /// Effectively unlimited spawns for one round
    pub const COLLECTIBLE_BUDGET: i32 = 1_000_000;
    pub const INITIAL_SPAWN_DELAY_RATE: f32 = 0.5;
    pub const MIN_SPAWN_DELAY_RATE: f32 = 0.1;
    /// Spawn delay rate = (time left + 1) / divisor
    pub const SPAWN_RATE_DIVISOR: f32 = 70.0;

    pub const DEFAULT_SEED: u64 = 1234;
}

/// Clamp `value` toward `target` by at most `max_delta`
#[inline]
pub fn approach(value: f32, target: f32, max_delta: f32) -> f32 {
    if value < target {
        (value + max_delta).min(target)
    } else {
        (value - max_delta).max(target)
    }
}

/// Convert a `[x, y]` constant into a vector
#[inline]
pub fn extents(half: [f32; 2]) -> Vec2 {
    Vec2::from_array(half)
}
