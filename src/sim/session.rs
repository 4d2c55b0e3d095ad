//! Session settings shared with the render layer
//!
//! Two flat vectors (ints and floats) whose indices are a fixed contract with
//! the host. Named accessors wrap every slot the core uses.

use serde::{Deserialize, Serialize};

use super::input::{ButtonState, InputState};
use crate::consts::*;

/// Integer settings indices
pub mod int {
    pub const DEBUG: usize = 0;
    pub const DEBUG_PAUSE: usize = 1;
    pub const DEBUG_LIST_POS: usize = 2;
    pub const PAUSE: usize = 3;
    pub const GAME_STATE: usize = 4;
    pub const INPUT_LEFT: usize = 5;
    pub const INPUT_RIGHT: usize = 6;
    pub const INPUT_ACTION: usize = 7;
    pub const SCORE: usize = 8;
    pub const COLLECTIBLES_TO_SPAWN: usize = 9;
}

/// Float settings indices
pub mod float {
    pub const GAME_TIMER: usize = 1;
    pub const SPAWN_DELAY: usize = 3;
    pub const SPAWN_DELAY_RATE: usize = 4;
}

/// Session state, stored in `int::GAME_STATE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(i32)]
pub enum GamePhase {
    /// Waiting for the first action press
    #[default]
    NotStarted = 0,
    /// Round running
    Playing = 1,
    /// Round over; terminal until the engine is re-initialized
    Ended = 2,
}

impl GamePhase {
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            1 => GamePhase::Playing,
            2 => GamePhase::Ended,
            _ => GamePhase::NotStarted,
        }
    }
}

/// Debug list scroll direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// Flat settings vectors, each `capacity` long
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    ints: Vec<i32>,
    floats: Vec<f32>,
}

impl SessionSettings {
    /// Capacity below `MIN_CAPACITY` is raised to it
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(MIN_CAPACITY);
        let mut settings = Self {
            ints: vec![0; capacity],
            floats: vec![0.0; capacity],
        };
        settings.reset();
        settings
    }

    /// Back to session defaults
    pub fn reset(&mut self) {
        self.ints.fill(0);
        self.floats.fill(0.0);
        self.ints[int::INPUT_LEFT] = ButtonState::Released.as_raw();
        self.ints[int::INPUT_RIGHT] = ButtonState::Released.as_raw();
        self.ints[int::INPUT_ACTION] = ButtonState::Released.as_raw();
        self.floats[float::SPAWN_DELAY_RATE] = INITIAL_SPAWN_DELAY_RATE;
    }

    pub fn ints(&self) -> &[i32] {
        &self.ints
    }

    pub fn floats(&self) -> &[f32] {
        &self.floats
    }

    // === Flags ===

    pub fn paused(&self) -> bool {
        self.ints[int::PAUSE] != 0
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.ints[int::PAUSE] = i32::from(paused);
    }

    pub fn debug(&self) -> bool {
        self.ints[int::DEBUG] != 0
    }

    pub fn toggle_debug(&mut self) -> bool {
        self.ints[int::DEBUG] = i32::from(!self.debug());
        self.debug()
    }

    pub fn debug_paused(&self) -> bool {
        self.ints[int::DEBUG_PAUSE] != 0
    }

    pub fn toggle_debug_pause(&mut self) -> bool {
        self.ints[int::DEBUG_PAUSE] = i32::from(!self.debug_paused());
        self.debug_paused()
    }

    /// True when gameplay must not advance this frame
    pub fn halted(&self) -> bool {
        self.paused() || (self.debug() && self.debug_paused())
    }

    pub fn debug_list_pos(&self) -> i32 {
        self.ints[int::DEBUG_LIST_POS]
    }

    /// Move the debug list by one page, wrapping at either end
    pub fn scroll_debug_list(&mut self, direction: ScrollDirection) -> i32 {
        let last_page = self.ints.len() as i32 - DEBUG_PAGE;
        let pos = match direction {
            ScrollDirection::Up => {
                let pos = self.debug_list_pos() - DEBUG_PAGE;
                if pos < 0 { last_page } else { pos }
            }
            ScrollDirection::Down => {
                let pos = self.debug_list_pos() + DEBUG_PAGE;
                if pos > last_page { 0 } else { pos }
            }
        };
        self.ints[int::DEBUG_LIST_POS] = pos;
        pos
    }

    // === Session ===

    pub fn phase(&self) -> GamePhase {
        GamePhase::from_raw(self.ints[int::GAME_STATE])
    }

    pub fn set_phase(&mut self, phase: GamePhase) {
        self.ints[int::GAME_STATE] = phase as i32;
    }

    pub fn score(&self) -> i32 {
        self.ints[int::SCORE]
    }

    pub fn set_score(&mut self, score: i32) {
        self.ints[int::SCORE] = score;
    }

    pub fn add_score(&mut self, points: i32) {
        self.ints[int::SCORE] = self.ints[int::SCORE].saturating_add(points);
    }

    pub fn game_timer(&self) -> f32 {
        self.floats[float::GAME_TIMER]
    }

    pub fn set_game_timer(&mut self, seconds: f32) {
        self.floats[float::GAME_TIMER] = seconds;
    }

    // === Input ===

    pub fn input(&self) -> InputState {
        InputState::from_raw(
            self.ints[int::INPUT_ACTION],
            self.ints[int::INPUT_LEFT],
            self.ints[int::INPUT_RIGHT],
        )
    }

    pub fn set_input(&mut self, input: InputState) {
        self.ints[int::INPUT_ACTION] = input.action.as_raw();
        self.ints[int::INPUT_LEFT] = input.left.as_raw();
        self.ints[int::INPUT_RIGHT] = input.right.as_raw();
    }

    // === Spawner ===

    pub fn to_spawn(&self) -> i32 {
        self.ints[int::COLLECTIBLES_TO_SPAWN]
    }

    pub fn set_to_spawn(&mut self, count: i32) {
        self.ints[int::COLLECTIBLES_TO_SPAWN] = count;
    }

    pub fn spawn_delay(&self) -> f32 {
        self.floats[float::SPAWN_DELAY]
    }

    pub fn set_spawn_delay(&mut self, seconds: f32) {
        self.floats[float::SPAWN_DELAY] = seconds;
    }

    pub fn spawn_delay_rate(&self) -> f32 {
        self.floats[float::SPAWN_DELAY_RATE]
    }

    pub fn set_spawn_delay_rate(&mut self, seconds: f32) {
        self.floats[float::SPAWN_DELAY_RATE] = seconds;
    }
}
