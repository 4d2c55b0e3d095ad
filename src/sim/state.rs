//! Engine context and sound events
//!
//! One `Engine` owns one session: the entity store, the settings vectors and
//! the spawner RNG. Nothing here is global, so sessions run side by side.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::config::EngineConfig;
use super::session::{GamePhase, ScrollDirection, SessionSettings};
use super::store::{Entity, EntityStore};
use crate::consts::*;

/// One-shot sound cue returned by `Engine::step`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u32)]
pub enum SoundEvent {
    Jump = 1,
    Collect = 2,
    Land = 3,
    /// Walk step, leaving the second animation half
    Move1 = 4,
    /// Walk step, leaving the first animation half
    Move2 = 5,
    GameStart = 6,
    GameEnd = 7,
}

impl SoundEvent {
    pub fn as_raw(self) -> u32 {
        self as u32
    }

    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            1 => Some(SoundEvent::Jump),
            2 => Some(SoundEvent::Collect),
            3 => Some(SoundEvent::Land),
            4 => Some(SoundEvent::Move1),
            5 => Some(SoundEvent::Move2),
            6 => Some(SoundEvent::GameStart),
            7 => Some(SoundEvent::GameEnd),
            _ => None,
        }
    }
}

/// Serializable view of a session for debugging
#[derive(Serialize)]
struct Snapshot<'a> {
    frame_count: u64,
    phase: GamePhase,
    store: &'a EntityStore,
    settings: &'a SessionSettings,
}

/// The simulation context
#[derive(Debug, Clone)]
pub struct Engine {
    pub(crate) config: EngineConfig,
    pub(crate) store: EntityStore,
    pub(crate) settings: SessionSettings,
    pub(crate) rng: Pcg32,
    /// Steps that ran gameplay
    pub(crate) frame_count: u64,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    /// Allocate a zeroed session. Capacity below `MIN_CAPACITY` is raised to it
    /// and a non-positive or non-finite round length falls back to the default.
    pub fn new(mut config: EngineConfig) -> Self {
        if config.capacity < MIN_CAPACITY {
            log::warn!(
                "Capacity {} below minimum, using {}",
                config.capacity,
                MIN_CAPACITY
            );
            config.capacity = MIN_CAPACITY;
        }
        if !config.round_seconds.is_finite() || config.round_seconds <= 0.0 {
            log::warn!(
                "Round length {} is not a positive duration, using {}",
                config.round_seconds,
                ROUND_SECONDS
            );
            config.round_seconds = ROUND_SECONDS;
        }
        Self {
            store: EntityStore::new(config.capacity),
            settings: SessionSettings::new(config.capacity),
            rng: Pcg32::seed_from_u64(config.seed),
            frame_count: 0,
            config,
        }
    }

    /// Deactivate every slot and restore default settings
    pub fn reset(&mut self) {
        self.store.reset_all();
        self.settings.reset();
        self.rng = Pcg32::seed_from_u64(self.config.seed);
        self.frame_count = 0;
    }

    /// Reset, then stand the player in the middle of the floor (slot 0)
    pub fn init(&mut self) -> usize {
        self.reset();
        let player = Entity::player(Vec2::new(WORLD_WIDTH / 2.0, FLOOR_Y));
        // The store is empty after reset, so this cannot fail
        let slot = self.spawn(player).unwrap_or_default();
        log::info!("Session initialized (capacity {})", self.capacity());
        slot
    }

    /// Spawn into the first free slot; the spawn is dropped when the pool is full
    pub fn spawn(&mut self, entity: Entity) -> Option<usize> {
        match self.store.spawn(entity) {
            Ok(slot) => Some(slot),
            Err(err) => {
                log::debug!("Dropped {:?} spawn: {}", entity.kind, err);
                None
            }
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn capacity(&self) -> usize {
        self.store.capacity()
    }

    /// Read-only view of the entity table
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Read-only view of the settings vectors
    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn phase(&self) -> GamePhase {
        self.settings.phase()
    }

    pub fn score(&self) -> i32 {
        self.settings.score()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    // === Host controls ===

    /// Window focus lost/regained
    pub fn set_paused(&mut self, paused: bool) {
        self.settings.set_paused(paused);
    }

    pub fn toggle_debug(&mut self) -> bool {
        let on = self.settings.toggle_debug();
        log::info!("Debug overlay {}", if on { "on" } else { "off" });
        on
    }

    pub fn toggle_debug_pause(&mut self) -> bool {
        self.settings.toggle_debug_pause()
    }

    pub fn scroll_debug_list(&mut self, direction: ScrollDirection) -> i32 {
        self.settings.scroll_debug_list(direction)
    }

    /// JSON dump of the store and settings
    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&Snapshot {
            frame_count: self.frame_count,
            phase: self.phase(),
            store: &self.store,
            settings: &self.settings,
        })
    }
}
