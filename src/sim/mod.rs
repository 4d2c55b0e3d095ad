//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (by slot index)
//! - No rendering or platform dependencies

pub mod collision;
pub mod config;
pub mod error;
pub mod export;
pub mod input;
pub mod session;
mod spawner;
pub mod state;
pub mod store;
pub mod tick;

pub use collision::{Aabb, SideExit, half_extents, is_grounded, side_exit};
pub use config::EngineConfig;
pub use error::{ConfigError, StoreError};
pub use export::{Column, DataArray};
pub use input::{ButtonState, InputState};
pub use session::{GamePhase, ScrollDirection, SessionSettings};
pub use state::{Engine, SoundEvent};
pub use store::{Entity, EntityKind, EntityStore};
