//! Fixed-capacity entity store
//!
//! Struct-of-arrays table addressed by slot index. Columns are allocated once
//! and never resized; an entity is "destroyed" by clearing its slot, and index
//! identity is stable for the entity's lifetime.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::error::StoreError;

/// Entity archetype tag (stored as i32 in the `kind` column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(i32)]
pub enum EntityKind {
    #[default]
    Empty = 0,
    Player = 1,
    Collectible = 2,
}

impl EntityKind {
    /// Unknown tags read as `Empty`
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            1 => EntityKind::Player,
            2 => EntityKind::Collectible,
            _ => EntityKind::Empty,
        }
    }

    pub fn as_raw(self) -> i32 {
        self as i32
    }
}

/// One row of the table, used to spawn and to read an entity whole
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Behavior parameter (player run speed, collectible bob half-period)
    pub max_speed: f32,
    /// Degrees
    pub rot: f32,
    /// Degrees per second
    pub rot_speed: f32,
    pub graphic: i32,
    pub frame: f32,
    pub flip: bool,
    pub timer: f32,
}

impl Entity {
    /// A player standing at `pos`
    pub fn player(pos: Vec2) -> Self {
        Self {
            kind: EntityKind::Player,
            pos,
            max_speed: crate::consts::PLAYER_MOVE_SPEED,
            ..Default::default()
        }
    }

    /// A motionless collectible at `pos`
    pub fn collectible(pos: Vec2) -> Self {
        Self {
            kind: EntityKind::Collectible,
            pos,
            ..Default::default()
        }
    }
}

/// The entity table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityStore {
    capacity: usize,
    pub(crate) active: Vec<i32>,
    pub(crate) kind: Vec<i32>,
    pub(crate) x: Vec<f32>,
    pub(crate) y: Vec<f32>,
    pub(crate) speed_x: Vec<f32>,
    pub(crate) speed_y: Vec<f32>,
    pub(crate) max_speed: Vec<f32>,
    pub(crate) rot: Vec<f32>,
    pub(crate) rot_speed: Vec<f32>,
    pub(crate) graphic: Vec<i32>,
    pub(crate) frame: Vec<f32>,
    pub(crate) flip: Vec<i32>,
    pub(crate) timer: Vec<f32>,
}

impl EntityStore {
    /// Allocate a table with every slot inactive
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            active: vec![0; capacity],
            kind: vec![0; capacity],
            x: vec![0.0; capacity],
            y: vec![0.0; capacity],
            speed_x: vec![0.0; capacity],
            speed_y: vec![0.0; capacity],
            max_speed: vec![0.0; capacity],
            rot: vec![0.0; capacity],
            rot_speed: vec![0.0; capacity],
            graphic: vec![0; capacity],
            frame: vec![0.0; capacity],
            flip: vec![0; capacity],
            timer: vec![0.0; capacity],
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    fn check(&self, index: usize) -> Result<usize, StoreError> {
        if index < self.capacity {
            Ok(index)
        } else {
            Err(StoreError::InvalidIndex {
                index,
                capacity: self.capacity,
            })
        }
    }

    /// Clear one slot back to its zeroed, inactive state
    pub fn despawn(&mut self, index: usize) -> Result<(), StoreError> {
        let e = self.check(index)?;
        self.clear_slot(e);
        Ok(())
    }

    pub(crate) fn clear_slot(&mut self, e: usize) {
        self.active[e] = 0;
        self.kind[e] = 0;
        self.x[e] = 0.0;
        self.y[e] = 0.0;
        self.speed_x[e] = 0.0;
        self.speed_y[e] = 0.0;
        self.max_speed[e] = 0.0;
        self.rot[e] = 0.0;
        self.rot_speed[e] = 0.0;
        self.graphic[e] = 0;
        self.frame[e] = 0.0;
        self.flip[e] = 0;
        self.timer[e] = 0.0;
    }

    /// Deactivate every slot
    pub fn reset_all(&mut self) {
        for e in 0..self.capacity {
            self.clear_slot(e);
        }
    }

    /// First inactive slot, scanning from 0
    pub fn find_free(&self) -> Result<usize, StoreError> {
        self.active
            .iter()
            .position(|&a| a == 0)
            .ok_or(StoreError::ResourceExhausted {
                capacity: self.capacity,
            })
    }

    /// Write `entity` into the first free slot and return its index
    pub fn spawn(&mut self, entity: Entity) -> Result<usize, StoreError> {
        let e = self.find_free()?;
        self.write(e, &entity);
        Ok(e)
    }

    /// Overwrite slot `index` with `entity` and mark it active
    pub fn set(&mut self, index: usize, entity: &Entity) -> Result<(), StoreError> {
        let e = self.check(index)?;
        self.write(e, entity);
        Ok(())
    }

    fn write(&mut self, e: usize, entity: &Entity) {
        self.active[e] = 1;
        self.kind[e] = entity.kind.as_raw();
        self.x[e] = entity.pos.x;
        self.y[e] = entity.pos.y;
        self.speed_x[e] = entity.vel.x;
        self.speed_y[e] = entity.vel.y;
        self.max_speed[e] = entity.max_speed;
        self.rot[e] = entity.rot;
        self.rot_speed[e] = entity.rot_speed;
        self.graphic[e] = entity.graphic;
        self.frame[e] = entity.frame;
        self.flip[e] = i32::from(entity.flip);
        self.timer[e] = entity.timer;
    }

    /// Read slot `index`; `None` when the slot is inactive
    pub fn get(&self, index: usize) -> Result<Option<Entity>, StoreError> {
        let e = self.check(index)?;
        if self.active[e] == 0 {
            return Ok(None);
        }
        Ok(Some(Entity {
            kind: EntityKind::from_raw(self.kind[e]),
            pos: Vec2::new(self.x[e], self.y[e]),
            vel: Vec2::new(self.speed_x[e], self.speed_y[e]),
            max_speed: self.max_speed[e],
            rot: self.rot[e],
            rot_speed: self.rot_speed[e],
            graphic: self.graphic[e],
            frame: self.frame[e],
            flip: self.flip[e] != 0,
            timer: self.timer[e],
        }))
    }

    pub fn is_active(&self, index: usize) -> Result<bool, StoreError> {
        let e = self.check(index)?;
        Ok(self.active[e] != 0)
    }

    pub fn kind(&self, index: usize) -> Result<EntityKind, StoreError> {
        let e = self.check(index)?;
        Ok(EntityKind::from_raw(self.kind[e]))
    }

    pub fn position(&self, index: usize) -> Result<Vec2, StoreError> {
        let e = self.check(index)?;
        Ok(Vec2::new(self.x[e], self.y[e]))
    }

    pub fn set_position(&mut self, index: usize, pos: Vec2) -> Result<(), StoreError> {
        let e = self.check(index)?;
        self.x[e] = pos.x;
        self.y[e] = pos.y;
        Ok(())
    }

    pub fn velocity(&self, index: usize) -> Result<Vec2, StoreError> {
        let e = self.check(index)?;
        Ok(Vec2::new(self.speed_x[e], self.speed_y[e]))
    }

    pub fn set_velocity(&mut self, index: usize, vel: Vec2) -> Result<(), StoreError> {
        let e = self.check(index)?;
        self.speed_x[e] = vel.x;
        self.speed_y[e] = vel.y;
        Ok(())
    }

    /// Indices of active slots in ascending order
    pub fn iter_active(&self) -> impl Iterator<Item = usize> + '_ {
        self.active
            .iter()
            .enumerate()
            .filter(|&(_, &a)| a != 0)
            .map(|(e, _)| e)
    }

    /// Active slots of one archetype
    pub fn iter_kind(&self, kind: EntityKind) -> impl Iterator<Item = usize> + '_ {
        let raw = kind.as_raw();
        self.iter_active().filter(move |&e| self.kind[e] == raw)
    }

    pub fn active_count(&self) -> usize {
        self.iter_active().count()
    }

    /// First active player slot
    pub fn player(&self) -> Option<usize> {
        self.iter_kind(EntityKind::Player).next()
    }

    pub(crate) fn is_finite(&self, e: usize) -> bool {
        self.x[e].is_finite()
            && self.y[e].is_finite()
            && self.speed_x[e].is_finite()
            && self.speed_y[e].is_finite()
    }
}
