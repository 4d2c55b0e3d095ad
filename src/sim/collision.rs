//! Overlap tests and world bounds
//!
//! Every archetype uses a fixed axis-aligned box centered on its position.

use glam::Vec2;

use super::store::EntityKind;
use crate::consts::*;
use crate::extents;

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, half: Vec2) -> Self {
        Self { center, half }
    }

    /// Box for an entity of `kind` at `pos`
    pub fn for_kind(kind: EntityKind, pos: Vec2) -> Self {
        Self::new(pos, half_extents(kind))
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half
    }

    /// Touching edges count as overlap
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let delta = (self.center - other.center).abs();
        let reach = self.half + other.half;
        delta.x <= reach.x && delta.y <= reach.y
    }
}

/// Fixed half-extents per archetype
pub fn half_extents(kind: EntityKind) -> Vec2 {
    match kind {
        EntityKind::Player => extents(PLAYER_HALF_EXTENTS),
        EntityKind::Collectible => extents(COLLECTIBLE_HALF_EXTENTS),
        EntityKind::Empty => Vec2::ZERO,
    }
}

/// Which side wall a body has crossed while moving toward it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideExit {
    Left,
    Right,
}

/// Crossing the left edge moving left, or the right edge moving right
pub fn side_exit(x: f32, speed_x: f32) -> Option<SideExit> {
    if x < 0.0 && speed_x < 0.0 {
        Some(SideExit::Left)
    } else if x > WORLD_WIDTH && speed_x > 0.0 {
        Some(SideExit::Right)
    } else {
        None
    }
}

/// Resting on or below the floor without moving up
#[inline]
pub fn is_grounded(y: f32, speed_y: f32) -> bool {
    y >= FLOOR_Y && speed_y >= 0.0
}
