//! Collectible emitter
//!
//! Balloons drift in from either side wall at a rate that speeds up as the
//! round clock runs down.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::session::SessionSettings;
use super::store::{Entity, EntityKind, EntityStore};
use crate::consts::*;

/// Build one balloon from the RNG
fn roll_collectible(rng: &mut Pcg32) -> Entity {
    let moving_right = rng.random::<f32>() > 0.5;
    let timer_max = 0.15 + rng.random::<f32>() * 0.1;
    let dir = if moving_right { 1.0 } else { -1.0 };
    let speed_x = dir * (20.0 + rng.random::<f32>() * 40.0);
    let bob = if rng.random::<f32>() > 0.5 { 1.0 } else { -1.0 };
    let speed_y = bob * (30.0 + rng.random::<f32>() * 40.0);

    Entity {
        kind: EntityKind::Collectible,
        pos: Vec2::new(
            if moving_right { 0.0 } else { WORLD_WIDTH },
            WORLD_HEIGHT / 2.0 + COLLECTIBLE_SPAWN_DROP,
        ),
        vel: Vec2::new(speed_x, speed_y),
        timer: rng.random::<f32>() * timer_max,
        max_speed: timer_max,
        graphic: (rng.random::<f32>() * 3.0) as i32 * 2,
        flip: !moving_right,
        ..Default::default()
    }
}

/// Release the balloons that are due this frame; returns how many spawned
pub(crate) fn run_spawner(
    store: &mut EntityStore,
    settings: &mut SessionSettings,
    rng: &mut Pcg32,
    dt: f32,
) -> usize {
    if settings.to_spawn() <= 0 {
        return 0;
    }

    settings.set_spawn_delay(settings.spawn_delay() - dt);

    let mut spawned = 0;
    while spawned < store.capacity() && settings.spawn_delay() <= 0.0 && settings.to_spawn() > 0 {
        if let Err(err) = store.spawn(roll_collectible(rng)) {
            log::debug!("Collectible burst cut short: {}", err);
            break;
        }
        spawned += 1;
        settings.set_to_spawn(settings.to_spawn() - 1);
        settings.set_spawn_delay(settings.spawn_delay() + settings.spawn_delay_rate());
    }
    spawned
}

/// Spawn rate for the time left in the round
pub(crate) fn delay_rate_for(time_left: f32) -> f32 {
    ((time_left + 1.0) / SPAWN_RATE_DIVISOR).max(MIN_SPAWN_DELAY_RATE)
}
