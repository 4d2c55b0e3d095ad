//! Per-frame simulation step
//!
//! Advances the session by one rendered frame. Columns are walked one at a
//! time in slot order, so results only depend on the inputs and the seed.

use glam::Vec2;

use super::collision::{Aabb, is_grounded, side_exit};
use super::input::InputState;
use super::session::GamePhase;
use super::spawner::{delay_rate_for, run_spawner};
use super::state::{Engine, SoundEvent};
use super::store::{EntityKind, EntityStore};
use crate::approach;
use crate::consts::*;

/// The frame's single sound cue; a later cue replaces an earlier one
#[derive(Debug, Default)]
struct EventSlot(Option<SoundEvent>);

impl EventSlot {
    fn emit(&mut self, event: SoundEvent) {
        self.0 = Some(event);
    }

    /// Only if nothing else fired this frame
    fn emit_if_quiet(&mut self, event: SoundEvent) {
        if self.0.is_none() {
            self.0 = Some(event);
        }
    }
}

/// Non-finite or negative deltas count as zero; long stalls are capped
fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 {
        dt.min(MAX_FRAME_DT)
    } else {
        0.0
    }
}

impl Engine {
    /// Advance one frame. Returns the sound cue for this frame, if any.
    ///
    /// While paused (or debug-paused) nothing is read or written. The engine
    /// never downgrades input edges: the caller settles them after each call.
    pub fn step(&mut self, elapsed_seconds: f32, input: InputState) -> Option<SoundEvent> {
        if self.settings.halted() {
            return None;
        }

        let dt = sanitize_dt(elapsed_seconds);
        self.settings.set_input(input);

        let phase = self.settings.phase();
        if phase == GamePhase::Ended {
            return None;
        }

        self.frame_count += 1;
        let mut sfx = EventSlot::default();

        if phase == GamePhase::Playing {
            run_spawner(&mut self.store, &mut self.settings, &mut self.rng, dt);
        }

        let player = self.store.player();
        if let Some(p) = player {
            steer_player(
                &mut self.store,
                p,
                &input,
                phase == GamePhase::Playing,
                dt,
                &mut sfx,
            );
        }

        bob_collectibles(&mut self.store);
        integrate(&mut self.store, dt);

        if let Some(p) = player {
            land_player(&mut self.store, p, &mut sfx);
            clamp_player_sides(&mut self.store, p);
        }
        cull_collectibles(&mut self.store);

        if let Some(p) = player {
            let collected = collect(&mut self.store, p);
            if collected > 0 {
                self.settings.add_score(collected);
                sfx.emit(SoundEvent::Collect);
            }
            animate_player(&mut self.store, p, &input, dt, &mut sfx);
        }

        sanitize(&mut self.store);
        self.advance_session(phase, &input, dt, &mut sfx);

        sfx.0
    }

    fn advance_session(&mut self, phase: GamePhase, input: &InputState, dt: f32, sfx: &mut EventSlot) {
        match phase {
            GamePhase::Playing => {
                let time_left = self.settings.game_timer() - dt;
                self.settings.set_game_timer(time_left);
                self.settings.set_spawn_delay_rate(delay_rate_for(time_left));

                if time_left < 0.0 {
                    self.end_round();
                    sfx.emit(SoundEvent::GameEnd);
                }
            }
            GamePhase::NotStarted if input.action.just_pressed() => {
                self.start_round();
                sfx.emit(SoundEvent::GameStart);
            }
            _ => {}
        }
    }

    fn start_round(&mut self) {
        let round = self.config.round_seconds;
        self.settings.set_phase(GamePhase::Playing);
        self.settings.set_score(0);
        self.settings.set_game_timer(round);
        self.settings.set_to_spawn(self.config.collectible_budget);
        self.settings.set_spawn_delay(0.0);
        self.settings.set_spawn_delay_rate(delay_rate_for(round));

        // Clear leftovers from the attract screen
        let player = self.store.player();
        for e in 0..self.store.capacity() {
            if Some(e) != player {
                self.store.clear_slot(e);
            }
        }

        log::info!("Round started ({}s)", round);
    }

    fn end_round(&mut self) {
        self.settings.set_game_timer(0.0);
        self.settings.set_to_spawn(0);
        self.settings.set_phase(GamePhase::Ended);
        log::info!("Round over, score {}", self.settings.score());
    }
}

/// Horizontal control, jump and gravity for the player
fn steer_player(
    store: &mut EntityStore,
    p: usize,
    input: &InputState,
    can_jump: bool,
    dt: f32,
    sfx: &mut EventSlot,
) {
    let max_speed = store.max_speed[p].abs();

    if input.left.is_down() {
        store.speed_x[p] = approach(store.speed_x[p], -max_speed, PLAYER_ACCEL * dt);
        store.flip[p] = 1;
    } else if input.right.is_down() {
        store.speed_x[p] = approach(store.speed_x[p], max_speed, PLAYER_ACCEL * dt);
        store.flip[p] = 0;
    } else {
        store.speed_x[p] = approach(store.speed_x[p], 0.0, PLAYER_FRICTION * dt);
    }

    if can_jump && input.action.just_pressed() && is_grounded(store.y[p], store.speed_y[p]) {
        store.speed_y[p] = PLAYER_JUMP_SPEED;
        sfx.emit(SoundEvent::Jump);
    }

    if store.y[p] < FLOOR_Y {
        store.speed_y[p] += GRAVITY * dt;
    }
}

/// Reverse each balloon's vertical drift when its timer runs out
fn bob_collectibles(store: &mut EntityStore) {
    let raw = EntityKind::Collectible.as_raw();
    for e in 0..store.capacity() {
        if store.active[e] == 0 || store.kind[e] != raw {
            continue;
        }
        if store.timer[e] <= 0.0 {
            store.timer[e] += store.max_speed[e].max(0.0);
            store.speed_y[e] = -store.speed_y[e];
        }
    }
}

fn integrate(store: &mut EntityStore, dt: f32) {
    for e in 0..store.capacity() {
        if store.active[e] == 0 {
            continue;
        }
        store.rot[e] += store.rot_speed[e] * dt;
        store.x[e] += store.speed_x[e] * dt;
        store.y[e] += store.speed_y[e] * dt;
        if store.timer[e] > 0.0 {
            store.timer[e] -= dt;
        }
    }
}

/// Floor contact: rest on the floor, cue a landing when arriving from above
fn land_player(store: &mut EntityStore, p: usize, sfx: &mut EventSlot) {
    if is_grounded(store.y[p], store.speed_y[p]) {
        if store.speed_y[p] > 0.0 {
            sfx.emit(SoundEvent::Land);
        }
        store.y[p] = FLOOR_Y;
        store.speed_y[p] = 0.0;
    }
}

/// Keep the player between the side walls
fn clamp_player_sides(store: &mut EntityStore, p: usize) {
    if store.x[p] < 0.0 {
        store.x[p] = 0.0;
        store.speed_x[p] = store.speed_x[p].max(0.0);
    } else if store.x[p] > WORLD_WIDTH {
        store.x[p] = WORLD_WIDTH;
        store.speed_x[p] = store.speed_x[p].min(0.0);
    }
}

/// Remove every balloon touching the player; returns how many
fn collect(store: &mut EntityStore, p: usize) -> i32 {
    let player_box = Aabb::for_kind(EntityKind::Player, Vec2::new(store.x[p], store.y[p]));
    let raw = EntityKind::Collectible.as_raw();
    let mut collected = 0;

    for e in 0..store.capacity() {
        if store.active[e] == 0 || store.kind[e] != raw {
            continue;
        }
        let balloon = Aabb::for_kind(EntityKind::Collectible, Vec2::new(store.x[e], store.y[e]));
        if player_box.overlaps(&balloon) {
            store.clear_slot(e);
            collected += 1;
        }
    }
    collected
}

/// Balloons that drift out through a side wall are gone
fn cull_collectibles(store: &mut EntityStore) {
    let raw = EntityKind::Collectible.as_raw();
    for e in 0..store.capacity() {
        if store.active[e] != 0 && store.kind[e] == raw && side_exit(store.x[e], store.speed_x[e]).is_some() {
            store.clear_slot(e);
        }
    }
}

/// Two-frame walk cycle; a step cue plays when the cycle changes half
fn animate_player(store: &mut EntityStore, p: usize, input: &InputState, dt: f32, sfx: &mut EventSlot) {
    if is_grounded(store.y[p], store.speed_y[p]) {
        let half_before = (store.frame[p] / FRAME_HALF) as i32;

        if store.speed_x[p] != 0.0 {
            store.frame[p] += WALK_FRAME_RATE * dt;
        } else {
            store.frame[p] = 0.0;
        }

        if input.left.just_pressed() || input.right.just_pressed() {
            store.frame[p] = if store.frame[p] >= FRAME_HALF { 0.0 } else { FRAME_HALF };
        }

        if half_before != (store.frame[p] / FRAME_HALF) as i32 {
            sfx.emit_if_quiet(if half_before != 0 {
                SoundEvent::Move1
            } else {
                SoundEvent::Move2
            });
        }
    } else {
        store.frame[p] = AIRBORNE_FRAME;
    }

    if store.frame[p] > FRAME_PERIOD {
        store.frame[p] -= FRAME_PERIOD;
    }
}

/// No active slot may keep a non-finite position or velocity
fn sanitize(store: &mut EntityStore) {
    for e in 0..store.capacity() {
        if store.active[e] == 0 || store.is_finite(e) {
            continue;
        }
        if store.kind[e] == EntityKind::Player.as_raw() {
            log::warn!("Player {} left the number line, respawning", e);
            store.x[e] = WORLD_WIDTH / 2.0;
            store.y[e] = FLOOR_Y;
            store.speed_x[e] = 0.0;
            store.speed_y[e] = 0.0;
        } else {
            log::warn!("Entity {} left the number line, despawning", e);
            store.clear_slot(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::input::ButtonState;
    use crate::sim::store::Entity;
    use proptest::prelude::*;

    const DT: f32 = 0.016;

    fn press_action() -> InputState {
        InputState {
            action: ButtonState::JustPressed,
            ..Default::default()
        }
    }

    /// Initialized engine with the round already running
    fn playing_engine() -> Engine {
        let mut engine = Engine::default();
        engine.init();
        assert_eq!(engine.step(DT, press_action()), Some(SoundEvent::GameStart));
        assert_eq!(engine.phase(), GamePhase::Playing);
        engine
    }

    #[test]
    fn test_end_to_end_collect() {
        let mut engine = Engine::default();
        let player = engine.spawn(Entity::player(Vec2::new(10.0, 10.0))).unwrap();
        let balloon = engine.spawn(Entity::collectible(Vec2::new(10.0, 10.0))).unwrap();

        let event = engine.step(0.016, InputState::released());

        assert_eq!(event, Some(SoundEvent::Collect));
        assert_eq!(engine.score(), 1);
        assert!(!engine.store().is_active(balloon).unwrap());
        assert!(engine.store().is_active(player).unwrap());
    }

    #[test]
    fn test_collect_fires_once() {
        let mut engine = Engine::default();
        engine.spawn(Entity::player(Vec2::new(30.0, FLOOR_Y)));
        engine.spawn(Entity::collectible(Vec2::new(32.0, FLOOR_Y - 2.0)));

        assert_eq!(engine.step(DT, InputState::released()), Some(SoundEvent::Collect));
        assert_eq!(engine.score(), 1);

        for _ in 0..5 {
            assert_ne!(engine.step(DT, InputState::released()), Some(SoundEvent::Collect));
        }
        assert_eq!(engine.score(), 1);
    }

    #[test]
    fn test_distant_collectible_is_ignored() {
        let mut engine = Engine::default();
        engine.spawn(Entity::player(Vec2::new(10.0, FLOOR_Y)));
        let balloon = engine.spawn(Entity::collectible(Vec2::new(60.0, 20.0))).unwrap();

        assert_eq!(engine.step(DT, InputState::released()), None);
        assert_eq!(engine.score(), 0);
        assert!(engine.store().is_active(balloon).unwrap());
    }

    #[test]
    fn test_pool_exhaustion_drops_spawn() {
        let mut engine = Engine::default();
        for i in 0..ENTITY_MAX {
            let slot = engine.spawn(Entity::collectible(Vec2::new(i as f32, 0.0)));
            assert_eq!(slot, Some(i));
        }
        let before = engine.store().clone();

        assert_eq!(engine.spawn(Entity::player(Vec2::new(1.0, 1.0))), None);
        assert_eq!(engine.store().active_count(), ENTITY_MAX);
        assert_eq!(engine.store().player(), None);
        assert_eq!(engine.store().x, before.x);
    }

    #[test]
    fn test_floor_contact_grounds_player() {
        let mut engine = playing_engine();
        engine.settings.set_to_spawn(0);
        let p = engine.store().player().unwrap();
        engine.store.set_velocity(p, Vec2::new(0.0, 50.0)).unwrap();

        let event = engine.step(DT, InputState::released());
        assert_eq!(event, Some(SoundEvent::Land));
        assert_eq!(engine.store().velocity(p).unwrap().y, 0.0);
        assert_eq!(engine.store().position(p).unwrap().y, FLOOR_Y);

        // Grounded, so the next press jumps
        assert_eq!(engine.step(DT, press_action()), Some(SoundEvent::Jump));
        assert!(engine.store().velocity(p).unwrap().y < 0.0);
    }

    #[test]
    fn test_no_jump_while_airborne() {
        let mut engine = playing_engine();
        let p = engine.store().player().unwrap();
        engine.store.set_position(p, Vec2::new(40.0, 30.0)).unwrap();

        assert_ne!(engine.step(DT, press_action()), Some(SoundEvent::Jump));
        assert!(engine.store().velocity(p).unwrap().y > 0.0, "gravity pulls down");
    }

    #[test]
    fn test_jump_arc_lands_again() {
        let mut engine = playing_engine();
        // No balloons, so nothing can drown out the landing cue
        engine.settings.set_to_spawn(0);
        let p = engine.store().player().unwrap();

        let mut input = press_action();
        assert_eq!(engine.step(DT, input), Some(SoundEvent::Jump));
        input.settle();

        let mut landed = false;
        for _ in 0..120 {
            if engine.step(DT, input) == Some(SoundEvent::Land) {
                landed = true;
                break;
            }
            input.settle();
        }
        assert!(landed);
        assert_eq!(engine.store().position(p).unwrap().y, FLOOR_Y);
    }

    #[test]
    fn test_undowngraded_press_double_counts() {
        // The caller never settles: the start press leaks into a jump
        let mut sloppy = Engine::default();
        sloppy.init();
        let held = press_action();
        assert_eq!(sloppy.step(DT, held), Some(SoundEvent::GameStart));
        assert_eq!(sloppy.step(DT, held), Some(SoundEvent::Jump));

        // Settled after the first frame: one press, one consequence
        let mut careful = Engine::default();
        careful.init();
        let mut input = press_action();
        assert_eq!(careful.step(DT, input), Some(SoundEvent::GameStart));
        input.settle();
        assert_eq!(input.action, ButtonState::Pressed);
        assert_eq!(careful.step(DT, input), None);
    }

    #[test]
    fn test_engine_copies_input_without_downgrading() {
        let mut engine = Engine::default();
        engine.init();
        let input = InputState {
            action: ButtonState::JustPressed,
            left: ButtonState::JustReleased,
            right: ButtonState::Pressed,
        };
        engine.step(DT, input);
        assert_eq!(engine.settings().input(), input);
    }

    #[test]
    fn test_horizontal_acceleration_and_friction() {
        let mut engine = Engine::default();
        engine.init();
        let p = engine.store().player().unwrap();
        let right = InputState {
            right: ButtonState::Pressed,
            ..Default::default()
        };

        engine.step(DT, right);
        let vx = engine.store().velocity(p).unwrap().x;
        assert!(vx > 0.0 && vx < PLAYER_MOVE_SPEED);

        for _ in 0..30 {
            engine.step(DT, right);
        }
        assert_eq!(engine.store().velocity(p).unwrap().x, PLAYER_MOVE_SPEED);
        assert!(!engine.store().get(p).unwrap().unwrap().flip);

        for _ in 0..30 {
            engine.step(DT, InputState::released());
        }
        assert_eq!(engine.store().velocity(p).unwrap().x, 0.0);

        let left = InputState {
            left: ButtonState::Pressed,
            ..Default::default()
        };
        engine.step(DT, left);
        assert!(engine.store().velocity(p).unwrap().x < 0.0);
        assert!(engine.store().get(p).unwrap().unwrap().flip);
    }

    #[test]
    fn test_player_clamped_at_side_walls() {
        let mut engine = Engine::default();
        engine.init();
        let p = engine.store().player().unwrap();
        engine.store.set_position(p, Vec2::new(0.5, FLOOR_Y)).unwrap();
        let left = InputState {
            left: ButtonState::Pressed,
            ..Default::default()
        };
        for _ in 0..60 {
            engine.step(DT, left);
        }
        let pos = engine.store().position(p).unwrap();
        assert_eq!(pos.x, 0.0);
        assert_eq!(engine.store().velocity(p).unwrap().x, 0.0);
    }

    #[test]
    fn test_walk_cycle_cues_steps() {
        let mut engine = Engine::default();
        engine.init();
        let p = engine.store().player().unwrap();

        // A fresh direction press flips to the second half of the cycle
        let mut input = InputState {
            right: ButtonState::JustPressed,
            ..Default::default()
        };
        assert_eq!(engine.step(DT, input), Some(SoundEvent::Move2));
        assert!(engine.store().get(p).unwrap().unwrap().frame >= FRAME_HALF);
        input.settle();

        let mut cues = Vec::new();
        for _ in 0..60 {
            if let Some(cue) = engine.step(DT, input) {
                cues.push(cue);
            }
            let frame = engine.store().get(p).unwrap().unwrap().frame;
            assert!((0.0..=FRAME_PERIOD).contains(&frame));
        }
        assert!(cues.contains(&SoundEvent::Move1));
        assert!(cues.contains(&SoundEvent::Move2));
    }

    #[test]
    fn test_airborne_frame() {
        let mut engine = playing_engine();
        let p = engine.store().player().unwrap();
        engine.step(DT, press_action());
        assert_eq!(engine.store().get(p).unwrap().unwrap().frame, AIRBORNE_FRAME);
    }

    #[test]
    fn test_collectible_bobs() {
        let mut engine = Engine::default();
        engine.spawn(Entity::player(Vec2::new(10.0, FLOOR_Y)));
        let mut balloon = Entity::collectible(Vec2::new(60.0, 40.0));
        balloon.vel = Vec2::new(0.0, 30.0);
        balloon.max_speed = 0.2;
        balloon.timer = 0.1;
        let b = engine.spawn(balloon).unwrap();

        let mut saw_up = false;
        let mut saw_down = false;
        for _ in 0..40 {
            engine.step(DT, InputState::released());
            let vy = engine.store().velocity(b).unwrap().y;
            saw_up |= vy < 0.0;
            saw_down |= vy > 0.0;
        }
        assert!(saw_up && saw_down);
        let y = engine.store().position(b).unwrap().y;
        assert!((y - 40.0).abs() < 10.0, "bob stays near its lane, got {y}");
    }

    #[test]
    fn test_collectible_leaving_side_is_despawned() {
        let mut engine = Engine::default();
        let mut balloon = Entity::collectible(Vec2::new(WORLD_WIDTH - 0.1, 30.0));
        balloon.vel = Vec2::new(40.0, 0.0);
        let b = engine.spawn(balloon).unwrap();

        engine.step(DT, InputState::released());
        assert!(!engine.store().is_active(b).unwrap());
    }

    #[test]
    fn test_start_clears_attract_screen() {
        let mut engine = Engine::default();
        engine.init();
        let stray = engine.spawn(Entity::collectible(Vec2::new(70.0, 10.0))).unwrap();

        assert_eq!(engine.step(DT, press_action()), Some(SoundEvent::GameStart));
        assert!(!engine.store().is_active(stray).unwrap());
        assert_eq!(engine.store().player(), Some(0));
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.settings().game_timer(), ROUND_SECONDS);
        assert_eq!(engine.settings().to_spawn(), COLLECTIBLE_BUDGET);
    }

    #[test]
    fn test_round_spawns_collectibles() {
        let mut engine = playing_engine();
        let mut input = InputState::released();
        for _ in 0..120 {
            engine.step(DT, input);
            input.settle();
        }
        assert!(engine.settings().to_spawn() < COLLECTIBLE_BUDGET - 1);
    }

    #[test]
    fn test_round_timer_ends_session() {
        let mut engine = Engine::new(crate::EngineConfig {
            round_seconds: 1.0,
            ..Default::default()
        });
        engine.init();
        engine.step(DT, press_action());

        let mut ended_at = None;
        for frame in 0..200 {
            if engine.step(0.1, InputState::released()) == Some(SoundEvent::GameEnd) {
                ended_at = Some(frame);
                break;
            }
        }
        assert!(ended_at.is_some());
        assert_eq!(engine.phase(), GamePhase::Ended);
        assert_eq!(engine.settings().game_timer(), 0.0);
        assert_eq!(engine.settings().to_spawn(), 0);

        // Terminal: nothing moves and a press does not restart
        let before = engine.store().clone();
        assert_eq!(engine.step(DT, press_action()), None);
        assert_eq!(engine.phase(), GamePhase::Ended);
        assert_eq!(engine.store().x, before.x);
        assert_eq!(engine.store().y, before.y);

        // Re-initialization starts a fresh session
        engine.init();
        assert_eq!(engine.phase(), GamePhase::NotStarted);
        assert_eq!(engine.step(DT, press_action()), Some(SoundEvent::GameStart));
    }

    #[test]
    fn test_nan_round_length_still_ends() {
        let mut engine = Engine::new(crate::EngineConfig {
            round_seconds: f32::NAN,
            ..Default::default()
        });
        engine.init();
        engine.step(DT, press_action());
        assert_eq!(engine.settings().game_timer(), ROUND_SECONDS);

        let mut ended = false;
        for _ in 0..2000 {
            if engine.step(MAX_FRAME_DT, InputState::released()) == Some(SoundEvent::GameEnd) {
                ended = true;
                break;
            }
        }
        assert!(ended);
        assert_eq!(engine.phase(), GamePhase::Ended);
        assert_eq!(engine.settings().game_timer(), 0.0);
    }

    #[test]
    fn test_collect_outranks_landing() {
        let mut engine = Engine::default();
        let mut player = Entity::player(Vec2::new(30.0, FLOOR_Y));
        player.vel = Vec2::new(0.0, 50.0);
        let p = engine.spawn(player).unwrap();
        let b = engine.spawn(Entity::collectible(Vec2::new(30.0, FLOOR_Y))).unwrap();

        assert_eq!(engine.step(DT, InputState::released()), Some(SoundEvent::Collect));
        assert_eq!(engine.score(), 1);
        assert!(!engine.store().is_active(b).unwrap());
        assert_eq!(engine.store().velocity(p).unwrap().y, 0.0, "still landed");
    }

    #[test]
    fn test_round_end_outranks_collect() {
        let mut engine = playing_engine();
        engine.settings.set_to_spawn(0);
        engine.settings.set_game_timer(0.01);
        let p = engine.store().player().unwrap();
        let pos = engine.store().position(p).unwrap();
        engine.spawn(Entity::collectible(pos));

        assert_eq!(engine.step(DT, InputState::released()), Some(SoundEvent::GameEnd));
        assert_eq!(engine.score(), 1, "the last balloon still counts");
        assert_eq!(engine.phase(), GamePhase::Ended);
    }

    #[test]
    fn test_direction_edge_on_jump_frame_keeps_jump() {
        let mut engine = playing_engine();
        engine.settings.set_to_spawn(0);
        let input = InputState {
            action: ButtonState::JustPressed,
            right: ButtonState::JustPressed,
            ..Default::default()
        };
        assert_eq!(engine.step(DT, input), Some(SoundEvent::Jump));
    }

    #[test]
    fn test_step_cue_yields_to_landing() {
        let mut engine = Engine::default();
        let mut player = Entity::player(Vec2::new(30.0, FLOOR_Y));
        player.vel = Vec2::new(0.0, 50.0);
        engine.spawn(player);
        let input = InputState {
            right: ButtonState::JustPressed,
            ..Default::default()
        };

        // The frame half flips this frame, but the landing cue wins
        assert_eq!(engine.step(DT, input), Some(SoundEvent::Land));
        assert!(engine.store().get(0).unwrap().unwrap().frame >= FRAME_HALF);
    }

    #[test]
    fn test_spinning_entity_rotates() {
        let mut engine = Engine::default();
        let mut balloon = Entity::collectible(Vec2::new(60.0, 30.0));
        balloon.rot = 10.0;
        balloon.rot_speed = 90.0;
        let b = engine.spawn(balloon).unwrap();
        engine.store.rot_speed[7] = 500.0;

        engine.step(0.1, InputState::released());
        engine.step(0.1, InputState::released());

        let rot = engine.store().get(b).unwrap().unwrap().rot;
        assert!((rot - 28.0).abs() < 1e-4, "got {rot}");
        assert_eq!(engine.store().rot[7], 0.0, "inactive slot does not spin");
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut engine = playing_engine();
        engine.set_paused(true);
        let store = engine.store().clone();
        let ints = engine.settings().ints().to_vec();

        for dt in [0.016, 1.0, 100.0] {
            assert_eq!(engine.step(dt, press_action()), None);
        }
        assert_eq!(engine.store().x, store.x);
        assert_eq!(engine.store().y, store.y);
        assert_eq!(engine.settings().ints(), &ints[..]);

        engine.set_paused(false);
        engine.step(DT, InputState::released());
        assert_ne!(engine.settings().game_timer(), ROUND_SECONDS);
    }

    #[test]
    fn test_debug_pause_halts_only_with_debug_on() {
        let mut engine = playing_engine();
        engine.toggle_debug_pause();
        let timer = engine.settings().game_timer();
        engine.step(DT, InputState::released());
        assert!(engine.settings().game_timer() < timer, "debug pause ignored while debug is off");

        engine.toggle_debug();
        let timer = engine.settings().game_timer();
        engine.step(DT, InputState::released());
        assert_eq!(engine.settings().game_timer(), timer);
    }

    #[test]
    fn test_inactive_slot_garbage_is_inert() {
        let mut engine = Engine::default();
        engine.spawn(Entity::player(Vec2::new(10.0, FLOOR_Y)));
        // Inactive slot whose stale fields would overlap the player
        engine.store.kind[5] = EntityKind::Collectible.as_raw();
        engine.store.x[5] = 10.0;
        engine.store.y[5] = FLOOR_Y;
        engine.store.speed_x[5] = f32::NAN;

        assert_eq!(engine.step(DT, InputState::released()), None);
        assert_eq!(engine.score(), 0);
        assert!(!engine.store().is_active(5).unwrap());
        assert_eq!(engine.store().x[5], 10.0);
    }

    #[test]
    fn test_non_finite_state_is_repaired() {
        let mut engine = Engine::default();
        engine.init();
        let mut balloon = Entity::collectible(Vec2::new(50.0, 20.0));
        balloon.vel = Vec2::new(0.0, f32::INFINITY);
        let b = engine.spawn(balloon).unwrap();
        engine.store.speed_x[0] = f32::NAN;

        engine.step(DT, InputState::released());
        assert!(!engine.store().is_active(b).unwrap());
        assert!(engine.store().position(0).unwrap().is_finite());
        assert!(engine.store().velocity(0).unwrap().is_finite());
    }

    #[test]
    fn test_bad_elapsed_time_is_absorbed() {
        let mut engine = playing_engine();
        let p = engine.store().player().unwrap();
        let timer = engine.settings().game_timer();

        engine.step(f32::NAN, InputState::released());
        engine.step(-1.0, InputState::released());
        assert_eq!(engine.settings().game_timer(), timer);
        assert!(engine.store().position(p).unwrap().is_finite());

        engine.step(1_000.0, InputState::released());
        assert!((engine.settings().game_timer() - (timer - MAX_FRAME_DT)).abs() < 1e-4);
    }

    #[test]
    fn test_determinism() {
        let mut a = Engine::default();
        let mut b = Engine::default();
        a.init();
        b.init();

        let mut input = press_action();
        for frame in 0..300 {
            input.right = if frame % 90 < 45 {
                ButtonState::Pressed
            } else {
                ButtonState::Released
            };
            assert_eq!(a.step(DT, input), b.step(DT, input));
            input.settle();
        }
        assert_eq!(a.store().x, b.store().x);
        assert_eq!(a.store().active, b.store().active);
        assert_eq!(a.score(), b.score());
    }

    fn button() -> impl Strategy<Value = ButtonState> {
        (0i32..4).prop_map(ButtonState::from_raw)
    }

    fn input() -> impl Strategy<Value = InputState> {
        (button(), button(), button()).prop_map(|(action, left, right)| InputState {
            action,
            left,
            right,
        })
    }

    proptest! {
        #[test]
        fn prop_pause_is_idempotent(dts in prop::collection::vec(-1.0f32..10.0, 1..20), inputs in prop::collection::vec(input(), 1..20)) {
            let mut engine = playing_engine();
            for _ in 0..30 {
                engine.step(DT, InputState::released());
            }
            engine.set_paused(true);
            let store = engine.store().clone();
            let score = engine.score();

            for (dt, input) in dts.iter().zip(inputs.iter()) {
                prop_assert_eq!(engine.step(*dt, *input), None);
            }
            prop_assert_eq!(&engine.store().x, &store.x);
            prop_assert_eq!(&engine.store().y, &store.y);
            prop_assert_eq!(&engine.store().active, &store.active);
            prop_assert_eq!(engine.score(), score);
        }

        #[test]
        fn prop_active_positions_stay_finite(frames in prop::collection::vec((0.0f32..0.5, input()), 1..200)) {
            let mut engine = Engine::default();
            engine.init();
            for (dt, input) in frames {
                engine.step(dt, input);
                for e in engine.store().iter_active() {
                    prop_assert!(engine.store().position(e).unwrap().is_finite());
                }
                let p = engine.store().player();
                prop_assert_eq!(p, Some(0));
            }
        }
    }
}
