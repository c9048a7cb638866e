//! Per-frame simulation step.
//!
//! Called once per frame with the elapsed wall-clock delta and the sampled
//! input intent. Everything mutable in the session changes here and nowhere
//! else; the render pass that follows only reads.

use glam::{Vec2, Vec3};
use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::{obbs_intersect, spheres_overlap};
use super::obb::Obb;
use super::spawn::{FloorBounds, spawn_falling};
use super::state::{Collectible, GameState};
use crate::consts::*;
use crate::horizontal_distance;
use crate::tuning::{SpawnMotion, Tuning};

/// Input intent for one frame, sampled from the platform key array and the
/// camera before the step runs.
#[derive(Debug, Clone, Copy)]
pub struct TickInput {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub sprint: bool,
    /// Camera forward unit vector; movement and facing are camera-relative
    pub camera_forward: Vec3,
    pub camera_up: Vec3,
}

impl Default for TickInput {
    fn default() -> Self {
        Self {
            forward: false,
            back: false,
            left: false,
            right: false,
            jump: false,
            sprint: false,
            camera_forward: Vec3::NEG_Z,
            camera_up: Vec3::Y,
        }
    }
}

/// Advance the session by one frame.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Terminal state: the frame is a no-op until reset
    if state.player_dead {
        return;
    }

    // Hit flash decays toward zero (cosmetic)
    if state.hit_effect_timer > 0.0 {
        state.hit_effect_timer = (state.hit_effect_timer - dt).max(0.0);
    }

    let tuning = state.tuning;

    // Difficulty ramps linearly with time and scales falling-object gravity
    state.difficulty = (state.difficulty + dt * tuning.difficulty_rate)
        .clamp(tuning.difficulty_min, tuning.difficulty_max);

    update_player(state, input, dt, &tuning);

    // Falling-object spawns on a randomized interval
    state.spawn_timer -= dt;
    if state.spawn_timer <= 0.0 {
        state.spawn_timer = state
            .rng
            .random_range(tuning.spawn_interval_min..=tuning.spawn_interval_max);
        let floor = FloorBounds::from_floor(&state.models.floor.bounds, &state.floor_transform);
        let object = spawn_falling(&mut state.rng, &state.models.falling, floor, &tuning);
        state.falling.push(object);
    }

    update_collectibles(state, dt, &tuning);

    // Player transform and OBB are built once and reused for every
    // falling-object check this frame
    state
        .player
        .update_transform(&state.models.player, state.floor_top, input.camera_forward);
    let player_obb = Obb::from_local_bounds(&state.models.player.bounds, &state.player.transform);

    update_falling(state, &player_obb, dt, &tuning);
    state.falling.retain(|object| object.alive);

    // Moving flag from the horizontal position delta, for the leg-swing
    // animation
    let delta = Vec2::new(
        state.player.pos.x - state.player.prev_pos.x,
        state.player.pos.z - state.player.prev_pos.z,
    );
    state.player.moving = delta.length() > MOVE_EPSILON;
    state.player.prev_pos = state.player.pos;
}

/// Camera-relative horizontal movement with sprint/stamina, floor clamp,
/// and vertical physics (gravity, landing, jump acceptance).
fn update_player(state: &mut GameState, input: &TickInput, dt: f32, tuning: &Tuning) {
    let player = &mut state.player;

    let forward = Vec3::new(input.camera_forward.x, 0.0, input.camera_forward.z)
        .try_normalize()
        .unwrap_or(Vec3::NEG_Z);
    let right = forward
        .cross(input.camera_up)
        .try_normalize()
        .unwrap_or(Vec3::X);

    // Sprint is gated by stamina
    player.sprinting = input.sprint && player.stamina > 0.0;
    let sprint_multiplier = if player.sprinting {
        tuning.sprint_multiplier
    } else {
        1.0
    };

    let mut wish = Vec3::ZERO;
    if input.forward {
        wish += forward;
    }
    if input.back {
        wish -= forward;
    }
    if input.left {
        wish -= right;
    }
    if input.right {
        wish += right;
    }
    if wish.length() > 0.01 {
        player.pos += wish.normalize() * tuning.move_speed * sprint_multiplier * dt;
    }

    if player.sprinting {
        player.stamina = (player.stamina - tuning.stamina_drain * dt).max(0.0);
    } else {
        player.stamina = (player.stamina + tuning.stamina_regen * dt).min(1.0);
    }

    // The capsule never leaves the floor, inset by its own half-width
    let limit = FLOOR_HALF - PLAYER_HALF;
    player.pos.x = player.pos.x.clamp(-limit, limit);
    player.pos.z = player.pos.z.clamp(-limit, limit);

    player.jump_cooldown = (player.jump_cooldown - dt).max(0.0);
    if !player.grounded {
        player.vertical_vel += tuning.player_gravity * dt;
        player.pos.y += player.vertical_vel * dt;
    }
    if player.pos.y <= player.ground_y {
        player.pos.y = player.ground_y;
        player.vertical_vel = 0.0;
        player.grounded = true;
    }
    // Single jump, only from the ground and off cooldown
    if input.jump && player.grounded && player.jump_cooldown <= 0.0 {
        player.vertical_vel = tuning.jump_speed;
        player.grounded = false;
        player.jump_cooldown = tuning.jump_cooldown;
    }
}

/// Collectible spawning, lifetime countdown, pickup, and compaction.
fn update_collectibles(state: &mut GameState, dt: f32, tuning: &Tuning) {
    state.collect_spawn_timer -= dt;
    if state.collect_spawn_timer <= 0.0 {
        state.collect_spawn_timer = state
            .rng
            .random_range(tuning.collect_interval_min..=tuning.collect_interval_max);
        let collectible = make_collectible(&mut state.rng, state.floor_top, tuning);
        state.collectibles.push(collectible);
    }

    let player_pos = state.player.pos;
    for collectible in &mut state.collectibles {
        if !collectible.alive {
            continue;
        }
        collectible.lifetime -= dt;
        if collectible.lifetime <= 0.0 {
            collectible.alive = false;
            continue;
        }
        // Pickup checks the horizontal plane only: the cube rests on the
        // floor while the player's center sits higher, so a 3D distance
        // would never come within radius
        if horizontal_distance(collectible.pos, player_pos) <= tuning.pickup_radius {
            collectible.alive = false;
            state.score += tuning.pickup_score;
        }
    }
    state.collectibles.retain(|c| c.alive);
}

fn make_collectible(rng: &mut Pcg32, floor_top: f32, tuning: &Tuning) -> Collectible {
    // Keep clear of the floor edge
    let range = FLOOR_HALF - 0.5;
    Collectible {
        pos: Vec3::new(
            rng.random_range(-range..range),
            floor_top + COLLECT_HALF,
            rng.random_range(-range..range),
        ),
        lifetime: rng.random_range(tuning.collect_lifetime_min..=tuning.collect_lifetime_max),
        alive: true,
    }
}

/// Integrate falling objects, run broad-then-narrow-phase collision against
/// the player, and resolve ground contact. Dead entries are compacted by
/// the caller.
fn update_falling(state: &mut GameState, player_obb: &Obb, dt: f32, tuning: &Tuning) {
    let difficulty = state.difficulty;
    let floor_top = state.floor_top;

    for object in &mut state.falling {
        if !object.alive {
            continue;
        }

        object.vel.y += tuning.fall_gravity * dt * difficulty;
        object.pos.y += object.vel.y * dt;
        match tuning.spawn_motion {
            SpawnMotion::VerticalOnly => {
                // Canonical variant: descent stays strictly vertical
                object.vel.x = 0.0;
                object.vel.z = 0.0;
            }
            SpawnMotion::Drift { .. } => {
                object.pos.x += object.vel.x * dt;
                object.pos.z += object.vel.z * dt;
            }
        }

        let proto = &state.models.falling[object.model_index];
        object.update_transform(proto.scale);
        let obb = Obb::from_local_bounds(&proto.bounds, &object.transform);
        object.half_extents = Vec3::new(obb.half[0], obb.half[1], obb.half[2]);

        // Cheap sphere rejection before the exact SAT test
        if spheres_overlap(player_obb, &obb) && obbs_intersect(player_obb, &obb) {
            state.health = state.health.saturating_sub(1);
            log::info!("Player hit by falling object, health = {}", state.health);
            state.hit_effect_timer = HIT_FLASH_TIME;
            // Only the hit that empties the bar flips the terminal flag;
            // further instances in the same frame just get consumed
            if state.health == 0 && !state.player_dead {
                log::info!("Player died with score {}", state.score);
                state.player_dead = true;
            }
            // An instance harms the player at most once, the frame it first
            // overlaps
            object.alive = false;
            continue;
        }

        // Ground contact from the OBB bottom face; landed objects rest
        // exactly on the floor and are removed at compaction
        if obb.bottom_y() <= floor_top + GROUND_EPS {
            object.pos.y = floor_top + obb.half[1];
            object.update_transform(proto.scale);
            object.vel = Vec3::ZERO;
            object.alive = false;
        }
    }
}
