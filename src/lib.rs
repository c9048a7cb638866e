//! Cratefall - a falling-objects dodge game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (OBB collision, physics, game state)
//! - `tuning`: Data-driven game balance
//! - `ui`: HUD snapshot and menu button plumbing
//!
//! Windowing, rendering, audio and model-file loading are external
//! collaborators: the sim consumes model bounding boxes, per-frame input
//! intent and camera vectors, and produces world transforms plus the alive
//! entity sets for the renderer to draw.

pub mod sim;
pub mod tuning;
pub mod ui;

pub use sim::{GameState, TickInput, tick};
pub use tuning::{SpawnMotion, Tuning};

use glam::{Vec2, Vec3};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;

    /// Half-extent of the playable floor square (world units)
    pub const FLOOR_HALF: f32 = 6.0;
    /// World Y of the floor's top face
    pub const FLOOR_TOP: f32 = -0.5;

    /// Player defaults
    pub const PLAYER_GROUND_Y: f32 = 0.5;
    /// Player half-width on the horizontal plane (0.6-scaled cube)
    pub const PLAYER_HALF: f32 = 0.3;
    pub const MOVE_SPEED: f32 = 5.0;
    pub const SPRINT_MULTIPLIER: f32 = 2.0;
    /// Stamina drain while sprinting / regen otherwise (normalized per second)
    pub const STAMINA_DRAIN: f32 = 0.4;
    pub const STAMINA_REGEN: f32 = 0.3;
    pub const JUMP_SPEED: f32 = 6.0;
    pub const JUMP_COOLDOWN: f32 = 0.3;
    /// Player gravity, doubled for a snappier jump arc
    pub const PLAYER_GRAVITY: f32 = -9.8 * 2.0;

    /// Base gravity for falling objects (scaled by difficulty each frame)
    pub const FALL_GRAVITY: f32 = -9.8 * 0.2;
    /// Difficulty ramp: per-second rate and clamp range
    pub const DIFFICULTY_RATE: f32 = 0.02;
    pub const DIFFICULTY_MIN: f32 = 1.0;
    pub const DIFFICULTY_MAX: f32 = 2.5;

    /// Falling-object spawn cadence and placement band
    pub const SPAWN_INTERVAL_MIN: f32 = 0.4;
    pub const SPAWN_INTERVAL_MAX: f32 = 0.9;
    pub const SPAWN_HEIGHT_MIN: f32 = 5.0;
    pub const SPAWN_HEIGHT_MAX: f32 = 8.0;
    pub const FALL_SPEED_MIN: f32 = 0.6;
    pub const FALL_SPEED_MAX: f32 = 1.6;
    /// Margin added around a prototype's footprint when placing it
    pub const SPAWN_SAFETY_MARGIN: f32 = 0.01;

    /// Collectible cadence, lifetime and pickup rules
    pub const COLLECT_FIRST_DELAY: f32 = 2.0;
    pub const COLLECT_INTERVAL_MIN: f32 = 3.0;
    pub const COLLECT_INTERVAL_MAX: f32 = 6.0;
    pub const COLLECT_LIFETIME_MIN: f32 = 6.0;
    pub const COLLECT_LIFETIME_MAX: f32 = 10.0;
    /// Collectible cube half-size (rests on the floor)
    pub const COLLECT_HALF: f32 = 0.2;
    pub const PICKUP_RADIUS: f32 = 0.6;
    pub const PICKUP_SCORE: u32 = 10;

    /// Session health and hit feedback
    pub const MAX_HEALTH: u8 = 3;
    pub const HIT_FLASH_TIME: f32 = 0.6;

    /// Horizontal delta below which the player counts as standing still
    pub const MOVE_EPSILON: f32 = 0.001;
    /// Tolerance for OBB-bottom vs. floor contact
    pub const GROUND_EPS: f32 = 1e-4;
}

/// Horizontal (XZ-plane) distance between two points
#[inline]
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}

/// Yaw around +Y for a facing direction, via `atan2(x, z)`.
///
/// A direction with no horizontal component (camera looking straight up or
/// down) falls back to facing -Z.
#[inline]
pub fn yaw_from_dir(dir: Vec3) -> f32 {
    let flat = Vec2::new(dir.x, dir.z);
    if flat.length() < 1e-4 {
        // atan2(0, -1): same yaw as facing (0, 0, -1)
        std::f32::consts::PI
    } else {
        flat.x.atan2(flat.y)
    }
}
