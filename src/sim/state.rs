//! Game session state and entity types.
//!
//! Everything the renderer and HUD read lives here; all mutation happens
//! inside `tick`. The session owns its entity collections outright, while
//! model bounds are read-only prototypes shared across instances.

use glam::{Mat4, Quat, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::obb::Aabb;
use crate::consts::*;
use crate::tuning::Tuning;
use crate::yaw_from_dir;

/// Local bounds and instance scale for one model, as reported by the asset
/// provider. A model that failed to load reports a degenerate `Aabb`; the
/// sim degrades to fallback geometry rather than treating that as an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelBounds {
    pub bounds: Aabb,
    pub scale: Vec3,
}

impl ModelBounds {
    pub fn new(bounds: Aabb, scale: Vec3) -> Self {
        Self { bounds, scale }
    }
}

impl Default for ModelBounds {
    /// Unit cube centered at the origin, unscaled.
    fn default() -> Self {
        Self {
            bounds: Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5)),
            scale: Vec3::ONE,
        }
    }
}

/// Read-only model geometry shared by the whole session: the player, the
/// floor, and the falling-object prototypes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldModels {
    pub player: ModelBounds,
    pub floor: ModelBounds,
    pub falling: Vec<ModelBounds>,
}

impl WorldModels {
    /// Guarantees at least one falling prototype so spawn selection always
    /// has something to pick from.
    pub fn new(player: ModelBounds, floor: ModelBounds, mut falling: Vec<ModelBounds>) -> Self {
        if falling.is_empty() {
            log::warn!("No falling-object prototypes provided; using a default cube");
            falling.push(ModelBounds::default());
        }
        Self {
            player,
            floor,
            falling,
        }
    }
}

impl Default for WorldModels {
    /// Stand-in geometry matching the shipped models' proportions: a
    /// 0.6-scaled player cube, a 12x12 floor slab, and three prototypes at
    /// the shipped scales.
    fn default() -> Self {
        let unit = Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5));
        Self::new(
            ModelBounds::new(unit, Vec3::splat(0.6)),
            ModelBounds::new(
                Aabb::new(
                    Vec3::new(-FLOOR_HALF, -0.05, -FLOOR_HALF),
                    Vec3::new(FLOOR_HALF, 0.05, FLOOR_HALF),
                ),
                Vec3::ONE,
            ),
            vec![
                ModelBounds::new(unit, Vec3::splat(0.2)),
                ModelBounds::new(unit, Vec3::splat(0.2)),
                ModelBounds::new(unit, Vec3::ONE),
            ],
        )
    }
}

/// One falling instance. Placed by the spawn logic, advanced by the tick,
/// removed when it hits the player or lands on the floor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingObject {
    pub pos: Vec3,
    pub vel: Vec3,
    /// Index into `WorldModels::falling`
    pub model_index: usize,
    /// World-space half-extents, refreshed from the OBB each frame
    pub half_extents: Vec3,
    pub alive: bool,
    pub transform: Mat4,
}

impl FallingObject {
    /// Rebuild the cached world transform. No rotation while falling, so
    /// this is translate * scale.
    pub fn update_transform(&mut self, scale: Vec3) {
        self.transform = Mat4::from_scale_rotation_translation(scale, Quat::IDENTITY, self.pos);
    }
}

/// A bonus cube resting on the floor, waiting to be picked up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub pos: Vec3,
    /// Seconds until it despawns uncollected
    pub lifetime: f32,
    pub alive: bool,
}

impl Collectible {
    /// World transform for the renderer.
    pub fn transform(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(COLLECT_HALF * 2.0),
            Quat::IDENTITY,
            self.pos,
        )
    }
}

/// Player movement and vertical-physics state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub pos: Vec3,
    /// Previous frame's position, for the moving-flag derivation
    pub prev_pos: Vec3,
    /// Standing height; vertical position clamps to this on landing
    pub ground_y: f32,
    pub vertical_vel: f32,
    pub grounded: bool,
    pub jump_cooldown: f32,
    /// Normalized stamina in [0, 1], spent by sprinting
    pub stamina: f32,
    pub sprinting: bool,
    /// True when horizontal position changed this frame; drives the
    /// leg-swing animation in the render collaborator
    pub moving: bool,
    pub transform: Mat4,
}

impl PlayerState {
    fn at_rest() -> Self {
        let pos = Vec3::new(0.0, PLAYER_GROUND_Y, 0.0);
        Self {
            pos,
            prev_pos: pos,
            ground_y: PLAYER_GROUND_Y,
            vertical_vel: 0.0,
            grounded: true,
            jump_cooldown: 0.0,
            stamina: 1.0,
            sprinting: false,
            moving: false,
            transform: Mat4::IDENTITY,
        }
    }

    /// Rebuild the world transform: feet aligned to the floor top plus the
    /// current jump displacement, facing the camera's horizontal direction.
    pub fn update_transform(&mut self, model: &ModelBounds, floor_top: f32, camera_forward: Vec3) {
        let jump_offset = self.pos.y - self.ground_y;
        let world_y = floor_top - model.bounds.min.y * model.scale.y + jump_offset;
        let yaw = yaw_from_dir(camera_forward);
        self.transform = Mat4::from_scale_rotation_translation(
            model.scale,
            Quat::from_rotation_y(yaw),
            Vec3::new(self.pos.x, world_y, self.pos.z),
        );
    }
}

/// Complete session state. Owned by the main loop, mutated only by `tick`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    pub models: WorldModels,

    pub score: u32,
    pub health: u8,
    pub max_health: u8,
    /// Terminal flag; once set, ticks are no-ops until `reset`
    pub player_dead: bool,
    /// Seconds of hit flash remaining (cosmetic)
    pub hit_effect_timer: f32,
    /// Gravity multiplier for falling objects; ramps over the session
    pub difficulty: f32,

    /// Seconds until the next falling-object spawn
    pub spawn_timer: f32,
    /// Seconds until the next collectible spawn
    pub collect_spawn_timer: f32,

    /// World Y of the floor's top face
    pub floor_top: f32,
    pub floor_transform: Mat4,

    pub player: PlayerState,
    pub falling: Vec<FallingObject>,
    pub collectibles: Vec<Collectible>,
}

impl GameState {
    /// Create a session with default models and tuning.
    pub fn new(seed: u64) -> Self {
        Self::with_setup(seed, WorldModels::default(), Tuning::default())
    }

    /// Create a session with the given seed, model geometry and tuning.
    /// Tuning ranges are reordered here so the sampling inside `tick` never
    /// sees an inverted pair.
    pub fn with_setup(seed: u64, models: WorldModels, tuning: Tuning) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning: tuning.sanitized(),
            models,
            score: 0,
            health: MAX_HEALTH,
            max_health: MAX_HEALTH,
            player_dead: false,
            hit_effect_timer: 0.0,
            difficulty: DIFFICULTY_MIN,
            spawn_timer: 0.0,
            collect_spawn_timer: COLLECT_FIRST_DELAY,
            floor_top: FLOOR_TOP,
            floor_transform: Mat4::IDENTITY,
            player: PlayerState::at_rest(),
            falling: Vec::new(),
            collectibles: Vec::new(),
        };
        state.reset();
        state
    }

    /// Return the session to its initial state: score 0, full health, empty
    /// entity sets, player standing at the origin.
    pub fn reset(&mut self) {
        self.falling.clear();
        self.collectibles.clear();
        self.spawn_timer = 0.0;
        self.collect_spawn_timer = COLLECT_FIRST_DELAY;
        self.score = 0;
        self.max_health = MAX_HEALTH;
        self.health = MAX_HEALTH;
        self.player_dead = false;
        self.hit_effect_timer = 0.0;
        self.difficulty = self.tuning.difficulty_min;
        self.player = PlayerState::at_rest();

        // Place the floor so its top face sits at floor_top regardless of
        // where the model's local origin is.
        self.floor_top = FLOOR_TOP;
        let floor_local_top = self.models.floor.bounds.max.y * self.models.floor.scale.y;
        let y_offset = self.floor_top - floor_local_top;
        self.floor_transform = Mat4::from_scale_rotation_translation(
            self.models.floor.scale,
            Quat::IDENTITY,
            Vec3::new(0.0, y_offset, 0.0),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_at_rest() {
        let state = GameState::new(7);
        assert_eq!(state.score, 0);
        assert_eq!(state.health, state.max_health);
        assert!(!state.player_dead);
        assert!(state.falling.is_empty());
        assert!(state.collectibles.is_empty());
        assert_eq!(state.player.pos, Vec3::new(0.0, PLAYER_GROUND_Y, 0.0));
        assert!(state.player.grounded);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut state = GameState::new(7);
        state.score = 120;
        state.health = 1;
        state.player_dead = true;
        state.difficulty = 2.0;
        state.falling.push(FallingObject {
            pos: Vec3::new(1.0, 5.0, 1.0),
            vel: Vec3::ZERO,
            model_index: 0,
            half_extents: Vec3::ONE,
            alive: true,
            transform: Mat4::IDENTITY,
        });

        state.reset();
        let first = state.clone();
        state.reset();

        assert_eq!(state.score, first.score);
        assert_eq!(state.health, first.health);
        assert_eq!(state.player_dead, first.player_dead);
        assert_eq!(state.difficulty, first.difficulty);
        assert!(state.falling.is_empty() && first.falling.is_empty());
        assert_eq!(state.player.pos, first.player.pos);
        assert_eq!(state.floor_transform, first.floor_transform);
    }

    #[test]
    fn test_floor_placed_with_top_at_floor_top() {
        let state = GameState::new(3);
        // Highest corner of the transformed floor bounds must land on
        // floor_top.
        let top_local = state.models.floor.bounds.max;
        let world_top = state.floor_transform.transform_point3(top_local);
        assert!((world_top.y - state.floor_top).abs() < 1e-5);
    }

    #[test]
    fn test_with_setup_reorders_inverted_tuning_ranges() {
        let tuning = Tuning {
            spawn_height_min: 8.0,
            spawn_height_max: 5.0,
            ..Tuning::default()
        };
        let state = GameState::with_setup(1, WorldModels::default(), tuning);
        assert_eq!(state.tuning.spawn_height_min, 5.0);
        assert_eq!(state.tuning.spawn_height_max, 8.0);
    }

    #[test]
    fn test_empty_prototype_list_gets_default() {
        let models = WorldModels::new(
            ModelBounds::default(),
            ModelBounds::default(),
            Vec::new(),
        );
        assert_eq!(models.falling.len(), 1);
    }

    #[test]
    fn test_player_transform_faces_camera() {
        let mut player = PlayerState::at_rest();
        let model = ModelBounds::default();
        // Camera looking along -Z: yaw pi, i.e. the -Z column flips.
        player.update_transform(&model, FLOOR_TOP, Vec3::NEG_Z);
        let (_, rot, _) = player.transform.to_scale_rotation_translation();
        let facing = rot * Vec3::Z;
        assert!((facing.z - (-1.0)).abs() < 1e-5);
    }

    #[test]
    fn test_player_transform_straight_down_camera_fallback() {
        let mut player = PlayerState::at_rest();
        let model = ModelBounds::default();
        player.update_transform(&model, FLOOR_TOP, Vec3::NEG_Y);
        let (_, rot, _) = player.transform.to_scale_rotation_translation();
        // Fallback facing is -Z, same as looking along -Z
        let facing = rot * Vec3::Z;
        assert!((facing.z - (-1.0)).abs() < 1e-5);
    }

    #[test]
    fn test_session_state_roundtrips_through_json() {
        let state = GameState::new(42);
        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.seed, state.seed);
        assert_eq!(back.score, state.score);
        assert_eq!(back.player.pos, state.player.pos);
    }
}
