//! Data-driven game balance.
//!
//! Defaults match the canonical build; a JSON file can override any value
//! for playtesting without recompiling. Loading never fails: a missing or
//! malformed file logs and falls back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// How falling objects move after spawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum SpawnMotion {
    /// Straight-down descent; horizontal velocity is zeroed every frame for
    /// a predictable dodge game.
    #[default]
    VerticalOnly,
    /// Objects keep a small random sideways velocity, up to the given speed
    /// per horizontal axis. Harder to read, livelier to watch.
    Drift { max_horizontal: f32 },
}

/// Game balance values threaded through the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    pub move_speed: f32,
    pub sprint_multiplier: f32,
    /// Normalized stamina spent per second of sprinting
    pub stamina_drain: f32,
    /// Normalized stamina recovered per second while not sprinting
    pub stamina_regen: f32,
    pub jump_speed: f32,
    pub jump_cooldown: f32,
    pub player_gravity: f32,

    // === Falling objects ===
    /// Base gravity applied to falling objects, scaled by difficulty
    pub fall_gravity: f32,
    pub spawn_interval_min: f32,
    pub spawn_interval_max: f32,
    pub spawn_height_min: f32,
    pub spawn_height_max: f32,
    /// Initial downward speed range at spawn
    pub fall_speed_min: f32,
    pub fall_speed_max: f32,
    pub spawn_motion: SpawnMotion,

    // === Difficulty ramp ===
    pub difficulty_rate: f32,
    pub difficulty_min: f32,
    pub difficulty_max: f32,

    // === Collectibles ===
    pub collect_interval_min: f32,
    pub collect_interval_max: f32,
    pub collect_lifetime_min: f32,
    pub collect_lifetime_max: f32,
    pub pickup_radius: f32,
    pub pickup_score: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            move_speed: MOVE_SPEED,
            sprint_multiplier: SPRINT_MULTIPLIER,
            stamina_drain: STAMINA_DRAIN,
            stamina_regen: STAMINA_REGEN,
            jump_speed: JUMP_SPEED,
            jump_cooldown: JUMP_COOLDOWN,
            player_gravity: PLAYER_GRAVITY,

            fall_gravity: FALL_GRAVITY,
            spawn_interval_min: SPAWN_INTERVAL_MIN,
            spawn_interval_max: SPAWN_INTERVAL_MAX,
            spawn_height_min: SPAWN_HEIGHT_MIN,
            spawn_height_max: SPAWN_HEIGHT_MAX,
            fall_speed_min: FALL_SPEED_MIN,
            fall_speed_max: FALL_SPEED_MAX,
            spawn_motion: SpawnMotion::VerticalOnly,

            difficulty_rate: DIFFICULTY_RATE,
            difficulty_min: DIFFICULTY_MIN,
            difficulty_max: DIFFICULTY_MAX,

            collect_interval_min: COLLECT_INTERVAL_MIN,
            collect_interval_max: COLLECT_INTERVAL_MAX,
            collect_lifetime_min: COLLECT_LIFETIME_MIN,
            collect_lifetime_max: COLLECT_LIFETIME_MAX,
            pickup_radius: PICKUP_RADIUS,
            pickup_score: PICKUP_SCORE,
        }
    }
}

impl Tuning {
    /// Enforce `min <= max` on every sampled range, swapping inverted
    /// pairs, and keep the drift speed non-negative. A playtest file can
    /// order a pair either way without turning a later spawn into a panic.
    pub fn sanitized(mut self) -> Self {
        let mut swapped = false;
        for (min, max) in [
            (&mut self.spawn_interval_min, &mut self.spawn_interval_max),
            (&mut self.spawn_height_min, &mut self.spawn_height_max),
            (&mut self.fall_speed_min, &mut self.fall_speed_max),
            (&mut self.difficulty_min, &mut self.difficulty_max),
            (&mut self.collect_interval_min, &mut self.collect_interval_max),
            (&mut self.collect_lifetime_min, &mut self.collect_lifetime_max),
        ] {
            if *min > *max {
                std::mem::swap(min, max);
                swapped = true;
            }
        }
        if let SpawnMotion::Drift { max_horizontal } = &mut self.spawn_motion {
            *max_horizontal = max_horizontal.abs();
        }
        if swapped {
            log::warn!("Tuning ranges with min > max were swapped");
        }
        self
    }

    /// Load tuning from a JSON file, falling back to defaults on any failure.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<Tuning>(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning.sanitized()
                }
                Err(err) => {
                    log::warn!("Bad tuning file {}: {err}; using defaults", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No tuning file at {}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Write the current tuning as pretty JSON (e.g. to seed a playtest file).
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
        std::fs::write(path, json)?;
        log::info!("Tuning saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_canonical_constants() {
        let tuning = Tuning::default();
        assert_eq!(tuning.move_speed, 5.0);
        assert_eq!(tuning.pickup_score, 10);
        assert_eq!(tuning.spawn_motion, SpawnMotion::VerticalOnly);
        assert!((tuning.fall_gravity - (-1.96)).abs() < 1e-6);
    }

    #[test]
    fn test_partial_json_overrides_keep_defaults() {
        // serde(default): a playtest file only needs the values it changes.
        let tuning: Tuning = serde_json::from_str(r#"{"move_speed": 7.5}"#).unwrap();
        assert_eq!(tuning.move_speed, 7.5);
        assert_eq!(tuning.jump_speed, Tuning::default().jump_speed);
    }

    #[test]
    fn test_sanitized_reorders_inverted_ranges() {
        let tuning = Tuning {
            spawn_height_min: 8.0,
            spawn_height_max: 5.0,
            difficulty_min: 3.0,
            difficulty_max: 1.0,
            spawn_motion: SpawnMotion::Drift {
                max_horizontal: -0.5,
            },
            ..Tuning::default()
        }
        .sanitized();
        assert_eq!(tuning.spawn_height_min, 5.0);
        assert_eq!(tuning.spawn_height_max, 8.0);
        assert!(tuning.difficulty_min <= tuning.difficulty_max);
        assert_eq!(
            tuning.spawn_motion,
            SpawnMotion::Drift {
                max_horizontal: 0.5
            }
        );
    }

    #[test]
    fn test_sanitized_keeps_equal_bounds() {
        // Pinning a range to a single value is a valid playtest setup.
        let tuning = Tuning {
            spawn_height_min: 5.0,
            spawn_height_max: 5.0,
            ..Tuning::default()
        }
        .sanitized();
        assert_eq!(tuning.spawn_height_min, 5.0);
        assert_eq!(tuning.spawn_height_max, 5.0);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let tuning = Tuning::load(Path::new("/nonexistent/tuning.json"));
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_roundtrip() {
        let tuning = Tuning {
            spawn_motion: SpawnMotion::Drift {
                max_horizontal: 0.8,
            },
            ..Tuning::default()
        };
        let json = serde_json::to_string(&tuning).unwrap();
        let back: Tuning = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tuning);
    }
}
