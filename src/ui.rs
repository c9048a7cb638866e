//! HUD data and minimal overlay-button interaction.
//!
//! The sim never reads any of this; the HUD is a pure projection of
//! `GameState` captured once per frame, plus a rising-edge click helper for
//! the game-over restart button.

use glam::Vec2;

use crate::sim::GameState;

/// Everything the HUD draws, captured from the session after a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudSnapshot {
    pub score: u32,
    pub health: u8,
    pub max_health: u8,
    /// Stamina bar fill in [0, 1]
    pub stamina: f32,
    /// Hit-flash intensity in [0, 1], full right after a hit and fading out
    pub hit_flash: f32,
    pub game_over: bool,
}

impl HudSnapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            score: state.score,
            health: state.health,
            max_health: state.max_health,
            stamina: state.player.stamina,
            hit_flash: (state.hit_effect_timer / crate::consts::HIT_FLASH_TIME).clamp(0.0, 1.0),
            game_over: state.player_dead,
        }
    }
}

/// Axis-aligned rectangle containment, in whatever space the overlay uses.
pub fn point_in_rect(p: Vec2, min: Vec2, max: Vec2) -> bool {
    p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
}

/// A clickable overlay rectangle. Reports a click only on the press edge,
/// so holding the button down across frames fires once.
#[derive(Debug, Clone, Copy)]
pub struct Button {
    pub min: Vec2,
    pub max: Vec2,
    prev_down: bool,
}

impl Button {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min,
            max,
            prev_down: false,
        }
    }

    /// Feed the current cursor position and button state; true on the frame
    /// the button transitions to pressed while the cursor is inside.
    pub fn clicked(&mut self, cursor: Vec2, down: bool) -> bool {
        let pressed = down && !self.prev_down && point_in_rect(cursor, self.min, self.max);
        self.prev_down = down;
        pressed
    }
}
