//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame-stepped only, elapsed time passed in by the caller
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod obb;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{obbs_intersect, spheres_overlap};
pub use obb::{Aabb, Obb};
pub use spawn::{FloorBounds, footprint_half_extents, spawn_falling};
pub use state::{Collectible, FallingObject, GameState, ModelBounds, PlayerState, WorldModels};
pub use tick::{TickInput, tick};
