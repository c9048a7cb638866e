//! Spawn placement for falling instances.
//!
//! Keeps every spawned footprint inside the floor's world-space bounds and
//! never fails: degenerate floor geometry or an oversized prototype fall
//! back to fixed regions instead of surfacing an error into the frame loop.

use glam::{Mat4, Vec3};
use rand::Rng;
use rand_pcg::Pcg32;

use super::obb::Aabb;
use super::state::{FallingObject, ModelBounds};
use crate::consts::*;
use crate::tuning::{SpawnMotion, Tuning};

/// Horizontal (X/Z) world-space bounds of the floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloorBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl FloorBounds {
    /// Fixed fallback square centered at the origin.
    pub fn fallback() -> Self {
        Self {
            min_x: -FLOOR_HALF,
            max_x: FLOOR_HALF,
            min_z: -FLOOR_HALF,
            max_z: FLOOR_HALF,
        }
    }

    /// Compute bounds by transforming all 8 corners of the floor's local
    /// bounding box into world space and taking min/max X and Z. A floor
    /// with no valid bounding box yields the fixed fallback square.
    pub fn from_floor(bounds: &Aabb, transform: &Mat4) -> Self {
        if !bounds.is_valid() {
            log::warn!("Floor bounding box is degenerate; using fallback bounds");
            return Self::fallback();
        }

        let mut min_x = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut min_z = f32::INFINITY;
        let mut max_z = f32::NEG_INFINITY;
        for corner in bounds.corners() {
            let world = transform.transform_point3(corner);
            min_x = min_x.min(world.x);
            max_x = max_x.max(world.x);
            min_z = min_z.min(world.z);
            max_z = max_z.max(world.z);
        }
        Self {
            min_x,
            max_x,
            min_z,
            max_z,
        }
    }
}

/// Horizontal footprint half-extents of a prototype: max |X| and |Z| over
/// its local corners scaled by the instance scale (no rotation is assumed
/// at spawn time), plus a small safety margin.
pub fn footprint_half_extents(proto: &ModelBounds) -> (f32, f32) {
    let mut max_abs_x = 0.0f32;
    let mut max_abs_z = 0.0f32;
    for corner in proto.bounds.corners() {
        let scaled = corner * proto.scale;
        max_abs_x = max_abs_x.max(scaled.x.abs());
        max_abs_z = max_abs_z.max(scaled.z.abs());
    }
    (
        max_abs_x + SPAWN_SAFETY_MARGIN,
        max_abs_z + SPAWN_SAFETY_MARGIN,
    )
}

/// Valid spawn range on one axis so the footprint stays inside the floor.
/// Collapses to a small region around the floor center when the footprint
/// is wider than the floor.
fn spawn_range(floor_min: f32, floor_max: f32, half: f32) -> (f32, f32) {
    let min = floor_min + half;
    let max = floor_max - half;
    if max <= min {
        log::warn!("Prototype footprint wider than floor; spawning near center");
        let center = 0.5 * (floor_min + floor_max);
        (center - 0.5, center + 0.5)
    } else {
        (min, max)
    }
}

/// Place a new falling instance: uniform prototype choice, horizontal
/// position inside the safe range, height in the spawn band, and an initial
/// velocity per the spawn-motion policy. This operation never fails.
pub fn spawn_falling(
    rng: &mut Pcg32,
    prototypes: &[ModelBounds],
    floor: FloorBounds,
    tuning: &Tuning,
) -> FallingObject {
    // WorldModels guarantees a non-empty prototype list.
    let model_index = rng.random_range(0..prototypes.len());
    let proto = &prototypes[model_index];

    let (half_x, half_z) = footprint_half_extents(proto);
    let (min_x, max_x) = spawn_range(floor.min_x, floor.max_x, half_x);
    let (min_z, max_z) = spawn_range(floor.min_z, floor.max_z, half_z);

    // Inclusive sampling: a tuning file may pin a range to a single value
    let pos = Vec3::new(
        rng.random_range(min_x..=max_x),
        rng.random_range(tuning.spawn_height_min..=tuning.spawn_height_max),
        rng.random_range(min_z..=max_z),
    );

    let down = rng.random_range(tuning.fall_speed_min..=tuning.fall_speed_max);
    let vel = match tuning.spawn_motion {
        SpawnMotion::VerticalOnly => Vec3::new(0.0, -down, 0.0),
        SpawnMotion::Drift { max_horizontal } => Vec3::new(
            rng.random_range(-max_horizontal..=max_horizontal),
            -down,
            rng.random_range(-max_horizontal..=max_horizontal),
        ),
    };

    let half_y =
        (proto.bounds.max.y - proto.bounds.min.y) * 0.5 * proto.scale.y + SPAWN_SAFETY_MARGIN;

    let mut object = FallingObject {
        pos,
        vel,
        model_index,
        half_extents: Vec3::new(half_x, half_y, half_z),
        alive: true,
        transform: Mat4::IDENTITY,
    };
    // Visible on its first frame, before the tick refreshes it
    object.update_transform(proto.scale);
    object
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn unit_cube() -> Aabb {
        Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5))
    }

    fn flat_floor(half: f32) -> (Aabb, Mat4) {
        (
            Aabb::new(Vec3::new(-half, -0.05, -half), Vec3::new(half, 0.05, half)),
            Mat4::IDENTITY,
        )
    }

    #[test]
    fn test_floor_bounds_from_corners() {
        let (bounds, transform) = flat_floor(6.0);
        let floor = FloorBounds::from_floor(&bounds, &transform);
        assert_eq!(floor.min_x, -6.0);
        assert_eq!(floor.max_x, 6.0);
        assert_eq!(floor.min_z, -6.0);
        assert_eq!(floor.max_z, 6.0);
    }

    #[test]
    fn test_floor_bounds_follow_transform() {
        let (bounds, _) = flat_floor(2.0);
        let transform = Mat4::from_scale_rotation_translation(
            Vec3::new(2.0, 1.0, 2.0),
            Quat::IDENTITY,
            Vec3::new(1.0, 0.0, -1.0),
        );
        let floor = FloorBounds::from_floor(&bounds, &transform);
        assert!((floor.min_x - (-3.0)).abs() < 1e-5);
        assert!((floor.max_x - 5.0).abs() < 1e-5);
        assert!((floor.min_z - (-5.0)).abs() < 1e-5);
        assert!((floor.max_z - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_degenerate_floor_uses_fallback() {
        let floor = FloorBounds::from_floor(&Aabb::empty(), &Mat4::IDENTITY);
        assert_eq!(floor, FloorBounds::fallback());
    }

    #[test]
    fn test_rotated_floor_still_bounded() {
        // A floor rotated about Y still produces a containing AABB on X/Z.
        let (bounds, _) = flat_floor(6.0);
        let transform = Mat4::from_quat(Quat::from_rotation_y(0.5));
        let floor = FloorBounds::from_floor(&bounds, &transform);
        assert!(floor.max_x > 6.0 && floor.max_x < 6.0 * std::f32::consts::SQRT_2 + 1e-4);
        assert!((floor.min_x + floor.max_x).abs() < 1e-4);
    }

    #[test]
    fn test_footprint_half_extents_scaled() {
        let proto = ModelBounds::new(unit_cube(), Vec3::new(0.4, 1.0, 2.0));
        let (half_x, half_z) = footprint_half_extents(&proto);
        assert!((half_x - (0.2 + SPAWN_SAFETY_MARGIN)).abs() < 1e-6);
        assert!((half_z - (1.0 + SPAWN_SAFETY_MARGIN)).abs() < 1e-6);
    }

    #[test]
    fn test_spawn_range_scenario() {
        // Floor half-extent 6, footprint half-extent 0.5: valid range is
        // exactly [-5.5, 5.5] and the edges themselves are valid.
        let (min, max) = spawn_range(-6.0, 6.0, 0.5);
        assert_eq!(min, -5.5);
        assert_eq!(max, 5.5);
    }

    #[test]
    fn test_spawn_range_oversized_footprint_falls_back_to_center() {
        let (min, max) = spawn_range(-1.0, 1.0, 2.0);
        assert_eq!(min, -0.5);
        assert_eq!(max, 0.5);
    }

    #[test]
    fn test_spawned_instance_is_alive_with_downward_velocity() {
        let mut rng = Pcg32::seed_from_u64(1);
        let protos = vec![ModelBounds::new(unit_cube(), Vec3::splat(0.2))];
        let tuning = Tuning::default();
        let object = spawn_falling(&mut rng, &protos, FloorBounds::fallback(), &tuning);
        assert!(object.alive);
        assert!(object.vel.y < 0.0);
        assert_eq!(object.vel.x, 0.0);
        assert_eq!(object.vel.z, 0.0);
        assert!(object.pos.y >= tuning.spawn_height_min);
        assert!(object.pos.y <= tuning.spawn_height_max);
    }

    #[test]
    fn test_pinned_ranges_spawn_at_fixed_height_and_speed() {
        let mut rng = Pcg32::seed_from_u64(3);
        let protos = vec![ModelBounds::new(unit_cube(), Vec3::splat(0.2))];
        let tuning = Tuning {
            spawn_height_min: 5.0,
            spawn_height_max: 5.0,
            fall_speed_min: 1.0,
            fall_speed_max: 1.0,
            ..Tuning::default()
        };
        let object = spawn_falling(&mut rng, &protos, FloorBounds::fallback(), &tuning);
        assert_eq!(object.pos.y, 5.0);
        assert_eq!(object.vel.y, -1.0);
    }

    #[test]
    fn test_drift_policy_gives_horizontal_velocity_bound() {
        let mut rng = Pcg32::seed_from_u64(9);
        let protos = vec![ModelBounds::new(unit_cube(), Vec3::ONE)];
        let tuning = Tuning {
            spawn_motion: SpawnMotion::Drift {
                max_horizontal: 0.5,
            },
            ..Tuning::default()
        };
        for _ in 0..50 {
            let object = spawn_falling(&mut rng, &protos, FloorBounds::fallback(), &tuning);
            assert!(object.vel.x.abs() <= 0.5);
            assert!(object.vel.z.abs() <= 0.5);
            assert!(object.vel.y < 0.0);
        }
    }

    proptest! {
        #[test]
        fn prop_footprint_contained_in_floor(
            seed in 0u64..1000,
            scale_x in 0.1f32..2.0,
            scale_z in 0.1f32..2.0,
        ) {
            // Floor footprint (half 6) always larger than the prototype
            // footprint (half at most 1 + margin).
            let mut rng = Pcg32::seed_from_u64(seed);
            let protos = vec![ModelBounds::new(
                unit_cube(),
                Vec3::new(scale_x, 1.0, scale_z),
            )];
            let tuning = Tuning::default();
            let floor = FloorBounds::fallback();
            let object = spawn_falling(&mut rng, &protos, floor, &tuning);

            let (half_x, half_z) = footprint_half_extents(&protos[0]);
            prop_assert!(object.pos.x - half_x >= floor.min_x - 1e-4);
            prop_assert!(object.pos.x + half_x <= floor.max_x + 1e-4);
            prop_assert!(object.pos.z - half_z >= floor.min_z - 1e-4);
            prop_assert!(object.pos.z + half_z <= floor.max_z + 1e-4);
        }
    }
}
