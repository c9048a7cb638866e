//! World-space oriented bounding boxes built from model-local bounds.
//!
//! Every entity recomputes its OBB each frame from its model's local AABB
//! and its current world transform; nothing here is persisted.

use glam::{Mat3, Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Transformed axes shorter than this are treated as degenerate and replaced
/// by the canonical unit axis.
const AXIS_LEN_EPS: f32 = 1e-6;

/// Model-local axis-aligned bounding box (min/max corners).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Degenerate box; what a model that failed to load reports.
    pub fn empty() -> Self {
        Self {
            min: Vec3::ZERO,
            max: Vec3::ZERO,
        }
    }

    /// A box is usable when its corners differ.
    pub fn is_valid(&self) -> bool {
        self.min != self.max
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// All 8 corners, X-major iteration order.
    pub fn corners(&self) -> [Vec3; 8] {
        let (bmin, bmax) = (self.min, self.max);
        let mut corners = [Vec3::ZERO; 8];
        let mut idx = 0;
        for xi in 0..2 {
            for yi in 0..2 {
                for zi in 0..2 {
                    corners[idx] = Vec3::new(
                        if xi == 1 { bmax.x } else { bmin.x },
                        if yi == 1 { bmax.y } else { bmin.y },
                        if zi == 1 { bmax.z } else { bmin.z },
                    );
                    idx += 1;
                }
            }
        }
        corners
    }
}

/// Oriented bounding box: world center, three orthonormal axes, and the
/// half-length along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obb {
    pub center: Vec3,
    pub axes: [Vec3; 3],
    pub half: [f32; 3],
}

impl Obb {
    /// Build a world-space OBB from model-local bounds and a world transform
    /// (translate * rotate * scale, no shear).
    ///
    /// Each local unit axis is pushed through the linear part of the
    /// transform; its length becomes the per-axis scale factor and its
    /// normalized direction the world axis. Degenerate axes keep the
    /// canonical unit direction so the box stays well-defined under singular
    /// transforms instead of failing.
    pub fn from_local_bounds(bounds: &Aabb, transform: &Mat4) -> Self {
        let local_center = bounds.center();
        let local_half = bounds.half_extents();

        let center = transform.transform_point3(local_center);
        let linear = Mat3::from_mat4(*transform);

        let (axis_x, len_x) = unit_axis_or(linear * Vec3::X, Vec3::X);
        let (axis_y, len_y) = unit_axis_or(linear * Vec3::Y, Vec3::Y);
        let (axis_z, len_z) = unit_axis_or(linear * Vec3::Z, Vec3::Z);

        Self {
            center,
            axes: [axis_x, axis_y, axis_z],
            half: [
                len_x * local_half.x,
                len_y * local_half.y,
                len_z * local_half.z,
            ],
        }
    }

    /// Radius of the bounding sphere used for broad-phase rejection.
    pub fn bounding_radius(&self) -> f32 {
        Vec3::new(self.half[0], self.half[1], self.half[2]).length()
    }

    /// World Y of the bottom face (ground-contact tests).
    pub fn bottom_y(&self) -> f32 {
        self.center.y - self.half[1]
    }
}

fn unit_axis_or(v: Vec3, fallback: Vec3) -> (Vec3, f32) {
    let len = v.length();
    if len > AXIS_LEN_EPS {
        (v / len, len)
    } else {
        (fallback, len)
    }
}
