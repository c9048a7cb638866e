//! OBB-OBB intersection via the separating axis theorem.
//!
//! The tricky part of Cratefall: deciding whether an arbitrarily scaled and
//! rotated falling object overlaps the player's box. Two convex boxes are
//! disjoint iff some axis separates their projections; for a pair of OBBs
//! it suffices to test 15 candidates.

use glam::Vec3;

use super::obb::Obb;

/// Boxes still count as intersecting when separated by less than this.
const CONTACT_EPS: f32 = 1e-6;
/// Cross-product axes with squared length below this are degenerate (the
/// boxes share a parallel axis pair) and are skipped.
const DEGENERATE_AXIS_EPS: f32 = 1e-8;

/// Projected radius of a box onto a unit axis: sum of each half-length
/// weighted by how much its axis lies along the test axis.
fn projected_radius(obb: &Obb, axis: Vec3) -> f32 {
    obb.half[0] * obb.axes[0].dot(axis).abs()
        + obb.half[1] * obb.axes[1].dot(axis).abs()
        + obb.half[2] * obb.axes[2].dot(axis).abs()
}

/// Test one candidate axis. Returns true when the projections overlap (the
/// axis does not separate the boxes).
fn overlaps_on_axis(a: &Obb, b: &Obb, axis: Vec3) -> bool {
    let len_sq = axis.length_squared();
    if len_sq < DEGENERATE_AXIS_EPS {
        return true;
    }
    let axis = axis / len_sq.sqrt();
    let center_dist = (b.center - a.center).dot(axis).abs();
    center_dist <= projected_radius(a, axis) + projected_radius(b, axis) + CONTACT_EPS
}

/// SAT intersection test between two OBBs.
///
/// Candidate axes are A's three axes, B's three axes, then the nine pairwise
/// cross products, with an early exit on the first separating axis found.
/// Touching boxes report intersection (boundary counts, via `CONTACT_EPS`).
pub fn obbs_intersect(a: &Obb, b: &Obb) -> bool {
    for axis in a.axes {
        if !overlaps_on_axis(a, b, axis) {
            return false;
        }
    }
    for axis in b.axes {
        if !overlaps_on_axis(a, b, axis) {
            return false;
        }
    }
    for a_axis in a.axes {
        for b_axis in b.axes {
            if !overlaps_on_axis(a, b, a_axis.cross(b_axis)) {
                return false;
            }
        }
    }
    true
}

/// Broad-phase rejection: boxes whose centers are farther apart than their
/// summed bounding-sphere radii cannot intersect and skip the SAT test.
pub fn spheres_overlap(a: &Obb, b: &Obb) -> bool {
    a.center.distance(b.center) <= a.bounding_radius() + b.bounding_radius()
}
