//! Vector helpers and the tumbling rotation shared by the hull extractor,
//! the frame rotator and the camera.
//!
//! Plain arithmetic (`dot`, `cross`, `+`, `-`, scalar `*`) is nalgebra's; this
//! module only adds the pieces with semantics of their own.

use nalgebra::{Rotation3, Vector3};

/// Tolerance for degeneracy and parallelism: collinear triples, rays grazing
/// a plane, and the on-plane band of the containment test.
pub const DEGENERACY_EPSILON: f64 = 1e-6;

/// Tolerance for deciding that two candidate planes describe the same face.
pub const DEDUP_EPSILON: f64 = 1e-3;

/// Normalizes `v`, returning it unchanged when its length is below
/// [`DEGENERACY_EPSILON`].
pub fn normalize(v: Vector3<f64>) -> Vector3<f64> {
    let len = v.magnitude();
    if len < DEGENERACY_EPSILON {
        return v;
    }
    v / len
}

/// The rigid transform applied to the solid at `angle` radians.
///
/// A spin of `angle` about the y axis followed by `angle / 2` about the
/// x axis, so the solid tumbles instead of turning on a single axis.
pub fn tumble(angle: f64) -> Rotation3<f64> {
    Rotation3::from_axis_angle(&Vector3::x_axis(), angle * 0.5) *
        Rotation3::from_axis_angle(&Vector3::y_axis(), angle)
}

pub fn rotate(direction: &Vector3<f64>, angle: f64) -> Vector3<f64> {
    tumble(angle) * direction
}
