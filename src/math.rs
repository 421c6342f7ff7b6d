use core::f64::consts::TAU;

use glam::{DQuat, DVec3};

/// Rotates `vector` by `angle` radians around `axis`.
///
/// `axis` is expected to be unit-length; callers in this crate only
/// pass normalized basis vectors.
pub(crate) fn rotate_about_axis(vector: DVec3, axis: DVec3, angle: f64) -> DVec3 {
    DQuat::from_axis_angle(axis, angle) * vector
}

/// Wraps an angle into the `[0, TAU)` range.
pub(crate) fn wrap_tau(angle: f64) -> f64 {
    angle.rem_euclid(TAU)
}

/// Arc cosine with the argument clamped into `[-1, 1]`.
///
/// Dot products of normalized vectors can land epsilon-outside the
/// domain of `acos`; clamping keeps the result finite.
pub(crate) fn acos_clamped(x: f64) -> f64 {
    x.clamp(-1.0, 1.0).acos()
}

/// The angle from `from` to `to`, measured counterclockwise around
/// `axis`, in `[0, TAU)`.
///
/// Both vectors must lie in the plane perpendicular to `axis`.
/// Their magnitudes cancel inside the `atan2`, so neither needs to be
/// normalized.
pub(crate) fn angle_about_axis(from: DVec3, to: DVec3, axis: DVec3) -> f64 {
    wrap_tau(from.cross(to).dot(axis).atan2(from.dot(to)))
}
