//! Impact volume model.
//!
//! Maps the magnitude of a collision's relative velocity onto a playback
//! volume in `[0, 1]` using an ease-out cubic curve, so light taps stay quiet
//! while anything near the velocity ceiling plays at full volume.

use crate::math::{Vec3, ease_out_cubic, normalized_value};

/// Converts a relative velocity magnitude into an eased volume in `[0, 1]`.
///
/// `max_velocity <= 0` yields 0.
pub fn compute_volume(relative_velocity: f32, max_velocity: f32) -> f32 {
    let normalized = normalized_value(relative_velocity, 0.0, max_velocity);
    ease_out_cubic(normalized).clamp(0.0, 1.0)
}

/// Same as [`compute_volume`], taking the velocity vector reported by the physics engine.
pub fn compute_volume_from(relative_velocity: Vec3, max_velocity: f32) -> f32 {
    compute_volume(relative_velocity.length(), max_velocity)
}
