//! Math types and easing curves for ImpactSonic

pub use glam::Vec3;

/// Clamps `value` into `[min, max]` and divides by `max`.
///
/// Returns 0 when `max` is not a positive finite number or `value` is NaN, so
/// callers never see a division by zero.
pub fn normalized_value(value: f32, min: f32, max: f32) -> f32 {
    if !(max > 0.0) || !max.is_finite() || value.is_nan() {
        return 0.0;
    }
    value.clamp(min.min(max), max) / max
}

/// Ease-out cubic for inputs in `[0, 1]`: fast rise, gentle landing.
pub fn ease_out_cubic(value: f32) -> f32 {
    1.0 - (1.0 - value).powi(3)
}

/// Ease-in cubic for inputs in `[0, 1]`.
pub fn ease_in_cubic(value: f32) -> f32 {
    value * value * value
}
