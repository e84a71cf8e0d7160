//! Planar vector helpers for pursuit and knockback.
use glam::Vec2;

/// Angle in radians of the ray from `from` towards `to`.
///
/// Coincident points yield `0.0`, i.e. the positive x axis.
///
/// # Examples
/// ```
/// use glam::Vec2;
/// use skirmish::vector_math::bearing;
/// let angle = bearing(Vec2::ZERO, Vec2::new(0.0, 10.0));
/// assert!((angle - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
/// ```
#[must_use]
pub fn bearing(from: Vec2, to: Vec2) -> f32 {
    let delta = to - from;
    delta.y.atan2(delta.x)
}

/// Velocity of magnitude `speed` along `angle`.
#[must_use]
pub fn heading(angle: f32, speed: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin()) * speed
}

/// Velocity of magnitude `speed` pointing from `from` towards `to`.
///
/// Non-finite inputs produce a zero vector so a corrupted position never
/// propagates into neighbouring entities.
///
/// # Examples
/// ```
/// use glam::Vec2;
/// use skirmish::vector_math::seek;
/// let v = seek(Vec2::ZERO, Vec2::new(3.0, 4.0), 10.0);
/// assert!((v - Vec2::new(6.0, 8.0)).length() < 1e-4);
/// assert_eq!(seek(Vec2::NAN, Vec2::ZERO, 10.0), Vec2::ZERO);
/// ```
#[must_use]
pub fn seek(from: Vec2, to: Vec2, speed: f32) -> Vec2 {
    if !from.is_finite() || !to.is_finite() {
        return Vec2::ZERO;
    }
    heading(bearing(from, to), speed)
}
