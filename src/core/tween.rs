//! Easing helpers shared by animated world objects.

/// Hermite smoothstep (`3t² - 2t³`), input clamped to `[0, 1]`.
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Linear interpolation between `from` and `to`.
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Interpolate with a smoothstep ease over normalized progress `t`.
pub fn ease_between(from: f32, to: f32, t: f32) -> f32 {
    lerp(from, to, smoothstep(t))
}
