//! Math utilities and types for the locomotion core.
//!
//! This module provides the small vector and matrix types the controller needs
//! to move the body, place the camera and hand a view matrix to a renderer.
//! All types are `#[repr]`-stable and `bytemuck::Pod`, so they can be copied
//! straight into GPU uniform buffers.
//!
//! # Module Organization
//!
//! - [`vec`] module contains [`Vec3`] and its operators
//! - [`mat`] module contains [`Mat4`] (row-vector convention)
//! - Angle helpers and scalar interpolation are provided at root level

pub mod mat;
pub mod vec;

pub use mat::Mat4;
pub use vec::Vec3;

/// Tolerance used when deciding whether an axis sample counts as "no input".
pub const AXIS_EPSILON: f32 = 1e-6;

/// Converts degrees to radians.
///
/// This handles angle wrapping by first normalizing the input to the range (-360, 360).
///
/// # Example
/// ```
/// use mirador_locomotion::math::deg_to_rad;
///
/// assert!((deg_to_rad(180.0) - std::f32::consts::PI).abs() < 1e-6);
/// assert!((deg_to_rad(540.0) - std::f32::consts::PI).abs() < 1e-6);
/// ```
pub fn deg_to_rad(degrees: f32) -> f32 {
    (degrees % 360.0) * (std::f32::consts::PI / 180.0)
}

/// Returns `true` when `value` is close enough to zero to be treated as no input.
pub fn approximately_zero(value: f32) -> bool {
    value.abs() <= AXIS_EPSILON
}

/// Exponential smoothing factor for a frame of length `dt`.
///
/// Returns `1 - e^(-rate * dt)`, which makes `lerp(current, target, factor)`
/// converge at the same speed regardless of frame rate.
pub fn smoothing_factor(rate: f32, dt: f32) -> f32 {
    1.0 - (-rate * dt).exp()
}
