//! Planar distance and angle helpers
//!
//! All measurements use the image-plane (x, y) projection of a landmark;
//! depth is too noisy from a single camera to compare joints with.

use glam::Vec2;

use crate::landmarks::Landmark;

/// Default proximity threshold in normalized frame units
pub const NEAR_THRESHOLD: f32 = 0.1;

/// Euclidean distance between two landmarks in the image plane.
pub fn distance(a: Landmark, b: Landmark) -> f32 {
    a.xy().distance(b.xy())
}

/// Signed angle at vertex `b` between `b→a` and `b→c`, in radians.
///
/// Result lies in (-π, π]. Returns 0 when either arm has zero length.
pub fn signed_angle(a: Landmark, b: Landmark, c: Landmark) -> f32 {
    let ba = a.xy() - b.xy();
    let bc = c.xy() - b.xy();

    if ba == Vec2::ZERO || bc == Vec2::ZERO {
        return 0.0;
    }

    let angle = ba.perp_dot(bc).atan2(ba.dot(bc));
    // atan2(-0.0, x < 0) lands on -π; keep the half-open range
    if angle <= -std::f32::consts::PI {
        std::f32::consts::PI
    } else {
        angle
    }
}

/// Whether two landmarks are closer than `threshold`
pub fn near(a: Landmark, b: Landmark, threshold: f32) -> bool {
    distance(a, b) < threshold
}

/// Radians to whole degrees, rounded half up
pub fn radians_to_degrees(radians: f32) -> i32 {
    (radians.to_degrees() + 0.5).floor() as i32
}
