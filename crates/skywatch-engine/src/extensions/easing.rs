// extensions/easing.rs
//
// Pure interpolation helpers for camera motion and scripted sweeps.
// No dependencies on Entity/Scene, just math.

use glam::Vec3;
use std::f32::consts::PI;

/// Easing curve for normalized progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    /// Slow start and end.
    SineInOut,
    /// Stronger slow start and end.
    CubicInOut,
}

impl Easing {
    /// Apply the curve to `t`, clamped to [0, 1].
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a + (b - a) * t
}

/// Frame-rate independent exponential smoothing factor.
///
/// `retention` is the fraction of the remaining gap kept per 60 Hz frame
/// (0.0 = snap, 0.9 = slow glide). Moving `current += (goal - current) * f`
/// each frame converges at the same wall-clock speed at any frame rate.
#[inline]
pub fn smoothing_factor(retention: f32, dt: f32) -> f32 {
    let retention = retention.clamp(0.0, 0.999);
    1.0 - retention.powf(dt * 60.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_fixed() {
        for easing in [Easing::Linear, Easing::SineInOut, Easing::CubicInOut] {
            assert!(easing.apply(0.0).abs() < 1e-6);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn in_out_curves_are_symmetric() {
        assert!((Easing::SineInOut.apply(0.5) - 0.5).abs() < 1e-6);
        assert!((Easing::CubicInOut.apply(0.5) - 0.5).abs() < 1e-6);
        assert!(Easing::CubicInOut.apply(0.2) < 0.2);
    }

    #[test]
    fn lerp_vec3_midpoint() {
        let m = lerp_vec3(Vec3::ZERO, Vec3::new(2.0, 4.0, 6.0), 0.5);
        assert_eq!(m, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(lerp(10.0, 20.0, 0.25), 12.5);
    }

    #[test]
    fn smoothing_is_frame_rate_independent() {
        // One 30 Hz frame closes the same gap as two 60 Hz frames.
        let one_slow = smoothing_factor(0.9, 1.0 / 30.0);
        let fast = smoothing_factor(0.9, 1.0 / 60.0);
        let two_fast = 1.0 - (1.0 - fast) * (1.0 - fast);
        assert!((one_slow - two_fast).abs() < 1e-5);
        assert_eq!(smoothing_factor(0.0, 0.016), 1.0);
    }
}
