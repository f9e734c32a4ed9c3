//! Time-to-frame mapping and keyframe interpolation

use glam::{Quat, Vec3};

use crate::clip::{AnimationClip, Keyframe};
use crate::error::{AnimError, Result};

/// Pair of frames bracketing a point in time, with the blend factor between them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameWindow {
    pub begin: usize,
    pub end: usize,
    /// Fractional part of the elapsed time, in `[0, 1)`
    pub t: f32,
}

impl FrameWindow {
    /// Map an elapsed time (in frames) onto a cyclic clip of `key_count` frames
    ///
    /// `begin = floor(time) mod key_count`, `end = (begin + 1) mod key_count`.
    /// The remainder is Euclidean, so negative times wrap backwards into range.
    /// Times beyond the `i64` range saturate, and a non-finite time yields
    /// `t == 0`.
    pub fn at(elapsed: f32, key_count: usize) -> Result<Self> {
        if key_count == 0 {
            return Err(AnimError::configuration("cannot sample a clip with no keys"));
        }
        let whole = elapsed.floor();
        let begin = (whole as i64).rem_euclid(key_count as i64) as usize;
        let t = elapsed - whole;
        Ok(Self {
            begin,
            end: (begin + 1) % key_count,
            t: if t.is_finite() { t } else { 0.0 },
        })
    }
}

/// Trait for types that can be interpolated between keyframes
pub trait Lerp: Clone {
    fn lerp(&self, other: &Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for Vec3 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Self::lerp(*self, *other, t)
    }
}

impl Lerp for Quat {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        slerp_shortest(*self, *other, t)
    }
}

impl Lerp for Keyframe {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            position: self.position.lerp(other.position, t),
            rotation: slerp_shortest(self.rotation, other.rotation, t),
        }
    }
}

/// Spherical interpolation along the shorter arc between two rotations
///
/// Returns `from` unchanged at `t == 0`. glam flips `to` onto the near
/// hemisphere and falls back to a normalized lerp for nearly parallel inputs.
pub fn slerp_shortest(from: Quat, to: Quat, t: f32) -> Quat {
    if t == 0.0 {
        return from;
    }
    from.slerp(to, t)
}

/// Interpolated local pose of `bone` at the given window
pub fn sample(clip: &AnimationClip, bone: usize, window: FrameWindow) -> Result<Keyframe> {
    let begin = clip.frame(bone, window.begin)?;
    if window.t == 0.0 {
        return Ok(begin);
    }
    let end = clip.frame(bone, window.end)?;
    Ok(begin.lerp(&end, window.t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};
    use test_case::test_case;

    #[test_case(0.0, 4 => (0, 1) ; "start")]
    #[test_case(2.5, 4 => (2, 3) ; "middle")]
    #[test_case(3.2, 4 => (3, 0) ; "wraps end")]
    #[test_case(4.0, 4 => (0, 1) ; "one cycle")]
    #[test_case(12.0, 4 => (0, 1) ; "three cycles")]
    #[test_case(7.9, 1 => (0, 0) ; "single key")]
    #[test_case(-0.5, 4 => (3, 0) ; "negative time")]
    #[test_case(1.0e19, 4 => (3, 0) ; "beyond i64 range")]
    #[test_case(f32::INFINITY, 4 => (3, 0) ; "infinite time")]
    #[test_case(f32::NEG_INFINITY, 4 => (0, 1) ; "negative infinite time")]
    #[test_case(f32::INFINITY, 1 => (0, 0) ; "infinite time single key")]
    fn test_frame_window(elapsed: f32, keys: usize) -> (usize, usize) {
        let window = FrameWindow::at(elapsed, keys).unwrap();
        (window.begin, window.end)
    }

    #[test]
    fn test_frame_window_fraction() {
        let window = FrameWindow::at(5.25, 3).unwrap();
        assert!((window.t - 0.25).abs() < 1e-6);

        let window = FrameWindow::at(-0.25, 3).unwrap();
        assert!((window.t - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_frame_window_saturated_fraction() {
        assert_eq!(FrameWindow::at(1.0e19, 4).unwrap().t, 0.0);
        assert_eq!(FrameWindow::at(f32::INFINITY, 4).unwrap().t, 0.0);
        assert_eq!(FrameWindow::at(f32::NAN, 4).unwrap().t, 0.0);
    }

    #[test]
    fn test_frame_window_no_keys() {
        assert!(FrameWindow::at(1.0, 0).is_err());
    }

    #[test]
    fn test_slerp_endpoints() {
        let a = Quat::from_rotation_y(0.2);
        let b = Quat::from_rotation_y(1.4);

        assert_eq!(slerp_shortest(a, b, 0.0), a);
        assert!(slerp_shortest(a, b, 0.9999).abs_diff_eq(b, 1e-3));

        let mid = slerp_shortest(a, b, 0.5);
        assert!(mid.abs_diff_eq(Quat::from_rotation_y(0.8), 1e-5));
    }

    #[test]
    fn test_slerp_takes_short_arc() {
        let a = Quat::from_rotation_z(0.1);
        // Same orientation as rotation_z(-0.1), but on the far hemisphere
        let b = -Quat::from_rotation_z(-0.1);
        assert!(a.dot(b) < 0.0);

        let mid = slerp_shortest(a, b, 0.5);
        assert!(
            mid.abs_diff_eq(Quat::IDENTITY, 1e-5) || mid.abs_diff_eq(-Quat::IDENTITY, 1e-5),
            "went the long way: {mid:?}"
        );
    }

    #[test]
    fn test_slerp_wide_angle_stays_unit() {
        let a = Quat::IDENTITY;
        let b = Quat::from_rotation_x(PI - 0.01);
        for step in 0..=10 {
            let q = slerp_shortest(a, b, step as f32 / 10.0);
            assert!((q.length() - 1.0).abs() < 1e-4);
        }
        let quarter = slerp_shortest(a, Quat::from_rotation_x(FRAC_PI_2), 0.5);
        assert!(quarter.abs_diff_eq(Quat::from_rotation_x(FRAC_PI_2 / 2.0), 1e-5));
    }

    #[test]
    fn test_sample_interpolates_position() {
        let mut clip = AnimationClip::new();
        clip.set_key_count(2);
        clip.set_bone_count(1);
        clip.add_frame(0, Vec3::ZERO, Quat::IDENTITY);
        clip.add_frame(0, Vec3::new(0.0, 2.0, 0.0), Quat::IDENTITY);

        let at_start = sample(&clip, 0, FrameWindow::at(0.0, 2).unwrap()).unwrap();
        assert_eq!(at_start, Keyframe::IDENTITY);

        let halfway = sample(&clip, 0, FrameWindow::at(0.5, 2).unwrap()).unwrap();
        assert!((halfway.position - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-6);

        let near_end = sample(&clip, 0, FrameWindow::at(0.9999, 2).unwrap()).unwrap();
        assert!((near_end.position - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-3);

        // Wrap from the last frame back to the first
        let wrapped = sample(&clip, 0, FrameWindow::at(1.5, 2).unwrap()).unwrap();
        assert!((wrapped.position - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_sample_missing_bone() {
        let clip = AnimationClip::new();
        let err = sample(&clip, 3, FrameWindow::at(0.0, 1).unwrap()).unwrap_err();
        assert_eq!(err, AnimError::UnknownBone { bone: 3 });
    }
}
