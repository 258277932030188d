//! Planar geometry over landmark samples.
//!
//! All measurements use the image-plane `x`/`y` coordinates only; `z` is
//! ignored.

use std::f64::consts::PI;

use serve_models::LandmarkSample;

use crate::stats::{mean, std_deviation};
use crate::trajectory::Trajectory;

/// Rays shorter than this are treated as degenerate.
pub const MIN_RAY_LENGTH: f64 = 1e-6;

/// Angle at vertex `b` between rays `b→a` and `b→c`, in degrees `[0, 180]`.
///
/// Returns `None` when either ray is shorter than [`MIN_RAY_LENGTH`].
pub fn joint_angle(a: &LandmarkSample, b: &LandmarkSample, c: &LandmarkSample) -> Option<f64> {
    let (ux, uy) = (a.x - b.x, a.y - b.y);
    let (vx, vy) = (c.x - b.x, c.y - b.y);
    let nu = ux.hypot(uy);
    let nv = vx.hypot(vy);
    if nu < MIN_RAY_LENGTH || nv < MIN_RAY_LENGTH {
        return None;
    }
    let cos = ((ux * vx + uy * vy) / (nu * nv)).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}

/// Unsigned angle of the line from `left` to `right` against the horizontal,
/// in degrees `[0, 180]`.
///
/// This is a 2-D tilt of the projected line, not a torso twist. Values depend
/// on the camera looking roughly perpendicular to the swing plane.
///
/// Returns `None` when the points are closer than [`MIN_RAY_LENGTH`].
pub fn segment_rotation(left: &LandmarkSample, right: &LandmarkSample) -> Option<f64> {
    let (dx, dy) = (right.x - left.x, right.y - left.y);
    if dx.hypot(dy) < MIN_RAY_LENGTH {
        return None;
    }
    Some(dy.atan2(dx).to_degrees().abs())
}

/// Per-frame joint angle at `b`; holes wherever any point is missing or the
/// geometry is degenerate.
pub fn joint_angle_series(a: &Trajectory, b: &Trajectory, c: &Trajectory) -> Vec<Option<f64>> {
    a.points()
        .iter()
        .zip(b.points())
        .zip(c.points())
        .map(|((a, b), c)| joint_angle(a.as_ref()?, b.as_ref()?, c.as_ref()?))
        .collect()
}

/// Per-frame line tilt; holes wherever either end is missing or the ends
/// coincide.
pub fn segment_rotation_series(left: &Trajectory, right: &Trajectory) -> Vec<Option<f64>> {
    left.points()
        .iter()
        .zip(right.points())
        .map(|(l, r)| segment_rotation(l.as_ref()?, r.as_ref()?))
        .collect()
}

/// Coefficient-of-variation smoothness of a path, in `[0, 1]`.
///
/// Holes are dropped. Fewer than three remaining points yields `0.0`, which
/// callers must treat as unknown. A motionless path is perfectly smooth.
pub fn trajectory_smoothness(points: &[Option<LandmarkSample>]) -> f64 {
    let valid: Vec<&LandmarkSample> = points.iter().flatten().collect();
    if valid.len() < 3 {
        return 0.0;
    }
    let speeds: Vec<f64> = valid
        .windows(2)
        .map(|w| (w[1].x - w[0].x).hypot(w[1].y - w[0].y))
        .collect();
    let avg = mean(&speeds);
    if avg == 0.0 {
        return 1.0;
    }
    let cv = (std_deviation(&speeds) / avg).min(1.0);
    (1.0 - cv).max(0.0)
}

/// Curvature smoothness `1 - mean_turn / π`, in `[0, 1]`.
///
/// The turn is the angle between consecutive steps. `None` when fewer than
/// three points remain or no pair of non-zero steps exists.
pub fn path_curvature_smoothness(points: &[Option<LandmarkSample>]) -> Option<f64> {
    let valid: Vec<&LandmarkSample> = points.iter().flatten().collect();
    if valid.len() < 3 {
        return None;
    }
    let turns: Vec<f64> = valid
        .windows(3)
        .filter_map(|w| {
            let (ux, uy) = (w[1].x - w[0].x, w[1].y - w[0].y);
            let (vx, vy) = (w[2].x - w[1].x, w[2].y - w[1].y);
            let (nu, nv) = (ux.hypot(uy), vx.hypot(vy));
            if nu == 0.0 || nv == 0.0 {
                return None;
            }
            Some(((ux * vx + uy * vy) / (nu * nv)).clamp(-1.0, 1.0).acos())
        })
        .collect();
    if turns.is_empty() {
        return None;
    }
    Some((1.0 - mean(&turns) / PI).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> LandmarkSample {
        LandmarkSample::new(x, y)
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_joint_angle_right_angle() {
        let angle = joint_angle(&p(1.0, 0.0), &p(0.0, 0.0), &p(0.0, 1.0)).unwrap();
        assert!(approx(angle, 90.0));
    }

    #[test]
    fn test_joint_angle_symmetric() {
        let (a, b, c) = (p(0.2, 0.3), p(0.5, 0.5), p(0.7, 0.9));
        let forward = joint_angle(&a, &b, &c).unwrap();
        let backward = joint_angle(&c, &b, &a).unwrap();
        assert!(approx(forward, backward));
    }

    #[test]
    fn test_joint_angle_collinear_and_coincident_rays() {
        let straight = joint_angle(&p(0.0, 0.0), &p(0.5, 0.5), &p(1.0, 1.0)).unwrap();
        assert!(approx(straight, 180.0));
        let folded = joint_angle(&p(1.0, 1.0), &p(0.5, 0.5), &p(0.75, 0.75)).unwrap();
        assert!(approx(folded, 0.0));
    }

    #[test]
    fn test_joint_angle_degenerate_ray() {
        assert!(joint_angle(&p(0.5, 0.5), &p(0.5, 0.5), &p(0.0, 1.0)).is_none());
        assert!(joint_angle(&p(0.0, 1.0), &p(0.5, 0.5), &p(0.5, 0.5 + 1e-9)).is_none());
    }

    #[test]
    fn test_segment_rotation() {
        assert!(approx(segment_rotation(&p(0.4, 0.5), &p(0.6, 0.5)).unwrap(), 0.0));
        assert!(approx(segment_rotation(&p(0.5, 0.4), &p(0.5, 0.6)).unwrap(), 90.0));
        assert!(approx(segment_rotation(&p(0.6, 0.5), &p(0.4, 0.5)).unwrap(), 180.0));
        // Unsigned: tilting either way gives the same magnitude
        let up = segment_rotation(&p(0.4, 0.5), &p(0.6, 0.4)).unwrap();
        let down = segment_rotation(&p(0.4, 0.5), &p(0.6, 0.6)).unwrap();
        assert!(approx(up, down));
    }

    #[test]
    fn test_segment_rotation_coincident_points() {
        assert!(segment_rotation(&p(0.5, 0.5), &p(0.5, 0.5)).is_none());
        assert!(segment_rotation(&p(0.5, 0.5), &p(0.5, 0.5 + 1e-9)).is_none());
    }

    #[test]
    fn test_rotation_series_drops_degenerate_frames() {
        use serve_models::{FramePose, Landmark, PoseSequence};

        let seq = PoseSequence::new(vec![
            FramePose::detected(
                0,
                0.0,
                [(Landmark::LeftShoulder, p(0.4, 0.5)), (Landmark::RightShoulder, p(0.6, 0.5))],
            ),
            FramePose::detected(
                1,
                0.1,
                [(Landmark::LeftShoulder, p(0.5, 0.5)), (Landmark::RightShoulder, p(0.5, 0.5))],
            ),
            FramePose::detected(2, 0.2, [(Landmark::RightShoulder, p(0.6, 0.5))]),
        ]);
        let left = Trajectory::extract(&seq, Landmark::LeftShoulder);
        let right = Trajectory::extract(&seq, Landmark::RightShoulder);
        let tilts = segment_rotation_series(&left, &right);
        assert_eq!(tilts.len(), 3);
        assert!(approx(tilts[0].unwrap(), 0.0));
        assert_eq!(tilts[1], None);
        assert_eq!(tilts[2], None);
    }

    #[test]
    fn test_smoothness_needs_three_points() {
        assert_eq!(trajectory_smoothness(&[Some(p(0.0, 0.0)), None, Some(p(1.0, 1.0))]), 0.0);
    }

    #[test]
    fn test_smoothness_constant_speed_and_still() {
        let even: Vec<_> = (0..6).map(|i| Some(p(i as f64 * 0.1, 0.5))).collect();
        assert!(approx(trajectory_smoothness(&even), 1.0));

        let still = vec![Some(p(0.3, 0.3)); 4];
        assert_eq!(trajectory_smoothness(&still), 1.0);
    }

    #[test]
    fn test_smoothness_skips_holes() {
        let points = vec![Some(p(0.0, 0.0)), None, Some(p(0.1, 0.0)), None, Some(p(0.2, 0.0))];
        assert!(approx(trajectory_smoothness(&points), 1.0));
    }

    #[test]
    fn test_smoothness_jerky_path_is_lower() {
        let jerky = vec![
            Some(p(0.0, 0.0)),
            Some(p(0.01, 0.0)),
            Some(p(0.3, 0.0)),
            Some(p(0.31, 0.0)),
            Some(p(0.6, 0.0)),
        ];
        let score = trajectory_smoothness(&jerky);
        assert!(score < 0.2, "got {score}");
        assert!(score >= 0.0);
    }

    #[test]
    fn test_curvature_smoothness() {
        let line: Vec<_> = (0..5).map(|i| Some(p(i as f64 * 0.1, 0.2))).collect();
        assert!(approx(path_curvature_smoothness(&line).unwrap(), 1.0));

        let zigzag = vec![Some(p(0.0, 0.0)), Some(p(0.1, 0.0)), Some(p(0.0, 0.0))];
        assert!(approx(path_curvature_smoothness(&zigzag).unwrap(), 0.0));

        assert!(path_curvature_smoothness(&[Some(p(0.0, 0.0)), Some(p(0.1, 0.0))]).is_none());
        assert!(path_curvature_smoothness(&vec![Some(p(0.2, 0.2)); 3]).is_none());
    }
}
