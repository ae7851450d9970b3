//! Planar arc center-offset solver for G2/G3 moves.

use crate::error::LogError;
use std::f64::consts::FRAC_PI_2;

/// Winding of the arc as viewed from +Z. Cw maps to G2, Ccw to G3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcDirection {
    Cw,
    Ccw,
}

/// Center offset (I/J) relative to the arc start point, full precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSolution {
    pub i: f64,
    pub j: f64,
}

/// Compute the I/J center offset for an arc from `start` to `end` with
/// the requested radius.
///
/// The center sits on the chord's perpendicular bisector,
/// `sqrt(r^2 - (d/2)^2)` away from the midpoint; the bisector direction
/// is the travel angle rotated -90 degrees for Cw and +90 for Ccw.
/// Exactly one of the two candidate centers is produced per call, picked
/// by `direction`; there is no large-arc/small-arc choice.
pub fn solve(
    start: [f64; 2],
    end: [f64; 2],
    radius: f64,
    direction: ArcDirection,
) -> Result<ArcSolution, LogError> {
    let dx = end[0] - start[0];
    let dy = end[1] - start[1];
    if dx == 0.0 && dy == 0.0 {
        return Err(LogError::DegenerateMove);
    }
    let distance = dx.hypot(dy);
    let half_chord = distance / 2.0;
    if radius < half_chord {
        return Err(LogError::RadiusTooSmall {
            min_radius: half_chord,
        });
    }
    let travel_angle = dy.atan2(dx);
    // max(0.0) absorbs the tiny negative residue when radius == d/2.
    let center_offset = (radius * radius - half_chord * half_chord).max(0.0).sqrt();
    let offset_angle = match direction {
        ArcDirection::Cw => travel_angle - FRAC_PI_2,
        ArcDirection::Ccw => travel_angle + FRAC_PI_2,
    };
    Ok(ArcSolution {
        i: dx / 2.0 + center_offset * offset_angle.cos(),
        j: dy / 2.0 + center_offset * offset_angle.sin(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn semicircle_center_is_chord_midpoint() {
        let sol = solve([0.0, 0.0], [10.0, 0.0], 5.0, ArcDirection::Cw).unwrap();
        assert!((sol.i - 5.0).abs() < EPS);
        assert!(sol.j.abs() < EPS);
    }

    #[test]
    fn cw_and_ccw_centers_mirror_across_the_chord() {
        let cw = solve([0.0, 0.0], [10.0, 0.0], 10.0, ArcDirection::Cw).unwrap();
        let ccw = solve([0.0, 0.0], [10.0, 0.0], 10.0, ArcDirection::Ccw).unwrap();
        assert!((cw.i - ccw.i).abs() < EPS);
        assert!((cw.j + ccw.j).abs() < EPS);
        // Cw center lies -90 degrees off the +X travel direction.
        assert!(cw.j < 0.0);
    }

    #[test]
    fn center_is_radius_away_from_both_endpoints() {
        let start = [1.0, 2.0];
        let end = [4.0, 6.0];
        let radius = 4.0;
        let sol = solve(start, end, radius, ArcDirection::Ccw).unwrap();
        let cx = start[0] + sol.i;
        let cy = start[1] + sol.j;
        let to_start = (cx - start[0]).hypot(cy - start[1]);
        let to_end = (cx - end[0]).hypot(cy - end[1]);
        assert!((to_start - radius).abs() < EPS);
        assert!((to_end - radius).abs() < EPS);
    }

    #[test]
    fn zero_chord_is_degenerate() {
        let err = solve([0.0, 0.0], [0.0, 0.0], 5.0, ArcDirection::Cw).unwrap_err();
        assert_eq!(err, LogError::DegenerateMove);
    }

    #[test]
    fn radius_below_half_chord_reports_minimum() {
        let err = solve([0.0, 0.0], [10.0, 0.0], 4.0, ArcDirection::Cw).unwrap_err();
        match err {
            LogError::RadiusTooSmall { min_radius } => {
                assert!((min_radius - 5.0).abs() < EPS);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
