//! Assembly of one log line from the current sample and move selection.

use crate::error::LogError;
use crate::{arc, AxisSample, LogEntry, MoveSpec};

/// Compose one log line.
///
/// With no move spec the line is a comma-joined list of axis values plus
/// the comment (simple mode). With a move spec the line is a G-code
/// statement: move word, axis words in fixed order, feed word for
/// non-rapid moves, I/J words for arcs (solved from `last_position` to
/// the current X/Y), and a `;comment` suffix when the comment is
/// non-empty.
///
/// Pure: on success the caller is responsible for recording the sample's
/// X/Y as the next arc start point.
pub fn compose(
    sample: &AxisSample,
    move_spec: Option<&MoveSpec>,
    last_position: Option<[f64; 2]>,
    comment: &str,
    precision: usize,
) -> Result<LogEntry, LogError> {
    match move_spec {
        Some(spec) => compose_move(sample, spec, last_position, comment, precision),
        None => Ok(compose_simple(sample, comment, precision)),
    }
}

fn compose_simple(sample: &AxisSample, comment: &str, precision: usize) -> LogEntry {
    let mut parts: Vec<String> = sample
        .iter()
        .map(|(_, v)| format!("{v:.precision$}"))
        .collect();
    if !comment.is_empty() {
        parts.push(comment.to_string());
    }
    LogEntry::new(parts.join(", "))
}

fn compose_move(
    sample: &AxisSample,
    spec: &MoveSpec,
    last_position: Option<[f64; 2]>,
    comment: &str,
    precision: usize,
) -> Result<LogEntry, LogError> {
    let gcode = spec.kind.gcode();
    let mut words: Vec<String> = Vec::with_capacity(8);
    words.push(gcode.to_string());
    for (axis, v) in sample.iter() {
        words.push(format!("{}{v:.precision$}", axis.letter()));
    }
    if spec.kind.requires_feed() {
        let feed = spec
            .feed_rate
            .filter(|f| f.is_finite() && *f > 0.0)
            .ok_or(LogError::MissingFeedRate { gcode })?;
        words.push(format!("F{feed}"));
    }
    if spec.kind.is_arc() {
        let radius = spec
            .arc_radius
            .filter(|r| r.is_finite() && *r > 0.0)
            .ok_or(LogError::MissingArcRadius { gcode })?;
        let start = last_position.ok_or(LogError::NoPriorPosition)?;
        let end = sample
            .planar_position()
            .ok_or(LogError::PlanarAxesRequired)?;
        let direction = spec
            .kind
            .arc_direction()
            .ok_or(LogError::PlanarAxesRequired)?;
        let sol = arc::solve(start, end, radius, direction)?;
        words.push(format!("I{:.precision$} J{:.precision$}", sol.i, sol.j));
    }
    if !comment.is_empty() {
        words.push(format!(";{comment}"));
    }
    Ok(LogEntry::new(words.join(" ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Axis, MoveKind, PositionMode};
    use poslog_traits::MachineSnapshot;

    fn sample(x: f64, y: f64, z: f64) -> AxisSample {
        let mut snap = MachineSnapshot::default();
        snap.position[Axis::X.index()] = x;
        snap.position[Axis::Y.index()] = y;
        snap.position[Axis::Z.index()] = z;
        AxisSample::from_snapshot(
            &snap,
            &[Axis::X, Axis::Y, Axis::Z],
            PositionMode::Absolute,
        )
    }

    #[test]
    fn simple_mode_joins_values_and_comment() {
        let entry = compose(&sample(1.0, 2.5, -0.125), None, None, "probe point", 3).unwrap();
        assert_eq!(entry.as_str(), "1.000, 2.500, -0.125, probe point");
    }

    #[test]
    fn simple_mode_without_comment_has_no_trailing_separator() {
        let entry = compose(&sample(1.0, 2.0, 3.0), None, None, "", 2).unwrap();
        assert_eq!(entry.as_str(), "1.00, 2.00, 3.00");
    }

    #[test]
    fn linear_move_renders_feed_word() {
        let spec = MoveSpec {
            kind: MoveKind::Linear,
            feed_rate: Some(30.0),
            arc_radius: None,
        };
        let entry = compose(&sample(1.0, 2.0, 3.0), Some(&spec), None, "", 4).unwrap();
        assert_eq!(entry.as_str(), "G1 X1.0000 Y2.0000 Z3.0000 F30");
    }

    #[test]
    fn rapid_move_takes_no_feed() {
        let spec = MoveSpec {
            kind: MoveKind::Rapid,
            feed_rate: None,
            arc_radius: None,
        };
        let entry = compose(&sample(0.0, 0.0, 5.0), Some(&spec), None, "clearance", 1).unwrap();
        assert_eq!(entry.as_str(), "G0 X0.0 Y0.0 Z5.0 ;clearance");
    }

    #[test]
    fn missing_feed_rejects_linear_move() {
        let spec = MoveSpec {
            kind: MoveKind::Linear,
            feed_rate: None,
            arc_radius: None,
        };
        let err = compose(&sample(1.0, 2.0, 3.0), Some(&spec), None, "", 4).unwrap_err();
        assert_eq!(err, LogError::MissingFeedRate { gcode: "G1" });
    }

    #[test]
    fn arc_without_prior_position_is_rejected() {
        let spec = MoveSpec {
            kind: MoveKind::ArcCw,
            feed_rate: Some(20.0),
            arc_radius: Some(5.0),
        };
        let err = compose(&sample(10.0, 0.0, 0.0), Some(&spec), None, "", 4).unwrap_err();
        assert_eq!(err, LogError::NoPriorPosition);
    }

    #[test]
    fn arc_move_appends_center_offsets() {
        let spec = MoveSpec {
            kind: MoveKind::ArcCw,
            feed_rate: Some(20.0),
            arc_radius: Some(5.0),
        };
        let entry = compose(
            &sample(10.0, 0.0, 0.0),
            Some(&spec),
            Some([0.0, 0.0]),
            "",
            4,
        )
        .unwrap();
        assert_eq!(entry.as_str(), "G2 X10.0000 Y0.0000 Z0.0000 F20 I5.0000 J0.0000");
    }

    #[test]
    fn arc_solver_errors_propagate_unchanged() {
        let spec = MoveSpec {
            kind: MoveKind::ArcCcw,
            feed_rate: Some(20.0),
            arc_radius: Some(4.0),
        };
        let err = compose(
            &sample(10.0, 0.0, 0.0),
            Some(&spec),
            Some([0.0, 0.0]),
            "",
            4,
        )
        .unwrap_err();
        assert!(matches!(err, LogError::RadiusTooSmall { .. }));
    }

    #[test]
    fn arc_without_planar_axes_is_rejected() {
        let mut snap = MachineSnapshot::default();
        snap.position[Axis::Z.index()] = 3.0;
        let z_only = AxisSample::from_snapshot(&snap, &[Axis::Z], PositionMode::Absolute);
        let spec = MoveSpec {
            kind: MoveKind::ArcCw,
            feed_rate: Some(20.0),
            arc_radius: Some(5.0),
        };
        let err = compose(&z_only, Some(&spec), Some([0.0, 0.0]), "", 4).unwrap_err();
        assert_eq!(err, LogError::PlanarAxesRequired);
    }
}
