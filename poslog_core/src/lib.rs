#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Position-logging engine (controller-agnostic).
//!
//! This crate turns periodically sampled machine state into G-code/log
//! lines. All machine interaction goes through
//! `poslog_traits::MachineStatusSource` and `poslog_traits::ScriptStore`.
//!
//! ## Architecture
//!
//! - **Edge detection**: latched digital/analog triggers (`edge` module)
//! - **Arc geometry**: I/J center-offset solver for G2/G3 (`arc` module)
//! - **Composition**: one log line per event (`compose` module)
//! - **Script document**: prescript/log/postscript regions (`script` module)
//! - **Controller**: the cooperative polling loop glue (`controller`)

// Module declarations
pub mod arc;
pub mod compose;
pub mod controller;
pub mod conversions;
pub mod edge;
pub mod error;
pub mod mocks;
pub mod script;

pub use arc::{ArcDirection, ArcSolution};
pub use controller::{ControllerCfg, LoggingController, TickReport, Trigger};
pub use edge::{AnalogChannelCfg, Comparator, DigitalChannelCfg, EdgeState, TriggerLogic};
pub use error::LogError;
pub use script::ScriptDocument;

use poslog_traits::MachineSnapshot;

/// The nine machine axes, in the fixed rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
    A,
    B,
    C,
    U,
    V,
    W,
}

impl Axis {
    pub const ALL: [Axis; 9] = [
        Axis::X,
        Axis::Y,
        Axis::Z,
        Axis::A,
        Axis::B,
        Axis::C,
        Axis::U,
        Axis::V,
        Axis::W,
    ];

    /// Position of this axis in the status-channel arrays.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn letter(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
            Axis::A => "A",
            Axis::B => "B",
            Axis::C => "C",
            Axis::U => "U",
            Axis::V => "V",
            Axis::W => "W",
        }
    }

    pub fn from_letter(s: &str) -> Option<Axis> {
        match s.to_ascii_uppercase().as_str() {
            "X" => Some(Axis::X),
            "Y" => Some(Axis::Y),
            "Z" => Some(Axis::Z),
            "A" => Some(Axis::A),
            "B" => Some(Axis::B),
            "C" => Some(Axis::C),
            "U" => Some(Axis::U),
            "V" => Some(Axis::V),
            "W" => Some(Axis::W),
            _ => None,
        }
    }
}

/// Whether positions are displayed machine-absolute or with the work,
/// fixture and tool offsets applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositionMode {
    #[default]
    Relative,
    Absolute,
}

/// Read-only snapshot of the enabled axes taken on one poll, values in
/// fixed axis order at full precision. Rounding happens only when a line
/// is rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisSample {
    mode: PositionMode,
    values: Vec<(Axis, f64)>,
}

impl AxisSample {
    /// Build a sample from a status snapshot, restricted to `axes`
    /// (normalized to the fixed axis order, duplicates ignored).
    pub fn from_snapshot(snap: &MachineSnapshot, axes: &[Axis], mode: PositionMode) -> Self {
        let values = Axis::ALL
            .iter()
            .copied()
            .filter(|a| axes.contains(a))
            .map(|a| {
                let i = a.index();
                let v = match mode {
                    PositionMode::Absolute => snap.position[i],
                    PositionMode::Relative => {
                        // Offsets are summed with a negative sign, then
                        // applied to the absolute position.
                        snap.position[i]
                            - (snap.work_offset[i] + snap.fixture_offset[i] + snap.tool_offset[i])
                    }
                };
                (a, v)
            })
            .collect();
        Self { mode, values }
    }

    pub fn mode(&self) -> PositionMode {
        self.mode
    }

    pub fn value(&self, axis: Axis) -> Option<f64> {
        self.values
            .iter()
            .find(|(a, _)| *a == axis)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Axis, f64)> + '_ {
        self.values.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The X/Y pair used as the planar arc end point, when both axes are
    /// part of the sample.
    pub fn planar_position(&self) -> Option<[f64; 2]> {
        Some([self.value(Axis::X)?, self.value(Axis::Y)?])
    }
}

/// Move type selection for composed lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    Rapid,
    Linear,
    ArcCw,
    ArcCcw,
}

impl MoveKind {
    pub fn gcode(self) -> &'static str {
        match self {
            MoveKind::Rapid => "G0",
            MoveKind::Linear => "G1",
            MoveKind::ArcCw => "G2",
            MoveKind::ArcCcw => "G3",
        }
    }

    /// Rapid moves take no feed word; everything else requires one.
    pub fn requires_feed(self) -> bool {
        !matches!(self, MoveKind::Rapid)
    }

    pub fn is_arc(self) -> bool {
        matches!(self, MoveKind::ArcCw | MoveKind::ArcCcw)
    }

    pub fn arc_direction(self) -> Option<ArcDirection> {
        match self {
            MoveKind::ArcCw => Some(ArcDirection::Cw),
            MoveKind::ArcCcw => Some(ArcDirection::Ccw),
            _ => None,
        }
    }
}

/// Selected move type plus its parameters. Feed is required for
/// linear/arc moves, radius for arcs; both are validated at compose time
/// so an incomplete spec rejects the log attempt instead of emitting a
/// bad line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveSpec {
    pub kind: MoveKind,
    pub feed_rate: Option<f64>,
    pub arc_radius: Option<f64>,
}

/// One immutable logged line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry(String);

impl LogEntry {
    pub fn new(line: impl Into<String>) -> Self {
        Self(line.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod axis_tests {
    use super::*;

    #[test]
    fn all_order_matches_status_indexing() {
        assert_eq!(Axis::X.index(), 0);
        assert_eq!(Axis::W.index(), 8);
        for (i, a) in Axis::ALL.iter().enumerate() {
            assert_eq!(a.index(), i);
        }
    }

    #[test]
    fn from_letter_is_case_insensitive() {
        assert_eq!(Axis::from_letter("x"), Some(Axis::X));
        assert_eq!(Axis::from_letter("W"), Some(Axis::W));
        assert_eq!(Axis::from_letter("Q"), None);
    }

    #[test]
    fn sample_normalizes_axis_order() {
        let mut snap = MachineSnapshot::default();
        snap.position[0] = 1.0;
        snap.position[1] = 2.0;
        snap.position[2] = 3.0;
        let sample =
            AxisSample::from_snapshot(&snap, &[Axis::Z, Axis::X, Axis::Y], PositionMode::Absolute);
        let axes: Vec<Axis> = sample.iter().map(|(a, _)| a).collect();
        assert_eq!(axes, vec![Axis::X, Axis::Y, Axis::Z]);
    }

    #[test]
    fn relative_mode_sums_and_negates_offsets() {
        let mut snap = MachineSnapshot::default();
        snap.position[0] = 10.0;
        snap.work_offset[0] = 2.0;
        snap.fixture_offset[0] = 0.5;
        snap.tool_offset[0] = 1.5;
        let sample = AxisSample::from_snapshot(&snap, &[Axis::X], PositionMode::Relative);
        assert!((sample.value(Axis::X).unwrap() - 6.0).abs() < 1e-12);
    }
}
