pub mod clock;

pub use clock::{Clock, ManualClock, MonotonicClock};

use std::path::Path;

/// Number of machine axes a status snapshot carries (X,Y,Z,A,B,C,U,V,W).
pub const AXIS_COUNT: usize = 9;

/// One refreshed view of the machine state, as pulled from the motion
/// controller's status channel.
///
/// Positions and offsets are indexed in the fixed axis order
/// X,Y,Z,A,B,C,U,V,W. I/O arrays are indexed by the controller's own
/// pin numbering; their lengths are implementation-defined.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MachineSnapshot {
    /// Absolute axis positions in machine units.
    pub position: [f64; AXIS_COUNT],
    /// Active work coordinate system offset (G54..G59).
    pub work_offset: [f64; AXIS_COUNT],
    /// Fixture offset (G92).
    pub fixture_offset: [f64; AXIS_COUNT],
    /// Tool length/geometry offset.
    pub tool_offset: [f64; AXIS_COUNT],
    pub digital_in: Vec<bool>,
    pub digital_out: Vec<bool>,
    pub analog_in: Vec<f64>,
    pub analog_out: Vec<f64>,
}

/// Periodic-pull provider of machine position, offsets and I/O state.
///
/// Implementations: a live motion-controller adapter, or recorded
/// playback for tests and offline runs.
pub trait MachineStatusSource {
    fn poll(&mut self) -> Result<MachineSnapshot, Box<dyn std::error::Error + Send + Sync>>;
}

/// Load/save of the script text. Kept minimal so the core never touches
/// the filesystem directly.
pub trait ScriptStore {
    fn open(&mut self, path: &Path) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;
    fn save(
        &mut self,
        path: &Path,
        text: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
