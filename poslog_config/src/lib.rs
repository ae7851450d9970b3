#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas and playback-trace parsing for the position logger.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - The playback CSV loader enforces headers and yields one machine
//!   sample per row for offline/test runs of the polling loop.
use serde::Deserialize;

/// Playback CSV schema.
///
/// Expected headers:
/// x,y,z,din,dout,ain,aout
///
/// Example:
/// x,y,z,din,dout,ain,aout
/// 0.0,0.0,1.5,false,false,0.0,0.0
/// 10.0,5.0,1.5,true,false,6.2,0.0
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct PlaybackRow {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub din: bool,
    pub dout: bool,
    pub ain: f64,
    pub aout: f64,
}

/// One playback trace row becomes a full snapshot with the traced
/// channels at index 0 and everything else quiescent. Positions land
/// in the snapshot's fixed X,Y,Z slots (indices 0..3).
impl From<&PlaybackRow> for poslog_traits::MachineSnapshot {
    fn from(r: &PlaybackRow) -> Self {
        let mut snap = poslog_traits::MachineSnapshot::default();
        snap.position[0] = r.x;
        snap.position[1] = r.y;
        snap.position[2] = r.z;
        snap.digital_in = vec![r.din];
        snap.digital_out = vec![r.dout];
        snap.analog_in = vec![r.ain];
        snap.analog_out = vec![r.aout];
        snap
    }
}

/// Axis selection and display formatting.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FormatCfg {
    /// Axis letters to include in every log line, e.g. ["X", "Y", "Z"].
    /// Rendered in the fixed machine order X,Y,Z,A,B,C,U,V,W regardless
    /// of the order given here.
    pub axes: Vec<String>,
    /// Decimal places used when rendering positions and arc offsets.
    pub precision: usize,
    /// "relative" (offsets applied) or "absolute" machine coordinates.
    pub position_mode: PositionModeCfg,
    /// Free-form comment appended to each logged line.
    pub comment: String,
}

impl Default for FormatCfg {
    fn default() -> Self {
        Self {
            axes: vec!["X".into(), "Y".into(), "Z".into()],
            precision: 4,
            position_mode: PositionModeCfg::Relative,
            comment: String::new(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PositionModeCfg {
    #[default]
    Relative,
    Absolute,
}

/// Selected move type for composed lines. Absent `[move]` section means
/// simple coordinate/comment lines instead of G-code statements.
#[derive(Debug, Deserialize)]
pub struct MoveCfg {
    pub kind: MoveKindCfg,
    /// Required for linear and arc moves; must be > 0.
    pub feed_rate: Option<f64>,
    /// Required for arc moves; must be > 0.
    pub arc_radius: Option<f64>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MoveKindCfg {
    Rapid,
    Linear,
    ArcCw,
    ArcCcw,
}

/// Polling cadence of the status channel.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PollCfg {
    /// Timer period in milliseconds for the status poll.
    pub period_ms: u64,
}

impl Default for PollCfg {
    fn default() -> Self {
        Self { period_ms: 100 }
    }
}

/// Interval recorder: while recording is active, force a log every
/// `interval_s` seconds in addition to edge-triggered logs.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RecordCfg {
    pub interval_s: u64,
    /// Start recording immediately when the loop starts.
    pub autostart: bool,
}

impl Default for RecordCfg {
    fn default() -> Self {
        Self {
            interval_s: 5,
            autostart: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TriggerLogicCfg {
    #[default]
    ActiveHigh,
    ActiveLow,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ComparatorCfg {
    #[default]
    GreaterThan,
    LessThan,
}

/// One watched boolean line.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct DigitalChannelCfg {
    pub index: usize,
    pub enabled: bool,
    pub logic: TriggerLogicCfg,
}

impl Default for DigitalChannelCfg {
    fn default() -> Self {
        Self {
            index: 0,
            enabled: false,
            logic: TriggerLogicCfg::ActiveHigh,
        }
    }
}

/// One watched analog line with on/off thresholds.
///
/// The off comparator is always the complement of `on_comparator`, so it
/// is not configurable. For `greater_than` the on threshold must sit
/// above the off threshold; for `less_than`, below.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct AnalogChannelCfg {
    pub index: usize,
    pub enabled: bool,
    pub on_threshold: f64,
    pub off_threshold: f64,
    pub on_comparator: ComparatorCfg,
}

impl Default for AnalogChannelCfg {
    fn default() -> Self {
        Self {
            index: 0,
            enabled: false,
            on_threshold: 1.0,
            off_threshold: 0.0,
            on_comparator: ComparatorCfg::GreaterThan,
        }
    }
}

/// The four watched channels, one per channel kind.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct TriggersCfg {
    pub digital_in: DigitalChannelCfg,
    pub digital_out: DigitalChannelCfg,
    pub analog_in: AnalogChannelCfg,
    pub analog_out: AnalogChannelCfg,
}

/// Script file handling and the fixed header/footer blocks.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ScriptCfg {
    /// Target script file (.ngc or .txt). Optional until first save.
    pub path: Option<String>,
    /// Save the script after every successful log.
    pub autosave: bool,
    pub prescript_enabled: bool,
    pub postscript_enabled: bool,
    /// Fixed lines written before the log region.
    pub prescript: Vec<String>,
    /// Fixed lines written after the log region.
    pub postscript: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub format: FormatCfg,
    /// Optional move-type section; absent means simple logging mode.
    #[serde(rename = "move")]
    pub move_type: Option<MoveCfg>,
    pub poll: PollCfg,
    pub record: RecordCfg,
    pub triggers: TriggersCfg,
    pub script: ScriptCfg,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// The fixed machine axis letters, in rendering order.
pub const AXIS_LETTERS: [&str; 9] = ["X", "Y", "Z", "A", "B", "C", "U", "V", "W"];

impl AnalogChannelCfg {
    /// True when the on/off thresholds are ordered consistently with the
    /// on comparator. A misordered pair can never clear its latch.
    pub fn thresholds_consistent(&self) -> bool {
        match self.on_comparator {
            ComparatorCfg::GreaterThan => self.on_threshold > self.off_threshold,
            ComparatorCfg::LessThan => self.on_threshold < self.off_threshold,
        }
    }
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Format
        if self.format.axes.is_empty() {
            eyre::bail!("format.axes must name at least one axis");
        }
        for a in &self.format.axes {
            if !AXIS_LETTERS.contains(&a.to_ascii_uppercase().as_str()) {
                eyre::bail!("format.axes contains unknown axis letter '{a}'");
            }
        }
        if self.format.precision > 9 {
            eyre::bail!("format.precision must be <= 9");
        }

        // Move type
        if let Some(mv) = &self.move_type {
            if matches!(
                mv.kind,
                MoveKindCfg::Linear | MoveKindCfg::ArcCw | MoveKindCfg::ArcCcw
            ) {
                match mv.feed_rate {
                    Some(f) if f > 0.0 && f.is_finite() => {}
                    _ => eyre::bail!("move.feed_rate must be > 0 for linear and arc moves"),
                }
            }
            if matches!(mv.kind, MoveKindCfg::ArcCw | MoveKindCfg::ArcCcw) {
                match mv.arc_radius {
                    Some(r) if r > 0.0 && r.is_finite() => {}
                    _ => eyre::bail!("move.arc_radius must be > 0 for arc moves"),
                }
            }
        }

        // Timers
        if self.poll.period_ms == 0 {
            eyre::bail!("poll.period_ms must be >= 1");
        }
        if self.record.interval_s == 0 {
            eyre::bail!("record.interval_s must be >= 1");
        }

        // Analog trigger threshold ordering. An enabled but misordered
        // channel is still accepted here: the edge detector reports it as
        // a configuration error on every tick instead of firing, matching
        // the recoverable-error contract. Finiteness is a hard error.
        for (name, ch) in [
            ("triggers.analog_in", &self.triggers.analog_in),
            ("triggers.analog_out", &self.triggers.analog_out),
        ] {
            if !ch.on_threshold.is_finite() || !ch.off_threshold.is_finite() {
                eyre::bail!("{name} thresholds must be finite");
            }
        }

        // Script path extension, when given
        if let Some(p) = &self.script.path {
            let ok = p.ends_with(".ngc") || p.ends_with(".txt");
            if !ok {
                eyre::bail!("script.path must end in .ngc or .txt, got '{p}'");
            }
        }
        if self.script.autosave && self.script.path.is_none() {
            eyre::bail!("script.autosave requires script.path");
        }

        Ok(())
    }
}

pub fn load_playback_csv(path: &std::path::Path) -> eyre::Result<Vec<PlaybackRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open playback CSV {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let expected = ["x", "y", "z", "din", "dout", "ain", "aout"];
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != expected {
        eyre::bail!(
            "playback CSV must have headers 'x,y,z,din,dout,ain,aout', got: {}",
            actual.join(",")
        );
    }

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<PlaybackRow>().enumerate() {
        match rec {
            Ok(row) => rows.push(row),
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        }
    }
    if rows.is_empty() {
        eyre::bail!("playback CSV {:?} contains no samples", path);
    }
    Ok(rows)
}
