//! The polling-loop glue: samples the status source, runs the four edge
//! detectors in fixed order, and writes composed entries into the
//! script document.
//!
//! Single-threaded and cooperative: edge-triggered, interval and manual
//! logs all funnel through the same serialized compose path, so at most
//! one log composition is in flight at a time.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use poslog_traits::{Clock, MachineStatusSource, MonotonicClock, ScriptStore};

use crate::compose::compose;
use crate::edge::{
    evaluate_analog, evaluate_digital, AnalogChannelCfg, DigitalChannelCfg, EdgeState,
};
use crate::error::LogError;
use crate::script::ScriptDocument;
use crate::{Axis, AxisSample, LogEntry, MoveSpec, PositionMode};

/// Everything the controller needs to turn a snapshot into a line.
#[derive(Debug, Clone)]
pub struct ControllerCfg {
    pub axes: Vec<Axis>,
    pub mode: PositionMode,
    pub precision: usize,
    pub comment: String,
    /// `None` selects simple coordinate/comment lines.
    pub move_spec: Option<MoveSpec>,
    pub digital_in: DigitalChannelCfg,
    pub digital_out: DigitalChannelCfg,
    pub analog_in: AnalogChannelCfg,
    pub analog_out: AnalogChannelCfg,
    /// Interval recorder period; fires only while recording is active.
    pub interval_ms: u64,
    /// Save through the script store after every successful log.
    pub autosave: bool,
    pub script_path: Option<PathBuf>,
}

/// What caused a logged line within a tick. Operator-triggered logs go
/// through `manual_log`, which hands the entry straight back instead of
/// reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    DigitalIn,
    DigitalOut,
    AnalogIn,
    AnalogOut,
    Interval,
}

impl Trigger {
    pub fn name(self) -> &'static str {
        match self {
            Trigger::DigitalIn => "digital-in",
            Trigger::DigitalOut => "digital-out",
            Trigger::AnalogIn => "analog-in",
            Trigger::AnalogOut => "analog-out",
            Trigger::Interval => "interval",
        }
    }
}

/// Outcome of one tick: which triggers logged a line, and the
/// recoverable errors surfaced to the operator. Errors never stop the
/// loop.
#[derive(Debug, Default)]
pub struct TickReport {
    pub logged: Vec<(Trigger, LogEntry)>,
    pub errors: Vec<(Trigger, LogError)>,
}

/// Orchestrates edge detection and composition against one status
/// source. Edge latches live here for the whole session and are passed
/// to the detectors by value; a latch is committed only when the log it
/// fired actually succeeded, so a failed attempt re-arms the channel.
pub struct LoggingController<S: MachineStatusSource> {
    source: S,
    cfg: ControllerCfg,
    doc: ScriptDocument,
    store: Option<Box<dyn ScriptStore>>,
    clock: Arc<dyn Clock + Send + Sync>,
    epoch: Instant,
    din_state: EdgeState,
    dout_state: EdgeState,
    ain_state: EdgeState,
    aout_state: EdgeState,
    last_position: Option<[f64; 2]>,
    recording: bool,
    last_interval_ms: u64,
}

impl<S: MachineStatusSource> LoggingController<S> {
    pub fn new(source: S, cfg: ControllerCfg) -> Self {
        let clock: Arc<dyn Clock + Send + Sync> = Arc::new(MonotonicClock::new());
        let epoch = clock.now();
        Self {
            source,
            cfg,
            doc: ScriptDocument::new(),
            store: None,
            clock,
            epoch,
            din_state: EdgeState::default(),
            dout_state: EdgeState::default(),
            ain_state: EdgeState::default(),
            aout_state: EdgeState::default(),
            last_position: None,
            recording: false,
            last_interval_ms: 0,
        }
    }

    /// Attach a script store for open/save and autosave.
    pub fn with_store(mut self, store: Box<dyn ScriptStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Provide a custom clock; defaults to MonotonicClock.
    pub fn with_clock(mut self, clock: Box<dyn Clock + Send + Sync>) -> Self {
        self.clock = Arc::from(clock);
        self.epoch = self.clock.now();
        self
    }

    /// Start from an existing document (e.g. a loaded script).
    pub fn with_document(mut self, doc: ScriptDocument) -> Self {
        self.doc = doc;
        self
    }

    pub fn document(&self) -> &ScriptDocument {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut ScriptDocument {
        &mut self.doc
    }

    /// Switch the move type mid-session, e.g. from linear to arc once a
    /// start point has been logged.
    pub fn set_move_spec(&mut self, spec: Option<MoveSpec>) {
        self.cfg.move_spec = spec;
    }

    pub fn last_position(&self) -> Option<[f64; 2]> {
        self.last_position
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Arm the interval recorder. Edge triggers are unaffected.
    pub fn start_recording(&mut self) {
        self.recording = true;
        self.last_interval_ms = self.clock.ms_since(self.epoch);
    }

    /// Stop the interval recorder only; latched edges stay as they are.
    pub fn stop_recording(&mut self) {
        self.recording = false;
    }

    /// One poll of the status source: evaluate digital-in, digital-out,
    /// analog-in, analog-out in that fixed order, log for every fired
    /// channel, then run the interval recorder. Fails only when the
    /// source itself does; all log-level errors are reported in the
    /// returned `TickReport`.
    pub fn tick(&mut self) -> Result<TickReport, LogError> {
        let snap = self
            .source
            .poll()
            .map_err(|e| LogError::Status(e.to_string()))?;
        let sample = AxisSample::from_snapshot(&snap, &self.cfg.axes, self.cfg.mode);
        let mut report = TickReport::default();

        let din = snap
            .digital_in
            .get(self.cfg.digital_in.index)
            .copied()
            .unwrap_or(false);
        let (fire, next) = evaluate_digital(din, &self.cfg.digital_in, self.din_state);
        self.din_state = self.commit(fire, next, self.din_state, Trigger::DigitalIn, &sample, &mut report);

        let dout = snap
            .digital_out
            .get(self.cfg.digital_out.index)
            .copied()
            .unwrap_or(false);
        let (fire, next) = evaluate_digital(dout, &self.cfg.digital_out, self.dout_state);
        self.dout_state =
            self.commit(fire, next, self.dout_state, Trigger::DigitalOut, &sample, &mut report);

        let ain = snap
            .analog_in
            .get(self.cfg.analog_in.index)
            .copied()
            .unwrap_or(0.0);
        match evaluate_analog(ain, &self.cfg.analog_in, self.ain_state) {
            Ok((fire, next)) => {
                self.ain_state =
                    self.commit(fire, next, self.ain_state, Trigger::AnalogIn, &sample, &mut report);
            }
            // A disabled channel can never fire, so its misconfiguration
            // is not worth nagging about every tick.
            Err(e) => {
                if self.cfg.analog_in.enabled {
                    report.errors.push((Trigger::AnalogIn, e));
                }
            }
        }

        let aout = snap
            .analog_out
            .get(self.cfg.analog_out.index)
            .copied()
            .unwrap_or(0.0);
        match evaluate_analog(aout, &self.cfg.analog_out, self.aout_state) {
            Ok((fire, next)) => {
                self.aout_state =
                    self.commit(fire, next, self.aout_state, Trigger::AnalogOut, &sample, &mut report);
            }
            Err(e) => {
                if self.cfg.analog_out.enabled {
                    report.errors.push((Trigger::AnalogOut, e));
                }
            }
        }

        if self.recording && self.cfg.interval_ms > 0 {
            let now = self.clock.ms_since(self.epoch);
            if now.saturating_sub(self.last_interval_ms) >= self.cfg.interval_ms {
                match self.log_sample(&sample) {
                    Ok(entry) => {
                        self.last_interval_ms = now;
                        report.logged.push((Trigger::Interval, entry));
                    }
                    Err(e) => report.errors.push((Trigger::Interval, e)),
                }
            }
        }

        Ok(report)
    }

    /// Operator-triggered log: polls once and runs the same compose
    /// path as the edge triggers.
    pub fn manual_log(&mut self) -> Result<LogEntry, LogError> {
        let snap = self
            .source
            .poll()
            .map_err(|e| LogError::Status(e.to_string()))?;
        let sample = AxisSample::from_snapshot(&snap, &self.cfg.axes, self.cfg.mode);
        self.log_sample(&sample)
    }

    /// Load the script document from the store.
    pub fn open_script(&mut self, path: &std::path::Path) -> Result<(), LogError> {
        let store = self
            .store
            .as_mut()
            .ok_or_else(|| LogError::Store("no script store attached".into()))?;
        let text = store.open(path).map_err(|e| LogError::Store(e.to_string()))?;
        self.doc = ScriptDocument::load(&text);
        Ok(())
    }

    /// Save the script document through the store.
    pub fn save_script(&mut self, path: &std::path::Path) -> Result<(), LogError> {
        let text = self.doc.serialize();
        let store = self
            .store
            .as_mut()
            .ok_or_else(|| LogError::Store("no script store attached".into()))?;
        store
            .save(path, &text)
            .map_err(|e| LogError::Store(e.to_string()))
    }

    /// Commit the detector's next state. When the channel fired, the
    /// latch advances only if the log attempt succeeded; otherwise the
    /// old state stands and the condition can fire again later.
    fn commit(
        &mut self,
        fire: bool,
        next: EdgeState,
        prev: EdgeState,
        trigger: Trigger,
        sample: &AxisSample,
        report: &mut TickReport,
    ) -> EdgeState {
        if !fire {
            return next;
        }
        match self.log_sample(sample) {
            Ok(entry) => {
                report.logged.push((trigger, entry));
                next
            }
            Err(e) => {
                tracing::warn!(trigger = trigger.name(), error = %e, "log attempt failed");
                report.errors.push((trigger, e));
                prev
            }
        }
    }

    /// The single serialized log path: compose, write into the document
    /// (cursor replace or append), record the arc start point, autosave.
    fn log_sample(&mut self, sample: &AxisSample) -> Result<LogEntry, LogError> {
        let entry = compose(
            sample,
            self.cfg.move_spec.as_ref(),
            self.last_position,
            &self.cfg.comment,
            self.cfg.precision,
        )?;
        self.doc.write(entry.clone());
        self.last_position = sample.planar_position();
        if self.cfg.autosave {
            if let (Some(path), Some(store)) = (self.cfg.script_path.clone(), self.store.as_mut()) {
                let text = self.doc.serialize();
                if let Err(e) = store.save(&path, &text) {
                    // The entry is already in the document; a failed
                    // autosave must not undo the log.
                    tracing::warn!(path = %path.display(), error = %e, "autosave failed");
                }
            }
        }
        Ok(entry)
    }
}
