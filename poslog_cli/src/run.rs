//! Playback-driven execution: controller assembly, the tick loop and the
//! file-backed script store.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver};
use eyre::{Result, WrapErr};
use poslog_config::Config;
use poslog_core::mocks::PlaybackSource;
use poslog_core::{ControllerCfg, LoggingController, ScriptDocument};
use poslog_traits::{Clock, MachineSnapshot, ManualClock, ScriptStore};

/// Script store backed by the local filesystem.
pub struct FileStore;

impl ScriptStore for FileStore {
    fn open(&mut self, path: &Path) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        Ok(std::fs::read_to_string(path)?)
    }

    fn save(
        &mut self,
        path: &Path,
        text: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(std::fs::write(path, text)?)
    }
}

/// Ctrl-C delivery as a channel the tick loop can poll without blocking.
fn shutdown_channel() -> Result<Receiver<()>> {
    let (tx, rx) = bounded(1);
    ctrlc::set_handler(move || {
        let _ = tx.try_send(());
    })
    .wrap_err("install Ctrl-C handler")?;
    Ok(rx)
}

fn load_frames(playback: &Path) -> Result<Vec<MachineSnapshot>> {
    let rows = poslog_config::load_playback_csv(playback)?;
    Ok(rows.iter().map(MachineSnapshot::from).collect())
}

fn initial_document(cfg: &Config) -> ScriptDocument {
    let mut doc = ScriptDocument::new();
    doc.set_prescript(cfg.script.prescript.clone(), cfg.script.prescript_enabled);
    doc.set_postscript(cfg.script.postscript.clone(), cfg.script.postscript_enabled);
    doc
}

pub fn run(
    cfg: &Config,
    playback: &Path,
    out: Option<PathBuf>,
    record: bool,
    ticks: Option<usize>,
    summary: bool,
) -> Result<()> {
    let frames = load_frames(playback)?;
    let total = ticks.unwrap_or(frames.len());
    let period = Duration::from_millis(cfg.poll.period_ms);

    let mut ccfg = ControllerCfg::from(cfg);
    if let Some(path) = out {
        ccfg.script_path = Some(path);
    }
    let script_path = ccfg.script_path.clone();

    // Playback runs step a manual clock by one poll period per tick, so
    // interval recording behaves as it would live, without real sleeps.
    let clock = ManualClock::new();
    let mut ctrl = LoggingController::new(PlaybackSource::new(frames), ccfg)
        .with_store(Box::new(FileStore))
        .with_clock(Box::new(clock.clone()))
        .with_document(initial_document(cfg));
    if record || cfg.record.autostart {
        ctrl.start_recording();
    }

    let shutdown = shutdown_channel()?;
    let mut logged = 0usize;
    let mut errors = 0usize;
    let mut ticked = 0usize;
    for _ in 0..total {
        if shutdown.try_recv().is_ok() {
            tracing::info!("interrupted, stopping after {ticked} ticks");
            break;
        }
        let report = ctrl.tick()?;
        ticked += 1;
        for (trigger, entry) in &report.logged {
            logged += 1;
            tracing::info!(trigger = trigger.name(), line = %entry, "logged");
        }
        for (trigger, err) in &report.errors {
            errors += 1;
            tracing::warn!(trigger = trigger.name(), error = %err, "log attempt failed");
        }
        clock.sleep(period);
    }

    match &script_path {
        Some(path) => {
            ctrl.save_script(path)?;
            tracing::info!(path = %path.display(), lines = ctrl.document().log_len(), "script saved");
        }
        // No target file: emit the finished script on stdout.
        None => print!("{}", ctrl.document().serialize()),
    }

    if summary {
        let report = serde_json::json!({
            "ticks": ticked,
            "logged": logged,
            "errors": errors,
            "script_lines": ctrl.document().log_len(),
        });
        println!("{report}");
    }
    Ok(())
}

/// One-shot compose: poll the first trace row and print the line.
pub fn log_once(cfg: &Config, playback: &Path) -> Result<()> {
    let frames = load_frames(playback)?;
    let mut ctrl =
        LoggingController::new(PlaybackSource::new(frames), ControllerCfg::from(cfg));
    let entry = ctrl.manual_log()?;
    println!("{entry}");
    Ok(())
}

/// Parse a script file and print a region breakdown.
pub fn show(file: &Path) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .wrap_err_with(|| format!("read script {}", file.display()))?;
    let doc = ScriptDocument::load(&text);
    let state = |enabled: bool| if enabled { "enabled" } else { "disabled" };
    println!(
        "prescript: {} lines ({})",
        doc.prescript_lines().len(),
        state(doc.prescript_enabled())
    );
    println!("log: {} lines", doc.log_len());
    for line in doc.log_lines() {
        println!("  {line}");
    }
    println!(
        "postscript: {} lines ({})",
        doc.postscript_lines().len(),
        state(doc.postscript_enabled())
    );
    Ok(())
}
