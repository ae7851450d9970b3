//! Test and helper mocks for poslog_core

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use poslog_traits::{MachineSnapshot, MachineStatusSource, ScriptStore};

/// Recorded-playback status source: replays a fixed frame sequence and
/// holds the last frame once exhausted. Useful for driving the polling
/// loop deterministically in tests and offline runs.
pub struct PlaybackSource {
    frames: Vec<MachineSnapshot>,
    pos: usize,
}

impl PlaybackSource {
    pub fn new(frames: Vec<MachineSnapshot>) -> Self {
        Self { frames, pos: 0 }
    }

    /// Frames remaining before the source starts holding the last one.
    pub fn remaining(&self) -> usize {
        self.frames.len().saturating_sub(self.pos)
    }
}

impl MachineStatusSource for PlaybackSource {
    fn poll(&mut self) -> Result<MachineSnapshot, Box<dyn std::error::Error + Send + Sync>> {
        if self.frames.is_empty() {
            return Err(Box::new(std::io::Error::other("playback trace is empty")));
        }
        let i = self.pos.min(self.frames.len() - 1);
        if self.pos < self.frames.len() {
            self.pos += 1;
        }
        Ok(self.frames[i].clone())
    }
}

/// A source that always errors on poll; useful for exercising the
/// status-error path of the controller.
pub struct DeadSource;

impl MachineStatusSource for DeadSource {
    fn poll(&mut self) -> Result<MachineSnapshot, Box<dyn std::error::Error + Send + Sync>> {
        Err(Box::new(std::io::Error::other("status channel down")))
    }
}

/// In-memory script store. Clones share the same backing map so a test
/// can keep a handle while the controller owns the boxed store.
#[derive(Default, Clone)]
pub struct MemoryStore {
    files: Arc<Mutex<HashMap<PathBuf, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, String>> {
        self.files.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn contents(&self, path: &Path) -> Option<String> {
        self.lock().get(path).cloned()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.lock().insert(path.into(), text.into());
    }
}

impl ScriptStore for MemoryStore {
    fn open(&mut self, path: &Path) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        match self.lock().get(path).cloned() {
            Some(text) => Ok(text),
            None => Err(Box::new(std::io::Error::other("no such script"))),
        }
    }

    fn save(
        &mut self,
        path: &Path,
        text: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.lock().insert(path.to_path_buf(), text.to_string());
        Ok(())
    }
}
