//! The operator-built script: prescript/log/postscript line regions.

use crate::LogEntry;

pub const PRESCRIPT_START: &str = ";prescript_start";
pub const PRESCRIPT_END: &str = ";prescript_end";
pub const POSTSCRIPT_START: &str = ";postscript_start";
pub const POSTSCRIPT_END: &str = ";postscript_end";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Prescript,
    Log,
    Postscript,
}

/// Ordered, mutable script text. The prescript and postscript regions
/// serialize only while enabled; log lines are always written, unmarked,
/// between them.
///
/// The insertion cursor, when set, makes the next written entry replace
/// the line at that index instead of appending; it is cleared after each
/// use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptDocument {
    prescript: Vec<String>,
    log: Vec<String>,
    postscript: Vec<String>,
    prescript_enabled: bool,
    postscript_enabled: bool,
    cursor: Option<usize>,
}

impl ScriptDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_prescript(&mut self, lines: Vec<String>, enabled: bool) {
        self.prescript = lines;
        self.prescript_enabled = enabled;
    }

    pub fn set_postscript(&mut self, lines: Vec<String>, enabled: bool) {
        self.postscript = lines;
        self.postscript_enabled = enabled;
    }

    pub fn prescript_lines(&self) -> &[String] {
        &self.prescript
    }

    pub fn log_lines(&self) -> &[String] {
        &self.log
    }

    pub fn postscript_lines(&self) -> &[String] {
        &self.postscript
    }

    pub fn prescript_enabled(&self) -> bool {
        self.prescript_enabled
    }

    pub fn postscript_enabled(&self) -> bool {
        self.postscript_enabled
    }

    pub fn log_len(&self) -> usize {
        self.log.len()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Arm the replace-at-index cursor, or disarm with `None`.
    pub fn set_cursor(&mut self, index: Option<usize>) {
        self.cursor = index;
    }

    pub fn append(&mut self, entry: LogEntry) {
        self.log.push(entry.into_string());
    }

    /// Insert a raw line into the log region, clamping to the end.
    pub fn insert_at(&mut self, index: usize, line: impl Into<String>) {
        let index = index.min(self.log.len());
        self.log.insert(index, line.into());
    }

    pub fn remove_at(&mut self, index: usize) -> Option<String> {
        if index < self.log.len() {
            Some(self.log.remove(index))
        } else {
            None
        }
    }

    /// Atomic replace: insert at `index` and drop the line that moved
    /// down, leaving the region length unchanged.
    pub fn replace_at(&mut self, index: usize, entry: LogEntry) {
        if index < self.log.len() {
            self.log.insert(index, entry.into_string());
            self.log.remove(index + 1);
        } else {
            self.log.push(entry.into_string());
        }
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
        self.cursor = None;
    }

    /// Write one composed entry: replace at the armed cursor (cleared
    /// after use, out-of-range falls back to append) or append.
    pub fn write(&mut self, entry: LogEntry) {
        match self.cursor.take() {
            Some(index) => self.replace_at(index, entry),
            None => self.append(entry),
        }
    }

    /// Render the whole document, bracketing enabled regions with the
    /// literal markers. Every line is newline-terminated.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        let mut push = |line: &str| {
            out.push_str(line);
            out.push('\n');
        };
        if self.prescript_enabled {
            push(PRESCRIPT_START);
            for l in &self.prescript {
                push(l);
            }
            push(PRESCRIPT_END);
        }
        for l in &self.log {
            push(l);
        }
        if self.postscript_enabled {
            push(POSTSCRIPT_START);
            for l in &self.postscript {
                push(l);
            }
            push(POSTSCRIPT_END);
        }
        out
    }

    /// Tolerant inverse of `serialize`: one forward scan, classifying
    /// each line by marker state, defaulting to the log region. A
    /// missing end marker keeps classifying lines into the last opened
    /// region; this never errors. Seeing a start marker enables that
    /// region so a serialize/load round trip is exact.
    pub fn load(text: &str) -> Self {
        let mut doc = Self::new();
        let mut region = Region::Log;
        for line in text.lines() {
            match line {
                PRESCRIPT_START => {
                    region = Region::Prescript;
                    doc.prescript_enabled = true;
                }
                PRESCRIPT_END | POSTSCRIPT_END => region = Region::Log,
                POSTSCRIPT_START => {
                    region = Region::Postscript;
                    doc.postscript_enabled = true;
                }
                _ => match region {
                    Region::Prescript => doc.prescript.push(line.to_string()),
                    Region::Log => doc.log.push(line.to_string()),
                    Region::Postscript => doc.postscript.push(line.to_string()),
                },
            }
        }
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_all_regions() -> ScriptDocument {
        let mut doc = ScriptDocument::new();
        doc.set_prescript(vec!["G21".into(), "G90".into()], true);
        doc.set_postscript(vec!["M2".into()], true);
        doc.append(LogEntry::new("G0 X0.0 Y0.0"));
        doc.append(LogEntry::new("G1 X1.0 Y1.0 F30"));
        doc
    }

    #[test]
    fn serialize_brackets_enabled_regions() {
        let doc = doc_with_all_regions();
        let text = doc.serialize();
        assert_eq!(
            text,
            ";prescript_start\nG21\nG90\n;prescript_end\nG0 X0.0 Y0.0\nG1 X1.0 Y1.0 F30\n;postscript_start\nM2\n;postscript_end\n"
        );
    }

    #[test]
    fn round_trip_preserves_document() {
        let doc = doc_with_all_regions();
        let loaded = ScriptDocument::load(&doc.serialize());
        assert_eq!(loaded, doc);
    }

    #[test]
    fn disabled_regions_are_omitted_from_serialization() {
        let mut doc = ScriptDocument::new();
        doc.set_prescript(vec!["G21".into()], false);
        doc.append(LogEntry::new("G0 X0.0"));
        assert_eq!(doc.serialize(), "G0 X0.0\n");
    }

    #[test]
    fn unterminated_prescript_keeps_classifying_into_it() {
        let text = ";prescript_start\nG21\nG90\nG0 X0.0\n";
        let doc = ScriptDocument::load(text);
        assert_eq!(doc.prescript_lines(), ["G21", "G90", "G0 X0.0"]);
        assert!(doc.log_lines().is_empty());
    }

    #[test]
    fn stray_end_marker_is_harmless() {
        let text = ";prescript_end\nG0 X0.0\n";
        let doc = ScriptDocument::load(text);
        assert_eq!(doc.log_lines(), ["G0 X0.0"]);
    }

    #[test]
    fn write_with_cursor_replaces_exactly_one_line() {
        let mut doc = doc_with_all_regions();
        let before = doc.log_len();
        doc.set_cursor(Some(0));
        doc.write(LogEntry::new("G1 X9.0 Y9.0 F30"));
        assert_eq!(doc.log_len(), before);
        assert_eq!(doc.log_lines()[0], "G1 X9.0 Y9.0 F30");
        assert_eq!(doc.log_lines()[1], "G1 X1.0 Y1.0 F30");
        assert_eq!(doc.cursor(), None, "cursor clears after use");
    }

    #[test]
    fn out_of_range_cursor_falls_back_to_append() {
        let mut doc = ScriptDocument::new();
        doc.append(LogEntry::new("a"));
        doc.set_cursor(Some(10));
        doc.write(LogEntry::new("b"));
        assert_eq!(doc.log_lines(), ["a", "b"]);
    }

    #[test]
    fn insert_and_remove_edit_the_log_region() {
        let mut doc = ScriptDocument::new();
        doc.append(LogEntry::new("one"));
        doc.append(LogEntry::new("three"));
        doc.insert_at(1, "two");
        assert_eq!(doc.log_lines(), ["one", "two", "three"]);
        assert_eq!(doc.remove_at(0).as_deref(), Some("one"));
        assert_eq!(doc.remove_at(99), None);
    }
}
