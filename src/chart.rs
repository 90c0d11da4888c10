//! Chart adapter
//!
//! The dashboard itself is an external collaborator; the engine only
//! promises a `{name -> duration}` snapshot once per poll tick plus a
//! visibility signal. A text renderer ships for the CLI.

use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Consumer of talk-time snapshots
pub trait ChartSink {
    fn update(&mut self, snapshot: &BTreeMap<String, u64>);
    fn set_visibility(&mut self, visible: bool);
}

/// Discards everything it is fed
#[derive(Debug, Default)]
pub struct NullSink;

impl ChartSink for NullSink {
    fn update(&mut self, _snapshot: &BTreeMap<String, u64>) {}
    fn set_visibility(&mut self, _visible: bool) {}
}

/// Records everything it is fed; used by tests and the replayer
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub updates: Vec<BTreeMap<String, u64>>,
    pub visibility: Vec<bool>,
}

impl RecordingSink {
    pub fn last(&self) -> Option<&BTreeMap<String, u64>> {
        self.updates.last()
    }
}

impl ChartSink for RecordingSink {
    fn update(&mut self, snapshot: &BTreeMap<String, u64>) {
        self.updates.push(snapshot.clone());
    }

    fn set_visibility(&mut self, visible: bool) {
        self.visibility.push(visible);
    }
}

/// Keeps the latest snapshot for end-of-replay rendering
#[derive(Debug, Default)]
pub struct TextChart {
    snapshot: BTreeMap<String, u64>,
    visible: bool,
}

impl TextChart {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn snapshot(&self) -> &BTreeMap<String, u64> {
        &self.snapshot
    }

    pub fn render(&self) -> String {
        render_snapshot(&self.snapshot)
    }
}

impl ChartSink for TextChart {
    fn update(&mut self, snapshot: &BTreeMap<String, u64>) {
        self.snapshot = snapshot.clone();
    }

    fn set_visibility(&mut self, visible: bool) {
        self.visible = visible;
    }
}

const BAR_WIDTH: usize = 40;

/// Horizontal bar chart, largest talker first
pub fn render_snapshot(snapshot: &BTreeMap<String, u64>) -> String {
    if snapshot.is_empty() {
        return "No talk time recorded.\n".to_string();
    }
    let mut rows: Vec<(&String, u64)> = snapshot.iter().map(|(n, ms)| (n, *ms)).collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let widest = rows.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    let max_ms = rows.iter().map(|(_, ms)| *ms).max().unwrap_or(0).max(1);

    let mut out = String::new();
    for (name, ms) in rows {
        let bar = BAR_WIDTH * ms as usize / max_ms as usize;
        let _ = writeln!(
            out,
            "{:<widest$}  {:>8}  {}",
            name,
            format_clock(ms),
            "#".repeat(bar),
        );
    }
    out
}

/// `mm:ss` below an hour, `hh:mm:ss` above, all fields zero-padded
pub fn format_clock(ms: u64) -> String {
    let total_secs = (ms as f64 / 1000.0).round() as u64;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}
