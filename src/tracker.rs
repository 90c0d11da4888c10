//! Talk-time aggregation engine
//!
//! Folds the stream of (name, volume) observations into a cumulative
//! per-participant duration table on a fixed poll cadence. A name with at
//! least one buffered sample in an interval gains exactly one poll
//! interval, whatever the sample count or magnitude; the buffer is dropped
//! unconditionally on every tick.

use std::collections::{BTreeMap, HashMap};
use tracing::{debug, trace};

pub struct TalkTimeTracker {
    joined: bool,
    poll_interval_ms: u64,
    /// Samples collected since the last poll tick, keyed by name
    volume_events: HashMap<String, Vec<f64>>,
    /// Cumulative talk time in milliseconds
    talk_times: BTreeMap<String, u64>,
    /// Accepted samples per name over the whole session (summary mode)
    samples_seen: HashMap<String, u64>,
}

impl TalkTimeTracker {
    /// `self_label` seeds the local participant's table entry once; it is
    /// deliberately not restored after `reset()`.
    pub fn new(poll_interval_ms: u64, self_label: Option<&str>) -> Self {
        let mut talk_times = BTreeMap::new();
        if let Some(label) = self_label {
            talk_times.insert(label.to_string(), 0);
        }
        Self {
            joined: false,
            poll_interval_ms,
            volume_events: HashMap::new(),
            talk_times,
            samples_seen: HashMap::new(),
        }
    }

    pub fn is_joined(&self) -> bool {
        self.joined
    }

    pub fn poll_interval_ms(&self) -> u64 {
        self.poll_interval_ms
    }

    pub fn join_meeting(&mut self) {
        if !self.joined {
            debug!("joined meeting, accepting volume observations");
        }
        self.joined = true;
    }

    /// Accept a volume observation. Rejected before join, for silent
    /// samples, and for unresolved names; rejected samples leave no trace
    /// in either the buffer or the table.
    pub fn handle_volume(&mut self, name: &str, volume: f64) {
        if !self.joined || name.is_empty() || volume <= 0.0 {
            trace!(name, volume, "rejected volume sample");
            return;
        }
        self.talk_times.entry(name.to_string()).or_insert(0);
        self.volume_events
            .entry(name.to_string())
            .or_default()
            .push(volume);
        *self.samples_seen.entry(name.to_string()).or_insert(0) += 1;
    }

    /// Roster update: absent names start at zero; leavers keep their time.
    pub fn participants_updated(&mut self, names: &[String]) {
        for name in names {
            self.talk_times.entry(name.clone()).or_insert(0);
        }
    }

    /// Poll transition: fold the buffer into the table, drop the buffer,
    /// and return the snapshot to publish.
    pub fn poll_tick(&mut self) -> BTreeMap<String, u64> {
        for name in self.volume_events.keys() {
            *self.talk_times.entry(name.clone()).or_insert(0) += self.poll_interval_ms;
        }
        self.volume_events.clear();
        debug!(
            participants = self.talk_times.len(),
            "poll tick folded volume events"
        );
        self.talk_times.clone()
    }

    /// Clear buffer and table; the joined flag stays set.
    pub fn reset(&mut self) {
        self.volume_events.clear();
        self.talk_times.clear();
        self.samples_seen.clear();
    }

    pub fn talk_times(&self) -> &BTreeMap<String, u64> {
        &self.talk_times
    }

    pub fn sample_counts(&self) -> &HashMap<String, u64> {
        &self.samples_seen
    }
}
