//! JSON report for `--format json`

use serde::{Deserialize, Serialize};

use crate::chart::{format_clock, ChartSink};
use crate::session::Session;

/// One participant's tally
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonParticipant {
    pub name: String,
    /// Cumulative talk time in milliseconds
    pub talk_ms: u64,
    /// Clock rendering of `talk_ms`
    pub clock: String,
    /// Accepted volume samples over the session
    pub samples: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    /// Sorted by talk time, largest first
    pub participants: Vec<JsonParticipant>,
    pub joined: bool,
    pub scan_ticks: u64,
    pub poll_ticks: u64,
    /// `Class.method` labels in installation order
    pub hooked_methods: Vec<String>,
}

impl JsonReport {
    pub fn from_session<S: ChartSink>(session: &Session<S>) -> Self {
        let tracker = session.tracker();
        let mut participants: Vec<JsonParticipant> = tracker
            .talk_times()
            .iter()
            .map(|(name, &talk_ms)| JsonParticipant {
                name: name.clone(),
                talk_ms,
                clock: format_clock(talk_ms),
                samples: tracker.sample_counts().get(name).copied().unwrap_or(0),
            })
            .collect();
        participants.sort_by(|a, b| b.talk_ms.cmp(&a.talk_ms).then_with(|| a.name.cmp(&b.name)));
        Self {
            participants,
            joined: tracker.is_joined(),
            scan_ticks: session.scan_ticks(),
            poll_ticks: session.poll_ticks(),
            hooked_methods: session.registry().hooked_labels().to_vec(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
