//! Summary statistics for a finished session
//!
//! `-c` mode: per-participant totals with share of talk time, rendered as
//! a call-summary style table.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;

use crate::chart::{format_clock, ChartSink};
use crate::session::Session;

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub name: String,
    pub talk_ms: u64,
    pub share_percent: f64,
    pub samples: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Rows sorted by talk time, largest first
    pub rows: Vec<SummaryRow>,
    pub total_ms: u64,
    pub total_samples: u64,
}

impl Summary {
    pub fn from_session<S: ChartSink>(session: &Session<S>) -> Self {
        Self::from_parts(
            session.tracker().talk_times(),
            session.tracker().sample_counts(),
        )
    }

    pub fn from_parts(
        talk_times: &BTreeMap<String, u64>,
        samples: &HashMap<String, u64>,
    ) -> Self {
        // Use Trueno for SIMD-accelerated column sums
        let times: Vec<f32> = talk_times.values().map(|&ms| ms as f32).collect();
        let counts: Vec<f32> = talk_times
            .keys()
            .map(|name| samples.get(name).copied().unwrap_or(0) as f32)
            .collect();
        let total_ms = if times.is_empty() {
            0
        } else {
            trueno::Vector::from_slice(&times).sum().unwrap_or(0.0) as u64
        };
        let total_samples = if counts.is_empty() {
            0
        } else {
            trueno::Vector::from_slice(&counts).sum().unwrap_or(0.0) as u64
        };

        let mut rows: Vec<SummaryRow> = talk_times
            .iter()
            .map(|(name, &talk_ms)| SummaryRow {
                name: name.clone(),
                talk_ms,
                share_percent: if total_ms > 0 {
                    talk_ms as f64 / total_ms as f64 * 100.0
                } else {
                    0.0
                },
                samples: samples.get(name).copied().unwrap_or(0),
            })
            .collect();
        rows.sort_by(|a, b| b.talk_ms.cmp(&a.talk_ms).then_with(|| a.name.cmp(&b.name)));
        Self {
            rows,
            total_ms,
            total_samples,
        }
    }

    pub fn render(&self) -> String {
        if self.rows.is_empty() {
            return "No participants tracked.\n".to_string();
        }
        let mut out = String::new();
        let _ = writeln!(out, "% time     seconds     clock   samples participant");
        let _ = writeln!(out, "------ ----------- --------- --------- ----------------");
        for row in &self.rows {
            let _ = writeln!(
                out,
                "{:6.2} {:>11.3} {:>9} {:>9} {}",
                row.share_percent,
                row.talk_ms as f64 / 1000.0,
                format_clock(row.talk_ms),
                row.samples,
                row.name
            );
        }
        let _ = writeln!(out, "------ ----------- --------- --------- ----------------");
        let _ = writeln!(
            out,
            "100.00 {:>11.3} {:>9} {:>9} total",
            self.total_ms as f64 / 1000.0,
            format_clock(self.total_ms),
            self.total_samples
        );
        out
    }
}
