//! CSV export of the talk-time report

use crate::json_output::JsonReport;

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// One row per participant, largest talker first
pub fn to_csv(report: &JsonReport) -> String {
    let mut out = String::from("participant,talk_ms,clock,samples\n");
    for p in &report.participants {
        out.push_str(&format!(
            "{},{},{},{}\n",
            quote(&p.name),
            p.talk_ms,
            p.clock,
            p.samples
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json_output::JsonParticipant;

    #[test]
    fn test_csv_rows_and_quoting() {
        let report = JsonReport {
            participants: vec![JsonParticipant {
                name: "Smith, \"Doc\"".to_string(),
                talk_ms: 500,
                clock: "00:01".to_string(),
                samples: 2,
            }],
            joined: true,
            scan_ticks: 0,
            poll_ticks: 1,
            hooked_methods: vec![],
        };
        let csv = to_csv(&report);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("participant,talk_ms,clock,samples"));
        assert_eq!(lines.next(), Some("\"Smith, \"\"Doc\"\"\",500,00:01,2"));
    }
}
