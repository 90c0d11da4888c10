use anyhow::{Context, Result};
use charla::chart::TextChart;
use charla::cli::{Cli, OutputFormat};
use charla::csv_output;
use charla::json_output::JsonReport;
use charla::replay::{self, SessionRecording};
use charla::session::SessionConfig;
use charla::stats::Summary;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let raw = std::fs::read_to_string(&cli.recording)
        .with_context(|| format!("reading recording {}", cli.recording.display()))?;
    let recording = SessionRecording::from_json(&raw)?;

    let config = SessionConfig {
        scan_interval_ms: cli.scan_interval_ms,
        poll_interval_ms: cli.poll_interval_ms,
        space_id_prefix: cli.space_prefix.clone(),
        self_label: if cli.self_label.is_empty() {
            None
        } else {
            Some(cli.self_label.clone())
        },
        ..SessionConfig::default()
    };

    let session = replay::replay(&recording, config, TextChart::default())?;

    if cli.statistics {
        print!("{}", Summary::from_session(&session).render());
        return Ok(());
    }

    match cli.format {
        OutputFormat::Text => print!("{}", charla::chart::render_snapshot(session.snapshot())),
        OutputFormat::Json => println!("{}", JsonReport::from_session(&session).to_json()?),
        OutputFormat::Csv => print!("{}", csv_output::to_csv(&JsonReport::from_session(&session))),
    }

    Ok(())
}
