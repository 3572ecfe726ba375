//! Gaze overlay controller - main entry point
//!
//! Reads commands and gaze samples as JSON lines on stdin and writes bus
//! events and command responses as JSON lines on stdout.

use anyhow::Context;
use clap::Parser;
use controller::{init_logging, pump_lines, run, Response, Settings, Tracker};
use event_bus::{EventBus, Subscription};
use frame_capture::{FrameSource, ImageSequenceSource, MemorySource};
use std::path::PathBuf;
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info};

const CHANNEL_CAPACITY: usize = 64;

#[derive(Parser, Debug)]
#[command(
    name = "gaze-overlay",
    about = "Gaze smoothing and facial gesture triggers driven over stdin/stdout",
    version
)]
struct Args {
    /// Settings file (TOML, JSON or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory of image frames used as the video feed
    #[arg(long)]
    frames: Option<PathBuf>,

    /// Replay the frame directory from the start after the last frame
    #[arg(long)]
    loop_frames: bool,

    /// Display tick period in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Log filter, overridden by RUST_LOG
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref()).context("failed to load settings")?;
    if let Some(tick_ms) = args.tick_ms {
        settings.tick_interval_ms = tick_ms;
    }
    if let Some(level) = args.log_level {
        settings.logging.level = level;
    }
    if args.json_logs {
        settings.logging.json = true;
    }
    init_logging(&settings.logging);

    info!("=== Gaze Overlay v{} ===", env!("CARGO_PKG_VERSION"));

    let source: Box<dyn FrameSource + Send> = match &args.frames {
        Some(dir) => Box::new(
            ImageSequenceSource::open(dir, args.loop_frames)
                .with_context(|| format!("failed to open frames in {}", dir.display()))?,
        ),
        None => {
            info!("No frame directory given, gesture detection will idle");
            Box::new(MemorySource::new())
        }
    };

    let bus = EventBus::new(settings.event_capacity);
    let events = bus.subscribe();
    let tracker = Tracker::new(&settings, bus);

    let (inbound_tx, inbound_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let (response_tx, response_rx) = mpsc::channel(CHANNEL_CAPACITY);

    let pump = tokio::spawn(async move {
        let stdin = BufReader::new(tokio::io::stdin());
        if let Err(e) = pump_lines(stdin, inbound_tx).await {
            error!("Input stream failed: {}", e);
        }
    });
    let writer = tokio::spawn(write_output(events, response_rx));

    let tracker = run(
        tracker,
        source,
        inbound_rx,
        response_tx,
        settings.tick_interval(),
    )
    .await;
    info!("Final status: {:?}", tracker.status());
    // Dropping the tracker closes the bus so the writer can finish
    drop(tracker);

    pump.await.context("input task panicked")?;
    writer.await.context("output task panicked")??;
    Ok(())
}

/// Write bus events and command responses to stdout until both close
async fn write_output(
    mut events: Subscription,
    mut responses: mpsc::Receiver<Response>,
) -> anyhow::Result<()> {
    let mut stdout = tokio::io::stdout();
    let mut events_open = true;
    let mut responses_open = true;

    while events_open || responses_open {
        let line = tokio::select! {
            event = events.recv(), if events_open => match event {
                Some(event) => serde_json::to_string(&event)?,
                None => {
                    events_open = false;
                    continue;
                }
            },
            response = responses.recv(), if responses_open => match response {
                Some(response) => serde_json::to_string(&serde_json::json!({ "response": response }))?,
                None => {
                    responses_open = false;
                    continue;
                }
            },
        };

        stdout.write_all(line.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }
    Ok(())
}
