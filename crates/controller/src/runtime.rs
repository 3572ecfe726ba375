//! Tick loop and inbound line pump

use crate::protocol::{parse_inbound, Inbound, Response};
use crate::tracker::Tracker;
use crate::ControllerError;
use frame_capture::FrameSource;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Drive the tracker until the inbound channel closes.
///
/// Each tick runs the gesture detector against `source`; inbound commands are
/// answered on `responses` in arrival order. Returns the tracker after a
/// final shutdown.
pub async fn run<S: FrameSource>(
    mut tracker: Tracker,
    mut source: S,
    mut inbound: mpsc::Receiver<Inbound>,
    responses: mpsc::Sender<Response>,
    tick_interval: Duration,
) -> Tracker {
    let mut ticks = interval(tick_interval);
    // A slow tick drops frames rather than bursting to catch up
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
    info!("Runtime started (tick every {:?})", tick_interval);

    loop {
        tokio::select! {
            _ = ticks.tick() => {
                tracker.tick(&mut source);
            }
            message = inbound.recv() => match message {
                Some(Inbound::Command(command)) => {
                    let response = tracker.handle(command);
                    if responses.send(response).await.is_err() {
                        debug!("Response receiver dropped");
                    }
                }
                Some(Inbound::Gaze(raw)) => {
                    tracker.on_gaze(raw);
                }
                None => break,
            }
        }
    }

    tracker.shutdown();
    info!("Runtime stopped");
    tracker
}

/// Parse newline-delimited JSON from `reader` and forward each message.
///
/// Malformed lines are logged and skipped. Returns when the reader hits EOF
/// or the receiver is dropped.
pub async fn pump_lines<R>(reader: R, tx: mpsc::Sender<Inbound>) -> Result<(), ControllerError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_inbound(line) {
            Ok(Some(message)) => {
                if tx.send(message).await.is_err() {
                    debug!("Inbound receiver dropped");
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => warn!("Skipping malformed line: {}", e),
        }
    }
    Ok(())
}
