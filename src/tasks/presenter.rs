//! Terminal presenter for countdown signals

use std::io::{self, Write};

use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, trace, warn};

use crate::countdown::ViewSignal;

const BELL: &[u8] = b"\x07";

/// Background task that logs view signals and rings the terminal bell when
/// the countdown completes
pub async fn presenter_task(mut signals: broadcast::Receiver<ViewSignal>, bell: bool) {
    info!("Starting presenter task");

    loop {
        match signals.recv().await {
            Ok(signal) => {
                let mut stdout = io::stdout();
                if let Err(e) = present(&signal, bell, &mut stdout) {
                    warn!("Failed to ring terminal bell: {}", e);
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Presenter fell behind, skipped {} signals", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Signal channel closed, stopping presenter");
                break;
            }
        }
    }
}

/// Render one signal, writing the bell to `out` on completion
pub fn present<W: Write>(signal: &ViewSignal, bell: bool, out: &mut W) -> io::Result<()> {
    match signal {
        ViewSignal::DisplayUpdate { time, progress } => {
            info!("{} remaining ({:.0}%)", time, progress * 100.0);
        }
        ViewSignal::ViewConfig { mode } => {
            let config = mode.config();
            info!("Switched to {:?} layout, toggle shows \"{}\"", mode, config.toggle_title);
        }
        ViewSignal::ToggleSelected { selected } => {
            debug!("Toggle selected: {}", selected);
        }
        ViewSignal::RotationCue { half_turns } => {
            trace!("Rotating timer image by {} half turns", half_turns);
        }
        ViewSignal::CompletionAlert => {
            info!("Countdown complete");
            if bell {
                out.write_all(BELL)?;
                out.flush()?;
            }
        }
    }
    Ok(())
}
