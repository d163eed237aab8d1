use crate::baseline_file::BaselineStore;
use crate::shutdown::Shutdown;
use crate::status::{Status, check};
use chrono::{DateTime, Local};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Upper bound on how long a pending shutdown can go unnoticed while waiting
/// for the next tick.
const SHUTDOWN_POLL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy)]
pub struct MonitorOptions {
    pub interval: Duration,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        MonitorOptions {
            interval: DEFAULT_TICK_INTERVAL,
        }
    }
}

/// One snapshot of the monitored files.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Zero for the initial frame.
    pub tick: u64,
    pub taken_at: DateTime<Local>,
    /// Statuses in baseline order, or why they could not be computed.
    pub outcome: Result<Vec<Status>, String>,
}

/// Receives frames from `run_monitor`.
///
/// Each frame replaces the previous one. `stopped` is called exactly once,
/// after the last frame.
pub trait Render {
    fn frame(&mut self, frame: &Frame);
    fn stopped(&mut self);
}

/// Re-check the baseline every `options.interval` until `shutdown` is requested.
///
/// The first frame is produced immediately. The baseline is reloaded on every
/// tick, so changes made by other processes show up on the next frame. A tick
/// that fails (for example because the baseline file is corrupt) produces an
/// error frame and the loop keeps going.
///
/// Returns the number of frames rendered.
pub fn run_monitor<R: Render>(
    store: &BaselineStore,
    options: MonitorOptions,
    shutdown: &Shutdown,
    renderer: &mut R,
) -> u64 {
    let mut tick = 0u64;

    while !shutdown.is_requested() {
        let started = Instant::now();

        let frame = take_frame(store, tick);
        renderer.frame(&frame);
        tick += 1;

        wait_for_next_tick(started, options.interval, shutdown);
    }

    debug!("Monitor stopped after {} frames", tick);
    renderer.stopped();

    tick
}

fn take_frame(store: &BaselineStore, tick: u64) -> Frame {
    let outcome = match check(store) {
        Ok(result) => Ok(result.statuses),
        Err(e) => {
            warn!("Check failed: {}", e);
            Err(e.to_string())
        }
    };

    Frame {
        tick,
        taken_at: Local::now(),
        outcome,
    }
}

fn wait_for_next_tick(started: Instant, interval: Duration, shutdown: &Shutdown) {
    loop {
        if shutdown.is_requested() {
            return;
        }
        let remaining = interval.saturating_sub(started.elapsed());
        if remaining.is_zero() {
            return;
        }
        std::thread::sleep(remaining.min(SHUTDOWN_POLL));
    }
}
