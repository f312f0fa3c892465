//! crates/memopad_core/src/editor/debounce.rs
//!
//! A cancel-and-replace timer. Arming always cancels the previous task first, so
//! at most one tick is ever pending. Ticks from cancelled generations that were
//! already queued are discarded on receipt.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Delivered when an armed timer runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    generation: u64,
}

struct Armed {
    generation: u64,
    token: CancellationToken,
}

pub struct Debouncer {
    delay: Duration,
    generation: u64,
    armed: Option<Armed>,
    tx: mpsc::UnboundedSender<Tick>,
    rx: mpsc::UnboundedReceiver<Tick>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            delay,
            generation: 0,
            armed: None,
            tx,
            rx,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Cancels any pending timer and schedules a fresh one. Outside a tokio
    /// runtime there is nothing to run the timer on, so it stays disarmed.
    pub fn arm(&mut self) {
        self.cancel();
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            debug!("no tokio runtime, debounce timer left disarmed");
            return;
        };
        self.generation += 1;

        let token = CancellationToken::new();
        let tick = Tick {
            generation: self.generation,
        };
        let delay = self.delay;
        let tx = self.tx.clone();
        let child = token.clone();
        runtime.spawn(async move {
            tokio::select! {
                _ = child.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    // The receiver lives as long as the debouncer; a send error
                    // only means the owner is gone.
                    let _ = tx.send(tick);
                }
            }
        });

        debug!(generation = self.generation, ?delay, "debounce timer armed");
        self.armed = Some(Armed {
            generation: self.generation,
            token,
        });
    }

    pub fn cancel(&mut self) {
        if let Some(armed) = self.armed.take() {
            armed.token.cancel();
            debug!(generation = armed.generation, "debounce timer cancelled");
        }
    }

    fn is_current(&self, tick: Tick) -> bool {
        matches!(&self.armed, Some(armed) if armed.generation == tick.generation)
    }

    /// Waits for the currently armed timer to fire.
    ///
    /// Never resolves while nothing is armed. The timer stays armed until the
    /// tick is handed back to [`Debouncer::take`]. Cancel safe.
    pub async fn fired(&mut self) -> Tick {
        loop {
            let Some(tick) = self.rx.recv().await else {
                // Unreachable while `self.tx` is alive.
                return std::future::pending().await;
            };
            if self.is_current(tick) {
                return tick;
            }
            debug!(generation = tick.generation, "discarding stale debounce tick");
        }
    }

    /// Disarms the timer if `tick` still belongs to the armed generation.
    /// Returns false when the timer was re-armed or cancelled in between.
    pub fn take(&mut self, tick: Tick) -> bool {
        if self.is_current(tick) {
            self.armed = None;
            true
        } else {
            false
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
