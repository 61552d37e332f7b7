// Poller stop signal
//
// Every worker generation gets its own channel. The monitor fires it when the
// last tracked job goes away (or on shutdown) and spawns a fresh worker with a
// fresh channel when monitoring resumes, so a stale stop never reaches the new
// poller.

use tokio::sync::watch;

/// Worker side: checked before each cycle and raced against the inter-cycle sleep
#[derive(Clone)]
pub struct ShutdownToken {
    rx: watch::Receiver<bool>,
}

impl ShutdownToken {
    pub fn is_shutdown(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once stopped; a monitor dropped without stopping counts as stopped
    pub async fn wait(&mut self) {
        let _ = self.rx.wait_for(|stopped| *stopped).await;
    }
}

/// Monitor side, held next to the worker's join handle
pub struct ShutdownSender {
    tx: watch::Sender<bool>,
}

impl ShutdownSender {
    /// The in-flight cycle (and its event delivery) completes first
    pub fn shutdown(&self) {
        let _ = self.tx.send(true);
    }
}

/// Channel for one worker generation
pub fn shutdown_channel() -> (ShutdownSender, ShutdownToken) {
    let (tx, rx) = watch::channel(false);
    (ShutdownSender { tx }, ShutdownToken { rx })
}
