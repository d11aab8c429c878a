// UI signal bus - broadcast of discrete workflow signals
//
// Presentation layers subscribe and react; the workflow never waits on them.

use serde::Serialize;
use tokio::sync::broadcast;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum WorkflowSignal {
    ImageReady,
    AddressUpdated { text: String },
    SubmitEnabled { enabled: bool },
    SubmitSucceeded,
    SubmitFailed { reason: String },
}

#[derive(Clone)]
pub struct SignalBus {
    sender: broadcast::Sender<WorkflowSignal>,
}

impl SignalBus {
    /// Capacity bounds how many signals a slow subscriber may fall behind
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn publish(&self, signal: WorkflowSignal) {
        tracing::debug!("Publishing signal: {:?}", signal);

        // send() only fails when nobody is listening
        if self.sender.send(signal).is_err() {
            tracing::debug!("No subscribers listening to signal");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WorkflowSignal> {
        self.sender.subscribe()
    }
}
