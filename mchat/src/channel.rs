//! Single-slot observable holding the most recent submission outcome.

use std::sync::Arc;

use tokio::sync::watch;

use crate::ChatResult;

/// Written by exactly one owner (the active orchestration cycle) and read
/// by any number of observers. Each write replaces the whole value
/// atomically; observers never see a partial update. Holds `None` until the
/// first submission.
#[derive(Debug, Clone)]
pub struct ResultChannel {
    sender: Arc<watch::Sender<Option<ChatResult>>>,
}

impl ResultChannel {
    pub fn new() -> Self {
        let (sender, _receiver) = watch::channel(None);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn current(&self) -> Option<ChatResult> {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<ChatResult>> {
        self.sender.subscribe()
    }

    pub(crate) fn publish(&self, result: ChatResult) {
        self.sender.send_replace(Some(result));
    }
}

impl Default for ResultChannel {
    fn default() -> Self {
        Self::new()
    }
}
