use crossbeam::channel::{unbounded, Receiver, Sender};
use std::sync::Mutex;

/// Published after a catalog mutation has completed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProfilesChanged {
    Created(String),
    Switched(String),
    Removed(String),
    Cleared { removed: Vec<String> },
}

#[derive(Debug, Default)]
pub struct ChangeNotifier {
    subscribers: Mutex<Vec<Sender<ProfilesChanged>>>,
}

impl ChangeNotifier {
    pub fn subscribe(&self) -> Receiver<ProfilesChanged> {
        let (sender, receiver) = unbounded();
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(sender);
        receiver
    }

    /// Subscribers whose receiver was dropped are forgotten.
    pub fn publish(&self, event: ProfilesChanged) {
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .retain(|sender| sender.send(event.clone()).is_ok());
    }
}
