use tokio::sync::watch;

/// Best-effort "is the network reachable" signal.
///
/// Only transitions are significant; the OS-specific path monitoring that
/// feeds the signal lives outside this crate.
pub trait Connectivity: Send + Sync {
    fn is_connected(&self) -> bool;

    /// A receiver that wakes on every connectivity transition.
    fn subscribe(&self) -> watch::Receiver<bool>;
}

/// Process-local sender side of the connectivity signal. Whatever integrates
/// with the platform (or a test) pushes states in; consecutive duplicates are
/// dropped so subscribers only ever see transitions.
pub struct ConnectivityHandle {
    tx: watch::Sender<bool>,
}

impl ConnectivityHandle {
    pub fn new(initially_connected: bool) -> Self {
        let (tx, _) = watch::channel(initially_connected);
        Self { tx }
    }

    pub fn set_connected(&self, connected: bool) {
        self.tx.send_if_modified(|current| {
            let changed = *current != connected;
            *current = connected;
            changed
        });
    }
}

impl Default for ConnectivityHandle {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Connectivity for ConnectivityHandle {
    fn is_connected(&self) -> bool {
        *self.tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}
