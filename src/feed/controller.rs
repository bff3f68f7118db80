use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use uuid::Uuid;

use crate::app::TesseraError;
use crate::domain::{ControllerState, DetailContext, FeedEntry, ImageItem, RefreshSnapshot};
use crate::feed::FeedRepository;
use crate::monitor::Connectivity;

/// Long-lived refresh state machine behind the grid screen.
///
/// Publishes [`ControllerState`] and the detail-screen context over watch
/// channels. A refresh failure never blanks entries that are already on
/// screen: the stale snapshot stays up with a notice attached, and
/// connectivity-shaped failures arm a single automatic retry for the next
/// reconnect.
pub struct FeedController {
    repository: Arc<FeedRepository>,
    /// Held for the duration of a refresh; `try_lock` makes concurrent
    /// refresh requests no-ops rather than queued duplicates.
    refresh_gate: tokio::sync::Mutex<()>,
    inner: Mutex<Inner>,
    state_tx: watch::Sender<ControllerState>,
    detail_tx: watch::Sender<Option<DetailContext>>,
}

#[derive(Default)]
struct Inner {
    entries: Vec<FeedEntry>,
    has_appeared: bool,
    retry_on_reconnect: bool,
}

impl FeedController {
    pub fn new(repository: Arc<FeedRepository>, connectivity: &dyn Connectivity) -> Arc<Self> {
        let (state_tx, _) = watch::channel(ControllerState::Loading);
        let (detail_tx, _) = watch::channel(None);

        let controller = Arc::new(Self {
            repository,
            refresh_gate: tokio::sync::Mutex::new(()),
            inner: Mutex::new(Inner::default()),
            state_tx,
            detail_tx,
        });
        controller.spawn_reconnect_task(connectivity.subscribe());
        controller
    }

    /// First call: serve the cached parse immediately (offline-capable
    /// display before any network round trip), then refresh. Later calls are
    /// no-ops.
    pub async fn on_appear(&self) {
        let first = {
            let mut inner = self.inner.lock().expect("controller state poisoned");
            !std::mem::replace(&mut inner.has_appeared, true)
        };
        if !first {
            return;
        }

        if let Some(entries) = self.repository.load_cached().await {
            tracing::debug!("Showing {} cached entries before refresh", entries.len());
            self.apply_snapshot(entries, None);
        }
        self.refresh().await;
    }

    /// Pull-to-refresh. Same guard as every other refresh path.
    pub async fn user_initiated_refresh(&self) {
        self.refresh().await;
    }

    /// Manual retry from the full-screen failure state.
    pub async fn retry(&self) {
        self.refresh().await;
    }

    /// Open the detail context for an image entry. Selecting a non-image
    /// entry (or an unknown id) is a no-op.
    pub fn select(&self, entry_id: Uuid) {
        let entries = {
            let inner = self.inner.lock().expect("controller state poisoned");
            inner.entries.clone()
        };

        let Some(selected) = entries.iter().find(|e| e.id == entry_id) else {
            return;
        };
        if !selected.is_image() {
            return;
        }

        let items: Vec<ImageItem> = entries.iter().filter_map(ImageItem::from_entry).collect();
        let Some(initial_index) = items.iter().position(|i| i.id == entry_id) else {
            return;
        };
        self.detail_tx.send_replace(Some(DetailContext {
            items,
            initial_index,
        }));
    }

    pub fn clear_selection(&self) {
        self.detail_tx.send_replace(None);
    }

    pub fn state(&self) -> ControllerState {
        self.state_tx.borrow().clone()
    }

    pub fn state_receiver(&self) -> watch::Receiver<ControllerState> {
        self.state_tx.subscribe()
    }

    pub fn detail_context(&self) -> Option<DetailContext> {
        self.detail_tx.borrow().clone()
    }

    pub fn detail_receiver(&self) -> watch::Receiver<Option<DetailContext>> {
        self.detail_tx.subscribe()
    }

    async fn refresh(&self) {
        // At most one refresh in flight; a request racing an active refresh
        // is dropped, not queued.
        let Ok(_guard) = self.refresh_gate.try_lock() else {
            return;
        };

        match self.repository.refresh().await {
            Ok(entries) => {
                self.inner
                    .lock()
                    .expect("controller state poisoned")
                    .retry_on_reconnect = false;
                self.apply_snapshot(entries, None);
            }
            Err(error) => self.handle_refresh_error(error),
        }
    }

    fn apply_snapshot(&self, entries: Vec<FeedEntry>, notice: Option<String>) {
        {
            let mut inner = self.inner.lock().expect("controller state poisoned");
            inner.entries = entries.clone();
        }
        self.state_tx
            .send_replace(ControllerState::Loaded(RefreshSnapshot::new(entries, notice)));
    }

    fn handle_refresh_error(&self, error: TesseraError) {
        let message = error.to_string();
        tracing::warn!("Feed refresh failed: {}", message);

        let entries = {
            let mut inner = self.inner.lock().expect("controller state poisoned");
            if error.is_transient() {
                inner.retry_on_reconnect = true;
            }
            inner.entries.clone()
        };

        let current = self.state();
        match current {
            ControllerState::Loaded(mut snapshot) => {
                // Keep what is on screen; just attach the notice.
                snapshot.notice = Some(message);
                self.state_tx.send_replace(ControllerState::Loaded(snapshot));
            }
            _ if !entries.is_empty() => {
                // Entries from an earlier parse without a Loaded state should
                // not happen; synthesize a snapshot rather than blanking them.
                self.state_tx.send_replace(ControllerState::Loaded(
                    RefreshSnapshot::new(entries, Some(message)),
                ));
            }
            _ => {
                self.state_tx.send_replace(ControllerState::Failed(message));
            }
        }
    }

    fn spawn_reconnect_task(self: &Arc<Self>, mut rx: watch::Receiver<bool>) {
        let weak = Arc::downgrade(self);
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                // The connectivity stream is de-duplicated, so a wake that
                // shows "connected" is a genuine reconnect even when an
                // intermediate disconnected value was coalesced away.
                if !*rx.borrow_and_update() {
                    continue;
                }

                let Some(controller) = weak.upgrade() else {
                    break;
                };
                let armed = {
                    let mut inner = controller.inner.lock().expect("controller state poisoned");
                    std::mem::take(&mut inner.retry_on_reconnect)
                };
                if armed {
                    tracing::info!("Connectivity regained, retrying feed refresh");
                    controller.refresh().await;
                }
            }
        });
    }
}
