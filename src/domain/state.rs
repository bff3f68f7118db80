use chrono::{DateTime, Utc};
use url::Url;
use uuid::Uuid;

use crate::domain::entry::{EntryContent, FeedEntry};

/// Presentation-ready result of one refresh cycle. Replaced atomically as a
/// whole; the notice carries a transient error message when a refresh failed
/// but older entries are still worth showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshSnapshot {
    pub items: Vec<FeedEntry>,
    pub notice: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl RefreshSnapshot {
    pub fn new(items: Vec<FeedEntry>, notice: Option<String>) -> Self {
        Self {
            items,
            notice,
            updated_at: Utc::now(),
        }
    }
}

/// Observable controller state; exactly one variant is active at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerState {
    Loading,
    Loaded(RefreshSnapshot),
    Failed(String),
}

/// Image-only projection of a feed entry, for the detail screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageItem {
    pub id: Uuid,
    pub thumbnail: Url,
    pub original: Url,
    pub caption: Option<String>,
}

/// Context handed to the detail screen: every image entry in feed order,
/// plus the index of the selected one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailContext {
    pub items: Vec<ImageItem>,
    pub initial_index: usize,
}

impl ImageItem {
    /// Project an entry onto the detail model; non-image entries have no
    /// detail representation.
    pub fn from_entry(entry: &FeedEntry) -> Option<Self> {
        match &entry.content {
            EntryContent::Image {
                thumbnail,
                original,
                caption,
            } => Some(Self {
                id: entry.id,
                thumbnail: thumbnail.clone(),
                original: original.clone(),
                caption: caption.clone(),
            }),
            _ => None,
        }
    }
}
