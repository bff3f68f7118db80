pub mod entry;
pub mod state;

pub use entry::{EntryContent, FeedEntry};
pub use state::{ControllerState, DetailContext, ImageItem, RefreshSnapshot};
