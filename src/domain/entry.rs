use url::Url;
use uuid::Uuid;

/// One classified line of the remote feed.
///
/// The id is unique for the process lifetime but carries no meaning across
/// parses: every successful refresh replaces the entry list wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub id: Uuid,
    pub content: EntryContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryContent {
    /// A displayable image pair. Lines with a single URL use it for both
    /// thumbnail and original.
    Image {
        thumbnail: Url,
        original: Url,
        caption: Option<String>,
    },
    /// A line with no URL-shaped tokens at all.
    Text(String),
    /// A line whose only URL-shaped token is not http(s).
    InvalidLink(String),
}

impl FeedEntry {
    pub fn new(content: EntryContent) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self.content, EntryContent::Image { .. })
    }
}
