pub mod controller;

use std::sync::Arc;

use url::Url;

use crate::app::Result;
use crate::cache::DiskCache;
use crate::domain::FeedEntry;
use crate::fetcher::Fetcher;
use crate::parser::FeedParser;

pub use controller::FeedController;

/// Cache key for the raw feed text; the feed is a single fixed resource, so
/// one well-known key is the whole persistence contract.
pub const FEED_CACHE_KEY: &str = "images.txt";

pub const DEFAULT_FEED_URL: &str = "https://it-link.ru/test/images.txt";

/// Fetches the raw feed text, persists it through the text cache, and parses
/// it into entries. Also serves a cached parse for offline startup.
pub struct FeedRepository {
    fetcher: Arc<dyn Fetcher>,
    text_cache: Arc<DiskCache>,
    parser: FeedParser,
    feed_url: Url,
}

impl FeedRepository {
    pub fn new(fetcher: Arc<dyn Fetcher>, text_cache: Arc<DiskCache>, feed_url: Url) -> Self {
        Self {
            fetcher,
            text_cache,
            parser: FeedParser::new(),
            feed_url,
        }
    }

    /// Parse the last persisted feed text. `None` if nothing was ever cached
    /// or the payload does not decode as UTF-8; never fails.
    pub async fn load_cached(&self) -> Option<Vec<FeedEntry>> {
        let bytes = self.text_cache.data(FEED_CACHE_KEY).await?;
        let text = String::from_utf8(bytes).ok()?;
        Some(self.parser.parse(&text))
    }

    /// Fetch fresh feed text, persist it before returning, and parse it.
    ///
    /// Network errors propagate unchanged and leave the cached copy
    /// untouched.
    pub async fn refresh(&self) -> Result<Vec<FeedEntry>> {
        let text = self.fetcher.fetch_text(&self.feed_url).await?;
        self.text_cache.store(text.as_bytes(), FEED_CACHE_KEY).await?;
        let entries = self.parser.parse(&text);
        tracing::info!("Refreshed feed: {} entries", entries.len());
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::app::TesseraError;

    struct StaticFetcher(std::result::Result<String, ()>);

    #[async_trait]
    impl Fetcher for StaticFetcher {
        async fn fetch_bytes(&self, _url: &Url) -> Result<Vec<u8>> {
            match &self.0 {
                Ok(text) => Ok(text.clone().into_bytes()),
                Err(()) => Err(TesseraError::Io(std::io::Error::other("offline"))),
            }
        }
    }

    fn make_repository(
        fetch: std::result::Result<String, ()>,
    ) -> (tempfile::TempDir, FeedRepository) {
        let dir = tempfile::tempdir().unwrap();
        let cache = Arc::new(DiskCache::new(dir.path(), "text-cache").unwrap());
        let url = Url::parse(DEFAULT_FEED_URL).unwrap();
        (
            dir,
            FeedRepository::new(Arc::new(StaticFetcher(fetch)), cache, url),
        )
    }

    #[tokio::test]
    async fn test_load_cached_absent_when_never_refreshed() {
        let (_dir, repo) = make_repository(Ok("https://example.com/a.jpg".into()));
        assert!(repo.load_cached().await.is_none());
    }

    #[tokio::test]
    async fn test_refresh_persists_for_later_cached_load() {
        let (_dir, repo) = make_repository(Ok("https://example.com/a.jpg\nlalala".into()));
        let fresh = repo.refresh().await.unwrap();
        assert_eq!(fresh.len(), 2);

        let cached = repo.load_cached().await.expect("text should be cached");
        assert_eq!(cached.len(), 2);
        let fresh_contents: Vec<_> = fresh.iter().map(|e| &e.content).collect();
        let cached_contents: Vec<_> = cached.iter().map(|e| &e.content).collect();
        assert_eq!(fresh_contents, cached_contents);
    }

    #[tokio::test]
    async fn test_failed_refresh_leaves_cache_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Arc::new(DiskCache::new(dir.path(), "text-cache").unwrap());
        let url = Url::parse(DEFAULT_FEED_URL).unwrap();

        let good = FeedRepository::new(
            Arc::new(StaticFetcher(Ok("https://example.com/a.jpg".into()))),
            cache.clone(),
            url.clone(),
        );
        good.refresh().await.unwrap();

        let bad = FeedRepository::new(Arc::new(StaticFetcher(Err(()))), cache, url);
        bad.refresh().await.unwrap_err();
        assert_eq!(bad.load_cached().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_undecodable_cached_bytes_degrade_to_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Arc::new(DiskCache::new(dir.path(), "text-cache").unwrap());
        cache.store(&[0xff, 0xfe, 0x80], FEED_CACHE_KEY).await.unwrap();

        let url = Url::parse(DEFAULT_FEED_URL).unwrap();
        let repo = FeedRepository::new(Arc::new(StaticFetcher(Err(()))), cache, url);
        assert!(repo.load_cached().await.is_none());
    }
}
