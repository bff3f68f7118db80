use std::sync::Arc;

use url::Url;

use crate::app::error::{Result, TesseraError};
use crate::cache::{DiskCache, ImageCache};
use crate::config::Config;
use crate::feed::{FeedController, FeedRepository};
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::Fetcher;
use crate::loader::ImageLoader;
use crate::monitor::ConnectivityHandle;

/// Wires the whole stack together: one fetcher, one namespaced disk cache
/// per payload kind, tiered image cache, loader, repository, connectivity.
pub struct AppContext {
    pub fetcher: Arc<dyn Fetcher>,
    pub text_cache: Arc<DiskCache>,
    pub image_disk_cache: Arc<DiskCache>,
    pub image_cache: Arc<ImageCache>,
    pub image_loader: Arc<ImageLoader>,
    pub repository: Arc<FeedRepository>,
    pub connectivity: Arc<ConnectivityHandle>,
}

impl AppContext {
    pub fn new(config: &Config) -> Result<Self> {
        let feed_url = Url::parse(&config.feed_url)?;
        let cache_root = config
            .cache_root()
            .map_err(|e| TesseraError::Config(e.to_string()))?;

        let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::with_timeout(config.http_timeout()));
        let text_cache = Arc::new(DiskCache::new(&cache_root, "text-cache")?);
        let image_disk_cache = Arc::new(DiskCache::new(&cache_root, "image-cache")?);
        let image_cache = Arc::new(ImageCache::new(
            config.memory_cache_limit,
            image_disk_cache.clone(),
        ));
        let image_loader = Arc::new(ImageLoader::new(fetcher.clone(), image_cache.clone()));
        let repository = Arc::new(FeedRepository::new(
            fetcher.clone(),
            text_cache.clone(),
            feed_url,
        ));
        let connectivity = Arc::new(ConnectivityHandle::default());

        Ok(Self {
            fetcher,
            text_cache,
            image_disk_cache,
            image_cache,
            image_loader,
            repository,
            connectivity,
        })
    }

    pub fn make_controller(&self) -> Arc<FeedController> {
        FeedController::new(self.repository.clone(), self.connectivity.as_ref())
    }
}
