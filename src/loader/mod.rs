use std::collections::HashMap;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use image::DynamicImage;
use tokio::sync::Mutex;
use url::Url;

use crate::app::{Result, TesseraError};
use crate::cache::{cache_key, ImageCache};
use crate::fetcher::Fetcher;

type SharedFetch = Shared<BoxFuture<'static, std::result::Result<Arc<DynamicImage>, Arc<TesseraError>>>>;

/// Fetches and decodes remote images through the tiered cache, coalescing
/// concurrent requests for the same URL into a single network fetch.
///
/// The in-flight map holds one shared future per outstanding URL; the entry
/// is removed by the driving future itself once the fetch settles, so a
/// later retry of a failed URL always issues a fresh fetch.
pub struct ImageLoader {
    fetcher: Arc<dyn Fetcher>,
    cache: Arc<ImageCache>,
    in_flight: Mutex<HashMap<String, SharedFetch>>,
}

impl ImageLoader {
    pub fn new(fetcher: Arc<dyn Fetcher>, cache: Arc<ImageCache>) -> Self {
        Self {
            fetcher,
            cache,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve `url` to a decoded image: cache hit, or joining the in-flight
    /// fetch for that URL, or a fresh fetch + decode + cache population.
    ///
    /// N concurrent callers for one URL cause exactly one fetch and one
    /// decode; all observe the same success or the same failure.
    pub async fn load_image(self: &Arc<Self>, url: &Url) -> Result<Arc<DynamicImage>> {
        let key = cache_key(url.as_str());
        if let Some(image) = self.cache.get(&key).await {
            return Ok(image);
        }

        let fetch = {
            let mut in_flight = self.in_flight.lock().await;
            match in_flight.get(url.as_str()) {
                Some(existing) => existing.clone(),
                None => {
                    let fetch = self.spawn_fetch(url.clone(), key);
                    in_flight.insert(url.as_str().to_owned(), fetch.clone());
                    fetch
                }
            }
        };

        fetch.await.map_err(TesseraError::InFlight)
    }

    fn spawn_fetch(self: &Arc<Self>, url: Url, key: String) -> SharedFetch {
        let loader = Arc::clone(self);
        async move {
            let result = loader.fetch_and_cache(&url, &key).await.map_err(Arc::new);
            // Clear the registry entry before the result becomes observable,
            // whether the fetch succeeded or failed.
            loader.in_flight.lock().await.remove(url.as_str());
            result
        }
        .boxed()
        .shared()
    }

    async fn fetch_and_cache(&self, url: &Url, key: &str) -> Result<Arc<DynamicImage>> {
        tracing::debug!("Fetching image {}", url);
        let bytes = self.fetcher.fetch_bytes(url).await?;
        let decoded = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
            .await
            .map_err(std::io::Error::other)??;

        let image = Arc::new(decoded);
        self.cache.insert(image.clone(), key);
        Ok(image)
    }
}
