pub mod http_fetcher;

use async_trait::async_trait;
use url::Url;

use crate::app::Result;

/// Raw transport used by the repository and the image loader.
///
/// Implementations surface non-2xx statuses as errors and own all timeout
/// handling; callers layer no timeout of their own.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>>;

    /// Fetch and decode as UTF-8 text. Fails with a decode error if the body
    /// is not valid UTF-8.
    async fn fetch_text(&self, url: &Url) -> Result<String> {
        let bytes = self.fetch_bytes(url).await?;
        Ok(String::from_utf8(bytes)?)
    }
}
