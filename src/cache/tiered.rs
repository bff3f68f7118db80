use std::io::Cursor;
use std::sync::Arc;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};

use crate::app::Result;
use crate::cache::disk::DiskCache;
use crate::cache::memory::MemoryCache;

/// Two-tier image cache: bounded in-memory LRU in front of a [`DiskCache`]
/// namespace. Reads fall through memory → disk (decoding and repopulating
/// memory on a disk hit); writes hit memory immediately and persist to disk
/// in the background.
pub struct ImageCache {
    memory: MemoryCache,
    disk: Arc<DiskCache>,
}

impl ImageCache {
    pub fn new(memory_limit: usize, disk: Arc<DiskCache>) -> Self {
        Self {
            memory: MemoryCache::new(memory_limit),
            disk,
        }
    }

    /// Look up `key` across both tiers. Never fails: a missing entry and an
    /// undecodable disk payload both come back as `None`.
    pub async fn get(&self, key: &str) -> Option<Arc<DynamicImage>> {
        if let Some(image) = self.memory.get(key) {
            return Some(image);
        }

        let bytes = self.disk.data(key).await?;
        let decoded = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
            .await
            .ok()?
            .ok()?;

        let image = Arc::new(decoded);
        self.memory.insert(image.clone(), key);
        Some(image)
    }

    /// Store `image` under `key`: memory tier synchronously, disk tier from a
    /// background task. Persistence failures are logged and swallowed; the
    /// memory tier stays authoritative for this process lifetime.
    pub fn insert(&self, image: Arc<DynamicImage>, key: &str) {
        self.memory.insert(image.clone(), key);

        let disk = self.disk.clone();
        let key = key.to_owned();
        tokio::spawn(async move {
            if let Err(e) = persist(&disk, &image, &key).await {
                tracing::warn!("Failed to persist image {}: {}", key, e);
            }
        });
    }
}

async fn persist(disk: &DiskCache, image: &Arc<DynamicImage>, key: &str) -> Result<()> {
    let image = image.clone();
    let bytes = tokio::task::spawn_blocking(move || encode(&image))
        .await
        .map_err(|e| std::io::Error::other(e))??;
    disk.store(&bytes, key).await
}

/// PNG when lossless encoding succeeds, otherwise high-quality JPEG (which
/// requires dropping any alpha channel first).
fn encode(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    if image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png).is_ok() {
        return Ok(buf);
    }

    buf.clear();
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, 95))?;
    Ok(buf)
}
