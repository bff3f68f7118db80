use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use crate::app::Result;

/// Namespaced key → bytes persistent cache.
///
/// One directory per namespace, one file per key, no index: presence of the
/// file is the source of truth. Writes replace atomically (temp file +
/// rename), so a concurrent reader sees either the old payload or the new
/// one, never a truncated file. All operations on one instance serialize
/// through an internal gate; separate namespaces are independent instances.
pub struct DiskCache {
    dir: PathBuf,
    gate: Mutex<()>,
}

impl DiskCache {
    /// Open (creating if needed) the namespace directory under `root`.
    pub fn new(root: &Path, namespace: &str) -> Result<Self> {
        let dir = root.join(namespace);
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            gate: Mutex::new(()),
        })
    }

    /// Persist `data` under `key`, replacing any prior value.
    ///
    /// Propagates IO errors; readers of the same instance never observe a
    /// partial write.
    pub async fn store(&self, data: &[u8], key: &str) -> Result<()> {
        let _guard = self.gate.lock().await;

        // The namespace directory can disappear under us (e.g. after clear()
        // raced an external cleanup); recreate before writing.
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.file_path(key);
        let tmp = self.dir.join(format!("{key}.tmp"));
        tokio::fs::write(&tmp, data).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Read the payload stored under `key`.
    ///
    /// Any read failure (missing file, unreadable medium) degrades to `None`.
    pub async fn data(&self, key: &str) -> Option<Vec<u8>> {
        let _guard = self.gate.lock().await;
        tokio::fs::read(self.file_path(key)).await.ok()
    }

    /// Best-effort removal; idempotent.
    pub async fn remove(&self, key: &str) {
        let _guard = self.gate.lock().await;
        if let Err(e) = tokio::fs::remove_file(self.file_path(key)).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to remove cache entry {}: {}", key, e);
            }
        }
    }

    /// Best-effort removal of every entry in the namespace; idempotent.
    pub async fn clear(&self) {
        let _guard = self.gate.lock().await;
        if let Err(e) = tokio::fs::remove_dir_all(&self.dir).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to clear cache dir {}: {}", self.dir.display(), e);
            }
        }
        if let Err(e) = tokio::fs::create_dir_all(&self.dir).await {
            tracing::warn!(
                "Failed to recreate cache dir {}: {}",
                self.dir.display(),
                e
            );
        }
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}
