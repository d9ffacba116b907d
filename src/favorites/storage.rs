use async_trait::async_trait;
use log::debug;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Backend holding the single durable favorites record
#[async_trait]
pub trait FavoritesStorage: Send + Sync {
    /// Read the raw record, `None` when nothing has been stored yet
    async fn load(&self) -> io::Result<Option<String>>;

    /// Replace the raw record
    async fn save(&self, record: &str) -> io::Result<()>;
}

/// Stores the record as `<dir>/<key>.json`
///
/// Saves go to `<key>.json.tmp` first and are renamed over the record, so an
/// interrupted save never leaves a half-written record behind.
pub struct FileStorage {
    path: PathBuf,
    staging: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        FileStorage {
            path: dir.as_ref().join(format!("{}.json", key)),
            staging: dir.as_ref().join(format!("{}.json.tmp", key)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl FavoritesStorage for FileStorage {
    async fn load(&self) -> io::Result<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(record) => Ok(Some(record)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No favorites record at {}", self.path.display());
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn save(&self, record: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.staging, record).await?;
        tokio::fs::rename(&self.staging, &self.path).await
    }
}

/// Keeps the record in memory and counts writes
#[derive(Default)]
pub struct MemoryStorage {
    record: Mutex<Option<String>>,
    saves: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing record, as if written by an earlier run
    pub fn with_record(record: impl Into<String>) -> Self {
        MemoryStorage {
            record: Mutex::new(Some(record.into())),
            saves: AtomicUsize::new(0),
        }
    }

    pub fn record(&self) -> Option<String> {
        self.record
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of completed `save` calls
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FavoritesStorage for MemoryStorage {
    async fn load(&self) -> io::Result<Option<String>> {
        Ok(self.record())
    }

    async fn save(&self, record: &str) -> io::Result<()> {
        *self
            .record
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(record.to_string());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
