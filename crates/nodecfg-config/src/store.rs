//! Persistence contract for the configuration document plus the file-backed and
//! in-memory implementations.
//!
//! # Design
//! - `ConfigStore::set` is an atomic replace: readers observe either the old or the
//!   new document, never a partial write.
//! - Path-level accessors are default methods built on whole-document get/set so
//!   every implementation inherits the same semantics.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;
use tracing::{debug, instrument};

use crate::error::{ConfigError, ConfigResult};
use crate::model::ConfigDocument;

/// Name of the configuration file inside a repository directory.
pub const CONFIG_FILE_NAME: &str = "config";

#[async_trait]
/// Key-value configuration store with atomic whole-document replacement.
pub trait ConfigStore: Send + Sync {
    /// Load the current document.
    async fn get(&self) -> ConfigResult<ConfigDocument>;

    /// Atomically replace the stored document.
    async fn set(&self, document: &ConfigDocument) -> ConfigResult<()>;

    /// Read the value at a dotted key path.
    async fn get_path(&self, path: &str) -> ConfigResult<Value> {
        let document = self.get().await?;
        document
            .get(path)?
            .cloned()
            .ok_or_else(|| ConfigError::PathNotFound {
                path: path.to_string(),
            })
    }

    /// Write the value at a dotted key path and persist the whole document.
    async fn set_path(&self, path: &str, value: Value) -> ConfigResult<()> {
        let mut document = self.get().await?;
        document.set(path, value)?;
        self.set(&document).await
    }
}

/// Store backed by a JSON file, replaced through a sibling temp file and `rename`.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    /// Store reading and writing the given file.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store for the `config` file inside a repository directory.
    #[must_use]
    pub fn in_repo(repo: &Path) -> Self {
        Self::new(repo.join(CONFIG_FILE_NAME))
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(format!(".tmp-{}", std::process::id()));
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    #[instrument(name = "config_store.get", skip(self), fields(path = %self.path.display()))]
    async fn get(&self) -> ConfigResult<ConfigDocument> {
        let text = fs::read_to_string(&self.path)
            .await
            .map_err(|err| ConfigError::store_io("read", &self.path, err))?;
        ConfigDocument::from_json_str(&text)
    }

    #[instrument(name = "config_store.set", skip(self, document), fields(path = %self.path.display()))]
    async fn set(&self, document: &ConfigDocument) -> ConfigResult<()> {
        let payload = document.to_pretty_json()?;
        let temp_path = self.temp_path();
        if let Err(err) = fs::write(&temp_path, payload.as_bytes()).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(ConfigError::store_io("write", &temp_path, err));
        }
        if let Err(err) = fs::rename(&temp_path, &self.path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(ConfigError::store_io("replace", &self.path, err));
        }
        debug!(bytes = payload.len(), "configuration document replaced");
        Ok(())
    }
}

/// In-process store, used for previews and tests.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    document: Mutex<ConfigDocument>,
    writes: AtomicUsize,
}

impl MemoryConfigStore {
    /// Store seeded with a document.
    #[must_use]
    pub const fn new(document: ConfigDocument) -> Self {
        Self {
            document: Mutex::new(document),
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of successful `set` calls so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Copy of the stored document without going through the async contract.
    #[must_use]
    pub fn snapshot(&self) -> ConfigDocument {
        self.document
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn get(&self) -> ConfigResult<ConfigDocument> {
        Ok(self.snapshot())
    }

    async fn set(&self, document: &ConfigDocument) -> ConfigResult<()> {
        let mut guard = self.document.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = document.clone();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
