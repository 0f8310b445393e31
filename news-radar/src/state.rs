use crate::types::{RadarError, Result, SeenStore};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tempfile::NamedTempFile;
use tracing::{debug, info};

pub const DEFAULT_STATE_PATH: &str = "seen.json";

/// Where the seen-set lives between runs.
pub trait SeenStateStore: Send + Sync {
    /// Load the mapping. A missing store is empty; a corrupt one is an error.
    fn load(&self) -> Result<SeenStore>;

    /// Persist the full mapping, replacing what was there.
    fn save(&self, store: &SeenStore) -> Result<()>;

    fn describe(&self) -> String;
}

/// Seen-set persisted as a pretty-printed JSON object.
pub struct JsonStateFile {
    path: PathBuf,
}

impl JsonStateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SeenStateStore for JsonStateFile {
    fn load(&self) -> Result<SeenStore> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No state at {}, starting empty", self.path.display());
                return Ok(SeenStore::new());
            }
            Err(e) => return Err(e.into()),
        };

        let store: SeenStore =
            serde_json::from_str(&content).map_err(|source| RadarError::StateCorruption {
                path: self.path.clone(),
                source,
            })?;

        info!("Loaded {} seen records from {}", store.len(), self.path.display());
        Ok(store)
    }

    fn save(&self, store: &SeenStore) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        // Write next to the target, then rename over it
        let mut tmp = NamedTempFile::new_in(&dir)?;
        serde_json::to_writer_pretty(&mut tmp, store)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| RadarError::StatePersist {
            path: self.path.clone(),
            reason: e.error.to_string(),
        })?;

        info!("Saved {} seen records to {}", store.len(), self.path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

/// In-memory seen-set, for tests and previews.
#[derive(Default)]
pub struct MemoryState {
    store: Mutex<SeenStore>,
    saves: AtomicUsize,
}

impl MemoryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(store: SeenStore) -> Self {
        Self {
            store: Mutex::new(store),
            saves: AtomicUsize::new(0),
        }
    }

    /// Current contents.
    pub fn snapshot(&self) -> SeenStore {
        self.store.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl SeenStateStore for MemoryState {
    fn load(&self) -> Result<SeenStore> {
        self.store
            .lock()
            .map(|s| s.clone())
            .map_err(|_| RadarError::General("memory state lock poisoned".to_string()))
    }

    fn save(&self, store: &SeenStore) -> Result<()> {
        let mut guard = self
            .store
            .lock()
            .map_err(|_| RadarError::General("memory state lock poisoned".to_string()))?;
        *guard = store.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        debug!("Saved {} seen records in memory", store.len());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
