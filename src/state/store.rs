//! Best-time persistence.
//!
//! A single scalar survives restarts: the fastest measured reaction in
//! milliseconds. Store failures are reported as [`StoreError`] and the
//! controller degrades around them, so nothing here is ever fatal.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

/// Best-time store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Storage could not be read or written.
    #[error("best-time store unavailable: {0}")]
    Unavailable(#[from] io::Error),

    /// Stored value is not a non-negative integer.
    #[error("invalid stored best time: {0}")]
    InvalidValue(String),
}

/// Persistent best-time slot.
pub trait BestTimeStore {
    /// Read the stored best time. `Ok(None)` means nothing stored yet.
    fn load(&self) -> Result<Option<u64>, StoreError>;

    /// Replace the stored best time.
    fn save(&mut self, millis: u64) -> Result<(), StoreError>;
}

/// Strict-improvement rule for records.
///
/// Equal times never count, so re-saving the same value can't happen.
pub fn is_new_record(best: Option<u64>, candidate: u64) -> bool {
    match best {
        Some(best) => candidate < best,
        None => true,
    }
}

/// On-disk document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredBestTime {
    pub best_reaction_time_ms: u64,
    pub recorded_at: chrono::DateTime<chrono::Utc>,
}

/// Best time kept as a JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the full document, including when it was recorded.
    pub fn load_record(&self) -> Result<Option<StoredBestTime>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Unavailable(e)),
        };

        serde_json::from_str::<StoredBestTime>(&raw)
            .map(Some)
            .map_err(|e| StoreError::InvalidValue(e.to_string()))
    }

    /// Forget the stored best time.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Unavailable(e)),
        }
    }
}

impl BestTimeStore for FileStore {
    fn load(&self) -> Result<Option<u64>, StoreError> {
        Ok(self.load_record()?.map(|r| r.best_reaction_time_ms))
    }

    fn save(&mut self, millis: u64) -> Result<(), StoreError> {
        let record = StoredBestTime {
            best_reaction_time_ms: millis,
            recorded_at: chrono::Utc::now(),
        };
        let body = serde_json::to_string_pretty(&record).map_err(io::Error::other)?;

        // Temp file next to the target, then rename over it, so a crash
        // mid-write leaves the previous record intact.
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(body.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// In-process store.
///
/// Used for sessions that shouldn't touch disk, and to simulate storage
/// failures.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<u64>,
    pub fail_loads: bool,
    pub fail_saves: bool,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(millis: u64) -> Self {
        Self {
            value: Some(millis),
            ..Self::default()
        }
    }

    /// Stored value, ignoring `fail_loads`.
    pub fn value(&self) -> Option<u64> {
        self.value
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl BestTimeStore for MemoryStore {
    fn load(&self) -> Result<Option<u64>, StoreError> {
        if self.fail_loads {
            return Err(StoreError::Unavailable(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "storage disabled",
            )));
        }
        Ok(self.value)
    }

    fn save(&mut self, millis: u64) -> Result<(), StoreError> {
        if self.fail_saves {
            return Err(StoreError::Unavailable(io::Error::other("storage full")));
        }
        self.value = Some(millis);
        self.saves += 1;
        Ok(())
    }
}
