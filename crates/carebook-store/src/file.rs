//! JSON file implementation of `RecordStore`.
//!
//! The whole collection lives in one JSON object keyed by patient id. Every
//! `load()` reads and parses the full file; every `save()` serializes the
//! full map to a sibling temporary file and renames it over the original,
//! so a reader never sees a half-written store. Nothing is cached between
//! calls.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use carebook_contracts::{
    error::{CarebookError, CarebookResult},
    patient::PatientMap,
};
use carebook_core::traits::RecordStore;

/// A patient store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Point a store at `path`. The file is not touched until the first call.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create an empty store file at `path`.
    ///
    /// Refuses to overwrite an existing file unless `force` is set.
    pub fn init(path: impl Into<PathBuf>, force: bool) -> CarebookResult<Self> {
        let store = Self::new(path);
        if store.path.exists() && !force {
            return Err(CarebookError::Storage {
                reason: format!(
                    "patient store '{}' already exists; pass --force to replace it",
                    store.path.display()
                ),
            });
        }
        store.save(&PatientMap::new())?;
        info!(path = %store.path.display(), "initialized empty patient store");
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "patients.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl RecordStore for JsonFileStore {
    fn load(&self) -> CarebookResult<PatientMap> {
        let contents = fs::read_to_string(&self.path).map_err(|e| CarebookError::Storage {
            reason: format!("failed to read patient store '{}': {}", self.path.display(), e),
        })?;

        let patients: PatientMap =
            serde_json::from_str(&contents).map_err(|e| CarebookError::Storage {
                reason: format!("patient store '{}' is corrupt: {}", self.path.display(), e),
            })?;

        debug!(path = %self.path.display(), count = patients.len(), "patient store loaded");
        Ok(patients)
    }

    fn save(&self, patients: &PatientMap) -> CarebookResult<()> {
        let json = serde_json::to_string_pretty(patients).map_err(|e| CarebookError::Storage {
            reason: format!("failed to serialize patient store: {e}"),
        })?;

        let temp = self.temp_path();
        fs::write(&temp, json).map_err(|e| CarebookError::Storage {
            reason: format!("failed to write '{}': {}", temp.display(), e),
        })?;
        if let Err(e) = fs::rename(&temp, &self.path) {
            if let Err(cleanup) = fs::remove_file(&temp) {
                warn!(path = %temp.display(), error = %cleanup, "failed to remove temp store file");
            }
            return Err(CarebookError::Storage {
                reason: format!(
                    "failed to replace patient store '{}': {}",
                    self.path.display(),
                    e
                ),
            });
        }

        debug!(path = %self.path.display(), count = patients.len(), "patient store saved");
        Ok(())
    }
}
