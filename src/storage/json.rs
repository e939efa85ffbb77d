//! JSON file-based storage backend.
//!
//! Human-readable, and written atomically (write-to-temp + rename) so a crash
//! never leaves a half-written file behind.

use crate::domain::error::{Result, StorefrontError};
use crate::storage::backend::Storage;
use crate::storage::models::PreferencesRecord;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level structure serialized to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageData {
    /// Version of the storage format for future migrations.
    version: u32,

    #[serde(default)]
    preferences: PreferencesRecord,
}

impl Default for StorageData {
    fn default() -> Self {
        Self {
            version: 1,
            preferences: PreferencesRecord::default(),
        }
    }
}

/// JSON file storage backend.
///
/// The whole dataset is held in memory and persisted on every modification.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "preferences": {
///     "wishlist": ["gid://shopify/Product/1"],
///     "promo_banner_closed": false,
///     "reduced_motion": false,
///     "updated_at": 1760000000
///   }
/// }
/// ```
///
/// # Examples
///
/// ```
/// use storefront_core::storage::{JsonStorage, PreferencesRecord, Storage};
///
/// let dir = tempfile::tempdir()?;
/// let mut storage = JsonStorage::new(dir.path().join("preferences.json"))?;
///
/// let record = PreferencesRecord {
///     wishlist: vec!["p1".to_string()],
///     ..PreferencesRecord::default()
/// };
/// storage.save_preferences(&record)?;
/// assert_eq!(storage.load_preferences()?.wishlist, vec!["p1".to_string()]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct JsonStorage {
    /// Path of the JSON file. The temp file sits next to it with a `.tmp` extension.
    file_path: PathBuf,
    /// In-memory copy of the file contents.
    data: StorageData,
    /// Tracks if data has been modified since last save.
    dirty: bool,
}

impl JsonStorage {
    /// Creates or opens a JSON storage file. Parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - File exists but contains invalid JSON
    /// - File permissions prevent reading
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "initializing JSON storage");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("initializing new empty storage");
            StorageData::default()
        };

        Ok(Self {
            file_path,
            data,
            dirty: false,
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Reads and parses the storage file.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Io`] if the file cannot be read and
    /// [`StorefrontError::Storage`] if it is not valid JSON.
    fn load_from_file(path: &Path) -> Result<StorageData> {
        let contents = std::fs::read_to_string(path)?;
        let data: StorageData = serde_json::from_str(&contents)
            .map_err(|e| StorefrontError::Storage(format!("failed to parse JSON: {e}")))?;

        tracing::debug!(
            version = data.version,
            wishlist = data.preferences.wishlist.len(),
            "loaded storage data"
        );

        Ok(data)
    }

    /// Writes to a temporary file, then renames it over the target path.
    fn save_to_file(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| StorefrontError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::debug!(path = ?self.file_path, "storage saved");
        Ok(())
    }
}

impl Storage for JsonStorage {
    /// Returns the in-memory copy; the file is only read at construction.
    fn load_preferences(&self) -> Result<PreferencesRecord> {
        let _span = tracing::debug_span!("json_load_preferences").entered();
        Ok(self.data.preferences.clone())
    }

    /// Persists immediately. Saving an identical record skips the write.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization, the temp write, or the rename fails.
    /// The record stays marked dirty and is retried on drop.
    fn save_preferences(&mut self, record: &PreferencesRecord) -> Result<()> {
        let _span = tracing::debug_span!("json_save_preferences",
            wishlist = record.wishlist.len()
        )
        .entered();

        if self.data.preferences == *record {
            return Ok(());
        }

        self.data.preferences = record.clone();
        self.dirty = true;
        self.save_to_file()
    }
}

impl Drop for JsonStorage {
    fn drop(&mut self) {
        if self.dirty {
            tracing::debug!("saving dirty data on drop");
            if let Err(e) = self.save_to_file() {
                tracing::error!(error = %e, "failed to save on drop");
            }
        }
    }
}
