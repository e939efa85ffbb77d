//! Storage backend abstraction.
//!
//! The trait is deliberately small: the worker needs to restore preferences
//! at startup and write them back whenever they change.

use crate::domain::error::Result;
use crate::storage::models::PreferencesRecord;

/// Abstraction over persistent storage backends.
///
/// # Implementations
///
/// - [`JsonStorage`](crate::storage::JsonStorage): JSON file with atomic writes
///
/// # Examples
///
/// ```no_run
/// use storefront_core::storage::{JsonStorage, Storage};
/// use std::path::PathBuf;
///
/// let storage = JsonStorage::new(PathBuf::from("/tmp/preferences.json"))?;
/// let record = storage.load_preferences()?;
/// println!("{} wishlisted", record.wishlist.len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Storage: Send {
    /// Returns the stored preferences, or defaults if none were ever saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the read operation fails.
    fn load_preferences(&self) -> Result<PreferencesRecord>;

    /// Replaces the stored preferences.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn save_preferences(&mut self, record: &PreferencesRecord) -> Result<()>;
}
