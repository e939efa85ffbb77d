//! Append-only trace file with size-based rotation.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// When to rotate and how many rotated files to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    pub max_bytes: u64,
    pub max_backups: usize,
}

impl Default for RotationPolicy {
    /// 10 MB per file, three backups.
    fn default() -> Self {
        Self {
            max_bytes: 10 * 1024 * 1024,
            max_backups: 3,
        }
    }
}

/// Line writer shared between exporter calls.
///
/// Before each write the current file is checked against the policy; an
/// oversized file is renamed to `<name>.<unix_millis>` and a fresh file is
/// started. Backups beyond `max_backups` are deleted, oldest first.
pub struct FileWriter {
    file_path: PathBuf,
    policy: RotationPolicy,
    /// Opened on first write.
    file: Mutex<Option<File>>,
}

impl FileWriter {
    pub const fn new(file_path: PathBuf, policy: RotationPolicy) -> Self {
        Self {
            file_path,
            policy,
            file: Mutex::new(None),
        }
    }

    /// Appends `line` plus a newline and flushes.
    ///
    /// # Errors
    ///
    /// Fails on I/O errors or if a previous writer panicked holding the lock.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut guard = self
            .file
            .lock()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("trace writer poisoned: {e}")))?;

        if self.needs_rotation() {
            *guard = None;
            self.rotate()?;
        }

        if guard.is_none() {
            *guard = Some(OpenOptions::new().create(true).append(true).open(&self.file_path)?);
        }
        let file = guard
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "trace file unavailable"))?;

        writeln!(file, "{line}")?;
        file.flush()
    }

    fn needs_rotation(&self) -> bool {
        fs::metadata(&self.file_path).is_ok_and(|m| m.len() > self.policy.max_bytes)
    }

    fn rotate(&self) -> io::Result<()> {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_millis());

        let mut backup = self.file_path.clone().into_os_string();
        backup.push(format!(".{millis}"));
        fs::rename(&self.file_path, PathBuf::from(backup))?;

        self.prune_backups()
    }

    fn prune_backups(&self) -> io::Result<()> {
        let Some(dir) = self.file_path.parent() else {
            return Ok(());
        };
        let Some(prefix) = self.file_path.file_name().and_then(|n| n.to_str()).map(|n| format!("{n}.")) else {
            return Ok(());
        };

        let mut backups: Vec<(u128, PathBuf)> = fs::read_dir(dir)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter_map(|path| backup_stamp(&path, &prefix).map(|stamp| (stamp, path)))
            .collect();

        backups.sort_by(|a, b| b.0.cmp(&a.0));
        for (_, stale) in backups.iter().skip(self.policy.max_backups) {
            let _ = fs::remove_file(stale);
        }
        Ok(())
    }
}

/// Parses the timestamp suffix of a rotated file name.
fn backup_stamp(path: &Path, prefix: &str) -> Option<u128> {
    path.file_name()?.to_str()?.strip_prefix(prefix)?.parse().ok()
}

impl std::fmt::Debug for FileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWriter")
            .field("file_path", &self.file_path)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
