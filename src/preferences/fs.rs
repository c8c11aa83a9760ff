//! Filesystem preferences backend.

use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::{Result, WorkinfoError};
use crate::preferences::{Preferences, check_key};

/// [`Preferences`] stored as one file per key.
///
/// The base directory is created on first write.
///
/// # Example
///
/// ```rust,no_run
/// use workinfo::FsPreferences;
///
/// let prefs = FsPreferences::new("/var/lib/workinfo/prefs");
/// ```
pub struct FsPreferences {
    base_dir: PathBuf,
}

impl FsPreferences {
    /// Store values under `base_dir`. The directory is created on first write.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }
}

impl Preferences for FsPreferences {
    fn get(&self, key: &str) -> Result<Option<String>> {
        check_key(key)?;
        match std::fs::read_to_string(self.base_dir.join(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(WorkinfoError::Preferences(Box::new(e))),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        check_key(key)?;
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| WorkinfoError::Preferences(Box::new(e)))?;

        let path = self.base_dir.join(key);
        std::fs::write(&path, value).map_err(|e| WorkinfoError::Preferences(Box::new(e)))?;

        tracing::debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}
