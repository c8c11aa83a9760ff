//! Persistent key-value storage for per-device preferences.
//!
//! Two backends ship with the crate:
//!
//! - [`MemoryPreferences`] -- a plain map, lost on exit.
//! - [`FsPreferences`] -- one file per key under a base directory.

mod fs;

pub use fs::FsPreferences;

use std::collections::HashMap;

use crate::error::{Result, WorkinfoError};

/// Small string store, the counterpart of browser local storage.
pub trait Preferences: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Keys become file names, so they are restricted to a safe alphabet.
pub(crate) fn check_key(key: &str) -> Result<()> {
    let ok = !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if ok {
        Ok(())
    } else {
        Err(WorkinfoError::Preferences(
            format!("invalid preference key {key:?}").into(),
        ))
    }
}

/// In-memory [`Preferences`].
#[derive(Clone, Debug, Default)]
pub struct MemoryPreferences {
    values: HashMap<String, String>,
}

impl MemoryPreferences {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Preferences for MemoryPreferences {
    fn get(&self, key: &str) -> Result<Option<String>> {
        check_key(key)?;
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        check_key(key)?;
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
