//! Recently selected destinations, kept in a JSON file.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use super::Place;

/// How many destinations are remembered.
pub const MAX_RECENT: usize = 5;

/// Errors from the recent-destinations store.
#[derive(Debug, thiserror::Error)]
pub enum RecentStoreError {
    /// Failed to create the parent directory or write the file
    #[error("failed to write {path}: {message}")]
    Write { path: String, message: String },

    /// Failed to serialize the list
    #[error("failed to serialize recent destinations: {message}")]
    Serialize { message: String },
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RecentFile {
    destinations: Vec<Place>,
}

/// Most-recent-first list of destinations, deduplicated by name.
///
/// A missing or unreadable file reads as an empty list.
#[derive(Debug)]
pub struct RecentDestinations {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl RecentDestinations {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Get the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the list, most recent first.
    pub fn load(&self) -> Vec<Place> {
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|contents| serde_json::from_str::<RecentFile>(&contents).ok())
            .map(|file| file.destinations)
            .unwrap_or_default()
    }

    /// Move `place` to the front of the list and persist it.
    ///
    /// Returns the updated list.
    pub fn record(&self, place: &Place) -> Result<Vec<Place>, RecentStoreError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let destinations = with_recent(self.load(), place);
        self.save(&destinations)?;
        Ok(destinations)
    }

    fn save(&self, destinations: &[Place]) -> Result<(), RecentStoreError> {
        let write_err = |e: std::io::Error| RecentStoreError::Write {
            path: self.path.display().to_string(),
            message: e.to_string(),
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }

        let file = RecentFile {
            destinations: destinations.to_vec(),
        };
        let json = serde_json::to_string_pretty(&file).map_err(|e| RecentStoreError::Serialize {
            message: e.to_string(),
        })?;

        std::fs::write(&self.path, json).map_err(write_err)
    }
}

/// `place` first, then the previous entries without any of the same name.
fn with_recent(previous: Vec<Place>, place: &Place) -> Vec<Place> {
    std::iter::once(place.clone())
        .chain(previous.into_iter().filter(|p| p.name != place.name))
        .take(MAX_RECENT)
        .collect()
}
