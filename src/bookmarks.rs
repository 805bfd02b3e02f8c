//! Bookmarked names.
//!
//! Bookmarks live in a small JSON file that acts as a string key-value
//! store. The configured key holds a JSON-encoded list of names:
//!
//! ```json
//! { "@userdata_bookmark_names": "[\"Minato Aqua\",\"Hoshimachi Suisei\"]" }
//! ```
//!
//! Names are kept in insertion order without duplicates. A missing file, a
//! missing key or unreadable contents all read as an empty list.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::config::BookmarksConfig;

pub struct BookmarkStore {
    path: PathBuf,
    key: String,
}

impl BookmarkStore {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }

    pub fn from_config(config: &BookmarksConfig) -> Self {
        Self::new(config.path.clone(), config.key.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The bookmarked names, or an empty list if they cannot be read.
    pub fn get(&self) -> Vec<String> {
        match self.read_list() {
            Ok(names) => names,
            Err(e) => {
                warn!(error = %e, path = %self.path.display(), "failed to read bookmarks");
                Vec::new()
            }
        }
    }

    /// Replace the stored list.
    pub fn set(&self, names: &[String]) -> Result<()> {
        let mut entries = self.read_entries().unwrap_or_else(|e| {
            warn!(error = %e, "bookmark file unreadable, starting over");
            BTreeMap::new()
        });
        let encoded = serde_json::to_string(names)?;
        entries.insert(self.key.clone(), encoded);
        self.write_entries(&entries)
    }

    /// Add `name` at the end unless it is already bookmarked.
    ///
    /// Returns whether the list changed.
    pub fn append(&self, name: &str) -> Result<bool> {
        let mut names = self.get();
        if names.iter().any(|n| n == name) {
            debug!(name, "already bookmarked");
            return Ok(false);
        }
        names.push(name.to_string());
        self.set(&names)?;
        Ok(true)
    }

    /// Remove `name`. Returns whether it was present.
    pub fn remove(&self, name: &str) -> Result<bool> {
        let mut names = self.get();
        let before = names.len();
        names.retain(|n| n != name);
        if names.len() == before {
            return Ok(false);
        }
        self.set(&names)?;
        Ok(true)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get().iter().any(|n| n == name)
    }

    fn read_list(&self) -> Result<Vec<String>> {
        let entries = self.read_entries()?;
        match entries.get(&self.key) {
            Some(encoded) => serde_json::from_str(encoded)
                .with_context(|| format!("bookmark key {} is not a JSON list", self.key)),
            None => Ok(Vec::new()),
        }
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.path.display()))
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        let content = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}
