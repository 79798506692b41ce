use anyhow::{bail, Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::config::settings::DirectoryConfig;

/// Static homeroom -> district-ID table, read-only at request time.
///
/// Homeroom names are kept sorted (BTreeMap), so `/homerooms` output is
/// deterministic; the district-ID list for a homeroom keeps its source
/// order, which defines the order of the per-student response.
#[derive(Debug, Clone, Default)]
pub struct HomeroomDirectory {
    entries: BTreeMap<String, Vec<String>>,
}

impl HomeroomDirectory {
    pub fn new(entries: BTreeMap<String, Vec<String>>) -> Self {
        Self { entries }
    }

    /// Build the directory from the configured source (JSON file or inline
    /// table). Loaded once at startup and reused across requests.
    pub fn from_config(cfg: &DirectoryConfig) -> Result<Self> {
        match (&cfg.path, &cfg.inline) {
            (Some(path), None) => Self::from_file(path),
            (None, Some(table)) => Ok(Self::new(table.clone())),
            _ => bail!("directory: one of 'path' or 'inline' is required"),
        }
    }

    /// Load a JSON file of the form `{ "301": ["1001", "1002"], ... }`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("reading directory file '{}'", path.as_ref().display()))?;
        let entries: BTreeMap<String, Vec<String>> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing directory file '{}'", path.as_ref().display()))?;
        Ok(Self::new(entries))
    }

    /// District IDs for a homeroom, in directory order.
    /// Unknown names are a miss, never an empty list.
    pub fn lookup(&self, homeroom: &str) -> Option<&[String]> {
        self.entries.get(homeroom).map(|ids| ids.as_slice())
    }

    /// All known homeroom names, sorted, no duplicates.
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
