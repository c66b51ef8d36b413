//! Human-curated corrections for titles automatic matching gets wrong.
//!
//! The override file is YAML with two top-level lists:
//!
//! ```yaml
//! overrides:
//!   - kind: correction
//!     raw: "Davinci Cope, The"
//!     title: "The Da Vinci Code"
//!   - kind: collection_split
//!     raw: "Candy Man 1,2,3"
//!     titles: ["Candyman", "Candyman: Farewell to the Flesh"]
//! aliases:
//!   - unenriched: "Lone Ranger"
//!     enriched: "Lone Ranger, The"
//! ```
//!
//! `overrides` is keyed by the exact raw title and is consulted before any
//! automatic matching. `aliases` drives the duplicate resolver's alias pass.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The override table shipped with the binary.
const BUILTIN_OVERRIDES: &str = include_str!("../data/overrides.yaml");

#[derive(Debug, Error)]
pub enum OverrideError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("YAML parse error in {path}: {source}")]
    Parse {
        path: String,
        source: serde_yml::Error,
    },
    #[error("Duplicate override for raw title '{0}'")]
    DuplicateRaw(String),
    #[error("Collection split for '{0}' has no titles")]
    EmptySplit(String),
}

/// A curated fix for one raw title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverrideEntry {
    /// Search for `title` instead of the raw text, and store `title` when it
    /// matches.
    Correction { raw: String, title: String },
    /// The raw entry names several movies; replace it with one record per
    /// title.
    CollectionSplit { raw: String, titles: Vec<String> },
}

impl OverrideEntry {
    /// The raw title this entry is keyed by.
    pub fn raw(&self) -> &str {
        match self {
            OverrideEntry::Correction { raw, .. } => raw,
            OverrideEntry::CollectionSplit { raw, .. } => raw,
        }
    }
}

/// A known pair of titles naming the same movie, where the enriched variant
/// should survive and the unenriched one be removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasPair {
    pub unenriched: String,
    pub enriched: String,
}

/// On-disk format.
#[derive(Debug, Default, Serialize, Deserialize)]
struct OverrideFile {
    #[serde(default)]
    overrides: Vec<OverrideEntry>,
    #[serde(default)]
    aliases: Vec<AliasPair>,
}

/// Read-only lookup over the curated override data.
#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    entries: HashMap<String, OverrideEntry>,
    aliases: Vec<AliasPair>,
}

impl OverrideTable {
    /// Build a table from entries and alias pairs.
    pub fn new(
        entries: Vec<OverrideEntry>,
        aliases: Vec<AliasPair>,
    ) -> Result<Self, OverrideError> {
        let mut map = HashMap::with_capacity(entries.len());
        for entry in entries {
            if let OverrideEntry::CollectionSplit { raw, titles } = &entry {
                if titles.is_empty() {
                    return Err(OverrideError::EmptySplit(raw.clone()));
                }
            }
            let raw = entry.raw().to_string();
            if map.insert(raw.clone(), entry).is_some() {
                return Err(OverrideError::DuplicateRaw(raw));
            }
        }
        Ok(Self {
            entries: map,
            aliases,
        })
    }

    /// The override table embedded in the binary.
    pub fn builtin() -> Self {
        Self::from_yaml_str(BUILTIN_OVERRIDES, "<builtin>")
            .expect("built-in override table must be valid")
    }

    /// Load an override table from a YAML file.
    pub fn load(path: &Path) -> Result<Self, OverrideError> {
        let contents = std::fs::read_to_string(path).map_err(|e| OverrideError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml_str(&contents, &path.display().to_string())
    }

    /// Parse an override table from YAML text. `origin` is used in errors.
    pub fn from_yaml_str(contents: &str, origin: &str) -> Result<Self, OverrideError> {
        let file: OverrideFile =
            serde_yml::from_str(contents).map_err(|e| OverrideError::Parse {
                path: origin.to_string(),
                source: e,
            })?;
        Self::new(file.overrides, file.aliases)
    }

    /// Look up the override for an exact raw title.
    pub fn lookup(&self, raw: &str) -> Option<&OverrideEntry> {
        self.entries.get(raw)
    }

    /// Curated alias pairs, in file order.
    pub fn aliases(&self) -> &[AliasPair] {
        &self.aliases
    }

    /// Number of override entries (aliases not included).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
