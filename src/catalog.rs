//! The fixed list of documents shown as thumbnails
//!
//! A catalog is defined once at startup, from the settings file, a catalog
//! YAML file, command-line paths, or the built-in default.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub title: String,
    pub url: String,
}

impl CatalogEntry {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("cannot read catalog {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot parse catalog {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("catalog {0:?} has no entries")]
    Empty(PathBuf),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    base_dir: Option<PathBuf>,
}

impl Catalog {
    #[must_use]
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self {
            entries,
            base_dir: None,
        }
    }

    /// Directory that relative URLs resolve against
    #[must_use]
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    /// The certificates shipped with the site
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(vec![
            CatalogEntry::new("ISO 9001 Certificate", "certificates/iso9001.pdf"),
            CatalogEntry::new("PEFC Certificate", "certificates/pefc.pdf"),
            CatalogEntry::new("ISO 14001 Certificate", "certificates/iso14001.pdf"),
            CatalogEntry::new("UIC-EUR Repair License", "certificates/reparatie.pdf"),
            CatalogEntry::new(
                "Transport Brokerage License",
                "certificates/licenta-arr.pdf",
            ),
        ])
    }

    /// One entry per file, titled by the file stem
    #[must_use]
    pub fn from_paths(paths: &[PathBuf]) -> Self {
        let entries = paths
            .iter()
            .map(|path| {
                let title = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.to_string_lossy().into_owned());
                CatalogEntry::new(title, path.to_string_lossy())
            })
            .collect();
        Self::new(entries)
    }

    /// Load a YAML list of `{ title, url }` entries.
    ///
    /// Relative URLs resolve against the catalog file's directory.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: Vec<CatalogEntry> =
            serde_yaml::from_str(&content).map_err(|source| CatalogError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        if entries.is_empty() {
            return Err(CatalogError::Empty(path.to_path_buf()));
        }
        debug!("Loaded {} catalog entries from {path:?}", entries.len());

        let catalog = Self::new(entries);
        Ok(match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => catalog.with_base_dir(dir),
            _ => catalog,
        })
    }

    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }
}
