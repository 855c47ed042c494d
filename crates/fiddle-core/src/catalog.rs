//! Library catalog snapshots.
//!
//! A [`LibraryCatalog`] is immutable once built. Refreshing the catalog means
//! building a new snapshot and swapping it into a [`CatalogHandle`]; readers
//! holding an older snapshot keep a consistent view until they drop it.

use std::path::Path;
use std::sync::{Arc, RwLock};

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::library::Library;

/// Immutable set of known libraries, indexed by coordinate.
#[derive(Debug, Clone, Default)]
pub struct LibraryCatalog {
    libraries: Vec<Library>,
    index: FxHashMap<String, usize>,
}

impl LibraryCatalog {
    /// Build a catalog. When two entries share a coordinate the first wins.
    pub fn new(libraries: impl IntoIterator<Item = Library>) -> Self {
        let mut catalog = Self::default();
        for lib in libraries {
            let coordinate = lib.stringify();
            if catalog.index.contains_key(&coordinate) {
                tracing::debug!("Ignoring duplicate catalog entry {}", coordinate);
                continue;
            }
            catalog.index.insert(coordinate, catalog.libraries.len());
            catalog.libraries.push(lib);
        }
        catalog
    }

    /// Parse a catalog from a JSON array of libraries.
    pub fn from_json(json: &str) -> Result<Self> {
        let libraries: Vec<Library> = serde_json::from_str(json)
            .map_err(|e| Error::Catalog(format!("invalid catalog: {}", e)))?;
        Ok(Self::new(libraries))
    }

    /// Load a catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::Catalog(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Look up a library by its exact coordinate string.
    pub fn find_library(&self, coordinate: &str) -> Option<&Library> {
        self.index.get(coordinate).map(|&i| &self.libraries[i])
    }

    /// All libraries, in catalog order.
    pub fn list_all(&self) -> &[Library] {
        &self.libraries
    }

    /// Libraries available for a language-version tag.
    pub fn list_for(&self, version_tag: &str) -> Vec<Library> {
        self.libraries
            .iter()
            .filter(|lib| lib.supports(version_tag))
            .cloned()
            .collect()
    }

    /// Resolve dependency coordinates, dropping the ones not in the catalog.
    ///
    /// Order and duplicates of the input are preserved.
    pub fn resolve_all<S: AsRef<str>>(&self, coordinates: &[S]) -> Vec<Library> {
        coordinates
            .iter()
            .filter_map(|coordinate| {
                let coordinate = coordinate.as_ref();
                let found = self.find_library(coordinate);
                if found.is_none() {
                    tracing::debug!("Dropping unknown dependency {}", coordinate);
                }
                found.cloned()
            })
            .collect()
    }

    /// Number of libraries.
    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    /// Whether the catalog has no libraries.
    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }
}

/// Shared, swappable reference to the current catalog snapshot.
#[derive(Debug, Default)]
pub struct CatalogHandle {
    current: RwLock<Arc<LibraryCatalog>>,
}

impl CatalogHandle {
    /// Create a handle around an initial snapshot.
    pub fn new(catalog: LibraryCatalog) -> Self {
        Self {
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<LibraryCatalog> {
        self.current
            .read()
            .expect("catalog lock poisoned")
            .clone()
    }

    /// Swap in a new snapshot.
    pub fn replace(&self, catalog: LibraryCatalog) {
        *self.current.write().expect("catalog lock poisoned") = Arc::new(catalog);
    }

    /// Reload from a catalog file, keeping the current snapshot on failure.
    ///
    /// Returns the number of libraries in the new snapshot.
    pub fn reload_from_file(&self, path: impl AsRef<Path>) -> Result<usize> {
        let catalog = LibraryCatalog::load(path)?;
        let count = catalog.len();
        self.replace(catalog);
        tracing::info!("Library catalog reloaded ({} libraries)", count);
        Ok(count)
    }
}
