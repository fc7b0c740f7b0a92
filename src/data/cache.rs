use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;

use super::error::LoadError;
use super::loader::{load_bytes, LoadedDataset, SourceFormat};

/// BLAKE3 digest of a source file's bytes.
pub type Fingerprint = blake3::Hash;

struct CacheEntry {
    fingerprint: Fingerprint,
    loaded: Arc<LoadedDataset>,
}

/// Memoization table for datasets loaded from named files.
///
/// Keyed by the canonical path; the content fingerprint is the invalidation
/// key, so an edited file is re-parsed even if its path is unchanged.
/// Ad-hoc uploads bypass the cache entirely.
#[derive(Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, CacheEntry>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cleaned dataset for `path`, parsing only on a miss.
    ///
    /// The file is read once; a miss parses exactly the bytes that were
    /// fingerprinted.
    pub fn load(&mut self, path: &Path) -> Result<Arc<LoadedDataset>, LoadError> {
        let key = path.canonicalize()?;
        let format = SourceFormat::from_path(&key)?;
        let bytes = Bytes::from(std::fs::read(&key)?);
        let fingerprint = blake3::hash(&bytes);

        if let Some(entry) = self.entries.get(&key) {
            if entry.fingerprint == fingerprint {
                log::debug!("cache hit for {}", key.display());
                return Ok(Arc::clone(&entry.loaded));
            }
            log::debug!("{} changed on disk, reloading", key.display());
        }

        let loaded = Arc::new(load_bytes(format, bytes)?);
        log::info!(
            "loaded {} rows from {} ({} dropped)",
            loaded.cleaning.rows_kept,
            key.display(),
            loaded.cleaning.rows_dropped()
        );
        self.entries.insert(
            key,
            CacheEntry {
                fingerprint,
                loaded: Arc::clone(&loaded),
            },
        );
        Ok(loaded)
    }

    /// Drop the entry for `path`, if any.
    pub fn invalidate(&mut self, path: &Path) {
        if let Ok(key) = path.canonicalize() {
            self.entries.remove(&key);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
data,cidade,produto,quantidade,preco_unit
2024-01-01,SP,Caneca,2,10.00
2024-01-02,RJ,Copo,1,5.00
";

    #[test]
    fn repeated_load_returns_cached_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vendas.csv");
        std::fs::write(&path, CSV).unwrap();

        let mut cache = DatasetCache::new();
        let first = cache.load(&path).unwrap();
        let second = cache.load(&path).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn changed_content_is_reparsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vendas.csv");
        std::fs::write(&path, CSV).unwrap();

        let mut cache = DatasetCache::new();
        let first = cache.load(&path).unwrap();

        std::fs::write(&path, format!("{CSV}2024-01-03,BH,Prato,3,2.00\n")).unwrap();
        let second = cache.load(&path).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first.dataset.len(), 2);
        assert_eq!(second.dataset.len(), 3);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn entry_fingerprint_matches_parsed_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vendas.json");
        let json = r#"[{"data": "2024-01-01", "cidade": "SP", "produto": "Copo", "quantidade": 2, "preco_unit": 0.1}]"#;
        std::fs::write(&path, json).unwrap();

        let mut cache = DatasetCache::new();
        let loaded = cache.load(&path).unwrap();
        let entry = &cache.entries[&path.canonicalize().unwrap()];

        assert_eq!(entry.fingerprint, blake3::hash(json.as_bytes()));
        assert!(Arc::ptr_eq(&entry.loaded, &loaded));
        assert_eq!(loaded.dataset.records()[0].total().to_string(), "0.2");
    }

    #[test]
    fn distinct_paths_get_distinct_entries() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        std::fs::write(&a, CSV).unwrap();
        std::fs::write(&b, CSV).unwrap();

        let mut cache = DatasetCache::new();
        let from_a = cache.load(&a).unwrap();
        let from_b = cache.load(&b).unwrap();

        assert!(!Arc::ptr_eq(&from_a, &from_b));
        assert_eq!(cache.len(), 2);

        cache.invalidate(&a);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failed_loads_are_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vendas.csv");
        std::fs::write(&path, "data,cidade\n2024-01-01,SP\n").unwrap();

        let mut cache = DatasetCache::new();
        assert!(matches!(
            cache.load(&path),
            Err(LoadError::MissingColumns { .. })
        ));
        assert!(cache.is_empty());

        assert!(matches!(
            cache.load(&dir.path().join("missing.csv")),
            Err(LoadError::Io(_))
        ));
    }
}
