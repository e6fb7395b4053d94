//! JSON file store implementation.

use async_trait::async_trait;
use intraday_core::{CacheKey, DataError, IntradayDataset, LocalStore, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, instrument};

/// Sequence for temporary file names, so concurrent writers never share one.
static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Store keeping each dataset in `{dir}/{symbol}_{YYYY-MM}_{granularity}.json`.
///
/// Each entry is the bare timestamp → bar JSON object, the same shape the
/// provider returns inside its time-series envelope. A file that exists but
/// does not parse is reported as [`DataError::CacheCorrupt`], never as a miss.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`.
    ///
    /// The directory does not need to exist until the first [`LocalStore::put`].
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the root directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file path for a given key.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::InvalidParameter`] if the symbol is empty or could
    /// address a file outside the store directory (`/`, `\`, `..`).
    pub fn entry_path(&self, key: &CacheKey) -> Result<PathBuf> {
        let symbol = key.symbol.as_str();
        if symbol.is_empty() || symbol.contains(['/', '\\', '\0']) || symbol.contains("..") {
            return Err(DataError::InvalidParameter(format!(
                "symbol {symbol:?} cannot be used as a cache file name"
            )));
        }
        Ok(self.dir.join(key.file_name()))
    }
}

#[async_trait]
impl LocalStore for FileStore {
    #[instrument(skip(self), fields(key = %key))]
    async fn get(&self, key: &CacheKey) -> Result<Option<IntradayDataset>> {
        let path = self.entry_path(key)?;

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "Cache miss");
                return Ok(None);
            }
            Err(e) => return Err(io_error("read", &path, &e)),
        };

        let data: IntradayDataset =
            serde_json::from_slice(&bytes).map_err(|e| DataError::CacheCorrupt {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        debug!(path = %path.display(), bars = data.len(), "Cache hit");
        Ok(Some(data))
    }

    #[instrument(skip(self, data), fields(key = %key, bars = data.len()))]
    async fn put(&self, key: &CacheKey, data: &IntradayDataset) -> Result<()> {
        let path = self.entry_path(key)?;
        let json = serde_json::to_vec_pretty(data).map_err(|e| DataError::Cache(e.to_string()))?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| io_error("create", &self.dir, &e))?;

        // Write then rename so a reader never sees a half-written entry.
        let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
        let tmp = path.with_extension(format!("json.{}.{seq}.tmp", std::process::id()));
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| io_error("write", &tmp, &e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| io_error("replace", &path, &e))?;

        debug!(path = %path.display(), "Stored dataset");
        Ok(())
    }
}

fn io_error(action: &str, path: &Path, e: &std::io::Error) -> DataError {
    DataError::Cache(format!("failed to {action} {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use intraday_core::{Granularity, Month, PriceBar, Symbol};

    fn key() -> CacheKey {
        CacheKey::new(
            Symbol::new("IBM"),
            Month::new(2024, 1).unwrap(),
            Granularity::OneMinute,
        )
    }

    fn sample() -> IntradayDataset {
        [
            (
                "2024-01-02 09:30:00".to_string(),
                PriceBar::new("161.50").with_field("1. open", "161.00"),
            ),
            ("2024-01-02 09:31:00".to_string(), PriceBar::new("161.75")),
        ]
        .into_iter()
        .collect()
    }

    #[tokio::test]
    async fn test_missing_file_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        assert!(store.get(&key()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_directory_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("not-created-yet"));

        assert!(store.get(&key()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reads_existing_entry() {
        let dir = tempfile::tempdir().unwrap();
        let json = r#"{
            "2024-01-02 09:30:00": {"1. open": "161.00", "4. close": "161.50", "5. volume": "900"}
        }"#;
        std::fs::write(dir.path().join("IBM_2024-01_1min.json"), json).unwrap();

        let store = FileStore::new(dir.path());
        let data = store.get(&key()).await.unwrap().unwrap();

        assert_eq!(data.len(), 1);
        let bar = data.get("2024-01-02 09:30:00").unwrap();
        assert_eq!(bar.close_price(), Some(161.5));
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("IBM_2024-01_1min.json"), "{ not json").unwrap();

        let store = FileStore::new(dir.path());
        let err = store.get(&key()).await.unwrap_err();

        assert!(matches!(err, DataError::CacheCorrupt { .. }));
    }

    #[tokio::test]
    async fn test_wrong_shape_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("IBM_2024-01_1min.json"), "[1, 2, 3]").unwrap();

        let store = FileStore::new(dir.path());
        let err = store.get(&key()).await.unwrap_err();

        assert!(matches!(err, DataError::CacheCorrupt { .. }));
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        store.put(&key(), &sample()).await.unwrap();

        assert!(store.entry_path(&key()).unwrap().exists());
        let data = store.get(&key()).await.unwrap().unwrap();
        assert_eq!(data, sample());
    }

    #[tokio::test]
    async fn test_unreadable_entry_is_a_cache_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory at the entry path fails to read for any user, root included.
        std::fs::create_dir(dir.path().join("IBM_2024-01_1min.json")).unwrap();

        let store = FileStore::new(dir.path());
        let err = store.get(&key()).await.unwrap_err();

        assert!(matches!(err, DataError::Cache(_)));
    }

    #[tokio::test]
    async fn test_symbols_cannot_escape_the_directory() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(
            root.path().join("SECRET_2024-01_1min.json"),
            r#"{"2024-01-02 09:30:00": {"4. close": "1.00"}}"#,
        )
        .unwrap();
        let store = FileStore::new(root.path().join("store"));

        for symbol in ["../SECRET", "..\\SECRET", "a/b", "..", ""] {
            let key = CacheKey::new(
                Symbol::new(symbol),
                Month::new(2024, 1).unwrap(),
                Granularity::OneMinute,
            );

            let err = store.get(&key).await.unwrap_err();
            assert!(matches!(err, DataError::InvalidParameter(_)), "{symbol:?}");
            let err = store.put(&key, &sample()).await.unwrap_err();
            assert!(matches!(err, DataError::InvalidParameter(_)), "{symbol:?}");
        }
        assert!(!root.path().join("store").exists());
    }

    #[tokio::test]
    async fn test_concurrent_puts_to_one_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        let (k1, s1, k2, s2) = (key(), sample(), key(), sample());
        let (a, b) = tokio::join!(store.put(&k1, &s1), store.put(&k2, &s2));
        a.unwrap();
        b.unwrap();

        assert_eq!(store.get(&key()).await.unwrap(), Some(sample()));
        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }
}
