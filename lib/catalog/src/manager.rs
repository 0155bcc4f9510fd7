use crate::config::CatalogConfig;
use crate::source::CatalogSource;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};
use vitrine_core::{LoadError, Product, ProductId, Snapshot, SnapshotInfo, StopWords};
use vitrine_similarity::{Explanation, Recommendation};

/// State shared with the background reload thread
struct Shared {
    current: RwLock<Arc<Snapshot>>,
    source: Arc<dyn CatalogSource>,
    stopwords: StopWords,
    generation: AtomicU64,
    /// Serializes reloads so generations are applied in order
    reload_lock: Mutex<()>,
    running: AtomicBool,
}

impl Shared {
    fn reload(&self) -> Result<Arc<Snapshot>, LoadError> {
        let _guard = self.reload_lock.lock();
        let started = Instant::now();

        let raw = self.source.read()?;
        let snapshot = Arc::new(Snapshot::build(&raw, &self.stopwords));

        *self.current.write() = snapshot.clone();
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        info!(
            "Catalog {} loaded: {} products (generation {}, {:?})",
            self.source.describe(),
            snapshot.len(),
            generation,
            started.elapsed()
        );
        Ok(snapshot)
    }
}

/// Owns the active catalog snapshot and serves queries against it.
///
/// Queries clone the current `Arc<Snapshot>` and run without holding any lock,
/// so a reload never blocks on, or disturbs, an in-flight query.
pub struct CatalogManager {
    shared: Arc<Shared>,
    reload_thread: Option<JoinHandle<()>>,
}

impl CatalogManager {
    fn with_source(source: Arc<dyn CatalogSource>, stopwords: StopWords) -> Self {
        Self {
            shared: Arc::new(Shared {
                current: RwLock::new(Arc::new(Snapshot::empty())),
                source,
                stopwords,
                generation: AtomicU64::new(0),
                reload_lock: Mutex::new(()),
                running: AtomicBool::new(true),
            }),
            reload_thread: None,
        }
    }

    /// Load the catalog, failing if the source cannot be read
    pub fn new(source: Arc<dyn CatalogSource>, stopwords: StopWords) -> Result<Self, LoadError> {
        let manager = Self::with_source(source, stopwords);
        manager.reload()?;
        Ok(manager)
    }

    /// Load the catalog, serving an empty one if the source cannot be read
    pub fn new_or_empty(source: Arc<dyn CatalogSource>, stopwords: StopWords) -> Self {
        let manager = Self::with_source(source, stopwords);
        if let Err(e) = manager.reload() {
            error!("{}; serving an empty catalog", e);
        }
        manager
    }

    /// Open the CSV catalog described by `config`
    pub fn open(config: &CatalogConfig) -> Result<Self, LoadError> {
        let mut manager = Self::new(Arc::new(config.source()), config.stopwords.load())?;
        if let Some(interval) = config.reload_interval {
            manager.start_background_reload(interval);
        }
        Ok(manager)
    }

    /// Like [`open`](Self::open), degrading to an empty catalog
    pub fn open_or_empty(config: &CatalogConfig) -> Self {
        let mut manager = Self::new_or_empty(Arc::new(config.source()), config.stopwords.load());
        if let Some(interval) = config.reload_interval {
            manager.start_background_reload(interval);
        }
        manager
    }

    /// Start reloading the catalog every `interval`; a running reloader is kept
    pub fn start_background_reload(&mut self, interval: Duration) {
        if self.reload_thread.is_some() {
            return;
        }
        let shared = self.shared.clone();
        let spawned = thread::Builder::new()
            .name("catalog-reload".to_string())
            .spawn(move || {
                let mut deadline = Instant::now() + interval;
                while shared.running.load(Ordering::Acquire) {
                    let now = Instant::now();
                    if now < deadline {
                        thread::park_timeout(deadline - now);
                        continue;
                    }
                    if let Err(e) = shared.reload() {
                        warn!("Background reload failed, keeping current catalog: {}", e);
                    }
                    deadline = Instant::now() + interval;
                }
            });

        match spawned {
            Ok(handle) => {
                info!("Background catalog reload every {:?}", interval);
                self.reload_thread = Some(handle);
            }
            Err(e) => error!("Failed to start background reload: {}", e),
        }
    }

    /// Rebuild the snapshot from the source and swap it in.
    /// On failure the current snapshot stays active.
    pub fn reload(&self) -> Result<Arc<Snapshot>, LoadError> {
        self.shared.reload()
    }

    /// The active snapshot; hold it for the duration of a query
    #[inline]
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.shared.current.read().clone()
    }

    /// Number of successful loads so far
    #[inline]
    pub fn generation(&self) -> u64 {
        self.shared.generation.load(Ordering::Acquire)
    }

    pub fn recommend(&self, id: ProductId, n: usize) -> Vec<Product> {
        vitrine_similarity::recommend(&self.snapshot(), id, n)
    }

    pub fn recommend_scored(&self, id: ProductId, n: usize) -> Vec<Recommendation> {
        vitrine_similarity::recommend_scored(&self.snapshot(), id, n)
    }

    pub fn explain(&self, id: ProductId, other: ProductId) -> Option<Explanation> {
        vitrine_similarity::explain(&self.snapshot(), id, other)
    }

    pub fn get_product(&self, id: ProductId) -> Option<Product> {
        self.snapshot().get_product(id).cloned()
    }

    /// All products in catalog order
    pub fn list_products(&self) -> Vec<Product> {
        self.snapshot().products().to_vec()
    }

    pub fn info(&self) -> SnapshotInfo {
        self.snapshot().info()
    }
}

impl Drop for CatalogManager {
    fn drop(&mut self) {
        self.shared.running.store(false, Ordering::Release);
        if let Some(handle) = self.reload_thread.take() {
            handle.thread().unpark();
            if handle.join().is_err() {
                error!("Background reload thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{CsvSource, MemorySource};
    use serde_json::json;
    use vitrine_core::RawCatalog;

    fn catalog(names: &[&str]) -> RawCatalog {
        let records: Vec<_> = names
            .iter()
            .enumerate()
            .map(|(i, name)| json!({"id": i + 1, "name": name}))
            .collect();
        RawCatalog::from_json_records(&records)
    }

    #[test]
    fn test_query_api() {
        let source = Arc::new(MemorySource::new(catalog(&[
            "red lipstick matte",
            "red lipstick glossy",
            "blue eyeliner",
        ])));
        let manager = CatalogManager::new(source, StopWords::english()).unwrap();

        assert_eq!(manager.generation(), 1);
        assert_eq!(manager.list_products().len(), 3);
        assert_eq!(manager.get_product(3).unwrap().name, "blue eyeliner");
        assert!(manager.get_product(4).is_none());

        let ids: Vec<u64> = manager.recommend(1, 6).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert!(manager.recommend(4, 6).is_empty());
        assert!(manager.explain(1, 2).unwrap().score > 0.0);
    }

    #[test]
    fn test_missing_source_strict_and_degraded() {
        let dir = tempfile::tempdir().unwrap();
        let source = Arc::new(CsvSource::new(dir.path().join("missing.csv")));

        assert!(matches!(
            CatalogManager::new(source.clone(), StopWords::empty()),
            Err(LoadError::SourceUnavailable { .. })
        ));

        let manager = CatalogManager::new_or_empty(source, StopWords::empty());
        assert_eq!(manager.generation(), 0);
        assert!(manager.list_products().is_empty());
        assert!(manager.recommend(1, 6).is_empty());
    }

    #[test]
    fn test_reload_swaps_and_old_snapshot_survives() {
        let source = Arc::new(MemorySource::new(catalog(&["gloss", "rimel"])));
        let manager = CatalogManager::new(source.clone(), StopWords::empty()).unwrap();

        let before = manager.snapshot();
        source.replace(catalog(&["gloss", "rimel", "base", "sombra"]));
        manager.reload().unwrap();

        assert_eq!(before.len(), 2);
        assert_eq!(manager.snapshot().len(), 4);
        assert_eq!(manager.generation(), 2);
    }

    #[test]
    fn test_failed_reload_keeps_current() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.csv");
        std::fs::write(&path, "id,name\n1,gloss\n2,rimel\n").unwrap();

        let manager = CatalogManager::open(&CatalogConfig::new(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(manager.reload().is_err());
        assert_eq!(manager.snapshot().len(), 2);
        assert_eq!(manager.generation(), 1);
    }

    #[test]
    fn test_concurrent_queries_during_reload() {
        let source = Arc::new(MemorySource::new(catalog(&[
            "batom vermelho",
            "batom rosa",
            "lapis preto",
        ])));
        let manager = Arc::new(CatalogManager::new(source.clone(), StopWords::empty()).unwrap());

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let manager = manager.clone();
                thread::spawn(move || {
                    for _ in 0..200 {
                        let snapshot = manager.snapshot();
                        let first = vitrine_similarity::recommend(&snapshot, 1, 6);
                        let second = vitrine_similarity::recommend(&snapshot, 1, 6);
                        assert_eq!(first, second);
                        assert!(first.iter().all(|p| p.id != 1));
                    }
                })
            })
            .collect();

        for round in 0..20 {
            let mut names = vec!["batom vermelho", "batom rosa", "lapis preto"];
            if round % 2 == 0 {
                names.push("gloss rosa");
            }
            source.replace(catalog(&names));
            manager.reload().unwrap();
        }

        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(manager.generation(), 21);
    }

    #[test]
    fn test_background_reload_picks_up_changes() {
        let source = Arc::new(MemorySource::new(catalog(&["gloss"])));
        let mut manager = CatalogManager::new(source.clone(), StopWords::empty()).unwrap();
        manager.start_background_reload(Duration::from_millis(20));

        source.replace(catalog(&["gloss", "rimel"]));
        let deadline = Instant::now() + Duration::from_secs(10);
        while manager.snapshot().len() != 2 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(manager.snapshot().len(), 2);
        assert!(manager.generation() >= 2);
        drop(manager);
    }
}
