use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use engine_logging::{engine_debug, engine_info, engine_warn};
use tokio::sync::mpsc;
use webcontent_core::{AggregateResult, RefreshError, Source, SourceKey};

use crate::{ContentCache, ContentFetcher, FetchError};

/// Result of one fetch attempt for one source.
pub type FetchOutcome = Result<String, RefreshError>;

/// Fetches every source that is not cached yet, in parallel, and joins the
/// results into one verdict.
pub struct ContentAggregator {
    fetcher: Arc<dyn ContentFetcher>,
    cache: Arc<Mutex<ContentCache>>,
}

impl ContentAggregator {
    pub fn new(fetcher: Arc<dyn ContentFetcher>) -> Self {
        Self::with_cache(fetcher, Arc::new(Mutex::new(ContentCache::new())))
    }

    pub fn with_cache(fetcher: Arc<dyn ContentFetcher>, cache: Arc<Mutex<ContentCache>>) -> Self {
        Self { fetcher, cache }
    }

    /// Copy of the cached content for `key`, if any.
    pub fn cached(&self, key: &SourceKey) -> Option<String> {
        lock(&self.cache).get(key).map(ToOwned::to_owned)
    }

    /// Resolves every source, from the cache or the network.
    ///
    /// Must be awaited inside a tokio runtime: fetches run as spawned tasks.
    /// A failure is reported as soon as it is observed; sibling fetches keep
    /// running and still fill the cache when they succeed.
    pub async fn refresh(&self, sources: &[Source]) -> AggregateResult {
        let mut rendezvous = Rendezvous::new(sources);
        let mut misses = Vec::new();
        {
            let cache = lock(&self.cache);
            for source in unique_by_key(sources) {
                if let Some(text) = cache.get(&source.key) {
                    engine_debug!("Cache hit for {}", source.key);
                    rendezvous.resolve(&source.key, Ok(text.to_string()));
                    continue;
                }
                match source.parsed_url() {
                    Ok(_) => misses.push(source.clone()),
                    Err(err) => {
                        engine_warn!("Rejecting {} without fetching: {}", source.key, err);
                        rendezvous.resolve(&source.key, Err(err));
                    }
                }
            }
        }

        let (tx, mut rx) = mpsc::unbounded_channel::<(SourceKey, FetchOutcome)>();
        for source in misses {
            engine_info!("Fetching {} from {}", source.key, source.url);
            let fetcher = self.fetcher.clone();
            let cache = self.cache.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let outcome = fetcher
                    .fetch(&source.url)
                    .await
                    .map_err(|err| to_refresh_error(&source, err));
                if let Ok(text) = &outcome {
                    lock(&cache).put(source.key.clone(), text.clone());
                }
                if let Err((key, outcome)) = tx.send((source.key, outcome)).map_err(|e| e.0) {
                    // The verdict was already reported without us.
                    match outcome {
                        Ok(_) => engine_info!("Late result for {} cached", key),
                        Err(err) => engine_warn!("Late failure for {} ignored: {}", key, err),
                    }
                }
            });
        }
        drop(tx);

        loop {
            if let Some(verdict) = rendezvous.verdict() {
                if let AggregateResult::AnyFailed(err) = &verdict {
                    engine_warn!("Refresh failed: {}", err);
                }
                return verdict;
            }
            match rx.recv().await {
                Some((key, outcome)) => rendezvous.resolve(&key, outcome),
                None => {
                    // Every sender is gone with slots still empty: a fetch task died.
                    return AggregateResult::AnyFailed(rendezvous.abandoned());
                }
            }
        }
    }
}

/// Join point of one refresh: one slot per source key plus a pending count.
/// Completes once, with the first failure or with every slot filled.
#[derive(Debug)]
struct Rendezvous {
    slots: BTreeMap<SourceKey, Option<String>>,
    pending: usize,
    failure: Option<RefreshError>,
}

impl Rendezvous {
    fn new(sources: &[Source]) -> Self {
        let slots: BTreeMap<_, _> = sources
            .iter()
            .map(|source| (source.key.clone(), None))
            .collect();
        let pending = slots.len();
        Self {
            slots,
            pending,
            failure: None,
        }
    }

    fn resolve(&mut self, key: &SourceKey, outcome: FetchOutcome) {
        let Some(slot) = self.slots.get_mut(key) else {
            return;
        };
        if slot.is_some() {
            return;
        }
        match outcome {
            Ok(text) => {
                *slot = Some(text);
                self.pending -= 1;
            }
            Err(err) => {
                self.failure.get_or_insert(err);
            }
        }
    }

    fn verdict(&self) -> Option<AggregateResult> {
        if let Some(err) = &self.failure {
            return Some(AggregateResult::AnyFailed(err.clone()));
        }
        if self.pending > 0 {
            return None;
        }
        let contents = self
            .slots
            .iter()
            .filter_map(|(key, text)| Some((key.clone(), text.clone()?)))
            .collect();
        Some(AggregateResult::AllSucceeded(contents))
    }

    fn abandoned(&self) -> RefreshError {
        let key = self
            .slots
            .iter()
            .find(|(_, text)| text.is_none())
            .map(|(key, _)| key.clone())
            .unwrap_or_else(|| SourceKey::new("unknown"));
        RefreshError::TransportFailure {
            key,
            description: "fetch task ended without a result".to_string(),
        }
    }
}

fn unique_by_key(sources: &[Source]) -> impl Iterator<Item = &Source> + '_ {
    sources
        .iter()
        .enumerate()
        .filter(move |(index, source)| {
            !sources[..*index]
                .iter()
                .any(|earlier| earlier.key == source.key)
        })
        .map(|(_, source)| source)
}

fn to_refresh_error(source: &Source, err: FetchError) -> RefreshError {
    if err.is_invalid_url() {
        RefreshError::InvalidUrl {
            key: source.key.clone(),
            value: source.url.clone(),
        }
    } else {
        RefreshError::TransportFailure {
            key: source.key.clone(),
            description: err.to_string(),
        }
    }
}

fn lock(cache: &Mutex<ContentCache>) -> MutexGuard<'_, ContentCache> {
    cache.lock().unwrap_or_else(PoisonError::into_inner)
}
