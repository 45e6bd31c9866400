//! The provider capability and the two bundled implementations.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::SourceError;
use crate::locale::Locale;
use crate::source::MessageSource;

/// A capability mapping a locale to a message source.
///
/// `Ok(None)` means "nothing for this locale" and is a normal outcome; an
/// error means the provider itself malfunctioned and aborts the lookup.
pub trait MessageSourceProvider: Send + Sync {
    fn message_source(
        &self,
        locale: &Locale,
    ) -> Result<Option<Arc<dyn MessageSource>>, SourceError>;
}

impl<T: MessageSourceProvider + ?Sized> MessageSourceProvider for Arc<T> {
    fn message_source(
        &self,
        locale: &Locale,
    ) -> Result<Option<Arc<dyn MessageSource>>, SourceError> {
        (**self).message_source(locale)
    }
}

/// A fixed locale→source table with an optional catch-all default.
#[derive(Clone, Default)]
pub struct StaticProvider {
    sources: HashMap<Locale, Arc<dyn MessageSource>>,
    default_source: Option<Arc<dyn MessageSource>>,
}

impl StaticProvider {
    /// A provider answering every locale with the same source.
    pub fn single(source: impl MessageSource + 'static) -> Self {
        Self {
            sources: HashMap::new(),
            default_source: Some(Arc::new(source)),
        }
    }

    /// A provider answering only the given locale.
    pub fn single_for(locale: Locale, source: impl MessageSource + 'static) -> Self {
        Self::builder().source(locale, source).build()
    }

    pub fn builder() -> StaticProviderBuilder {
        StaticProviderBuilder::default()
    }
}

impl MessageSourceProvider for StaticProvider {
    fn message_source(
        &self,
        locale: &Locale,
    ) -> Result<Option<Arc<dyn MessageSource>>, SourceError> {
        Ok(self
            .sources
            .get(locale)
            .or(self.default_source.as_ref())
            .cloned())
    }
}

/// Builder for a [`StaticProvider`] covering several locales.
#[derive(Default)]
pub struct StaticProviderBuilder {
    sources: HashMap<Locale, Arc<dyn MessageSource>>,
    default_source: Option<Arc<dyn MessageSource>>,
}

impl StaticProviderBuilder {
    /// Register a source for one locale.
    pub fn source(mut self, locale: Locale, source: impl MessageSource + 'static) -> Self {
        self.sources.insert(locale, Arc::new(source));
        self
    }

    /// Register the source answering locales with no dedicated entry.
    pub fn default_source(mut self, source: impl MessageSource + 'static) -> Self {
        self.default_source = Some(Arc::new(source));
        self
    }

    pub fn build(self) -> StaticProvider {
        StaticProvider {
            sources: self.sources,
            default_source: self.default_source,
        }
    }
}

type Loader =
    dyn Fn(&Locale) -> Result<Option<Arc<dyn MessageSource>>, SourceError> + Send + Sync;

struct CacheEntry {
    source: Option<Arc<dyn MessageSource>>,
    loaded_at: Instant,
}

/// A provider that loads sources on demand and caches the answer per locale.
///
/// With an expiry configured, a cached entry older than the expiry causes
/// the loader to run again on the next query. A loader failure propagates to
/// the caller and leaves the cache untouched, so the next query retries.
pub struct LoadingProvider {
    loader: Box<Loader>,
    expiry: Option<Duration>,
    cache: RwLock<HashMap<Locale, CacheEntry>>,
}

impl LoadingProvider {
    /// Cache forever: each locale is loaded at most once.
    pub fn new(
        loader: impl Fn(&Locale) -> Result<Option<Arc<dyn MessageSource>>, SourceError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self {
            loader: Box::new(loader),
            expiry: None,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Reload a locale's source once its cached entry is older than `expiry`.
    pub fn expire_after(mut self, expiry: Duration) -> Self {
        self.expiry = Some(expiry);
        self
    }

    fn is_fresh(&self, entry: &CacheEntry) -> bool {
        match self.expiry {
            Some(expiry) => entry.loaded_at.elapsed() < expiry,
            None => true,
        }
    }
}

impl MessageSourceProvider for LoadingProvider {
    fn message_source(
        &self,
        locale: &Locale,
    ) -> Result<Option<Arc<dyn MessageSource>>, SourceError> {
        if let Some(entry) = self.cache.read().unwrap().get(locale) {
            if self.is_fresh(entry) {
                return Ok(entry.source.clone());
            }
        }

        // Re-check under the write lock: another caller may have reloaded
        // while we were waiting for it.
        let mut cache = self.cache.write().unwrap();
        if let Some(entry) = cache.get(locale) {
            if self.is_fresh(entry) {
                return Ok(entry.source.clone());
            }
        }

        debug!(locale = %locale, "loading message source");
        let source = (self.loader)(locale)?;
        cache.insert(
            locale.clone(),
            CacheEntry {
                source: source.clone(),
                loaded_at: Instant::now(),
            },
        );
        Ok(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MapSource;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn pattern_at(
        provider: &dyn MessageSourceProvider,
        locale: &Locale,
        key: &str,
    ) -> Option<String> {
        let source = provider.message_source(locale).unwrap()?;
        source.pattern(key).unwrap().map(str::to_string)
    }

    #[test]
    fn single_answers_every_locale() {
        let provider = StaticProvider::single(MapSource::new().with("k", "v"));
        for input in ["", "fr", "zh_CN"] {
            let locale = Locale::parse(input).unwrap();
            assert_eq!(pattern_at(&provider, &locale, "k"), Some("v".to_string()));
        }
    }

    #[test]
    fn single_for_answers_only_its_locale() {
        let locale = Locale::parse("zh_CN").unwrap();
        let provider = StaticProvider::single_for(locale.clone(), MapSource::new().with("k", "v"));
        assert_eq!(pattern_at(&provider, &locale, "k"), Some("v".to_string()));
        assert!(provider
            .message_source(&Locale::ROOT)
            .unwrap()
            .is_none());
    }

    #[test]
    fn dedicated_entry_beats_default() {
        let fr = Locale::parse("fr").unwrap();
        let provider = StaticProvider::builder()
            .source(fr.clone(), MapSource::new().with("k", "bonjour"))
            .default_source(MapSource::new().with("k", "hello"))
            .build();
        assert_eq!(pattern_at(&provider, &fr, "k"), Some("bonjour".to_string()));
        assert_eq!(
            pattern_at(&provider, &Locale::ROOT, "k"),
            Some("hello".to_string())
        );
    }

    #[test]
    fn loader_runs_once_per_locale_without_expiry() {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = loads.clone();
        let provider = LoadingProvider::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Some(
                Arc::new(MapSource::new().with("k", "v")) as Arc<dyn MessageSource>
            ))
        });

        let fr = Locale::parse("fr").unwrap();
        for _ in 0..3 {
            assert_eq!(pattern_at(&provider, &fr, "k"), Some("v".to_string()));
        }
        assert_eq!(loads.load(Ordering::SeqCst), 1);

        let _ = pattern_at(&provider, &Locale::ROOT, "k");
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn negative_answers_are_cached_too() {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = loads.clone();
        let provider = LoadingProvider::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        });

        let fr = Locale::parse("fr").unwrap();
        assert!(provider.message_source(&fr).unwrap().is_none());
        assert!(provider.message_source(&fr).unwrap().is_none());
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn expired_entries_are_reloaded() {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = loads.clone();
        let provider = LoadingProvider::new(move |_| {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            Ok(Some(Arc::new(
                MapSource::new().with("k", format!("load {n}")),
            ) as Arc<dyn MessageSource>))
        })
        .expire_after(Duration::from_millis(20));

        let fr = Locale::parse("fr").unwrap();
        assert_eq!(pattern_at(&provider, &fr, "k"), Some("load 0".to_string()));
        assert_eq!(pattern_at(&provider, &fr, "k"), Some("load 0".to_string()));

        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(pattern_at(&provider, &fr, "k"), Some("load 1".to_string()));
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn loader_failure_propagates_and_is_retried() {
        let loads = Arc::new(AtomicUsize::new(0));
        let counter = loads.clone();
        let provider = LoadingProvider::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(SourceError::Failure("disk on fire".to_string()))
        });

        let fr = Locale::parse("fr").unwrap();
        assert!(provider.message_source(&fr).is_err());
        assert!(provider.message_source(&fr).is_err());
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }
}
