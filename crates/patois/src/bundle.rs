//! The frozen provider chain, its builder, and the lookup entry points.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::error::Error;
use crate::format::{format_braces, format_printf, Arg};
use crate::locale::Locale;
use crate::provider::{MessageSourceProvider, StaticProvider};
use crate::source::MessageSource;

/// An immutable, ordered chain of message-source providers.
///
/// Lookup walks the locale fallback chain outermost: every provider is
/// consulted in chain order at one candidate locale before the next, less
/// specific locale is considered, and the first pattern found anywhere wins.
/// A bundle holds no mutable state and takes no locks, so it is safe to
/// share across threads; cloning is cheap.
#[derive(Clone)]
pub struct MessageBundle {
    providers: Vec<Arc<dyn MessageSourceProvider>>,
}

impl MessageBundle {
    /// Start building an empty chain.
    pub fn builder() -> BundleBuilder {
        BundleBuilder {
            providers: Vec::new(),
        }
    }

    /// Re-derive a builder from this bundle.
    ///
    /// The builder gets its own copy of the provider list; mutating it never
    /// affects the bundle it came from.
    pub fn thaw(&self) -> BundleBuilder {
        BundleBuilder {
            providers: self.providers.clone(),
        }
    }

    /// Resolve the pattern for a key, walking locales × providers.
    ///
    /// `Ok(None)` means no source anywhere knows the key. An empty key is
    /// rejected before any provider is consulted. A provider or source
    /// failure propagates unchanged; the chain never skips a malfunctioning
    /// source to try the next one.
    pub fn resolve_pattern(&self, locale: &Locale, key: &str) -> Result<Option<String>, Error> {
        if key.is_empty() {
            return Err(Error::EmptyKey);
        }

        for candidate in locale.fallback_chain() {
            for (index, provider) in self.providers.iter().enumerate() {
                let Some(source) = provider.message_source(&candidate)? else {
                    continue;
                };
                if let Some(pattern) = source.pattern(key)? {
                    trace!(key, locale = %candidate, provider = index, "resolved message pattern");
                    return Ok(Some(pattern.to_string()));
                }
            }
        }

        debug!(key, locale = %locale, "no source knows this key");
        Ok(None)
    }

    /// The message for a key, or the key itself when nothing matches.
    pub fn message(&self, locale: &Locale, key: &str) -> Result<String, Error> {
        Ok(self
            .resolve_pattern(locale, key)?
            .unwrap_or_else(|| key.to_string()))
    }

    /// Like [`message`](Self::message), formatting the resolved pattern
    /// brace-style with `args`. On a miss the key is returned unformatted
    /// and the arguments are discarded.
    pub fn format(&self, locale: &Locale, key: &str, args: &[Arg]) -> Result<String, Error> {
        Ok(match self.resolve_pattern(locale, key)? {
            Some(pattern) => format_braces(&pattern, args),
            None => key.to_string(),
        })
    }

    /// Like [`message`](Self::message), formatting the resolved pattern
    /// printf-style with `args`.
    pub fn printf(&self, locale: &Locale, key: &str, args: &[Arg]) -> Result<String, Error> {
        Ok(match self.resolve_pattern(locale, key)? {
            Some(pattern) => format_printf(&pattern, args),
            None => key.to_string(),
        })
    }

    /// Number of providers in the chain.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

/// Ordered-list builder for a [`MessageBundle`].
///
/// Mutators take and return `self`, so a chain reads as one expression.
/// Freezing snapshots the list; a frozen bundle can be thawed back into a
/// fresh builder without ever affecting the original.
#[derive(Default)]
pub struct BundleBuilder {
    providers: Vec<Arc<dyn MessageSourceProvider>>,
}

impl BundleBuilder {
    pub fn append_provider(mut self, provider: impl MessageSourceProvider + 'static) -> Self {
        self.providers.push(Arc::new(provider));
        self
    }

    pub fn prepend_provider(mut self, provider: impl MessageSourceProvider + 'static) -> Self {
        self.providers.insert(0, Arc::new(provider));
        self
    }

    /// Append a provider answering every locale with `source`.
    pub fn append_source(self, source: impl MessageSource + 'static) -> Self {
        self.append_provider(StaticProvider::single(source))
    }

    /// Prepend a provider answering every locale with `source`.
    pub fn prepend_source(self, source: impl MessageSource + 'static) -> Self {
        self.prepend_provider(StaticProvider::single(source))
    }

    /// Append a provider answering only `locale` with `source`.
    pub fn append_source_for(self, locale: Locale, source: impl MessageSource + 'static) -> Self {
        self.append_provider(StaticProvider::single_for(locale, source))
    }

    /// Prepend a provider answering only `locale` with `source`.
    pub fn prepend_source_for(self, locale: Locale, source: impl MessageSource + 'static) -> Self {
        self.prepend_provider(StaticProvider::single_for(locale, source))
    }

    /// Snapshot the current provider list into an immutable bundle.
    pub fn freeze(self) -> MessageBundle {
        MessageBundle {
            providers: self.providers,
        }
    }
}
