//! Patois: cascading message lookup
//!
//! Goals:
//! - Resolve `(locale, key)` to a human-readable string through an ordered
//!   chain of pluggable message sources
//! - Locale fallback from most specific down to the root locale, first
//!   match wins across locales × providers
//! - Two formatting conventions, chosen by entry point: brace-style (`{0}`)
//!   and printf-style (`%s`)
//! - Lookup misses degrade to the key itself; only a malfunctioning source
//!   is an error
//!
//! ```
//! use patois::{args, Locale, MapSource, MessageBundle};
//!
//! let bundle = MessageBundle::builder()
//!     .append_source_for(
//!         Locale::parse("fr").unwrap(),
//!         MapSource::new().with("greeting", "Bonjour {0}"),
//!     )
//!     .append_source_for(Locale::ROOT, MapSource::new().with("greeting", "Hello {0}"))
//!     .freeze();
//!
//! let fr_fr = Locale::parse("fr_FR").unwrap();
//! assert_eq!(
//!     bundle.format(&fr_fr, "greeting", &args!["World"]).unwrap(),
//!     "Bonjour World"
//! );
//! assert_eq!(
//!     bundle.format(&Locale::ROOT, "greeting", &args!["World"]).unwrap(),
//!     "Hello World"
//! );
//! ```

mod bundle;
mod catalog;
mod error;
mod format;
mod locale;
mod provider;
mod source;

pub use bundle::{BundleBuilder, MessageBundle};
pub use catalog::{load_properties, load_yaml, parse_properties, parse_yaml, Encoding};
pub use error::{CatalogParseError, Error, LocaleError, SourceError};
pub use format::{format_braces, format_printf, Arg};
pub use locale::Locale;
pub use provider::{
    LoadingProvider, MessageSourceProvider, StaticProvider, StaticProviderBuilder,
};
pub use source::{MapSource, MessageSource};

/// Convenience macro for building a formatting-argument array.
///
/// Examples:
/// - `args!["World"]`
/// - `args!["peur", "gendarme"]`
/// - `args![Option::<&str>::None]` (renders as `null`)
#[macro_export]
macro_rules! args {
    ($($value:expr),* $(,)?) => {
        [$($crate::Arg::from($value)),*]
    };
}
