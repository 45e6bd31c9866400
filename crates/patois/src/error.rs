use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure of a lookup entry point.
///
/// A lookup miss is never an error; misses degrade to returning the key.
#[derive(Debug, Error)]
pub enum Error {
    /// The caller passed an empty message key.
    #[error("cannot look up an empty message key")]
    EmptyKey,

    /// A configured provider or source malfunctioned mid-lookup.
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Failure inside a message source or provider.
///
/// Reserved strictly for malfunction; "no entry for this key" and "no source
/// for this locale" are normal outcomes and are never reported through this
/// type.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read message catalog `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Parse(#[from] CatalogParseError),

    /// Escape hatch for custom source implementations.
    #[error("message source failure: {0}")]
    Failure(String),
}

/// Syntax problem in a catalog text.
#[derive(Debug, Error)]
pub enum CatalogParseError {
    #[error("yaml catalog error: {0}")]
    Yaml(String),

    #[error("properties syntax error at line {line}: {msg}")]
    Syntax { line: usize, msg: String },
}

/// Rejected locale identifier.
#[derive(Debug, Error)]
pub enum LocaleError {
    #[error("malformed locale `{0}`: more than three sub-tags")]
    Malformed(String),
}
