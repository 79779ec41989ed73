//! # Cognet - Cognate Chain Service
//!
//! Turns flat, pairwise cognate records into map-ready word chains.
//!
//! Cognet provides:
//! - An undirected cognate graph keyed by (language, word) identities
//! - Deterministic chain extraction (one chain per connected component)
//! - Coordinate jitter so words sharing a language do not overlap on a map
//! - Per-request language enrichment backed by a pluggable record store
//! - SQLite-backed storage, TSV bulk import and an HTTP API

pub mod cognate;
pub mod language;
pub mod graph;
pub mod chain;
pub mod storage;
pub mod search;
pub mod importer;
pub mod server;
pub mod config;
pub mod output;
pub mod ui;

// Re-exports for convenient access
pub use cognate::{CognatePair, NodeId};
pub use language::LanguageInfo;
pub use graph::CognateGraph;
pub use chain::{ChainQueryResult, ChainWord, CognateChain};
pub use search::{CognateSearch, WordSuggestion};
pub use storage::{CognateStore, SqliteStore};

/// Result type alias for Cognet operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Cognet operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Corrupt record {key}: {reason}")]
    Corrupt { key: String, reason: String },

    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[from] rusqlite::Error),

    #[error("Chain discovery failed: {0}")]
    ChainDiscovery(#[source] Box<Error>),

    #[error("Import error: {0}")]
    Import(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),
}

/// Coarse classification of an [`Error`], used to pick HTTP status codes
/// and CLI exit messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Corrupt,
    StoreUnavailable,
    Invalid,
    Internal,
}

impl Error {
    pub fn corrupt(key: impl Into<String>, reason: impl ToString) -> Self {
        Error::Corrupt {
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    /// Wrap a failure from any stage of chain discovery
    pub fn chain_discovery(cause: Error) -> Self {
        match cause {
            already @ Error::ChainDiscovery(_) => already,
            other => Error::ChainDiscovery(Box::new(other)),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Corrupt { .. } => ErrorKind::Corrupt,
            Error::StoreUnavailable(_) => ErrorKind::StoreUnavailable,
            Error::ChainDiscovery(inner) => inner.kind(),
            Error::Import(_) | Error::Config(_) => ErrorKind::Invalid,
            Error::Io(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_discovery_keeps_inner_kind() {
        let err = Error::chain_discovery(Error::corrupt("concept:1", "bad json"));
        assert_eq!(err.kind(), ErrorKind::Corrupt);
        assert!(err.to_string().starts_with("Chain discovery failed"));
    }

    #[test]
    fn test_chain_discovery_does_not_nest() {
        let err = Error::chain_discovery(Error::chain_discovery(Error::NotFound("x".into())));
        match err {
            Error::ChainDiscovery(inner) => assert!(matches!(*inner, Error::NotFound(_))),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
