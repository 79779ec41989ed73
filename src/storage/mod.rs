//! Storage Layer - SQLite-backed record store
//!
//! System of record is SQLite with tables:
//! - cognates(id, concept_id, payload)   ordered pair list per concept
//! - languages(code, payload)            one record per language code
//! - prefixes(prefix, entry)             prefix set for word suggestions
//! - import_metadata(total_records, status, timestamp)

pub mod schema;
pub mod sqlite;
pub mod traits;

pub use sqlite::{SqliteStore, DbStats, ImportMetadata};
pub use traits::{CognateStore, PrefixEntry};
