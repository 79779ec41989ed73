//! SQLite storage implementation

use std::path::Path;
use rusqlite::{Connection, params, OptionalExtension};
use serde::Serialize;
use crate::{Result, Error};
use crate::cognate::CognatePair;
use crate::language::LanguageInfo;
use super::schema;
use super::traits::{CognateStore, PrefixEntry};

/// SQLite-backed record store for cognate pairs, languages and the prefix index
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    // ========== Cognate Operations ==========

    /// Append a pair to its concept's list
    pub fn insert_cognate(&self, pair: &CognatePair) -> Result<()> {
        let payload = serde_json::to_string(pair)
            .map_err(|e| Error::corrupt(format!("concept:{}", pair.concept_id), e))?;
        self.insert_cognate_payload(&pair.concept_id, &payload)
    }

    /// Append a raw payload to a concept's list.
    ///
    /// Payloads are decoded on read; nothing is validated here.
    pub fn insert_cognate_payload(&self, concept_id: &str, payload: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO cognates (concept_id, payload) VALUES (?1, ?2)",
            params![concept_id, payload],
        )?;
        Ok(())
    }

    /// Count all stored pairs
    pub fn count_cognates(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM cognates", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Count distinct concepts
    pub fn count_concepts(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(DISTINCT concept_id) FROM cognates",
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    // ========== Language Operations ==========

    /// Insert or replace a language record
    pub fn insert_language(&self, language: &LanguageInfo) -> Result<()> {
        let payload = serde_json::to_string(language)
            .map_err(|e| Error::corrupt(format!("language:{}", language.code), e))?;
        self.insert_language_payload(&language.code, &payload)
    }

    /// Insert or replace a raw language payload
    pub fn insert_language_payload(&self, code: &str, payload: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO languages (code, payload) VALUES (?1, ?2)",
            params![code, payload],
        )?;
        Ok(())
    }

    /// Count language records
    pub fn count_languages(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM languages", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ========== Prefix Index Operations ==========

    /// Add an entry to a prefix's set (no-op if already present)
    pub fn index_prefix(&self, prefix: &str, entry: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO prefixes (prefix, entry) VALUES (?1, ?2)",
            params![prefix, entry],
        )?;
        Ok(())
    }

    /// Count distinct indexed prefixes
    pub fn count_prefixes(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(DISTINCT prefix) FROM prefixes",
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    // ========== Import Metadata ==========

    /// Record the outcome of the latest import
    pub fn set_import_metadata(&self, metadata: &ImportMetadata) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT OR REPLACE INTO import_metadata (id, total_records, status, timestamp)
            VALUES (1, ?1, ?2, ?3)
            "#,
            params![metadata.total_records as i64, metadata.status, metadata.timestamp],
        )?;
        Ok(())
    }

    /// Metadata of the latest import, if any import has completed
    pub fn import_metadata(&self) -> Result<Option<ImportMetadata>> {
        self.conn
            .query_row(
                "SELECT total_records, status, timestamp FROM import_metadata WHERE id = 1",
                [],
                |row| {
                    let total: i64 = row.get(0)?;
                    Ok(ImportMetadata {
                        total_records: total as usize,
                        status: row.get(1)?,
                        timestamp: row.get(2)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    // ========== Bulk Operations ==========

    /// Begin a transaction for bulk operations
    pub fn begin_transaction(&mut self) -> Result<()> {
        self.conn.execute("BEGIN TRANSACTION", [])?;
        Ok(())
    }

    /// Commit a transaction
    pub fn commit(&mut self) -> Result<()> {
        self.conn.execute("COMMIT", [])?;
        Ok(())
    }

    /// Rollback a transaction
    pub fn rollback(&mut self) -> Result<()> {
        self.conn.execute("ROLLBACK", [])?;
        Ok(())
    }

    /// Delete all data
    pub fn clear_all(&self) -> Result<()> {
        self.conn.execute("DELETE FROM cognates", [])?;
        self.conn.execute("DELETE FROM languages", [])?;
        self.conn.execute("DELETE FROM prefixes", [])?;
        self.conn.execute("DELETE FROM import_metadata", [])?;
        Ok(())
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        Ok(DbStats {
            concepts: self.count_concepts()?,
            cognates: self.count_cognates()?,
            languages: self.count_languages()?,
            prefixes: self.count_prefixes()?,
        })
    }
}

impl CognateStore for SqliteStore {
    fn cognate_pairs(&self, concept_id: &str) -> Result<Vec<CognatePair>> {
        let mut stmt = self.conn.prepare(
            "SELECT payload FROM cognates WHERE concept_id = ?1 ORDER BY id"
        )?;

        let payloads = stmt
            .query_map([concept_id], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        payloads
            .iter()
            .map(|payload| {
                serde_json::from_str(payload)
                    .map_err(|e| Error::corrupt(format!("concept:{}", concept_id), e))
            })
            .collect()
    }

    fn language_info(&self, code: &str) -> Result<LanguageInfo> {
        let payload: Option<String> = self.conn
            .query_row(
                "SELECT payload FROM languages WHERE code = ?1",
                [code],
                |row| row.get(0),
            )
            .optional()?;

        let payload = payload.ok_or_else(|| Error::NotFound(format!("language:{}", code)))?;
        serde_json::from_str(&payload).map_err(|e| Error::corrupt(format!("language:{}", code), e))
    }

    fn prefix_entries(&self, prefix: &str) -> Result<Vec<PrefixEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT entry FROM prefixes WHERE prefix = ?1 ORDER BY rowid"
        )?;

        let entries = stmt
            .query_map([prefix], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(entries
            .iter()
            .filter_map(|entry| {
                let parsed = PrefixEntry::parse(entry);
                if parsed.is_none() {
                    tracing::debug!("Skipping malformed prefix entry {:?}", entry);
                }
                parsed
            })
            .collect())
    }
}

/// Outcome of the latest bulk import
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportMetadata {
    pub total_records: usize,
    pub status: String,
    /// Unix timestamp (seconds)
    pub timestamp: i64,
}

/// Database statistics
#[derive(Debug, Clone, Serialize)]
pub struct DbStats {
    pub concepts: usize,
    pub cognates: usize,
    pub languages: usize,
    pub prefixes: usize,
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Concepts: {}", self.concepts)?;
        writeln!(f, "  Cognate pairs: {}", self.cognates)?;
        writeln!(f, "  Languages: {}", self.languages)?;
        writeln!(f, "  Prefixes: {}", self.prefixes)
    }
}
