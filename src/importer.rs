//! Bulk import - populates the record store from delimited files
//!
//! TSV layout (first line is a header and is skipped):
//! `concept_id  lang1  word1  lang2  word2  [translit1  [translit2]]`
//!
//! Every record is appended to its concept's pair list and both words are
//! indexed under each of their lower-cased prefixes of two or more
//! characters. Writes are committed in batches.

use std::io::{BufRead, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use crossbeam::channel::Sender;
use serde::Serialize;
use crate::{Error, Result};
use crate::cognate::CognatePair;
use crate::language::LanguageInfo;
use crate::search::MIN_PREFIX_LEN;
use crate::storage::{ImportMetadata, PrefixEntry, SqliteStore};

/// Records per committed transaction
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Progress events emitted while importing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportProgress {
    Started,
    /// Cumulative number of records committed
    Committed(usize),
    Finished(ImportSummary),
}

/// Outcome of a TSV import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub records: usize,
    pub skipped: usize,
}

/// Importer state: `ready` or `importing`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStatus {
    Ready,
    Importing,
}

impl ImportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportStatus::Ready => "ready",
            ImportStatus::Importing => "importing",
        }
    }
}

/// Bulk importer. Holds only its status; the store is passed per call.
#[derive(Debug)]
pub struct DataImporter {
    importing: AtomicBool,
    batch_size: usize,
}

impl Default for DataImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl DataImporter {
    pub fn new() -> Self {
        Self::with_batch_size(DEFAULT_BATCH_SIZE)
    }

    pub fn with_batch_size(batch_size: usize) -> Self {
        Self {
            importing: AtomicBool::new(false),
            batch_size: batch_size.max(1),
        }
    }

    pub fn status(&self) -> ImportStatus {
        if self.importing.load(Ordering::SeqCst) {
            ImportStatus::Importing
        } else {
            ImportStatus::Ready
        }
    }

    /// Import cognate pairs from TSV.
    ///
    /// Lines with fewer than five fields are skipped. A batch that fails is
    /// rolled back; batches committed before it are kept.
    pub fn import_tsv<R: BufRead>(
        &self,
        store: &mut SqliteStore,
        reader: R,
        progress: Option<&Sender<ImportProgress>>,
    ) -> Result<ImportSummary> {
        let _guard = StatusGuard::enter(&self.importing);
        notify(progress, ImportProgress::Started);

        let mut lines = reader.lines();
        match lines.next() {
            Some(header) => {
                header.map_err(|e| Error::Import(format!("failed to read header: {}", e)))?;
            }
            None => return Err(Error::Import("failed to read header: input is empty".to_string())),
        }

        let mut summary = ImportSummary { records: 0, skipped: 0 };
        let mut in_batch = 0;
        store.begin_transaction()?;

        for (index, line) in lines.enumerate() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    store.rollback()?;
                    return Err(Error::Import(format!("error reading line {}: {}", index + 2, e)));
                }
            };

            let Some(pair) = parse_tsv_line(&line) else {
                if !line.trim().is_empty() {
                    tracing::warn!("Skipping line {}: fewer than 5 fields", index + 2);
                }
                summary.skipped += 1;
                continue;
            };

            if let Err(e) = write_pair(store, &pair) {
                store.rollback()?;
                return Err(e);
            }

            summary.records += 1;
            in_batch += 1;

            if in_batch == self.batch_size {
                store.commit()?;
                notify(progress, ImportProgress::Committed(summary.records));
                store.begin_transaction()?;
                in_batch = 0;
            }
        }

        store.commit()?;

        store.set_import_metadata(&ImportMetadata {
            total_records: summary.records,
            status: "completed".to_string(),
            timestamp: unix_now(),
        })?;

        tracing::info!("Imported {} cognate pairs ({} lines skipped)", summary.records, summary.skipped);
        notify(progress, ImportProgress::Finished(summary));
        Ok(summary)
    }

    /// Import language records from a JSON array, replacing existing codes
    pub fn import_languages<R: Read>(&self, store: &mut SqliteStore, reader: R) -> Result<usize> {
        let _guard = StatusGuard::enter(&self.importing);

        let languages: Vec<LanguageInfo> = serde_json::from_reader(reader)
            .map_err(|e| Error::Import(format!("invalid language file: {}", e)))?;

        store.begin_transaction()?;
        for language in &languages {
            if let Err(e) = store.insert_language(language) {
                store.rollback()?;
                return Err(e);
            }
        }
        store.commit()?;

        tracing::info!("Imported {} language records", languages.len());
        Ok(languages.len())
    }

    /// Remove every stored record
    pub fn clear_database(&self, store: &SqliteStore) -> Result<()> {
        store.clear_all()?;
        tracing::info!("Database cleared");
        Ok(())
    }
}

/// Parse one data line; `None` when it has fewer than five fields
pub fn parse_tsv_line(line: &str) -> Option<CognatePair> {
    let fields: Vec<&str> = line.trim().split('\t').collect();
    if fields.len() < 5 {
        return None;
    }

    let pair = CognatePair::new(fields[0], fields[1], fields[2], fields[3], fields[4]);
    Some(pair.with_transliterations(
        fields.get(5).copied().unwrap_or_default(),
        fields.get(6).copied().unwrap_or_default(),
    ))
}

/// Lower-cased prefixes of `word`, by character, from two characters up
pub fn generate_prefixes(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.to_lowercase().chars().collect();
    (MIN_PREFIX_LEN..=chars.len())
        .map(|len| chars[..len].iter().collect())
        .collect()
}

fn write_pair(store: &SqliteStore, pair: &CognatePair) -> Result<()> {
    store.insert_cognate(pair)?;

    for (word, language) in [(&pair.word1, &pair.lang1), (&pair.word2, &pair.lang2)] {
        let entry = PrefixEntry::encode(word, language, &pair.concept_id);
        for prefix in generate_prefixes(word) {
            store.index_prefix(&prefix, &entry)?;
        }
    }
    Ok(())
}

fn notify(progress: Option<&Sender<ImportProgress>>, event: ImportProgress) {
    if let Some(tx) = progress {
        // Receiver gone means nobody is rendering; not an import failure
        let _ = tx.send(event);
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

/// Sets the importing flag for its lifetime
struct StatusGuard<'a>(&'a AtomicBool);

impl<'a> StatusGuard<'a> {
    fn enter(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for StatusGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
