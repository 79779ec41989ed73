//! Database schema definitions

/// SQL to create the cognates table.
/// One JSON-encoded pair per row; `id` order is the concept's list order.
pub const CREATE_COGNATES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS cognates (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    concept_id TEXT NOT NULL,
    payload TEXT NOT NULL
)
"#;

/// SQL to create the languages table
pub const CREATE_LANGUAGES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS languages (
    code TEXT PRIMARY KEY,
    payload TEXT NOT NULL
)
"#;

/// SQL to create the prefixes table (set of `word|lang|concept` per prefix)
pub const CREATE_PREFIXES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS prefixes (
    prefix TEXT NOT NULL,
    entry TEXT NOT NULL,
    UNIQUE(prefix, entry)
)
"#;

/// SQL to create the import_metadata table (single row)
pub const CREATE_IMPORT_METADATA_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS import_metadata (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    total_records INTEGER NOT NULL,
    status TEXT NOT NULL,
    timestamp INTEGER NOT NULL
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_cognates_concept ON cognates(concept_id, id)",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![
        CREATE_COGNATES_TABLE,
        CREATE_LANGUAGES_TABLE,
        CREATE_PREFIXES_TABLE,
        CREATE_IMPORT_METADATA_TABLE,
    ];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
