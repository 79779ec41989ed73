use cognet::config::{self, CognetConfig};
use cognet::importer::DataImporter;
use cognet::output::{emit_success, OutputMode};
use cognet::search::CognateSearch;
use cognet::storage::SqliteStore;
use cognet::ui::{self, banner, chain_table, section, stats_table, success, summary_row, theme, Icons};
use owo_colors::OwoColorize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

fn open_store(settings: &CognetConfig) -> anyhow::Result<SqliteStore> {
    let path = settings.database_path();
    config::ensure_db_dir(&path)?;
    tracing::debug!("Opening database {:?}", path);
    Ok(SqliteStore::open(&path)?)
}

pub fn run_init(
    output_mode: OutputMode,
    path: &Path,
    settings: &CognetConfig,
    force: bool,
) -> anyhow::Result<()> {
    config::write_config(path, settings, force)?;
    let database = settings.database_path();
    config::ensure_db_dir(&database)?;
    SqliteStore::open(&database)?;

    if output_mode.is_human() {
        success(&format!("Wrote {}", path.display()));
        ui::info("Database", &database.display().to_string());
    } else {
        emit_success(output_mode, "init", serde_json::json!({
            "config": path.display().to_string(),
            "database": database.display().to_string(),
        }))?;
    }
    Ok(())
}

pub fn run_import(output_mode: OutputMode, settings: &CognetConfig, file: &Path) -> anyhow::Result<()> {
    let mut store = open_store(settings)?;
    let reader = BufReader::new(File::open(file)?);
    let importer = DataImporter::new();

    if output_mode.is_chatty() {
        banner(
            &format!("{} {}", Icons::DATABASE, "Import".bold().style(theme().info)),
            &format!("Reading {}", file.display()),
        );
    }

    let start = Instant::now();
    let summary = if output_mode.is_chatty() {
        let (progress, tx) = ui::ImportProgressBar::new();
        let result = importer.import_tsv(&mut store, reader, Some(&tx));
        drop(tx);
        let summary = result?;
        progress.finish_with_summary(start.elapsed(), &summary);
        summary
    } else {
        importer.import_tsv(&mut store, reader, None)?
    };

    tracing::info!("Imported {} records ({} skipped) from {:?}", summary.records, summary.skipped, file);
    emit_success(output_mode, "import", summary)?;
    Ok(())
}

pub fn run_import_languages(output_mode: OutputMode, settings: &CognetConfig, file: &Path) -> anyhow::Result<()> {
    let mut store = open_store(settings)?;
    let reader = BufReader::new(File::open(file)?);

    let spinner = output_mode.is_chatty().then(|| ui::Spinner::new("Importing languages"));
    let count = DataImporter::new().import_languages(&mut store, reader)?;

    if let Some(spinner) = spinner {
        spinner.finish_with_message(&format!("Imported {} languages", count));
    }
    emit_success(output_mode, "import-languages", serde_json::json!({ "languages": count }))?;
    Ok(())
}

pub fn run_suggest(output_mode: OutputMode, settings: &CognetConfig, prefix: &str) -> anyhow::Result<()> {
    let store = open_store(settings)?;
    let suggestions = CognateSearch::new(&store).suggest_words(prefix)?;

    if !output_mode.is_human() {
        return emit_success(output_mode, "suggest", suggestions);
    }

    section(&format!("{} Suggestions for '{}'", Icons::SEARCH, prefix));
    if suggestions.is_empty() {
        println!("  {}", ui::dim("no matching words"));
    }
    for suggestion in &suggestions {
        let language = suggestion
            .language_info
            .as_ref()
            .map(|info| format!("{} ({})", info.name, suggestion.language))
            .unwrap_or_else(|| suggestion.language.clone());
        println!(
            "  {} {}  {}",
            suggestion.word.style(theme().accent),
            language.style(theme().dim),
            ui::dim(&format!("concept {}", suggestion.concept_id))
        );
    }
    Ok(())
}

pub fn run_concept(output_mode: OutputMode, settings: &CognetConfig, concept_id: &str) -> anyhow::Result<()> {
    let store = open_store(settings)?;
    let pairs = CognateSearch::new(&store).cognates_by_concept(concept_id)?;

    if !output_mode.is_human() {
        return emit_success(output_mode, "concept", pairs);
    }

    section(&format!("{} Concept {} ({} pairs)", Icons::LINK, concept_id, pairs.len()));
    for pair in &pairs {
        println!(
            "  {}:{} {} {}:{}",
            pair.lang1.style(theme().dim),
            pair.word1.style(theme().accent),
            "↔".style(theme().dim),
            pair.lang2.style(theme().dim),
            pair.word2.style(theme().accent),
        );
    }
    Ok(())
}

pub fn run_chains(
    output_mode: OutputMode,
    settings: &CognetConfig,
    concept_id: &str,
    word: Option<&str>,
    lang: Option<&str>,
) -> anyhow::Result<()> {
    let store = open_store(settings)?;
    let search = CognateSearch::new(&store);
    let result = search.find_cognate_chains(concept_id, word, lang)?;

    if !output_mode.is_human() {
        return emit_success(output_mode, "chains", result);
    }

    let graph = search.concept_graph_stats(concept_id)?;
    banner(
        &format!("{} {}", Icons::GLOBE, format!("Concept {}", concept_id).bold().style(theme().info)),
        &format!("{} chains, {} placed words ({})", result.chains.len(), result.word_count(), graph),
    );
    if result.chains.is_empty() {
        println!("  {}", ui::dim("no chains found"));
    }
    for (i, chain) in result.chains.iter().enumerate() {
        section(&format!("{} Chain {} ({} words)", Icons::PIN, i + 1, chain.len()));
        println!("{}", chain_table(chain));
    }
    Ok(())
}

pub fn run_stats(output_mode: OutputMode, settings: &CognetConfig) -> anyhow::Result<()> {
    let store = open_store(settings)?;
    let stats = store.stats()?;
    let last_import = store.import_metadata()?;

    if !output_mode.is_human() {
        return emit_success(output_mode, "stats", serde_json::json!({
            "stats": stats,
            "last_import": last_import,
        }));
    }

    section(&format!("{} Database", Icons::STATS));
    let concepts = stats.concepts.to_string();
    let cognates = stats.cognates.to_string();
    let languages = stats.languages.to_string();
    let prefixes = stats.prefixes.to_string();
    println!("{}", stats_table(&[
        ("Concepts", &concepts),
        ("Cognate pairs", &cognates),
        ("Languages", &languages),
        ("Prefix entries", &prefixes),
    ]));
    if let Some(meta) = last_import {
        summary_row("Last import:", &format!("{} records ({}) at {}", meta.total_records, meta.status, meta.timestamp));
    }
    Ok(())
}

pub fn run_clear(output_mode: OutputMode, settings: &CognetConfig, yes: bool) -> anyhow::Result<()> {
    let store = open_store(settings)?;

    if !yes {
        if !output_mode.is_human() || !console::Term::stdout().is_term() {
            anyhow::bail!("refusing to clear without --yes");
        }
        print!("{} Delete every record in {}? [y/N] ", Icons::DEL, settings.database_path().display());
        std::io::Write::flush(&mut std::io::stdout())?;
        let answer = console::Term::stdout().read_line()?;
        if !matches!(answer.trim(), "y" | "Y" | "yes") {
            ui::warn("Aborted");
            return Ok(());
        }
    }

    DataImporter::new().clear_database(&store)?;

    if output_mode.is_human() {
        success("Database cleared");
    } else {
        emit_success(output_mode, "clear", serde_json::json!({ "cleared": true }))?;
    }
    Ok(())
}
