//! Output mode for CLI commands: styled text for people, JSON for scripts

use serde::Serialize;
use std::sync::OnceLock;

static QUIET: OnceLock<bool> = OnceLock::new();

/// `COGNET_QUIET=1` suppresses banners and progress output
pub fn is_quiet() -> bool {
    *QUIET.get_or_init(|| {
        std::env::var("COGNET_QUIET")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn from_json_flag(json: bool) -> Self {
        if json { OutputMode::Json } else { OutputMode::Human }
    }

    pub fn is_human(&self) -> bool {
        *self == OutputMode::Human
    }

    /// Human mode with quiet off
    pub fn is_chatty(&self) -> bool {
        self.is_human() && !is_quiet()
    }
}

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    ok: bool,
    command: &'a str,
    data: T,
}

/// Render a command result as the JSON envelope `{"ok", "command", "data"}`
pub fn success_json<T: Serialize>(command: &str, data: T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&Envelope { ok: true, command, data })
}

/// Print a command result in JSON mode; no-op in human mode
pub fn emit_success<T: Serialize>(mode: OutputMode, command: &str, data: T) -> anyhow::Result<()> {
    if mode == OutputMode::Json {
        println!("{}", success_json(command, data)?);
    }
    Ok(())
}

#[derive(Serialize)]
struct FailureEnvelope<'a> {
    ok: bool,
    command: &'a str,
    error: String,
    causes: Vec<String>,
}

/// Render a failed command as `{"ok": false, "command", "error", "causes"}`
pub fn failure_json(command: &str, err: &anyhow::Error) -> serde_json::Result<String> {
    let mut causes = crate::ui::cause_lines(err);
    let error = if causes.is_empty() { err.to_string() } else { causes.remove(0) };
    serde_json::to_string_pretty(&FailureEnvelope { ok: false, command, error, causes })
}

/// Report a failed command: JSON envelope on stdout, or styled lines on stderr
pub fn emit_failure(mode: OutputMode, command: &str, err: &anyhow::Error) {
    match mode {
        OutputMode::Json => match failure_json(command, err) {
            Ok(json) => println!("{}", json),
            Err(_) => crate::ui::error(err),
        },
        OutputMode::Human => crate::ui::error(err),
    }
}
