//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.
//! Notices go to stderr so piped stdout stays machine-readable.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use labkeep_core::{CleanlinessState, Notice, NoticeLevel, TaskStatus};

use crate::cli::{ColorMode, OutputFormat};

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

pub fn status_badge(status: TaskStatus, color: bool) -> String {
    let label = match status {
        TaskStatus::Pending => "pending",
        TaskStatus::Complete => "done",
    };
    if !color {
        return label.to_owned();
    }
    match status {
        TaskStatus::Pending => label.yellow().to_string(),
        TaskStatus::Complete => label.green().to_string(),
    }
}

pub fn cleanliness_badge(state: CleanlinessState, color: bool) -> String {
    let label = state.to_string();
    if !color {
        return label;
    }
    match state {
        CleanlinessState::Bom => label.green().to_string(),
        CleanlinessState::Regular => label.yellow().to_string(),
        CleanlinessState::Urgente => label.red().bold().to_string(),
    }
}

fn notice_prefix(level: NoticeLevel, color: bool) -> String {
    let label = level.to_string();
    if !color {
        return format!("{label}:");
    }
    match level {
        NoticeLevel::Success => format!("{}:", label.green()),
        NoticeLevel::Info => format!("{}:", label.cyan()),
        NoticeLevel::Warning => format!("{}:", label.yellow()),
        NoticeLevel::Error => format!("{}:", label.red()),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            if data.is_empty() {
                return "(none)".into();
            }
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted
/// string, since detail views don't use the `Tabled` derive.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => id_fn(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Print notices to stderr. Errors and warnings are shown even when quiet.
pub fn print_notices(notices: &[Notice], quiet: bool, color: bool) {
    let mut stderr = io::stderr().lock();
    for notice in notices {
        let loud = matches!(notice.level, NoticeLevel::Warning | NoticeLevel::Error);
        if quiet && !loud {
            continue;
        }
        let _ = writeln!(
            stderr,
            "{} {}",
            notice_prefix(notice.level, color),
            notice.message
        );
    }
}

// ── Format-specific renderers ────────────────────────────────────────

pub(crate) fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.unwrap_or_else(|e| format!("{{\"error\": \"serialization failed: {e}\"}}"))
}

/// YAML output.
fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).unwrap_or_else(|e| format!("error: serialization failed: {e}"))
}
