//! Session history handlers, plus the page rendering shared with
//! `machines show` and `students sessions`.

use std::fmt::Write as _;

use tabled::Tabled;

use labkeep_core::view::{paginate, recent_sessions};
use labkeep_core::{Controller, Page, UsageSession};

use crate::cli::{GlobalOpts, SessionsArgs, SessionsCommand};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SessionRow {
    #[tabled(rename = "Started")]
    started: String,
    #[tabled(rename = "Student")]
    student: String,
    #[tabled(rename = "Class")]
    class: String,
    #[tabled(rename = "Machine")]
    machine: String,
    #[tabled(rename = "CPU %")]
    cpu: String,
    #[tabled(rename = "RAM %")]
    ram: String,
    #[tabled(rename = "Temp")]
    temp: String,
}

fn reading(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.1}")).unwrap_or_default()
}

impl From<&UsageSession> for SessionRow {
    fn from(s: &UsageSession) -> Self {
        Self {
            started: s.display_start(),
            student: s.student_name.clone(),
            class: s.class_var.clone(),
            machine: s.machine_name.clone(),
            cpu: reading(s.cpu_usage),
            ram: reading(s.ram_usage),
            temp: reading(s.cpu_temp),
        }
    }
}

fn session_id(s: &UsageSession) -> String {
    s.session_start.clone()
}

// ── Page rendering ──────────────────────────────────────────────────

/// `Sessions 11-20 of 23 (page 2/3)`.
pub fn page_heading(page: &Page<UsageSession>) -> String {
    if page.items.is_empty() {
        return "Sessions: none".into();
    }
    let first = page.first_index();
    format!(
        "Sessions {}-{} of {} (page {}/{})",
        first,
        first + page.items.len() - 1,
        page.total_items,
        page.page,
        page.total_pages
    )
}

pub fn render_page_table(page: &Page<UsageSession>) -> String {
    if page.items.is_empty() {
        return String::new();
    }
    let rows: Vec<SessionRow> = page.items.iter().map(SessionRow::from).collect();
    let mut out = output::render_table(&rows);
    if page.has_next() {
        let _ = write!(out, "\n--page {} for more", page.page + 1);
    }
    out
}

/// Render one page: heading and table for `table`, the `Page` itself otherwise.
pub fn render_page(page: &Page<UsageSession>, global: &GlobalOpts) -> String {
    output::render_single(
        &global.output,
        page,
        |p| {
            let table = render_page_table(p);
            if table.is_empty() {
                page_heading(p)
            } else {
                format!("{}\n{table}", page_heading(p))
            }
        },
        |p| {
            p.items
                .iter()
                .map(session_id)
                .collect::<Vec<_>>()
                .join("\n")
        },
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: SessionsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SessionsCommand::List {
            lab,
            machine,
            student,
            recent,
            page,
        } => {
            let sessions = match (lab, machine, student) {
                (Some(lab_id), _, _) => controller.list_lab_sessions(&lab_id).await?,
                (_, Some(key), _) => controller.list_machine_sessions(&key).await?,
                (_, _, Some(id)) => controller.list_student_sessions(id).await?,
                // clap requires one of the three
                (None, None, None) => Vec::new(),
            };

            let out = if let Some(n) = recent {
                output::render_list(
                    &global.output,
                    recent_sessions(&sessions, n),
                    |s| SessionRow::from(s),
                    session_id,
                )
            } else if let Some(page) = page {
                render_page(
                    &paginate(&sessions, page, controller.config().page_size),
                    global,
                )
            } else {
                output::render_list(
                    &global.output,
                    &sessions,
                    |s| SessionRow::from(s),
                    session_id,
                )
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(n: usize) -> UsageSession {
        UsageSession {
            student_name: format!("aluno {n}"),
            machine_name: "PC-01".into(),
            machine_key: Some("KEY-1".into()),
            class_var: "3A".into(),
            session_start: format!("2025-06-{n:02} 10:00:00"),
            started_at: None,
            cpu_usage: Some(12.5),
            ram_usage: None,
            cpu_temp: None,
        }
    }

    #[test]
    fn heading_counts_from_page_position() {
        let all: Vec<UsageSession> = (1..=23).map(session).collect();
        assert_eq!(
            page_heading(&paginate(&all, 2, 10)),
            "Sessions 11-20 of 23 (page 2/3)"
        );
        assert_eq!(
            page_heading(&paginate(&all, 9, 10)),
            "Sessions 21-23 of 23 (page 3/3)"
        );
        assert_eq!(page_heading(&paginate(&[], 1, 10)), "Sessions: none");
    }

    #[test]
    fn last_page_has_no_more_hint() {
        let all: Vec<UsageSession> = (1..=12).map(session).collect();
        assert!(render_page_table(&paginate(&all, 1, 10)).ends_with("--page 2 for more"));
        assert!(!render_page_table(&paginate(&all, 2, 10)).contains("--page"));
    }

    #[test]
    fn readings_use_one_decimal() {
        assert_eq!(reading(Some(12.5)), "12.5");
        assert_eq!(reading(None), "");
    }
}
