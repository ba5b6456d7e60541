//! Resource cards: one compact block per task, machine, or student.
//!
//! Used by the detail views (`labs show`, `labs roster`, `machines show`)
//! where a table would be too wide.

use std::fmt::Write as _;

use labkeep_core::{Machine, Student, Task};

use crate::output;

/// Anything that can be drawn as a card.
pub enum ResourceCard<'a> {
    Task(&'a Task),
    Machine(&'a Machine),
    Student(&'a Student),
}

impl ResourceCard<'_> {
    pub fn title(&self) -> String {
        match self {
            Self::Task(t) => format!("#{} {}", t.task_id, t.task_name),
            Self::Machine(m) => format!("{} ({})", m.machine_name, m.machine_key),
            Self::Student(s) => s.student_name.clone(),
        }
    }

    pub fn badge(&self, color: bool) -> Option<String> {
        match self {
            Self::Task(t) => Some(output::status_badge(t.status(), color)),
            Self::Machine(m) => Some(output::cleanliness_badge(m.state_cleanliness, color)),
            Self::Student(_) => None,
        }
    }

    /// Secondary lines, without the title.
    pub fn details(&self) -> Vec<String> {
        match self {
            Self::Task(t) => {
                let mut lines = Vec::new();
                if !t.task_description.is_empty() {
                    lines.push(t.task_description.clone());
                }
                let machines = if t.machine_names.is_empty() {
                    &t.machine_keys
                } else {
                    &t.machine_names
                };
                if !machines.is_empty() {
                    lines.push(format!("Machines: {}", machines.join(", ")));
                }
                if let Some(created) = t.created_on {
                    lines.push(format!("Created: {}", created.format("%d/%m/%Y")));
                }
                lines
            }
            Self::Machine(m) => vec![
                format!("Board: {}  Memory: {}  Storage: {}", m.motherboard, m.memory, m.storage),
                format!(
                    "Last checked: {}",
                    m.last_checked
                        .map_or_else(|| "never".to_owned(), |d| d.to_string())
                ),
            ],
            Self::Student(s) => vec![format!("ID: {}  Class: {}", s.student_id, s.class_var)],
        }
    }

    pub fn render(&self, color: bool) -> String {
        let mut out = self.title();
        if let Some(badge) = self.badge(color) {
            let _ = write!(out, "  [{badge}]");
        }
        for line in self.details() {
            let _ = write!(out, "\n    {line}");
        }
        out
    }
}

/// Render cards separated by blank lines, or `empty` when there are none.
pub fn render_all<'a>(
    cards: impl IntoIterator<Item = ResourceCard<'a>>,
    color: bool,
    empty: &str,
) -> String {
    let rendered: Vec<String> = cards.into_iter().map(|c| c.render(color)).collect();
    if rendered.is_empty() {
        empty.to_owned()
    } else {
        rendered.join("\n\n")
    }
}
