// ── View composition ──
//
// Pure derivations over freshly fetched resources (pending subsets,
// pagination, summary counters) plus the composite loaders behind each
// screen. Loaders fetch sequentially inside a `ViewScope`; once the scope
// is torn down, any fetch still in flight resolves to `Cancelled`.

use std::future::Future;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::controller::Controller;
use crate::error::CoreError;
use crate::machines::LastCheckUpdate;
use crate::model::{Lab, Machine, Student, Task, UsageSession};

// ── Derivations ──────────────────────────────────────────────────────

/// Tasks with `is_complete == false`, in server order.
pub fn pending_tasks(tasks: &[Task]) -> Vec<&Task> {
    tasks.iter().filter(|t| t.is_pending()).collect()
}

/// The first `limit` pending tasks, in server order.
pub fn pending_preview(tasks: &[Task], limit: usize) -> Vec<&Task> {
    tasks.iter().filter(|t| t.is_pending()).take(limit).collect()
}

/// Pending tasks first, then complete ones; server order within each group.
pub fn display_order(tasks: &[Task]) -> Vec<&Task> {
    let mut ordered: Vec<&Task> = tasks.iter().collect();
    ordered.sort_by_key(|t| t.is_complete);
    ordered
}

/// The first `n` sessions as the server ordered them.
pub fn recent_sessions(sessions: &[UsageSession], n: usize) -> &[UsageSession] {
    &sessions[..n.min(sessions.len())]
}

/// One page of a list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number, after clamping.
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub page_size: usize,
}

impl<T> Page<T> {
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// 1-based position of the first item on this page (0 when empty).
    pub fn first_index(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            (self.page - 1) * self.page_size + 1
        }
    }
}

/// Slice `items` into page `page` (1-based), clamped to `[1, total_pages]`.
///
/// An empty list is a single empty page; a page size of 0 counts as 1.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(page_size).max(1);
    let page = page.clamp(1, total_pages);

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(total_items);
    Page {
        items: items.get(start..end).unwrap_or_default().to_vec(),
        page,
        total_pages,
        total_items,
        page_size,
    }
}

/// Counters shown on a lab's overview. Sourced from the server's
/// aggregate fields, not from list lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LabSummary {
    pub students: u32,
    pub machines: u32,
    pub users: u32,
    pub tasks: u32,
}

impl From<&Lab> for LabSummary {
    fn from(lab: &Lab) -> Self {
        Self {
            students: lab.student_count,
            machines: lab.machine_count,
            users: lab.user_count,
            tasks: lab.task_count,
        }
    }
}

// ── ViewScope ────────────────────────────────────────────────────────

/// Lifetime of one view. Tearing it down cancels pending fetches.
#[derive(Debug, Clone, Default)]
pub struct ViewScope {
    cancel: CancellationToken,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `fut` unless the view is torn down first.
    pub async fn guard<T, F>(&self, fut: F) -> Result<T, CoreError>
    where
        F: Future<Output = Result<T, CoreError>>,
    {
        if self.cancel.is_cancelled() {
            return Err(CoreError::Cancelled);
        }
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(CoreError::Cancelled),
            result = fut => result,
        }
    }

    pub fn teardown(&self) {
        self.cancel.cancel();
    }

    pub fn is_torn_down(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

// ── Composite views ──────────────────────────────────────────────────

/// Lab page: details, counters, and the first few pending tasks.
#[derive(Debug, Clone, Serialize)]
pub struct LabOverview {
    pub lab: Lab,
    pub summary: LabSummary,
    pub pending: Vec<Task>,
    /// Pending tasks in total, of which `pending` is a preview.
    pub pending_total: usize,
}

/// Machine page: details, one page of session history, pending tasks.
#[derive(Debug, Clone, Serialize)]
pub struct MachineView {
    pub machine: Machine,
    pub sessions: Page<UsageSession>,
    pub pending: Vec<Task>,
}

impl MachineView {
    /// Apply an accepted last-check date without re-fetching.
    pub fn patch_last_check(&mut self, update: &LastCheckUpdate) {
        if update.machine_key == self.machine.machine_key {
            self.machine.last_checked = Some(update.accepted);
        }
    }
}

/// Student page: one page of session history.
#[derive(Debug, Clone, Serialize)]
pub struct StudentView {
    pub student_id: i64,
    pub sessions: Page<UsageSession>,
}

/// Everything that lives in a lab.
#[derive(Debug, Clone, Serialize)]
pub struct LabRoster {
    pub lab: Lab,
    pub machines: Vec<Machine>,
    pub students: Vec<Student>,
}

impl Controller {
    /// Lab -> tasks.
    pub async fn load_lab_overview(
        &self,
        lab_id: &str,
        scope: &ViewScope,
    ) -> Result<LabOverview, CoreError> {
        debug!(lab_id, "loading lab overview");
        let lab = scope.guard(self.get_lab(lab_id)).await?;
        let tasks = scope.guard(self.list_lab_tasks(lab_id)).await?;

        Ok(LabOverview {
            summary: LabSummary::from(&lab),
            pending_total: pending_tasks(&tasks).len(),
            pending: pending_preview(&tasks, self.config().pending_preview)
                .into_iter()
                .cloned()
                .collect(),
            lab,
        })
    }

    /// Machine -> sessions -> tasks.
    pub async fn load_machine_view(
        &self,
        machine_key: &str,
        page: usize,
        scope: &ViewScope,
    ) -> Result<MachineView, CoreError> {
        debug!(machine_key, page, "loading machine view");
        let machine = scope.guard(self.get_machine(machine_key)).await?;
        let sessions = scope.guard(self.list_machine_sessions(machine_key)).await?;
        let tasks = scope.guard(self.list_machine_tasks(machine_key)).await?;

        Ok(MachineView {
            machine,
            sessions: paginate(&sessions, page, self.config().page_size),
            pending: pending_tasks(&tasks).into_iter().cloned().collect(),
        })
    }

    pub async fn load_student_view(
        &self,
        student_id: i64,
        page: usize,
        scope: &ViewScope,
    ) -> Result<StudentView, CoreError> {
        debug!(student_id, page, "loading student view");
        let sessions = scope.guard(self.list_student_sessions(student_id)).await?;
        Ok(StudentView {
            student_id,
            sessions: paginate(&sessions, page, self.config().page_size),
        })
    }

    /// Lab -> machines -> students.
    pub async fn load_lab_roster(
        &self,
        lab_id: &str,
        scope: &ViewScope,
    ) -> Result<LabRoster, CoreError> {
        debug!(lab_id, "loading lab roster");
        let lab = scope.guard(self.get_lab(lab_id)).await?;
        let machines = scope.guard(self.list_lab_machines(lab_id)).await?;
        let students = scope.guard(self.list_lab_students(lab_id)).await?;
        Ok(LabRoster {
            lab,
            machines,
            students,
        })
    }
}
