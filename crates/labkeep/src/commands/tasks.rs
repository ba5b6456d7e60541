//! Task command handlers.

use tabled::Tabled;

use labkeep_core::view::{display_order, pending_tasks};
use labkeep_core::{Controller, NewTask, Task, TaskScope};

use crate::cli::{GlobalOpts, TaskScopeArgs, TasksArgs, TasksCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Machines")]
    machines: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&Task> for TaskRow {
    fn from(t: &Task) -> Self {
        let machines = if t.machine_names.is_empty() {
            &t.machine_keys
        } else {
            &t.machine_names
        };
        Self {
            id: t.task_id,
            name: t.task_name.clone(),
            status: output::status_badge(t.status(), false),
            machines: machines.join(", "),
            created: t
                .created_on
                .map(|d| d.format("%d/%m/%Y").to_string())
                .unwrap_or_default(),
        }
    }
}

impl From<TaskScopeArgs> for TaskScope {
    fn from(args: TaskScopeArgs) -> Self {
        match (args.lab, args.machine) {
            (Some(lab_id), _) => Self::Lab(lab_id),
            (None, Some(key)) => Self::Machine(key),
            // clap's group guarantees one of the two
            (None, None) => Self::Lab(String::new()),
        }
    }
}

fn print_tasks(tasks: &[&Task], global: &GlobalOpts) {
    let out = output::render_list(
        &global.output,
        tasks,
        |t| TaskRow::from(*t),
        |t| t.task_id.to_string(),
    );
    output::print_output(&out, global.quiet);
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: TasksArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        TasksCommand::List { scope, pending } => {
            let tasks = controller.tasks().list(&TaskScope::from(scope)).await?;
            let shown = if pending {
                pending_tasks(&tasks)
            } else {
                display_order(&tasks)
            };
            print_tasks(&shown, global);
            Ok(())
        }

        TasksCommand::Create {
            lab_id,
            name,
            description,
            machines,
        } => {
            let created = controller
                .tasks()
                .create_task(NewTask {
                    lab_id,
                    name,
                    description,
                    machine_keys: machines,
                })
                .await?;
            let task = created.task;
            util::report(created.outcome, global);
            if let Some(task) = task {
                print_tasks(&[&task], global);
            }
            Ok(())
        }

        TasksCommand::Complete { task_id, scope } => {
            let outcome = controller
                .tasks()
                .complete_task(task_id, &TaskScope::from(scope))
                .await?;
            if let Some(tasks) = util::report(outcome, global) {
                print_tasks(&display_order(&tasks), global);
            }
            Ok(())
        }
    }
}
