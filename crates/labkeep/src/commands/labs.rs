//! Lab command handlers.

use std::fmt::Write as _;

use tabled::Tabled;

use labkeep_core::{
    Controller, ErrorCategory, Lab, LabChanges, LabOverview, LabRoster, NewLab, Notice,
    ViewScope,
};

use crate::cards::{self, ResourceCard};
use crate::cli::{GlobalOpts, LabsArgs, LabsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct LabRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Classes")]
    classes: String,
    #[tabled(rename = "Students")]
    students: u32,
    #[tabled(rename = "Machines")]
    machines: u32,
    #[tabled(rename = "Tasks")]
    tasks: u32,
}

impl From<&Lab> for LabRow {
    fn from(l: &Lab) -> Self {
        Self {
            id: l.lab_id.clone(),
            name: l.lab_name.clone(),
            classes: l.classes.join(", "),
            students: l.student_count,
            machines: l.machine_count,
            tasks: l.task_count,
        }
    }
}

// ── Detail views ────────────────────────────────────────────────────

fn overview_detail(view: &LabOverview, color: bool) -> String {
    let lab = &view.lab;
    let s = view.summary;
    let mut out = format!(
        "{} ({})\nClasses:  {}\nStudents: {}  Machines: {}  Users: {}  Tasks: {}\n",
        lab.lab_name,
        lab.lab_id,
        if lab.classes.is_empty() {
            "-".to_owned()
        } else {
            lab.classes.join(", ")
        },
        s.students,
        s.machines,
        s.users,
        s.tasks,
    );
    let _ = writeln!(
        out,
        "\nPending tasks ({} of {}):",
        view.pending.len(),
        view.pending_total
    );
    out.push_str(&cards::render_all(
        view.pending.iter().map(ResourceCard::Task),
        color,
        "(no pending tasks)",
    ));
    out
}

fn roster_detail(roster: &LabRoster, color: bool) -> String {
    format!(
        "{} ({})\n\nMachines ({}):\n{}\n\nStudents ({}):\n{}",
        roster.lab.lab_name,
        roster.lab.lab_id,
        roster.machines.len(),
        cards::render_all(
            roster.machines.iter().map(ResourceCard::Machine),
            color,
            "(none)"
        ),
        roster.students.len(),
        cards::render_all(
            roster.students.iter().map(ResourceCard::Student),
            color,
            "(none)"
        ),
    )
}

fn print_labs(labs: &[Lab], global: &GlobalOpts) {
    let out = output::render_list(
        &global.output,
        labs,
        |l| LabRow::from(l),
        |l| l.lab_id.clone(),
    );
    output::print_output(&out, global.quiet);
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: LabsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        LabsCommand::List => {
            let labs = controller.list_my_labs().await?;
            print_labs(&labs, global);
            Ok(())
        }

        LabsCommand::Show { lab_id } => {
            let view = controller
                .load_lab_overview(&lab_id, &ViewScope::new())
                .await?;
            let out = output::render_single(
                &global.output,
                &view,
                |v| overview_detail(v, color),
                |v| v.lab.lab_id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        LabsCommand::Create {
            lab_id,
            name,
            classes,
        } => {
            let outcome = controller
                .create_lab(NewLab {
                    lab_id,
                    lab_name: name,
                    classes,
                })
                .await?;
            if let Some(labs) = util::report(outcome, global) {
                print_labs(&labs, global);
            }
            Ok(())
        }

        LabsCommand::Update {
            lab_id,
            name,
            classes,
        } => {
            let outcome = controller
                .update_lab(
                    &lab_id,
                    LabChanges {
                        lab_name: name,
                        classes,
                    },
                )
                .await?;
            if let Some(lab) = util::report(outcome, global) {
                print_labs(std::slice::from_ref(&lab), global);
            }
            Ok(())
        }

        LabsCommand::Join { lab_id } => match controller.join_lab(&lab_id).await {
            Ok(outcome) => {
                if let Some(labs) = util::report(outcome, global) {
                    print_labs(&labs, global);
                }
                Ok(())
            }
            // Already a member: reported, not a failure
            Err(err) if err.category() == ErrorCategory::Conflict => {
                util::notify(&Notice::from_error(&err), global);
                Ok(())
            }
            Err(err) => Err(err.into()),
        },

        LabsCommand::Delete { lab_id } => {
            if !util::confirm(
                &format!("Delete lab '{lab_id}'? This cannot be undone."),
                "labs delete",
                global.yes,
            )? {
                return Ok(());
            }
            let outcome = controller.delete_lab(&lab_id).await?;
            if let Some(labs) = util::report(outcome, global) {
                print_labs(&labs, global);
            }
            Ok(())
        }

        LabsCommand::Roster { lab_id } => {
            let roster = controller
                .load_lab_roster(&lab_id, &ViewScope::new())
                .await?;
            let out = output::render_single(
                &global.output,
                &roster,
                |r| roster_detail(r, color),
                |r| r.lab.lab_id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
