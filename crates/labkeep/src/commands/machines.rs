//! Machine command handlers.

use std::fmt::Write as _;

use tabled::Tabled;

use labkeep_core::{Controller, Machine, MachineView, Notice, ViewScope};

use crate::cards::{self, ResourceCard};
use crate::cli::{GlobalOpts, MachinesArgs, MachinesCommand};
use crate::error::CliError;
use crate::output;

use super::{sessions, util};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct MachineRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Last checked")]
    last_checked: String,
    #[tabled(rename = "Memory")]
    memory: String,
    #[tabled(rename = "Storage")]
    storage: String,
}

impl From<&Machine> for MachineRow {
    fn from(m: &Machine) -> Self {
        Self {
            key: m.machine_key.clone(),
            name: m.machine_name.clone(),
            state: m.state_cleanliness.to_string(),
            last_checked: m
                .last_checked
                .map(|d| d.to_string())
                .unwrap_or_default(),
            memory: m.memory.clone(),
            storage: m.storage.clone(),
        }
    }
}

// ── Detail view ─────────────────────────────────────────────────────

fn machine_detail(view: &MachineView, color: bool) -> String {
    let mut out = ResourceCard::Machine(&view.machine).render(color);
    if let Some(ref lab) = view.machine.lab_id {
        let _ = write!(out, "\n    Lab: {lab}");
    }

    let _ = writeln!(out, "\n\nPending tasks ({}):", view.pending.len());
    out.push_str(&cards::render_all(
        view.pending.iter().map(ResourceCard::Task),
        color,
        "(no pending tasks)",
    ));

    let _ = writeln!(out, "\n\n{}", sessions::page_heading(&view.sessions));
    out.push_str(&sessions::render_page_table(&view.sessions));
    out
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: MachinesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        MachinesCommand::List { lab_id } => {
            let machines = controller.list_lab_machines(&lab_id).await?;
            let out = output::render_list(
                &global.output,
                &machines,
                |m| MachineRow::from(m),
                |m| m.machine_key.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        MachinesCommand::Show { machine_key, page } => {
            let view = controller
                .load_machine_view(&machine_key, page, &ViewScope::new())
                .await?;
            let out = output::render_single(
                &global.output,
                &view,
                |v| machine_detail(v, color),
                |v| v.machine.machine_key.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        MachinesCommand::Check { machine_key, date } => {
            let update = controller
                .machines()
                .update_last_check(&machine_key, &date)
                .await?;
            util::notify(&Notice::success(update.message.clone()), global);
            if !global.quiet {
                eprintln!("Last check for {} is now {}", update.machine_key, update.accepted);
            }
            Ok(())
        }

        MachinesCommand::Clean { machine_key, state } => {
            let outcome = controller
                .machines()
                .update_cleanliness(&machine_key, &state)
                .await?;
            if let Some(machine) = util::report(outcome, global) {
                let out = output::render_single(
                    &global.output,
                    &machine,
                    |m| ResourceCard::Machine(m).render(color),
                    |m| m.machine_key.clone(),
                );
                output::print_output(&out, global.quiet);
            }
            Ok(())
        }
    }
}
