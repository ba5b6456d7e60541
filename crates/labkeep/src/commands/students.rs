//! Student command handlers.

use tabled::Tabled;

use labkeep_core::{Controller, Student, ViewScope};

use crate::cli::{GlobalOpts, StudentsArgs, StudentsCommand};
use crate::error::CliError;
use crate::output;

use super::sessions;

#[derive(Tabled)]
struct StudentRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Class")]
    class: String,
}

impl From<&Student> for StudentRow {
    fn from(s: &Student) -> Self {
        Self {
            id: s.student_id,
            name: s.student_name.clone(),
            class: s.class_var.clone(),
        }
    }
}

pub async fn handle(
    controller: &Controller,
    args: StudentsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        StudentsCommand::List { lab_id } => {
            let students = controller.list_lab_students(&lab_id).await?;
            let out = output::render_list(
                &global.output,
                &students,
                |s| StudentRow::from(s),
                |s| s.student_id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        StudentsCommand::Sessions { student_id, page } => {
            let view = controller
                .load_student_view(student_id, page, &ViewScope::new())
                .await?;
            let out = sessions::render_page(&view.sessions, global);
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
