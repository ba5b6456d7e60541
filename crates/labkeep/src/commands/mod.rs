//! Command dispatch: bridges CLI args -> controller calls -> output formatting.

pub mod auth;
pub mod config_cmd;
pub mod labs;
pub mod machines;
pub mod sessions;
pub mod students;
pub mod tasks;
pub mod util;

use labkeep_core::Controller;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    controller: &Controller,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => auth::login(controller, args, profile_name, global).await,
        Command::Whoami { refresh } => {
            auth::whoami(controller, refresh, profile_name, global).await
        }
        Command::Register(args) => auth::register(controller, args, global).await,
        Command::Labs(args) => labs::handle(controller, args, global).await,
        Command::Machines(args) => machines::handle(controller, args, global).await,
        Command::Tasks(args) => tasks::handle(controller, args, global).await,
        Command::Sessions(args) => sessions::handle(controller, args, global).await,
        Command::Students(args) => students::handle(controller, args, global).await,
        // Handled in `run` before a controller exists
        Command::Logout | Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
