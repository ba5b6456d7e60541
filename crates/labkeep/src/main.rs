mod cards;
mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use labkeep_core::Controller;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose, cli.global.log_json);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a server connection
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "labkeep", &mut std::io::stdout());
            Ok(())
        }

        // Logout only touches the session file
        Command::Logout => {
            let cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(&cli.global, &cfg);
            commands::auth::logout(&profile_name, &cli.global)
        }

        cmd => {
            let (client_config, profile_name) = config::resolve_client_config(&cli.global)?;
            let controller = Controller::new(client_config)?;
            restore_session(&controller, &profile_name);

            tracing::debug!(command = ?cmd, profile = %profile_name, "dispatching command");
            commands::dispatch(cmd, &controller, &profile_name, &cli.global).await
        }
    }
}

/// Re-hydrate the persisted session, if any. A corrupt file is ignored.
fn restore_session(controller: &Controller, profile_name: &str) {
    match config::load_session(profile_name) {
        Ok(Some(stored)) => {
            tracing::debug!(user = %stored.user.username, "restored session");
            controller.session().restore(stored.token(), stored.user);
        }
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "ignoring unreadable session file"),
    }
}
