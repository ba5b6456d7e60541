//! Shared helpers for command handlers.

use std::io::{BufRead, IsTerminal};

use secrecy::SecretString;

use labkeep_core::{Notice, WriteOutcome};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Use `given`, else prompt with `default` pre-filled.
pub fn username_or_prompt(
    given: Option<String>,
    default: Option<&str>,
) -> Result<String, CliError> {
    if let Some(name) = given {
        return Ok(name);
    }
    let mut input = dialoguer::Input::<String>::new().with_prompt("Username");
    if let Some(default) = default {
        input = input.default(default.to_owned());
    }
    input
        .interact_text()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}

/// Read a password from the first line of stdin, or prompt without echo.
pub fn read_password(from_stdin: bool) -> Result<SecretString, CliError> {
    let raw = if from_stdin {
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        line.trim_end_matches(['\r', '\n']).to_owned()
    } else {
        rpassword::prompt_password("Password: ")?
    };
    if raw.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "must not be empty".into(),
        });
    }
    Ok(SecretString::from(raw))
}

/// Print a write's notices and return the refreshed value, if any.
pub fn report<T>(outcome: WriteOutcome<T>, global: &GlobalOpts) -> Option<T> {
    let color = output::should_color(&global.color);
    output::print_notices(&outcome.notices(), global.quiet, color);
    outcome.into_fresh()
}

/// Print one notice.
pub fn notify(notice: &Notice, global: &GlobalOpts) {
    let color = output::should_color(&global.color);
    output::print_notices(std::slice::from_ref(notice), global.quiet, color);
}
