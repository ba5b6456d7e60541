//! Account command handlers: login, logout, whoami, register.

use labkeep_core::{Controller, Notice, User};

use crate::cli::{GlobalOpts, LoginArgs, RegisterArgs};
use crate::config::{self, StoredSession};
use crate::error::CliError;
use crate::output;

use super::util;

fn detail(user: &User) -> String {
    let mut lines = vec![
        format!("Username: {}", user.username),
        format!("ID:       {}", user.id),
    ];
    if let Some(ref role) = user.role {
        lines.push(format!("Role:     {role}"));
    }
    if !user.is_active {
        lines.push("Status:   inactive".into());
    }
    lines.join("\n")
}

pub async fn login(
    controller: &Controller,
    args: LoginArgs,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let cfg = config::load_config_or_default();
    let remembered = cfg
        .profiles
        .get(profile_name)
        .and_then(|p| p.username.as_deref());
    let username = util::username_or_prompt(args.username, remembered)?;
    let password = util::read_password(args.password_stdin)?;

    let user = controller.login(&username, &password).await?;

    if let Some(session) = controller.session().snapshot() {
        config::save_session(profile_name, &StoredSession::from(&*session))?;
    }
    util::notify(
        &Notice::success(format!("Signed in as {}", user.username)),
        global,
    );
    Ok(())
}

pub fn logout(profile_name: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let message = if config::clear_session(profile_name)? {
        "Signed out"
    } else {
        "No stored session"
    };
    util::notify(&Notice::success(message), global);
    Ok(())
}

pub async fn whoami(
    controller: &Controller,
    refresh: bool,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let user = if refresh {
        let user = controller.refresh_profile().await?;
        if let Some(session) = controller.session().snapshot() {
            config::save_session(profile_name, &StoredSession::from(&*session))?;
        }
        user
    } else {
        controller.session().current_user().ok_or(CliError::NotSignedIn)?
    };

    let out = output::render_single(&global.output, &user, detail, |u| u.username.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn register(
    controller: &Controller,
    args: RegisterArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let username = util::username_or_prompt(args.username, None)?;
    let password = util::read_password(args.password_stdin)?;
    let message = controller.register(&username, &password).await?;
    util::notify(&Notice::success(message), global);
    if !global.quiet {
        eprintln!("Sign in with: labkeep login -u {}", username.trim());
    }
    Ok(())
}
