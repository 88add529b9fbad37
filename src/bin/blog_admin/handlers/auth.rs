#![deny(clippy::all, clippy::pedantic)]

use blog_admin::{
    application::error::AppError,
    config::SessionSettings,
    domain::session::SessionStatus,
    infra::credentials::{CredentialStore, FileCredentialStore},
};
use tracing::warn;

use crate::args::LoginArgs;
use crate::context::Console;
use crate::io::{prompt_line, read_secret_file};
use crate::print::print_json;

pub async fn login(console: &Console, args: LoginArgs) -> Result<(), AppError> {
    let username = match args.username {
        Some(username) => username,
        None => prompt_line("Username")?,
    };
    // file wins over env, as with every other secret input
    let password = match (args.password_file, args.password_env) {
        (Some(path), _) => read_secret_file(&path)?,
        (None, Some(password)) => password,
        (None, None) => prompt_line("Password")?,
    };

    let session = console.session.login(username.trim(), &password).await?;
    println!(
        "Signed in as {}.",
        session.username().unwrap_or(username.trim())
    );
    Ok(())
}

/// Forget the stored credential. Never contacts the API and never fails.
pub fn logout(session: &SessionSettings) {
    let store = FileCredentialStore::new(session.path.clone());
    if let Err(err) = store.clear() {
        warn!(error = %err, path = %session.path.display(), "failed to clear stored credential");
    }
    println!("Signed out.");
}

pub async fn whoami(console: &Console, json: bool) -> Result<(), AppError> {
    console.session.initialize().await;
    let session = console.session.snapshot();
    if json {
        return print_json(&session);
    }
    match (session.status(), session.user()) {
        (SessionStatus::Authenticated, Some(user)) => match &user.role {
            Some(role) => println!("{} ({role})", user.username),
            None => println!("{}", user.username),
        },
        _ => println!("Not signed in."),
    }
    Ok(())
}
