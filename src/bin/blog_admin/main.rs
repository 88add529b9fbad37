//! blog-admin: command-line administration console for the blog API.
#![deny(clippy::all, clippy::pedantic)]

mod args;
mod context;
mod handlers;
mod io;
mod print;
mod prompt;

use std::process::ExitCode;

use blog_admin::{application::error::AppError, config, infra::telemetry};
use clap::Parser;

use args::{Cli, Commands};
use context::Console;
use handlers::{auth, blogs, categories, comments, dashboard, route, uploads};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    // logout only touches the local credential, so it works without an API
    if matches!(cli.command, Commands::Logout) {
        let local = config::load_local(&cli.global)?;
        telemetry::init(&local.logging)?;
        auth::logout(&local.session);
        return Ok(());
    }

    let settings = config::load(&cli.global)?;
    telemetry::init(&settings.logging)?;
    let console = Console::build(settings)?;
    dispatch(&console, cli.command)
        .await
        .map_err(AppError::into_session_expired)
}

async fn dispatch(console: &Console, command: Commands) -> Result<(), AppError> {
    match command {
        Commands::Login(cmd) => auth::login(console, cmd).await,
        Commands::Logout => {
            auth::logout(&console.settings.session);
            Ok(())
        }
        Commands::Whoami { json } => auth::whoami(console, json).await,
        Commands::Dashboard { json } => dashboard::handle(console, json).await,
        Commands::Categories(cmd) => categories::handle(console, cmd.action).await,
        Commands::Blogs(cmd) => blogs::handle(console, cmd.action).await,
        Commands::Comments(cmd) => comments::handle(console, cmd.action).await,
        Commands::Uploads(cmd) => uploads::handle(console, cmd.action).await,
        Commands::Route { path } => route::handle(console, &path).await,
    }
}
