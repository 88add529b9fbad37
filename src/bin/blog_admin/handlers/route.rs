#![deny(clippy::all, clippy::pedantic)]

use blog_admin::{
    application::{error::AppError, guard::GuardDecision},
    domain::routes::Route,
};

use crate::context::Console;

pub async fn handle(console: &Console, path: &str) -> Result<(), AppError> {
    let route = Route::parse(path);
    match console.guard.enter(&route).await {
        GuardDecision::Render(session) => match session.username() {
            Some(username) => println!("render {route} as {username}"),
            None => println!("render {route}"),
        },
        GuardDecision::Redirect(target) => println!("redirect {target}"),
    }
    Ok(())
}
