#![deny(clippy::all, clippy::pedantic)]

use blog_admin::{
    application::{dashboard::load_stats, error::AppError},
    domain::routes::Route,
};

use crate::context::Console;
use crate::print::{print_json, print_table};

pub async fn handle(console: &Console, json: bool) -> Result<(), AppError> {
    let session = console.require(Route::Dashboard).await?;
    let stats = load_stats(&console.client).await;
    if json {
        return print_json(&stats);
    }

    println!("Welcome, {}.", session.username().unwrap_or("admin"));
    print_table(
        &["Metric", "Count"],
        &[
            vec!["Total Posts".into(), stats.posts.to_string()],
            vec!["Categories".into(), stats.categories.to_string()],
            vec!["Comments".into(), stats.comments.to_string()],
            vec!["Pending Comments".into(), stats.pending_comments.to_string()],
        ],
    );
    if !stats.unavailable.is_empty() {
        eprintln!(
            "warning: could not load {}; counted as 0",
            stats.unavailable.join(", ")
        );
    }
    Ok(())
}
