#![deny(clippy::all, clippy::pedantic)]

use blog_admin::{
    application::{
        comments::{ModerationStatus, comment_list},
        error::AppError,
        list::RowAction,
    },
    domain::routes::Route,
};
use blog_admin_types::Comment;
use time::macros::format_description;

use crate::args::CommentsCmd;
use crate::context::Console;
use crate::handlers::list;
use crate::print::clip;

const HEADERS: &[&str] = &["ID", "Post", "Author", "Comment", "Status", "Date"];

pub async fn handle(console: &Console, cmd: CommentsCmd) -> Result<(), AppError> {
    console.require(Route::Comments).await?;
    let mut comments = comment_list(
        console.client.clone(),
        console.settings.lists.comments_page_size,
    );
    match cmd {
        CommentsCmd::List(args) => {
            let status = ModerationStatus::parse_filter(args.status.as_deref())?;
            list::show(&mut comments, &args, status, HEADERS, render).await
        }
        CommentsCmd::Approve { ids } => {
            list::mutate(&mut comments, RowAction::Approve, &ids, false).await
        }
        CommentsCmd::Delete(target) => {
            list::mutate(&mut comments, RowAction::Delete, &target.ids, target.yes).await
        }
    }
}

fn render(comment: &Comment) -> Vec<String> {
    let post = comment
        .post
        .as_ref()
        .and_then(|post| post.title.as_deref().or(post.slug.as_deref()))
        .unwrap_or("-");
    let author = match (&comment.name, &comment.email) {
        (Some(name), Some(email)) => format!("{name} <{email}>"),
        (Some(name), None) => name.clone(),
        (None, Some(email)) => email.clone(),
        (None, None) => "-".to_string(),
    };
    let status = if comment.approved {
        ModerationStatus::Approved
    } else {
        ModerationStatus::Pending
    };
    let date = comment
        .created_at
        .and_then(|at| {
            at.format(format_description!("[year]-[month]-[day] [hour]:[minute]"))
                .ok()
        })
        .unwrap_or_else(|| "-".to_string());
    vec![
        comment.id.clone(),
        clip(post, 30),
        clip(&author, 32),
        clip(comment.message.as_deref().unwrap_or(""), 48),
        status.as_str().to_string(),
        date,
    ]
}
