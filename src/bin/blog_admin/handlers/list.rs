//! Rendering and mutation plumbing shared by every list command.

#![deny(clippy::all, clippy::pedantic)]

use blog_admin::application::{
    error::AppError,
    list::{ListController, ListRow, MutationOutcome, PageRows, RowAction},
};
use serde::Serialize;

use crate::args::ListArgs;
use crate::print::{print_json, print_table};
use crate::prompt::StdinConfirm;

#[derive(Serialize)]
struct PageView<'a, R> {
    page: usize,
    total_pages: usize,
    total: usize,
    items: Vec<&'a R>,
}

/// Load, filter and print one page of `list`.
pub async fn show<R>(
    list: &mut ListController<R>,
    args: &ListArgs,
    status: Option<R::Status>,
    headers: &[&str],
    render: fn(&R) -> Vec<String>,
) -> Result<(), AppError>
where
    R: ListRow + Serialize,
{
    list.load().await?;
    list.set_filter(&args.search, status);
    list.set_page(args.page);

    let state = list.state();
    let rows = match list.page_rows() {
        PageRows::Rows(rows) => rows,
        PageRows::Empty(message) => {
            if args.json {
                return print_json(&PageView::<R> {
                    page: state.page(),
                    total_pages: state.total_pages(),
                    total: 0,
                    items: Vec::new(),
                });
            }
            println!("{message}");
            return Ok(());
        }
    };

    if args.json {
        return print_json(&PageView {
            page: state.page(),
            total_pages: state.total_pages(),
            total: state.visible_len(),
            items: rows,
        });
    }
    let cells: Vec<Vec<String>> = rows.into_iter().map(render).collect();
    print_table(headers, &cells);
    println!(
        "Page {} / {} ({} total)",
        state.page(),
        state.total_pages(),
        state.visible_len()
    );
    Ok(())
}

/// Apply `action` to the targeted rows and print a per-row outcome.
pub async fn mutate<R: ListRow>(
    list: &mut ListController<R>,
    action: RowAction,
    ids: &[String],
    assume_yes: bool,
) -> Result<(), AppError> {
    let confirm = StdinConfirm { assume_yes };
    let report = match list.mutate(ids, action, &confirm).await? {
        MutationOutcome::Applied(report) => report,
        MutationOutcome::Cancelled => {
            println!("Cancelled.");
            return Ok(());
        }
    };

    for id in &report.succeeded {
        println!("{}: {id}", past_tense(action));
    }
    for (id, err) in &report.failed {
        eprintln!("failed to {} {id}: {err}", action.label());
    }
    if let Err(err) = &report.reload {
        eprintln!("warning: list refresh failed: {err}");
    }
    if report.is_clean() {
        Ok(())
    } else {
        Err(AppError::MutationFailed {
            action: action.label(),
            failed: report.failed.len(),
            total: ids.len(),
        })
    }
}

fn past_tense(action: RowAction) -> &'static str {
    match action {
        RowAction::Delete => "deleted",
        RowAction::Approve => "approved",
    }
}
