#![deny(clippy::all, clippy::pedantic)]

use blog_admin::{
    application::{
        categories::{CategoryService, category_list},
        error::AppError,
        list::RowAction,
    },
    domain::{error::ValidationError, forms::CategoryDraft, routes::Route},
};
use blog_admin_types::Category;

use crate::args::CategoriesCmd;
use crate::context::Console;
use crate::handlers::list;
use crate::print::{clip, print_json};

const HEADERS: &[&str] = &["ID", "Name", "Slug", "Meta title"];

pub async fn handle(console: &Console, cmd: CategoriesCmd) -> Result<(), AppError> {
    console.require(Route::Categories).await?;
    let service = CategoryService::new(console.client.clone());
    match cmd {
        CategoriesCmd::List(args) => {
            if args.status.is_some() {
                return Err(ValidationError::new("status", "categories have no status filter").into());
            }
            let mut categories = category_list(
                console.client.clone(),
                console.settings.lists.categories_page_size,
            );
            list::show(&mut categories, &args, None, HEADERS, render).await
        }
        CategoriesCmd::Create {
            name,
            meta_title,
            meta_description,
        } => {
            let created = service
                .create(CategoryDraft {
                    name,
                    meta_title,
                    meta_description,
                })
                .await?;
            report("Category created.", created.as_ref())
        }
        CategoriesCmd::Update {
            id,
            name,
            meta_title,
            meta_description,
        } => {
            let current = service.find(&id).await?;
            let mut draft = CategoryDraft::from_category(&current);
            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(meta_title) = meta_title {
                draft.meta_title = meta_title;
            }
            if let Some(meta_description) = meta_description {
                draft.meta_description = meta_description;
            }
            let updated = service.update(&id, draft).await?;
            report("Category updated.", updated.as_ref())
        }
        CategoriesCmd::Delete(target) => {
            let mut categories = category_list(
                console.client.clone(),
                console.settings.lists.categories_page_size,
            );
            list::mutate(&mut categories, RowAction::Delete, &target.ids, target.yes).await
        }
    }
}

fn report(message: &str, category: Option<&Category>) -> Result<(), AppError> {
    match category {
        Some(category) => print_json(category),
        None => {
            println!("{message}");
            Ok(())
        }
    }
}

fn render(category: &Category) -> Vec<String> {
    vec![
        category.id.clone(),
        clip(&category.name, 32),
        category.slug.clone().unwrap_or_else(|| "-".to_string()),
        clip(category.meta_title.as_deref().unwrap_or("-"), 40),
    ]
}
